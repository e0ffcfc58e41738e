//! In-memory [`Repository`] used by the binary and the test suites.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::errors::{ShellError, ShellResult};
use crate::store::{NodeId, NodeRef, NodeSnapshot, Repository};

#[derive(Debug, Default)]
struct NodeRecord {
    name: String,
    template: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// language (lowercased) -> field maps, one per version, index 0 = version 1.
    versions: HashMap<String, Vec<HashMap<String, String>>>,
}

#[derive(Debug)]
struct StoreData {
    name: String,
    languages: Vec<String>,
    root: NodeId,
    nodes: HashMap<NodeId, NodeRecord>,
    templates: HashMap<String, NodeId>,
}

impl StoreData {
    fn record(&self, id: NodeId) -> ShellResult<&NodeRecord> {
        self.nodes
            .get(&id)
            .ok_or_else(|| ShellError::InputError(format!("Node {id} not found")))
    }

    fn record_mut(&mut self, id: NodeId) -> ShellResult<&mut NodeRecord> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| ShellError::InputError(format!("Node {id} not found")))
    }
}

#[derive(Default)]
pub struct MemoryStore {
    stores: RwLock<Vec<StoreData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with a root node named after it. Returns the root id.
    pub fn add_store(&self, name: &str, languages: &[&str]) -> NodeId {
        let root = Uuid::new_v4();
        let mut nodes = HashMap::new();
        let mut record = NodeRecord {
            name: name.to_string(),
            template: "root".to_string(),
            ..NodeRecord::default()
        };
        for lang in languages {
            record
                .versions
                .insert(lang.to_lowercase(), vec![HashMap::new()]);
        }
        nodes.insert(root, record);
        self.stores
            .write()
            .expect("store lock poisoned")
            .push(StoreData {
                name: name.to_string(),
                languages: languages.iter().map(|l| l.to_string()).collect(),
                root,
                nodes,
                templates: HashMap::new(),
            });
        root
    }

    fn read<T>(&self, store: &str, f: impl FnOnce(&StoreData) -> T) -> Option<T> {
        let stores = self.stores.read().expect("store lock poisoned");
        stores
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(store))
            .map(f)
    }

    fn write<T>(
        &self,
        store: &str,
        f: impl FnOnce(&mut StoreData) -> ShellResult<T>,
    ) -> ShellResult<T> {
        let mut stores = self.stores.write().expect("store lock poisoned");
        let data = stores
            .iter_mut()
            .find(|s| s.name.eq_ignore_ascii_case(store))
            .ok_or_else(|| ShellError::InputError(format!("Store '{store}' not found")))?;
        f(data)
    }
}

impl Repository for MemoryStore {
    fn store_names(&self) -> Vec<String> {
        let stores = self.stores.read().expect("store lock poisoned");
        stores.iter().map(|s| s.name.clone()).collect()
    }

    fn find_store(&self, name: &str) -> Option<String> {
        self.read(name, |s| s.name.clone())
    }

    fn languages(&self, store: &str) -> Vec<String> {
        self.read(store, |s| s.languages.clone()).unwrap_or_default()
    }

    fn root(&self, store: &str) -> Option<NodeId> {
        self.read(store, |s| s.root)
    }

    fn node(&self, store: &str, id: NodeId) -> Option<NodeSnapshot> {
        self.read(store, |s| {
            s.nodes.get(&id).map(|r| NodeSnapshot {
                id,
                name: r.name.clone(),
                template: r.template.clone(),
                parent: r.parent,
                children: r.children.clone(),
            })
        })
        .flatten()
    }

    fn children_named(&self, store: &str, parent: NodeId, name: &str) -> Vec<NodeId> {
        self.read(store, |s| {
            let Some(record) = s.nodes.get(&parent) else {
                return Vec::new();
            };
            record
                .children
                .iter()
                .filter(|c| {
                    s.nodes
                        .get(c)
                        .is_some_and(|r| r.name.eq_ignore_ascii_case(name))
                })
                .copied()
                .collect()
        })
        .unwrap_or_default()
    }

    fn version_count(&self, store: &str, id: NodeId, language: &str) -> usize {
        self.read(store, |s| {
            s.nodes
                .get(&id)
                .and_then(|r| r.versions.get(&language.to_lowercase()))
                .map_or(0, Vec::len)
        })
        .unwrap_or(0)
    }

    fn field(&self, store: &str, node: &NodeRef, name: &str) -> Option<String> {
        self.read(store, |s| {
            let record = s.nodes.get(&node.id)?;
            let versions = record.versions.get(&node.language.to_lowercase())?;
            let fields = versions.get(node.version.checked_sub(1)? as usize)?;
            fields.get(&name.to_lowercase()).cloned()
        })
        .flatten()
    }

    fn field_names(&self, store: &str, node: &NodeRef) -> Vec<String> {
        self.read(store, |s| {
            let Some(record) = s.nodes.get(&node.id) else {
                return Vec::new();
            };
            let fields = record
                .versions
                .get(&node.language.to_lowercase())
                .and_then(|v| node.version.checked_sub(1).and_then(|i| v.get(i as usize)));
            let mut names: Vec<String> = fields
                .map(|f| f.keys().cloned().collect())
                .unwrap_or_default();
            names.sort();
            names
        })
        .unwrap_or_default()
    }

    fn template_id(&self, store: &str, template: &str) -> Option<NodeId> {
        self.read(store, |s| s.templates.get(&template.to_lowercase()).copied())
            .flatten()
    }

    fn set_field(&self, store: &str, node: &NodeRef, name: &str, value: &str) -> ShellResult<()> {
        self.write(store, |s| {
            let lang = node.language.to_lowercase();
            let record = s.record_mut(node.id)?;
            let fields = record
                .versions
                .get_mut(&lang)
                .and_then(|v| node.version.checked_sub(1).and_then(|i| v.get_mut(i as usize)))
                .ok_or_else(|| {
                    ShellError::InputError(format!(
                        "Node has no version {} in language '{}'",
                        node.version, node.language
                    ))
                })?;
            fields.insert(name.to_lowercase(), value.to_string());
            Ok(())
        })
    }

    fn remove_field(&self, store: &str, node: &NodeRef, name: &str) -> ShellResult<()> {
        self.write(store, |s| {
            let lang = node.language.to_lowercase();
            let record = s.record_mut(node.id)?;
            if let Some(fields) = record
                .versions
                .get_mut(&lang)
                .and_then(|v| node.version.checked_sub(1).and_then(|i| v.get_mut(i as usize)))
            {
                fields.remove(&name.to_lowercase());
            }
            Ok(())
        })
    }

    fn add_version(&self, store: &str, id: NodeId, language: &str) -> ShellResult<u32> {
        self.write(store, |s| {
            let record = s.record_mut(id)?;
            let versions = record.versions.entry(language.to_lowercase()).or_default();
            let copy = versions.last().cloned().unwrap_or_default();
            versions.push(copy);
            Ok(versions.len() as u32)
        })
    }

    fn create_node(
        &self,
        store: &str,
        parent: NodeId,
        name: &str,
        template: &str,
        language: &str,
    ) -> ShellResult<NodeId> {
        if name.trim().is_empty() {
            return Err(ShellError::InputError(
                "Node name must not be empty".to_string(),
            ));
        }
        self.write(store, |s| {
            s.record(parent)?;
            let id = Uuid::new_v4();
            let mut record = NodeRecord {
                name: name.to_string(),
                template: template.to_string(),
                parent: Some(parent),
                ..NodeRecord::default()
            };
            record
                .versions
                .insert(language.to_lowercase(), vec![HashMap::new()]);
            s.nodes.insert(id, record);
            s.record_mut(parent)?.children.push(id);
            if !template.trim().is_empty() {
                s.templates
                    .entry(template.to_lowercase())
                    .or_insert_with(Uuid::new_v4);
            }
            Ok(id)
        })
    }

    fn delete_node(&self, store: &str, id: NodeId) -> ShellResult<usize> {
        self.write(store, |s| {
            if s.root == id {
                return Err(ShellError::InputError(
                    "Cannot delete the root node".to_string(),
                ));
            }
            let parent = s.record(id)?.parent;
            let mut doomed = vec![id];
            let mut i = 0;
            while i < doomed.len() {
                if let Some(record) = s.nodes.get(&doomed[i]) {
                    doomed.extend(record.children.iter().copied());
                }
                i += 1;
            }
            for gone in &doomed {
                s.nodes.remove(gone);
            }
            if let Some(parent) = parent {
                if let Some(record) = s.nodes.get_mut(&parent) {
                    record.children.retain(|c| *c != id);
                }
            }
            Ok(doomed.len())
        })
    }
}

/// A small content tree for the interactive binary.
pub fn sample_repository() -> MemoryStore {
    let store = MemoryStore::new();
    let root = store.add_store("master", &["en", "da"]);
    let seed = |parent: NodeId, name: &str, template: &str| -> NodeId {
        store
            .create_node("master", parent, name, template, "en")
            .unwrap_or(parent)
    };
    let content = seed(root, "content", "common/folder");
    let home = seed(content, "home", "common/document");
    seed(home, "about", "common/document");
    seed(home, "news", "common/folder");
    let templates = seed(root, "templates", "common/folder");
    seed(templates, "folder", "template");
    seed(templates, "document", "template");
    let current = NodeRef::new(home, "en", 1);
    let _ = store.set_field("master", &current, "title", "Home");
    store
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_tree() -> (MemoryStore, NodeId) {
        let store = MemoryStore::new();
        let root = store.add_store("master", &["en"]);
        (store, root)
    }

    #[test]
    fn creates_and_reads_children_in_order() {
        let (store, root) = store_with_tree();
        let a = store.create_node("master", root, "alpha", "doc", "en").unwrap();
        let b = store.create_node("master", root, "beta", "doc", "en").unwrap();
        let snapshot = store.node("master", root).unwrap();
        assert_eq!(snapshot.children, vec![a, b]);
    }

    #[test]
    fn same_name_siblings_resolve_in_sibling_order() {
        let (store, root) = store_with_tree();
        let first = store.create_node("master", root, "Twin", "doc", "en").unwrap();
        store.create_node("master", root, "other", "doc", "en").unwrap();
        let second = store.create_node("master", root, "twin", "doc", "en").unwrap();
        assert_eq!(store.children_named("master", root, "TWIN"), vec![first, second]);
    }

    #[test]
    fn add_version_copies_latest_fields() {
        let (store, root) = store_with_tree();
        let id = store.create_node("master", root, "page", "doc", "en").unwrap();
        let v1 = NodeRef::new(id, "en", 1);
        store.set_field("master", &v1, "title", "one").unwrap();
        let n = store.add_version("master", id, "en").unwrap();
        assert_eq!(n, 2);
        let v2 = NodeRef::new(id, "en", 2);
        assert_eq!(store.field("master", &v2, "title").as_deref(), Some("one"));
        store.set_field("master", &v2, "title", "two").unwrap();
        assert_eq!(store.field("master", &v1, "title").as_deref(), Some("one"));
    }

    #[test]
    fn missing_language_has_no_versions() {
        let (store, root) = store_with_tree();
        let id = store.create_node("master", root, "page", "doc", "en").unwrap();
        assert_eq!(store.version_count("master", id, "da"), 0);
        let da = NodeRef::new(id, "da", 1);
        assert_eq!(store.field("master", &da, "title"), None);
    }

    #[test]
    fn delete_counts_subtree_and_detaches() {
        let (store, root) = store_with_tree();
        let branch = store.create_node("master", root, "branch", "doc", "en").unwrap();
        store.create_node("master", branch, "leaf1", "doc", "en").unwrap();
        store.create_node("master", branch, "leaf2", "doc", "en").unwrap();
        assert_eq!(store.delete_node("master", branch).unwrap(), 3);
        assert!(store.node("master", branch).is_none());
        assert!(store.node("master", root).unwrap().children.is_empty());
    }

    #[test]
    fn root_cannot_be_deleted() {
        let (store, root) = store_with_tree();
        assert!(store.delete_node("master", root).is_err());
    }

    #[test]
    fn store_lookup_is_case_insensitive() {
        let (store, _) = store_with_tree();
        assert_eq!(store.find_store("MASTER").as_deref(), Some("master"));
        assert_eq!(store.find_store("web"), None);
    }
}
