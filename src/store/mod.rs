//! Repository abstraction over a hierarchical, versioned content store.
//!
//! Nodes live in named stores, carry ordered children, and hold fields per
//! language and version (versions are 1-based). The shell core only talks
//! to this trait; [`memory::MemoryStore`] backs the binary and the tests.

pub mod memory;

use uuid::Uuid;

use crate::errors::ShellResult;

pub type NodeId = Uuid;

/// A node address: identity plus the language/version being viewed.
/// Version 0 means the node has no version in that language yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
    pub id: NodeId,
    pub language: String,
    pub version: u32,
}

impl NodeRef {
    pub fn new(id: NodeId, language: impl Into<String>, version: u32) -> Self {
        NodeRef {
            id,
            language: language.into(),
            version,
        }
    }
}

/// Structural view of a node, independent of language and version.
#[derive(Debug, Clone)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub name: String,
    pub template: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

pub trait Repository: Send + Sync {
    /// Store names in creation order, display casing.
    fn store_names(&self) -> Vec<String>;

    /// Resolves a store name case-insensitively to its canonical form.
    fn find_store(&self, name: &str) -> Option<String>;

    fn languages(&self, store: &str) -> Vec<String>;

    fn root(&self, store: &str) -> Option<NodeId>;

    fn node(&self, store: &str, id: NodeId) -> Option<NodeSnapshot>;

    /// Children of `parent` whose name matches case-insensitively, in
    /// sibling order.
    fn children_named(&self, store: &str, parent: NodeId, name: &str) -> Vec<NodeId>;

    fn version_count(&self, store: &str, id: NodeId, language: &str) -> usize;

    fn field(&self, store: &str, node: &NodeRef, name: &str) -> Option<String>;

    fn field_names(&self, store: &str, node: &NodeRef) -> Vec<String>;

    fn template_id(&self, store: &str, template: &str) -> Option<NodeId>;

    fn set_field(&self, store: &str, node: &NodeRef, name: &str, value: &str) -> ShellResult<()>;

    fn remove_field(&self, store: &str, node: &NodeRef, name: &str) -> ShellResult<()>;

    /// Adds a version in `language` copying the fields of the latest one.
    /// Returns the new version number.
    fn add_version(&self, store: &str, id: NodeId, language: &str) -> ShellResult<u32>;

    /// Creates a child node with one empty version in `language`.
    fn create_node(
        &self,
        store: &str,
        parent: NodeId,
        name: &str,
        template: &str,
        language: &str,
    ) -> ShellResult<NodeId>;

    /// Deletes the node and its subtree. Returns how many nodes went.
    fn delete_node(&self, store: &str, id: NodeId) -> ShellResult<usize>;
}

/// Parses braced id text (`{9b03ffa6-...}`) into a [`NodeId`].
pub fn parse_node_id(text: &str) -> Option<NodeId> {
    let inner = text.strip_prefix('{')?.strip_suffix('}')?;
    Uuid::parse_str(inner).ok()
}

/// Renders a [`NodeId`] in braced uppercase form.
pub fn format_node_id(id: &NodeId) -> String {
    format!("{{{}}}", id.to_string().to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_text_roundtrip() {
        let id = Uuid::new_v4();
        let text = format_node_id(&id);
        assert!(text.starts_with('{') && text.ends_with('}'));
        assert_eq!(parse_node_id(&text), Some(id));
    }

    #[test]
    fn unbraced_text_is_not_an_id() {
        assert_eq!(parse_node_id("9b03ffa6-0000-0000-0000-000000000000"), None);
        assert_eq!(parse_node_id("/content/home"), None);
    }
}
