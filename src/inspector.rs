//! Read-only node attribute access for `ga`, `@@` expression operands, and
//! the prompt renderer.

use crate::context::Context;
use crate::store::{self, NodeId, NodeRef, Repository};

/// Attribute names in the order `ga` lists them.
pub const ATTRIBUTE_NAMES: &[&str] = &[
    "name",
    "id",
    "key",
    "template",
    "templateid",
    "language",
    "version",
    "path",
    "parentid",
    "childcount",
];

/// Absolute path of a node; the store root renders as `/`.
pub fn node_path(repo: &dyn Repository, store: &str, id: NodeId) -> Option<String> {
    let mut segments = Vec::new();
    let mut cursor = repo.node(store, id)?;
    while let Some(parent) = cursor.parent {
        segments.push(cursor.name.clone());
        cursor = repo.node(store, parent)?;
    }
    segments.reverse();
    Some(format!("/{}", segments.join("/")))
}

/// Reads one attribute of the current node. `None` covers both an unknown
/// name and a known one the node has no value for (`parentid` at the root);
/// callers shape their own failure or fallback from that.
pub fn attribute(ctx: &Context, name: &str) -> Option<String> {
    attribute_of(ctx.repo().as_ref(), ctx.store(), ctx.current(), name)
}

pub fn attribute_of(
    repo: &dyn Repository,
    store: &str,
    node: &NodeRef,
    name: &str,
) -> Option<String> {
    let snapshot = repo.node(store, node.id)?;
    match name.to_lowercase().as_str() {
        "name" => Some(snapshot.name),
        "id" => Some(store::format_node_id(&node.id)),
        "key" => Some(snapshot.name.to_lowercase()),
        "template" => Some(snapshot.template.clone()),
        "templateid" => repo
            .template_id(store, &snapshot.template)
            .map(|id| store::format_node_id(&id)),
        "language" => Some(node.language.clone()),
        "version" => Some(node.version.to_string()),
        "path" => node_path(repo, store, node.id),
        "parentid" => snapshot.parent.map(|p| store::format_node_id(&p)),
        "childcount" => Some(snapshot.children.len().to_string()),
        _ => None,
    }
}

/// Number of nodes in the subtree rooted at `id`, the node itself included.
pub fn count_subtree(repo: &dyn Repository, store: &str, id: NodeId) -> usize {
    let mut count = 0;
    let mut pending = vec![id];
    while let Some(next) = pending.pop() {
        if let Some(snapshot) = repo.node(store, next) {
            count += 1;
            pending.extend(snapshot.children);
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::memory::MemoryStore;

    fn context() -> Context {
        let store = MemoryStore::new();
        let root = store.add_store("master", &["en"]);
        let content = store
            .create_node("master", root, "content", "common/folder", "en")
            .unwrap();
        store
            .create_node("master", content, "Home", "common/document", "en")
            .unwrap();
        let mut ctx = Context::new(Arc::new(store), "master").unwrap();
        let home = ctx.repo().children_named("master", content, "home")[0];
        ctx.set_current(NodeRef::new(home, "en".to_string(), 1));
        ctx
    }

    #[test]
    fn paths_walk_up_to_the_root() {
        let ctx = context();
        assert_eq!(
            node_path(ctx.repo().as_ref(), "master", ctx.current().id).as_deref(),
            Some("/content/Home")
        );
    }

    #[test]
    fn name_key_and_counts() {
        let ctx = context();
        assert_eq!(attribute(&ctx, "name").as_deref(), Some("Home"));
        assert_eq!(attribute(&ctx, "key").as_deref(), Some("home"));
        assert_eq!(attribute(&ctx, "childcount").as_deref(), Some("0"));
        assert_eq!(attribute(&ctx, "template").as_deref(), Some("common/document"));
        assert_eq!(attribute(&ctx, "version").as_deref(), Some("1"));
    }

    #[test]
    fn unknown_attribute_is_none() {
        let ctx = context();
        assert_eq!(attribute(&ctx, "owner"), None);
    }

    #[test]
    fn id_attributes_are_braced() {
        let ctx = context();
        let id = attribute(&ctx, "id").unwrap();
        assert!(id.starts_with('{') && id.ends_with('}'));
        assert_eq!(store::parse_node_id(&id), Some(ctx.current().id));
    }

    #[test]
    fn subtree_count_includes_self() {
        let ctx = context();
        let root = ctx.repo().root("master").unwrap();
        assert_eq!(count_subtree(ctx.repo().as_ref(), "master", root), 3);
    }
}
