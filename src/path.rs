//! Hierarchical path resolution with language and version addressing.
//!
//! Grammar: `[/store/]segment(/segment)*[:lang][:[version]]`. Suffix groups
//! attach only after the rightmost `/`; `..` and `.` collapse textually
//! before any store lookup happens; `name[i]` picks the i-th same-name
//! sibling (zero-based, case-insensitive) and a bare `[i]` the i-th child.

use crate::context::Context;
use crate::result::CommandResult;
use crate::store::{self, NodeId, NodeRef};

/// Normalizes `input` to an absolute path: prefixes the current path when
/// relative, strips suffix groups, collapses `..`, `.` and empty segments.
/// Node-id input passes through untouched.
pub fn evaluate_path(ctx: &Context, input: &str) -> String {
    let input = input.trim();
    if store::parse_node_id(input).is_some() {
        return input.to_string();
    }
    let bare = strip_suffixes(input);
    let absolute = absolutize(ctx, bare);
    render(&collapse_segments(&absolute))
}

/// The `:lang` suffix group, if present. `Some("")` means the group was
/// empty (keep the current language).
pub fn parse_language(input: &str) -> Option<String> {
    suffix_parts(input).get(1).cloned()
}

/// The `:version` suffix group, if present. `Some("")` means latest.
pub fn parse_version(input: &str) -> Option<String> {
    suffix_parts(input).get(2).cloned()
}

/// Relocates the context to `spec`: store prefix, path walk, sibling
/// indexes, language and version suffixes. Any failure reverts; the
/// context is exactly as before the call.
pub fn set_context(ctx: &mut Context, spec: &str) -> CommandResult {
    let spec = spec.trim();
    ctx.push_context();
    match relocate(ctx, spec) {
        Ok(()) => {
            ctx.commit_context();
            CommandResult::success("")
        }
        Err(failure) => {
            ctx.revert_context();
            failure
        }
    }
}

fn relocate(ctx: &mut Context, spec: &str) -> Result<(), CommandResult> {
    if let Some(id) = store::parse_node_id(spec) {
        return relocate_to_id(ctx, spec, id);
    }

    let mut working = spec.to_string();
    let mut store_name = ctx.store().to_string();

    // A leading /name/ matching a store switches stores; the remainder
    // resolves inside it.
    if let Some(rest) = working.strip_prefix('/') {
        let (head, tail) = match rest.find('/') {
            Some(pos) => (&rest[..pos], &rest[pos..]),
            None => (rest, ""),
        };
        if !head.is_empty() {
            if let Some(canonical) = ctx.repo().find_store(head) {
                store_name = canonical;
                working = if tail.is_empty() {
                    "/".to_string()
                } else {
                    tail.to_string()
                };
            }
        }
    }

    let language_raw = parse_language(&working);
    let version_raw = parse_version(&working);
    let bare = strip_suffixes(&working).to_string();

    let absolute = if store_name.eq_ignore_ascii_case(ctx.store()) {
        absolutize(ctx, &bare)
    } else if bare.starts_with('/') {
        bare
    } else {
        // Relative text cannot anchor in a different store.
        format!("/{bare}")
    };
    let segments = collapse_segments(&absolute);

    let root = ctx
        .repo()
        .root(&store_name)
        .ok_or_else(|| CommandResult::failure(format!("Store '{store_name}' has no root")))?;
    let mut node = root;
    for segment in &segments {
        node = match resolve_segment(ctx, &store_name, node, segment) {
            Some(next) => next,
            None => return Err(step_failure(ctx, &store_name, node, segment, &segments)),
        };
    }

    let language = match language_raw {
        Some(lang) if !lang.is_empty() => lang,
        _ => ctx.current().language.clone(),
    };
    let count = ctx.repo().version_count(&store_name, node, &language);
    let version = match version_raw.as_deref() {
        None | Some("") => count as u32,
        Some(text) => resolve_version(text, count)?,
    };

    ctx.set_location(store_name, NodeRef::new(node, language, version));
    Ok(())
}

fn relocate_to_id(ctx: &mut Context, spec: &str, id: NodeId) -> Result<(), CommandResult> {
    let store_name = ctx.store().to_string();
    if ctx.repo().node(&store_name, id).is_none() {
        return Err(CommandResult::failure(format!("Node {spec} not found")));
    }
    let language = ctx.current().language.clone();
    let count = ctx.repo().version_count(&store_name, id, &language);
    ctx.set_current(NodeRef::new(id, language, count as u32));
    Ok(())
}

fn resolve_segment(ctx: &Context, store: &str, parent: NodeId, segment: &str) -> Option<NodeId> {
    let (name, index) = split_index(segment);
    let candidates: Vec<NodeId> = if name.is_empty() {
        ctx.repo().node(store, parent).map(|s| s.children)?
    } else {
        ctx.repo().children_named(store, parent, &name)
    };
    match index {
        None => candidates.first().copied(),
        // Range errors surface through step_failure with their own message.
        Some(i) if i < 0 => None,
        Some(i) => candidates.get(i as usize).copied(),
    }
}

/// Shapes the failure for a segment that did not resolve.
fn step_failure(
    ctx: &Context,
    store: &str,
    parent: NodeId,
    segment: &str,
    segments: &[String],
) -> CommandResult {
    let (name, index) = split_index(segment);
    if let Some(i) = index {
        if i < 0 {
            return CommandResult::failure("Index must be non-negative");
        }
        let count = if name.is_empty() {
            ctx.repo()
                .node(store, parent)
                .map_or(0, |s| s.children.len())
        } else {
            ctx.repo().children_named(store, parent, &name).len()
        };
        if i as usize >= count {
            return CommandResult::failure("Index greater than named child count");
        }
    }
    CommandResult::failure(format!("Path '{}' not found", render(segments)))
}

/// Turns version text into a concrete 1-based number against `count`
/// existing versions. Negative input counts back from the latest.
pub(crate) fn resolve_version(text: &str, count: usize) -> Result<u32, CommandResult> {
    let parsed: i64 = text.parse().map_err(|_| {
        CommandResult::failure(format!("Failed to parse version number '{text}'"))
    })?;
    let target = if parsed < 0 {
        count as i64 + parsed
    } else {
        parsed
    };
    if target < 1 || target > count as i64 {
        return Err(CommandResult::failure(
            "Version index greater than number of versions.",
        ));
    }
    Ok(target as u32)
}

fn absolutize(ctx: &Context, bare: &str) -> String {
    if bare.starts_with('/') {
        bare.to_string()
    } else if bare.is_empty() {
        ctx.current_path()
    } else {
        let base = ctx.current_path();
        if base == "/" {
            format!("/{bare}")
        } else {
            format!("{base}/{bare}")
        }
    }
}

fn collapse_segments(absolute: &str) -> Vec<String> {
    let mut segments: Vec<String> = Vec::new();
    for segment in absolute.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other.to_string()),
        }
    }
    segments
}

fn render(segments: &[String]) -> String {
    format!("/{}", segments.join("/"))
}

/// Splits `name[3]` into `("name", Some(3))`; text without a well-formed
/// trailing index is all name.
fn split_index(segment: &str) -> (String, Option<i64>) {
    if let Some(inner_start) = segment.rfind('[') {
        if let Some(stripped) = segment.strip_suffix(']') {
            let inner = &stripped[inner_start + 1..];
            if let Ok(index) = inner.parse::<i64>() {
                return (segment[..inner_start].to_string(), Some(index));
            }
        }
    }
    (segment.to_string(), None)
}

fn suffix_parts(input: &str) -> Vec<String> {
    let tail = match input.rfind('/') {
        Some(pos) => &input[pos + 1..],
        None => input,
    };
    if !tail.contains(':') {
        return Vec::new();
    }
    tail.split(':').map(str::to_string).collect()
}

fn strip_suffixes(input: &str) -> &str {
    let tail_start = input.rfind('/').map_or(0, |p| p + 1);
    match input[tail_start..].find(':') {
        Some(colon) => &input[..tail_start + colon],
        None => input,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::Repository;

    /// master: /content/{Luna{Tycho}, phobos, Twin, Twin}, /archive
    /// web: /pages
    fn context() -> Context {
        let store = MemoryStore::new();
        let root = store.add_store("master", &["en", "da"]);
        let content = store
            .create_node("master", root, "content", "folder", "en")
            .unwrap();
        let luna = store
            .create_node("master", content, "Luna", "doc", "en")
            .unwrap();
        store.create_node("master", luna, "Tycho", "doc", "en").unwrap();
        store
            .create_node("master", content, "phobos", "doc", "en")
            .unwrap();
        store.create_node("master", content, "Twin", "doc", "en").unwrap();
        store.create_node("master", content, "Twin", "doc", "en").unwrap();
        store.create_node("master", root, "archive", "folder", "en").unwrap();
        let web_root = store.add_store("web", &["en"]);
        store.create_node("web", web_root, "pages", "folder", "en").unwrap();
        Context::new(Arc::new(store), "master").unwrap()
    }

    #[test]
    fn relative_paths_anchor_at_the_current_node() {
        let mut ctx = context();
        assert!(set_context(&mut ctx, "content/Luna").is_success());
        assert_eq!(ctx.current_path(), "/content/Luna");
        assert_eq!(evaluate_path(&ctx, "Tycho"), "/content/Luna/Tycho");
        assert_eq!(evaluate_path(&ctx, "../phobos"), "/content/phobos");
        assert_eq!(evaluate_path(&ctx, "./Tycho"), "/content/Luna/Tycho");
    }

    #[test]
    fn suffixes_strip_from_the_last_segment_only() {
        let ctx = context();
        assert_eq!(evaluate_path(&ctx, "/content/Luna:da:2"), "/content/Luna");
        assert_eq!(parse_language("/content/Luna:da:2").as_deref(), Some("da"));
        assert_eq!(parse_version("/content/Luna:da:2").as_deref(), Some("2"));
        assert_eq!(parse_language("/content/Luna::2").as_deref(), Some(""));
        assert_eq!(parse_version("/content/Luna:da").as_deref(), None);
        assert_eq!(parse_version("Luna::").as_deref(), Some(""));
    }

    #[test]
    fn dotdot_above_root_stays_at_root() {
        let ctx = context();
        assert_eq!(evaluate_path(&ctx, "/../../content"), "/content");
    }

    #[test]
    fn walks_case_insensitively() {
        let mut ctx = context();
        assert!(set_context(&mut ctx, "/CONTENT/luna/tycho").is_success());
        assert_eq!(ctx.current_path(), "/content/Luna/Tycho");
    }

    #[test]
    fn sibling_index_selects_among_same_names() {
        let mut ctx = context();
        assert!(set_context(&mut ctx, "/content/Twin[1]").is_success());
        let snapshot = ctx.current_snapshot().unwrap();
        let parent = snapshot.parent.unwrap();
        let twins = ctx.repo().children_named("master", parent, "twin");
        assert_eq!(snapshot.id, twins[1]);
    }

    #[test]
    fn bare_index_selects_by_child_position() {
        let mut ctx = context();
        assert!(set_context(&mut ctx, "/content/[1]").is_success());
        assert_eq!(ctx.current_path(), "/content/phobos");
    }

    #[test]
    fn negative_index_fails_and_reverts() {
        let mut ctx = context();
        let before = ctx.current_path();
        let res = set_context(&mut ctx, "/content/Twin[-1]");
        assert!(res.is_failure());
        assert_eq!(res.message, "Index must be non-negative");
        assert_eq!(ctx.current_path(), before);
    }

    #[test]
    fn index_past_the_named_children_fails() {
        let mut ctx = context();
        let res = set_context(&mut ctx, "/content/Twin[2]");
        assert!(res.is_failure());
        assert_eq!(res.message, "Index greater than named child count");
    }

    #[test]
    fn missing_path_reverts_the_context() {
        let mut ctx = context();
        assert!(set_context(&mut ctx, "/content/Luna").is_success());
        let res = set_context(&mut ctx, "nowhere");
        assert!(res.is_failure());
        assert_eq!(ctx.current_path(), "/content/Luna");
        assert_eq!(ctx.store(), "master");
    }

    #[test]
    fn store_prefix_switches_stores() {
        let mut ctx = context();
        assert!(set_context(&mut ctx, "/Web/pages").is_success());
        assert_eq!(ctx.store(), "web");
        assert_eq!(ctx.current_path(), "/pages");
        assert!(set_context(&mut ctx, "/master").is_success());
        assert_eq!(ctx.store(), "master");
        assert_eq!(ctx.current_path(), "/");
    }

    #[test]
    fn language_suffix_switches_language() {
        let mut ctx = context();
        assert!(set_context(&mut ctx, "/content/Luna:da").is_success());
        assert_eq!(ctx.current().language, "da");
        // da has no versions for this node
        assert_eq!(ctx.current().version, 0);
    }

    #[test]
    fn negative_version_counts_back_from_latest() {
        let mut ctx = context();
        assert!(set_context(&mut ctx, "/content/Luna").is_success());
        let id = ctx.current().id;
        ctx.repo().add_version("master", id, "en").unwrap();
        ctx.repo().add_version("master", id, "en").unwrap();
        assert!(set_context(&mut ctx, ".::-1").is_success());
        assert_eq!(ctx.current().version, 2);

        let res = set_context(&mut ctx, ".::-5");
        assert!(res.is_failure());
        assert_eq!(res.message, "Version index greater than number of versions.");
        assert_eq!(ctx.current().version, 2);
    }

    #[test]
    fn id_input_bypasses_path_walking() {
        let mut ctx = context();
        assert!(set_context(&mut ctx, "/content/phobos").is_success());
        let id_text = store::format_node_id(&ctx.current().id);
        assert!(set_context(&mut ctx, "/").is_success());
        assert!(set_context(&mut ctx, &id_text).is_success());
        assert_eq!(ctx.current_path(), "/content/phobos");
        assert_eq!(evaluate_path(&ctx, &id_text), id_text);
    }
}
