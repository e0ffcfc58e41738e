use crate::binder::ParamSpec;
use crate::commands::Command;
use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::path;
use crate::result::CommandResult;
use crate::store::NodeRef;

/// `rm`: delete a node and its subtree. When the node under the context
/// goes with it, the context moves to the nearest surviving ancestor.
#[derive(Default)]
pub struct DeleteNode {
    path: String,
}

static PARAMS: &[ParamSpec<DeleteNode>] = &[ParamSpec::numbered(
    0,
    "path",
    "The path of the node to delete; defaults to the current node",
    |c, v| c.path = v.into_text(),
)];

impl Command for DeleteNode {
    const NAME: &'static str = "rm";
    const DESCRIPTION: &'static str = "Deletes a node and its descendants";

    fn params() -> &'static [ParamSpec<Self>] {
        PARAMS
    }

    fn run(&mut self, ctx: &mut Context, _shell: &mut Dispatcher) -> CommandResult {
        let saved_store = ctx.store().to_string();
        let saved = ctx.current().clone();

        let target = if self.path.is_empty() {
            saved.id
        } else {
            let moved = path::set_context(ctx, &self.path);
            if !moved.is_success() {
                return moved;
            }
            let target = ctx.current().id;
            ctx.set_location(saved_store.clone(), saved.clone());
            target
        };

        let Some(snapshot) = ctx.repo().node(ctx.store(), target) else {
            return CommandResult::failure(format!("Path '{}' not found", self.path));
        };
        let parent = snapshot.parent;

        let count = match ctx.repo().delete_node(ctx.store(), target) {
            Ok(count) => count,
            Err(err) => return CommandResult::failure(err.to_string()),
        };

        // the deletion may have taken the node the context stands on
        if ctx.repo().node(ctx.store(), saved.id).is_none() {
            if let Some(parent) = parent {
                let version =
                    ctx.repo()
                        .version_count(ctx.store(), parent, &saved.language) as u32;
                ctx.set_current(NodeRef::new(parent, saved.language.clone(), version));
            }
        }

        let noun = if count == 1 { "node" } else { "nodes" };
        CommandResult::success(format!("Deleted {count} {noun}"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::script::NullScriptLocator;
    use crate::store::memory::sample_repository;

    fn session() -> (Context, Dispatcher) {
        let ctx = Context::new(Arc::new(sample_repository()), "master").unwrap();
        (ctx, Dispatcher::new(Box::new(NullScriptLocator)))
    }

    #[test]
    fn deletes_a_subtree_by_path() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "rm /content/home");
        assert!(res.is_success(), "{res}");
        assert_eq!(res.message, "Deleted 3 nodes");
        assert!(shell.execute(&mut ctx, "cd /content/home").is_failure());
        assert_eq!(ctx.current_path(), "/");
    }

    #[test]
    fn deleting_the_current_node_moves_to_its_parent() {
        let (mut ctx, mut shell) = session();
        assert!(shell.execute(&mut ctx, "cd /content/home/about").is_success());
        let res = shell.execute(&mut ctx, "rm");
        assert_eq!(res.message, "Deleted 1 node");
        assert_eq!(ctx.current_path(), "/content/home");
    }

    #[test]
    fn the_root_is_protected() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "rm /");
        assert!(res.is_failure());
        assert_eq!(res.message, "Cannot delete the root node");
    }
}
