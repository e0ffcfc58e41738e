use crate::binder::ParamSpec;
use crate::commands::Command;
use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::help::HelpDetails;
use crate::path;
use crate::result::CommandResult;

/// `cd`: relocate the current node. Keeps `prevpath` pointing at the
/// location we came from, and falls back to a unique child-name prefix
/// match when the literal path does not resolve.
#[derive(Default)]
pub struct ChangeNode {
    path: String,
}

static PARAMS: &[ParamSpec<ChangeNode>] = &[ParamSpec::numbered(
    0,
    "path",
    "The path to change the current node to",
    |c: &mut ChangeNode, v| c.path = v.into_text(),
)
.required()];

impl Command for ChangeNode {
    const NAME: &'static str = "cd";
    const DESCRIPTION: &'static str = "Changes the current node";

    fn params() -> &'static [ParamSpec<Self>] {
        PARAMS
    }

    fn run(&mut self, ctx: &mut Context, _shell: &mut Dispatcher) -> CommandResult {
        if self.path.is_empty() {
            return CommandResult::missing_parameter("path");
        }
        let origin = ctx.current_path();
        let res = path::set_context(ctx, &self.path);
        if res.is_success() {
            ctx.set_internal_variable("prevpath", &origin);
            return res;
        }
        match self.prefix_fallback(ctx) {
            Some(name) => {
                let fallback = path::set_context(ctx, &name);
                if fallback.is_success() {
                    ctx.set_internal_variable("prevpath", &origin);
                    fallback
                } else {
                    res
                }
            }
            None => res,
        }
    }

    fn extra_help(details: &mut HelpDetails) {
        details.add_example("cd /content/home", "Change to the node at an absolute path");
        details.add_example("cd ..", "Change to the parent node");
        details.add_example("cd home:da:2", "Change node, language and version at once");
    }
}

impl ChangeNode {
    /// A path with no structure that uniquely prefixes one child name
    /// relocates to that child.
    fn prefix_fallback(&self, ctx: &Context) -> Option<String> {
        if self.path.contains('/') || self.path.contains(':') || self.path.contains('[') {
            return None;
        }
        let snapshot = ctx.current_snapshot()?;
        let wanted = self.path.to_lowercase();
        let mut matches = snapshot.children.iter().filter_map(|id| {
            let child = ctx.repo().node(ctx.store(), *id)?;
            child
                .name
                .to_lowercase()
                .starts_with(&wanted)
                .then_some(child.name)
        });
        let first = matches.next()?;
        matches.next().is_none().then_some(first)
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
    fn cd_sets_prevpath() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "cd /content/home");
        assert!(res.is_success(), "{res}");
        assert_eq!(ctx.current_path(), "/content/home");
        assert_eq!(ctx.variable("prevpath"), Some("/"));
    }

    #[test]
    fn unique_prefix_resolves_to_a_child() {
        let (mut ctx, mut shell) = session();
        assert!(shell.execute(&mut ctx, "cd /content/home").is_success());
        assert!(shell.execute(&mut ctx, "cd ab").is_success());
        assert_eq!(ctx.current_path(), "/content/home/about");
    }

    #[test]
    fn unresolvable_path_reports_the_original_failure() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "cd nowhere");
        assert!(res.is_failure());
        assert_eq!(res.message, "Path '/nowhere' not found");
        assert_eq!(ctx.current_path(), "/");
    }
}
