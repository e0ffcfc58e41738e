use crate::binder::ParamSpec;
use crate::commands::Command;
use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::format::definition_list;
use crate::help::HelpDetails;
use crate::path;
use crate::result::CommandResult;
use crate::store::NodeRef;

/// `cv`: change the version of the current node. A negative number
/// counts back from the latest; `-l` jumps straight to the latest.
#[derive(Default)]
pub struct ChangeVersion {
    version: String,
    latest: bool,
}

static CV_PARAMS: &[ParamSpec<ChangeVersion>] = &[
    ParamSpec::numbered(0, "version", "The version number to change to", |c, v| {
        c.version = v.into_text()
    }),
    ParamSpec::flag("l", "Change to the latest version", |c, _| c.latest = true),
];

impl Command for ChangeVersion {
    const NAME: &'static str = "cv";
    const DESCRIPTION: &'static str = "Changes the version of the current node";

    fn params() -> &'static [ParamSpec<Self>] {
        CV_PARAMS
    }

    fn run(&mut self, ctx: &mut Context, _shell: &mut Dispatcher) -> CommandResult {
        if !self.latest && self.version.is_empty() {
            return CommandResult::failure("Either '-l' or 'version' is required");
        }
        let current = ctx.current().clone();
        let count = ctx
            .repo()
            .version_count(ctx.store(), current.id, &current.language);
        let target = if self.latest {
            count as u32
        } else {
            match path::resolve_version(&self.version, count) {
                Ok(v) => v,
                Err(failure) => return failure,
            }
        };
        ctx.set_current(NodeRef::new(current.id, current.language, target));
        CommandResult::success(format!("Version {target}"))
    }

    fn extra_help(details: &mut HelpDetails) {
        details.comments =
            "A version must be escaped to be negative, e.g. cv \\-1 for the version before the latest"
                .to_string();
        details.add_example("cv 2", "Change to version 2");
        details.add_example("cv -l", "Change to the latest version");
    }
}

/// `pwv`: print the version of the current node.
#[derive(Default)]
pub struct PrintVersion;

static PWV_PARAMS: &[ParamSpec<PrintVersion>] = &[];

impl Command for PrintVersion {
    const NAME: &'static str = "pwv";
    const DESCRIPTION: &'static str = "Prints the version of the current node";

    fn params() -> &'static [ParamSpec<Self>] {
        PWV_PARAMS
    }

    fn run(&mut self, ctx: &mut Context, _shell: &mut Dispatcher) -> CommandResult {
        CommandResult::success(ctx.current().version.to_string())
    }
}

/// `lsv`: list the versions of the current node, either for one language
/// or per language.
#[derive(Default)]
pub struct ListVersions {
    language: String,
}

static LSV_PARAMS: &[ParamSpec<ListVersions>] = &[ParamSpec::numbered(
    0,
    "language",
    "Only list versions in this language",
    |c, v| c.language = v.into_text(),
)];

impl Command for ListVersions {
    const NAME: &'static str = "lsv";
    const DESCRIPTION: &'static str = "Lists the versions of the current node";

    fn params() -> &'static [ParamSpec<Self>] {
        LSV_PARAMS
    }

    fn run(&mut self, ctx: &mut Context, _shell: &mut Dispatcher) -> CommandResult {
        let id = ctx.current().id;
        if !self.language.is_empty() {
            let count = ctx.repo().version_count(ctx.store(), id, &self.language);
            let numbers: Vec<String> = (1..=count).map(|n| n.to_string()).collect();
            return CommandResult::success(numbers.join(" "));
        }
        let pairs: Vec<(String, String)> = ctx
            .repo()
            .languages(ctx.store())
            .into_iter()
            .map(|language| {
                let count = ctx.repo().version_count(ctx.store(), id, &language);
                let noun = if count == 1 { "version" } else { "versions" };
                (language, format!("{count} {noun}"))
            })
            .collect();
        CommandResult::success(definition_list(&pairs))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::script::NullScriptLocator;
    use crate::store::Repository;
    use crate::store::memory::sample_repository;

    fn session() -> (Context, Dispatcher) {
        let repo = sample_repository();
        let home = {
            let root = repo.root("master").unwrap();
            let content = repo.children_named("master", root, "content")[0];
            repo.children_named("master", content, "home")[0]
        };
        repo.add_version("master", home, "en").unwrap();
        repo.add_version("master", home, "en").unwrap();
        let ctx = Context::new(Arc::new(repo), "master").unwrap();
        (ctx, Dispatcher::new(Box::new(NullScriptLocator)))
    }

    #[test]
    fn needs_a_version_or_the_latest_flag() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "cv");
        assert!(res.is_failure());
        assert_eq!(res.message, "Either '-l' or 'version' is required");
    }

    #[test]
    fn changes_to_a_numbered_version() {
        let (mut ctx, mut shell) = session();
        assert!(shell.execute(&mut ctx, "cd /content/home").is_success());
        let res = shell.execute(&mut ctx, "cv 2");
        assert!(res.is_success());
        assert_eq!(res.message, "Version 2");
        assert_eq!(shell.execute(&mut ctx, "pwv").message, "2");
    }

    #[test]
    fn escaped_negative_version_counts_back() {
        let (mut ctx, mut shell) = session();
        assert!(shell.execute(&mut ctx, "cd /content/home").is_success());
        let res = shell.execute(&mut ctx, r"cv \-1");
        assert!(res.is_success(), "{res}");
        assert_eq!(res.message, "Version 2");
    }

    #[test]
    fn out_of_range_version_fails() {
        let (mut ctx, mut shell) = session();
        assert!(shell.execute(&mut ctx, "cd /content/home").is_success());
        let res = shell.execute(&mut ctx, "cv 9");
        assert!(res.is_failure());
        assert_eq!(res.message, "Version index greater than number of versions.");
    }

    #[test]
    fn latest_flag_returns_to_the_newest_version() {
        let (mut ctx, mut shell) = session();
        assert!(shell.execute(&mut ctx, "cd /content/home").is_success());
        assert!(shell.execute(&mut ctx, "cv 1").is_success());
        let res = shell.execute(&mut ctx, "cv -l");
        assert_eq!(res.message, "Version 3");
    }

    #[test]
    fn lists_versions_per_language_and_for_one() {
        let (mut ctx, mut shell) = session();
        assert!(shell.execute(&mut ctx, "cd /content/home").is_success());
        assert_eq!(shell.execute(&mut ctx, "lsv en").message, "1 2 3");
        let res = shell.execute(&mut ctx, "lsv");
        assert_eq!(res.message, "en  3 versions\nda  0 versions");
    }
}
