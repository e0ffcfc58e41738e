use crate::binder::ParamSpec;
use crate::commands::Command;
use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::format::join_lines;
use crate::help::HelpDetails;
use crate::result::CommandResult;

/// `lss`: list the script names the locator knows.
#[derive(Default)]
pub struct ListScripts {
    filter: String,
}

static PARAMS: &[ParamSpec<ListScripts>] = &[ParamSpec::named(
    "f",
    1,
    "filter",
    "Only list scripts whose name contains the filter",
    |c, v| c.filter = v.into_text(),
)];

impl Command for ListScripts {
    const NAME: &'static str = "lss";
    const DESCRIPTION: &'static str = "List all script names";

    fn params() -> &'static [ParamSpec<Self>] {
        PARAMS
    }

    fn run(&mut self, _ctx: &mut Context, shell: &mut Dispatcher) -> CommandResult {
        let names = match shell.scripts().get_script_names() {
            Ok(names) => names,
            Err(err) => return CommandResult::failure(err.to_string()),
        };
        let filter = self.filter.to_lowercase();
        let names: Vec<String> = names
            .into_iter()
            .filter(|name| filter.is_empty() || name.to_lowercase().contains(&filter))
            .collect();
        if names.is_empty() {
            return CommandResult::success("zero scripts found");
        }
        CommandResult::success(join_lines(&names))
    }

    fn extra_help(details: &mut HelpDetails) {
        details.add_example("lss", "List every script");
        details.add_example("lss -f news", "List scripts with 'news' in the name");
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use super::*;
    use crate::script::{FileScriptLocator, NullScriptLocator};
    use crate::store::memory::sample_repository;

    fn session_with_scripts(dir: &std::path::Path) -> (Context, Dispatcher) {
        let ctx = Context::new(Arc::new(sample_repository()), "master").unwrap();
        (ctx, Dispatcher::new(Box::new(FileScriptLocator::new(dir))))
    }

    #[test]
    fn lists_every_script_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("rebuild.tsh"), "echo x\n").unwrap();
        fs::write(dir.path().join("greet.tsh"), "echo y\n").unwrap();
        let (mut ctx, mut shell) = session_with_scripts(dir.path());
        let res = shell.execute(&mut ctx, "lss");
        assert!(res.is_success());
        assert_eq!(res.message, "greet\nrebuild");
    }

    #[test]
    fn filter_matches_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("RebuildNews.tsh"), "echo x\n").unwrap();
        fs::write(dir.path().join("greet.tsh"), "echo y\n").unwrap();
        let (mut ctx, mut shell) = session_with_scripts(dir.path());
        let res = shell.execute(&mut ctx, "lss -f news");
        assert_eq!(res.message, "RebuildNews");
    }

    #[test]
    fn empty_locator_reports_zero() {
        let mut ctx = Context::new(Arc::new(sample_repository()), "master").unwrap();
        let mut shell = Dispatcher::new(Box::new(NullScriptLocator));
        let res = shell.execute(&mut ctx, "lss");
        assert!(res.is_success());
        assert_eq!(res.message, "zero scripts found");
    }
}
