use regex::RegexBuilder;

use crate::binder::ParamSpec;
use crate::commands::Command;
use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::help::HelpDetails;
use crate::result::CommandResult;

/// `replace`: regular-expression replacement over string input. Matching
/// ignores case unless `-c` is given.
#[derive(Default)]
pub struct ReplaceText {
    input: String,
    pattern: String,
    replacement: Option<String>,
    case_sensitive: bool,
}

static PARAMS: &[ParamSpec<ReplaceText>] = &[
    ParamSpec::numbered(0, "input", "The string to perform replacement on", |c: &mut ReplaceText, v| {
        c.input = v.into_text()
    })
    .required(),
    ParamSpec::numbered(1, "match", "Regular expression matching the text to replace", |c: &mut ReplaceText, v| {
        c.pattern = v.into_text()
    })
    .required(),
    ParamSpec::numbered(2, "replacement", "Replacement text, may be empty", |c: &mut ReplaceText, v| {
        c.replacement = Some(v.into_text())
    })
    .required(),
    ParamSpec::flag("c", "Match case-sensitively", |c, _| c.case_sensitive = true),
];

impl Command for ReplaceText {
    const NAME: &'static str = "replace";
    const DESCRIPTION: &'static str = "Replaces text in string input using regular expressions";

    fn params() -> &'static [ParamSpec<Self>] {
        PARAMS
    }

    fn run(&mut self, _ctx: &mut Context, _shell: &mut Dispatcher) -> CommandResult {
        if self.input.is_empty() {
            return CommandResult::missing_parameter("input");
        }
        if self.pattern.is_empty() {
            return CommandResult::missing_parameter("match");
        }
        let Some(replacement) = self.replacement.as_deref() else {
            return CommandResult::missing_parameter("replacement");
        };
        let regex = match RegexBuilder::new(&self.pattern)
            .case_insensitive(!self.case_sensitive)
            .build()
        {
            Ok(re) => re,
            Err(_) => {
                return CommandResult::failure(format!(
                    "Invalid regular expression '{}'",
                    self.pattern
                ));
            }
        };
        CommandResult::success(regex.replace_all(&self.input, replacement).into_owned())
    }

    fn extra_help(details: &mut HelpDetails) {
        details.add_example("replace (this is input) \\s -", "Replace whitespace with dashes");
        details.add_example(
            "replace < (ga -a name) B c -c",
            "Replace capital B in the current node's name",
        );
        details.add_example("replace banana na ()", "Delete every 'na'");
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
    fn case_sensitive_replaces_only_exact_case() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "replace Bebhionn B c -c");
        assert!(res.is_success(), "{res}");
        assert_eq!(res.message, "cebhionn");
    }

    #[test]
    fn default_matching_ignores_case() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "replace Bebhionn B c");
        assert_eq!(res.message, "cechionn");
    }

    #[test]
    fn empty_group_deletes_matches() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "replace banana na ()");
        assert_eq!(res.message, "ba");
    }

    #[test]
    fn missing_replacement_is_reported() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "replace banana na");
        assert!(res.is_failure());
        assert_eq!(res.message, "Required parameter 'replacement' is missing");
    }

    #[test]
    fn bad_pattern_is_reported() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "replace abc [ x");
        assert!(res.is_failure());
        assert_eq!(res.message, "Invalid regular expression '['");
    }
}
