use regex::RegexBuilder;

use crate::binder::ParamSpec;
use crate::commands::Command;
use crate::context::{Context, with_temp_context};
use crate::dispatcher::Dispatcher;
use crate::help::HelpDetails;
use crate::result::CommandResult;

/// `ls`: list the children of a node. Children that themselves have
/// children are marked with a leading `+`.
#[derive(Default)]
pub struct ListChildren {
    path: String,
    pattern: String,
    case_sensitive: bool,
    alphabetical: bool,
    descending: bool,
}

static PARAMS: &[ParamSpec<ListChildren>] = &[
    ParamSpec::numbered(0, "path", "The path of the node to list", |c, v| {
        c.path = v.into_text()
    }),
    ParamSpec::named("r", 1, "regex", "Only list names matching the regex", |c, v| {
        c.pattern = v.into_text()
    }),
    ParamSpec::flag("c", "Match the regex case-sensitively", |c, _| {
        c.case_sensitive = true
    }),
    ParamSpec::flag("a", "Sort alphabetically", |c, _| c.alphabetical = true),
    ParamSpec::flag("d", "Sort in descending order", |c, _| c.descending = true),
];

impl Command for ListChildren {
    const NAME: &'static str = "ls";
    const DESCRIPTION: &'static str = "Lists the children of a node";

    fn params() -> &'static [ParamSpec<Self>] {
        PARAMS
    }

    fn run(&mut self, ctx: &mut Context, _shell: &mut Dispatcher) -> CommandResult {
        let pattern = self.pattern.clone();
        let case_sensitive = self.case_sensitive;
        let alphabetical = self.alphabetical;
        let descending = self.descending;
        with_temp_context(ctx, &self.path, |ctx| {
            let Some(snapshot) = ctx.current_snapshot() else {
                return CommandResult::failure("The current node no longer exists");
            };
            let matcher = if pattern.is_empty() {
                None
            } else {
                match RegexBuilder::new(&pattern)
                    .case_insensitive(!case_sensitive)
                    .build()
                {
                    Ok(re) => Some(re),
                    Err(_) => {
                        return CommandResult::failure(format!(
                            "Invalid regular expression '{pattern}'"
                        ));
                    }
                }
            };

            let mut entries: Vec<(String, bool)> = snapshot
                .children
                .iter()
                .filter_map(|id| ctx.repo().node(ctx.store(), *id))
                .filter(|child| {
                    matcher
                        .as_ref()
                        .is_none_or(|re| re.is_match(&child.name))
                })
                .map(|child| (child.name, !child.children.is_empty()))
                .collect();
            if alphabetical {
                entries.sort_by_key(|(name, _)| name.to_lowercase());
            }
            if descending {
                entries.reverse();
            }
            if entries.is_empty() {
                return CommandResult::success("zero nodes found");
            }
            let lines: Vec<String> = entries
                .into_iter()
                .map(|(name, branch)| {
                    let marker = if branch { "+ " } else { "  " };
                    format!("{marker}{name}")
                })
                .collect();
            CommandResult::success(lines.join("\n"))
        })
    }

    fn extra_help(details: &mut HelpDetails) {
        details.comments =
            "Children with children of their own are marked with a leading +".to_string();
        details.add_example("ls", "List the children of the current node");
        details.add_example("ls -r ^ab -a", "List children starting with 'ab', sorted");
    }
}
