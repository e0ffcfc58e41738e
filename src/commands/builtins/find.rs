use regex::{Regex, RegexBuilder};

use crate::binder::ParamSpec;
use crate::commands::Command;
use crate::context::{Context, with_temp_context};
use crate::dispatcher::Dispatcher;
use crate::expression::evaluate_expression;
use crate::help::HelpDetails;
use crate::inspector::{ATTRIBUTE_NAMES, attribute_of};
use crate::result::CommandResult;
use crate::store::{NodeId, NodeRef, Repository, parse_node_id};

const WILDCARD_FIELD: &str = "*";

/// `find`: walk the children (or the whole subtree with `-r`) of a node,
/// filter them, and run a command against every match.
#[derive(Default)]
pub struct FindNodes {
    recursive: bool,
    no_statistics: bool,
    statistics_only: bool,
    ids: String,
    template: String,
    field: Option<(String, String)>,
    attribute: Option<(String, String)>,
    expression: String,
    command: String,
    path: String,
}

static PARAMS: &[ParamSpec<FindNodes>] = &[
    ParamSpec::flag("r", "Search all descendants, not just children", |c, _| {
        c.recursive = true
    }),
    ParamSpec::flag("ns", "Do not show how many nodes were found", |c, _| {
        c.no_statistics = true
    }),
    ParamSpec::flag("so", "Only show the count of matching nodes", |c, _| {
        c.statistics_only = true
    }),
    ParamSpec::named("i", 1, "idlist", "Pipe separated list of node ids to find", |c, v| {
        c.ids = v.into_text()
    }),
    ParamSpec::named("t", 1, "template", "The template to match nodes on", |c, v| {
        c.template = v.into_text()
    }),
    ParamSpec::pair("f", "field value", "Field regex to match nodes on, * for any field", |c, v| {
        c.field = Some(v.into_pair())
    }),
    ParamSpec::pair("a", "attribute value", "Attribute regex to match nodes on", |c, v| {
        c.attribute = Some(v.into_pair())
    }),
    ParamSpec::named("e", 1, "expression", "A comparative expression to evaluate", |c, v| {
        c.expression = v.into_text()
    }),
    ParamSpec::numbered(0, "command", "The command to run against each match; not needed with -so", |c, v| {
        c.command = v.into_text()
    }),
    ParamSpec::numbered(1, "path", "The path of the node to search from", |c, v| {
        c.path = v.into_text()
    }),
];

impl Command for FindNodes {
    const NAME: &'static str = "find";
    const DESCRIPTION: &'static str = "Finds nodes by filter and runs a command against each";

    fn params() -> &'static [ParamSpec<Self>] {
        PARAMS
    }

    fn run(&mut self, ctx: &mut Context, shell: &mut Dispatcher) -> CommandResult {
        if self.command.is_empty() && !self.statistics_only {
            return CommandResult::failure("Required parameter 'command' is missing or -so flag.");
        }
        if !self.command.is_empty() && self.statistics_only {
            return CommandResult::failure("Cannot specify a command when returning statistics only.");
        }
        if let Some((name, _)) = &self.attribute {
            if !ATTRIBUTE_NAMES.contains(&name.to_lowercase().as_str()) {
                return CommandResult::failure(format!("Unknown attribute '{name}'"));
            }
        }
        let field_regex = match build_filter_regex(self.field.as_ref()) {
            Ok(re) => re,
            Err(res) => return res,
        };
        let attribute_regex = match build_filter_regex(self.attribute.as_ref()) {
            Ok(re) => re,
            Err(res) => return res,
        };

        let filters = Filters {
            template: self.template.clone(),
            field: self.field.clone(),
            field_regex,
            attribute: self.attribute.clone(),
            attribute_regex,
            expression: self.expression.clone(),
        };
        let ids = self.ids.clone();
        let command = self.command.clone();
        let recursive = self.recursive;
        let statistics_only = self.statistics_only;
        let no_statistics = self.no_statistics;

        with_temp_context(ctx, &self.path, |ctx| {
            let repo = ctx.repo().clone();
            let store = ctx.store().to_string();

            if !filters.template.is_empty()
                && repo.template_id(&store, &filters.template).is_none()
            {
                return CommandResult::failure(format!(
                    "Template '{}' not found",
                    filters.template
                ));
            }

            let candidates = if ids.is_empty() {
                let mut out = Vec::new();
                collect_candidates(repo.as_ref(), &store, ctx.current().id, recursive, &mut out);
                out
            } else {
                let mut out = Vec::new();
                for text in ids.split('|') {
                    let Some(id) = parse_node_id(text) else {
                        return CommandResult::failure(format!("Failed to parse id '{text}'"));
                    };
                    if repo.node(&store, id).is_none() {
                        return CommandResult::failure(format!(
                            "Failed to find node with id '{text}'"
                        ));
                    }
                    out.push(id);
                }
                out
            };

            let language = ctx.current().language.clone();
            let mut matches = Vec::new();
            for id in candidates {
                let version = repo.version_count(&store, id, &language) as u32;
                let node = NodeRef::new(id, language.clone(), version);
                match filters.include(ctx, shell, &node) {
                    Ok(true) => matches.push(node),
                    Ok(false) => {}
                    Err(res) => return res,
                }
            }

            if statistics_only {
                return CommandResult::success(matches.len().to_string());
            }

            let mut lines = Vec::new();
            for node in &matches {
                ctx.push_context();
                ctx.set_current(node.clone());
                let res = shell.execute(ctx, &command);
                ctx.revert_context();
                lines.push(res.to_string());
            }
            if !no_statistics {
                let noun = if matches.len() == 1 { "node" } else { "nodes" };
                lines.push(String::new());
                lines.push(format!("Found {} {}", matches.len(), noun));
            }
            CommandResult::success(lines.join("\n"))
        })
    }

    fn extra_help(details: &mut HelpDetails) {
        details.comments =
            "The starting node itself is never part of the result set".to_string();
        details.add_example("find -t common/document (gf -f title) /content", "Documents under /content");
        details.add_example("find -r -f title ^Home$ (pwd)", "Nodes whose title is exactly Home");
        details.add_example("find -so -r -e (@@childcount > 0 as number)", "Count branch nodes");
        details.add_example("find -a name ^ab (echo < (ga -a id))", "Ids of children starting with ab");
    }
}

struct Filters {
    template: String,
    field: Option<(String, String)>,
    field_regex: Option<Regex>,
    attribute: Option<(String, String)>,
    attribute_regex: Option<Regex>,
    expression: String,
}

impl Filters {
    /// Applies every configured filter to `node`. An expression that fails
    /// to evaluate surfaces as the command's failure.
    fn include(
        &self,
        ctx: &mut Context,
        shell: &mut Dispatcher,
        node: &NodeRef,
    ) -> Result<bool, CommandResult> {
        let repo = ctx.repo().clone();
        let store = ctx.store().to_string();
        let Some(snapshot) = repo.node(&store, node.id) else {
            return Ok(false);
        };

        if !self.template.is_empty() && !snapshot.template.eq_ignore_ascii_case(&self.template) {
            return Ok(false);
        }

        if let (Some((name, _)), Some(regex)) = (&self.field, &self.field_regex) {
            let hit = if name == WILDCARD_FIELD {
                repo.field_names(&store, node)
                    .iter()
                    .filter_map(|field| repo.field(&store, node, field))
                    .any(|value| regex.is_match(&value))
            } else {
                repo.field(&store, node, name)
                    .is_some_and(|value| regex.is_match(&value))
            };
            if !hit {
                return Ok(false);
            }
        }

        if let (Some((name, _)), Some(regex)) = (&self.attribute, &self.attribute_regex) {
            let hit = attribute_of(repo.as_ref(), &store, node, name)
                .is_some_and(|value| regex.is_match(&value));
            if !hit {
                return Ok(false);
            }
        }

        if !self.expression.is_empty() {
            ctx.push_context();
            ctx.set_current(node.clone());
            let verdict = evaluate_expression(ctx, shell, &self.expression);
            ctx.revert_context();
            match verdict {
                Ok(verdict) => return Ok(verdict),
                Err(err) => return Err(CommandResult::failure(err.to_string())),
            }
        }
        Ok(true)
    }
}

/// Builds the case-insensitive regex for a `key value` filter pair.
fn build_filter_regex(
    pair: Option<&(String, String)>,
) -> Result<Option<Regex>, CommandResult> {
    let Some((_, pattern)) = pair else {
        return Ok(None);
    };
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|_| CommandResult::failure(format!("Invalid regular expression '{pattern}'")))
}

/// Preorder walk. Children always count as candidates; deeper levels only
/// when `recursive` is set. The start node is excluded.
fn collect_candidates(
    repo: &dyn Repository,
    store: &str,
    parent: NodeId,
    recursive: bool,
    out: &mut Vec<NodeId>,
) {
    let Some(snapshot) = repo.node(store, parent) else {
        return;
    };
    for child in snapshot.children {
        out.push(child);
        if recursive {
            collect_candidates(repo, store, child, recursive, out);
        }
    }
}
