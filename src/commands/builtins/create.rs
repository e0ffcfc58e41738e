use crate::binder::ParamSpec;
use crate::commands::Command;
use crate::context::{Context, with_temp_context};
use crate::dispatcher::Dispatcher;
use crate::help::HelpDetails;
use crate::result::CommandResult;
use crate::store::format_node_id;

/// `create`: create a child node from a template, or add a version to an
/// existing node with `-v`.
#[derive(Default)]
pub struct CreateNode {
    template: String,
    name: String,
    path: String,
    new_version: bool,
}

static PARAMS: &[ParamSpec<CreateNode>] = &[
    ParamSpec::named("t", 1, "template", "The template path for the new node", |c, v| {
        c.template = v.into_text()
    }),
    ParamSpec::numbered(0, "name", "The name of the new node", |c: &mut CreateNode, v| {
        c.name = v.into_text()
    })
    .required(),
    ParamSpec::numbered(1, "path", "The path of the parent node", |c, v| {
        c.path = v.into_text()
    }),
    ParamSpec::flag("v", "Add a version to the node instead", |c, _| {
        c.new_version = true
    }),
];

impl Command for CreateNode {
    const NAME: &'static str = "create";
    const DESCRIPTION: &'static str = "Creates a node or a version";

    fn params() -> &'static [ParamSpec<Self>] {
        PARAMS
    }

    fn run(&mut self, ctx: &mut Context, _shell: &mut Dispatcher) -> CommandResult {
        if self.new_version {
            // with -v the only positional is the optional path
            let path = if self.path.is_empty() {
                self.name.clone()
            } else {
                self.path.clone()
            };
            return with_temp_context(ctx, &path, |ctx| {
                let node = ctx.current().clone();
                match ctx.repo().add_version(ctx.store(), node.id, &node.language) {
                    Ok(version) => CommandResult::success(format!("Added version {version}")),
                    Err(err) => CommandResult::failure(err.to_string()),
                }
            });
        }

        if self.name.is_empty() {
            return CommandResult::missing_parameter("name");
        }
        if self.template.is_empty() {
            return CommandResult::missing_parameter("template");
        }
        if ctx.repo().template_id(ctx.store(), &self.template).is_none() {
            return CommandResult::failure(format!("Template '{}' not found", self.template));
        }
        let template = self.template.clone();
        let name = self.name.clone();
        with_temp_context(ctx, &self.path, |ctx| {
            let node = ctx.current().clone();
            match ctx
                .repo()
                .create_node(ctx.store(), node.id, &name, &template, &node.language)
            {
                Ok(id) => CommandResult::success(format_node_id(&id)),
                Err(err) => CommandResult::failure(err.to_string()),
            }
        })
    }

    fn extra_help(details: &mut HelpDetails) {
        details.add_example(
            "create -t common/document news2024",
            "Create a child of the current node",
        );
        details.add_example("create -v", "Add a version to the current node");
    }
}
