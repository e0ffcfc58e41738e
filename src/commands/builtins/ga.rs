use crate::binder::ParamSpec;
use crate::commands::Command;
use crate::context::{Context, with_temp_context};
use crate::dispatcher::Dispatcher;
use crate::format::definition_list;
use crate::help::HelpDetails;
use crate::inspector::{self, ATTRIBUTE_NAMES};
use crate::result::CommandResult;

/// `ga`: read a node attribute, or list them all.
#[derive(Default)]
pub struct GetAttribute {
    attribute: String,
    path: String,
}

static PARAMS: &[ParamSpec<GetAttribute>] = &[
    ParamSpec::named("a", 1, "attribute", "The name of the attribute to get", |c, v| {
        c.attribute = v.into_text()
    }),
    ParamSpec::numbered(0, "path", "The path of the node to inspect", |c, v| {
        c.path = v.into_text()
    }),
];

impl Command for GetAttribute {
    const NAME: &'static str = "ga";
    const DESCRIPTION: &'static str = "Gets an attribute of a node";

    fn params() -> &'static [ParamSpec<Self>] {
        PARAMS
    }

    fn run(&mut self, ctx: &mut Context, _shell: &mut Dispatcher) -> CommandResult {
        let attribute = self.attribute.clone();
        with_temp_context(ctx, &self.path, |ctx| {
            if attribute.is_empty() {
                let pairs: Vec<(String, String)> = ATTRIBUTE_NAMES
                    .iter()
                    .map(|name| {
                        let value = inspector::attribute(ctx, name)
                            .unwrap_or_else(|| "<not defined>".to_string());
                        (name.to_string(), value)
                    })
                    .collect();
                return CommandResult::success(definition_list(&pairs));
            }
            match inspector::attribute(ctx, &attribute) {
                Some(value) => CommandResult::success(value),
                None => CommandResult::failure(format!("Unknown attribute '{attribute}'")),
            }
        })
    }

    fn extra_help(details: &mut HelpDetails) {
        details.comments = format!("Attributes: {}", ATTRIBUTE_NAMES.join(", "));
        details.add_example("ga -a name", "Print the name of the current node");
        details.add_example("ga -a id /content/home", "Print the id of another node");
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
    fn reads_one_attribute() {
        let (mut ctx, mut shell) = session();
        assert!(shell.execute(&mut ctx, "cd /content/home").is_success());
        assert_eq!(shell.execute(&mut ctx, "ga -a name").message, "home");
        assert_eq!(
            shell.execute(&mut ctx, "ga -a path").message,
            "/content/home"
        );
    }

    #[test]
    fn optional_path_inspects_elsewhere() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "ga -a name /content/home/about");
        assert_eq!(res.message, "about");
        assert_eq!(ctx.current_path(), "/");
    }

    #[test]
    fn unknown_attribute_fails() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "ga -a owner");
        assert!(res.is_failure());
        assert_eq!(res.message, "Unknown attribute 'owner'");
    }

    #[test]
    fn no_attribute_lists_them_all() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "ga");
        assert!(res.is_success());
        for name in ATTRIBUTE_NAMES {
            assert!(res.message.contains(name), "missing {name}");
        }
    }
}
