use crate::binder::ParamSpec;
use crate::commands::Command;
use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::format::definition_list;
use crate::help::HelpDetails;
use crate::result::CommandResult;

const PREVIOUS_VALUE_TOKEN: &str = "$prev$";

/// `set`: manage environment variables. With no arguments the variables
/// are enumerated; with only a name the variable is cleared.
#[derive(Default)]
pub struct SetVariable {
    name: String,
    value: Vec<String>,
}

static PARAMS: &[ParamSpec<SetVariable>] = &[
    ParamSpec::numbered(0, "name", "The name of the variable", |c, v| {
        c.name = v.into_text()
    }),
    ParamSpec::list(1, "value", "The value to assign", |c, v| {
        c.value = v.into_items()
    }),
];

impl Command for SetVariable {
    const NAME: &'static str = "set";
    const DESCRIPTION: &'static str = "Sets or clears an environment variable";

    fn params() -> &'static [ParamSpec<Self>] {
        PARAMS
    }

    fn run(&mut self, ctx: &mut Context, _shell: &mut Dispatcher) -> CommandResult {
        if self.name.is_empty() {
            let pairs: Vec<(String, String)> = ctx
                .env()
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect();
            return CommandResult::success(definition_list(&pairs));
        }
        if self.value.is_empty() {
            ctx.remove_variable(&self.name);
            return CommandResult::success("");
        }
        let value = self.value.join(" ");
        let value = if value.contains(PREVIOUS_VALUE_TOKEN) {
            let previous = ctx.variable(&self.name).unwrap_or_default().to_string();
            value.replace(PREVIOUS_VALUE_TOKEN, &previous)
        } else {
            value
        };
        match ctx.set_variable(&self.name, &value) {
            Ok(()) => CommandResult::success(""),
            Err(err) => CommandResult::failure(err.to_string()),
        }
    }

    fn extra_help(details: &mut HelpDetails) {
        details.comments = format!(
            "The token {PREVIOUS_VALUE_TOKEN} in the value expands to the variable's current value"
        );
        details.add_example("set greeting lorem ipsum", "Assign 'lorem ipsum' to greeting");
        details.add_example("set greeting", "Clear greeting");
        details.add_example("set", "List all variables");
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
    fn sets_and_interpolates() {
        let (mut ctx, mut shell) = session();
        assert!(shell.execute(&mut ctx, "set greeting lorem").is_success());
        assert_eq!(ctx.variable("greeting"), Some("lorem"));
        assert_eq!(shell.execute(&mut ctx, "echo $greeting$").message, "lorem");
    }

    #[test]
    fn clears_when_no_value_given() {
        let (mut ctx, mut shell) = session();
        assert!(shell.execute(&mut ctx, "set greeting lorem").is_success());
        assert!(shell.execute(&mut ctx, "set greeting").is_success());
        assert_eq!(ctx.variable("greeting"), None);
        assert_eq!(shell.execute(&mut ctx, "echo $greeting$").message, "$greeting$");
    }

    #[test]
    fn prev_token_expands_to_the_old_value() {
        let (mut ctx, mut shell) = session();
        assert!(shell.execute(&mut ctx, "set greeting lorem").is_success());
        assert!(shell.execute(&mut ctx, "set greeting ($prev$ ipsum)").is_success());
        assert_eq!(ctx.variable("greeting"), Some("lorem ipsum"));
    }

    #[test]
    fn reserved_names_are_refused() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "set num 4");
        assert!(res.is_failure());
        assert_eq!(res.message, "Variable name 'num' is reserved");
    }

    #[test]
    fn enumeration_lists_variables() {
        let (mut ctx, mut shell) = session();
        assert!(shell.execute(&mut ctx, "set greeting lorem").is_success());
        let res = shell.execute(&mut ctx, "set");
        assert!(res.message.contains("greeting"));
        assert!(res.message.contains("prompt"));
    }
}
