use crate::binder::ParamSpec;
use crate::commands::Command;
use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::format::definition_list;
use crate::help::HelpDetails;
use crate::result::CommandResult;

/// `bind`: manage custom bindings, runtime names for entries of the
/// built-in catalog.
#[derive(Default)]
pub struct ManageBindings {
    factory: String,
    name: String,
    remove: bool,
}

static PARAMS: &[ParamSpec<ManageBindings>] = &[
    ParamSpec::numbered(0, "factory", "The catalog name of the command to bind", |c, v| {
        c.factory = v.into_text()
    }),
    ParamSpec::numbered(1, "name", "The name to bind it to", |c, v| {
        c.name = v.into_text()
    }),
    ParamSpec::flag("r", "Remove the binding named by 'factory'", |c, _| {
        c.remove = true
    }),
];

impl Command for ManageBindings {
    const NAME: &'static str = "bind";
    const DESCRIPTION: &'static str = "Manages custom command bindings";

    fn params() -> &'static [ParamSpec<Self>] {
        PARAMS
    }

    fn run(&mut self, _ctx: &mut Context, shell: &mut Dispatcher) -> CommandResult {
        if self.remove {
            if self.factory.is_empty() {
                return CommandResult::missing_parameter("name");
            }
            return shell.unbind_custom(&self.factory);
        }
        if self.factory.is_empty() {
            let pairs: Vec<(String, String)> = shell
                .custom_bindings()
                .iter()
                .map(|(name, reg)| (name.clone(), reg.name.to_string()))
                .collect();
            return CommandResult::success(definition_list(&pairs));
        }
        if self.name.is_empty() {
            return CommandResult::missing_parameter("name");
        }
        shell.bind_custom(&self.factory, &self.name)
    }

    fn extra_help(details: &mut HelpDetails) {
        details.add_example("bind ls dir", "Make 'dir' run the ls command");
        details.add_example("bind -r dir", "Remove the 'dir' binding");
        details.add_example("bind", "List all custom bindings");
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
    fn binding_lifecycle() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "bind pwd where");
        assert_eq!(res.message, "Binding 'where' added");
        assert_eq!(shell.execute(&mut ctx, "where").message, "/");
        assert_eq!(shell.execute(&mut ctx, "bind").message, "where  pwd");

        let res = shell.execute(&mut ctx, "bind -r where");
        assert_eq!(res.message, "Binding 'where' removed");
        assert!(shell.execute(&mut ctx, "where").is_failure());

        let res = shell.execute(&mut ctx, "bind -r where");
        assert!(res.is_failure());
        assert_eq!(res.message, "Binding 'where' not found");
    }

    #[test]
    fn unknown_factory_name_fails() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "bind nosuch other");
        assert!(res.is_failure());
        assert_eq!(res.message, "Name 'nosuch' not found in registry");
    }

    #[test]
    fn command_names_cannot_be_rebound() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "bind pwd echo");
        assert!(res.is_failure());
        assert_eq!(
            res.message,
            "Cannot add binding 'echo' with the same name as an existing command"
        );
    }
}
