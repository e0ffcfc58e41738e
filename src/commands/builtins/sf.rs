use crate::binder::ParamSpec;
use crate::commands::Command;
use crate::context::{Context, with_temp_context};
use crate::dispatcher::Dispatcher;
use crate::help::HelpDetails;
use crate::result::CommandResult;

const PREVIOUS_VALUE_TOKEN: &str = "$prev$";

/// `sf`: set a field on a node. Writes create a new version first unless
/// `-nv` is given; `-r` removes the field instead. The literal token
/// `$prev$` in the value expands to the field's current value.
#[derive(Default)]
pub struct SetField {
    field: String,
    value: String,
    path: String,
    no_new_version: bool,
    reset: bool,
}

static PARAMS: &[ParamSpec<SetField>] = &[
    ParamSpec::numbered(0, "field", "The name of the field to set", |c: &mut SetField, v| {
        c.field = v.into_text()
    })
    .required(),
    ParamSpec::numbered(1, "value", "The value to set the field to", |c, v| {
        c.value = v.into_text()
    }),
    ParamSpec::numbered(2, "path", "The path of the node to change", |c, v| {
        c.path = v.into_text()
    }),
    ParamSpec::flag("nv", "Write into the current version instead of a new one", |c, _| {
        c.no_new_version = true
    }),
    ParamSpec::flag("r", "Reset the field by removing its value", |c, _| c.reset = true),
];

impl Command for SetField {
    const NAME: &'static str = "sf";
    const DESCRIPTION: &'static str = "Sets a field of a node";

    fn params() -> &'static [ParamSpec<Self>] {
        PARAMS
    }

    fn run(&mut self, ctx: &mut Context, _shell: &mut Dispatcher) -> CommandResult {
        if self.field.is_empty() {
            return CommandResult::missing_parameter("field");
        }
        if !self.reset && self.value.is_empty() {
            return CommandResult::missing_parameter("value");
        }
        let field = self.field.clone();
        let value = self.value.clone();
        let reset = self.reset;
        let no_new_version = self.no_new_version;
        with_temp_context(ctx, &self.path, |ctx| {
            let mut node = ctx.current().clone();
            if reset {
                return match ctx.repo().remove_field(ctx.store(), &node, &field) {
                    Ok(()) => CommandResult::success(format!("Field '{field}' reset")),
                    Err(err) => CommandResult::failure(err.to_string()),
                };
            }
            let value = if value.contains(PREVIOUS_VALUE_TOKEN) {
                let previous = ctx
                    .repo()
                    .field(ctx.store(), &node, &field)
                    .unwrap_or_default();
                value.replace(PREVIOUS_VALUE_TOKEN, &previous)
            } else {
                value
            };
            if !no_new_version {
                match ctx.repo().add_version(ctx.store(), node.id, &node.language) {
                    Ok(version) => node.version = version,
                    Err(err) => return CommandResult::failure(err.to_string()),
                }
            }
            match ctx.repo().set_field(ctx.store(), &node, &field, &value) {
                Ok(()) => CommandResult::success(format!("Field '{field}' set")),
                Err(err) => CommandResult::failure(err.to_string()),
            }
        })
    }

    fn extra_help(details: &mut HelpDetails) {
        details.comments = format!(
            "The token {PREVIOUS_VALUE_TOKEN} in the value expands to the field's current value"
        );
        details.add_example("sf title lorem", "Set the title field in a new version");
        details.add_example(
            "sf -nv title ($prev$ ipsum)",
            "Append to the title without creating a version",
        );
        details.add_example("sf -r title", "Remove the title field's value");
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
    fn set_creates_a_new_version_by_default() {
        let (mut ctx, mut shell) = session();
        assert!(shell.execute(&mut ctx, "cd /content/home").is_success());
        let res = shell.execute(&mut ctx, "sf title Lorem");
        assert!(res.is_success(), "{res}");
        // the write landed in version 2; the context still views version 1
        assert_eq!(shell.execute(&mut ctx, "gf -f title").message, "Home");
        assert!(shell.execute(&mut ctx, "cv -l").is_success());
        assert_eq!(shell.execute(&mut ctx, "gf -f title").message, "Lorem");
    }

    #[test]
    fn nv_writes_into_the_current_version() {
        let (mut ctx, mut shell) = session();
        assert!(shell.execute(&mut ctx, "cd /content/home").is_success());
        assert!(shell.execute(&mut ctx, "sf -nv title Lorem").is_success());
        assert_eq!(shell.execute(&mut ctx, "gf -f title").message, "Lorem");
        assert_eq!(shell.execute(&mut ctx, "pwv").message, "1");
    }

    #[test]
    fn prev_token_expands_to_the_old_value() {
        let (mut ctx, mut shell) = session();
        assert!(shell.execute(&mut ctx, "cd /content/home").is_success());
        let res = shell.execute(&mut ctx, "sf -nv title ($prev$ sweet $prev$)");
        assert!(res.is_success(), "{res}");
        assert_eq!(
            shell.execute(&mut ctx, "gf -f title").message,
            "Home sweet Home"
        );
    }

    #[test]
    fn reset_removes_the_field() {
        let (mut ctx, mut shell) = session();
        assert!(shell.execute(&mut ctx, "cd /content/home").is_success());
        let res = shell.execute(&mut ctx, "sf -r title");
        assert!(res.is_success(), "{res}");
        assert!(shell.execute(&mut ctx, "gf -f title").is_failure());
    }

    #[test]
    fn field_name_is_required() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "sf");
        assert!(res.is_failure());
        assert_eq!(res.message, "Required parameter 'field' is missing");
    }
}
