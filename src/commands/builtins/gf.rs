use crate::binder::ParamSpec;
use crate::commands::Command;
use crate::context::{Context, with_temp_context};
use crate::dispatcher::Dispatcher;
use crate::format::definition_list;
use crate::result::CommandResult;

/// `gf`: read a field of a node, or list all its fields.
#[derive(Default)]
pub struct GetFields {
    field: String,
    path: String,
    no_stats: bool,
}

static PARAMS: &[ParamSpec<GetFields>] = &[
    ParamSpec::named("f", 1, "field", "The name of the field to get", |c, v| {
        c.field = v.into_text()
    }),
    ParamSpec::numbered(0, "path", "The path of the node to inspect", |c, v| {
        c.path = v.into_text()
    }),
    ParamSpec::flag("nsv", "Suppress the field count line", |c, _| {
        c.no_stats = true
    }),
];

impl Command for GetFields {
    const NAME: &'static str = "gf";
    const DESCRIPTION: &'static str = "Gets the fields of a node";

    fn params() -> &'static [ParamSpec<Self>] {
        PARAMS
    }

    fn run(&mut self, ctx: &mut Context, _shell: &mut Dispatcher) -> CommandResult {
        let field = self.field.clone();
        let no_stats = self.no_stats;
        with_temp_context(ctx, &self.path, |ctx| {
            let node = ctx.current().clone();
            if !field.is_empty() {
                return match ctx.repo().field(ctx.store(), &node, &field) {
                    Some(value) => CommandResult::success(value),
                    None => CommandResult::failure(format!("Field '{field}' not found")),
                };
            }
            let names = ctx.repo().field_names(ctx.store(), &node);
            let count = names.len();
            let pairs: Vec<(String, String)> = names
                .into_iter()
                .map(|name| {
                    let value = ctx
                        .repo()
                        .field(ctx.store(), &node, &name)
                        .unwrap_or_default();
                    (name, value)
                })
                .collect();
            let mut message = definition_list(&pairs);
            if !no_stats {
                let noun = if count == 1 { "field" } else { "fields" };
                if !message.is_empty() {
                    message.push('\n');
                }
                message.push_str(&format!("{count} {noun}"));
            }
            CommandResult::success(message)
        })
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
    fn reads_one_field() {
        let (mut ctx, mut shell) = session();
        assert!(shell.execute(&mut ctx, "cd /content/home").is_success());
        assert_eq!(shell.execute(&mut ctx, "gf -f title").message, "Home");
    }

    #[test]
    fn missing_field_fails() {
        let (mut ctx, mut shell) = session();
        assert!(shell.execute(&mut ctx, "cd /content/home").is_success());
        let res = shell.execute(&mut ctx, "gf -f subtitle");
        assert!(res.is_failure());
        assert_eq!(res.message, "Field 'subtitle' not found");
    }

    #[test]
    fn lists_fields_with_count() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "gf /content/home");
        assert!(res.is_success());
        assert!(res.message.contains("title"));
        assert!(res.message.ends_with("1 field"));
        let res = shell.execute(&mut ctx, "gf -nsv /content/home");
        assert!(!res.message.contains("1 field"));
    }
}
