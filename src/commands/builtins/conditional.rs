use crate::binder::ParamSpec;
use crate::commands::Command;
use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::expression::evaluate_expression;
use crate::help::HelpDetails;
use crate::result::CommandResult;

/// `if`: evaluate a boolean expression and dispatch the command when it
/// holds. A false expression is a quiet success.
#[derive(Default)]
pub struct IfCondition {
    expression: String,
    command: Vec<String>,
}

static PARAMS: &[ParamSpec<IfCondition>] = &[
    ParamSpec::numbered(0, "expression", "The expression to evaluate", |c: &mut IfCondition, v| {
        c.expression = v.into_text()
    })
    .required(),
    ParamSpec::list(1, "command", "The command to run when the expression is true", |c: &mut IfCondition, v| {
        c.command = v.into_items()
    })
    .required(),
];

impl Command for IfCondition {
    const NAME: &'static str = "if";
    const DESCRIPTION: &'static str = "Runs a command when an expression is true";

    fn params() -> &'static [ParamSpec<Self>] {
        PARAMS
    }

    fn run(&mut self, ctx: &mut Context, shell: &mut Dispatcher) -> CommandResult {
        if self.expression.is_empty() {
            return CommandResult::missing_parameter("expression");
        }
        if self.command.is_empty() {
            return CommandResult::missing_parameter("command");
        }
        match evaluate_expression(ctx, shell, &self.expression) {
            Ok(true) => shell.execute(ctx, &self.command.join(" ")),
            Ok(false) => CommandResult::success(""),
            Err(err) => CommandResult::failure(err.to_string()),
        }
    }

    fn extra_help(details: &mut HelpDetails) {
        details.add_example(
            "if (@@name = home) (echo at home)",
            "Echo when the current node is named home",
        );
        details.add_example(
            "if (isempty @title) (sf title lorem)",
            "Fill the title field when it is empty",
        );
    }
}
