use crate::binder::ParamSpec;
use crate::commands::Command;
use crate::context::{Context, with_temp_context};
use crate::dispatcher::Dispatcher;
use crate::help::HelpDetails;
use crate::result::CommandResult;

/// `rep`: run a command a fixed number of times. The reserved variable
/// `num` carries the 1-based iteration while the loop runs.
#[derive(Default)]
pub struct RepeatCommand {
    number: String,
    command: String,
    path: String,
}

static PARAMS: &[ParamSpec<RepeatCommand>] = &[
    ParamSpec::numbered(0, "number", "The number of times to run the command", |c: &mut RepeatCommand, v| {
        c.number = v.into_text()
    })
    .required(),
    ParamSpec::numbered(1, "command", "The command to run, usually a group", |c: &mut RepeatCommand, v| {
        c.command = v.into_text()
    })
    .required(),
    ParamSpec::numbered(2, "path", "The path of the node to run the command against", |c, v| {
        c.path = v.into_text()
    }),
];

impl Command for RepeatCommand {
    const NAME: &'static str = "rep";
    const DESCRIPTION: &'static str = "Repeats a command";

    fn params() -> &'static [ParamSpec<Self>] {
        PARAMS
    }

    fn run(&mut self, ctx: &mut Context, shell: &mut Dispatcher) -> CommandResult {
        if self.number.is_empty() {
            return CommandResult::missing_parameter("number");
        }
        if self.command.is_empty() {
            return CommandResult::missing_parameter("command");
        }
        let count: i64 = match self.number.parse() {
            Ok(count) if count >= 0 => count,
            _ => {
                return CommandResult::failure(
                    "Parameter 'number' must be a positive integer",
                );
            }
        };
        let command = self.command.clone();
        with_temp_context(ctx, &self.path, |ctx| {
            let mut lines = Vec::new();
            for iteration in 1..=count {
                ctx.set_internal_variable("num", &iteration.to_string());
                let res = shell.execute(ctx, &command);
                lines.push(res.to_string());
                ctx.remove_variable("num");
            }
            CommandResult::success(lines.join("\n"))
        })
    }

    fn extra_help(details: &mut HelpDetails) {
        details.comments =
            "On each repetition the $num$ variable holds the 1-based run count".to_string();
        details.add_example("rep 3 (echo pass $num$)", "Print pass 1, pass 2 and pass 3");
        details.add_example(
            "rep 2 (create -t common/document doc$num$) /content/home",
            "Create doc1 and doc2 under /content/home",
        );
    }
}
