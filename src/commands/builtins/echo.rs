use crate::binder::ParamSpec;
use crate::commands::Command;
use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::help::HelpDetails;
use crate::result::CommandResult;

/// `echo`: hand the input back as the result message. Declares the
/// piped-input capability, so a chained stage without an explicit `$~$`
/// placeholder appends the previous message to its arguments.
#[derive(Default)]
pub struct EchoInput {
    text: Vec<String>,
}

static PARAMS: &[ParamSpec<EchoInput>] = &[ParamSpec::list(
    0,
    "text",
    "The text to echo",
    |c, v| c.text = v.into_items(),
)];

impl Command for EchoInput {
    const NAME: &'static str = "echo";
    const DESCRIPTION: &'static str = "Echoes the input";
    const ACCEPTS_PIPE: bool = true;

    fn params() -> &'static [ParamSpec<Self>] {
        PARAMS
    }

    fn run(&mut self, _ctx: &mut Context, _shell: &mut Dispatcher) -> CommandResult {
        CommandResult::success(self.text.join(" "))
    }

    fn extra_help(details: &mut HelpDetails) {
        details.add_example("echo lorem ipsum", "Print 'lorem ipsum'");
        details.add_example(
            "echo (ga -a name)",
            "Print the literal text 'ga -a name' (a group without a sub-invocation marker)",
        );
    }
}
