use crate::binder::ParamSpec;
use crate::commands::Command;
use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::result::CommandResult;

/// `pwd`: print the current node's path.
#[derive(Default)]
pub struct PrintPath;

static PARAMS: &[ParamSpec<PrintPath>] = &[];

impl Command for PrintPath {
    const NAME: &'static str = "pwd";
    const DESCRIPTION: &'static str = "Prints the path of the current node";

    fn params() -> &'static [ParamSpec<Self>] {
        PARAMS
    }

    fn run(&mut self, ctx: &mut Context, _shell: &mut Dispatcher) -> CommandResult {
        CommandResult::success(ctx.current_path())
    }
}
