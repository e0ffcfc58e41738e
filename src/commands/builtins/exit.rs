use crate::binder::ParamSpec;
use crate::commands::Command;
use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::result::CommandResult;

/// `exit`: end the session with an `Abort` result. Inside a script the
/// abort stops the script without ending the enclosing session.
#[derive(Default)]
pub struct ExitShell {
    message: Vec<String>,
}

static PARAMS: &[ParamSpec<ExitShell>] = &[ParamSpec::list(
    0,
    "message",
    "An optional parting message",
    |c, v| c.message = v.into_items(),
)];

impl Command for ExitShell {
    const NAME: &'static str = "exit";
    const DESCRIPTION: &'static str = "Ends the shell session";

    fn params() -> &'static [ParamSpec<Self>] {
        PARAMS
    }

    fn run(&mut self, _ctx: &mut Context, _shell: &mut Dispatcher) -> CommandResult {
        CommandResult::abort(self.message.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::script::NullScriptLocator;
    use crate::store::memory::sample_repository;

    #[test]
    fn exit_aborts_with_its_message() {
        let mut ctx = Context::new(Arc::new(sample_repository()), "master").unwrap();
        let mut shell = Dispatcher::new(Box::new(NullScriptLocator));
        let res = shell.execute(&mut ctx, "exit goodbye");
        assert!(res.is_abort());
        assert_eq!(res.message, "goodbye");
    }
}
