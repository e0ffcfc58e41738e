pub mod builtins;
pub mod registry;

use crate::binder::{ParamSpec, bind_command};
use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::help::HelpDetails;
use crate::result::CommandResult;

pub use registry::built_in_commands;

/// A shell command. Implementors declare their parameters as a static
/// table; the dispatcher builds a fresh instance per invocation, binds
/// the arguments onto it and calls [`Command::run`].
pub trait Command: Default {
    /// The command name as typed at the prompt.
    const NAME: &'static str;

    const DESCRIPTION: &'static str;

    /// Whether a chained value may be appended to this command's
    /// arguments when the chain separator carries one.
    const ACCEPTS_PIPE: bool = false;

    fn params() -> &'static [ParamSpec<Self>];

    fn run(&mut self, ctx: &mut Context, shell: &mut Dispatcher) -> CommandResult;

    /// Hook for comments and examples beyond the generated sections.
    fn extra_help(details: &mut HelpDetails) {
        let _ = details;
    }
}

/// Type-erased handle to a command, stored in the dispatcher's tables.
#[derive(Clone, Copy)]
pub struct Registration {
    pub name: &'static str,
    pub description: &'static str,
    pub accepts_pipe: bool,
    pub invoke: fn(&mut Context, &mut Dispatcher, &[String]) -> CommandResult,
    pub help: fn() -> HelpDetails,
}

/// Builds the registration for a command type.
pub fn registration<C: Command + 'static>() -> Registration {
    Registration {
        name: C::NAME,
        description: C::DESCRIPTION,
        accepts_pipe: C::ACCEPTS_PIPE,
        invoke: invoke_command::<C>,
        help: command_help::<C>,
    }
}

fn invoke_command<C: Command + 'static>(
    ctx: &mut Context,
    shell: &mut Dispatcher,
    args: &[String],
) -> CommandResult {
    let mut command = C::default();
    if let Err(err) = bind_command(&mut command, C::params(), args) {
        return CommandResult::failure(err.to_string());
    }
    command.run(ctx, shell)
}

fn command_help<C: Command + 'static>() -> HelpDetails {
    let mut details = HelpDetails {
        description: C::DESCRIPTION.to_string(),
        usage: build_usage(C::NAME, C::params()),
        ..HelpDetails::default()
    };
    for spec in C::params() {
        let (display, description) = spec.help_entry();
        details.add_parameter(display, description);
    }
    C::extra_help(&mut details);
    details
}

/// Usage line from a command name and its parameter table.
pub fn build_usage<C>(name: &str, specs: &[ParamSpec<C>]) -> String {
    let mut parts = vec![name.to_string()];
    parts.extend(specs.iter().map(ParamSpec::usage_token));
    parts.join(" ")
}
