use std::fmt;

use crate::errors::ShellError;

/// Outcome category of a dispatched command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failure,
    /// The command requested shell termination (`exit`). Scripts swallow
    /// this and stop early; the REPL loop honors it.
    Abort,
}

/// What a command hands back to the dispatcher: a status and a message.
/// Commands never panic or raise for domain failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: String,
}

impl CommandResult {
    pub fn new(status: CommandStatus, message: impl Into<String>) -> Self {
        CommandResult {
            status,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(CommandStatus::Success, message)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(CommandStatus::Failure, message)
    }

    pub fn abort(message: impl Into<String>) -> Self {
        Self::new(CommandStatus::Abort, message)
    }

    /// Standard failure for a required parameter the caller left out.
    /// Required-ness is advisory metadata, so commands check it themselves.
    pub fn missing_parameter(name: &str) -> Self {
        Self::failure(format!("Required parameter '{name}' is missing"))
    }

    pub fn is_success(&self) -> bool {
        self.status == CommandStatus::Success
    }

    pub fn is_failure(&self) -> bool {
        self.status == CommandStatus::Failure
    }

    pub fn is_abort(&self) -> bool {
        self.status == CommandStatus::Abort
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.status == CommandStatus::Failure {
            write!(f, "FAIL: {}", self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl From<ShellError> for CommandResult {
    fn from(err: ShellError) -> Self {
        CommandResult::failure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_display_carries_prefix() {
        let res = CommandResult::failure("no such node");
        assert_eq!(res.to_string(), "FAIL: no such node");
    }

    #[test]
    fn success_display_is_bare_message() {
        let res = CommandResult::success("done");
        assert_eq!(res.to_string(), "done");
    }
}
