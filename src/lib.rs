pub mod binder;
pub mod commands;
pub mod completion;
pub mod context;
pub mod dispatcher;
pub mod errors;
pub mod expression;
pub mod format;
pub mod help;
pub mod inspector;
pub mod params;
pub mod path;
pub mod prompt;
pub mod repl;
pub mod result;
pub mod script;
pub mod session;
pub mod store;
pub mod tokenizer;

pub use context::Context;
pub use dispatcher::Dispatcher;
pub use errors::{ExpressionError, ShellError, ShellResult};
pub use result::{CommandResult, CommandStatus};
pub use session::{Session, SessionId, SessionStore};
