use log::debug;
use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::{ColorMode, Config, Editor};

use crate::completion::ShellCompleter;
use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::errors::{ShellError, ShellResult};
use crate::prompt::current_prompt;

/// Runs the interactive loop until `exit` or Ctrl-D.
///
/// Ctrl-C discards the current line and prompts again. Every other result
/// is printed through its `Display` form, so failures carry the `FAIL:`
/// prefix readers expect from scripts.
pub fn run(ctx: &mut Context, shell: &mut Dispatcher) -> ShellResult<()> {
    let config = Config::builder()
        .color_mode(ColorMode::Enabled)
        .auto_add_history(true)
        .build();

    let mut rl = Editor::with_config(config)
        .map_err(|e| ShellError::InputError(format!("Failed to create line editor: {e}")))?;
    rl.set_completion_type(rustyline::CompletionType::List);

    loop {
        // the helper snapshots the location and dispatch tables, so it is
        // rebuilt once per prompt
        rl.set_helper(Some(ShellCompleter::for_session(ctx, shell)));
        let prompt = format!("{} ", current_prompt(ctx));

        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let result = shell.execute(ctx, line);
                if result.is_abort() {
                    if !result.message.is_empty() {
                        println!("{}", result.message);
                    }
                    break;
                }
                if !result.message.is_empty() || result.is_failure() {
                    println!("{result}");
                }
            }
            Err(ReadlineError::Interrupted) => {
                debug!("line discarded");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                return Err(ShellError::InputError(format!("Readline error: {err}")));
            }
        }
    }
    Ok(())
}
