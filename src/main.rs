use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use trovesh::context::Context;
use trovesh::dispatcher::Dispatcher;
use trovesh::repl;
use trovesh::script::{FileScriptLocator, NullScriptLocator, ScriptLocator};
use trovesh::store::memory::sample_repository;

/// Interactive shell for hierarchical, versioned content stores.
#[derive(Parser)]
#[command(name = "trovesh", version, about)]
struct Cli {
    /// Directory searched for .tsh scripts
    #[arg(long, value_name = "DIR")]
    scripts: Option<PathBuf>,

    /// Run one command line and exit
    #[arg(short = 'c', long = "command", value_name = "CMD")]
    command: Option<String>,

    /// Store to start in
    #[arg(long, default_value = "master")]
    store: String,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let locator: Box<dyn ScriptLocator> = match cli.scripts {
        Some(dir) => Box::new(FileScriptLocator::new(dir)),
        None => Box::new(NullScriptLocator),
    };
    let repo = Arc::new(sample_repository());
    let mut ctx = match Context::new(repo, &cli.store) {
        Ok(ctx) => ctx,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    let mut shell = Dispatcher::new(locator);

    if let Some(line) = cli.command {
        let result = shell.execute(&mut ctx, &line);
        if !result.message.is_empty() || result.is_failure() {
            println!("{result}");
        }
        return if result.is_failure() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    match repl::run(&mut ctx, &mut shell) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
