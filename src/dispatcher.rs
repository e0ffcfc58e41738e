//! Line execution: interpolation, sub-invocations, chaining and name
//! resolution.
//!
//! A line is a chain of stages separated by standalone `>` tokens. Each
//! stage is interpolated against the environment, tokenized, and scanned
//! for `<` sub-invocation markers whose group bodies run re-entrantly
//! before the stage itself. The first token then resolves through the
//! dispatch tables in order: built-in commands, custom bindings, aliases,
//! scripts.

use std::collections::BTreeMap;

use chrono::Local;
use log::debug;

use crate::commands::{Registration, built_in_commands};
use crate::context::Context;
use crate::errors::ShellError;
use crate::expression::BindingLookup;
use crate::format::join_lines;
use crate::result::CommandResult;
use crate::script::{ExecutionDirectives, ScriptLocator};
use crate::tokenizer::{
    CHAINED_VALUE_VAR, SCRIPT_COMMENT, SCRIPT_DIRECTIVE, SUBINVOKE_MARKER, VAR_MARKER,
    interpolate_variables, parse_input_line, parse_script_lines, split_chain_stages,
    unescape_markers,
};

/// Re-entrant dispatch ceiling; a script calling itself hits this.
const MAX_DEPTH: usize = 64;

const NOW_VARIABLE: &str = "now";
const NOW_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Resolves and runs command lines against a [`Context`].
///
/// Holds the mutable per-session tables: the built-in catalog copy,
/// custom bindings, aliases and the script locator.
pub struct Dispatcher {
    commands: BTreeMap<String, Registration>,
    custom: BTreeMap<String, Registration>,
    aliases: BTreeMap<String, Vec<String>>,
    locator: Box<dyn ScriptLocator>,
    directives: ExecutionDirectives,
    depth: usize,
}

impl Dispatcher {
    pub fn new(locator: Box<dyn ScriptLocator>) -> Self {
        let commands = built_in_commands()
            .iter()
            .map(|reg| (reg.name.to_string(), *reg))
            .collect();
        Dispatcher {
            commands,
            custom: BTreeMap::new(),
            aliases: BTreeMap::new(),
            locator,
            directives: ExecutionDirectives::standard(),
            depth: 0,
        }
    }

    pub fn commands(&self) -> &BTreeMap<String, Registration> {
        &self.commands
    }

    pub fn custom_bindings(&self) -> &BTreeMap<String, Registration> {
        &self.custom
    }

    pub fn aliases(&self) -> &BTreeMap<String, Vec<String>> {
        &self.aliases
    }

    pub fn scripts(&self) -> &dyn ScriptLocator {
        self.locator.as_ref()
    }

    /// Runs one input line to completion.
    pub fn execute(&mut self, ctx: &mut Context, line: &str) -> CommandResult {
        if self.depth >= MAX_DEPTH {
            return CommandResult::failure("Maximum invocation depth exceeded");
        }
        self.depth += 1;
        let result = self.execute_line(ctx, line);
        self.depth -= 1;
        result
    }

    fn execute_line(&mut self, ctx: &mut Context, line: &str) -> CommandResult {
        ctx.set_internal_variable(NOW_VARIABLE, &Local::now().format(NOW_FORMAT).to_string());
        let line = line.trim();
        if line.is_empty() {
            return CommandResult::success("");
        }

        let stages = split_chain_stages(line);
        let chained = stages.len() > 1;
        let mut result = CommandResult::success("");
        for (index, stage) in stages.iter().enumerate() {
            if index > 0 {
                ctx.set_internal_variable(CHAINED_VALUE_VAR, &result.message);
            }
            result = self.execute_stage(ctx, stage, index > 0);
            if !result.is_success() {
                break;
            }
        }
        if chained {
            ctx.remove_variable(CHAINED_VALUE_VAR);
        }
        result
    }

    /// One chain stage: interpolate, tokenize, resolve sub-invocations,
    /// then dispatch.
    fn execute_stage(&mut self, ctx: &mut Context, stage: &str, chained: bool) -> CommandResult {
        let pipe_placeholder = format!("{VAR_MARKER}{CHAINED_VALUE_VAR}{VAR_MARKER}");
        let had_placeholder = stage.contains(&pipe_placeholder);
        let text = interpolate_variables(stage, ctx.env());
        let mut tokens = parse_input_line(&text);

        let mut index = 0;
        while index < tokens.len() {
            if tokens[index] != SUBINVOKE_MARKER {
                index += 1;
                continue;
            }
            if index + 1 >= tokens.len() {
                return CommandResult::failure(format!(
                    "Missing command after '{SUBINVOKE_MARKER}'"
                ));
            }
            let body = tokens[index + 1].clone();
            let inner = self.execute(ctx, &body);
            if !inner.is_success() {
                return inner;
            }
            // the output replaces both tokens as one literal token and is
            // never rescanned
            tokens.splice(index..=index + 1, [inner.message]);
            index += 1;
        }

        let tokens: Vec<String> = tokens.iter().map(|t| unescape_markers(t)).collect();
        self.run_tokens(ctx, tokens, chained && !had_placeholder)
    }

    /// Resolves the first token and invokes what it names. `pipe_input`
    /// is set when a chained value may still be appended to the
    /// arguments.
    fn run_tokens(
        &mut self,
        ctx: &mut Context,
        tokens: Vec<String>,
        pipe_input: bool,
    ) -> CommandResult {
        let Some((name, rest)) = tokens.split_first() else {
            return CommandResult::success("");
        };
        let name = name.clone();
        let args = rest.to_vec();

        let reg = self
            .commands
            .get(&name)
            .or_else(|| self.custom.get(&name))
            .copied();
        if let Some(reg) = reg {
            return self.invoke(ctx, reg, args, pipe_input);
        }

        if let Some(expansion) = self.aliases.get(&name) {
            let mut expanded = expansion.clone();
            expanded.extend(args);
            debug!("alias '{name}' expands to '{}'", expanded.join(" "));
            let Some((target, rest)) = expanded.split_first() else {
                return CommandResult::success("");
            };
            let reg = self
                .commands
                .get(target)
                .or_else(|| self.custom.get(target))
                .copied();
            return match reg {
                Some(reg) => self.invoke(ctx, reg, rest.to_vec(), pipe_input),
                None => self.unknown(target.clone()),
            };
        }

        match self.locator.get_script(&name) {
            Ok(Some(source)) => {
                debug!("running script '{name}'");
                return self.run_script(ctx, &source, &args);
            }
            Ok(None) => {}
            Err(err) => return CommandResult::failure(err.to_string()),
        }

        self.unknown(name)
    }

    fn invoke(
        &mut self,
        ctx: &mut Context,
        reg: Registration,
        mut args: Vec<String>,
        pipe_input: bool,
    ) -> CommandResult {
        if pipe_input && reg.accepts_pipe {
            if let Some(value) = ctx.variable(CHAINED_VALUE_VAR) {
                args.push(value.to_string());
            }
        }
        debug!("dispatch '{}' with {} argument(s)", reg.name, args.len());
        (reg.invoke)(ctx, self, &args)
    }

    fn unknown(&self, name: String) -> CommandResult {
        if self.directives.is_ignore_unknown_commands() {
            return CommandResult::success("");
        }
        CommandResult::failure(ShellError::UnknownCommand(name).to_string())
    }

    /// Runs script source line by line under the script's own
    /// directives, binding `$1$`..`$N$` to `args` for the duration.
    fn run_script(&mut self, ctx: &mut Context, source: &str, args: &[String]) -> CommandResult {
        let saved_directives = self.directives;
        self.directives = ExecutionDirectives::standard();
        let mut saved_args = Vec::new();
        for (position, arg) in args.iter().enumerate() {
            let name = (position + 1).to_string();
            saved_args.push((name.clone(), ctx.variable(&name).map(str::to_string)));
            ctx.set_internal_variable(&name, arg);
        }

        let result = self.run_script_lines(ctx, source);

        for (name, previous) in saved_args {
            match previous {
                Some(value) => ctx.set_internal_variable(&name, &value),
                None => {
                    ctx.remove_variable(&name);
                }
            }
        }
        self.directives = saved_directives;
        result
    }

    fn run_script_lines(&mut self, ctx: &mut Context, source: &str) -> CommandResult {
        let mut output = Vec::new();
        let mut failed = false;
        for line in parse_script_lines(source) {
            let line = line.trim();
            if line.is_empty() || line.starts_with(SCRIPT_COMMENT) || line.starts_with('^') {
                continue;
            }
            if let Some(word) = line.strip_prefix(SCRIPT_DIRECTIVE) {
                match ExecutionDirectives::parse(word) {
                    Some(patch) => self.directives.patch(patch),
                    None => output.push(format!("Unknown directive '{word}'")),
                }
                continue;
            }

            let res = self.execute(ctx, line);
            if !self.directives.is_echo_off() || res.is_abort() {
                output.push(res.to_string());
            }
            if res.is_abort() {
                // a script swallows exit; the session survives
                return CommandResult::success(join_lines(&output));
            }
            if res.is_failure() {
                failed = true;
                if self.directives.is_stop_on_error() {
                    break;
                }
            }
        }
        let message = join_lines(&output);
        if failed {
            CommandResult::failure(message)
        } else {
            CommandResult::success(message)
        }
    }

    pub fn add_alias(&mut self, name: &str, expansion: Vec<String>) -> CommandResult {
        if self.commands.contains_key(name) || self.custom.contains_key(name) {
            return CommandResult::failure(format!(
                "Cannot add alias '{name}' with the same name as an existing command"
            ));
        }
        if self.aliases.contains_key(name) {
            return CommandResult::failure(format!("Alias '{name}' already exists"));
        }
        self.aliases.insert(name.to_string(), expansion);
        CommandResult::success(format!("Alias '{name}' added"))
    }

    pub fn remove_alias(&mut self, name: &str) -> CommandResult {
        match self.aliases.remove(name) {
            Some(_) => CommandResult::success(format!("Alias '{name}' removed")),
            None => CommandResult::failure(format!("Alias '{name}' not found")),
        }
    }

    /// Binds `name` to the catalog entry called `factory`. Rebinding an
    /// existing custom name replaces it.
    pub fn bind_custom(&mut self, factory: &str, name: &str) -> CommandResult {
        let Some(reg) = self.commands.get(factory).copied() else {
            return CommandResult::failure(format!("Name '{factory}' not found in registry"));
        };
        if self.commands.contains_key(name) || self.aliases.contains_key(name) {
            return CommandResult::failure(format!(
                "Cannot add binding '{name}' with the same name as an existing command"
            ));
        }
        self.custom.insert(name.to_string(), reg);
        CommandResult::success(format!("Binding '{name}' added"))
    }

    pub fn unbind_custom(&mut self, name: &str) -> CommandResult {
        match self.custom.remove(name) {
            Some(_) => CommandResult::success(format!("Binding '{name}' removed")),
            None => CommandResult::failure(format!("Binding '{name}' not found")),
        }
    }
}

impl BindingLookup for Dispatcher {
    fn is_bound(&self, name: &str) -> bool {
        self.commands.contains_key(name)
            || self.custom.contains_key(name)
            || self.aliases.contains_key(name)
    }
}
