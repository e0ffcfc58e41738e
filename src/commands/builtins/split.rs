use crate::binder::ParamSpec;
use crate::commands::Command;
use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::help::HelpDetails;
use crate::result::CommandResult;

/// `split`: cut a string into elements and run a command once per element.
/// The reserved variable `current` carries the element being processed.
#[derive(Default)]
pub struct SplitInput {
    input: String,
    command: String,
    symbol: String,
    on_newline: bool,
    on_tab: bool,
    no_statistics: bool,
}

static PARAMS: &[ParamSpec<SplitInput>] = &[
    ParamSpec::flag("ns", "Do not show how many elements were processed", |c, _| {
        c.no_statistics = true
    }),
    ParamSpec::flag("n", "Split on the newline character", |c, _| {
        c.on_newline = true
    }),
    ParamSpec::flag("t", "Split on the tab character", |c, _| c.on_tab = true),
    ParamSpec::named("s", 1, "symbol", "The symbol to split on", |c, v| {
        c.symbol = v.into_text()
    }),
    ParamSpec::numbered(0, "input", "The string to split", |c: &mut SplitInput, v| {
        c.input = v.into_text()
    })
    .required(),
    ParamSpec::numbered(1, "command", "The command to run against each element", |c, v| {
        c.command = v.into_text()
    }),
];

impl Command for SplitInput {
    const NAME: &'static str = "split";
    const DESCRIPTION: &'static str = "Splits a string and iterates over the elements";

    fn params() -> &'static [ParamSpec<Self>] {
        PARAMS
    }

    fn run(&mut self, ctx: &mut Context, shell: &mut Dispatcher) -> CommandResult {
        if self.input.is_empty() {
            return CommandResult::missing_parameter("input");
        }
        if self.command.is_empty() {
            return CommandResult::missing_parameter("command");
        }

        let mut separators = Vec::new();
        if self.on_newline {
            // CRLF first so the LF pass never leaves a stray CR behind.
            separators.push("\r\n".to_string());
            separators.push("\n".to_string());
        }
        if self.on_tab {
            separators.push("\t".to_string());
        }
        if !self.symbol.is_empty() {
            separators.push(self.symbol.clone());
        }

        let elements = split_on(&self.input, &separators);
        let mut lines = Vec::new();

        if ctx.variable("current").is_some() {
            lines.push(
                "WARNING: Environment variable 'current' contains a value. It has been overwritten."
                    .to_string(),
            );
        }
        ctx.remove_variable("current");

        let command = self.command.clone();
        for element in &elements {
            ctx.set_internal_variable("current", element);
            let res = shell.execute(ctx, &command);
            lines.push(res.to_string());
            ctx.remove_variable("current");
        }

        if !self.no_statistics {
            let noun = if elements.len() == 1 { "string" } else { "strings" };
            lines.push(format!("Processed {} {}", elements.len(), noun));
        }
        CommandResult::success(lines.join("\n"))
    }

    fn extra_help(details: &mut HelpDetails) {
        details.comments =
            "Without -n, -t or -s the input splits on whitespace. Empty elements are skipped."
                .to_string();
        details.add_example("split -s , 1,2,3,4 (echo $current$)", "Print each number on its own line");
        details.add_example(
            "split -n < (gf -f body) (set line$current$ seen)",
            "Iterate over the lines of a field value",
        );
    }
}

/// Splits on every separator in turn; no separators means whitespace.
/// Empty elements are dropped, matching the loop's skip-empties contract.
fn split_on(input: &str, separators: &[String]) -> Vec<String> {
    let mut elements: Vec<String> = if separators.is_empty() {
        input.split_whitespace().map(str::to_string).collect()
    } else {
        let mut parts = vec![input.to_string()];
        for sep in separators {
            parts = parts
                .iter()
                .flat_map(|p| p.split(sep.as_str()))
                .map(str::to_string)
                .collect();
        }
        parts
    };
    elements.retain(|e| !e.is_empty());
    elements
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::script::NullScriptLocator;
    use crate::store::memory::sample_repository;

    fn session() -> (Context, Dispatcher) {
        let ctx = Context::new(Arc::new(sample_repository()), "master").unwrap();
        (ctx, Dispatcher::new(Box::new(NullScriptLocator)))
    }

    #[test]
    fn splits_on_a_symbol() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "split -s , a,b,c (echo $current$)");
        assert!(res.is_success(), "{res}");
        assert_eq!(res.message, "a\nb\nc\nProcessed 3 strings");
        assert_eq!(ctx.variable("current"), None);
    }

    #[test]
    fn default_split_is_whitespace() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "split (a b  c) (echo w:$current$)");
        assert_eq!(res.message, "w:a\nw:b\nw:c\nProcessed 3 strings");
    }

    #[test]
    fn empty_elements_are_skipped_and_stats_suppressed() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "split -ns -s , a,,b (echo $current$)");
        assert_eq!(res.message, "a\nb");
    }

    #[test]
    fn singular_statistics_noun() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "split -s , lone (echo $current$)");
        assert_eq!(res.message, "lone\nProcessed 1 string");
    }

    #[test]
    fn warns_when_current_was_already_set() {
        let (mut ctx, mut shell) = session();
        ctx.set_internal_variable("current", "held");
        let res = shell.execute(&mut ctx, "split -ns -s , a (echo $current$)");
        assert!(res.message.starts_with(
            "WARNING: Environment variable 'current' contains a value. It has been overwritten."
        ));
    }
}
