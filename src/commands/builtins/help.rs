use crate::binder::ParamSpec;
use crate::commands::Command;
use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::format::{definition_list, help_text};
use crate::help::HelpDetails;
use crate::result::CommandResult;

const RULE_WIDTH: usize = 50;

/// Syntax topics that have no command of their own.
static TOPICS: &[(&str, fn() -> HelpDetails)] = &[
    ("expressions", expressions_topic),
    ("prompt", prompt_topic),
    ("subcommand", subcommand_topic),
    ("variables", variables_topic),
];

/// `help`: enumerate the command surface or show one help page.
#[derive(Default)]
pub struct ShowHelp {
    name: String,
}

static PARAMS: &[ParamSpec<ShowHelp>] = &[ParamSpec::numbered(
    0,
    "command",
    "The name of the command, script or topic to get help for",
    |c, v| c.name = v.into_text(),
)];

impl Command for ShowHelp {
    const NAME: &'static str = "help";
    const DESCRIPTION: &'static str =
        "List available commands and provide detailed help information about them";

    fn params() -> &'static [ParamSpec<Self>] {
        PARAMS
    }

    fn run(&mut self, _ctx: &mut Context, shell: &mut Dispatcher) -> CommandResult {
        if self.name.is_empty() {
            return CommandResult::success(list_commands(shell));
        }
        if let Some(reg) = shell.commands().get(&self.name) {
            return CommandResult::success(help_text(&(reg.help)()));
        }
        // an alias shows the help of the command it stands for
        if let Some(target) = shell.aliases().get(&self.name).and_then(|t| t.first()) {
            let reg = shell
                .commands()
                .get(target)
                .or_else(|| shell.custom_bindings().get(target));
            if let Some(reg) = reg {
                return CommandResult::success(help_text(&(reg.help)()));
            }
        }
        if let Some((_, topic)) = TOPICS.iter().find(|(name, _)| *name == self.name) {
            return CommandResult::success(help_text(&topic()));
        }
        if let Some(reg) = shell.custom_bindings().get(&self.name) {
            return CommandResult::success(help_text(&(reg.help)()));
        }
        match shell.scripts().get_script_help(&self.name) {
            Ok(Some(details)) => return CommandResult::success(help_text(&details)),
            Ok(None) => {}
            Err(err) => return CommandResult::failure(err.to_string()),
        }
        CommandResult::failure(format!(
            "Unknown command or script name '{}'",
            self.name
        ))
    }

    fn extra_help(details: &mut HelpDetails) {
        details.add_example("help", "List every command");
        details.add_example("help ls", "Show the help page for 'ls'");
        details.add_example("help expressions", "Explain the expression syntax");
    }
}

fn list_commands(shell: &Dispatcher) -> String {
    let mut lines = Vec::new();
    lines.push("Available commands:".to_string());
    lines.push("-".repeat(RULE_WIDTH));
    let pairs: Vec<(String, String)> = shell
        .commands()
        .iter()
        .map(|(name, reg)| (name.clone(), reg.description.to_string()))
        .collect();
    lines.push(definition_list(&pairs));

    if !shell.custom_bindings().is_empty() {
        lines.push(String::new());
        lines.push("Available custom commands:".to_string());
        lines.push("-".repeat(RULE_WIDTH));
        let pairs: Vec<(String, String)> = shell
            .custom_bindings()
            .iter()
            .map(|(name, reg)| (name.clone(), reg.description.to_string()))
            .collect();
        lines.push(definition_list(&pairs));
    }

    if let Ok(scripts) = shell.scripts().get_script_names() {
        if !scripts.is_empty() {
            lines.push(String::new());
            lines.push("Available scripts:".to_string());
            lines.push("-".repeat(RULE_WIDTH));
            lines.extend(scripts);
        }
    }

    lines.push(String::new());
    lines.push("help <cmd> for command specific help".to_string());
    lines.push(String::new());
    let topics: Vec<&str> = TOPICS.iter().map(|(name, _)| *name).collect();
    lines.push(format!("Other help topics: {}", topics.join(", ")));
    lines.join("\n")
}

fn expressions_topic() -> HelpDetails {
    let mut details = HelpDetails {
        description: "Allows logical testing against fields and attributes".to_string(),
        usage: "[@field | @@attribute] operator [@field | @@attribute] [as cast] [with flags] [and | or expression]".to_string(),
        comments: "Expressions are used as arguments to other commands such as find and if."
            .to_string(),
        ..HelpDetails::default()
    };
    details.add_parameter(
        "operator",
        "How to compare the 2 arguments. One of = (equals), != (not equal), < (less than), \
         <= (less or equal), > (greater than), >= (greater or equal), [ (starts with), \
         ] (ends with), ? (contains), !? (doesn't contain)",
    );
    details.add_parameter("cast", "Compare as a specific type. One of string, number, date");
    details.add_parameter(
        "flags",
        "Comma separated comparison modifiers. One of ignorecase, ignoredecimal, round, ceiling, floor",
    );
    details.add_parameter(
        "expression",
        "Another expression, combined with the and/or keyword",
    );
    details.add_example("@title != hello", "");
    details.add_example("@price >= 70 as number with round and @title = bananas with ignorecase", "");
    details.add_example("@@key = a or @@key = b", "");
    details.add_example("@@name [ a", "");
    details.add_example("not (isempty @title)", "");
    details
}

fn prompt_topic() -> HelpDetails {
    let mut details = HelpDetails {
        description: "The prompt is set through the environment variable 'prompt'".to_string(),
        usage: "[any characters] [%path%] [%node%] [%ver%] [%store%] [%lang%] [%langcode%] [%date%] [%time%]"
            .to_string(),
        ..HelpDetails::default()
    };
    details.add_parameter("%path%", "The full path of the current node");
    details.add_parameter("%node%", "The name of the current node");
    details.add_parameter("%ver%", "The version number of the current node");
    details.add_parameter("%store%", "The name of the current store");
    details.add_parameter("%lang%", "The title of the current language");
    details.add_parameter("%langcode%", "The code of the current language");
    details.add_parameter("%date%", "The current date");
    details.add_parameter("%time%", "The current time");
    details.add_example("set prompt (%store%:%path% >)", "");
    details.add_example("set prompt (%date% %lang%|%node% >)", "");
    details
}

fn subcommand_topic() -> HelpDetails {
    let mut details = HelpDetails {
        description: "Allows the output of a command to be used as a parameter of another command"
            .to_string(),
        usage: "< command".to_string(),
        ..HelpDetails::default()
    };
    details.add_parameter("command", "The command to evaluate");
    details.add_example("sf title < (gf -f title ../..)", "");
    details.add_example("cd < (ga -a parentid)", "");
    details
}

fn variables_topic() -> HelpDetails {
    let mut details = HelpDetails {
        description: "Allows substitution of environment variables into commands".to_string(),
        usage: "$name$".to_string(),
        ..HelpDetails::default()
    };
    details.add_parameter("name", "The name of the environment variable");
    details.add_example("echo $prevpath$", "");
    details.add_example("cd $myvar$", "");
    details
}
