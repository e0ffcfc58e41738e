use crate::binder::ParamSpec;
use crate::commands::Command;
use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::format::definition_list;
use crate::help::HelpDetails;
use crate::result::CommandResult;
use crate::tokenizer::parse_input_line;

/// `alias`: manage the dispatcher's alias table.
#[derive(Default)]
pub struct ManageAliases {
    name: String,
    expansion: Vec<String>,
    remove: bool,
}

static PARAMS: &[ParamSpec<ManageAliases>] = &[
    ParamSpec::numbered(0, "alias", "The alias name", |c, v| c.name = v.into_text()),
    ParamSpec::list(1, "command", "The command the alias stands for", |c, v| {
        c.expansion = v.into_items()
    }),
    ParamSpec::flag("r", "Remove the alias", |c, _| c.remove = true),
];

impl Command for ManageAliases {
    const NAME: &'static str = "alias";
    const DESCRIPTION: &'static str = "Manages command aliases";

    fn params() -> &'static [ParamSpec<Self>] {
        PARAMS
    }

    fn run(&mut self, _ctx: &mut Context, shell: &mut Dispatcher) -> CommandResult {
        if self.name.is_empty() {
            let pairs: Vec<(String, String)> = shell
                .aliases()
                .iter()
                .map(|(name, tokens)| (name.clone(), tokens.join(" ")))
                .collect();
            return CommandResult::success(definition_list(&pairs));
        }
        if self.remove {
            return shell.remove_alias(&self.name);
        }
        if self.expansion.is_empty() {
            return CommandResult::missing_parameter("command");
        }
        // a single group carries a whole command line with its own flags
        let expansion = if self.expansion.len() == 1 {
            parse_input_line(&self.expansion[0])
        } else {
            self.expansion.clone()
        };
        shell.add_alias(&self.name, expansion)
    }

    fn extra_help(details: &mut HelpDetails) {
        details.add_example("alias ll (ls -a)", "Make 'll' run 'ls -a'");
        details.add_example("alias -r ll", "Remove the 'll' alias");
        details.add_example("alias", "List all aliases");
    }
}
