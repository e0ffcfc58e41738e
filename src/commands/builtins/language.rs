use crate::binder::ParamSpec;
use crate::commands::Command;
use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::result::CommandResult;
use crate::store::NodeRef;

/// `cl`: change the working language. The version moves to the latest
/// one the current node has in that language.
#[derive(Default)]
pub struct ChangeLanguage {
    language: String,
}

static CL_PARAMS: &[ParamSpec<ChangeLanguage>] = &[ParamSpec::numbered(
    0,
    "language",
    "The language code to change to",
    |c: &mut ChangeLanguage, v| c.language = v.into_text(),
)
.required()];

impl Command for ChangeLanguage {
    const NAME: &'static str = "cl";
    const DESCRIPTION: &'static str = "Changes the current language";

    fn params() -> &'static [ParamSpec<Self>] {
        CL_PARAMS
    }

    fn run(&mut self, ctx: &mut Context, _shell: &mut Dispatcher) -> CommandResult {
        if self.language.is_empty() {
            return CommandResult::missing_parameter("language");
        }
        let known = ctx.repo().languages(ctx.store());
        let Some(canonical) = known
            .into_iter()
            .find(|l| l.eq_ignore_ascii_case(&self.language))
        else {
            return CommandResult::failure(format!("Language '{}' not found", self.language));
        };
        let id = ctx.current().id;
        let version = ctx.repo().version_count(ctx.store(), id, &canonical) as u32;
        ctx.set_current(NodeRef::new(id, canonical, version));
        CommandResult::success("")
    }
}

/// `pwl`: print the working language.
#[derive(Default)]
pub struct PrintLanguage;

static PWL_PARAMS: &[ParamSpec<PrintLanguage>] = &[];

impl Command for PrintLanguage {
    const NAME: &'static str = "pwl";
    const DESCRIPTION: &'static str = "Prints the current language";

    fn params() -> &'static [ParamSpec<Self>] {
        PWL_PARAMS
    }

    fn run(&mut self, ctx: &mut Context, _shell: &mut Dispatcher) -> CommandResult {
        CommandResult::success(ctx.current().language.clone())
    }
}
