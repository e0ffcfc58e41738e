use crate::binder::ParamSpec;
use crate::commands::Command;
use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::path;
use crate::result::CommandResult;

/// `cs`: change the current store, landing on its root node.
#[derive(Default)]
pub struct ChangeStore {
    name: String,
}

static CS_PARAMS: &[ParamSpec<ChangeStore>] = &[ParamSpec::numbered(
    0,
    "store",
    "The name of the store to change to",
    |c: &mut ChangeStore, v| c.name = v.into_text(),
)
.required()];

impl Command for ChangeStore {
    const NAME: &'static str = "cs";
    const DESCRIPTION: &'static str = "Changes the current store";

    fn params() -> &'static [ParamSpec<Self>] {
        CS_PARAMS
    }

    fn run(&mut self, ctx: &mut Context, _shell: &mut Dispatcher) -> CommandResult {
        if self.name.is_empty() {
            return CommandResult::missing_parameter("store");
        }
        match ctx.repo().find_store(&self.name) {
            Some(canonical) => path::set_context(ctx, &format!("/{canonical}")),
            None => CommandResult::failure(format!("Store '{}' not found", self.name)),
        }
    }
}

/// `pws`: print the current store's name.
#[derive(Default)]
pub struct PrintStore;

static PWS_PARAMS: &[ParamSpec<PrintStore>] = &[];

impl Command for PrintStore {
    const NAME: &'static str = "pws";
    const DESCRIPTION: &'static str = "Prints the name of the current store";

    fn params() -> &'static [ParamSpec<Self>] {
        PWS_PARAMS
    }

    fn run(&mut self, ctx: &mut Context, _shell: &mut Dispatcher) -> CommandResult {
        CommandResult::success(ctx.store())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::script::NullScriptLocator;
    use crate::store::Repository;
    use crate::store::memory::MemoryStore;

    fn session() -> (Context, Dispatcher) {
        let store = MemoryStore::new();
        let master = store.add_store("master", &["en"]);
        store
            .create_node("master", master, "content", "folder", "en")
            .unwrap();
        store.add_store("web", &["en"]);
        let ctx = Context::new(Arc::new(store), "master").unwrap();
        (ctx, Dispatcher::new(Box::new(NullScriptLocator)))
    }

    #[test]
    fn switches_to_the_named_store_root() {
        let (mut ctx, mut shell) = session();
        assert!(shell.execute(&mut ctx, "cd /content").is_success());
        assert!(shell.execute(&mut ctx, "cs WEB").is_success());
        assert_eq!(ctx.store(), "web");
        assert_eq!(ctx.current_path(), "/");
        assert_eq!(shell.execute(&mut ctx, "pws").message, "web");
    }

    #[test]
    fn unknown_store_is_a_failure() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "cs core");
        assert!(res.is_failure());
        assert_eq!(res.message, "Store 'core' not found");
        assert_eq!(ctx.store(), "master");
    }
}
