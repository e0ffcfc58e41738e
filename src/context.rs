//! Per-session shell state: current location, environment variables, and
//! the revert stack that keeps failed relocations side-effect free.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::errors::{ShellError, ShellResult};
use crate::result::CommandResult;
use crate::store::{NodeRef, NodeSnapshot, Repository};

/// Names the `set` command refuses to overwrite; the shell manages these.
pub const RESERVED_VARIABLES: &[&str] = &["~", "prev", "current", "num"];

pub const PROMPT_VARIABLE: &str = "prompt";
const DEFAULT_PROMPT: &str = "%store%:%path% >";

#[derive(Clone)]
struct ContextFrame {
    store: String,
    current: NodeRef,
}

/// Session state. Every core operation takes this explicitly; nothing in
/// the shell is ambient.
#[derive(Clone)]
pub struct Context {
    repo: Arc<dyn Repository>,
    store: String,
    current: NodeRef,
    env: BTreeMap<String, String>,
    stack: Vec<ContextFrame>,
}

impl Context {
    /// Opens a session rooted at `store`'s root node, in the store's first
    /// language, at the latest version.
    pub fn new(repo: Arc<dyn Repository>, store: &str) -> ShellResult<Self> {
        let canonical = repo
            .find_store(store)
            .ok_or_else(|| ShellError::InputError(format!("Store '{store}' not found")))?;
        let root = repo
            .root(&canonical)
            .ok_or_else(|| ShellError::InputError(format!("Store '{canonical}' has no root")))?;
        let language = repo
            .languages(&canonical)
            .into_iter()
            .next()
            .unwrap_or_else(|| "en".to_string());
        let version = repo.version_count(&canonical, root, &language) as u32;
        let mut env = BTreeMap::new();
        env.insert(PROMPT_VARIABLE.to_string(), DEFAULT_PROMPT.to_string());
        Ok(Context {
            repo,
            store: canonical,
            current: NodeRef::new(root, language, version),
            env,
            stack: Vec::new(),
        })
    }

    pub fn repo(&self) -> &Arc<dyn Repository> {
        &self.repo
    }

    pub fn store(&self) -> &str {
        &self.store
    }

    pub fn current(&self) -> &NodeRef {
        &self.current
    }

    pub fn set_current(&mut self, node: NodeRef) {
        self.current = node;
    }

    pub fn set_location(&mut self, store: String, node: NodeRef) {
        self.store = store;
        self.current = node;
    }

    pub fn current_snapshot(&self) -> Option<NodeSnapshot> {
        self.repo.node(&self.store, self.current.id)
    }

    /// Absolute path of the current node; the root renders as `/`.
    pub fn current_path(&self) -> String {
        crate::inspector::node_path(self.repo.as_ref(), &self.store, self.current.id)
            .unwrap_or_else(|| "/".to_string())
    }

    /// Snapshots the location so a failed relocation can roll back.
    pub fn push_context(&mut self) {
        self.stack.push(ContextFrame {
            store: self.store.clone(),
            current: self.current.clone(),
        });
    }

    /// Restores the most recently pushed location.
    pub fn revert_context(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.store = frame.store;
            self.current = frame.current;
        }
    }

    /// Drops the most recently pushed location, keeping the present one.
    pub fn commit_context(&mut self) {
        self.stack.pop();
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn variable(&self, name: &str) -> Option<&str> {
        self.env.get(name).map(String::as_str)
    }

    /// Sets a variable on behalf of the user; reserved names are rejected.
    pub fn set_variable(&mut self, name: &str, value: &str) -> ShellResult<()> {
        if RESERVED_VARIABLES.contains(&name) {
            return Err(ShellError::InputError(format!(
                "Variable name '{name}' is reserved"
            )));
        }
        self.env.insert(name.to_string(), value.to_string());
        Ok(())
    }

    /// Sets a variable without the reserved-name check. The dispatcher and
    /// the looping commands maintain `~`, `current` and `num` through this.
    pub fn set_internal_variable(&mut self, name: &str, value: &str) {
        self.env.insert(name.to_string(), value.to_string());
    }

    pub fn remove_variable(&mut self, name: &str) -> Option<String> {
        self.env.remove(name)
    }
}

/// Runs `body` with the context temporarily relocated to `path`. An empty
/// path runs in place. A failed relocation short-circuits with its failure;
/// otherwise the previous location is restored afterwards.
pub fn with_temp_context(
    ctx: &mut Context,
    path: &str,
    body: impl FnOnce(&mut Context) -> CommandResult,
) -> CommandResult {
    if path.is_empty() {
        return body(ctx);
    }
    let saved_store = ctx.store.clone();
    let saved = ctx.current.clone();
    let moved = crate::path::set_context(ctx, path);
    if !moved.is_success() {
        return moved;
    }
    let result = body(ctx);
    ctx.store = saved_store;
    ctx.current = saved;
    result
}
