//! Session bookkeeping for embedding hosts.
//!
//! Each session owns its `Context` and `Dispatcher`; nothing is shared
//! between sessions except the repository behind its `Arc`. The store
//! itself is behind an `RwLock` so a host can serve sessions from
//! multiple threads, while each session stays single-threaded.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::errors::ShellResult;
use crate::prompt::current_prompt;
use crate::result::CommandResult;
use crate::script::ScriptLocator;
use crate::store::Repository;

pub type SessionId = Uuid;

/// One interactive session: a location in the store plus the dispatch
/// tables built up during it.
pub struct Session {
    context: Context,
    dispatcher: Dispatcher,
}

impl Session {
    pub fn new(
        repo: Arc<dyn Repository>,
        store: &str,
        locator: Box<dyn ScriptLocator>,
    ) -> ShellResult<Self> {
        Ok(Session {
            context: Context::new(repo, store)?,
            dispatcher: Dispatcher::new(locator),
        })
    }

    pub fn execute(&mut self, line: &str) -> CommandResult {
        self.dispatcher.execute(&mut self.context, line)
    }

    pub fn prompt(&self) -> String {
        current_prompt(&self.context)
    }

    pub fn context(&self) -> &Context {
        &self.context
    }
}

/// Id-keyed session map.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore::default()
    }

    pub fn create_session(
        &self,
        repo: Arc<dyn Repository>,
        store: &str,
        locator: Box<dyn ScriptLocator>,
    ) -> ShellResult<SessionId> {
        let session = Session::new(repo, store, locator)?;
        let id = Uuid::new_v4();
        self.sessions
            .write()
            .expect("session lock poisoned")
            .insert(id, session);
        Ok(id)
    }

    /// Runs a line inside the named session; `None` when the id is
    /// unknown.
    pub fn execute(&self, id: SessionId, line: &str) -> Option<CommandResult> {
        let mut sessions = self.sessions.write().expect("session lock poisoned");
        sessions.get_mut(&id).map(|s| s.execute(line))
    }

    pub fn prompt(&self, id: SessionId) -> Option<String> {
        let sessions = self.sessions.read().expect("session lock poisoned");
        sessions.get(&id).map(Session::prompt)
    }

    pub fn remove(&self, id: SessionId) -> bool {
        self.sessions
            .write()
            .expect("session lock poisoned")
            .remove(&id)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().expect("session lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
