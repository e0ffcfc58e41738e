use std::borrow::Cow;
use std::sync::Arc;

use rustyline::Helper;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::Hinter;
use rustyline::validate::Validator;

use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::store::{NodeId, Repository};

/// Tab completion for the REPL: command names on the first word, store
/// paths afterwards. Rebuilt by the REPL before each read so it sees the
/// current location and dispatch tables.
pub struct ShellCompleter {
    commands: Vec<String>,
    repo: Arc<dyn Repository>,
    store: String,
    current_path: String,
}

impl ShellCompleter {
    pub fn for_session(ctx: &Context, shell: &Dispatcher) -> Self {
        let mut commands: Vec<String> = shell.commands().keys().cloned().collect();
        commands.extend(shell.custom_bindings().keys().cloned());
        commands.extend(shell.aliases().keys().cloned());
        if let Ok(scripts) = shell.scripts().get_script_names() {
            commands.extend(scripts);
        }
        commands.sort();
        commands.dedup();
        ShellCompleter {
            commands,
            repo: ctx.repo().clone(),
            store: ctx.store().to_string(),
            current_path: ctx.current_path(),
        }
    }

    fn command_candidates(&self, prefix: &str) -> Vec<Pair> {
        let mut candidates: Vec<Pair> = self
            .commands
            .iter()
            .filter(|name| name.starts_with(prefix))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect();
        if candidates.len() == 1 {
            candidates[0].replacement.push(' ');
        }
        candidates
    }

    fn path_candidates(&self, base: &str, partial: &str) -> Vec<Pair> {
        let absolute = if base.starts_with('/') {
            base.to_string()
        } else {
            format!("{}/{base}", self.current_path.trim_end_matches('/'))
        };
        let Some(node) = self.node_at(&absolute) else {
            return Vec::new();
        };
        let Some(snapshot) = self.repo.node(&self.store, node) else {
            return Vec::new();
        };
        let partial = partial.to_lowercase();
        let mut candidates = Vec::new();
        for child in snapshot.children {
            if let Some(child_snapshot) = self.repo.node(&self.store, child) {
                if child_snapshot.name.to_lowercase().starts_with(&partial) {
                    candidates.push(Pair {
                        display: child_snapshot.name.clone(),
                        replacement: child_snapshot.name,
                    });
                }
            }
        }
        candidates.sort_by(|a, b| a.display.cmp(&b.display));
        candidates
    }

    fn node_at(&self, path: &str) -> Option<NodeId> {
        let mut node = self.repo.root(&self.store)?;
        for segment in path.split('/').filter(|s| !s.is_empty() && *s != ".") {
            if segment == ".." {
                node = self.repo.node(&self.store, node)?.parent?;
                continue;
            }
            node = self
                .repo
                .children_named(&self.store, node, segment)
                .first()
                .copied()?;
        }
        Some(node)
    }
}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];
        let parts: Vec<&str> = input.split_whitespace().collect();

        if parts.len() <= 1 && !input.ends_with(' ') {
            let prefix = parts.first().copied().unwrap_or("");
            return Ok((pos - prefix.len(), self.command_candidates(prefix)));
        }

        let word_start = input
            .rfind(char::is_whitespace)
            .map(|i| i + 1)
            .unwrap_or(0);
        let word = &input[word_start..];
        let (base, partial) = match word.rfind('/') {
            Some(i) => (&word[..i + 1], &word[i + 1..]),
            None => ("", word),
        };
        Ok((pos - partial.len(), self.path_candidates(base, partial)))
    }
}

impl Hinter for ShellCompleter {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for ShellCompleter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if default {
            Cow::Owned(format!("\x1b[1;32m{prompt}\x1b[0m"))
        } else {
            Cow::Borrowed(prompt)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Borrowed(hint)
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        false
    }
}

impl Validator for ShellCompleter {}

impl Helper for ShellCompleter {}
