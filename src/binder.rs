//! Binds extracted parameters onto a command's input struct.
//!
//! Each command declares a static table of [`ParamSpec`]s. Binding walks
//! the table, pulls the matching bucket out of the token stream and hands
//! the value to the entry's assign function. Multi-word named parameters
//! are carved out of the raw tokens before general extraction so their
//! value words never land in the positional bucket.
//!
//! `required` is help metadata: binding leaves a missing parameter at its
//! default and the command reports it from `run`. Binding itself fails
//! only when a multi-word marker has too few value tokens behind it.

use crate::errors::{ShellError, ShellResult};
use crate::params::{extract_parameters, get_parameter_parts, has_parameter, remove_parameter};

/// Which bucket a parameter comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Positional parameter at this index.
    Numbered(usize),
    /// `-name value`, joining `words` tokens into the value.
    Named { name: &'static str, words: usize },
    /// `-name` with no value.
    Flag(&'static str),
    /// `-name key value`, the two value tokens kept separate.
    Pair(&'static str),
    /// All positional parameters from this index onwards.
    List(usize),
}

/// A bound value on its way into the input struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Pair(String, String),
    Items(Vec<String>),
}

impl ParamValue {
    pub fn into_text(self) -> String {
        match self {
            ParamValue::Text(text) => text,
            ParamValue::Pair(key, value) => format!("{key} {value}"),
            ParamValue::Items(items) => items.join(" "),
        }
    }

    pub fn into_items(self) -> Vec<String> {
        match self {
            ParamValue::Text(text) => vec![text],
            ParamValue::Pair(key, value) => vec![key, value],
            ParamValue::Items(items) => items,
        }
    }

    pub fn into_pair(self) -> (String, String) {
        match self {
            ParamValue::Pair(key, value) => (key, value),
            other => (other.into_text(), String::new()),
        }
    }
}

/// One parameter a command accepts, with its help text and the function
/// that stores the bound value on the input struct.
pub struct ParamSpec<C> {
    pub kind: ParamKind,
    pub placeholder: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub assign: fn(&mut C, ParamValue),
}

impl<C> ParamSpec<C> {
    pub const fn numbered(
        index: usize,
        placeholder: &'static str,
        description: &'static str,
        assign: fn(&mut C, ParamValue),
    ) -> Self {
        ParamSpec {
            kind: ParamKind::Numbered(index),
            placeholder,
            description,
            required: false,
            assign,
        }
    }

    pub const fn named(
        name: &'static str,
        words: usize,
        placeholder: &'static str,
        description: &'static str,
        assign: fn(&mut C, ParamValue),
    ) -> Self {
        ParamSpec {
            kind: ParamKind::Named { name, words },
            placeholder,
            description,
            required: false,
            assign,
        }
    }

    pub const fn flag(
        name: &'static str,
        description: &'static str,
        assign: fn(&mut C, ParamValue),
    ) -> Self {
        ParamSpec {
            kind: ParamKind::Flag(name),
            placeholder: "",
            description,
            required: false,
            assign,
        }
    }

    pub const fn pair(
        name: &'static str,
        placeholder: &'static str,
        description: &'static str,
        assign: fn(&mut C, ParamValue),
    ) -> Self {
        ParamSpec {
            kind: ParamKind::Pair(name),
            placeholder,
            description,
            required: false,
            assign,
        }
    }

    pub const fn list(
        from: usize,
        placeholder: &'static str,
        description: &'static str,
        assign: fn(&mut C, ParamValue),
    ) -> Self {
        ParamSpec {
            kind: ParamKind::List(from),
            placeholder,
            description,
            required: false,
            assign,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// How this parameter appears in a usage line.
    pub fn usage_token(&self) -> String {
        match self.kind {
            ParamKind::Numbered(_) if self.required => format!("<{}>", self.placeholder),
            ParamKind::Numbered(_) => format!("[{}]", self.placeholder),
            ParamKind::Named { name, .. } | ParamKind::Pair(name) if self.required => {
                format!("-{name} <{}>", self.placeholder)
            }
            ParamKind::Named { name, .. } | ParamKind::Pair(name) => {
                format!("[-{name} <{}>]", self.placeholder)
            }
            ParamKind::Flag(name) => format!("[-{name}]"),
            ParamKind::List(_) if self.required => format!("<{}...>", self.placeholder),
            ParamKind::List(_) => format!("[{}...]", self.placeholder),
        }
    }

    /// Name and description pair for the parameter help list.
    pub fn help_entry(&self) -> (String, String) {
        let display = match self.kind {
            ParamKind::Numbered(_) | ParamKind::List(_) => self.placeholder.to_string(),
            ParamKind::Named { name, .. } | ParamKind::Pair(name) => {
                format!("-{name} <{}>", self.placeholder)
            }
            ParamKind::Flag(name) => format!("-{name}"),
        };
        (display, self.description.to_string())
    }
}

fn word_count(kind: ParamKind) -> usize {
    match kind {
        ParamKind::Named { words, .. } => words,
        ParamKind::Pair(_) => 2,
        _ => 1,
    }
}

/// Binds `args` onto `command` following `specs`. A multi-word parameter
/// whose marker is present with too few value tokens is a binding error;
/// everything absent simply leaves the struct's defaults in place.
pub fn bind_command<C>(
    command: &mut C,
    specs: &[ParamSpec<C>],
    args: &[String],
) -> ShellResult<()> {
    let mut tokens: Vec<String> = args.to_vec();
    let mut bound = vec![false; specs.len()];

    for (ind, spec) in specs.iter().enumerate() {
        let name = match spec.kind {
            ParamKind::Named { name, .. } => name,
            ParamKind::Pair(name) => name,
            _ => continue,
        };
        let words = word_count(spec.kind);
        if words <= 1 || !has_parameter(&tokens, name) {
            continue;
        }
        let parts = get_parameter_parts(&tokens, name, words);
        remove_parameter(&mut tokens, name, words);
        let Some(parts) = parts else {
            return Err(ShellError::BindingError(format!(
                "Expected {words} words for parameter '{name}'"
            )));
        };
        let value = match spec.kind {
            ParamKind::Pair(_) => ParamValue::Pair(parts[0].clone(), parts[1].clone()),
            _ => ParamValue::Text(parts.join(" ")),
        };
        (spec.assign)(command, value);
        bound[ind] = true;
    }

    let flags: Vec<&str> = specs
        .iter()
        .filter_map(|spec| match spec.kind {
            ParamKind::Flag(name) => Some(name),
            _ => None,
        })
        .collect();
    let extracted = extract_parameters(&tokens, &flags);

    for (ind, spec) in specs.iter().enumerate() {
        if bound[ind] {
            continue;
        }
        let value = match spec.kind {
            ParamKind::Flag(name) => extracted
                .contains(name)
                .then(|| ParamValue::Text(String::new())),
            ParamKind::Named { name, .. } | ParamKind::Pair(name) => extracted
                .named(name)
                .map(|value| value.to_string())
                .map(|value| coerce(spec.kind, value))
                .transpose()?,
            ParamKind::Numbered(index) => extracted
                .numbered(index)
                .map(|value| ParamValue::Text(value.to_string())),
            ParamKind::List(from) => {
                let items: Vec<String> = extracted.numbered.iter().skip(from).cloned().collect();
                (!items.is_empty()).then_some(ParamValue::Items(items))
            }
        };
        if let Some(value) = value {
            (spec.assign)(command, value);
        }
    }
    Ok(())
}

/// Fallback coercion for values that reached the general extraction pass.
/// Pairs landing here came from a single token, so the value is split at
/// its first whitespace; no key or no value is a binding error.
fn coerce(kind: ParamKind, value: String) -> ShellResult<ParamValue> {
    match kind {
        ParamKind::Pair(name) => {
            let mut parts = value.splitn(2, char::is_whitespace);
            match (parts.next(), parts.next()) {
                (Some(key), Some(rest)) if !key.is_empty() && !rest.is_empty() => {
                    Ok(ParamValue::Pair(key.to_string(), rest.to_string()))
                }
                _ => Err(ShellError::BindingError(format!(
                    "Failed to parse a name and value from '{value}' for parameter '{name}'"
                ))),
            }
        }
        _ => Ok(ParamValue::Text(value)),
    }
}
