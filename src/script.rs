//! Script sources and execution directives.
//!
//! Scripts are plain text files of shell lines. Inside a script, lines
//! starting with `#` are comments and lines starting with `@` patch the
//! execution directives for the rest of the run. Leading `^key:value`
//! lines carry help metadata:
//!
//! ```text
//! ^desc:Rebuild the news tree
//! ^usage:rebuild-news <year>
//! ^param:year The year to rebuild
//! ^example:rebuild-news 2024
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::errors::{ShellError, ShellResult};
use crate::help::HelpDetails;

pub const SCRIPT_EXTENSION: &str = "tsh";

/// Per-script execution switches, patched by `@` directive lines.
/// `None` keeps the value already in effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionDirectives {
    pub echo_off: Option<bool>,
    pub stop_on_error: Option<bool>,
    pub ignore_unknown_commands: Option<bool>,
}

impl ExecutionDirectives {
    /// The directives a script starts from: echo on, stop on error.
    pub fn standard() -> Self {
        ExecutionDirectives {
            echo_off: Some(false),
            stop_on_error: Some(true),
            ignore_unknown_commands: Some(false),
        }
    }

    /// Parses a directive word (without the `@`). Unknown words are `None`.
    pub fn parse(word: &str) -> Option<Self> {
        let mut directives = ExecutionDirectives::default();
        match word.to_lowercase().as_str() {
            "echooff" => directives.echo_off = Some(true),
            "echoon" => directives.echo_off = Some(false),
            "stoponerror" => directives.stop_on_error = Some(true),
            "continueonerror" => directives.stop_on_error = Some(false),
            "ignoreunknowncommands" => directives.ignore_unknown_commands = Some(true),
            _ => return None,
        }
        Some(directives)
    }

    /// Overlays `patch`: set fields win, unset fields keep current values.
    pub fn patch(&mut self, patch: ExecutionDirectives) {
        if patch.echo_off.is_some() {
            self.echo_off = patch.echo_off;
        }
        if patch.stop_on_error.is_some() {
            self.stop_on_error = patch.stop_on_error;
        }
        if patch.ignore_unknown_commands.is_some() {
            self.ignore_unknown_commands = patch.ignore_unknown_commands;
        }
    }

    pub fn is_echo_off(&self) -> bool {
        self.echo_off.unwrap_or(false)
    }

    pub fn is_stop_on_error(&self) -> bool {
        self.stop_on_error.unwrap_or(true)
    }

    pub fn is_ignore_unknown_commands(&self) -> bool {
        self.ignore_unknown_commands.unwrap_or(false)
    }
}

/// Where the dispatcher finds scripts when a name resolves to nothing else.
pub trait ScriptLocator: Send {
    /// The script source, or `None` when the name is unknown.
    fn get_script(&self, name: &str) -> ShellResult<Option<String>>;

    fn get_script_help(&self, name: &str) -> ShellResult<Option<HelpDetails>>;

    fn get_script_names(&self) -> ShellResult<Vec<String>>;
}

/// Locator for sessions without a script directory.
pub struct NullScriptLocator;

impl ScriptLocator for NullScriptLocator {
    fn get_script(&self, _name: &str) -> ShellResult<Option<String>> {
        Ok(None)
    }

    fn get_script_help(&self, _name: &str) -> ShellResult<Option<HelpDetails>> {
        Ok(None)
    }

    fn get_script_names(&self) -> ShellResult<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Finds `<name>.tsh` files in one directory, name match case-insensitive.
pub struct FileScriptLocator {
    root: PathBuf,
}

impl FileScriptLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileScriptLocator { root: root.into() }
    }

    fn locate(&self, name: &str) -> ShellResult<Option<PathBuf>> {
        if !self.root.is_dir() {
            warn!("script directory {} is missing", self.root.display());
            return Ok(None);
        }
        let mut matches = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !is_script_file(&path) {
                continue;
            }
            let stem_matches = path
                .file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|s| s.eq_ignore_ascii_case(name));
            if stem_matches {
                matches.push(path);
            }
        }
        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            _ => Err(ShellError::ScriptError(format!(
                "Multiple scripts found matching name '{name}'"
            ))),
        }
    }
}

fn is_script_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(SCRIPT_EXTENSION))
}

impl ScriptLocator for FileScriptLocator {
    fn get_script(&self, name: &str) -> ShellResult<Option<String>> {
        match self.locate(name)? {
            Some(path) => Ok(Some(fs::read_to_string(path)?)),
            None => Ok(None),
        }
    }

    fn get_script_help(&self, name: &str) -> ShellResult<Option<HelpDetails>> {
        match self.get_script(name)? {
            Some(source) => Ok(Some(parse_script_help(&source))),
            None => Ok(None),
        }
    }

    fn get_script_names(&self) -> ShellResult<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if is_script_file(&path) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Reads `^key:value` lines from the top of a script.
pub fn parse_script_help(source: &str) -> HelpDetails {
    let mut details = HelpDetails::default();
    for line in source.lines() {
        let Some(meta) = line.trim().strip_prefix('^') else {
            if line.trim().is_empty() {
                continue;
            }
            break;
        };
        let Some((key, value)) = meta.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim().to_lowercase().as_str() {
            "desc" => details.description = value.to_string(),
            "usage" => details.usage = value.to_string(),
            "comment" => {
                if details.comments.is_empty() {
                    details.comments = value.to_string();
                } else {
                    details.comments = format!("{}\n{value}", details.comments);
                }
            }
            "param" => {
                let (display, description) = value.split_once(' ').unwrap_or((value, ""));
                details.add_parameter(display, description.trim());
            }
            "example" => details.add_example(value, ""),
            other => warn!("unknown script help key '{other}'"),
        }
    }
    details
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_words_parse_and_patch() {
        let mut directives = ExecutionDirectives::standard();
        assert!(directives.is_stop_on_error());
        assert!(!directives.is_echo_off());

        directives.patch(ExecutionDirectives::parse("echooff").unwrap());
        assert!(directives.is_echo_off());
        assert!(directives.is_stop_on_error());

        directives.patch(ExecutionDirectives::parse("continueonerror").unwrap());
        assert!(!directives.is_stop_on_error());

        assert_eq!(ExecutionDirectives::parse("loudly"), None);
    }

    #[test]
    fn help_header_parses() {
        let source = "^desc:Rebuild the news tree\n^usage:rebuild <year>\n^param:year The year\n^example:rebuild 2024\ncd /content\n";
        let details = parse_script_help(source);
        assert_eq!(details.description, "Rebuild the news tree");
        assert_eq!(details.usage, "rebuild <year>");
        assert_eq!(details.parameters, vec![("year".to_string(), "The year".to_string())]);
        assert_eq!(details.examples.len(), 1);
    }

    #[test]
    fn file_locator_finds_scripts_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Greet.tsh"), "echo hello\n").unwrap();
        fs::write(dir.path().join("other.txt"), "ignored\n").unwrap();
        let locator = FileScriptLocator::new(dir.path());

        assert_eq!(
            locator.get_script("greet").unwrap().as_deref(),
            Some("echo hello\n")
        );
        assert_eq!(locator.get_script("missing").unwrap(), None);
        assert_eq!(locator.get_script_names().unwrap(), vec!["Greet"]);
    }

    #[test]
    fn ambiguous_names_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("greet.tsh"), "echo a\n").unwrap();
        fs::write(dir.path().join("GREET.tsh"), "echo b\n").unwrap();
        let locator = FileScriptLocator::new(dir.path());
        assert!(locator.get_script("greet").is_err());
    }

    #[test]
    fn null_locator_knows_nothing() {
        assert_eq!(NullScriptLocator.get_script("x").unwrap(), None);
        assert!(NullScriptLocator.get_script_names().unwrap().is_empty());
    }
}
