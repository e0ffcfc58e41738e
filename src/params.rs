//! Splits a token stream into parameter buckets.
//!
//! `-name value` is a named parameter, `-name` alone (when declared by the
//! command) is a flag, everything else lands in the positional bucket in
//! order. `\-text` escapes a literal leading dash.

use std::collections::HashMap;

const PARAM_INDICATOR: char = '-';
const ESCAPED_INDICATOR: &str = "\\-";

/// Extraction output. Named keys are stored lowercased so lookups are
/// case-insensitive; flags are named entries with empty values.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractedParams {
    named: HashMap<String, String>,
    pub numbered: Vec<String>,
}

impl ExtractedParams {
    pub fn named(&self, name: &str) -> Option<&str> {
        self.named.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.named.contains_key(&name.to_lowercase())
    }

    pub fn insert_named(&mut self, name: &str, value: impl Into<String>) {
        self.named.insert(name.to_lowercase(), value.into());
    }

    pub fn numbered(&self, index: usize) -> Option<&str> {
        self.numbered.get(index).map(String::as_str)
    }
}

/// Extracts parameters from `tokens`. `flag_names` are the command's
/// declared value-less parameters; they are pulled out first by exact
/// `-name` match so a following token is never mistaken for their value.
pub fn extract_parameters(tokens: &[String], flag_names: &[&str]) -> ExtractedParams {
    let mut out = ExtractedParams::default();
    let mut rest: Vec<Option<String>> = tokens.iter().cloned().map(Some).collect();

    for flag in flag_names {
        let marker = format!("{PARAM_INDICATOR}{flag}");
        if let Some(slot) = rest
            .iter_mut()
            .find(|t| t.as_deref() == Some(marker.as_str()))
        {
            *slot = None;
            out.insert_named(flag, "");
        }
    }

    let mut pending: Option<String> = None;
    for token in rest.into_iter().flatten() {
        if let Some(name) = pending.take() {
            if opens_name(&token) {
                out.insert_named(&name, "");
                pending = Some(token[1..].to_string());
            } else {
                out.insert_named(&name, unescape_dash(&token));
            }
            continue;
        }
        if opens_name(&token) {
            pending = Some(token[1..].to_string());
        } else {
            out.numbered.push(unescape_dash(&token));
        }
    }
    if let Some(name) = pending {
        out.insert_named(&name, "");
    }
    out
}

fn opens_name(token: &str) -> bool {
    token.len() > 1 && token.starts_with(PARAM_INDICATOR) && !token.starts_with(ESCAPED_INDICATOR)
}

fn unescape_dash(token: &str) -> String {
    match token.strip_prefix('\\') {
        Some(rest) if rest.starts_with(PARAM_INDICATOR) => rest.to_string(),
        _ => token.to_string(),
    }
}

/// True when `-name` appears as its own token.
pub fn has_parameter(tokens: &[String], name: &str) -> bool {
    let marker = format!("{PARAM_INDICATOR}{name}");
    tokens.iter().any(|t| *t == marker)
}

/// Finds `-name` in `tokens` and returns the `word_count` value tokens
/// that follow it, boundaries intact so a grouped value keeps its spaces.
/// `None` when the marker is absent or too few tokens follow it.
pub fn get_parameter_parts(
    tokens: &[String],
    name: &str,
    word_count: usize,
) -> Option<Vec<String>> {
    let marker = format!("{PARAM_INDICATOR}{name}");
    let ind = tokens.iter().position(|t| *t == marker)?;
    if ind + word_count >= tokens.len() {
        return None;
    }
    Some(tokens[ind + 1..=ind + word_count].to_vec())
}

/// Joins the `word_count` tokens after `-name` with spaces. Used for
/// multi-word named parameters before the general extraction pass runs.
pub fn get_parameter(tokens: &[String], name: &str, word_count: usize) -> Option<String> {
    get_parameter_parts(tokens, name, word_count).map(|parts| parts.join(" "))
}

/// Removes `-name` and its `word_count` value tokens from `tokens`.
pub fn remove_parameter(tokens: &mut Vec<String>, name: &str, word_count: usize) {
    let marker = format!("{PARAM_INDICATOR}{name}");
    if let Some(ind) = tokens.iter().position(|t| *t == marker) {
        let end = (ind + word_count + 1).min(tokens.len());
        tokens.drain(ind..end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn buckets_named_flags_and_positionals() {
        let params = extract_parameters(&toks("x -a 1 -b -c 2 d"), &["b"]);
        assert_eq!(params.named("a"), Some("1"));
        assert!(params.contains("b"));
        assert_eq!(params.named("b"), Some(""));
        assert_eq!(params.named("c"), Some("2"));
        assert_eq!(params.numbered, vec!["x", "d"]);
    }

    #[test]
    fn undeclared_dash_pair_still_resolves() {
        let params = extract_parameters(&toks("x -a 1 -b -c 2 d"), &[]);
        assert_eq!(params.named("a"), Some("1"));
        assert_eq!(params.named("b"), Some(""));
        assert_eq!(params.named("c"), Some("2"));
        assert_eq!(params.numbered, vec!["x", "d"]);
    }

    #[test]
    fn trailing_name_gets_empty_value() {
        let params = extract_parameters(&toks("a -flag"), &[]);
        assert_eq!(params.named("flag"), Some(""));
        assert_eq!(params.numbered, vec!["a"]);
    }

    #[test]
    fn named_lookup_is_case_insensitive() {
        let params = extract_parameters(&toks("-Name value"), &[]);
        assert_eq!(params.named("name"), Some("value"));
        assert_eq!(params.named("NAME"), Some("value"));
    }

    #[test]
    fn escaped_dash_is_a_literal_value() {
        let params = extract_parameters(&toks(r"\-lorem -a \-ipsum"), &[]);
        assert_eq!(params.numbered, vec!["-lorem"]);
        assert_eq!(params.named("a"), Some("-ipsum"));
    }

    #[test]
    fn lone_dash_is_positional() {
        let params = extract_parameters(&toks("a - b"), &[]);
        assert_eq!(params.numbered, vec!["a", "-", "b"]);
    }

    #[test]
    fn multi_word_parameter_roundtrip() {
        let mut tokens = toks("find -f title lorem ipsum cmd");
        assert_eq!(
            get_parameter(&tokens, "f", 2),
            Some("title lorem".to_string())
        );
        remove_parameter(&mut tokens, "f", 2);
        assert_eq!(tokens, toks("find ipsum cmd"));
    }

    #[test]
    fn parts_keep_token_boundaries() {
        let tokens = vec![
            "-f".to_string(),
            "title".to_string(),
            "a page for .*".to_string(),
        ];
        assert_eq!(
            get_parameter_parts(&tokens, "f", 2),
            Some(vec!["title".to_string(), "a page for .*".to_string()])
        );
        assert!(has_parameter(&tokens, "f"));
        assert!(!has_parameter(&tokens, "F"));
    }

    #[test]
    fn missing_multi_word_parameter() {
        let tokens = toks("find -f title");
        assert_eq!(get_parameter(&tokens, "f", 2), None);
        assert_eq!(get_parameter(&tokens, "x", 1), None);
    }
}
