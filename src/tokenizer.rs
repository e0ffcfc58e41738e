//! Turns raw command-line text into tokens.
//!
//! The grammar is whitespace-separated words plus parenthesized groups: a
//! top-level `( .. )` span becomes a single token holding the trimmed
//! interior, nested delimiters intact. Malformed input never errors; the
//! parser degrades to whitespace splitting for whatever it cannot pair up.

use std::collections::BTreeMap;

pub const ESCAPE: char = '\\';
pub const GROUP_OPEN: char = '(';
pub const GROUP_CLOSE: char = ')';
pub const SUBINVOKE_MARKER: &str = "<";
pub const CHAIN_SEPARATOR: &str = ">";
pub const VAR_MARKER: char = '$';
pub const SCRIPT_COMMENT: &str = "#";
pub const SCRIPT_DIRECTIVE: &str = "@";
pub const LINE_CONTINUATION: &str = "-";
/// Environment variable holding the previous stage's output in a chain.
pub const CHAINED_VALUE_VAR: &str = "~";

/// Splits `input` into top-level tokens using `open`/`close` as group
/// delimiters. Ungrouped text splits on whitespace; each balanced top-level
/// group contributes one token (its trimmed interior). No escape handling;
/// this is the raw primitive the expression evaluator also uses.
///
/// Recovery: a dangling `open` whitespace-splits the remaining text after
/// it; a `close` at depth zero is literal text.
pub fn parse_first_level_groups(input: &str, open: char, close: char) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    let mut group = String::new();
    let mut depth = 0usize;

    for ch in input.chars() {
        if depth == 0 {
            if ch.is_whitespace() {
                flush_word(&mut tokens, &mut word);
            } else if ch == open {
                flush_word(&mut tokens, &mut word);
                depth = 1;
            } else {
                word.push(ch);
            }
        } else {
            if ch == open {
                depth += 1;
                group.push(ch);
            } else if ch == close {
                depth -= 1;
                if depth == 0 {
                    tokens.push(group.trim().to_string());
                    group.clear();
                } else {
                    group.push(ch);
                }
            } else {
                group.push(ch);
            }
        }
    }

    if depth > 0 {
        // Unbalanced group: fall back to whitespace-splitting its content.
        tokens.extend(group.split_whitespace().map(str::to_string));
    } else {
        flush_word(&mut tokens, &mut word);
    }
    tokens
}

/// Tokenizes one input line with escape handling.
///
/// At depth zero `\(` and `\)` contribute a literal parenthesis to the
/// current token; `\<` and `\>` keep their backslash so the dispatcher can
/// tell escaped markers from real ones (it strips them after marker
/// scanning). Inside a group every escape pair is copied verbatim, so the
/// group body re-parses identically when dispatched as a sub-invocation.
pub fn parse_input_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    let mut group = String::new();
    let mut depth = 0usize;
    let mut chars = line.trim().chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == ESCAPE {
            match chars.peek().copied() {
                Some(next) if next == GROUP_OPEN || next == GROUP_CLOSE => {
                    chars.next();
                    if depth == 0 {
                        word.push(next);
                    } else {
                        group.push(ESCAPE);
                        group.push(next);
                    }
                }
                Some(next) => {
                    chars.next();
                    let target = if depth == 0 { &mut word } else { &mut group };
                    target.push(ESCAPE);
                    target.push(next);
                }
                None => {
                    let target = if depth == 0 { &mut word } else { &mut group };
                    target.push(ESCAPE);
                }
            }
            continue;
        }

        if depth == 0 {
            if ch.is_whitespace() {
                flush_word(&mut tokens, &mut word);
            } else if ch == GROUP_OPEN {
                flush_word(&mut tokens, &mut word);
                depth = 1;
            } else {
                word.push(ch);
            }
        } else {
            if ch == GROUP_OPEN {
                depth += 1;
                group.push(ch);
            } else if ch == GROUP_CLOSE {
                depth -= 1;
                if depth == 0 {
                    tokens.push(group.trim().to_string());
                    group.clear();
                } else {
                    group.push(ch);
                }
            } else {
                group.push(ch);
            }
        }
    }

    if depth > 0 {
        tokens.extend(group.split_whitespace().map(str::to_string));
    } else {
        flush_word(&mut tokens, &mut word);
    }
    tokens
}

fn flush_word(tokens: &mut Vec<String>, word: &mut String) {
    if !word.is_empty() {
        tokens.push(std::mem::take(word));
    }
}

/// Replaces `$name$` with the variable's value for every name present in
/// `env`; unknown names stay verbatim. Afterwards `\$` unescapes to `$`.
pub fn interpolate_variables(text: &str, env: &BTreeMap<String, String>) -> String {
    let mut out = text.to_string();
    for (key, value) in env {
        let marker = format!("{VAR_MARKER}{key}{VAR_MARKER}");
        if out.contains(&marker) {
            out = out.replace(&marker, value);
        }
    }
    out.replace(&format!("{ESCAPE}{VAR_MARKER}"), &VAR_MARKER.to_string())
}

/// Splits a line into chain stages at each standalone top-level `>`.
/// The separator only counts between whitespace (or a line edge), outside
/// any group and not escaped; everything else passes through so each
/// stage re-parses exactly as written.
pub fn split_chain_stages(line: &str) -> Vec<String> {
    let mut stages = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut boundary = true;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == ESCAPE {
            current.push(ESCAPE);
            if let Some(next) = chars.next() {
                current.push(next);
            }
            boundary = false;
            continue;
        }
        if depth == 0
            && ch == '>'
            && boundary
            && chars.peek().is_none_or(|c| c.is_whitespace())
        {
            stages.push(std::mem::take(&mut current).trim().to_string());
            boundary = true;
            continue;
        }
        if ch == GROUP_OPEN {
            depth += 1;
        } else if ch == GROUP_CLOSE {
            depth = depth.saturating_sub(1);
        }
        boundary = ch.is_whitespace();
        current.push(ch);
    }
    stages.push(current.trim().to_string());
    stages
}

/// Lenient boolean parse: `true`/`yes`/`y`/`1` and `false`/`no`/`n`/`0`
/// (or empty), case-insensitive. Anything else is `None`.
pub fn try_parse_boolean(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" | "" => Some(false),
        _ => None,
    }
}

/// Splits script source into logical lines. A line ending in an unescaped
/// `-` joins with the following line; `\-` at the end keeps a literal
/// trailing dash. Joining runs bottom-up so continuations cascade.
pub fn parse_script_lines(source: &str) -> Vec<String> {
    let mut lines: Vec<String> = source
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
        .collect();

    let escaped_end = format!("{ESCAPE}{LINE_CONTINUATION}");
    let mut i = lines.len();
    while i > 0 {
        i -= 1;
        let line = lines[i].clone();
        if line.ends_with(&escaped_end) {
            let kept = format!("{}{}", &line[..line.len() - escaped_end.len()], LINE_CONTINUATION);
            lines[i] = kept;
        } else if line.ends_with(LINE_CONTINUATION) && i + 1 < lines.len() {
            let next = lines.remove(i + 1);
            lines[i] = format!("{}{}", &line[..line.len() - LINE_CONTINUATION.len()], next);
        }
    }
    lines
}

/// Strips the escape from `\<` and `\>` once marker scanning is done.
pub fn unescape_markers(token: &str) -> String {
    token
        .replace(&format!("{ESCAPE}{SUBINVOKE_MARKER}"), SUBINVOKE_MARKER)
        .replace(&format!("{ESCAPE}{CHAIN_SEPARATOR}"), CHAIN_SEPARATOR)
}
