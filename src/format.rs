//! Text layout helpers shared by the commands and the help renderer.

use crate::help::HelpDetails;

/// Aligns `name  value` pairs on the widest name.
pub fn definition_list(pairs: &[(String, String)]) -> String {
    let width = pairs.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    pairs
        .iter()
        .map(|(name, value)| format!("{name:<width$}  {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn join_lines(lines: &[String]) -> String {
    lines.join("\n")
}

pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
        .collect()
}

/// Renders one help page. Example syntax lines are expected to be full
/// command lines already.
pub fn help_text(details: &HelpDetails) -> String {
    let mut sections = Vec::new();
    if !details.description.is_empty() {
        sections.push(details.description.clone());
    }
    if !details.usage.is_empty() {
        sections.push(format!("Usage: {}", details.usage));
    }
    if !details.parameters.is_empty() {
        sections.push(format!("Parameters:\n{}", indent(&definition_list(&details.parameters))));
    }
    if !details.comments.is_empty() {
        sections.push(details.comments.clone());
    }
    if !details.examples.is_empty() {
        let examples = details
            .examples
            .iter()
            .map(|(syntax, explanation)| {
                if explanation.is_empty() {
                    syntax.clone()
                } else {
                    format!("{syntax}\n    {explanation}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        sections.push(format!("Examples:\n{}", indent(&examples)));
    }
    sections.join("\n\n")
}

fn indent(text: &str) -> String {
    text.split('\n')
        .map(|l| format!("  {l}"))
        .collect::<Vec<_>>()
        .join("\n")
}
