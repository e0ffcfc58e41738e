//! Prompt rendering. The format string lives in the `prompt` environment
//! variable; `%token%` placeholders expand from session state and the
//! result gets one environment interpolation pass.

use chrono::Local;

use crate::context::{Context, PROMPT_VARIABLE};
use crate::tokenizer::interpolate_variables;

const UNDEFINED: &str = "<undefined>";

/// Renders the session's active prompt format.
pub fn current_prompt(ctx: &Context) -> String {
    let format = ctx.variable(PROMPT_VARIABLE).unwrap_or("> ").to_string();
    evaluate_prompt(ctx, &format)
}

pub fn evaluate_prompt(ctx: &Context, format: &str) -> String {
    let node_name = ctx
        .current_snapshot()
        .map(|s| s.name)
        .unwrap_or_else(|| UNDEFINED.to_string());
    let now = Local::now();
    let rendered = format
        .replace("%path%", &ctx.current_path())
        .replace("%node%", &node_name)
        .replace("%ver%", &ctx.current().version.to_string())
        .replace("%store%", ctx.store())
        .replace("%langcode%", &ctx.current().language)
        .replace("%lang%", &ctx.current().language)
        .replace("%date%", &now.format("%Y-%m-%d").to_string())
        .replace("%time%", &now.format("%H:%M:%S").to_string());
    interpolate_variables(&rendered, ctx.env())
}
