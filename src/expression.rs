//! Boolean expression evaluation for `if` and `find -e`.
//!
//! Expressions are conjunctions/disjunctions of single comparisons:
//! `and` binds tighter than `or`, and every term is evaluated so operand
//! errors surface no matter where the boolean outcome was already decided.
//! A single comparison has 1, 2, 3, 5 or 7 elements:
//!
//! ```text
//! true
//! not (<expression>) | isempty <operand> | isbound <name>
//! <operand> <op> <operand> [as number|date|string] [with flag,flag]
//! ```
//!
//! Operands: `@field` reads the current node's field, `@@attr` a node
//! attribute, a parenthesized group is literal text, anything else is the
//! bare token. Failures are [`ExpressionError`]s, never boolean results.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::context::Context;
use crate::errors::ExpressionError;
use crate::inspector;
use crate::tokenizer::try_parse_boolean;

/// How the evaluator checks `isbound` names against the dispatcher's
/// command, custom-binding and alias tables.
pub trait BindingLookup {
    fn is_bound(&self, name: &str) -> bool;
}

/// Lookup that knows no bindings; handy where no dispatcher is in play.
pub struct NoBindings;

impl BindingLookup for NoBindings {
    fn is_bound(&self, _name: &str) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Unit {
    Word(String),
    Group(String),
}

impl Unit {
    fn text(&self) -> &str {
        match self {
            Unit::Word(t) | Unit::Group(t) => t,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComparisonType {
    Text,
    Number,
    Date,
}

pub fn evaluate_expression(
    ctx: &Context,
    bindings: &dyn BindingLookup,
    expression: &str,
) -> Result<bool, ExpressionError> {
    let units = split_units(expression);
    let mut value = false;
    for or_term in split_keyword(&units, "or") {
        let mut conjunction = true;
        for and_term in split_keyword(&or_term, "and") {
            if and_term.is_empty() {
                return Err(ExpressionError::malformed());
            }
            let parts: Vec<String> = and_term.iter().map(|u| u.text().to_string()).collect();
            conjunction &= evaluate_single(ctx, bindings, &parts)?;
        }
        value |= conjunction;
    }
    Ok(value)
}

fn evaluate_single(
    ctx: &Context,
    bindings: &dyn BindingLookup,
    parts: &[String],
) -> Result<bool, ExpressionError> {
    match parts.len() {
        1 => try_parse_boolean(&parts[0]).ok_or_else(|| {
            ExpressionError::new(format!("Unrecognised boolean value '{}'", parts[0]))
        }),
        2 => match parts[0].as_str() {
            "not" => Ok(!evaluate_expression(ctx, bindings, &parts[1])?),
            "isempty" => Ok(resolve_operand(ctx, &parts[1])?.is_empty()),
            "isbound" => Ok(bindings.is_bound(&parts[1])),
            _ => Err(ExpressionError::malformed()),
        },
        3 | 5 | 7 => evaluate_comparison(ctx, parts),
        _ => Err(ExpressionError::malformed()),
    }
}

fn evaluate_comparison(ctx: &Context, parts: &[String]) -> Result<bool, ExpressionError> {
    let left = resolve_operand(ctx, &parts[0])?;
    let op = parts[1].as_str();
    let right = resolve_operand(ctx, &parts[2])?;

    let mut ctype = ComparisonType::Text;
    let mut flags: Vec<String> = Vec::new();
    match parts.len() {
        3 => {}
        5 => match parts[3].as_str() {
            "as" => ctype = parse_type(&parts[4])?,
            "with" => flags = parse_flags(&parts[4]),
            _ => return Err(ExpressionError::malformed()),
        },
        7 => {
            if parts[3] != "as" || parts[5] != "with" {
                return Err(ExpressionError::malformed());
            }
            ctype = parse_type(&parts[4])?;
            flags = parse_flags(&parts[6]);
        }
        _ => return Err(ExpressionError::malformed()),
    }

    match ctype {
        ComparisonType::Number => compare_numbers(&left, op, &right, &flags),
        ComparisonType::Date => compare_dates(&left, op, &right, &flags),
        ComparisonType::Text => compare_text(&left, op, &right, &flags),
    }
}

fn resolve_operand(ctx: &Context, text: &str) -> Result<String, ExpressionError> {
    if let Some(attr) = text.strip_prefix("@@") {
        inspector::attribute(ctx, attr)
            .ok_or_else(|| ExpressionError::new(format!("Unknown attribute '{attr}'")))
    } else if let Some(field) = text.strip_prefix('@') {
        Ok(ctx
            .repo()
            .field(ctx.store(), ctx.current(), field)
            .unwrap_or_default())
    } else {
        Ok(text.to_string())
    }
}

fn parse_type(text: &str) -> Result<ComparisonType, ExpressionError> {
    match text {
        "number" => Ok(ComparisonType::Number),
        "date" => Ok(ComparisonType::Date),
        "string" => Ok(ComparisonType::Text),
        other => Err(ExpressionError::new(format!(
            "Unknown comparison type '{other}'"
        ))),
    }
}

fn parse_flags(text: &str) -> Vec<String> {
    text.split(',')
        .map(|f| f.trim().to_lowercase())
        .filter(|f| !f.is_empty())
        .collect()
}

fn compare_numbers(
    left: &str,
    op: &str,
    right: &str,
    flags: &[String],
) -> Result<bool, ExpressionError> {
    for flag in flags {
        if !matches!(flag.as_str(), "ignoredecimal" | "ceiling" | "floor" | "round") {
            return Err(unknown_flag(flag));
        }
    }
    if left.is_empty() || right.is_empty() {
        return Ok(false);
    }
    let mut l = parse_number(left)?;
    let mut r = parse_number(right)?;
    for flag in flags {
        let apply = match flag.as_str() {
            "ignoredecimal" => f64::trunc,
            "ceiling" => f64::ceil,
            "floor" => f64::floor,
            _ => f64::round,
        };
        l = apply(l);
        r = apply(r);
    }
    relational(op, l.partial_cmp(&r)).ok_or_else(|| invalid_op(op, "number"))
}

fn compare_dates(
    left: &str,
    op: &str,
    right: &str,
    flags: &[String],
) -> Result<bool, ExpressionError> {
    if let Some(flag) = flags.first() {
        return Err(unknown_flag(flag));
    }
    if left.is_empty() || right.is_empty() {
        return Ok(false);
    }
    let l = parse_date(left).ok_or_else(|| ExpressionError::new(format!("{left} is not a date")))?;
    let r =
        parse_date(right).ok_or_else(|| ExpressionError::new(format!("{right} is not a date")))?;
    relational(op, l.partial_cmp(&r)).ok_or_else(|| invalid_op(op, "date"))
}

fn compare_text(
    left: &str,
    op: &str,
    right: &str,
    flags: &[String],
) -> Result<bool, ExpressionError> {
    let mut ignore_case = false;
    for flag in flags {
        if flag == "ignorecase" {
            ignore_case = true;
        } else {
            return Err(unknown_flag(flag));
        }
    }
    let (l, r) = if ignore_case {
        (left.to_lowercase(), right.to_lowercase())
    } else {
        (left.to_string(), right.to_string())
    };
    match op {
        "=" => Ok(l == r),
        "!=" => Ok(l != r),
        "<" => Ok(l < r),
        "<=" => Ok(l <= r),
        ">" => Ok(l > r),
        ">=" => Ok(l >= r),
        "[" => Ok(l.starts_with(&r)),
        "]" => Ok(l.ends_with(&r)),
        "?" => Ok(l.contains(&r)),
        "!?" => Ok(!l.contains(&r)),
        other => Err(ExpressionError::new(format!("Unknown operator '{other}'"))),
    }
}

fn relational(op: &str, ordering: Option<std::cmp::Ordering>) -> Option<bool> {
    use std::cmp::Ordering::*;
    let ord = ordering?;
    match op {
        "=" => Some(ord == Equal),
        "!=" => Some(ord != Equal),
        "<" => Some(ord == Less),
        "<=" => Some(ord != Greater),
        ">" => Some(ord == Greater),
        ">=" => Some(ord != Less),
        _ => None,
    }
}

fn parse_number(text: &str) -> Result<f64, ExpressionError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| ExpressionError::new(format!("{text} is not a number")))
}

fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    None
}

fn unknown_flag(flag: &str) -> ExpressionError {
    ExpressionError::new(format!("Unknown or incompatible modifier flag '{flag}'"))
}

fn invalid_op(op: &str, kind: &str) -> ExpressionError {
    ExpressionError::new(format!("Operator '{op}' is not valid for {kind} comparison"))
}

/// Splits the expression into words and parenthesized groups, depth-aware.
/// A dangling open degrades to whitespace splitting like the tokenizer.
fn split_units(expression: &str) -> Vec<Unit> {
    let mut units = Vec::new();
    let mut word = String::new();
    let mut group = String::new();
    let mut depth = 0usize;
    for ch in expression.chars() {
        if depth == 0 {
            if ch.is_whitespace() {
                if !word.is_empty() {
                    units.push(Unit::Word(std::mem::take(&mut word)));
                }
            } else if ch == '(' {
                if !word.is_empty() {
                    units.push(Unit::Word(std::mem::take(&mut word)));
                }
                depth = 1;
            } else {
                word.push(ch);
            }
        } else if ch == '(' {
            depth += 1;
            group.push(ch);
        } else if ch == ')' {
            depth -= 1;
            if depth == 0 {
                units.push(Unit::Group(group.trim().to_string()));
                group.clear();
            } else {
                group.push(ch);
            }
        } else {
            group.push(ch);
        }
    }
    if depth > 0 {
        units.extend(group.split_whitespace().map(|w| Unit::Word(w.to_string())));
    } else if !word.is_empty() {
        units.push(Unit::Word(word));
    }
    units
}

/// Splits `units` on top-level keyword words. Group elements never match,
/// so `(and)` stays literal text.
fn split_keyword(units: &[Unit], keyword: &str) -> Vec<Vec<Unit>> {
    let mut out = vec![Vec::new()];
    for unit in units {
        if matches!(unit, Unit::Word(w) if w == keyword) {
            out.push(Vec::new());
        } else if let Some(term) = out.last_mut() {
            term.push(unit.clone());
        }
    }
    out
}
