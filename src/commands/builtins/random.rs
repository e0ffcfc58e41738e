use uuid::Uuid;

use crate::binder::ParamSpec;
use crate::commands::Command;
use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::help::HelpDetails;
use crate::result::CommandResult;

/// `random`: a random integer in `[min, max)`, or a fixed-point decimal
/// on the same interval with `-f`.
#[derive(Default)]
pub struct RandomNumber {
    max: String,
    min: String,
    fraction_digits: String,
}

static PARAMS: &[ParamSpec<RandomNumber>] = &[
    ParamSpec::numbered(0, "max", "The maximum allowed value, exclusive", |c, v| {
        c.max = v.into_text()
    }),
    ParamSpec::numbered(1, "min", "The minimum allowed value", |c, v| {
        c.min = v.into_text()
    }),
    ParamSpec::named("f", 1, "fractions", "The number of fractional digits", |c, v| {
        c.fraction_digits = v.into_text()
    }),
];

impl Command for RandomNumber {
    const NAME: &'static str = "random";
    const DESCRIPTION: &'static str = "Generates random numbers";

    fn params() -> &'static [ParamSpec<Self>] {
        PARAMS
    }

    fn run(&mut self, _ctx: &mut Context, _shell: &mut Dispatcher) -> CommandResult {
        let max: i32 = match parse_bound(&self.max, 10) {
            Ok(max) => max,
            Err(_) => {
                return CommandResult::failure(format!(
                    "Cannot parse '{}' as integer for parameter 'max'",
                    self.max
                ));
            }
        };
        let min: i32 = match parse_bound(&self.min, 0) {
            Ok(min) => min,
            Err(_) => {
                return CommandResult::failure(format!(
                    "Cannot parse '{}' as integer for parameter 'min'",
                    self.min
                ));
            }
        };
        let digits: u32 = match parse_bound(&self.fraction_digits, 0) {
            Ok(digits) if digits <= 9 => digits,
            _ => {
                return CommandResult::failure(format!(
                    "Cannot parse '{}' as a digit count for parameter 'f'",
                    self.fraction_digits
                ));
            }
        };
        if max <= min {
            return CommandResult::failure("Parameter 'max' must be greater than 'min'");
        }

        let span = (max as i64) - (min as i64);
        if digits == 0 {
            let value = min as i64 + draw_below(span as u64) as i64;
            return CommandResult::success(value.to_string());
        }

        let scale = 10i64.pow(digits);
        let units = (min as i64) * scale + draw_below((span * scale) as u64) as i64;
        CommandResult::success(render_fixed(units, scale, digits as usize))
    }

    fn extra_help(details: &mut HelpDetails) {
        details.add_example("random 10", "An integer from 0 to 9");
        details.add_example("random 50 10", "An integer from 10 to 49");
        details.add_example("random 2 -f 2", "A decimal such as 1.37");
    }
}

fn parse_bound<T: std::str::FromStr>(text: &str, fallback: T) -> Result<T, ()> {
    if text.is_empty() {
        return Ok(fallback);
    }
    text.parse().map_err(|_| ())
}

/// Uniform draw in `[0, span)`, fed from version-4 id entropy.
fn draw_below(span: u64) -> u64 {
    (Uuid::new_v4().as_u128() % span as u128) as u64
}

/// Renders scaled units as a decimal with a fixed digit count.
fn render_fixed(units: i64, scale: i64, digits: usize) -> String {
    let sign = if units < 0 { "-" } else { "" };
    let magnitude = units.unsigned_abs();
    let whole = magnitude / scale as u64;
    let fraction = magnitude % scale as u64;
    format!("{sign}{whole}.{fraction:0digits$}")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::script::NullScriptLocator;
    use crate::store::memory::sample_repository;

    fn session() -> (Context, Dispatcher) {
        let ctx = Context::new(Arc::new(sample_repository()), "master").unwrap();
        (ctx, Dispatcher::new(Box::new(NullScriptLocator)))
    }

    #[test]
    fn defaults_stay_below_ten() {
        let (mut ctx, mut shell) = session();
        for _ in 0..20 {
            let res = shell.execute(&mut ctx, "random");
            let value: i64 = res.message.parse().unwrap();
            assert!((0..10).contains(&value), "{value}");
        }
    }

    #[test]
    fn bounds_are_honored() {
        let (mut ctx, mut shell) = session();
        for _ in 0..20 {
            let res = shell.execute(&mut ctx, "random 50 10");
            let value: i64 = res.message.parse().unwrap();
            assert!((10..50).contains(&value), "{value}");
        }
    }

    #[test]
    fn fraction_digits_shape_the_output() {
        let (mut ctx, mut shell) = session();
        for _ in 0..20 {
            let res = shell.execute(&mut ctx, "random 2 -f 2");
            let (whole, fraction) = res.message.split_once('.').unwrap();
            assert!(whole == "0" || whole == "1", "{}", res.message);
            assert_eq!(fraction.len(), 2);
        }
    }

    #[test]
    fn unparsable_bounds_are_reported() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "random ten");
        assert!(res.is_failure());
        assert_eq!(res.message, "Cannot parse 'ten' as integer for parameter 'max'");
        let res = shell.execute(&mut ctx, "random 10 zero");
        assert_eq!(res.message, "Cannot parse 'zero' as integer for parameter 'min'");
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let (mut ctx, mut shell) = session();
        let res = shell.execute(&mut ctx, "random 5 9");
        assert!(res.is_failure());
        assert_eq!(res.message, "Parameter 'max' must be greater than 'min'");
    }

    #[test]
    fn fixed_point_rendering_pads_and_signs() {
        assert_eq!(render_fixed(137, 100, 2), "1.37");
        assert_eq!(render_fixed(5, 100, 2), "0.05");
        assert_eq!(render_fixed(-150, 100, 2), "-1.50");
    }
}
