//! Cocoa coordinate strings.
//!
//! OmniGraffle serializes points as `{x, y}` and rectangles as
//! `{{x, y}, {width, height}}` (the `NSStringFromRect` format). The parsers
//! here accept any brace nesting and flatten it to a list of numbers.
//!
//! # Example
//!
//! ```
//! # use graffle_parser::coords;
//! let rect = coords::parse_rect("{{103.5, 155}, {72, 36}}").unwrap();
//! assert_eq!(rect, [103.5, 155.0, 72.0, 36.0]);
//!
//! let point = coords::parse_point("{-0.5, 0.25}").unwrap();
//! assert_eq!(point, (-0.5, 0.25));
//! ```

use winnow::{
    Parser as _,
    ascii::{float, multispace0},
    combinator::{alt, delimited, separated},
    error::{ContextError, ErrMode},
};

use crate::error::{ParseError, Result};

type IResult<O> = std::result::Result<O, ErrMode<ContextError>>;

/// Deepest brace nesting accepted by [`parse_numbers`].
pub const MAX_NESTING: usize = 32;

/// Parses a coordinate string into its numbers, in reading order.
///
/// # Errors
///
/// Returns [`ParseError::InvalidCoordinates`] when the string is not a
/// brace-delimited, comma-separated list of numbers, or when braces nest
/// deeper than [`MAX_NESTING`].
pub fn parse_numbers(input: &str) -> Result<Vec<f32>> {
    let mut remaining = input;
    let numbers = delimited(multispace0, |i: &mut &str| group(i, 1), multispace0)
        .parse_next(&mut remaining)
        .map_err(|err| match err {
            ErrMode::Cut(_) => invalid(input, "braces nested too deeply"),
            _ => invalid(input, "expected `{` followed by numbers"),
        })?;

    if !remaining.is_empty() {
        return Err(invalid(input, "unexpected trailing characters"));
    }
    Ok(numbers)
}

/// Parses a `{x, y}` point.
pub fn parse_point(input: &str) -> Result<(f32, f32)> {
    match parse_numbers(input)?.as_slice() {
        [x, y] => Ok((*x, *y)),
        other => Err(invalid(
            input,
            &format!("expected 2 numbers, found {}", other.len()),
        )),
    }
}

/// Parses a `{{x, y}, {width, height}}` rectangle into `[x, y, width, height]`.
pub fn parse_rect(input: &str) -> Result<[f32; 4]> {
    match parse_numbers(input)?.as_slice() {
        [x, y, width, height] => Ok([*x, *y, *width, *height]),
        other => Err(invalid(
            input,
            &format!("expected 4 numbers, found {}", other.len()),
        )),
    }
}

fn group(input: &mut &str, depth: usize) -> IResult<Vec<f32>> {
    if depth > MAX_NESTING {
        return Err(ErrMode::Cut(ContextError::new()));
    }
    let items: Vec<Vec<f32>> = delimited(
        ('{', multispace0),
        separated(
            0..,
            |i: &mut &str| item(i, depth),
            (multispace0, ',', multispace0),
        ),
        (multispace0, '}'),
    )
    .parse_next(input)?;
    Ok(items.into_iter().flatten().collect())
}

fn item(input: &mut &str, depth: usize) -> IResult<Vec<f32>> {
    alt((
        |i: &mut &str| group(i, depth + 1),
        number.map(|n| vec![n]),
    ))
    .parse_next(input)
}

fn number(input: &mut &str) -> IResult<f32> {
    float.parse_next(input)
}

fn invalid(input: &str, reason: &str) -> ParseError {
    ParseError::InvalidCoordinates {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("{0, 1}").unwrap(), (0.0, 1.0));
        assert_eq!(parse_point("{-0.5,0.5}").unwrap(), (-0.5, 0.5));
        assert_eq!(parse_point("  { 12.25 , -3 }  ").unwrap(), (12.25, -3.0));
    }

    #[test]
    fn test_parse_point_exponent() {
        let (x, y) = parse_point("{1e-05, 2E2}").unwrap();
        assert!((x - 0.00001).abs() < 1e-9);
        assert_eq!(y, 200.0);
    }

    #[test]
    fn test_parse_rect() {
        assert_eq!(
            parse_rect("{{0, 0}, {10, 20}}").unwrap(),
            [0.0, 0.0, 10.0, 20.0]
        );
    }

    #[test]
    fn test_parse_numbers_flattens_nesting() {
        assert_eq!(
            parse_numbers("{{1, 2}, 3, {{4}}}").unwrap(),
            vec![1.0, 2.0, 3.0, 4.0]
        );
        assert!(parse_numbers("{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_point_wrong_arity() {
        let err = parse_point("{1, 2, 3}").unwrap_err();
        assert!(err.to_string().contains("expected 2 numbers, found 3"));
    }

    #[test]
    fn test_parse_rect_wrong_arity() {
        assert!(parse_rect("{1, 2}").is_err());
    }

    #[test]
    fn test_parse_numbers_rejects_garbage() {
        assert!(parse_numbers("").is_err());
        assert!(parse_numbers("1, 2").is_err());
        assert!(parse_numbers("{1, two}").is_err());
        assert!(parse_numbers("{1, 2").is_err());
        assert!(parse_numbers("{1, 2} extra").is_err());
    }

    #[test]
    fn test_parse_numbers_rejects_deep_nesting() {
        let text = "{".repeat(200_000);
        let err = parse_numbers(&text).unwrap_err();
        assert!(matches!(err, ParseError::InvalidCoordinates { .. }));
        assert!(err.to_string().contains("nested too deeply"));

        let text = format!("{}1{}", "{".repeat(200_000), "}".repeat(200_000));
        assert!(parse_numbers(&text).is_err());
    }

    #[test]
    fn test_parse_numbers_accepts_nesting_at_limit() {
        let text = format!("{}7{}", "{".repeat(MAX_NESTING), "}".repeat(MAX_NESTING));
        assert_eq!(parse_numbers(&text).unwrap(), vec![7.0]);

        let text = format!(
            "{}7{}",
            "{".repeat(MAX_NESTING + 1),
            "}".repeat(MAX_NESTING + 1)
        );
        assert!(parse_numbers(&text).is_err());
    }

    mod proptests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn rect_strings_parse_back(
                x in -10_000i32..10_000,
                y in -10_000i32..10_000,
                width in 0i32..5_000,
                height in 0i32..5_000,
                spaced in any::<bool>(),
            ) {
                let text = if spaced {
                    format!("{{ {{{x}, {y}}} , {{{width},{height}}} }}")
                } else {
                    format!("{{{{{x}, {y}}}, {{{width}, {height}}}}}")
                };
                let rect = parse_rect(&text).unwrap();
                prop_assert_eq!(rect, [x as f32, y as f32, width as f32, height as f32]);
            }

            #[test]
            fn parse_numbers_never_panics(text in "\\PC{0,40}") {
                let _ = parse_numbers(&text);
            }
        }
    }
}
