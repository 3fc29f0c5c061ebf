//! Safe arithmetic evaluator for quantity expressions
//!
//! Surveyors enter quantities as free-text arithmetic (`3x4`, `2.5*(1+2)`).
//! The evaluator normalizes multiplication glyphs, enforces a strict
//! character whitelist, and then parses with a recursive-descent grammar
//! limited to decimal literals, `+ - * /`, and parentheses. User text is
//! never routed through any general evaluation facility.

use nom::{
    branch::alt,
    character::complete::{char, digit0, digit1, one_of},
    combinator::{all_consuming, map, map_res, opt, recognize},
    multi::fold_many0,
    sequence::{delimited, pair, preceded},
    IResult,
};

/// Outcome of evaluating a quantity expression.
///
/// Callers must only commit `value` when `ok` is true; on rejection the
/// previously stored value stays in force.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub ok: bool,
    pub value: f64,
}

impl Evaluation {
    fn accepted(value: f64) -> Self {
        Self { ok: true, value }
    }

    fn rejected() -> Self {
        Self {
            ok: false,
            value: 0.0,
        }
    }
}

/// Evaluate a free-text quantity expression.
///
/// Empty input (after whitespace stripping) is a valid expression with
/// value zero. Any character outside `[0-9+\-*/().]` after normalization,
/// any parse failure, or a non-finite result rejects.
pub fn evaluate(raw: &str) -> Evaluation {
    let cleaned = normalize(raw);
    if cleaned.is_empty() {
        return Evaluation::accepted(0.0);
    }
    // Sole barrier between user text and the parser; never widened.
    if !cleaned.bytes().all(is_allowed) {
        return Evaluation::rejected();
    }
    let parsed = all_consuming(expr)(cleaned.as_str());
    match parsed {
        Ok((_, value)) if value.is_finite() => Evaluation::accepted(value),
        _ => Evaluation::rejected(),
    }
}

/// Treat the multiplication glyph and the letters `x`/`X` as `*`, and
/// strip all whitespace.
fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '\u{00d7}' | 'x' | 'X' => '*',
            other => other,
        })
        .collect()
}

fn is_allowed(b: u8) -> bool {
    b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'*' | b'/' | b'(' | b')' | b'.')
}

// Grammar, lowest precedence first:
//   expr   := term (('+' | '-') term)*
//   term   := factor (('*' | '/') factor)*
//   factor := number | '(' expr ')' | ('+' | '-') factor

fn expr(input: &str) -> IResult<&str, f64> {
    let (input, init) = term(input)?;
    fold_many0(
        pair(one_of("+-"), term),
        move || init,
        |acc, (op, rhs)| if op == '+' { acc + rhs } else { acc - rhs },
    )(input)
}

fn term(input: &str) -> IResult<&str, f64> {
    let (input, init) = factor(input)?;
    fold_many0(
        pair(one_of("*/"), factor),
        move || init,
        |acc, (op, rhs)| if op == '*' { acc * rhs } else { acc / rhs },
    )(input)
}

fn factor(input: &str) -> IResult<&str, f64> {
    alt((
        number,
        delimited(char('('), expr, char(')')),
        map(preceded(char('-'), factor), |v| -v),
        map(preceded(char('+'), factor), |v| v),
    ))(input)
}

/// Decimal literal: `12`, `12.5`, `12.`, or `.5`.
fn number(input: &str) -> IResult<&str, f64> {
    map_res(
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
        str::parse::<f64>,
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of(raw: &str) -> f64 {
        let result = evaluate(raw);
        assert!(result.ok, "expected {raw:?} to evaluate");
        result.value
    }

    fn rejects(raw: &str) {
        let result = evaluate(raw);
        assert!(!result.ok, "expected {raw:?} to be rejected");
        assert_eq!(result.value, 0.0);
    }

    #[test]
    fn standard_precedence() {
        assert_eq!(value_of("2+3*4"), 14.0);
        assert_eq!(value_of("(2+3)*4"), 20.0);
        assert_eq!(value_of("10-4/2"), 8.0);
        assert_eq!(value_of("2*3+4*5"), 26.0);
    }

    #[test]
    fn multiplication_glyphs_normalize() {
        assert_eq!(value_of("3x4"), 12.0);
        assert_eq!(value_of("3X4"), 12.0);
        assert_eq!(value_of("3\u{00d7}4"), 12.0);
        assert_eq!(value_of(" 2 + 3 "), 5.0);
    }

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(value_of(""), 0.0);
        assert_eq!(value_of("   "), 0.0);
    }

    #[test]
    fn decimal_literals() {
        assert_eq!(value_of("2.5*4"), 10.0);
        assert_eq!(value_of(".5*8"), 4.0);
        assert_eq!(value_of("3."), 3.0);
    }

    #[test]
    fn unary_signs() {
        assert_eq!(value_of("-3+10"), 7.0);
        assert_eq!(value_of("2*-3"), -6.0);
        assert_eq!(value_of("-(2+3)"), -5.0);
    }

    #[test]
    fn left_associative_chains() {
        assert_eq!(value_of("10-3-2"), 5.0);
        assert_eq!(value_of("24/4/2"), 3.0);
    }

    #[test]
    fn whitelist_rejects_foreign_characters() {
        rejects("2+a");
        rejects("1e3");
        rejects("1,000");
        rejects("alert(1)");
        rejects("2^3");
        rejects("1%2");
    }

    #[test]
    fn malformed_expressions_reject() {
        rejects("2+");
        rejects("(2+3");
        rejects("2+3)");
        rejects("()");
        rejects("*3");
        rejects("2**3");
        rejects(".");
        rejects("1..2");
    }

    #[test]
    fn non_finite_results_reject() {
        rejects("1/0");
        rejects("0/0");
        rejects("1/(2-2)");
    }

    #[test]
    fn rejection_reports_zero_value() {
        let result = evaluate("3//");
        assert!(!result.ok);
        assert_eq!(result.value, 0.0);
    }
}
