//! The value transforms behind each directive. Null handling happens in
//! [`Directive::apply`](crate::Directive::apply); these functions only ever see
//! a present value.

use std::str::FromStr;

use async_graphql::Value;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rust_decimal::Decimal;

use crate::{
    error::FieldError,
    format::{FormatSpec, RenderError, RoundingMode},
};

/// Settings shared by every directive of a schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformOptions {
    pub rounding: RoundingMode,
}

pub(crate) fn base64(directive: &str, value: Value) -> Result<Value, FieldError> {
    let text = match value {
        Value::String(text) => text,
        Value::Enum(name) => name.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Boolean(boolean) => boolean.to_string(),
        Value::Binary(bytes) => return Ok(Value::String(STANDARD.encode(bytes))),
        other => return Err(type_conversion(directive, "a scalar", &other)),
    };

    Ok(Value::String(STANDARD.encode(text)))
}

pub(crate) fn lowercase(directive: &str, value: Value) -> Result<Value, FieldError> {
    let text = text(directive, value)?;
    Ok(Value::String(text.to_lowercase()))
}

pub(crate) fn uppercase(directive: &str, value: Value) -> Result<Value, FieldError> {
    let text = text(directive, value)?;
    Ok(Value::String(text.to_uppercase()))
}

pub(crate) fn capitalize(directive: &str, value: Value) -> Result<Value, FieldError> {
    let text = text(directive, value)?.to_lowercase();
    let mut chars = text.chars();

    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };

    Ok(Value::String(capitalized))
}

pub(crate) fn number(
    directive: &str,
    value: Value,
    format: &FormatSpec,
    options: &TransformOptions,
) -> Result<Value, FieldError> {
    let (text, number) = decimal(directive, value)?;

    let rendered = format
        .render(number, options.rounding)
        .map_err(|error| render_error(directive, text, error))?;

    Ok(Value::String(rendered))
}

pub(crate) fn currency(
    directive: &str,
    value: Value,
    symbol: &str,
    options: &TransformOptions,
) -> Result<Value, FieldError> {
    let (text, number) = decimal(directive, value)?;

    let (negative, digits) = FormatSpec::currency()
        .render_digits(number, options.rounding)
        .map_err(|error| render_error(directive, text, error))?;

    let sign = if negative { "-" } else { "" };

    Ok(Value::String(format!("{sign}{symbol}{digits}")))
}

/// The GraphQL name of a value's shape, for error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Boolean(_) => "a boolean",
        Value::Binary(_) => "binary data",
        Value::Enum(_) => "an enum value",
        Value::List(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn text(directive: &str, value: Value) -> Result<String, FieldError> {
    match value {
        Value::String(text) => Ok(text),
        Value::Enum(name) => Ok(name.to_string()),
        other => Err(type_conversion(directive, "a string", &other)),
    }
}

/// Reads a number out of a numeric value or of text holding a decimal number.
/// Returns the text it was read from alongside, for error messages.
fn decimal(directive: &str, value: Value) -> Result<(String, Decimal), FieldError> {
    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text,
        other => return Err(type_conversion(directive, "a number", &other)),
    };

    let trimmed = text.trim();

    match Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)) {
        Ok(number) => Ok((text, number)),
        Err(_) => Err(FieldError::InvalidNumber {
            directive: directive.to_string(),
            value: text,
        }),
    }
}

fn render_error(directive: &str, value: String, error: RenderError) -> FieldError {
    let directive = directive.to_string();

    match error {
        RenderError::NotAnInteger => FieldError::IntegerRequired { directive, value },
        RenderError::Overflow => FieldError::NumberOutOfRange { directive, value },
    }
}

fn type_conversion(directive: &str, expected: &'static str, value: &Value) -> FieldError {
    FieldError::TypeConversion {
        directive: directive.to_string(),
        expected,
        found: value_kind(value),
    }
}

#[cfg(test)]
mod tests {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use rstest::rstest;

    use super::*;

    fn string(value: &str) -> Value {
        Value::String(value.to_string())
    }

    #[test]
    fn base64_encodes_utf8_bytes() {
        assert_eq!(base64("base64", string("YES")), Ok(string("WUVT")));
        assert_eq!(base64("base64", string("")), Ok(string("")));
        assert_eq!(base64("base64", Value::from(12)), Ok(string("MTI=")));
        assert_eq!(base64("base64", Value::from(true)), Ok(string("dHJ1ZQ==")));
    }

    #[test]
    fn base64_round_trips() {
        for text in ["YES", "héllo wörld", "a", "ab", "abc", "🦀 crab"] {
            let Ok(Value::String(encoded)) = base64("base64", string(text)) else {
                unreachable!()
            };

            assert_eq!(STANDARD.decode(encoded).unwrap(), text.as_bytes());
        }
    }

    #[test]
    fn base64_rejects_lists() {
        let error = base64("base64", Value::List(vec![string("a")])).unwrap_err();

        assert_eq!(error.to_string(), "@base64 expects a scalar, got a list");
    }

    #[rstest]
    #[case("FOO BAR", "foo bar", "FOO BAR", "Foo bar")]
    #[case("Foo Bar", "foo bar", "FOO BAR", "Foo bar")]
    #[case("FOO BaR", "foo bar", "FOO BAR", "Foo bar")]
    #[case("", "", "", "")]
    #[case("ÉCOLE", "école", "ÉCOLE", "École")]
    #[case("straße", "straße", "STRASSE", "Straße")]
    #[case("ßa", "ßa", "SSA", "SSa")]
    #[case(" leading", " leading", " LEADING", " leading")]
    fn casing(#[case] input: &str, #[case] lower: &str, #[case] upper: &str, #[case] capitalized: &str) {
        assert_eq!(lowercase("lowercase", string(input)), Ok(string(lower)));
        assert_eq!(uppercase("uppercase", string(input)), Ok(string(upper)));
        assert_eq!(capitalize("capitalize", string(input)), Ok(string(capitalized)));
    }

    #[test]
    fn casing_enum_values() {
        let value = Value::Enum(async_graphql::Name::new("ACTIVE"));

        assert_eq!(capitalize("capitalize", value), Ok(string("Active")));
    }

    #[test]
    fn casing_rejects_numbers() {
        let error = uppercase("uppercase", Value::from(1)).unwrap_err();

        assert_eq!(
            error,
            FieldError::TypeConversion {
                directive: "uppercase".to_string(),
                expected: "a string",
                found: "a number",
            }
        );
    }

    #[rstest]
    #[case(string("1345.16"), "0,.1f", "1,345.2")]
    #[case(string(" 1345.16 "), "0,.1f", "1,345.2")]
    #[case(Value::from(1345.16), "0,.1f", "1,345.2")]
    #[case(Value::from(1345), ",d", "1,345")]
    #[case(string("1.5e3"), ",.2f", "1,500.00")]
    #[case(string("0.125"), ".2f", "0.12")]
    fn formats_numbers(#[case] value: Value, #[case] spec: &str, #[case] expected: &str) {
        let format = spec.parse().unwrap();

        assert_eq!(
            number("number", value, &format, &TransformOptions::default()),
            Ok(string(expected))
        );
    }

    #[test]
    fn number_rejects_text() {
        let format = "0,.1f".parse().unwrap();
        let error = number("number", string("abc"), &format, &TransformOptions::default()).unwrap_err();

        assert_eq!(
            error,
            FieldError::InvalidNumber {
                directive: "number".to_string(),
                value: "abc".to_string(),
            }
        );
        assert_eq!(error.to_string(), r#"@number: cannot convert "abc" into a number"#);
    }

    #[test]
    fn number_requires_integers_for_d() {
        let format = "d".parse().unwrap();
        let error = number("number", string("1.5"), &format, &TransformOptions::default()).unwrap_err();

        assert_eq!(error.to_string(), r#"@number: "1.5" is not an integer"#);
    }

    #[rstest]
    #[case(string("1345.16"), "$", RoundingMode::HalfEven, "$1,345.16")]
    #[case(string("1345.16"), "E", RoundingMode::HalfEven, "E1,345.16")]
    #[case(Value::from(3), "$", RoundingMode::HalfEven, "$3.00")]
    #[case(string("-1234.5"), "$", RoundingMode::HalfEven, "-$1,234.50")]
    #[case(string("0.125"), "€", RoundingMode::HalfEven, "€0.12")]
    #[case(string("0.125"), "€", RoundingMode::HalfUp, "€0.13")]
    #[case(string("0.135"), "$", RoundingMode::HalfEven, "$0.14")]
    #[case(string("-0.001"), "$", RoundingMode::HalfEven, "$0.00")]
    fn formats_currency(
        #[case] value: Value,
        #[case] symbol: &str,
        #[case] rounding: RoundingMode,
        #[case] expected: &str,
    ) {
        let options = TransformOptions { rounding };

        assert_eq!(currency("currency", value, symbol, &options), Ok(string(expected)));
    }

    #[test]
    fn currency_rejects_booleans() {
        let error = currency("currency", Value::from(false), "$", &TransformOptions::default()).unwrap_err();

        assert_eq!(error.to_string(), "@currency expects a number, got a boolean");
    }
}
