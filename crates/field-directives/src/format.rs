//! Number rendering for `@number` and `@currency`.
//!
//! Format specs follow the familiar `[[fill]align][sign][0][width][grouping][.precision][type]`
//! mini-language. Numbers are handled as exact decimals, so rounding only ever
//! happens once, on the digit being dropped.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Precision past this point cannot be represented by a `Decimal`.
const MAX_PRECISION: u32 = 28;

/// Widest padded output a format may ask for.
const MAX_WIDTH: usize = 1024;

/// Precision used by `f` and `%` when the format gives none.
const DEFAULT_PRECISION: u32 = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Ties go to the even neighbour: `0.25 -> 0.2`, `0.35 -> 0.4`.
    #[default]
    HalfEven,
    /// Ties go away from zero: `0.25 -> 0.3`, `-0.25 -> -0.3`.
    HalfUp,
}

impl RoundingMode {
    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatSpecError {
    #[error("invalid format spec \"{spec}\": unexpected '{found}'")]
    Unexpected { spec: String, found: char },
    #[error("invalid format spec \"{0}\": expected digits after '.'")]
    MissingPrecision(String),
    #[error("invalid format spec \"{0}\": width or precision is too large")]
    TooLarge(String),
    #[error("unsupported format type '{0}'")]
    UnsupportedType(char),
    #[error("precision is not allowed with the integer format type")]
    PrecisionWithInteger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("value is not an integer")]
    NotAnInteger,
    #[error("value is out of range")]
    Overflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
    Center,
    /// Padding goes between the sign and the digits.
    AfterSign,
}

impl Align {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '<' => Some(Align::Left),
            '>' => Some(Align::Right),
            '^' => Some(Align::Center),
            '=' => Some(Align::AfterSign),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sign {
    #[default]
    Negative,
    Always,
    Space,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormatType {
    /// No type character: fixed point if a precision is given, the number's own digits otherwise.
    #[default]
    General,
    Fixed,
    Percent,
    Integer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    fill: char,
    align: Option<Align>,
    sign: Sign,
    zero_pad: bool,
    width: usize,
    grouping: Option<char>,
    precision: Option<u32>,
    ty: FormatType,
}

impl Default for FormatSpec {
    fn default() -> Self {
        Self {
            fill: ' ',
            align: None,
            sign: Sign::default(),
            zero_pad: false,
            width: 0,
            grouping: None,
            precision: None,
            ty: FormatType::default(),
        }
    }
}

impl FormatSpec {
    /// Comma-grouped, two fractional digits. The layout `@currency` uses.
    pub fn currency() -> Self {
        Self {
            grouping: Some(','),
            precision: Some(2),
            ty: FormatType::Fixed,
            ..Default::default()
        }
    }

    pub fn requires_integer(&self) -> bool {
        self.ty == FormatType::Integer
    }

    pub fn render(&self, value: Decimal, rounding: RoundingMode) -> Result<String, RenderError> {
        let (negative, digits) = self.render_digits(value, rounding)?;
        let sign = match (negative, self.sign) {
            (true, _) => "-",
            (false, Sign::Always) => "+",
            (false, Sign::Space) => " ",
            (false, Sign::Negative) => "",
        };

        Ok(self.pad(sign, &digits))
    }

    /// Renders the value without sign nor padding, and tells whether it is negative.
    ///
    /// A value that rounds to zero is never reported as negative.
    pub fn render_digits(&self, value: Decimal, rounding: RoundingMode) -> Result<(bool, String), RenderError> {
        if self.requires_integer() && !value.fract().is_zero() {
            return Err(RenderError::NotAnInteger);
        }

        let (value, suffix) = match self.ty {
            FormatType::Percent => (
                value.checked_mul(Decimal::ONE_HUNDRED).ok_or(RenderError::Overflow)?,
                "%",
            ),
            _ => (value, ""),
        };

        let precision = match self.ty {
            FormatType::Integer => Some(0),
            FormatType::Fixed | FormatType::Percent => Some(self.precision.unwrap_or(DEFAULT_PRECISION)),
            FormatType::General => self.precision,
        };

        let magnitude = match precision {
            Some(precision) => {
                let mut rounded = value.abs().round_dp_with_strategy(precision, rounding.strategy());
                rounded.rescale(precision);
                rounded
            }
            None => value.abs().normalize(),
        };

        let negative = value.is_sign_negative() && !magnitude.is_zero();
        let text = magnitude.to_string();

        let (integer, fraction) = match text.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (text.as_str(), None),
        };

        // `rescale` keeps fewer fractional digits than asked when the integer
        // part is large; the dropped ones are zeros.
        let fraction = match precision {
            Some(0) => None,
            Some(precision) => Some(format!(
                "{:0<width$}",
                fraction.unwrap_or_default(),
                width = precision as usize
            )),
            None => fraction.map(str::to_string),
        };

        let mut digits = match self.grouping {
            Some(separator) => group_thousands(integer, separator),
            None => integer.to_string(),
        };

        if let Some(fraction) = fraction {
            digits.push('.');
            digits.push_str(&fraction);
        }

        digits.push_str(suffix);

        Ok((negative, digits))
    }

    fn pad(&self, sign: &str, digits: &str) -> String {
        let (fill, align) = match (self.align, self.zero_pad) {
            (Some(align), _) => (self.fill, align),
            (None, true) => ('0', Align::AfterSign),
            (None, false) => (self.fill, Align::Right),
        };

        let len = sign.chars().count() + digits.chars().count();
        let padding = self.width.saturating_sub(len);

        if padding == 0 {
            return format!("{sign}{digits}");
        }

        let fill_with = |count: usize| fill.to_string().repeat(count);

        match align {
            Align::Left => format!("{sign}{digits}{}", fill_with(padding)),
            Align::Right => format!("{}{sign}{digits}", fill_with(padding)),
            Align::Center => {
                let before = padding / 2;
                format!("{}{sign}{digits}{}", fill_with(before), fill_with(padding - before))
            }
            Align::AfterSign => format!("{sign}{}{digits}", fill_with(padding)),
        }
    }
}

impl FromStr for FormatSpec {
    type Err = FormatSpecError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let chars = spec.chars().collect::<Vec<_>>();
        let mut format = FormatSpec::default();
        let mut pos = 0;

        let unexpected = |found: char| FormatSpecError::Unexpected {
            spec: spec.to_string(),
            found,
        };

        if let Some(align) = chars.get(1).copied().and_then(Align::from_char) {
            format.fill = chars[0];
            format.align = Some(align);
            pos = 2;
        } else if let Some(align) = chars.first().copied().and_then(Align::from_char) {
            format.align = Some(align);
            pos = 1;
        }

        if let Some(sign) = chars.get(pos).and_then(|c| match c {
            '-' => Some(Sign::Negative),
            '+' => Some(Sign::Always),
            ' ' => Some(Sign::Space),
            _ => None,
        }) {
            format.sign = sign;
            pos += 1;
        }

        if chars.get(pos) == Some(&'0') {
            format.zero_pad = true;
            pos += 1;
        }

        let (width, next) = take_number(&chars, pos, spec)?;
        format.width = match width {
            Some(width) if width > MAX_WIDTH => return Err(FormatSpecError::TooLarge(spec.to_string())),
            width => width.unwrap_or_default(),
        };
        pos = next;

        if let Some(&separator @ (',' | '_')) = chars.get(pos) {
            format.grouping = Some(separator);
            pos += 1;
        }

        if chars.get(pos) == Some(&'.') {
            let (precision, next) = take_number(&chars, pos + 1, spec)?;
            let precision = precision.ok_or_else(|| FormatSpecError::MissingPrecision(spec.to_string()))?;

            format.precision = Some(
                u32::try_from(precision)
                    .ok()
                    .filter(|precision| *precision <= MAX_PRECISION)
                    .ok_or_else(|| FormatSpecError::TooLarge(spec.to_string()))?,
            );
            pos = next;
        }

        if let Some(&ty) = chars.get(pos) {
            format.ty = match ty {
                'f' | 'F' => FormatType::Fixed,
                '%' => FormatType::Percent,
                'd' => FormatType::Integer,
                c if c.is_ascii_alphabetic() => return Err(FormatSpecError::UnsupportedType(c)),
                c => return Err(unexpected(c)),
            };
            pos += 1;
        }

        if let Some(&c) = chars.get(pos) {
            return Err(unexpected(c));
        }

        if format.ty == FormatType::Integer && format.precision.is_some() {
            return Err(FormatSpecError::PrecisionWithInteger);
        }

        Ok(format)
    }
}

/// Reads the run of ASCII digits starting at `pos`. Returns the parsed number,
/// if any, and the position right after it.
fn take_number(chars: &[char], pos: usize, spec: &str) -> Result<(Option<usize>, usize), FormatSpecError> {
    let end = chars[pos.min(chars.len())..]
        .iter()
        .position(|c| !c.is_ascii_digit())
        .map(|len| pos + len)
        .unwrap_or(chars.len())
        .max(pos);

    if end == pos {
        return Ok((None, pos));
    }

    let digits = chars[pos..end].iter().collect::<String>();
    let number = digits
        .parse::<usize>()
        .map_err(|_| FormatSpecError::TooLarge(spec.to_string()))?;

    Ok((Some(number), end))
}

fn group_thousands(integer: &str, separator: char) -> String {
    let len = integer.len();
    let mut grouped = String::with_capacity(len + len / 3);

    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(digit);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn render(spec: &str, value: &str, rounding: RoundingMode) -> String {
        let spec = spec.parse::<FormatSpec>().unwrap();
        spec.render(value.parse().unwrap(), rounding).unwrap()
    }

    #[test]
    fn parses_grouped_fixed_point() {
        let spec = "0,.1f".parse::<FormatSpec>().unwrap();

        assert_eq!(
            spec,
            FormatSpec {
                zero_pad: true,
                grouping: Some(','),
                precision: Some(1),
                ty: FormatType::Fixed,
                ..Default::default()
            }
        );
    }

    #[test]
    fn parses_fill_and_alignment() {
        let spec = "*^+12_.3%".parse::<FormatSpec>().unwrap();

        assert_eq!(
            spec,
            FormatSpec {
                fill: '*',
                align: Some(Align::Center),
                sign: Sign::Always,
                width: 12,
                grouping: Some('_'),
                precision: Some(3),
                ty: FormatType::Percent,
                ..Default::default()
            }
        );
    }

    #[test]
    fn empty_spec_is_general() {
        assert_eq!("".parse::<FormatSpec>().unwrap(), FormatSpec::default());
    }

    #[rstest]
    #[case("0,.1f", "1345.16", "1,345.2")]
    #[case(",.2f", "1234567.891", "1,234,567.89")]
    #[case(",", "1234567.5", "1,234,567.5")]
    #[case("_d", "1000000", "1_000_000")]
    #[case(".2f", "3", "3.00")]
    #[case("f", "1.5", "1.500000")]
    #[case(".1%", "0.1234", "12.3%")]
    #[case("d", "42.0", "42")]
    #[case("", "001.2300", "1.23")]
    #[case(".0f", "-0.4", "0")]
    #[case("+.1f", "2", "+2.0")]
    #[case(" .1f", "2", " 2.0")]
    #[case(",.2f", "-1234.5", "-1,234.50")]
    fn renders(#[case] spec: &str, #[case] value: &str, #[case] expected: &str) {
        assert_eq!(render(spec, value, RoundingMode::HalfEven), expected);
    }

    #[rstest]
    #[case("8.2f", "3.14159", "    3.14")]
    #[case("<8.2f", "3.14159", "3.14    ")]
    #[case("^9.2f", "3.14159", "  3.14   ")]
    #[case("*>8.1f", "-2.5", "****-2.5")]
    #[case("08.2f", "-3.14159", "-0003.14")]
    #[case("x=8.2f", "-3.14159", "-xxx3.14")]
    #[case("3.2f", "1234.5", "1234.50")]
    fn pads(#[case] spec: &str, #[case] value: &str, #[case] expected: &str) {
        assert_eq!(render(spec, value, RoundingMode::HalfEven), expected);
    }

    #[rstest]
    #[case(RoundingMode::HalfEven, "0.25", "0.2")]
    #[case(RoundingMode::HalfEven, "0.35", "0.4")]
    #[case(RoundingMode::HalfEven, "-0.25", "-0.2")]
    #[case(RoundingMode::HalfEven, "0.251", "0.3")]
    #[case(RoundingMode::HalfUp, "0.25", "0.3")]
    #[case(RoundingMode::HalfUp, "0.35", "0.4")]
    #[case(RoundingMode::HalfUp, "-0.25", "-0.3")]
    #[case(RoundingMode::HalfUp, "0.249", "0.2")]
    fn rounds_exact_halves(#[case] rounding: RoundingMode, #[case] value: &str, #[case] expected: &str) {
        assert_eq!(render(".1f", value, rounding), expected);
    }

    #[test]
    fn currency_layout() {
        let spec = FormatSpec::currency();

        let digits = spec
            .render_digits("1345.165".parse().unwrap(), RoundingMode::HalfEven)
            .unwrap();
        assert_eq!(digits, (false, "1,345.16".to_string()));

        let digits = spec
            .render_digits("-0.5".parse().unwrap(), RoundingMode::HalfUp)
            .unwrap();
        assert_eq!(digits, (true, "0.50".to_string()));
    }

    #[test]
    fn widest_allowed_padding() {
        let rendered = render("1024.1f", "1", RoundingMode::HalfEven);

        assert_eq!(rendered.len(), 1024);
        assert!(rendered.ends_with(" 1.0"));
    }

    #[rstest]
    #[case(".28f", "12345678901", "12345678901.0000000000000000000000000000")]
    #[case(".28f", "0.5", "0.5000000000000000000000000000")]
    #[case(",.20f", "-1234567890.25", "-1,234,567,890.25000000000000000000")]
    fn keeps_every_requested_fractional_digit(#[case] spec: &str, #[case] value: &str, #[case] expected: &str) {
        let rendered = render(spec, value, RoundingMode::HalfEven);

        assert_eq!(rendered, expected);
    }

    #[test]
    fn integer_type_rejects_fractions() {
        let spec = "d".parse::<FormatSpec>().unwrap();
        let result = spec.render("1.5".parse().unwrap(), RoundingMode::HalfEven);

        assert_eq!(result, Err(RenderError::NotAnInteger));
    }

    #[test]
    fn percent_overflow() {
        let spec = "%".parse::<FormatSpec>().unwrap();
        let result = spec.render(Decimal::MAX, RoundingMode::HalfEven);

        assert_eq!(result, Err(RenderError::Overflow));
    }

    #[rstest]
    #[case("0,.f", FormatSpecError::MissingPrecision("0,.f".to_string()))]
    #[case(".2e", FormatSpecError::UnsupportedType('e'))]
    #[case(".2fx", FormatSpecError::Unexpected { spec: ".2fx".to_string(), found: 'x' })]
    #[case(",,", FormatSpecError::Unexpected { spec: ",,".to_string(), found: ',' })]
    #[case(".2d", FormatSpecError::PrecisionWithInteger)]
    #[case(".29f", FormatSpecError::TooLarge(".29f".to_string()))]
    #[case("1025.2f", FormatSpecError::TooLarge("1025.2f".to_string()))]
    #[case("99999999999999999f", FormatSpecError::TooLarge("99999999999999999f".to_string()))]
    #[case("99999999999999999999999999f", FormatSpecError::TooLarge("99999999999999999999999999f".to_string()))]
    fn rejects_invalid_specs(#[case] spec: &str, #[case] expected: FormatSpecError) {
        assert_eq!(spec.parse::<FormatSpec>(), Err(expected));
    }
}
