use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Largest magnitude at which every whole f64 is exactly representable as i64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A monetary amount as it arrives from a form: either a number or the raw
/// text the user typed (possibly with thousands separators).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::Number(value)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount::Number(value as f64)
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Amount::Text(value.to_string())
    }
}

impl From<String> for Amount {
    fn from(value: String) -> Self {
        Amount::Text(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct NumberFormat {
    #[schemars(description = "Grouping character stripped before parsing (e.g. ',' in 1,000)")]
    pub thousands_separator: char,

    #[schemars(description = "Character separating the fractional part (e.g. '.' in 12.50)")]
    pub decimal_separator: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            thousands_separator: ',',
            decimal_separator: '.',
        }
    }
}

impl NumberFormat {
    /// Normalizes an amount to a nullable number.
    ///
    /// Blank text is `None`, never `0`: a zero on the wire means a confirmed
    /// zero, while `null` means the field has not been filled in yet.
    /// Unparseable text and non-finite numbers are also `None`.
    pub fn parse(&self, amount: &Amount) -> Option<f64> {
        match amount {
            Amount::Number(n) if n.is_finite() => Some(*n),
            Amount::Number(_) => None,
            Amount::Text(text) => self.parse_str(text),
        }
    }

    pub fn parse_optional(&self, amount: Option<&Amount>) -> Option<f64> {
        amount.and_then(|a| self.parse(a))
    }

    pub fn parse_str(&self, text: &str) -> Option<f64> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        let cleaned: String = trimmed
            .chars()
            .filter(|c| *c != self.thousands_separator)
            .map(|c| if c == self.decimal_separator { '.' } else { c })
            .collect();

        // `f64::from_str` accepts "inf" and "NaN"; only plain decimals are amounts
        let is_plain_decimal = cleaned
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'));

        match cleaned.parse::<f64>() {
            Ok(value) if is_plain_decimal && value.is_finite() => Some(value),
            _ => {
                warn!("Discarding unparseable amount '{}'", trimmed);
                None
            }
        }
    }

    /// Formats a number for display, grouping the integer part.
    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return String::new();
        }

        let raw = format!("{}", value.abs());
        let (int_part, frac_part) = match raw.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (raw.as_str(), None),
        };

        let mut grouped = String::with_capacity(raw.len() + raw.len() / 3);
        for (idx, digit) in int_part.chars().enumerate() {
            if idx > 0 && (int_part.len() - idx) % 3 == 0 {
                grouped.push(self.thousands_separator);
            }
            grouped.push(digit);
        }

        if let Some(frac) = frac_part {
            grouped.push(self.decimal_separator);
            grouped.push_str(frac);
        }

        if value < 0.0 {
            format!("-{}", grouped)
        } else {
            grouped
        }
    }
}

pub fn parse_number(amount: &Amount) -> Option<f64> {
    NumberFormat::default().parse(amount)
}

pub fn parse_number_str(text: &str) -> Option<f64> {
    NumberFormat::default().parse_str(text)
}

pub fn format_number(value: f64) -> String {
    NumberFormat::default().format(value)
}

/// Converts a normalized amount into a JSON value. Whole numbers are emitted as
/// integers so the payload matches what the backend produces itself.
pub fn to_wire_number(value: Option<f64>) -> Value {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() <= MAX_SAFE_INTEGER => Value::from(v as i64),
        Some(v) => serde_json::Number::from_f64(v)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        None => Value::Null,
    }
}

/// Reads a wire value back as an amount. Numeric strings from older records
/// are normalized; anything else is treated as absent.
pub fn from_wire_number(value: Option<&Value>, format: &NumberFormat) -> Option<Amount> {
    match value? {
        Value::Number(n) => n.as_f64().map(Amount::Number),
        Value::String(s) => format.parse_str(s).map(Amount::Number),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_thousands_separator_tolerance() {
        assert_eq!(parse_number_str("1,234,567.50"), Some(1_234_567.50));
        assert_eq!(parse_number_str("  2,500,000 "), Some(2_500_000.0));
        assert_eq!(parse_number_str("-1,000"), Some(-1000.0));
    }

    #[test]
    fn test_blank_is_null_not_zero() {
        assert_eq!(parse_number_str(""), None);
        assert_eq!(parse_number_str("   "), None);
        assert_eq!(parse_number_str("0"), Some(0.0));
    }

    #[test]
    fn test_garbage_is_null() {
        assert_eq!(parse_number_str("abc"), None);
        assert_eq!(parse_number_str("12abc"), None);
        assert_eq!(parse_number_str("inf"), None);
        assert_eq!(parse_number_str("NaN"), None);
        assert_eq!(parse_number(&Amount::Number(f64::NAN)), None);
    }

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(parse_number(&Amount::from(1000.0)), Some(1000.0));
        assert_eq!(parse_number(&Amount::from(-3_i64)), Some(-3.0));
    }

    #[test]
    fn test_european_format() {
        let fmt = NumberFormat {
            thousands_separator: '.',
            decimal_separator: ',',
        };
        assert_eq!(fmt.parse_str("1.234.567,50"), Some(1_234_567.50));
        assert_eq!(fmt.format(1_234_567.5), "1.234.567,5");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1000.0), "1,000");
        assert_eq!(format_number(1_234_567.5), "1,234,567.5");
        assert_eq!(format_number(-250_000.0), "-250,000");
        assert_eq!(format_number(f64::INFINITY), "");
    }

    #[test]
    fn test_format_then_parse_is_identity() {
        for value in [0.0, 12.25, 100_000.0, 1_234_567.5, -42_000.75] {
            assert_eq!(parse_number_str(&format_number(value)), Some(value));
        }
    }

    #[test]
    fn test_wire_numbers() {
        assert_eq!(to_wire_number(Some(2_500_000.0)), json!(2500000));
        assert_eq!(to_wire_number(Some(0.0)), json!(0));
        assert_eq!(to_wire_number(Some(12.5)), json!(12.5));
        assert_eq!(to_wire_number(None), Value::Null);
    }

    #[test]
    fn test_from_wire_number() {
        let fmt = NumberFormat::default();
        assert_eq!(
            from_wire_number(Some(&json!(40000)), &fmt),
            Some(Amount::Number(40000.0))
        );
        assert_eq!(
            from_wire_number(Some(&json!("1,500")), &fmt),
            Some(Amount::Number(1500.0))
        );
        assert_eq!(from_wire_number(Some(&Value::Null), &fmt), None);
        assert_eq!(from_wire_number(None, &fmt), None);
        assert_eq!(from_wire_number(Some(&json!(true)), &fmt), None);
    }
}
