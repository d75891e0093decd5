use serde::{Deserialize, Serialize};
use serde_json::Value;

const REL_TOLERANCE: f64 = 1e-9;
const ABS_TOLERANCE: f64 = 1e-8;
/// decimals kept when a number is rendered as an expected value
const MAX_DECIMALS: usize = 6;
/// options listed in a disjunction before the rest is dropped
const MAX_OPTIONS: usize = 4;

/// Whether an instance works with whole numbers or one-decimal values.
///
/// Matrices always hold integers; continuous instances count in tenths.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    Discrete,
    Continuous,
}

impl Precision {
    #[inline]
    pub fn scale(self) -> i64 {
        match self {
            Precision::Discrete => 1,
            Precision::Continuous => 10,
        }
    }

    /// Largest cell value in matrix units, covering the value range `[0, 10]`.
    #[inline]
    pub fn max_units(self) -> i64 {
        10 * self.scale()
    }

    #[inline]
    pub fn to_f64(self, units: i64) -> f64 {
        units as f64 / self.scale() as f64
    }

    pub fn format(self, units: i64) -> String {
        format_number(self.to_f64(units))
    }
}

/// Reads a submitted value as a number, accepting `,` as decimal separator.
pub fn parse_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

/// Reads a submitted line flag. Anything unrecognised counts as unchecked.
pub fn parse_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |v| v != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "on" | "yes"
        ),
        _ => false,
    }
}

pub fn is_close(a: f64, b: f64) -> bool {
    let diff = (a - b).abs();
    diff <= (REL_TOLERANCE * a.abs().max(b.abs())).max(ABS_TOLERANCE)
}

/// Renders a number with at most six decimals, trailing zeros stripped.
pub fn format_number(value: f64) -> String {
    let text = format!("{:.*}", MAX_DECIMALS, value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// Normalised text form of a submitted value; numbers go through
/// [`format_number`], other text is only trimmed.
pub fn normalize(value: &Value) -> String {
    if let Some(number) = parse_number(value) {
        return format_number(number);
    }
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Compares a submitted cell with the expected value in matrix units.
///
/// Unparseable submissions fall back to a comparison of normalised text, which
/// can only succeed if the text renders like the expected number.
pub fn matches_number(actual: Option<&Value>, expected: f64) -> bool {
    match actual {
        None => false,
        Some(value) => match parse_number(value) {
            Some(number) => is_close(number, expected),
            None => normalize(value) == format_number(expected),
        },
    }
}

/// Joins the distinct options in first-seen order.
///
/// A single option is returned as is, several become `one of: a | b`.
pub fn format_options<I>(options: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut unique: Vec<String> = Vec::new();
    for option in options {
        if !unique.contains(&option) {
            unique.push(option);
        }
    }
    match unique.len() {
        0 => String::new(),
        1 => unique.remove(0),
        _ => {
            unique.truncate(MAX_OPTIONS);
            format!("one of: {}", unique.join(" | "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_number_accepts_comma_separator() {
        assert_eq!(parse_number(&json!("2,5")), Some(2.5));
        assert_eq!(parse_number(&json!(" 3 ")), Some(3.0));
        assert_eq!(parse_number(&json!(4)), Some(4.0));
        assert_eq!(parse_number(&json!("abc")), None);
        assert_eq!(parse_number(&json!("NaN")), None);
        assert_eq!(parse_number(&json!(true)), None);
        assert_eq!(parse_number(&Value::Null), None);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag(&json!(true)));
        assert!(parse_flag(&json!("On")));
        assert!(parse_flag(&json!(1)));
        assert!(!parse_flag(&json!(false)));
        assert!(!parse_flag(&json!("false")));
        assert!(!parse_flag(&json!(0)));
        assert!(!parse_flag(&Value::Null));
    }

    #[test]
    fn test_tolerance() {
        assert!(is_close(2.8, 2.8 + 5e-9));
        assert!(is_close(0.1 + 0.2, 0.3));
        assert!(!is_close(2.8, 2.8001));
        assert!(is_close(1e12, 1e12 + 1e-4));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1.0 / 3.0), "0.333333");
        assert_eq!(Precision::Continuous.format(35), "3.5");
        assert_eq!(Precision::Discrete.format(7), "7");
    }

    #[test]
    fn test_matches_number() {
        assert!(matches_number(Some(&json!("3,5")), 3.5));
        assert!(matches_number(Some(&json!(3.5)), 3.5));
        assert!(!matches_number(Some(&json!("x")), 3.5));
        assert!(!matches_number(None, 0.0));
        assert!(!matches_number(Some(&Value::Null), 0.0));
    }

    #[test]
    fn test_format_options() {
        assert_eq!(format_options(Vec::<String>::new()), "");
        assert_eq!(format_options(vec!["1".to_string(), "1".to_string()]), "1");
        let options = ["a", "b", "a", "c", "d", "e"].iter().map(|s| s.to_string());
        assert_eq!(format_options(options), "one of: a | b | c | d");
    }
}
