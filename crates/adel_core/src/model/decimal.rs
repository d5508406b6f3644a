//! Decimal amounts as delivered by the API.
//!
//! Money columns arrive as decimal strings (`"5000.00"`) or JSON numbers. The
//! value is parsed for arithmetic while the source text is kept for display,
//! so an edit form shows exactly what the server sent.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub struct Decimal {
    value: f64,
    text: String,
}

impl Decimal {
    /// Parses decimal text. Blank, non-numeric and non-finite input is `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        let value = trimmed.parse::<f64>().ok().filter(|value| value.is_finite())?;
        Some(Self {
            value,
            text: trimmed.to_string(),
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Text as received, or the shortest rendering for numeric input.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<f64> for Decimal {
    fn from(value: f64) -> Self {
        Self {
            value,
            text: value.to_string(),
        }
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value)
    }
}

/// Accepts a JSON number, a decimal string, or null. Blank strings read as
/// `None`.
pub(crate) fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDecimal {
        Number(f64),
        Text(String),
    }

    match Option::<RawDecimal>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawDecimal::Number(value)) => Ok(Some(Decimal::from(value))),
        Some(RawDecimal::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(RawDecimal::Text(text)) => Decimal::parse(&text).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid decimal `{}`", text.trim()))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::Decimal;

    #[test]
    fn parse_keeps_source_text() {
        let decimal = Decimal::parse(" 5000.00 ").unwrap();
        assert_eq!(decimal.as_str(), "5000.00");
        assert_eq!(decimal.value(), 5000.0);
    }

    #[test]
    fn parse_rejects_blank_and_non_finite_text() {
        assert_eq!(Decimal::parse(""), None);
        assert_eq!(Decimal::parse("abc"), None);
        assert_eq!(Decimal::parse("inf"), None);
    }

    #[test]
    fn numbers_render_without_trailing_zeros() {
        assert_eq!(Decimal::from(1200.0).as_str(), "1200");
        assert_eq!(Decimal::from(2500.5).to_string(), "2500.5");
    }
}
