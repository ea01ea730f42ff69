//! Loan model for LendLens
//!
//! The marketplace API is stringly typed in places: monetary amounts arrive
//! as either JSON numbers or numeric strings. The wire types here absorb
//! that, and [`Loan`] is the typed, immutable value object the rest of the
//! crate works with.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A loan borrower
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Borrower {
    pub first_name: String,
    pub pictured: bool,
    pub gender: Option<String>,
    pub is_primary: Option<bool>,
}

/// Country a loan is located in
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Country {
    pub name: String,
    pub iso_code: Option<String>,
}

/// Categorical sector tag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sector {
    pub id: Option<i64>,
    pub name: String,
}

/// A Kiva microloan with funding progress and borrower metadata
///
/// Constructed fresh per API response via [`crate::loan::normalize_loan`];
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Loan {
    pub id: i64,
    pub name: String,
    /// Requested amount, coerced to a number from the wire representation
    pub loan_amount: f64,
    /// Amount raised so far, coerced the same way
    pub funded_amount: f64,
    pub image_url: String,
    pub why_special: String,
    pub description: String,
    pub status: String,
    pub borrowers: Vec<Borrower>,
    pub country: Country,
    pub sector: Option<Sector>,
    pub themes: Vec<String>,
}

impl Loan {
    /// Funding progress as a rounded percentage, clamped to `[0, 100]`
    pub fn funding_percentage(&self) -> u32 {
        if self.loan_amount == 0.0 {
            return 0;
        }
        let pct = (self.funded_amount / self.loan_amount * 100.0).round();
        if pct.is_nan() {
            return 0;
        }
        pct.clamp(0.0, 100.0) as u32
    }

    /// Whether the loan is fully funded
    pub fn is_fully_funded(&self) -> bool {
        self.funding_percentage() >= 100
    }

    /// Amount still needed to fully fund the loan, never negative
    pub fn remaining_amount(&self) -> f64 {
        (self.loan_amount - self.funded_amount).max(0.0)
    }

    /// Country name, or a placeholder when the API left it out
    pub fn country_name(&self) -> &str {
        if self.country.name.is_empty() {
            "Unknown location"
        } else {
            &self.country.name
        }
    }

    /// First name of the primary borrower, falling back to the first listed
    /// borrower and then to the loan name
    pub fn primary_borrower_name(&self) -> &str {
        let primary = self
            .borrowers
            .iter()
            .find(|b| b.is_primary == Some(true))
            .or_else(|| self.borrowers.first());
        match primary {
            Some(borrower) => &borrower.first_name,
            None => &self.name,
        }
    }

    /// `why_special` shortened to at most `max_len` characters, with an
    /// ellipsis when truncated
    pub fn short_description(&self, max_len: usize) -> String {
        let char_count = self.why_special.chars().count();
        if char_count <= max_len {
            return self.why_special.clone();
        }
        let keep = max_len.saturating_sub(3);
        let truncated: String = self.why_special.chars().take(keep).collect();
        format!("{}...", truncated)
    }
}

/// Coerce the API's string-or-number amounts into `f64`
///
/// Numbers pass through, numeric strings are parsed, and invalid numeric
/// strings come out as NaN rather than a hard failure. Absent and null
/// values coerce to zero.
pub(crate) fn coerce_amount(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

fn amount_field<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_amount(&value))
}

/// Raw wire shape of a loan as the GraphQL API returns it
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawLoan {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "amount_field")]
    pub loan_amount: f64,
    #[serde(default)]
    pub loan_fundraising_info: Option<RawFundraisingInfo>,
    #[serde(default)]
    pub image: Option<RawImage>,
    #[serde(default)]
    pub why_special: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub borrowers: Option<Vec<Borrower>>,
    #[serde(default)]
    pub geocode: Option<RawGeocode>,
    #[serde(default)]
    pub sector: Option<Sector>,
    #[serde(default)]
    pub themes: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawFundraisingInfo {
    #[serde(default, deserialize_with = "amount_field")]
    pub funded_amount: f64,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawImage {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawGeocode {
    #[serde(default)]
    pub country: Country,
}

impl From<RawLoan> for Loan {
    fn from(raw: RawLoan) -> Self {
        Loan {
            id: raw.id,
            name: raw.name,
            loan_amount: raw.loan_amount,
            funded_amount: raw
                .loan_fundraising_info
                .map(|info| info.funded_amount)
                .unwrap_or(0.0),
            image_url: raw.image.unwrap_or_default().url,
            why_special: raw.why_special.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            status: raw.status.unwrap_or_default(),
            borrowers: raw.borrowers.unwrap_or_default(),
            country: raw.geocode.unwrap_or_default().country,
            sector: raw.sector,
            themes: raw.themes.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn loan(amount: f64, funded: f64) -> Loan {
        Loan {
            id: 1,
            name: "Maria".to_string(),
            loan_amount: amount,
            funded_amount: funded,
            image_url: String::new(),
            why_special: String::new(),
            description: String::new(),
            status: String::new(),
            borrowers: vec![],
            country: Country::default(),
            sector: None,
            themes: vec![],
        }
    }

    #[test]
    fn test_coerce_amount_number_and_string() {
        assert_eq!(coerce_amount(&json!(1500)), 1500.0);
        assert_eq!(coerce_amount(&json!(1500.5)), 1500.5);
        assert_eq!(coerce_amount(&json!("1500")), 1500.0);
        assert_eq!(coerce_amount(&json!("  250.75 ")), 250.75);
        assert_eq!(coerce_amount(&Value::Null), 0.0);
    }

    #[test]
    fn test_coerce_amount_invalid_string_is_nan() {
        assert!(coerce_amount(&json!("not a number")).is_nan());
        assert!(coerce_amount(&json!({})).is_nan());
    }

    #[test]
    fn test_funding_percentage_rounds_and_clamps() {
        assert_eq!(loan(1000.0, 500.0).funding_percentage(), 50);
        assert_eq!(loan(1000.0, 333.0).funding_percentage(), 33);
        assert_eq!(loan(1000.0, 2000.0).funding_percentage(), 100);
        assert_eq!(loan(0.0, 500.0).funding_percentage(), 0);
        assert_eq!(loan(f64::NAN, 500.0).funding_percentage(), 0);
    }

    #[test]
    fn test_is_fully_funded() {
        assert!(loan(1000.0, 1000.0).is_fully_funded());
        assert!(loan(1000.0, 1500.0).is_fully_funded());
        assert!(!loan(1000.0, 999.0).is_fully_funded());
    }

    #[test]
    fn test_remaining_amount_never_negative() {
        assert_eq!(loan(1000.0, 400.0).remaining_amount(), 600.0);
        assert_eq!(loan(1000.0, 1200.0).remaining_amount(), 0.0);
    }

    #[test]
    fn test_country_name_fallback() {
        let mut l = loan(100.0, 0.0);
        assert_eq!(l.country_name(), "Unknown location");
        l.country.name = "Peru".to_string();
        assert_eq!(l.country_name(), "Peru");
    }

    #[test]
    fn test_primary_borrower_name() {
        let mut l = loan(100.0, 0.0);
        assert_eq!(l.primary_borrower_name(), "Maria");

        l.borrowers = vec![
            Borrower {
                first_name: "Ana".to_string(),
                ..Default::default()
            },
            Borrower {
                first_name: "Rosa".to_string(),
                is_primary: Some(true),
                ..Default::default()
            },
        ];
        assert_eq!(l.primary_borrower_name(), "Rosa");

        l.borrowers[1].is_primary = None;
        assert_eq!(l.primary_borrower_name(), "Ana");
    }

    #[test]
    fn test_short_description() {
        let mut l = loan(100.0, 0.0);
        l.why_special = "A special loan".to_string();
        assert_eq!(l.short_description(100), "A special loan");
        assert_eq!(l.short_description(10), "A speci...");
    }
}
