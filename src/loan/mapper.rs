//! Mapping from raw GraphQL loan payloads to the typed [`Loan`] model

use serde_json::Value;

use crate::error::ApiError;
use crate::loan::model::{Loan, RawLoan};

/// Convert a raw GraphQL loan value into a [`Loan`]
///
/// Null input is rejected outright. Missing optional nested fields default
/// to empty collections or empty-name placeholders instead of failing;
/// amounts are coerced from string-or-number (invalid numeric strings come
/// through as NaN, see [`crate::loan::model`]).
pub fn normalize_loan(raw: Value) -> Result<Loan, ApiError> {
    if raw.is_null() {
        return Err(ApiError::data_format(
            "Cannot normalize null or undefined loan",
        ));
    }

    let raw: RawLoan = serde_json::from_value(raw)
        .map_err(|e| ApiError::data_format(format!("Malformed loan payload: {}", e)))?;

    Ok(Loan::from(raw))
}
