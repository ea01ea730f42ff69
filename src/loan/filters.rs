//! Loan filters and their translation to GraphQL variables

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Filter parameters for loan listings
///
/// Absence of a field means "no constraint"; there are no other invariants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoanFilters {
    pub search_term: Option<String>,
    pub sectors: Option<Vec<i64>>,
    /// Country codes. Accepted but not forwarded upstream; the marketplace
    /// API has no country filter on this query.
    pub countries: Option<Vec<String>>,
    pub gender: Option<String>,
    pub status: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub sort_by: Option<String>,
    pub themes: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub distribution_model: Option<String>,
    pub is_expiring_soon: Option<bool>,
    pub activities: Option<Vec<String>>,
    pub loan_limit: Option<u32>,
}

impl LoanFilters {
    /// Whether no constraint is set at all
    pub fn is_empty(&self) -> bool {
        *self == LoanFilters::default()
    }
}

/// Translate filters into GraphQL query variables
///
/// Absent fields are omitted entirely (never sent as null), strings and
/// arrays are included only when non-empty, and `search_term` maps to
/// `queryString`.
/// Pure function; the only side effect is diagnostic logging.
pub fn generate_filter_variables(filters: &LoanFilters) -> Map<String, Value> {
    let mut variables = Map::new();

    if let Some(sectors) = &filters.sectors {
        if !sectors.is_empty() {
            variables.insert("sectors".to_string(), serde_json::json!(sectors));
        }
    }

    if let Some(countries) = &filters.countries {
        if !countries.is_empty() {
            debug!(
                countries = ?countries,
                "Country filtering is not available upstream; skipping"
            );
        }
    }

    if let Some(search_term) = &filters.search_term {
        if !search_term.is_empty() {
            variables.insert("queryString".to_string(), Value::from(search_term.clone()));
        }
    }

    if let Some(gender) = &filters.gender {
        if !gender.is_empty() {
            variables.insert("gender".to_string(), Value::from(gender.clone()));
        }
    }

    if let Some(status) = &filters.status {
        if !status.is_empty() {
            variables.insert("status".to_string(), Value::from(status.clone()));
        }
    }

    if let Some(min_amount) = filters.min_amount {
        variables.insert("minAmount".to_string(), Value::from(min_amount));
    }

    if let Some(max_amount) = filters.max_amount {
        variables.insert("maxAmount".to_string(), Value::from(max_amount));
    }

    if let Some(sort_by) = &filters.sort_by {
        if !sort_by.is_empty() {
            variables.insert("sortBy".to_string(), Value::from(sort_by.clone()));
        }
    }

    if let Some(themes) = &filters.themes {
        if !themes.is_empty() {
            variables.insert("themes".to_string(), serde_json::json!(themes));
        }
    }

    if let Some(tags) = &filters.tags {
        if !tags.is_empty() {
            variables.insert("tags".to_string(), serde_json::json!(tags));
        }
    }

    if let Some(distribution_model) = &filters.distribution_model {
        if !distribution_model.is_empty() {
            variables.insert(
                "distributionModel".to_string(),
                Value::from(distribution_model.clone()),
            );
        }
    }

    if let Some(is_expiring_soon) = filters.is_expiring_soon {
        variables.insert("isExpiringSoon".to_string(), Value::from(is_expiring_soon));
    }

    if let Some(activities) = &filters.activities {
        if !activities.is_empty() {
            variables.insert("activities".to_string(), serde_json::json!(activities));
        }
    }

    if let Some(loan_limit) = filters.loan_limit {
        variables.insert("loanLimit".to_string(), Value::from(loan_limit));
    }

    debug!(variables = ?variables, "Generated filter variables");
    variables
}
