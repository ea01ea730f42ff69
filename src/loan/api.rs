//! Loan API access over a GraphQL transport
//!
//! This is the request/response pipeline: build variables, execute the query
//! document, validate the response shape, and map raw values into [`Loan`]s.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;
use crate::graphql::queries::{GET_FILTER_OPTIONS_QUERY, GET_LOANS_QUERY, GET_LOAN_BY_ID_QUERY};
use crate::graphql::GraphQLTransport;
use crate::loan::filters::{generate_filter_variables, LoanFilters};
use crate::loan::mapper::normalize_loan;
use crate::loan::model::Loan;

/// A page of loans with the marketplace-wide total
#[derive(Debug, Clone, PartialEq)]
pub struct LoanPage {
    pub loans: Vec<Loan>,
    pub total_count: u64,
}

/// A country available for filtering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CountryOption {
    pub name: String,
    pub iso_code: Option<String>,
    pub count: Option<u64>,
}

/// A sector available for filtering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectorOption {
    pub id: Option<i64>,
    pub name: String,
}

/// Filter option lists offered to the view layer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub countries: Vec<CountryOption>,
    pub sectors: Vec<SectorOption>,
}

/// Loan API over a pluggable GraphQL transport
pub struct LoanApi<T: GraphQLTransport> {
    transport: T,
}

impl<T: GraphQLTransport> LoanApi<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Fetch a page of loans
    ///
    /// `offset` is a skip count; filters are translated to variables and
    /// merged with the paging window.
    pub async fn fetch_loans(
        &self,
        limit: u32,
        offset: u64,
        filters: &LoanFilters,
    ) -> Result<LoanPage, ApiError> {
        let mut variables = generate_filter_variables(filters);
        variables.insert("limit".to_string(), Value::from(limit));
        variables.insert("offset".to_string(), Value::from(offset));

        let data = self
            .transport
            .execute(GET_LOANS_QUERY, Value::Object(variables))
            .await?;

        let loans_node = data
            .pointer("/lend/loans")
            .filter(|node| !node.is_null())
            .ok_or_else(|| ApiError::data_format("Response is missing lend.loans"))?;

        let total_count = loans_node
            .get("totalCount")
            .and_then(Value::as_u64)
            .unwrap_or(0);

        let values = match loans_node.get("values").and_then(Value::as_array) {
            Some(values) => values.clone(),
            None => Vec::new(),
        };

        let loans = values
            .into_iter()
            .map(normalize_loan)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = loans.len(), total_count, offset, "Fetched loan page");
        Ok(LoanPage { loans, total_count })
    }

    /// Fetch a single loan with full details
    pub async fn fetch_loan_by_id(&self, id: i64) -> Result<Loan, ApiError> {
        let data = self
            .transport
            .execute(GET_LOAN_BY_ID_QUERY, serde_json::json!({ "id": id }))
            .await?;

        let loan_node = data
            .pointer("/lend/loan")
            .ok_or_else(|| ApiError::data_format("Response is missing lend.loan"))?;

        normalize_loan(loan_node.clone())
    }

    /// Fetch available filter options
    ///
    /// Countries come from the facet listing; sectors are collected from a
    /// scanned loan page and deduplicated by id.
    pub async fn fetch_filter_options(&self) -> Result<FilterOptions, ApiError> {
        let data = self
            .transport
            .execute(GET_FILTER_OPTIONS_QUERY, serde_json::json!({}))
            .await?;

        let lend = data
            .get("lend")
            .filter(|node| !node.is_null())
            .ok_or_else(|| ApiError::data_format("Response is missing lend"))?;

        let countries = match lend.get("countryFacets").and_then(Value::as_array) {
            Some(facets) => facets
                .iter()
                .filter_map(|facet| {
                    let country = facet.get("country")?;
                    Some(CountryOption {
                        name: country.get("name")?.as_str()?.to_string(),
                        iso_code: country
                            .get("isoCode")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                        count: facet.get("count").and_then(Value::as_u64),
                    })
                })
                .collect(),
            None => Vec::new(),
        };

        let mut sectors: Vec<SectorOption> = Vec::new();
        if let Some(values) = lend.pointer("/loans/values").and_then(Value::as_array) {
            for value in values {
                let Some(sector) = value.get("sector").filter(|s| !s.is_null()) else {
                    continue;
                };
                let option = SectorOption {
                    id: sector.get("id").and_then(Value::as_i64),
                    name: sector
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                };
                if !sectors.iter().any(|s| s.id == option.id) {
                    sectors.push(option);
                }
            }
        }
        sectors.sort_by_key(|s| s.id);

        debug!(
            countries = countries.len(),
            sectors = sectors.len(),
            "Fetched filter options"
        );
        Ok(FilterOptions { countries, sectors })
    }
}
