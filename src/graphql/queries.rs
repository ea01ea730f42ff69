//! GraphQL document catalog for the Kiva marketplace API
//!
//! These documents are fixed text; any change to the upstream schema is a
//! compatibility break. Filter variables are declared nullable so callers can
//! omit anything they do not constrain on.

/// Fetch a page of loans with optional filters
pub const GET_LOANS_QUERY: &str = r#"
  query GetLoans(
    $limit: Int!
    $offset: Int!
    $queryString: String
    $sortBy: String
    $sectors: [Int]
    $gender: String
    $status: String
    $minAmount: Float
    $maxAmount: Float
    $themes: [String]
    $tags: [String]
    $distributionModel: String
    $isExpiringSoon: Boolean
    $activities: [String]
    $loanLimit: Int
  ) {
    lend {
      loans(
        limit: $limit
        offset: $offset
        queryString: $queryString
        sortBy: $sortBy
        filters: {
          sector: $sectors
          gender: $gender
          status: $status
          minAmount: $minAmount
          maxAmount: $maxAmount
          theme: $themes
          tags: $tags
          distributionModel: $distributionModel
          isExpiringSoon: $isExpiringSoon
          activity: $activities
          loanLimit: $loanLimit
        }
      ) {
        totalCount
        values {
          id
          name
          loanAmount
          loanFundraisingInfo {
            fundedAmount
          }
          image {
            url
          }
          whySpecial
          borrowers {
            firstName
            pictured
          }
          geocode {
            country {
              name
              isoCode
            }
          }
          sector {
            id
            name
          }
        }
      }
    }
  }
"#;

/// Fetch a single loan with full details
pub const GET_LOAN_BY_ID_QUERY: &str = r#"
  query GetLoanById($id: Int!) {
    lend {
      loan(id: $id) {
        id
        name
        loanAmount
        loanFundraisingInfo {
          fundedAmount
        }
        image {
          url
        }
        whySpecial
        description
        status
        borrowers {
          firstName
          pictured
        }
        geocode {
          country {
            name
            isoCode
          }
        }
        sector {
          id
          name
        }
      }
    }
  }
"#;

/// Fetch available filter options (country facets plus a sector scan)
pub const GET_FILTER_OPTIONS_QUERY: &str = r#"
  query GetFilterOptions {
    lend {
      countryFacets {
        country {
          name
          isoCode
        }
        count
      }
      loans(limit: 100) {
        values {
          sector {
            id
            name
          }
        }
      }
    }
  }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_name_their_operations() {
        assert!(GET_LOANS_QUERY.contains("query GetLoans"));
        assert!(GET_LOAN_BY_ID_QUERY.contains("query GetLoanById"));
        assert!(GET_FILTER_OPTIONS_QUERY.contains("query GetFilterOptions"));
    }

    #[test]
    fn test_loans_query_pages_with_limit_and_offset() {
        assert!(GET_LOANS_QUERY.contains("$limit: Int!"));
        assert!(GET_LOANS_QUERY.contains("$offset: Int!"));
        assert!(GET_LOANS_QUERY.contains("totalCount"));
    }
}
