//! Loan domain: models, mapping, filters, API access, and session state

pub mod api;
pub mod filters;
pub mod mapper;
pub mod model;
pub mod session;

pub use api::{CountryOption, FilterOptions, LoanApi, LoanPage, SectorOption};
pub use filters::{generate_filter_variables, LoanFilters};
pub use mapper::normalize_loan;
pub use model::{Borrower, Country, Loan, Sector};
pub use session::{LoanSession, SessionEvent, SessionSnapshot};
