//! Loan browsing session state
//!
//! This is the state orchestrator a view layer owns: one explicit state
//! struct per session, mutated only by the session's own request handling,
//! with change notification over a broadcast channel. Pagination, filters,
//! loading flags and the current error all live here.
//!
//! Rapid re-loads (e.g. filter churn) are handled with a generation counter:
//! every issued load bumps it, and a response is applied only if its
//! generation is still current, so a superseded request can never overwrite
//! newer state.

use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, warn};

use crate::error::ApiError;
use crate::graphql::GraphQLTransport;
use crate::loan::api::{CountryOption, LoanApi, SectorOption};
use crate::loan::filters::LoanFilters;
use crate::loan::model::Loan;

/// Default page size for loan listings
pub const DEFAULT_PER_PAGE: u32 = 12;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// State change notifications emitted by a [`LoanSession`]
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A page of loans was applied to state
    LoansLoaded { page: u32, total_count: u64 },
    /// A load failed; carries the user-facing message
    LoadFailed { message: String },
    /// The active filter set changed
    FiltersChanged,
    /// Filter option lists were (re)loaded
    FilterOptionsLoaded,
}

/// Point-in-time copy of the session state for rendering
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub loans: Vec<Loan>,
    pub filters: LoanFilters,
    pub available_countries: Vec<CountryOption>,
    pub available_sectors: Vec<SectorOption>,
    pub current_page: u32,
    pub total_count: u64,
    pub per_page: u32,
    pub loading_loans: bool,
    pub loading_filters: bool,
    pub error: Option<ApiError>,
    pub error_message: String,
}

impl SessionSnapshot {
    /// Total number of pages for the current result set
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_count, self.per_page)
    }
}

fn total_pages(total_count: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 0;
    }
    total_count.div_ceil(u64::from(per_page)) as u32
}

#[derive(Debug)]
struct SessionState {
    loans: Vec<Loan>,
    filters: LoanFilters,
    available_countries: Vec<CountryOption>,
    available_sectors: Vec<SectorOption>,
    current_page: u32,
    total_count: u64,
    per_page: u32,
    loading_loans: bool,
    loading_filters: bool,
    error: Option<ApiError>,
    error_message: String,
    generation: u64,
}

impl SessionState {
    fn new(per_page: u32) -> Self {
        Self {
            loans: Vec::new(),
            filters: LoanFilters::default(),
            available_countries: Vec::new(),
            available_sectors: Vec::new(),
            current_page: 1,
            total_count: 0,
            per_page,
            loading_loans: false,
            loading_filters: false,
            error: None,
            error_message: String::new(),
            generation: 0,
        }
    }

    fn clear_error(&mut self) {
        self.error = None;
        self.error_message.clear();
    }

    fn record_error(&mut self, err: &ApiError) {
        self.error_message = err.user_message().to_string();
        self.error = Some(err.clone());
    }
}

/// Hard-coded sector list used when filter options cannot be fetched
fn fallback_sectors() -> Vec<SectorOption> {
    vec![
        SectorOption {
            id: Some(1),
            name: "Agriculture".to_string(),
        },
        SectorOption {
            id: Some(4),
            name: "Services".to_string(),
        },
        SectorOption {
            id: Some(12),
            name: "Food".to_string(),
        },
        SectorOption {
            id: Some(7),
            name: "Retail".to_string(),
        },
    ]
}

/// Per-view loan browsing session
///
/// Owns the pagination/filter/error state machine over a [`LoanApi`].
/// Methods take `&self`; the state sits behind an async lock so a session can
/// be shared (e.g. `Arc<LoanSession<_>>`) between a view and its handlers.
pub struct LoanSession<T: GraphQLTransport> {
    api: LoanApi<T>,
    state: RwLock<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl<T: GraphQLTransport> LoanSession<T> {
    /// Create a session with the default page size
    pub fn new(api: LoanApi<T>) -> Self {
        Self::with_per_page(api, DEFAULT_PER_PAGE)
    }

    /// Create a session with a custom page size
    pub fn with_per_page(api: LoanApi<T>, per_page: u32) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            api,
            state: RwLock::new(SessionState::new(per_page)),
            events,
        }
    }

    /// Subscribe to state change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Snapshot the current state for rendering
    pub async fn snapshot(&self) -> SessionSnapshot {
        let s = self.state.read().await;
        SessionSnapshot {
            loans: s.loans.clone(),
            filters: s.filters.clone(),
            available_countries: s.available_countries.clone(),
            available_sectors: s.available_sectors.clone(),
            current_page: s.current_page,
            total_count: s.total_count,
            per_page: s.per_page,
            loading_loans: s.loading_loans,
            loading_filters: s.loading_filters,
            error: s.error.clone(),
            error_message: s.error_message.clone(),
        }
    }

    /// Current 1-based page
    pub async fn current_page(&self) -> u32 {
        self.state.read().await.current_page
    }

    /// Total number of pages for the current result set
    pub async fn total_pages(&self) -> u32 {
        let s = self.state.read().await;
        total_pages(s.total_count, s.per_page)
    }

    /// Load one-time data: filter options
    ///
    /// Called once when the owning view comes up. A connectivity failure
    /// degrades to a hard-coded sector list instead of blocking the view;
    /// any other failure propagates.
    pub async fn initialize(&self) -> Result<(), ApiError> {
        self.load_filter_options().await
    }

    /// Load a page of loans and apply it to state
    ///
    /// On a connectivity failure the loan list is emptied and the error
    /// recorded without propagating; other failures are recorded and
    /// returned to the caller.
    pub async fn load_loans(&self, page: u32) -> Result<(), ApiError> {
        let (generation, per_page, filters) = {
            let mut s = self.state.write().await;
            s.loading_loans = true;
            s.clear_error();
            s.generation += 1;
            (s.generation, s.per_page, s.filters.clone())
        };

        let offset = u64::from(page.saturating_sub(1)) * u64::from(per_page);
        let result = self.api.fetch_loans(per_page, offset, &filters).await;

        let mut s = self.state.write().await;
        if s.generation != generation {
            debug!(page, "Discarding superseded loan page response");
            return Ok(());
        }
        s.loading_loans = false;

        match result {
            Ok(loan_page) => {
                s.total_count = loan_page.total_count;
                s.loans = loan_page.loans;
                s.current_page = page;
                let event = SessionEvent::LoansLoaded {
                    page,
                    total_count: s.total_count,
                };
                drop(s);
                self.broadcast(event);
                Ok(())
            }
            Err(err) => {
                error!(error = %err, page, "Failed to load loans");
                s.record_error(&err);
                let message = s.error_message.clone();
                if err.is_network() {
                    // Degrade to an empty grid; connectivity problems are
                    // surfaced through error state, not a panic path.
                    s.loans.clear();
                    s.total_count = 0;
                    drop(s);
                    self.broadcast(SessionEvent::LoadFailed { message });
                    Ok(())
                } else {
                    drop(s);
                    self.broadcast(SessionEvent::LoadFailed { message });
                    Err(err)
                }
            }
        }
    }

    /// Replace the active filters, reset to page 1 and reload
    pub async fn update_filters(&self, filters: LoanFilters) -> Result<(), ApiError> {
        {
            let mut s = self.state.write().await;
            s.filters = filters;
            s.current_page = 1;
        }
        self.broadcast(SessionEvent::FiltersChanged);
        self.load_loans(1).await
    }

    /// Clear all filters, reset to page 1 and reload
    pub async fn clear_filters(&self) -> Result<(), ApiError> {
        self.update_filters(LoanFilters::default()).await
    }

    /// Go to a specific page; out-of-range requests are no-ops
    pub async fn go_to_page(&self, page: u32) -> Result<(), ApiError> {
        {
            let s = self.state.read().await;
            if page < 1 || page > total_pages(s.total_count, s.per_page) {
                return Ok(());
            }
        }
        self.load_loans(page).await
    }

    /// Go to the next page, if any
    pub async fn next_page(&self) -> Result<(), ApiError> {
        let page = self.current_page().await;
        self.go_to_page(page + 1).await
    }

    /// Go to the previous page, if any
    pub async fn prev_page(&self) -> Result<(), ApiError> {
        let page = self.current_page().await;
        if page <= 1 {
            return Ok(());
        }
        self.go_to_page(page - 1).await
    }

    /// Re-issue the last page load
    pub async fn retry(&self) -> Result<(), ApiError> {
        let page = self.current_page().await;
        self.load_loans(page).await
    }

    /// Fetch the country and sector option lists
    pub async fn load_filter_options(&self) -> Result<(), ApiError> {
        {
            let mut s = self.state.write().await;
            s.loading_filters = true;
            s.clear_error();
        }

        let result = self.api.fetch_filter_options().await;

        let mut s = self.state.write().await;
        s.loading_filters = false;

        match result {
            Ok(options) => {
                s.available_countries = options.countries;
                s.available_sectors = options.sectors;
                drop(s);
                self.broadcast(SessionEvent::FilterOptionsLoaded);
                Ok(())
            }
            Err(err) => {
                s.record_error(&err);
                if err.is_network() {
                    // Offline fallback keeps the filter UI usable.
                    warn!(error = %err, "Filter options unavailable, using fallback sectors");
                    s.available_countries = Vec::new();
                    s.available_sectors = fallback_sectors();
                    drop(s);
                    self.broadcast(SessionEvent::FilterOptionsLoaded);
                    Ok(())
                } else {
                    error!(error = %err, "Failed to load filter options");
                    Err(err)
                }
            }
        }
    }

    fn broadcast(&self, event: SessionEvent) {
        // Nobody listening is fine; receivers are optional.
        let _ = self.events.send(event);
    }
}
