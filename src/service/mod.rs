//! The external match-data service: the only shared state, owned by the hosted backend.

mod supabase;

pub use supabase::{SupabaseService, DEFAULT_TIMEOUT};

use crate::models::{Club, MatchId, MatchResult, MatchStatus, MatchView, NewFriendly, NewResult};

/// Failure talking to the backend.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ServiceError {
    /// The request never got a response (connection, DNS, timeout).
    Transport(String),
    /// The backend answered with a non-success status. `message` is the PostgREST message when
    /// present; `body` is the response text as received.
    Rejected {
        status: u16,
        message: String,
        body: String,
    },
    /// The response body did not have the expected shape.
    Decode(String),
}

impl ServiceError {
    /// HTTP status to mirror to callers of the passthrough endpoint.
    pub fn status(&self) -> u16 {
        match self {
            ServiceError::Rejected { status, .. } => *status,
            ServiceError::Transport(_) | ServiceError::Decode(_) => 500,
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Transport(msg) => write!(f, "{}", msg),
            ServiceError::Rejected { message, .. } => write!(f, "{}", message),
            ServiceError::Decode(msg) => write!(f, "unexpected response: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

/// Which relations to embed when listing matches. Club names are always joined.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MatchJoins {
    pub results_history: bool,
}

impl MatchJoins {
    pub fn with_history() -> Self {
        Self {
            results_history: true,
        }
    }
}

/// Ordering and size of a result listing.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ResultQuery {
    pub newest_first: bool,
    pub limit: Option<usize>,
}

impl ResultQuery {
    /// Every stored result, backend order.
    pub fn all() -> Self {
        Self::default()
    }

    /// The `limit` most recently created results.
    pub fn recent(limit: usize) -> Self {
        Self {
            newest_first: true,
            limit: Some(limit),
        }
    }
}

/// Read/write operations over the backend's record collections.
///
/// Implementations are injected into the form components; tests use an in-memory fake.
#[allow(async_fn_in_trait)]
pub trait MatchDataService {
    /// All clubs, ordered by name.
    async fn list_clubs(&self) -> Result<Vec<Club>, ServiceError>;

    /// All matches joined with club names, ordered by round then id.
    async fn list_matches(&self, joins: MatchJoins) -> Result<Vec<MatchView>, ServiceError>;

    async fn list_results(&self, query: ResultQuery) -> Result<Vec<MatchResult>, ServiceError>;

    async fn insert_result(&self, record: &NewResult) -> Result<(), ServiceError>;

    async fn update_match_status(
        &self,
        match_id: MatchId,
        status: MatchStatus,
    ) -> Result<(), ServiceError>;

    async fn insert_friendly(&self, record: &NewFriendly) -> Result<(), ServiceError>;
}
