//! Prismeira result launcher: library with models, selection/submission logic and the
//! backend service client.

pub mod config;
pub mod logic;
pub mod models;
pub mod service;

pub use config::{ConfigError, Settings};
pub use logic::{
    friendly_winner_options, submit_friendly, valid_referee_candidates, valid_winner_candidates,
    validate_friendly, Committed, FormMessage, FriendlyError, FriendlySubmitError, MatchSelector,
    RefereePool, ResultCoordinator, ResultForm, SelectionError, SubmitError, SubmitGate,
    ValidationError,
};
pub use models::{
    Club, ClubId, Counter, Counters, Draft, FriendlyDraft, FriendlyKind, MatchId, MatchResult,
    MatchStatus, MatchView, NewFriendly, NewResult, Side, Step,
};
pub use service::{MatchDataService, MatchJoins, ResultQuery, ServiceError, SupabaseService};
