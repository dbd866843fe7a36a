//! Result-launching logic: match selection, derived choices, submission, friendlies.

mod candidates;
mod coordinator;
mod form;
mod friendly;
mod history;
mod selector;

pub use candidates::{
    valid_referee_candidates, valid_winner_candidates, RefereePool, DEFAULT_ROSTER,
};
pub use coordinator::{
    Committed, ResultCoordinator, SubmitError, SubmitGate, SubmitTicket, ValidationError,
};
pub use form::{FormMessage, ResultForm, DEFAULT_RECENT_LIMIT, SUCCESS_MESSAGE};
pub use friendly::{
    friendly_winner_options, submit_friendly, validate_friendly, FriendlyError,
    FriendlySubmitError,
};
pub use history::export_history_csv;
pub use selector::{FilteredMatches, MatchSelector, SelectionError, NO_MATCH_FOUND};
