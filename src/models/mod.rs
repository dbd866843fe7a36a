//! Data structures for result launching: clubs, matches, results, drafts and friendlies.

mod club;
mod draft;
mod friendly;
mod game;
mod result;

pub use club::{Club, ClubId};
pub use draft::Draft;
pub use friendly::{FriendlyDraft, FriendlyKind, NewFriendly};
pub use game::{
    InvalidMatch, MatchId, MatchStatus, MatchView, STATUS_LAUNCHED, STATUS_LAUNCHED_LEGACY,
    STATUS_PENDING,
};
pub use result::{
    coerce_count, lenient_count, lenient_timestamp, Counter, Counters, MatchResult, NewResult,
    Side, Step,
};
