//! Friendly mode: a single insert, no match status to update.

use crate::models::{Club, ClubId, FriendlyDraft, FriendlyKind, NewFriendly, Side};
use crate::service::{MatchDataService, ServiceError};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FriendlyError {
    /// Home 1, away 1 or the date is missing.
    MissingRequired,
    /// Doubles without a second club on each side.
    MissingSecondPair,
    /// The same club appears on both sides.
    ClubOnBothSides,
    NoWinner,
}

impl std::fmt::Display for FriendlyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FriendlyError::MissingRequired => {
                write!(f, "Home 1, away 1 and the friendly date are required")
            }
            FriendlyError::MissingSecondPair => {
                write!(f, "Doubles need home 2 and away 2")
            }
            FriendlyError::ClubOnBothSides => {
                write!(f, "A club cannot play on both sides")
            }
            FriendlyError::NoWinner => write!(f, "Select the winner"),
        }
    }
}

impl std::error::Error for FriendlyError {}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FriendlySubmitError {
    Validation(FriendlyError),
    InsertFailed(ServiceError),
}

impl std::fmt::Display for FriendlySubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FriendlySubmitError::Validation(e) => write!(f, "{}", e),
            FriendlySubmitError::InsertFailed(e) => write!(f, "Error saving friendly: {}", e),
        }
    }
}

impl std::error::Error for FriendlySubmitError {}

impl From<FriendlyError> for FriendlySubmitError {
    fn from(e: FriendlyError) -> Self {
        FriendlySubmitError::Validation(e)
    }
}

/// Winner options: one label per side that has all its clubs filled in
/// ("A" for singles, "A + B" for doubles).
pub fn friendly_winner_options(draft: &FriendlyDraft, clubs: &[Club]) -> Vec<(Side, String)> {
    let name = |id: ClubId| {
        clubs
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.clone())
            .unwrap_or_default()
    };
    let needed = match draft.kind {
        FriendlyKind::Singles => 1,
        FriendlyKind::Doubles => 2,
    };
    [Side::Home, Side::Away]
        .into_iter()
        .filter_map(|side| {
            let ids = draft.side_clubs(side);
            (ids.len() == needed).then(|| {
                let names: Vec<String> = ids.into_iter().map(&name).collect();
                (side, names.join(" + "))
            })
        })
        .collect()
}

/// Check the friendly form and build the insert payload.
pub fn validate_friendly(draft: &FriendlyDraft) -> Result<NewFriendly, FriendlyError> {
    let (home_1, away_1, date) = match (draft.home_1, draft.away_1, draft.date) {
        (Some(h), Some(a), Some(d)) => (h, a, d),
        _ => return Err(FriendlyError::MissingRequired),
    };
    let (home_2, away_2) = match draft.kind {
        FriendlyKind::Singles => (None, None),
        FriendlyKind::Doubles => match (draft.home_2, draft.away_2) {
            (Some(h), Some(a)) => (Some(h), Some(a)),
            _ => return Err(FriendlyError::MissingSecondPair),
        },
    };
    let home = draft.side_clubs(Side::Home);
    let away = draft.side_clubs(Side::Away);
    if home.iter().any(|id| away.contains(id)) {
        return Err(FriendlyError::ClubOnBothSides);
    }
    let (winner_1, winner_2) = match draft.winner.ok_or(FriendlyError::NoWinner)? {
        Side::Home => (home_1, home_2),
        Side::Away => (away_1, away_2),
    };

    Ok(NewFriendly {
        kind: draft.kind,
        home_1,
        home_2,
        away_1,
        away_2,
        date,
        counters: draft.counters,
        winner_1,
        winner_2,
    })
}

/// Validate and insert. The draft is reset on success and kept on any failure.
pub async fn submit_friendly<S: MatchDataService>(
    service: &S,
    draft: &mut FriendlyDraft,
) -> Result<NewFriendly, FriendlySubmitError> {
    let record = validate_friendly(draft)?;
    service.insert_friendly(&record).await.map_err(|e| {
        log::warn!("Friendly insert failed: {}", e);
        FriendlySubmitError::InsertFailed(e)
    })?;
    log::info!("Friendly saved ({:?}, {})", record.kind, record.date);
    draft.reset();
    Ok(record)
}
