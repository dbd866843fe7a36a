//! Match (partida), its lifecycle status and the denormalised view used by the selector.

use crate::models::club::ClubId;
use crate::models::result::MatchResult;
use serde::{Deserialize, Serialize};

/// Backend identifier of a match (`id_partida`).
pub type MatchId = i64;

/// Literal written to `status_partida` once a result has been launched.
pub const STATUS_LAUNCHED: &str = "LANÇADA";
/// Older pages wrote the masculine form; still read as launched.
pub const STATUS_LAUNCHED_LEGACY: &str = "LANÇADO";
/// Literal for a match still waiting for its result.
pub const STATUS_PENDING: &str = "PENDENTE";

/// Lifecycle status of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MatchStatus {
    #[default]
    Pending,
    Launched,
}

impl MatchStatus {
    /// Canonical backend literal.
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Pending => STATUS_PENDING,
            MatchStatus::Launched => STATUS_LAUNCHED,
        }
    }

    /// Parse a backend literal. Anything that is not a launched literal counts as pending.
    pub fn from_literal(literal: &str) -> Self {
        match literal.trim() {
            STATUS_LAUNCHED | STATUS_LAUNCHED_LEGACY => MatchStatus::Launched,
            _ => MatchStatus::Pending,
        }
    }
}

impl From<String> for MatchStatus {
    fn from(s: String) -> Self {
        MatchStatus::from_literal(&s)
    }
}

impl From<MatchStatus> for String {
    fn from(s: MatchStatus) -> Self {
        s.as_str().to_string()
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A match row that cannot be represented.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InvalidMatch {
    /// Home and away point at the same club.
    SameClub { match_id: MatchId, club_id: ClubId },
}

impl std::fmt::Display for InvalidMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidMatch::SameClub { match_id, club_id } => {
                write!(f, "Match {} has club {} on both sides", match_id, club_id)
            }
        }
    }
}

impl std::error::Error for InvalidMatch {}

/// A match joined with its club names and (optionally) its result history.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchView {
    pub id: MatchId,
    pub round: i64,
    pub status: MatchStatus,
    pub home_club_id: ClubId,
    pub away_club_id: ClubId,
    pub home_name: String,
    pub away_name: String,
    /// Results launched for this match, oldest first. Empty when history was not joined.
    #[serde(default)]
    pub results: Vec<MatchResult>,
}

impl MatchView {
    /// Build a view, refusing a match whose home and away club are the same.
    pub fn new<H: Into<String>, A: Into<String>>(
        id: MatchId,
        round: i64,
        status: MatchStatus,
        (home_club_id, home_name): (ClubId, H),
        (away_club_id, away_name): (ClubId, A),
    ) -> Result<Self, InvalidMatch> {
        if home_club_id == away_club_id {
            return Err(InvalidMatch::SameClub {
                match_id: id,
                club_id: home_club_id,
            });
        }
        Ok(Self {
            id,
            round,
            status,
            home_club_id,
            away_club_id,
            home_name: home_name.into(),
            away_name: away_name.into(),
            results: Vec::new(),
        })
    }

    /// Attach result history, sorted by creation time ascending. Undated results come first.
    pub fn with_results(mut self, mut results: Vec<MatchResult>) -> Self {
        results.sort_by_key(|r| r.created_at);
        self.results = results;
        self
    }

    /// Searchable text: round, id, home, away and status, lowercased.
    pub fn composite_label(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.round, self.id, self.home_name, self.away_name, self.status
        )
        .to_lowercase()
    }

    /// Text shown for the match in the dropdown and in the input after selection.
    pub fn display_label(&self) -> String {
        format!(
            "Rodada {} - Partida {} - {} x {}",
            self.round, self.id, self.home_name, self.away_name
        )
    }

    /// Whether `name` is one of the two clubs playing.
    pub fn is_participant(&self, name: &str) -> bool {
        name == self.home_name || name == self.away_name
    }
}
