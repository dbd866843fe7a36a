//! Friendly matches (amistosos): one-off games outside the league table.

use crate::models::club::ClubId;
use crate::models::result::{Counters, Side};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Singles (one club per side) or doubles (two per side).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum FriendlyKind {
    #[default]
    #[serde(rename = "INDIVIDUAL")]
    Singles,
    #[serde(rename = "DUPLA")]
    Doubles,
}

/// Friendly form state as entered by the user.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct FriendlyDraft {
    #[serde(default)]
    pub kind: FriendlyKind,
    pub home_1: Option<ClubId>,
    pub home_2: Option<ClubId>,
    pub away_1: Option<ClubId>,
    pub away_2: Option<ClubId>,
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub counters: Counters,
    /// Winning side; for doubles the whole pair on that side wins.
    pub winner: Option<Side>,
}

impl FriendlyDraft {
    /// Clubs entered on one side, in slot order. The second slot only counts for doubles.
    pub fn side_clubs(&self, side: Side) -> Vec<ClubId> {
        let (first, second) = match side {
            Side::Home => (self.home_1, self.home_2),
            Side::Away => (self.away_1, self.away_2),
        };
        let second = match self.kind {
            FriendlyKind::Singles => None,
            FriendlyKind::Doubles => second,
        };
        first.into_iter().chain(second).collect()
    }

    /// Clear everything except the singles/doubles choice.
    pub fn reset(&mut self) {
        *self = Self {
            kind: self.kind,
            ..Self::default()
        };
    }
}

/// Payload inserted into `tab_amistoso`. Second-slot fields are null for singles.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewFriendly {
    #[serde(rename = "tipo")]
    pub kind: FriendlyKind,
    #[serde(rename = "mandante1")]
    pub home_1: ClubId,
    #[serde(rename = "mandante2")]
    pub home_2: Option<ClubId>,
    #[serde(rename = "visitante1")]
    pub away_1: ClubId,
    #[serde(rename = "visitante2")]
    pub away_2: Option<ClubId>,
    #[serde(rename = "data_amistoso")]
    pub date: NaiveDate,
    #[serde(flatten)]
    pub counters: Counters,
    #[serde(rename = "vencedor1")]
    pub winner_1: ClubId,
    #[serde(rename = "vencedor2")]
    pub winner_2: Option<ClubId>,
}
