//! The in-progress, unsaved result being edited on the launch page.

use crate::models::game::MatchId;
use crate::models::result::Counters;
use serde::{Deserialize, Serialize};

/// Client-held draft. Lives only while the form is open.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub selected_match_id: Option<MatchId>,
    pub referee: Option<String>,
    pub winner: Option<String>,
    pub counters: Counters,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the draft at another match: counters go back to zero and the referee/winner
    /// choices are dropped, since both depend on which clubs are playing.
    pub fn retarget(&mut self, match_id: Option<MatchId>) {
        self.selected_match_id = match_id;
        self.referee = None;
        self.winner = None;
        self.counters = Counters::default();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
