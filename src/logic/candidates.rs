//! Choice sets derived from the selected match: who may referee, who may win.

use crate::models::{Club, MatchView};
use serde::{Deserialize, Serialize};

/// Fixed roster offered on the launch page.
pub const DEFAULT_ROSTER: [&str; 10] = [
    "Leonardo", "Douglas", "Sandro", "Vagner", "João", "Luis", "Pedro", "Iuri", "Gustavo", "Erick",
];

/// Where referee names come from.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "names")]
pub enum RefereePool {
    /// A fixed list of names.
    Roster(Vec<String>),
    /// Official league: any registered club may referee a match it is not playing.
    Clubs,
}

impl Default for RefereePool {
    fn default() -> Self {
        RefereePool::Roster(DEFAULT_ROSTER.iter().map(|s| s.to_string()).collect())
    }
}

impl RefereePool {
    /// Resolve the pool to names. `clubs` is only consulted for [`RefereePool::Clubs`].
    pub fn names(&self, clubs: &[Club]) -> Vec<String> {
        match self {
            RefereePool::Roster(names) => names.clone(),
            RefereePool::Clubs => clubs.iter().map(|c| c.name.clone()).collect(),
        }
    }
}

/// Pool minus the two clubs playing. With no match selected the whole pool is valid.
pub fn valid_referee_candidates(selected: Option<&MatchView>, pool: &[String]) -> Vec<String> {
    pool.iter()
        .filter(|name| selected.map_or(true, |m| !m.is_participant(name)))
        .cloned()
        .collect()
}

/// Exactly the home and away names of the selected match; empty when nothing is selected.
pub fn valid_winner_candidates(selected: Option<&MatchView>) -> Vec<String> {
    match selected {
        Some(m) => vec![m.home_name.clone(), m.away_name.clone()],
        None => Vec::new(),
    }
}
