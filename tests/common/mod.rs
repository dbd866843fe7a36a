//! In-memory match-data service that records every call.

#![allow(dead_code)]

use chrono::Utc;
use fossa_results::{
    Club, MatchDataService, MatchId, MatchJoins, MatchResult, MatchStatus, MatchView, NewFriendly,
    NewResult, ResultQuery, ServiceError,
};
use std::sync::Mutex;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    ListClubs,
    ListMatches(MatchJoins),
    ListResults(ResultQuery),
    InsertResult(NewResult),
    UpdateStatus(MatchId, MatchStatus),
    InsertFriendly(NewFriendly),
}

#[derive(Default)]
pub struct FakeService {
    pub clubs: Vec<Club>,
    pub matches: Mutex<Vec<MatchView>>,
    pub results: Mutex<Vec<MatchResult>>,
    pub friendlies: Mutex<Vec<NewFriendly>>,
    calls: Mutex<Vec<Call>>,
    pub fail_reads: Mutex<Option<ServiceError>>,
    pub fail_insert: Mutex<Option<ServiceError>>,
    pub fail_update: Mutex<Option<ServiceError>>,
}

pub fn leoes_tigres() -> MatchView {
    MatchView::new(42, 3, MatchStatus::Pending, (1, "Leões"), (2, "Tigres")).unwrap()
}

pub fn league() -> FakeService {
    FakeService {
        clubs: vec![
            Club::new(1, "Leões"),
            Club::new(3, "Panteras"),
            Club::new(2, "Tigres"),
        ],
        matches: Mutex::new(vec![
            leoes_tigres(),
            MatchView::new(43, 3, MatchStatus::Pending, (3, "Panteras"), (1, "Leões")).unwrap(),
            MatchView::new(50, 4, MatchStatus::Launched, (2, "Tigres"), (3, "Panteras")).unwrap(),
        ]),
        ..FakeService::default()
    }
}

pub fn rejected(message: &str) -> ServiceError {
    ServiceError::Rejected {
        status: 409,
        message: message.to_string(),
        body: format!(r#"{{"message":"{}"}}"#, message),
    }
}

impl FakeService {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that write to the backend, in order.
    pub fn writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| {
                matches!(
                    c,
                    Call::InsertResult(_) | Call::UpdateStatus(..) | Call::InsertFriendly(_)
                )
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn read_error(&self) -> Result<(), ServiceError> {
        match self.fail_reads.lock().unwrap().clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl MatchDataService for FakeService {
    async fn list_clubs(&self) -> Result<Vec<Club>, ServiceError> {
        self.record(Call::ListClubs);
        self.read_error()?;
        Ok(self.clubs.clone())
    }

    async fn list_matches(&self, joins: MatchJoins) -> Result<Vec<MatchView>, ServiceError> {
        self.record(Call::ListMatches(joins));
        self.read_error()?;
        let mut matches = self.matches.lock().unwrap().clone();
        if !joins.results_history {
            for m in &mut matches {
                m.results.clear();
            }
        }
        Ok(matches)
    }

    async fn list_results(&self, query: ResultQuery) -> Result<Vec<MatchResult>, ServiceError> {
        self.record(Call::ListResults(query));
        self.read_error()?;
        let mut results = self.results.lock().unwrap().clone();
        if query.newest_first {
            results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
        if let Some(limit) = query.limit {
            results.truncate(limit);
        }
        Ok(results)
    }

    async fn insert_result(&self, record: &NewResult) -> Result<(), ServiceError> {
        self.record(Call::InsertResult(record.clone()));
        if let Some(e) = self.fail_insert.lock().unwrap().clone() {
            return Err(e);
        }
        let stored = MatchResult {
            match_id: record.match_id,
            referee: record.referee.clone(),
            winner: record.winner.clone(),
            counters: record.counters,
            created_at: Some(Utc::now()),
        };
        if let Some(m) = self
            .matches
            .lock()
            .unwrap()
            .iter_mut()
            .find(|m| m.id == record.match_id)
        {
            m.results.push(stored.clone());
        }
        self.results.lock().unwrap().push(stored);
        Ok(())
    }

    async fn update_match_status(
        &self,
        match_id: MatchId,
        status: MatchStatus,
    ) -> Result<(), ServiceError> {
        self.record(Call::UpdateStatus(match_id, status));
        if let Some(e) = self.fail_update.lock().unwrap().clone() {
            return Err(e);
        }
        if let Some(m) = self
            .matches
            .lock()
            .unwrap()
            .iter_mut()
            .find(|m| m.id == match_id)
        {
            m.status = status;
        }
        Ok(())
    }

    async fn insert_friendly(&self, record: &NewFriendly) -> Result<(), ServiceError> {
        self.record(Call::InsertFriendly(record.clone()));
        if let Some(e) = self.fail_insert.lock().unwrap().clone() {
            return Err(e);
        }
        self.friendlies.lock().unwrap().push(record.clone());
        Ok(())
    }
}
