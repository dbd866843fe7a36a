//! Result submission: owns the draft, validates it and commits in two steps
//! (insert the result, then flip the match status).

use crate::logic::candidates::valid_winner_candidates;
use crate::models::{
    coerce_count, Counter, Draft, MatchId, MatchStatus, MatchView, NewResult, Side, Step,
};
use crate::service::{MatchDataService, ServiceError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Local checks that run before any backend call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationError {
    NoMatchSelected,
    NoReferee,
    /// The chosen referee is one of the clubs playing.
    RefereeIsParticipant,
    /// No winner, or a winner that is not one of the two sides.
    NoWinner,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NoMatchSelected => write!(f, "Select a valid match"),
            ValidationError::NoReferee => write!(f, "Select a referee"),
            ValidationError::RefereeIsParticipant => {
                write!(f, "The referee cannot be one of the clubs playing")
            }
            ValidationError::NoWinner => write!(f, "Select the winner"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Why a submit did not fully complete.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmitError {
    Validation(ValidationError),
    /// Another submit holds the gate.
    InFlight,
    /// Phase 1 failed; nothing was written and the draft is kept.
    InsertFailed(ServiceError),
    /// Phase 2 failed; the result row exists but the match status is stale.
    StatusUpdateFailed(ServiceError),
}

impl SubmitError {
    /// Whether the result row was written despite the error.
    pub fn result_recorded(&self) -> bool {
        matches!(self, SubmitError::StatusUpdateFailed(_))
    }
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::Validation(e) => write!(f, "{}", e),
            SubmitError::InFlight => write!(f, "A submission is already in progress"),
            SubmitError::InsertFailed(e) => write!(f, "Error saving result: {}", e),
            SubmitError::StatusUpdateFailed(e) => {
                write!(f, "result recorded, status update failed: {}", e)
            }
        }
    }
}

impl std::error::Error for SubmitError {}

impl From<ValidationError> for SubmitError {
    fn from(e: ValidationError) -> Self {
        SubmitError::Validation(e)
    }
}

/// In-flight guard for the submit control. Clones share the same flag, so a UI can hold
/// one to disable its button while the coordinator is committing.
#[derive(Clone, Debug, Default)]
pub struct SubmitGate(Arc<AtomicBool>);

/// Held for the duration of one submit; releases the gate on drop.
#[derive(Debug)]
pub struct SubmitTicket(Arc<AtomicBool>);

impl SubmitGate {
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Take the gate, or `None` if a submit is already running.
    pub fn try_acquire(&self) -> Option<SubmitTicket> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitTicket(Arc::clone(&self.0)))
    }
}

impl Drop for SubmitTicket {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Outcome of a fully successful submit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Committed {
    pub record: NewResult,
}

/// Owner of the draft for one submission cycle.
#[derive(Debug, Default)]
pub struct ResultCoordinator {
    draft: Draft,
    gate: SubmitGate,
}

impl ResultCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn submit_gate(&self) -> SubmitGate {
        self.gate.clone()
    }

    /// The selected match changed: zero the counters and drop referee/winner.
    pub fn retarget(&mut self, match_id: Option<MatchId>) {
        self.draft.retarget(match_id);
    }

    /// One +1/-1 press. Returns the new value.
    pub fn adjust(&mut self, counter: Counter, side: Side, step: Step) -> u32 {
        self.draft.counters.adjust(counter, side, step)
    }

    /// Typed input; anything that is not a non-negative number becomes 0.
    pub fn set_counter_text(&mut self, counter: Counter, side: Side, text: &str) -> u32 {
        let value = coerce_count(text);
        self.draft.counters.set(counter, side, value);
        value
    }

    pub fn set_referee(&mut self, referee: Option<String>) {
        self.draft.referee = referee.filter(|r| !r.trim().is_empty());
    }

    pub fn set_winner(&mut self, winner: Option<String>) {
        self.draft.winner = winner.filter(|w| !w.trim().is_empty());
    }

    pub fn reset(&mut self) {
        self.draft.reset();
    }

    /// Check the draft against the selected match and build the insert payload.
    pub fn validate(&self, selected: Option<&MatchView>) -> Result<NewResult, ValidationError> {
        let selected = match selected {
            Some(m) if self.draft.selected_match_id == Some(m.id) => m,
            _ => return Err(ValidationError::NoMatchSelected),
        };
        let referee = self
            .draft
            .referee
            .as_deref()
            .ok_or(ValidationError::NoReferee)?;
        if selected.is_participant(referee) {
            return Err(ValidationError::RefereeIsParticipant);
        }
        let winner = self
            .draft
            .winner
            .as_deref()
            .filter(|w| {
                valid_winner_candidates(Some(selected))
                    .iter()
                    .any(|c| c.as_str() == *w)
            })
            .ok_or(ValidationError::NoWinner)?;

        Ok(NewResult {
            match_id: selected.id,
            referee: referee.to_string(),
            winner: winner.to_string(),
            counters: self.draft.counters,
        })
    }

    /// Validate, insert the result, then mark the match launched.
    ///
    /// The status update is only sent after the insert has succeeded. There is no rollback:
    /// if the update fails the draft is still reset, since the result row exists.
    pub async fn submit<S: MatchDataService>(
        &mut self,
        service: &S,
        selected: Option<&MatchView>,
    ) -> Result<Committed, SubmitError> {
        let _ticket = self.gate.try_acquire().ok_or(SubmitError::InFlight)?;
        let record = self.validate(selected)?;

        log::info!(
            "Submitting result for match {} (winner {})",
            record.match_id,
            record.winner
        );
        if let Err(e) = service.insert_result(&record).await {
            log::warn!("Insert failed for match {}: {}", record.match_id, e);
            return Err(SubmitError::InsertFailed(e));
        }

        let update = service
            .update_match_status(record.match_id, MatchStatus::Launched)
            .await;
        self.draft.reset();
        match update {
            Ok(()) => Ok(Committed { record }),
            Err(e) => {
                log::warn!(
                    "Result for match {} recorded but status update failed: {}",
                    record.match_id,
                    e
                );
                Err(SubmitError::StatusUpdateFailed(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leoes_tigres() -> MatchView {
        MatchView::new(42, 3, MatchStatus::Pending, (1, "Leões"), (2, "Tigres")).unwrap()
    }

    fn ready(m: &MatchView) -> ResultCoordinator {
        let mut c = ResultCoordinator::new();
        c.retarget(Some(m.id));
        c.set_referee(Some("Douglas".into()));
        c.set_winner(Some("Leões".into()));
        c
    }

    #[test]
    fn validation_order() {
        let m = leoes_tigres();
        let mut c = ResultCoordinator::new();
        assert_eq!(c.validate(None), Err(ValidationError::NoMatchSelected));
        // Draft not pointed at this match yet.
        assert_eq!(c.validate(Some(&m)), Err(ValidationError::NoMatchSelected));
        c.retarget(Some(42));
        assert_eq!(c.validate(Some(&m)), Err(ValidationError::NoReferee));
        c.set_referee(Some("Tigres".into()));
        assert_eq!(c.validate(Some(&m)), Err(ValidationError::RefereeIsParticipant));
        c.set_referee(Some("Douglas".into()));
        assert_eq!(c.validate(Some(&m)), Err(ValidationError::NoWinner));
        c.set_winner(Some("Douglas".into()));
        assert_eq!(c.validate(Some(&m)), Err(ValidationError::NoWinner));
        c.set_winner(Some("Tigres".into()));
        assert!(c.validate(Some(&m)).is_ok());
    }

    #[test]
    fn blank_choices_count_as_missing() {
        let m = leoes_tigres();
        let mut c = ready(&m);
        c.set_referee(Some("  ".into()));
        assert_eq!(c.validate(Some(&m)), Err(ValidationError::NoReferee));
    }

    #[test]
    fn counter_text_is_coerced() {
        let m = leoes_tigres();
        let mut c = ready(&m);
        assert_eq!(c.set_counter_text(Counter::Felinos, Side::Home, ""), 0);
        assert_eq!(c.set_counter_text(Counter::Score, Side::Away, "2"), 2);
        let record = c.validate(Some(&m)).unwrap();
        assert_eq!(record.counters.home_felinos, 0);
        assert_eq!(record.counters.away_score, 2);
    }

    #[test]
    fn retarget_clears_dependent_choices() {
        let m = leoes_tigres();
        let mut c = ready(&m);
        c.adjust(Counter::Score, Side::Home, Step::Up);
        c.retarget(Some(43));
        assert_eq!(c.draft().referee, None);
        assert_eq!(c.draft().winner, None);
        assert_eq!(c.draft().counters.home_score, 0);
    }

    #[test]
    fn gate_admits_one_holder() {
        let gate = SubmitGate::default();
        let ticket = gate.try_acquire().unwrap();
        assert!(gate.is_busy());
        assert!(gate.clone().try_acquire().is_none());
        drop(ticket);
        assert!(!gate.is_busy());
        assert!(gate.try_acquire().is_some());
    }

    #[test]
    fn partial_failure_message() {
        let e = SubmitError::StatusUpdateFailed(ServiceError::Rejected {
            status: 409,
            message: "conflict".into(),
            body: r#"{"message":"conflict"}"#.into(),
        });
        assert_eq!(e.to_string(), "result recorded, status update failed: conflict");
        assert!(e.result_recorded());
    }
}
