//! The "launch official result" page: selector and coordinator wired to one injected service.

use crate::logic::candidates::{valid_referee_candidates, valid_winner_candidates, RefereePool};
use crate::logic::coordinator::{Committed, ResultCoordinator, SubmitError, SubmitGate};
use crate::logic::selector::{FilteredMatches, MatchSelector, SelectionError};
use crate::models::{Club, Counter, Draft, MatchId, MatchResult, MatchView, Side, Step};
use crate::service::{MatchDataService, ResultQuery};
use serde::Serialize;
use std::sync::Arc;

/// How many recent results the page lists.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

pub const SUCCESS_MESSAGE: &str = "Result saved and match status updated";

/// Inline feedback shown under the form.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "text")]
pub enum FormMessage {
    Success(String),
    Error(String),
}

impl FormMessage {
    pub fn text(&self) -> &str {
        match self {
            FormMessage::Success(t) | FormMessage::Error(t) => t,
        }
    }
}

/// Page state. All backend access goes through `service`.
pub struct ResultForm<S> {
    service: Arc<S>,
    selector: MatchSelector,
    coordinator: ResultCoordinator,
    referee_pool: RefereePool,
    clubs: Vec<Club>,
    recent_results: Vec<MatchResult>,
    recent_limit: usize,
    message: Option<FormMessage>,
}

impl<S: MatchDataService> ResultForm<S> {
    pub fn new(service: Arc<S>, referee_pool: RefereePool) -> Self {
        Self {
            service,
            selector: MatchSelector::with_history(),
            coordinator: ResultCoordinator::new(),
            referee_pool,
            clubs: Vec::new(),
            recent_results: Vec::new(),
            recent_limit: DEFAULT_RECENT_LIMIT,
            message: None,
        }
    }

    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    /// Initial load: clubs (league referee pool only), matches and recent results.
    /// Failures are logged and leave the affected list empty.
    pub async fn init(&mut self) {
        if self.referee_pool == RefereePool::Clubs {
            match self.service.list_clubs().await {
                Ok(clubs) => self.clubs = clubs,
                Err(e) => log::error!("Failed to load clubs: {}", e),
            }
        }
        self.refresh().await;
    }

    /// Reload matches and the recent-results list.
    pub async fn refresh(&mut self) {
        self.selector.load(self.service.as_ref()).await;
        self.refresh_history().await;
    }

    pub async fn refresh_history(&mut self) {
        match self
            .service
            .list_results(ResultQuery::recent(self.recent_limit))
            .await
        {
            Ok(results) => self.recent_results = results,
            Err(e) => {
                log::error!("Failed to load recent results: {}", e);
                self.recent_results.clear();
            }
        }
    }

    pub fn selector(&self) -> &MatchSelector {
        &self.selector
    }

    pub fn set_filter_text(&mut self, text: impl Into<String>) {
        self.selector.set_filter_text(text);
    }

    pub fn filtered_matches(&self) -> FilteredMatches<'_> {
        self.selector.filtered_matches()
    }

    pub fn open_dropdown(&mut self) {
        self.selector.open_dropdown();
    }

    pub fn dismiss_dropdown(&mut self) {
        self.selector.dismiss();
    }

    /// Pick a match. The draft is retargeted: counters zeroed, referee and winner cleared.
    pub fn select(&mut self, match_id: MatchId) -> Result<&MatchView, SelectionError> {
        let selected = self.selector.select(match_id)?;
        self.coordinator.retarget(Some(match_id));
        Ok(selected)
    }

    pub fn selected_match(&self) -> Option<&MatchView> {
        self.selector.selected_match()
    }

    pub fn referee_candidates(&self) -> Vec<String> {
        let pool = self.referee_pool.names(&self.clubs);
        valid_referee_candidates(self.selected_match(), &pool)
    }

    pub fn winner_candidates(&self) -> Vec<String> {
        valid_winner_candidates(self.selected_match())
    }

    pub fn adjust(&mut self, counter: Counter, side: Side, step: Step) -> u32 {
        self.coordinator.adjust(counter, side, step)
    }

    pub fn set_counter_text(&mut self, counter: Counter, side: Side, text: &str) -> u32 {
        self.coordinator.set_counter_text(counter, side, text)
    }

    pub fn set_referee(&mut self, referee: Option<String>) {
        self.coordinator.set_referee(referee);
    }

    pub fn set_winner(&mut self, winner: Option<String>) {
        self.coordinator.set_winner(winner);
    }

    pub fn draft(&self) -> &Draft {
        self.coordinator.draft()
    }

    pub fn clubs(&self) -> &[Club] {
        &self.clubs
    }

    pub fn recent_results(&self) -> &[MatchResult] {
        &self.recent_results
    }

    pub fn message(&self) -> Option<&FormMessage> {
        self.message.as_ref()
    }

    /// Shared in-flight flag; busy while a submit is running.
    pub fn submit_gate(&self) -> SubmitGate {
        self.coordinator.submit_gate()
    }

    /// Commit the draft. Whenever the result row was written (full or partial success)
    /// selection and filter are cleared and both lists reloaded.
    pub async fn submit(&mut self) -> Result<Committed, SubmitError> {
        self.message = None;
        let outcome = self
            .coordinator
            .submit(self.service.as_ref(), self.selector.selected_match())
            .await;

        match &outcome {
            Ok(_) => self.message = Some(FormMessage::Success(SUCCESS_MESSAGE.to_string())),
            Err(e) => self.message = Some(FormMessage::Error(e.to_string())),
        }
        let recorded = match &outcome {
            Ok(_) => true,
            Err(e) => e.result_recorded(),
        };
        if recorded {
            self.selector.clear();
            self.refresh().await;
        }
        outcome
    }

    /// Discard the draft and the selection without submitting.
    pub fn reset(&mut self) {
        self.coordinator.reset();
        self.selector.clear();
        self.message = None;
    }
}
