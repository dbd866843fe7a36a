//! Integration tests for loading, filtering and selecting matches, and the derived choice sets.

mod common;

use common::{league, Call};
use fossa_results::logic::NO_MATCH_FOUND;
use fossa_results::{
    Counter, MatchJoins, MatchSelector, RefereePool, ResultForm, ResultQuery, ServiceError, Side,
    Step,
};
use std::sync::Arc;

#[tokio::test]
async fn load_failure_leaves_empty_list() {
    let service = league();
    *service.fail_reads.lock().unwrap() = Some(ServiceError::Transport("offline".into()));
    let mut selector = MatchSelector::default();
    assert_eq!(selector.load(&service).await, 0);
    assert!(selector.matches().is_empty());
    assert_eq!(selector.placeholder(), Some(NO_MATCH_FOUND));
}

#[tokio::test]
async fn history_selector_requests_nested_results() {
    let service = league();
    let mut selector = MatchSelector::with_history();
    assert_eq!(selector.load(&service).await, 3);
    assert_eq!(service.calls(), vec![Call::ListMatches(MatchJoins::with_history())]);
}

#[tokio::test]
async fn every_filtered_match_contains_the_needle() {
    let service = league();
    let mut selector = MatchSelector::default();
    selector.load(&service).await;
    for needle in ["3", "LEÕES", "pant", "42", "lançada", "x", "tigres panteras"] {
        selector.set_filter_text(needle);
        let lowered = needle.to_lowercase();
        let hits: Vec<_> = selector.filtered_matches().collect();
        for m in &hits {
            assert!(m.composite_label().contains(&lowered), "{needle} vs {}", m.composite_label());
        }
        let expected = selector
            .matches()
            .iter()
            .filter(|m| m.composite_label().contains(&lowered))
            .count();
        assert_eq!(hits.len(), expected);
    }
}

#[tokio::test]
async fn init_with_club_pool_loads_clubs_once() {
    let service = Arc::new(league());
    let mut form = ResultForm::new(service.clone(), RefereePool::Clubs).with_recent_limit(5);
    form.init().await;
    assert_eq!(
        service.calls(),
        vec![
            Call::ListClubs,
            Call::ListMatches(MatchJoins::with_history()),
            Call::ListResults(ResultQuery::recent(5)),
        ]
    );
    assert_eq!(form.clubs().len(), 3);

    // No match selected: every club may referee, nobody may win yet.
    assert_eq!(form.referee_candidates().len(), 3);
    assert!(form.winner_candidates().is_empty());

    form.select(42).unwrap();
    assert_eq!(form.referee_candidates(), vec!["Panteras"]);
    assert_eq!(form.winner_candidates(), vec!["Leões", "Tigres"]);
}

#[tokio::test]
async fn selecting_another_match_resets_the_draft() {
    let service = Arc::new(league());
    let mut form = ResultForm::new(service, RefereePool::default());
    form.init().await;

    form.open_dropdown();
    form.select(42).unwrap();
    assert!(!form.selector().is_dropdown_open());
    form.adjust(Counter::Score, Side::Home, Step::Up);
    form.adjust(Counter::Sinucas, Side::Away, Step::Up);
    form.set_referee(Some("Pedro".into()));
    form.set_winner(Some("Tigres".into()));

    form.select(43).unwrap();
    let draft = form.draft();
    assert_eq!(draft.selected_match_id, Some(43));
    assert_eq!(draft.counters, fossa_results::Counters::default());
    assert_eq!(draft.referee, None);
    assert_eq!(draft.winner, None);
}

#[tokio::test]
async fn unknown_match_leaves_draft_alone() {
    let service = Arc::new(league());
    let mut form = ResultForm::new(service, RefereePool::default());
    form.init().await;
    form.select(42).unwrap();
    form.adjust(Counter::Score, Side::Home, Step::Up);
    assert!(form.select(999).is_err());
    assert_eq!(form.draft().selected_match_id, Some(42));
    assert_eq!(form.draft().counters.home_score, 1);
}

#[tokio::test]
async fn dismiss_closes_dropdown_without_selecting() {
    let service = Arc::new(league());
    let mut form = ResultForm::new(service, RefereePool::default());
    form.init().await;
    form.set_filter_text("tigres");
    assert!(form.selector().is_dropdown_open());
    form.dismiss_dropdown();
    assert!(!form.selector().is_dropdown_open());
    assert_eq!(form.selected_match(), None);
    assert_eq!(form.selector().filter_text(), "tigres");
}
