//! Match selector: a searchable list of matches from which exactly one is picked.

use crate::models::{MatchId, MatchView};
use crate::service::{MatchDataService, MatchJoins};

/// Placeholder shown instead of an empty dropdown.
pub const NO_MATCH_FOUND: &str = "No match found";

/// Errors from picking a match.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SelectionError {
    /// The id is not in the loaded list.
    UnknownMatch(MatchId),
}

impl std::fmt::Display for SelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionError::UnknownMatch(id) => write!(f, "Match {} not found", id),
        }
    }
}

impl std::error::Error for SelectionError {}

/// Selector state: the loaded matches, the filter text and the current pick.
#[derive(Clone, Debug, Default)]
pub struct MatchSelector {
    matches: Vec<MatchView>,
    filter_text: String,
    selected: Option<MatchId>,
    dropdown_open: bool,
    joins: MatchJoins,
}

/// Restartable view over the matches passing the current filter. Clone it to iterate again.
#[derive(Clone, Debug)]
pub struct FilteredMatches<'a> {
    inner: std::slice::Iter<'a, MatchView>,
    needle: Option<String>,
}

impl<'a> Iterator for FilteredMatches<'a> {
    type Item = &'a MatchView;

    fn next(&mut self) -> Option<Self::Item> {
        let needle = self.needle.as_deref();
        self.inner
            .by_ref()
            .find(|m| needle.map_or(true, |n| m.composite_label().contains(n)))
    }
}

impl MatchSelector {
    /// A selector that embeds each match's result history when loading.
    pub fn with_history() -> Self {
        Self {
            joins: MatchJoins::with_history(),
            ..Self::default()
        }
    }

    /// Fetch all matches. A transport failure is logged and leaves the list empty.
    /// Returns the number of matches loaded.
    pub async fn load<S: MatchDataService>(&mut self, service: &S) -> usize {
        match service.list_matches(self.joins).await {
            Ok(matches) => self.matches = matches,
            Err(e) => {
                log::error!("Failed to load matches: {}", e);
                self.matches.clear();
            }
        }
        if let Some(id) = self.selected {
            if !self.matches.iter().any(|m| m.id == id) {
                self.selected = None;
            }
        }
        self.matches.len()
    }

    /// Replace the list directly (e.g. from a cached fetch).
    pub fn set_matches(&mut self, matches: Vec<MatchView>) {
        self.matches = matches;
    }

    pub fn matches(&self) -> &[MatchView] {
        &self.matches
    }

    /// Update the filter text. Typing opens the dropdown; the selection is left alone.
    pub fn set_filter_text(&mut self, text: impl Into<String>) {
        self.filter_text = text.into();
        self.dropdown_open = true;
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    /// Matches whose composite label contains the filter text, case-insensitively.
    /// An empty or whitespace-only filter yields every match.
    pub fn filtered_matches(&self) -> FilteredMatches<'_> {
        let needle = if self.filter_text.trim().is_empty() {
            None
        } else {
            Some(self.filter_text.to_lowercase())
        };
        FilteredMatches {
            inner: self.matches.iter(),
            needle,
        }
    }

    /// `Some(NO_MATCH_FOUND)` when the filter leaves nothing to show.
    pub fn placeholder(&self) -> Option<&'static str> {
        self.filtered_matches()
            .next()
            .is_none()
            .then_some(NO_MATCH_FOUND)
    }

    /// Pick a match by id and close the dropdown.
    pub fn select(&mut self, match_id: MatchId) -> Result<&MatchView, SelectionError> {
        let idx = self
            .matches
            .iter()
            .position(|m| m.id == match_id)
            .ok_or(SelectionError::UnknownMatch(match_id))?;
        self.selected = Some(match_id);
        self.dropdown_open = false;
        Ok(&self.matches[idx])
    }

    pub fn selected_id(&self) -> Option<MatchId> {
        self.selected
    }

    pub fn selected_match(&self) -> Option<&MatchView> {
        let id = self.selected?;
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn open_dropdown(&mut self) {
        self.dropdown_open = true;
    }

    /// Pointer interaction outside the selector.
    pub fn dismiss(&mut self) {
        self.dropdown_open = false;
    }

    pub fn is_dropdown_open(&self) -> bool {
        self.dropdown_open
    }

    /// Forget filter text and selection (after a successful submit).
    pub fn clear(&mut self) {
        self.filter_text.clear();
        self.selected = None;
        self.dropdown_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchStatus;

    fn selector() -> MatchSelector {
        let mut s = MatchSelector::default();
        s.set_matches(vec![
            MatchView::new(42, 3, MatchStatus::Pending, (1, "Leões"), (2, "Tigres")).unwrap(),
            MatchView::new(43, 3, MatchStatus::Launched, (3, "Panteras"), (1, "Leões")).unwrap(),
            MatchView::new(50, 4, MatchStatus::Pending, (2, "Tigres"), (3, "Panteras")).unwrap(),
        ]);
        s
    }

    fn ids(s: &MatchSelector) -> Vec<MatchId> {
        s.filtered_matches().map(|m| m.id).collect()
    }

    #[test]
    fn blank_filter_returns_everything() {
        let mut s = selector();
        assert_eq!(ids(&s), vec![42, 43, 50]);
        s.set_filter_text("   ");
        assert_eq!(ids(&s), vec![42, 43, 50]);
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let mut s = selector();
        s.set_filter_text("LEÕES");
        assert_eq!(ids(&s), vec![42, 43]);
        s.set_filter_text("lançada");
        assert_eq!(ids(&s), vec![43]);
        s.set_filter_text("4 50");
        assert_eq!(ids(&s), vec![50]);
    }

    #[test]
    fn filtered_view_is_restartable() {
        let mut s = selector();
        s.set_filter_text("tigres");
        let view = s.filtered_matches();
        let first: Vec<_> = view.clone().map(|m| m.id).collect();
        let second: Vec<_> = view.map(|m| m.id).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_result_has_placeholder() {
        let mut s = selector();
        assert_eq!(s.placeholder(), None);
        s.set_filter_text("corinthians");
        assert_eq!(s.placeholder(), Some(NO_MATCH_FOUND));
    }

    #[test]
    fn select_closes_dropdown_and_filter_keeps_selection() {
        let mut s = selector();
        s.set_filter_text("tig");
        assert!(s.is_dropdown_open());
        s.select(50).unwrap();
        assert!(!s.is_dropdown_open());
        s.set_filter_text("something else");
        assert_eq!(s.selected_id(), Some(50));
    }

    #[test]
    fn select_unknown_match_fails() {
        let mut s = selector();
        assert_eq!(s.select(99).unwrap_err(), SelectionError::UnknownMatch(99));
        assert_eq!(s.selected_id(), None);
    }
}
