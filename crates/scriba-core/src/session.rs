//! Session domain model.
//!
//! A [`Session`] holds the working idea and the three generated artifacts.
//! It is owned exclusively by the session use case in the application
//! layer; everything here is data plus the small invariant-preserving
//! mutations that layer drives.

use crate::stage::Stage;
use serde::{Deserialize, Serialize};

/// One user's drafting session.
///
/// Invariants maintained by the mutation helpers:
/// - `chosen_title` is in bounds of `title_candidates` whenever set
/// - `concept` is unset unless a title is chosen
/// - `proposal` is unset unless `concept` is set
/// - changing the idea clears everything built on top of it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
    /// Timestamp when the session was last updated (ISO 8601 format)
    pub updated_at: String,
    /// The working research idea, trimmed.
    pub idea: String,
    /// Current lifecycle stage.
    pub stage: Stage,
    /// Model-proposed titles in model output order.
    pub title_candidates: Vec<String>,
    /// Index into `title_candidates`, if one is selected.
    pub chosen_title: Option<usize>,
    /// Generated concept paper.
    pub concept: Option<String>,
    /// Generated full proposal.
    pub proposal: Option<String>,
    /// True while a generation call is in flight for this session.
    pub generating: bool,
}

impl Session {
    /// Creates a fresh, empty session.
    pub fn new() -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: now.clone(),
            updated_at: now,
            idea: String::new(),
            stage: Stage::Empty,
            title_candidates: Vec::new(),
            chosen_title: None,
            concept: None,
            proposal: None,
            generating: false,
        }
    }

    /// The currently selected title candidate, if any.
    pub fn chosen_title_text(&self) -> Option<&str> {
        self.chosen_title
            .and_then(|i| self.title_candidates.get(i))
            .map(String::as_str)
    }

    /// Drops every artifact derived from the idea: candidates, selection,
    /// concept and proposal.
    pub fn clear_downstream_of_idea(&mut self) {
        self.title_candidates.clear();
        self.chosen_title = None;
        self.concept = None;
        self.proposal = None;
    }

    /// Drops the artifacts derived from the chosen title.
    pub fn clear_downstream_of_title(&mut self) {
        self.concept = None;
        self.proposal = None;
    }

    /// Refreshes `updated_at`. Called by every mutating operation.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of applying a finished generation call to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The artifact was applied and the stage advanced.
    Applied,
    /// The response text produced no usable title candidates. The stage is
    /// unchanged; the caller may retry.
    NoCandidates,
    /// The session was cleared or re-seeded while the call was in flight;
    /// the straggling response was discarded without touching newer state.
    Superseded,
}

/// Parses an LLM title response into candidate titles.
///
/// Splits on newlines, trims each line, discards lines shorter than 10
/// characters, lines starting with "title" (case-insensitive), and lines
/// starting with "-". Remaining order is preserved.
pub fn parse_title_candidates(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| {
            if line.chars().count() < 10 {
                return false;
            }
            if line.to_lowercase().starts_with("title") || line.starts_with('-') {
                return false;
            }
            true
        })
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_empty() {
        let session = Session::new();
        assert_eq!(session.stage, Stage::Empty);
        assert!(session.idea.is_empty());
        assert!(session.title_candidates.is_empty());
        assert!(!session.generating);
        assert!(!session.id.is_empty());
    }

    #[test]
    fn clear_downstream_of_idea_drops_everything_derived() {
        let mut session = Session::new();
        session.title_candidates = vec!["A Valid Academic Title".to_string()];
        session.chosen_title = Some(0);
        session.concept = Some("concept".to_string());
        session.proposal = Some("proposal".to_string());

        session.clear_downstream_of_idea();

        assert!(session.title_candidates.is_empty());
        assert_eq!(session.chosen_title, None);
        assert_eq!(session.concept, None);
        assert_eq!(session.proposal, None);
    }

    #[test]
    fn clear_downstream_of_title_keeps_candidates() {
        let mut session = Session::new();
        session.title_candidates = vec!["A Valid Academic Title".to_string()];
        session.chosen_title = Some(0);
        session.concept = Some("concept".to_string());

        session.clear_downstream_of_title();

        assert_eq!(session.title_candidates.len(), 1);
        assert_eq!(session.chosen_title, Some(0));
        assert_eq!(session.concept, None);
    }

    #[test]
    fn title_parsing_filters_short_prefixed_and_dashed_lines() {
        let parsed = parse_title_candidates("Title: foo\n- bar\nValid Academic Title Here\nok");
        assert_eq!(parsed, vec!["Valid Academic Title Here".to_string()]);
    }

    #[test]
    fn title_parsing_preserves_order_and_trims() {
        let parsed =
            parse_title_candidates("  First Candidate Title  \n\nSecond Candidate Title\n");
        assert_eq!(
            parsed,
            vec![
                "First Candidate Title".to_string(),
                "Second Candidate Title".to_string(),
            ]
        );
    }

    #[test]
    fn title_prefix_filter_is_case_insensitive() {
        let parsed = parse_title_candidates("TITLES BELOW THE LINE\nAnother Valid Candidate");
        assert_eq!(parsed, vec!["Another Valid Candidate".to_string()]);
    }
}
