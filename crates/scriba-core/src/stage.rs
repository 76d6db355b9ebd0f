//! Stage enums for the drafting lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle stage of a drafting session.
///
/// Progression is strictly ordered: each stage requires the artifact of the
/// previous one. The derived `Ord` follows that progression so callers can
/// express preconditions as comparisons (e.g. `stage >= Stage::IdeaReady`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// No usable idea yet.
    #[default]
    Empty,
    /// A non-empty idea has been captured.
    IdeaReady,
    /// Title candidates exist and one is selected.
    TitleChosen,
    /// A concept paper has been generated.
    ConceptReady,
    /// A full proposal has been generated.
    ProposalReady,
}

/// The artifact a single generation call produces.
///
/// This is the tagged variant that replaces string `type` dispatch at the
/// gateway boundary; the wire representation is the lowercase tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageType {
    Title,
    Concept,
    Proposal,
}

impl StageType {
    /// Returns the lowercase wire tag for this stage type.
    pub fn as_str(&self) -> &'static str {
        match self {
            StageType::Title => "title",
            StageType::Concept => "concept",
            StageType::Proposal => "proposal",
        }
    }
}

impl fmt::Display for StageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
