//! Session use case: the stage state machine driving the pipeline.
//!
//! Owns the [`Session`] exclusively and mutates it only through the
//! operations below, which enforce:
//!
//! - stage ordering (`Empty -> IdeaReady -> TitleChosen -> ConceptReady ->
//!   ProposalReady`)
//! - at most one in-flight generation at a time (the `generating` flag,
//!   not a lock primitive)
//! - downstream invalidation: a changed idea clears everything derived
//!   from it, a re-selected title clears the concept and proposal
//! - stale-response discard: `clear` invalidates any in-flight generation
//!   and its eventual response is dropped rather than applied to newer
//!   state

use crate::prompt::PromptAssembler;
use scriba_core::error::{Result, ScribaError};
use scriba_core::generation::{CitationSource, GenerationGateway, GenerationRequest};
use scriba_core::session::{Session, StageOutcome, parse_title_candidates};
use scriba_core::stage::{Stage, StageType};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Session plus the generation epoch used to detect stragglers. The epoch
/// is bumped whenever the session is discarded wholesale; a generation
/// started under an older epoch must not apply its response.
struct SessionState {
    session: Session,
    epoch: u64,
}

/// Drives one user's drafting session through the three stages.
pub struct SessionUseCase {
    state: RwLock<SessionState>,
    assembler: PromptAssembler,
    gateway: Arc<dyn GenerationGateway>,
}

impl SessionUseCase {
    /// Creates a use case over a fresh, empty session.
    pub fn new(gateway: Arc<dyn GenerationGateway>, citations: Arc<dyn CitationSource>) -> Self {
        Self {
            state: RwLock::new(SessionState {
                session: Session::new(),
                epoch: 0,
            }),
            assembler: PromptAssembler::new(citations),
            gateway,
        }
    }

    /// Returns a copy of the current session for presentation callers.
    pub async fn snapshot(&self) -> Session {
        self.state.read().await.session.clone()
    }

    /// Replaces the working idea.
    ///
    /// Trims the input. An empty idea resets the session to `Empty`; a
    /// non-empty one moves it to `IdeaReady`. Either way every artifact
    /// built on top of the previous idea is cleared.
    ///
    /// # Errors
    ///
    /// `Validation` when a generation is in flight.
    pub async fn set_idea(&self, text: &str) -> Result<()> {
        let mut state = self.state.write().await;
        if state.session.generating {
            return Err(ScribaError::validation(
                "cannot change the idea while a generation is in flight",
            ));
        }

        let trimmed = text.trim();
        state.session.idea = trimmed.to_string();
        state.session.clear_downstream_of_idea();
        state.session.stage = if trimmed.is_empty() {
            Stage::Empty
        } else {
            Stage::IdeaReady
        };
        state.session.touch();
        Ok(())
    }

    /// Generates title candidates for the current idea.
    ///
    /// On success the parsed candidates are stored, the first one is
    /// auto-selected and the stage moves to `TitleChosen`. A response that
    /// yields no usable candidates leaves the stage unchanged and returns
    /// [`StageOutcome::NoCandidates`].
    ///
    /// # Errors
    ///
    /// `Validation` when no idea is set or another generation is in
    /// flight; gateway errors are surfaced unchanged with the stage
    /// untouched.
    pub async fn request_titles(&self) -> Result<StageOutcome> {
        let (epoch, idea) = {
            let mut state = self.state.write().await;
            ensure_idle(&state.session)?;
            if state.session.stage < Stage::IdeaReady {
                return Err(ScribaError::validation(
                    "a research idea is required before titles can be generated",
                ));
            }
            state.session.generating = true;
            state.session.touch();
            (state.epoch, state.session.idea.clone())
        };

        let result = match PromptAssembler::build_title_prompt(&idea) {
            Ok(prompt) => {
                self.gateway
                    .generate(GenerationRequest::new(prompt, StageType::Title))
                    .await
            }
            Err(err) => Err(err),
        };

        let mut state = self.state.write().await;
        if state.epoch != epoch {
            tracing::debug!("discarding stale title response");
            return Ok(StageOutcome::Superseded);
        }
        state.session.generating = false;
        state.session.touch();

        let response = result?;
        let candidates = parse_title_candidates(&response.text);
        if candidates.is_empty() {
            tracing::warn!("title generation produced no valid candidates");
            return Ok(StageOutcome::NoCandidates);
        }

        state.session.title_candidates = candidates;
        state.session.chosen_title = Some(0);
        state.session.clear_downstream_of_title();
        state.session.stage = Stage::TitleChosen;
        Ok(StageOutcome::Applied)
    }

    /// Selects a title candidate by index.
    ///
    /// Clears the concept and proposal (a different title invalidates
    /// them) and floors the stage at `TitleChosen`.
    ///
    /// # Errors
    ///
    /// `Validation` when the index is out of bounds; the session is left
    /// unmodified.
    pub async fn select_title(&self, index: usize) -> Result<()> {
        let mut state = self.state.write().await;
        if index >= state.session.title_candidates.len() {
            return Err(ScribaError::validation(format!(
                "title index {index} is out of bounds"
            )));
        }

        state.session.chosen_title = Some(index);
        state.session.clear_downstream_of_title();
        state.session.stage = Stage::TitleChosen;
        state.session.touch();
        Ok(())
    }

    /// Generates the concept paper for the chosen title.
    ///
    /// The concept prompt is assembled with citations fetched internally;
    /// enrichment failure degrades silently to a citation-less prompt.
    ///
    /// # Errors
    ///
    /// `Validation` when no title is chosen or another generation is in
    /// flight; gateway errors are surfaced unchanged with the stage
    /// untouched.
    pub async fn request_concept(&self) -> Result<StageOutcome> {
        let (epoch, idea, title) = {
            let mut state = self.state.write().await;
            ensure_idle(&state.session)?;
            let Some(title) = state.session.chosen_title_text() else {
                return Err(ScribaError::validation(
                    "a chosen title is required before a concept paper can be generated",
                ));
            };
            let title = title.to_string();
            state.session.generating = true;
            state.session.touch();
            (state.epoch, state.session.idea.clone(), title)
        };

        let result = match self.assembler.build_concept_prompt(&idea, &title).await {
            Ok(prompt) => {
                self.gateway
                    .generate(GenerationRequest::new(prompt, StageType::Concept))
                    .await
            }
            Err(err) => Err(err),
        };

        let mut state = self.state.write().await;
        if state.epoch != epoch {
            tracing::debug!("discarding stale concept response");
            return Ok(StageOutcome::Superseded);
        }
        state.session.generating = false;
        state.session.touch();

        let response = result?;
        state.session.concept = Some(response.text);
        state.session.proposal = None;
        state.session.stage = Stage::ConceptReady;
        Ok(StageOutcome::Applied)
    }

    /// Generates the full proposal from the concept paper.
    ///
    /// # Errors
    ///
    /// `Validation` when no concept exists or another generation is in
    /// flight; gateway errors are surfaced unchanged with the stage
    /// untouched.
    pub async fn request_proposal(&self) -> Result<StageOutcome> {
        let (epoch, idea, title, concept) = {
            let mut state = self.state.write().await;
            ensure_idle(&state.session)?;
            let Some(concept) = state.session.concept.clone() else {
                return Err(ScribaError::validation(
                    "a concept paper is required before a proposal can be generated",
                ));
            };
            let Some(title) = state.session.chosen_title_text() else {
                return Err(ScribaError::validation(
                    "a chosen title is required before a proposal can be generated",
                ));
            };
            let title = title.to_string();
            state.session.generating = true;
            state.session.touch();
            (state.epoch, state.session.idea.clone(), title, concept)
        };

        let result = match PromptAssembler::build_proposal_prompt(&idea, &title, &concept) {
            Ok(prompt) => {
                self.gateway
                    .generate(GenerationRequest::new(prompt, StageType::Proposal))
                    .await
            }
            Err(err) => Err(err),
        };

        let mut state = self.state.write().await;
        if state.epoch != epoch {
            tracing::debug!("discarding stale proposal response");
            return Ok(StageOutcome::Superseded);
        }
        state.session.generating = false;
        state.session.touch();

        let response = result?;
        state.session.proposal = Some(response.text);
        state.session.stage = Stage::ProposalReady;
        Ok(StageOutcome::Applied)
    }

    /// Resets the session to `Empty` unconditionally.
    ///
    /// Allowed while a generation is in flight: the network call is not
    /// cancelled, but its eventual response is discarded instead of being
    /// applied to the fresh session.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.epoch += 1;
        state.session = Session::new();
    }
}

/// Refuses to start a generation while another one is outstanding.
fn ensure_idle(session: &Session) -> Result<()> {
    if session.generating {
        return Err(ScribaError::validation(
            "another generation is already in flight",
        ));
    }
    Ok(())
}
