//! `scriba run` - drive a drafting session end to end.

use anyhow::{Result, bail};
use clap::ValueEnum;
use scriba_application::{GenerationService, SessionUseCase};
use scriba_core::session::StageOutcome;
use scriba_interaction::{ChatApiAgent, OpenAlexAgent};
use std::io::Read;
use std::sync::Arc;

/// Last stage to run before stopping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Until {
    Title,
    Concept,
    Proposal,
}

pub async fn execute(idea: Option<String>, select: Option<usize>, until: Until) -> Result<()> {
    let idea = match idea {
        Some(idea) => idea,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let agent = ChatApiAgent::from_env();
    if let Some(err) = agent.config_error() {
        bail!("{err}");
    }

    let gateway = Arc::new(GenerationService::new(Arc::new(agent)));
    let session = SessionUseCase::new(gateway, Arc::new(OpenAlexAgent::new()));

    session.set_idea(&idea).await?;

    apply(session.request_titles().await?, "no valid titles generated, please try again")?;
    let snapshot = session.snapshot().await;
    println!("== Title candidates ==");
    for (index, title) in snapshot.title_candidates.iter().enumerate() {
        println!("[{index}] {title}");
    }

    if let Some(index) = select {
        session.select_title(index).await?;
    }
    let snapshot = session.snapshot().await;
    let chosen = snapshot.chosen_title_text().unwrap_or_default();
    println!("\n== Selected title ==\n{chosen}");

    if until == Until::Title {
        return Ok(());
    }

    apply(session.request_concept().await?, "concept generation failed")?;
    let snapshot = session.snapshot().await;
    println!(
        "\n== Concept paper ==\n{}",
        snapshot.concept.as_deref().unwrap_or_default()
    );

    if until == Until::Concept {
        return Ok(());
    }

    apply(session.request_proposal().await?, "proposal generation failed")?;
    let snapshot = session.snapshot().await;
    println!(
        "\n== Proposal ==\n{}",
        snapshot.proposal.as_deref().unwrap_or_default()
    );

    Ok(())
}

/// Turns a non-applied stage outcome into a user-facing failure.
fn apply(outcome: StageOutcome, empty_message: &str) -> Result<()> {
    match outcome {
        StageOutcome::Applied => Ok(()),
        StageOutcome::NoCandidates => bail!("{empty_message}"),
        StageOutcome::Superseded => bail!("the session was cleared while generating"),
    }
}
