use thiserror::Error;

use crate::console::HumanIo;
use crate::driver::{self, SessionError};
use crate::extractor::{self, ExtractionError};
use crate::model::{ChatModel, ModelError, ModelRequest};
use crate::prompts;
use crate::requirements::ProjectRequirements;
use crate::transcript::Turn;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// One full intake: the conversation, then a single extraction call made
/// only if the conversation reached its end.
pub async fn run_intake<M, H>(
    model: &M,
    human: &mut H,
    max_turns: Option<usize>,
) -> Result<ProjectRequirements, IntakeError>
where
    M: ChatModel + ?Sized,
    H: HumanIo + ?Sized,
{
    tracing::info!(?max_turns, "starting intake session");
    let transcript = driver::run_session(model, human, max_turns).await?;
    Ok(extractor::extract(model, &transcript).await?)
}

/// A single prompt with no conversation around it.
pub async fn ask<M>(model: &M, prompt: &str) -> Result<String, ModelError>
where
    M: ChatModel + ?Sized,
{
    let turns = [Turn::user(prompt)];
    model
        .complete(ModelRequest {
            system: prompts::ASSISTANT_SYSTEM,
            turns: &turns,
            output_schema: None,
        })
        .await
}
