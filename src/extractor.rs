use thiserror::Error;

use crate::model::{ChatModel, ModelError, ModelRequest};
use crate::prompts;
use crate::requirements::{ProjectRequirements, SchemaViolation};
use crate::transcript::{Transcript, Turn};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("extraction request failed")]
    Transport(#[source] ModelError),

    #[error("extraction output did not match the schema: {0}")]
    Schema(#[from] SchemaViolation),
}

impl ExtractionError {
    pub fn reason(&self) -> String {
        match self {
            ExtractionError::Transport(source) => source.to_string(),
            ExtractionError::Schema(violation) => violation.to_string(),
        }
    }
}

/// Asks the model to fill in [`ProjectRequirements`] from a finished
/// transcript. Either the whole record validates or nothing is returned.
pub async fn extract<M>(
    model: &M,
    transcript: &Transcript,
) -> Result<ProjectRequirements, ExtractionError>
where
    M: ChatModel + ?Sized,
{
    let schema = ProjectRequirements::json_schema();
    let turns = [Turn::user(format!(
        "JSON schema:\n{schema:#}\n\nTranscript:\n{}",
        transcript.render()
    ))];

    let reply = model
        .complete(ModelRequest {
            system: prompts::EXTRACTION_SYSTEM,
            turns: &turns,
            output_schema: Some(&schema),
        })
        .await
        .map_err(ExtractionError::Transport)?;

    let record = ProjectRequirements::from_json(strip_code_fence(&reply))?;
    tracing::info!(
        project_name = record.project_name(),
        features = record.features().len(),
        "requirements extracted"
    );
    Ok(record)
}

fn strip_code_fence(reply: &str) -> &str {
    let reply = reply.trim();
    let reply = match reply.strip_prefix("```") {
        Some(fenced) => match fenced.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &fenced[4..],
            _ => fenced,
        },
        None => reply,
    };
    reply.trim_end_matches("```").trim()
}
