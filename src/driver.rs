//! The intake dialogue loop.
//!
//! A session alternates between waiting on the model and waiting on the
//! human until an assistant turn contains [`SENTINEL`]. Every failure ends
//! the session; nothing is retried here.

use std::io;
use thiserror::Error;

use crate::console::HumanIo;
use crate::model::{ChatModel, ModelError, ModelRequest};
use crate::prompts;
use crate::transcript::{Transcript, Turn};

pub const SENTINEL: &str = "[DONE]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    AwaitingModel,
    AwaitingHuman,
    Done,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session failed mid-dialogue after {model_turns} model turn(s)")]
    Transport {
        model_turns: usize,
        #[source]
        source: ModelError,
    },

    #[error("input closed before the intake was complete")]
    InputClosed,

    #[error("failed to exchange text with the user")]
    Input(#[from] io::Error),

    #[error("the model did not finish the intake within {0} turns")]
    TurnLimit(usize),
}

pub fn is_complete(text: &str) -> bool {
    text.contains(SENTINEL)
}

/// Runs one intake conversation and returns its transcript.
///
/// `max_turns` bounds the number of model turns; `None` leaves the loop
/// unbounded so that only the sentinel ends it.
pub async fn run_session<M, H>(
    model: &M,
    human: &mut H,
    max_turns: Option<usize>,
) -> Result<Transcript, SessionError>
where
    M: ChatModel + ?Sized,
    H: HumanIo + ?Sized,
{
    let mut transcript = Transcript::seeded(prompts::SEED);
    let mut model_turns = 0;
    let mut state = State::AwaitingModel;

    loop {
        state = match state {
            State::AwaitingModel => {
                if max_turns.is_some_and(|limit| model_turns >= limit) {
                    return Err(SessionError::TurnLimit(model_turns));
                }

                let reply = model
                    .complete(ModelRequest {
                        system: prompts::INTAKE_SYSTEM,
                        turns: transcript.turns(),
                        output_schema: None,
                    })
                    .await
                    .map_err(|source| SessionError::Transport {
                        model_turns,
                        source,
                    })?;
                model_turns += 1;

                let next = if is_complete(&reply) {
                    State::Done
                } else {
                    State::AwaitingHuman
                };
                tracing::debug!(model_turns, ?next, "assistant turn received");
                transcript.push(Turn::assistant(reply));

                // At the cap, a question here could never be answered.
                if next == State::AwaitingHuman
                    && max_turns.is_some_and(|limit| model_turns >= limit)
                {
                    return Err(SessionError::TurnLimit(model_turns));
                }
                next
            }
            State::AwaitingHuman => {
                if let Some(question) = transcript.last() {
                    human.show(&question.text).await?;
                }

                let answer = human.read_reply().await?.ok_or(SessionError::InputClosed)?;
                transcript.push(Turn::user(answer));
                tracing::debug!(human_turns = transcript.human_turns(), "human turn received");
                State::AwaitingModel
            }
            State::Done => {
                tracing::info!(
                    model_turns,
                    human_turns = transcript.human_turns(),
                    "intake conversation complete"
                );
                return Ok(transcript);
            }
        };
    }
}
