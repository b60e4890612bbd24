//! Replays canned replies in order and records every request it receives.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::{ChatModel, ModelError, ModelRequest, Provider};
use crate::transcript::Turn;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub system: String,
    pub turns: Vec<Turn>,
    pub output_schema: Option<serde_json::Value>,
}

#[derive(Debug, Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, ModelError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedModel {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|reply| Ok(reply.into())).collect()),
            requests: Mutex::default(),
        }
    }

    pub fn then_fail(self, status: u16) -> Self {
        self.replies.lock().unwrap().push_back(Err(ModelError::Api {
            provider: Provider::OpenAi,
            status: reqwest::StatusCode::from_u16(status).unwrap(),
            body: "scripted failure".to_string(),
        }));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, request: ModelRequest<'_>) -> Result<String, ModelError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            system: request.system.to_string(),
            turns: request.turns.to_vec(),
            output_schema: request.output_schema.cloned(),
        });

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("scripted model ran out of replies"))
    }
}
