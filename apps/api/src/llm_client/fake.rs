//! Scripted `CompletionClient` for tests. Records every call and never touches the network.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{CompletionClient, LlmError};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub model: String,
    pub prompt: String,
}

#[derive(Default)]
pub struct ScriptedClient {
    calls: Mutex<Vec<RecordedCall>>,
    failing_models: Mutex<HashSet<String>>,
    fixed_replies: Mutex<HashMap<String, String>>,
    disabled: bool,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client that behaves like one built without an API key.
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    pub fn fail_model(&self, model: &str) {
        self.failing_models.lock().unwrap().insert(model.to_string());
    }

    pub fn recover_model(&self, model: &str) {
        self.failing_models.lock().unwrap().remove(model);
    }

    /// Every later call to `model` answers with `reply` verbatim.
    pub fn reply_with(&self, model: &str, reply: &str) {
        self.fixed_replies
            .lock()
            .unwrap()
            .insert(model.to_string(), reply.to_string());
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, model: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.model == model)
            .count()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        if self.disabled {
            return Err(LlmError::MissingApiKey);
        }

        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(RecordedCall {
                model: model.to_string(),
                prompt: prompt.to_string(),
            });
            calls.len()
        };

        if self.failing_models.lock().unwrap().contains(model) {
            return Err(LlmError::Api {
                status: 503,
                message: format!("{model} is overloaded"),
            });
        }

        if let Some(reply) = self.fixed_replies.lock().unwrap().get(model) {
            return Ok(reply.clone());
        }
        Ok(format!("reply {n} from {model}"))
    }

    fn is_enabled(&self) -> bool {
        !self.disabled
    }
}
