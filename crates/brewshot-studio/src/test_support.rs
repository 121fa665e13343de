use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use async_trait::async_trait;
use serde_json::Value;

use crate::{error::ProviderError, output::RawProviderOutput, provider::Provider};

type Reply = Result<Value, ProviderError>;

/// Provider double with scripted replies per model
///
/// Replies for a model are consumed in order and the last one repeats.
#[derive(Default)]
pub struct StubProvider {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, model: &str, output: Value) -> Self {
        self.push(model, Ok(output))
    }

    pub fn fail(self, model: &str, err: ProviderError) -> Self {
        self.push(model, Err(err))
    }

    fn push(self, model: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(model.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, model: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|(m, _)| m == model).count()
    }
}

#[async_trait]
impl Provider for StubProvider {
    async fn run(&self, model: &str, input: Value) -> Result<RawProviderOutput, ProviderError> {
        self.calls.lock().unwrap().push((model.to_string(), input));

        let mut replies = self.replies.lock().unwrap();
        let queue = replies
            .get_mut(model)
            .ok_or_else(|| ProviderError::ModelNotFound(model.to_string()))?;

        let reply = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };

        reply
            .unwrap_or_else(|| Err(ProviderError::ModelNotFound(model.to_string())))
            .map(RawProviderOutput::from)
    }

    fn name(&self) -> &str {
        "stub"
    }
}
