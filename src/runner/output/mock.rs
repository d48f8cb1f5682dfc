use parking_lot::RwLock;
use std::sync::Arc;

use crate::runner::output::{Message, RunnerOutput};

#[derive(Clone, Default)]
pub struct MockRunnerOutput {
    messages: Arc<RwLock<Vec<Message>>>,
}

impl MockRunnerOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flush(&self) -> Vec<Message> {
        std::mem::take(&mut *self.messages.write())
    }

    pub fn contains_message(&self, message: &Message) -> bool {
        self.messages.read().iter().any(|m| m == message)
    }
}

impl RunnerOutput for MockRunnerOutput {
    fn say(&mut self, message: &Message) {
        self.messages.write().push(message.clone());
    }
}
