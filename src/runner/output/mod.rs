use crate::runner::state::{Evaluation, Summary};

#[cfg(test)]
pub mod mock;
pub mod terminal;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Message {
    Loading,
    /// Question number (1-based), question count, text and answer options.
    QuestionBegins(usize, usize, String, Vec<String>),
    AnswerFeedback(Evaluation),
    QuizComplete(Summary),
    QuizFailed(String),
    InvalidInput(String),
}

pub trait RunnerOutput {
    fn say(&mut self, message: &Message);
}
