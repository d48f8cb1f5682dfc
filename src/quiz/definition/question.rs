use serde::{Deserialize, Serialize};
use std::fmt;

use crate::source::Row;

pub const QUESTION_COLUMN: usize = 1;
pub const CORRECT_ANSWER_COLUMN: usize = 2;
pub const FIRST_WRONG_ANSWER_COLUMN: usize = 3;
pub const MAX_WRONG_ANSWERS: usize = 3;

/// A sheet row read positionally, before validation.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RawQuestion {
    pub text: String,
    pub correct_answer: String,
    pub wrong_answers: Vec<String>,
}

impl From<&Row> for RawQuestion {
    fn from(row: &Row) -> Self {
        let cell = |index: usize| row.get(index).cloned().unwrap_or_default();
        RawQuestion {
            text: cell(QUESTION_COLUMN),
            correct_answer: cell(CORRECT_ANSWER_COLUMN),
            wrong_answers: (0..MAX_WRONG_ANSWERS)
                .map(|offset| cell(FIRST_WRONG_ANSWER_COLUMN + offset))
                .collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RowDefect {
    MissingQuestion,
    MissingCorrectAnswer,
    MissingWrongAnswers,
}

impl fmt::Display for RowDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            RowDefect::MissingQuestion => "question text is empty",
            RowDefect::MissingCorrectAnswer => "correct answer is empty",
            RowDefect::MissingWrongAnswers => "no wrong answer is filled in",
        };
        f.write_str(reason)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    pub correct_answer: String,
    pub wrong_answers: Vec<String>,
    /// Presentation order of every candidate answer. Empty until the quiz is prepared.
    #[serde(default)]
    pub answers: Vec<String>,
}

impl Question {
    pub fn is_answer_correct(&self, answer: &str) -> bool {
        answer == self.correct_answer
    }

    /// The correct answer followed by the wrong ones, unshuffled.
    pub fn candidate_answers(&self) -> Vec<String> {
        std::iter::once(self.correct_answer.clone())
            .chain(self.wrong_answers.iter().cloned())
            .collect()
    }
}

impl TryFrom<RawQuestion> for Question {
    type Error = RowDefect;

    fn try_from(raw_question: RawQuestion) -> Result<Self, Self::Error> {
        if raw_question.text.is_empty() {
            return Err(RowDefect::MissingQuestion);
        }
        if raw_question.correct_answer.is_empty() {
            return Err(RowDefect::MissingCorrectAnswer);
        }

        let wrong_answers: Vec<String> = raw_question
            .wrong_answers
            .into_iter()
            .filter(|answer| !answer.is_empty())
            .collect();
        if wrong_answers.is_empty() {
            return Err(RowDefect::MissingWrongAnswers);
        }

        Ok(Question {
            text: raw_question.text,
            correct_answer: raw_question.correct_answer,
            wrong_answers,
            answers: Vec::new(),
        })
    }
}
