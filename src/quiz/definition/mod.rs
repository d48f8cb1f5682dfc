use thiserror::Error;

use crate::source::Row;

pub mod question;

#[cfg(test)]
mod tests;

pub use question::{Question, RawQuestion, RowDefect};

#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum DefinitionError {
    #[error("No questions found")]
    NoRows,
    #[error("No valid questions found")]
    NoQuestions,
}

#[derive(Debug)]
pub struct QuizDefinition {
    questions: Vec<Question>,
}

impl QuizDefinition {
    /// Builds questions from sheet rows. Row 0 is always a header.
    pub fn from_rows(rows: &[Row]) -> Result<QuizDefinition, DefinitionError> {
        if rows.len() <= 1 {
            return Err(DefinitionError::NoRows);
        }

        let mut questions = Vec::new();
        for (index, row) in rows.iter().enumerate().skip(1) {
            match Question::try_from(RawQuestion::from(row)) {
                Ok(question) => questions.push(question),
                Err(defect) => tracing::debug!(row = index + 1, %defect, "skipping row"),
            }
        }

        if questions.is_empty() {
            return Err(DefinitionError::NoQuestions);
        }

        tracing::debug!(
            rows = rows.len() - 1,
            questions = questions.len(),
            "built quiz definition"
        );
        Ok(QuizDefinition { questions })
    }

    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }
}
