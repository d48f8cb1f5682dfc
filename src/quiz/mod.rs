use rand::Rng;

use crate::source::{Row, SheetRange};

pub mod definition;
pub mod shuffle;

#[cfg(test)]
mod tests;

pub use definition::{DefinitionError, Question, QuizDefinition};

/// Quiz sheets span columns A through F.
pub fn quiz_range(sheet: &str) -> SheetRange {
    SheetRange::new(sheet, 0, 5)
}

/// Turns raw sheet rows into the question list served to players: question
/// order is shuffled, then each question's answers.
pub fn prepare<R: Rng + ?Sized>(
    rows: &[Row],
    passes: usize,
    rng: &mut R,
) -> Result<Vec<Question>, DefinitionError> {
    let mut questions = QuizDefinition::from_rows(rows)?.into_questions();
    shuffle::shuffle_passes(&mut questions, passes, rng);
    for question in questions.iter_mut() {
        question.answers = question.candidate_answers();
        shuffle::shuffle_passes(&mut question.answers, passes, rng);
    }
    Ok(questions)
}
