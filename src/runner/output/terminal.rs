use itertools::Itertools;
use std::io::Write;

use crate::runner::output::{Message, RunnerOutput};
use crate::runner::state::Mark;

/// Plain-text rendering of runner messages.
pub struct TerminalOutput<W: Write> {
    out: W,
}

impl<W: Write> TerminalOutput<W> {
    pub fn new(out: W) -> Self {
        TerminalOutput { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

pub fn render(message: &Message) -> String {
    match message {
        Message::Loading => "Loading quiz...".to_owned(),
        Message::QuestionBegins(number, total, text, answers) => {
            let options = answers
                .iter()
                .enumerate()
                .map(|(index, answer)| format!("  {}) {}", index + 1, answer))
                .join("\n");
            format!("Question {} of {}\n{}\n{}", number, total, text, options)
        }
        Message::AnswerFeedback(evaluation) => {
            let verdict = if evaluation.is_correct {
                "Correct!".to_owned()
            } else {
                format!("Wrong! The answer was: {}", evaluation.correct_answer)
            };
            let marks = evaluation
                .marks
                .iter()
                .map(|(answer, mark)| {
                    let symbol = match mark {
                        Mark::Correct => "+",
                        Mark::Incorrect => "x",
                        Mark::Unmarked => " ",
                    };
                    format!("  [{}] {}", symbol, answer)
                })
                .join("\n");
            format!("{}\n{}", verdict, marks)
        }
        Message::QuizComplete(summary) => {
            let tally = &summary.tally;
            let score = format!("Quiz complete! Score: {} ({}%)", tally, tally.percentage());
            if summary.misses.is_empty() {
                return score;
            }
            let review = summary
                .misses
                .iter()
                .map(|miss| {
                    format!(
                        "  {}\n    Your answer: {}\n    Correct answer: {}",
                        miss.question, miss.your_answer, miss.correct_answer
                    )
                })
                .join("\n");
            format!("{}\nReview your wrong answers:\n{}", score, review)
        }
        Message::QuizFailed(reason) => format!("Error: {}", reason),
        Message::InvalidInput(reason) => format!("Invalid input: {}", reason),
    }
}

impl<W: Write> RunnerOutput for TerminalOutput<W> {
    fn say(&mut self, message: &Message) {
        if let Err(e) = writeln!(self.out, "{}\n", render(message)) {
            tracing::error!(error = %e, "could not write to terminal");
        }
    }
}
