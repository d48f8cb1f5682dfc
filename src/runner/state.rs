use std::fmt;
use thiserror::Error;

use crate::quiz::Question;


/// Progress through one fetched quiz. Lives as long as the player's session.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct QuizSession {
    questions: Vec<Question>,
    current_index: usize,
    score: usize,
    misses: Vec<Miss>,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>) -> Self {
        QuizSession {
            questions,
            current_index: 0,
            score: 0,
            misses: Vec::new(),
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_finished(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    pub fn tally(&self) -> Tally {
        Tally {
            score: self.score,
            total: self.questions.len(),
        }
    }

    pub fn summary(&self) -> Summary {
        Summary {
            tally: self.tally(),
            misses: self.misses.clone(),
        }
    }

    fn record(&mut self, evaluation: &Evaluation) {
        if evaluation.is_correct {
            self.score += 1;
            return;
        }
        let miss = self.current_question().map(|question| Miss {
            question: question.text.clone(),
            your_answer: evaluation.selected.clone(),
            correct_answer: evaluation.correct_answer.clone(),
        });
        self.misses.extend(miss);
    }
}

/// A wrongly answered question, kept for the end-of-quiz review.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Miss {
    pub question: String,
    pub your_answer: String,
    pub correct_answer: String,
}

/// Final score plus the misses in the order they happened.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Summary {
    pub tally: Tally,
    pub misses: Vec<Miss>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Tally {
    pub score: usize,
    pub total: usize,
}

impl Tally {
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.score as f64 / self.total as f64 * 100.0).round() as u32
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.score, self.total)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mark {
    Correct,
    Incorrect,
    Unmarked,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Evaluation {
    pub selected: String,
    pub correct_answer: String,
    pub is_correct: bool,
    /// Every option in presentation order with its feedback mark.
    pub marks: Vec<(String, Mark)>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    Loading,
    Presenting,
    Feedback(Evaluation),
    Complete(Summary),
    Error(String),
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Complete(_) | Phase::Error(_))
    }

    fn name(&self) -> &'static str {
        match self {
            Phase::Loading => "loading",
            Phase::Presenting => "presenting",
            Phase::Feedback(_) => "feedback",
            Phase::Complete(_) => "complete",
            Phase::Error(_) => "error",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Event {
    Loaded(Vec<Question>),
    LoadFailed(String),
    Select(String),
    Continue,
}

impl Event {
    fn name(&self) -> &'static str {
        match self {
            Event::Loaded(_) => "loaded",
            Event::LoadFailed(_) => "load failed",
            Event::Select(_) => "select",
            Event::Continue => "continue",
        }
    }
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum TransitionError {
    #[error("cannot handle '{event}' while {phase}")]
    Rejected {
        phase: &'static str,
        event: &'static str,
    },
    #[error("'{0}' is not one of the offered answers")]
    UnknownAnswer(String),
}

pub const EMPTY_QUIZ_MESSAGE: &str = "This quiz has no questions";

/// Computes the phase following `event`. The session is only touched when
/// the event is accepted.
pub fn transition(
    phase: &Phase,
    session: &mut QuizSession,
    event: Event,
) -> Result<Phase, TransitionError> {
    match (phase, event) {
        (Phase::Loading, Event::Loaded(questions)) => {
            if questions.is_empty() {
                return Ok(Phase::Error(EMPTY_QUIZ_MESSAGE.to_owned()));
            }
            *session = QuizSession::new(questions);
            Ok(Phase::Presenting)
        }
        (Phase::Loading, Event::LoadFailed(message)) => Ok(Phase::Error(message)),
        (Phase::Presenting, Event::Select(selected)) => {
            let evaluation = evaluate(session, selected)?;
            session.record(&evaluation);
            Ok(Phase::Feedback(evaluation))
        }
        (Phase::Feedback(_), Event::Continue) => {
            session.current_index += 1;
            if session.is_finished() {
                Ok(Phase::Complete(session.summary()))
            } else {
                Ok(Phase::Presenting)
            }
        }
        (phase, event) => Err(TransitionError::Rejected {
            phase: phase.name(),
            event: event.name(),
        }),
    }
}

fn evaluate(session: &QuizSession, selected: String) -> Result<Evaluation, TransitionError> {
    let question = session
        .current_question()
        .ok_or(TransitionError::Rejected {
            phase: "finished",
            event: "select",
        })?;
    if !question.answers.contains(&selected) {
        return Err(TransitionError::UnknownAnswer(selected));
    }

    let is_correct = question.is_answer_correct(&selected);
    let marks = question
        .answers
        .iter()
        .map(|answer| {
            let mark = if *answer == question.correct_answer {
                Mark::Correct
            } else if *answer == selected && !is_correct {
                Mark::Incorrect
            } else {
                Mark::Unmarked
            };
            (answer.clone(), mark)
        })
        .collect();

    Ok(Evaluation {
        selected,
        correct_answer: question.correct_answer.clone(),
        is_correct,
        marks,
    })
}
