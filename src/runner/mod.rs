use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::runner::output::terminal::TerminalOutput;
use crate::runner::output::{Message, RunnerOutput};
use crate::runner::state::{transition, Event, Phase, QuizSession, TransitionError};

pub mod client;
pub mod output;
pub mod state;


/// Drives one player through a quiz, announcing every phase change.
pub struct Runner<O: RunnerOutput> {
    phase: Phase,
    session: QuizSession,
    output: O,
}

impl<O: RunnerOutput> Runner<O> {
    pub fn new(mut output: O) -> Self {
        output.say(&Message::Loading);
        Runner {
            phase: Phase::Loading,
            session: QuizSession::default(),
            output,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn handle(&mut self, event: Event) -> Result<(), TransitionError> {
        self.phase = transition(&self.phase, &mut self.session, event)?;
        self.announce();
        Ok(())
    }

    /// Reads one line typed by the player. While a question is shown the
    /// line picks an answer by its exact text, or else by its number; during
    /// feedback any line moves on.
    pub fn handle_input(&mut self, line: &str) {
        let event = match self.parse_input(line.trim()) {
            Some(event) => event,
            None => {
                self.output.say(&Message::InvalidInput(format!(
                    "'{}' does not match any answer",
                    line.trim()
                )));
                return;
            }
        };
        if let Err(e) = self.handle(event) {
            self.output.say(&Message::InvalidInput(e.to_string()));
        }
    }

    fn parse_input(&self, input: &str) -> Option<Event> {
        match &self.phase {
            Phase::Presenting => {
                let answers = &self.session.current_question()?.answers;
                let by_number = input
                    .parse::<usize>()
                    .ok()
                    .and_then(|number| number.checked_sub(1))
                    .and_then(|index| answers.get(index));
                let by_text = answers.iter().find(|answer| answer.as_str() == input);
                by_text.or(by_number).cloned().map(Event::Select)
            }
            Phase::Feedback(_) => Some(Event::Continue),
            _ => None,
        }
    }

    fn announce(&mut self) {
        let message = match &self.phase {
            Phase::Loading => Message::Loading,
            Phase::Presenting => match self.session.current_question() {
                Some(question) => Message::QuestionBegins(
                    self.session.current_index() + 1,
                    self.session.len(),
                    question.text.clone(),
                    question.answers.clone(),
                ),
                None => return,
            },
            Phase::Feedback(evaluation) => Message::AnswerFeedback(evaluation.clone()),
            Phase::Complete(summary) => Message::QuizComplete(summary.clone()),
            Phase::Error(reason) => Message::QuizFailed(reason.clone()),
        };
        self.output.say(&message);
    }
}

/// Plays the quiz behind `quiz_url` on the terminal.
pub async fn take(quiz_url: &str) -> Result<()> {
    let http = reqwest::Client::new();
    let mut runner = Runner::new(TerminalOutput::new(std::io::stdout()));

    let event = match client::fetch_questions(&http, quiz_url).await {
        Ok(questions) => Event::Loaded(questions),
        Err(e) => {
            tracing::warn!(error = %e, "could not load quiz");
            Event::LoadFailed(e.to_string())
        }
    };
    runner.handle(event)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while !runner.is_over() {
        let line = lines
            .next_line()
            .await
            .context("could not read from stdin")?;
        match line {
            Some(line) => runner.handle_input(&line),
            None => break,
        }
    }

    match runner.phase() {
        Phase::Complete(summary) => tracing::info!(
            score = %summary.tally,
            misses = summary.misses.len(),
            "quiz finished"
        ),
        Phase::Error(_) => {}
        _ => {
            let session = runner.session();
            tracing::info!(
                answered = session.current_index(),
                score = session.score(),
                "quiz abandoned"
            );
        }
    }
    Ok(())
}
