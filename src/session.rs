//! Per-user session state: score, current question, answer history and the
//! last API status check.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::error::QuizError;
use crate::quiz::Question;
use crate::status::ConnectionStatus;

/// History strings longer than this are cut and suffixed with `...`.
pub const HISTORY_TEXT_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub prompt: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub was_correct: bool,
    pub reference: String,
    /// Wall-clock time of the submission, `HH:MM:SS`.
    pub timestamp: String,
}

/// Result of submitting an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: String,
    pub explanation: String,
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    score: u32,
    answered_count: u32,
    current_question: Option<Question>,
    answer_shown: bool,
    last_answer: Option<String>,
    history: Vec<HistoryEntry>,
    api_status: BTreeMap<String, ConnectionStatus>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn answered_count(&self) -> u32 {
        self.answered_count
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_question.as_ref()
    }

    pub fn answer_shown(&self) -> bool {
        self.answer_shown
    }

    pub fn last_answer(&self) -> Option<&str> {
        self.last_answer.as_deref()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn api_status(&self) -> &BTreeMap<String, ConnectionStatus> {
        &self.api_status
    }

    /// Replace the current question and hide any previous answer.
    pub fn set_question(&mut self, question: Question) {
        debug!(prompt = %question.prompt, "Installing new question");
        self.current_question = Some(question);
        self.answer_shown = false;
        self.last_answer = None;
    }

    /// Score `selected` against the current question and record it.
    ///
    /// Calling this twice for the same question counts it twice; the front
    /// end is expected to only submit once per question.
    pub fn submit_answer(&mut self, selected: &str) -> Result<AnswerOutcome, QuizError> {
        self.submit_answer_at(selected, Local::now())
    }

    pub fn submit_answer_at(
        &mut self,
        selected: &str,
        at: DateTime<Local>,
    ) -> Result<AnswerOutcome, QuizError> {
        let question = self
            .current_question
            .as_ref()
            .ok_or(QuizError::NoActiveQuestion)?;

        let correct = question.is_correct(selected);
        let entry = HistoryEntry {
            prompt: question.prompt.clone(),
            user_answer: truncate_for_history(selected),
            correct_answer: truncate_for_history(&question.correct_answer),
            was_correct: correct,
            reference: question.reference.clone(),
            timestamp: at.format("%H:%M:%S").to_string(),
        };
        let outcome = AnswerOutcome {
            correct,
            correct_answer: question.correct_answer.clone(),
            explanation: question.explanation.clone(),
        };

        self.answered_count += 1;
        if correct {
            self.score += 1;
        }
        self.history.push(entry);
        self.answer_shown = true;
        self.last_answer = Some(selected.to_string());

        info!(
            correct,
            score = self.score,
            answered = self.answered_count,
            "Answer recorded"
        );
        Ok(outcome)
    }

    /// Submit the option at 1-based position `number` of the current question.
    pub fn submit_option(&mut self, number: usize) -> Result<AnswerOutcome, QuizError> {
        let question = self
            .current_question
            .as_ref()
            .ok_or(QuizError::NoActiveQuestion)?;
        let selected = question
            .option(number)
            .ok_or(QuizError::OptionOutOfRange {
                index: number,
                available: question.options.len(),
            })?
            .to_string();
        self.submit_answer(&selected)
    }

    /// Show the answer without scoring it. Counters and history are left
    /// alone; further submissions are refused by the front end while the
    /// answer is shown.
    pub fn reveal_answer(&mut self) -> Result<AnswerOutcome, QuizError> {
        let question = self
            .current_question
            .as_ref()
            .ok_or(QuizError::NoActiveQuestion)?;
        let outcome = AnswerOutcome {
            correct: false,
            correct_answer: question.correct_answer.clone(),
            explanation: question.explanation.clone(),
        };
        self.answer_shown = true;
        debug!(reference = %question.reference, "Answer revealed");
        Ok(outcome)
    }

    /// Zero the counters and clear history. Keeps the current question and
    /// the API status.
    pub fn reset(&mut self) {
        self.score = 0;
        self.answered_count = 0;
        self.history.clear();
        self.answer_shown = false;
        self.last_answer = None;
        info!("Session reset");
    }

    pub fn set_api_status(&mut self, status: BTreeMap<String, ConnectionStatus>) {
        self.api_status = status;
    }

    /// Percentage of correct answers, `None` before the first answer.
    pub fn accuracy(&self) -> Option<f64> {
        if self.answered_count == 0 {
            return None;
        }
        Some(self.score as f64 / self.answered_count as f64 * 100.0)
    }

    pub fn correct_in_history(&self) -> usize {
        self.history.iter().filter(|h| h.was_correct).count()
    }
}

/// Cut `text` to `HISTORY_TEXT_LIMIT` characters plus `...` when longer.
pub fn truncate_for_history(text: &str) -> String {
    if text.chars().count() > HISTORY_TEXT_LIMIT {
        let mut cut: String = text.chars().take(HISTORY_TEXT_LIMIT).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}
