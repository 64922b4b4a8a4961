use rand::Rng;

use super::question::Question;
use super::session::{QuizMode, QuizSession};
use super::shuffle::shuffled;

/// Which questions of a prior session a retry should cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryScope {
    WrongOnly,
    WrongOrUnanswered,
}

impl RetryScope {
    #[must_use]
    pub fn select(self, session: &QuizSession) -> Vec<Question> {
        match self {
            RetryScope::WrongOnly => wrong_only(session),
            RetryScope::WrongOrUnanswered => wrong_or_unanswered(session),
        }
    }
}

/// Answered questions whose answer is not the correct one.
#[must_use]
pub fn wrong_only(session: &QuizSession) -> Vec<Question> {
    session
        .questions()
        .iter()
        .filter(|q| session.answer(q.id).is_some_and(|choice| !q.is_correct(choice)))
        .copied()
        .collect()
}

/// Questions left unanswered or answered wrongly.
#[must_use]
pub fn wrong_or_unanswered(session: &QuizSession) -> Vec<Question> {
    session
        .questions()
        .iter()
        .filter(|q| session.answer(q.id).is_none_or(|choice| !q.is_correct(choice)))
        .copied()
        .collect()
}

impl QuizSession {
    /// Starts a practice session over exactly `questions`, freshly shuffled.
    ///
    /// Returns `None` for an empty subset so the caller keeps its current
    /// session as is. Retries are always practice mode.
    #[must_use]
    pub fn retry<R: Rng + ?Sized>(questions: &[Question], rng: &mut R) -> Option<Self> {
        if questions.is_empty() {
            return None;
        }
        Some(Self::fresh(shuffled(questions, rng), QuizMode::Practice))
    }
}
