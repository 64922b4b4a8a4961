use serde::Serialize;

use super::session::QuizSession;

/// Correctness counts for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
    pub answered: usize,
}

impl Score {
    /// Every question answered, and answered correctly.
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.total > 0 && self.correct == self.total && self.answered == self.total
    }

    #[must_use]
    pub fn unanswered(&self) -> usize {
        self.total.saturating_sub(self.answered)
    }

    /// Whole-number percentage of correct answers, rounded down.
    #[must_use]
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.correct * 100 / self.total
        }
    }
}

/// Scores the session as it stands. Works whether or not it is locked.
#[must_use]
pub fn score(session: &QuizSession) -> Score {
    let mut correct = 0;
    let mut answered = 0;
    for question in session.questions() {
        if let Some(choice) = session.answer(question.id) {
            answered += 1;
            if question.is_correct(choice) {
                correct += 1;
            }
        }
    }
    Score {
        correct,
        total: session.len(),
        answered,
    }
}

impl QuizSession {
    #[must_use]
    pub fn score(&self) -> Score {
        score(self)
    }
}
