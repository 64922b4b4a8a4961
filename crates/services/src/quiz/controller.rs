use std::fmt;

use rand::Rng;
use study_core::model::QuestionId;
use study_core::quiz::{
    AnswerOutcome, QuizMode, QuizSession, RetryScope, Score, TimerState, Topic,
};

use crate::error::QuizControllerError;

/// Identifies one generated session; bumps on every replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returned whenever the controller installs a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTicket {
    pub id: SessionId,
    pub mode: QuizMode,
    pub questions: usize,
}

impl SessionTicket {
    /// Whether a countdown must be armed for this session.
    #[must_use]
    pub fn needs_clock(&self) -> bool {
        self.mode.is_exam()
    }
}

/// Owns the current quiz session and the rng used to build new ones.
///
/// Every replacement (new quiz, new exam, retry) gets a fresh `SessionId`.
/// Timer ticks carry the id they were armed for, so a tick that outlives its
/// session is dropped instead of touching the replacement.
pub struct QuizController<R> {
    rng: R,
    session: Option<QuizSession>,
    session_id: SessionId,
}

impl<R: Rng> QuizController<R> {
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            session: None,
            session_id: SessionId::new(0),
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Starts a practice quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizControllerError::Session` for a zero count.
    pub fn generate(
        &mut self,
        topic: Topic,
        count: usize,
    ) -> Result<SessionTicket, QuizControllerError> {
        let session = QuizSession::generate(topic, count, QuizMode::Practice, &mut self.rng)?;
        tracing::info!(%topic, questions = session.len(), "practice quiz generated");
        Ok(self.install(session))
    }

    /// Starts a timed exam. The caller arms the clock with the ticket's id.
    ///
    /// # Errors
    ///
    /// Returns `QuizControllerError::Session` for a zero count or duration.
    pub fn start_exam(
        &mut self,
        topic: Topic,
        count: usize,
        duration_minutes: u32,
    ) -> Result<SessionTicket, QuizControllerError> {
        let session = QuizSession::generate(
            topic,
            count,
            QuizMode::Exam { duration_minutes },
            &mut self.rng,
        )?;
        tracing::info!(
            %topic,
            questions = session.len(),
            duration_minutes,
            "exam started"
        );
        Ok(self.install(session))
    }

    /// Practice retry over the wrongly answered questions.
    ///
    /// `Ok(None)` means there was nothing to retry and the current session
    /// (and its id) is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `QuizControllerError::NoSession` before any quiz exists.
    pub fn retry_wrong_only(&mut self) -> Result<Option<SessionTicket>, QuizControllerError> {
        self.retry(RetryScope::WrongOnly)
    }

    /// Practice retry over wrong and unanswered questions.
    ///
    /// # Errors
    ///
    /// Returns `QuizControllerError::NoSession` before any quiz exists.
    pub fn retry_wrong_or_unanswered(
        &mut self,
    ) -> Result<Option<SessionTicket>, QuizControllerError> {
        self.retry(RetryScope::WrongOrUnanswered)
    }

    fn retry(&mut self, scope: RetryScope) -> Result<Option<SessionTicket>, QuizControllerError> {
        let subset = scope.select(self.current()?);
        let Some(session) = QuizSession::retry(&subset, &mut self.rng) else {
            tracing::debug!(?scope, "nothing to retry");
            return Ok(None);
        };
        tracing::info!(?scope, questions = session.len(), "retry started");
        Ok(Some(self.install(session)))
    }

    fn install(&mut self, session: QuizSession) -> SessionTicket {
        self.session_id = SessionId::new(self.session_id.value() + 1);
        let ticket = SessionTicket {
            id: self.session_id,
            mode: session.mode(),
            questions: session.len(),
        };
        self.session = Some(session);
        ticket
    }

    fn current(&self) -> Result<&QuizSession, QuizControllerError> {
        self.session.as_ref().ok_or(QuizControllerError::NoSession)
    }

    fn current_mut(&mut self) -> Result<&mut QuizSession, QuizControllerError> {
        self.session.as_mut().ok_or(QuizControllerError::NoSession)
    }

    /// # Errors
    ///
    /// Returns `QuizControllerError::NoSession` without a session and
    /// `QuizControllerError::Session` for an unknown question or choice.
    pub fn select_answer(
        &mut self,
        question_id: QuestionId,
        choice: usize,
    ) -> Result<AnswerOutcome, QuizControllerError> {
        Ok(self.current_mut()?.select_answer(question_id, choice)?)
    }

    /// Locks the session and reveals answers; `false` if already locked.
    ///
    /// # Errors
    ///
    /// Returns `QuizControllerError::NoSession` without a session.
    pub fn submit(&mut self) -> Result<bool, QuizControllerError> {
        let id = self.session_id;
        let session = self.current_mut()?;
        let submitted = session.submit();
        if submitted {
            let score = session.score();
            tracing::info!(
                session = %id,
                correct = score.correct,
                total = score.total,
                "quiz submitted"
            );
        }
        Ok(submitted)
    }

    /// Applies one clock tick armed for `id`.
    ///
    /// Returns `None` when `id` is stale or no session exists; the tick is
    /// dropped in that case.
    pub fn tick(&mut self, id: SessionId) -> Option<TimerState> {
        if id != self.session_id {
            tracing::trace!(stale = %id, current = %self.session_id, "stale tick ignored");
            return None;
        }
        let session = self.session.as_mut()?;
        let was_running = session.timer_state().is_running();
        let state = session.tick();
        if was_running && state == TimerState::Expired {
            tracing::info!(session = %id, "exam time expired; answers locked");
        }
        Some(state)
    }

    /// # Errors
    ///
    /// Returns `QuizControllerError::NoSession` without a session.
    pub fn toggle_reveal(&mut self) -> Result<bool, QuizControllerError> {
        Ok(self.current_mut()?.toggle_reveal())
    }

    /// Clears answers while keeping the same questions and session id.
    /// Returns `false` while an exam countdown is still running.
    ///
    /// # Errors
    ///
    /// Returns `QuizControllerError::NoSession` without a session.
    pub fn reset(&mut self) -> Result<bool, QuizControllerError> {
        let reset = self.current_mut()?.reset();
        if reset {
            tracing::debug!(session = %self.session_id, "quiz reset");
        }
        Ok(reset)
    }

    /// # Errors
    ///
    /// Returns `QuizControllerError::NoSession` without a session.
    pub fn score(&self) -> Result<Score, QuizControllerError> {
        Ok(self.current()?.score())
    }

    /// Drops the current session. Outstanding ticks become stale.
    pub fn discard(&mut self) {
        if self.session.take().is_some() {
            self.session_id = SessionId::new(self.session_id.value() + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn controller() -> QuizController<StdRng> {
        QuizController::new(StdRng::seed_from_u64(11))
    }

    fn answer_all(ctrl: &mut QuizController<StdRng>, correct: usize) {
        let questions = ctrl.session().unwrap().questions().to_vec();
        for (i, q) in questions.iter().enumerate() {
            let choice = if i < correct {
                q.correct_index
            } else {
                (q.correct_index + 1) % 4
            };
            ctrl.select_answer(q.id, choice).unwrap();
        }
    }

    #[test]
    fn operations_without_session_report_no_session() {
        let mut ctrl = controller();
        assert_eq!(ctrl.submit().unwrap_err(), QuizControllerError::NoSession);
        assert_eq!(ctrl.score().unwrap_err(), QuizControllerError::NoSession);
        assert_eq!(
            ctrl.retry_wrong_only().unwrap_err(),
            QuizControllerError::NoSession
        );
        assert_eq!(ctrl.tick(ctrl.session_id()), None);
    }

    #[test]
    fn each_replacement_gets_a_new_id() {
        let mut ctrl = controller();
        let first = ctrl.generate(Topic::Shifts, 5).unwrap();
        let second = ctrl.start_exam(Topic::Shifts, 5, 10).unwrap();

        assert_ne!(first.id, second.id);
        assert!(!first.needs_clock());
        assert!(second.needs_clock());
        assert_eq!(second.questions, 5);
        assert_eq!(ctrl.session_id(), second.id);
    }

    #[test]
    fn stale_tick_does_not_touch_replacement() {
        let mut ctrl = controller();
        let exam = ctrl.start_exam(Topic::QuotaTariff, 5, 5).unwrap();
        assert_eq!(ctrl.tick(exam.id), Some(TimerState::Running));

        let next = ctrl.start_exam(Topic::QuotaTariff, 5, 5).unwrap();
        assert_eq!(ctrl.tick(exam.id), None);
        assert_eq!(ctrl.session().unwrap().remaining_secs(), 300);

        assert_eq!(ctrl.tick(next.id), Some(TimerState::Running));
        assert_eq!(ctrl.session().unwrap().remaining_secs(), 299);
    }

    #[test]
    fn reset_is_refused_until_the_exam_ends() {
        let mut ctrl = controller();
        let exam = ctrl.start_exam(Topic::PriceControls, 5, 1).unwrap();
        ctrl.tick(exam.id);

        assert!(!ctrl.reset().unwrap());
        assert_eq!(ctrl.session().unwrap().timer_state(), TimerState::Running);

        let mut last = None;
        for _ in 0..59 {
            last = ctrl.tick(exam.id);
        }
        assert_eq!(last, Some(TimerState::Expired));
        assert!(ctrl.reset().unwrap());
    }

    #[test]
    fn expiry_through_ticks_locks_the_session() {
        let mut ctrl = controller();
        let exam = ctrl.start_exam(Topic::PriceControls, 5, 1).unwrap();
        let mut last = None;
        for _ in 0..60 {
            last = ctrl.tick(exam.id);
        }
        assert_eq!(last, Some(TimerState::Expired));
        let session = ctrl.session().unwrap();
        assert!(session.is_locked());
        assert!(session.reveal_answers());
        assert_eq!(ctrl.tick(exam.id), Some(TimerState::Expired));
    }

    #[test]
    fn empty_retry_keeps_session_and_id() {
        let mut ctrl = controller();
        let ticket = ctrl.generate(Topic::Shifts, 8).unwrap();
        answer_all(&mut ctrl, 8);
        ctrl.submit().unwrap();

        assert_eq!(ctrl.retry_wrong_only().unwrap(), None);
        assert_eq!(ctrl.retry_wrong_or_unanswered().unwrap(), None);
        assert_eq!(ctrl.session_id(), ticket.id);
        assert!(ctrl.score().unwrap().is_perfect());
    }

    #[test]
    fn exam_retry_is_untimed_practice() {
        let mut ctrl = controller();
        let exam = ctrl.start_exam(Topic::Shifts, 10, 15).unwrap();
        answer_all(&mut ctrl, 6);
        assert!(ctrl.submit().unwrap());
        assert!(!ctrl.submit().unwrap());

        let retry = ctrl.retry_wrong_only().unwrap().unwrap();
        assert_ne!(retry.id, exam.id);
        assert_eq!(retry.mode, QuizMode::Practice);
        assert!(!retry.needs_clock());
        assert_eq!(retry.questions, 4);
        assert_eq!(
            ctrl.session().unwrap().timer_state(),
            TimerState::Idle
        );
    }

    #[test]
    fn reset_keeps_id_and_questions() {
        let mut ctrl = controller();
        let ticket = ctrl.generate(Topic::PriceControls, 5).unwrap();
        let before = ctrl.session().unwrap().questions().to_vec();
        answer_all(&mut ctrl, 2);
        ctrl.submit().unwrap();

        assert!(ctrl.reset().unwrap());
        let session = ctrl.session().unwrap();
        assert_eq!(session.questions(), before.as_slice());
        assert!(session.answers().is_empty());
        assert!(!session.is_locked());
        assert_eq!(ctrl.session_id(), ticket.id);
    }

    #[test]
    fn toggle_reveal_only_after_submit() {
        let mut ctrl = controller();
        ctrl.generate(Topic::PriceControls, 5).unwrap();
        assert!(!ctrl.toggle_reveal().unwrap());
        ctrl.submit().unwrap();
        assert!(ctrl.toggle_reveal().unwrap());
        assert!(!ctrl.session().unwrap().reveal_answers());
    }

    #[test]
    fn discard_invalidates_outstanding_ticks() {
        let mut ctrl = controller();
        let exam = ctrl.start_exam(Topic::Shifts, 5, 5).unwrap();
        ctrl.discard();
        assert!(ctrl.session().is_none());
        assert_ne!(ctrl.session_id(), exam.id);
        assert_eq!(ctrl.tick(exam.id), None);
    }

    #[test]
    fn invalid_requests_leave_current_session() {
        let mut ctrl = controller();
        let ticket = ctrl.generate(Topic::Shifts, 5).unwrap();
        assert!(matches!(
            ctrl.generate(Topic::Shifts, 0),
            Err(QuizControllerError::Session(_))
        ));
        assert!(matches!(
            ctrl.start_exam(Topic::Shifts, 5, 0),
            Err(QuizControllerError::Session(_))
        ));
        assert_eq!(ctrl.session_id(), ticket.id);
        assert!(matches!(
            ctrl.select_answer(QuestionId::new(999), 0),
            Err(QuizControllerError::Session(_))
        ));
    }
}
