use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::model::QuestionId;

use super::bank::{BANK_SIZE, bank};
use super::question::{Question, Topic};
use super::shuffle::shuffle;
use super::timer::{ExamTimer, SECONDS_PER_MINUTE, TimerState, format_remaining};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Caller mistakes. None of these are recoverable at runtime; the UI is
/// expected to make them impossible.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("question count must be at least 1")]
    InvalidCount,

    #[error("exam duration must be at least 1 minute")]
    InvalidDuration,

    #[error("question {0} is not part of this session")]
    UnknownQuestion(QuestionId),

    #[error("choice {choice} is out of range for a question with {choices} choices")]
    ChoiceOutOfRange { choice: usize, choices: usize },
}

//
// ─── MODE / OUTCOMES / EVENTS ──────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum QuizMode {
    Practice,
    Exam { duration_minutes: u32 },
}

impl QuizMode {
    #[must_use]
    pub fn is_exam(self) -> bool {
        matches!(self, QuizMode::Exam { .. })
    }

    /// Exam length in seconds; zero for practice.
    #[must_use]
    pub fn duration_secs(self) -> u32 {
        match self {
            QuizMode::Practice => 0,
            QuizMode::Exam { duration_minutes } => {
                duration_minutes.saturating_mul(SECONDS_PER_MINUTE)
            }
        }
    }
}

/// What happened to a `select_answer` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The answer was stored; `previous` is the choice it replaced, if any.
    Recorded { previous: Option<usize> },
    /// The session is locked and nothing changed.
    Locked,
}

/// A discrete user or scheduler event applied to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizEvent {
    SelectAnswer { question_id: QuestionId, choice: usize },
    Submit,
    Tick,
    ToggleReveal,
    Reset,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One quiz attempt held in memory.
///
/// Built by [`QuizSession::generate`] or [`QuizSession::retry`] and replaced
/// wholesale whenever a new quiz starts. Once locked (submitted or expired) no
/// answer can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    questions: Vec<Question>,
    mode: QuizMode,
    answers: HashMap<QuestionId, usize>,
    locked: bool,
    reveal_answers: bool,
    timer: ExamTimer,
}

impl QuizSession {
    /// Draws `min(count, 15)` distinct questions from `topic`'s bank in a
    /// uniformly random order.
    ///
    /// Exam mode arms the countdown at `duration_minutes * 60` seconds.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidCount` for `count == 0` and
    /// `SessionError::InvalidDuration` for a zero-minute exam.
    pub fn generate<R: Rng + ?Sized>(
        topic: Topic,
        count: usize,
        mode: QuizMode,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        if count == 0 {
            return Err(SessionError::InvalidCount);
        }
        if let QuizMode::Exam { duration_minutes: 0 } = mode {
            return Err(SessionError::InvalidDuration);
        }

        let mut questions = bank(topic).to_vec();
        shuffle(&mut questions, rng);
        questions.truncate(count.min(BANK_SIZE));

        Ok(Self::fresh(questions, mode))
    }

    pub(crate) fn fresh(questions: Vec<Question>, mode: QuizMode) -> Self {
        let timer = if mode.is_exam() {
            ExamTimer::armed(mode.duration_secs())
        } else {
            ExamTimer::idle()
        };
        Self {
            questions,
            mode,
            answers: HashMap::new(),
            locked: false,
            reveal_answers: false,
            timer,
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    #[must_use]
    pub fn answers(&self) -> &HashMap<QuestionId, usize> {
        &self.answers
    }

    #[must_use]
    pub fn answer(&self, id: QuestionId) -> Option<usize> {
        self.answers.get(&id).copied()
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[must_use]
    pub fn reveal_answers(&self) -> bool {
        self.reveal_answers
    }

    #[must_use]
    pub fn timer_state(&self) -> TimerState {
        self.timer.state()
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.timer.duration_secs()
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.timer.remaining_secs()
    }

    /// Remaining exam time as `m:ss`.
    #[must_use]
    pub fn remaining_display(&self) -> String {
        format_remaining(self.remaining_secs())
    }

    /// Records (or overwrites) the choice for one question.
    ///
    /// A locked session silently keeps its answers and reports
    /// `AnswerOutcome::Locked`; this covers input racing with exam expiry.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownQuestion` if the id is not in this
    /// session and `SessionError::ChoiceOutOfRange` if `choice` does not index
    /// one of the question's choices.
    pub fn select_answer(
        &mut self,
        question_id: QuestionId,
        choice: usize,
    ) -> Result<AnswerOutcome, SessionError> {
        let question = self
            .question(question_id)
            .ok_or(SessionError::UnknownQuestion(question_id))?;
        let choices = question.choices.len();
        if choice >= choices {
            return Err(SessionError::ChoiceOutOfRange { choice, choices });
        }

        if self.locked {
            return Ok(AnswerOutcome::Locked);
        }

        let previous = self.answers.insert(question_id, choice);
        Ok(AnswerOutcome::Recorded { previous })
    }

    /// Locks the session and reveals answers. Returns `false` if it was
    /// already locked.
    pub fn submit(&mut self) -> bool {
        if self.locked {
            return false;
        }
        self.timer.stop_by_submit();
        self.lock_and_reveal();
        true
    }

    /// One second of exam time. Expiry locks the session and reveals answers
    /// in the same step.
    pub fn tick(&mut self) -> TimerState {
        let was_running = self.timer.state().is_running();
        let state = self.timer.tick();
        if was_running && state == TimerState::Expired {
            self.lock_and_reveal();
        }
        state
    }

    /// Flips answer visibility after submission.
    ///
    /// Nothing happens before the session is locked. Revealed answers can be
    /// hidden again only in practice mode. Returns whether anything changed.
    pub fn toggle_reveal(&mut self) -> bool {
        if !self.locked {
            return false;
        }
        if self.reveal_answers && self.mode.is_exam() {
            return false;
        }
        self.reveal_answers = !self.reveal_answers;
        true
    }

    /// Clears answers and unlocks while keeping the same questions. The
    /// countdown is not re-armed.
    ///
    /// Refused while an exam countdown is running; returns whether the
    /// session was reset.
    pub fn reset(&mut self) -> bool {
        if self.timer.state().is_running() {
            return false;
        }
        self.answers.clear();
        self.locked = false;
        self.reveal_answers = false;
        self.timer.cancel();
        true
    }

    /// Applies one event and returns the resulting session.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError` from answer selection.
    pub fn apply(mut self, event: QuizEvent) -> Result<Self, SessionError> {
        match event {
            QuizEvent::SelectAnswer {
                question_id,
                choice,
            } => {
                self.select_answer(question_id, choice)?;
            }
            QuizEvent::Submit => {
                self.submit();
            }
            QuizEvent::Tick => {
                self.tick();
            }
            QuizEvent::ToggleReveal => {
                self.toggle_reveal();
            }
            QuizEvent::Reset => {
                self.reset();
            }
        }
        Ok(self)
    }

    fn lock_and_reveal(&mut self) {
        self.locked = true;
        self.reveal_answers = true;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    fn practice(count: usize) -> QuizSession {
        QuizSession::generate(Topic::PriceControls, count, QuizMode::Practice, &mut rng()).unwrap()
    }

    fn exam(minutes: u32) -> QuizSession {
        QuizSession::generate(
            Topic::Shifts,
            5,
            QuizMode::Exam {
                duration_minutes: minutes,
            },
            &mut rng(),
        )
        .unwrap()
    }

    #[test]
    fn generate_caps_count_at_bank_size() {
        for (requested, expected) in [(1, 1), (5, 5), (15, 15), (40, 15)] {
            let session = practice(requested);
            assert_eq!(session.len(), expected);
            let ids: HashSet<_> = session.questions().iter().map(|q| q.id).collect();
            assert_eq!(ids.len(), expected, "duplicates for count {requested}");
        }
    }

    #[test]
    fn generate_rejects_zero_count_and_zero_duration() {
        let err = QuizSession::generate(Topic::Shifts, 0, QuizMode::Practice, &mut rng());
        assert_eq!(err.unwrap_err(), SessionError::InvalidCount);

        let err = QuizSession::generate(
            Topic::Shifts,
            5,
            QuizMode::Exam {
                duration_minutes: 0,
            },
            &mut rng(),
        );
        assert_eq!(err.unwrap_err(), SessionError::InvalidDuration);
    }

    #[test]
    fn generate_is_deterministic_for_a_seed() {
        let a = practice(10);
        let b = practice(10);
        assert_eq!(a, b);
    }

    #[test]
    fn generate_orders_differ_across_draws() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut orders = HashSet::new();
        for _ in 0..20 {
            let session =
                QuizSession::generate(Topic::QuotaTariff, 15, QuizMode::Practice, &mut rng)
                    .unwrap();
            orders.insert(session.questions().iter().map(|q| q.id).collect::<Vec<_>>());
        }
        assert!(orders.len() > 15, "only {} distinct orders", orders.len());
    }

    #[test]
    fn fresh_practice_session_state() {
        let session = practice(5);
        assert!(session.answers().is_empty());
        assert!(!session.is_locked());
        assert!(!session.reveal_answers());
        assert_eq!(session.timer_state(), TimerState::Idle);
        assert_eq!(session.remaining_secs(), 0);
    }

    #[test]
    fn exam_session_arms_timer() {
        let session = exam(20);
        assert_eq!(session.timer_state(), TimerState::Running);
        assert_eq!(session.remaining_secs(), 1_200);
        assert_eq!(session.remaining_display(), "20:00");
    }

    #[test]
    fn reselecting_replaces_previous_answer_only() {
        let mut session = practice(3);
        let first = session.questions()[0].id;
        let second = session.questions()[1].id;

        session.select_answer(second, 3).unwrap();
        assert_eq!(
            session.select_answer(first, 1).unwrap(),
            AnswerOutcome::Recorded { previous: None }
        );
        assert_eq!(
            session.select_answer(first, 2).unwrap(),
            AnswerOutcome::Recorded { previous: Some(1) }
        );

        assert_eq!(session.answer(first), Some(2));
        assert_eq!(session.answer(second), Some(3));
        assert_eq!(session.answers().len(), 2);
    }

    #[test]
    fn locked_session_ignores_answers() {
        let mut session = practice(3);
        let id = session.questions()[0].id;
        session.select_answer(id, 1).unwrap();
        assert!(session.submit());

        let before = session.answers().clone();
        assert_eq!(session.select_answer(id, 0).unwrap(), AnswerOutcome::Locked);
        assert_eq!(session.answers(), &before);
    }

    #[test]
    fn out_of_range_choice_is_rejected_not_clamped() {
        let mut session = practice(3);
        let id = session.questions()[0].id;
        let err = session.select_answer(id, 4).unwrap_err();
        assert_eq!(
            err,
            SessionError::ChoiceOutOfRange {
                choice: 4,
                choices: 4
            }
        );
        assert!(session.answers().is_empty());
    }

    #[test]
    fn unknown_question_is_rejected() {
        let mut session = practice(3);
        let foreign = QuestionId::new(301);
        assert_eq!(
            session.select_answer(foreign, 0).unwrap_err(),
            SessionError::UnknownQuestion(foreign)
        );
    }

    #[test]
    fn submit_locks_reveals_and_is_idempotent() {
        let mut session = practice(3);
        assert!(session.submit());
        assert!(session.is_locked());
        assert!(session.reveal_answers());
        assert!(!session.submit());
        assert_eq!(session.timer_state(), TimerState::Idle);
    }

    #[test]
    fn exam_submit_stops_timer() {
        let mut session = exam(1);
        session.tick();
        session.submit();
        assert_eq!(session.timer_state(), TimerState::StoppedBySubmit);
        assert_eq!(session.tick(), TimerState::StoppedBySubmit);
        assert_eq!(session.remaining_secs(), 59);
    }

    #[test]
    fn one_minute_exam_expires_after_sixty_ticks() {
        let mut session = exam(1);
        for _ in 0..59 {
            assert_eq!(session.tick(), TimerState::Running);
            assert!(!session.is_locked());
        }
        assert_eq!(session.tick(), TimerState::Expired);
        assert_eq!(session.remaining_secs(), 0);
        assert!(session.is_locked());
        assert!(session.reveal_answers());
        assert_eq!(session.remaining_display(), "0:00");
    }

    #[test]
    fn answers_after_expiry_are_dropped() {
        let mut session = exam(1);
        let id = session.questions()[0].id;
        for _ in 0..60 {
            session.tick();
        }
        assert_eq!(session.select_answer(id, 0).unwrap(), AnswerOutcome::Locked);
        assert!(session.answers().is_empty());
    }

    #[test]
    fn practice_ticks_do_nothing() {
        let mut session = practice(3);
        assert_eq!(session.tick(), TimerState::Idle);
        assert!(!session.is_locked());
    }

    #[test]
    fn reveal_toggle_requires_submission() {
        let mut session = practice(3);
        assert!(!session.toggle_reveal());
        assert!(!session.reveal_answers());
    }

    #[test]
    fn practice_answers_can_be_hidden_and_shown_again() {
        let mut session = practice(3);
        session.submit();
        assert!(session.toggle_reveal());
        assert!(!session.reveal_answers());
        assert!(session.toggle_reveal());
        assert!(session.reveal_answers());
    }

    #[test]
    fn exam_answers_stay_revealed() {
        let mut session = exam(1);
        session.submit();
        assert!(!session.toggle_reveal());
        assert!(session.reveal_answers());
    }

    #[test]
    fn reset_keeps_questions_and_clears_state() {
        let mut session = exam(1);
        let id = session.questions()[0].id;
        session.select_answer(id, 0).unwrap();
        session.submit();

        let questions = session.questions().to_vec();
        assert!(session.reset());
        assert_eq!(session.questions(), questions.as_slice());
        assert!(session.answers().is_empty());
        assert!(!session.is_locked());
        assert!(!session.reveal_answers());
        assert_eq!(session.timer_state(), TimerState::Idle);
        assert_eq!(session.remaining_secs(), 0);
    }

    #[test]
    fn running_exam_cannot_be_reset() {
        let mut session = exam(1);
        let id = session.questions()[0].id;
        session.select_answer(id, 2).unwrap();
        session.tick();

        assert!(!session.reset());
        assert_eq!(session.answer(id), Some(2));
        assert_eq!(session.timer_state(), TimerState::Running);
        assert_eq!(session.remaining_secs(), 59);

        for _ in 0..59 {
            session.tick();
        }
        assert_eq!(session.timer_state(), TimerState::Expired);
        assert!(session.is_locked());
        assert!(session.reset());
    }

    #[test]
    fn practice_session_resets_before_submit() {
        let mut session = practice(3);
        let id = session.questions()[0].id;
        session.select_answer(id, 1).unwrap();
        assert!(session.reset());
        assert!(session.answers().is_empty());
    }

    #[test]
    fn apply_runs_events_in_order() {
        let session = practice(2);
        let id = session.questions()[0].id;
        let session = session
            .apply(QuizEvent::SelectAnswer {
                question_id: id,
                choice: 1,
            })
            .and_then(|s| s.apply(QuizEvent::Submit))
            .and_then(|s| {
                s.apply(QuizEvent::SelectAnswer {
                    question_id: id,
                    choice: 0,
                })
            })
            .and_then(|s| s.apply(QuizEvent::ToggleReveal))
            .unwrap();

        assert_eq!(session.answer(id), Some(1));
        assert!(session.is_locked());
        assert!(!session.reveal_answers());
    }

    #[test]
    fn apply_surfaces_programming_errors() {
        let session = practice(2);
        let id = session.questions()[0].id;
        let err = session
            .apply(QuizEvent::SelectAnswer {
                question_id: id,
                choice: 9,
            })
            .unwrap_err();
        assert!(matches!(err, SessionError::ChoiceOutOfRange { .. }));
    }

    #[test]
    fn mode_serializes_with_tag() {
        let json = serde_json::to_string(&QuizMode::Exam {
            duration_minutes: 15,
        })
        .unwrap();
        assert_eq!(json, r#"{"mode":"exam","duration_minutes":15}"#);
    }
}
