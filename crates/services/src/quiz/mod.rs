//! Quiz orchestration around the synchronous engine in `study_core::quiz`.

mod clock;
mod controller;
mod settings;

pub use clock::{ExamClock, TICK_PERIOD};
pub use controller::{QuizController, SessionId, SessionTicket};
pub use settings::{
    ALLOWED_COUNTS, ALLOWED_DURATIONS, COUNT_VAR, DEFAULT_COUNT, DEFAULT_EXAM_MINUTES,
    EXAM_MINUTES_VAR, QuizSettings, TOPIC_VAR,
};
