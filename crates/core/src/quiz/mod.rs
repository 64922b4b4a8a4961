//! Offline quiz engine: static banks, randomized sessions, answer tracking,
//! scoring, the exam countdown and retry subsets.
//!
//! Everything here is synchronous and owns no scheduler. Randomness comes in
//! through a caller-supplied `rand::Rng`.

mod bank;
mod question;
mod retry;
mod score;
mod session;
mod shuffle;
mod timer;

pub use bank::{BANK_SIZE, bank};
pub use question::{
    CHOICE_COUNT, ParseTopicError, Question, Topic, choice_label, parse_choice_label,
};
pub use retry::{RetryScope, wrong_only, wrong_or_unanswered};
pub use score::{Score, score};
pub use session::{AnswerOutcome, QuizEvent, QuizMode, QuizSession, SessionError};
pub use shuffle::{shuffle, shuffled};
pub use timer::{ExamTimer, SECONDS_PER_MINUTE, TimerState, format_remaining};
