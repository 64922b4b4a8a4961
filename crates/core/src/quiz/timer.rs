use serde::Serialize;

/// Seconds in one minute of exam duration.
pub const SECONDS_PER_MINUTE: u32 = 60;

/// Lifecycle of the exam countdown.
///
/// `Idle -> Running -> {Expired, StoppedBySubmit}`. Practice sessions stay
/// `Idle` for their whole life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    #[default]
    Idle,
    Running,
    Expired,
    StoppedBySubmit,
}

impl TimerState {
    #[must_use]
    pub fn is_running(self) -> bool {
        matches!(self, TimerState::Running)
    }

    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, TimerState::Expired | TimerState::StoppedBySubmit)
    }
}

/// Countdown owned by a session. It never schedules anything itself; an
/// external driver calls [`ExamTimer::tick`] once per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExamTimer {
    state: TimerState,
    duration_secs: u32,
    remaining_secs: u32,
}

impl ExamTimer {
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    /// A running countdown starting at `duration_secs`.
    #[must_use]
    pub fn armed(duration_secs: u32) -> Self {
        Self {
            state: TimerState::Running,
            duration_secs,
            remaining_secs: duration_secs,
        }
    }

    #[must_use]
    pub fn state(&self) -> TimerState {
        self.state
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Advances the countdown by one second.
    ///
    /// Only a running timer moves. The tick that would bring the remaining
    /// time to zero or below clamps it to zero and expires the timer.
    pub fn tick(&mut self) -> TimerState {
        if self.state.is_running() {
            if self.remaining_secs <= 1 {
                self.remaining_secs = 0;
                self.state = TimerState::Expired;
            } else {
                self.remaining_secs -= 1;
            }
        }
        self.state
    }

    /// Stops a running countdown because the user submitted.
    pub fn stop_by_submit(&mut self) {
        if self.state.is_running() {
            self.state = TimerState::StoppedBySubmit;
        }
    }

    /// Back to idle with no time on the clock.
    pub fn cancel(&mut self) {
        self.state = TimerState::Idle;
        self.remaining_secs = 0;
    }
}

/// Renders seconds as `m:ss` (65 -> "1:05").
#[must_use]
pub fn format_remaining(secs: u32) -> String {
    format!(
        "{}:{:02}",
        secs / SECONDS_PER_MINUTE,
        secs % SECONDS_PER_MINUTE
    )
}
