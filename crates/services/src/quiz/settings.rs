use std::env;

use study_core::quiz::Topic;

use crate::error::SettingsError;

/// Question counts offered by the quiz picker.
pub const ALLOWED_COUNTS: [usize; 5] = [5, 8, 10, 12, 15];

/// Exam lengths, in minutes, offered by the exam picker.
pub const ALLOWED_DURATIONS: [u32; 7] = [5, 10, 15, 20, 30, 45, 60];

pub const DEFAULT_COUNT: usize = 10;
pub const DEFAULT_EXAM_MINUTES: u32 = 20;

pub const COUNT_VAR: &str = "STUDY_QUIZ_COUNT";
pub const EXAM_MINUTES_VAR: &str = "STUDY_EXAM_MINUTES";
pub const TOPIC_VAR: &str = "STUDY_QUIZ_TOPIC";

/// Defaults for new quiz and exam sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSettings {
    topic: Topic,
    count: usize,
    exam_minutes: u32,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            topic: Topic::PriceControls,
            count: DEFAULT_COUNT,
            exam_minutes: DEFAULT_EXAM_MINUTES,
        }
    }
}

impl QuizSettings {
    /// Read overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if a variable is set to an unsupported value.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read overrides through `lookup`; unset or blank keys keep defaults.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if a value does not parse or is not offered.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        if let Some(raw) = get(TOPIC_VAR) {
            settings = settings.with_topic(raw.parse::<Topic>()?);
        }
        if let Some(raw) = get(COUNT_VAR) {
            settings = settings.with_count(parse_number(COUNT_VAR, &raw)?)?;
        }
        if let Some(raw) = get(EXAM_MINUTES_VAR) {
            settings = settings.with_exam_minutes(parse_number(EXAM_MINUTES_VAR, &raw)?)?;
        }

        Ok(settings)
    }

    #[must_use]
    pub fn with_topic(mut self, topic: Topic) -> Self {
        self.topic = topic;
        self
    }

    /// # Errors
    ///
    /// Returns `SettingsError::UnsupportedCount` unless `count` is in
    /// `ALLOWED_COUNTS`.
    pub fn with_count(mut self, count: usize) -> Result<Self, SettingsError> {
        if !ALLOWED_COUNTS.contains(&count) {
            return Err(SettingsError::UnsupportedCount(count));
        }
        self.count = count;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `SettingsError::UnsupportedDuration` unless `minutes` is in
    /// `ALLOWED_DURATIONS`.
    pub fn with_exam_minutes(mut self, minutes: u32) -> Result<Self, SettingsError> {
        if !ALLOWED_DURATIONS.contains(&minutes) {
            return Err(SettingsError::UnsupportedDuration(minutes));
        }
        self.exam_minutes = minutes;
        Ok(self)
    }

    #[must_use]
    pub fn topic(&self) -> Topic {
        self.topic
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn exam_minutes(&self) -> u32 {
        self.exam_minutes
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, raw: &str) -> Result<T, SettingsError> {
    raw.trim().parse().map_err(|_| SettingsError::InvalidNumber {
        var,
        raw: raw.to_owned(),
    })
}
