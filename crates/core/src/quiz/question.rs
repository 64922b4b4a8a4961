use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::QuestionId;

/// Number of choices every multiple-choice question carries.
pub const CHOICE_COUNT: usize = 4;

/// Key of one offline question bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    PriceControls,
    QuotaTariff,
    Shifts,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::PriceControls, Topic::QuotaTariff, Topic::Shifts];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Topic::PriceControls => "price_controls",
            Topic::QuotaTariff => "quota_tariff",
            Topic::Shifts => "shifts",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Topic::PriceControls => "Price Ceilings & Floors (Shortage/Surplus)",
            Topic::QuotaTariff => "Quotas vs Tariffs (Wedge, DWL, Supply)",
            Topic::Shifts => "Supply & Demand Shifts (Price/Quantity changes)",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTopicError {
    raw: String,
}

impl fmt::Display for ParseTopicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown topic: {}", self.raw)
    }
}

impl std::error::Error for ParseTopicError {}

impl FromStr for Topic {
    type Err = ParseTopicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Topic::ALL
            .into_iter()
            .find(|topic| topic.key() == key)
            .ok_or_else(|| ParseTopicError { raw: key.to_owned() })
    }
}

/// Immutable multiple-choice question from a static bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: QuestionId,
    pub topic: Topic,
    pub prompt: &'static str,
    pub choices: [&'static str; CHOICE_COUNT],
    pub correct_index: usize,
}

impl Question {
    #[must_use]
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_index
    }

    #[must_use]
    pub fn correct_choice(&self) -> &'static str {
        self.choices[self.correct_index]
    }
}

/// Letter shown next to a choice: 0 -> 'A', 1 -> 'B', ...
#[must_use]
pub fn choice_label(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .and_then(|i| b'A'.checked_add(i))
        .map_or('?', char::from)
}

/// Parses a choice letter (case-insensitive) back into an index.
#[must_use]
pub fn parse_choice_label(raw: &str) -> Option<usize> {
    let mut chars = raw.trim().chars();
    let letter = chars.next()?.to_ascii_uppercase();
    if chars.next().is_some() || !letter.is_ascii_uppercase() {
        return None;
    }
    let index = usize::from(letter as u8 - b'A');
    (index < CHOICE_COUNT).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_round_trips_through_key() {
        for topic in Topic::ALL {
            assert_eq!(topic.key().parse::<Topic>().unwrap(), topic);
        }
    }

    #[test]
    fn unknown_topic_is_rejected() {
        let err = "microeconomics".parse::<Topic>().unwrap_err();
        assert_eq!(err.to_string(), "unknown topic: microeconomics");
    }

    #[test]
    fn topic_serializes_as_key() {
        let json = serde_json::to_string(&Topic::QuotaTariff).unwrap();
        assert_eq!(json, "\"quota_tariff\"");
    }

    #[test]
    fn choice_labels() {
        assert_eq!(choice_label(0), 'A');
        assert_eq!(choice_label(3), 'D');
        assert_eq!(parse_choice_label(" c "), Some(2));
        assert_eq!(parse_choice_label("E"), None);
        assert_eq!(parse_choice_label("AB"), None);
        assert_eq!(parse_choice_label("1"), None);
    }
}
