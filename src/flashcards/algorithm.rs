//! Three-bucket geometric interval scheduling
//!
//! Every grade advances the card one stage. The interval until the next
//! review grows with the stage at a rate picked by the grade:
//! - easy: 2^stage days
//! - medium: 1.5^stage days (fractional)
//! - hard: max(1, floor(1.2^stage)) days
//! - anything else: 1 day
//!
//! A card whose new stage exceeds [`MASTERED_AFTER_STAGE`] leaves the schedule.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Highest stage a scheduled card can hold
pub const MASTERED_AFTER_STAGE: u32 = 10;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Grade given by the user after reviewing a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    /// Unrecognised label; scheduled one day out
    Other(String),
}

impl FromStr for Difficulty {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "easy" => Self::Easy,
            "medium" => Self::Medium,
            "hard" => Self::Hard,
            other => Self::Other(other.to_string()),
        })
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Easy => f.write_str("easy"),
            Self::Medium => f.write_str("medium"),
            Self::Hard => f.write_str("hard"),
            Self::Other(label) => f.write_str(label),
        }
    }
}

/// Result of grading a card at a given stage
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewResult {
    Scheduled {
        interval_days: f64,
        stage: u32,
        due_at: DateTime<Utc>,
    },
    /// The card graduated out of the schedule
    Mastered { stage: u32 },
}

impl ReviewResult {
    /// Calendar date (UTC) of the next review, `YYYY-MM-DD`
    pub fn next_review(&self) -> Option<String> {
        match self {
            Self::Scheduled { due_at, .. } => Some(format_review_date(due_at.date_naive())),
            Self::Mastered { .. } => None,
        }
    }

    pub fn stage(&self) -> u32 {
        match self {
            Self::Scheduled { stage, .. } | Self::Mastered { stage } => *stage,
        }
    }
}

/// Interval in days for grading a card currently at `stage`
pub fn interval_days(difficulty: &Difficulty, stage: u32) -> f64 {
    let exponent = stage.min(i32::MAX as u32) as i32;
    match difficulty {
        Difficulty::Easy => 2f64.powi(exponent),
        Difficulty::Medium => 1.5f64.powi(exponent),
        Difficulty::Hard => 1.2f64.powi(exponent).floor().max(1.0),
        Difficulty::Other(_) => 1.0,
    }
}

/// Grade a card at `stage` at instant `now`
pub fn calculate_next_review(stage: u32, difficulty: &Difficulty, now: DateTime<Utc>) -> ReviewResult {
    let interval = interval_days(difficulty, stage);
    let stage = stage.saturating_add(1);

    if stage > MASTERED_AFTER_STAGE {
        return ReviewResult::Mastered { stage };
    }

    // Fractional days are kept down to the millisecond, then truncated
    let millis = (interval * MS_PER_DAY) as i64;
    ReviewResult::Scheduled {
        interval_days: interval,
        stage,
        due_at: now + Duration::milliseconds(millis),
    }
}

/// Read a stored stage value: leading ASCII digits, 0 when there are none
pub fn parse_stage(raw: &str) -> u32 {
    let trimmed = raw.trim();
    let digits_end = trimmed
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    let digits = &trimmed[..digits_end];
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u32::MAX)
}

pub fn parse_review_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

pub fn format_review_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Intervals a card at `stage` would receive for easy, medium and hard
pub fn preview_intervals(stage: u32) -> [f64; 3] {
    [
        interval_days(&Difficulty::Easy, stage),
        interval_days(&Difficulty::Medium, stage),
        interval_days(&Difficulty::Hard, stage),
    ]
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: f64) -> String {
    let days = days.floor() as i64;
    if days <= 0 {
        "now".to_string()
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}
