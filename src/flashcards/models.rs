//! Data models for the flashcard system

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{DocumentRef, StorageError};

use super::algorithm::{parse_review_date, parse_stage};
use super::frontmatter::CardSchedule;

#[derive(Error, Debug)]
pub enum FlashcardError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, FlashcardError>;

/// A flashcard document with its schedule, as found by a vault scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMetadata {
    pub document: DocumentRef,
    #[serde(skip_serializing)]
    #[serde(default)]
    pub content: String,
    /// Raw stored value; empty when the card is due immediately
    pub next_review: String,
    /// Raw stored value; "0" for an unscheduled card
    pub stage: String,
    /// False when the schedule is the synthesized default
    pub scheduled: bool,
}

impl CardMetadata {
    pub fn new(document: DocumentRef, content: String, schedule: Option<CardSchedule>) -> Self {
        let scheduled = schedule.is_some();
        let schedule = schedule.unwrap_or_else(CardSchedule::unscheduled);
        Self {
            document,
            content,
            next_review: schedule.next_review,
            stage: schedule.stage,
            scheduled,
        }
    }

    pub fn stage_number(&self) -> u32 {
        parse_stage(&self.stage)
    }

    pub fn review_date(&self) -> Option<NaiveDate> {
        parse_review_date(&self.next_review)
    }

    /// Due when unscheduled or when the review date is today or earlier.
    /// An unreadable date is never due.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        if self.next_review.is_empty() {
            return true;
        }
        self.review_date().map_or(false, |date| date <= today)
    }
}

/// How a notice should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeKind {
    Success,
    Refusal,
    Info,
}

/// Message for the end user describing an outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of grading a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum GradeOutcome {
    /// Rescheduled
    #[serde(rename_all = "camelCase")]
    Updated { next_review: String, stage: u32 },
    /// Stage passed the limit; the metadata block was removed
    Mastered,
    /// The document does not match the active membership rule
    NotAFlashcard,
}

impl GradeOutcome {
    pub fn notice(&self) -> Notice {
        match self {
            Self::Updated { next_review, .. } => Notice::new(
                NoticeKind::Success,
                format!("Card updated. Next review: {}", next_review),
            ),
            Self::Mastered => Notice::new(
                NoticeKind::Success,
                "Card mastered! It has been removed from the review schedule.",
            ),
            Self::NotAFlashcard => Notice::new(NoticeKind::Refusal, "This document is not a flashcard"),
        }
    }
}

/// Result of turning a document into a flashcard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum MakeCardOutcome {
    TagAdded { document: DocumentRef, tag: String },
    MovedToFolder { document: DocumentRef, folder: String },
    AlreadyFlashcard,
}

impl MakeCardOutcome {
    pub fn is_created(&self) -> bool {
        !matches!(self, Self::AlreadyFlashcard)
    }

    /// Where the card lives after the operation, if it was created
    pub fn document(&self) -> Option<&DocumentRef> {
        match self {
            Self::TagAdded { document, .. } | Self::MovedToFolder { document, .. } => Some(document),
            Self::AlreadyFlashcard => None,
        }
    }

    pub fn notice(&self) -> Notice {
        match self {
            Self::TagAdded { tag, .. } => Notice::new(
                NoticeKind::Success,
                format!("Flashcard created - tag #{} added", tag),
            ),
            Self::MovedToFolder { folder, .. } => Notice::new(
                NoticeKind::Success,
                format!("Flashcard created - moved to folder {}", folder),
            ),
            Self::AlreadyFlashcard => {
                Notice::new(NoticeKind::Refusal, "This document is already a flashcard")
            }
        }
    }
}

/// Summary of a vault scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_cards: usize,
    pub due_cards: usize,
    pub unscheduled_cards: usize,
    /// Cards one passing grade away from leaving the schedule
    pub near_mastery_cards: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(next_review: &str) -> CardMetadata {
        CardMetadata::new(
            DocumentRef::new("a.md"),
            String::new(),
            Some(CardSchedule {
                next_review: next_review.to_string(),
                stage: "2".to_string(),
            }),
        )
    }

    #[test]
    fn test_unscheduled_default() {
        let card = CardMetadata::new(DocumentRef::new("a.md"), "#flashcard".to_string(), None);
        assert_eq!(card.next_review, "");
        assert_eq!(card.stage, "0");
        assert!(!card.scheduled);
        assert!(card.is_due(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()));
    }

    #[test]
    fn test_is_due() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(card("2024-02-28").is_due(today));
        assert!(card("2024-03-01").is_due(today));
        assert!(!card("2024-03-02").is_due(today));
        assert!(!card("someday").is_due(today));
    }

    #[test]
    fn test_notice_kinds() {
        assert_eq!(GradeOutcome::Mastered.notice().kind, NoticeKind::Success);
        assert_eq!(GradeOutcome::NotAFlashcard.notice().kind, NoticeKind::Refusal);
        assert_eq!(MakeCardOutcome::AlreadyFlashcard.notice().kind, NoticeKind::Refusal);

        let updated = GradeOutcome::Updated {
            next_review: "2024-03-09".to_string(),
            stage: 4,
        };
        assert!(updated.notice().message.contains("2024-03-09"));
    }

    #[test]
    fn test_outcome_json_shape() {
        let outcome = GradeOutcome::Updated {
            next_review: "2024-03-09".to_string(),
            stage: 4,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "updated");
        assert_eq!(json["nextReview"], "2024-03-09");
    }
}
