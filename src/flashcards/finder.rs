//! Due-card discovery
//!
//! Scans the whole collection one document at a time. A document that
//! cannot be read is logged and skipped; it never aborts the scan.
//!
//! Review dates are written as UTC dates, but "today" for the due check is
//! the host's local calendar date.

use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};

use crate::settings::Settings;
use crate::storage::{DocumentRef, DocumentStore};

use super::algorithm::MASTERED_AFTER_STAGE;
use super::classifier::Membership;
use super::frontmatter::extract_schedule;
use super::models::{CardMetadata, Result, ReviewStats};
use super::scheduler::Clock;

pub struct CardFinder<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
    settings: &'a Settings,
    clock: Clock,
    /// Offset used to find today's date; the host's local zone when unset
    offset: Option<FixedOffset>,
}

impl<'a, S: DocumentStore + ?Sized> CardFinder<'a, S> {
    pub fn new(store: &'a S, settings: &'a Settings) -> Self {
        Self {
            store,
            settings,
            clock: Utc::now,
            offset: None,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Evaluate "today" at a fixed UTC offset instead of the local zone
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    pub fn today(&self) -> NaiveDate {
        let now = self.now();
        match self.offset {
            Some(offset) => now.with_timezone(&offset).date_naive(),
            None => now.with_timezone(&Local).date_naive(),
        }
    }

    /// Cards due today or earlier, earliest first, unscheduled cards leading
    pub fn due_cards(&self) -> Result<Vec<CardMetadata>> {
        let today = self.today();
        let mut cards: Vec<CardMetadata> = self
            .all_cards()?
            .into_iter()
            .filter(|card| card.is_due(today))
            .collect();
        sort_cards(&mut cards);
        Ok(cards)
    }

    /// Every document matching the membership rule, in scan order
    pub fn all_cards(&self) -> Result<Vec<CardMetadata>> {
        let membership = Membership::from_settings(self.settings);
        let documents = self.store.list_documents()?;

        let mut cards = Vec::new();
        for document in documents {
            if let Some(card) = self.load_card(&membership, document) {
                cards.push(card);
            }
        }

        log::debug!("Scan found {} flashcards", cards.len());
        Ok(cards)
    }

    pub fn stats(&self) -> Result<ReviewStats> {
        let today = self.today();
        let cards = self.all_cards()?;

        Ok(ReviewStats {
            total_cards: cards.len(),
            due_cards: cards.iter().filter(|c| c.is_due(today)).count(),
            unscheduled_cards: cards.iter().filter(|c| !c.scheduled).count(),
            near_mastery_cards: cards
                .iter()
                .filter(|c| c.scheduled && c.stage_number() >= MASTERED_AFTER_STAGE)
                .count(),
        })
    }

    fn load_card(&self, membership: &Membership, document: DocumentRef) -> Option<CardMetadata> {
        // Folder mode classifies on the path alone
        if !membership.needs_content() && !membership.is_card(&document, "") {
            return None;
        }

        let content = match self.store.read_document(&document) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Skipping {}: {}", document, e);
                return None;
            }
        };

        if !membership.is_card(&document, &content) {
            return None;
        }

        let schedule = extract_schedule(&content);
        Some(CardMetadata::new(document, content, schedule))
    }
}

/// Stable sort by review date: unscheduled first, then ascending dates,
/// then unreadable dates
pub fn sort_cards(cards: &mut [CardMetadata]) {
    cards.sort_by(compare_review_dates);
}

fn compare_review_dates(a: &CardMetadata, b: &CardMetadata) -> Ordering {
    review_sort_key(a).cmp(&review_sort_key(b))
}

fn review_sort_key(card: &CardMetadata) -> (u8, Option<NaiveDate>) {
    if card.next_review.is_empty() {
        return (0, None);
    }
    match card.review_date() {
        Some(date) => (1, Some(date)),
        None => (2, None),
    }
}
