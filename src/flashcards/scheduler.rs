//! Grading and enrolment
//!
//! Both operations rewrite the document's metadata block through the
//! [`DocumentStore`] and publish `CardUpdated` when a write happened.

use chrono::{DateTime, Utc};

use crate::events::{EventBus, EventKind};
use crate::settings::{Settings, SourceMode, DEFAULT_FOLDER_NAME, DEFAULT_TAG_NAME};
use crate::storage::{DocumentRef, DocumentStore};

use super::algorithm::{calculate_next_review, format_review_date, parse_stage, Difficulty, ReviewResult};
use super::classifier::{has_inline_tag, is_path_in_folder, Membership};
use super::frontmatter::{parse_document, CardSchedule, STAGE_KEY};
use super::models::{GradeOutcome, MakeCardOutcome, Result};

/// Source of "now"; tests substitute a fixed instant
pub type Clock = fn() -> DateTime<Utc>;

pub struct CardScheduler<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
    settings: &'a Settings,
    events: &'a EventBus,
    clock: Clock,
}

impl<'a, S: DocumentStore + ?Sized> CardScheduler<'a, S> {
    pub fn new(store: &'a S, settings: &'a Settings, events: &'a EventBus) -> Self {
        Self {
            store,
            settings,
            events,
            clock: Utc::now,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Grade a document the host believes is a card.
    ///
    /// Returns `NotAFlashcard` without touching the document when it does
    /// not match the active membership rule.
    pub fn review(&self, document: &DocumentRef, difficulty: &Difficulty) -> Result<GradeOutcome> {
        let membership = Membership::from_settings(self.settings);
        let is_card = if membership.needs_content() {
            let content = self.store.read_document(document)?;
            membership.is_card(document, &content)
        } else {
            membership.is_card(document, "")
        };

        if !is_card {
            log::info!("{} is not a flashcard, not grading", document);
            return Ok(GradeOutcome::NotAFlashcard);
        }
        self.grade(document, difficulty)
    }

    /// Apply a grade and write the new schedule into the document.
    ///
    /// Past the last stage the whole metadata block is dropped, including
    /// keys this crate does not own.
    pub fn grade(&self, document: &DocumentRef, difficulty: &Difficulty) -> Result<GradeOutcome> {
        let content = self.store.read_document(document)?;
        let parsed = parse_document(&content);

        let stage = parsed.frontmatter.get(STAGE_KEY).map(parse_stage).unwrap_or(0);
        let result = calculate_next_review(stage, difficulty, (self.clock)());

        let outcome = match result {
            ReviewResult::Mastered { stage } => {
                self.store.write_document(document, parsed.body)?;
                log::info!("{} mastered at stage {}", document, stage);
                GradeOutcome::Mastered
            }
            ReviewResult::Scheduled { stage, interval_days, due_at } => {
                let next_review = format_review_date(due_at.date_naive());
                let mut frontmatter = parsed.frontmatter;
                frontmatter.set_schedule(&CardSchedule {
                    next_review: next_review.clone(),
                    stage: stage.to_string(),
                });

                let new_content = format!("{}\n\n{}", frontmatter.render(), parsed.body);
                self.store.write_document(document, &new_content)?;
                log::info!(
                    "{} graded {}: stage {}, next review {} ({} days)",
                    document,
                    difficulty,
                    stage,
                    next_review,
                    interval_days
                );
                GradeOutcome::Updated { next_review, stage }
            }
        };

        self.events.emit(EventKind::CardUpdated, Some(document));
        Ok(outcome)
    }

    /// Enrol a document: schedule it for today and tag or move it so it
    /// matches the active membership rule.
    pub fn make_card(&self, document: &DocumentRef) -> Result<MakeCardOutcome> {
        let outcome = match self.settings.source_mode {
            SourceMode::Tag => self.make_tagged_card(document)?,
            SourceMode::Folder => self.make_folder_card(document)?,
        };

        if let Some(card) = outcome.document() {
            self.events.emit(EventKind::CardUpdated, Some(card));
        }
        Ok(outcome)
    }

    fn initial_schedule(&self) -> CardSchedule {
        CardSchedule {
            next_review: format_review_date((self.clock)().date_naive()),
            stage: "0".to_string(),
        }
    }

    fn make_tagged_card(&self, document: &DocumentRef) -> Result<MakeCardOutcome> {
        let mut tag = self.settings.normalized_tag();
        if tag.is_empty() {
            tag = DEFAULT_TAG_NAME.to_string();
        }

        let content = self.store.read_document(document)?;
        let parsed = parse_document(&content);

        // Any `tags` value containing the tag text counts, e.g. `tags: [flashcards]`
        let listed = parsed
            .frontmatter
            .get("tags")
            .map_or(false, |tags| tags.contains(tag.as_str()));
        if listed || has_inline_tag(&content, &tag) {
            log::info!("{} already carries #{}", document, tag);
            return Ok(MakeCardOutcome::AlreadyFlashcard);
        }

        let mut frontmatter = parsed.frontmatter;
        frontmatter.set_schedule(&self.initial_schedule());

        let body = parsed.body.trim_matches('\n');
        let new_body = if body.is_empty() {
            format!("#{}\n", tag)
        } else {
            format!("#{}\n\n{}", tag, body)
        };

        let new_content = format!("{}\n{}", frontmatter.render(), new_body);
        self.store.write_document(document, &new_content)?;
        log::info!("Tagged {} with #{}", document, tag);

        Ok(MakeCardOutcome::TagAdded {
            document: document.clone(),
            tag,
        })
    }

    fn make_folder_card(&self, document: &DocumentRef) -> Result<MakeCardOutcome> {
        let mut folder = self.settings.normalized_folder();
        if folder.is_empty() {
            folder = DEFAULT_FOLDER_NAME.to_string();
        }

        if is_path_in_folder(document.path(), &folder) {
            log::info!("{} is already inside {}", document, folder);
            return Ok(MakeCardOutcome::AlreadyFlashcard);
        }

        let content = self.store.read_document(document)?;
        let parsed = parse_document(&content);

        if !self.store.folder_exists(&folder) {
            self.store.create_folder(&folder)?;
        }

        let mut frontmatter = parsed.frontmatter;
        frontmatter.set_schedule(&self.initial_schedule());

        // Write under the old identity first, then relocate
        let new_content = format!("{}\n\n{}", frontmatter.render(), parsed.body);
        self.store.write_document(document, &new_content)?;

        let target = document.moved_to(&folder);
        let moved = match self.store.move_document(document, target.path()) {
            Ok(moved) => moved,
            Err(e) => {
                if let Err(restore) = self.store.write_document(document, &content) {
                    log::warn!("Could not restore {} after failed move: {}", document, restore);
                }
                return Err(e.into());
            }
        };
        log::info!("Moved {} into {}", document, folder);

        Ok(MakeCardOutcome::MovedToFolder {
            document: moved,
            folder,
        })
    }
}
