//! Spaced-repetition flashcards kept inside markdown notes.
//!
//! Notes become cards by tag or by folder; each card's schedule lives in
//! the note's own metadata block.

pub mod events;
pub mod flashcards;
pub mod settings;
pub mod storage;

pub use events::{CardEvent, EventBus, EventKind};
pub use flashcards::{CardFinder, CardMetadata, CardScheduler, Difficulty, GradeOutcome, MakeCardOutcome};
pub use settings::{Settings, SettingsStorage, SourceMode};
pub use storage::{DocumentRef, DocumentStore, FileVault, MemoryVault};
