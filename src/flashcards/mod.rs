//! Flashcard scheduling for notes in a vault
//!
//! This module provides:
//! - Metadata block codec (schedule stored in the note itself)
//! - Tag and folder classification
//! - Three-bucket geometric interval algorithm
//! - Grading and card creation
//! - Due-card discovery and the review list projection

pub mod algorithm;
pub mod classifier;
pub mod finder;
pub mod frontmatter;
pub mod models;
pub mod review_list;
pub mod scheduler;

pub use algorithm::Difficulty;
pub use classifier::Membership;
pub use finder::CardFinder;
pub use frontmatter::{CardSchedule, Frontmatter};
pub use models::*;
pub use review_list::{ReviewItem, SortOrder};
pub use scheduler::{CardScheduler, Clock};
