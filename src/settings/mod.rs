//! User-editable configuration for the flashcard engine

mod models;
mod storage;

pub use models::*;
pub use storage::{SettingsError, SettingsStorage};
