use serde::{Deserialize, Serialize};

pub const DEFAULT_TAG_NAME: &str = "flashcard";
pub const DEFAULT_FOLDER_NAME: &str = "Flashcards";

/// How documents are recognised as flashcards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Documents carrying the configured tag
    #[default]
    Tag,
    /// Documents stored under the configured folder
    Folder,
}

impl std::str::FromStr for SourceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tag" => Ok(Self::Tag),
            "folder" => Ok(Self::Folder),
            other => Err(format!("Unknown source mode: {}", other)),
        }
    }
}

/// Engine configuration, persisted as camelCase JSON.
///
/// Fields missing from a stored file take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub source_mode: SourceMode,
    #[serde(default = "default_tag_name")]
    pub tag_name: String,
    #[serde(default = "default_folder_name")]
    pub folder_name: String,
    /// Presentation hint: blur card text in the review list
    #[serde(default = "default_true")]
    pub is_blur_flashcard_text: bool,
    /// Presentation hint: open cards in preview mode
    #[serde(default = "default_true")]
    pub open_in_preview_mode: bool,
}

fn default_tag_name() -> String {
    DEFAULT_TAG_NAME.to_string()
}

fn default_folder_name() -> String {
    DEFAULT_FOLDER_NAME.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_mode: SourceMode::Tag,
            tag_name: default_tag_name(),
            folder_name: default_folder_name(),
            is_blur_flashcard_text: true,
            open_in_preview_mode: true,
        }
    }
}

impl Settings {
    pub fn tag_mode(tag_name: &str) -> Self {
        Self {
            source_mode: SourceMode::Tag,
            tag_name: tag_name.to_string(),
            ..Self::default()
        }
    }

    pub fn folder_mode(folder_name: &str) -> Self {
        Self {
            source_mode: SourceMode::Folder,
            folder_name: folder_name.to_string(),
            ..Self::default()
        }
    }

    /// Tag name without surrounding whitespace or a leading `#`
    pub fn normalized_tag(&self) -> String {
        normalize_tag(&self.tag_name)
    }

    /// Folder path without surrounding whitespace or slashes
    pub fn normalized_folder(&self) -> String {
        normalize_folder(&self.folder_name)
    }
}

pub fn normalize_tag(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed.strip_prefix('#').unwrap_or(trimmed).to_string()
}

pub fn normalize_folder(raw: &str) -> String {
    raw.trim().trim_matches('/').to_string()
}
