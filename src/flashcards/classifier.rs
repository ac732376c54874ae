//! Decides which documents are flashcards
//!
//! Tag mode looks for `#tag` in the text or the tag in the block's `tags:`
//! line. Folder mode looks for the folder as a run of path segments.
//! Both fail closed: an empty tag or folder matches nothing.

use regex::Regex;

use crate::settings::{Settings, SourceMode};
use crate::storage::DocumentRef;

use super::frontmatter::split_block;

/// Active membership rule, derived from [`Settings`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Membership {
    Tag(String),
    Folder(String),
}

impl Membership {
    pub fn from_settings(settings: &Settings) -> Self {
        match settings.source_mode {
            SourceMode::Tag => Self::Tag(settings.normalized_tag()),
            SourceMode::Folder => Self::Folder(settings.normalized_folder()),
        }
    }

    /// Whether classification has to look at the document text
    pub fn needs_content(&self) -> bool {
        matches!(self, Self::Tag(_))
    }

    /// `content` is ignored in folder mode
    pub fn is_card(&self, document: &DocumentRef, content: &str) -> bool {
        match self {
            Self::Tag(tag) => has_tag_in_content(content, tag),
            Self::Folder(folder) => is_path_in_folder(document.path(), folder),
        }
    }
}

/// Convenience wrapper over [`Membership::is_card`]
pub fn is_card(settings: &Settings, document: &DocumentRef, content: &str) -> bool {
    Membership::from_settings(settings).is_card(document, content)
}

/// True if `content` carries `tag` inline (`#tag`) or in the block's `tags:` line.
///
/// Matching is case-insensitive and whole-word: `#flashcardx` is not
/// `flashcard`.
pub fn has_tag_in_content(content: &str, raw_tag: &str) -> bool {
    let tag = raw_tag.trim();
    let tag = tag.strip_prefix('#').unwrap_or(tag);
    if tag.is_empty() {
        return false;
    }

    has_inline_tag(content, tag) || has_block_tag(content, tag)
}

/// True if `content` carries `#tag` as a whole word; `tag` is used as given
pub fn has_inline_tag(content: &str, tag: &str) -> bool {
    let pattern = format!(r"(?i)(?:^|\s)#{}(?:\b|$)", regex::escape(tag));
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(content),
        Err(e) => {
            log::warn!("Cannot build tag pattern for {:?}: {}", tag, e);
            false
        }
    }
}

fn has_block_tag(content: &str, tag: &str) -> bool {
    let Some((block, _)) = split_block(content) else {
        return false;
    };

    // Only the first `tags:` line counts
    let Some(tags_line) = block
        .split('\n')
        .find(|l| l.trim().to_lowercase().starts_with("tags:"))
    else {
        return false;
    };

    let tags = tags_line.split_once(':').map(|(_, v)| v.trim()).unwrap_or("");
    let pattern = format!(r"(?i)\b{}\b", regex::escape(tag));
    Regex::new(&pattern)
        .map(|re| re.is_match(tags))
        .unwrap_or(false)
}

/// True if the segments of `folder` appear as a contiguous run in `path`.
///
/// `Notes/Flashcards/Biology/cell.md` is in `Flashcards` and in
/// `Flashcards/Biology`, not in `Flashcards/Chemistry`.
pub fn is_path_in_folder(path: &str, raw_folder: &str) -> bool {
    let folder = raw_folder.trim().trim_matches('/');
    if folder.is_empty() {
        return false;
    }

    let folder_segments: Vec<&str> = folder.split('/').collect();
    let path_segments: Vec<&str> = path.split('/').collect();

    path_segments
        .windows(folder_segments.len())
        .any(|window| window == folder_segments.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_tag() {
        assert!(has_tag_in_content("#flashcard\nHello", "flashcard"));
        assert!(has_tag_in_content("Some text #flashcard", "flashcard"));
        assert!(has_tag_in_content("line\n\t#flashcard more", "#flashcard"));
    }

    #[test]
    fn test_inline_tag_is_case_insensitive() {
        assert!(has_tag_in_content("#Flashcard", "flashcard"));
        assert!(has_tag_in_content("#flashcard", "FlashCard"));
    }

    #[test]
    fn test_inline_tag_is_whole_word() {
        assert!(!has_tag_in_content("#flashcardx", "flashcard"));
        assert!(!has_tag_in_content("text#flashcard", "flashcard"));
        assert!(!has_tag_in_content("flashcard", "flashcard"));
        assert!(has_tag_in_content("see #flashcard.", "flashcard"));
    }

    #[test]
    fn test_tag_with_regex_characters() {
        assert!(has_tag_in_content("notes #c++", "c++"));
        assert!(!has_tag_in_content("#cxx notes", "c.."));
    }

    #[test]
    fn test_block_tags_line() {
        let content = "---\ntitle: Cells\ntags: [biology, Flashcard]\n---\nBody";
        assert!(has_tag_in_content(content, "flashcard"));

        let content = "---\nTags: biology, flashcard\n---\nBody";
        assert!(has_tag_in_content(content, "flashcard"));

        let content = "---\ntags: [flashcards]\n---\nBody";
        assert!(!has_tag_in_content(content, "flashcard"));
    }

    #[test]
    fn test_block_tags_outside_block_ignored() {
        let content = "Body\ntags: flashcard\n";
        assert!(!has_tag_in_content(content, "flashcard"));
    }

    #[test]
    fn test_empty_tag_never_matches() {
        assert!(!has_tag_in_content("# Heading\n#flashcard", ""));
        assert!(!has_tag_in_content("# Heading", "#"));
    }

    #[test]
    fn test_folder_containment() {
        let path = "Notes/Flashcards/Biology/cell.md";
        assert!(is_path_in_folder(path, "Flashcards"));
        assert!(is_path_in_folder(path, "Flashcards/Biology"));
        assert!(is_path_in_folder(path, "/Notes/"));
        assert!(!is_path_in_folder(path, "Flashcards/Chemistry"));
        assert!(!is_path_in_folder(path, "Flash"));
        assert!(!is_path_in_folder(path, ""));
        assert!(!is_path_in_folder(path, "  /  "));
    }

    #[test]
    fn test_folder_longer_than_path() {
        assert!(!is_path_in_folder("a.md", "Flashcards/Biology"));
    }

    #[test]
    fn test_membership_from_settings() {
        let doc = DocumentRef::new("Study/Cards/a.md");

        let tag = Membership::from_settings(&Settings::tag_mode("#memo"));
        assert_eq!(tag, Membership::Tag("memo".to_string()));
        assert!(tag.needs_content());
        assert!(tag.is_card(&doc, "#memo"));
        assert!(!tag.is_card(&doc, "nothing"));

        let folder = Membership::from_settings(&Settings::folder_mode("/Cards/"));
        assert!(!folder.needs_content());
        assert!(folder.is_card(&doc, ""));
        assert!(!is_card(&Settings::folder_mode(""), &doc, "#flashcard"));
    }
}
