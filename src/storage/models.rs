use std::fmt;

use serde::{Deserialize, Serialize};

/// Vault-relative path of a document, always `/`-separated
/// (e.g. `Notes/Flashcards/cell.md`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentRef(String);

impl DocumentRef {
    pub fn new(path: impl Into<String>) -> Self {
        let path: String = path.into();
        Self(path.replace('\\', "/").trim_start_matches('/').to_string())
    }

    pub fn path(&self) -> &str {
        &self.0
    }

    /// Last path segment, including the extension
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// File name without its extension
    pub fn stem(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(idx) if idx > 0 => &name[..idx],
            _ => name,
        }
    }

    /// Reference to the same file name inside `folder`
    pub fn moved_to(&self, folder: &str) -> Self {
        let folder = folder.trim_matches('/');
        if folder.is_empty() {
            Self::new(self.file_name())
        } else {
            Self::new(format!("{}/{}", folder, self.file_name()))
        }
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentRef {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for DocumentRef {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_parts() {
        let doc = DocumentRef::new("Notes/Biology/cell.md");
        assert_eq!(doc.file_name(), "cell.md");
        assert_eq!(doc.stem(), "cell");
        assert_eq!(doc.path(), "Notes/Biology/cell.md");
    }

    #[test]
    fn test_backslashes_normalized() {
        assert_eq!(DocumentRef::new("Notes\\Biology\\cell.md").path(), "Notes/Biology/cell.md");
    }

    #[test]
    fn test_root_document() {
        let doc = DocumentRef::new("/a.md");
        assert_eq!(doc.path(), "a.md");
        assert_eq!(doc.file_name(), "a.md");
        assert_eq!(doc.stem(), "a");
    }

    #[test]
    fn test_moved_to() {
        let doc = DocumentRef::new("Notes/a.md");
        assert_eq!(doc.moved_to("/Flashcards/").path(), "Flashcards/a.md");
        assert_eq!(doc.moved_to("").path(), "a.md");
    }

    #[test]
    fn test_dotfile_stem() {
        assert_eq!(DocumentRef::new(".hidden").stem(), ".hidden");
    }
}
