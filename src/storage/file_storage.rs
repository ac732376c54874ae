use std::fs;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use super::models::DocumentRef;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Document already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Vault root is not a directory: {0}")]
    VaultNotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Host collaborator the flashcard engine reads and writes documents through.
///
/// Folder paths are vault-relative and `/`-separated, like [`DocumentRef`].
pub trait DocumentStore {
    /// Every document in the collection. Order is not significant.
    fn list_documents(&self) -> Result<Vec<DocumentRef>>;

    fn read_document(&self, document: &DocumentRef) -> Result<String>;

    /// Replace the document content. A later read never observes a
    /// partially written document.
    fn write_document(&self, document: &DocumentRef, content: &str) -> Result<()>;

    fn folder_exists(&self, folder: &str) -> bool;

    fn create_folder(&self, folder: &str) -> Result<()>;

    /// Move the document to `new_path`, returning its new reference.
    fn move_document(&self, document: &DocumentRef, new_path: &str) -> Result<DocumentRef>;
}

/// Document store over a directory of markdown notes
pub struct FileVault {
    root: PathBuf,
}

impl FileVault {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Open an existing vault directory
    pub fn open(root: PathBuf) -> Result<Self> {
        if !root.is_dir() {
            return Err(StorageError::VaultNotFound(root));
        }
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a vault-relative path, refusing anything that escapes the root
    fn resolve(&self, relative: &str) -> Result<PathBuf> {
        let relative = relative.trim_matches('/');
        let candidate = Path::new(relative);
        let escapes = candidate
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(StorageError::InvalidPath(relative.to_string()));
        }
        Ok(self.root.join(candidate))
    }

    fn is_markdown(path: &Path) -> bool {
        let extension = path.extension().map(|e| e.to_string_lossy().to_lowercase());
        matches!(extension.as_deref(), Some("md") | Some("markdown"))
    }
}

impl DocumentStore for FileVault {
    fn list_documents(&self) -> Result<Vec<DocumentRef>> {
        if !self.root.is_dir() {
            return Err(StorageError::VaultNotFound(self.root.clone()));
        }

        let mut documents = Vec::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            // Skip hidden entries such as .obsidian or .git
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable vault entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !Self::is_markdown(path) {
                continue;
            }

            let relative = path.strip_prefix(&self.root).unwrap_or(path);
            let joined = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            documents.push(DocumentRef::new(joined));
        }

        log::debug!("Found {} documents in {:?}", documents.len(), self.root);
        Ok(documents)
    }

    fn read_document(&self, document: &DocumentRef) -> Result<String> {
        let path = self.resolve(document.path())?;
        if !path.is_file() {
            return Err(StorageError::DocumentNotFound(document.to_string()));
        }
        Ok(fs::read_to_string(path)?)
    }

    fn write_document(&self, document: &DocumentRef, content: &str) -> Result<()> {
        let path = self.resolve(document.path())?;

        // Atomic write: write to .tmp next to the document, then rename
        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);

        fs::write(&tmp_path, content)?;
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }

    fn folder_exists(&self, folder: &str) -> bool {
        self.resolve(folder).map(|p| p.is_dir()).unwrap_or(false)
    }

    fn create_folder(&self, folder: &str) -> Result<()> {
        let path = self.resolve(folder)?;
        fs::create_dir_all(&path)?;
        log::info!("Created folder {:?}", path);
        Ok(())
    }

    fn move_document(&self, document: &DocumentRef, new_path: &str) -> Result<DocumentRef> {
        let from = self.resolve(document.path())?;
        let to = self.resolve(new_path)?;

        if !from.is_file() {
            return Err(StorageError::DocumentNotFound(document.to_string()));
        }
        if to.exists() {
            return Err(StorageError::AlreadyExists(new_path.to_string()));
        }

        fs::rename(&from, &to)?;
        log::info!("Moved {} to {}", document, new_path);
        Ok(DocumentRef::new(new_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_vault() -> (FileVault, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let vault = FileVault::new(temp_dir.path().to_path_buf());
        (vault, temp_dir)
    }

    fn write(temp: &TempDir, relative: &str, content: &str) {
        let path = temp.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_list_documents_skips_hidden_and_non_markdown() {
        let (vault, temp) = create_test_vault();
        write(&temp, "a.md", "A");
        write(&temp, "Notes/b.markdown", "B");
        write(&temp, "Notes/image.png", "");
        write(&temp, ".obsidian/workspace.md", "");
        write(&temp, "Notes/.draft.md", "");

        let docs = vault.list_documents().unwrap();
        let paths: Vec<&str> = docs.iter().map(|d| d.path()).collect();
        assert_eq!(paths, vec!["Notes/b.markdown", "a.md"]);
    }

    #[test]
    fn test_read_write_roundtrip() {
        let (vault, temp) = create_test_vault();
        write(&temp, "Notes/a.md", "old");

        let doc = DocumentRef::new("Notes/a.md");
        vault.write_document(&doc, "new content").unwrap();
        assert_eq!(vault.read_document(&doc).unwrap(), "new content");
        assert!(!temp.path().join("Notes/a.md.tmp").exists());
    }

    #[test]
    fn test_read_missing_document() {
        let (vault, _temp) = create_test_vault();
        let result = vault.read_document(&DocumentRef::new("missing.md"));
        assert!(matches!(result, Err(StorageError::DocumentNotFound(_))));
    }

    #[test]
    fn test_rejects_paths_outside_vault() {
        let (vault, _temp) = create_test_vault();
        let result = vault.read_document(&DocumentRef::new("../secret.md"));
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));
        assert!(!vault.folder_exists(".."));
    }

    #[test]
    fn test_create_folder_and_move() {
        let (vault, temp) = create_test_vault();
        write(&temp, "Notes/a.md", "hello");

        assert!(!vault.folder_exists("Flashcards"));
        vault.create_folder("Flashcards").unwrap();
        assert!(vault.folder_exists("Flashcards"));

        let moved = vault
            .move_document(&DocumentRef::new("Notes/a.md"), "Flashcards/a.md")
            .unwrap();
        assert_eq!(moved.path(), "Flashcards/a.md");
        assert_eq!(vault.read_document(&moved).unwrap(), "hello");
        assert!(!temp.path().join("Notes/a.md").exists());
    }

    #[test]
    fn test_move_refuses_to_overwrite() {
        let (vault, temp) = create_test_vault();
        write(&temp, "Notes/a.md", "one");
        write(&temp, "Flashcards/a.md", "two");

        let result = vault.move_document(&DocumentRef::new("Notes/a.md"), "Flashcards/a.md");
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
        assert_eq!(fs::read_to_string(temp.path().join("Flashcards/a.md")).unwrap(), "two");
    }

    #[test]
    fn test_open_requires_directory() {
        let temp = TempDir::new().unwrap();
        assert!(FileVault::open(temp.path().join("nope")).is_err());
        assert!(FileVault::open(temp.path().to_path_buf()).is_ok());
    }
}
