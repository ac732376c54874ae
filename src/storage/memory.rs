//! In-memory document store
//!
//! Keeps documents in insertion order, which makes scan order observable.
//! Individual operations can be made to fail so hosts and tests can check
//! how the engine behaves when the collaborator misbehaves.

use std::collections::{BTreeSet, HashSet};
use std::io;
use std::sync::{Mutex, MutexGuard};

use super::file_storage::{DocumentStore, Result, StorageError};
use super::models::DocumentRef;

#[derive(Default)]
struct VaultState {
    documents: Vec<(DocumentRef, String)>,
    folders: BTreeSet<String>,
    failing_reads: HashSet<DocumentRef>,
    failing_writes: HashSet<DocumentRef>,
    fail_folder_creation: bool,
    fail_moves: bool,
}

#[derive(Default)]
pub struct MemoryVault {
    state: Mutex<VaultState>,
}

fn injected(what: &str) -> StorageError {
    StorageError::Io(io::Error::new(io::ErrorKind::Other, format!("injected {} failure", what)))
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, VaultState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Builder-style insert
    pub fn with_document(self, path: &str, content: &str) -> Self {
        self.insert(path, content);
        self
    }

    /// Insert or replace a document
    pub fn insert(&self, path: &str, content: &str) {
        let document = DocumentRef::new(path);
        let mut state = self.state();
        match state.documents.iter().position(|(d, _)| *d == document) {
            Some(idx) => state.documents[idx].1 = content.to_string(),
            None => state.documents.push((document, content.to_string())),
        }
    }

    pub fn content(&self, path: &str) -> Option<String> {
        let document = DocumentRef::new(path);
        self.state()
            .documents
            .iter()
            .find(|(d, _)| *d == document)
            .map(|(_, c)| c.clone())
    }

    pub fn paths(&self) -> Vec<String> {
        self.state()
            .documents
            .iter()
            .map(|(d, _)| d.path().to_string())
            .collect()
    }

    pub fn fail_reads_of(&self, path: &str) {
        self.state().failing_reads.insert(DocumentRef::new(path));
    }

    pub fn fail_writes_of(&self, path: &str) {
        self.state().failing_writes.insert(DocumentRef::new(path));
    }

    pub fn fail_folder_creation(&self) {
        self.state().fail_folder_creation = true;
    }

    pub fn fail_moves(&self) {
        self.state().fail_moves = true;
    }
}

impl DocumentStore for MemoryVault {
    fn list_documents(&self) -> Result<Vec<DocumentRef>> {
        Ok(self.state().documents.iter().map(|(d, _)| d.clone()).collect())
    }

    fn read_document(&self, document: &DocumentRef) -> Result<String> {
        let state = self.state();
        if state.failing_reads.contains(document) {
            return Err(injected("read"));
        }
        state
            .documents
            .iter()
            .find(|(d, _)| d == document)
            .map(|(_, c)| c.clone())
            .ok_or_else(|| StorageError::DocumentNotFound(document.to_string()))
    }

    fn write_document(&self, document: &DocumentRef, content: &str) -> Result<()> {
        let mut state = self.state();
        if state.failing_writes.contains(document) {
            return Err(injected("write"));
        }
        match state.documents.iter().position(|(d, _)| d == document) {
            Some(idx) => state.documents[idx].1 = content.to_string(),
            None => state.documents.push((document.clone(), content.to_string())),
        }
        Ok(())
    }

    fn folder_exists(&self, folder: &str) -> bool {
        let folder = folder.trim_matches('/');
        if folder.is_empty() {
            return true;
        }
        let state = self.state();
        let prefix = format!("{}/", folder);
        state.folders.contains(folder)
            || state.folders.iter().any(|f| f.starts_with(&prefix))
            || state.documents.iter().any(|(d, _)| d.path().starts_with(&prefix))
    }

    fn create_folder(&self, folder: &str) -> Result<()> {
        let mut state = self.state();
        if state.fail_folder_creation {
            return Err(injected("folder creation"));
        }
        state.folders.insert(folder.trim_matches('/').to_string());
        Ok(())
    }

    fn move_document(&self, document: &DocumentRef, new_path: &str) -> Result<DocumentRef> {
        let target = DocumentRef::new(new_path);
        let mut state = self.state();
        if state.fail_moves {
            return Err(injected("move"));
        }
        if state.documents.iter().any(|(d, _)| *d == target) {
            return Err(StorageError::AlreadyExists(target.to_string()));
        }
        let entry = state
            .documents
            .iter_mut()
            .find(|(d, _)| d == document)
            .ok_or_else(|| StorageError::DocumentNotFound(document.to_string()))?;
        entry.0 = target.clone();
        Ok(target)
    }
}
