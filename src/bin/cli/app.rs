use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use memmaster_lib::events::EventBus;
use memmaster_lib::flashcards::{CardFinder, CardScheduler};
use memmaster_lib::settings::{Settings, SettingsStorage};
use memmaster_lib::storage::{DocumentRef, FileVault};

/// Shared application state for CLI commands
pub struct App {
    pub vault: FileVault,
    pub settings_storage: SettingsStorage,
    pub settings: Settings,
    pub events: EventBus,
}

impl App {
    pub fn new(vault_path: Option<PathBuf>, config_dir: Option<PathBuf>) -> Result<Self> {
        let vault_path = match vault_path {
            Some(path) => path,
            None => std::env::current_dir().context("Failed to get current directory")?,
        };
        let vault = FileVault::open(vault_path.clone())
            .with_context(|| format!("Cannot open vault at {}", vault_path.display()))?;

        let config_dir = match config_dir {
            Some(dir) => dir,
            None => SettingsStorage::default_config_dir().context("Failed to get config directory")?,
        };

        let events = EventBus::default();
        let settings_storage = SettingsStorage::new(config_dir).with_events(events.clone());
        let settings = settings_storage.load().context("Failed to load settings")?;

        Ok(Self {
            vault,
            settings_storage,
            settings,
            events,
        })
    }

    pub fn finder(&self) -> CardFinder<'_, FileVault> {
        CardFinder::new(&self.vault, &self.settings)
    }

    pub fn scheduler(&self) -> CardScheduler<'_, FileVault> {
        CardScheduler::new(&self.vault, &self.settings, &self.events)
    }

    /// Accept a vault-relative path or a path inside the vault on disk
    pub fn resolve_document(&self, path: &str) -> Result<DocumentRef> {
        let as_path = Path::new(path);
        let relative = if as_path.is_absolute() {
            let root = self.vault.root().canonicalize().unwrap_or_else(|_| self.vault.root().to_path_buf());
            let absolute = as_path.canonicalize().unwrap_or_else(|_| as_path.to_path_buf());
            match absolute.strip_prefix(&root) {
                Ok(rel) => rel.to_path_buf(),
                Err(_) => bail!("{} is outside the vault {}", path, self.vault.root().display()),
            }
        } else {
            as_path.to_path_buf()
        };

        let joined = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        Ok(DocumentRef::new(joined))
    }
}
