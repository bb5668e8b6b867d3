//! Write-through exemption store.

use crate::codec::{ExemptionMap, decode, encode};
use linkguard_core::{ChatId, UserId};
use linkguard_error::{LinkguardResult, StorageError, StorageErrorKind};
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument, warn};

/// Per-chat exemption list backed by a JSON file.
///
/// Reads are served from memory. Every change is applied in memory first and
/// then the whole list is written to disk. A failed write is logged and the
/// in-memory change stands, so the running process keeps honouring it even if
/// a restart would lose it.
///
/// The owner is exempt in every chat without being stored. Adding the owner is
/// a no-op, and an owner id found in the file is dropped on load.
pub struct ExemptionStore {
    owner: UserId,
    path: PathBuf,
    entries: RwLock<ExemptionMap>,
    // Serializes file writes so the last write always carries the latest state.
    write_lock: tokio::sync::Mutex<()>,
}

impl ExemptionStore {
    /// Load the store from `path`, falling back to an empty store.
    ///
    /// A missing file is the normal first-run case and is not logged above
    /// debug. Unreadable or corrupt files are logged as errors and the store
    /// starts empty; exemptions must then be granted again.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), owner = %owner))]
    pub async fn open(path: impl AsRef<Path>, owner: UserId) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match Self::load(&path).await {
            Ok(entries) => {
                info!(chats = entries.len(), "Loaded exemption store");
                entries
            }
            Err(e) if matches!(e.kind, StorageErrorKind::NotFound(_)) => {
                debug!("No exemption file yet, starting empty");
                ExemptionMap::new()
            }
            Err(e) => {
                error!(error = %e, "Failed to load exemption file, starting empty");
                ExemptionMap::new()
            }
        };
        Self::with_entries(path, owner, entries)
    }

    /// Build a store from already-loaded entries without touching the disk.
    pub fn with_entries(
        path: impl Into<PathBuf>,
        owner: UserId,
        mut entries: ExemptionMap,
    ) -> Self {
        for users in entries.values_mut() {
            users.remove(&owner);
        }
        entries.retain(|_, users| !users.is_empty());
        Self {
            owner,
            path: path.into(),
            entries: RwLock::new(entries),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Read and decode the file at `path`.
    ///
    /// # Errors
    ///
    /// `NotFound` when the file does not exist, `FileRead` for other I/O
    /// failures and `Corrupt` when the contents do not decode.
    pub async fn load(path: &Path) -> Result<ExemptionMap, StorageError> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            let detail = format!("{}: {}", path.display(), e);
            if e.kind() == ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(detail))
            } else {
                StorageError::new(StorageErrorKind::FileRead(detail))
            }
        })?;
        decode(&contents)
    }

    /// The implicitly exempt owner.
    pub fn owner(&self) -> UserId {
        self.owner
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `user` is exempt in `chat`. Always true for the owner.
    pub fn is_exempt(&self, chat: ChatId, user: UserId) -> bool {
        if user == self.owner {
            return true;
        }
        self.entries
            .read()
            .get(&chat)
            .is_some_and(|users| users.contains(&user))
    }

    /// Exempt `user` in `chat`.
    ///
    /// Returns whether the list changed. The owner is never stored, so adding
    /// the owner returns false.
    #[instrument(skip_all, fields(chat = %chat, user = %user))]
    pub async fn add(&self, chat: ChatId, user: UserId) -> bool {
        if user == self.owner {
            debug!("Owner is implicitly exempt, not storing");
            return false;
        }
        let inserted = self.entries.write().entry(chat).or_default().insert(user);
        if inserted {
            info!("Exemption added");
            self.persist_or_log().await;
        }
        inserted
    }

    /// Revoke the exemption of `user` in `chat`.
    ///
    /// Returns whether the list changed.
    #[instrument(skip_all, fields(chat = %chat, user = %user))]
    pub async fn remove(&self, chat: ChatId, user: UserId) -> bool {
        let removed = {
            let mut entries = self.entries.write();
            let removed = entries
                .get_mut(&chat)
                .is_some_and(|users| users.remove(&user));
            if entries.get(&chat).is_some_and(|users| users.is_empty()) {
                entries.remove(&chat);
            }
            removed
        };
        if removed {
            info!("Exemption removed");
            self.persist_or_log().await;
        }
        removed
    }

    /// Users explicitly exempted in `chat` (the owner is not listed).
    pub fn list(&self, chat: ChatId) -> BTreeSet<UserId> {
        self.entries.read().get(&chat).cloned().unwrap_or_default()
    }

    /// Chats with at least one exemption.
    pub fn chats(&self) -> Vec<ChatId> {
        let mut chats: Vec<_> = self.entries.read().keys().copied().collect();
        chats.sort();
        chats
    }

    /// Write the whole list to disk.
    ///
    /// The file is written to a sibling temp file and renamed into place.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the directory cannot be created or the file
    /// cannot be written.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub async fn persist(&self) -> LinkguardResult<()> {
        let _guard = self.write_lock.lock().await;
        let contents = encode(&self.entries.read())?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, contents.as_bytes())
            .await
            .map_err(|e| {
                StorageError::new(StorageErrorKind::FileWrite(format!(
                    "{}: {}",
                    temp.display(),
                    e
                )))
            })?;
        tokio::fs::rename(&temp, &self.path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                self.path.display(),
                e
            )))
        })?;

        debug!(bytes = contents.len(), "Persisted exemption store");
        Ok(())
    }

    async fn persist_or_log(&self) {
        if let Err(e) = self.persist().await {
            warn!(error = %e, "Exemption change kept in memory but not persisted");
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "exemptions".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl std::fmt::Debug for ExemptionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExemptionStore")
            .field("owner", &self.owner)
            .field("path", &self.path)
            .field("chats", &self.entries.read().len())
            .finish()
    }
}
