use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{debug, error, info};

use super::models::{ChatsList, SettingsDocument};
use crate::errors::{ChatcasterError, Result};

/// JSON-file backed store of chat lists keyed by phone number
///
/// The whole document stays in memory; every mutation rewrites the file
/// while the write lock is held.
pub struct ChatListStore {
    file_path: PathBuf,
    document: RwLock<SettingsDocument>,
}

impl ChatListStore {
    /// Load the settings file, creating an empty one if it does not exist
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self> {
        let file_path = file_path.into();
        let document = Self::load_from_file(&file_path)?;

        info!(
            "Chat lists loaded from {} ({} accounts)",
            file_path.display(),
            document.chats_lists.len()
        );

        Ok(Self {
            file_path,
            document: RwLock::new(document),
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(file_path: &Path) -> Result<SettingsDocument> {
        match fs::read_to_string(file_path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                error!("Failed to parse settings file: {}", e);
                ChatcasterError::serialization(format!(
                    "Failed to parse settings file {}: {}",
                    file_path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Settings file not found, creating empty storage");
                let document = SettingsDocument::default();
                Self::write_document(file_path, &document).map_err(|e| {
                    error!("Failed to create settings file: {}", e);
                    e
                })?;
                info!("Created empty settings file: {}", file_path.display());
                Ok(document)
            }
            Err(e) => Err(ChatcasterError::file_operation(format!(
                "Failed to read settings file {}: {}",
                file_path.display(),
                e
            ))),
        }
    }

    /// Write to a sibling temp file then rename over the target
    fn write_document(file_path: &Path, document: &SettingsDocument) -> Result<()> {
        if let Some(parent) = file_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(document)?;
        let tmp_path = file_path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, file_path)?;
        Ok(())
    }

    /// Lists saved for `phone_number`, in creation order
    pub fn get_chats_lists(&self, phone_number: &str) -> Vec<ChatsList> {
        self.document
            .read()
            .chats_lists
            .get(phone_number)
            .cloned()
            .unwrap_or_default()
    }

    /// Append a list for `phone_number` and persist
    pub fn append_chats_list(&self, phone_number: &str, chats_list: ChatsList) -> Result<()> {
        let mut document = self.document.write();
        document
            .chats_lists
            .entry(phone_number.to_string())
            .or_default()
            .push(chats_list);

        if let Err(e) = Self::write_document(&self.file_path, &document) {
            // keep memory and file in agreement
            if let Some(lists) = document.chats_lists.get_mut(phone_number) {
                lists.pop();
                if lists.is_empty() {
                    document.chats_lists.remove(phone_number);
                }
            }
            error!("Failed to persist chat lists: {}", e);
            return Err(e);
        }

        debug!("Persisted chat lists to {}", self.file_path.display());
        Ok(())
    }

    pub fn all(&self) -> BTreeMap<String, Vec<ChatsList>> {
        self.document.read().chats_lists.clone()
    }

    /// Rewrite the settings file from memory
    pub fn persist(&self) -> Result<()> {
        let document = self.document.read();
        Self::write_document(&self.file_path, &document)
    }
}
