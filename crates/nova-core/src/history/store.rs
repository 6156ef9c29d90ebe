//! Chat persistence and caching.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::export::{self, ExportFormat};
use super::{new_id, Chat, ChatFolder};
use crate::store::StoreError;
use crate::utils;

/// On-disk layout of `chats.json`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct ChatFile {
    chats: Vec<Chat>,
    folders: Vec<ChatFolder>,
}

// ─────────────────────────────────────────────
// ChatStore
// ─────────────────────────────────────────────

/// Saved chats and folders with in-memory caching and JSON persistence.
///
/// Thread-safe via `RwLock`: multiple readers, exclusive writer.
pub struct ChatStore {
    path: PathBuf,
    data: RwLock<ChatFile>,
}

impl ChatStore {
    /// Open the chat store.
    ///
    /// `path` defaults to `~/.nova/chats.json` if `None`. A missing or
    /// unreadable file yields an empty store.
    pub fn open(path: Option<&Path>) -> Self {
        let path = path
            .map(PathBuf::from)
            .unwrap_or_else(utils::get_chats_path);
        let data = load_file(&path);

        ChatStore {
            path,
            data: RwLock::new(data),
        }
    }

    /// Insert or replace a chat. A replaced chat gets a fresh `updated_at`.
    pub fn save_chat(&self, chat: &Chat) -> Result<(), StoreError> {
        self.mutate(|data| {
            match data.chats.iter_mut().find(|c| c.id == chat.id) {
                Some(existing) => {
                    *existing = chat.clone();
                    existing.updated_at = Utc::now();
                }
                None => data.chats.push(chat.clone()),
            }
            true
        })
    }

    /// All saved chats, in insertion order.
    pub fn all_chats(&self) -> Vec<Chat> {
        self.read().chats.clone()
    }

    /// Look up a chat by id.
    pub fn get(&self, id: &str) -> Option<Chat> {
        self.read().chats.iter().find(|c| c.id == id).cloned()
    }

    /// Delete a chat. Returns `true` if it existed.
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut removed = false;
        self.mutate(|data| {
            let before = data.chats.len();
            data.chats.retain(|c| c.id != id);
            removed = data.chats.len() != before;
            removed
        })?;
        Ok(removed)
    }

    /// Chats whose title or any message contains `query` (case-insensitive).
    pub fn search(&self, query: &str) -> Vec<Chat> {
        let needle = query.to_lowercase();
        self.read()
            .chats
            .iter()
            .filter(|c| c.matches(&needle))
            .cloned()
            .collect()
    }

    /// Flip the bookmark flag. Returns the new state, or `None` for an
    /// unknown chat.
    pub fn toggle_bookmark(&self, id: &str) -> Result<Option<bool>, StoreError> {
        let mut state = None;
        self.mutate(|data| match data.chats.iter_mut().find(|c| c.id == id) {
            Some(chat) => {
                chat.is_bookmarked = !chat.is_bookmarked;
                chat.updated_at = Utc::now();
                state = Some(chat.is_bookmarked);
                true
            }
            None => false,
        })?;
        Ok(state)
    }

    /// Create a folder.
    pub fn create_folder(&self, name: &str, color: &str) -> Result<ChatFolder, StoreError> {
        let folder = ChatFolder {
            id: new_id(),
            name: name.to_string(),
            color: color.to_string(),
            created_at: Utc::now(),
        };
        let saved = folder.clone();
        self.mutate(move |data| {
            data.folders.push(saved);
            true
        })?;
        Ok(folder)
    }

    /// All folders, in creation order.
    pub fn folders(&self) -> Vec<ChatFolder> {
        self.read().folders.clone()
    }

    /// Move a chat into a folder, or out of any folder with `None`.
    ///
    /// Returns `false` if the chat does not exist.
    pub fn move_to_folder(&self, chat_id: &str, folder_id: Option<&str>) -> Result<bool, StoreError> {
        let mut moved = false;
        self.mutate(|data| match data.chats.iter_mut().find(|c| c.id == chat_id) {
            Some(chat) => {
                chat.folder_id = folder_id.map(String::from);
                chat.updated_at = Utc::now();
                moved = true;
                true
            }
            None => false,
        })?;
        Ok(moved)
    }

    /// Render a chat in the given format, or `None` for an unknown chat.
    pub fn export(&self, id: &str, format: ExportFormat) -> Option<String> {
        self.get(id).map(|chat| export::render(&chat, format))
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, ChatFile> {
        self.data.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Apply `f` under the write lock; persist if it reports a change.
    fn mutate(&self, f: impl FnOnce(&mut ChatFile) -> bool) -> Result<(), StoreError> {
        let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
        if f(&mut data) {
            self.save_to_disk(&data)?;
        }
        Ok(())
    }

    fn save_to_disk(&self, data: &ChatFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(data)?;
        std::fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(chats = data.chats.len(), "Chats saved to {}", self.path.display());
        Ok(())
    }
}

fn load_file(path: &Path) -> ChatFile {
    if !path.exists() {
        return ChatFile::default();
    }
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read chats file {}: {}", path.display(), e);
            return ChatFile::default();
        }
    };
    match serde_json::from_str(&content) {
        Ok(data) => data,
        Err(e) => {
            warn!("Failed to parse chats file {}: {}", path.display(), e);
            ChatFile::default()
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
