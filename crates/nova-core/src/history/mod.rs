//! Saved chats: in-memory cache + JSON file persistence.
//!
//! # Disk format
//!
//! A single `~/.nova/chats.json` file:
//! `{"chats": [...], "folders": [...]}` with camelCase keys and RFC 3339
//! timestamps.

pub mod export;
pub mod store;

pub use export::ExportFormat;
pub use store::ChatStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{HistoryEntry, Sender, ToolResult};
use crate::utils::truncate_string;

/// Maximum length of a title derived from the first user message.
const TITLE_MAX_CHARS: usize = 40;

/// Random identifier for chats, messages, and folders.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// One message inside a saved chat.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_result: Option<ToolResult>,
}

/// A saved conversation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub is_bookmarked: bool,
}

impl Chat {
    /// Create an empty chat.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Chat {
            id: new_id(),
            title: title.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
            folder_id: None,
            is_bookmarked: false,
        }
    }

    /// Build a chat from conversation entries, titled after the first user
    /// message.
    pub fn from_entries(entries: &[HistoryEntry]) -> Self {
        let title = entries
            .iter()
            .find(|e| e.sender == Sender::User)
            .map(|e| truncate_string(e.content.trim(), TITLE_MAX_CHARS))
            .unwrap_or_else(|| "New chat".to_string());

        let mut chat = Chat::new(title);
        for entry in entries {
            chat.push(entry.clone());
        }
        chat
    }

    /// Append an entry as a timestamped message.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.messages.push(ChatMessage {
            id: new_id(),
            content: entry.content,
            sender: entry.sender,
            timestamp: Utc::now(),
            tool_result: entry.tool_result,
        });
    }

    /// The chat as history entries, ready for the dispatch service.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.messages
            .iter()
            .map(|m| HistoryEntry {
                content: m.content.clone(),
                sender: m.sender,
                tool_result: m.tool_result.clone(),
            })
            .collect()
    }

    fn matches(&self, query_lower: &str) -> bool {
        self.title.to_lowercase().contains(query_lower)
            || self
                .messages
                .iter()
                .any(|m| m.content.to_lowercase().contains(query_lower))
    }
}

/// A named, colored group of chats.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatFolder {
    pub id: String,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}
