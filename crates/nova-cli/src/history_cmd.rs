//! `nova history`: manage saved chats from the CLI.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Subcommand;
use colored::Colorize;

use nova_core::history::{Chat, ChatStore, ExportFormat};
use nova_core::types::Sender;
use nova_core::utils::truncate_string;

// ─────────────────────────────────────────────
// Subcommand enum
// ─────────────────────────────────────────────

/// History subcommands.
#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List saved chats, newest first
    List {
        /// Only bookmarked chats
        #[arg(long, default_value_t = false)]
        bookmarked: bool,

        /// Only chats in this folder (id)
        #[arg(long)]
        folder: Option<String>,
    },

    /// Print a saved chat
    Show { id: String },

    /// Search titles and messages (case-insensitive)
    Search { query: String },

    /// Delete a saved chat
    Delete { id: String },

    /// Toggle the bookmark on a chat
    Bookmark { id: String },

    /// Export a chat as json, markdown, or txt
    Export {
        id: String,

        #[arg(short, long, default_value = "markdown")]
        format: ExportFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create a folder, or list folders when no name is given
    Folder {
        name: Option<String>,

        #[arg(long, default_value = "#3b82f6")]
        color: String,
    },

    /// Move a chat into a folder; omit the folder to remove it from one
    Move {
        chat_id: String,
        folder_id: Option<String>,
    },
}

// ─────────────────────────────────────────────
// Dispatcher
// ─────────────────────────────────────────────

/// Dispatch a history subcommand.
pub fn dispatch(cmd: HistoryCommands, store: &ChatStore) -> Result<()> {
    match cmd {
        HistoryCommands::List { bookmarked, folder } => {
            let mut chats: Vec<Chat> = store
                .all_chats()
                .into_iter()
                .filter(|c| !bookmarked || c.is_bookmarked)
                .filter(|c| folder.is_none() || c.folder_id == folder)
                .collect();
            chats.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            print_chat_list(&chats);
        }
        HistoryCommands::Show { id } => {
            let chat = store
                .get(&id)
                .with_context(|| format!("no chat with id '{id}'"))?;
            print_chat(&chat);
        }
        HistoryCommands::Search { query } => print_chat_list(&store.search(&query)),
        HistoryCommands::Delete { id } => {
            if !store.delete(&id).context("failed to delete chat")? {
                bail!("no chat with id '{id}'");
            }
            println!("{} Deleted chat {}", "✓".green(), id);
        }
        HistoryCommands::Bookmark { id } => {
            match store.toggle_bookmark(&id).context("failed to update chat")? {
                Some(true) => println!("{} Bookmarked {}", "★".yellow(), id),
                Some(false) => println!("{} Removed bookmark from {}", "☆".dimmed(), id),
                None => bail!("no chat with id '{id}'"),
            }
        }
        HistoryCommands::Export { id, format, output } => {
            let rendered = store
                .export(&id, format)
                .with_context(|| format!("no chat with id '{id}'"))?;
            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("{} Exported to {}", "✓".green(), path.display());
                }
                None => println!("{rendered}"),
            }
        }
        HistoryCommands::Folder { name: Some(name), color } => {
            let folder = store
                .create_folder(&name, &color)
                .context("failed to create folder")?;
            println!("{} Created folder {} ({})", "✓".green(), folder.name.bold(), folder.id);
        }
        HistoryCommands::Folder { name: None, .. } => {
            let folders = store.folders();
            if folders.is_empty() {
                println!("{}", "No folders yet.".dimmed());
            }
            for folder in folders {
                println!("  {:<22} {} {}", folder.id, folder.name.bold(), folder.color.dimmed());
            }
        }
        HistoryCommands::Move { chat_id, folder_id } => {
            if let Some(folder) = folder_id.as_deref() {
                if !store.folders().iter().any(|f| f.id == folder) {
                    bail!("no folder with id '{folder}'");
                }
            }
            if !store
                .move_to_folder(&chat_id, folder_id.as_deref())
                .context("failed to move chat")?
            {
                bail!("no chat with id '{chat_id}'");
            }
            println!("{} Moved {}", "✓".green(), chat_id);
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────

fn print_chat_list(chats: &[Chat]) {
    if chats.is_empty() {
        println!("{}", "No chats found.".dimmed());
        return;
    }
    for chat in chats {
        println!("  {}", list_line(chat));
    }
}

/// One line of `nova history list`: id, bookmark, title, date, size.
fn list_line(chat: &Chat) -> String {
    let star = if chat.is_bookmarked { "★" } else { " " };
    format!(
        "{:<22} {} {:<40} {}  ({} messages)",
        chat.id,
        star,
        truncate_string(&chat.title, 40),
        chat.updated_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        chat.messages.len()
    )
}

fn print_chat(chat: &Chat) {
    println!();
    println!("{}", chat.title.bold());
    println!();
    for message in &chat.messages {
        let who = match message.sender {
            Sender::User => "You".green().bold(),
            Sender::Assistant => "Nova".cyan().bold(),
        };
        let at = message.timestamp.with_timezone(&Local).format("%H:%M");
        println!("{} {}", who, at.to_string().dimmed());
        println!("{}", message.content);
        if message.tool_result.is_some() {
            println!("{}", "📎 attachment".dimmed());
        }
        println!();
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
