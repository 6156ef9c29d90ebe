//! Interactive REPL.
//!
//! Uses `rustyline` for readline-style editing with persistent history.
//! The conversation is kept in memory and saved to the chat store on
//! `/new` and on exit.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use rustyline::config::Configurer;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use tracing::{debug, warn};

use nova_core::history::{Chat, ChatStore};
use nova_core::tools::analyze_path;
use nova_core::types::{HistoryEntry, ToolResult};
use nova_core::utils::expand_home;
use nova_providers::{ChatTransport, DispatchService};

use crate::{helpers, providers_cmd};

/// Exit commands (case-insensitive match).
const EXIT_COMMANDS: &[&str] = &["exit", "quit", "/exit", "/quit", ":q"];

/// One parsed line of REPL input.
#[derive(Debug, PartialEq)]
enum Input {
    Exit,
    Provider { id: String, model: Option<String> },
    Key(String),
    KeyPrompt,
    Attach(PathBuf),
    New,
    Message(String),
    Usage(&'static str),
}

fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    if is_exit_command(trimmed) {
        return Input::Exit;
    }

    let (command, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((c, r)) => (c, r.trim()),
        None => (trimmed, ""),
    };

    match command {
        "/provider" => {
            let mut parts = rest.split_whitespace();
            match parts.next() {
                Some(id) => Input::Provider {
                    id: id.to_string(),
                    model: parts.next().map(str::to_string),
                },
                None => Input::Usage("/provider <id> [model]"),
            }
        }
        "/key" if !rest.is_empty() => Input::Key(rest.to_string()),
        "/key" => Input::KeyPrompt,
        "/attach" if !rest.is_empty() => Input::Attach(expand_home(rest)),
        "/attach" => Input::Usage("/attach <path>"),
        "/new" => Input::New,
        _ => Input::Message(trimmed.to_string()),
    }
}

/// Last `window` entries of the conversation, the slice sent per request.
fn recent(conversation: &[HistoryEntry], window: usize) -> &[HistoryEntry] {
    &conversation[conversation.len().saturating_sub(window)..]
}

/// Run the interactive REPL loop.
pub async fn run<T: ChatTransport>(
    service: &mut DispatchService<T>,
    chats: &ChatStore,
    assistant_name: &str,
    history_window: usize,
    mut attachment: Option<ToolResult>,
) -> Result<()> {
    helpers::print_banner(
        assistant_name,
        service.active_provider().display_name,
        service.active_model(),
    );

    let mut editor = create_editor()?;
    let mut conversation: Vec<HistoryEntry> = Vec::new();

    loop {
        // Read input
        let line = match editor.readline("You: ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted) => {
                // Ctrl-C: exit cleanly
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                // Ctrl-D: exit cleanly
                break;
            }
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let input = parse_input(&line);

        // Secrets stay out of the history file
        if !matches!(input, Input::Key(_)) {
            let _ = editor.add_history_entry(&line);
        }

        match input {
            Input::Exit => {
                println!("\nGoodbye! 👋");
                break;
            }
            Input::Usage(usage) => println!("{}", format!("Usage: {usage}").yellow()),
            Input::Provider { id, model } => {
                if let Err(e) = providers_cmd::use_provider(service, &id, model.as_deref()) {
                    eprintln!("{} {e}", "❌".red());
                }
            }
            Input::Key(secret) => providers_cmd::set_key(service, &secret),
            Input::KeyPrompt => match providers_cmd::prompt_secret() {
                Ok(secret) => providers_cmd::set_key(service, &secret),
                Err(e) => eprintln!("{} {e}", "❌".red()),
            },
            Input::Attach(path) => {
                let result = analyze_path(&path);
                if result.success {
                    println!(
                        "{}",
                        format!("📎 {} will be attached to your next message", path.display())
                            .dimmed()
                    );
                    attachment = Some(result);
                } else {
                    eprintln!(
                        "{} {}",
                        "❌".red(),
                        result.error.as_deref().unwrap_or("could not read file")
                    );
                }
            }
            Input::New => {
                save_conversation(chats, &conversation);
                conversation.clear();
                println!("{}", "Started a new chat.".dimmed());
            }
            Input::Message(text) => {
                let mut entry = HistoryEntry::user(text);
                if let Some(result) = attachment.take() {
                    entry = entry.with_tool_result(result);
                }
                conversation.push(entry);

                debug!(
                    provider = service.active_provider().id,
                    entries = conversation.len(),
                    "processing input"
                );
                helpers::print_thinking();

                match service
                    .generate_response(recent(&conversation, history_window))
                    .await
                {
                    Ok(reply) => {
                        helpers::clear_thinking();
                        helpers::print_response(&reply, assistant_name);
                        conversation.push(HistoryEntry::assistant(reply.text));
                    }
                    Err(e) => {
                        helpers::clear_thinking();
                        helpers::print_error(&e);
                    }
                }
            }
        }
    }

    save_conversation(chats, &conversation);
    save_history(&mut editor);

    Ok(())
}

/// Persist a non-empty conversation as a new saved chat.
fn save_conversation(chats: &ChatStore, conversation: &[HistoryEntry]) {
    if conversation.is_empty() {
        return;
    }
    let chat = Chat::from_entries(conversation);
    match chats.save_chat(&chat) {
        Ok(()) => debug!(chat = %chat.id, "saved conversation"),
        Err(e) => warn!(error = %e, "failed to save conversation"),
    }
}

/// Create a rustyline editor with history.
fn create_editor() -> Result<Editor<(), DefaultHistory>> {
    let mut editor = DefaultEditor::new()?;
    editor.set_max_history_size(1000)?;

    // Load history from ~/.nova/history/cli_history
    let history_path = history_path();
    if history_path.exists() {
        let _ = editor.load_history(&history_path);
        debug!("loaded REPL history from {}", history_path.display());
    }

    Ok(editor)
}

/// Save history to disk.
fn save_history(editor: &mut Editor<(), DefaultHistory>) {
    let path = history_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = editor.save_history(&path) {
        debug!("failed to save history: {e}");
    }
}

/// Path to the history file.
fn history_path() -> PathBuf {
    nova_core::utils::get_data_path().join("history").join("cli_history")
}

/// Check if input is an exit command.
fn is_exit_command(input: &str) -> bool {
    let lower = input.to_lowercase();
    EXIT_COMMANDS.contains(&lower.as_str())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use nova_core::types::Sender;

    #[test]
    fn exit_commands() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("EXIT"));
        assert!(is_exit_command("/quit"));
        assert!(is_exit_command(":q"));
        assert!(!is_exit_command("hello"));
        assert!(!is_exit_command(""));
        assert_eq!(parse_input("  exit "), Input::Exit);
    }

    #[test]
    fn parse_provider_command() {
        assert_eq!(
            parse_input("/provider openai gpt-4o-mini"),
            Input::Provider {
                id: "openai".to_string(),
                model: Some("gpt-4o-mini".to_string()),
            }
        );
        assert_eq!(
            parse_input("/provider groq"),
            Input::Provider {
                id: "groq".to_string(),
                model: None,
            }
        );
        assert!(matches!(parse_input("/provider"), Input::Usage(_)));
    }

    #[test]
    fn parse_key_and_attach() {
        assert_eq!(parse_input("/key  sk-123 "), Input::Key("sk-123".to_string()));
        assert_eq!(parse_input("/key"), Input::KeyPrompt);
        assert_eq!(parse_input("/key   "), Input::KeyPrompt);
        assert_eq!(
            parse_input("/attach /tmp/notes.md"),
            Input::Attach(PathBuf::from("/tmp/notes.md"))
        );
        assert_eq!(parse_input("/new"), Input::New);
    }

    #[test]
    fn plain_text_is_a_message() {
        assert_eq!(
            parse_input("  what's the weather? "),
            Input::Message("what's the weather?".to_string())
        );
        assert_eq!(
            parse_input("/unknown thing"),
            Input::Message("/unknown thing".to_string())
        );
    }

    #[test]
    fn recent_keeps_last_window() {
        let conversation: Vec<HistoryEntry> = (0..15)
            .map(|i| HistoryEntry::user(format!("msg {i}")))
            .collect();

        let window = recent(&conversation, 10);
        assert_eq!(window.len(), 10);
        assert_eq!(window[0].content, "msg 5");
        assert_eq!(recent(&conversation[..3], 10).len(), 3);
    }

    #[test]
    fn save_conversation_skips_empty() {
        let dir = tempfile::tempdir().unwrap();
        let chats = ChatStore::open(Some(&dir.path().join("chats.json")));

        save_conversation(&chats, &[]);
        assert!(chats.all_chats().is_empty());

        save_conversation(
            &chats,
            &[HistoryEntry::user("Hi Nova"), HistoryEntry::assistant("Hello!")],
        );
        let saved = chats.all_chats();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].title, "Hi Nova");
        assert_eq!(saved[0].messages[1].sender, Sender::Assistant);
    }

    #[test]
    fn history_path_under_data_dir() {
        let path = history_path();
        assert!(path.to_string_lossy().contains(".nova"));
        assert!(path.to_string_lossy().contains("cli_history"));
    }
}
