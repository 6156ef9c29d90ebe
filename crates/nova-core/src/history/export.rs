//! Chat export: JSON, Markdown, and plain text renderings.

use std::str::FromStr;

use chrono::{DateTime, Local, Utc};

use super::Chat;
use crate::types::Sender;

/// Supported export formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Markdown,
    Txt,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "txt" | "text" => Ok(ExportFormat::Txt),
            other => Err(format!("unknown export format '{other}' (json, markdown, txt)")),
        }
    }
}

/// Render a chat in `format`.
pub fn render(chat: &Chat, format: ExportFormat) -> String {
    match format {
        ExportFormat::Json => serde_json::to_string_pretty(chat).unwrap_or_default(),
        ExportFormat::Markdown => to_markdown(chat),
        ExportFormat::Txt => to_text(chat),
    }
}

fn sender_label(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "You",
        Sender::Assistant => "Nova",
    }
}

fn local_time(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

fn to_markdown(chat: &Chat) -> String {
    let mut md = format!("# {}\n\n", chat.title);
    md.push_str(&format!("**Created:** {}\n\n", local_time(&chat.created_at)));

    for msg in &chat.messages {
        md.push_str(&format!("## {}\n", sender_label(msg.sender)));
        md.push_str(&format!("*{}*\n\n", local_time(&msg.timestamp)));
        md.push_str(&format!("{}\n\n", msg.content));
        if let Some(result) = &msg.tool_result {
            let name = result
                .data
                .as_ref()
                .and_then(|d| d.get("name"))
                .and_then(|n| n.as_str())
                .unwrap_or("tool result");
            md.push_str(&format!("📎 Attached: {name}\n\n"));
        }
    }

    md
}

fn to_text(chat: &Chat) -> String {
    let underline = "=".repeat(chat.title.chars().count());
    let mut text = format!("{}\n{}\n\n", chat.title, underline);
    text.push_str(&format!("Created: {}\n\n", local_time(&chat.created_at)));

    for msg in &chat.messages {
        text.push_str(&format!(
            "{} ({}):\n",
            sender_label(msg.sender),
            local_time(&msg.timestamp)
        ));
        text.push_str(&format!("{}\n\n", msg.content));
    }

    text
}
