//! File analysis tool: summarizes a text file so it can be attached to the
//! next user message as a [`ToolResult`].

use std::path::Path;

use serde_json::json;

use crate::types::ToolResult;

/// Characters of content kept in the summary.
const SUMMARY_CHARS: usize = 200;

/// MIME type guessed from the file extension, `"unknown"` when there is none.
fn mime_type(name: &str) -> String {
    mime_guess::from_path(name)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Analyze in-memory file content.
pub fn analyze_file(name: &str, content: &str) -> ToolResult {
    let char_count = content.chars().count();
    let mut summary: String = content.chars().take(SUMMARY_CHARS).collect();
    if char_count > SUMMARY_CHARS {
        summary.push_str("...");
    }

    ToolResult::ok(json!({
        "name": name,
        "type": mime_type(name),
        "size": content.len(),
        "lineCount": content.lines().count().max(1),
        "wordCount": content.split_whitespace().count(),
        "summary": summary,
    }))
    .with_metadata(json!({ "type": "file-analysis" }))
}

/// Read and analyze a file from disk.
///
/// Unreadable or non-UTF-8 files yield a failed result rather than an error,
/// so the caller can still attach it to the conversation.
pub fn analyze_path(path: &Path) -> ToolResult {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    match std::fs::read_to_string(path) {
        Ok(content) => analyze_file(&name, &content),
        Err(e) => ToolResult::failure(format!("Failed to read {}: {}", path.display(), e))
            .with_metadata(json!({ "type": "file-analysis" })),
    }
}
