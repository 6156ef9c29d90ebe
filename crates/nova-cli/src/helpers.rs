//! Shared CLI helpers: response printing, error hints, banner.

use colored::Colorize;

use nova_providers::{DispatchError, Reply};

/// Print a reply to stdout, noting when the fallback provider answered.
pub fn print_response(reply: &Reply, assistant_name: &str) {
    println!();
    println!("{}", format!("✨ {assistant_name}").cyan().bold());
    if reply.text.is_empty() {
        println!("{}", "(no response)".dimmed());
    } else {
        println!("{}", reply.text);
    }
    if let Some(note) = fallback_note(reply) {
        println!("{}", note.dimmed());
    }
    println!();
}

/// Footer shown when a reply came from the fallback provider.
pub fn fallback_note(reply: &Reply) -> Option<String> {
    reply
        .used_fallback
        .then(|| format!("(answered by {} · {} after the active provider failed)", reply.provider, reply.model))
}

/// Print a dispatch error, with a reconnect hint when the key is the problem.
pub fn print_error(err: &DispatchError) {
    eprintln!("\n{} {err}", "❌ Error:".red().bold());
    if let Some(hint) = reconnect_hint(err) {
        eprintln!("{}", hint.yellow());
    }
    eprintln!();
}

pub fn reconnect_hint(err: &DispatchError) -> Option<&'static str> {
    err.needs_reconnect()
        .then_some("🔑 Reconnect the provider: run `nova key` or `/key` in the REPL.")
}

/// Print the banner shown at REPL start.
pub fn print_banner(assistant_name: &str, provider: &str, model: &str) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!(
        "{}  v{}",
        format!("✨ {assistant_name}").cyan().bold(),
        version.dimmed()
    );
    println!("{}", format!("Provider: {provider} · {model}").dimmed());
    println!(
        "{}",
        "Type a message, /provider, /key, /attach, /new, or \"exit\" to quit.".dimmed()
    );
    println!();
}

/// Print a "thinking" spinner placeholder (for non-log mode).
pub fn print_thinking() {
    eprint!("{}", "⠿ thinking...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}

/// Mark a boolean status with a check or a dimmed dot.
pub fn check_mark(ok: bool, yes: &str, no: &str) -> String {
    if ok {
        format!("{} {}", "✓".green(), yes)
    } else {
        format!("{}", format!("· {no}").dimmed())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
