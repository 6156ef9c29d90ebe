//! `nova status`: show configuration and provider status.
//!
//! - Shows config and state paths, active provider/model, parameters
//! - Shows API key status for each provider and the fallback setting

use anyhow::Result;
use colored::Colorize;

use nova_core::config::{get_config_path, load_config};
use nova_core::history::ChatStore;
use nova_core::utils::get_state_path;

use crate::helpers::check_mark;

/// Run the status command.
pub fn run() -> Result<()> {
    let config = load_config(None);
    let service = crate::build_service(&config)?;
    let config_path = get_config_path();
    let state_path = get_state_path();

    println!();
    println!("{}", format!("✨ {} Status", config.assistant.name).cyan().bold());
    println!();

    // Files
    for (label, path) in [("Config:", &config_path), ("State:", &state_path)] {
        println!(
            "  {:<18} {} {}",
            label.bold(),
            path.display(),
            if path.exists() {
                "✓".green().to_string()
            } else {
                "(not found)".red().to_string()
            }
        );
    }

    // Selection
    println!(
        "  {:<18} {} · {}",
        "Provider:".bold(),
        service.active_provider().display_name,
        service.active_model()
    );

    // Temperature & tokens
    println!(
        "  {:<18} {} | max_tokens: {} | window: {}",
        "Parameters:".bold(),
        format!("temp: {}", config.assistant.temperature).dimmed(),
        format!("{}", config.assistant.max_tokens).dimmed(),
        format!("{}", config.assistant.history_window).dimmed(),
    );

    // Fallback
    let fallback = match service.fallback_provider() {
        Some(provider) => format!("{} ({})", provider.display_name, provider.default_model()),
        None => "disabled".dimmed().to_string(),
    };
    println!("  {:<18} {}", "Fallback:".bold(), fallback);

    // Providers
    println!();
    println!("  {}", "Providers:".bold());
    for spec in service.catalog() {
        let status = check_mark(
            service.credentials().contains(spec.id),
            "(key set)",
            "not configured",
        );
        println!("    {:<20} {}", spec.display_name, status);
    }

    // Saved chats
    println!();
    let chats = ChatStore::open(None);
    println!(
        "  {:<18} {} in {} folders",
        "Saved chats:".bold(),
        chats.all_chats().len(),
        chats.folders().len()
    );

    println!();

    Ok(())
}
