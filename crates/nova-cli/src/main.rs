//! Nova CLI: entry point.
//!
//! # Commands
//!
//! - `nova chat [-m MESSAGE] [--attach PATH]` - chat (single-shot or REPL)
//! - `nova providers` - list the provider catalog
//! - `nova use <provider> [--model M]` - select the active provider
//! - `nova key [secret]` - set the API key for the active provider
//! - `nova history ...` - manage saved chats
//! - `nova status` - show configuration and provider status

mod helpers;
mod history_cmd;
mod providers_cmd;
mod repl;
mod status;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use nova_core::config::{load_config, Config};
use nova_core::history::{Chat, ChatStore};
use nova_core::store::{JsonFileStore, KeyValueStore};
use nova_core::tools::analyze_path;
use nova_core::types::HistoryEntry;
use nova_providers::{Credentials, DispatchService, GenerationParams, HttpTransport};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// ✨ Nova: personal AI assistant over multiple LLM providers
#[derive(Parser)]
#[command(name = "nova", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with Nova (single-shot or interactive REPL)
    Chat {
        /// Single message (non-interactive). Omit for REPL mode.
        #[arg(short, long)]
        message: Option<String>,

        /// Analyze a file and attach the result to the message
        #[arg(long)]
        attach: Option<PathBuf>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// List available providers
    Providers,

    /// Select the active provider and model
    Use {
        /// Provider id (e.g. "groq", "openai")
        provider: String,

        /// Model to use; defaults to the provider's first model
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Set the API key for the active provider (empty string clears it)
    Key {
        /// Omit to enter it at a hidden prompt or pipe it on stdin
        secret: Option<String>,
    },

    /// Manage saved chats
    History {
        #[command(subcommand)]
        action: history_cmd::HistoryCommands,
    },

    /// Show configuration and provider status
    Status,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Chat {
            message,
            attach,
            logs,
        } => {
            init_logging(logs);
            run_chat(message, attach).await
        }
        Commands::Providers => {
            init_logging(false);
            let config = load_config(None);
            providers_cmd::list(&build_service(&config)?);
            Ok(())
        }
        Commands::Use { provider, model } => {
            init_logging(false);
            let config = load_config(None);
            providers_cmd::use_provider(&mut build_service(&config)?, &provider, model.as_deref())
        }
        Commands::Key { secret } => {
            init_logging(false);
            let config = load_config(None);
            let mut service = build_service(&config)?;
            let secret = match secret {
                Some(secret) => secret,
                None => providers_cmd::prompt_secret()?,
            };
            providers_cmd::set_key(&mut service, &secret);
            Ok(())
        }
        Commands::History { action } => {
            init_logging(false);
            history_cmd::dispatch(action, &ChatStore::open(None))
        }
        Commands::Status => {
            init_logging(false);
            status::run()
        }
    }
}

// ─────────────────────────────────────────────
// Chat command
// ─────────────────────────────────────────────

async fn run_chat(message: Option<String>, attach: Option<PathBuf>) -> Result<()> {
    let config = load_config(None);
    let mut service = build_service(&config)?;
    let chats = ChatStore::open(None);
    let attachment = attach.as_deref().map(analyze_path);

    match message {
        Some(msg) => {
            // Single-shot mode
            info!(
                provider = service.active_provider().id,
                attached = attachment.is_some(),
                "processing single message"
            );
            let mut entry = HistoryEntry::user(msg);
            if let Some(result) = attachment {
                entry = entry.with_tool_result(result);
            }
            let mut conversation = vec![entry];

            match service.generate_response(&conversation).await {
                Ok(reply) => {
                    helpers::print_response(&reply, &config.assistant.name);
                    conversation.push(HistoryEntry::assistant(reply.text));
                    chats
                        .save_chat(&Chat::from_entries(&conversation))
                        .context("failed to save chat")?;
                }
                Err(e) => {
                    helpers::print_error(&e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            // Interactive REPL mode
            repl::run(
                &mut service,
                &chats,
                &config.assistant.name,
                config.assistant.history_window,
                attachment,
            )
            .await?;
        }
    }

    Ok(())
}

/// Build the dispatch service from config, persisted state, and keys.
pub fn build_service(config: &Config) -> Result<DispatchService<HttpTransport>> {
    let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::open(None));
    let credentials = Credentials::load(store.as_ref(), config);
    let transport = HttpTransport::from_config(config).context("failed to build HTTP client")?;

    let fallback = config
        .fallback
        .enabled
        .then_some(config.fallback.provider.as_str());

    let service = DispatchService::new(transport, store, credentials)
        .with_fallback(fallback)
        .context("invalid fallback provider in config")?
        .with_params(GenerationParams {
            max_tokens: config.assistant.max_tokens,
            temperature: config.assistant.temperature,
        })
        .with_assistant_name(config.assistant.name.clone());

    Ok(service)
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("nova=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
