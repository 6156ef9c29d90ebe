//! `nova providers`, `nova use`, `nova key`: provider selection from the CLI.

use std::io::{BufRead, IsTerminal};

use anyhow::{Context, Result};
use colored::Colorize;

use nova_providers::{ChatTransport, DispatchService};

use crate::helpers::check_mark;

/// `nova providers`: catalog with active marker and key status.
pub fn list<T: ChatTransport>(service: &DispatchService<T>) {
    let active = service.active_provider().id;

    println!();
    println!("{}", "Providers:".bold());
    for provider in service.catalog() {
        let marker = if provider.id == active {
            "●".green().to_string()
        } else {
            " ".to_string()
        };
        let pricing = match provider.trial_type {
            Some(trial) => trial.label().to_string(),
            None if provider.is_free => "Free".to_string(),
            None => "Paid".to_string(),
        };
        let key_status = check_mark(
            service.credentials().contains(provider.id),
            "key set",
            "no key",
        );

        println!(
            "  {} {:<12} {:<16} {:<14} {}",
            marker,
            provider.id,
            provider.display_name,
            pricing.dimmed(),
            key_status
        );
        println!("      {}", provider.description.dimmed());
        let models: Vec<String> = provider
            .supported_models
            .iter()
            .map(|m| {
                if provider.id == active && *m == service.active_model() {
                    m.bold().to_string()
                } else {
                    m.to_string()
                }
            })
            .collect();
        println!("      models: {}", models.join(", "));
    }
    println!();
}

/// `nova use <provider> [--model M]`
pub fn use_provider<T: ChatTransport>(
    service: &mut DispatchService<T>,
    provider_id: &str,
    model: Option<&str>,
) -> Result<()> {
    let selection = service.select_provider(provider_id, model)?.clone();
    println!(
        "{} Using {} · {}",
        "✓".green(),
        selection.provider.display_name.bold(),
        selection.model
    );
    if let Some(requested) = model.filter(|m| *m != selection.model) {
        println!(
            "{}",
            format!("  '{requested}' is not served by this provider, using its default").yellow()
        );
    }
    if selection.provider.requires_api_key && service.get_api_key().is_none() {
        println!(
            "{}",
            "  No API key set yet: run `nova key`.".dimmed()
        );
    }
    Ok(())
}

/// Ask for an API key without echoing it, or take the first line of piped stdin.
pub fn prompt_secret() -> Result<String> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        let secret = dialoguer::Password::new()
            .with_prompt("API key (empty clears it)")
            .allow_empty_password(true)
            .interact()
            .context("failed to read API key")?;
        Ok(secret)
    } else {
        read_secret(stdin.lock())
    }
}

/// First line of `reader`, trimmed.
fn read_secret(mut reader: impl BufRead) -> Result<String> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .context("failed to read API key from stdin")?;
    Ok(line.trim().to_string())
}

/// `nova key [secret]`
pub fn set_key<T: ChatTransport>(service: &mut DispatchService<T>, secret: &str) {
    let provider = service.active_provider().display_name;
    service.set_api_key(secret.trim());
    if service.get_api_key().is_some() {
        println!("{} API key saved for {}", "✓".green(), provider.bold());
    } else {
        println!("{} API key cleared for {}", "✓".green(), provider.bold());
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nova_core::store::{KeyValueStore, MemoryStore};
    use nova_core::types::ConversationMessage;
    use nova_providers::{CallTarget, Credentials, DispatchError, GenerationParams};
    use std::sync::Arc;

    struct Offline;

    #[async_trait]
    impl ChatTransport for Offline {
        async fn complete(
            &self,
            target: &CallTarget,
            _messages: &[ConversationMessage],
            _params: &GenerationParams,
        ) -> Result<String, DispatchError> {
            Err(DispatchError::ProviderHttp {
                provider: target.provider.display_name,
                status: 503,
                message: None,
            })
        }
    }

    fn service(store: Arc<MemoryStore>) -> DispatchService<Offline> {
        DispatchService::new(Offline, store, Credentials::new())
    }

    #[test]
    fn use_provider_persists_selection() {
        let store = Arc::new(MemoryStore::new());
        let mut svc = service(store.clone());

        use_provider(&mut svc, "google", Some("gemini-1.5-flash")).unwrap();
        assert_eq!(svc.active_model(), "gemini-1.5-flash");
        assert_eq!(store.get("nova-ai-provider").as_deref(), Some("google"));
        assert_eq!(store.get("nova-ai-model").as_deref(), Some("gemini-1.5-flash"));
    }

    #[test]
    fn use_unknown_provider_fails() {
        let mut svc = service(Arc::new(MemoryStore::new()));
        let err = use_provider(&mut svc, "anthropic", None).unwrap_err();
        assert!(err.to_string().contains("anthropic"));
        assert_eq!(svc.active_provider().id, "groq");
    }

    #[test]
    fn set_key_trims_and_clears() {
        let store = Arc::new(MemoryStore::new());
        let mut svc = service(store.clone());

        set_key(&mut svc, "  gsk_abc \n");
        assert_eq!(svc.get_api_key().unwrap().expose(), "gsk_abc");
        assert_eq!(store.get("nova-groq-key").as_deref(), Some("gsk_abc"));

        set_key(&mut svc, "");
        assert!(svc.get_api_key().is_none());
    }

    #[test]
    fn read_secret_takes_first_line() {
        let secret = read_secret(std::io::Cursor::new("  sk-abc \nsecond line\n")).unwrap();
        assert_eq!(secret, "sk-abc");
    }

    #[test]
    fn read_secret_empty_input_clears() {
        let store = Arc::new(MemoryStore::new());
        let mut svc = service(store.clone());
        set_key(&mut svc, "gsk_abc");

        let secret = read_secret(std::io::Cursor::new("")).unwrap();
        set_key(&mut svc, &secret);
        assert!(svc.get_api_key().is_none());
        assert!(store.get("nova-groq-key").is_none());
    }
}
