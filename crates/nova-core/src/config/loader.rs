//! Config loader: reads `~/.nova/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.nova/config.json`
//! 3. Environment variables `NOVA_<SECTION>__<FIELD>` (override JSON)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{Config, ProviderConfig};

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(get_config_path);

    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `NOVA_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `NOVA_ASSISTANT__NAME`, `NOVA_ASSISTANT__MAX_TOKENS`,
///   `NOVA_ASSISTANT__TEMPERATURE`, `NOVA_ASSISTANT__HISTORY_WINDOW`
/// - `NOVA_PROVIDERS__<ID>__API_KEY`, `NOVA_PROVIDERS__<ID>__API_BASE`
/// - `NOVA_FALLBACK__PROVIDER`, `NOVA_FALLBACK__ENABLED`
/// - `NOVA_HTTP__TIMEOUT_SECS`
fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(val) = std::env::var("NOVA_ASSISTANT__NAME") {
        config.assistant.name = val;
    }
    if let Ok(val) = std::env::var("NOVA_ASSISTANT__MAX_TOKENS") {
        if let Ok(n) = val.parse::<u32>() {
            config.assistant.max_tokens = n;
        }
    }
    if let Ok(val) = std::env::var("NOVA_ASSISTANT__TEMPERATURE") {
        if let Ok(t) = val.parse::<f64>() {
            config.assistant.temperature = t;
        }
    }
    if let Ok(val) = std::env::var("NOVA_ASSISTANT__HISTORY_WINDOW") {
        if let Ok(n) = val.parse::<usize>() {
            config.assistant.history_window = n;
        }
    }

    apply_provider_env(&mut config.providers.groq, "GROQ");
    apply_provider_env(&mut config.providers.openai, "OPENAI");
    apply_provider_env(&mut config.providers.google, "GOOGLE");
    apply_provider_env(&mut config.providers.huggingface, "HUGGINGFACE");

    if let Ok(val) = std::env::var("NOVA_FALLBACK__PROVIDER") {
        config.fallback.provider = val;
    }
    if let Ok(val) = std::env::var("NOVA_FALLBACK__ENABLED") {
        config.fallback.enabled = val == "true" || val == "1";
    }

    if let Ok(val) = std::env::var("NOVA_HTTP__TIMEOUT_SECS") {
        if let Ok(n) = val.parse::<u64>() {
            config.http.timeout_secs = n;
        }
    }

    config
}

/// Apply env var overrides for a single provider.
fn apply_provider_env(provider: &mut ProviderConfig, name: &str) {
    if let Ok(val) = std::env::var(format!("NOVA_PROVIDERS__{name}__API_KEY")) {
        provider.api_key = val;
    }
    if let Ok(val) = std::env::var(format!("NOVA_PROVIDERS__{name}__API_BASE")) {
        provider.api_base = Some(val);
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_missing_file() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.json"));
        assert_eq!(config.assistant.max_tokens, 1000);
        assert_eq!(config.http.timeout_secs, 120);
    }

    #[test]
    fn test_load_valid_json() {
        let file = write_temp_json(r#"{
            "assistant": {
                "name": "Vega",
                "maxTokens": 512
            }
        }"#);

        let config = load_config_from_path(file.path());
        assert_eq!(config.assistant.name, "Vega");
        assert_eq!(config.assistant.max_tokens, 512);
        // Default preserved
        assert_eq!(config.assistant.temperature, 0.7);
    }

    #[test]
    fn test_load_invalid_json_returns_defaults() {
        let file = write_temp_json("not valid json {{{");
        let config = load_config_from_path(file.path());
        assert_eq!(config.assistant.max_tokens, 1000);
    }

    #[test]
    fn test_load_empty_json() {
        let file = write_temp_json("{}");
        let config = load_config_from_path(file.path());
        assert_eq!(config.fallback.provider, "groq");
    }

    #[test]
    fn test_serialized_config_reloads() {
        let mut config = Config::default();
        config.fallback.enabled = false;
        config.providers.openai.api_base = Some("https://proxy.local/v1".to_string());

        let file = write_temp_json(&serde_json::to_string_pretty(&config).unwrap());
        let reloaded = load_config_from_path(file.path());
        assert!(!reloaded.fallback.enabled);
        assert_eq!(
            reloaded.providers.openai.api_base.as_deref(),
            Some("https://proxy.local/v1")
        );
    }

    #[test]
    fn test_full_config_with_providers() {
        let file = write_temp_json(r#"{
            "providers": {
                "groq": { "apiKey": "gsk_123" },
                "google": { "apiKey": "AIza-456", "apiBase": "https://gemini.proxy/v1beta/models" }
            },
            "fallback": { "provider": "groq", "enabled": true }
        }"#);

        let config = load_config_from_path(file.path());
        assert!(config.providers.groq.is_configured());
        assert!(config.providers.google.is_configured());
        assert!(!config.providers.openai.is_configured());
        assert_eq!(
            config.providers.google.api_base.as_deref(),
            Some("https://gemini.proxy/v1beta/models")
        );
    }

    #[test]
    fn test_env_override_max_tokens() {
        std::env::set_var("NOVA_ASSISTANT__MAX_TOKENS", "256");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.assistant.max_tokens, 256);
        std::env::remove_var("NOVA_ASSISTANT__MAX_TOKENS");
    }

    #[test]
    fn test_env_override_provider_key() {
        std::env::set_var("NOVA_PROVIDERS__HUGGINGFACE__API_KEY", "hf_env_key");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.providers.huggingface.api_key, "hf_env_key");
        std::env::remove_var("NOVA_PROVIDERS__HUGGINGFACE__API_KEY");
    }

    #[test]
    fn test_env_override_fallback_disabled() {
        std::env::set_var("NOVA_FALLBACK__ENABLED", "0");
        let config = apply_env_overrides(Config::default());
        assert!(!config.fallback.enabled);
        std::env::remove_var("NOVA_FALLBACK__ENABLED");
    }
}
