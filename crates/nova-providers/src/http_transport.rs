//! HTTP transport: talks to every provider family over `reqwest`.
//!
//! The family decides the URL, the auth placement, and the body shape;
//! this module only executes the request and classifies the outcome.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error};

use nova_core::config::Config;
use nova_core::types::ConversationMessage;

use crate::error::DispatchError;
use crate::traits::{CallTarget, ChatTransport, GenerationParams};
use crate::wire::{self, Auth};

// ─────────────────────────────────────────────
// HttpTransport
// ─────────────────────────────────────────────

/// A `ChatTransport` backed by a shared, connection-pooled HTTP client.
pub struct HttpTransport {
    client: reqwest::Client,
    /// Per-provider endpoint base overrides (e.g. a proxy or a mock server).
    api_bases: HashMap<String, String>,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("api_bases", &self.api_bases)
            .finish()
    }
}

impl HttpTransport {
    /// Create a transport with the given whole-request timeout.
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpTransport {
            client,
            api_bases: HashMap::new(),
        })
    }

    /// Create a transport from config: timeout plus any `apiBase` overrides.
    pub fn from_config(config: &Config) -> reqwest::Result<Self> {
        let mut transport = Self::new(Duration::from_secs(config.http.timeout_secs))?;
        for (id, provider) in config.providers.to_map() {
            if let Some(base) = provider.api_base {
                transport = transport.with_api_base(&id, base);
            }
        }
        Ok(transport)
    }

    /// Override the endpoint base for one provider.
    pub fn with_api_base(mut self, provider_id: &str, base: impl Into<String>) -> Self {
        self.api_bases.insert(provider_id.to_string(), base.into());
        self
    }

    /// Full request URL for a target: override or catalog base, plus the
    /// family-specific suffix.
    fn url_for(&self, target: &CallTarget) -> String {
        let base = self
            .api_bases
            .get(target.provider.id)
            .map(String::as_str)
            .unwrap_or(target.provider.endpoint);
        target.provider.family.endpoint(base, &target.model)
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn complete(
        &self,
        target: &CallTarget,
        messages: &[ConversationMessage],
        params: &GenerationParams,
    ) -> Result<String, DispatchError> {
        let provider = target.provider.display_name;
        let family = target.provider.family;
        let url = self.url_for(target);

        debug!(
            provider,
            model = %target.model,
            messages = messages.len(),
            "Calling LLM"
        );

        let body = family.encode(&target.model, messages, params);
        let request = self.client.post(&url).json(&body);
        let request = match family.auth() {
            Auth::Bearer => request.bearer_auth(target.api_key.expose()),
            Auth::QueryKey => request.query(&[("key", target.api_key.expose())]),
        };

        let response = request.send().await.map_err(|source| {
            // The URL can carry the key as a query parameter.
            let source = source.without_url();
            error!(provider, error = %source, "HTTP request failed");
            DispatchError::Transport { provider, source }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| DispatchError::Transport {
                provider,
                source: source.without_url(),
            })?;

        if !status.is_success() {
            let message = wire::error_message(&text);
            error!(
                provider,
                status = status.as_u16(),
                message = message.as_deref().unwrap_or("-"),
                "API error"
            );
            return Err(DispatchError::ProviderHttp {
                provider,
                status: status.as_u16(),
                message,
            });
        }

        let reply = family.decode(provider, &text)?;
        debug!(provider, chars = reply.len(), "LLM response received");
        Ok(reply)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
