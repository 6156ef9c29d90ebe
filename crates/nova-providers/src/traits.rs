//! Transport trait: the seam between dispatch logic and HTTP.
//!
//! The `HttpTransport` in `http_transport.rs` is the real implementation;
//! tests substitute scripted transports.

use async_trait::async_trait;
use nova_core::types::ConversationMessage;

use crate::credentials::ApiKey;
use crate::error::DispatchError;
use crate::registry::ProviderDescriptor;

/// Generation parameters sent with every call.
#[derive(Clone, Debug)]
pub struct GenerationParams {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            temperature: 0.7,
        }
    }
}

/// Everything one call needs to reach a provider, resolved per call.
#[derive(Clone, Debug)]
pub struct CallTarget {
    pub provider: &'static ProviderDescriptor,
    pub model: String,
    pub api_key: ApiKey,
}

/// Executes one request against one provider.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send `messages` to `target` and return the reply text.
    ///
    /// A 2xx response without usable text is reported as
    /// `DispatchError::MalformedResponse`.
    async fn complete(
        &self,
        target: &CallTarget,
        messages: &[ConversationMessage],
        params: &GenerationParams,
    ) -> Result<String, DispatchError>;
}
