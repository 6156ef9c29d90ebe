//! Dispatch error taxonomy.

/// Everything that can go wrong while selecting a provider or generating a
/// response.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("unknown provider '{0}'")]
    UnknownProvider(String),

    #[error("{provider} API key not set")]
    MissingCredential { provider: &'static str },

    #[error(
        "{} returned HTTP {}{}",
        .provider,
        .status,
        .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
    )]
    ProviderHttp {
        provider: &'static str,
        status: u16,
        message: Option<String>,
    },

    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// 2xx response whose body held no usable text. Degraded to placeholder
    /// text by the dispatch service, never surfaced to callers.
    #[error("malformed response from {provider}: {reason}")]
    MalformedResponse {
        provider: &'static str,
        reason: String,
    },
}

impl DispatchError {
    /// Whether the user should re-enter credentials for the provider.
    pub fn needs_reconnect(&self) -> bool {
        match self {
            DispatchError::MissingCredential { .. } => true,
            DispatchError::ProviderHttp { status, .. } => matches!(status, 401 | 403),
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            DispatchError::ProviderHttp { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display_with_message() {
        let err = DispatchError::ProviderHttp {
            provider: "OpenAI",
            status: 429,
            message: Some("Rate limit exceeded".to_string()),
        };
        assert_eq!(err.to_string(), "OpenAI returned HTTP 429: Rate limit exceeded");
        assert_eq!(err.status(), Some(429));
    }

    #[test]
    fn test_http_error_display_without_message() {
        let err = DispatchError::ProviderHttp {
            provider: "Groq",
            status: 502,
            message: None,
        };
        assert_eq!(err.to_string(), "Groq returned HTTP 502");
    }

    #[test]
    fn test_needs_reconnect() {
        assert!(DispatchError::MissingCredential { provider: "Groq" }.needs_reconnect());
        assert!(DispatchError::ProviderHttp { provider: "Groq", status: 401, message: None }
            .needs_reconnect());
        assert!(!DispatchError::ProviderHttp { provider: "Groq", status: 500, message: None }
            .needs_reconnect());
        assert!(!DispatchError::UnknownProvider("x".into()).needs_reconnect());
    }

    #[test]
    fn test_missing_credential_message() {
        let err = DispatchError::MissingCredential { provider: "Hugging Face" };
        assert_eq!(err.to_string(), "Hugging Face API key not set");
    }
}
