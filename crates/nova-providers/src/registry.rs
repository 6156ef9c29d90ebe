//! Provider registry: static descriptors for every supported LLM provider.
//!
//! Each `ProviderDescriptor` describes how to reach a provider: its wire
//! family, endpoint base, and the models it serves. The order of
//! `supported_models` matters: the first entry is the provider's default.

use crate::wire::ProviderFamily;

// ─────────────────────────────────────────────
// ProviderDescriptor: static metadata for one provider
// ─────────────────────────────────────────────

/// How a free provider is free.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrialType {
    /// Free tier with limits, paid beyond it.
    FreeTrial,
    /// No paid tier needed.
    CompletelyFree,
}

impl TrialType {
    pub fn label(&self) -> &'static str {
        match self {
            TrialType::FreeTrial => "free trial",
            TrialType::CompletelyFree => "completely free",
        }
    }
}

/// Static description of one provider.
#[derive(Clone, Debug)]
pub struct ProviderDescriptor {
    /// Catalog id, also the namespace for persisted keys (e.g. `"groq"`).
    pub id: &'static str,
    /// Human-readable name for logs and the CLI.
    pub display_name: &'static str,
    pub description: &'static str,
    pub is_free: bool,
    pub requires_api_key: bool,
    /// Models in preference order; the first is the default.
    pub supported_models: &'static [&'static str],
    pub trial_type: Option<TrialType>,
    /// Endpoint base; the family appends the model/path suffix.
    pub endpoint: &'static str,
    /// Request/response shape spoken by this provider.
    pub family: ProviderFamily,
}

impl PartialEq for ProviderDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl ProviderDescriptor {
    /// The provider's default model (first listed).
    pub fn default_model(&self) -> &'static str {
        self.supported_models.first().copied().unwrap_or_default()
    }

    /// Whether `model` is one this provider serves.
    pub fn supports_model(&self, model: &str) -> bool {
        self.supported_models.contains(&model)
    }

    /// `model` if supported, otherwise the default model.
    pub fn resolve_model(&self, model: Option<&str>) -> &'static str {
        model
            .and_then(|m| self.supported_models.iter().copied().find(|s| *s == m))
            .unwrap_or_else(|| self.default_model())
    }
}

// ─────────────────────────────────────────────
// Catalog
// ─────────────────────────────────────────────

/// Complete list of supported providers, in display order.
pub static PROVIDERS: &[ProviderDescriptor] = &[
    // 1. Groq: default free provider, OpenAI-compatible
    ProviderDescriptor {
        id: "groq",
        display_name: "Groq",
        description: "Ultra-fast inference with powerful Llama models - Completely FREE",
        is_free: true,
        requires_api_key: true,
        supported_models: &["llama-3.1-70b-versatile", "llama-3.1-8b-instant", "mixtral-8x7b-32768"],
        trial_type: Some(TrialType::CompletelyFree),
        endpoint: "https://api.groq.com/openai/v1",
        family: ProviderFamily::ChatCompletions,
    },
    // 2. OpenAI
    ProviderDescriptor {
        id: "openai",
        display_name: "OpenAI",
        description: "Industry-leading ChatGPT models with excellent performance",
        is_free: false,
        requires_api_key: true,
        supported_models: &["gpt-4o", "gpt-4o-mini", "gpt-3.5-turbo"],
        trial_type: None,
        endpoint: "https://api.openai.com/v1",
        family: ProviderFamily::ChatCompletions,
    },
    // 3. Google Gemini: key in query string, system prompt as systemInstruction
    ProviderDescriptor {
        id: "google",
        display_name: "Google Gemini",
        description: "Google's advanced AI models with generous free tier",
        is_free: true,
        requires_api_key: true,
        supported_models: &["gemini-1.5-pro", "gemini-1.5-flash", "gemini-pro"],
        trial_type: Some(TrialType::FreeTrial),
        endpoint: "https://generativelanguage.googleapis.com/v1beta/models",
        family: ProviderFamily::GenerativeContent,
    },
    // 4. Hugging Face: model in path, flattened prompt
    ProviderDescriptor {
        id: "huggingface",
        display_name: "Hugging Face",
        description: "Free open-source models via Hugging Face Inference API",
        is_free: true,
        requires_api_key: true,
        supported_models: &[
            "microsoft/DialoGPT-large",
            "facebook/blenderbot-400M-distill",
            "microsoft/DialoGPT-medium",
        ],
        trial_type: Some(TrialType::CompletelyFree),
        endpoint: "https://api-inference.huggingface.co/models",
        family: ProviderFamily::RawCompletion,
    },
];

/// Id of the provider used when nothing has been selected yet.
pub const DEFAULT_PROVIDER: &str = "groq";

/// Model used with [`DEFAULT_PROVIDER`] when nothing has been selected yet.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Find a provider by catalog id.
pub fn find_by_id(id: &str) -> Option<&'static ProviderDescriptor> {
    PROVIDERS.iter().find(|p| p.id == id)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
