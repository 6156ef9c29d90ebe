//! Wire formats: one request/response shape per provider family.
//!
//! - `ChatCompletions`: OpenAI-style `/chat/completions`, bearer auth.
//! - `GenerativeContent`: Gemini `:generateContent`, key as `?key=` query
//!   parameter, system prompt sent as `systemInstruction`.
//! - `RawCompletion`: Hugging Face inference, model in the path, the whole
//!   conversation flattened into one prompt.

use serde::{Deserialize, Serialize};

use nova_core::types::{ConversationMessage, Role};

use crate::error::DispatchError;
use crate::traits::GenerationParams;

/// Request/response shape spoken by a provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderFamily {
    ChatCompletions,
    GenerativeContent,
    RawCompletion,
}

/// Where the API key goes on the request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Auth {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `?key=<key>` query parameter, no auth header.
    QueryKey,
}

/// A family-specific request body.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RequestBody<'a> {
    Chat(ChatRequest<'a>),
    Generative(GenerativeRequest),
    Raw(RawRequest),
}

impl ProviderFamily {
    /// Build the full URL from the endpoint base and model.
    pub fn endpoint(&self, base: &str, model: &str) -> String {
        let base = base.trim_end_matches('/');
        match self {
            ProviderFamily::ChatCompletions => format!("{base}/chat/completions"),
            ProviderFamily::GenerativeContent => format!("{base}/{model}:generateContent"),
            ProviderFamily::RawCompletion => format!("{base}/{model}"),
        }
    }

    pub fn auth(&self) -> Auth {
        match self {
            ProviderFamily::GenerativeContent => Auth::QueryKey,
            ProviderFamily::ChatCompletions | ProviderFamily::RawCompletion => Auth::Bearer,
        }
    }

    /// Encode a conversation into this family's request body.
    pub fn encode<'a>(
        &self,
        model: &'a str,
        messages: &'a [ConversationMessage],
        params: &GenerationParams,
    ) -> RequestBody<'a> {
        match self {
            ProviderFamily::ChatCompletions => RequestBody::Chat(ChatRequest {
                model,
                messages,
                max_tokens: params.max_tokens,
                temperature: params.temperature,
            }),
            ProviderFamily::GenerativeContent => {
                RequestBody::Generative(GenerativeRequest::new(messages, params))
            }
            ProviderFamily::RawCompletion => RequestBody::Raw(RawRequest {
                inputs: flatten_prompt(messages),
                parameters: RawParameters {
                    max_new_tokens: params.max_tokens,
                    temperature: params.temperature,
                    return_full_text: false,
                },
            }),
        }
    }

    /// Extract the reply text from a 2xx body.
    ///
    /// An unparseable body or empty text is a `MalformedResponse`.
    pub fn decode(&self, provider: &'static str, body: &str) -> Result<String, DispatchError> {
        let malformed = |reason: String| DispatchError::MalformedResponse { provider, reason };

        let text = match self {
            ProviderFamily::ChatCompletions => {
                let resp: ChatResponse =
                    serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;
                resp.choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.message.content)
            }
            ProviderFamily::GenerativeContent => {
                let resp: GenerativeResponse =
                    serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;
                resp.candidates
                    .into_iter()
                    .next()
                    .and_then(|c| c.content)
                    .and_then(|c| c.parts.into_iter().next())
                    .and_then(|p| p.text)
            }
            ProviderFamily::RawCompletion => {
                let resp: RawResponse =
                    serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;
                let generation = match resp {
                    RawResponse::Many(items) => items.into_iter().next(),
                    RawResponse::One(item) => Some(item),
                };
                generation.map(|g| g.generated_text.trim().to_string())
            }
        };

        text.filter(|t| !t.is_empty())
            .ok_or_else(|| malformed("no text in response".to_string()))
    }
}

/// Pull the provider's error message out of a non-2xx body.
///
/// Understands `{"error": {"message": "..."}}` (OpenAI, Groq, Gemini) and
/// `{"error": "..."}` (Hugging Face).
pub fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;
    error
        .as_str()
        .or_else(|| error.get("message").and_then(|m| m.as_str()))
        .map(String::from)
}

/// Render every message as `role: content`, ending with an assistant cue.
pub fn flatten_prompt(messages: &[ConversationMessage]) -> String {
    let mut lines: Vec<String> = messages
        .iter()
        .map(|m| format!("{}: {}", m.role, m.content))
        .collect();
    lines.push("assistant:".to_string());
    lines.join("\n")
}

// ─────────────────────────────────────────────
// Chat completions
// ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ConversationMessage],
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

// ─────────────────────────────────────────────
// Generative content (Gemini)
// ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerativeRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiInstruction>,
    generation_config: GeminiGenerationConfig,
}

impl GenerativeRequest {
    fn new(messages: &[ConversationMessage], params: &GenerationParams) -> Self {
        let system: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();

        let contents = messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| GeminiContent {
                role: match m.role {
                    Role::Assistant => "model",
                    _ => "user",
                },
                parts: vec![GeminiPart {
                    text: m.content.clone(),
                }],
            })
            .collect();

        GenerativeRequest {
            contents,
            system_instruction: (!system.is_empty()).then(|| GeminiInstruction {
                parts: vec![GeminiPart {
                    text: system.join("\n\n"),
                }],
            }),
            generation_config: GeminiGenerationConfig {
                max_output_tokens: params.max_tokens,
                temperature: params.temperature,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: &'static str,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    max_output_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct GenerativeResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

// ─────────────────────────────────────────────
// Raw completion (Hugging Face)
// ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RawRequest {
    inputs: String,
    parameters: RawParameters,
}

#[derive(Debug, Serialize)]
struct RawParameters {
    max_new_tokens: u32,
    temperature: f64,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawResponse {
    Many(Vec<RawGeneration>),
    One(RawGeneration),
}

#[derive(Debug, Deserialize)]
struct RawGeneration {
    generated_text: String,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
