//! Dispatch service: owns the provider/model selection and the credential
//! mapping, builds the prompt, and composes the primary call with a single
//! fallback hop to the default free provider.

use std::sync::Arc;

use tracing::{debug, info, warn};

use nova_core::store::{api_key_key, KeyValueStore, ACTIVE_MODEL_KEY, ACTIVE_PROVIDER_KEY};
use nova_core::types::{ConversationMessage, HistoryEntry};

use crate::credentials::{ApiKey, Credentials};
use crate::error::DispatchError;
use crate::registry::{find_by_id, ProviderDescriptor, DEFAULT_MODEL, DEFAULT_PROVIDER, PROVIDERS};
use crate::traits::{CallTarget, ChatTransport, GenerationParams};

/// Text returned when a provider answers 2xx without usable content.
pub const PLACEHOLDER_REPLY: &str = "Sorry, I couldn't generate a response.";

/// System preamble prepended to every request.
pub fn persona_preamble(name: &str) -> String {
    format!(
        "You are {name}, a personal AI assistant. You are helpful, intelligent, and friendly. \
         You assist with tasks, answer questions, and help with productivity. \
         Keep responses concise but informative. \
         You have a slightly futuristic personality but remain professional."
    )
}

// ─────────────────────────────────────────────
// Selection and reply
// ─────────────────────────────────────────────

/// The provider and model the next call targets.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub provider: &'static ProviderDescriptor,
    pub model: String,
}

impl Selection {
    fn resolve(provider: &'static ProviderDescriptor, model: Option<&str>) -> Self {
        Selection {
            provider,
            model: provider.resolve_model(model).to_string(),
        }
    }
}

/// A generated reply and where it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Reply {
    pub text: String,
    /// Catalog id of the provider that produced `text`.
    pub provider: &'static str,
    pub model: String,
    /// `true` when the active provider failed and the fallback answered.
    pub used_fallback: bool,
}

// ─────────────────────────────────────────────
// DispatchService
// ─────────────────────────────────────────────

pub struct DispatchService<T: ChatTransport> {
    transport: T,
    store: Arc<dyn KeyValueStore>,
    selection: Selection,
    credentials: Credentials,
    fallback: Option<&'static ProviderDescriptor>,
    params: GenerationParams,
    assistant_name: String,
}

impl<T: ChatTransport> std::fmt::Debug for DispatchService<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchService")
            .field("provider", &self.selection.provider.id)
            .field("model", &self.selection.model)
            .field("credentials", &self.credentials)
            .field("fallback", &self.fallback.map(|p| p.id))
            .finish()
    }
}

impl<T: ChatTransport> DispatchService<T> {
    /// Create a service, restoring the persisted selection from `store`.
    ///
    /// An unknown persisted provider falls back to the default selection; a
    /// persisted model the provider does not serve resets to its first model.
    pub fn new(transport: T, store: Arc<dyn KeyValueStore>, credentials: Credentials) -> Self {
        let selection = match store.get(ACTIVE_PROVIDER_KEY).as_deref().map(find_by_id) {
            Some(Some(provider)) => {
                Selection::resolve(provider, store.get(ACTIVE_MODEL_KEY).as_deref())
            }
            Some(None) => {
                warn!("Persisted provider is not in the catalog, using default");
                Self::default_selection()
            }
            None => Self::default_selection(),
        };

        debug!(
            provider = selection.provider.id,
            model = %selection.model,
            "Dispatch service ready"
        );

        DispatchService {
            transport,
            store,
            selection,
            credentials,
            fallback: find_by_id(DEFAULT_PROVIDER),
            params: GenerationParams::default(),
            assistant_name: "Nova".to_string(),
        }
    }

    fn default_selection() -> Selection {
        match find_by_id(DEFAULT_PROVIDER) {
            Some(provider) => Selection::resolve(provider, Some(DEFAULT_MODEL)),
            None => Selection::resolve(&PROVIDERS[0], None),
        }
    }

    /// Set the fallback provider; `None` disables fallback.
    pub fn with_fallback(mut self, provider_id: Option<&str>) -> Result<Self, DispatchError> {
        self.fallback = match provider_id {
            Some(id) => Some(
                find_by_id(id).ok_or_else(|| DispatchError::UnknownProvider(id.to_string()))?,
            ),
            None => None,
        };
        Ok(self)
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_assistant_name(mut self, name: impl Into<String>) -> Self {
        self.assistant_name = name.into();
        self
    }

    // ── Selection ──

    /// Switch the active provider. `model` is kept only if the provider
    /// serves it; otherwise the provider's first model is used.
    pub fn select_provider(
        &mut self,
        provider_id: &str,
        model: Option<&str>,
    ) -> Result<&Selection, DispatchError> {
        let provider = find_by_id(provider_id)
            .ok_or_else(|| DispatchError::UnknownProvider(provider_id.to_string()))?;

        if let Some(requested) = model.filter(|m| !provider.supports_model(m)) {
            warn!(
                provider = provider.id,
                model = requested,
                "Model not served by provider, using default"
            );
        }

        self.selection = Selection::resolve(provider, model);
        info!(
            provider = provider.id,
            model = %self.selection.model,
            "Provider selected"
        );

        if let Err(e) = self
            .store
            .set(ACTIVE_PROVIDER_KEY, provider.id)
            .and_then(|_| self.store.set(ACTIVE_MODEL_KEY, &self.selection.model))
        {
            warn!(error = %e, "Failed to persist provider selection");
        }

        Ok(&self.selection)
    }

    /// Store `secret` for the active provider. An empty secret clears it.
    pub fn set_api_key(&mut self, secret: &str) {
        let provider = self.selection.provider;
        let key = api_key_key(provider.id);
        let result = if secret.is_empty() {
            self.credentials.remove(provider.id);
            self.store.remove(&key)
        } else {
            self.credentials.insert(provider.id, ApiKey::new(secret));
            self.store.set(&key, secret)
        };

        match result {
            Ok(()) => info!(provider = provider.id, "API key updated"),
            Err(e) => warn!(provider = provider.id, error = %e, "Failed to persist API key"),
        }
    }

    /// Stored key for the active provider.
    pub fn get_api_key(&self) -> Option<&ApiKey> {
        self.credentials.get(self.selection.provider.id)
    }

    pub fn active_provider(&self) -> &'static ProviderDescriptor {
        self.selection.provider
    }

    pub fn active_model(&self) -> &str {
        &self.selection.model
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn catalog(&self) -> &'static [ProviderDescriptor] {
        PROVIDERS
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn fallback_provider(&self) -> Option<&'static ProviderDescriptor> {
        self.fallback
    }

    // ── Generation ──

    /// Generate a reply to `history` with the active provider, falling back
    /// once to the default free provider when the active call fails.
    ///
    /// The selection is never touched: both hops run against targets
    /// resolved for this call only. When both hops fail the active
    /// provider's error is returned.
    pub async fn generate_response(&self, history: &[HistoryEntry]) -> Result<Reply, DispatchError> {
        let primary = self.primary_target()?;
        let messages = self.build_messages(history);

        let err = match self.call(&primary, &messages).await {
            Ok(text) => return Ok(reply(&primary, text, false)),
            Err(e) => e,
        };

        let Some(fallback) = self.fallback_target(primary.provider) else {
            return Err(err);
        };

        warn!(
            provider = primary.provider.id,
            fallback = fallback.provider.id,
            error = %err,
            "Active provider failed, trying fallback"
        );

        match self.call(&fallback, &messages).await {
            Ok(text) => Ok(reply(&fallback, text, true)),
            Err(fallback_err) => {
                warn!(
                    provider = fallback.provider.id,
                    error = %fallback_err,
                    "Fallback provider failed"
                );
                Err(err)
            }
        }
    }

    fn primary_target(&self) -> Result<CallTarget, DispatchError> {
        let provider = self.selection.provider;
        let api_key = self
            .credentials
            .get(provider.id)
            .cloned()
            .ok_or(DispatchError::MissingCredential {
                provider: provider.display_name,
            })?;
        Ok(CallTarget {
            provider,
            model: self.selection.model.clone(),
            api_key,
        })
    }

    /// The fallback hop, if one applies: a different provider with its own
    /// stored key, using its default model.
    fn fallback_target(&self, failed: &'static ProviderDescriptor) -> Option<CallTarget> {
        let provider = self.fallback.filter(|p| p.id != failed.id)?;
        let Some(api_key) = self.credentials.get(provider.id).cloned() else {
            debug!(provider = provider.id, "No key for fallback provider");
            return None;
        };
        Some(CallTarget {
            provider,
            model: provider.default_model().to_string(),
            api_key,
        })
    }

    fn build_messages(&self, history: &[HistoryEntry]) -> Vec<ConversationMessage> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ConversationMessage::system(persona_preamble(&self.assistant_name)));
        messages.extend(history.iter().map(HistoryEntry::to_message));
        messages
    }

    /// One hop. A malformed 2xx body degrades to the placeholder reply.
    async fn call(
        &self,
        target: &CallTarget,
        messages: &[ConversationMessage],
    ) -> Result<String, DispatchError> {
        match self.transport.complete(target, messages, &self.params).await {
            Err(DispatchError::MalformedResponse { provider, reason }) => {
                warn!(provider, reason = %reason, "Malformed response, using placeholder");
                Ok(PLACEHOLDER_REPLY.to_string())
            }
            other => other,
        }
    }
}

fn reply(target: &CallTarget, text: String, used_fallback: bool) -> Reply {
    Reply {
        text,
        provider: target.provider.id,
        model: target.model.clone(),
        used_fallback,
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_transport::HttpTransport;
    use async_trait::async_trait;
    use nova_core::store::MemoryStore;
    use nova_core::types::{Role, ToolResult};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// What the scripted transport answers for one provider.
    #[derive(Clone)]
    enum Outcome {
        Text(&'static str),
        Status(u16),
        Malformed,
    }

    #[derive(Clone, Debug)]
    struct RecordedCall {
        provider: &'static str,
        model: String,
        key: String,
        messages: Vec<ConversationMessage>,
    }

    #[derive(Default)]
    struct ScriptedTransport {
        outcomes: HashMap<&'static str, Outcome>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl ScriptedTransport {
        fn new(outcomes: &[(&'static str, Outcome)]) -> Self {
            ScriptedTransport {
                outcomes: outcomes.iter().cloned().collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatTransport for ScriptedTransport {
        async fn complete(
            &self,
            target: &CallTarget,
            messages: &[ConversationMessage],
            _params: &GenerationParams,
        ) -> Result<String, DispatchError> {
            self.calls.lock().unwrap().push(RecordedCall {
                provider: target.provider.id,
                model: target.model.clone(),
                key: target.api_key.expose().to_string(),
                messages: messages.to_vec(),
            });
            let provider = target.provider.display_name;
            match self.outcomes.get(target.provider.id) {
                Some(Outcome::Text(text)) => Ok(text.to_string()),
                Some(Outcome::Status(status)) => Err(DispatchError::ProviderHttp {
                    provider,
                    status: *status,
                    message: None,
                }),
                Some(Outcome::Malformed) | None => Err(DispatchError::MalformedResponse {
                    provider,
                    reason: "no text".to_string(),
                }),
            }
        }
    }

    fn service(
        transport: ScriptedTransport,
        keys: &[(&str, &str)],
    ) -> DispatchService<ScriptedTransport> {
        let credentials: Credentials = keys.iter().copied().collect();
        DispatchService::new(transport, Arc::new(MemoryStore::new()), credentials)
    }

    fn history() -> Vec<HistoryEntry> {
        vec![HistoryEntry::user("What's on my calendar?")]
    }

    // ── Selection ──

    #[test]
    fn test_default_selection() {
        let svc = service(ScriptedTransport::default(), &[]);
        assert_eq!(svc.active_provider().id, "groq");
        assert_eq!(svc.active_model(), "llama-3.1-8b-instant");
        assert_eq!(svc.catalog().len(), 4);
    }

    #[test]
    fn test_select_provider_without_model_uses_first() {
        let mut svc = service(ScriptedTransport::default(), &[]);
        for provider in PROVIDERS {
            svc.select_provider(provider.id, None).unwrap();
            assert_eq!(svc.active_provider().id, provider.id);
            assert_eq!(svc.active_model(), provider.supported_models[0]);
        }
    }

    #[test]
    fn test_select_provider_with_valid_model() {
        let mut svc = service(ScriptedTransport::default(), &[]);
        let selection = svc.select_provider("openai", Some("gpt-4o-mini")).unwrap();
        assert_eq!(selection.model, "gpt-4o-mini");
    }

    #[test]
    fn test_select_provider_with_foreign_model_resets() {
        let mut svc = service(ScriptedTransport::default(), &[]);
        svc.select_provider("google", Some("gpt-4o")).unwrap();
        assert_eq!(svc.active_model(), "gemini-1.5-pro");
    }

    #[test]
    fn test_select_unknown_provider() {
        let mut svc = service(ScriptedTransport::default(), &[]);
        let err = svc.select_provider("cohere", None).unwrap_err();
        assert!(matches!(err, DispatchError::UnknownProvider(ref id) if id == "cohere"));
        assert_eq!(svc.active_provider().id, "groq");
    }

    #[test]
    fn test_selection_persists_and_restores() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut svc = DispatchService::new(
            ScriptedTransport::default(),
            store.clone(),
            Credentials::new(),
        );
        svc.select_provider("huggingface", Some("facebook/blenderbot-400M-distill"))
            .unwrap();
        assert_eq!(store.get("nova-ai-provider").as_deref(), Some("huggingface"));

        let restored = DispatchService::new(ScriptedTransport::default(), store, Credentials::new());
        assert_eq!(restored.active_provider().id, "huggingface");
        assert_eq!(restored.active_model(), "facebook/blenderbot-400M-distill");
    }

    #[test]
    fn test_restore_invalid_model_resets() {
        let store = MemoryStore::new();
        store.set("nova-ai-provider", "openai").unwrap();
        store.set("nova-ai-model", "gemini-pro").unwrap();
        let svc = DispatchService::new(ScriptedTransport::default(), Arc::new(store), Credentials::new());
        assert_eq!(svc.active_provider().id, "openai");
        assert_eq!(svc.active_model(), "gpt-4o");
    }

    #[test]
    fn test_restore_unknown_provider_uses_default() {
        let store = MemoryStore::new();
        store.set("nova-ai-provider", "anthropic").unwrap();
        let svc = DispatchService::new(ScriptedTransport::default(), Arc::new(store), Credentials::new());
        assert_eq!(svc.active_provider().id, "groq");
        assert_eq!(svc.active_model(), "llama-3.1-8b-instant");
    }

    #[test]
    fn test_with_fallback_unknown() {
        let svc = service(ScriptedTransport::default(), &[]);
        assert!(svc.with_fallback(Some("nope")).is_err());
    }

    // ── Credentials ──

    #[test]
    fn test_api_key_round_trip_per_provider() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut svc = DispatchService::new(ScriptedTransport::default(), store.clone(), Credentials::new());

        svc.set_api_key("gsk_1");
        assert_eq!(svc.get_api_key().unwrap().expose(), "gsk_1");

        svc.select_provider("openai", None).unwrap();
        assert!(svc.get_api_key().is_none());
        svc.set_api_key("sk-2");

        svc.select_provider("groq", None).unwrap();
        assert_eq!(svc.get_api_key().unwrap().expose(), "gsk_1");
        svc.select_provider("openai", None).unwrap();
        assert_eq!(svc.get_api_key().unwrap().expose(), "sk-2");

        assert_eq!(store.get("nova-groq-key").as_deref(), Some("gsk_1"));
        assert_eq!(store.get("nova-openai-key").as_deref(), Some("sk-2"));
    }

    #[test]
    fn test_empty_key_clears() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut svc = DispatchService::new(ScriptedTransport::default(), store.clone(), Credentials::new());
        svc.set_api_key("gsk_1");
        svc.set_api_key("");
        assert!(svc.get_api_key().is_none());
        assert!(store.get("nova-groq-key").is_none());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let mut svc = service(ScriptedTransport::default(), &[("groq", "gsk_topsecret")]);
        svc.set_api_key("gsk_other_secret");
        let debug = format!("{svc:?}");
        assert!(debug.contains("groq"));
        assert!(!debug.contains("topsecret"));
        assert!(!debug.contains("other_secret"));
    }

    // ── Generation ──

    #[tokio::test]
    async fn test_missing_credential_before_network() {
        let mut svc = service(ScriptedTransport::new(&[("groq", Outcome::Text("hi"))]), &[("groq", "gsk")]);
        svc.select_provider("openai", None).unwrap();

        let err = svc.generate_response(&history()).await.unwrap_err();
        assert!(matches!(err, DispatchError::MissingCredential { provider: "OpenAI" }));
        assert!(err.needs_reconnect());
        assert!(svc.transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_prompt_has_persona_and_tool_result() {
        let svc = service(
            ScriptedTransport::new(&[("groq", Outcome::Text("Done"))]),
            &[("groq", "gsk")],
        )
        .with_assistant_name("Nova");

        let entries = vec![
            HistoryEntry::user("Hi"),
            HistoryEntry::assistant("Hello!"),
            HistoryEntry::user("Summarize this")
                .with_tool_result(ToolResult::ok(serde_json::json!({"name": "notes.txt"}))),
        ];
        let reply = svc.generate_response(&entries).await.unwrap();
        assert_eq!(reply.text, "Done");
        assert!(!reply.used_fallback);

        let calls = svc.transport.calls();
        assert_eq!(calls.len(), 1);
        let messages = &calls[0].messages;
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.starts_with("You are Nova"));
        assert_eq!(messages[2].role, Role::Assistant);
        assert!(messages[3].content.contains("[Tool result]"));
        assert!(messages[3].content.contains("notes.txt"));
    }

    #[tokio::test]
    async fn test_malformed_response_placeholder_without_fallback() {
        let mut svc = service(
            ScriptedTransport::new(&[("openai", Outcome::Malformed), ("groq", Outcome::Text("x"))]),
            &[("openai", "sk"), ("groq", "gsk")],
        );
        svc.select_provider("openai", None).unwrap();

        let reply = svc.generate_response(&history()).await.unwrap();
        assert_eq!(reply.text, PLACEHOLDER_REPLY);
        assert_eq!(reply.provider, "openai");
        assert!(!reply.used_fallback);
        assert_eq!(svc.transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_fallback_on_failure() {
        let mut svc = service(
            ScriptedTransport::new(&[
                ("google", Outcome::Status(500)),
                ("groq", Outcome::Text("from groq")),
            ]),
            &[("google", "AIza"), ("groq", "gsk_fb")],
        );
        svc.select_provider("google", Some("gemini-1.5-flash")).unwrap();

        let reply = svc.generate_response(&history()).await.unwrap();
        assert_eq!(reply.text, "from groq");
        assert_eq!(reply.provider, "groq");
        assert_eq!(reply.model, "llama-3.1-70b-versatile");
        assert!(reply.used_fallback);

        let calls = svc.transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].provider, "google");
        assert_eq!(calls[0].model, "gemini-1.5-flash");
        assert_eq!(calls[0].key, "AIza");
        assert_eq!(calls[1].provider, "groq");
        assert_eq!(calls[1].key, "gsk_fb");

        assert_eq!(svc.active_provider().id, "google");
        assert_eq!(svc.active_model(), "gemini-1.5-flash");
    }

    #[tokio::test]
    async fn test_both_fail_returns_original_error() {
        let mut svc = service(
            ScriptedTransport::new(&[("openai", Outcome::Status(401)), ("groq", Outcome::Status(503))]),
            &[("openai", "sk"), ("groq", "gsk")],
        );
        svc.select_provider("openai", Some("gpt-4o-mini")).unwrap();
        let before = svc.selection().clone();

        let err = svc.generate_response(&history()).await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert!(err.needs_reconnect());
        assert_eq!(svc.selection(), &before);
        assert_eq!(svc.transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_no_fallback_key_returns_original_error() {
        let mut svc = service(
            ScriptedTransport::new(&[("openai", Outcome::Status(429))]),
            &[("openai", "sk")],
        );
        svc.select_provider("openai", None).unwrap();

        let err = svc.generate_response(&history()).await.unwrap_err();
        assert_eq!(err.status(), Some(429));
        assert_eq!(svc.transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_default_provider_failure_has_no_fallback() {
        let svc = service(
            ScriptedTransport::new(&[("groq", Outcome::Status(500))]),
            &[("groq", "gsk")],
        );

        let err = svc.generate_response(&history()).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(svc.transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_fallback_disabled() {
        let mut svc = service(
            ScriptedTransport::new(&[("openai", Outcome::Status(500)), ("groq", Outcome::Text("x"))]),
            &[("openai", "sk"), ("groq", "gsk")],
        )
        .with_fallback(None)
        .unwrap();
        svc.select_provider("openai", None).unwrap();

        assert!(svc.generate_response(&history()).await.is_err());
        assert_eq!(svc.transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_calls_see_same_selection() {
        let mut svc = service(
            ScriptedTransport::new(&[
                ("huggingface", Outcome::Status(503)),
                ("groq", Outcome::Text("ok")),
            ]),
            &[("huggingface", "hf"), ("groq", "gsk")],
        );
        svc.select_provider("huggingface", None).unwrap();

        let (first, second) = (history(), history());
        let (a, b) = tokio::join!(
            svc.generate_response(&first),
            svc.generate_response(&second)
        );
        assert!(a.unwrap().used_fallback);
        assert!(b.unwrap().used_fallback);

        let calls = svc.transport.calls();
        assert_eq!(calls.iter().filter(|c| c.provider == "huggingface").count(), 2);
        assert_eq!(calls.iter().filter(|c| c.provider == "groq").count(), 2);
        assert_eq!(svc.active_provider().id, "huggingface");
    }

    // ── Full stack over HTTP ──

    #[tokio::test]
    async fn test_http_fallback_end_to_end() {
        use wiremock::matchers::{header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let openai = MockServer::start().await;
        let groq = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": {"message": "upstream down"}
            })))
            .expect(1)
            .mount(&openai)
            .await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer gsk_live"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "hello"}}]
            })))
            .expect(1)
            .mount(&groq)
            .await;

        let transport = HttpTransport::new(std::time::Duration::from_secs(5))
            .unwrap()
            .with_api_base("openai", openai.uri())
            .with_api_base("groq", groq.uri());
        let credentials: Credentials = [("openai", "sk_live"), ("groq", "gsk_live")]
            .into_iter()
            .collect();
        let mut svc = DispatchService::new(transport, Arc::new(MemoryStore::new()), credentials);
        svc.select_provider("openai", None).unwrap();

        let reply = svc.generate_response(&history()).await.unwrap();
        assert_eq!(reply.text, "hello");
        assert_eq!(reply.provider, "groq");
        assert!(reply.used_fallback);
        assert_eq!(svc.active_provider().id, "openai");
    }
}
