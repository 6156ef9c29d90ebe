//! LLM provider layer for Nova.
//!
//! # Architecture
//!
//! - [`registry`] - static catalog of supported providers
//! - [`wire`] - request/response shapes per provider family
//! - [`traits::ChatTransport`] - the seam between dispatch and HTTP
//! - [`http_transport::HttpTransport`] - reqwest implementation of the seam
//! - [`credentials`] - per-provider API keys as an explicit mapping
//! - [`service::DispatchService`] - selection state, persona, fallback

pub mod credentials;
pub mod error;
pub mod http_transport;
pub mod registry;
pub mod service;
pub mod traits;
pub mod wire;

// Re-export main types for convenience
pub use credentials::{ApiKey, Credentials};
pub use error::DispatchError;
pub use http_transport::HttpTransport;
pub use registry::{ProviderDescriptor, TrialType, PROVIDERS};
pub use service::{DispatchService, Reply, Selection, PLACEHOLDER_REPLY};
pub use traits::{CallTarget, ChatTransport, GenerationParams};
pub use wire::ProviderFamily;
