//! Configuration system: schema, loading, and env var overrides.
//!
//! # Usage
//! ```no_run
//! use nova_core::config;
//!
//! let cfg = config::load_config(None);
//! println!("Fallback provider: {}", cfg.fallback.provider);
//! ```

pub mod loader;
pub mod schema;

// Re-export key types
pub use loader::{get_config_path, load_config};
pub use schema::{Config, ProviderConfig};
