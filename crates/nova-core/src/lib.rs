//! Core building blocks for Nova.
//!
//! - [`types`] - conversation messages, history entries, tool results
//! - [`config`] - `~/.nova/config.json` schema, loader, env overrides
//! - [`store`] - key-value state store standing in for client-local storage
//! - [`history`] - saved chats, folders, search, and export
//! - [`tools`] - file analysis attached to user messages
//! - [`utils`] - data paths and small string helpers

pub mod config;
pub mod history;
pub mod store;
pub mod tools;
pub mod types;
pub mod utils;
