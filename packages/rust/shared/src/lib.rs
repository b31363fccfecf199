//! Shared types, error model, and configuration for topicgen.
//!
//! This crate is the foundation depended on by all other topicgen crates.
//! It provides:
//! - [`TopicGenError`] — the unified error type
//! - Domain types ([`Domain`], [`TopicCount`], [`ExistingTopicSet`], [`RepoSlug`], ...)
//! - Configuration ([`RunConfig`] from the environment, [`Settings`] from TOML)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    DEFAULT_SETTINGS_FILE, DatasetConfig, GeminiConfig, GitHubConfig, RunConfig, Secret,
    Settings, load_settings, load_settings_from,
};
pub use error::{Result, TopicGenError, truncate_body};
pub use types::{
    Domain, ExistingTopicSet, GeneratedText, GenerationRequest, RepoSlug, Topic, TopicCount,
};
