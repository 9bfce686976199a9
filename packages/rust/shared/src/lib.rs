//! Shared types, error model, and configuration for SeoForge.
//!
//! This crate is the foundation depended on by all other SeoForge crates.
//! It provides:
//! - [`SeoForgeError`]: the unified error type
//! - Domain types ([`ArticleRequest`], [`AuditRequest`], [`PhaseEvent`], [`StyleProfile`])
//! - Configuration ([`AppConfig`], config loading, API key resolution)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_USER_AGENT, OpenAiConfig, ScrapeConfig, SiteConfig, StyleConfig,
    config_dir, config_file_path, init_config, load_config, load_config_from, resolve_api_key,
};
pub use error::{Result, SeoForgeError};
pub use types::{
    ArticleOutput, ArticleRequest, AuditOutput, AuditRequest, MAX_COMPETITORS, Phase, PhaseEvent,
    PhaseStatus, PipelineMode, RunId, StyleProfile,
};
