//! Pipeline orchestration for SeoForge.
//!
//! This crate ties together sitemap discovery, page scraping, and the
//! completion service into the two end-to-end workflows: new-article
//! generation ([`generate_article`]) and content audits ([`run_audit`]).

pub mod audit;
pub mod llm;
pub mod pipeline;
pub mod progress;
pub mod prompts;

#[cfg(test)]
mod test_support;

pub use audit::{AuditRun, run_audit};
pub use llm::{CompletionService, OpenAiCompletion, OpenAiSettings};
pub use pipeline::{ArticleRun, PipelineConfig, generate_article};
pub use progress::{ProgressReporter, SilentProgress};
pub use prompts::Persona;
