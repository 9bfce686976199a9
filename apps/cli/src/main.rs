//! SeoForge CLI: keyword-driven SEO articles and content-gap audits.
//!
//! Expands keywords, studies competitor pages, drafts the article, writes
//! its meta data, and suggests internal links drawn from the site's sitemap.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
