//! New-article pipeline: keywords → competitor outline → draft → meta → internal links.

use std::time::{Duration, Instant};

use tracing::{debug, info, instrument};

use seoforge_discovery::{MAX_SITEMAP_URLS, SitemapOptions, fetch_sitemap};
use seoforge_scraper::{ScrapeOptions, Scraper};
use seoforge_shared::{
    AppConfig, ArticleOutput, ArticleRequest, Phase, PhaseStatus, PipelineMode, Result, RunId,
    ScrapeConfig, StyleProfile,
};

use crate::llm::{CompletionService, prompt_chars};
use crate::progress::{self, ProgressReporter};
use crate::prompts::{self, Persona};

/// Settings shared by both pipelines.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Brand, audience, and site name woven into every prompt.
    pub persona: Persona,
    /// Truncation budget and writing constraints for this run.
    pub style: StyleProfile,
    /// Sitemap consulted by the internal-linking phase.
    pub sitemap_url: String,
    /// Sitemap fetch options.
    pub sitemap: SitemapOptions,
    /// Page scraping options (timeout, user agent).
    pub scrape: ScrapeConfig,
}

impl PipelineConfig {
    pub fn from_app_config(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            persona: Persona::from_site(&config.site),
            style: config.style_profile()?,
            sitemap_url: config.site.sitemap_url.clone(),
            sitemap: SitemapOptions {
                timeout_secs: config.scrape.timeout_secs,
                max_urls: MAX_SITEMAP_URLS,
            },
            scrape: config.scrape.clone(),
        })
    }

    pub(crate) fn scraper(&self) -> Result<Scraper> {
        Scraper::new(ScrapeOptions::from_config(
            &self.scrape,
            self.style.scrape_char_limit,
        ))
    }
}

/// Result of [`generate_article`].
#[derive(Debug)]
pub struct ArticleRun {
    pub run_id: RunId,
    pub output: ArticleOutput,
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// Phase runner
// ---------------------------------------------------------------------------

/// Runs one completion per phase and reports the transitions.
pub(crate) struct PhaseRunner<'a> {
    llm: &'a dyn CompletionService,
    progress: &'a dyn ProgressReporter,
    system: String,
}

impl<'a> PhaseRunner<'a> {
    pub(crate) fn new(
        persona: &Persona,
        llm: &'a dyn CompletionService,
        progress: &'a dyn ProgressReporter,
    ) -> Self {
        Self {
            llm,
            progress,
            system: persona.system_instruction(),
        }
    }

    /// Emit `Started` for `phase`. Work done before [`Self::complete`] counts
    /// toward the phase.
    pub(crate) fn start(&self, phase: Phase) {
        info!(phase = %phase, "{}", phase.label());
        progress::emit(self.progress, phase, PhaseStatus::Started);
    }

    /// Send `prompt` and emit `Completed` or `Failed` for `phase`.
    pub(crate) async fn complete(&self, phase: Phase, prompt: &str) -> Result<String> {
        debug!(phase = %phase, prompt_chars = prompt_chars(prompt), "sending prompt");
        match self.llm.complete(&self.system, prompt).await {
            Ok(text) => {
                progress::emit(self.progress, phase, PhaseStatus::Completed);
                Ok(text)
            }
            Err(e) => {
                tracing::error!(phase = %phase, error = %e, "phase failed");
                progress::emit(self.progress, phase, PhaseStatus::Failed);
                Err(e)
            }
        }
    }

    /// [`Self::start`] followed by [`Self::complete`].
    pub(crate) async fn run(&self, phase: Phase, prompt: &str) -> Result<String> {
        self.start(phase);
        self.complete(phase, prompt).await
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run the five article phases in order.
///
/// Inputs are validated before any network or completion call. Competitor
/// pages are scraped inside phase 2 and the sitemap is fetched inside
/// phase 5; neither can fail the run. Any completion error aborts the run
/// and no partial output is returned.
#[instrument(skip_all, fields(keyword = %request.primary_keyword, model = llm.model()))]
pub async fn generate_article(
    config: &PipelineConfig,
    request: &ArticleRequest,
    llm: &dyn CompletionService,
    progress: &dyn ProgressReporter,
) -> Result<ArticleRun> {
    let request = request.validate()?;
    let scraper = config.scraper()?;
    let start = Instant::now();
    let run_id = RunId::new();
    let runner = PhaseRunner::new(&config.persona, llm, progress);

    info!(%run_id, competitors = request.competitor_urls.len(), profile = %config.style.name, "starting article pipeline");

    // --- Phase 1: keyword expansion ---
    let keywords = runner
        .run(
            Phase::KeywordExpansion,
            &prompts::keyword_prompt(&request.primary_keyword, &request.secondary_keywords),
        )
        .await?;

    // --- Phase 2: competitor outline ---
    runner.start(Phase::CompetitorOutline);
    let mut competitor_data = String::new();
    for url in &request.competitor_urls {
        let text = scraper.scrape(url).await;
        competitor_data.push_str(&prompts::competitor_block(url, &text));
    }
    let outline = runner
        .complete(
            Phase::CompetitorOutline,
            &prompts::outline_prompt(&keywords, &request.primary_keyword, &competitor_data),
        )
        .await?;

    // --- Phase 3: draft ---
    let article = runner
        .run(
            Phase::ArticleDraft,
            &prompts::article_prompt(&outline, &keywords, &config.style, &config.persona),
        )
        .await?;

    // --- Phase 4: meta ---
    let meta = runner
        .run(Phase::MetaGeneration, &prompts::meta_prompt(&article))
        .await?;

    // --- Phase 5: internal links ---
    runner.start(Phase::InternalLinking);
    let sitemap_urls = fetch_sitemap(&config.sitemap_url, &config.sitemap).await;
    let internal_links = runner
        .complete(
            Phase::InternalLinking,
            &prompts::link_prompt(
                &request.primary_keyword,
                &config.persona.site_host,
                &prompts::links_context(&sitemap_urls),
            ),
        )
        .await?;

    let elapsed = start.elapsed();
    info!(%run_id, elapsed_ms = elapsed.as_millis() as u64, "article pipeline complete");
    progress.done(PipelineMode::NewArticle, elapsed);

    Ok(ArticleRun {
        run_id,
        output: ArticleOutput {
            keywords,
            outline,
            article,
            meta,
            internal_links,
        },
        elapsed,
    })
}
