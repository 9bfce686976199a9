//! Content-audit pipeline: gap analysis, then drafted fixes.
//!
//! The audit only drafts text. Nothing is ever written back to the audited page.

use std::time::{Duration, Instant};

use tracing::{info, instrument};

use seoforge_shared::{AuditOutput, AuditRequest, Phase, PipelineMode, Result, RunId};

use crate::llm::CompletionService;
use crate::pipeline::{PhaseRunner, PipelineConfig};
use crate::progress::ProgressReporter;
use crate::prompts;

/// Result of [`run_audit`].
#[derive(Debug)]
pub struct AuditRun {
    pub run_id: RunId,
    pub output: AuditOutput,
    pub elapsed: Duration,
}

/// Compare `my_url` against `competitor_url` and draft three fixing paragraphs.
///
/// Both pages are scraped inside the first phase. The same URL on both sides
/// is accepted and simply scraped twice.
#[instrument(skip_all, fields(keyword = %request.target_keyword, model = llm.model()))]
pub async fn run_audit(
    config: &PipelineConfig,
    request: &AuditRequest,
    llm: &dyn CompletionService,
    progress: &dyn ProgressReporter,
) -> Result<AuditRun> {
    let request = request.validate()?;
    let scraper = config.scraper()?;
    let start = Instant::now();
    let run_id = RunId::new();
    let runner = PhaseRunner::new(&config.persona, llm, progress);

    info!(%run_id, my_url = %request.my_url, competitor_url = %request.competitor_url, "starting audit");

    runner.start(Phase::GapAnalysis);
    let my_text = scraper.scrape(&request.my_url).await;
    let competitor_text = scraper.scrape(&request.competitor_url).await;
    let audit = runner
        .complete(
            Phase::GapAnalysis,
            &prompts::gap_analysis_prompt(
                &request.target_keyword,
                &request.my_url,
                &my_text,
                &request.competitor_url,
                &competitor_text,
            ),
        )
        .await?;

    let fixes = runner
        .run(
            Phase::GapFix,
            &prompts::gap_fix_prompt(&audit, &config.style, &config.persona),
        )
        .await?;

    let elapsed = start.elapsed();
    info!(%run_id, elapsed_ms = elapsed.as_millis() as u64, "audit complete");
    progress.done(PipelineMode::Audit, elapsed);

    Ok(AuditRun {
        run_id,
        output: AuditOutput { audit, fixes },
        elapsed,
    })
}
