//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use seoforge_artifacts::{
    ArtifactMeta, article_file_name, render_article_report, render_audit_report,
    report_file_name, write_artifact,
};
use seoforge_core::{
    OpenAiCompletion, OpenAiSettings, PipelineConfig, ProgressReporter, generate_article,
    run_audit,
};
use seoforge_shared::{
    AppConfig, ArticleRequest, AuditRequest, PhaseEvent, PhaseStatus,
    PipelineMode, StyleProfile, init_config, load_config, load_config_from, resolve_api_key,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// SeoForge: keyword-driven SEO content generation.
#[derive(Parser)]
#[command(
    name = "seoforge",
    version,
    about = "Generate SEO articles from keywords and competitor pages, or audit a page against a competitor.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Completion API key (overrides the configured env var).
    #[arg(long, env = "SEOFORGE_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Style profile: classic or extended.
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Sitemap consulted for internal links.
    #[arg(long, global = true)]
    pub sitemap_url: Option<String>,

    /// Config file to use instead of ~/.seoforge/seoforge.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate a new SEO article for a keyword.
    Article {
        /// Keyword the article must rank for.
        primary_keyword: String,

        /// Secondary keywords, free text (comma separated).
        #[arg(short, long, default_value = "")]
        secondary: String,

        /// Competitor page to study (repeat up to 3 times).
        #[arg(short, long = "competitor")]
        competitors: Vec<String>,

        /// Directory for the article file (defaults to the working directory).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Also write a full Markdown report of every phase.
        #[arg(long)]
        report: bool,

        /// Print outputs as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Audit your page against a higher-ranking competitor.
    Audit {
        /// Keyword both pages compete for.
        #[arg(short, long)]
        keyword: String,

        /// Your page.
        #[arg(long)]
        my_url: String,

        /// The competitor page.
        #[arg(long)]
        competitor_url: String,

        /// Directory to write the audit report into.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Print outputs as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
///
/// Logs go to stderr so `--json` output on stdout stays machine-readable.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "seoforge=info",
        1 => "seoforge=debug",
        _ => "seoforge=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    if let Command::Config {
        action: ConfigAction::Init,
    } = &cli.command
    {
        return cmd_config_init();
    }

    let config = resolve_config(&cli)?;

    match &cli.command {
        Command::Article {
            primary_keyword,
            secondary,
            competitors,
            out,
            report,
            json,
        } => {
            let request = article_request(primary_keyword, secondary, competitors)?;
            cmd_article(&cli, &config, request, out.as_deref(), *report, *json).await
        }
        Command::Audit {
            keyword,
            my_url,
            competitor_url,
            out,
            json,
        } => {
            let request = AuditRequest {
                target_keyword: keyword.clone(),
                my_url: my_url.clone(),
                competitor_url: competitor_url.clone(),
            }
            .validate()?;
            cmd_audit(&cli, &config, request, out.as_deref(), *json).await
        }
        Command::Config { .. } => cmd_config_show(&config),
    }
}

/// Load the config file and apply flag overrides.
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    if let Some(profile) = &cli.profile {
        StyleProfile::by_name(profile)?;
        config.style.profile = profile.clone();
    }
    if let Some(url) = &cli.sitemap_url {
        config.site.sitemap_url = url.clone();
    }
    Ok(config)
}

/// Build the article request from flags, normalized once for the pipeline
/// and the report alike.
fn article_request(
    primary_keyword: &str,
    secondary: &str,
    competitors: &[String],
) -> Result<ArticleRequest> {
    Ok(ArticleRequest {
        primary_keyword: primary_keyword.to_string(),
        secondary_keywords: secondary.to_string(),
        competitor_urls: competitors.to_vec(),
    }
    .validate()?)
}

fn completion_client(cli: &Cli, config: &AppConfig) -> Result<OpenAiCompletion> {
    let api_key = resolve_api_key(config, cli.api_key.as_deref())?;
    Ok(OpenAiCompletion::new(OpenAiSettings::from_config(
        &config.openai,
        api_key,
    ))?)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_article(
    cli: &Cli,
    config: &AppConfig,
    request: ArticleRequest,
    out: Option<&Path>,
    report: bool,
    json: bool,
) -> Result<()> {
    let llm = completion_client(cli, config)?;
    let pipeline = PipelineConfig::from_app_config(config)?;

    info!(keyword = %request.primary_keyword, model = %config.openai.model, "generating article");

    let reporter = CliProgress::new(PipelineMode::NewArticle, !json);
    let run = generate_article(&pipeline, &request, &llm, &reporter).await?;

    let out_dir = match out {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().map_err(|e| eyre!("cannot determine working directory: {e}"))?,
    };

    let mut written = vec![write_artifact(
        &out_dir,
        &article_file_name(&request.primary_keyword),
        &run.output.article,
    )?];
    if report {
        let doc = render_article_report(&run.run_id, chrono::Utc::now(), &request, &run.output);
        written.push(write_artifact(
            &out_dir,
            &report_file_name(PipelineMode::NewArticle, &run.run_id),
            &doc,
        )?);
    }

    if json {
        print_json(PipelineMode::NewArticle, &run.run_id, run.elapsed, &run.output, &written)?;
        return Ok(());
    }

    print_section(1, "Keywords", &run.output.keywords);
    print_section(2, "Outline", &run.output.outline);
    print_section(3, "Article", &run.output.article);
    print_section(4, "Meta Data", &run.output.meta);
    print_section(5, "Internal Links", &run.output.internal_links);
    print_summary(&run.run_id, run.elapsed, &written);

    Ok(())
}

async fn cmd_audit(
    cli: &Cli,
    config: &AppConfig,
    request: AuditRequest,
    out: Option<&Path>,
    json: bool,
) -> Result<()> {
    let llm = completion_client(cli, config)?;
    let pipeline = PipelineConfig::from_app_config(config)?;

    info!(keyword = %request.target_keyword, "auditing page");

    let reporter = CliProgress::new(PipelineMode::Audit, !json);
    let run = run_audit(&pipeline, &request, &llm, &reporter).await?;

    let mut written = Vec::new();
    if let Some(dir) = out {
        let doc = render_audit_report(&run.run_id, chrono::Utc::now(), &request, &run.output);
        written.push(write_artifact(
            dir,
            &report_file_name(PipelineMode::Audit, &run.run_id),
            &doc,
        )?);
    }

    if json {
        print_json(PipelineMode::Audit, &run.run_id, run.elapsed, &run.output, &written)?;
        return Ok(());
    }

    print_section(1, "Gap Analysis", &run.output.audit);
    print_section(2, "Suggested Fixes", &run.output.fixes);
    print_summary(&run.run_id, run.elapsed, &written);

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn print_section(number: usize, title: &str, body: &str) {
    println!();
    println!("### {number}. {title}");
    println!();
    println!("{}", body.trim_end());
}

fn print_summary(run_id: &impl std::fmt::Display, elapsed: Duration, written: &[ArtifactMeta]) {
    println!();
    println!("  Run:   {run_id}");
    println!("  Time:  {:.1}s", elapsed.as_secs_f64());
    for meta in written {
        println!("  Saved: {} ({} bytes)", meta.path.display(), meta.size_bytes);
    }
    println!();
}

fn print_json(
    mode: PipelineMode,
    run_id: &impl std::fmt::Display,
    elapsed: Duration,
    output: &impl serde::Serialize,
    written: &[ArtifactMeta],
) -> Result<()> {
    let value = serde_json::json!({
        "run_id": run_id.to_string(),
        "mode": mode,
        "elapsed_ms": elapsed.as_millis() as u64,
        "output": output,
        "artifacts": written,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
    total: usize,
    step: AtomicUsize,
}

impl CliProgress {
    fn new(mode: PipelineMode, visible: bool) -> Self {
        let spinner = if visible {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self {
            spinner,
            total: mode.phases().len(),
            step: AtomicUsize::new(0),
        }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, event: &PhaseEvent) {
        let label = event.phase.label();
        match event.status {
            PhaseStatus::Started => {
                let step = self.step.fetch_add(1, Ordering::Relaxed) + 1;
                self.spinner
                    .set_message(format!("[{step}/{}] {label}...", self.total));
            }
            PhaseStatus::Completed => self.spinner.println(format!("  ✓ {label}")),
            PhaseStatus::Failed => {
                self.spinner.println(format!("  ✗ {label}"));
                self.spinner.finish_and_clear();
            }
        }
    }

    fn done(&self, _mode: PipelineMode, _elapsed: Duration) {
        self.spinner.finish_and_clear();
    }
}
