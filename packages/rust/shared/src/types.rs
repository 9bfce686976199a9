//! Core domain types for SeoForge pipeline runs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, SeoForgeError};

/// Maximum number of competitor URLs accepted by the article pipeline.
pub const MAX_COMPETITORS: usize = 3;

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one pipeline invocation (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Inputs for the new-article pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleRequest {
    /// The keyword the article must rank for.
    pub primary_keyword: String,
    /// Free-text blob of secondary keywords, passed through as-is.
    #[serde(default)]
    pub secondary_keywords: String,
    /// Competitor pages to scrape for the outline phase.
    #[serde(default)]
    pub competitor_urls: Vec<String>,
}

impl ArticleRequest {
    /// Check required inputs and normalize the competitor list.
    ///
    /// Blank competitor entries are dropped; more than [`MAX_COMPETITORS`]
    /// remaining entries is an error.
    pub fn validate(&self) -> Result<Self> {
        let primary_keyword = self.primary_keyword.trim();
        if primary_keyword.is_empty() {
            return Err(SeoForgeError::validation("please enter a primary keyword"));
        }

        let competitor_urls: Vec<String> = self
            .competitor_urls
            .iter()
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
            .map(String::from)
            .collect();

        if competitor_urls.len() > MAX_COMPETITORS {
            return Err(SeoForgeError::validation(format!(
                "at most {MAX_COMPETITORS} competitor URLs are supported, got {}",
                competitor_urls.len()
            )));
        }

        Ok(Self {
            primary_keyword: primary_keyword.to_string(),
            secondary_keywords: self.secondary_keywords.clone(),
            competitor_urls,
        })
    }
}

/// Inputs for the content-audit pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditRequest {
    /// The keyword both pages compete for.
    pub target_keyword: String,
    /// The page being audited.
    pub my_url: String,
    /// The higher-ranking competitor page.
    pub competitor_url: String,
}

impl AuditRequest {
    /// Check that the keyword and both URLs are present.
    pub fn validate(&self) -> Result<Self> {
        let target_keyword = self.target_keyword.trim();
        let my_url = self.my_url.trim();
        let competitor_url = self.competitor_url.trim();

        if target_keyword.is_empty() {
            return Err(SeoForgeError::validation("please enter a target keyword"));
        }
        if my_url.is_empty() || competitor_url.is_empty() {
            return Err(SeoForgeError::validation(
                "please enter both your URL and the competitor URL",
            ));
        }

        Ok(Self {
            target_keyword: target_keyword.to_string(),
            my_url: my_url.to_string(),
            competitor_url: competitor_url.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Everything the new-article pipeline produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleOutput {
    pub keywords: String,
    pub outline: String,
    pub article: String,
    pub meta: String,
    pub internal_links: String,
}

/// Everything the content-audit pipeline produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditOutput {
    pub audit: String,
    pub fixes: String,
}

// ---------------------------------------------------------------------------
// Modes, phases, progress events
// ---------------------------------------------------------------------------

/// Which pipeline a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineMode {
    NewArticle,
    Audit,
}

impl PipelineMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewArticle => "new-article",
            Self::Audit => "audit",
        }
    }

    /// Phases run by this mode, in execution order.
    pub fn phases(&self) -> &'static [Phase] {
        match self {
            Self::NewArticle => &[
                Phase::KeywordExpansion,
                Phase::CompetitorOutline,
                Phase::ArticleDraft,
                Phase::MetaGeneration,
                Phase::InternalLinking,
            ],
            Self::Audit => &[Phase::GapAnalysis, Phase::GapFix],
        }
    }
}

impl std::fmt::Display for PipelineMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One prompt-and-response step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    KeywordExpansion,
    CompetitorOutline,
    ArticleDraft,
    MetaGeneration,
    InternalLinking,
    GapAnalysis,
    GapFix,
}

impl Phase {
    /// Stable identifier used in logs and JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeywordExpansion => "keyword_expansion",
            Self::CompetitorOutline => "competitor_outline",
            Self::ArticleDraft => "article_draft",
            Self::MetaGeneration => "meta_generation",
            Self::InternalLinking => "internal_linking",
            Self::GapAnalysis => "gap_analysis",
            Self::GapFix => "gap_fix",
        }
    }

    /// Human-readable status line shown while the phase runs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::KeywordExpansion => "Analyzing and expanding keywords",
            Self::CompetitorOutline => "Scraping and analyzing competitors",
            Self::ArticleDraft => "Writing the article",
            Self::MetaGeneration => "Generating meta data",
            Self::InternalLinking => "Finding internal linking opportunities",
            Self::GapAnalysis => "Comparing your page against the competitor",
            Self::GapFix => "Drafting content fixes",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Started,
    Completed,
    Failed,
}

/// A phase transition emitted by the orchestration layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseEvent {
    pub phase: Phase,
    pub status: PhaseStatus,
}

impl PhaseEvent {
    pub fn new(phase: Phase, status: PhaseStatus) -> Self {
        Self { phase, status }
    }
}

// ---------------------------------------------------------------------------
// StyleProfile
// ---------------------------------------------------------------------------

/// Truncation budget and writing constraints shared by every phase of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleProfile {
    /// Preset name (`classic` or `extended`).
    pub name: String,
    /// Maximum characters of scraped text per page.
    pub scrape_char_limit: usize,
    /// Punctuation mark the model must never use, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banned_punctuation: Option<String>,
}

impl StyleProfile {
    /// 2000-character scrapes, no punctuation ban.
    pub fn classic() -> Self {
        Self {
            name: "classic".into(),
            scrape_char_limit: 2000,
            banned_punctuation: None,
        }
    }

    /// 3000-character scrapes, em dashes banned.
    pub fn extended() -> Self {
        Self {
            name: "extended".into(),
            scrape_char_limit: 3000,
            banned_punctuation: Some("\u{2014}".into()),
        }
    }

    /// Look up a preset by name.
    pub fn by_name(name: &str) -> Result<Self> {
        match name {
            "classic" => Ok(Self::classic()),
            "extended" => Ok(Self::extended()),
            other => Err(SeoForgeError::config(format!(
                "unknown style profile '{other}': expected 'classic' or 'extended'"
            ))),
        }
    }
}

impl Default for StyleProfile {
    fn default() -> Self {
        Self::classic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_id_roundtrip() {
        let id = RunId::new();
        let parsed: RunId = id.to_string().parse().expect("parse RunId");
        assert_eq!(id, parsed);
    }

    #[test]
    fn article_request_requires_primary_keyword() {
        let req = ArticleRequest {
            primary_keyword: "   ".into(),
            ..Default::default()
        };
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("primary keyword"));
    }

    #[test]
    fn article_request_drops_blank_competitors() {
        let req = ArticleRequest {
            primary_keyword: " remote hiring platform ".into(),
            secondary_keywords: "hire overseas".into(),
            competitor_urls: vec![
                "https://a.example.com".into(),
                "".into(),
                "  ".into(),
                "https://b.example.com".into(),
            ],
        };
        let valid = req.validate().unwrap();
        assert_eq!(valid.primary_keyword, "remote hiring platform");
        assert_eq!(
            valid.competitor_urls,
            vec!["https://a.example.com", "https://b.example.com"]
        );
    }

    #[test]
    fn article_request_rejects_too_many_competitors() {
        let req = ArticleRequest {
            primary_keyword: "kw".into(),
            secondary_keywords: String::new(),
            competitor_urls: (0..4).map(|i| format!("https://c{i}.example.com")).collect(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn audit_request_requires_both_urls() {
        let req = AuditRequest {
            target_keyword: "kw".into(),
            my_url: "https://mine.example.com".into(),
            competitor_url: String::new(),
        };
        assert!(req.validate().is_err());

        let req = AuditRequest {
            target_keyword: "kw".into(),
            my_url: "https://same.example.com".into(),
            competitor_url: "https://same.example.com".into(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn mode_phase_order() {
        assert_eq!(PipelineMode::NewArticle.phases().len(), 5);
        assert_eq!(PipelineMode::NewArticle.phases()[0], Phase::KeywordExpansion);
        assert_eq!(PipelineMode::NewArticle.phases()[4], Phase::InternalLinking);
        assert_eq!(PipelineMode::Audit.phases(), &[Phase::GapAnalysis, Phase::GapFix]);
    }

    #[test]
    fn style_profile_presets() {
        assert_eq!(StyleProfile::by_name("classic").unwrap().scrape_char_limit, 2000);
        let extended = StyleProfile::by_name("extended").unwrap();
        assert_eq!(extended.scrape_char_limit, 3000);
        assert_eq!(extended.banned_punctuation.as_deref(), Some("\u{2014}"));
        assert!(StyleProfile::by_name("loud").is_err());
    }

    #[test]
    fn phase_event_serializes_snake_case() {
        let event = PhaseEvent::new(Phase::MetaGeneration, PhaseStatus::Completed);
        let json = serde_json::to_string(&event).expect("serialize");
        assert_eq!(json, r#"{"phase":"meta_generation","status":"completed"}"#);
    }
}
