//! Saving pipeline results to disk.
//!
//! Files are written atomically (temp file, then rename) so an interrupted
//! run never leaves a half-written article behind.

mod report;

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use seoforge_shared::{PipelineMode, Result, RunId, SeoForgeError};

pub use report::{render_article_report, render_audit_report};

/// Metadata about a written artifact.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactMeta {
    pub path: PathBuf,
    pub size_bytes: usize,
    pub sha256: String,
}

/// File name for a generated article: `{keyword}_article.md`, spaces as `_`.
pub fn article_file_name(primary_keyword: &str) -> String {
    static HOSTILE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1f]"#).expect("valid regex"));

    let stem = primary_keyword.trim().replace(' ', "_");
    let stem = HOSTILE_RE.replace_all(&stem, "");
    let stem = stem.trim_matches('.');
    if stem.is_empty() {
        "untitled_article.md".to_string()
    } else {
        format!("{stem}_article.md")
    }
}

/// File name for a full run report.
pub fn report_file_name(mode: PipelineMode, run_id: &RunId) -> String {
    format!("seoforge_{}_{run_id}.md", mode.as_str().replace('-', "_"))
}

/// Write `content` to `dir/name`, creating `dir` if needed.
#[instrument(skip(content), fields(dir = %dir.display()))]
pub fn write_artifact(dir: &Path, name: &str, content: &str) -> Result<ArtifactMeta> {
    std::fs::create_dir_all(dir).map_err(|e| SeoForgeError::io(dir, e))?;

    let target = dir.join(name);
    let temp = dir.join(format!(".{name}.tmp"));

    std::fs::write(&temp, content).map_err(|e| SeoForgeError::io(&temp, e))?;
    std::fs::rename(&temp, &target).map_err(|e| SeoForgeError::io(&target, e))?;

    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let sha256 = format!("{:x}", hasher.finalize());

    debug!(file = %name, size = content.len(), "wrote artifact");

    Ok(ArtifactMeta {
        path: target,
        size_bytes: content.len(),
        sha256,
    })
}
