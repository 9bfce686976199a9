//! Markdown run reports.

use chrono::{DateTime, Utc};

use seoforge_shared::{ArticleOutput, ArticleRequest, AuditOutput, AuditRequest, RunId};

/// Render a new-article run as a single Markdown document.
pub fn render_article_report(
    run_id: &RunId,
    created_at: DateTime<Utc>,
    request: &ArticleRequest,
    output: &ArticleOutput,
) -> String {
    let competitors = if request.competitor_urls.is_empty() {
        "none".to_string()
    } else {
        request.competitor_urls.join(", ")
    };
    let secondary = if request.secondary_keywords.trim().is_empty() {
        "none"
    } else {
        request.secondary_keywords.trim()
    };

    let mut doc = header(
        &format!("Article: {}", request.primary_keyword),
        run_id,
        created_at,
        &[
            ("Primary keyword", request.primary_keyword.as_str()),
            ("Secondary keywords", secondary),
            ("Competitors", competitors.as_str()),
        ],
    );
    push_section(&mut doc, 1, "Keywords", &output.keywords);
    push_section(&mut doc, 2, "Outline", &output.outline);
    push_section(&mut doc, 3, "Article", &output.article);
    push_section(&mut doc, 4, "Meta Data", &output.meta);
    push_section(&mut doc, 5, "Internal Links", &output.internal_links);
    doc
}

/// Render a content-audit run as a single Markdown document.
pub fn render_audit_report(
    run_id: &RunId,
    created_at: DateTime<Utc>,
    request: &AuditRequest,
    output: &AuditOutput,
) -> String {
    let mut doc = header(
        &format!("Content Audit: {}", request.target_keyword),
        run_id,
        created_at,
        &[
            ("Target keyword", request.target_keyword.as_str()),
            ("My page", request.my_url.as_str()),
            ("Competitor", request.competitor_url.as_str()),
        ],
    );
    push_section(&mut doc, 1, "Gap Analysis", &output.audit);
    push_section(&mut doc, 2, "Suggested Fixes", &output.fixes);
    doc
}

fn header(title: &str, run_id: &RunId, created_at: DateTime<Utc>, inputs: &[(&str, &str)]) -> String {
    let mut doc = format!(
        "# {title}\n\n- **Run:** `{run_id}`\n- **Generated:** {}\n",
        created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    for (label, value) in inputs {
        doc.push_str(&format!("- **{label}:** {value}\n"));
    }
    doc
}

fn push_section(doc: &mut String, number: usize, title: &str, body: &str) {
    doc.push_str(&format!("\n## {number}. {title}\n\n{}\n", body.trim_end()));
}
