//! Prompt templates for every phase.
//!
//! Each builder is a pure function of the previous phases' outputs, so the
//! exact text handed to the completion service can be asserted in tests.

use seoforge_shared::{SiteConfig, StyleProfile};

/// Placed in the link prompt when the sitemap yielded no URLs.
pub const NO_SITEMAP_NOTICE: &str = "No sitemap data found. Suggest general relevant anchors.";

/// Who the model writes as, and for whom.
#[derive(Debug, Clone)]
pub struct Persona {
    /// Brand the content promotes.
    pub brand: String,
    /// Audience the content must align with.
    pub audience: String,
    /// Site name used when listing internal URLs.
    pub site_host: String,
}

impl Persona {
    pub fn from_site(site: &SiteConfig) -> Self {
        Self {
            brand: site.brand.clone(),
            audience: site.audience.clone(),
            site_host: site.site_host(),
        }
    }

    /// System instruction sent with every phase.
    pub fn system_instruction(&self) -> String {
        format!(
            "You are a creative SEO expert with content expertise.\n\
             You are going to carry out content creation that will make '{brand}' a go-to website for its audience.\n\
             Make the content align with {audience}.\n\
             Ensure it is humanly written and aligns with the keyword intent.",
            brand = self.brand,
            audience = self.audience,
        )
    }
}

// ---------------------------------------------------------------------------
// New-article phases
// ---------------------------------------------------------------------------

pub fn keyword_prompt(primary_keyword: &str, secondary_keywords: &str) -> String {
    format!(
        "Target Primary Keyword: {primary_keyword}\n\
         Initial Secondary Keywords: {secondary_keywords}\n\
         \n\
         1. Review the secondary keywords.\n\
         2. Generate semantic keywords relevant to the primary keyword.\n\
         3. Return ONLY a comma-separated list of the top 15 most vital keywords \
         (combining the provided ones and your semantic ones)."
    )
}

/// One labelled block of scraped competitor text.
pub fn competitor_block(url: &str, text: &str) -> String {
    format!("\n--- Content from {url} ---\n{text}\n")
}

pub fn outline_prompt(final_keywords: &str, primary_keyword: &str, competitor_data: &str) -> String {
    format!(
        "The target keywords are: {final_keywords}\n\
         \n\
         Here is the content from top competitors for the primary keyword '{primary_keyword}':\n\
         {competitor_data}\n\
         \n\
         Analyze their content structures, gaps, and strengths.\n\
         Based on this analysis, create the BEST SEO-optimized outline for a new article."
    )
}

pub fn article_prompt(
    outline: &str,
    final_keywords: &str,
    style: &StyleProfile,
    persona: &Persona,
) -> String {
    format!(
        "Using the outline below, write the full article.\n\
         \n\
         Outline:\n\
         {outline}\n\
         \n\
         Requirements:\n\
         - Integrate these keywords naturally: {final_keywords}\n\
         {requirements}",
        requirements = style_requirements(style, persona),
    )
}

/// Metadata prompt. The article is passed explicitly because completion
/// calls share no conversation state.
pub fn meta_prompt(article: &str) -> String {
    format!(
        "Here is the article:\n\
         {article}\n\
         \n\
         Based on the article above, create:\n\
         1. A Title Tag (Max 60 chars).\n\
         2. A Meta Description (Max 155 chars)."
    )
}

/// The URL list shown to the link phase, or the fallback notice.
pub fn links_context(sitemap_urls: &[String]) -> String {
    if sitemap_urls.is_empty() {
        NO_SITEMAP_NOTICE.to_string()
    } else {
        sitemap_urls.join("\n")
    }
}

/// Internal-linking prompt.
///
/// The only URLs in this text are the ones in `links_context`; the model is
/// told to pick from them and never invent any.
pub fn link_prompt(primary_keyword: &str, site_host: &str, links_context: &str) -> String {
    format!(
        "The article is about: {primary_keyword}\n\
         \n\
         Here is a list of actual URLs found on the {site_host} website:\n\
         {links_context}\n\
         \n\
         Identify 3-5 opportunities for an article on this topic to internally link to the URLs provided above.\n\
         List them as: \"Anchor Text\" -> URL.\n\
         DO NOT fabricate URLs. Only use URLs from the list provided."
    )
}

// ---------------------------------------------------------------------------
// Audit phases
// ---------------------------------------------------------------------------

pub fn gap_analysis_prompt(
    target_keyword: &str,
    my_url: &str,
    my_text: &str,
    competitor_url: &str,
    competitor_text: &str,
) -> String {
    format!(
        "Target keyword: {target_keyword}\n\
         \n\
         --- MY PAGE ({my_url}) ---\n\
         {my_text}\n\
         \n\
         --- HIGHER-RANKING COMPETITOR ({competitor_url}) ---\n\
         {competitor_text}\n\
         \n\
         Compare my page against the competitor for the target keyword and report:\n\
         1. The 3-5 most important topics, questions, or data points the competitor covers that my page is missing.\n\
         2. How the depth of coverage differs between the two pages.\n\
         3. Semantic keywords the competitor uses that my page lacks."
    )
}

pub fn gap_fix_prompt(audit_result: &str, style: &StyleProfile, persona: &Persona) -> String {
    format!(
        "Here is a content gap analysis of my page:\n\
         {audit_result}\n\
         \n\
         Write exactly three new paragraphs that close the most important gaps.\n\
         For each paragraph, state where on my page it should be inserted.\n\
         \n\
         Requirements:\n\
         {requirements}",
        requirements = style_requirements(style, persona),
    )
}

// ---------------------------------------------------------------------------
// Shared constraints
// ---------------------------------------------------------------------------

/// Writing constraints shared by drafting and gap fixing.
fn style_requirements(style: &StyleProfile, persona: &Persona) -> String {
    let mut lines = vec![
        "- NO Keyword stuffing.".to_string(),
        "- Must be human-written, engaging, and professional.".to_string(),
        format!("- Focus on {}.", persona.audience),
    ];
    if let Some(mark) = &style.banned_punctuation {
        lines.push(format!("- Never use the \"{mark}\" character anywhere in the text."));
    }
    lines.join("\n")
}
