//! Sitemap XML parser.
//!
//! Handles both sitemap shapes from <https://www.sitemaps.org/protocol.html>:
//! - `<urlset><url><loc>…</loc></url>…</urlset>`
//! - `<sitemapindex><sitemap><loc>…</loc></sitemap>…</sitemapindex>`
//!
//! Only the grandchildren of the root element are inspected, so any document
//! with that two-level layout yields its `loc` values.

use quick_xml::Reader;
use quick_xml::events::Event;

use seoforge_shared::{Result, SeoForgeError};

/// Depth of the elements whose text we collect (root = 1).
const LOC_DEPTH: usize = 3;

/// Local tag name carrying a page location.
const LOC_TAG: &[u8] = b"loc";

/// Parse a sitemap document into its `loc` values, in document order.
///
/// Namespace prefixes are ignored, values are trimmed, and empty `loc`
/// elements are skipped. Any XML error, a bad entity reference in any text
/// node, unbalanced tags, a missing root, or non-whitespace content outside
/// the root element is a parse error.
pub(crate) fn parse_sitemap(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut depth: usize = 0;
    let mut seen_root = false;
    let mut in_loc = false;
    let mut current = String::new();
    let mut urls = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            SeoForgeError::parse(format!(
                "invalid sitemap XML at byte {}: {e}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(e) => {
                if depth == 0 {
                    if seen_root {
                        return Err(SeoForgeError::parse("content after the root element"));
                    }
                    seen_root = true;
                }
                depth += 1;
                if depth == LOC_DEPTH && e.local_name().as_ref() == LOC_TAG {
                    in_loc = true;
                    current.clear();
                }
            }
            Event::Empty(_) => {
                if depth == 0 {
                    if seen_root {
                        return Err(SeoForgeError::parse("content after the root element"));
                    }
                    seen_root = true;
                }
            }
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| SeoForgeError::parse(format!("bad escape in sitemap text: {e}")))?;
                if depth == 0 {
                    if !text.trim().is_empty() {
                        return Err(SeoForgeError::parse("text outside the root element"));
                    }
                } else if in_loc && depth == LOC_DEPTH {
                    current.push_str(&text);
                }
            }
            Event::CData(c) => {
                if depth == 0 {
                    return Err(SeoForgeError::parse("CDATA outside the root element"));
                }
                if in_loc && depth == LOC_DEPTH {
                    current.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::End(_) => {
                if depth == LOC_DEPTH && in_loc {
                    in_loc = false;
                    let value = current.trim();
                    if !value.is_empty() {
                        urls.push(value.to_string());
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if !seen_root {
        return Err(SeoForgeError::parse("sitemap has no root element"));
    }
    if depth != 0 {
        return Err(SeoForgeError::parse("sitemap ended with unclosed elements"));
    }

    Ok(urls)
}
