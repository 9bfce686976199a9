//! Visible-text extraction from raw HTML.

use scraper::Html;

/// Elements whose text never reaches the prompt.
const SKIPPED_TAGS: [&str; 4] = ["script", "style", "nav", "footer"];

/// Extract the visible text of an HTML document.
///
/// Text nodes inside `script`, `style`, `nav`, or `footer` are dropped, the
/// remaining nodes are joined with single spaces, and the result goes through
/// [`collapse_whitespace`].
pub fn extract_visible_text(html: &str) -> String {
    let doc = Html::parse_document(html);

    let pieces: Vec<&str> = doc
        .root_element()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| SKIPPED_TAGS.contains(&el.name()))
            });
            if hidden { None } else { Some(&**text) }
        })
        .collect();

    collapse_whitespace(&pieces.join(" "))
}

/// Strip every line, split lines on double spaces, and keep the non-empty
/// fragments one per line.
pub fn collapse_whitespace(text: &str) -> String {
    text.split(is_line_break)
        .map(str::trim)
        .flat_map(|line| line.split("  "))
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keep at most `limit` characters (Unicode scalar values) of `text`.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_text_never_leaks() {
        let text = extract_visible_text("<script>X</script><p>Y</p>");
        assert!(text.contains('Y'));
        assert!(!text.contains('X'));
    }

    #[test]
    fn strips_chrome_elements() {
        let html = r#"<html><head><style>.a { color: red }</style></head><body>
            <nav><a href="/">Home</a><a href="/pricing">Pricing</a></nav>
            <main><h1>Hiring Abroad</h1><p>Remote talent, <b>vetted</b> fast.</p></main>
            <footer>Copyright 2024</footer>
            <script>window.analytics = {};</script>
        </body></html>"#;
        let text = extract_visible_text(html);

        assert!(text.contains("Hiring Abroad"));
        assert!(text.contains("vetted"));
        for leaked in ["color: red", "Pricing", "Copyright", "analytics"] {
            assert!(!text.contains(leaked), "leaked {leaked:?}");
        }
    }

    #[test]
    fn nested_skipped_elements_are_dropped() {
        let html = "<body><footer><div><p>Deep footer</p></div></footer><p>Body</p></body>";
        let text = extract_visible_text(html);
        assert_eq!(text, "Body");
    }

    #[test]
    fn collapse_joins_fragments_with_newlines() {
        let raw = "  Title  \n\n\r\n   First  Second \t\nThird\u{2028}Fourth";
        assert_eq!(collapse_whitespace(raw), "Title\nFirst\nSecond\nThird\nFourth");
    }

    #[test]
    fn collapse_keeps_single_spaces() {
        assert_eq!(collapse_whitespace("one two   three"), "one two\nthree");
    }

    #[test]
    fn collapse_empty_input() {
        assert_eq!(collapse_whitespace(" \n \n"), "");
        assert_eq!(extract_visible_text(""), "");
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語");
        assert_eq!(truncate_chars("abc", 0), "");
    }
}
