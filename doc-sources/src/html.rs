//! Lightweight HTML-to-text conversion for the web reader.
//!
//! Deliberately not a full HTML parser: scripts and styles are dropped,
//! block-ish tags become newlines, everything else is stripped, and a handful
//! of common entities are decoded.

use std::sync::OnceLock;

use regex::Regex;

struct HtmlPatterns {
    script: Regex,
    style: Regex,
    line_break: Regex,
    paragraph_end: Regex,
    any_tag: Regex,
    spaces: Regex,
    blank_lines: Regex,
}

fn patterns() -> &'static HtmlPatterns {
    static PATTERNS: OnceLock<HtmlPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| HtmlPatterns {
        script: Regex::new(r"(?is)<script[\s\S]*?</script>").expect("script pattern"),
        style: Regex::new(r"(?is)<style[\s\S]*?</style>").expect("style pattern"),
        line_break: Regex::new(r"(?i)<br\s*/?>").expect("br pattern"),
        paragraph_end: Regex::new(r"(?i)</p>").expect("paragraph pattern"),
        any_tag: Regex::new(r"<[^>]+>").expect("tag pattern"),
        spaces: Regex::new(r"[ \t]+").expect("spaces pattern"),
        blank_lines: Regex::new(r"\n{3,}").expect("blank lines pattern"),
    })
}

/// Converts an HTML document to readable plain text.
pub fn html_to_text(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    let p = patterns();

    let text = p.script.replace_all(html, "");
    let text = p.style.replace_all(&text, "");
    let text = p.line_break.replace_all(&text, "\n");
    let text = p.paragraph_end.replace_all(&text, "\n");
    let text = p.any_tag.replace_all(&text, " ");

    let text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    let text = p.spaces.replace_all(&text, " ");
    let text = p.blank_lines.replace_all(&text, "\n\n");

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scripts_styles_and_tags() {
        let html = "<html><head><style>body{color:red}</style>\
                    <script>alert('x')</script></head>\
                    <body><h1>Title</h1><p>First paragraph.</p><p>Second.</p></body></html>";
        let text = html_to_text(html);
        assert!(!text.contains("alert"));
        assert!(!text.contains("color:red"));
        assert!(!text.contains('<'));
        assert!(text.contains("Title"));
        assert!(text.contains("First paragraph."));
    }

    #[test]
    fn paragraph_ends_become_newlines() {
        let text = html_to_text("<p>one</p><p>two</p>");
        let lines: Vec<&str> = text.lines().map(str::trim).collect();
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn decodes_common_entities() {
        let text = html_to_text("a&nbsp;&amp;&nbsp;b &lt;tag&gt; &quot;q&quot; &#39;s&#39;");
        assert_eq!(text, "a & b <tag> \"q\" 's'");
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(html_to_text("   "), "");
    }
}
