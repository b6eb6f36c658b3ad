//! Markdown to HTML conversion.

use pulldown_cmark::{Options, Parser, html};

/// Parser options: GitHub Flavored Markdown plus footnotes.
#[must_use]
pub fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_GFM
}

/// Convert Markdown to an HTML fragment.
///
/// Raw HTML blocks and inline HTML pass through unchanged.
#[must_use]
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, parser_options());
    let mut out = String::with_capacity(markdown.len() + markdown.len() / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_heading_and_paragraph() {
        assert_eq!(
            markdown_to_html("# Intro\n\nHello **world**"),
            "<h1>Intro</h1>\n<p>Hello <strong>world</strong></p>\n"
        );
    }

    #[test]
    fn test_fenced_code_has_language_class() {
        let html = markdown_to_html("```rust\nfn main() {}\n```");

        assert_eq!(
            html,
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>\n"
        );
    }

    #[test]
    fn test_raw_html_passes_through() {
        let html = markdown_to_html("<div class=\"note\">raw</div>\n\ntext");

        assert!(html.starts_with("<div class=\"note\">raw</div>"));
    }

    #[test]
    fn test_gfm_table_and_strikethrough() {
        let html = markdown_to_html("| a |\n|---|\n| ~~b~~ |");

        assert!(html.contains("<table>"));
        assert!(html.contains("<del>b</del>"));
    }
}
