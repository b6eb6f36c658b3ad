//! Code highlighting seam.
//!
//! Tokenization belongs to whichever [`Highlighter`] is plugged in. The
//! bundled [`LineHighlighter`] only splits the code into numbered, linkable
//! lines.

use crate::RenderError;
use crate::util::escape_html;

/// Language used when no hint applies.
pub const PLAIN_TEXT: &str = "plaintext";

/// Renders code as HTML markup placed inside a `<code>` element.
pub trait Highlighter: Send + Sync {
    /// Whether `language` is a name this highlighter accepts as a hint.
    fn supports(&self, language: &str) -> bool;

    /// Render `code` for `language`.
    fn highlight(&self, code: &str, language: &str) -> Result<String, RenderError>;
}

/// Line-numbered listing with `id="L{n}"` anchors per line.
#[derive(Debug, Clone)]
pub struct LineHighlighter {
    line_prefix: String,
}

impl Default for LineHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl LineHighlighter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            line_prefix: "L".to_owned(),
        }
    }

    /// Use `prefix` instead of `L` for line anchors.
    #[must_use]
    pub fn with_line_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.line_prefix = prefix.into();
        self
    }
}

impl Highlighter for LineHighlighter {
    fn supports(&self, language: &str) -> bool {
        !language.is_empty()
            && language
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '#' | '.' | '_'))
    }

    fn highlight(&self, code: &str, language: &str) -> Result<String, RenderError> {
        let mut out = format!(
            r#"<span class="highlight language-{}">"#,
            escape_html(language)
        );
        for (index, line) in code.lines().enumerate() {
            let n = index + 1;
            let anchor = format!("{}{n}", self.line_prefix);
            out.push_str(&format!(
                r##"<span class="line" id="{anchor}"><a class="ln" href="#{anchor}">{n}</a><span class="cl">{}</span></span>"##,
                escape_html(line)
            ));
            out.push('\n');
        }
        out.push_str("</span>");
        Ok(out)
    }
}

/// Pick the language for a code block.
///
/// Order: `lang` attribute, first `language-*` class, content sniffing,
/// then [`PLAIN_TEXT`]. Hints the highlighter does not support are skipped.
pub fn detect_language(
    highlighter: &dyn Highlighter,
    lang_attr: Option<&str>,
    class_attr: Option<&str>,
    code: &str,
) -> String {
    let from_class = class_attr.and_then(|classes| {
        classes
            .split_whitespace()
            .find_map(|class| class.strip_prefix("language-"))
    });

    [lang_attr, from_class, sniff_language(code)]
        .into_iter()
        .flatten()
        .map(|hint| hint.trim().to_ascii_lowercase())
        .find(|hint| highlighter.supports(hint))
        .unwrap_or_else(|| PLAIN_TEXT.to_owned())
}

/// Guess a language from the code itself.
///
/// ```
/// use holadoc_renderer::sniff_language;
///
/// assert_eq!(sniff_language("#!/usr/bin/env python3\nprint(1)"), Some("python"));
/// assert_eq!(sniff_language("{\"a\": 1}"), Some("json"));
/// assert_eq!(sniff_language("just words"), None);
/// ```
#[must_use]
pub fn sniff_language(code: &str) -> Option<&'static str> {
    let trimmed = code.trim();

    if let Some(shebang) = trimmed.strip_prefix("#!") {
        let line = shebang.lines().next().unwrap_or_default();
        let interpreter = line
            .split_whitespace()
            .map(|word| word.rsplit('/').next().unwrap_or(word))
            .find(|word| *word != "env")?;
        return match interpreter {
            i if i.starts_with("python") => Some("python"),
            "node" | "deno" => Some("javascript"),
            "ruby" => Some("ruby"),
            "perl" => Some("perl"),
            "sh" | "bash" | "zsh" => Some("bash"),
            _ => None,
        };
    }

    if trimmed.starts_with("<?php") {
        Some("php")
    } else if trimmed.starts_with("<?xml") {
        Some("xml")
    } else if trimmed.starts_with('<') {
        Some("html")
    } else if (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'))
    {
        Some("json")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_line_highlighter_numbers_lines() {
        let html = LineHighlighter::new()
            .highlight("a < b\nc\n", "rust")
            .unwrap();

        assert_eq!(
            html,
            concat!(
                r#"<span class="highlight language-rust">"#,
                r##"<span class="line" id="L1"><a class="ln" href="#L1">1</a><span class="cl">a &lt; b</span></span>"##,
                "\n",
                r##"<span class="line" id="L2"><a class="ln" href="#L2">2</a><span class="cl">c</span></span>"##,
                "\n",
                "</span>"
            )
        );
    }

    #[test]
    fn test_line_highlighter_custom_prefix() {
        let html = LineHighlighter::new()
            .with_line_prefix("line-")
            .highlight("x", PLAIN_TEXT)
            .unwrap();

        assert!(html.contains(r#"id="line-1""#));
    }

    #[test]
    fn test_detect_prefers_lang_attribute() {
        let h = LineHighlighter::new();

        assert_eq!(
            detect_language(&h, Some("Go"), Some("language-rust"), "{}"),
            "go"
        );
    }

    #[test]
    fn test_detect_uses_first_language_class() {
        let h = LineHighlighter::new();

        assert_eq!(
            detect_language(&h, None, Some("wide language-toml language-ini"), ""),
            "toml"
        );
    }

    #[test]
    fn test_detect_skips_unsupported_hint() {
        let h = LineHighlighter::new();

        assert_eq!(
            detect_language(&h, Some("not a lang"), None, "<p>x</p>"),
            "html"
        );
    }

    #[test]
    fn test_detect_falls_back_to_plain_text() {
        let h = LineHighlighter::new();

        assert_eq!(detect_language(&h, None, None, "hello"), PLAIN_TEXT);
    }

    #[test]
    fn test_sniff_shebangs() {
        assert_eq!(sniff_language("#!/bin/bash\necho hi"), Some("bash"));
        assert_eq!(sniff_language("#!/usr/bin/env node"), Some("javascript"));
        assert_eq!(sniff_language("#!/opt/custom"), None);
    }

    #[test]
    fn test_sniff_markup() {
        assert_eq!(sniff_language("<?php echo 1;"), Some("php"));
        assert_eq!(sniff_language("<?xml version=\"1.0\"?><a/>"), Some("xml"));
        assert_eq!(sniff_language("<div></div>"), Some("html"));
        assert_eq!(sniff_language("[1, 2]"), Some("json"));
    }
}
