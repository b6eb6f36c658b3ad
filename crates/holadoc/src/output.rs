//! Status lines and command results for the `holadoc` binary.

use console::{Style, Term};

/// Build progress goes to stderr so that results written to stdout, like
/// the `tree` listing, can be piped.
///
/// `console` drops the colors when stderr is not a terminal or `NO_COLOR`
/// is set.
pub(crate) struct Output {
    status: Term,
    results: Term,
    done: Style,
    notice: Style,
    failure: Style,
    headline: Style,
}

fn styled(style: Option<&Style>, msg: &str) -> String {
    style.map_or_else(|| msg.to_owned(), |style| style.apply_to(msg).to_string())
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            status: Term::stderr(),
            results: Term::stdout(),
            done: Style::new().green(),
            notice: Style::new().yellow(),
            failure: Style::new().red(),
            headline: Style::new().cyan().bold(),
        }
    }

    fn status_line(&self, style: Option<&Style>, msg: &str) {
        // A closed stderr leaves nowhere to report to.
        let _ = self.status.write_line(&styled(style, msg));
    }

    /// Plain progress line.
    pub(crate) fn info(&self, msg: &str) {
        self.status_line(None, msg);
    }

    /// The command finished.
    pub(crate) fn success(&self, msg: &str) {
        self.status_line(Some(&self.done), msg);
    }

    /// Something was left out, the command carries on.
    pub(crate) fn warning(&self, msg: &str) {
        self.status_line(Some(&self.notice), msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.status_line(Some(&self.failure), msg);
    }

    /// Where to look next, e.g. the address the server listens on.
    pub(crate) fn highlight(&self, msg: &str) {
        self.status_line(Some(&self.headline), msg);
    }

    /// Command result on stdout, never styled.
    pub(crate) fn print(&self, text: &str) {
        let _ = self.results.write_str(text);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_unstyled_line_is_verbatim() {
        assert_eq!(styled(None, "Built 3 pages"), "Built 3 pages");
    }

    #[test]
    fn test_styled_line_wraps_message() {
        let style = Style::new().red().force_styling(true);

        let line = styled(Some(&style), "Error: boom");

        assert!(line.starts_with('\u{1b}'));
        assert!(line.contains("Error: boom"));
        assert_ne!(line, "Error: boom");
    }
}
