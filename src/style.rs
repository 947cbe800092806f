//! ANSI styling for terminal diagnostics: the error label, the line-number
//! gutter, and the caret. Colors reset at the end of the wrapped text.

pub struct Style;

impl Style {
    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const RED: &'static str = "\x1b[31m";
    pub const BLUE: &'static str = "\x1b[34m";

    /// Caret color.
    pub fn red(s: &str) -> String {
        format!("{}{}{}", Self::RED, s, Self::RESET)
    }

    /// Gutter color for line numbers and pipes.
    pub fn blue(s: &str) -> String {
        format!("{}{}{}", Self::BLUE, s, Self::RESET)
    }

    /// Error label color.
    pub fn bold_red(s: &str) -> String {
        format!("{}{}{}{}", Self::BOLD, Self::RED, s, Self::RESET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_styling_resets_after_text() {
        let caret = Style::red("^");
        assert!(caret.starts_with("\x1b[31m"));
        assert!(caret.ends_with("\x1b[0m"));
        assert!(caret.contains('^'));
    }

    #[test]
    fn error_label_is_bold_and_red() {
        let label = Style::bold_red("Error");
        assert!(label.contains("\x1b[1m"));
        assert!(label.contains("\x1b[31m"));
        assert!(label.contains("Error"));
    }

    #[test]
    fn gutter_uses_blue() {
        assert_eq!(Style::blue("|"), "\x1b[34m|\x1b[0m");
    }
}
