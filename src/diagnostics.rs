use std::fmt;
use std::io::{self, Write};

use crate::style::Style;
use crate::token::Span;

/// A single compile error at a 1-based source position.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub line: u32,
    pub column: u32,
    pub message: String,
}

/// Collects diagnostics across all pipeline stages and owns the source text
/// for rendering. Pure collector: reporting never fails and never throws.
pub struct DiagnosticSink {
    lines: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new(source: &str) -> Self {
        DiagnosticSink {
            lines: source.lines().map(str::to_string).collect(),
            diagnostics: Vec::new(),
        }
    }

    pub fn report(&mut self, span: Span, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            line: span.line,
            column: span.column,
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn source_line(&self, line: u32) -> Option<&str> {
        let idx = (line as usize).checked_sub(1)?;
        self.lines.get(idx).map(String::as_str)
    }

    /// One block per diagnostic:
    ///
    /// ```text
    /// Error at line L, column C: message
    /// <source line L>
    ///           ^
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();
        for diag in &self.diagnostics {
            out.push_str(&format!(
                "Error at line {}, column {}: {}\n",
                diag.line, diag.column, diag.message
            ));
            if let Some(line) = self.source_line(diag.line) {
                out.push_str(line);
                out.push('\n');
                out.push_str(&" ".repeat(diag.column.saturating_sub(1) as usize));
                out.push_str("^\n");
            }
        }
        out
    }

    /// Terminal rendering: bold-red error label, blue line-number gutter,
    /// red caret.
    ///
    /// ```text
    /// Error at line L, column C: message
    ///    L | <source line L>
    ///      |           ^
    /// ```
    pub fn render_colored(&self) -> String {
        let mut out = String::new();
        for diag in &self.diagnostics {
            out.push_str(&format!(
                "{} at line {}, column {}: {}\n",
                Style::bold_red("Error"),
                diag.line,
                diag.column,
                diag.message
            ));
            if let Some(line) = self.source_line(diag.line) {
                let gutter = Style::blue(&format!("{:4} |", diag.line));
                out.push_str(&format!("{} {}\n", gutter, line));
                out.push_str(&format!(
                    "     {} {}{}\n",
                    Style::blue("|"),
                    " ".repeat(diag.column.saturating_sub(1) as usize),
                    Style::red("^")
                ));
            }
        }
        out
    }

    pub fn write_to(&self, w: &mut impl Write) -> io::Result<()> {
        w.write_all(self.render().as_bytes())
    }
}

impl fmt::Display for DiagnosticSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl fmt::Debug for DiagnosticSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticSink")
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_appends_in_order() {
        let mut sink = DiagnosticSink::new("let x = 1;\nlet y = 2;");
        sink.report(Span::new(1, 5), "first");
        sink.report(Span::new(2, 5), "second");
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.diagnostics()[0].message, "first");
        assert_eq!(sink.diagnostics()[1].message, "second");
    }

    #[test]
    fn has_errors_reflects_state() {
        let mut sink = DiagnosticSink::new("");
        assert!(!sink.has_errors());
        sink.report(Span::new(1, 1), "boom");
        assert!(sink.has_errors());
    }

    #[test]
    fn render_shows_line_and_caret() {
        let mut sink = DiagnosticSink::new("let x: number = \"hi\";");
        sink.report(Span::new(1, 17), "Type 'string' is not assignable to type 'number'");
        let out = sink.render();
        assert!(out.contains("Error at line 1, column 17:"), "{}", out);
        assert!(out.contains("let x: number = \"hi\";"), "{}", out);
        let caret_line = out.lines().last().unwrap();
        assert_eq!(caret_line, format!("{}^", " ".repeat(16)), "{}", out);
    }

    #[test]
    fn render_skips_excerpt_for_out_of_range_line() {
        let mut sink = DiagnosticSink::new("one line");
        sink.report(Span::new(9, 1), "past the end");
        let out = sink.render();
        assert!(out.contains("Error at line 9, column 1: past the end"));
        assert!(!out.contains('^'));
    }

    #[test]
    fn render_colored_has_label_gutter_and_caret() {
        let mut sink = DiagnosticSink::new("bad line");
        sink.report(Span::new(1, 5), "nope");
        let out = sink.render_colored();
        assert!(out.contains(Style::BOLD), "{}", out);
        assert!(out.contains(Style::RED), "{}", out);
        assert!(out.contains(Style::BLUE), "{}", out);
        assert!(out.contains("   1 |"), "{}", out);
        assert!(out.contains("bad line"), "{}", out);
        assert!(out.contains('^'), "{}", out);
    }
}
