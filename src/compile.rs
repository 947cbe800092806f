//! End-to-end compilation pipeline: source text → lexer → parser → semantic
//! analysis → JavaScript emission. Each stage halts the pipeline when the
//! shared sink holds diagnostics.

use std::fs;
use std::path::{Path, PathBuf};

use crate::arena_ctx::AstArenas;
use crate::codegen::codegen_program;
use crate::diagnostics::DiagnosticSink;
use crate::intern::Interner;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::semantics::Analyzer;

/// Compile source text to JavaScript. On failure the returned sink carries
/// every diagnostic from the stage that failed, in source order.
pub fn compile_source(source: &str, is_typescript: bool) -> Result<String, DiagnosticSink> {
    let mut interner = Interner::new();
    let mut sink = DiagnosticSink::new(source);
    let arenas = AstArenas::new();

    let tokens = Lexer::new(source, &mut interner, &mut sink).tokenize();
    if sink.has_errors() {
        return Err(sink);
    }

    let program = {
        let mut parser = Parser::new(tokens, &mut interner, arenas.ctx(), &mut sink);
        parser.parse_program()
    };
    if sink.has_errors() {
        return Err(sink);
    }

    {
        let mut analyzer = Analyzer::new(&mut interner, arenas.ctx(), &mut sink, is_typescript);
        analyzer.analyze(&program);
    }
    if sink.has_errors() {
        return Err(sink);
    }

    Ok(codegen_program(&program, &interner))
}

/// `.ts` selects TypeScript mode; anything else compiles as JavaScript.
pub fn is_typescript_path(path: &Path) -> bool {
    path.extension().map(|ext| ext == "ts").unwrap_or(false)
}

/// Compile a source file and write the output next to it with the extension
/// replaced by `.js`. Nothing is written when compilation fails.
pub fn compile_file(path: &Path) -> Result<PathBuf, CompileError> {
    let source = fs::read_to_string(path)
        .map_err(|e| CompileError::Io(format!("{}: {}", path.display(), e)))?;

    match compile_source(&source, is_typescript_path(path)) {
        Ok(output) => {
            let out_path = path.with_extension("js");
            fs::write(&out_path, output)
                .map_err(|e| CompileError::Io(format!("{}: {}", out_path.display(), e)))?;
            Ok(out_path)
        }
        Err(sink) => Err(CompileError::Compile(sink)),
    }
}

/// Errors surfaced by file-level compilation.
#[derive(Debug)]
pub enum CompileError {
    /// Reading the input or writing the output failed.
    Io(String),
    /// The pipeline produced diagnostics; no output was written.
    Compile(DiagnosticSink),
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Io(e) => write!(f, "IO error: {}", e),
            CompileError::Compile(sink) => write!(f, "{}", sink.render()),
        }
    }
}

impl std::error::Error for CompileError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_erases_annotation() {
        let result = compile_source("let x: number = 42;", true);
        let output = result.expect("should compile");
        assert!(output.contains("let x = 42;"), "{}", output);
    }

    #[test]
    fn type_mismatch_fails_with_diagnostic() {
        let result = compile_source("let x: number = \"hello\";", true);
        let sink = result.expect_err("should fail");
        assert_eq!(sink.len(), 1);
        let diag = &sink.diagnostics()[0];
        assert_eq!(diag.line, 1);
        assert_eq!(diag.column, 17);
        assert_eq!(diag.message, "Type 'string' is not assignable to type 'number'");
    }

    #[test]
    fn lexer_errors_halt_the_pipeline() {
        // Only the lexer's diagnostic appears; later stages never run.
        let result = compile_source("let x = @;", true);
        let sink = result.expect_err("should fail");
        assert_eq!(sink.len(), 1, "{}", sink.render());
        assert!(sink.diagnostics()[0].message.contains("Unexpected character"));
    }

    #[test]
    fn parser_errors_prevent_semantic_analysis() {
        let result = compile_source("let = 1;", true);
        let sink = result.expect_err("should fail");
        assert!(sink
            .diagnostics()
            .iter()
            .all(|d| d.message.contains("Expected variable name")), "{}", sink.render());
    }

    #[test]
    fn empty_source_compiles_to_empty_output() {
        let output = compile_source("", true).expect("should compile");
        assert_eq!(output, "");
    }

    #[test]
    fn javascript_mode_tolerates_missing_annotations() {
        let source = "function id(a) { return a; }";
        assert!(compile_source(source, false).is_ok());
        assert!(compile_source(source, true).is_err());
    }

    #[test]
    fn compile_file_writes_output_next_to_input() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("sample.ts");
        fs::write(&input, "let x: number = 42;\n").expect("write input");

        let out_path = compile_file(&input).expect("should compile");
        assert_eq!(out_path, dir.path().join("sample.js"));
        let output = fs::read_to_string(out_path).expect("read output");
        assert!(output.contains("let x = 42;"), "{}", output);
    }

    #[test]
    fn failed_compile_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("bad.ts");
        fs::write(&input, "let x: number = \"hello\";\n").expect("write input");

        assert!(compile_file(&input).is_err());
        assert!(!dir.path().join("bad.js").exists());
    }

    #[test]
    fn extension_selects_mode() {
        assert!(is_typescript_path(Path::new("a/b/c.ts")));
        assert!(!is_typescript_path(Path::new("a/b/c.js")));
        assert!(!is_typescript_path(Path::new("noext")));
    }
}
