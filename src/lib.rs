//! detype: a TypeScript/JavaScript → JavaScript compiler.
//!
//! Four stages run strictly in order over a shared diagnostic sink: lexical
//! analysis, recursive-descent parsing, semantic analysis with a lexically
//! scoped symbol table, and tree-walking code generation that erases all
//! type syntax. A stage that reports diagnostics halts the pipeline.

pub mod arena;
pub mod arena_ctx;
pub mod ast;
pub mod cli;
pub mod codegen;
pub mod compile;
pub mod diagnostics;
pub mod intern;
pub mod lexer;
pub mod parser;
pub mod scope;
pub mod semantics;
pub mod style;
pub mod suggest;
pub mod token;

pub use arena::Arena;
pub use arena_ctx::{AstArenas, AstContext};
pub use ast::{Expr, Program, Stmt, TypeAnn};
pub use codegen::codegen_program;
pub use compile::{compile_file, compile_source, is_typescript_path, CompileError};
pub use diagnostics::{Diagnostic, DiagnosticSink};
pub use intern::{Interner, Symbol};
pub use lexer::Lexer;
pub use parser::Parser;
pub use semantics::Analyzer;
pub use style::Style;
pub use token::{Span, Token, TokenKind};
