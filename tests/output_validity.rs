//! Properties of the emitted JavaScript: it re-lexes and re-parses cleanly
//! and contains no TypeScript-only syntax.

use detype::{compile_source, AstArenas, DiagnosticSink, Interner, Lexer, Parser, TokenKind};

const SAMPLE: &str = r#"
interface Shape {
    area(): number;
    label?: string;
}

class Circle implements Shape {
    private radius: number;
    static count: number = 0;

    constructor(radius: number) {
        this.radius = radius;
    }

    area(): number {
        return 3.14 * this.radius * this.radius;
    }

    label(): string {
        return "circle";
    }
}

function describe(shape: Circle): string {
    return "area: " + shape.area();
}

let c: Circle = new Circle(2);
let msg: string = describe(c);
for (let i = 0; i < 3; i++) {
    console.log(msg);
}
"#;

fn relex(output: &str) -> Vec<TokenKind> {
    let mut interner = Interner::new();
    let mut sink = DiagnosticSink::new(output);
    let tokens = Lexer::new(output, &mut interner, &mut sink).tokenize();
    assert!(!sink.has_errors(), "output failed to re-lex: {}", sink.render());
    tokens.iter().map(|t| t.kind).collect()
}

#[test]
fn output_ends_with_single_eof_when_relexed() {
    let output = compile_source(SAMPLE, true).expect("should compile");
    let kinds = relex(&output);
    assert_eq!(kinds.last(), Some(&TokenKind::Eof));
    assert_eq!(kinds.iter().filter(|k| **k == TokenKind::Eof).count(), 1);
}

#[test]
fn output_contains_no_typescript_only_tokens() {
    let output = compile_source(SAMPLE, true).expect("should compile");
    let kinds = relex(&output);
    for kind in &kinds {
        assert!(
            !matches!(
                kind,
                TokenKind::Interface
                    | TokenKind::Implements
                    | TokenKind::Public
                    | TokenKind::Private
                    | TokenKind::Protected
                    | TokenKind::Readonly
            ),
            "TypeScript-only token {:?} left in output:\n{}",
            kind,
            output
        );
    }
}

#[test]
fn output_has_no_declaration_site_annotations() {
    let output = compile_source(SAMPLE, true).expect("should compile");
    let kinds = relex(&output);
    // No ':' directly in front of a type keyword survives erasure.
    for pair in kinds.windows(2) {
        assert!(
            !(pair[0] == TokenKind::Colon && pair[1].is_type_keyword()),
            "type annotation left in output:\n{}",
            output
        );
    }
}

#[test]
fn output_reparses_without_diagnostics() {
    let output = compile_source(SAMPLE, true).expect("should compile");

    let mut interner = Interner::new();
    let mut sink = DiagnosticSink::new(&output);
    let arenas = AstArenas::new();
    let tokens = Lexer::new(&output, &mut interner, &mut sink).tokenize();
    let program = {
        let mut parser = Parser::new(tokens, &mut interner, arenas.ctx(), &mut sink);
        parser.parse_program()
    };
    assert!(
        !sink.has_errors(),
        "emitted output failed to re-parse: {}\n---\n{}",
        sink.render(),
        output
    );
    assert!(!program.statements.is_empty());
}

#[test]
fn output_recompiles_in_javascript_mode() {
    let output = compile_source(SAMPLE, true).expect("should compile");
    let second = compile_source(&output, false).expect("output should recompile as JavaScript");
    assert!(second.contains("class Circle"), "{}", second);
}
