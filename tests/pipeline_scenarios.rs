//! End-to-end scenarios through the full pipeline: source text in,
//! JavaScript text or diagnostics out.

use detype::compile_source;

#[test]
fn simple_declaration_compiles_and_erases() {
    let output = compile_source("let x: number = 42;", true).expect("should compile");
    assert!(output.contains("let x = 42;"), "{}", output);
}

#[test]
fn initializer_mismatch_reports_at_initializer_column() {
    let err = compile_source("let x: number = \"hello\";", true).expect_err("should fail");
    assert_eq!(err.len(), 1, "{}", err.render());
    let diag = &err.diagnostics()[0];
    assert_eq!((diag.line, diag.column), (1, 17));
    assert_eq!(diag.message, "Type 'string' is not assignable to type 'number'");
}

#[test]
fn class_compiles_with_all_type_syntax_removed() {
    let source = "class C { private n: number; constructor(n: number) { this.n = n; } greet(): string { return \"hi\"; } }";
    let output = compile_source(source, true).expect("should compile");
    assert!(output.contains("constructor(n) {"), "{}", output);
    assert!(output.contains("this.n = n;"), "{}", output);
    assert!(output.contains("greet() {"), "{}", output);
    assert!(output.contains("return \"hi\";"), "{}", output);
    assert!(!output.contains("private"), "{}", output);
    assert!(!output.contains("number"), "{}", output);
    assert!(!output.contains("string"), "{}", output);
}

#[test]
fn arity_mismatch_is_reported() {
    let source = "function add(a: number, b: number): number { return a + b; } add(1);";
    let err = compile_source(source, true).expect_err("should fail");
    assert!(err
        .diagnostics()
        .iter()
        .any(|d| d.message == "Expected 2 arguments, but got 1"), "{}", err.render());
}

#[test]
fn interface_and_implements_compile_to_comment_and_class() {
    let source = "interface Shape { area(): number; } class Circle implements Shape { area(): number { return 3.14; } }";
    let output = compile_source(source, true).expect("should compile");
    assert!(
        output.contains("// Interface Shape (not emitted in JavaScript)"),
        "{}",
        output
    );
    assert!(output.contains("class Circle {"), "{}", output);
    assert!(output.contains("area() {"), "{}", output);
    assert!(output.contains("return 3.14;"), "{}", output);
}

#[test]
fn for_loop_emits_parenthesized_condition() {
    let source = "for (let i = 0; i < 5; i++) { console.log(i); }";
    let output = compile_source(source, true).expect("should compile");
    assert!(
        output.contains("for (let i = 0; (i < 5); i++) {"),
        "{}",
        output
    );
    assert!(output.contains("console.log(i);"), "{}", output);
}

#[test]
fn empty_source_produces_empty_output() {
    let output = compile_source("", true).expect("should compile");
    assert_eq!(output, "");
}

#[test]
fn unterminated_string_reports_at_opening_quote() {
    let err = compile_source("let s = \"abc", true).expect_err("should fail");
    let diag = &err.diagnostics()[0];
    assert_eq!((diag.line, diag.column), (1, 9));
    assert!(diag.message.contains("Unterminated string"), "{}", err.render());
}

#[test]
fn unterminated_block_comment_reports() {
    let err = compile_source("/* unterminated", true).expect_err("should fail");
    assert!(err
        .diagnostics()
        .iter()
        .any(|d| d.message.contains("Unterminated block comment")), "{}", err.render());
}

#[test]
fn bare_declaration_requires_annotation_in_typescript() {
    let err = compile_source("let x;", true).expect_err("should fail");
    assert!(err
        .diagnostics()
        .iter()
        .any(|d| d.message.contains("no type annotation and is not initialized")), "{}", err.render());
    assert!(compile_source("let x;", false).is_ok());
}

#[test]
fn const_reassignment_is_rejected() {
    let err = compile_source("const x = 1; x = 2;", true).expect_err("should fail");
    assert!(err
        .diagnostics()
        .iter()
        .any(|d| d.message == "Cannot assign to 'x' because it is a constant"), "{}", err.render());
}

#[test]
fn diagnostics_render_with_source_line_and_caret() {
    let err = compile_source("let x: number = \"hello\";", true).expect_err("should fail");
    let rendered = err.render();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(
        lines[0],
        "Error at line 1, column 17: Type 'string' is not assignable to type 'number'"
    );
    assert_eq!(lines[1], "let x: number = \"hello\";");
    assert_eq!(lines[2], format!("{}^", " ".repeat(16)));
}

#[test]
fn multiple_diagnostics_arrive_in_source_order() {
    let source = "let a: number = \"x\";\nlet b: string = 2;";
    let err = compile_source(source, true).expect_err("should fail");
    assert_eq!(err.len(), 2, "{}", err.render());
    assert_eq!(err.diagnostics()[0].line, 1);
    assert_eq!(err.diagnostics()[1].line, 2);
}

#[test]
fn module_statements_round_trip_as_comments() {
    let source = "import { max } from \"m\";\nexport default 1;\nlet x = 2;";
    let output = compile_source(source, true).expect("should compile");
    assert!(output.contains("// import { max } from \"m\";"), "{}", output);
    assert!(output.contains("// export default 1;"), "{}", output);
    assert!(output.contains("let x = 2;"), "{}", output);
}

#[test]
fn else_if_chains_compile() {
    let source = "let n: number = 2; if (n > 1) { n = 1; } else if (n > 0) { n = 0; } else { n = -1; }";
    let output = compile_source(source, true).expect("should compile");
    assert!(output.contains("if ((n > 1)) {"), "{}", output);
    assert!(output.contains("else"), "{}", output);
}

#[test]
fn nested_functions_and_closures_compile() {
    let source = "function outer(a: number): number { function inner(b: number): number { return b * 2; } return inner(a); }";
    let output = compile_source(source, true).expect("should compile");
    assert!(output.contains("function outer(a) {"), "{}", output);
    assert!(output.contains("function inner(b) {"), "{}", output);
    assert!(output.contains("return inner(a);"), "{}", output);
}
