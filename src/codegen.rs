//! JavaScript emission. Walks the AST and renders ES-compatible output,
//! erasing every type annotation, interface, and member modifier along the
//! way. Assumes semantic analysis already ran; emission itself cannot fail.

use std::fmt::Write;

use crate::ast::{
    ClassDecl, ClassMember, ExportKind, Expr, Function, ImportSpecifier, Literal, Program, Stmt,
};
use crate::intern::Interner;

const INDENT: &str = "  ";

pub fn codegen_program(program: &Program, interner: &Interner) -> String {
    let mut output = String::new();
    for stmt in &program.statements {
        codegen_stmt(stmt, interner, 0, &mut output);
        // Blank line between top-level statements.
        if !matches!(stmt, Stmt::Block { .. }) {
            output.push('\n');
        }
    }
    output
}

fn codegen_stmt(stmt: &Stmt, interner: &Interner, indent: usize, output: &mut String) {
    let ind = INDENT.repeat(indent);
    match stmt {
        Stmt::Block { statements, .. } => {
            writeln!(output, "{}{{", ind).unwrap();
            for s in statements {
                codegen_stmt(s, interner, indent + 1, output);
            }
            writeln!(output, "{}}}", ind).unwrap();
        }

        Stmt::VarDecl { .. } => {
            writeln!(output, "{}{};", ind, var_decl_header(stmt, interner, indent)).unwrap();
        }

        Stmt::FunctionDecl(func) => codegen_function(func, interner, indent, output),

        Stmt::ClassDecl(class) => codegen_class(class, interner, indent, output),

        Stmt::InterfaceDecl(iface) => {
            writeln!(
                output,
                "{}// Interface {} (not emitted in JavaScript)",
                ind,
                interner.resolve(iface.name)
            )
            .unwrap();
        }

        Stmt::ExprStmt { expr, .. } => {
            writeln!(output, "{}{};", ind, codegen_expr(expr, interner, indent)).unwrap();
        }

        Stmt::Return { value, .. } => match value {
            Some(value) => writeln!(
                output,
                "{}return {};",
                ind,
                codegen_expr(value, interner, indent)
            )
            .unwrap(),
            None => writeln!(output, "{}return;", ind).unwrap(),
        },

        Stmt::If {
            cond,
            then_branch,
            else_branch,
            ..
        } => {
            writeln!(
                output,
                "{}if ({}) {{",
                ind,
                codegen_expr(cond, interner, indent)
            )
            .unwrap();
            for s in nested(then_branch) {
                codegen_stmt(s, interner, indent + 1, output);
            }
            if let Some(else_branch) = else_branch {
                writeln!(output, "{}}} else {{", ind).unwrap();
                for s in nested(else_branch) {
                    codegen_stmt(s, interner, indent + 1, output);
                }
            }
            writeln!(output, "{}}}", ind).unwrap();
        }

        Stmt::While { cond, body, .. } => {
            writeln!(
                output,
                "{}while ({}) {{",
                ind,
                codegen_expr(cond, interner, indent)
            )
            .unwrap();
            for s in nested(body) {
                codegen_stmt(s, interner, indent + 1, output);
            }
            writeln!(output, "{}}}", ind).unwrap();
        }

        Stmt::DoWhile { body, cond, .. } => {
            writeln!(output, "{}do {{", ind).unwrap();
            for s in nested(body) {
                codegen_stmt(s, interner, indent + 1, output);
            }
            writeln!(
                output,
                "{}}} while ({});",
                ind,
                codegen_expr(cond, interner, indent)
            )
            .unwrap();
        }

        Stmt::For {
            init,
            cond,
            update,
            body,
            ..
        } => {
            // A declaration initializer is emitted inline, without its ';'.
            let init_str = match init {
                Some(init @ Stmt::VarDecl { .. }) => var_decl_header(init, interner, indent),
                Some(Stmt::ExprStmt { expr, .. }) => codegen_expr(expr, interner, indent),
                _ => String::new(),
            };
            let cond_str = cond
                .map(|c| codegen_expr(c, interner, indent))
                .unwrap_or_default();
            let update_str = update
                .map(|u| codegen_expr(u, interner, indent))
                .unwrap_or_default();
            writeln!(
                output,
                "{}for ({}; {}; {}) {{",
                ind, init_str, cond_str, update_str
            )
            .unwrap();
            for s in nested(body) {
                codegen_stmt(s, interner, indent + 1, output);
            }
            writeln!(output, "{}}}", ind).unwrap();
        }

        Stmt::Break { .. } => writeln!(output, "{}break;", ind).unwrap(),
        Stmt::Continue { .. } => writeln!(output, "{}continue;", ind).unwrap(),

        Stmt::Import {
            default,
            named,
            namespace,
            module,
            ..
        } => {
            let mut pieces = Vec::new();
            if let Some(default) = default {
                pieces.push(interner.resolve(*default).to_string());
            }
            if let Some(namespace) = namespace {
                pieces.push(format!("* as {}", interner.resolve(*namespace)));
            }
            if !named.is_empty() {
                pieces.push(format!("{{ {} }}", specifiers(named, interner)));
            }
            writeln!(
                output,
                "{}// import {} from \"{}\";",
                ind,
                pieces.join(", "),
                interner.resolve(*module)
            )
            .unwrap();
        }

        Stmt::Export { kind, .. } => match kind {
            ExportKind::Default(expr) => {
                writeln!(
                    output,
                    "{}// export default {};",
                    ind,
                    codegen_expr(expr, interner, indent)
                )
                .unwrap();
            }
            ExportKind::Named { specifiers: list, module } => {
                let from = match module {
                    Some(module) => format!(" from \"{}\"", interner.resolve(*module)),
                    None => String::new(),
                };
                writeln!(
                    output,
                    "{}// export {{ {} }}{};",
                    ind,
                    specifiers(list, interner),
                    from
                )
                .unwrap();
            }
            // The declaration itself is real output.
            ExportKind::Decl(decl) => codegen_stmt(decl, interner, indent, output),
        },

        Stmt::Empty { .. } => writeln!(output, "{};", ind).unwrap(),
    }
}

/// `let x = init` without the trailing `;`, shared by statement emission and
/// `for` headers.
fn var_decl_header(stmt: &Stmt, interner: &Interner, indent: usize) -> String {
    match stmt {
        Stmt::VarDecl {
            name, kind, init, ..
        } => match init {
            Some(init) => format!(
                "{} {} = {}",
                kind.js(),
                interner.resolve(*name),
                codegen_expr(init, interner, indent)
            ),
            None => format!("{} {}", kind.js(), interner.resolve(*name)),
        },
        _ => String::new(),
    }
}

/// Branch bodies are always braced; a block contributes its statements, any
/// other statement stands alone.
fn nested<'s, 'a>(stmt: &'s Stmt<'a>) -> &'s [Stmt<'a>] {
    match stmt {
        Stmt::Block { statements, .. } => statements,
        other => std::slice::from_ref(other),
    }
}

fn param_names(func: &Function, interner: &Interner) -> String {
    let names: Vec<&str> = func
        .params
        .iter()
        .map(|p| interner.resolve(p.name))
        .collect();
    names.join(", ")
}

fn codegen_function(func: &Function, interner: &Interner, indent: usize, output: &mut String) {
    let ind = INDENT.repeat(indent);
    let name = func.name.map(|n| interner.resolve(n)).unwrap_or("");
    writeln!(
        output,
        "{}function {}({}) {{",
        ind,
        name,
        param_names(func, interner)
    )
    .unwrap();
    for stmt in &func.body {
        codegen_stmt(stmt, interner, indent + 1, output);
    }
    writeln!(output, "{}}}", ind).unwrap();
}

fn codegen_class(class: &ClassDecl, interner: &Interner, indent: usize, output: &mut String) {
    let ind = INDENT.repeat(indent);
    let inner = INDENT.repeat(indent + 1);

    match class.superclass {
        Some(superclass) => writeln!(
            output,
            "{}class {} extends {} {{",
            ind,
            interner.resolve(class.name),
            interner.resolve(superclass)
        )
        .unwrap(),
        None => writeln!(output, "{}class {} {{", ind, interner.resolve(class.name)).unwrap(),
    }

    // Static properties keep their declaration form.
    for member in &class.members {
        if let ClassMember::Property {
            name,
            init,
            is_static: true,
            ..
        } = member
        {
            match init {
                Some(init) => writeln!(
                    output,
                    "{}static {} = {};",
                    inner,
                    interner.resolve(*name),
                    codegen_expr(init, interner, indent + 1)
                )
                .unwrap(),
                None => writeln!(output, "{}static {};", inner, interner.resolve(*name)).unwrap(),
            }
        }
    }

    let has_constructor = interner
        .lookup("constructor")
        .map(|ctor| class.constructor(ctor).is_some())
        .unwrap_or(false);

    // Without a user constructor, synthesize one carrying the instance
    // property initializers.
    if !has_constructor {
        writeln!(output, "{}constructor() {{", inner).unwrap();
        let body_ind = INDENT.repeat(indent + 2);
        if class.superclass.is_some() {
            writeln!(output, "{}super();", body_ind).unwrap();
        }
        for member in &class.members {
            if let ClassMember::Property {
                name,
                init: Some(init),
                is_static: false,
                ..
            } = member
            {
                writeln!(
                    output,
                    "{}this.{} = {};",
                    body_ind,
                    interner.resolve(*name),
                    codegen_expr(init, interner, indent + 2)
                )
                .unwrap();
            }
        }
        writeln!(output, "{}}}", inner).unwrap();
    }

    for member in &class.members {
        if let ClassMember::Method {
            name,
            params,
            body,
            is_static,
            ..
        } = member
        {
            let names: Vec<&str> = params.iter().map(|p| interner.resolve(p.name)).collect();
            writeln!(
                output,
                "{}{}{}({}) {{",
                inner,
                if *is_static { "static " } else { "" },
                interner.resolve(*name),
                names.join(", ")
            )
            .unwrap();
            for stmt in body {
                codegen_stmt(stmt, interner, indent + 2, output);
            }
            writeln!(output, "{}}}", inner).unwrap();
        }
    }

    writeln!(output, "{}}}", ind).unwrap();
}

fn specifiers(list: &[ImportSpecifier], interner: &Interner) -> String {
    let rendered: Vec<String> = list
        .iter()
        .map(|spec| match spec.alias {
            Some(alias) => format!(
                "{} as {}",
                interner.resolve(spec.name),
                interner.resolve(alias)
            ),
            None => interner.resolve(spec.name).to_string(),
        })
        .collect();
    rendered.join(", ")
}

fn codegen_expr(expr: &Expr, interner: &Interner, indent: usize) -> String {
    match expr {
        Expr::Literal { value, .. } => codegen_literal(value, interner),

        Expr::Identifier { name, .. } => interner.resolve(*name).to_string(),

        Expr::This { .. } => "this".to_string(),

        // Parenthesized unconditionally; precedence is preserved trivially.
        Expr::Binary {
            op, left, right, ..
        } => format!(
            "({} {} {})",
            codegen_expr(left, interner, indent),
            op.js(),
            codegen_expr(right, interner, indent)
        ),

        Expr::Unary {
            op,
            operand,
            prefix,
            ..
        } => {
            if *prefix {
                format!("{}{}", op.js(), codegen_expr(operand, interner, indent))
            } else {
                format!("{}{}", codegen_expr(operand, interner, indent), op.js())
            }
        }

        Expr::Assign {
            op, target, value, ..
        } => format!(
            "{} {} {}",
            codegen_expr(target, interner, indent),
            op.js(),
            codegen_expr(value, interner, indent)
        ),

        Expr::Call { callee, args, .. } => {
            let args: Vec<String> = args
                .iter()
                .map(|a| codegen_expr(a, interner, indent))
                .collect();
            format!(
                "{}({})",
                codegen_expr(callee, interner, indent),
                args.join(", ")
            )
        }

        Expr::Member {
            object,
            property,
            optional,
            ..
        } => format!(
            "{}{}{}",
            codegen_expr(object, interner, indent),
            if *optional { "?." } else { "." },
            interner.resolve(*property)
        ),

        Expr::Index { object, index, .. } => format!(
            "{}[{}]",
            codegen_expr(object, interner, indent),
            codegen_expr(index, interner, indent)
        ),

        Expr::Conditional {
            cond,
            then_expr,
            else_expr,
            ..
        } => format!(
            "({} ? {} : {})",
            codegen_expr(cond, interner, indent),
            codegen_expr(then_expr, interner, indent),
            codegen_expr(else_expr, interner, indent)
        ),

        Expr::New { callee, args, .. } => {
            let args: Vec<String> = args
                .iter()
                .map(|a| codegen_expr(a, interner, indent))
                .collect();
            format!(
                "new {}({})",
                codegen_expr(callee, interner, indent),
                args.join(", ")
            )
        }

        Expr::Object { properties, .. } => {
            if properties.is_empty() {
                return "{}".to_string();
            }
            let props: Vec<String> = properties
                .iter()
                .map(|p| {
                    format!(
                        "{}: {}",
                        interner.resolve(p.key),
                        codegen_expr(p.value, interner, indent)
                    )
                })
                .collect();
            format!("{{ {} }}", props.join(", "))
        }

        Expr::Array { elements, .. } => {
            let elements: Vec<String> = elements
                .iter()
                .map(|e| codegen_expr(e, interner, indent))
                .collect();
            format!("[{}]", elements.join(", "))
        }

        Expr::Function(func) => {
            let mut out = String::new();
            let name = func.name.map(|n| interner.resolve(n)).unwrap_or("");
            write!(out, "function {}({}) {{\n", name, param_names(func, interner)).unwrap();
            for stmt in &func.body {
                codegen_stmt(stmt, interner, indent + 1, &mut out);
            }
            write!(out, "{}}}", INDENT.repeat(indent)).unwrap();
            out
        }
    }
}

fn codegen_literal(value: &Literal, interner: &Interner) -> String {
    match value {
        Literal::Number(n) => {
            if n.is_infinite() {
                // Out-of-range literals like 1e999 overflow to infinity.
                if n.is_sign_positive() {
                    "Infinity".to_string()
                } else {
                    "-Infinity".to_string()
                }
            } else {
                format!("{}", n)
            }
        }
        Literal::Str(s) => format!("\"{}\"", escape_js_string(interner.resolve(*s))),
        Literal::Bool(true) => "true".to_string(),
        Literal::Bool(false) => "false".to_string(),
        Literal::Null => "null".to_string(),
        Literal::Undefined => "undefined".to_string(),
    }
}

fn escape_js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena_ctx::AstArenas;
    use crate::diagnostics::DiagnosticSink;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn emit(source: &str) -> String {
        let mut interner = Interner::new();
        let mut sink = DiagnosticSink::new(source);
        let arenas = AstArenas::new();
        let tokens = Lexer::new(source, &mut interner, &mut sink).tokenize();
        let program = {
            let mut parser = Parser::new(tokens, &mut interner, arenas.ctx(), &mut sink);
            parser.parse_program()
        };
        assert!(!sink.has_errors(), "parse failed: {}", sink.render());
        codegen_program(&program, &interner)
    }

    #[test]
    fn type_annotation_is_erased() {
        let out = emit("let x: number = 42;");
        assert!(out.contains("let x = 42;"), "{}", out);
        assert!(!out.contains(':'), "{}", out);
    }

    #[test]
    fn const_keyword_is_kept() {
        let out = emit("const greeting: string = \"hi\";");
        assert!(out.contains("const greeting = \"hi\";"), "{}", out);
    }

    #[test]
    fn binary_expressions_are_parenthesized() {
        let out = emit("let x = 1 + 2 * 3;");
        assert!(out.contains("let x = (1 + (2 * 3));"), "{}", out);
    }

    #[test]
    fn for_loop_condition_is_parenthesized() {
        let out = emit("for (let i = 0; i < 5; i++) { console.log(i); }");
        assert!(out.contains("for (let i = 0; (i < 5); i++) {"), "{}", out);
        assert!(out.contains("console.log(i);"), "{}", out);
    }

    #[test]
    fn interface_becomes_comment() {
        let out = emit("interface Shape { area(): number; }");
        assert!(
            out.contains("// Interface Shape (not emitted in JavaScript)"),
            "{}",
            out
        );
        assert!(!out.contains("interface"), "{}", out);
    }

    #[test]
    fn class_members_lose_modifiers_and_types() {
        let source = "class C { private n: number; constructor(n: number) { this.n = n; } greet(): string { return \"hi\"; } }";
        let out = emit(source);
        assert!(out.contains("constructor(n) {"), "{}", out);
        assert!(out.contains("this.n = n;"), "{}", out);
        assert!(out.contains("greet() {"), "{}", out);
        assert!(!out.contains("private"), "{}", out);
        assert!(!out.contains("number"), "{}", out);
        assert!(!out.contains("string"), "{}", out);
    }

    #[test]
    fn synthesized_constructor_calls_super_and_initializes() {
        let source = "class Base {}\nclass Child extends Base { count: number = 0; }";
        let out = emit(source);
        assert!(out.contains("class Child extends Base {"), "{}", out);
        assert!(out.contains("constructor() {"), "{}", out);
        assert!(out.contains("super();"), "{}", out);
        assert!(out.contains("this.count = 0;"), "{}", out);
    }

    #[test]
    fn user_constructor_suppresses_synthesis() {
        let source = "class C { n: number = 1; constructor(n: number) { this.n = n; } }";
        let out = emit(source);
        // The initializer is not injected into the user-written constructor.
        assert!(!out.contains("constructor() {"), "{}", out);
        assert_eq!(out.matches("constructor(").count(), 1, "{}", out);
    }

    #[test]
    fn static_property_keeps_static_keyword() {
        let out = emit("class C { static total: number = 0; }");
        assert!(out.contains("static total = 0;"), "{}", out);
    }

    #[test]
    fn imports_and_exports_become_comments() {
        let out = emit("import { a, b as c } from \"m\";\nexport default 1;");
        assert!(out.contains("// import { a, b as c } from \"m\";"), "{}", out);
        assert!(out.contains("// export default 1;"), "{}", out);
    }

    #[test]
    fn exported_declaration_is_emitted() {
        let out = emit("export let x: number = 1;");
        assert!(out.contains("let x = 1;"), "{}", out);
    }

    #[test]
    fn string_literals_are_reescaped() {
        let out = emit("let s = \"line\\nnext\\t\\\"q\\\"\";");
        assert!(out.contains("let s = \"line\\nnext\\t\\\"q\\\"\";"), "{}", out);
    }

    #[test]
    fn optional_chain_is_preserved() {
        let out = emit("let v = obj?.field;");
        assert!(out.contains("obj?.field"), "{}", out);
    }

    #[test]
    fn postfix_and_prefix_unaries_keep_position() {
        let out = emit("i++;\n--j;");
        assert!(out.contains("i++;"), "{}", out);
        assert!(out.contains("--j;"), "{}", out);
    }

    #[test]
    fn numbers_render_as_doubles() {
        let out = emit("let a = 42;\nlet b = 3.14;\nlet c = 1e3;");
        assert!(out.contains("let a = 42;"), "{}", out);
        assert!(out.contains("let b = 3.14;"), "{}", out);
        assert!(out.contains("let c = 1000;"), "{}", out);
    }

    #[test]
    fn empty_program_emits_nothing() {
        assert_eq!(emit(""), "");
    }

    #[test]
    fn do_while_and_break_emit() {
        let out = emit("do { break; } while (true);");
        assert!(out.contains("do {"), "{}", out);
        assert!(out.contains("break;"), "{}", out);
        assert!(out.contains("} while (true);"), "{}", out);
    }

    #[test]
    fn else_branch_is_braced() {
        let out = emit("if (true) { x; } else { y; }");
        assert!(out.contains("if (true) {"), "{}", out);
        assert!(out.contains("} else {"), "{}", out);
    }
}
