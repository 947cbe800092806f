mod types;


use std::collections::HashSet;

use crate::arena_ctx::AstContext;
use crate::ast::{
    ClassDecl, ClassMember, ExportKind, Expr, Function, InterfaceDecl, InterfaceMember, Literal,
    Param, Program, Stmt, TypeAnn, UnaryOp, VarKind,
};
use crate::diagnostics::DiagnosticSink;
use crate::intern::{Interner, Symbol};
use crate::scope::{ScopeStack, SymbolKind};
use crate::suggest::find_similar;
use crate::token::Span;

/// Global value names installed at program entry.
const BUILTIN_VALUES: &[&str] = &[
    "console", "Math", "Date", "Array", "Object", "String", "Number", "Boolean",
];

/// Global type names installed at program entry.
const BUILTIN_TYPES: &[&str] = &[
    "any",
    "void",
    "number",
    "string",
    "boolean",
    "undefined",
    "null",
];

/// AST walker with a scoped symbol table. Infers a type for every
/// expression, checks assignability, and reports through the shared sink;
/// no check aborts the traversal.
pub struct Analyzer<'a, 'int, 'sink> {
    interner: &'int mut Interner,
    ctx: AstContext<'a>,
    sink: &'sink mut DiagnosticSink,
    scopes: ScopeStack<'a>,
    is_typescript: bool,

    /// Declared return type of each enclosing function, innermost last.
    /// Empty means we are outside any function.
    return_types: Vec<Option<&'a TypeAnn<'a>>>,
    /// Enclosing class names, for typing `this`.
    class_stack: Vec<Symbol>,
    /// Variables whose initializers are currently being inferred; guards the
    /// lazy identifier rule against `let x = x;`.
    inferring: HashSet<Symbol>,

    pub(crate) sym_any: Symbol,
    pub(crate) sym_number: Symbol,
    pub(crate) sym_string: Symbol,
    pub(crate) sym_boolean: Symbol,
    pub(crate) sym_void: Symbol,
    pub(crate) sym_null: Symbol,
    pub(crate) sym_undefined: Symbol,
    sym_constructor: Symbol,
    sym_super: Symbol,

    any_ty: &'a TypeAnn<'a>,
    number_ty: &'a TypeAnn<'a>,
    string_ty: &'a TypeAnn<'a>,
    boolean_ty: &'a TypeAnn<'a>,
    null_ty: &'a TypeAnn<'a>,
    undefined_ty: &'a TypeAnn<'a>,
}

impl<'a, 'int, 'sink> Analyzer<'a, 'int, 'sink> {
    pub fn new(
        interner: &'int mut Interner,
        ctx: AstContext<'a>,
        sink: &'sink mut DiagnosticSink,
        is_typescript: bool,
    ) -> Self {
        let sym_any = interner.intern("any");
        let sym_number = interner.intern("number");
        let sym_string = interner.intern("string");
        let sym_boolean = interner.intern("boolean");
        let sym_void = interner.intern("void");
        let sym_null = interner.intern("null");
        let sym_undefined = interner.intern("undefined");
        let sym_constructor = interner.intern("constructor");
        let sym_super = interner.intern("super");

        let origin = Span::default();
        Analyzer {
            any_ty: ctx.named_type(sym_any, origin),
            number_ty: ctx.named_type(sym_number, origin),
            string_ty: ctx.named_type(sym_string, origin),
            boolean_ty: ctx.named_type(sym_boolean, origin),
            null_ty: ctx.named_type(sym_null, origin),
            undefined_ty: ctx.named_type(sym_undefined, origin),
            interner,
            ctx,
            sink,
            scopes: ScopeStack::new(),
            is_typescript,
            return_types: Vec::new(),
            class_stack: Vec::new(),
            inferring: HashSet::new(),
            sym_any,
            sym_number,
            sym_string,
            sym_boolean,
            sym_void,
            sym_null,
            sym_undefined,
            sym_constructor,
            sym_super,
        }
    }

    pub fn analyze(&mut self, program: &Program<'a>) {
        self.scopes.push_scope();
        self.install_builtins();
        self.hoist(program);
        for stmt in &program.statements {
            self.visit_stmt(stmt);
        }
        self.scopes.pop_scope();
    }

    /// Exposed for the scope-balance property test.
    pub fn scope_depth(&self) -> usize {
        self.scopes.depth()
    }

    fn install_builtins(&mut self) {
        for name in BUILTIN_TYPES {
            let sym = self.interner.intern(name);
            self.scopes.define(sym, SymbolKind::BuiltinType);
        }
        for name in BUILTIN_VALUES {
            let sym = self.interner.intern(name);
            self.scopes.define(sym, SymbolKind::BuiltinValue);
        }
    }

    /// First pass: register top-level declarations by name so forward
    /// references resolve. This is the only forward-declaration mechanism.
    fn hoist(&mut self, program: &Program<'a>) {
        for stmt in &program.statements {
            self.hoist_stmt(stmt);
        }
    }

    fn hoist_stmt(&mut self, stmt: &Stmt<'a>) {
        match stmt {
            Stmt::FunctionDecl(func) => {
                if let Some(name) = func.name {
                    self.scopes.define(name, SymbolKind::Function(*func));
                }
            }
            Stmt::ClassDecl(class) => {
                self.scopes.define(class.name, SymbolKind::Class(*class));
            }
            Stmt::InterfaceDecl(iface) => {
                self.scopes
                    .define(iface.name, SymbolKind::Interface(*iface));
            }
            Stmt::VarDecl {
                name,
                kind,
                ty,
                init,
                ..
            } => {
                self.scopes.define(
                    *name,
                    SymbolKind::Variable {
                        ty: *ty,
                        init: *init,
                        is_const: *kind == VarKind::Const,
                    },
                );
            }
            // Exported declarations are top-level declarations too.
            Stmt::Export {
                kind: ExportKind::Decl(inner),
                ..
            } => self.hoist_stmt(inner),
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn visit_stmt(&mut self, stmt: &Stmt<'a>) {
        match stmt {
            Stmt::Block { statements, .. } => {
                self.scopes.push_scope();
                for s in statements {
                    self.visit_stmt(s);
                }
                self.scopes.pop_scope();
            }

            Stmt::VarDecl {
                name,
                kind,
                ty,
                init,
                span,
            } => self.visit_var_decl(*name, *kind, *ty, *init, *span),

            Stmt::FunctionDecl(func) => {
                if let Some(name) = func.name {
                    self.scopes.define(name, SymbolKind::Function(*func));
                }
                self.check_function(func);
            }

            Stmt::ClassDecl(class) => self.visit_class(class),

            Stmt::InterfaceDecl(iface) => self.visit_interface(iface),

            Stmt::ExprStmt { expr, .. } => {
                self.visit_expr(expr);
            }

            Stmt::Return { value, span } => self.visit_return(*value, *span),

            Stmt::If {
                cond,
                then_branch,
                else_branch,
                ..
            } => {
                self.visit_expr(cond);
                self.visit_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.visit_stmt(else_branch);
                }
            }

            Stmt::While { cond, body, .. } => {
                self.visit_expr(cond);
                self.visit_stmt(body);
            }

            Stmt::DoWhile { body, cond, .. } => {
                self.visit_stmt(body);
                self.visit_expr(cond);
            }

            Stmt::For {
                init,
                cond,
                update,
                body,
                ..
            } => {
                self.scopes.push_scope();
                if let Some(init) = init {
                    self.visit_stmt(init);
                }
                if let Some(cond) = cond {
                    self.visit_expr(cond);
                }
                if let Some(update) = update {
                    self.visit_expr(update);
                }
                self.visit_stmt(body);
                self.scopes.pop_scope();
            }

            Stmt::Import {
                default,
                named,
                namespace,
                ..
            } => {
                // Imported names are opaque to the analyzer; bind them as
                // untyped variables so uses resolve.
                let mut bound = Vec::new();
                if let Some(name) = default {
                    bound.push(*name);
                }
                if let Some(name) = namespace {
                    bound.push(*name);
                }
                for spec in named {
                    bound.push(spec.alias.unwrap_or(spec.name));
                }
                for name in bound {
                    self.scopes.define(
                        name,
                        SymbolKind::Variable {
                            ty: None,
                            init: None,
                            is_const: false,
                        },
                    );
                }
            }

            Stmt::Export { kind, .. } => match kind {
                ExportKind::Default(expr) => {
                    self.visit_expr(expr);
                }
                ExportKind::Named { .. } => {}
                ExportKind::Decl(inner) => self.visit_stmt(inner),
            },

            Stmt::Break { .. } | Stmt::Continue { .. } | Stmt::Empty { .. } => {}
        }
    }

    fn visit_var_decl(
        &mut self,
        name: Symbol,
        kind: VarKind,
        ty: Option<&'a TypeAnn<'a>>,
        init: Option<&'a Expr<'a>>,
        span: Span,
    ) {
        let init_ty = init.map(|e| self.visit_expr(e));

        if let (Some(declared), Some(inferred), Some(init_expr)) = (ty, init_ty, init) {
            if !self.assignable(inferred, declared) {
                let message = format!(
                    "Type '{}' is not assignable to type '{}'",
                    self.type_display(inferred),
                    self.type_display(declared)
                );
                self.sink.report(init_expr.span(), message);
            }
        }

        if self.is_typescript && ty.is_none() && init.is_none() {
            let message = format!(
                "Variable '{}' has no type annotation and is not initialized",
                self.interner.resolve(name)
            );
            self.sink.report(span, message);
        }

        self.scopes.define(
            name,
            SymbolKind::Variable {
                ty,
                init,
                is_const: kind == VarKind::Const,
            },
        );
    }

    fn visit_return(&mut self, value: Option<&'a Expr<'a>>, span: Span) {
        if self.return_types.is_empty() {
            self.sink.report(span, "Return statement outside of function");
            if let Some(value) = value {
                self.visit_expr(value);
            }
            return;
        }

        let declared = *self.return_types.last().unwrap_or(&None);
        match (value, declared) {
            (Some(value), Some(declared)) => {
                let value_ty = self.visit_expr(value);
                if self.is_void(declared) {
                    self.sink.report(
                        value.span(),
                        "Function with return type 'void' cannot return a value",
                    );
                } else if !self.assignable(value_ty, declared) {
                    let message = format!(
                        "Type '{}' is not assignable to type '{}'",
                        self.type_display(value_ty),
                        self.type_display(declared)
                    );
                    self.sink.report(value.span(), message);
                }
            }
            (None, Some(declared)) => {
                if !self.is_void(declared) {
                    let message = format!(
                        "Function with return type '{}' must return a value",
                        self.type_display(declared)
                    );
                    self.sink.report(span, message);
                }
            }
            (Some(value), None) => {
                self.visit_expr(value);
            }
            (None, None) => {}
        }
    }

    /// Parameter checks, then the body in a fresh scope with parameters
    /// bound. Used for function declarations, function expressions, and
    /// (via `check_callable_body`) methods.
    fn check_function(&mut self, func: &'a Function<'a>) {
        self.check_params(&func.params);
        self.check_callable_body(&func.params, func.return_ty, &func.body);
    }

    fn check_params(&mut self, params: &[Param<'a>]) {
        if !self.is_typescript {
            return;
        }
        for param in params {
            if param.ty.is_none() {
                let message = format!(
                    "Parameter '{}' has no type annotation",
                    self.interner.resolve(param.name)
                );
                self.sink.report(param.span, message);
            }
        }
    }

    fn check_callable_body(
        &mut self,
        params: &[Param<'a>],
        return_ty: Option<&'a TypeAnn<'a>>,
        body: &'a [Stmt<'a>],
    ) {
        self.scopes.push_scope();
        for param in params {
            self.scopes
                .define(param.name, SymbolKind::Parameter { ty: param.ty });
        }
        self.return_types.push(return_ty);
        for stmt in body {
            self.visit_stmt(stmt);
        }
        self.return_types.pop();
        self.scopes.pop_scope();
    }

    fn visit_class(&mut self, class: &'a ClassDecl<'a>) {
        self.scopes.define(class.name, SymbolKind::Class(class));

        if let Some(superclass) = class.superclass {
            match self.scopes.resolve(superclass).map(|e| e.kind) {
                Some(SymbolKind::Class(_)) => {}
                None => {
                    let message =
                        format!("Cannot find name '{}'", self.interner.resolve(superclass));
                    self.sink.report(class.span, message);
                }
                Some(_) => {
                    let message =
                        format!("'{}' is not a class", self.interner.resolve(superclass));
                    self.sink.report(class.span, message);
                }
            }
        }

        for iface in &class.interfaces {
            match self.scopes.resolve(*iface).map(|e| e.kind) {
                Some(SymbolKind::Interface(_)) => {}
                None => {
                    let message = format!("Cannot find name '{}'", self.interner.resolve(*iface));
                    self.sink.report(class.span, message);
                }
                Some(_) => {
                    let message =
                        format!("'{}' is not an interface", self.interner.resolve(*iface));
                    self.sink.report(class.span, message);
                }
            }
        }

        self.scopes.push_scope();
        self.class_stack.push(class.name);
        // `super` is callable and dottable inside class bodies.
        self.scopes.define(self.sym_super, SymbolKind::BuiltinValue);

        for member in &class.members {
            match member {
                ClassMember::Property { ty, init, .. } => {
                    if let Some(init) = init {
                        let init_ty = self.visit_expr(init);
                        if let Some(declared) = ty {
                            if !self.assignable(init_ty, declared) {
                                let message = format!(
                                    "Type '{}' is not assignable to type '{}'",
                                    self.type_display(init_ty),
                                    self.type_display(declared)
                                );
                                self.sink.report(init.span(), message);
                            }
                        }
                    }
                }
                ClassMember::Method {
                    params,
                    return_ty,
                    body,
                    ..
                } => {
                    self.check_params(params);
                    self.check_callable_body(params, *return_ty, body);
                }
            }
        }

        self.class_stack.pop();
        self.scopes.pop_scope();
    }

    fn visit_interface(&mut self, iface: &'a InterfaceDecl<'a>) {
        self.scopes.define(iface.name, SymbolKind::Interface(iface));

        for parent in &iface.extends {
            match self.scopes.resolve(*parent).map(|e| e.kind) {
                Some(SymbolKind::Interface(_)) => {}
                None => {
                    let message = format!("Cannot find name '{}'", self.interner.resolve(*parent));
                    self.sink.report(iface.span, message);
                }
                Some(_) => {
                    let message =
                        format!("'{}' is not an interface", self.interner.resolve(*parent));
                    self.sink.report(iface.span, message);
                }
            }
        }

        for member in &iface.members {
            match member {
                InterfaceMember::Property { ty, .. } => self.check_type(ty),
                InterfaceMember::Method {
                    params, return_ty, ..
                } => {
                    self.check_params(params);
                    for param in params {
                        if let Some(ty) = param.ty {
                            self.check_type(ty);
                        }
                    }
                    self.check_type(return_ty);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    pub fn visit_expr(&mut self, expr: &'a Expr<'a>) -> &'a TypeAnn<'a> {
        match expr {
            Expr::Literal { value, .. } => match value {
                Literal::Number(_) => self.number_ty,
                Literal::Str(_) => self.string_ty,
                Literal::Bool(_) => self.boolean_ty,
                Literal::Null => self.null_ty,
                Literal::Undefined => self.undefined_ty,
            },

            Expr::Identifier { name, span } => self.visit_identifier(*name, *span),

            Expr::This { .. } => match self.class_stack.last() {
                Some(class) => self.ctx.named_type(*class, expr.span()),
                None => self.any_ty,
            },

            Expr::Binary {
                op, left, right, ..
            } => self.visit_binary(*op, left, right),

            Expr::Unary { op, operand, .. } => self.visit_unary(*op, operand),

            Expr::Assign {
                op,
                target,
                value,
                ..
            } => self.visit_assign(*op, target, value),

            Expr::Call { callee, args, span } => self.visit_call(callee, args, *span),

            Expr::Member {
                object, property, ..
            } => {
                let object_ty = self.visit_expr(object);
                self.member_type(object_ty, *property)
            }

            Expr::Index { object, index, .. } => {
                self.visit_expr(index);
                let object_ty = self.visit_expr(object);
                match object_ty {
                    TypeAnn::Array { element, .. } => *element,
                    _ => self.any_ty,
                }
            }

            Expr::Conditional {
                cond,
                then_expr,
                else_expr,
                ..
            } => {
                let cond_ty = self.visit_expr(cond);
                if !self.is_boolean(cond_ty) && !self.is_any(cond_ty) {
                    self.sink
                        .report(cond.span(), "Condition must be of type 'boolean'");
                }
                let then_ty = self.visit_expr(then_expr);
                let else_ty = self.visit_expr(else_expr);
                if self.assignable(then_ty, else_ty) {
                    else_ty
                } else if self.assignable(else_ty, then_ty) {
                    then_ty
                } else if self.is_typescript {
                    self.ctx.union_type(vec![then_ty, else_ty], expr.span())
                } else {
                    self.any_ty
                }
            }

            Expr::New { callee, args, span } => self.visit_new(callee, args, *span),

            Expr::Object { properties, span } => {
                let mut props = Vec::new();
                for prop in properties {
                    let ty = self.visit_expr(prop.value);
                    props.push(crate::ast::ObjectTypeProp {
                        name: prop.key,
                        ty,
                        optional: false,
                    });
                }
                self.ctx.alloc_type(TypeAnn::Object { props, span: *span })
            }

            Expr::Array { elements, span } => {
                let mut element_ty = self.any_ty;
                for (i, element) in elements.iter().enumerate() {
                    let ty = self.visit_expr(element);
                    if i == 0 {
                        element_ty = ty;
                    } else if !(self.assignable(ty, element_ty)
                        && self.assignable(element_ty, ty))
                    {
                        element_ty = self.any_ty;
                    }
                }
                self.ctx.array_type(element_ty, *span)
            }

            Expr::Function(func) => {
                self.check_function(func);
                self.function_type(&func.params, func.return_ty, func.span)
            }
        }
    }

    fn visit_identifier(&mut self, name: Symbol, span: Span) -> &'a TypeAnn<'a> {
        let Some(kind) = self.scopes.resolve(name).map(|e| e.kind) else {
            let mut message = format!("Cannot find name '{}'", self.interner.resolve(name));
            let visible: Vec<String> = self
                .scopes
                .visible_names()
                .iter()
                .map(|s| self.interner.resolve(*s).to_string())
                .collect();
            if let Some(suggestion) = find_similar(self.interner.resolve(name), &visible, 2) {
                message.push_str(&format!(". Did you mean '{}'?", suggestion));
            }
            self.sink.report(span, message);
            return self.any_ty;
        };

        match kind {
            SymbolKind::Variable { ty: Some(ty), .. } => ty,
            SymbolKind::Variable {
                ty: None,
                init: Some(init),
                ..
            } => {
                // Lazy inference through the initializer; guard against
                // self-reference.
                if self.inferring.contains(&name) {
                    return self.any_ty;
                }
                self.inferring.insert(name);
                let ty = self.visit_expr(init);
                self.inferring.remove(&name);
                ty
            }
            SymbolKind::Variable { .. } => self.any_ty,
            SymbolKind::Parameter { ty } => ty.unwrap_or(self.any_ty),
            SymbolKind::Function(func) => {
                self.function_type(&func.params, func.return_ty, func.span)
            }
            SymbolKind::Class(_)
            | SymbolKind::Interface(_)
            | SymbolKind::BuiltinType
            | SymbolKind::BuiltinValue => self.any_ty,
        }
    }

    fn visit_binary(
        &mut self,
        op: crate::ast::BinaryOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    ) -> &'a TypeAnn<'a> {
        use crate::ast::BinaryOp;

        let left_ty = self.visit_expr(left);
        let right_ty = self.visit_expr(right);

        match op {
            BinaryOp::Add => {
                if self.is_string(left_ty) || self.is_string(right_ty) {
                    self.string_ty
                } else {
                    self.require_numeric(left_ty, left.span(), op.js());
                    self.require_numeric(right_ty, right.span(), op.js());
                    self.number_ty
                }
            }
            op if op.is_numeric() => {
                self.require_numeric(left_ty, left.span(), op.js());
                self.require_numeric(right_ty, right.span(), op.js());
                self.number_ty
            }
            op if op.is_comparison() => self.boolean_ty,
            op if op.is_logical() => {
                self.require_boolean(left_ty, left.span(), op.js());
                self.require_boolean(right_ty, right.span(), op.js());
                self.boolean_ty
            }
            _ => self.any_ty,
        }
    }

    fn visit_unary(&mut self, op: UnaryOp, operand: &'a Expr<'a>) -> &'a TypeAnn<'a> {
        let operand_ty = self.visit_expr(operand);
        match op {
            UnaryOp::Not => self.boolean_ty,
            UnaryOp::Typeof => self.string_ty,
            UnaryOp::Neg | UnaryOp::Plus | UnaryOp::BitNot | UnaryOp::Inc | UnaryOp::Dec => {
                self.require_numeric(operand_ty, operand.span(), op.js());
                self.number_ty
            }
        }
    }

    fn visit_assign(
        &mut self,
        op: crate::ast::AssignOp,
        target: &'a Expr<'a>,
        value: &'a Expr<'a>,
    ) -> &'a TypeAnn<'a> {
        use crate::ast::AssignOp;

        if let Expr::Identifier { name, span } = target {
            if let Some(entry) = self.scopes.resolve(*name) {
                if let SymbolKind::Variable { is_const: true, .. } = entry.kind {
                    let message = format!(
                        "Cannot assign to '{}' because it is a constant",
                        self.interner.resolve(*name)
                    );
                    self.sink.report(*span, message);
                }
            }
        }

        let target_ty = self.visit_expr(target);
        let value_ty = self.visit_expr(value);

        match op {
            AssignOp::Assign => {
                if !self.assignable(value_ty, target_ty) {
                    let message = format!(
                        "Type '{}' is not assignable to type '{}'",
                        self.type_display(value_ty),
                        self.type_display(target_ty)
                    );
                    self.sink.report(value.span(), message);
                }
                value_ty
            }
            AssignOp::Add => {
                if self.is_string(target_ty) || self.is_string(value_ty) {
                    self.string_ty
                } else {
                    self.require_numeric(target_ty, target.span(), "+=");
                    self.require_numeric(value_ty, value.span(), "+=");
                    self.number_ty
                }
            }
            AssignOp::Sub | AssignOp::Mul | AssignOp::Div | AssignOp::Rem => {
                self.require_numeric(target_ty, target.span(), op.js());
                self.require_numeric(value_ty, value.span(), op.js());
                self.number_ty
            }
        }
    }

    fn visit_call(
        &mut self,
        callee: &'a Expr<'a>,
        args: &[&'a Expr<'a>],
        span: Span,
    ) -> &'a TypeAnn<'a> {
        let callee_ty = self.visit_expr(callee);

        match callee_ty {
            TypeAnn::Function { params, ret, .. } => {
                if args.len() != params.len() {
                    let message = format!(
                        "Expected {} arguments, but got {}",
                        params.len(),
                        args.len()
                    );
                    self.sink.report(span, message);
                }
                for (arg, param_ty) in args.iter().zip(params.iter()) {
                    let arg_ty = self.visit_expr(arg);
                    if !self.assignable(arg_ty, param_ty) {
                        let message = format!(
                            "Argument of type '{}' is not assignable to parameter of type '{}'",
                            self.type_display(arg_ty),
                            self.type_display(param_ty)
                        );
                        self.sink.report(arg.span(), message);
                    }
                }
                // Extra arguments are still visited for their own errors.
                for arg in args.iter().skip(params.len()) {
                    self.visit_expr(arg);
                }
                *ret
            }
            _ if self.is_any(callee_ty) => {
                for arg in args {
                    self.visit_expr(arg);
                }
                self.any_ty
            }
            _ => {
                self.sink.report(callee.span(), "Expression is not callable");
                for arg in args {
                    self.visit_expr(arg);
                }
                self.any_ty
            }
        }
    }

    fn visit_new(
        &mut self,
        callee: &'a Expr<'a>,
        args: &[&'a Expr<'a>],
        span: Span,
    ) -> &'a TypeAnn<'a> {
        let Expr::Identifier { name, span: id_span } = callee else {
            // `new ns.Thing(...)`: the target is opaque.
            for arg in args {
                self.visit_expr(arg);
            }
            return self.any_ty;
        };

        match self.scopes.resolve(*name).map(|e| e.kind) {
            Some(SymbolKind::Class(class)) => {
                if let Some(ClassMember::Method { params, .. }) =
                    class.constructor(self.sym_constructor)
                {
                    if args.len() != params.len() {
                        let message = format!(
                            "Expected {} arguments, but got {}",
                            params.len(),
                            args.len()
                        );
                        self.sink.report(span, message);
                    }
                    let param_tys: Vec<Option<&'a TypeAnn<'a>>> =
                        params.iter().map(|p| p.ty).collect();
                    for (arg, param_ty) in args.iter().zip(param_tys.iter()) {
                        let arg_ty = self.visit_expr(arg);
                        if let Some(param_ty) = param_ty {
                            if !self.assignable(arg_ty, param_ty) {
                                let message = format!(
                                    "Argument of type '{}' is not assignable to parameter of type '{}'",
                                    self.type_display(arg_ty),
                                    self.type_display(param_ty)
                                );
                                self.sink.report(arg.span(), message);
                            }
                        }
                    }
                    for arg in args.iter().skip(param_tys.len()) {
                        self.visit_expr(arg);
                    }
                } else {
                    for arg in args {
                        self.visit_expr(arg);
                    }
                }
            }
            None => {
                let message = format!("Cannot find name '{}'", self.interner.resolve(*name));
                self.sink.report(*id_span, message);
                for arg in args {
                    self.visit_expr(arg);
                }
            }
            Some(_) => {
                // Built-in constructors (Array, Date, ...) take anything.
                for arg in args {
                    self.visit_expr(arg);
                }
            }
        }

        self.ctx.named_type(*name, *id_span)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn function_type(
        &mut self,
        params: &[Param<'a>],
        return_ty: Option<&'a TypeAnn<'a>>,
        span: Span,
    ) -> &'a TypeAnn<'a> {
        let param_tys: Vec<&'a TypeAnn<'a>> = params
            .iter()
            .map(|p| p.ty.unwrap_or(self.any_ty))
            .collect();
        self.ctx.alloc_type(TypeAnn::Function {
            params: param_tys,
            ret: return_ty.unwrap_or(self.any_ty),
            span,
        })
    }

    /// Member access typing: object types and class instances surface their
    /// declared members; everything else is `any`.
    fn member_type(&mut self, object_ty: &'a TypeAnn<'a>, property: Symbol) -> &'a TypeAnn<'a> {
        match object_ty {
            TypeAnn::Object { props, .. } => props
                .iter()
                .find(|p| p.name == property)
                .map(|p| p.ty)
                .unwrap_or(self.any_ty),
            TypeAnn::Named { name, .. } => {
                match self.scopes.resolve(*name).map(|e| e.kind) {
                    Some(SymbolKind::Class(class)) => {
                        for member in &class.members {
                            match member {
                                ClassMember::Property { name, ty, .. } if *name == property => {
                                    return ty.unwrap_or(self.any_ty);
                                }
                                ClassMember::Method {
                                    name,
                                    params,
                                    return_ty,
                                    span,
                                    ..
                                } if *name == property => {
                                    return self.function_type(params, *return_ty, *span);
                                }
                                _ => {}
                            }
                        }
                        self.any_ty
                    }
                    _ => self.any_ty,
                }
            }
            _ => self.any_ty,
        }
    }

    fn require_numeric(&mut self, ty: &'a TypeAnn<'a>, span: Span, op: &str) {
        if !self.is_number(ty) && !self.is_any(ty) {
            let message = format!(
                "Operator '{}' cannot be applied to type '{}'",
                op,
                self.type_display(ty)
            );
            self.sink.report(span, message);
        }
    }

    fn require_boolean(&mut self, ty: &'a TypeAnn<'a>, span: Span, op: &str) {
        if !self.is_boolean(ty) && !self.is_any(ty) {
            let message = format!(
                "Operator '{}' requires boolean operands, got '{}'",
                op,
                self.type_display(ty)
            );
            self.sink.report(span, message);
        }
    }
}
