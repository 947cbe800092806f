use crate::intern::Symbol;
use crate::token::Span;

use super::expr::Expr;
use super::types::TypeAnn;

/// Root of the AST. `is_module` is true when any `import` or `export`
/// keyword appeared in the token stream.
#[derive(Debug)]
pub struct Program<'a> {
    pub statements: Vec<Stmt<'a>>,
    pub is_module: bool,
}

impl<'a> Program<'a> {
    pub fn empty() -> Self {
        Program {
            statements: Vec::new(),
            is_module: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Let,
    Const,
    Var,
}

impl VarKind {
    pub fn js(self) -> &'static str {
        match self {
            VarKind::Let => "let",
            VarKind::Const => "const",
            VarKind::Var => "var",
        }
    }
}

/// Access modifier on class members. Defaults to `Public` when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    #[default]
    Public,
    Private,
    Protected,
}

/// A function parameter: `name` or `name: T`.
#[derive(Debug)]
pub struct Param<'a> {
    pub name: Symbol,
    pub ty: Option<&'a TypeAnn<'a>>,
    pub span: Span,
}

/// A function declaration or function expression. Anonymous functions have
/// no name.
#[derive(Debug)]
pub struct Function<'a> {
    pub name: Option<Symbol>,
    pub params: Vec<Param<'a>>,
    pub return_ty: Option<&'a TypeAnn<'a>>,
    pub body: Vec<Stmt<'a>>,
    pub span: Span,
}

#[derive(Debug)]
pub enum ClassMember<'a> {
    Property {
        name: Symbol,
        ty: Option<&'a TypeAnn<'a>>,
        init: Option<&'a Expr<'a>>,
        access: Access,
        is_static: bool,
        is_readonly: bool,
        span: Span,
    },
    Method {
        name: Symbol,
        params: Vec<Param<'a>>,
        return_ty: Option<&'a TypeAnn<'a>>,
        body: Vec<Stmt<'a>>,
        access: Access,
        is_static: bool,
        span: Span,
    },
}

impl<'a> ClassMember<'a> {
    pub fn name(&self) -> Symbol {
        match self {
            ClassMember::Property { name, .. } | ClassMember::Method { name, .. } => *name,
        }
    }
}

#[derive(Debug)]
pub struct ClassDecl<'a> {
    pub name: Symbol,
    pub superclass: Option<Symbol>,
    pub interfaces: Vec<Symbol>,
    pub members: Vec<ClassMember<'a>>,
    pub span: Span,
}

impl<'a> ClassDecl<'a> {
    /// The user-written `constructor` method, if any.
    pub fn constructor(&self, ctor_name: Symbol) -> Option<&ClassMember<'a>> {
        self.members.iter().find(|member| {
            matches!(member, ClassMember::Method { name, .. } if *name == ctor_name)
        })
    }
}

/// Interface members mirror class members without bodies or initializers.
#[derive(Debug)]
pub enum InterfaceMember<'a> {
    Property {
        name: Symbol,
        ty: &'a TypeAnn<'a>,
        optional: bool,
        readonly: bool,
        span: Span,
    },
    Method {
        name: Symbol,
        params: Vec<Param<'a>>,
        return_ty: &'a TypeAnn<'a>,
        span: Span,
    },
}

#[derive(Debug)]
pub struct InterfaceDecl<'a> {
    pub name: Symbol,
    pub extends: Vec<Symbol>,
    pub members: Vec<InterfaceMember<'a>>,
    pub span: Span,
}

/// One name in an import/export list: `a` or `a as b`.
#[derive(Debug, Clone, Copy)]
pub struct ImportSpecifier {
    pub name: Symbol,
    pub alias: Option<Symbol>,
}

#[derive(Debug)]
pub enum ExportKind<'a> {
    /// `export default <expression>;`
    Default(&'a Expr<'a>),
    /// `export { a, b as c } [from "m"];`
    Named {
        specifiers: Vec<ImportSpecifier>,
        module: Option<Symbol>,
    },
    /// `export <declaration>`
    Decl(&'a Stmt<'a>),
}

/// Statement AST.
#[derive(Debug)]
pub enum Stmt<'a> {
    Block {
        statements: Vec<Stmt<'a>>,
        span: Span,
    },

    VarDecl {
        name: Symbol,
        kind: VarKind,
        ty: Option<&'a TypeAnn<'a>>,
        init: Option<&'a Expr<'a>>,
        span: Span,
    },

    FunctionDecl(&'a Function<'a>),

    ClassDecl(&'a ClassDecl<'a>),

    InterfaceDecl(&'a InterfaceDecl<'a>),

    ExprStmt {
        expr: &'a Expr<'a>,
        span: Span,
    },

    Return {
        value: Option<&'a Expr<'a>>,
        span: Span,
    },

    If {
        cond: &'a Expr<'a>,
        then_branch: &'a Stmt<'a>,
        else_branch: Option<&'a Stmt<'a>>,
        span: Span,
    },

    While {
        cond: &'a Expr<'a>,
        body: &'a Stmt<'a>,
        span: Span,
    },

    DoWhile {
        body: &'a Stmt<'a>,
        cond: &'a Expr<'a>,
        span: Span,
    },

    For {
        init: Option<&'a Stmt<'a>>,
        cond: Option<&'a Expr<'a>>,
        update: Option<&'a Expr<'a>>,
        body: &'a Stmt<'a>,
        span: Span,
    },

    Break {
        span: Span,
    },

    Continue {
        span: Span,
    },

    Import {
        default: Option<Symbol>,
        named: Vec<ImportSpecifier>,
        namespace: Option<Symbol>,
        module: Symbol,
        span: Span,
    },

    Export {
        kind: ExportKind<'a>,
        span: Span,
    },

    Empty {
        span: Span,
    },
}

impl<'a> Stmt<'a> {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Block { span, .. }
            | Stmt::VarDecl { span, .. }
            | Stmt::ExprStmt { span, .. }
            | Stmt::Return { span, .. }
            | Stmt::If { span, .. }
            | Stmt::While { span, .. }
            | Stmt::DoWhile { span, .. }
            | Stmt::For { span, .. }
            | Stmt::Break { span }
            | Stmt::Continue { span }
            | Stmt::Import { span, .. }
            | Stmt::Export { span, .. }
            | Stmt::Empty { span } => *span,
            Stmt::FunctionDecl(func) => func.span,
            Stmt::ClassDecl(class) => class.span,
            Stmt::InterfaceDecl(iface) => iface.span,
        }
    }
}
