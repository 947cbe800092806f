use crate::arena::Arena;
use crate::ast::{ClassDecl, Expr, Function, InterfaceDecl, Stmt, TypeAnn};
use crate::intern::Symbol;
use crate::token::Span;

/// Bundle of arena handles threaded through the parser and the semantic
/// analyzer. Copying the context copies the handles, not the arenas.
#[derive(Clone, Copy)]
pub struct AstContext<'a> {
    pub stmts: &'a Arena<Stmt<'a>>,
    pub exprs: &'a Arena<Expr<'a>>,
    pub types: &'a Arena<TypeAnn<'a>>,
    pub funcs: &'a Arena<Function<'a>>,
    pub classes: &'a Arena<ClassDecl<'a>>,
    pub ifaces: &'a Arena<InterfaceDecl<'a>>,
}

impl<'a> AstContext<'a> {
    pub fn new(
        stmts: &'a Arena<Stmt<'a>>,
        exprs: &'a Arena<Expr<'a>>,
        types: &'a Arena<TypeAnn<'a>>,
        funcs: &'a Arena<Function<'a>>,
        classes: &'a Arena<ClassDecl<'a>>,
        ifaces: &'a Arena<InterfaceDecl<'a>>,
    ) -> Self {
        AstContext {
            stmts,
            exprs,
            types,
            funcs,
            classes,
            ifaces,
        }
    }

    #[inline(always)]
    pub fn alloc_stmt(&self, stmt: Stmt<'a>) -> &'a Stmt<'a> {
        self.stmts.alloc(stmt)
    }

    #[inline(always)]
    pub fn alloc_expr(&self, expr: Expr<'a>) -> &'a Expr<'a> {
        self.exprs.alloc(expr)
    }

    #[inline(always)]
    pub fn alloc_type(&self, ty: TypeAnn<'a>) -> &'a TypeAnn<'a> {
        self.types.alloc(ty)
    }

    #[inline(always)]
    pub fn alloc_func(&self, func: Function<'a>) -> &'a Function<'a> {
        self.funcs.alloc(func)
    }

    #[inline(always)]
    pub fn alloc_class(&self, class: ClassDecl<'a>) -> &'a ClassDecl<'a> {
        self.classes.alloc(class)
    }

    #[inline(always)]
    pub fn alloc_iface(&self, iface: InterfaceDecl<'a>) -> &'a InterfaceDecl<'a> {
        self.ifaces.alloc(iface)
    }

    /// Named type builder; the workhorse of type synthesis.
    #[inline(always)]
    pub fn named_type(&self, name: Symbol, span: Span) -> &'a TypeAnn<'a> {
        self.types.alloc(TypeAnn::Named { name, span })
    }

    #[inline(always)]
    pub fn array_type(&self, element: &'a TypeAnn<'a>, span: Span) -> &'a TypeAnn<'a> {
        self.types.alloc(TypeAnn::Array { element, span })
    }

    #[inline(always)]
    pub fn union_type(&self, members: Vec<&'a TypeAnn<'a>>, span: Span) -> &'a TypeAnn<'a> {
        self.types.alloc(TypeAnn::Union { members, span })
    }
}

/// Owns the arenas an `AstContext` borrows from. Keeping them in one struct
/// lets callers stand up a compilation with two lines instead of six.
#[derive(Default)]
pub struct AstArenas<'a> {
    pub stmts: Arena<Stmt<'a>>,
    pub exprs: Arena<Expr<'a>>,
    pub types: Arena<TypeAnn<'a>>,
    pub funcs: Arena<Function<'a>>,
    pub classes: Arena<ClassDecl<'a>>,
    pub ifaces: Arena<InterfaceDecl<'a>>,
}

impl<'a> AstArenas<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ctx(&'a self) -> AstContext<'a> {
        AstContext::new(
            &self.stmts,
            &self.exprs,
            &self.types,
            &self.funcs,
            &self.classes,
            &self.ifaces,
        )
    }
}
