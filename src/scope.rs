use std::collections::HashMap;

use crate::ast::{ClassDecl, Expr, Function, InterfaceDecl, TypeAnn};
use crate::intern::Symbol;

/// What a name is bound to.
#[derive(Debug, Clone, Copy)]
pub enum SymbolKind<'a> {
    Variable {
        ty: Option<&'a TypeAnn<'a>>,
        init: Option<&'a Expr<'a>>,
        is_const: bool,
    },
    Parameter {
        ty: Option<&'a TypeAnn<'a>>,
    },
    Function(&'a Function<'a>),
    Class(&'a ClassDecl<'a>),
    Interface(&'a InterfaceDecl<'a>),
    /// Built-in type name (`number`, `void`, ...).
    BuiltinType,
    /// Built-in global value (`console`, `Math`, ...).
    BuiltinValue,
}

#[derive(Debug, Clone, Copy)]
pub struct ScopeEntry<'a> {
    pub name: Symbol,
    pub kind: SymbolKind<'a>,
}

/// Lexically scoped symbol table: a stack of name → entry maps. `define`
/// writes to the innermost scope, silently shadowing outer bindings;
/// `resolve` searches innermost-outward.
#[derive(Default)]
pub struct ScopeStack<'a> {
    scopes: Vec<HashMap<Symbol, ScopeEntry<'a>>>,
}

impl<'a> ScopeStack<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn define(&mut self, name: Symbol, kind: SymbolKind<'a>) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, ScopeEntry { name, kind });
        }
    }

    pub fn resolve(&self, name: Symbol) -> Option<&ScopeEntry<'a>> {
        for scope in self.scopes.iter().rev() {
            if let Some(entry) = scope.get(&name) {
                return Some(entry);
            }
        }
        None
    }

    /// Every name currently visible, for did-you-mean suggestions.
    pub fn visible_names(&self) -> Vec<Symbol> {
        let mut names = Vec::new();
        for scope in &self.scopes {
            names.extend(scope.keys().copied());
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intern::Interner;

    #[test]
    fn resolve_searches_innermost_first() {
        let mut interner = Interner::new();
        let x = interner.intern("x");
        let mut scopes = ScopeStack::new();
        scopes.push_scope();
        scopes.define(x, SymbolKind::BuiltinValue);
        scopes.push_scope();
        scopes.define(
            x,
            SymbolKind::Variable {
                ty: None,
                init: None,
                is_const: true,
            },
        );
        match scopes.resolve(x).map(|e| e.kind) {
            Some(SymbolKind::Variable { is_const, .. }) => assert!(is_const),
            other => panic!("expected inner variable binding, got {:?}", other),
        }
    }

    #[test]
    fn pop_restores_outer_binding() {
        let mut interner = Interner::new();
        let x = interner.intern("x");
        let mut scopes = ScopeStack::new();
        scopes.push_scope();
        scopes.define(x, SymbolKind::BuiltinValue);
        scopes.push_scope();
        scopes.define(x, SymbolKind::BuiltinType);
        scopes.pop_scope();
        assert!(matches!(
            scopes.resolve(x).map(|e| e.kind),
            Some(SymbolKind::BuiltinValue)
        ));
    }

    #[test]
    fn resolve_missing_name_is_none() {
        let mut interner = Interner::new();
        let ghost = interner.intern("ghost");
        let mut scopes = ScopeStack::new();
        scopes.push_scope();
        assert!(scopes.resolve(ghost).is_none());
    }

    #[test]
    fn depth_tracks_push_pop() {
        let mut scopes = ScopeStack::new();
        assert_eq!(scopes.depth(), 0);
        scopes.push_scope();
        scopes.push_scope();
        assert_eq!(scopes.depth(), 2);
        scopes.pop_scope();
        assert_eq!(scopes.depth(), 1);
    }
}
