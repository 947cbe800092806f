use super::{ExprParsing, ParseResult, Parser, TypeParsing};
use crate::ast::{
    Access, ClassDecl, ClassMember, ExportKind, Function, ImportSpecifier, InterfaceDecl,
    InterfaceMember, Param, Stmt,
};
use crate::intern::Symbol;
use crate::token::{Span, TokenKind};

/// Declarations with bodies of their own: functions, classes, interfaces,
/// and the module statements.
pub trait DeclParsing<'a> {
    fn function_rest(&mut self, name: Option<Symbol>, span: Span)
        -> ParseResult<&'a Function<'a>>;
    fn parameter_list(&mut self) -> ParseResult<Vec<Param<'a>>>;
    fn class_declaration(&mut self) -> ParseResult<Stmt<'a>>;
    fn interface_declaration(&mut self) -> ParseResult<Stmt<'a>>;
    fn import_statement(&mut self) -> ParseResult<Stmt<'a>>;
    fn export_statement(&mut self) -> ParseResult<Stmt<'a>>;
}

impl<'a, 'int, 'sink> DeclParsing<'a> for Parser<'a, 'int, 'sink> {
    /// Parameters, optional return type, and body; the name and the
    /// `function` keyword (when present) are already consumed.
    fn function_rest(
        &mut self,
        name: Option<Symbol>,
        span: Span,
    ) -> ParseResult<&'a Function<'a>> {
        let params = self.parameter_list()?;
        let return_ty = if self.eat(TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let body = self.braced_statements()?;
        Ok(self.ctx.alloc_func(Function {
            name,
            params,
            return_ty,
            body,
            span,
        }))
    }

    fn parameter_list(&mut self) -> ParseResult<Vec<Param<'a>>> {
        self.expect(TokenKind::LParen, "Expected '(' before parameters")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                let name_token = self.expect(TokenKind::Identifier, "Expected parameter name")?;
                let ty = if self.eat(TokenKind::Colon) {
                    Some(self.parse_type()?)
                } else {
                    None
                };
                params.push(Param {
                    name: name_token.lexeme,
                    ty,
                    span: name_token.span,
                });
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "Expected ')' after parameters")?;
        Ok(params)
    }

    fn class_declaration(&mut self) -> ParseResult<Stmt<'a>> {
        let span = self.advance().span; // 'class'
        let name = self
            .expect(TokenKind::Identifier, "Expected class name")?
            .lexeme;

        let superclass = if self.eat(TokenKind::Extends) {
            Some(
                self.expect(TokenKind::Identifier, "Expected superclass name")?
                    .lexeme,
            )
        } else {
            None
        };

        let mut interfaces = Vec::new();
        if self.eat(TokenKind::Implements) {
            loop {
                interfaces.push(
                    self.expect(TokenKind::Identifier, "Expected interface name")?
                        .lexeme,
                );
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenKind::LBrace, "Expected '{' before class body")?;
        let mut members = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            match self.class_member() {
                Ok(member) => members.push(member),
                Err(err) => {
                    self.sink.report(err.span, err.message);
                    self.synchronize();
                }
            }
        }
        self.expect(TokenKind::RBrace, "Expected '}' after class body")?;

        Ok(Stmt::ClassDecl(self.ctx.alloc_class(ClassDecl {
            name,
            superclass,
            interfaces,
            members,
            span,
        })))
    }

    fn interface_declaration(&mut self) -> ParseResult<Stmt<'a>> {
        let span = self.advance().span; // 'interface'
        let name = self
            .expect(TokenKind::Identifier, "Expected interface name")?
            .lexeme;

        let mut extends = Vec::new();
        if self.eat(TokenKind::Extends) {
            loop {
                extends.push(
                    self.expect(TokenKind::Identifier, "Expected interface name")?
                        .lexeme,
                );
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenKind::LBrace, "Expected '{' before interface body")?;
        let mut members = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            match self.interface_member() {
                Ok(member) => members.push(member),
                Err(err) => {
                    self.sink.report(err.span, err.message);
                    self.synchronize();
                }
            }
        }
        self.expect(TokenKind::RBrace, "Expected '}' after interface body")?;

        Ok(Stmt::InterfaceDecl(self.ctx.alloc_iface(InterfaceDecl {
            name,
            extends,
            members,
            span,
        })))
    }

    fn import_statement(&mut self) -> ParseResult<Stmt<'a>> {
        let span = self.advance().span; // 'import'
        let mut default = None;
        let mut named = Vec::new();
        let mut namespace = None;

        if self.eat(TokenKind::Star) {
            self.expect(TokenKind::As, "Expected 'as' after '*'")?;
            namespace = Some(
                self.expect(TokenKind::Identifier, "Expected namespace name")?
                    .lexeme,
            );
        } else if self.check(TokenKind::LBrace) {
            named = self.specifier_list()?;
        } else {
            default = Some(
                self.expect(TokenKind::Identifier, "Expected import name")?
                    .lexeme,
            );
            if self.eat(TokenKind::Comma) {
                named = self.specifier_list()?;
            }
        }

        self.expect(TokenKind::From, "Expected 'from' in import statement")?;
        let module = self
            .expect(TokenKind::StringLit, "Expected module name string")?
            .lexeme;
        self.expect(TokenKind::Semicolon, "Expected ';' after import statement")?;

        Ok(Stmt::Import {
            default,
            named,
            namespace,
            module,
            span,
        })
    }

    fn export_statement(&mut self) -> ParseResult<Stmt<'a>> {
        let span = self.advance().span; // 'export'

        // `default` is not a keyword token; match the identifier spelling.
        if self.check(TokenKind::Identifier) && self.peek().lexeme == self.default_sym {
            self.advance();
            let expr = self.expression()?;
            self.expect(TokenKind::Semicolon, "Expected ';' after export default")?;
            return Ok(Stmt::Export {
                kind: ExportKind::Default(expr),
                span,
            });
        }

        if self.check(TokenKind::LBrace) {
            let specifiers = self.specifier_list()?;
            let module = if self.eat(TokenKind::From) {
                Some(
                    self.expect(TokenKind::StringLit, "Expected module name string")?
                        .lexeme,
                )
            } else {
                None
            };
            self.expect(TokenKind::Semicolon, "Expected ';' after export list")?;
            return Ok(Stmt::Export {
                kind: ExportKind::Named { specifiers, module },
                span,
            });
        }

        let decl = self.parse_statement()?;
        Ok(Stmt::Export {
            kind: ExportKind::Decl(self.ctx.alloc_stmt(decl)),
            span,
        })
    }
}

impl<'a, 'int, 'sink> Parser<'a, 'int, 'sink> {
    /// One class member. Modifiers come in any order; a member is a method
    /// iff the next non-modifier token is `function`, or an identifier
    /// immediately followed by `(`.
    fn class_member(&mut self) -> ParseResult<ClassMember<'a>> {
        let start = self.peek().span;
        let mut access = Access::Public;
        let mut is_static = false;
        let mut is_readonly = false;

        while self.peek().kind.is_modifier() {
            match self.advance().kind {
                TokenKind::Public => access = Access::Public,
                TokenKind::Private => access = Access::Private,
                TokenKind::Protected => access = Access::Protected,
                TokenKind::Static => is_static = true,
                TokenKind::Readonly => is_readonly = true,
                _ => {}
            }
        }

        let has_function_kw = self.eat(TokenKind::Function);
        let name = self
            .expect(TokenKind::Identifier, "Expected member name")?
            .lexeme;

        if has_function_kw || self.check(TokenKind::LParen) {
            let params = self.parameter_list()?;
            let return_ty = if self.eat(TokenKind::Colon) {
                Some(self.parse_type()?)
            } else {
                None
            };
            let body = self.braced_statements()?;
            Ok(ClassMember::Method {
                name,
                params,
                return_ty,
                body,
                access,
                is_static,
                span: start,
            })
        } else {
            let ty = if self.eat(TokenKind::Colon) {
                Some(self.parse_type()?)
            } else {
                None
            };
            let init = if self.eat(TokenKind::Eq) {
                Some(self.expression()?)
            } else {
                None
            };
            self.expect(TokenKind::Semicolon, "Expected ';' after property declaration")?;
            Ok(ClassMember::Property {
                name,
                ty,
                init,
                access,
                is_static,
                is_readonly,
                span: start,
            })
        }
    }

    /// One interface member; every signature ends in `;`.
    fn interface_member(&mut self) -> ParseResult<InterfaceMember<'a>> {
        let start = self.peek().span;
        let readonly = self.eat(TokenKind::Readonly);
        let name = self
            .expect(TokenKind::Identifier, "Expected member name")?
            .lexeme;

        if self.check(TokenKind::LParen) {
            let params = self.parameter_list()?;
            self.expect(TokenKind::Colon, "Expected ':' and return type in method signature")?;
            let return_ty = self.parse_type()?;
            self.expect(TokenKind::Semicolon, "Expected ';' after method signature")?;
            Ok(InterfaceMember::Method {
                name,
                params,
                return_ty,
                span: start,
            })
        } else {
            let optional = self.eat(TokenKind::Question);
            self.expect(TokenKind::Colon, "Expected ':' after property name")?;
            let ty = self.parse_type()?;
            self.expect(TokenKind::Semicolon, "Expected ';' after property signature")?;
            Ok(InterfaceMember::Property {
                name,
                ty,
                optional,
                readonly,
                span: start,
            })
        }
    }

    /// `{ a, b as c }` for both import and export lists.
    fn specifier_list(&mut self) -> ParseResult<Vec<ImportSpecifier>> {
        self.expect(TokenKind::LBrace, "Expected '{'")?;
        let mut specifiers = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            let name = self
                .expect(TokenKind::Identifier, "Expected imported name")?
                .lexeme;
            let alias = if self.eat(TokenKind::As) {
                Some(
                    self.expect(TokenKind::Identifier, "Expected alias name")?
                        .lexeme,
                )
            } else {
                None
            };
            specifiers.push(ImportSpecifier { name, alias });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "Expected '}' after specifier list")?;
        Ok(specifiers)
    }
}
