use super::{ParseResult, Parser};
use crate::ast::{ObjectTypeProp, TypeAnn};
use crate::token::TokenKind;

/// Type-annotation grammar. A base type (named, generic, object, function,
/// or parenthesized) is parsed first; `[]` suffixes, then `&` and `|`
/// combinators, are recognized left-recursively after it.
pub trait TypeParsing<'a> {
    fn parse_type(&mut self) -> ParseResult<&'a TypeAnn<'a>>;
}

impl<'a, 'int, 'sink> TypeParsing<'a> for Parser<'a, 'int, 'sink> {
    fn parse_type(&mut self) -> ParseResult<&'a TypeAnn<'a>> {
        let first = self.intersection_type()?;
        if self.check(TokenKind::Pipe) {
            let mut members = vec![first];
            while self.eat(TokenKind::Pipe) {
                members.push(self.intersection_type()?);
            }
            let span = first.span();
            return Ok(self.ctx.alloc_type(TypeAnn::Union { members, span }));
        }
        Ok(first)
    }
}

impl<'a, 'int, 'sink> Parser<'a, 'int, 'sink> {
    fn intersection_type(&mut self) -> ParseResult<&'a TypeAnn<'a>> {
        let first = self.postfix_type()?;
        if self.check(TokenKind::Amp) {
            let mut members = vec![first];
            while self.eat(TokenKind::Amp) {
                members.push(self.postfix_type()?);
            }
            let span = first.span();
            return Ok(self
                .ctx
                .alloc_type(TypeAnn::Intersection { members, span }));
        }
        Ok(first)
    }

    /// `[]` suffixes bind tighter than `&`/`|`.
    fn postfix_type(&mut self) -> ParseResult<&'a TypeAnn<'a>> {
        let mut ty = self.base_type()?;
        while self.check(TokenKind::LBracket) && self.peek_at(1).kind == TokenKind::RBracket {
            self.advance();
            self.advance();
            let span = ty.span();
            ty = self.ctx.alloc_type(TypeAnn::Array { element: ty, span });
        }
        Ok(ty)
    }

    fn base_type(&mut self) -> ParseResult<&'a TypeAnn<'a>> {
        let token = self.peek();
        match token.kind {
            TokenKind::Identifier
            | TokenKind::NumberType
            | TokenKind::StringType
            | TokenKind::BooleanType
            | TokenKind::AnyType
            | TokenKind::VoidType
            | TokenKind::NullLit
            | TokenKind::UndefinedLit => {
                self.advance();
                if self.check(TokenKind::Lt) {
                    return self.generic_type(token.lexeme);
                }
                Ok(self.ctx.alloc_type(TypeAnn::Named {
                    name: token.lexeme,
                    span: token.span,
                }))
            }
            TokenKind::LBrace => self.object_type(),
            TokenKind::LParen => {
                if self.paren_starts_function_type() {
                    self.function_type()
                } else {
                    self.advance();
                    let ty = self.parse_type()?;
                    self.expect(TokenKind::RParen, "Expected ')' after type")?;
                    Ok(ty)
                }
            }
            _ => Err(self.error_here("Expected type")),
        }
    }

    /// `Name<T, …>`. `Array<T>` normalizes to the same node as `T[]`.
    fn generic_type(&mut self, base: crate::intern::Symbol) -> ParseResult<&'a TypeAnn<'a>> {
        let span = self.previous().span;
        self.advance(); // '<'
        let mut args = Vec::new();
        loop {
            args.push(self.parse_type()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Gt, "Expected '>' after type arguments")?;

        if self.interner.resolve(base) == "Array" && args.len() == 1 {
            return Ok(self.ctx.alloc_type(TypeAnn::Array {
                element: args[0],
                span,
            }));
        }
        Ok(self.ctx.alloc_type(TypeAnn::Generic { base, args, span }))
    }

    /// `{ name?: T; … }`; `?` before `:` marks the property optional.
    fn object_type(&mut self) -> ParseResult<&'a TypeAnn<'a>> {
        let span = self.advance().span; // '{'
        let mut props = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            let name = self
                .expect(TokenKind::Identifier, "Expected property name in object type")?
                .lexeme;
            let optional = self.eat(TokenKind::Question);
            self.expect(TokenKind::Colon, "Expected ':' after property name")?;
            let ty = self.parse_type()?;
            props.push(ObjectTypeProp { name, ty, optional });
            // Separator between properties; optional before '}'.
            if !self.eat(TokenKind::Semicolon) && !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "Expected '}' after object type")?;
        Ok(self.ctx.alloc_type(TypeAnn::Object { props, span }))
    }

    /// `(a: number, b) => T`; parameter names are optional and discarded.
    fn function_type(&mut self) -> ParseResult<&'a TypeAnn<'a>> {
        let span = self.advance().span; // '('
        let mut params = Vec::new();
        while !self.check(TokenKind::RParen) && !self.is_at_end() {
            if self.check(TokenKind::Identifier) && self.peek_at(1).kind == TokenKind::Colon {
                self.advance();
                self.advance();
            }
            params.push(self.parse_type()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "Expected ')' in function type")?;
        self.expect(TokenKind::Arrow, "Expected '=>' in function type")?;
        let ret = self.parse_type()?;
        Ok(self.ctx.alloc_type(TypeAnn::Function { params, ret, span }))
    }

    /// Distinguish `(params) => T` from a parenthesized type by scanning to
    /// the matching `)` and checking for `=>`.
    fn paren_starts_function_type(&self) -> bool {
        let mut depth = 0usize;
        let mut offset = 0usize;
        loop {
            let kind = self.peek_at(offset).kind;
            match kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return self.peek_at(offset + 1).kind == TokenKind::Arrow;
                    }
                }
                TokenKind::Eof => return false,
                _ => {}
            }
            offset += 1;
        }
    }
}
