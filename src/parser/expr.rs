use super::{DeclParsing, ParseResult, Parser};
use crate::ast::{AssignOp, BinaryOp, Expr, Literal, ObjectProperty, UnaryOp};
use crate::token::TokenKind;

/// Expression parsing: an operator-precedence cascade of parse functions,
/// lowest precedence outermost. All binary levels are left-associative;
/// assignment and the conditional right-associate.
pub trait ExprParsing<'a> {
    fn expression(&mut self) -> ParseResult<&'a Expr<'a>>;
    fn assignment(&mut self) -> ParseResult<&'a Expr<'a>>;
    fn conditional(&mut self) -> ParseResult<&'a Expr<'a>>;
    fn logical_or(&mut self) -> ParseResult<&'a Expr<'a>>;
    fn logical_and(&mut self) -> ParseResult<&'a Expr<'a>>;
    fn equality(&mut self) -> ParseResult<&'a Expr<'a>>;
    fn comparison(&mut self) -> ParseResult<&'a Expr<'a>>;
    fn bitwise_or(&mut self) -> ParseResult<&'a Expr<'a>>;
    fn bitwise_xor(&mut self) -> ParseResult<&'a Expr<'a>>;
    fn bitwise_and(&mut self) -> ParseResult<&'a Expr<'a>>;
    fn shift(&mut self) -> ParseResult<&'a Expr<'a>>;
    fn additive(&mut self) -> ParseResult<&'a Expr<'a>>;
    fn multiplicative(&mut self) -> ParseResult<&'a Expr<'a>>;
    fn unary(&mut self) -> ParseResult<&'a Expr<'a>>;
    fn postfix(&mut self) -> ParseResult<&'a Expr<'a>>;
    fn call_expr(&mut self) -> ParseResult<&'a Expr<'a>>;
    fn primary(&mut self) -> ParseResult<&'a Expr<'a>>;
}

impl<'a, 'int, 'sink> ExprParsing<'a> for Parser<'a, 'int, 'sink> {
    fn expression(&mut self) -> ParseResult<&'a Expr<'a>> {
        self.assignment()
    }

    fn assignment(&mut self) -> ParseResult<&'a Expr<'a>> {
        let expr = self.conditional()?;

        let op = match self.peek().kind {
            TokenKind::Eq => Some(AssignOp::Assign),
            TokenKind::PlusEq => Some(AssignOp::Add),
            TokenKind::MinusEq => Some(AssignOp::Sub),
            TokenKind::StarEq => Some(AssignOp::Mul),
            TokenKind::SlashEq => Some(AssignOp::Div),
            TokenKind::PercentEq => Some(AssignOp::Rem),
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            let value = self.assignment()?;
            if !expr.is_assign_target() {
                // Report and keep parsing; the statement is still usable.
                self.sink.report(expr.span(), "Invalid assignment target");
            }
            return Ok(self.ctx.alloc_expr(Expr::Assign {
                op,
                target: expr,
                value,
                span: expr.span(),
            }));
        }

        Ok(expr)
    }

    fn conditional(&mut self) -> ParseResult<&'a Expr<'a>> {
        let cond = self.logical_or()?;
        if self.eat(TokenKind::Question) {
            let then_expr = self.expression()?;
            self.expect(TokenKind::Colon, "Expected ':' in conditional expression")?;
            let else_expr = self.conditional()?;
            return Ok(self.ctx.alloc_expr(Expr::Conditional {
                cond,
                then_expr,
                else_expr,
                span: cond.span(),
            }));
        }
        Ok(cond)
    }

    fn logical_or(&mut self) -> ParseResult<&'a Expr<'a>> {
        let mut left = self.logical_and()?;
        while self.eat(TokenKind::OrOr) {
            let right = self.logical_and()?;
            left = self.ctx.alloc_expr(Expr::Binary {
                op: BinaryOp::Or,
                left,
                right,
                span: left.span(),
            });
        }
        Ok(left)
    }

    fn logical_and(&mut self) -> ParseResult<&'a Expr<'a>> {
        let mut left = self.equality()?;
        while self.eat(TokenKind::AndAnd) {
            let right = self.equality()?;
            left = self.ctx.alloc_expr(Expr::Binary {
                op: BinaryOp::And,
                left,
                right,
                span: left.span(),
            });
        }
        Ok(left)
    }

    fn equality(&mut self) -> ParseResult<&'a Expr<'a>> {
        let mut left = self.comparison()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::NotEq,
                TokenKind::EqEqEq => BinaryOp::StrictEq,
                TokenKind::NotEqEq => BinaryOp::StrictNotEq,
                _ => break,
            };
            self.advance();
            let right = self.comparison()?;
            left = self.ctx.alloc_expr(Expr::Binary {
                op,
                left,
                right,
                span: left.span(),
            });
        }
        Ok(left)
    }

    fn comparison(&mut self) -> ParseResult<&'a Expr<'a>> {
        let mut left = self.bitwise_or()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::GtEq => BinaryOp::GtEq,
                TokenKind::LtEq => BinaryOp::LtEq,
                _ => break,
            };
            self.advance();
            let right = self.bitwise_or()?;
            left = self.ctx.alloc_expr(Expr::Binary {
                op,
                left,
                right,
                span: left.span(),
            });
        }
        Ok(left)
    }

    fn bitwise_or(&mut self) -> ParseResult<&'a Expr<'a>> {
        let mut left = self.bitwise_xor()?;
        while self.eat(TokenKind::Pipe) {
            let right = self.bitwise_xor()?;
            left = self.ctx.alloc_expr(Expr::Binary {
                op: BinaryOp::BitOr,
                left,
                right,
                span: left.span(),
            });
        }
        Ok(left)
    }

    fn bitwise_xor(&mut self) -> ParseResult<&'a Expr<'a>> {
        let mut left = self.bitwise_and()?;
        while self.eat(TokenKind::Caret) {
            let right = self.bitwise_and()?;
            left = self.ctx.alloc_expr(Expr::Binary {
                op: BinaryOp::BitXor,
                left,
                right,
                span: left.span(),
            });
        }
        Ok(left)
    }

    fn bitwise_and(&mut self) -> ParseResult<&'a Expr<'a>> {
        let mut left = self.shift()?;
        while self.eat(TokenKind::Amp) {
            let right = self.shift()?;
            left = self.ctx.alloc_expr(Expr::Binary {
                op: BinaryOp::BitAnd,
                left,
                right,
                span: left.span(),
            });
        }
        Ok(left)
    }

    fn shift(&mut self) -> ParseResult<&'a Expr<'a>> {
        let mut left = self.additive()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Shl => BinaryOp::Shl,
                TokenKind::Shr => BinaryOp::Shr,
                TokenKind::UShr => BinaryOp::UShr,
                _ => break,
            };
            self.advance();
            let right = self.additive()?;
            left = self.ctx.alloc_expr(Expr::Binary {
                op,
                left,
                right,
                span: left.span(),
            });
        }
        Ok(left)
    }

    fn additive(&mut self) -> ParseResult<&'a Expr<'a>> {
        let mut left = self.multiplicative()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.multiplicative()?;
            left = self.ctx.alloc_expr(Expr::Binary {
                op,
                left,
                right,
                span: left.span(),
            });
        }
        Ok(left)
    }

    fn multiplicative(&mut self) -> ParseResult<&'a Expr<'a>> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                TokenKind::StarStar => BinaryOp::Pow,
                _ => break,
            };
            self.advance();
            let right = self.unary()?;
            left = self.ctx.alloc_expr(Expr::Binary {
                op,
                left,
                right,
                span: left.span(),
            });
        }
        Ok(left)
    }

    fn unary(&mut self) -> ParseResult<&'a Expr<'a>> {
        let op = match self.peek().kind {
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            TokenKind::Typeof => Some(UnaryOp::Typeof),
            TokenKind::PlusPlus => Some(UnaryOp::Inc),
            TokenKind::MinusMinus => Some(UnaryOp::Dec),
            _ => None,
        };
        if let Some(op) = op {
            let token = self.advance();
            let operand = self.unary()?;
            return Ok(self.ctx.alloc_expr(Expr::Unary {
                op,
                operand,
                prefix: true,
                span: token.span,
            }));
        }
        self.postfix()
    }

    fn postfix(&mut self) -> ParseResult<&'a Expr<'a>> {
        let mut expr = self.call_expr()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::PlusPlus => UnaryOp::Inc,
                TokenKind::MinusMinus => UnaryOp::Dec,
                _ => break,
            };
            self.advance();
            expr = self.ctx.alloc_expr(Expr::Unary {
                op,
                operand: expr,
                prefix: false,
                span: expr.span(),
            });
        }
        Ok(expr)
    }

    /// `.name`, `?.name`, `[expr]`, and `(args)` chain arbitrarily off a
    /// primary.
    fn call_expr(&mut self) -> ParseResult<&'a Expr<'a>> {
        let mut expr = self.primary()?;
        loop {
            if self.eat(TokenKind::LParen) {
                let args = self.arguments()?;
                expr = self.ctx.alloc_expr(Expr::Call {
                    callee: expr,
                    args,
                    span: expr.span(),
                });
            } else if self.eat(TokenKind::Dot) {
                let property = self
                    .expect(TokenKind::Identifier, "Expected property name after '.'")?
                    .lexeme;
                expr = self.ctx.alloc_expr(Expr::Member {
                    object: expr,
                    property,
                    optional: false,
                    span: expr.span(),
                });
            } else if self.eat(TokenKind::QuestionDot) {
                let property = self
                    .expect(TokenKind::Identifier, "Expected property name after '?.'")?
                    .lexeme;
                expr = self.ctx.alloc_expr(Expr::Member {
                    object: expr,
                    property,
                    optional: true,
                    span: expr.span(),
                });
            } else if self.eat(TokenKind::LBracket) {
                let index = self.expression()?;
                self.expect(TokenKind::RBracket, "Expected ']' after index")?;
                expr = self.ctx.alloc_expr(Expr::Index {
                    object: expr,
                    index,
                    span: expr.span(),
                });
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn primary(&mut self) -> ParseResult<&'a Expr<'a>> {
        let token = self.peek();
        match token.kind {
            TokenKind::NumberLit => {
                self.advance();
                let value = self
                    .interner
                    .resolve(token.lexeme)
                    .parse::<f64>()
                    .unwrap_or(0.0);
                Ok(self.ctx.alloc_expr(Expr::Literal {
                    value: Literal::Number(value),
                    span: token.span,
                }))
            }
            TokenKind::StringLit => {
                self.advance();
                Ok(self.ctx.alloc_expr(Expr::Literal {
                    value: Literal::Str(token.lexeme),
                    span: token.span,
                }))
            }
            TokenKind::BoolLit => {
                self.advance();
                let value = self.interner.resolve(token.lexeme) == "true";
                Ok(self.ctx.alloc_expr(Expr::Literal {
                    value: Literal::Bool(value),
                    span: token.span,
                }))
            }
            TokenKind::NullLit => {
                self.advance();
                Ok(self.ctx.alloc_expr(Expr::Literal {
                    value: Literal::Null,
                    span: token.span,
                }))
            }
            TokenKind::UndefinedLit => {
                self.advance();
                Ok(self.ctx.alloc_expr(Expr::Literal {
                    value: Literal::Undefined,
                    span: token.span,
                }))
            }
            TokenKind::This => {
                self.advance();
                Ok(self.ctx.alloc_expr(Expr::This { span: token.span }))
            }
            // `super` behaves like a name: `super(...)` and `super.method()`
            // flow through the ordinary call/member machinery.
            TokenKind::Identifier | TokenKind::Super => {
                self.advance();
                Ok(self.ctx.alloc_expr(Expr::Identifier {
                    name: token.lexeme,
                    span: token.span,
                }))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.expression()?;
                self.expect(TokenKind::RParen, "Expected ')' after expression")?;
                Ok(expr)
            }
            TokenKind::LBracket => self.array_literal(),
            TokenKind::LBrace => self.object_literal(),
            TokenKind::Function => {
                let span = self.advance().span;
                let name = if self.check(TokenKind::Identifier) {
                    Some(self.advance().lexeme)
                } else {
                    None
                };
                let func = self.function_rest(name, span)?;
                Ok(self.ctx.alloc_expr(Expr::Function(func)))
            }
            TokenKind::New => self.new_expression(),
            TokenKind::Eof => Err(self.error_at(token.span, "Unexpected end of input")),
            _ => {
                let lexeme = self.interner.resolve(token.lexeme).to_string();
                Err(self.error_at(token.span, format!("Unexpected token '{}'", lexeme)))
            }
        }
    }
}

impl<'a, 'int, 'sink> Parser<'a, 'int, 'sink> {
    /// Comma-separated argument list; the opening `(` is already consumed.
    pub(super) fn arguments(&mut self) -> ParseResult<Vec<&'a Expr<'a>>> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.assignment()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "Expected ')' after arguments")?;
        Ok(args)
    }

    fn array_literal(&mut self) -> ParseResult<&'a Expr<'a>> {
        let span = self.advance().span; // '['
        let mut elements = Vec::new();
        while !self.check(TokenKind::RBracket) && !self.is_at_end() {
            elements.push(self.assignment()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBracket, "Expected ']' after array elements")?;
        Ok(self.ctx.alloc_expr(Expr::Array { elements, span }))
    }

    fn object_literal(&mut self) -> ParseResult<&'a Expr<'a>> {
        let span = self.advance().span; // '{'
        let mut properties = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            let key_token = self.peek();
            let key = match key_token.kind {
                TokenKind::Identifier | TokenKind::StringLit => {
                    self.advance();
                    key_token.lexeme
                }
                _ => return Err(self.error_here("Expected property name")),
            };
            self.expect(TokenKind::Colon, "Expected ':' after property name")?;
            let value = self.assignment()?;
            properties.push(ObjectProperty {
                key,
                value,
                span: key_token.span,
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "Expected '}' after object literal")?;
        Ok(self.ctx.alloc_expr(Expr::Object { properties, span }))
    }

    /// `new X.Y(args)`: the callee may be a member chain; the argument list
    /// is mandatory.
    fn new_expression(&mut self) -> ParseResult<&'a Expr<'a>> {
        let span = self.advance().span; // 'new'
        let mut callee = self.primary()?;
        loop {
            if self.eat(TokenKind::Dot) {
                let property = self
                    .expect(TokenKind::Identifier, "Expected property name after '.'")?
                    .lexeme;
                callee = self.ctx.alloc_expr(Expr::Member {
                    object: callee,
                    property,
                    optional: false,
                    span: callee.span(),
                });
            } else if self.eat(TokenKind::LBracket) {
                let index = self.expression()?;
                self.expect(TokenKind::RBracket, "Expected ']' after index")?;
                callee = self.ctx.alloc_expr(Expr::Index {
                    object: callee,
                    index,
                    span: callee.span(),
                });
            } else {
                break;
            }
        }
        self.expect(TokenKind::LParen, "Expected '(' after 'new' callee")?;
        let args = self.arguments()?;
        Ok(self.ctx.alloc_expr(Expr::New { callee, args, span }))
    }
}
