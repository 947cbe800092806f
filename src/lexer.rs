use crate::diagnostics::DiagnosticSink;
use crate::intern::{Interner, Symbol};
use crate::token::{Span, Token, TokenKind};

/// Reclassify an identifier that matches a reserved word.
fn keyword(word: &str) -> Option<TokenKind> {
    let kind = match word {
        "let" => TokenKind::Let,
        "const" => TokenKind::Const,
        "var" => TokenKind::Var,
        "function" => TokenKind::Function,
        "class" => TokenKind::Class,
        "extends" => TokenKind::Extends,
        "implements" => TokenKind::Implements,
        "interface" => TokenKind::Interface,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "for" => TokenKind::For,
        "while" => TokenKind::While,
        "do" => TokenKind::Do,
        "return" => TokenKind::Return,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "new" => TokenKind::New,
        "this" => TokenKind::This,
        "super" => TokenKind::Super,
        "typeof" => TokenKind::Typeof,
        "import" => TokenKind::Import,
        "export" => TokenKind::Export,
        "from" => TokenKind::From,
        "as" => TokenKind::As,
        "public" => TokenKind::Public,
        "private" => TokenKind::Private,
        "protected" => TokenKind::Protected,
        "static" => TokenKind::Static,
        "readonly" => TokenKind::Readonly,
        "type" => TokenKind::Type,
        "number" => TokenKind::NumberType,
        "string" => TokenKind::StringType,
        "boolean" => TokenKind::BooleanType,
        "any" => TokenKind::AnyType,
        "void" => TokenKind::VoidType,
        "true" | "false" => TokenKind::BoolLit,
        "null" => TokenKind::NullLit,
        "undefined" => TokenKind::UndefinedLit,
        _ => return None,
    };
    Some(kind)
}

/// Character stream → token stream. Positions are 1-based; `\n` advances the
/// line and resets the column. Every error is reported to the sink and then
/// locally recovered, so scanning always reaches `Eof`.
pub struct Lexer<'int, 'sink> {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
    interner: &'int mut Interner,
    sink: &'sink mut DiagnosticSink,
}

impl<'int, 'sink> Lexer<'int, 'sink> {
    pub fn new(
        source: &str,
        interner: &'int mut Interner,
        sink: &'sink mut DiagnosticSink,
    ) -> Self {
        Lexer {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            interner,
            sink,
        }
    }

    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            if self.is_at_end() {
                break;
            }
            let span = self.span();
            if let Some(token) = self.scan_token(span) {
                tokens.push(token);
            }
        }
        tokens.push(Token::new(TokenKind::Eof, Symbol::EMPTY, self.span()));
        tokens
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> char {
        self.chars.get(self.pos).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.chars.get(self.pos + 1).copied().unwrap_or('\0')
    }

    fn span(&self) -> Span {
        Span::new(self.line, self.column)
    }

    fn advance(&mut self) -> char {
        let c = self.peek();
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    /// Consume the next character if it matches.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Skip whitespace and comments. Unterminated block comments are
    /// reported at their opening position.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                ' ' | '\t' | '\r' | '\n' => {
                    self.advance();
                }
                '/' if self.peek_next() == '/' => {
                    while !self.is_at_end() && self.peek() != '\n' {
                        self.advance();
                    }
                }
                '/' if self.peek_next() == '*' => {
                    let open = self.span();
                    self.advance();
                    self.advance();
                    let mut closed = false;
                    while !self.is_at_end() {
                        if self.peek() == '*' && self.peek_next() == '/' {
                            self.advance();
                            self.advance();
                            closed = true;
                            break;
                        }
                        self.advance();
                    }
                    if !closed {
                        self.sink.report(open, "Unterminated block comment");
                    }
                }
                _ => return,
            }
        }
    }

    fn scan_token(&mut self, span: Span) -> Option<Token> {
        let c = self.advance();
        match c {
            c if c.is_ascii_digit() => Some(self.number(c, span)),
            '\'' | '"' => self.string(c, span),
            c if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
                Some(self.identifier(c, span))
            }
            _ => self.operator(c, span),
        }
    }

    fn number(&mut self, first: char, span: Span) -> Token {
        let mut text = String::new();
        text.push(first);
        while self.peek().is_ascii_digit() {
            text.push(self.advance());
        }
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            text.push(self.advance());
            while self.peek().is_ascii_digit() {
                text.push(self.advance());
            }
        }
        if self.peek() == 'e' || self.peek() == 'E' {
            let exp_span = self.span();
            text.push(self.advance());
            if self.peek() == '+' || self.peek() == '-' {
                text.push(self.advance());
            }
            if self.peek().is_ascii_digit() {
                while self.peek().is_ascii_digit() {
                    text.push(self.advance());
                }
            } else {
                self.sink.report(exp_span, "Missing digits after exponent");
            }
        }
        let lexeme = self.interner.intern(&text);
        Token::new(TokenKind::NumberLit, lexeme, span)
    }

    fn string(&mut self, quote: char, span: Span) -> Option<Token> {
        let mut value = String::new();
        while !self.is_at_end() && self.peek() != quote {
            let c = self.advance();
            if c == '\\' {
                if self.is_at_end() {
                    break;
                }
                let escaped = self.advance();
                match escaped {
                    'n' => value.push('\n'),
                    'r' => value.push('\r'),
                    't' => value.push('\t'),
                    '\'' => value.push('\''),
                    '"' => value.push('"'),
                    '\\' => value.push('\\'),
                    // Unknown escapes pass both characters through.
                    other => {
                        value.push('\\');
                        value.push(other);
                    }
                }
            } else {
                value.push(c);
            }
        }
        if self.is_at_end() {
            self.sink.report(span, "Unterminated string literal");
            return None;
        }
        self.advance(); // closing quote
        let lexeme = self.interner.intern(&value);
        Some(Token::new(TokenKind::StringLit, lexeme, span))
    }

    fn identifier(&mut self, first: char, span: Span) -> Token {
        let mut text = String::new();
        text.push(first);
        loop {
            let c = self.peek();
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                text.push(self.advance());
            } else {
                break;
            }
        }
        let kind = keyword(&text).unwrap_or(TokenKind::Identifier);
        let lexeme = self.interner.intern(&text);
        Token::new(kind, lexeme, span)
    }

    fn operator(&mut self, c: char, span: Span) -> Option<Token> {
        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '^' => TokenKind::Caret,
            '~' => TokenKind::Tilde,
            '.' => {
                if self.peek() == '.' && self.peek_next() == '.' {
                    self.advance();
                    self.advance();
                    TokenKind::Ellipsis
                } else {
                    TokenKind::Dot
                }
            }
            '?' => {
                if self.eat('.') {
                    TokenKind::QuestionDot
                } else {
                    TokenKind::Question
                }
            }
            '=' => {
                if self.eat('=') {
                    if self.eat('=') {
                        TokenKind::EqEqEq
                    } else {
                        TokenKind::EqEq
                    }
                } else if self.eat('>') {
                    TokenKind::Arrow
                } else {
                    TokenKind::Eq
                }
            }
            '!' => {
                if self.eat('=') {
                    if self.eat('=') {
                        TokenKind::NotEqEq
                    } else {
                        TokenKind::NotEq
                    }
                } else {
                    TokenKind::Bang
                }
            }
            '>' => {
                if self.eat('=') {
                    TokenKind::GtEq
                } else if self.eat('>') {
                    if self.eat('>') {
                        TokenKind::UShr
                    } else {
                        TokenKind::Shr
                    }
                } else {
                    TokenKind::Gt
                }
            }
            '<' => {
                if self.eat('=') {
                    TokenKind::LtEq
                } else if self.eat('<') {
                    TokenKind::Shl
                } else {
                    TokenKind::Lt
                }
            }
            '&' => {
                if self.eat('&') {
                    TokenKind::AndAnd
                } else {
                    TokenKind::Amp
                }
            }
            '|' => {
                if self.eat('|') {
                    TokenKind::OrOr
                } else {
                    TokenKind::Pipe
                }
            }
            '+' => {
                if self.eat('+') {
                    TokenKind::PlusPlus
                } else if self.eat('=') {
                    TokenKind::PlusEq
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                if self.eat('-') {
                    TokenKind::MinusMinus
                } else if self.eat('=') {
                    TokenKind::MinusEq
                } else if self.eat('>') {
                    TokenKind::Arrow
                } else {
                    TokenKind::Minus
                }
            }
            '*' => {
                if self.eat('*') {
                    TokenKind::StarStar
                } else if self.eat('=') {
                    TokenKind::StarEq
                } else {
                    TokenKind::Star
                }
            }
            '/' => {
                if self.eat('=') {
                    TokenKind::SlashEq
                } else {
                    TokenKind::Slash
                }
            }
            '%' => {
                if self.eat('=') {
                    TokenKind::PercentEq
                } else {
                    TokenKind::Percent
                }
            }
            other => {
                self.sink
                    .report(span, format!("Unexpected character '{}'", other));
                return None;
            }
        };
        let spelling = self.spelling(kind);
        Some(Token::new(kind, spelling, span))
    }

    fn spelling(&mut self, kind: TokenKind) -> Symbol {
        let text = match kind {
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Caret => "^",
            TokenKind::Tilde => "~",
            TokenKind::Dot => ".",
            TokenKind::Ellipsis => "...",
            TokenKind::Question => "?",
            TokenKind::QuestionDot => "?.",
            TokenKind::Eq => "=",
            TokenKind::EqEq => "==",
            TokenKind::EqEqEq => "===",
            TokenKind::Arrow => "=>",
            TokenKind::Bang => "!",
            TokenKind::NotEq => "!=",
            TokenKind::NotEqEq => "!==",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::Shr => ">>",
            TokenKind::UShr => ">>>",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Shl => "<<",
            TokenKind::Amp => "&",
            TokenKind::AndAnd => "&&",
            TokenKind::Pipe => "|",
            TokenKind::OrOr => "||",
            TokenKind::Plus => "+",
            TokenKind::PlusPlus => "++",
            TokenKind::PlusEq => "+=",
            TokenKind::Minus => "-",
            TokenKind::MinusMinus => "--",
            TokenKind::MinusEq => "-=",
            TokenKind::Star => "*",
            TokenKind::StarStar => "**",
            TokenKind::StarEq => "*=",
            TokenKind::Slash => "/",
            TokenKind::SlashEq => "/=",
            TokenKind::Percent => "%",
            TokenKind::PercentEq => "%=",
            _ => "",
        };
        self.interner.intern(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> (Vec<Token>, DiagnosticSink, Interner) {
        let mut interner = Interner::new();
        let mut sink = DiagnosticSink::new(source);
        let tokens = Lexer::new(source, &mut interner, &mut sink).tokenize();
        (tokens, sink, interner)
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_source_yields_single_eof() {
        let (tokens, sink, _) = lex("");
        assert_eq!(kinds(&tokens), vec![TokenKind::Eof]);
        assert!(!sink.has_errors());
    }

    #[test]
    fn keywords_are_reclassified() {
        let (tokens, _, _) = lex("let const class interface");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Let,
                TokenKind::Const,
                TokenKind::Class,
                TokenKind::Interface,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn boolean_words_become_literals() {
        let (tokens, _, _) = lex("true false null undefined");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::BoolLit,
                TokenKind::BoolLit,
                TokenKind::NullLit,
                TokenKind::UndefinedLit,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn maximal_munch_on_comparison_operators() {
        let (tokens, _, _) = lex("= == === ! != !== >>> >> > <= <<");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Eq,
                TokenKind::EqEq,
                TokenKind::EqEqEq,
                TokenKind::Bang,
                TokenKind::NotEq,
                TokenKind::NotEqEq,
                TokenKind::UShr,
                TokenKind::Shr,
                TokenKind::Gt,
                TokenKind::LtEq,
                TokenKind::Shl,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn arrow_lexes_from_both_spellings() {
        let (tokens, _, _) = lex("=> ->");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Arrow, TokenKind::Arrow, TokenKind::Eof]
        );
    }

    #[test]
    fn optional_chain_and_spread() {
        let (tokens, _, _) = lex("?. ? ... .");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::QuestionDot,
                TokenKind::Question,
                TokenKind::Ellipsis,
                TokenKind::Dot,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn number_with_fraction_and_exponent() {
        let (tokens, sink, interner) = lex("3.14 1e10 2.5E-3");
        assert!(!sink.has_errors());
        assert_eq!(interner.resolve(tokens[0].lexeme), "3.14");
        assert_eq!(interner.resolve(tokens[1].lexeme), "1e10");
        assert_eq!(interner.resolve(tokens[2].lexeme), "2.5E-3");
    }

    #[test]
    fn missing_exponent_digits_reports() {
        let (_, sink, _) = lex("1e");
        assert!(sink.has_errors());
        assert!(sink.diagnostics()[0].message.contains("exponent"));
    }

    #[test]
    fn string_escapes_are_cooked() {
        let (tokens, sink, interner) = lex(r#""a\nb\t\"c\"""#);
        assert!(!sink.has_errors());
        assert_eq!(interner.resolve(tokens[0].lexeme), "a\nb\t\"c\"");
    }

    #[test]
    fn unknown_escape_passes_through() {
        let (tokens, _, interner) = lex(r#"'a\qb'"#);
        assert_eq!(interner.resolve(tokens[0].lexeme), "a\\qb");
    }

    #[test]
    fn unterminated_string_reports_at_opening_quote() {
        let (_, sink, _) = lex("let s = \"abc");
        assert!(sink.has_errors());
        let diag = &sink.diagnostics()[0];
        assert_eq!(diag.line, 1);
        assert_eq!(diag.column, 9);
        assert!(diag.message.contains("Unterminated string"));
    }

    #[test]
    fn unterminated_block_comment_reports() {
        let (_, sink, _) = lex("/* never closed");
        assert!(sink.has_errors());
        assert!(sink.diagnostics()[0].message.contains("block comment"));
    }

    #[test]
    fn line_comment_runs_to_end_of_line() {
        let (tokens, _, _) = lex("// nothing here\nlet");
        assert_eq!(kinds(&tokens), vec![TokenKind::Let, TokenKind::Eof]);
        assert_eq!(tokens[0].span.line, 2);
    }

    #[test]
    fn newline_advances_line_and_resets_column() {
        let (tokens, _, _) = lex("a\n  b");
        assert_eq!(tokens[0].span, Span::new(1, 1));
        assert_eq!(tokens[1].span, Span::new(2, 3));
    }

    #[test]
    fn unexpected_character_is_skipped() {
        let (tokens, sink, _) = lex("let @ x");
        assert!(sink.has_errors());
        assert!(sink.diagnostics()[0].message.contains("Unexpected character '@'"));
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Let, TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn dollar_and_underscore_start_identifiers() {
        let (tokens, _, interner) = lex("$el _private x$1");
        assert_eq!(interner.resolve(tokens[0].lexeme), "$el");
        assert_eq!(interner.resolve(tokens[1].lexeme), "_private");
        assert_eq!(interner.resolve(tokens[2].lexeme), "x$1");
    }
}
