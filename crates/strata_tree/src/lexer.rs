//! Lexical analyzer for method declarations.
//!
//! Converts declaration text into [`Token`]s, skipping whitespace and
//! comments. Errors are reported to the [`DiagnosticSink`] and produce
//! [`SigToken::Error`] tokens.

use strata_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use strata_source::{FileId, Span};

use crate::token::{lookup_keyword, SigToken, Token};

/// Malformed input found by the lexer.
pub const E100: DiagnosticCode = DiagnosticCode::new(Category::Error, 100);

/// Lexes `source` into tokens. The result always ends with [`SigToken::Eof`].
///
/// Spans are byte offsets into `source`.
pub fn lex(source: &str, file: FileId, sink: &DiagnosticSink) -> Vec<Token> {
    let mut lexer = Lexer {
        source,
        pos: 0,
        file,
        sink,
    };
    lexer.lex_all()
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    file: FileId,
    sink: &'a DiagnosticSink,
}

impl Lexer<'_> {
    fn lex_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            if self.at_end() {
                tokens.push(Token {
                    kind: SigToken::Eof,
                    span: Span::new(self.file, self.pos as u32, self.pos as u32),
                });
                break;
            }
            tokens.push(self.next_token());
        }
        tokens
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn rest(&self) -> std::str::Chars<'_> {
        self.source[self.pos..].chars()
    }

    fn peek(&self) -> Option<char> {
        self.rest().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, mut pred: impl FnMut(char) -> bool) {
        while self.peek().is_some_and(&mut pred) {
            self.bump();
        }
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(self.file, start as u32, self.pos as u32)
    }

    fn token(&self, kind: SigToken, start: usize) -> Token {
        Token {
            kind,
            span: self.span_from(start),
        }
    }

    fn error(&self, msg: &str, span: Span) {
        self.sink.emit(Diagnostic::error(E100, msg, span));
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            self.eat_while(char::is_whitespace);
            let rest = &self.source[self.pos..];
            if rest.starts_with("//") {
                self.eat_while(|c| c != '\n');
                continue;
            }
            if rest.starts_with("/*") {
                let start = self.pos;
                match rest[2..].find("*/") {
                    Some(end) => self.pos += 2 + end + 2,
                    None => {
                        self.pos = self.source.len();
                        self.error("unterminated block comment", self.span_from(start));
                    }
                }
                continue;
            }
            break;
        }
    }

    fn next_token(&mut self) -> Token {
        let start = self.pos;
        let Some(c) = self.bump() else {
            return self.token(SigToken::Eof, start);
        };

        if is_ident_start(c) {
            self.eat_while(is_ident_char);
            let text = &self.source[start..self.pos];
            let kind = lookup_keyword(text).unwrap_or(SigToken::Identifier);
            return self.token(kind, start);
        }

        if c.is_ascii_digit() {
            // digits, hex/binary prefixes, underscores, exponents, and type suffixes
            loop {
                match self.peek() {
                    Some(d) if d.is_ascii_alphanumeric() || d == '_' => {
                        self.bump();
                    }
                    Some('.') if self.peek_second().is_some_and(|d| d.is_ascii_digit()) => {
                        self.bump();
                    }
                    _ => break,
                }
            }
            return self.token(SigToken::NumberLiteral, start);
        }

        if c == '"' || c == '\'' {
            return self.lex_quoted(start, c);
        }

        let kind = match c {
            '(' => SigToken::LeftParen,
            ')' => SigToken::RightParen,
            '{' => SigToken::LeftBrace,
            '}' => SigToken::RightBrace,
            '[' => SigToken::LeftBracket,
            ']' => SigToken::RightBracket,
            '<' => SigToken::Less,
            '>' => SigToken::Greater,
            ',' => SigToken::Comma,
            ';' => SigToken::Semicolon,
            '@' => SigToken::At,
            '.' => {
                if self.source[self.pos..].starts_with("..") {
                    self.pos += 2;
                    SigToken::Ellipsis
                } else {
                    SigToken::Dot
                }
            }
            '+' | '-' | '*' | '/' | '%' | '=' | '!' | '&' | '|' | '^' | '~' | '?' | ':' => {
                SigToken::Operator
            }
            _ => {
                self.error("unexpected character", self.span_from(start));
                SigToken::Error
            }
        };
        self.token(kind, start)
    }

    fn lex_quoted(&mut self, start: usize, quote: char) -> Token {
        loop {
            match self.bump() {
                None => {
                    let what = if quote == '"' {
                        "unterminated string literal"
                    } else {
                        "unterminated character literal"
                    };
                    self.error(what, self.span_from(start));
                    return self.token(SigToken::Error, start);
                }
                Some('\n') => {
                    self.error("line break in literal", self.span_from(start));
                    return self.token(SigToken::Error, start);
                }
                Some('\\') => {
                    self.bump();
                }
                Some(c) if c == quote => break,
                Some(_) => {}
            }
        }
        let kind = if quote == '"' {
            SigToken::StringLiteral
        } else {
            SigToken::CharLiteral
        };
        self.token(kind, start)
    }
}

/// Java identifiers may start with any letter, `_` or `$`.
fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_alphanumeric()
}
