//! Recursive descent parser for a single method declaration.
//!
//! Accepts the subset of Java method syntax needed to materialize members
//! from text: annotations, modifiers, an optional return type (qualified
//! names with array dimensions, or `void`), parameters with a trailing
//! varargs parameter, a `throws` list, an annotation method's `default`
//! value, and either a `{ ... }` body or `;`. Generic types are rejected.

use strata_common::{Ident, Interner};
use strata_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use strata_source::{FileId, Span};
use thiserror::Error;

use crate::class::{ClassKind, ClassNode};
use crate::decl::{MethodDecl, Modifiers, Param, TypeRef};
use crate::lexer::{self, E100};
use crate::token::{SigToken, Token};

/// Malformed method declaration syntax.
pub const E101: DiagnosticCode = DiagnosticCode::new(Category::Error, 101);

/// The class a method declaration is parsed in.
///
/// The class name decides whether a declaration without a return type is a
/// constructor, and the class kind whether a `default` value is allowed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MethodContext {
    /// Name of the enclosing class, `None` for anonymous classes.
    pub class_name: Option<Ident>,
    /// Kind of the enclosing class.
    pub class_kind: ClassKind,
}

impl MethodContext {
    /// The context of methods declared in `class`.
    pub fn of(class: &ClassNode) -> Self {
        Self {
            class_name: strata_members::ClassOwner::name(class),
            class_kind: class.kind(),
        }
    }
}

/// Why a method declaration could not be parsed.
///
/// The full set of diagnostics is forwarded to the caller's sink; this
/// carries the first one.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The text contains characters or literals that do not form tokens.
    #[error("invalid token in method declaration: {message}")]
    Lex {
        /// The first lexer error.
        message: String,
        /// Where it occurred.
        span: Span,
    },
    /// The tokens do not form a method declaration.
    #[error("malformed method declaration: {message}")]
    Syntax {
        /// The first syntax error.
        message: String,
        /// Where it occurred.
        span: Span,
    },
}

/// Parses `text` as one method or constructor declaration.
///
/// Every diagnostic produced along the way is emitted to `sink`. The
/// declaration is returned only if no error was reported.
pub fn parse_method(
    text: &str,
    file: FileId,
    context: &MethodContext,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Result<MethodDecl, ParseError> {
    let local = DiagnosticSink::new();
    let tokens = lexer::lex(text, file, &local);
    let mut parser = SigParser {
        tokens,
        pos: 0,
        source: text,
        context,
        interner,
        sink: &local,
    };
    let decl = parser.parse_declaration();

    let diagnostics = local.take_all();
    let first_error = diagnostics
        .iter()
        .find(|diag| diag.severity == Severity::Error)
        .map(|diag| (diag.code, diag.message.clone(), diag.primary_span));
    for diag in diagnostics {
        sink.emit(diag);
    }

    match (decl, first_error) {
        (Some(decl), None) => Ok(decl),
        (_, Some((code, message, span))) if code == E100 => Err(ParseError::Lex { message, span }),
        (_, Some((_, message, span))) => Err(ParseError::Syntax { message, span }),
        (None, None) => Err(ParseError::Syntax {
            message: "incomplete method declaration".to_string(),
            span: Span::new(file, 0, text.len() as u32),
        }),
    }
}

/// Parser state. Every `parse_*` method reports its own errors and returns
/// `None` after reporting.
struct SigParser<'src> {
    tokens: Vec<Token>,
    pos: usize,
    source: &'src str,
    context: &'src MethodContext,
    interner: &'src Interner,
    sink: &'src DiagnosticSink,
}

impl<'src> SigParser<'src> {
    // ========================================================================
    // Primitive operations
    // ========================================================================

    fn current(&self) -> SigToken {
        self.tokens[self.pos].kind
    }

    fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn current_text(&self) -> &'src str {
        let span = self.current_span();
        &self.source[span.start as usize..span.end as usize]
    }

    fn at(&self, kind: SigToken) -> bool {
        self.current() == kind
    }

    fn at_eof(&self) -> bool {
        self.at(SigToken::Eof)
    }

    fn peek_kind(&self, offset: usize) -> SigToken {
        self.tokens
            .get(self.pos + offset)
            .map_or(SigToken::Eof, |token| token.kind)
    }

    fn prev_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            self.current_span()
        }
    }

    fn advance(&mut self) {
        if !self.at_eof() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SigToken) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SigToken, what: &str) -> Option<()> {
        if self.eat(kind) {
            Some(())
        } else {
            self.expected(what)
        }
    }

    fn expect_ident(&mut self) -> Option<Ident> {
        if self.at(SigToken::Identifier) {
            let ident = self.interner.get_or_intern(self.current_text());
            self.advance();
            Some(ident)
        } else {
            self.expected("identifier")
        }
    }

    // ========================================================================
    // Error handling
    // ========================================================================

    fn error_at<T>(&self, msg: impl Into<String>, span: Span) -> Option<T> {
        self.sink.emit(Diagnostic::error(E101, msg, span));
        None
    }

    fn expected<T>(&self, what: &str) -> Option<T> {
        if self.at(SigToken::Error) {
            // already reported by the lexer
            return None;
        }
        let found = if self.at_eof() {
            "end of input".to_string()
        } else {
            format!("`{}`", self.current_text())
        };
        self.error_at(format!("expected {what}, found {found}"), self.current_span())
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn parse_declaration(&mut self) -> Option<MethodDecl> {
        let start = self.current_span();
        let mut is_deprecated = false;
        let mut modifiers = Modifiers::empty();
        loop {
            if self.at(SigToken::At) {
                is_deprecated |= self.parse_annotation()?;
            } else if let Some(modifier) = modifier_of(self.current()) {
                if modifiers.contains(modifier) {
                    let msg = format!("repeated modifier `{}`", self.current_text());
                    return self.error_at(msg, self.current_span());
                }
                modifiers |= modifier;
                self.advance();
            } else {
                break;
            }
        }

        let return_type = if self.at(SigToken::Identifier) && self.peek_kind(1) == SigToken::LeftParen {
            None
        } else {
            Some(self.parse_type(true)?)
        };

        let name_span = self.current_span();
        let name = self.expect_ident()?;
        let is_constructor = return_type.is_none();
        if is_constructor && self.context.class_name != Some(name) {
            return self.error_at("method declaration needs a return type", name_span);
        }

        self.expect(SigToken::LeftParen, "`(`")?;
        let (params, is_varargs) = self.parse_params()?;
        self.expect(SigToken::RightParen, "`)`")?;

        let mut throws = Vec::new();
        if self.eat(SigToken::Throws) {
            loop {
                throws.push(self.parse_type(false)?);
                if !self.eat(SigToken::Comma) {
                    break;
                }
            }
        }

        let is_annotation_method = self.context.class_kind == ClassKind::Annotation && !is_constructor;
        let mut default_value_text = None;
        if self.at(SigToken::Default) {
            if !is_annotation_method {
                return self.error_at(
                    "default values are only allowed in annotation types",
                    self.current_span(),
                );
            }
            self.advance();
            default_value_text = Some(self.parse_default_value()?);
        }

        if self.at(SigToken::LeftBrace) {
            self.skip_body()?;
        } else {
            self.expect(SigToken::Semicolon, "`{` or `;`")?;
        }
        let end = self.prev_span();
        if !self.at_eof() {
            return self.expected("end of input");
        }

        Some(MethodDecl {
            return_type,
            params,
            modifiers,
            throws,
            is_constructor,
            is_varargs,
            is_annotation_method,
            default_value_text,
            is_deprecated,
            span: start.merge(end),
            ..MethodDecl::new(name, None)
        })
    }

    /// Parses `@Name` or `@Name(...)`. Returns `true` for `@Deprecated`.
    fn parse_annotation(&mut self) -> Option<bool> {
        self.expect(SigToken::At, "`@`")?;
        let name = self.parse_qualified_name()?;
        if self.at(SigToken::LeftParen) {
            self.skip_balanced(SigToken::LeftParen, SigToken::RightParen, "`)`")?;
        }
        Some(name == "Deprecated" || name == "java.lang.Deprecated")
    }

    fn parse_qualified_name(&mut self) -> Option<String> {
        let first = self.expect_ident()?;
        let mut name = self.interner.resolve(first).to_string();
        while self.at(SigToken::Dot) && self.peek_kind(1) == SigToken::Identifier {
            self.advance();
            name.push('.');
            name.push_str(self.current_text());
            self.advance();
        }
        Some(name)
    }

    fn parse_type(&mut self, allow_void: bool) -> Option<TypeRef> {
        if self.at(SigToken::Void) {
            if !allow_void {
                return self.error_at("`void` is not allowed here", self.current_span());
            }
            let name = self.interner.get_or_intern("void");
            self.advance();
            if self.at(SigToken::LeftBracket) {
                return self.error_at("`void` cannot have array dimensions", self.current_span());
            }
            return Some(TypeRef::new(name, 0));
        }
        let name = self.parse_qualified_name()?;
        if self.at(SigToken::Less) {
            return self.error_at("generic types are not supported", self.current_span());
        }
        let mut dims = 0;
        while self.eat(SigToken::LeftBracket) {
            self.expect(SigToken::RightBracket, "`]`")?;
            dims += 1;
        }
        Some(TypeRef::new(self.interner.get_or_intern(&name), dims))
    }

    fn parse_params(&mut self) -> Option<(Vec<Param>, bool)> {
        let mut params = Vec::new();
        let mut is_varargs = false;
        if self.at(SigToken::RightParen) {
            return Some((params, is_varargs));
        }
        loop {
            while self.at(SigToken::At) {
                self.parse_annotation()?;
            }
            self.eat(SigToken::Final);
            let mut ty = self.parse_type(false)?;
            if self.eat(SigToken::Ellipsis) {
                ty.dims += 1;
                is_varargs = true;
            }
            let name = self.expect_ident()?;
            params.push(Param { ty, name });
            if !self.at(SigToken::Comma) {
                break;
            }
            if is_varargs {
                return self.error_at("a varargs parameter must be the last one", self.current_span());
            }
            self.advance();
        }
        Some((params, is_varargs))
    }

    /// Collects the source text up to the terminating `;`.
    fn parse_default_value(&mut self) -> Option<String> {
        let start = self.current_span();
        let mut depth = 0usize;
        while !self.at_eof() {
            match self.current() {
                SigToken::Semicolon if depth == 0 => break,
                SigToken::LeftParen | SigToken::LeftBrace | SigToken::LeftBracket => depth += 1,
                SigToken::RightParen | SigToken::RightBrace | SigToken::RightBracket => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            self.advance();
        }
        if self.current_span() == start {
            return self.expected("default value");
        }
        let end = self.prev_span();
        Some(self.source[start.start as usize..end.end as usize].to_string())
    }

    fn skip_body(&mut self) -> Option<()> {
        self.skip_balanced(SigToken::LeftBrace, SigToken::RightBrace, "`}`")
    }

    fn skip_balanced(&mut self, open: SigToken, close: SigToken, what: &str) -> Option<()> {
        self.expect(open, "opening delimiter")?;
        let mut depth = 1usize;
        while depth > 0 {
            if self.at_eof() {
                return self.expected(what);
            }
            if self.at(open) {
                depth += 1;
            } else if self.at(close) {
                depth -= 1;
            }
            self.advance();
        }
        Some(())
    }
}

fn modifier_of(token: SigToken) -> Option<Modifiers> {
    let modifier = match token {
        SigToken::Public => Modifiers::PUBLIC,
        SigToken::Protected => Modifiers::PROTECTED,
        SigToken::Private => Modifiers::PRIVATE,
        SigToken::Static => Modifiers::STATIC,
        SigToken::Final => Modifiers::FINAL,
        SigToken::Abstract => Modifiers::ABSTRACT,
        SigToken::Native => Modifiers::NATIVE,
        SigToken::Synchronized => Modifiers::SYNCHRONIZED,
        SigToken::Default => Modifiers::DEFAULT,
        _ => return None,
    };
    Some(modifier)
}
