//! Token types for the method signature lexer.

use strata_source::Span;

/// A token kind in a method declaration.
///
/// Literal and identifier values are not stored in the token; they are read
/// back from the source text through the token's span.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SigToken {
    // === Keywords ===
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// `private`
    Private,
    /// `static`
    Static,
    /// `final`
    Final,
    /// `abstract`
    Abstract,
    /// `native`
    Native,
    /// `synchronized`
    Synchronized,
    /// `default`
    Default,
    /// `void`
    Void,
    /// `throws`
    Throws,

    // === Names and literals ===
    /// An identifier, primitive type names included.
    Identifier,
    /// A numeric literal.
    NumberLiteral,
    /// A `"..."` string literal.
    StringLiteral,
    /// A `'...'` character literal.
    CharLiteral,

    // === Punctuation ===
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `...`
    Ellipsis,
    /// `;`
    Semicolon,
    /// `@`
    At,
    /// Any other operator character; only legal inside bodies and default values.
    Operator,

    // === Special ===
    /// A character the lexer could not make sense of.
    Error,
    /// End of input.
    Eof,
}

impl SigToken {
    /// Returns `true` for the modifier keywords.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            SigToken::Public
                | SigToken::Protected
                | SigToken::Private
                | SigToken::Static
                | SigToken::Final
                | SigToken::Abstract
                | SigToken::Native
                | SigToken::Synchronized
                | SigToken::Default
        )
    }
}

/// A token paired with its source span.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Token {
    /// The kind of this token.
    pub kind: SigToken,
    /// The source span covering this token's text.
    pub span: Span,
}

/// Looks up a keyword from an identifier string.
pub fn lookup_keyword(s: &str) -> Option<SigToken> {
    match s {
        "public" => Some(SigToken::Public),
        "protected" => Some(SigToken::Protected),
        "private" => Some(SigToken::Private),
        "static" => Some(SigToken::Static),
        "final" => Some(SigToken::Final),
        "abstract" => Some(SigToken::Abstract),
        "native" => Some(SigToken::Native),
        "synchronized" => Some(SigToken::Synchronized),
        "default" => Some(SigToken::Default),
        "void" => Some(SigToken::Void),
        "throws" => Some(SigToken::Throws),
        _ => None,
    }
}
