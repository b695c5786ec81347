//! Token kinds for module spec sources.
//!
//! Keywords get their own kinds but stay usable as member names; the parser
//! decides by position (`type: string` is a field named `type`).

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("(")]
    ParenOpen = 0,

    #[token(")")]
    ParenClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token("<")]
    AngleOpen,

    #[token(">")]
    AngleClose,

    /// `=>` in function types. Defined before `Equals` for precedence.
    #[token("=>")]
    Arrow,

    #[token("=")]
    Equals,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[token("...")]
    Ellipsis,

    #[token(".")]
    Dot,

    #[token("?")]
    Question,

    #[token("|")]
    Pipe,

    #[token("&")]
    Ampersand,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[regex(r#""(?:[^"\\\n]|\\.)*""#)]
    #[regex(r"'(?:[^'\\\n]|\\.)*'")]
    StringLit,

    #[regex(r"[0-9][0-9_]*(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?")]
    #[regex(r"0[xX][0-9a-fA-F]+")]
    NumberLit,

    #[token("import")]
    KwImport,

    #[token("export")]
    KwExport,

    #[token("default")]
    KwDefault,

    #[token("interface")]
    KwInterface,

    #[token("type")]
    KwType,

    #[token("enum")]
    KwEnum,

    #[token("extends")]
    KwExtends,

    #[token("readonly")]
    KwReadonly,

    #[token("const")]
    KwConst,

    #[token("declare")]
    KwDeclare,

    /// Defined after keywords so they take precedence.
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Ident,

    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    #[regex(r"/\*(?:[^*]|\*+[^*/])*\*+/")]
    BlockComment,

    /// Coalesced unrecognized characters
    Garbage,

    /// End-of-input sentinel
    Eof,
}

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::Whitespace | SyntaxKind::LineComment | SyntaxKind::BlockComment
        )
    }

    #[inline]
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            SyntaxKind::KwImport
                | SyntaxKind::KwExport
                | SyntaxKind::KwDefault
                | SyntaxKind::KwInterface
                | SyntaxKind::KwType
                | SyntaxKind::KwEnum
                | SyntaxKind::KwExtends
                | SyntaxKind::KwReadonly
                | SyntaxKind::KwConst
                | SyntaxKind::KwDeclare
        )
    }

    /// Identifiers and keywords, which both work as member names.
    #[inline]
    pub fn is_name(self) -> bool {
        self == SyntaxKind::Ident || self.is_keyword()
    }

    /// Tokens that can start a top-level item; used for error recovery.
    pub fn starts_item(self) -> bool {
        matches!(
            self,
            SyntaxKind::KwImport
                | SyntaxKind::KwExport
                | SyntaxKind::KwInterface
                | SyntaxKind::KwType
                | SyntaxKind::KwEnum
                | SyntaxKind::KwDeclare
        )
    }

    /// Human-readable token description for diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            SyntaxKind::ParenOpen => "`(`",
            SyntaxKind::ParenClose => "`)`",
            SyntaxKind::BracketOpen => "`[`",
            SyntaxKind::BracketClose => "`]`",
            SyntaxKind::BraceOpen => "`{`",
            SyntaxKind::BraceClose => "`}`",
            SyntaxKind::AngleOpen => "`<`",
            SyntaxKind::AngleClose => "`>`",
            SyntaxKind::Arrow => "`=>`",
            SyntaxKind::Equals => "`=`",
            SyntaxKind::Colon => "`:`",
            SyntaxKind::Semicolon => "`;`",
            SyntaxKind::Comma => "`,`",
            SyntaxKind::Ellipsis => "`...`",
            SyntaxKind::Dot => "`.`",
            SyntaxKind::Question => "`?`",
            SyntaxKind::Pipe => "`|`",
            SyntaxKind::Ampersand => "`&`",
            SyntaxKind::Minus => "`-`",
            SyntaxKind::Star => "`*`",
            SyntaxKind::StringLit => "string literal",
            SyntaxKind::NumberLit => "number literal",
            SyntaxKind::Ident => "identifier",
            SyntaxKind::Garbage => "unrecognized input",
            SyntaxKind::Eof => "end of file",
            SyntaxKind::Whitespace | SyntaxKind::LineComment | SyntaxKind::BlockComment => {
                "trivia"
            }
            _ => "keyword",
        }
    }
}
