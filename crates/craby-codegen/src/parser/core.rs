//! Parser state and low-level token operations.

use rowan::{TextRange, TextSize};

use super::ast::SourceFile;
use super::lexer::{Token, token_text};
use super::syntax_kind::SyntaxKind;
use crate::diagnostics::{DiagnosticKind, Diagnostics};

#[cfg(debug_assertions)]
const DEFAULT_FUEL: u32 = 256;

/// Nested type expressions deeper than this are rejected.
pub(super) const MAX_DEPTH: u32 = 128;

pub struct Parser<'src> {
    pub(super) source: &'src str,
    /// Non-trivia tokens only.
    pub(super) tokens: Vec<Token>,
    pub(super) pos: usize,
    pub(super) diagnostics: Diagnostics,
    pub(super) depth: u32,
    /// End of the last consumed token, for covering spans.
    pub(super) last_end: TextSize,
    /// Position of the last reported error; later errors at the same spot are cascades.
    last_error_pos: Option<TextSize>,
    #[cfg(debug_assertions)]
    fuel: std::cell::Cell<u32>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens: tokens.into_iter().filter(|t| !t.kind.is_trivia()).collect(),
            pos: 0,
            diagnostics: Diagnostics::new(),
            depth: 0,
            last_end: TextSize::from(0),
            last_error_pos: None,
            #[cfg(debug_assertions)]
            fuel: std::cell::Cell::new(DEFAULT_FUEL),
        }
    }

    pub fn parse(mut self) -> (SourceFile, Diagnostics) {
        let file = self.parse_file();
        (file, self.diagnostics)
    }

    /// Current token kind. `Eof` past the end.
    pub(super) fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Lookahead by `n` tokens (0 = current). Panics in debug builds when no progress is made.
    pub(super) fn nth(&self, lookahead: usize) -> SyntaxKind {
        #[cfg(debug_assertions)]
        {
            if self.fuel.get() == 0 {
                panic!("parser is stuck: no progress made in {DEFAULT_FUEL} lookaheads");
            }
            self.fuel.set(self.fuel.get() - 1);
        }
        self.tokens
            .get(self.pos + lookahead)
            .map_or(SyntaxKind::Eof, |t| t.kind)
    }

    pub(super) fn current_span(&self) -> TextRange {
        self.tokens
            .get(self.pos)
            .map_or_else(|| TextRange::empty(self.eof_offset()), |t| t.span)
    }

    pub(super) fn current_text(&self) -> &'src str {
        self.tokens
            .get(self.pos)
            .map_or("", |t| token_text(self.source, t))
    }

    pub(super) fn eof_offset(&self) -> TextSize {
        TextSize::from(self.source.len() as u32)
    }

    pub(super) fn eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(super) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Consume the current token. Resets fuel.
    pub(super) fn bump(&mut self) -> Token {
        assert!(!self.eof(), "bump called at EOF");
        #[cfg(debug_assertions)]
        self.fuel.set(DEFAULT_FUEL);
        let token = self.tokens[self.pos];
        self.pos += 1;
        self.last_end = token.span.end();
        token
    }

    pub(super) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or report what was found instead.
    pub(super) fn expect(&mut self, kind: SyntaxKind) -> Option<Token> {
        if self.at(kind) {
            return Some(self.bump());
        }
        self.error_expected(kind.describe());
        None
    }

    pub(super) fn error_expected(&mut self, what: &str) {
        let found = self.describe_current();
        self.error(
            DiagnosticKind::UnexpectedToken,
            format!("expected {what}, found {found}"),
        );
    }

    fn describe_current(&self) -> String {
        match self.current() {
            SyntaxKind::Eof => "end of file".to_string(),
            SyntaxKind::Garbage => format!("`{}`", self.current_text()),
            kind if kind.is_name() => format!("`{}`", self.current_text()),
            kind => kind.describe().to_string(),
        }
    }

    /// Report at the current token unless an error was already reported there.
    pub(super) fn error(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let range = self.current_span();
        if self.last_error_pos == Some(range.start()) {
            return;
        }
        self.last_error_pos = Some(range.start());
        self.diagnostics.report(kind, range).message(message).emit();
    }

    pub(super) fn error_at(
        &mut self,
        kind: DiagnosticKind,
        range: TextRange,
        message: impl Into<String>,
    ) {
        self.last_error_pos = Some(range.start());
        self.diagnostics.report(kind, range).message(message).emit();
    }

    /// Span from `start` to the end of the last consumed token.
    pub(super) fn span_from(&self, start: TextRange) -> TextRange {
        if self.last_end < start.start() {
            return start;
        }
        TextRange::new(start.start(), self.last_end)
    }

    pub(super) fn enter_recursion(&mut self) -> bool {
        if self.depth >= MAX_DEPTH {
            return false;
        }
        self.depth += 1;
        true
    }

    pub(super) fn exit_recursion(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Skip to the next top-level item boundary.
    pub(super) fn recover_to_item(&mut self) {
        let mut depth = 0u32;
        while !self.eof() {
            match self.current() {
                SyntaxKind::BraceOpen | SyntaxKind::ParenOpen | SyntaxKind::BracketOpen => {
                    depth += 1;
                }
                SyntaxKind::BraceClose | SyntaxKind::ParenClose | SyntaxKind::BracketClose => {
                    if depth == 0 {
                        self.bump();
                        return;
                    }
                    depth -= 1;
                }
                SyntaxKind::Semicolon if depth == 0 => {
                    self.bump();
                    return;
                }
                kind if depth == 0 && kind.starts_item() => return,
                _ => {}
            }
            self.bump();
        }
    }

    /// Skip to the end of the current member inside `{ ... }`, leaving the closing brace.
    pub(super) fn recover_in_block(&mut self) {
        let mut depth = 0u32;
        while !self.eof() {
            match self.current() {
                SyntaxKind::BraceOpen | SyntaxKind::ParenOpen | SyntaxKind::BracketOpen => {
                    depth += 1;
                }
                SyntaxKind::BraceClose if depth == 0 => return,
                SyntaxKind::BraceClose | SyntaxKind::ParenClose | SyntaxKind::BracketClose => {
                    depth = depth.saturating_sub(1);
                }
                SyntaxKind::Semicolon | SyntaxKind::Comma if depth == 0 => {
                    self.bump();
                    return;
                }
                _ => {}
            }
            self.bump();
        }
    }
}
