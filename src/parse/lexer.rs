use std::iter::FusedIterator;

use tracing::{debug, trace};

use crate::parse::cursor::Cursor;
use crate::parse::token::{
    Keyword, Operator, Symbol, Token, TokenValue, TypeName, FORM_FEED, VERTICAL_TAB,
};
use crate::position::{Position, Span};

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\n' | FORM_FEED | '\r' | '\t' | VERTICAL_TAB)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continuation(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_number_continuation(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

/// Splits the source into tokens, one at a time.
///
/// Scanning never fails: a character that starts no token becomes a one-character
/// [`TokenValue::Invalid`] token. Once the input is exhausted, [`Lexer::next_token`] keeps
/// returning [`TokenValue::Eof`].
#[derive(Debug, Clone)]
pub struct Lexer<'buf> {
    cursor: Cursor<'buf>,
    line: usize,
    col: usize,
    eof: bool,
}

impl<'buf> Lexer<'buf> {
    pub fn new(cursor: Cursor<'buf>) -> Self {
        Self {
            cursor,
            line: 1,
            col: 1,
            eof: false,
        }
    }

    /// Returns the position of the next unscanned character.
    pub fn pos(&self) -> Position {
        Position {
            src: self.cursor.source_id(),
            byte: self.cursor.byte(),
            line: self.line,
            col: self.col,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.cursor.peek().filter(|&c| is_whitespace(c)) {
            self.cursor.next();

            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
    }

    /// Skips a `//` comment up to its terminating newline, which is left in place.
    ///
    /// The line counter moves forward unconditionally, so the newline that follows is counted
    /// a second time, and a comment at the end of input still ends a line.
    fn skip_comment(&mut self) {
        self.cursor.consume_expecting("//");
        self.cursor.consume_while(|c| c != '\n');

        self.line += 1;
        self.col = 1;
    }

    /// Skips whitespace, at most one comment, and whitespace again.
    ///
    /// A comment on the line right after another one is not skipped: it scans as two `/`
    /// operators followed by its words.
    fn skip_trivia(&mut self) {
        self.skip_whitespace();

        if self.cursor.starts_with("//") {
            self.skip_comment();
        }

        self.skip_whitespace();
    }

    fn scan_word(&mut self) -> TokenValue<'buf> {
        let word = self.cursor.consume_while(is_ident_continuation);

        if let Some(kw) = Keyword::parse_exact(word) {
            TokenValue::Keyword(kw)
        } else if let Some(ty) = TypeName::parse_exact(word) {
            TokenValue::TypeName(ty)
        } else {
            TokenValue::Ident(word)
        }
    }

    fn scan_number(&mut self) -> TokenValue<'buf> {
        TokenValue::Number(self.cursor.consume_while(is_number_continuation))
    }

    fn scan_string(&mut self) -> TokenValue<'buf> {
        self.cursor.consume_expecting("\"");
        let contents = self.cursor.consume_while(|c| c != '"');

        // an unterminated string simply runs to the end of input
        self.cursor.consume_expecting("\"");

        TokenValue::String(contents)
    }

    fn scan_operator_or_symbol(&mut self) -> TokenValue<'buf> {
        let remaining = self.cursor.remaining();

        if let Some(op) = Operator::parse_prefix(remaining) {
            self.cursor.consume_n(op.as_str().len());

            TokenValue::Operator(op)
        } else if let Some(sym) = Symbol::parse_prefix(remaining) {
            self.cursor.consume_n(sym.as_str().len());

            TokenValue::Symbol(sym)
        } else {
            let c = self.cursor.consume_n(1);
            debug!(line = self.line, col = self.col, "unrecognized character {:?}", c);

            TokenValue::Invalid(c)
        }
    }

    pub fn next_token(&mut self) -> Token<'buf> {
        self.skip_trivia();

        let start = self.pos();

        let value = match self.cursor.peek() {
            None => TokenValue::Eof,
            Some(c) if is_ident_start(c) => self.scan_word(),
            Some(c) if c.is_ascii_digit() => self.scan_number(),
            Some('"') => self.scan_string(),
            Some(_) => self.scan_operator_or_symbol(),
        };

        // the token never moves the line, even if a string literal spans several
        self.col += self.cursor.consumed_since(start.byte).chars().count();

        let token = Token {
            value,
            span: Span {
                start,
                end: self.pos(),
            },
        };

        trace!(?token);

        token
    }
}

impl<'buf> Iterator for Lexer<'buf> {
    type Item = Token<'buf>;

    /// Yields every token up to and including the end-of-input token.
    fn next(&mut self) -> Option<Self::Item> {
        if self.eof {
            return None;
        }

        let token = self.next_token();
        self.eof = token.is_eof();

        Some(token)
    }
}

impl<'buf> FusedIterator for Lexer<'buf> {}
