use itertools::{self, PeekNth};

use crate::parse::lexer::Lexer;
use crate::parse::token::Token;

/// Adapts [`Lexer::next_token`] into an iterator that never ends.
#[derive(Debug, Clone)]
struct Tokens<'buf>(Lexer<'buf>);

impl<'buf> Iterator for Tokens<'buf> {
    type Item = Token<'buf>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.0.next_token())
    }
}

/// The parser's view of the token stream: the current token plus a lazily filled buffer of
/// the tokens after it.
///
/// Looking past the current token never consumes anything, so deciding between two rules
/// that share a prefix needs no snapshot to restore.
#[derive(Debug, Clone)]
pub struct Lookahead<'buf> {
    current: Token<'buf>,
    rest: PeekNth<Tokens<'buf>>,
}

impl<'buf> Lookahead<'buf> {
    pub fn new(mut lexer: Lexer<'buf>) -> Self {
        let current = lexer.next_token();

        Self {
            current,
            rest: itertools::peek_nth(Tokens(lexer)),
        }
    }

    pub fn current(&self) -> Token<'buf> {
        self.current
    }

    /// The token right after the current one.
    pub fn lookahead(&mut self) -> Token<'buf> {
        self.peek(1)
    }

    /// Returns the `n`-th token counting from the current one, which is `peek(0)`.
    pub fn peek(&mut self, n: usize) -> Token<'buf> {
        match n.checked_sub(1) {
            None => self.current,
            Some(n) => self.rest.peek_nth(n).copied().unwrap_or(self.current),
        }
    }

    /// Moves the window one token forward, returning the token that was current.
    ///
    /// At the end of input the window stays on the end-of-input token.
    pub fn advance(&mut self) -> Token<'buf> {
        let next = self.rest.next().unwrap_or(self.current);

        std::mem::replace(&mut self.current, next)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parse::cursor::Cursor;
    use crate::parse::token::{Symbol, TokenValue, TypeName};

    fn lookahead(src: &str) -> Lookahead<'_> {
        Lookahead::new(Lexer::new(Cursor::detached(src)))
    }

    #[test]
    fn peeking_does_not_consume() {
        let mut tokens = lookahead("void main ( )");

        assert_eq!(tokens.peek(2).value, TokenValue::Symbol(Symbol::ParenLeft));
        assert_eq!(tokens.lookahead().value, TokenValue::Ident("main"));
        assert_eq!(tokens.current().value, TokenValue::TypeName(TypeName::Void));
        assert_eq!(tokens.peek(0), tokens.current());
    }

    #[test]
    fn advance_shifts_the_window() {
        let mut tokens = lookahead("a b c");

        assert_eq!(tokens.advance().value, TokenValue::Ident("a"));
        assert_eq!(tokens.current().value, TokenValue::Ident("b"));
        assert_eq!(tokens.lookahead().value, TokenValue::Ident("c"));
    }

    #[test]
    fn end_of_input_is_sticky() {
        let mut tokens = lookahead("x");

        assert!(tokens.lookahead().is_eof());
        assert!(tokens.peek(5).is_eof());

        tokens.advance();
        assert!(tokens.current().is_eof());

        let eof = tokens.advance();
        assert!(eof.is_eof());
        assert_eq!(tokens.current(), eof);
    }
}
