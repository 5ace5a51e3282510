use std::str::Chars;

use crate::source::{SourceFile, SourceId};

/// A character cursor over an immutable source buffer.
///
/// The cursor only knows byte offsets. Lines and columns are the lexer's business.
#[derive(Debug, Clone)]
pub struct Cursor<'buf> {
    buf: &'buf str,
    source_id: Option<SourceId>,
    iter: Chars<'buf>,
    byte: usize,
}

impl<'buf> Cursor<'buf> {
    pub fn new(src_file: &SourceFile<'buf>) -> Self {
        Self::with_source_id(src_file.text(), Some(src_file.id()))
    }

    /// Creates a cursor over text that is not registered as a source file.
    pub fn detached(buf: &'buf str) -> Self {
        Self::with_source_id(buf, None)
    }

    fn with_source_id(buf: &'buf str, source_id: Option<SourceId>) -> Self {
        Self {
            buf,
            source_id,
            iter: buf.chars(),
            byte: 0,
        }
    }

    pub fn source_id(&self) -> Option<SourceId> {
        self.source_id
    }

    /// Returns the byte offset of the immediately following character.
    pub fn byte(&self) -> usize {
        self.byte
    }

    pub fn peek(&self) -> Option<char> {
        self.iter.clone().next()
    }

    pub fn remaining(&self) -> &'buf str {
        &self.buf[self.byte..]
    }

    /// Returns everything consumed since the byte offset `start`.
    pub fn consumed_since(&self, start: usize) -> &'buf str {
        &self.buf[start..self.byte]
    }

    pub fn starts_with(&self, value: &str) -> bool {
        self.remaining().starts_with(value)
    }

    pub fn consume_expecting(&mut self, expected: &str) -> Option<&'buf str> {
        self.starts_with(expected)
            .then(|| self.consume_n(expected.chars().count()))
    }

    /// Consumes `n` characters, or fewer if the input ends first.
    pub fn consume_n(&mut self, n: usize) -> &'buf str {
        let start = self.byte;

        for _ in 0..n {
            self.next();
        }

        self.consumed_since(start)
    }

    pub fn consume_while(&mut self, mut predicate: impl FnMut(char) -> bool) -> &'buf str {
        let start = self.byte;

        while self.peek().map_or(false, &mut predicate) {
            self.next();
        }

        self.consumed_since(start)
    }
}

impl<'buf> Iterator for Cursor<'buf> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.iter.next()?;
        self.byte += c.len_utf8();

        Some(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumes_whole_characters() {
        let mut cursor = Cursor::detached("é=1");

        assert_eq!(cursor.consume_n(1), "é");
        assert_eq!(cursor.byte(), 2);
        assert_eq!(cursor.consume_expecting("="), Some("="));
        assert_eq!(cursor.consume_expecting("="), None);
        assert_eq!(cursor.consume_while(|c| c.is_ascii_digit()), "1");
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.consume_n(3), "");
    }
}
