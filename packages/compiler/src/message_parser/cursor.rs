//! Character cursor over the source text.

use crate::chars;

/// Cursor with single-character lookahead and byte-offset tracking.
#[derive(Debug, Clone)]
pub struct CharacterCursor<'a> {
    source: &'a str,
    state: CursorState,
}

#[derive(Debug, Clone)]
struct CursorState {
    peek: char,
    offset: usize,
}

impl<'a> CharacterCursor<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut cursor = CharacterCursor {
            source,
            state: CursorState {
                peek: chars::EOF,
                offset: 0,
            },
        };
        cursor.update_peek();
        cursor
    }

    /// The current character, `chars::EOF` at the end of input.
    pub fn peek(&self) -> char {
        self.state.peek
    }

    /// The character after the current one, `chars::EOF` at the end of input.
    pub fn peek_second(&self) -> char {
        let next = self.state.offset + self.state.peek.len_utf8();
        self.source[next.min(self.source.len())..]
            .chars()
            .next()
            .unwrap_or(chars::EOF)
    }

    pub fn offset(&self) -> usize {
        self.state.offset
    }

    pub fn at_end(&self) -> bool {
        self.state.offset >= self.source.len()
    }

    pub fn advance(&mut self) {
        if self.state.offset < self.source.len() {
            self.state.offset += self.state.peek.len_utf8();
            self.update_peek();
        }
    }

    fn update_peek(&mut self) {
        self.state.peek = self.source[self.state.offset..]
            .chars()
            .next()
            .unwrap_or(chars::EOF);
    }
}
