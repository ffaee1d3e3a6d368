//! Character constants used throughout the compiler
#![allow(non_upper_case_globals)]

// Special characters
pub const EOF: char = '\0';
pub const TAB: char = '\t';
pub const LF: char = '\n';
pub const CR: char = '\r';
pub const SPACE: char = ' ';

// Punctuation
pub const HASH: char = '#';
pub const SQ: char = '\'';
pub const COMMA: char = ',';
pub const COLON: char = ':';
pub const SLASH: char = '/';
pub const LT: char = '<';
pub const EQ: char = '=';
pub const GT: char = '>';

// Brackets and braces
pub const LBRACE: char = '{';
pub const RBRACE: char = '}';

pub fn is_whitespace(code: char) -> bool {
    matches!(code, TAB | LF | CR | SPACE) || code == '\u{00A0}'
}

pub fn is_ascii_letter(code: char) -> bool {
    code.is_ascii_alphabetic()
}

pub fn is_digit(code: char) -> bool {
    code.is_ascii_digit()
}
