//! Message AST
//!
//! The parsed representation of an ICU message. The node set is a closed
//! enum; every consumer matches exhaustively, so a new node kind cannot be
//! silently skipped anywhere downstream.

use indexmap::IndexMap;

/// Plural rule family of a `{name, plural, ...}` / `{name, selectordinal, ...}`
/// expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralType {
    Cardinal,
    Ordinal,
}

/// Case label to case body, in source order.
pub type CaseOptions = IndexMap<String, Vec<MessageNode>>;

#[derive(Debug, Clone, PartialEq)]
pub enum MessageNode {
    /// Plain text.
    Literal(String),
    /// `{name}` interpolation.
    Argument(String),
    /// `{name, number}` with an optional style or skeleton.
    Number {
        name: String,
        style: Option<String>,
    },
    /// `{name, date}` with an optional style.
    Date {
        name: String,
        style: Option<String>,
    },
    /// `{name, time}` with an optional style.
    Time {
        name: String,
        style: Option<String>,
    },
    /// `{name, plural, ...}` or `{name, selectordinal, ...}`.
    Plural {
        name: String,
        plural_type: PluralType,
        /// `offset:N` when present. Parsed for completeness; the compiled
        /// form does not carry it.
        offset: Option<u32>,
        options: CaseOptions,
    },
    /// `{name, select, ...}`.
    Select {
        name: String,
        options: CaseOptions,
    },
    /// `<name>...</name>` rich-text tag.
    Tag {
        name: String,
        children: Vec<MessageNode>,
    },
    /// `#` inside a plural or selectordinal case body.
    Pound,
}
