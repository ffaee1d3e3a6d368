//! Recursive descent parser for ICU MessageFormat text.
//!
//! Handles argument interpolations, number/date/time functions, plural,
//! selectordinal and select expansion forms, `#` inside expansion cases,
//! rich-text tags and ICU apostrophe quoting.

use super::ast::{CaseOptions, MessageNode, PluralType};
use super::cursor::CharacterCursor;
use crate::chars;
use crate::parse_util::{ParseError, ParseSpan};

/// Parse result: the nodes that could be parsed plus all syntax errors.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub nodes: Vec<MessageNode>,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse an ICU message into its AST.
pub fn parse(source: &str) -> ParseResult {
    let mut parser = MessageParser::new(source);
    let nodes = parser.parse_nodes(false, Stops::NONE);
    ParseResult {
        nodes,
        errors: parser.errors,
    }
}

/// Characters that terminate the current node sequence.
#[derive(Debug, Clone, Copy)]
struct Stops {
    rbrace: bool,
    close_tag: bool,
}

impl Stops {
    const NONE: Stops = Stops {
        rbrace: false,
        close_tag: false,
    };
    const RBRACE: Stops = Stops {
        rbrace: true,
        close_tag: false,
    };
    const CLOSE_TAG: Stops = Stops {
        rbrace: false,
        close_tag: true,
    };
}

struct MessageParser<'a> {
    cursor: CharacterCursor<'a>,
    errors: Vec<ParseError>,
}

impl<'a> MessageParser<'a> {
    fn new(source: &'a str) -> Self {
        MessageParser {
            cursor: CharacterCursor::new(source),
            errors: Vec::new(),
        }
    }

    fn parse_nodes(&mut self, in_plural: bool, stops: Stops) -> Vec<MessageNode> {
        let mut nodes = Vec::new();
        loop {
            let c = self.cursor.peek();
            if self.cursor.at_end() {
                break;
            }
            if c == chars::RBRACE && stops.rbrace {
                break;
            }
            if c == chars::LT && self.cursor.peek_second() == chars::SLASH {
                if stops.close_tag {
                    break;
                }
                let start = self.cursor.offset();
                self.cursor.advance();
                self.cursor.advance();
                self.error("unexpected closing tag", start);
                continue;
            }
            if c == chars::LBRACE {
                if let Some(node) = self.parse_placeable(in_plural) {
                    nodes.push(node);
                }
                continue;
            }
            if c == chars::LT && chars::is_ascii_letter(self.cursor.peek_second()) {
                if let Some(node) = self.parse_tag(in_plural) {
                    nodes.push(node);
                }
                continue;
            }
            if c == chars::HASH && in_plural {
                self.cursor.advance();
                nodes.push(MessageNode::Pound);
                continue;
            }
            let text = self.parse_text(in_plural, stops);
            if !text.is_empty() {
                nodes.push(MessageNode::Literal(text));
            }
        }
        nodes
    }

    /// Consume a literal text run, applying ICU apostrophe quoting.
    fn parse_text(&mut self, in_plural: bool, stops: Stops) -> String {
        let mut text = String::new();
        loop {
            let c = self.cursor.peek();
            if self.cursor.at_end() {
                break;
            }
            if c == chars::LBRACE {
                break;
            }
            if c == chars::RBRACE && stops.rbrace {
                break;
            }
            if c == chars::LT {
                let second = self.cursor.peek_second();
                if chars::is_ascii_letter(second) || second == chars::SLASH {
                    break;
                }
            }
            if c == chars::HASH && in_plural {
                break;
            }
            if c == chars::SQ {
                self.consume_quoted(&mut text);
                continue;
            }
            text.push(c);
            self.cursor.advance();
        }
        text
    }

    /// Cursor is on an apostrophe. `''` is a literal apostrophe; an
    /// apostrophe before a syntax character opens a quoted run ending at the
    /// next lone apostrophe (or end of input); anything else is literal.
    fn consume_quoted(&mut self, text: &mut String) {
        let second = self.cursor.peek_second();
        if second == chars::SQ {
            text.push(chars::SQ);
            self.cursor.advance();
            self.cursor.advance();
            return;
        }
        let quotable = matches!(
            second,
            chars::LBRACE | chars::RBRACE | chars::LT | chars::HASH
        );
        if !quotable {
            text.push(chars::SQ);
            self.cursor.advance();
            return;
        }
        self.cursor.advance();
        loop {
            let c = self.cursor.peek();
            if self.cursor.at_end() {
                break;
            }
            if c == chars::SQ {
                if self.cursor.peek_second() == chars::SQ {
                    text.push(chars::SQ);
                    self.cursor.advance();
                    self.cursor.advance();
                    continue;
                }
                self.cursor.advance();
                break;
            }
            text.push(c);
            self.cursor.advance();
        }
    }

    /// Cursor is on `{`.
    fn parse_placeable(&mut self, in_plural: bool) -> Option<MessageNode> {
        let start = self.cursor.offset();
        self.cursor.advance();
        self.skip_whitespace();
        let name = self.consume_token();
        if name.is_empty() {
            self.error("expected an argument name", start);
            return self.recover();
        }
        self.skip_whitespace();
        match self.cursor.peek() {
            chars::RBRACE => {
                self.cursor.advance();
                Some(MessageNode::Argument(name))
            }
            chars::COMMA => {
                self.cursor.advance();
                self.skip_whitespace();
                let keyword_start = self.cursor.offset();
                let keyword = self.consume_token();
                self.skip_whitespace();
                match keyword.as_str() {
                    "number" => {
                        let style = self.parse_style(start)?;
                        Some(MessageNode::Number { name, style })
                    }
                    "date" => {
                        let style = self.parse_style(start)?;
                        Some(MessageNode::Date { name, style })
                    }
                    "time" => {
                        let style = self.parse_style(start)?;
                        Some(MessageNode::Time { name, style })
                    }
                    "plural" | "selectordinal" | "select" => {
                        self.parse_options(name, &keyword, start, in_plural)
                    }
                    _ => {
                        self.error(
                            format!("invalid argument type `{}`", keyword),
                            keyword_start,
                        );
                        self.recover()
                    }
                }
            }
            _ => {
                self.error("expected `,` or `}`", self.cursor.offset());
                self.recover()
            }
        }
    }

    /// Optional `, style` followed by the closing brace of a number, date or
    /// time argument. Returns `None` when a syntax error was recorded.
    #[allow(clippy::option_option)]
    fn parse_style(&mut self, start: usize) -> Option<Option<String>> {
        match self.cursor.peek() {
            chars::RBRACE => {
                self.cursor.advance();
                Some(None)
            }
            chars::COMMA => {
                self.cursor.advance();
                let mut style = String::new();
                loop {
                    let c = self.cursor.peek();
                    if self.cursor.at_end() {
                        self.error("unterminated argument", start);
                        return None;
                    }
                    if c == chars::RBRACE {
                        self.cursor.advance();
                        break;
                    }
                    style.push(c);
                    self.cursor.advance();
                }
                let style = style.trim();
                Some(if style.is_empty() {
                    None
                } else {
                    Some(style.to_string())
                })
            }
            _ => {
                self.error("expected `,` or `}`", self.cursor.offset());
                self.recover();
                None
            }
        }
    }

    /// Case list of a plural, selectordinal or select argument. The cursor
    /// sits after the keyword; the leading comma is still pending.
    fn parse_options(
        &mut self,
        name: String,
        keyword: &str,
        start: usize,
        in_plural: bool,
    ) -> Option<MessageNode> {
        if self.cursor.peek() != chars::COMMA {
            self.error(
                format!("expected cases for `{}`", keyword),
                self.cursor.offset(),
            );
            return self.recover();
        }
        self.cursor.advance();
        let is_select = keyword == "select";
        // `#` inside a select nested in a plural still refers to the outer
        // plural value
        let case_in_plural = if is_select { in_plural } else { true };
        let mut offset = None;
        let mut options = CaseOptions::default();
        loop {
            self.skip_whitespace();
            if self.cursor.at_end() {
                self.error(format!("unterminated `{}` argument", keyword), start);
                return None;
            }
            if self.cursor.peek() == chars::RBRACE {
                self.cursor.advance();
                break;
            }
            let label_start = self.cursor.offset();
            let label = self.consume_token();
            if label.is_empty() {
                self.error("expected a case label", label_start);
                return self.recover();
            }
            if !is_select && options.is_empty() && offset.is_none() {
                if let Some(parsed) = self.try_parse_offset(&label, label_start) {
                    match parsed {
                        Some(n) => {
                            offset = Some(n);
                            continue;
                        }
                        None => return self.recover(),
                    }
                }
            }
            self.skip_whitespace();
            if self.cursor.peek() != chars::LBRACE {
                self.error(
                    format!("expected `{{` after case label `{}`", label),
                    self.cursor.offset(),
                );
                return self.recover();
            }
            self.cursor.advance();
            let body = self.parse_nodes(case_in_plural, Stops::RBRACE);
            if self.cursor.at_end() {
                self.error(format!("unterminated case `{}`", label), label_start);
                return None;
            }
            self.cursor.advance();
            if options.insert(label.clone(), body).is_some() {
                self.error(format!("duplicate case label `{}`", label), label_start);
            }
        }
        if options.is_empty() {
            self.error(format!("`{}` requires at least one case", keyword), start);
            return None;
        }
        Some(match keyword {
            "select" => MessageNode::Select { name, options },
            "selectordinal" => MessageNode::Plural {
                name,
                plural_type: PluralType::Ordinal,
                offset,
                options,
            },
            _ => MessageNode::Plural {
                name,
                plural_type: PluralType::Cardinal,
                offset,
                options,
            },
        })
    }

    /// `offset:N` before the first plural case. Returns `None` when the
    /// token is not an offset at all, `Some(None)` when it is a malformed
    /// one (error recorded), `Some(Some(n))` otherwise.
    #[allow(clippy::option_option)]
    fn try_parse_offset(&mut self, label: &str, label_start: usize) -> Option<Option<u32>> {
        let digits = if let Some(rest) = label.strip_prefix("offset:") {
            if rest.is_empty() {
                // `offset:` with the number after whitespace
                self.skip_whitespace();
                self.consume_token()
            } else {
                rest.to_string()
            }
        } else {
            return None;
        };
        match digits.parse::<u32>() {
            Ok(n) => Some(Some(n)),
            Err(_) => {
                self.error(format!("invalid offset `{}`", digits), label_start);
                Some(None)
            }
        }
    }

    /// Cursor is on `<` followed by an ASCII letter.
    fn parse_tag(&mut self, in_plural: bool) -> Option<MessageNode> {
        let start = self.cursor.offset();
        self.cursor.advance();
        let name = self.consume_tag_name();
        if self.cursor.peek() == chars::SLASH && self.cursor.peek_second() == chars::GT {
            self.cursor.advance();
            self.cursor.advance();
            return Some(MessageNode::Tag {
                name,
                children: Vec::new(),
            });
        }
        if self.cursor.peek() != chars::GT {
            self.error(
                format!("expected `>` after `<{}`", name),
                self.cursor.offset(),
            );
            return self.recover_tag();
        }
        self.cursor.advance();
        let children = self.parse_nodes(in_plural, Stops::CLOSE_TAG);
        if self.cursor.at_end() {
            self.error(format!("unterminated tag `<{}>`", name), start);
            return None;
        }
        // cursor is on `</`
        self.cursor.advance();
        self.cursor.advance();
        let close_start = self.cursor.offset();
        let close_name = self.consume_tag_name();
        if self.cursor.peek() == chars::GT {
            self.cursor.advance();
        } else {
            self.error(
                format!("expected `>` after `</{}`", close_name),
                self.cursor.offset(),
            );
        }
        if close_name != name {
            self.error(
                format!(
                    "mismatched closing tag `</{}>`, expected `</{}>`",
                    close_name, name
                ),
                close_start,
            );
        }
        Some(MessageNode::Tag { name, children })
    }

    fn consume_tag_name(&mut self) -> String {
        let mut name = String::new();
        loop {
            let c = self.cursor.peek();
            if chars::is_ascii_letter(c)
                || chars::is_digit(c)
                || c == '-'
                || c == '_'
            {
                name.push(c);
                self.cursor.advance();
            } else {
                break;
            }
        }
        name
    }

    /// An argument name, keyword or case label. Stops at whitespace, braces
    /// and commas; `=12` and `offset:1` stay single tokens.
    fn consume_token(&mut self) -> String {
        let mut token = String::new();
        loop {
            let c = self.cursor.peek();
            if self.cursor.at_end()
                || chars::is_whitespace(c)
                || matches!(c, chars::LBRACE | chars::RBRACE | chars::COMMA)
            {
                break;
            }
            token.push(c);
            self.cursor.advance();
        }
        token
    }

    fn skip_whitespace(&mut self) {
        while chars::is_whitespace(self.cursor.peek()) && !self.cursor.at_end() {
            self.cursor.advance();
        }
    }

    fn error(&mut self, msg: impl Into<String>, start: usize) {
        let end = self.cursor.offset().max(start);
        self.errors.push(ParseError::new(msg, ParseSpan::new(start, end)));
    }

    /// Skip to the closing brace of the placeable being parsed, balancing
    /// nested braces. Used after recording a syntax error.
    fn recover(&mut self) -> Option<MessageNode> {
        let mut depth = 1usize;
        while !self.cursor.at_end() && depth > 0 {
            match self.cursor.peek() {
                chars::LBRACE => depth += 1,
                chars::RBRACE => depth -= 1,
                _ => {}
            }
            self.cursor.advance();
        }
        None
    }

    /// Skip to the end of a malformed open tag.
    fn recover_tag(&mut self) -> Option<MessageNode> {
        while !self.cursor.at_end() && self.cursor.peek() != chars::GT {
            self.cursor.advance();
        }
        if self.cursor.peek() == chars::GT {
            self.cursor.advance();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> Vec<MessageNode> {
        let result = parse(source);
        assert!(
            result.errors.is_empty(),
            "unexpected errors for {:?}: {:?}",
            source,
            result.errors
        );
        result.nodes
    }

    #[test]
    fn parses_plain_text() {
        assert_eq!(
            parse_ok("Hello world"),
            vec![MessageNode::Literal("Hello world".to_string())]
        );
    }

    #[test]
    fn parses_arguments() {
        assert_eq!(
            parse_ok("Hello {name}!"),
            vec![
                MessageNode::Literal("Hello ".to_string()),
                MessageNode::Argument("name".to_string()),
                MessageNode::Literal("!".to_string()),
            ]
        );
    }

    #[test]
    fn parses_functions_with_styles() {
        assert_eq!(
            parse_ok("{T, time} and {n, number, ::percent}"),
            vec![
                MessageNode::Time {
                    name: "T".to_string(),
                    style: None
                },
                MessageNode::Literal(" and ".to_string()),
                MessageNode::Number {
                    name: "n".to_string(),
                    style: Some("::percent".to_string())
                },
            ]
        );
    }

    #[test]
    fn parses_plural_with_pound() {
        let nodes = parse_ok("{count, plural, one {# Bild} other {# Bilder}}");
        match &nodes[0] {
            MessageNode::Plural {
                name,
                plural_type,
                offset,
                options,
            } => {
                assert_eq!(name, "count");
                assert_eq!(*plural_type, PluralType::Cardinal);
                assert_eq!(*offset, None);
                assert_eq!(
                    options.keys().collect::<Vec<_>>(),
                    vec!["one", "other"]
                );
                assert_eq!(
                    options["one"],
                    vec![
                        MessageNode::Pound,
                        MessageNode::Literal(" Bild".to_string())
                    ]
                );
            }
            other => panic!("expected plural, got {:?}", other),
        }
    }

    #[test]
    fn parses_exact_match_labels() {
        let nodes = parse_ok("{count, plural, =0 {none} other {#}}");
        match &nodes[0] {
            MessageNode::Plural { options, .. } => {
                assert_eq!(options.keys().collect::<Vec<_>>(), vec!["=0", "other"]);
            }
            other => panic!("expected plural, got {:?}", other),
        }
    }

    #[test]
    fn parses_offset() {
        let nodes = parse_ok("{count, plural, offset:1 one {#} other {#}}");
        match &nodes[0] {
            MessageNode::Plural { offset, .. } => assert_eq!(*offset, Some(1)),
            other => panic!("expected plural, got {:?}", other),
        }
    }

    #[test]
    fn pound_outside_plural_is_text() {
        assert_eq!(
            parse_ok("#1 fan"),
            vec![MessageNode::Literal("#1 fan".to_string())]
        );
    }

    #[test]
    fn pound_inside_select_keeps_outer_plural_context() {
        let nodes = parse_ok("{n, plural, other {{g, select, other {#}}}}");
        match &nodes[0] {
            MessageNode::Plural { options, .. } => match &options["other"][0] {
                MessageNode::Select { options, .. } => {
                    assert_eq!(options["other"], vec![MessageNode::Pound]);
                }
                other => panic!("expected select, got {:?}", other),
            },
            other => panic!("expected plural, got {:?}", other),
        }
    }

    #[test]
    fn parses_tags() {
        assert_eq!(
            parse_ok("<b>{x}</b>"),
            vec![MessageNode::Tag {
                name: "b".to_string(),
                children: vec![MessageNode::Argument("x".to_string())],
            }]
        );
    }

    #[test]
    fn lone_angle_bracket_is_text() {
        assert_eq!(
            parse_ok("1 < 2"),
            vec![MessageNode::Literal("1 < 2".to_string())]
        );
    }

    #[test]
    fn apostrophe_quoting() {
        assert_eq!(
            parse_ok("It''s '{'quoted'}'"),
            vec![MessageNode::Literal("It's {quoted}".to_string())]
        );
    }

    #[test]
    fn plain_apostrophe_is_literal() {
        assert_eq!(
            parse_ok("l'heure"),
            vec![MessageNode::Literal("l'heure".to_string())]
        );
    }

    #[test]
    fn unterminated_argument_is_an_error() {
        assert!(!parse("Hello {name").is_ok());
    }

    #[test]
    fn mismatched_tag_is_an_error() {
        assert!(!parse("<b>hi</i>").is_ok());
    }

    #[test]
    fn unknown_argument_type_is_an_error() {
        assert!(!parse("{n, spellout}").is_ok());
    }

    #[test]
    fn duplicate_case_is_an_error() {
        assert!(!parse("{n, plural, one {a} one {b} other {c}}").is_ok());
    }
}
