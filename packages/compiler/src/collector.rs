//! Argument Collector
//!
//! Walks a parsed message once and records, for every argument or tag name,
//! each usage kind it appears under. The map's insertion order is
//! first-encounter order and doubles as the compiled argument index space.

use bitflags::bitflags;
use indexmap::IndexMap;

use crate::message_parser::ast::{MessageNode, PluralType};

bitflags! {
    /// Usage kinds an argument name was seen under across a message.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct UsageSet: u16 {
        /// Bare `{name}` interpolation, the weakest usage.
        const ARGUMENT = 1 << 0;
        const TAG = 1 << 1;
        const SELECT = 1 << 2;
        const SELECTORDINAL = 1 << 3;
        const NUMBER = 1 << 4;
        /// `{name, number, style}` — a custom skeleton must be carried.
        const NUMBER_FMT = 1 << 5;
        const DATE = 1 << 6;
        const TIME = 1 << 7;
        const PLURAL = 1 << 8;
    }
}

impl UsageSet {
    /// The single usage kind that represents this set for type generation.
    ///
    /// Fixed priority, independent of encounter order: TAG, PLURAL,
    /// SELECTORDINAL, SELECT, NUMBER_FMT, NUMBER, DATE, TIME, ARGUMENT.
    pub fn representative(self) -> UsageSet {
        const PRIORITY: &[UsageSet] = &[
            UsageSet::TAG,
            UsageSet::PLURAL,
            UsageSet::SELECTORDINAL,
            UsageSet::SELECT,
            UsageSet::NUMBER_FMT,
            UsageSet::NUMBER,
            UsageSet::DATE,
            UsageSet::TIME,
            UsageSet::ARGUMENT,
        ];
        for &kind in PRIORITY {
            if self.contains(kind) {
                return kind;
            }
        }
        UsageSet::ARGUMENT
    }
}

/// Argument name to usage kinds, in first-encounter order.
pub type ArgumentUsages = IndexMap<String, UsageSet>;

/// Collect every argument and tag name referenced by `nodes`.
pub fn collect_arguments(nodes: &[MessageNode]) -> ArgumentUsages {
    let mut args = ArgumentUsages::new();
    for node in nodes {
        collect_node(node, &mut args);
    }
    args
}

fn record(args: &mut ArgumentUsages, name: &str, usage: UsageSet) {
    *args
        .entry(name.to_string())
        .or_insert_with(UsageSet::empty) |= usage;
}

fn collect_node(node: &MessageNode, args: &mut ArgumentUsages) {
    match node {
        // `#` resolves structurally at runtime, it is not an argument
        MessageNode::Literal(_) | MessageNode::Pound => {}
        MessageNode::Argument(name) => record(args, name, UsageSet::ARGUMENT),
        MessageNode::Number { name, style } => {
            let usage = if style.is_none() {
                UsageSet::NUMBER
            } else {
                UsageSet::NUMBER_FMT
            };
            record(args, name, usage);
        }
        MessageNode::Date { name, .. } => record(args, name, UsageSet::DATE),
        MessageNode::Time { name, .. } => record(args, name, UsageSet::TIME),
        MessageNode::Tag { name, children } => {
            record(args, name, UsageSet::TAG);
            for child in children {
                collect_node(child, args);
            }
        }
        MessageNode::Plural {
            name,
            plural_type,
            options,
            ..
        } => {
            let usage = match plural_type {
                PluralType::Cardinal => UsageSet::PLURAL,
                PluralType::Ordinal => UsageSet::SELECTORDINAL,
            };
            record(args, name, usage);
            for body in options.values() {
                for child in body {
                    collect_node(child, args);
                }
            }
        }
        MessageNode::Select { name, options } => {
            record(args, name, UsageSet::SELECT);
            for body in options.values() {
                for child in body {
                    collect_node(child, args);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message_parser::parse;

    fn collect(source: &str) -> ArgumentUsages {
        let result = parse(source);
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        collect_arguments(&result.nodes)
    }

    #[test]
    fn deduplicates_in_first_encounter_order() {
        let args = collect("{b} and {a} and {b}");
        assert_eq!(args.keys().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn merges_usages_for_the_same_name() {
        let args = collect("{count, plural, other {#}} of {count}");
        assert_eq!(args["count"], UsageSet::PLURAL | UsageSet::ARGUMENT);
    }

    #[test]
    fn styled_number_is_a_distinct_usage() {
        let args = collect("{a, number} {b, number, ::percent}");
        assert_eq!(args["a"], UsageSet::NUMBER);
        assert_eq!(args["b"], UsageSet::NUMBER_FMT);
    }

    #[test]
    fn tag_children_are_collected() {
        let args = collect("<b>{x}</b>");
        assert_eq!(args.keys().collect::<Vec<_>>(), vec!["b", "x"]);
        assert_eq!(args["b"], UsageSet::TAG);
        assert_eq!(args["x"], UsageSet::ARGUMENT);
    }

    #[test]
    fn representative_uses_fixed_priority() {
        assert_eq!(
            (UsageSet::PLURAL | UsageSet::SELECT).representative(),
            UsageSet::PLURAL
        );
        assert_eq!(
            (UsageSet::ARGUMENT | UsageSet::TIME).representative(),
            UsageSet::TIME
        );
        assert_eq!(UsageSet::empty().representative(), UsageSet::ARGUMENT);
    }
}
