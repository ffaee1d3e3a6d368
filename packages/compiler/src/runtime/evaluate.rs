//! Runtime Evaluator
//!
//! Walks a compiled message against a locale, an argument map and a set of
//! formatter callbacks. Evaluation is a pure recursive function of its
//! inputs; the only shared state is the plural-rules cache inside the
//! resolver carried by `Formatters`.

use std::fmt;

use smallvec::SmallVec;
use thiserror::Error;

use crate::compiled::{BranchKind, CompiledCases, CompiledMessage, CompiledNode};
use crate::runtime::formatters::{plain_number, Argument, Arguments, Formatters, Fragment};
use crate::runtime::plural::PluralRuleKind;

/// Errors produced while evaluating a compiled message.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("missing argument `{name}`")]
    MissingArgument { name: String },
    #[error("argument index {index} is out of range for this message")]
    BadArgumentIndex { index: usize },
    #[error("no case matched `{tried}` for `{name}` and there is no `other` case")]
    MissingBranch { name: String, tried: String },
    #[error("`{name}` selects a plural case but is not a number")]
    ExpectedNumber { name: String },
    #[error("no formatter registered for `{name}`")]
    MissingFormatter { name: String },
    #[error("expected a tag renderer for `{name}`")]
    TagNotRenderable { name: String },
    #[error("the tag renderer `{name}` cannot be interpolated as a value")]
    TagInterpolation { name: String },
}

/// Evaluate a compiled message to a fragment sequence.
///
/// All-textual content reduces to a single `Text` fragment; rich values stay
/// discrete entries so callers can splice them into component trees.
pub fn evaluate_ast<T: Clone + 'static>(
    message: &CompiledMessage,
    locale: &str,
    args: &Arguments<T>,
    formatters: &Formatters<T>,
) -> Result<Vec<Fragment<T>>, RuntimeError> {
    match message {
        // pure text needs no substitution at all
        CompiledMessage::Text(text) => Ok(vec![Fragment::Text(text.clone())]),
        CompiledMessage::Message { args: names, nodes } => {
            let evaluator = Evaluator {
                names,
                locale,
                args,
                formatters,
            };
            let mut out = Buffer::new();
            for node in nodes {
                evaluator.node(node, 0.0, &mut out)?;
            }
            Ok(reduce_fragments(out.into_vec()))
        }
    }
}

/// Evaluate a compiled message and concatenate the fragments to a string.
pub fn run<T: Clone + fmt::Display + 'static>(
    message: &CompiledMessage,
    locale: &str,
    args: &Arguments<T>,
    formatters: &Formatters<T>,
) -> Result<String, RuntimeError> {
    let fragments = evaluate_ast(message, locale, args, formatters)?;
    Ok(fragments
        .iter()
        .map(|fragment| fragment.to_string())
        .collect())
}

type Buffer<T> = SmallVec<[Fragment<T>; 8]>;

struct Evaluator<'a, T> {
    names: &'a [String],
    locale: &'a str,
    args: &'a Arguments<T>,
    formatters: &'a Formatters<T>,
}

impl<T: Clone + 'static> Evaluator<'_, T> {
    fn name(&self, index: usize) -> Result<&str, RuntimeError> {
        self.names
            .get(index)
            .map(String::as_str)
            .ok_or(RuntimeError::BadArgumentIndex { index })
    }

    fn argument(&self, index: usize) -> Result<(&str, &Argument<T>), RuntimeError> {
        let name = self.name(index)?;
        let value = self
            .args
            .get(name)
            .ok_or_else(|| RuntimeError::MissingArgument {
                name: name.to_string(),
            })?;
        Ok((name, value))
    }

    fn node(
        &self,
        node: &CompiledNode,
        ordinal: f64,
        out: &mut Buffer<T>,
    ) -> Result<(), RuntimeError> {
        match node {
            CompiledNode::Text(text) => out.push(Fragment::Text(text.clone())),
            CompiledNode::Pound => {
                out.push(self.formatters.format_pound(ordinal, self.locale));
            }
            CompiledNode::Arg(index) => {
                let (name, value) = self.argument(*index)?;
                out.push(match value {
                    Argument::Str(text) => Fragment::Text(text.clone()),
                    Argument::Num(value) => Fragment::Num(*value),
                    Argument::Value(value) => Fragment::Value(value.clone()),
                    Argument::Tag(_) => {
                        return Err(RuntimeError::TagInterpolation {
                            name: name.to_string(),
                        })
                    }
                });
            }
            CompiledNode::Branch { kind, arg, cases } => {
                self.branch(*kind, *arg, cases, ordinal, out)?;
            }
            CompiledNode::Fn { arg, name, style } => {
                let (_, value) = self.argument(*arg)?;
                let formatter =
                    self.formatters
                        .get(name)
                        .ok_or_else(|| RuntimeError::MissingFormatter {
                            name: name.clone(),
                        })?;
                out.push(formatter(value, self.locale, style.as_deref()));
            }
            CompiledNode::Tag { arg, children } => {
                self.tag(*arg, children, ordinal, out)?;
            }
        }
        Ok(())
    }

    fn branch(
        &self,
        kind: BranchKind,
        arg: usize,
        cases: &CompiledCases,
        ordinal: f64,
        out: &mut Buffer<T>,
    ) -> Result<(), RuntimeError> {
        let (name, value) = self.argument(arg)?;
        let numeric = match value {
            Argument::Num(value) => Some(*value),
            _ => None,
        };
        // a plural sets the ordinal context for its subtree; a select keeps
        // the enclosing one, so `#` inside a nested select still refers to
        // the outer plural
        let next_ordinal = match kind {
            BranchKind::Select => ordinal,
            BranchKind::Plural | BranchKind::Selectordinal => numeric.unwrap_or(ordinal),
        };
        // exact matches first: `=0`-style labels are stored without the `=`
        let exact_key = match value {
            Argument::Str(text) => Some(text.clone()),
            Argument::Num(value) => Some(plain_number(*value)),
            _ => None,
        };
        if let Some(key) = &exact_key {
            if let Some(body) = cases.get(key.as_str()) {
                for node in body {
                    self.node(node, next_ordinal, out)?;
                }
                return Ok(());
            }
        }
        let body = match kind {
            // select has no plural-rule fallback, it is not numeric
            BranchKind::Select => {
                cases
                    .get("other")
                    .ok_or_else(|| RuntimeError::MissingBranch {
                        name: name.to_string(),
                        tried: exact_key.unwrap_or_default(),
                    })?
            }
            BranchKind::Plural | BranchKind::Selectordinal => {
                let value = numeric.ok_or_else(|| RuntimeError::ExpectedNumber {
                    name: name.to_string(),
                })?;
                let rule_kind = match kind {
                    BranchKind::Selectordinal => PluralRuleKind::Ordinal,
                    _ => PluralRuleKind::Cardinal,
                };
                let category =
                    self.formatters
                        .plurals()
                        .resolve_category(value, self.locale, rule_kind);
                cases
                    .get(category)
                    .or_else(|| cases.get("other"))
                    .ok_or_else(|| RuntimeError::MissingBranch {
                        name: name.to_string(),
                        tried: category.to_string(),
                    })?
            }
        };
        for node in body {
            self.node(node, next_ordinal, out)?;
        }
        Ok(())
    }

    fn tag(
        &self,
        arg: usize,
        children: &[CompiledNode],
        ordinal: f64,
        out: &mut Buffer<T>,
    ) -> Result<(), RuntimeError> {
        let name = self.name(arg)?;
        let mut resolved = Buffer::new();
        for child in children {
            self.node(child, ordinal, &mut resolved)?;
        }
        let resolved = reduce_fragments(resolved.into_vec());
        let resolved = self.formatters.apply_tag_hook(resolved, self.locale);
        match self.args.get(name) {
            Some(Argument::Tag(renderer)) => out.extend(renderer(resolved)),
            Some(_) => {
                return Err(RuntimeError::TagNotRenderable {
                    name: name.to_string(),
                })
            }
            None => {
                // no renderer supplied: wrap the children in markers
                out.push(Fragment::Text(format!("<{}>", name)));
                out.extend(resolved);
                out.push(Fragment::Text(format!("</{}>", name)));
            }
        }
        Ok(())
    }
}

/// Collapse consecutive `Text`/`Num` fragments into single `Text` entries.
/// `Value` fragments break merging and pass through untouched.
pub fn reduce_fragments<T>(fragments: Vec<Fragment<T>>) -> Vec<Fragment<T>> {
    let mut reduced: Vec<Fragment<T>> = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        if textual(&fragment) {
            if let Some(last) = reduced.last_mut() {
                if textual(last) {
                    let mut text =
                        into_text(std::mem::replace(last, Fragment::Text(String::new())));
                    text.push_str(&into_text(fragment));
                    *last = Fragment::Text(text);
                    continue;
                }
            }
        }
        reduced.push(fragment);
    }
    reduced
}

fn textual<T>(fragment: &Fragment<T>) -> bool {
    matches!(fragment, Fragment::Text(_) | Fragment::Num(_))
}

fn into_text<T>(fragment: Fragment<T>) -> String {
    match fragment {
        Fragment::Text(text) => text,
        Fragment::Num(value) => plain_number(value),
        // guarded by `textual`
        Fragment::Value(_) => String::new(),
    }
}
