//! Message Compiler
//!
//! Compiles ICU MessageFormat text into the compact positional-array
//! artifact, and optionally compiles legacy `[0]`-style interpolated text
//! into the same shape so the runtime never has to care which compiler
//! produced a payload.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::collector::{collect_arguments, ArgumentUsages, UsageSet};
use crate::compiled::{BranchKind, CompiledCases, CompiledMessage, CompiledNode};
use crate::message_parser::ast::{CaseOptions, MessageNode, PluralType};
use crate::message_parser::parse;
use crate::parse_util::ParseError;

lazy_static! {
    static ref INTERPOLATION: Regex = Regex::new(r"\[(\d+)\]").unwrap();
}

/// Options for a single compile call.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    /// Allow string interpolations like `"Hello [0]!"`. Only applies when
    /// the source contains no ICU syntax at all.
    pub allow_string_interpolation: bool,
}

/// Errors produced by `compile`.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("syntax error: {}", format_parse_errors(.0))]
    Syntax(Vec<ParseError>),
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(ParseError::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A compiled message together with its argument usage record.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTranslation {
    pub args: ArgumentUsages,
    pub message: CompiledMessage,
}

/// Compile an ICU message to its JSON artifact, discarding usage data.
pub fn compile_to_json(
    source: &str,
    options: CompileOptions,
) -> Result<CompiledMessage, CompileError> {
    compile(source, options).map(|translation| translation.message)
}

/// Compile an ICU message.
pub fn compile(
    source: &str,
    options: CompileOptions,
) -> Result<CompiledTranslation, CompileError> {
    let result = parse(source);
    if !result.is_ok() {
        return Err(CompileError::Syntax(result.errors));
    }
    let args = collect_arguments(&result.nodes);
    let nodes = compile_nodes(&result.nodes, &args);
    // pure text is stored without the array wrapper to shave the surrounding
    // brackets off the payload
    let message = match nodes.as_slice() {
        [] => CompiledMessage::Text(String::new()),
        [CompiledNode::Text(text)] => CompiledMessage::Text(text.clone()),
        _ => CompiledMessage::Message {
            args: args.keys().cloned().collect(),
            nodes,
        },
    };
    // the ICU grammar never produces `[0]` placeholders, so interpolated
    // legacy content always surfaces here as pure text
    if options.allow_string_interpolation {
        if let CompiledMessage::Text(text) = &message {
            return Ok(compile_string_interpolation(text));
        }
    }
    Ok(CompiledTranslation { args, message })
}

fn compile_nodes(nodes: &[MessageNode], args: &ArgumentUsages) -> Vec<CompiledNode> {
    nodes.iter().map(|node| compile_node(node, args)).collect()
}

fn compile_node(node: &MessageNode, args: &ArgumentUsages) -> CompiledNode {
    match node {
        MessageNode::Literal(text) => CompiledNode::Text(text.clone()),
        MessageNode::Argument(name) => CompiledNode::Arg(arg_index(args, name)),
        MessageNode::Pound => CompiledNode::Pound,
        MessageNode::Plural {
            name,
            plural_type,
            options,
            ..
        } => CompiledNode::Branch {
            kind: match plural_type {
                PluralType::Cardinal => BranchKind::Plural,
                PluralType::Ordinal => BranchKind::Selectordinal,
            },
            arg: arg_index(args, name),
            cases: compile_cases(options, args),
        },
        MessageNode::Select { name, options } => CompiledNode::Branch {
            kind: BranchKind::Select,
            arg: arg_index(args, name),
            cases: compile_cases(options, args),
        },
        MessageNode::Tag { name, children } => CompiledNode::Tag {
            arg: arg_index(args, name),
            children: compile_nodes(children, args),
        },
        MessageNode::Number { name, style } => match style {
            None => CompiledNode::Fn {
                arg: arg_index(args, name),
                name: "number".to_string(),
                style: None,
            },
            Some(style) => CompiledNode::Fn {
                arg: arg_index(args, name),
                name: "numberFmt".to_string(),
                style: Some(number_format(style)),
            },
        },
        MessageNode::Date { name, style } => CompiledNode::Fn {
            arg: arg_index(args, name),
            name: "date".to_string(),
            style: style.clone(),
        },
        MessageNode::Time { name, style } => CompiledNode::Fn {
            arg: arg_index(args, name),
            name: "time".to_string(),
            style: style.clone(),
        },
    }
}

fn compile_cases(options: &CaseOptions, args: &ArgumentUsages) -> CompiledCases {
    options
        .iter()
        .map(|(label, body)| {
            // `=12` and `12` key the same runtime lookup
            let trimmed = label.trim_start();
            let key = match trimmed.strip_prefix('=') {
                Some(exact) => exact.to_string(),
                None => label.clone(),
            };
            (key, compile_nodes(body, args))
        })
        .collect()
}

fn arg_index(args: &ArgumentUsages, name: &str) -> usize {
    args.get_index_of(name)
        .expect("argument list is collected from the same AST")
}

fn number_format(style: &str) -> String {
    if style == "%" {
        "percent".to_string()
    } else {
        style.to_string()
    }
}

/// Compile `"Hello [0]!"` style interpolations to the same artifact shape.
fn compile_string_interpolation(text: &str) -> CompiledTranslation {
    let mut arg_list: Vec<String> = Vec::new();
    let mut nodes: Vec<CompiledNode> = Vec::new();
    let mut last = 0;
    for caps in INTERPOLATION.captures_iter(text) {
        let matched = caps.get(0).expect("whole match");
        let index_text = &caps[1];
        if matched.start() > last {
            nodes.push(CompiledNode::Text(text[last..matched.start()].to_string()));
        }
        let position = arg_list
            .iter()
            .position(|existing| existing == index_text)
            .unwrap_or_else(|| {
                arg_list.push(index_text.to_string());
                arg_list.len() - 1
            });
        nodes.push(CompiledNode::Arg(position));
        last = matched.end();
    }
    if arg_list.is_empty() {
        return CompiledTranslation {
            args: ArgumentUsages::new(),
            message: CompiledMessage::Text(text.to_string()),
        };
    }
    if last < text.len() {
        nodes.push(CompiledNode::Text(text[last..].to_string()));
    }
    let args = arg_list
        .iter()
        .map(|name| (name.clone(), UsageSet::ARGUMENT))
        .collect();
    CompiledTranslation {
        args,
        message: CompiledMessage::Message {
            args: arg_list,
            nodes,
        },
    }
}
