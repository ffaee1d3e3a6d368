//! Runtime Values and Formatters
//!
//! Argument values, output fragments and the formatter registry consumed by
//! the evaluator. The type parameter `T` is the caller's rich content type
//! (a UI node, an attributed span, anything); the core never inspects it and
//! hands it back unmodified.

use std::collections::HashMap;
use std::fmt;

use crate::runtime::plural::{CldrPluralResolver, PluralResolver};

/// One piece of evaluated output.
///
/// Adjacent `Text`/`Num` fragments are merged during evaluation; `Value`
/// fragments stay discrete so rich content survives untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment<T> {
    Text(String),
    Num(f64),
    Value(T),
}

impl<T: fmt::Display> fmt::Display for Fragment<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::Text(text) => f.write_str(text),
            Fragment::Num(value) => f.write_str(&plain_number(*value)),
            Fragment::Value(value) => value.fmt(f),
        }
    }
}

/// A renderer for a rich-text tag: receives the resolved children, returns
/// the fragments to splice into the output.
pub type TagRenderer<T> = Box<dyn Fn(Vec<Fragment<T>>) -> Vec<Fragment<T>> + Send + Sync>;

/// A runtime argument value.
pub enum Argument<T> {
    Str(String),
    Num(f64),
    /// Arbitrary rich content, passed through as-is.
    Value(T),
    /// A tag renderer; only meaningful under a tag name.
    Tag(TagRenderer<T>),
}

impl<T: fmt::Debug> fmt::Debug for Argument<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Str(value) => f.debug_tuple("Str").field(value).finish(),
            Argument::Num(value) => f.debug_tuple("Num").field(value).finish(),
            Argument::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Argument::Tag(_) => f.debug_tuple("Tag").finish(),
        }
    }
}

impl<T> From<&str> for Argument<T> {
    fn from(value: &str) -> Self {
        Argument::Str(value.to_string())
    }
}

impl<T> From<String> for Argument<T> {
    fn from(value: String) -> Self {
        Argument::Str(value)
    }
}

impl<T> From<f64> for Argument<T> {
    fn from(value: f64) -> Self {
        Argument::Num(value)
    }
}

impl<T> From<i64> for Argument<T> {
    fn from(value: i64) -> Self {
        Argument::Num(value as f64)
    }
}

impl<T> From<i32> for Argument<T> {
    fn from(value: i32) -> Self {
        Argument::Num(value as f64)
    }
}

impl<T> From<u32> for Argument<T> {
    fn from(value: u32) -> Self {
        Argument::Num(value as f64)
    }
}

/// The name-keyed argument map handed to the evaluator.
pub struct Arguments<T> {
    values: HashMap<String, Argument<T>>,
}

impl<T> Arguments<T> {
    pub fn new() -> Self {
        Arguments {
            values: HashMap::new(),
        }
    }

    /// Set a string or numeric argument.
    pub fn set(mut self, name: &str, value: impl Into<Argument<T>>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    /// Set a rich content argument.
    pub fn value(mut self, name: &str, value: T) -> Self {
        self.values.insert(name.to_string(), Argument::Value(value));
        self
    }

    /// Set a tag renderer.
    pub fn tag(
        mut self,
        name: &str,
        renderer: impl Fn(Vec<Fragment<T>>) -> Vec<Fragment<T>> + Send + Sync + 'static,
    ) -> Self {
        self.values
            .insert(name.to_string(), Argument::Tag(Box::new(renderer)));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Argument<T>> {
        self.values.get(name)
    }
}

impl<T> Default for Arguments<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A formatter callback: `(value, locale, style) -> fragment`.
pub type FormatterFn<T> = Box<dyn Fn(&Argument<T>, &str, Option<&str>) -> Fragment<T> + Send + Sync>;

/// Hook applied to a tag's resolved children before its renderer runs, so
/// consumers can merge or wrap children for their component framework.
pub type TagChildrenHook<T> = Box<dyn Fn(Vec<Fragment<T>>, &str) -> Vec<Fragment<T>> + Send + Sync>;

/// The formatter registry handed to the evaluator.
///
/// Only the plain `number` formatter is registered by default; `date`,
/// `time` and `numberFmt` are caller concerns. The plural resolver rides
/// along here so the whole capability set travels as one dependency.
pub struct Formatters<T> {
    fns: HashMap<String, FormatterFn<T>>,
    tag_hook: Option<TagChildrenHook<T>>,
    plurals: Box<dyn PluralResolver>,
}

impl<T: 'static> Formatters<T> {
    pub fn new() -> Self {
        let mut fns: HashMap<String, FormatterFn<T>> = HashMap::new();
        fns.insert("number".to_string(), Box::new(default_number::<T>));
        Formatters {
            fns,
            tag_hook: None,
            plurals: Box::new(CldrPluralResolver::new()),
        }
    }

    /// Register or replace a formatter.
    pub fn with_formatter(
        mut self,
        name: &str,
        formatter: impl Fn(&Argument<T>, &str, Option<&str>) -> Fragment<T> + Send + Sync + 'static,
    ) -> Self {
        self.fns.insert(name.to_string(), Box::new(formatter));
        self
    }

    /// Install the tag children preprocessing hook.
    pub fn with_tag_hook(
        mut self,
        hook: impl Fn(Vec<Fragment<T>>, &str) -> Vec<Fragment<T>> + Send + Sync + 'static,
    ) -> Self {
        self.tag_hook = Some(Box::new(hook));
        self
    }

    /// Substitute the plural resolver (and with it, the rules cache).
    pub fn with_plural_resolver(mut self, resolver: impl PluralResolver + 'static) -> Self {
        self.plurals = Box::new(resolver);
        self
    }

    pub(crate) fn get(&self, name: &str) -> Option<&FormatterFn<T>> {
        self.fns.get(name)
    }

    pub(crate) fn plurals(&self) -> &dyn PluralResolver {
        self.plurals.as_ref()
    }

    pub(crate) fn apply_tag_hook(
        &self,
        children: Vec<Fragment<T>>,
        locale: &str,
    ) -> Vec<Fragment<T>> {
        match &self.tag_hook {
            Some(hook) => hook(children, locale),
            None => children,
        }
    }

    /// Format the value of `#` through the registered `number` formatter.
    pub(crate) fn format_pound(&self, value: f64, locale: &str) -> Fragment<T> {
        match self.fns.get("number") {
            Some(number) => number(&Argument::Num(value), locale, None),
            None => Fragment::Num(value),
        }
    }
}

impl<T: 'static> Default for Formatters<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The built-in `number` formatter: shortest decimal text, no locale
/// digit grouping. Callers wanting grouped or styled output register their
/// own formatter over this name.
fn default_number<T>(value: &Argument<T>, _locale: &str, _style: Option<&str>) -> Fragment<T> {
    match value {
        Argument::Num(value) => Fragment::Text(plain_number(*value)),
        Argument::Str(value) => Fragment::Text(value.clone()),
        Argument::Value(_) | Argument::Tag(_) => Fragment::Text(String::new()),
    }
}

/// Shortest decimal representation; integral values print without a
/// fraction part.
pub(crate) fn plain_number(value: f64) -> String {
    value.to_string()
}
