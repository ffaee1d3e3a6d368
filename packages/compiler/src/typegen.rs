//! Type Declaration Generator
//!
//! Derives a typed argument-shape declaration per message key across a whole
//! dictionary, emitted as a TypeScript module for JavaScript consumers of
//! the compiled artifacts.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::collector::UsageSet;
use crate::compiler::{compile, CompileError, CompileOptions};

/// A normalized dictionary: `{ language -> key -> message text }`.
pub type Dictionary = IndexMap<String, IndexMap<String, String>>;

/// Options for the declaration generator.
#[derive(Debug, Clone)]
pub struct TypegenOptions {
    /// Languages to expose in the `Language` union; defaults to the
    /// dictionary's own languages.
    pub languages: Option<Vec<String>>,
    /// Emit the formatters import and const.
    pub formatters: bool,
    /// Compile `[0]`-style interpolations.
    pub allow_string_interpolation: bool,
}

impl Default for TypegenOptions {
    fn default() -> Self {
        TypegenOptions {
            languages: None,
            formatters: true,
            allow_string_interpolation: false,
        }
    }
}

/// The TypeScript type for a representative usage kind.
fn ts_type(representative: UsageSet) -> &'static str {
    if representative == UsageSet::TAG {
        "TArgumentTagType"
    } else if representative == UsageSet::DATE || representative == UsageSet::TIME {
        "Date | number | string"
    } else if representative == UsageSet::SELECT {
        "number | string"
    } else if representative.intersects(
        UsageSet::PLURAL | UsageSet::SELECTORDINAL | UsageSet::NUMBER | UsageSet::NUMBER_FMT,
    ) {
        "number"
    } else {
        "TArgumentType"
    }
}

/// Generate the declaration module for a normalized dictionary.
///
/// Argument usages are unioned per key across all languages, then each
/// argument is typed by its representative usage kind (fixed priority, see
/// `UsageSet::representative`). Keys and arguments are emitted sorted so the
/// output is stable under dictionary reordering.
pub fn generate_dictionary_api(
    dictionary: &Dictionary,
    options: &TypegenOptions,
) -> Result<String, CompileError> {
    let compile_options = CompileOptions {
        allow_string_interpolation: options.allow_string_interpolation,
    };

    let mut all_usages = UsageSet::empty();
    let mut type_map: BTreeMap<String, BTreeMap<String, UsageSet>> = BTreeMap::new();

    for translations in dictionary.values() {
        for (key, text) in translations {
            let compiled = compile(text, compile_options)?;
            let key_args = type_map.entry(key.clone()).or_default();
            for (arg, usage) in &compiled.args {
                *key_args.entry(arg.clone()).or_insert_with(UsageSet::empty) |= *usage;
                all_usages |= *usage;
            }
        }
    }

    let mut imports: Vec<String> = Vec::new();
    let mut code: Vec<String> = Vec::new();

    if options.formatters {
        let mut formatter_names: Vec<&str> = Vec::new();
        if all_usages.contains(UsageSet::DATE) {
            formatter_names.push("date");
        }
        if all_usages.contains(UsageSet::TIME) {
            formatter_names.push("time");
        }
        if all_usages.intersects(UsageSet::NUMBER | UsageSet::NUMBER_FMT) {
            formatter_names.push("numberFmt");
        }
        if !formatter_names.is_empty() {
            imports.push(format!(
                "import {{ {} }} from \"@messageformat/runtime/lib/formatters\";",
                formatter_names.join(", ")
            ));
        }
        code.push(format!(
            "export const formatters = {{ {} }};",
            formatter_names.join(", ")
        ));
    }

    // MessageArguments type
    let entries = type_map
        .iter()
        .map(|(key, args)| {
            if args.is_empty() {
                return format!("{:?}?: never | Record<string, never>", key);
            }
            let lines = args
                .iter()
                .map(|(arg, usage)| format!("{:?}: {};", arg, ts_type(usage.representative())))
                .collect::<Vec<_>>()
                .join("\n    ");
            format!("{:?}: {{\n    {}\n  }}", key, lines)
        })
        .collect::<Vec<_>>()
        .join(",\n  ");
    code.push(format!(
        "export type MessageArguments<TArgumentType = number | string, \
         TArgumentTagType = (children: TArgumentType) => TArgumentType> = {{\n  {}\n}};",
        entries
    ));

    // Language type
    let mut languages: Vec<String> = options
        .languages
        .clone()
        .unwrap_or_else(|| dictionary.keys().cloned().collect());
    languages.sort();
    code.push(format!(
        "export type Language = {};",
        languages
            .iter()
            .map(|lang| format!("{:?}", lang))
            .collect::<Vec<_>>()
            .join(" | ")
    ));

    // translation helpers
    code.push("\n".to_string());
    imports.push("import { type CompiledAst, evaluateAst, run } from \"icu-to-json\";".to_string());
    code.push(
        "/**\n  * This function is used to create a translation function that returns a string\n  */"
            .to_string(),
    );
    code.push(
        "export const createTranslationFn = (messages: Record<string, unknown>, lang: Language) => \n  \
         <TKey extends keyof MessageArguments>(key: TKey, args: MessageArguments[TKey]): string => \
         run(messages[key] as CompiledAst, lang, args as Record<string, string | number | Date>, formatters);"
            .to_string(),
    );
    code.push(
        "/**\n  * This function is used to create a translation function that returns a rich AST\n  */"
            .to_string(),
    );
    code.push(
        "export const createTranslationRichFn = (messages: Record<string, unknown>, lang: Language, \
         richFormatters?: { tag: (children: unknown) => any, baseTag: (tagName: string, children: unknown) => any }) => {\n  \
         const customFormatters = {...formatters, ...richFormatters} as any;\n  \
         return <TKey extends keyof MessageArguments>(key: TKey, args: MessageArguments[TKey]) => \
         evaluateAst(messages[key] as CompiledAst, lang, args as Record<string, string | number | Date>, customFormatters);\n};"
            .to_string(),
    );

    Ok(format!("{}\n{}", imports.join("\n"), code.join("\n")))
}
