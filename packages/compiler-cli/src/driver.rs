//! CLI Driver
//!
//! Reads a translation dictionary, compiles every message and writes the
//! artifact (plus, optionally, a per-language split and a TypeScript
//! declaration).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde_json::Value;

use icu_compiler::typegen::TypegenOptions;
use icu_compiler::{generate_dictionary_api, CompileOptions};

use crate::compile::{compile_dictionary, compile_tree};
use crate::dictionary::normalize;
use crate::logging::Logger;

/// Resolved command line options.
#[derive(Debug, Clone)]
pub struct DriverOptions {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    /// Emit a TypeScript declaration next to the output.
    pub types: bool,
    /// Normalize the dictionary shape before compiling.
    pub normalize: bool,
    /// Write one artifact per language.
    pub split: bool,
    /// Languages for the generated `Language` union.
    pub languages: Vec<String>,
    /// Accepted source formats: `icu`, `interpolated`.
    pub formats: Vec<String>,
}

pub fn run_driver(options: &DriverOptions, logger: &dyn Logger) -> anyhow::Result<()> {
    let output = options
        .output
        .clone()
        .unwrap_or_else(|| with_suffix(&options.input, ".icu.json"));
    if output == options.input {
        bail!("input and output cannot be the same file");
    }

    let source = fs::read_to_string(&options.input)
        .with_context(|| format!("failed to read {}", options.input.display()))?;
    let json: Value = serde_json::from_str(&source)
        .with_context(|| format!("{} is not valid JSON", options.input.display()))?;

    let compile_options = CompileOptions {
        allow_string_interpolation: options.formats.iter().any(|format| format == "interpolated"),
    };

    if options.split || options.normalize {
        let dictionary = normalize(&json)?;
        let compiled = compile_dictionary(&dictionary, compile_options)?;
        if options.split {
            for (lang, messages) in &compiled {
                let path = with_suffix(&output, &format!(".{}.json", lang));
                write_json(&path, messages)?;
                logger.info(&format!("Wrote {}", path.display()));
            }
        } else {
            write_json(&output, &compiled)?;
            logger.info(&format!("Wrote {}", output.display()));
        }
    } else {
        let compiled = compile_tree(&json, compile_options)?;
        write_json(&output, &compiled)?;
        logger.info(&format!("Wrote {}", output.display()));
    }

    if options.types {
        let dictionary =
            normalize(&json).context("--types requires a dictionary shaped input")?;
        let typegen = TypegenOptions {
            languages: if options.languages.is_empty() {
                None
            } else {
                Some(options.languages.clone())
            },
            formatters: true,
            allow_string_interpolation: compile_options.allow_string_interpolation,
        };
        let declaration = generate_dictionary_api(&dictionary, &typegen)?;
        let path = with_suffix(&output, ".ts");
        write_text(&path, &declaration)?;
        logger.info(&format!("Wrote {}", path.display()));
    }

    Ok(())
}

/// `dict.json` + `.de.json` -> `dict.de.json`; non-`.json` paths get the
/// suffix appended.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let text = path.to_string_lossy();
    let stem = text.strip_suffix(".json").unwrap_or(&text);
    PathBuf::from(format!("{}{}", stem, suffix))
}

fn write_json(path: &Path, value: &impl serde::Serialize) -> anyhow::Result<()> {
    let text = serde_json::to_string(value)?;
    write_text(path, &text)
}

fn write_text(path: &Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NullLogger;

    #[test]
    fn compiles_a_dictionary_end_to_end() {
        let dir = std::env::temp_dir().join(format!("icu-to-json-driver-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let input = dir.join("dict.json");
        fs::write(
            &input,
            r#"{"en":{"greeting":"Hello {name}"},"de":{"greeting":"Hallo {name}"}}"#,
        )
        .unwrap();

        let options = DriverOptions {
            input: input.clone(),
            output: None,
            types: true,
            normalize: true,
            split: false,
            languages: Vec::new(),
            formats: vec!["icu".to_string()],
        };
        run_driver(&options, &NullLogger::new()).unwrap();

        let artifact = fs::read_to_string(dir.join("dict.icu.json")).unwrap();
        assert!(artifact.contains(r#"[["name"],"Hallo ",0]"#));
        let declaration = fs::read_to_string(dir.join("dict.ts")).unwrap();
        assert!(declaration.contains("MessageArguments"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn split_writes_one_artifact_per_language() {
        let dir = std::env::temp_dir().join(format!("icu-to-json-split-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let input = dir.join("dict.json");
        fs::write(&input, r#"{"en":{"k":"hi"},"de":{"k":"hallo"}}"#).unwrap();

        let options = DriverOptions {
            input,
            output: None,
            types: false,
            normalize: false,
            split: true,
            languages: Vec::new(),
            formats: vec!["icu".to_string()],
        };
        run_driver(&options, &NullLogger::new()).unwrap();

        assert_eq!(
            fs::read_to_string(dir.join("dict.icu.en.json")).unwrap(),
            r#"{"k":"hi"}"#
        );
        assert_eq!(
            fs::read_to_string(dir.join("dict.icu.de.json")).unwrap(),
            r#"{"k":"hallo"}"#
        );

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn rejects_identical_input_and_output() {
        let options = DriverOptions {
            input: PathBuf::from("same.json"),
            output: Some(PathBuf::from("same.json")),
            types: false,
            normalize: false,
            split: false,
            languages: Vec::new(),
            formats: vec!["icu".to_string()],
        };
        assert!(run_driver(&options, &NullLogger::new()).is_err());
    }

    #[test]
    fn suffix_replaces_json_extension() {
        assert_eq!(
            with_suffix(Path::new("dict.json"), ".icu.json"),
            PathBuf::from("dict.icu.json")
        );
        assert_eq!(
            with_suffix(Path::new("out/dict.json"), ".de.json"),
            PathBuf::from("out/dict.de.json")
        );
        assert_eq!(
            with_suffix(Path::new("dict.json"), ".ts"),
            PathBuf::from("dict.ts")
        );
    }
}
