//! icu-to-json
//!
//! Compiles an ICU MessageFormat dictionary into the compact JSON artifact.

use std::path::PathBuf;
use std::process;

use clap::{Arg, ArgAction, Command};

use icu_compiler::is_known_language;
use icu_compiler_cli::driver::{run_driver, DriverOptions};
use icu_compiler_cli::logging::{ConsoleLogger, LogLevel};

fn main() {
    let matches = Command::new("icu-to-json")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile ICU MessageFormat dictionaries to compact JSON")
        .arg(
            Arg::new("input")
                .value_name("INPUT")
                .required(true)
                .help("Translation dictionary (JSON)"),
        )
        .arg(
            Arg::new("output")
                .value_name("OUTPUT")
                .help("Output path; defaults to <input>.icu.json"),
        )
        .arg(
            Arg::new("types")
                .long("types")
                .action(ArgAction::SetTrue)
                .help("Emit a TypeScript declaration next to the output"),
        )
        .arg(
            Arg::new("normalize")
                .long("normalize")
                .action(ArgAction::SetTrue)
                .help("Normalize the dictionary shape before compiling"),
        )
        .arg(
            Arg::new("split")
                .long("split")
                .action(ArgAction::SetTrue)
                .help("Write one artifact per language"),
        )
        .arg(
            Arg::new("lang")
                .long("lang")
                .value_delimiter(',')
                .action(ArgAction::Append)
                .help("Languages for the generated Language union"),
        )
        .arg(
            Arg::new("formats")
                .long("formats")
                .value_delimiter(',')
                .action(ArgAction::Append)
                .help("Accepted source formats: icu, interpolated"),
        )
        .get_matches();

    let languages: Vec<String> = matches
        .get_many::<String>("lang")
        .map(|values| values.cloned().collect::<Vec<_>>())
        .unwrap_or_default()
        .into_iter()
        .filter(|lang| is_known_language(lang))
        .collect();
    let formats: Vec<String> = matches
        .get_many::<String>("formats")
        .map(|values| values.cloned().collect())
        .unwrap_or_else(|| vec!["icu".to_string()]);

    let options = DriverOptions {
        input: PathBuf::from(matches.get_one::<String>("input").cloned().unwrap_or_default()),
        output: matches.get_one::<String>("output").map(PathBuf::from),
        types: matches.get_flag("types"),
        normalize: matches.get_flag("normalize"),
        split: matches.get_flag("split"),
        languages,
        formats,
    };

    let logger = ConsoleLogger::new(LogLevel::Info);
    if let Err(error) = run_driver(&options, &logger) {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}
