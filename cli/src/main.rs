#![deny(missing_docs)]

//! # svc2oas CLI
//!
//! Command line front-end for the descriptor-to-OpenAPI generator: loads a
//! JSON-encoded descriptor set, runs the generation pipeline and writes
//! the resulting document as YAML to a file or stdout.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use svc2oas_core::{generate_with_settings, DescriptorSet, GenResult, Settings};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Generates an OpenAPI document from an annotated descriptor set")]
struct Cli {
    /// JSON descriptor set to read.
    #[clap(long)]
    input: PathBuf,

    /// Name of the loaded file to generate for; defaults to the set's own
    /// target, then the last loaded file.
    #[clap(long)]
    file: Option<String>,

    /// Optional YAML settings file filling missing document metadata.
    #[clap(long)]
    settings: Option<PathBuf>,

    /// Output path for the YAML document; stdout when absent.
    #[clap(long)]
    output: Option<PathBuf>,
}

fn main() -> GenResult<()> {
    run(&Cli::parse())
}

fn run(cli: &Cli) -> GenResult<()> {
    let set: DescriptorSet = serde_json::from_str(&fs::read_to_string(&cli.input)?)?;

    let settings = match &cli.settings {
        Some(path) => Settings::from_yaml(&fs::read_to_string(path)?)?,
        None => Settings::default(),
    };

    let document = generate_with_settings(&set, cli.file.as_deref(), &settings)?;
    let yaml = serde_yaml::to_string(&document)?;

    match &cli.output {
        Some(path) => fs::write(path, yaml)?,
        None => io::stdout().write_all(yaml.as_bytes())?,
    }

    Ok(())
}
