mod config;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{CliConfig, MAX_INDENT, RUST_LOG_VAR};
use hr_things::thing::SUPPORTED;
use hr_things::Thing;

#[derive(Parser)]
#[command(name = "hrthing")]
#[command(about = "Inspect and validate health record thing XML")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported root elements
    Types,
    /// Print the summary of a thing
    Summary {
        /// XML file to read
        file: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse a thing and write it back out
    Roundtrip {
        /// XML file to read
        file: PathBuf,
        /// Indent width (overrides HR_THINGS_INDENT)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=MAX_INDENT as i64))]
        indent: Option<u8>,
    },
    /// Parse a thing and check that it can be written
    Check {
        /// XML file to read
        file: PathBuf,
    },
}

#[derive(Debug, Serialize)]
struct SummaryReport<'a> {
    element: &'a str,
    type_name: &'a str,
    summary: String,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = CliConfig::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            config.log_filter(std::env::var(RUST_LOG_VAR).ok()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Types) => {
            for (element, type_name) in SUPPORTED {
                println!("{element:<20} {type_name}");
            }
        }
        Some(Commands::Summary { file, json }) => {
            let thing = load(&file)?;
            if json {
                let report = SummaryReport {
                    element: thing.element(),
                    type_name: thing.type_name(),
                    summary: thing.to_string(),
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}: {}", thing.type_name(), thing);
            }
        }
        Some(Commands::Roundtrip { file, indent }) => {
            let indent = indent.map_or(config.indent(), usize::from);
            let thing = load(&file)?;
            let xml = thing
                .to_xml_with_indent(indent)
                .with_context(|| format!("failed to write {}", thing.type_name()))?;
            println!("{xml}");
        }
        Some(Commands::Check { file }) => {
            let thing = load(&file)?;
            thing
                .to_xml()
                .with_context(|| format!("{} is not writable", file.display()))?;
            tracing::info!(file = %file.display(), element = thing.element(), "check passed");
            println!("ok: {} ({})", file.display(), thing.type_name());
        }
        None => {
            println!("Use 'hrthing --help' for commands");
        }
    }

    Ok(())
}

/// Read `path` and dispatch it to its thing type.
fn load(path: &Path) -> anyhow::Result<Thing> {
    let xml =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    tracing::debug!(file = %path.display(), bytes = xml.len(), "loaded document");
    Thing::from_xml(&xml).with_context(|| format!("failed to parse {}", path.display()))
}
