//! Command-line interface for merging head declarations.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use console::style;

use crate::declarations::load_declarations;
use crate::dom::{DomElement, MemoryHead};
use crate::error::Result;
use crate::registry::HeadRegistry;
use crate::render::{HeadRenderer, MarkupRenderer};
use crate::server::rewind;
use crate::sync::{ClientSync, HeadPatch};

/// Elmo Head - merge document head declarations from many contributors.
#[derive(Parser)]
#[command(name = "elmo-head")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge declaration files (one contributor each, in order) and print the head.
    Merge {
        /// Declaration files (.yaml, .yml or .json)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "html")]
        format: OutputFormat,
    },

    /// Synchronize existing head markup with declaration files.
    Sync {
        /// File with the existing head markup
        #[arg(long)]
        head: PathBuf,

        /// Declaration files (.yaml, .yml or .json)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Output format of the merge command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Html,
    Json,
    Yaml,
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Merge { files, format } => merge_command(&files, format),
        Commands::Sync { head, files } => sync_command(&head, &files),
    }
}

/// Execute the merge command.
fn merge_command(files: &[PathBuf], format: OutputFormat) -> Result<()> {
    let mut registry = HeadRegistry::new();
    for path in files {
        registry.register(&load_declarations(path)?);
    }

    let output = match format {
        OutputFormat::Html => MarkupRenderer.render(&registry.drain()),
        OutputFormat::Json => serde_json::to_string_pretty(&rewind(&mut registry))?,
        OutputFormat::Yaml => serde_yaml_ng::to_string(&rewind(&mut registry))?,
    };
    println!("{}", output.trim_end());
    Ok(())
}

/// Execute the sync command.
fn sync_command(head: &Path, files: &[PathBuf]) -> Result<()> {
    let markup = fs::read_to_string(head)?;
    let mut registry = HeadRegistry::with_sink(ClientSync::new(MemoryHead::from_markup(&markup)));

    eprintln!(
        "{} {} with {} contributor(s)",
        style("Synchronizing").bold(),
        style(head.display()).cyan(),
        files.len()
    );

    for path in files {
        registry.register(&load_declarations(path)?);
        for patch in registry.sink().last_plan().patches() {
            match patch {
                HeadPatch::SetTitle(title) => {
                    eprintln!("  {} title {}", style("~").yellow(), style(title).green());
                }
                HeadPatch::Remove { element, .. } => {
                    eprintln!("  {} {}", style("-").red(), render_one(element));
                }
                HeadPatch::Append(element) => {
                    eprintln!("  {} {}", style("+").green(), render_one(element));
                }
            }
        }
    }

    println!("{}", registry.sink().target().to_markup());
    Ok(())
}

fn render_one(element: &DomElement) -> String {
    let mut out = String::new();
    MarkupRenderer.render_element(element, &mut out);
    out
}
