use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::generator::OverloadPolicy;
use crate::render::OutputFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Swift source, one class per interface
    Swift,
    /// Structured declarations as pretty-printed JSON
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Swift => OutputFormat::Swift,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OverloadArg {
    /// Keep label-derived prefixes even when overloads collide
    Preserve,
    /// Append parameter type suffixes to colliding prefixes (default)
    Disambiguate,
}

impl From<OverloadArg> for OverloadPolicy {
    fn from(arg: OverloadArg) -> Self {
        match arg {
            OverloadArg::Preserve => OverloadPolicy::Preserve,
            OverloadArg::Disambiguate => OverloadPolicy::Disambiguate,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "spygen")]
#[command(about = "Spy test double generator for Swift protocols", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable debug logging (SPYGEN_LOG overrides)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate spies from interface documents
    Generate {
        /// Interface documents or directories containing them
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory, or output file for a single document (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Wrap spies in `#if <FLAG>` unless the document names its own guard
        #[arg(long = "guard", value_name = "FLAG")]
        guard: Option<String>,

        /// Skip members that cannot be generated instead of failing the interface
        #[arg(long = "isolate-failures")]
        isolate_failures: bool,

        /// Naming policy for colliding overloads
        #[arg(long, value_enum)]
        overloads: Option<OverloadArg>,

        /// Configuration file (defaults to the nearest .spygen.toml)
        #[arg(short, long, env = "SPYGEN_CONFIG")]
        config: Option<PathBuf>,

        /// Skip documents matching this glob when walking directories (repeatable)
        #[arg(long = "ignore", value_name = "GLOB")]
        ignore: Vec<String>,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
