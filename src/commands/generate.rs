use anyhow::{Context, Result};
use colored::Colorize;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::{load_config, load_config_from_path, SpygenConfig};
use crate::core::GenerationError;
use crate::frontend::load_document;
use crate::generator::{FailureMode, GenerationOptions, OverloadPolicy, SpyGenerator};
use crate::io;
use crate::render::{create_writer, OutputFormat, RenderOptions};

#[derive(Debug, Clone, Default)]
pub struct GenerateConfig {
    pub inputs: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub guard: Option<String>,
    pub isolate_failures: bool,
    pub overloads: Option<OverloadPolicy>,
    pub config: Option<PathBuf>,
    /// Glob patterns added to the configured `[input] ignore` list
    pub ignore: Vec<String>,
}

/// Effective settings after layering CLI flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSettings {
    pub options: GenerationOptions,
    pub format: OutputFormat,
    pub render: RenderOptions,
    pub ignore: Vec<String>,
}

#[derive(Debug)]
pub struct GeneratedOutput {
    pub source: PathBuf,
    pub spy_name: String,
    pub contents: String,
    pub skipped: Vec<GenerationError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Destination {
    Stdout,
    File(PathBuf),
    Directory(PathBuf),
}

pub fn generate_spies(config: GenerateConfig) -> Result<()> {
    let file_config = match &config.config {
        Some(path) => load_config_from_path(path)?,
        None => load_config(),
    };
    let settings = resolve_settings(&config, &file_config);
    debug!(?settings, "Resolved generation settings");

    let documents = collect_documents(&config.inputs, &settings.ignore)?;
    if documents.is_empty() {
        anyhow::bail!("No interface documents found in the given inputs");
    }
    let destination = resolve_destination(config.output.as_deref(), documents.len())?;

    let outcomes: Vec<(PathBuf, Result<GeneratedOutput>)> = documents
        .par_iter()
        .map(|path| (path.clone(), generate_document(path, &settings)))
        .collect();

    let total = outcomes.len();
    let mut failed = 0;
    for (path, outcome) in outcomes {
        match outcome {
            Ok(output) => {
                report_skipped(&output);
                write_output(&output, &destination, settings.format)?;
            }
            Err(err) => {
                failed += 1;
                eprintln!("{} {}: {:#}", "error:".red().bold(), path.display(), err);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} interface documents failed", failed, total);
    }
    info!(documents = total, "Generation complete");
    Ok(())
}

pub fn resolve_settings(config: &GenerateConfig, file_config: &SpygenConfig) -> GenerateSettings {
    let mut options = file_config.generation_options();
    if config.isolate_failures {
        options.failure_mode = FailureMode::Isolate;
    }
    if let Some(overloads) = config.overloads {
        options.overloads = overloads;
    }
    if let Some(guard) = &config.guard {
        options.default_guard = Some(guard.clone());
    }

    let mut ignore = file_config.ignore_patterns();
    ignore.extend(config.ignore.iter().cloned());

    GenerateSettings {
        options,
        format: config.format.unwrap_or_else(|| file_config.output_format()),
        render: file_config.render_options(),
        ignore,
    }
}

/// Expands directory inputs into the interface documents they contain.
/// Ignore patterns only filter directory walks; named files are always kept.
pub fn collect_documents(inputs: &[PathBuf], ignore: &[String]) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();
    for input in inputs {
        if io::dir_exists(input) {
            documents.extend(io::find_interface_documents(input, ignore)?);
        } else if io::file_exists(input) {
            documents.push(input.clone());
        } else {
            anyhow::bail!("Input not found: {}", input.display());
        }
    }
    Ok(documents)
}

/// Loads, resolves, generates and renders a single interface document.
pub fn generate_document(path: &Path, settings: &GenerateSettings) -> Result<GeneratedOutput> {
    let document =
        load_document(path).with_context(|| format!("Failed to load {}", path.display()))?;
    let (spec, mut skipped) = document.resolve(settings.options.failure_mode)?;

    let report = SpyGenerator::new(settings.options.clone()).generate(&spec)?;
    skipped.extend(report.failures);

    let mut buffer = Vec::new();
    create_writer(settings.format, &mut buffer, settings.render.clone()).write_spy(&report.spy)?;
    let contents = String::from_utf8(buffer).context("Rendered output is not valid UTF-8")?;

    debug!(
        document = %path.display(),
        spy = %report.spy.name,
        skipped = skipped.len(),
        "Generated spy"
    );
    Ok(GeneratedOutput {
        source: path.to_path_buf(),
        spy_name: report.spy.name,
        contents,
        skipped,
    })
}

fn resolve_destination(output: Option<&Path>, document_count: usize) -> Result<Destination> {
    match output {
        None if document_count == 1 => Ok(Destination::Stdout),
        None => anyhow::bail!(
            "{} interface documents found; use --output <DIR> to write multiple spies",
            document_count
        ),
        Some(path) if document_count == 1 && !path.is_dir() && path.extension().is_some() => {
            Ok(Destination::File(path.to_path_buf()))
        }
        Some(path) => Ok(Destination::Directory(path.to_path_buf())),
    }
}

fn write_output(
    output: &GeneratedOutput,
    destination: &Destination,
    format: OutputFormat,
) -> Result<()> {
    match destination {
        Destination::Stdout => {
            print!("{}", output.contents);
            Ok(())
        }
        Destination::File(path) => {
            io::write_file(path, &output.contents)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
        Destination::Directory(dir) => {
            let path = dir.join(format!("{}.{}", output.spy_name, format.extension()));
            io::write_file(&path, &output.contents)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}

fn report_skipped(output: &GeneratedOutput) {
    for failure in &output.skipped {
        eprintln!(
            "{} {}: skipped {}",
            "warning:".yellow().bold(),
            output.source.display(),
            failure
        );
    }
}
