//! Emitters for generated spies.
//!
//! The engine hands over structured declarations; writers here turn them into
//! Swift source or a JSON document for external formatters.

pub mod swift;

pub use swift::{render_expr, render_swift, render_type, RenderOptions};

use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::core::{GeneratedSpy, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Swift,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Swift => "swift",
            Self::Json => "json",
        }
    }
}

pub trait SpyWriter {
    fn write_spy(&mut self, spy: &GeneratedSpy) -> Result<()>;
}

pub struct SwiftWriter<W: Write> {
    writer: W,
    options: RenderOptions,
}

impl<W: Write> SwiftWriter<W> {
    pub fn new(writer: W, options: RenderOptions) -> Self {
        Self { writer, options }
    }
}

impl<W: Write> SpyWriter for SwiftWriter<W> {
    fn write_spy(&mut self, spy: &GeneratedSpy) -> Result<()> {
        let source = render_swift(spy, &self.options);
        self.writer.write_all(source.as_bytes())?;
        Ok(())
    }
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> SpyWriter for JsonWriter<W> {
    fn write_spy(&mut self, spy: &GeneratedSpy) -> Result<()> {
        let json = serde_json::to_string_pretty(spy)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub fn create_writer<'a, W: Write + 'a>(
    format: OutputFormat,
    writer: W,
    options: RenderOptions,
) -> Box<dyn SpyWriter + 'a> {
    match format {
        OutputFormat::Swift => Box::new(SwiftWriter::new(writer, options)),
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
    }
}
