//! `.spygen.toml` configuration.

mod loader;

pub use loader::{
    directory_ancestors, load_config, load_config_from, load_config_from_path,
    parse_and_validate_config, CONFIG_FILE_NAME,
};

use serde::{Deserialize, Serialize};

use crate::generator::{FailureMode, GenerationOptions, OverloadPolicy};
use crate::render::{OutputFormat, RenderOptions};

/// Root configuration structure for spygen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpygenConfig {
    /// Engine behavior
    #[serde(default)]
    pub generation: Option<GenerationConfig>,

    /// Emitter settings
    #[serde(default)]
    pub output: Option<OutputConfig>,

    /// Document discovery
    #[serde(default)]
    pub input: Option<InputConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub failure_mode: Option<FailureMode>,

    #[serde(default)]
    pub overloads: Option<OverloadPolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: Option<OutputFormat>,

    /// Spaces per indentation level (default: 4)
    #[serde(default)]
    pub indent_width: Option<usize>,

    /// Guard applied when an interface document has none
    #[serde(default)]
    pub compilation_guard: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Glob patterns excluded when walking input directories
    #[serde(default)]
    pub ignore: Option<Vec<String>>,
}

impl SpygenConfig {
    pub fn generation_options(&self) -> GenerationOptions {
        let generation = self.generation.clone().unwrap_or_default();
        GenerationOptions {
            failure_mode: generation.failure_mode.unwrap_or_default(),
            overloads: generation.overloads.unwrap_or_default(),
            default_guard: self
                .output
                .as_ref()
                .and_then(|o| o.compilation_guard.clone()),
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output
            .as_ref()
            .and_then(|o| o.format)
            .unwrap_or_default()
    }

    pub fn ignore_patterns(&self) -> Vec<String> {
        self.input
            .as_ref()
            .and_then(|i| i.ignore.clone())
            .unwrap_or_default()
    }

    pub fn render_options(&self) -> RenderOptions {
        let defaults = RenderOptions::default();
        RenderOptions {
            indent_width: self
                .output
                .as_ref()
                .and_then(|o| o.indent_width)
                .unwrap_or(defaults.indent_width),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SpygenConfig::default();
        assert_eq!(config.generation_options(), GenerationOptions::default());
        assert_eq!(config.output_format(), OutputFormat::Swift);
        assert_eq!(config.render_options().indent_width, 4);
        assert!(config.ignore_patterns().is_empty());
    }

    #[test]
    fn test_output_guard_becomes_default_guard() {
        let config = SpygenConfig {
            generation: Some(GenerationConfig {
                failure_mode: Some(FailureMode::Isolate),
                overloads: None,
            }),
            output: Some(OutputConfig {
                format: Some(OutputFormat::Json),
                indent_width: Some(2),
                compilation_guard: Some("DEBUG".into()),
            }),
            input: Some(InputConfig {
                ignore: Some(vec!["**/fixtures/**".into()]),
            }),
        };

        let options = config.generation_options();
        assert_eq!(options.failure_mode, FailureMode::Isolate);
        assert_eq!(options.overloads, OverloadPolicy::Disambiguate);
        assert_eq!(options.default_guard.as_deref(), Some("DEBUG"));
        assert_eq!(config.output_format(), OutputFormat::Json);
        assert_eq!(config.render_options().indent_width, 2);
        assert_eq!(config.ignore_patterns(), vec!["**/fixtures/**".to_string()]);
    }
}
