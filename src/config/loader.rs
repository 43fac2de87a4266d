use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::SpygenConfig;
use crate::core::{Error, Result, ResultExt};

pub const CONFIG_FILE_NAME: &str = ".spygen.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;
const MAX_INDENT_WIDTH: usize = 16;

fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse config from a TOML string and reject values the emitter cannot honor
pub fn parse_and_validate_config(contents: &str) -> Result<SpygenConfig> {
    let config = toml::from_str::<SpygenConfig>(contents)?;

    if let Some(output) = &config.output {
        if let Some(width) = output.indent_width {
            if width == 0 || width > MAX_INDENT_WIDTH {
                return Err(Error::Configuration(format!(
                    "indent_width must be between 1 and {}, got {}",
                    MAX_INDENT_WIDTH, width
                )));
            }
        }
        if let Some(guard) = &output.compilation_guard {
            if guard.trim().is_empty() || guard.chars().any(char::is_whitespace) {
                return Err(Error::Configuration(format!(
                    "compilation_guard must be a single flag name, got {:?}",
                    guard
                )));
            }
        }
    }

    for pattern in config.ignore_patterns() {
        if let Err(err) = glob::Pattern::new(&pattern) {
            return Err(Error::Configuration(format!(
                "invalid ignore pattern {:?}: {}",
                pattern, err
            )));
        }
    }

    Ok(config)
}

/// Load an explicitly requested config file; a missing file is an error here
pub fn load_config_from_path(path: &Path) -> Result<SpygenConfig> {
    let contents = read_config_file(path)
        .map_err(Error::from)
        .context(format!("Reading {}", path.display()))?;
    let config =
        parse_and_validate_config(&contents).context(format!("Loading {}", path.display()))?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

fn try_load_config_from_path(config_path: &Path) -> Option<SpygenConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!(
                "Ignoring invalid config {}: {}. Using defaults.",
                config_path.display(),
                e
            );
            None
        }
    }
}

fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Directory ancestors starting at `start`, up to `max_depth` entries
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `.spygen.toml`
pub fn load_config_from(start: PathBuf) -> SpygenConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            SpygenConfig::default()
        })
}

pub fn load_config() -> SpygenConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            SpygenConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{FailureMode, OverloadPolicy};
    use crate::render::OutputFormat;
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config = parse_and_validate_config(indoc! {r#"
            [generation]
            failure_mode = "isolate"
            overloads = "preserve"

            [output]
            format = "json"
            indent_width = 2
            compilation_guard = "DEBUG"

            [input]
            ignore = ["**/fixtures/**", "Legacy/*.json"]
        "#})
        .unwrap();

        let generation = config.generation.clone().unwrap();
        assert_eq!(generation.failure_mode, Some(FailureMode::Isolate));
        assert_eq!(generation.overloads, Some(OverloadPolicy::Preserve));
        assert_eq!(config.output_format(), OutputFormat::Json);
        assert_eq!(config.render_options().indent_width, 2);
        assert_eq!(
            config.ignore_patterns(),
            vec!["**/fixtures/**".to_string(), "Legacy/*.json".to_string()]
        );
    }

    #[test]
    fn test_malformed_ignore_pattern_rejected() {
        let err = parse_and_validate_config(r#"[input]
ignore = ["[unclosed"]
"#).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("[unclosed"));
    }

    #[test]
    fn test_zero_indent_rejected() {
        let err = parse_and_validate_config("[output]\nindent_width = 0\n").unwrap_err();
        assert!(err.to_string().contains("indent_width"));
    }

    #[test]
    fn test_guard_with_spaces_rejected() {
        let err =
            parse_and_validate_config("[output]\ncompilation_guard = \"DEBUG MODE\"\n").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_unknown_mode_is_parse_error() {
        let err =
            parse_and_validate_config("[generation]\nfailure_mode = \"explode\"\n").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn test_directory_ancestors_stops_at_depth() {
        let dirs: Vec<PathBuf> = directory_ancestors(PathBuf::from("/a/b/c/d"), 2).collect();
        assert_eq!(dirs, vec![PathBuf::from("/a/b/c/d"), PathBuf::from("/a/b/c")]);
    }

    #[test]
    fn test_load_config_from_finds_ancestor_file() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("Sources").join("App");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "[generation]\nfailure_mode = \"isolate\"\n",
        )
        .unwrap();

        let config = load_config_from(nested);
        assert_eq!(
            config.generation_options().failure_mode,
            FailureMode::Isolate
        );
    }

    #[test]
    fn test_invalid_ancestor_config_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "[output]\nindent_width = 0\n").unwrap();

        assert_eq!(load_config_from(temp.path().to_path_buf()), SpygenConfig::default());
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let temp = TempDir::new().unwrap();
        let err = load_config_from_path(&temp.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().starts_with("Reading "));
    }
}
