use crate::config::CONFIG_FILE_NAME;
use crate::io;
use anyhow::Result;
use std::path::Path;

pub const DEFAULT_CONFIG: &str = r#"# Spygen Configuration

[generation]
# "abort" fails an interface on its first bad member, "isolate" skips it
failure_mode = "abort"
# "disambiguate" appends parameter types to colliding overload names
overloads = "disambiguate"

[output]
format = "swift"
indent_width = 4
# compilation_guard = "DEBUG"

[input]
# Glob patterns skipped when walking input directories
ignore = []
"#;

pub fn init_config(force: bool) -> Result<()> {
    init_config_in(Path::new("."), force)
}

pub fn init_config_in(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG)?;
    println!("Created {} configuration file", CONFIG_FILE_NAME);

    Ok(())
}
