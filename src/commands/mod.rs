//! CLI command implementations for spygen operations.
//!
//! Available commands:
//! - **generate**: Generate spies from interface documents
//! - **init**: Initialize a new spygen configuration file

pub mod generate;
pub mod init;

pub use generate::{generate_spies, GenerateConfig};
pub use init::{init_config, init_config_in};
