// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod factories;
pub mod frontend;
pub mod generator;
pub mod generics;
pub mod io;
pub mod naming;
pub mod render;
pub mod testkit;

// Re-export commonly used types
pub use crate::core::{
    AccessLevel, Error, Expr, FunctionMember, GeneratedDeclaration, GeneratedSpy,
    GenerationError, GenericParameter, InterfaceSpecification, Member, Parameter, Result,
    SemanticType, Statement, SubscriptMember, TypeParseError,
};

pub use crate::generator::{
    generate_spy, FailureMode, GenerationOptions, GenerationReport, OverloadPolicy, SpyGenerator,
};

pub use crate::frontend::{load_document, parse_document, parse_type, InterfaceDocument};

pub use crate::render::{create_writer, render_swift, OutputFormat, RenderOptions, SpyWriter};

pub use crate::config::{load_config, SpygenConfig};
