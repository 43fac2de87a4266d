//! Front end: interface documents and Swift type expressions.

pub mod document;
pub mod type_parser;

pub use document::{
    load_document, parse_document, DocumentFormat, FunctionDocument, InterfaceDocument,
    MemberDocument, ParameterDocument, SubscriptDocument,
};
pub use type_parser::{parse_parameter_type, parse_type, ParameterType};
