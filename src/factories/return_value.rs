//! Stored return values for non-`Void` members.

use super::SpySignature;
use crate::core::{Expr, GeneratedDeclaration, Statement};

/// `ReturnValue`, typed as the (possibly erased) return type when that is
/// optional and as its implicitly unwrapped form otherwise.
pub fn fields(signature: &SpySignature) -> Vec<GeneratedDeclaration> {
    if !signature.returns_value() {
        return Vec::new();
    }
    vec![GeneratedDeclaration::stored(
        signature.names.return_value(),
        signature.stored_return.configurable(),
    )]
}

pub fn statements(signature: &SpySignature) -> Vec<Statement> {
    if !signature.returns_value() {
        return Vec::new();
    }
    vec![Statement::Return {
        value: Some(signature.deliver(Expr::ident(signature.names.return_value()))),
    }]
}
