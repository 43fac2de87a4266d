//! Replacement closures that override a member's behavior.

use super::SpySignature;
use crate::core::{Expr, GeneratedDeclaration, SemanticType, Statement};

/// Function type of the closure field: stored parameter types to stored
/// return type, keeping `async`/`throws`. An implicitly unwrapped result is
/// spelled as an optional.
pub fn closure_type(signature: &SpySignature) -> SemanticType {
    SemanticType::function(
        signature
            .parameters
            .iter()
            .map(|p| p.stored_type.clone())
            .collect(),
        signature.is_async,
        signature.is_throwing,
        signature.stored_return.as_plain_optional(),
    )
}

pub fn field(signature: &SpySignature) -> GeneratedDeclaration {
    GeneratedDeclaration::stored(
        signature.names.closure(),
        closure_type(signature).optional(),
    )
}

/// Invokes the closure when set. Value-returning members fall back to
/// `fallback` (the stored return value) when it is not.
pub fn statements(signature: &SpySignature, fallback: Vec<Statement>) -> Vec<Statement> {
    let closure = signature.names.closure();

    if !signature.returns_value() {
        let call = Expr::Call {
            callee: Box::new(Expr::ident(&closure)),
            arguments: signature.arguments(),
            optional_chained: true,
        };
        return vec![Statement::Expression {
            expr: call.with_effects(signature.is_async, signature.is_throwing),
        }];
    }

    let call = Expr::Call {
        callee: Box::new(Expr::ForceUnwrap {
            inner: Box::new(Expr::ident(&closure)),
        }),
        arguments: signature.arguments(),
        optional_chained: false,
    }
    .with_effects(signature.is_async, signature.is_throwing);

    vec![Statement::IfPresent {
        field: closure,
        then: vec![Statement::Return {
            value: Some(signature.deliver(call)),
        }],
        otherwise: fallback,
    }]
}
