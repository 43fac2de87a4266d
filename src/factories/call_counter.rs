//! Call counting and argument recording.

use super::SpySignature;
use crate::core::{Expr, GeneratedDeclaration, SemanticType, Statement};

/// `CallsCount`, `Called`, per-parameter `Received*`, the `ReceivedArguments`
/// tuple for several parameters and the `ReceivedInvocations` history.
/// Zero-parameter signatures only get the two counter fields.
pub fn fields(signature: &SpySignature) -> Vec<GeneratedDeclaration> {
    let names = &signature.names;
    let mut fields = vec![
        GeneratedDeclaration::stored_with_default(
            names.calls_count(),
            SemanticType::int(),
            Expr::int(0),
        ),
        GeneratedDeclaration::ComputedProperty {
            name: names.called(),
            ty: SemanticType::bool(),
            getter: vec![Statement::Return {
                value: Some(Expr::Greater {
                    lhs: Box::new(Expr::ident(names.calls_count())),
                    rhs: Box::new(Expr::int(0)),
                }),
            }],
            setter: None,
        },
    ];

    if signature.parameters.is_empty() {
        return fields;
    }

    fields.extend(signature.parameters.iter().map(|p| {
        GeneratedDeclaration::stored(names.received(&p.parameter), p.stored_type.clone().optional())
    }));
    if signature.parameters.len() > 1 {
        fields.push(GeneratedDeclaration::stored(
            names.received_arguments(),
            signature.recorded_type().optional(),
        ));
    }
    fields.push(GeneratedDeclaration::stored_with_default(
        names.received_invocations(),
        signature.recorded_type().array(),
        Expr::EmptyArray,
    ));
    fields
}

/// The increment always comes first; recording follows in parameter order.
pub fn statements(signature: &SpySignature) -> Vec<Statement> {
    let names = &signature.names;
    let mut statements = vec![Statement::Increment {
        target: names.calls_count(),
    }];

    if signature.parameters.is_empty() {
        return statements;
    }

    statements.extend(signature.parameters.iter().map(|p| Statement::Assign {
        target: names.received(&p.parameter),
        value: Expr::ident(p.name()),
    }));
    if signature.parameters.len() > 1 {
        statements.push(Statement::Assign {
            target: names.received_arguments(),
            value: signature.recorded_value(),
        });
    }
    statements.push(Statement::Append {
        target: names.received_invocations(),
        value: signature.recorded_value(),
    });
    statements
}
