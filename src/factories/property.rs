//! Property spies proxy through an `underlying*` backing field.

use crate::core::{Expr, GeneratedDeclaration, SemanticType, Statement};
use crate::naming::underlying_name;

/// Computed property `name` plus its backing field.
///
/// The backing field is implicitly unwrapped for non-optional types, so
/// reading the property before the test configures it faults instead of
/// returning an invented default.
pub fn declarations(name: &str, ty: &SemanticType, is_settable: bool) -> Vec<GeneratedDeclaration> {
    let underlying = underlying_name(name);
    let setter = is_settable.then(|| {
        vec![Statement::Assign {
            target: underlying.clone(),
            value: Expr::ident("newValue"),
        }]
    });

    vec![
        GeneratedDeclaration::ComputedProperty {
            name: name.to_string(),
            ty: ty.clone(),
            getter: vec![Statement::Return {
                value: Some(Expr::ident(&underlying)),
            }],
            setter,
        },
        GeneratedDeclaration::stored(underlying, ty.configurable()),
    ]
}
