//! Subscript spies: independent tracking for the getter and the setter.

use super::{body, state_fields, SpySignature};
use crate::core::{GeneratedDeclaration, Parameter, SubscriptMember, SubscriptSignature};
use crate::naming::FieldNames;

/// Getter fields (`<prefix>Get*`), setter fields (`<prefix>Set*`) when
/// settable, then the subscript implementation.
pub fn declarations(subscript: &SubscriptMember, prefix: &str) -> Vec<GeneratedDeclaration> {
    let getter = getter_signature(subscript, prefix);
    let setter = subscript
        .is_settable
        .then(|| setter_signature(subscript, prefix));

    let mut declarations = state_fields(&getter);
    if let Some(setter) = &setter {
        declarations.extend(state_fields(setter));
    }
    declarations.push(GeneratedDeclaration::SubscriptImplementation {
        signature: SubscriptSignature {
            generic_parameters: subscript.generic_parameters.clone(),
            parameters: subscript.parameters.clone(),
            return_type: subscript.return_type.clone(),
            is_async: subscript.is_async,
            is_throwing: subscript.is_throwing,
        },
        getter: body(&getter),
        setter: setter.as_ref().map(body),
    });
    declarations
}

pub fn getter_signature(subscript: &SubscriptMember, prefix: &str) -> SpySignature {
    SpySignature::new(
        FieldNames::new(format!("{}Get", prefix)),
        &subscript.parameters,
        &subscript.generic_parameters,
        subscript.is_async,
        subscript.is_throwing,
        Some(&subscript.return_type),
    )
}

/// Synthetic `set(index..., newValue)` function; setters never throw.
pub fn setter_signature(subscript: &SubscriptMember, prefix: &str) -> SpySignature {
    let mut parameters = subscript.parameters.clone();
    parameters.push(Parameter::unlabeled("newValue", subscript.return_type.clone()));
    SpySignature::new(
        FieldNames::new(format!("{}Set", prefix)),
        &parameters,
        &subscript.generic_parameters,
        false,
        false,
        None,
    )
}
