//! Generics substitution policy.
//!
//! Spy storage lives on the spy type, which cannot be parameterized by the
//! generic parameters of an individual method. Any stored type that mentions a
//! function-level placeholder is therefore replaced, as a whole, by `Any`, and
//! values read back out of that storage are force-cast to the declared type.
//! A force-cast that fails at test time means the test configured a value of
//! the wrong type; the generator cannot prevent that.

use crate::core::{GenerationError, GenericParameter, Parameter, SemanticType};

/// Replaces a placeholder-referencing type by the erased `Any`.
///
/// Erasure is uniform: `T`, `[U]` and `(T, U) -> T` all become the same
/// `ErasedAny`. Top-level optionality survives so an optional generic return
/// still defaults to `nil` instead of faulting.
pub fn erase(ty: &SemanticType) -> SemanticType {
    if !ty.references_placeholder() {
        return ty.clone();
    }
    match ty {
        SemanticType::Optional { .. } => SemanticType::ErasedAny.optional(),
        SemanticType::ImplicitlyUnwrapped { .. } => SemanticType::ErasedAny.implicitly_unwrapped(),
        _ => SemanticType::ErasedAny,
    }
}

/// Whether the policy engages for a signature: it must declare generic
/// parameters and mention at least one of them.
pub fn engages(
    generics: &[GenericParameter],
    parameters: &[Parameter],
    return_type: Option<&SemanticType>,
) -> bool {
    !generics.is_empty()
        && (parameters.iter().any(|p| p.ty.references_placeholder())
            || return_type.is_some_and(SemanticType::references_placeholder))
}

/// Verifies that every placeholder in the signature is declared by it and that
/// no declared generic shadows an interface-level one.
pub fn validate_generics(
    member: &str,
    generics: &[GenericParameter],
    interface_generics: &[GenericParameter],
    parameters: &[Parameter],
    return_type: Option<&SemanticType>,
) -> Result<(), GenerationError> {
    if let Some(collision) = generics
        .iter()
        .find(|g| interface_generics.iter().any(|i| i.name == g.name))
    {
        return Err(GenerationError::GenericNameCollision {
            member: member.to_string(),
            name: collision.name.clone(),
        });
    }

    let referenced = parameters
        .iter()
        .map(|p| &p.ty)
        .chain(return_type)
        .flat_map(SemanticType::placeholders);
    for name in referenced {
        if !generics.iter().any(|g| g.name == name) {
            return Err(GenerationError::UnknownGenericPlaceholder {
                member: member.to_string(),
                name,
            });
        }
    }
    Ok(())
}
