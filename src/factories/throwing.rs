//! Error injection for throwing members.

use super::SpySignature;
use crate::core::{GeneratedDeclaration, SemanticType, Statement};

pub fn fields(signature: &SpySignature) -> Vec<GeneratedDeclaration> {
    if !signature.is_throwing {
        return Vec::new();
    }
    vec![GeneratedDeclaration::stored(
        signature.names.throwable_error(),
        SemanticType::error().optional(),
    )]
}

/// Must run before closure and return-value logic so a configured error wins.
pub fn statements(signature: &SpySignature) -> Vec<Statement> {
    if !signature.is_throwing {
        return Vec::new();
    }
    vec![Statement::ThrowIfPresent {
        field: signature.names.throwable_error(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::FieldNames;

    #[test]
    fn test_non_throwing_emits_nothing() {
        let sig = SpySignature::new(FieldNames::new("load"), &[], &[], true, false, None);
        assert!(fields(&sig).is_empty());
        assert!(statements(&sig).is_empty());
    }

    #[test]
    fn test_throwing_emits_optional_error_and_guard() {
        let sig = SpySignature::new(FieldNames::new("load"), &[], &[], false, true, None);
        assert_eq!(
            fields(&sig),
            vec![GeneratedDeclaration::stored(
                "loadThrowableError",
                SemanticType::error().optional()
            )]
        );
        assert_eq!(
            statements(&sig),
            vec![Statement::ThrowIfPresent {
                field: "loadThrowableError".into()
            }]
        );
    }
}
