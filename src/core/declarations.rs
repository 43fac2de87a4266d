//! Structured output of the generator, consumed by the emitters.

use serde::{Deserialize, Serialize};

use super::interface::{AccessLevel, GenericParameter, Parameter};
use super::types::SemanticType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "expr", rename_all = "snake_case")]
pub enum Expr {
    Identifier { name: String },
    IntLiteral { value: i64 },
    EmptyArray,
    /// Labeled tuple literal, e.g. `(id: id, name: name)`.
    Tuple { elements: Vec<(String, Expr)> },
    Greater { lhs: Box<Expr>, rhs: Box<Expr> },
    ForceUnwrap { inner: Box<Expr> },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
        optional_chained: bool,
    },
    Try { inner: Box<Expr> },
    Await { inner: Box<Expr> },
    ForceCast { inner: Box<Expr>, ty: SemanticType },
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Identifier { name: name.into() }
    }

    pub fn int(value: i64) -> Self {
        Self::IntLiteral { value }
    }

    pub fn force_cast(self, ty: SemanticType) -> Self {
        Self::ForceCast {
            inner: Box::new(self),
            ty,
        }
    }

    /// Wraps the expression in `try`/`await` as the callee's effects require.
    pub fn with_effects(self, is_async: bool, is_throwing: bool) -> Self {
        let awaited = if is_async {
            Self::Await {
                inner: Box::new(self),
            }
        } else {
            self
        };
        if is_throwing {
            Self::Try {
                inner: Box::new(awaited),
            }
        } else {
            awaited
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stmt", rename_all = "snake_case")]
pub enum Statement {
    /// `target += 1`
    Increment { target: String },
    Assign { target: String, value: Expr },
    /// `target.append(value)`
    Append { target: String, value: Expr },
    /// `if let error = field { throw error }`
    ThrowIfPresent { field: String },
    /// `if field != nil { then } else { otherwise }`
    IfPresent {
        field: String,
        then: Vec<Statement>,
        otherwise: Vec<Statement>,
    },
    Return { value: Option<Expr> },
    Expression { expr: Expr },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub name: String,
    pub generic_parameters: Vec<GenericParameter>,
    pub parameters: Vec<Parameter>,
    pub is_async: bool,
    pub is_throwing: bool,
    pub return_type: Option<SemanticType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptSignature {
    pub generic_parameters: Vec<GenericParameter>,
    pub parameters: Vec<Parameter>,
    pub return_type: SemanticType,
    pub is_async: bool,
    pub is_throwing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "declaration", rename_all = "snake_case")]
pub enum GeneratedDeclaration {
    StoredField {
        name: String,
        ty: SemanticType,
        default_value: Option<Expr>,
    },
    ComputedProperty {
        name: String,
        ty: SemanticType,
        getter: Vec<Statement>,
        setter: Option<Vec<Statement>>,
    },
    FunctionImplementation {
        signature: FunctionSignature,
        statements: Vec<Statement>,
    },
    SubscriptImplementation {
        signature: SubscriptSignature,
        getter: Vec<Statement>,
        setter: Option<Vec<Statement>>,
    },
}

impl GeneratedDeclaration {
    pub fn stored(name: impl Into<String>, ty: SemanticType) -> Self {
        Self::StoredField {
            name: name.into(),
            ty,
            default_value: None,
        }
    }

    pub fn stored_with_default(name: impl Into<String>, ty: SemanticType, default: Expr) -> Self {
        Self::StoredField {
            name: name.into(),
            ty,
            default_value: Some(default),
        }
    }

    /// Name of the declared field or property; implementations have none.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Self::StoredField { name, .. } | Self::ComputedProperty { name, .. } => Some(name),
            Self::FunctionImplementation { .. } | Self::SubscriptImplementation { .. } => None,
        }
    }

    /// Declared type of a field or property.
    pub fn field_type(&self) -> Option<&SemanticType> {
        match self {
            Self::StoredField { ty, .. } | Self::ComputedProperty { ty, .. } => Some(ty),
            Self::FunctionImplementation { .. } | Self::SubscriptImplementation { .. } => None,
        }
    }

    pub fn is_implementation(&self) -> bool {
        self.field_name().is_none()
    }
}

/// The complete spy type handed to an emitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSpy {
    pub name: String,
    pub conforms_to: String,
    pub access_level: Option<AccessLevel>,
    pub generic_parameters: Vec<GenericParameter>,
    pub members: Vec<GeneratedDeclaration>,
    pub compilation_guard: Option<String>,
}

impl GeneratedSpy {
    pub fn field(&self, name: &str) -> Option<&GeneratedDeclaration> {
        self.members.iter().find(|d| d.field_name() == Some(name))
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.members.iter().filter_map(|d| d.field_name()).collect()
    }

    pub fn function(&self, name: &str) -> Option<&GeneratedDeclaration> {
        self.members.iter().find(|d| {
            matches!(d, GeneratedDeclaration::FunctionImplementation { signature, .. } if signature.name == name)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effects_wrap_try_outside_await() {
        let call = Expr::ident("run").with_effects(true, true);
        assert_eq!(
            call,
            Expr::Try {
                inner: Box::new(Expr::Await {
                    inner: Box::new(Expr::ident("run"))
                })
            }
        );
        assert_eq!(Expr::ident("run").with_effects(false, false), Expr::ident("run"));
    }

    #[test]
    fn test_field_name_only_for_fields() {
        let field = GeneratedDeclaration::stored("fooCallsCount", SemanticType::int());
        assert_eq!(field.field_name(), Some("fooCallsCount"));
        assert!(!field.is_implementation());
    }
}
