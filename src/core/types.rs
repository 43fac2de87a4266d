//! Semantic type model shared by the front end, the factories and the emitters.

use serde::{Deserialize, Serialize};

/// A type as the generator understands it.
///
/// `GenericPlaceholder` only ever names a generic parameter declared by the
/// enclosing function (or subscript). Interface-level generic parameters are
/// plain `Named` types and are never erased. A dotted path whose first
/// segment is a function-level generic becomes a `MemberType` over that
/// placeholder, so it is erased along with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SemanticType {
    Named {
        name: String,
    },
    Optional {
        wrapped: Box<SemanticType>,
    },
    ImplicitlyUnwrapped {
        wrapped: Box<SemanticType>,
    },
    Array {
        element: Box<SemanticType>,
    },
    Dictionary {
        key: Box<SemanticType>,
        value: Box<SemanticType>,
    },
    Tuple {
        elements: Vec<TupleElement>,
    },
    Applied {
        name: String,
        arguments: Vec<SemanticType>,
    },
    Function {
        params: Vec<SemanticType>,
        is_async: bool,
        is_throwing: bool,
        returns: Box<SemanticType>,
    },
    GenericPlaceholder {
        name: String,
    },
    /// Associated type reached through a generic parameter (`C.Element`).
    MemberType {
        base: Box<SemanticType>,
        member: String,
    },
    ErasedAny,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TupleElement {
    pub label: Option<String>,
    pub ty: SemanticType,
}

impl TupleElement {
    pub fn labeled(label: impl Into<String>, ty: SemanticType) -> Self {
        Self {
            label: Some(label.into()),
            ty,
        }
    }

    pub fn unlabeled(ty: SemanticType) -> Self {
        Self { label: None, ty }
    }
}

impl SemanticType {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named { name: name.into() }
    }

    pub fn placeholder(name: impl Into<String>) -> Self {
        Self::GenericPlaceholder { name: name.into() }
    }

    pub fn void() -> Self {
        Self::named("Void")
    }

    pub fn int() -> Self {
        Self::named("Int")
    }

    pub fn bool() -> Self {
        Self::named("Bool")
    }

    pub fn error() -> Self {
        Self::named("Error")
    }

    pub fn optional(self) -> Self {
        Self::Optional {
            wrapped: Box::new(self),
        }
    }

    pub fn implicitly_unwrapped(self) -> Self {
        Self::ImplicitlyUnwrapped {
            wrapped: Box::new(self),
        }
    }

    pub fn array(self) -> Self {
        Self::Array {
            element: Box::new(self),
        }
    }

    pub fn function(
        params: Vec<SemanticType>,
        is_async: bool,
        is_throwing: bool,
        returns: SemanticType,
    ) -> Self {
        Self::Function {
            params,
            is_async,
            is_throwing,
            returns: Box::new(returns),
        }
    }

    /// `Void` and the empty tuple both mean "returns nothing".
    pub fn is_void(&self) -> bool {
        match self {
            Self::Named { name } => name == "Void",
            Self::Tuple { elements } => elements.is_empty(),
            _ => false,
        }
    }

    /// Whether the type can already hold `nil`.
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional { .. } | Self::ImplicitlyUnwrapped { .. })
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Self::Function { .. })
    }

    /// Storage type for a test-configured value: optional types pass through,
    /// anything else becomes implicitly unwrapped so an unconfigured read faults.
    pub fn configurable(&self) -> Self {
        if self.is_optional() {
            self.clone()
        } else {
            self.clone().implicitly_unwrapped()
        }
    }

    /// `T!` spelled as `T?`, for positions where `!` is not allowed
    /// (cast targets, function type results).
    pub fn as_plain_optional(&self) -> Self {
        match self {
            Self::ImplicitlyUnwrapped { wrapped } => wrapped.as_ref().clone().optional(),
            other => other.clone(),
        }
    }

    /// Whether any generic placeholder occurs anywhere inside this type.
    pub fn references_placeholder(&self) -> bool {
        let mut found = false;
        self.visit(&mut |ty| {
            if matches!(ty, Self::GenericPlaceholder { .. }) {
                found = true;
            }
        });
        found
    }

    /// Placeholder names in first-occurrence order, without duplicates.
    pub fn placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        self.visit(&mut |ty| {
            if let Self::GenericPlaceholder { name } = ty {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        });
        names
    }

    /// Pre-order walk over this type and every nested type.
    pub fn visit(&self, f: &mut impl FnMut(&SemanticType)) {
        f(self);
        match self {
            Self::Optional { wrapped } | Self::ImplicitlyUnwrapped { wrapped } => wrapped.visit(f),
            Self::Array { element } => element.visit(f),
            Self::Dictionary { key, value } => {
                key.visit(f);
                value.visit(f);
            }
            Self::Tuple { elements } => elements.iter().for_each(|e| e.ty.visit(f)),
            Self::Applied { arguments, .. } => arguments.iter().for_each(|a| a.visit(f)),
            Self::MemberType { base, .. } => base.visit(f),
            Self::Function {
                params, returns, ..
            } => {
                params.iter().for_each(|p| p.visit(f));
                returns.visit(f);
            }
            Self::Named { .. } | Self::GenericPlaceholder { .. } | Self::ErasedAny => {}
        }
    }
}
