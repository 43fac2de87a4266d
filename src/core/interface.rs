//! Structured description of an interface, as delivered by the front end.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::SemanticType;

/// Swift access levels that can be carried over from the interface to its spy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Open,
    Public,
    Package,
    Internal,
    Fileprivate,
    Private,
}

impl AccessLevel {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Public => "public",
            Self::Package => "package",
            Self::Internal => "internal",
            Self::Fileprivate => "fileprivate",
            Self::Private => "private",
        }
    }

    /// Access level a spy of an interface with this level should be given.
    /// Protocols cannot be `open`, and a `private` protocol at file scope
    /// behaves as `fileprivate`.
    pub fn for_spy(self) -> Self {
        match self {
            Self::Open => Self::Public,
            Self::Private => Self::Fileprivate,
            other => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenericParameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<String>,
}

impl GenericParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: None,
        }
    }

    pub fn constrained(name: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: Some(constraint.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    /// External label; `None` when the parameter is unlabeled (`_`).
    pub label: Option<String>,
    pub internal_name: String,
    pub ty: SemanticType,
    pub is_closure: bool,
    #[serde(default)]
    pub is_variadic: bool,
    /// Signature-only attributes such as `@escaping`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
}

impl Parameter {
    /// A parameter whose external label equals its internal name (`id: Int`).
    pub fn labeled(name: impl Into<String>, ty: SemanticType) -> Self {
        let name = name.into();
        Self::new(Some(name.clone()), name, ty)
    }

    /// An unlabeled parameter (`_ data: T`).
    pub fn unlabeled(name: impl Into<String>, ty: SemanticType) -> Self {
        Self::new(None, name, ty)
    }

    pub fn new(label: Option<String>, internal_name: impl Into<String>, ty: SemanticType) -> Self {
        let label = label.filter(|l| l != "_");
        let is_closure = ty.is_function();
        Self {
            label,
            internal_name: internal_name.into(),
            ty,
            is_closure,
            is_variadic: false,
            attributes: Vec::new(),
        }
    }

    pub fn variadic(mut self) -> Self {
        self.is_variadic = true;
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    /// Type of the value the function body actually sees: `T...` arrives as `[T]`.
    pub fn value_type(&self) -> SemanticType {
        if self.is_variadic {
            self.ty.clone().array()
        } else {
            self.ty.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionMember {
    pub name: String,
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub generic_parameters: Vec<GenericParameter>,
    #[serde(default)]
    pub is_async: bool,
    #[serde(default)]
    pub is_throwing: bool,
    /// `None` means `Void`.
    #[serde(default)]
    pub return_type: Option<SemanticType>,
}

impl FunctionMember {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            generic_parameters: Vec::new(),
            is_async: false,
            is_throwing: false,
            return_type: None,
        }
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_generic(mut self, generic: GenericParameter) -> Self {
        self.generic_parameters.push(generic);
        self
    }

    pub fn returning(mut self, ty: SemanticType) -> Self {
        self.return_type = Some(ty);
        self
    }

    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    pub fn throwing(mut self) -> Self {
        self.is_throwing = true;
        self
    }

    /// Declared return type with `Void` spelled out.
    pub fn effective_return(&self) -> SemanticType {
        self.return_type.clone().unwrap_or_else(SemanticType::void)
    }

    pub fn returns_value(&self) -> bool {
        self.return_type.as_ref().is_some_and(|ty| !ty.is_void())
    }

    pub fn generic_names(&self) -> Vec<&str> {
        self.generic_parameters.iter().map(|g| g.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptMember {
    pub parameters: Vec<Parameter>,
    pub return_type: SemanticType,
    pub is_settable: bool,
    #[serde(default)]
    pub generic_parameters: Vec<GenericParameter>,
    #[serde(default)]
    pub is_async: bool,
    #[serde(default)]
    pub is_throwing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "member", rename_all = "snake_case")]
pub enum Member {
    Property {
        name: String,
        ty: SemanticType,
        is_settable: bool,
    },
    Function(FunctionMember),
    Subscript(SubscriptMember),
}

impl Member {
    /// Human readable selector used in diagnostics, e.g. `fetch(id:)`.
    pub fn display_name(&self) -> String {
        match self {
            Self::Property { name, .. } => name.clone(),
            Self::Function(function) => selector(&function.name, &function.parameters),
            Self::Subscript(subscript) => selector("subscript", &subscript.parameters),
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

fn selector(base: &str, parameters: &[Parameter]) -> String {
    let labels: String = parameters
        .iter()
        .map(|p| format!("{}:", p.label.as_deref().unwrap_or("_")))
        .collect();
    format!("{}({})", base, labels)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterfaceSpecification {
    pub name: String,
    pub members: Vec<Member>,
    #[serde(default)]
    pub generic_parameters: Vec<GenericParameter>,
    #[serde(default)]
    pub access_level: Option<AccessLevel>,
    #[serde(default)]
    pub compilation_guard: Option<String>,
}

impl InterfaceSpecification {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            generic_parameters: Vec::new(),
            access_level: None,
            compilation_guard: None,
        }
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_function(self, function: FunctionMember) -> Self {
        self.with_member(Member::Function(function))
    }

    pub fn with_property(self, name: impl Into<String>, ty: SemanticType, is_settable: bool) -> Self {
        self.with_member(Member::Property {
            name: name.into(),
            ty,
            is_settable,
        })
    }

    pub fn with_generic(mut self, generic: GenericParameter) -> Self {
        self.generic_parameters.push(generic);
        self
    }

    pub fn with_access_level(mut self, level: AccessLevel) -> Self {
        self.access_level = Some(level);
        self
    }

    pub fn with_guard(mut self, guard: impl Into<String>) -> Self {
        self.compilation_guard = Some(guard.into());
        self
    }

    pub fn spy_name(&self) -> String {
        format!("{}Spy", self.name)
    }
}
