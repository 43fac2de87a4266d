//! Naming strategy for generated spy state.
//!
//! Every function gets a *variable prefix* built from its base name and its
//! external parameter labels (`fetch(id:)` becomes `fetchId`). All tracking and
//! configuration fields of that function are the prefix plus a fixed suffix.

use crate::core::{Parameter, SemanticType};

/// Uppercases the first character and leaves the rest untouched.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Base name followed by every non-`_` external label, capitalized.
pub fn variable_prefix(name: &str, parameters: &[Parameter]) -> String {
    parameters
        .iter()
        .filter_map(|p| p.label.as_deref())
        .filter(|label| *label != "_")
        .fold(name.to_string(), |mut prefix, label| {
            prefix.push_str(&capitalize(label));
            prefix
        })
}

/// Backing storage name for a spied property.
pub fn underlying_name(property: &str) -> String {
    format!("underlying{}", capitalize(property))
}

/// Subscripts have no name; the prefix comes from labels, or types when unlabeled.
pub fn subscript_prefix(parameters: &[Parameter]) -> String {
    parameters
        .iter()
        .fold("subscript".to_string(), |mut prefix, param| {
            match param.label.as_deref() {
                Some(label) if label != "_" => prefix.push_str(&capitalize(label)),
                _ => prefix.push_str(&type_suffix(&param.ty)),
            }
            prefix
        })
}

/// Identifier-safe spelling of a type, used to derive names.
pub fn type_suffix(ty: &SemanticType) -> String {
    match ty {
        SemanticType::Named { name } => identifier_chars(name),
        SemanticType::GenericPlaceholder { name } => capitalize(name),
        SemanticType::MemberType { base, member } => {
            format!("{}{}", type_suffix(base), identifier_chars(member))
        }
        SemanticType::ErasedAny => "Any".to_string(),
        SemanticType::Optional { wrapped } => format!("{}Optional", type_suffix(wrapped)),
        SemanticType::ImplicitlyUnwrapped { wrapped } => type_suffix(wrapped),
        SemanticType::Array { element } => format!("{}Array", type_suffix(element)),
        SemanticType::Dictionary { key, value } => {
            format!("{}{}Dictionary", type_suffix(key), type_suffix(value))
        }
        SemanticType::Tuple { elements } if elements.is_empty() => "Void".to_string(),
        SemanticType::Tuple { elements } => elements.iter().map(|e| type_suffix(&e.ty)).collect(),
        SemanticType::Applied { name, arguments } => arguments
            .iter()
            .fold(identifier_chars(name), |mut acc, arg| {
                acc.push_str(&type_suffix(arg));
                acc
            }),
        SemanticType::Function { .. } => "Closure".to_string(),
    }
}

/// Keeps alphanumerics of each word and capitalizes word starts
/// (`Foo.Bar` becomes `FooBar`, `any Error` becomes `AnyError`).
fn identifier_chars(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect()
}

/// Prefix extended with the parameter types, used to separate overloads that
/// share a label-derived prefix.
pub fn disambiguated_prefix(
    prefix: &str,
    parameters: &[Parameter],
    return_type: Option<&SemanticType>,
) -> String {
    let mut name = parameters.iter().fold(prefix.to_string(), |mut acc, p| {
        acc.push_str(&type_suffix(&p.value_type()));
        acc
    });
    if let Some(ty) = return_type {
        name.push_str("Returning");
        name.push_str(&type_suffix(ty));
    }
    name
}

/// Names of every field generated for one function (or subscript accessor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    prefix: String,
}

impl FieldNames {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn calls_count(&self) -> String {
        format!("{}CallsCount", self.prefix)
    }

    pub fn called(&self) -> String {
        format!("{}Called", self.prefix)
    }

    pub fn received(&self, parameter: &Parameter) -> String {
        format!("{}Received{}", self.prefix, capitalize(&parameter.internal_name))
    }

    pub fn received_arguments(&self) -> String {
        format!("{}ReceivedArguments", self.prefix)
    }

    pub fn received_invocations(&self) -> String {
        format!("{}ReceivedInvocations", self.prefix)
    }

    pub fn throwable_error(&self) -> String {
        format!("{}ThrowableError", self.prefix)
    }

    pub fn return_value(&self) -> String {
        format!("{}ReturnValue", self.prefix)
    }

    pub fn closure(&self) -> String {
        format!("{}Closure", self.prefix)
    }
}
