//! Interface documents: the serialized form of an interface the CLI reads.
//!
//! A document mirrors a Swift protocol declaration with types written as
//! Swift type strings:
//!
//! ```json
//! {
//!   "name": "UserService",
//!   "access_level": "public",
//!   "members": [
//!     { "kind": "property", "name": "token", "type": "String?", "settable": true },
//!     { "kind": "function", "name": "fetch",
//!       "parameters": [{ "name": "id", "type": "Int" }],
//!       "returns": "User", "async": true, "throws": true }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::type_parser::{parse_parameter_type, parse_type};
use crate::core::{
    AccessLevel, Error, FunctionMember, GenerationError, GenericParameter, InterfaceSpecification,
    Member, Parameter, Result, SubscriptMember, TypeParseError,
};
use crate::generator::FailureMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
    Toml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDocument {
    pub name: String,
    #[serde(default)]
    pub access_level: Option<AccessLevel>,
    /// `"Element"` or `"Element: Hashable"`
    #[serde(default)]
    pub generic_parameters: Vec<String>,
    #[serde(default)]
    pub compilation_guard: Option<String>,
    #[serde(default)]
    pub members: Vec<MemberDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemberDocument {
    Property {
        name: String,
        #[serde(rename = "type")]
        ty: String,
        #[serde(default)]
        settable: bool,
    },
    Function(FunctionDocument),
    Subscript(SubscriptDocument),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDocument {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<ParameterDocument>,
    #[serde(default)]
    pub generic_parameters: Vec<String>,
    #[serde(default, rename = "async")]
    pub is_async: bool,
    #[serde(default, rename = "throws")]
    pub is_throwing: bool,
    #[serde(default)]
    pub returns: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptDocument {
    #[serde(default)]
    pub parameters: Vec<ParameterDocument>,
    pub returns: String,
    #[serde(default)]
    pub settable: bool,
    #[serde(default)]
    pub generic_parameters: Vec<String>,
    #[serde(default, rename = "async")]
    pub is_async: bool,
    #[serde(default, rename = "throws")]
    pub is_throwing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDocument {
    /// Omitted: Swift's default (the name for functions, none for subscripts).
    #[serde(default)]
    pub label: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// Parses document text in the given format.
pub fn parse_document(contents: &str, format: DocumentFormat) -> Result<InterfaceDocument> {
    let document = match format {
        DocumentFormat::Json => serde_json::from_str(contents)?,
        DocumentFormat::Yaml => serde_yaml::from_str(contents)?,
        DocumentFormat::Toml => toml::from_str(contents)?,
    };
    Ok(document)
}

/// Reads and parses a document, picking the format from the file extension.
pub fn load_document(path: &Path) -> Result<InterfaceDocument> {
    let format = DocumentFormat::from_path(path).ok_or_else(|| {
        Error::document(path, "unknown extension (expected .json, .yaml, .yml or .toml)")
    })?;
    let contents = std::fs::read_to_string(path)?;
    parse_document(&contents, format).map_err(|e| Error::document(path, e.to_string()))
}

impl InterfaceDocument {
    /// Resolves every member into the structured model.
    ///
    /// In [`FailureMode::Isolate`] members whose types cannot be resolved are
    /// left out and returned as errors; in [`FailureMode::Abort`] the first
    /// such member fails the whole document.
    pub fn resolve(
        &self,
        mode: FailureMode,
    ) -> std::result::Result<(InterfaceSpecification, Vec<GenerationError>), GenerationError> {
        let mut spec = InterfaceSpecification::new(self.name.clone());
        spec.access_level = self.access_level;
        spec.compilation_guard = self.compilation_guard.clone();
        spec.generic_parameters = self
            .generic_parameters
            .iter()
            .map(|g| generic_parameter(g))
            .collect();

        let mut failures = Vec::new();
        for member in &self.members {
            match member.resolve() {
                Ok(resolved) => spec.members.push(resolved),
                Err(err) if mode == FailureMode::Isolate => failures.push(err),
                Err(err) => return Err(err),
            }
        }
        Ok((spec, failures))
    }
}

impl MemberDocument {
    /// Selector used to identify the member before it is resolved.
    pub fn display_name(&self) -> String {
        let selector = |base: &str, params: &[ParameterDocument], default_label: bool| {
            let labels: String = params
                .iter()
                .map(|p| {
                    let label = match (&p.label, default_label) {
                        (Some(label), _) => label.as_str(),
                        (None, true) => p.name.as_str(),
                        (None, false) => "_",
                    };
                    format!("{}:", label)
                })
                .collect();
            format!("{}({})", base, labels)
        };
        match self {
            Self::Property { name, .. } => name.clone(),
            Self::Function(f) => selector(&f.name, &f.parameters, true),
            Self::Subscript(s) => selector("subscript", &s.parameters, false),
        }
    }

    pub fn resolve(&self) -> std::result::Result<Member, GenerationError> {
        let member = self.display_name();
        let unsupported = |e: TypeParseError| GenerationError::unsupported(&member, e.to_string());

        match self {
            Self::Property { name, ty, settable } => Ok(Member::Property {
                name: name.clone(),
                ty: parse_type(ty, &[]).map_err(unsupported)?,
                is_settable: *settable,
            }),
            Self::Function(f) => {
                let generics: Vec<GenericParameter> =
                    f.generic_parameters.iter().map(|g| generic_parameter(g)).collect();
                let scope: Vec<&str> = generics.iter().map(|g| g.name.as_str()).collect();
                let parameters = f
                    .parameters
                    .iter()
                    .map(|p| resolve_parameter(p, true, &scope))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(unsupported)?;
                let return_type = f
                    .returns
                    .as_deref()
                    .map(|r| parse_type(r, &scope))
                    .transpose()
                    .map_err(unsupported)?;
                Ok(Member::Function(FunctionMember {
                    name: f.name.clone(),
                    parameters,
                    generic_parameters: generics,
                    is_async: f.is_async,
                    is_throwing: f.is_throwing,
                    return_type,
                }))
            }
            Self::Subscript(s) => {
                let generics: Vec<GenericParameter> =
                    s.generic_parameters.iter().map(|g| generic_parameter(g)).collect();
                let scope: Vec<&str> = generics.iter().map(|g| g.name.as_str()).collect();
                let parameters = s
                    .parameters
                    .iter()
                    .map(|p| resolve_parameter(p, false, &scope))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(unsupported)?;
                Ok(Member::Subscript(SubscriptMember {
                    parameters,
                    return_type: parse_type(&s.returns, &scope).map_err(unsupported)?,
                    is_settable: s.settable,
                    generic_parameters: generics,
                    is_async: s.is_async,
                    is_throwing: s.is_throwing,
                }))
            }
        }
    }
}

fn resolve_parameter(
    doc: &ParameterDocument,
    label_defaults_to_name: bool,
    scope: &[&str],
) -> std::result::Result<Parameter, TypeParseError> {
    let parsed = parse_parameter_type(&doc.ty, scope)?;
    let label = match &doc.label {
        Some(label) => Some(label.clone()),
        None if label_defaults_to_name => Some(doc.name.clone()),
        None => None,
    };
    let mut parameter = Parameter::new(label, doc.name.clone(), parsed.ty);
    parameter.is_variadic = parsed.is_variadic;
    parameter.attributes = parsed.attributes;
    Ok(parameter)
}

fn generic_parameter(text: &str) -> GenericParameter {
    match text.split_once(':') {
        Some((name, constraint)) => GenericParameter::constrained(name.trim(), constraint.trim()),
        None => GenericParameter::new(text.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SemanticType;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    const SERVICE_JSON: &str = r#"{
        "name": "UserService",
        "access_level": "public",
        "members": [
            { "kind": "property", "name": "token", "type": "String?", "settable": true },
            { "kind": "function", "name": "fetch",
              "parameters": [{ "name": "id", "type": "Int" }],
              "returns": "User", "async": true, "throws": true },
            { "kind": "function", "name": "wrap", "generic_parameters": ["T: Codable"],
              "parameters": [{ "label": "_", "name": "data", "type": "T" }],
              "returns": "[T]" }
        ]
    }"#;

    #[test]
    fn test_parse_json_document() {
        let doc = parse_document(SERVICE_JSON, DocumentFormat::Json).unwrap();
        assert_eq!(doc.name, "UserService");
        assert_eq!(doc.members.len(), 3);

        let (spec, failures) = doc.resolve(FailureMode::Abort).unwrap();
        assert!(failures.is_empty());
        assert_eq!(spec.access_level, Some(AccessLevel::Public));

        match &spec.members[1] {
            Member::Function(f) => {
                assert_eq!(f.parameters[0].label.as_deref(), Some("id"));
                assert!(f.is_async && f.is_throwing);
                assert_eq!(f.return_type, Some(SemanticType::named("User")));
            }
            other => panic!("unexpected member {:?}", other),
        }
        match &spec.members[2] {
            Member::Function(f) => {
                assert_eq!(f.generic_parameters, vec![GenericParameter::constrained("T", "Codable")]);
                assert_eq!(f.parameters[0].label, None);
                assert_eq!(f.parameters[0].ty, SemanticType::placeholder("T"));
                assert_eq!(f.return_type, Some(SemanticType::placeholder("T").array()));
            }
            other => panic!("unexpected member {:?}", other),
        }
    }

    #[test]
    fn test_parse_yaml_and_toml_documents() {
        let yaml = indoc! {r#"
            name: Cache
            members:
              - kind: subscript
                parameters:
                  - name: key
                    type: String
                returns: Data?
                settable: true
        "#};
        let doc = parse_document(yaml, DocumentFormat::Yaml).unwrap();
        let (spec, _) = doc.resolve(FailureMode::Abort).unwrap();
        match &spec.members[0] {
            Member::Subscript(s) => {
                assert_eq!(s.parameters[0].label, None);
                assert!(s.is_settable);
            }
            other => panic!("unexpected member {:?}", other),
        }

        let toml_doc = indoc! {r#"
            name = "Clock"
            compilation_guard = "DEBUG"

            [[members]]
            kind = "function"
            name = "sleep"
            async = true
            parameters = [{ label = "for", name = "duration", type = "Duration" }]
        "#};
        let doc = parse_document(toml_doc, DocumentFormat::Toml).unwrap();
        let (spec, _) = doc.resolve(FailureMode::Abort).unwrap();
        assert_eq!(spec.compilation_guard.as_deref(), Some("DEBUG"));
        assert_eq!(spec.members[0].display_name(), "sleep(for:)");
    }

    #[test]
    fn test_unparseable_member_is_isolated() {
        let doc = InterfaceDocument {
            name: "Broken".into(),
            access_level: None,
            generic_parameters: vec![],
            compilation_guard: None,
            members: vec![
                MemberDocument::Function(FunctionDocument {
                    name: "update".into(),
                    parameters: vec![ParameterDocument {
                        label: None,
                        name: "value".into(),
                        ty: "inout Int".into(),
                    }],
                    generic_parameters: vec![],
                    is_async: false,
                    is_throwing: false,
                    returns: None,
                }),
                MemberDocument::Property {
                    name: "count".into(),
                    ty: "Int".into(),
                    settable: false,
                },
            ],
        };

        let err = doc.resolve(FailureMode::Abort).unwrap_err();
        assert_eq!(err.member(), Some("update(value:)"));

        let (spec, failures) = doc.resolve(FailureMode::Isolate).unwrap();
        assert_eq!(spec.members.len(), 1);
        assert_eq!(failures.len(), 1);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("a/Service.YML")),
            Some(DocumentFormat::Yaml)
        );
        assert_eq!(DocumentFormat::from_path(Path::new("Service.swift")), None);
    }
}
