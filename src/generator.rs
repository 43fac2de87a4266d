//! Member assembly: turns an [`InterfaceSpecification`] into a [`GeneratedSpy`].
//!
//! Each member is generated independently and in declaration order. The only
//! whole-interface step is the prefix pre-pass, which decides how overloads
//! sharing a label-derived prefix are named.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, debug_span, warn};

use crate::core::{
    FunctionMember, FunctionSignature, GeneratedDeclaration, GeneratedSpy, GenerationError,
    GenericParameter, InterfaceSpecification, Member, Parameter,
};
use crate::factories::{self, property, subscript, SpySignature};
use crate::generics::validate_generics;
use crate::naming::{self, FieldNames};

/// What to do when one member cannot be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// The whole interface fails on the first bad member
    #[default]
    Abort,
    /// Bad members are skipped and reported alongside the partial spy
    Isolate,
}

/// How to name overloads whose label-derived prefixes coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverloadPolicy {
    /// Keep the plain prefixes even when they collide
    Preserve,
    /// Append parameter (and if needed return) type suffixes to colliding prefixes
    #[default]
    Disambiguate,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub failure_mode: FailureMode,
    pub overloads: OverloadPolicy,
    /// Guard used when the interface does not carry its own.
    pub default_guard: Option<String>,
}

/// A generated spy plus the members that were skipped in isolate mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub spy: GeneratedSpy,
    pub failures: Vec<GenerationError>,
}

impl GenerationReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Stateless generator; one instance can serve any number of interfaces.
#[derive(Debug, Clone, Default)]
pub struct SpyGenerator {
    options: GenerationOptions,
}

impl SpyGenerator {
    pub fn new(options: GenerationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    pub fn generate(
        &self,
        spec: &InterfaceSpecification,
    ) -> Result<GenerationReport, GenerationError> {
        let _span = debug_span!("generate_spy", interface = %spec.name).entered();

        if spec.name.trim().is_empty() {
            return Err(GenerationError::InvalidInterface(
                "interface name is empty".to_string(),
            ));
        }

        let mut failures = Vec::new();
        let mut valid = Vec::with_capacity(spec.members.len());
        for member in &spec.members {
            match validate_member(member, &spec.generic_parameters) {
                Ok(()) => valid.push(member),
                Err(err) => self.record_failure(err, &mut failures)?,
            }
        }

        let prefixes = assign_prefixes(&valid, self.options.overloads);
        let mut members = Vec::new();
        // Names claimed by earlier members; preserved overloads share theirs.
        let mut taken = HashSet::new();
        for (member, prefix) in valid.iter().zip(prefixes) {
            let declarations = member_declarations(member, prefix);
            match check_unique_names(member, &declarations, &taken) {
                Ok(()) => {
                    if self.options.overloads == OverloadPolicy::Disambiguate {
                        taken.extend(
                            declarations
                                .iter()
                                .filter_map(|d| d.field_name())
                                .map(str::to_string),
                        );
                    }
                    debug!(
                        member = %member,
                        declarations = declarations.len(),
                        "Generated member"
                    );
                    members.extend(declarations);
                }
                Err(err) => self.record_failure(err, &mut failures)?,
            }
        }

        let spy = GeneratedSpy {
            name: spec.spy_name(),
            conforms_to: spec.name.clone(),
            access_level: spec.access_level.map(|level| level.for_spy()),
            generic_parameters: spec.generic_parameters.clone(),
            members,
            compilation_guard: spec
                .compilation_guard
                .clone()
                .or_else(|| self.options.default_guard.clone()),
        };
        debug!(
            spy = %spy.name,
            members = spy.members.len(),
            failures = failures.len(),
            "Spy generation complete"
        );
        Ok(GenerationReport { spy, failures })
    }

    fn record_failure(
        &self,
        err: GenerationError,
        failures: &mut Vec<GenerationError>,
    ) -> Result<(), GenerationError> {
        match self.options.failure_mode {
            FailureMode::Abort => Err(err),
            FailureMode::Isolate => {
                warn!(error = %err, "Skipping member");
                failures.push(err);
                Ok(())
            }
        }
    }
}

/// Generates a spy with default options, failing on the first bad member.
pub fn generate_spy(spec: &InterfaceSpecification) -> Result<GeneratedSpy, GenerationError> {
    SpyGenerator::default().generate(spec).map(|report| report.spy)
}

fn validate_member(
    member: &Member,
    interface_generics: &[GenericParameter],
) -> Result<(), GenerationError> {
    match member {
        Member::Property { name, ty, .. } => {
            if name.trim().is_empty() {
                return Err(GenerationError::InvalidInterface(
                    "property with an empty name".to_string(),
                ));
            }
            match ty.placeholders().into_iter().next() {
                Some(name) => Err(GenerationError::UnknownGenericPlaceholder {
                    member: member.display_name(),
                    name,
                }),
                None => Ok(()),
            }
        }
        Member::Function(function) => {
            if function.name.trim().is_empty() {
                return Err(GenerationError::InvalidInterface(
                    "function with an empty name".to_string(),
                ));
            }
            validate_parameters(member, &function.parameters)?;
            validate_generics(
                &member.display_name(),
                &function.generic_parameters,
                interface_generics,
                &function.parameters,
                function.return_type.as_ref(),
            )
        }
        Member::Subscript(subscript) => {
            if subscript.is_settable && (subscript.is_async || subscript.is_throwing) {
                return Err(GenerationError::EffectfulSettableSubscript {
                    member: member.display_name(),
                });
            }
            validate_parameters(member, &subscript.parameters)?;
            validate_generics(
                &member.display_name(),
                &subscript.generic_parameters,
                interface_generics,
                &subscript.parameters,
                Some(&subscript.return_type),
            )
        }
    }
}

fn validate_parameters(
    member: &Member,
    parameters: &[Parameter],
) -> Result<(), GenerationError> {
    match parameters.iter().find(|p| p.internal_name.trim().is_empty()) {
        Some(_) => Err(GenerationError::unsupported(
            member.display_name(),
            "parameter without an internal name",
        )),
        None => Ok(()),
    }
}

/// Prefix of every function and subscript (`None` for properties), with
/// colliding prefixes resolved according to `policy`.
fn assign_prefixes(members: &[&Member], policy: OverloadPolicy) -> Vec<Option<String>> {
    let base: Vec<Option<String>> = members.iter().map(|m| base_prefix(m)).collect();
    if policy == OverloadPolicy::Preserve {
        return base;
    }

    let collisions = colliding(&base);
    let by_params: Vec<Option<String>> = members
        .iter()
        .zip(&base)
        .map(|(member, prefix)| match prefix {
            Some(p) if collisions.contains(p.as_str()) => Some(extended_prefix(member, p, false)),
            other => other.clone(),
        })
        .collect();

    let still_colliding = colliding(&by_params);
    let by_return: Vec<Option<String>> = members
        .iter()
        .zip(base.iter().zip(by_params))
        .map(|(member, (original, extended))| match extended {
            Some(p) if still_colliding.contains(p.as_str()) => original
                .as_deref()
                .map(|b| extended_prefix(member, b, true)),
            other => other,
        })
        .collect();

    // Type suffixes are concatenated, so distinct signatures can still spell
    // the same prefix (`[Int]` and `Int, Array`). Number what is left.
    let remaining = colliding(&by_return);
    let mut ordinals: HashMap<String, usize> = HashMap::new();
    by_return
        .into_iter()
        .map(|prefix| match prefix {
            Some(p) if remaining.contains(p.as_str()) => {
                let ordinal = ordinals.entry(p.clone()).or_default();
                *ordinal += 1;
                Some(format!("{}{}", p, ordinal))
            }
            other => other,
        })
        .collect()
}

fn base_prefix(member: &Member) -> Option<String> {
    match member {
        Member::Property { .. } => None,
        Member::Function(function) => {
            Some(naming::variable_prefix(&function.name, &function.parameters))
        }
        Member::Subscript(subscript) => Some(naming::subscript_prefix(&subscript.parameters)),
    }
}

fn extended_prefix(member: &Member, prefix: &str, with_return: bool) -> String {
    match member {
        Member::Function(function) => naming::disambiguated_prefix(
            prefix,
            &function.parameters,
            with_return.then(|| function.effective_return()).as_ref(),
        ),
        Member::Subscript(subscript) => naming::disambiguated_prefix(
            prefix,
            &subscript.parameters,
            with_return.then_some(&subscript.return_type),
        ),
        Member::Property { .. } => prefix.to_string(),
    }
}

fn colliding(prefixes: &[Option<String>]) -> HashSet<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for prefix in prefixes.iter().flatten() {
        *counts.entry(prefix.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(prefix, _)| prefix.to_string())
        .collect()
}

fn member_declarations(member: &Member, prefix: Option<String>) -> Vec<GeneratedDeclaration> {
    let prefix = prefix.or_else(|| base_prefix(member)).unwrap_or_default();
    match member {
        Member::Property {
            name,
            ty,
            is_settable,
        } => property::declarations(name, ty, *is_settable),
        Member::Function(function) => function_declarations(function, &prefix),
        Member::Subscript(subscript) => subscript::declarations(subscript, &prefix),
    }
}

/// Counter, error, return-value and closure fields, then the implementation.
pub fn function_declarations(function: &FunctionMember, prefix: &str) -> Vec<GeneratedDeclaration> {
    let signature = SpySignature::new(
        FieldNames::new(prefix),
        &function.parameters,
        &function.generic_parameters,
        function.is_async,
        function.is_throwing,
        function.return_type.as_ref(),
    );

    let mut declarations = factories::state_fields(&signature);
    declarations.push(GeneratedDeclaration::FunctionImplementation {
        signature: FunctionSignature {
            name: function.name.clone(),
            generic_parameters: function.generic_parameters.clone(),
            parameters: function.parameters.clone(),
            is_async: function.is_async,
            is_throwing: function.is_throwing,
            return_type: function.return_type.clone(),
        },
        statements: factories::body(&signature),
    });
    declarations
}

fn check_unique_names(
    member: &Member,
    declarations: &[GeneratedDeclaration],
    taken: &HashSet<String>,
) -> Result<(), GenerationError> {
    let mut seen = HashSet::new();
    for name in declarations.iter().filter_map(|d| d.field_name()) {
        if !seen.insert(name) || taken.contains(name) {
            return Err(GenerationError::DuplicateFieldName {
                member: member.display_name(),
                field: name.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AccessLevel, SemanticType, SubscriptMember};
    use pretty_assertions::assert_eq;

    fn fetch_overloads() -> InterfaceSpecification {
        InterfaceSpecification::new("Repository")
            .with_function(
                FunctionMember::new("fetch")
                    .with_parameter(Parameter::labeled("id", SemanticType::int()))
                    .returning(SemanticType::named("User")),
            )
            .with_function(
                FunctionMember::new("fetch")
                    .with_parameter(Parameter::labeled("id", SemanticType::named("String")))
                    .returning(SemanticType::named("User")),
            )
    }

    #[test]
    fn test_members_are_generated_in_declaration_order() {
        let spec = InterfaceSpecification::new("Clock")
            .with_property("now", SemanticType::named("Date"), false)
            .with_function(FunctionMember::new("tick"));
        let spy = generate_spy(&spec).unwrap();

        assert_eq!(spy.name, "ClockSpy");
        assert_eq!(spy.conforms_to, "Clock");
        assert_eq!(
            spy.field_names(),
            vec!["now", "underlyingNow", "tickCallsCount", "tickCalled", "tickClosure"]
        );
        assert!(spy.members.last().unwrap().is_implementation());
    }

    #[test]
    fn test_overloads_are_disambiguated_by_default() {
        let spy = generate_spy(&fetch_overloads()).unwrap();
        assert!(spy.field("fetchIdIntCallsCount").is_some());
        assert!(spy.field("fetchIdStringCallsCount").is_some());
        assert!(spy.field("fetchIdCallsCount").is_none());
    }

    #[test]
    fn test_overloads_differing_only_in_return_type() {
        let spec = InterfaceSpecification::new("Decoder")
            .with_function(
                FunctionMember::new("decode")
                    .with_parameter(Parameter::unlabeled("data", SemanticType::named("Data")))
                    .returning(SemanticType::int()),
            )
            .with_function(
                FunctionMember::new("decode")
                    .with_parameter(Parameter::unlabeled("data", SemanticType::named("Data")))
                    .returning(SemanticType::named("String")),
            );
        let spy = generate_spy(&spec).unwrap();
        assert!(spy.field("decodeDataReturningIntCallsCount").is_some());
        assert!(spy.field("decodeDataReturningStringCallsCount").is_some());
    }

    #[test]
    fn test_overloads_with_same_concatenated_suffix_are_numbered() {
        let spec = InterfaceSpecification::new("Filter")
            .with_function(
                FunctionMember::new("f")
                    .with_parameter(Parameter::unlabeled("values", SemanticType::int().array())),
            )
            .with_function(
                FunctionMember::new("f")
                    .with_parameter(Parameter::unlabeled("value", SemanticType::int()))
                    .with_parameter(Parameter::unlabeled("other", SemanticType::named("Array"))),
            );
        let spy = generate_spy(&spec).unwrap();

        let counters: Vec<&str> = spy
            .field_names()
            .into_iter()
            .filter(|n| n.ends_with("CallsCount"))
            .collect();
        assert_eq!(
            counters,
            vec![
                "fIntArrayReturningVoid1CallsCount",
                "fIntArrayReturningVoid2CallsCount"
            ]
        );
        let names = spy.field_names();
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_field_name_claimed_by_earlier_member_is_rejected() {
        let spec = InterfaceSpecification::new("Clock")
            .with_function(FunctionMember::new("tick"))
            .with_property("tickCalled", SemanticType::bool(), false);
        let err = generate_spy(&spec).unwrap_err();
        assert_eq!(
            err,
            GenerationError::DuplicateFieldName {
                member: "tickCalled".into(),
                field: "tickCalled".into()
            }
        );
    }

    #[test]
    fn test_preserve_policy_keeps_inherited_collision() {
        let generator = SpyGenerator::new(GenerationOptions {
            overloads: OverloadPolicy::Preserve,
            ..GenerationOptions::default()
        });
        let report = generator.generate(&fetch_overloads()).unwrap();
        let counts = report
            .spy
            .field_names()
            .into_iter()
            .filter(|n| *n == "fetchIdCallsCount")
            .count();
        assert_eq!(counts, 2);
    }

    #[test]
    fn test_abort_mode_fails_whole_unit() {
        let spec = InterfaceSpecification::new("Store")
            .with_generic(GenericParameter::new("Item"))
            .with_function(FunctionMember::new("put").with_generic(GenericParameter::new("Item")));
        let err = generate_spy(&spec).unwrap_err();
        assert!(matches!(err, GenerationError::GenericNameCollision { .. }));
    }

    #[test]
    fn test_isolate_mode_skips_bad_member() {
        let spec = InterfaceSpecification::new("Store")
            .with_generic(GenericParameter::new("Item"))
            .with_function(FunctionMember::new("put").with_generic(GenericParameter::new("Item")))
            .with_function(FunctionMember::new("clear"));
        let generator = SpyGenerator::new(GenerationOptions {
            failure_mode: FailureMode::Isolate,
            ..GenerationOptions::default()
        });

        let report = generator.generate(&spec).unwrap();
        assert!(!report.is_complete());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].member(), Some("put()"));
        assert!(report.spy.field("clearCallsCount").is_some());
        assert!(report.spy.field("putCallsCount").is_none());
    }

    #[test]
    fn test_duplicate_field_in_member_is_rejected() {
        let spec = InterfaceSpecification::new("Mover").with_function(
            FunctionMember::new("move")
                .with_parameter(Parameter::unlabeled("arguments", SemanticType::int()))
                .with_parameter(Parameter::unlabeled("other", SemanticType::int())),
        );
        let err = generate_spy(&spec).unwrap_err();
        assert_eq!(
            err,
            GenerationError::DuplicateFieldName {
                member: "move(_:_:)".into(),
                field: "moveReceivedArguments".into()
            }
        );
    }

    #[test]
    fn test_effectful_settable_subscript_is_rejected() {
        let spec = InterfaceSpecification::new("Cache").with_member(Member::Subscript(
            SubscriptMember {
                parameters: vec![Parameter::unlabeled("key", SemanticType::named("String"))],
                return_type: SemanticType::named("Data"),
                is_settable: true,
                generic_parameters: vec![],
                is_async: true,
                is_throwing: false,
            },
        ));
        assert!(matches!(
            generate_spy(&spec),
            Err(GenerationError::EffectfulSettableSubscript { .. })
        ));
    }

    #[test]
    fn test_access_level_and_guard_are_forwarded() {
        let spec = InterfaceSpecification::new("Api")
            .with_access_level(AccessLevel::Open)
            .with_function(FunctionMember::new("ping"));
        let generator = SpyGenerator::new(GenerationOptions {
            default_guard: Some("DEBUG".into()),
            ..GenerationOptions::default()
        });
        let spy = generator.generate(&spec).unwrap().spy;
        assert_eq!(spy.access_level, Some(AccessLevel::Public));
        assert_eq!(spy.compilation_guard.as_deref(), Some("DEBUG"));

        let own_guard = spec.clone().with_guard("TESTING");
        let spy = generator.generate(&own_guard).unwrap().spy;
        assert_eq!(spy.compilation_guard.as_deref(), Some("TESTING"));
    }

    #[test]
    fn test_empty_interface_name_is_invalid() {
        let err = generate_spy(&InterfaceSpecification::new(" ")).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidInterface(_)));
    }
}
