//! Declaration factories, one per concern of a spied member.
//!
//! Function-like members (functions and subscript accessors) are first
//! normalized into a [`SpySignature`], which already has the generics
//! substitution policy applied. The individual factories only ever look at
//! that normalized view.

pub mod call_counter;
pub mod closure;
pub mod property;
pub mod return_value;
pub mod subscript;
pub mod throwing;

use crate::core::{Expr, GeneratedDeclaration, GenericParameter, Parameter, SemanticType, Statement, TupleElement};
use crate::generics;
use crate::naming::FieldNames;

/// A parameter together with the type its recorded values are stored as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedParameter {
    pub parameter: Parameter,
    pub stored_type: SemanticType,
}

impl RecordedParameter {
    pub fn name(&self) -> &str {
        &self.parameter.internal_name
    }
}

/// Normalized function-like signature shared by all factories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpySignature {
    pub names: FieldNames,
    pub parameters: Vec<RecordedParameter>,
    pub is_async: bool,
    pub is_throwing: bool,
    /// Declared return type, `Void` when absent.
    pub return_type: SemanticType,
    /// Return type as stored in the spy, erased when generics are involved.
    pub stored_return: SemanticType,
    pub is_erased: bool,
}

impl SpySignature {
    pub fn new(
        names: FieldNames,
        parameters: &[Parameter],
        generic_parameters: &[GenericParameter],
        is_async: bool,
        is_throwing: bool,
        return_type: Option<&SemanticType>,
    ) -> Self {
        let is_erased = generics::engages(generic_parameters, parameters, return_type);
        let store = |ty: SemanticType| {
            if is_erased {
                generics::erase(&ty)
            } else {
                ty
            }
        };

        let recorded = parameters
            .iter()
            .map(|p| RecordedParameter {
                parameter: p.clone(),
                stored_type: store(p.value_type()),
            })
            .collect();
        let declared_return = return_type.cloned().unwrap_or_else(SemanticType::void);

        Self {
            names,
            parameters: recorded,
            is_async,
            is_throwing,
            stored_return: store(declared_return.clone()),
            return_type: declared_return,
            is_erased,
        }
    }

    pub fn returns_value(&self) -> bool {
        !self.return_type.is_void()
    }

    /// Values coming out of erased storage must be cast back to the declared type.
    pub fn return_needs_cast(&self) -> bool {
        self.stored_return != self.return_type
    }

    /// Element type of the invocation history: the single parameter's type,
    /// or a labeled tuple of all parameters.
    pub fn recorded_type(&self) -> SemanticType {
        match self.parameters.as_slice() {
            [single] => single.stored_type.clone(),
            many => SemanticType::Tuple {
                elements: many
                    .iter()
                    .map(|p| TupleElement::labeled(p.name(), p.stored_type.clone()))
                    .collect(),
            },
        }
    }

    /// Expression producing one history entry from the current arguments.
    pub fn recorded_value(&self) -> Expr {
        match self.parameters.as_slice() {
            [single] => Expr::ident(single.name()),
            many => Expr::Tuple {
                elements: many
                    .iter()
                    .map(|p| (p.name().to_string(), Expr::ident(p.name())))
                    .collect(),
            },
        }
    }

    pub fn arguments(&self) -> Vec<Expr> {
        self.parameters.iter().map(|p| Expr::ident(p.name())).collect()
    }

    /// Casts a value read from spy storage back to the declared return type.
    ///
    /// `as!` cannot target an implicitly unwrapped type, so `T!` is cast to `T?`.
    pub fn deliver(&self, value: Expr) -> Expr {
        if !self.return_needs_cast() {
            return value;
        }
        value.force_cast(self.return_type.as_plain_optional())
    }
}

/// Every stored and computed field one function-like member needs, in the
/// fixed factory order: counters, error, return value, closure.
pub fn state_fields(signature: &SpySignature) -> Vec<GeneratedDeclaration> {
    let mut fields = call_counter::fields(signature);
    fields.extend(throwing::fields(signature));
    fields.extend(return_value::fields(signature));
    fields.push(closure::field(signature));
    fields
}

/// Body of a function-like member: record the call, raise a configured error,
/// then prefer the closure over the stored return value.
pub fn body(signature: &SpySignature) -> Vec<Statement> {
    let mut statements = call_counter::statements(signature);
    statements.extend(throwing::statements(signature));
    statements.extend(closure::statements(
        signature,
        return_value::statements(signature),
    ));
    statements
}
