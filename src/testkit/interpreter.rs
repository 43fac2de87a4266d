//! Evaluator for generated spy declarations.
//!
//! Executes the statement IR of a [`GeneratedSpy`] the way the emitted Swift
//! would run, so behavioral properties (counting, recording, error
//! pre-emption, closure precedence, unwrap and cast faults) can be checked
//! without a Swift toolchain.
//!
//! ```rust,ignore
//! use spygen::testkit::{fetch_service, SpyInstance, Value};
//!
//! let spy = spygen::generate_spy(&fetch_service()).unwrap();
//! let mut instance = SpyInstance::new(&spy);
//! instance.set("fetchIdReturnValue", Value::str("ok")).unwrap();
//! assert_eq!(instance.invoke("fetch", vec![Value::Int(1)]), Ok(Value::str("ok")));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::core::{
    Expr, GeneratedDeclaration, GeneratedSpy, Parameter, SemanticType, Statement,
};
use crate::render::render_type;

type NativeFn = dyn Fn(Vec<Value>) -> Result<Value, Fault>;

/// A closure value stored into a spy's `*Closure` field.
#[derive(Clone)]
pub struct NativeClosure(Rc<NativeFn>);

impl fmt::Debug for NativeClosure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<closure>")
    }
}

impl PartialEq for NativeClosure {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Int(i64),
    Bool(bool),
    Str(String),
    Array(Vec<Value>),
    Tuple(Vec<(String, Value)>),
    Closure(NativeClosure),
    Error(String),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    pub fn closure(f: impl Fn(Vec<Value>) -> Result<Value, Fault> + 'static) -> Self {
        Self::Closure(NativeClosure(Rc::new(f)))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Int(_) => "Int",
            Self::Bool(_) => "Bool",
            Self::Str(_) => "String",
            Self::Array(_) => "Array",
            Self::Tuple(_) => "Tuple",
            Self::Closure(_) => "Closure",
            Self::Error(_) => "Error",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }
}

/// Runtime failures of the generated code.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Fault {
    #[error("unexpectedly found nil while implicitly unwrapping `{field}`")]
    ImplicitUnwrap { field: String },

    #[error("could not cast value of type {found} to {expected}")]
    TypeMismatch { expected: String, found: String },

    #[error("error thrown: {0:?}")]
    Thrown(Value),

    #[error("no member named `{0}`")]
    UnknownMember(String),

    #[error("`{member}` expects {expected} arguments, got {found}")]
    Arity {
        member: String,
        expected: usize,
        found: usize,
    },
}

enum Flow {
    Next,
    Return(Value),
}

struct Frame<'s> {
    locals: HashMap<String, Value>,
    return_type: Option<&'s SemanticType>,
}

/// Mutable state of one spy object.
pub struct SpyInstance<'s> {
    spy: &'s GeneratedSpy,
    fields: HashMap<String, Value>,
    bindings: HashMap<String, SemanticType>,
}

impl<'s> SpyInstance<'s> {
    pub fn new(spy: &'s GeneratedSpy) -> Self {
        let mut fields = HashMap::new();
        for declaration in &spy.members {
            if let GeneratedDeclaration::StoredField {
                name,
                default_value,
                ..
            } = declaration
            {
                let initial = match default_value {
                    Some(Expr::IntLiteral { value }) => Value::Int(*value),
                    Some(Expr::EmptyArray) => Value::Array(Vec::new()),
                    _ => Value::Nil,
                };
                fields.insert(name.clone(), initial);
            }
        }
        Self {
            spy,
            fields,
            bindings: HashMap::new(),
        }
    }

    /// Binds a generic placeholder for forced casts, as a call site would.
    pub fn bind_generic(&mut self, name: impl Into<String>, ty: SemanticType) -> &mut Self {
        self.bindings.insert(name.into(), ty);
        self
    }

    /// Reads a stored field or evaluates a computed property.
    pub fn get(&mut self, name: &str) -> Result<Value, Fault> {
        if let Some(value) = self.fields.get(name) {
            return Ok(value.clone());
        }
        let spy = self.spy;
        match spy.field(name) {
            Some(GeneratedDeclaration::ComputedProperty { ty, getter, .. }) => {
                let mut frame = Frame {
                    locals: HashMap::new(),
                    return_type: Some(ty),
                };
                self.run(getter, &mut frame)
            }
            _ => Err(Fault::UnknownMember(name.to_string())),
        }
    }

    /// Writes a stored field or runs a computed property's setter.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), Fault> {
        if let Some(slot) = self.fields.get_mut(name) {
            *slot = value;
            return Ok(());
        }
        let spy = self.spy;
        match spy.field(name) {
            Some(GeneratedDeclaration::ComputedProperty {
                setter: Some(setter),
                ..
            }) => {
                let mut frame = Frame {
                    locals: HashMap::from([("newValue".to_string(), value)]),
                    return_type: None,
                };
                self.run(setter, &mut frame).map(|_| ())
            }
            _ => Err(Fault::UnknownMember(name.to_string())),
        }
    }

    /// Calls the first function named `name` whose arity matches.
    pub fn invoke(&mut self, name: &str, arguments: Vec<Value>) -> Result<Value, Fault> {
        let spy = self.spy;
        let mut candidates = spy.members.iter().filter_map(|d| match d {
            GeneratedDeclaration::FunctionImplementation {
                signature,
                statements,
            } if signature.name == name => Some((signature, statements)),
            _ => None,
        });
        let Some(first) = candidates.next() else {
            return Err(Fault::UnknownMember(name.to_string()));
        };
        let (signature, statements) = std::iter::once(first)
            .chain(candidates)
            .find(|(sig, _)| sig.parameters.len() == arguments.len())
            .ok_or_else(|| Fault::Arity {
                member: name.to_string(),
                expected: first.0.parameters.len(),
                found: arguments.len(),
            })?;

        let mut frame = Frame {
            locals: bind_arguments(&signature.parameters, arguments),
            return_type: signature.return_type.as_ref(),
        };
        self.run(statements, &mut frame)
    }

    pub fn subscript_get(&mut self, indices: Vec<Value>) -> Result<Value, Fault> {
        let spy = self.spy;
        let (signature, getter) = spy
            .members
            .iter()
            .find_map(|d| match d {
                GeneratedDeclaration::SubscriptImplementation {
                    signature, getter, ..
                } if signature.parameters.len() == indices.len() => Some((signature, getter)),
                _ => None,
            })
            .ok_or_else(|| Fault::UnknownMember("subscript".to_string()))?;

        let mut frame = Frame {
            locals: bind_arguments(&signature.parameters, indices),
            return_type: Some(&signature.return_type),
        };
        self.run(getter, &mut frame)
    }

    pub fn subscript_set(&mut self, indices: Vec<Value>, new_value: Value) -> Result<(), Fault> {
        let spy = self.spy;
        let (signature, setter) = spy
            .members
            .iter()
            .find_map(|d| match d {
                GeneratedDeclaration::SubscriptImplementation {
                    signature,
                    setter: Some(setter),
                    ..
                } if signature.parameters.len() == indices.len() => Some((signature, setter)),
                _ => None,
            })
            .ok_or_else(|| Fault::UnknownMember("subscript setter".to_string()))?;

        let mut locals = bind_arguments(&signature.parameters, indices);
        locals.insert("newValue".to_string(), new_value);
        let mut frame = Frame {
            locals,
            return_type: None,
        };
        self.run(setter, &mut frame).map(|_| ())
    }

    fn run(&mut self, statements: &'s [Statement], frame: &mut Frame<'s>) -> Result<Value, Fault> {
        match self.exec_block(statements, frame)? {
            Flow::Return(value) => Ok(value),
            Flow::Next => Ok(Value::Nil),
        }
    }

    fn exec_block(
        &mut self,
        statements: &'s [Statement],
        frame: &mut Frame<'s>,
    ) -> Result<Flow, Fault> {
        for statement in statements {
            if let Flow::Return(value) = self.exec(statement, frame)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Next)
    }

    fn exec(&mut self, statement: &'s Statement, frame: &mut Frame<'s>) -> Result<Flow, Fault> {
        match statement {
            Statement::Increment { target } => {
                let current = self.read(target, frame)?;
                let next = current.as_int().ok_or_else(|| Fault::TypeMismatch {
                    expected: "Int".to_string(),
                    found: current.kind().to_string(),
                })? + 1;
                self.set(target, Value::Int(next))?;
            }
            Statement::Assign { target, value } => {
                let value = self.eval(value, frame)?;
                self.set(target, value)?;
            }
            Statement::Append { target, value } => {
                let value = self.eval(value, frame)?;
                match self.fields.get_mut(target) {
                    Some(Value::Array(history)) => history.push(value),
                    Some(other) => {
                        return Err(Fault::TypeMismatch {
                            expected: "Array".to_string(),
                            found: other.kind().to_string(),
                        })
                    }
                    None => return Err(Fault::UnknownMember(target.clone())),
                }
            }
            Statement::ThrowIfPresent { field } => {
                let error = self.read(field, frame)?;
                if !error.is_nil() {
                    return Err(Fault::Thrown(error));
                }
            }
            Statement::IfPresent {
                field,
                then,
                otherwise,
            } => {
                let branch = if self.read(field, frame)?.is_nil() {
                    otherwise
                } else {
                    then
                };
                return self.exec_block(branch, frame);
            }
            Statement::Return { value: None } => return Ok(Flow::Return(Value::Nil)),
            Statement::Return { value: Some(expr) } => {
                let value = self.eval(expr, frame)?;
                if value.is_nil() && frame.return_type.is_some_and(|ty| !ty.is_optional()) {
                    return Err(Fault::ImplicitUnwrap {
                        field: describe(expr),
                    });
                }
                return Ok(Flow::Return(value));
            }
            Statement::Expression { expr } => {
                self.eval(expr, frame)?;
            }
        }
        Ok(Flow::Next)
    }

    fn read(&mut self, name: &str, frame: &Frame<'s>) -> Result<Value, Fault> {
        match frame.locals.get(name) {
            Some(value) => Ok(value.clone()),
            None => self.get(name),
        }
    }

    fn eval(&mut self, expr: &'s Expr, frame: &mut Frame<'s>) -> Result<Value, Fault> {
        match expr {
            Expr::Identifier { name } => self.read(name, frame),
            Expr::IntLiteral { value } => Ok(Value::Int(*value)),
            Expr::EmptyArray => Ok(Value::Array(Vec::new())),
            Expr::Tuple { elements } => {
                let mut values = Vec::with_capacity(elements.len());
                for (label, element) in elements {
                    values.push((label.clone(), self.eval(element, frame)?));
                }
                Ok(Value::Tuple(values))
            }
            Expr::Greater { lhs, rhs } => {
                let lhs = self.eval(lhs, frame)?;
                let rhs = self.eval(rhs, frame)?;
                match (lhs.as_int(), rhs.as_int()) {
                    (Some(l), Some(r)) => Ok(Value::Bool(l > r)),
                    _ => Err(Fault::TypeMismatch {
                        expected: "Int".to_string(),
                        found: format!("{} and {}", lhs.kind(), rhs.kind()),
                    }),
                }
            }
            Expr::ForceUnwrap { inner } => match self.eval(inner, frame)? {
                Value::Nil => Err(Fault::ImplicitUnwrap {
                    field: describe(inner),
                }),
                value => Ok(value),
            },
            Expr::Call {
                callee,
                arguments,
                optional_chained,
            } => {
                let target = self.eval(callee, frame)?;
                let mut values = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    values.push(self.eval(argument, frame)?);
                }
                match target {
                    Value::Nil if *optional_chained => Ok(Value::Nil),
                    Value::Closure(closure) => (closure.0)(values),
                    other => Err(Fault::TypeMismatch {
                        expected: "Closure".to_string(),
                        found: other.kind().to_string(),
                    }),
                }
            }
            Expr::Try { inner } | Expr::Await { inner } => self.eval(inner, frame),
            Expr::ForceCast { inner, ty } => {
                let value = self.eval(inner, frame)?;
                if value.is_nil() && !ty.is_optional() {
                    return Err(Fault::ImplicitUnwrap {
                        field: describe(inner),
                    });
                }
                if self.conforms(&value, ty) {
                    Ok(value)
                } else {
                    Err(Fault::TypeMismatch {
                        expected: render_type(ty),
                        found: value.kind().to_string(),
                    })
                }
            }
        }
    }

    /// Structural check; nominal types the evaluator has no model for pass.
    fn conforms(&self, value: &Value, ty: &SemanticType) -> bool {
        match ty {
            SemanticType::ErasedAny => true,
            SemanticType::GenericPlaceholder { name } => match self.bindings.get(name) {
                Some(bound) => self.conforms(value, bound),
                None => true,
            },
            SemanticType::Optional { wrapped } | SemanticType::ImplicitlyUnwrapped { wrapped } => {
                value.is_nil() || self.conforms(value, wrapped)
            }
            SemanticType::Named { name } => match (name.as_str(), value) {
                ("Int", Value::Int(_)) | ("Bool", Value::Bool(_)) | ("String", Value::Str(_)) => {
                    true
                }
                ("Int" | "Bool" | "String", _) => false,
                ("Error" | "any Error", v) => matches!(v, Value::Error(_)),
                _ if ty.is_void() => matches!(value, Value::Nil | Value::Tuple(_)),
                _ => true,
            },
            SemanticType::Array { element } => match value {
                Value::Array(values) => values.iter().all(|v| self.conforms(v, element)),
                _ => false,
            },
            SemanticType::Tuple { elements } => match value {
                Value::Tuple(values) => {
                    values.len() == elements.len()
                        && values
                            .iter()
                            .zip(elements)
                            .all(|((_, v), e)| self.conforms(v, &e.ty))
                }
                _ => elements.is_empty() && value.is_nil(),
            },
            SemanticType::Function { .. } => matches!(value, Value::Closure(_)),
            SemanticType::Dictionary { .. }
            | SemanticType::Applied { .. }
            | SemanticType::MemberType { .. } => true,
        }
    }
}

fn bind_arguments(parameters: &[Parameter], arguments: Vec<Value>) -> HashMap<String, Value> {
    parameters
        .iter()
        .map(|p| p.internal_name.clone())
        .zip(arguments)
        .collect()
}

fn describe(expr: &Expr) -> String {
    match expr {
        Expr::Identifier { name } => name.clone(),
        Expr::ForceUnwrap { inner }
        | Expr::Try { inner }
        | Expr::Await { inner }
        | Expr::ForceCast { inner, .. } => describe(inner),
        Expr::Call { callee, .. } => describe(callee),
        _ => "value".to_string(),
    }
}
