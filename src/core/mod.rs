pub mod declarations;
pub mod errors;
pub mod interface;
pub mod types;

pub use declarations::{
    Expr, FunctionSignature, GeneratedDeclaration, GeneratedSpy, Statement, SubscriptSignature,
};
pub use errors::{Error, GenerationError, Result, ResultExt, TypeParseError};
pub use interface::{
    AccessLevel, FunctionMember, GenericParameter, InterfaceSpecification, Member, Parameter,
    SubscriptMember,
};
pub use types::{SemanticType, TupleElement};
