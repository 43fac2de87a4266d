//! Testing infrastructure for spygen.
//!
//! - **Fixtures**: ready-made interfaces covering the common member shapes
//! - **Assertion macros**: `Result` assertions that report the call site
//! - **[`SpyInstance`]**: executes a generated spy's statements so tests can
//!   check runtime behavior without compiling Swift
//!
//! ```rust,ignore
//! use spygen::testkit::{save_service, SpyInstance, Value, Fault};
//!
//! let spy = spygen::generate_spy(&save_service()).unwrap();
//! let mut store = SpyInstance::new(&spy);
//! store.set("saveThrowableError", Value::error("disk full")).unwrap();
//! assert_eq!(store.invoke("save", vec![]), Err(Fault::Thrown(Value::error("disk full"))));
//! ```

pub mod assertions;
pub mod helpers;
pub mod interpreter;

// Note: Assertion macros are exported at crate root via #[macro_export]
pub use helpers::{
    fetch_function, fetch_service, key_subscript, kitchen_sink, overloaded_service,
    save_function, save_service, settings_store, wrap_service,
};
pub use interpreter::{Fault, NativeClosure, SpyInstance, Value};
