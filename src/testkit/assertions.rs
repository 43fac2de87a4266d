//! Assertion macros for testing spygen operations.
//!
//! - [`crate::assert_result_ok!`] - Assert Result is Ok and extract value
//! - [`crate::assert_result_err!`] - Assert Result is Err and extract error
//! - [`crate::assert_contains_error!`] - Assert error message contains pattern
//! - [`crate::assert_generation_error!`] - Assert a `GenerationError` variant
//!
//! ```rust,ignore
//! use spygen::{assert_contains_error, assert_generation_error, generate_spy};
//! use spygen::core::GenerationError;
//!
//! let result = generate_spy(&interface_with_inout_member());
//! assert_contains_error!(result.clone(), "inout");
//! assert_generation_error!(result, GenerationError::UnsupportedType { .. });
//! ```

/// Assert that a Result is Ok and extract the value.
#[macro_export]
macro_rules! assert_result_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!(
                "Expected Ok, got Err: {:?}\n  at {}:{}:{}",
                e,
                file!(),
                line!(),
                column!()
            ),
        }
    };
    ($result:expr, $($msg:tt)+) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!(
                "{}: Expected Ok, got Err: {:?}\n  at {}:{}:{}",
                format!($($msg)+),
                e,
                file!(),
                line!(),
                column!()
            ),
        }
    };
}

/// Assert that a Result is Err and extract the error.
#[macro_export]
macro_rules! assert_result_err {
    ($result:expr) => {
        match $result {
            Ok(value) => panic!(
                "Expected Err, got Ok: {:?}\n  at {}:{}:{}",
                value,
                file!(),
                line!(),
                column!()
            ),
            Err(e) => e,
        }
    };
}

/// Assert that an error message contains a specific pattern.
#[macro_export]
macro_rules! assert_contains_error {
    ($result:expr, $pattern:expr) => {{
        let err = $crate::assert_result_err!($result);
        let err_str = err.to_string();
        assert!(
            err_str.contains($pattern),
            "Error '{}' does not contain '{}'\n  at {}:{}:{}",
            err_str,
            $pattern,
            file!(),
            line!(),
            column!()
        );
        err
    }};
}

/// Assert that a generation result failed with the given error variant.
///
/// Returns the error so tests can inspect the member it names.
#[macro_export]
macro_rules! assert_generation_error {
    ($result:expr, $pattern:pat) => {{
        let err = $crate::assert_result_err!($result);
        assert!(
            matches!(err, $pattern),
            "Expected {}, got {:?}\n  at {}:{}:{}",
            stringify!($pattern),
            err,
            file!(),
            line!(),
            column!()
        );
        err
    }};
}

#[cfg(test)]
mod tests {
    use crate::core::{FunctionMember, GenerationError, InterfaceSpecification};
    use crate::generator::generate_spy;
    use crate::testkit::helpers::fetch_service;

    #[test]
    fn test_assert_result_ok_extracts_spy() {
        let spy = assert_result_ok!(generate_spy(&fetch_service()));
        assert_eq!(spy.name, "ServiceSpy");
    }

    #[test]
    #[should_panic(expected = "Expected Ok, got Err")]
    fn test_assert_result_ok_failure() {
        let _ = assert_result_ok!(generate_spy(&InterfaceSpecification::new("")));
    }

    #[test]
    fn test_assert_result_ok_with_message() {
        let result: Result<i32, String> = Ok(42);
        let value = assert_result_ok!(result, "generating {}", "Service");
        assert_eq!(value, 42);
    }

    #[test]
    #[should_panic(expected = "Expected Err, got Ok")]
    fn test_assert_result_err_failure() {
        let _ = assert_result_err!(generate_spy(&fetch_service()));
    }

    #[test]
    fn test_assert_contains_error_success() {
        let _ = assert_contains_error!(
            generate_spy(&InterfaceSpecification::new(" ")),
            "interface name is empty"
        );
    }

    #[test]
    #[should_panic(expected = "does not contain")]
    fn test_assert_contains_error_pattern_mismatch() {
        let result: Result<i32, String> = Err("Permission denied".to_string());
        assert_contains_error!(result, "not found");
    }

    #[test]
    fn test_assert_generation_error_matches_variant() {
        let spec = InterfaceSpecification::new("Service").with_function(
            FunctionMember::new("wrap").with_generic(crate::core::GenericParameter::new("T")),
        );
        let spec = spec.with_generic(crate::core::GenericParameter::new("T"));
        let err = assert_generation_error!(
            generate_spy(&spec),
            GenerationError::GenericNameCollision { .. }
        );
        assert_eq!(err.member(), Some("wrap()"));
    }

    #[test]
    #[should_panic(expected = "InvalidInterface")]
    fn test_assert_generation_error_mismatch() {
        let spec = InterfaceSpecification::new("Service")
            .with_function(FunctionMember::new("wrap").with_generic(crate::core::GenericParameter::new("T")))
            .with_generic(crate::core::GenericParameter::new("T"));
        let _ = assert_generation_error!(generate_spy(&spec), GenerationError::InvalidInterface(_));
    }
}
