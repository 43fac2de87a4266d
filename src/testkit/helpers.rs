//! Interface fixtures shared by unit and integration tests.
//!
//! | Fixture | Interface |
//! |---------|-----------|
//! | [`fetch_service`] | `func fetch(id: Int) -> String` |
//! | [`save_service`] | `func save() async throws` |
//! | [`wrap_service`] | `func wrap<T>(_ data: T) -> [T]` |
//! | [`settings_store`] | properties plus a settable subscript |
//! | [`overloaded_service`] | two `fetch(id:)` overloads |
//! | [`kitchen_sink`] | a bit of everything |

use crate::core::{
    FunctionMember, GenericParameter, InterfaceSpecification, Member, Parameter, SemanticType,
    SubscriptMember,
};

pub fn fetch_function() -> FunctionMember {
    FunctionMember::new("fetch")
        .with_parameter(Parameter::labeled("id", SemanticType::int()))
        .returning(SemanticType::named("String"))
}

pub fn fetch_service() -> InterfaceSpecification {
    InterfaceSpecification::new("Service").with_function(fetch_function())
}

pub fn save_function() -> FunctionMember {
    FunctionMember::new("save").asynchronous().throwing()
}

pub fn save_service() -> InterfaceSpecification {
    InterfaceSpecification::new("Store").with_function(save_function())
}

pub fn wrap_service() -> InterfaceSpecification {
    InterfaceSpecification::new("Wrapper").with_function(
        FunctionMember::new("wrap")
            .with_generic(GenericParameter::new("T"))
            .with_parameter(Parameter::unlabeled("data", SemanticType::placeholder("T")))
            .returning(SemanticType::placeholder("T").array()),
    )
}

pub fn key_subscript(is_settable: bool) -> SubscriptMember {
    SubscriptMember {
        parameters: vec![Parameter::unlabeled("key", SemanticType::named("String"))],
        return_type: SemanticType::int().optional(),
        is_settable,
        generic_parameters: vec![],
        is_async: false,
        is_throwing: false,
    }
}

pub fn settings_store() -> InterfaceSpecification {
    InterfaceSpecification::new("SettingsStore")
        .with_property("name", SemanticType::named("String"), true)
        .with_property("isEnabled", SemanticType::bool().optional(), false)
        .with_member(Member::Subscript(key_subscript(true)))
}

pub fn overloaded_service() -> InterfaceSpecification {
    InterfaceSpecification::new("Lookup")
        .with_function(fetch_function())
        .with_function(
            FunctionMember::new("fetch")
                .with_parameter(Parameter::labeled("id", SemanticType::named("String")))
                .returning(SemanticType::named("String")),
        )
}

/// Properties, sync and async functions, generics, closures and a subscript.
pub fn kitchen_sink() -> InterfaceSpecification {
    InterfaceSpecification::new("Repository")
        .with_property("count", SemanticType::int(), false)
        .with_function(fetch_function())
        .with_function(
            FunctionMember::new("move")
                .with_parameter(Parameter::labeled("from", SemanticType::int()))
                .with_parameter(Parameter::labeled("to", SemanticType::int())),
        )
        .with_function(
            FunctionMember::new("load")
                .with_generic(GenericParameter::constrained("T", "Decodable"))
                .with_parameter(Parameter::labeled("key", SemanticType::named("String")))
                .asynchronous()
                .throwing()
                .returning(SemanticType::placeholder("T")),
        )
        .with_function(
            FunctionMember::new("observe").with_parameter(
                Parameter::labeled(
                    "handler",
                    SemanticType::function(vec![SemanticType::int()], false, false, SemanticType::void()),
                )
                .with_attribute("@escaping"),
            ),
        )
        .with_function(save_function())
        .with_member(Member::Subscript(key_subscript(false)))
}
