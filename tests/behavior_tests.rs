//! Runtime behavior of generated spies, executed with the testkit evaluator.

use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use spygen::generate_spy;
use spygen::testkit::{
    fetch_service, kitchen_sink, save_service, settings_store, wrap_service, Fault, SpyInstance,
    Value,
};

#[test]
fn test_call_count_increases_by_one_per_invocation() {
    let spy = generate_spy(&fetch_service()).unwrap();
    let mut service = SpyInstance::new(&spy);
    service.set("fetchIdReturnValue", Value::str("ok")).unwrap();

    for expected in 1..=5 {
        service.invoke("fetch", vec![Value::Int(expected)]).unwrap();
        assert_eq!(service.get("fetchIdCallsCount"), Ok(Value::Int(expected)));
        assert_eq!(service.get("fetchIdCalled"), Ok(Value::Bool(true)));
    }
}

#[test]
fn test_history_is_append_only_in_call_order() {
    let spy = generate_spy(&fetch_service()).unwrap();
    let mut service = SpyInstance::new(&spy);
    service.set("fetchIdReturnValue", Value::str("ok")).unwrap();

    for id in [3, 1, 2] {
        service.invoke("fetch", vec![Value::Int(id)]).unwrap();
    }

    assert_eq!(
        service.get("fetchIdReceivedInvocations"),
        Ok(Value::Array(vec![Value::Int(3), Value::Int(1), Value::Int(2)]))
    );
    assert_eq!(service.get("fetchIdReceivedId"), Ok(Value::Int(2)));
}

#[test]
fn test_multi_parameter_history_records_labeled_tuples() {
    let spy = generate_spy(&kitchen_sink()).unwrap();
    let mut repository = SpyInstance::new(&spy);

    repository
        .invoke("move", vec![Value::Int(1), Value::Int(4)])
        .unwrap();

    let expected = Value::Tuple(vec![
        ("from".to_string(), Value::Int(1)),
        ("to".to_string(), Value::Int(4)),
    ]);
    assert_eq!(
        repository.get("moveFromToReceivedArguments"),
        Ok(expected.clone())
    );
    assert_eq!(
        repository.get("moveFromToReceivedInvocations"),
        Ok(Value::Array(vec![expected]))
    );
}

#[test]
fn test_configured_error_preempts_closure() {
    let spy = generate_spy(&save_service()).unwrap();
    let mut store = SpyInstance::new(&spy);
    let closure_calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&closure_calls);

    store
        .set(
            "saveClosure",
            Value::closure(move |_| {
                counter.set(counter.get() + 1);
                Ok(Value::Nil)
            }),
        )
        .unwrap();
    store
        .set("saveThrowableError", Value::error("disk full"))
        .unwrap();

    assert_eq!(
        store.invoke("save", vec![]),
        Err(Fault::Thrown(Value::error("disk full")))
    );
    assert_eq!(closure_calls.get(), 0);
    // The call was still recorded before throwing
    assert_eq!(store.get("saveCallsCount"), Ok(Value::Int(1)));
}

#[test]
fn test_void_closure_runs_when_no_error() {
    let spy = generate_spy(&save_service()).unwrap();
    let mut store = SpyInstance::new(&spy);
    let closure_calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&closure_calls);

    store
        .set(
            "saveClosure",
            Value::closure(move |_| {
                counter.set(counter.get() + 1);
                Ok(Value::Nil)
            }),
        )
        .unwrap();

    store.invoke("save", vec![]).unwrap();
    store.invoke("save", vec![]).unwrap();
    assert_eq!(closure_calls.get(), 2);
}

#[test]
fn test_unset_void_closure_is_skipped() {
    let spy = generate_spy(&save_service()).unwrap();
    let mut store = SpyInstance::new(&spy);
    assert_eq!(store.invoke("save", vec![]), Ok(Value::Nil));
}

#[test]
fn test_closure_takes_precedence_over_return_value() {
    let spy = generate_spy(&fetch_service()).unwrap();
    let mut service = SpyInstance::new(&spy);
    service.set("fetchIdReturnValue", Value::str("stored")).unwrap();
    service
        .set(
            "fetchIdClosure",
            Value::closure(|args| match args.first() {
                Some(Value::Int(id)) => Ok(Value::str(format!("closure-{}", id))),
                _ => Ok(Value::Nil),
            }),
        )
        .unwrap();

    assert_eq!(
        service.invoke("fetch", vec![Value::Int(9)]),
        Ok(Value::str("closure-9"))
    );
}

#[test]
fn test_unconfigured_return_value_faults() {
    let spy = generate_spy(&fetch_service()).unwrap();
    let mut service = SpyInstance::new(&spy);

    assert_eq!(
        service.invoke("fetch", vec![Value::Int(1)]),
        Err(Fault::ImplicitUnwrap {
            field: "fetchIdReturnValue".to_string()
        })
    );
}

#[test]
fn test_erased_return_round_trips_matching_value() {
    let spy = generate_spy(&wrap_service()).unwrap();
    let mut wrapper = SpyInstance::new(&spy);
    wrapper.bind_generic("T", spygen::SemanticType::int());
    wrapper
        .set("wrapReturnValue", Value::Array(vec![Value::Int(1), Value::Int(2)]))
        .unwrap();

    assert_eq!(
        wrapper.invoke("wrap", vec![Value::Int(5)]),
        Ok(Value::Array(vec![Value::Int(1), Value::Int(2)]))
    );
    assert_eq!(wrapper.get("wrapReceivedData"), Ok(Value::Int(5)));
}

#[test]
fn test_erased_return_of_wrong_type_faults() {
    let spy = generate_spy(&wrap_service()).unwrap();
    let mut wrapper = SpyInstance::new(&spy);
    wrapper.set("wrapReturnValue", Value::Int(42)).unwrap();

    assert_eq!(
        wrapper.invoke("wrap", vec![Value::Int(5)]),
        Err(Fault::TypeMismatch {
            expected: "[T]".to_string(),
            found: "Int".to_string()
        })
    );
}

#[test]
fn test_erased_closure_result_is_cast() {
    let spy = generate_spy(&wrap_service()).unwrap();
    let mut wrapper = SpyInstance::new(&spy);
    wrapper
        .set("wrapClosure", Value::closure(|_| Ok(Value::str("not an array"))))
        .unwrap();

    assert!(matches!(
        wrapper.invoke("wrap", vec![Value::Int(5)]),
        Err(Fault::TypeMismatch { .. })
    ));
}

#[test]
fn test_optional_return_value_defaults_to_nil() {
    let spy = generate_spy(&settings_store()).unwrap();
    let mut store = SpyInstance::new(&spy);

    assert_eq!(store.subscript_get(vec![Value::str("volume")]), Ok(Value::Nil));
    assert_eq!(store.get("isEnabled"), Ok(Value::Nil));
}

#[test]
fn test_subscript_getter_and_setter_are_tracked_independently() {
    let spy = generate_spy(&settings_store()).unwrap();
    let mut store = SpyInstance::new(&spy);
    store
        .set("subscriptStringGetReturnValue", Value::Int(11))
        .unwrap();

    store
        .subscript_set(vec![Value::str("volume")], Value::Int(3))
        .unwrap();
    assert_eq!(store.subscript_get(vec![Value::str("volume")]), Ok(Value::Int(11)));
    store.subscript_get(vec![Value::str("volume")]).unwrap();

    assert_eq!(store.get("subscriptStringGetCallsCount"), Ok(Value::Int(2)));
    assert_eq!(store.get("subscriptStringSetCallsCount"), Ok(Value::Int(1)));
    assert_eq!(
        store.get("subscriptStringSetReceivedNewValue"),
        Ok(Value::Int(3))
    );
}

#[test]
fn test_property_faults_until_configured() {
    let spy = generate_spy(&kitchen_sink()).unwrap();
    let mut repository = SpyInstance::new(&spy);

    assert_eq!(
        repository.get("count"),
        Err(Fault::ImplicitUnwrap {
            field: "underlyingCount".to_string()
        })
    );
    repository.set("underlyingCount", Value::Int(7)).unwrap();
    assert_eq!(repository.get("count"), Ok(Value::Int(7)));
}
