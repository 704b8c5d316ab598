//! End-to-end integration tests: manifest → signature → bind → validate.

use std::sync::{Arc, Mutex};

use veritype_common::diagnostics::Severity;
use veritype_common::manifest::parse_manifest;
use veritype_common::typespec::{TypeSpec, TypeTag};
use veritype_runtime::{
    check_manifest_call, describe, element_type_check, BoundCall, CallArgs, CheckPolicy,
    Signature, TypeCheck, ValidateError, Value,
};

const MANIFEST: &str = r#"
[[functions]]
name = "greet"

[[functions.params]]
name = "a"
type = "Int"

[[functions.params]]
name = "b"
type = "String"
default = "x"

[[functions]]
name = "legacy"

[[functions.params]]
name = "x"
type = ["Int", "Nil"]

[[functions.params]]
name = "y"
type = "None"
default = ""
"#;

fn manifest() -> veritype_common::SignatureManifest {
    parse_manifest(MANIFEST).expect("manifest parses")
}

#[test]
fn manifest_call_conforms() {
    let bound = check_manifest_call(&manifest(), "greet", &CallArgs::new().arg(Value::Int(5)))
        .expect("conforming call validates");
    assert_eq!(bound.get("a"), Some(&Value::Int(5)));
    assert_eq!(bound.get("b"), Some(&Value::String("x".into())));
}

#[test]
fn manifest_call_mismatch_raises() {
    let err = check_manifest_call(
        &manifest(),
        "greet",
        &CallArgs::new().kwarg("a", Value::String("y".into())),
    )
    .unwrap_err();
    assert!(err
        .to_string()
        .contains("argument 'a' must be 'Int', not 'String'"));
}

#[test]
fn manifest_unknown_function_is_bind_error() {
    let err = check_manifest_call(&manifest(), "nope", &CallArgs::new()).unwrap_err();
    assert!(matches!(err, ValidateError::Bind(_)));
    assert_eq!(err.to_string(), "unknown function 'nope'");
}

#[test]
fn legacy_forms_warn_but_validate() {
    let reports: Arc<Mutex<Vec<(Severity, String)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = reports.clone();
    let mut check = TypeCheck::new();
    check.set_report_handler(move |severity, message| {
        sink.lock().unwrap().push((severity, message.to_string()));
    });

    let decl = manifest();
    let signature = Signature::from_decl(decl.function("legacy").unwrap());

    // Supply nil for both so each parameter conforms and only the
    // deprecation warnings remain.
    let bound = signature
        .bind(&CallArgs::new().arg(Value::Nil).kwarg("y", Value::Nil))
        .unwrap();
    assert!(check.validate(&bound).is_ok());

    let reports = reports.lock().unwrap();
    let warnings: Vec<&String> = reports
        .iter()
        .filter(|(s, _)| *s == Severity::Warning)
        .map(|(_, m)| m)
        .collect();
    assert_eq!(warnings.len(), 2);
    assert!(warnings[0].contains("list of types"));
    assert!(warnings[1].contains("nil value"));
}

#[test]
fn null_sentinel_error_and_warning_split() {
    // Non-nil value against the sentinel: error raised by default, the
    // deprecation warning only raised when the policy says so.
    let sig = Signature::new("f").param("y", TypeSpec::NullSentinel);
    let bound = sig
        .bind(&CallArgs::new().arg(Value::String("v".into())))
        .unwrap();

    let err = TypeCheck::new().validate(&bound).unwrap_err();
    assert!(err.to_string().contains("argument 'y' must be 'Nil', not 'String'"));

    let strict = TypeCheck::with_policy(CheckPolicy {
        raise_on_error: false,
        raise_on_warning: true,
    });
    let err = strict.validate(&bound).unwrap_err();
    assert!(matches!(err, ValidateError::Warnings(_)));
    assert!(err.to_string().contains("nil value"));
}

#[test]
fn wrapped_callable_end_to_end() {
    let signature = Signature::new("greet")
        .param("a", TypeSpec::Single(TypeTag::Int))
        .param_with_default(
            "b",
            TypeSpec::Single(TypeTag::String),
            Value::String("x".into()),
        );
    let wrapped = TypeCheck::new().wrap(signature, |bound: &BoundCall| {
        match bound.get("a") {
            Some(Value::Int(a)) => Value::Int(a * 2),
            _ => Value::Nil,
        }
    });

    // Failure: error message names the parameter and both types.
    let err = wrapped
        .call(&CallArgs::new().kwarg("a", Value::String("y".into())))
        .unwrap_err();
    assert!(err
        .to_string()
        .contains("argument 'a' must be 'Int', not 'String'"));

    // Success: wrapped callable runs, return value unchanged.
    let result = wrapped.call(&CallArgs::new().arg(Value::Int(5))).unwrap();
    assert_eq!(result, Value::Int(10));
}

#[test]
fn union_merge_wording_end_to_end() {
    let spec = TypeSpec::UnionList(vec![
        TypeSpec::Single(TypeTag::Int),
        TypeSpec::Single(TypeTag::Float),
        TypeSpec::Single(TypeTag::String),
    ]);
    let result = describe(&Value::Bool(true), &spec, "a");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(
        result.errors[0].message(),
        "argument 'a' must be 'Int', 'Float' or 'String', not 'Bool'"
    );
}

#[test]
fn element_checker_end_to_end() {
    // Empty sequence: raises about emptiness, never per-element.
    let err = element_type_check(&[], &TypeSpec::Single(TypeTag::Int), "xs", true).unwrap_err();
    assert!(err.to_string().contains("argument 'xs' cannot be empty"));

    // Mixed sequence, non-raising: both bad indices come through the sink.
    let reports: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = reports.clone();
    let mut check = TypeCheck::with_policy(CheckPolicy {
        raise_on_error: false,
        raise_on_warning: false,
    });
    check.set_report_handler(move |_, message| sink.lock().unwrap().push(message.to_string()));

    let elements = vec![Value::Int(1), Value::String("a".into()), Value::Float(2.0)];
    assert!(check
        .check_elements(&elements, &TypeSpec::Single(TypeTag::Int), "xs")
        .is_ok());
    let reports = reports.lock().unwrap();
    assert_eq!(reports.len(), 2);
    assert!(reports[0].contains("'xs[1]'"));
    assert!(reports[1].contains("'xs[2]'"));
}
