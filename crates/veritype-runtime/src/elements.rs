//! Element validation: every element of a sequence against one required
//! spec. Unlike union resolution there is no short-circuit: a full run
//! reports every failing index.

use veritype_common::diagnostics::{Diagnostic, DiagnosticKind, ValidationResult};
use veritype_common::typespec::TypeSpec;

use crate::checker::{CheckPolicy, TypeCheck};
use crate::error::Result;
use crate::resolver::describe;
use crate::value::Value;

impl TypeCheck {
    /// Check every element of `elements` against `spec`, then apply this
    /// checker's policy.
    pub fn check_elements(&self, elements: &[Value], spec: &TypeSpec, name: &str) -> Result<()> {
        self.apply_policy(describe_elements(elements, spec, name))
    }
}

/// Raw per-element conformance description; never raises.
///
/// An empty sequence is itself an error: the checker is meaningless on
/// one. Otherwise each element is resolved as parameter `name[index]`,
/// accumulating across all indices. An empty `name` falls back to `_`.
pub fn describe_elements(elements: &[Value], spec: &TypeSpec, name: &str) -> ValidationResult {
    let name = if name.is_empty() { "_" } else { name };
    let mut result = ValidationResult::new();
    if elements.is_empty() {
        result.push(Diagnostic::error(name, DiagnosticKind::EmptyArgument));
        return result;
    }
    for (index, element) in elements.iter().enumerate() {
        result.extend(describe(element, spec, &format!("{}[{}]", name, index)));
    }
    result
}

/// Standalone element checker with the historical default surface:
/// warnings report, errors raise unless `raise_on_error` is false.
pub fn element_type_check(
    elements: &[Value],
    spec: &TypeSpec,
    name: &str,
    raise_on_error: bool,
) -> Result<()> {
    TypeCheck::with_policy(CheckPolicy {
        raise_on_error,
        raise_on_warning: false,
    })
    .check_elements(elements, spec, name)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use veritype_common::diagnostics::Severity;
    use veritype_common::typespec::TypeTag;

    #[test]
    fn empty_sequence_raises_without_element_checks() {
        let err =
            element_type_check(&[], &TypeSpec::Single(TypeTag::Int), "xs", true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "type check failed:\n  - argument 'xs' cannot be empty"
        );
    }

    #[test]
    fn empty_name_falls_back_to_underscore() {
        let err = element_type_check(&[], &TypeSpec::Single(TypeTag::Int), "", true).unwrap_err();
        assert!(err.to_string().contains("argument '_' cannot be empty"));
    }

    #[test]
    fn conforming_elements_pass() {
        let elements = vec![Value::Int(1), Value::Int(2)];
        assert!(element_type_check(&elements, &TypeSpec::Single(TypeTag::Int), "xs", true).is_ok());
    }

    #[test]
    fn failing_indices_all_reported() {
        let elements = vec![Value::Int(1), Value::String("a".into()), Value::Float(2.0)];
        let err =
            element_type_check(&elements, &TypeSpec::Single(TypeTag::Int), "xs", true).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("argument 'xs[1]' must be 'Int', not 'String'"));
        assert!(message.contains("argument 'xs[2]' must be 'Int', not 'Float'"));
        assert!(!message.contains("xs[0]"));
    }

    #[test]
    fn non_raising_mode_reports_each_index() {
        let reports: Arc<Mutex<Vec<(Severity, String)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = reports.clone();
        let mut check = TypeCheck::with_policy(CheckPolicy {
            raise_on_error: false,
            raise_on_warning: false,
        });
        check.set_report_handler(move |severity, message| {
            sink.lock().unwrap().push((severity, message.to_string()));
        });

        let elements = vec![Value::Int(1), Value::String("a".into()), Value::Float(2.0)];
        assert!(check
            .check_elements(&elements, &TypeSpec::Single(TypeTag::Int), "xs")
            .is_ok());

        let reports = reports.lock().unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports[0].1.contains("'xs[1]'"));
        assert!(reports[1].1.contains("'xs[2]'"));
    }

    #[test]
    fn union_spec_applies_per_element() {
        let spec = TypeSpec::UnionList(vec![
            TypeSpec::Single(TypeTag::Int),
            TypeSpec::Single(TypeTag::Nil),
        ]);
        let elements = vec![Value::Int(1), Value::Nil, Value::Bool(true)];
        let result = describe_elements(&elements, &spec, "xs");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].message(),
            "argument 'xs[2]' must be 'Int' or 'Nil', not 'Bool'"
        );
        // One deprecation warning per index; names differ so none collapse.
        assert_eq!(result.warnings.len(), 3);
    }

    #[test]
    fn empty_union_spec_diagnosed_at_each_index() {
        let elements = vec![Value::Int(1), Value::Int(2)];
        let err = element_type_check(&elements, &TypeSpec::UnionList(vec![]), "xs", true)
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("type specification cannot be empty for parameter 'xs[0]'"));
        assert!(message.contains("type specification cannot be empty for parameter 'xs[1]'"));
    }
}
