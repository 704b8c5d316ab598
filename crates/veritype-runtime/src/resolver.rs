//! Annotation resolution: does one runtime value conform to one declared
//! type specification?
//!
//! The public entry point is [`describe`], which returns the raw
//! [`ValidationResult`] without raising. Policy decisions (raise vs.
//! report) live in the orchestrator.

use veritype_common::diagnostics::{Diagnostic, DiagnosticKind, ValidationResult};
use veritype_common::typespec::{TypeSpec, TypeTag};

use crate::value::Value;

/// Describe the conformance of `value` against `spec`.
///
/// Never raises; callers that want the raise/report policy applied go
/// through `TypeCheck`. The returned result is finalized: errors are
/// deduplicated, union mismatches are merged into one combined entry, and
/// warnings are deduplicated. Nested union members are resolved without
/// this cleanup so that the outermost merge sees every branch.
pub fn describe(value: &Value, spec: &TypeSpec, parameter: &str) -> ValidationResult {
    let mut result = ValidationResult::new();
    resolve(value, spec, parameter, &mut result);
    result.finalize();
    result
}

fn resolve(value: &Value, spec: &TypeSpec, parameter: &str, out: &mut ValidationResult) {
    match spec {
        TypeSpec::Absent => {}
        TypeSpec::Invalid(_) => {
            out.push(Diagnostic::error(parameter, DiagnosticKind::InvalidAnnotation));
        }
        TypeSpec::NullSentinel => {
            out.push(Diagnostic::warning(
                parameter,
                DiagnosticKind::NilValueAnnotation,
            ));
            check_single(value, &TypeTag::Nil, parameter, out);
        }
        TypeSpec::Single(tag) => check_single(value, tag, parameter, out),
        TypeSpec::Union(members) => resolve_union(value, members, parameter, out),
        TypeSpec::UnionList(members) => {
            out.push(Diagnostic::warning(
                parameter,
                DiagnosticKind::TypeListAnnotation,
            ));
            resolve_union(value, members, parameter, out);
        }
    }
}

fn check_single(value: &Value, tag: &TypeTag, parameter: &str, out: &mut ValidationResult) {
    let actual = value.type_tag();
    if !tag.accepts(&actual) {
        out.push(Diagnostic::mismatch(parameter, tag.clone(), actual));
    }
}

/// Resolve a union: members in declared order, first conforming member
/// wins. On success every error gathered from earlier members is
/// discarded; warnings collected along the way survive. If all members
/// fail, every member's errors and warnings accumulate in member order.
fn resolve_union(value: &Value, members: &[TypeSpec], parameter: &str, out: &mut ValidationResult) {
    if members.is_empty() {
        out.push(Diagnostic::error(parameter, DiagnosticKind::EmptySpec));
        return;
    }

    let mut gathered = ValidationResult::new();
    for member in members {
        let mut branch = ValidationResult::new();
        resolve(value, member, parameter, &mut branch);
        let conformed = branch.conforms();
        gathered.extend(branch);
        if conformed {
            gathered.errors.clear();
            break;
        }
    }
    out.extend(gathered);
}

// ============================================================================
// Tests
// ============================================================================
