//! Validation orchestration: run the resolver over every parameter of a
//! bound call, then raise or report per policy.

use veritype_common::diagnostics::{Diagnostic, Severity, ValidationResult};
use veritype_common::SignatureManifest;

use crate::binder::{BoundCall, CallArgs, Signature};
use crate::error::{BindError, Result, ValidateError};
use crate::resolver::describe;

/// Raise/report switches. Policy controls how diagnostics surface, never
/// their severity: a warning stays a warning under any policy.
#[derive(Debug, Clone, Copy)]
pub struct CheckPolicy {
    pub raise_on_error: bool,
    pub raise_on_warning: bool,
}

impl Default for CheckPolicy {
    fn default() -> Self {
        Self {
            raise_on_error: true,
            raise_on_warning: false,
        }
    }
}

/// Handler for diagnostics that are reported rather than raised.
pub type ReportHandler = Box<dyn Fn(Severity, &str) + Send + Sync>;

/// The validation orchestrator: holds the policy and the report sink.
pub struct TypeCheck {
    policy: CheckPolicy,
    report: ReportHandler,
}

impl Default for TypeCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeCheck {
    pub fn new() -> Self {
        Self::with_policy(CheckPolicy::default())
    }

    pub fn with_policy(policy: CheckPolicy) -> Self {
        Self {
            policy,
            report: Box::new(default_report),
        }
    }

    /// Replace the report sink (default: stderr).
    pub fn set_report_handler<F>(&mut self, handler: F)
    where
        F: Fn(Severity, &str) + Send + Sync + 'static,
    {
        self.report = Box::new(handler);
    }

    /// Validate every parameter of a bound call, in declared order, then
    /// apply the policy. Diagnostics are collected across the whole call
    /// before any raise decision: one failing parameter never hides
    /// another. Dedup/merge is scoped per parameter and already done by
    /// the resolver; parameter-level results are appended as-is.
    pub fn validate(&self, bound: &BoundCall) -> Result<()> {
        let mut combined = ValidationResult::new();
        for param in &bound.params {
            combined.extend(describe(&param.value, &param.spec, &param.name));
        }
        self.apply_policy(combined)
    }

    /// Bind and validate in one step. Binding errors propagate unchanged.
    pub fn check_call(&self, signature: &Signature, args: &CallArgs) -> Result<BoundCall> {
        let bound = signature.bind(args)?;
        self.validate(&bound)?;
        Ok(bound)
    }

    /// Look up `function` in a manifest, then bind and validate. An
    /// undeclared function is a binding error.
    pub fn check_manifest_call(
        &self,
        manifest: &SignatureManifest,
        function: &str,
        args: &CallArgs,
    ) -> Result<BoundCall> {
        let decl = manifest
            .function(function)
            .ok_or_else(|| BindError::UnknownFunction(function.to_string()))?;
        self.check_call(&Signature::from_decl(decl), args)
    }

    /// Wrap a callable: every `call` binds, validates, then invokes.
    pub fn wrap<F, R>(self, signature: Signature, inner: F) -> CheckedFunction<F>
    where
        F: Fn(&BoundCall) -> R,
    {
        CheckedFunction {
            signature,
            check: self,
            inner,
        }
    }

    /// Raise or report collected diagnostics per policy. The report path
    /// emits every message; when errors raise, warnings still go through
    /// the report sink first so they are never lost.
    pub(crate) fn apply_policy(&self, result: ValidationResult) -> Result<()> {
        let ValidationResult { errors, warnings } = result;

        if !errors.is_empty() && self.policy.raise_on_error {
            self.report_all(&warnings);
            return Err(ValidateError::Failed(bullets(&errors)));
        }
        self.report_all(&errors);

        if !warnings.is_empty() && self.policy.raise_on_warning {
            return Err(ValidateError::Warnings(bullets(&warnings)));
        }
        self.report_all(&warnings);

        Ok(())
    }

    fn report_all(&self, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            (self.report)(diag.severity, &diag.message());
        }
    }
}

/// A wrapped callable with its declared signature and check policy.
/// Preserves the inner callable's return value unchanged.
pub struct CheckedFunction<F> {
    signature: Signature,
    check: TypeCheck,
    inner: F,
}

impl<F, R> CheckedFunction<F>
where
    F: Fn(&BoundCall) -> R,
{
    /// Invoke the wrapped callable. Binding errors propagate; validation
    /// failures raise or report per the policy the wrapper was built with.
    pub fn call(&self, args: &CallArgs) -> Result<R> {
        let bound = self.signature.bind(args)?;
        self.check.validate(&bound)?;
        Ok((self.inner)(&bound))
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

/// One bullet line per message, newline-joined.
fn bullets(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| format!("  - {}", d.message()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn default_report(severity: Severity, message: &str) {
    match severity {
        Severity::Error => eprintln!("[ERROR] {}", message),
        Severity::Warning => eprintln!("[WARN]  {}", message),
    }
}

// ============================================================================
// Tests
// ============================================================================
