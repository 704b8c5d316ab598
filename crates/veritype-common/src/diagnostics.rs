use std::fmt;

use crate::typespec::TypeTag;

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Structured cause of a diagnostic. Text is rendered only at the
/// boundary (`Display`); dedup and merge operate on these fields.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    /// The value's type did not match any required type. `required` holds
    /// more than one tag after union mismatches are merged.
    Mismatch {
        required: Vec<TypeTag>,
        actual: TypeTag,
    },
    /// The declared annotation is not a type.
    InvalidAnnotation,
    /// A union spec with zero members.
    EmptySpec,
    /// An empty sequence passed to the element checker.
    EmptyArgument,
    /// Deprecated: nil value used as an annotation.
    NilValueAnnotation,
    /// Deprecated: raw list of types used as a union.
    TypeListAnnotation,
}

/// One validation error or warning, tied to the parameter that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub parameter: String,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn error(parameter: impl Into<String>, kind: DiagnosticKind) -> Self {
        Self {
            severity: Severity::Error,
            parameter: parameter.into(),
            kind,
        }
    }

    pub fn warning(parameter: impl Into<String>, kind: DiagnosticKind) -> Self {
        Self {
            severity: Severity::Warning,
            parameter: parameter.into(),
            kind,
        }
    }

    /// A single-alternative type mismatch.
    pub fn mismatch(parameter: impl Into<String>, required: TypeTag, actual: TypeTag) -> Self {
        Self::error(
            parameter,
            DiagnosticKind::Mismatch {
                required: vec![required],
                actual,
            },
        )
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Rendered message body, without a severity prefix.
    pub fn message(&self) -> String {
        match &self.kind {
            DiagnosticKind::Mismatch { required, actual } => format!(
                "argument '{}' must be {}, not {}",
                self.parameter,
                join_literals(required),
                actual.literal()
            ),
            DiagnosticKind::InvalidAnnotation => {
                format!("annotation for parameter '{}' must be a type", self.parameter)
            }
            DiagnosticKind::EmptySpec => format!(
                "type specification cannot be empty for parameter '{}'",
                self.parameter
            ),
            DiagnosticKind::EmptyArgument => {
                format!("argument '{}' cannot be empty", self.parameter)
            }
            DiagnosticKind::NilValueAnnotation => format!(
                "annotation for parameter '{}' is the nil value; declare the type 'Nil' instead",
                self.parameter
            ),
            DiagnosticKind::TypeListAnnotation => format!(
                "annotation for parameter '{}' is a list of types; prefer an explicit union type",
                self.parameter
            ),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Join required-type labels: `'A', 'B' or 'C'`.
fn join_literals(tags: &[TypeTag]) -> String {
    match tags {
        [] => String::new(),
        [only] => only.literal(),
        [init @ .., last] => {
            let init: Vec<String> = init.iter().map(TypeTag::literal).collect();
            format!("{} or {}", init.join(", "), last.literal())
        }
    }
}

/// Ordered errors and warnings produced by validating one value against
/// one spec. Recursive union resolution produces nested results that are
/// folded into the outermost one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one diagnostic, routed by severity.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            self.errors.push(diagnostic);
        } else {
            self.warnings.push(diagnostic);
        }
    }

    /// Append every diagnostic from another result, preserving order.
    pub fn extend(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// True when no errors were recorded (warnings do not affect conformance).
    pub fn conforms(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Outermost-level cleanup: dedup errors, merge mismatches, dedup
    /// warnings. Idempotent.
    pub fn finalize(&mut self) {
        dedup(&mut self.errors);
        self.merge_mismatches();
        dedup(&mut self.warnings);
    }

    /// Collapse two or more `Mismatch` errors into one combined entry whose
    /// required list follows first-seen order. Only ever meaningful on the
    /// error list of a single union resolution, where every mismatch
    /// describes the same parameter and value. Other kinds (e.g. a union
    /// member that is not a type) pass through in place.
    fn merge_mismatches(&mut self) {
        let mismatches = self
            .errors
            .iter()
            .filter(|d| matches!(d.kind, DiagnosticKind::Mismatch { .. }))
            .count();
        if mismatches < 2 {
            return;
        }

        let mut required: Vec<TypeTag> = Vec::new();
        let mut actual_tag: Option<TypeTag> = None;
        let mut parameter: Option<String> = None;
        for diag in &self.errors {
            if let DiagnosticKind::Mismatch { required: r, actual } = &diag.kind {
                for tag in r {
                    if !required.contains(tag) {
                        required.push(tag.clone());
                    }
                }
                if actual_tag.is_none() {
                    actual_tag = Some(actual.clone());
                    parameter = Some(diag.parameter.clone());
                }
            }
        }
        let (actual, parameter) = match (actual_tag, parameter) {
            (Some(a), Some(p)) => (a, p),
            _ => return,
        };

        // The merged entry takes the position of the first mismatch.
        let mut merged = Some(Diagnostic::error(
            parameter,
            DiagnosticKind::Mismatch { required, actual },
        ));
        let mut out = Vec::with_capacity(self.errors.len());
        for diag in self.errors.drain(..) {
            if matches!(diag.kind, DiagnosticKind::Mismatch { .. }) {
                if let Some(m) = merged.take() {
                    out.push(m);
                }
            } else {
                out.push(diag);
            }
        }
        self.errors = out;
    }
}

/// Stable structural dedup: drop any diagnostic identical to an earlier
/// one, preserving first occurrence order.
fn dedup(list: &mut Vec<Diagnostic>) {
    let mut seen: Vec<Diagnostic> = Vec::new();
    list.retain(|d| {
        if seen.contains(d) {
            false
        } else {
            seen.push(d.clone());
            true
        }
    });
}

// ============================================================================
// Tests
// ============================================================================
