pub mod diagnostics;
pub mod manifest;
pub mod typespec;

pub use diagnostics::{Diagnostic, DiagnosticKind, Severity, ValidationResult};
pub use manifest::{ManifestError, SignatureManifest};
pub use typespec::{TypeSpec, TypeTag};
