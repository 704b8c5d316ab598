pub mod binder;
pub mod checker;
pub mod elements;
pub mod error;
pub mod resolver;
pub mod value;

pub use binder::{BoundCall, BoundParam, CallArgs, Param, Signature};
pub use checker::{CheckPolicy, CheckedFunction, TypeCheck};
pub use elements::{describe_elements, element_type_check};
pub use error::{BindError, ValidateError};
pub use resolver::describe;
pub use value::Value;

/// Bind and validate one call against a manifest-declared function,
/// using the default policy (raise on error, report warnings).
pub fn check_manifest_call(
    manifest: &veritype_common::SignatureManifest,
    function: &str,
    args: &CallArgs,
) -> error::Result<BoundCall> {
    TypeCheck::new().check_manifest_call(manifest, function, args)
}
