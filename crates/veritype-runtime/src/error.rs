use thiserror::Error;

/// A call could not be matched to the declared parameter list.
///
/// Binding failures are raised before any conformance checking runs and
/// are never subject to the raise/report policy.
#[derive(Error, Debug)]
pub enum BindError {
    #[error("too many positional arguments for '{function}': expected at most {expected}, got {given}")]
    TooManyPositional {
        function: String,
        expected: usize,
        given: usize,
    },

    #[error("unexpected keyword argument '{name}' for '{function}'")]
    UnknownKeyword { function: String, name: String },

    #[error("duplicate value for argument '{name}' of '{function}'")]
    DuplicateArgument { function: String, name: String },

    #[error("missing required argument '{name}' of '{function}'")]
    MissingArgument { function: String, name: String },

    #[error("unknown function '{0}'")]
    UnknownFunction(String),
}

/// Errors raised by the validation orchestrator.
///
/// `Failed` and `Warnings` carry the full newline-joined, bullet-prefixed
/// list of merged per-parameter messages for one call.
#[derive(Error, Debug)]
pub enum ValidateError {
    #[error("{0}")]
    Bind(#[from] BindError),

    #[error("type check failed:\n{0}")]
    Failed(String),

    #[error("type check warnings:\n{0}")]
    Warnings(String),
}

pub type Result<T> = std::result::Result<T, ValidateError>;
