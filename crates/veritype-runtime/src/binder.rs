//! Call binding: match the concrete arguments of one call to a declared
//! parameter list, applying defaults.
//!
//! Signatures are registered explicitly (built in code or loaded from a
//! manifest) rather than introspected. Binding failures are a distinct
//! error class raised before any conformance checking runs.

use veritype_common::manifest::FunctionDecl;
use veritype_common::typespec::TypeSpec;

use crate::error::BindError;
use crate::value::Value;

/// One declared parameter.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub spec: TypeSpec,
    pub default: Option<Value>,
}

/// A callable's declared parameter list, in declaration order.
#[derive(Debug, Clone)]
pub struct Signature {
    pub name: String,
    pub params: Vec<Param>,
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Declare a required parameter.
    pub fn param(mut self, name: impl Into<String>, spec: TypeSpec) -> Self {
        self.params.push(Param {
            name: name.into(),
            spec,
            default: None,
        });
        self
    }

    /// Declare a parameter with a default value.
    pub fn param_with_default(
        mut self,
        name: impl Into<String>,
        spec: TypeSpec,
        default: Value,
    ) -> Self {
        self.params.push(Param {
            name: name.into(),
            spec,
            default: Some(default),
        });
        self
    }

    /// Build a signature from a manifest declaration, converting TOML
    /// defaults to runtime values.
    pub fn from_decl(decl: &FunctionDecl) -> Self {
        Self {
            name: decl.name.clone(),
            params: decl
                .params
                .iter()
                .map(|p| Param {
                    name: p.name.clone(),
                    spec: p.spec.clone(),
                    default: p.default.as_ref().map(Value::from_toml),
                })
                .collect(),
        }
    }

    /// Bind one call's arguments to this parameter list.
    ///
    /// Every parameter ends up with a concrete value: the explicit argument
    /// if supplied, else its default. Arity problems, unknown keywords, and
    /// missing required arguments fail here, before validation.
    pub fn bind(&self, args: &CallArgs) -> Result<BoundCall, BindError> {
        if args.positional.len() > self.params.len() {
            return Err(BindError::TooManyPositional {
                function: self.name.clone(),
                expected: self.params.len(),
                given: args.positional.len(),
            });
        }
        for (i, (name, _)) in args.keyword.iter().enumerate() {
            if !self.params.iter().any(|p| p.name == *name) {
                return Err(BindError::UnknownKeyword {
                    function: self.name.clone(),
                    name: name.clone(),
                });
            }
            if args.keyword[..i].iter().any(|(earlier, _)| earlier == name) {
                return Err(BindError::DuplicateArgument {
                    function: self.name.clone(),
                    name: name.clone(),
                });
            }
        }

        let mut params = Vec::with_capacity(self.params.len());
        for (index, param) in self.params.iter().enumerate() {
            let positional = args.positional.get(index);
            let keyword = args
                .keyword
                .iter()
                .find(|(name, _)| *name == param.name)
                .map(|(_, value)| value);
            let value = match (positional, keyword) {
                (Some(_), Some(_)) => {
                    return Err(BindError::DuplicateArgument {
                        function: self.name.clone(),
                        name: param.name.clone(),
                    });
                }
                (Some(v), None) | (None, Some(v)) => v.clone(),
                (None, None) => match &param.default {
                    Some(default) => default.clone(),
                    None => {
                        return Err(BindError::MissingArgument {
                            function: self.name.clone(),
                            name: param.name.clone(),
                        });
                    }
                },
            };
            params.push(BoundParam {
                name: param.name.clone(),
                value,
                spec: param.spec.clone(),
            });
        }

        Ok(BoundCall {
            function: self.name.clone(),
            params,
        })
    }
}

/// The concrete arguments of one call.
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    pub positional: Vec<Value>,
    pub keyword: Vec<(String, Value)>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: Value) -> Self {
        self.positional.push(value);
        self
    }

    pub fn kwarg(mut self, name: impl Into<String>, value: Value) -> Self {
        self.keyword.push((name.into(), value));
        self
    }
}

/// One bound parameter: name, concrete value, declared spec.
#[derive(Debug, Clone)]
pub struct BoundParam {
    pub name: String,
    pub value: Value,
    pub spec: TypeSpec,
}

/// The resolved parameter list for one invocation, in declaration order.
/// Lives only for the duration of that call.
#[derive(Debug, Clone)]
pub struct BoundCall {
    pub function: String,
    pub params: Vec<BoundParam>,
}

impl BoundCall {
    /// Look up a bound value by parameter name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }
}

// ============================================================================
// Tests
// ============================================================================
