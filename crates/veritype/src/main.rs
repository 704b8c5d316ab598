use std::path::PathBuf;
use std::process;

use clap::Parser;

use veritype_common::diagnostics::Severity;
use veritype_common::manifest;
use veritype_common::typespec::TypeSpec;
use veritype_runtime::{BoundCall, CallArgs, CheckPolicy, TypeCheck, Value};

/// Veritype argument validator — checks call arguments against declared
/// parameter types.
#[derive(Parser)]
#[command(
    name = "veritype",
    version,
    about,
    long_about = "Veritype argument validator.\n\nValidates call arguments against the parameter types declared in a\nVeritype.toml signature manifest.\n\nExamples:\n  veritype check greet --args '{\"a\": 5}'          Validate one call\n  veritype check greet --positional '[5, \"y\"]'    Positional arguments\n  veritype elements '[1, \"a\"]' --type Int         Validate array elements"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Validate one call against a declared function signature
    Check {
        /// Function name as declared in the manifest
        function: String,

        /// Path to Veritype.toml (default: search upward from the cwd)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Keyword arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,

        /// Positional arguments as a JSON array
        #[arg(short, long)]
        positional: Option<String>,

        /// Exit non-zero on warnings too
        #[arg(long)]
        strict_warnings: bool,
    },

    /// Validate every element of a JSON array against one required type
    Elements {
        /// Elements as a JSON array
        input: String,

        /// Required type expression, e.g. "Int" or "Int | Nil"
        #[arg(short = 't', long = "type")]
        type_expr: String,

        /// Sequence name used in diagnostics
        #[arg(short, long, default_value = "")]
        name: String,

        /// Exit non-zero on warnings too
        #[arg(long)]
        strict_warnings: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Check {
            function,
            manifest,
            args,
            positional,
            strict_warnings,
        } => run_check(function, manifest, &args, positional.as_deref(), strict_warnings),
        Command::Elements {
            input,
            type_expr,
            name,
            strict_warnings,
        } => run_elements(&input, &type_expr, &name, strict_warnings),
    }
}

fn run_check(
    function: String,
    manifest_path: Option<PathBuf>,
    args: &str,
    positional: Option<&str>,
    strict_warnings: bool,
) {
    let manifest = match manifest_path {
        Some(path) => manifest::load_manifest(&path),
        None => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            manifest::find_and_load_manifest(&cwd)
        }
    };
    let manifest = match manifest {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    let call_args = build_call_args(args, positional);
    let check = checker(strict_warnings);
    let bound = match check.check_manifest_call(&manifest, &function, &call_args) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };
    println!("'{}' conforms: {}", bound.function, bound_json(&bound));
}

fn run_elements(input: &str, type_expr: &str, name: &str, strict_warnings: bool) {
    let elements = match parse_json(input) {
        Value::Array(items) => items,
        _ => {
            eprintln!("error: elements input must be a JSON array");
            process::exit(1);
        }
    };
    let spec = TypeSpec::parse(type_expr);
    if let Err(e) = checker(strict_warnings).check_elements(&elements, &spec, name) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
    let label = if name.is_empty() { "_" } else { name };
    println!("'{}' conforms", label);
}

/// An orchestrator that raises on errors (and on warnings when strict)
/// and reports everything else to stderr.
fn checker(strict_warnings: bool) -> TypeCheck {
    let mut check = TypeCheck::with_policy(CheckPolicy {
        raise_on_error: true,
        raise_on_warning: strict_warnings,
    });
    check.set_report_handler(|severity, message| {
        let prefix = match severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        eprintln!("{}: {}", prefix, message);
    });
    check
}

/// The bound arguments of a validated call, defaults applied, as a JSON
/// object.
fn bound_json(bound: &BoundCall) -> serde_json::Value {
    let map: serde_json::Map<String, serde_json::Value> = bound
        .params
        .iter()
        .map(|p| (p.name.clone(), p.value.to_json()))
        .collect();
    serde_json::Value::Object(map)
}

/// Assemble CallArgs from the --args JSON object and optional --positional
/// JSON array.
fn build_call_args(args: &str, positional: Option<&str>) -> CallArgs {
    let mut call_args = CallArgs::new();

    if let Some(positional) = positional {
        match parse_json(positional) {
            Value::Array(items) => call_args.positional = items,
            _ => {
                eprintln!("error: --positional must be a JSON array");
                process::exit(1);
            }
        }
    }

    match parse_json(args) {
        Value::Map(pairs) => call_args.keyword = pairs,
        _ => {
            eprintln!("error: --args must be a JSON object");
            process::exit(1);
        }
    }

    call_args
}

fn parse_json(input: &str) -> Value {
    match serde_json::from_str::<serde_json::Value>(input) {
        Ok(json) => Value::from_json(&json),
        Err(e) => {
            eprintln!("error: invalid JSON: {}", e);
            process::exit(1);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use veritype_common::typespec::TypeTag;
    use veritype_runtime::Signature;

    #[test]
    fn bound_arguments_render_as_json_object() {
        let sig = Signature::new("greet")
            .param("a", TypeSpec::Single(TypeTag::Int))
            .param_with_default(
                "b",
                TypeSpec::Single(TypeTag::String),
                Value::String("x".into()),
            );
        let bound = sig.bind(&CallArgs::new().arg(Value::Int(5))).unwrap();
        assert_eq!(bound_json(&bound).to_string(), r#"{"a":5,"b":"x"}"#);
    }
}
