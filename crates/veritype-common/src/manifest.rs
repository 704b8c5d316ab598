use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::typespec::TypeSpec;

/// Default manifest file name.
pub const MANIFEST_FILE: &str = "Veritype.toml";

/// The parsed signature manifest: declared callables with their parameter
/// names, type expressions, and default values.
#[derive(Debug, Clone)]
pub struct SignatureManifest {
    pub functions: Vec<FunctionDecl>,
}

/// One declared callable.
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<ParamDecl>,
}

/// One declared parameter. `default` is kept as a raw TOML value; the
/// runtime converts it when building a signature.
#[derive(Debug, Clone)]
pub struct ParamDecl {
    pub name: String,
    pub spec: TypeSpec,
    pub default: Option<toml::Value>,
}

/// Raw TOML structure for deserialization.
#[derive(Deserialize)]
struct RawManifest {
    #[serde(default)]
    functions: Vec<RawFunction>,
}

#[derive(Deserialize)]
struct RawFunction {
    name: String,
    #[serde(default)]
    params: Vec<RawParam>,
}

#[derive(Deserialize)]
struct RawParam {
    name: String,
    #[serde(rename = "type", default)]
    type_expr: Option<RawTypeExpr>,
    #[serde(default)]
    default: Option<toml::Value>,
}

/// A type expression is either a string (`"Int"`, `"Int | String"`) or an
/// array of type expressions (the legacy list-as-union form).
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTypeExpr {
    Expr(String),
    List(Vec<RawTypeExpr>),
}

/// Errors that can occur when loading a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("no Veritype.toml found (searched from {0})")]
    NotFound(String),
    #[error("failed to read Veritype.toml: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("invalid Veritype.toml: {0}")]
    ParseError(String),
    #[error("invalid Veritype.toml: duplicate function '{0}'")]
    DuplicateFunction(String),
    #[error("invalid Veritype.toml: duplicate parameter '{1}' in function '{0}'")]
    DuplicateParam(String, String),
}

/// Walk up from `start_dir` looking for `Veritype.toml`.
/// Returns the path to the manifest file if found.
pub fn find_manifest(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    loop {
        let candidate = current.join(MANIFEST_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load and validate a manifest from a file path.
pub fn load_manifest(path: &Path) -> Result<SignatureManifest, ManifestError> {
    let content = std::fs::read_to_string(path)?;
    parse_manifest(&content)
}

/// Parse and validate a manifest from a string.
pub fn parse_manifest(content: &str) -> Result<SignatureManifest, ManifestError> {
    let raw: RawManifest =
        toml::from_str(content).map_err(|e| ManifestError::ParseError(e.to_string()))?;

    let mut functions: Vec<FunctionDecl> = Vec::with_capacity(raw.functions.len());
    for func in raw.functions {
        if functions.iter().any(|f| f.name == func.name) {
            return Err(ManifestError::DuplicateFunction(func.name));
        }
        let mut params: Vec<ParamDecl> = Vec::with_capacity(func.params.len());
        for param in func.params {
            if params.iter().any(|p| p.name == param.name) {
                return Err(ManifestError::DuplicateParam(func.name, param.name));
            }
            let spec = match param.type_expr {
                Some(expr) => convert_type_expr(expr),
                None => TypeSpec::Absent,
            };
            params.push(ParamDecl {
                name: param.name,
                spec,
                default: param.default,
            });
        }
        functions.push(FunctionDecl {
            name: func.name,
            params,
        });
    }

    Ok(SignatureManifest { functions })
}

/// Find and load the manifest starting from a directory.
pub fn find_and_load_manifest(start_dir: &Path) -> Result<SignatureManifest, ManifestError> {
    let manifest_path = find_manifest(start_dir)
        .ok_or_else(|| ManifestError::NotFound(start_dir.display().to_string()))?;
    load_manifest(&manifest_path)
}

fn convert_type_expr(expr: RawTypeExpr) -> TypeSpec {
    match expr {
        RawTypeExpr::Expr(s) => TypeSpec::parse(&s),
        RawTypeExpr::List(items) => {
            TypeSpec::UnionList(items.into_iter().map(convert_type_expr).collect())
        }
    }
}

impl SignatureManifest {
    pub fn function(&self, name: &str) -> Option<&FunctionDecl> {
        self.functions.iter().find(|f| f.name == name)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typespec::TypeTag;

    fn parse(content: &str) -> Result<SignatureManifest, ManifestError> {
        parse_manifest(content)
    }

    #[test]
    fn parse_basic_manifest() {
        let manifest = parse(
            r#"
            [[functions]]
            name = "greet"

            [[functions.params]]
            name = "count"
            type = "Int"

            [[functions.params]]
            name = "label"
            type = "String"
            default = "x"
            "#,
        )
        .unwrap();

        let func = manifest.function("greet").unwrap();
        assert_eq!(func.params.len(), 2);
        assert_eq!(func.params[0].spec, TypeSpec::Single(TypeTag::Int));
        assert_eq!(
            func.params[1].default,
            Some(toml::Value::String("x".into()))
        );
    }

    #[test]
    fn missing_type_is_absent() {
        let manifest = parse(
            r#"
            [[functions]]
            name = "f"

            [[functions.params]]
            name = "anything"
            "#,
        )
        .unwrap();
        assert_eq!(
            manifest.function("f").unwrap().params[0].spec,
            TypeSpec::Absent
        );
    }

    #[test]
    fn array_type_is_legacy_union_list() {
        let manifest = parse(
            r#"
            [[functions]]
            name = "f"

            [[functions.params]]
            name = "x"
            type = ["Int", "Nil"]
            "#,
        )
        .unwrap();
        assert_eq!(
            manifest.function("f").unwrap().params[0].spec,
            TypeSpec::UnionList(vec![
                TypeSpec::Single(TypeTag::Int),
                TypeSpec::Single(TypeTag::Nil),
            ])
        );
    }

    #[test]
    fn empty_array_type_is_empty_union_list() {
        let manifest = parse(
            r#"
            [[functions]]
            name = "f"

            [[functions.params]]
            name = "x"
            type = []
            "#,
        )
        .unwrap();
        assert_eq!(
            manifest.function("f").unwrap().params[0].spec,
            TypeSpec::UnionList(vec![])
        );
    }

    #[test]
    fn duplicate_function_rejected() {
        let err = parse(
            r#"
            [[functions]]
            name = "f"

            [[functions]]
            name = "f"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::DuplicateFunction(name) if name == "f"));
    }

    #[test]
    fn duplicate_param_rejected() {
        let err = parse(
            r#"
            [[functions]]
            name = "f"

            [[functions.params]]
            name = "x"

            [[functions.params]]
            name = "x"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::DuplicateParam(f, p) if f == "f" && p == "x"));
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        assert!(matches!(
            parse("functions = 3"),
            Err(ManifestError::ParseError(_))
        ));
    }
}
