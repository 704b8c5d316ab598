use std::fmt;

/// The runtime type identity of a value, and the unit a declaration names.
///
/// Tags form a small subtype lattice: `Any` accepts everything, `Number`
/// accepts `Int` and `Float`, and every tag accepts itself. Struct tags
/// compare by declared name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    Int,
    Float,
    /// Abstract numeric supertype of Int and Float.
    Number,
    String,
    Bool,
    Nil,
    Array,
    Map,
    /// Top type: every value conforms.
    Any,
    /// A named struct type (compared by name).
    Struct(String),
}

impl TypeTag {
    /// Canonical display name, without quotes.
    ///
    /// Total over all tags: a struct identity with no printable name falls
    /// back to a generic label instead of failing.
    pub fn display_name(&self) -> &str {
        match self {
            TypeTag::Int => "Int",
            TypeTag::Float => "Float",
            TypeTag::Number => "Number",
            TypeTag::String => "String",
            TypeTag::Bool => "Bool",
            TypeTag::Nil => "Nil",
            TypeTag::Array => "Array",
            TypeTag::Map => "Map",
            TypeTag::Any => "Any",
            TypeTag::Struct(name) => {
                if name.is_empty() {
                    "<anonymous struct>"
                } else {
                    name
                }
            }
        }
    }

    /// Quoted form used in diagnostic messages: `'Int'`.
    pub fn literal(&self) -> String {
        format!("'{}'", self.display_name())
    }

    /// Instance-of relation: does a value tagged `actual` conform to `self`?
    pub fn accepts(&self, actual: &TypeTag) -> bool {
        match (self, actual) {
            (TypeTag::Any, _) => true,
            (TypeTag::Number, TypeTag::Int | TypeTag::Float | TypeTag::Number) => true,
            _ => self == actual,
        }
    }

    /// Parse a single type token from a manifest type expression.
    /// Unknown but identifier-shaped tokens become struct tags; anything
    /// else is not a type.
    pub fn parse(token: &str) -> Option<TypeTag> {
        match token {
            "Int" => Some(TypeTag::Int),
            "Float" => Some(TypeTag::Float),
            "Number" => Some(TypeTag::Number),
            "String" => Some(TypeTag::String),
            "Bool" => Some(TypeTag::Bool),
            "Nil" => Some(TypeTag::Nil),
            "Array" => Some(TypeTag::Array),
            "Map" => Some(TypeTag::Map),
            "Any" => Some(TypeTag::Any),
            _ => {
                if is_struct_ident(token) {
                    Some(TypeTag::Struct(token.to_string()))
                } else {
                    None
                }
            }
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Struct type names start with an uppercase letter, rest alphanumeric or '_'.
fn is_struct_ident(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    }
}

/// The declared type requirement for one parameter.
///
/// `NullSentinel` and `UnionList` are the deprecated historical spellings
/// (the nil value used as an annotation, and a raw list of types as a
/// union). Both still validate, but each emits a warning recommending the
/// explicit form (`Nil`, or a pipe union).
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSpec {
    /// No annotation given; always conforms.
    Absent,
    Single(TypeTag),
    /// Deprecated: nil value used where a type was expected. Validates as
    /// `Single(Nil)` plus a warning.
    NullSentinel,
    /// Explicit union: conforms if any member conforms, first match wins.
    Union(Vec<TypeSpec>),
    /// Deprecated: raw list of types as a union. Same semantics as `Union`
    /// plus a warning.
    UnionList(Vec<TypeSpec>),
    /// The annotation does not denote a type; carries the offending text.
    Invalid(String),
}

impl TypeSpec {
    /// Parse a manifest type expression: a single token (`"Int"`,
    /// `"Greeting"`, the sentinel `"None"`) or a pipe union
    /// (`"Int | String"`).
    pub fn parse(expr: &str) -> TypeSpec {
        let expr = expr.trim();
        if expr.contains('|') {
            let members = expr.split('|').map(Self::parse_token).collect();
            return TypeSpec::Union(members);
        }
        Self::parse_token(expr)
    }

    fn parse_token(token: &str) -> TypeSpec {
        let token = token.trim();
        if token == "None" {
            return TypeSpec::NullSentinel;
        }
        match TypeTag::parse(token) {
            Some(tag) => TypeSpec::Single(tag),
            None => TypeSpec::Invalid(token.to_string()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
