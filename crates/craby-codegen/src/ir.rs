//! Validated intermediate representation of one module spec.
//!
//! Built by [`crate::analyze`]; immutable afterwards. Records and enums are owned by the
//! [`ModuleSpec`] and referenced from [`TypeRef`] by name.

use std::fmt;

use rowan::TextRange;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleSpec {
    pub name: String,
    pub methods: Vec<MethodSignature>,
    pub records: Vec<RecordType>,
    pub enums: Vec<EnumType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodSignature {
    pub name: String,
    pub params: Vec<ParamDecl>,
    pub ret: TypeRef,
    /// The return is wrapped in `Promise<T>`.
    pub is_async: bool,
    #[serde(skip)]
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(skip)]
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordType {
    pub name: String,
    pub fields: Vec<FieldDecl>,
    #[serde(skip)]
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(skip)]
    pub span: TextRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumKind {
    String,
    Number,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumType {
    pub name: String,
    pub kind: EnumKind,
    pub members: Vec<EnumMember>,
    #[serde(skip)]
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumMember {
    pub name: String,
    pub value: EnumValue,
    #[serde(skip)]
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EnumValue {
    String(String),
    Number(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Number,
    String,
    Boolean,
    Void,
}

/// A type form outside the supported subset, kept with its source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnsupportedForm {
    pub origin: String,
    pub reason: String,
    #[serde(skip)]
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "of", rename_all = "lowercase")]
pub enum TypeRef {
    Primitive(Primitive),
    Record(String),
    Enum(String),
    Array(Box<TypeRef>),
    Nullable(Box<TypeRef>),
    /// Asynchronous result (`Promise<T>`).
    Deferred(Box<TypeRef>),
    /// Push-notification channel (`Signal`).
    Reactive,
    Unsupported(UnsupportedForm),
}

impl ModuleSpec {
    pub fn record(&self, name: &str) -> Option<&RecordType> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn enum_type(&self, name: &str) -> Option<&EnumType> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Methods that take a `Signal` parameter.
    pub fn signal_methods(&self) -> impl Iterator<Item = &MethodSignature> {
        self.methods.iter().filter(|m| m.has_signal())
    }
}

impl MethodSignature {
    pub fn has_signal(&self) -> bool {
        self.params.iter().any(|p| p.ty == TypeRef::Reactive)
    }
}

impl TypeRef {
    pub const VOID: TypeRef = TypeRef::Primitive(Primitive::Void);

    pub fn is_void(&self) -> bool {
        *self == Self::VOID
    }

    /// Record and enum names this type mentions, in visiting order.
    pub fn named(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_named(&mut out);
        out
    }

    fn collect_named<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            TypeRef::Record(name) | TypeRef::Enum(name) => out.push(name),
            TypeRef::Array(inner) | TypeRef::Nullable(inner) | TypeRef::Deferred(inner) => {
                inner.collect_named(out)
            }
            TypeRef::Primitive(_) | TypeRef::Reactive | TypeRef::Unsupported(_) => {}
        }
    }

    /// Strips one `Deferred` layer.
    pub fn settled(&self) -> &TypeRef {
        match self {
            TypeRef::Deferred(inner) => inner,
            other => other,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Primitive::Number => "number",
            Primitive::String => "string",
            Primitive::Boolean => "boolean",
            Primitive::Void => "void",
        })
    }
}

/// Spec-language rendering, used by `show` and in messages.
impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(p) => write!(f, "{p}"),
            TypeRef::Record(name) | TypeRef::Enum(name) => f.write_str(name),
            TypeRef::Array(inner) => write!(f, "Array<{inner}>"),
            TypeRef::Nullable(inner) => write!(f, "{inner} | null"),
            TypeRef::Deferred(inner) => write!(f, "Promise<{inner}>"),
            TypeRef::Reactive => f.write_str("Signal"),
            TypeRef::Unsupported(form) => f.write_str(&form.origin),
        }
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumValue::String(s) => write!(f, "'{s}'"),
            EnumValue::Number(n) => write!(f, "{n}"),
        }
    }
}
