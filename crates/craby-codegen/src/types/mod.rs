//! Type mapper: IR types to the target representation shared by every emitter.
//!
//! Mapping is pure. The same [`TypeRef`](crate::ir::TypeRef) in the same position
//! always produces the same [`TargetType`], or the same [`UnsupportedTypeError`].

mod mapper;

#[cfg(test)]
mod mapper_tests;

use std::fmt;

use rowan::TextRange;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::ir::EnumType;

pub use mapper::{Rejection, TypeMapper, map_module};

/// A type in a form every emitter can render.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetType {
    Number,
    String,
    Boolean,
    Void,
    Array(Box<TargetType>),
    Nullable(Box<TargetType>),
    Promise(Box<TargetType>),
    Signal,
    Record(String),
    Enum(String),
}

/// Where a type appears. Some forms are only valid in one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Param,
    Return,
    Field,
    Element,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// Plain call, synchronous or async.
    Call,
    /// Registers a listener through a `Signal` parameter.
    Signal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappedModule {
    pub name: String,
    pub methods: Vec<MappedMethod>,
    pub records: Vec<MappedRecord>,
    pub enums: Vec<EnumType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappedMethod {
    pub name: String,
    pub params: Vec<MappedField>,
    pub ret: TargetType,
    pub is_async: bool,
    pub kind: MethodKind,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappedRecord {
    pub name: String,
    pub fields: Vec<MappedField>,
    pub span: TextRange,
}

/// A named, typed slot: a method parameter or a record field.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedField {
    pub name: String,
    pub ty: TargetType,
    pub span: TextRange,
}

/// A type form outside the supported subset, or a supported form in the wrong place.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported type `{origin}` in {context}: {reason}")]
pub struct UnsupportedTypeError {
    /// Source text of the offending type.
    pub origin: String,
    /// What the type was attached to, e.g. "field `value` of `Item`".
    pub context: String,
    pub reason: String,
    pub span: TextRange,
}

impl UnsupportedTypeError {
    /// Same error as a renderable diagnostic.
    pub fn to_diagnostics(&self) -> Diagnostics {
        let mut diag = Diagnostics::new();
        diag.report(DiagnosticKind::UnsupportedType, self.span)
            .message(format!("`{}` in {}", self.origin, self.context))
            .hint(self.reason.clone())
            .emit();
        diag
    }
}

impl TargetType {
    pub fn is_void(&self) -> bool {
        *self == TargetType::Void
    }

    /// Value type a caller finally receives, with one `Promise` layer removed.
    pub fn settled(&self) -> &TargetType {
        match self {
            TargetType::Promise(inner) => inner,
            other => other,
        }
    }

    /// Needs no conversion between the bridge and the developer-facing types.
    pub fn is_trivial(&self) -> bool {
        match self {
            TargetType::Number | TargetType::String | TargetType::Boolean | TargetType::Void => true,
            TargetType::Array(inner) => inner.is_trivial(),
            _ => false,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Position::Param => "parameter",
            Position::Return => "return type",
            Position::Field => "field",
            Position::Element => "array element",
        })
    }
}

impl MappedModule {
    pub fn signal_methods(&self) -> impl Iterator<Item = &MappedMethod> {
        self.methods.iter().filter(|m| m.kind == MethodKind::Signal)
    }

    pub fn call_methods(&self) -> impl Iterator<Item = &MappedMethod> {
        self.methods.iter().filter(|m| m.kind == MethodKind::Call)
    }

    pub fn record(&self, name: &str) -> Option<&MappedRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn enum_type(&self, name: &str) -> Option<&EnumType> {
        self.enums.iter().find(|e| e.name == name)
    }
}
