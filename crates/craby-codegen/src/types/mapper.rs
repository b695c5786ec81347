use rowan::TextRange;

use super::{
    MappedField, MappedMethod, MappedModule, MappedRecord, MethodKind, Position, TargetType,
    UnsupportedTypeError,
};
use crate::ir::{ModuleSpec, Primitive, TypeRef};

/// Maps IR types against the records and enums of one module.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'a> {
    spec: &'a ModuleSpec,
}

/// Why a type was rejected, before the caller attaches its context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub origin: String,
    pub reason: String,
    pub span: Option<TextRange>,
}

impl Rejection {
    fn new(ty: &TypeRef, reason: impl Into<String>) -> Self {
        Self {
            origin: ty.to_string(),
            reason: reason.into(),
            span: None,
        }
    }

    fn into_error(self, context: String, fallback: TextRange) -> UnsupportedTypeError {
        UnsupportedTypeError {
            origin: self.origin,
            context,
            reason: self.reason,
            span: self.span.unwrap_or(fallback),
        }
    }
}

impl<'a> TypeMapper<'a> {
    pub fn new(spec: &'a ModuleSpec) -> Self {
        Self { spec }
    }

    pub fn map(&self, ty: &TypeRef, position: Position) -> Result<TargetType, Rejection> {
        match ty {
            TypeRef::Primitive(Primitive::Void) => match position {
                Position::Return => Ok(TargetType::Void),
                _ => Err(Rejection::new(ty, "`void` is only valid as a return type")),
            },
            TypeRef::Primitive(Primitive::Number) => Ok(TargetType::Number),
            TypeRef::Primitive(Primitive::String) => Ok(TargetType::String),
            TypeRef::Primitive(Primitive::Boolean) => Ok(TargetType::Boolean),
            TypeRef::Record(name) => match self.spec.record(name) {
                Some(_) => Ok(TargetType::Record(name.clone())),
                None => Err(Rejection::new(ty, "record is not part of this module")),
            },
            TypeRef::Enum(name) => match self.spec.enum_type(name) {
                Some(_) => Ok(TargetType::Enum(name.clone())),
                None => Err(Rejection::new(ty, "enum is not part of this module")),
            },
            TypeRef::Array(inner) => {
                let element = self.map(inner, Position::Element)?;
                Ok(TargetType::Array(Box::new(element)))
            }
            TypeRef::Nullable(inner) => {
                let reason = match inner.as_ref() {
                    TypeRef::Nullable(_) => Some("nullable types cannot be nested"),
                    TypeRef::Deferred(_) => Some("`Promise` cannot be nullable"),
                    TypeRef::Reactive => Some("`Signal` cannot be nullable"),
                    TypeRef::Primitive(Primitive::Void) => Some("`void` cannot be nullable"),
                    _ => None,
                };
                if let Some(reason) = reason {
                    return Err(Rejection::new(ty, reason));
                }
                let inner = self.map(inner, position)?;
                Ok(TargetType::Nullable(Box::new(inner)))
            }
            TypeRef::Deferred(inner) => {
                if position != Position::Return {
                    return Err(Rejection::new(
                        ty,
                        "`Promise` is only valid as a method return type",
                    ));
                }
                if matches!(inner.as_ref(), TypeRef::Deferred(_)) {
                    return Err(Rejection::new(ty, "`Promise` cannot be nested"));
                }
                let inner = self.map(inner, Position::Return)?;
                Ok(TargetType::Promise(Box::new(inner)))
            }
            TypeRef::Reactive => match position {
                Position::Param => Ok(TargetType::Signal),
                _ => Err(Rejection::new(ty, "`Signal` is only valid as a method parameter")),
            },
            TypeRef::Unsupported(form) => Err(Rejection {
                origin: form.origin.clone(),
                reason: form.reason.clone(),
                span: Some(form.span),
            }),
        }
    }
}

/// Map every method and record of `spec`. Stops at the first unsupported type.
pub fn map_module(spec: &ModuleSpec) -> Result<MappedModule, UnsupportedTypeError> {
    let mapper = TypeMapper::new(spec);

    let mut records = Vec::with_capacity(spec.records.len());
    for record in &spec.records {
        let mut fields = Vec::with_capacity(record.fields.len());
        for field in &record.fields {
            let ty = mapper.map(&field.ty, Position::Field).map_err(|r| {
                r.into_error(
                    format!("field `{}` of `{}`", field.name, record.name),
                    field.span,
                )
            })?;
            fields.push(MappedField {
                name: field.name.clone(),
                ty,
                span: field.span,
            });
        }
        records.push(MappedRecord {
            name: record.name.clone(),
            fields,
            span: record.span,
        });
    }

    let mut methods = Vec::with_capacity(spec.methods.len());
    for method in &spec.methods {
        let mut params = Vec::with_capacity(method.params.len());
        for param in &method.params {
            let ty = mapper.map(&param.ty, Position::Param).map_err(|r| {
                r.into_error(
                    format!("parameter `{}` of `{}`", param.name, method.name),
                    param.span,
                )
            })?;
            params.push(MappedField {
                name: param.name.clone(),
                ty,
                span: param.span,
            });
        }

        let ret = mapper
            .map(&method.ret, Position::Return)
            .map_err(|r| r.into_error(format!("return type of `{}`", method.name), method.span))?;

        let kind = if params.iter().any(|p| p.ty == TargetType::Signal) {
            check_signal_method(method.name.as_str(), &params, &ret, &method.ret, method.span)?;
            MethodKind::Signal
        } else {
            MethodKind::Call
        };

        methods.push(MappedMethod {
            name: method.name.clone(),
            params,
            ret,
            is_async: method.is_async,
            kind,
            span: method.span,
        });
    }

    Ok(MappedModule {
        name: spec.name.clone(),
        methods,
        records,
        enums: spec.enums.clone(),
    })
}

fn check_signal_method(
    name: &str,
    params: &[MappedField],
    ret: &TargetType,
    ret_ref: &TypeRef,
    span: TextRange,
) -> Result<(), UnsupportedTypeError> {
    if !ret.is_void() {
        return Err(UnsupportedTypeError {
            origin: ret_ref.to_string(),
            context: format!("return type of `{name}`"),
            reason: "a method taking a `Signal` must return `void`".to_string(),
            span,
        });
    }
    if let Some(extra) = params.iter().find(|p| p.ty != TargetType::Signal) {
        return Err(UnsupportedTypeError {
            origin: "Signal".to_string(),
            context: format!("method `{name}`"),
            reason: format!(
                "a `Signal` must be the only parameter, found `{}` as well",
                extra.name
            ),
            span: extra.span,
        });
    }
    if params.len() > 1 {
        return Err(UnsupportedTypeError {
            origin: "Signal".to_string(),
            context: format!("method `{name}`"),
            reason: "a method takes at most one `Signal`".to_string(),
            span,
        });
    }
    Ok(())
}
