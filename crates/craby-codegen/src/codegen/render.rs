//! Rust type and expression rendering shared by the Rust emitters.

use craby_core::naming::to_pascal_case;

use crate::bind::BoundModule;
use crate::types::TargetType;

/// Type as the developer sees it, written against the aliases in `types.rs`.
pub(crate) fn rust_type(ty: &TargetType) -> String {
    match ty {
        TargetType::Number => "Number".to_string(),
        TargetType::String => "String".to_string(),
        TargetType::Boolean => "Boolean".to_string(),
        TargetType::Void => "()".to_string(),
        TargetType::Array(inner) => format!("Array<{}>", rust_type(inner)),
        TargetType::Nullable(inner) => format!("Nullable<{}>", rust_type(inner)),
        TargetType::Promise(inner) => format!("Promise<{}>", rust_type(inner)),
        // Signal parameters never reach the Rust side.
        TargetType::Signal => "Signal".to_string(),
        TargetType::Record(name) | TargetType::Enum(name) => to_pascal_case(name),
    }
}

/// Type inside the cxx bridge. `prefix` qualifies bridge-declared names (`bridging::`).
pub(crate) fn ffi_type(ty: &TargetType, prefix: &str) -> String {
    match ty {
        TargetType::Number => "f64".to_string(),
        TargetType::String => "String".to_string(),
        TargetType::Boolean => "bool".to_string(),
        TargetType::Void | TargetType::Signal => "()".to_string(),
        TargetType::Array(inner) => format!("Vec<{}>", ffi_type(inner, prefix)),
        TargetType::Nullable(_) => format!("{prefix}{}", nullable_name(ty)),
        TargetType::Promise(inner) => ffi_type(inner, prefix),
        TargetType::Record(name) | TargetType::Enum(name) => {
            format!("{prefix}{}", to_pascal_case(name))
        }
    }
}

/// Developer type qualified by `prefix` for use outside the types module.
pub(crate) fn model_type(ty: &TargetType, prefix: &str) -> String {
    match ty {
        TargetType::Number => "f64".to_string(),
        TargetType::String => "String".to_string(),
        TargetType::Boolean => "bool".to_string(),
        TargetType::Void | TargetType::Signal => "()".to_string(),
        TargetType::Array(inner) => format!("Vec<{}>", model_type(inner, prefix)),
        TargetType::Nullable(inner) => format!("Option<{}>", model_type(inner, prefix)),
        TargetType::Promise(inner) => model_type(inner, prefix),
        TargetType::Record(name) | TargetType::Enum(name) => {
            format!("{prefix}{}", to_pascal_case(name))
        }
    }
}

/// Name fragment identifying a type inside mirror struct names.
fn suffix(ty: &TargetType) -> String {
    match ty {
        TargetType::Number => "Number".to_string(),
        TargetType::String => "String".to_string(),
        TargetType::Boolean => "Boolean".to_string(),
        TargetType::Void | TargetType::Signal => "Void".to_string(),
        TargetType::Array(inner) => format!("{}Array", suffix(inner)),
        TargetType::Nullable(inner) => format!("Nullable{}", suffix(inner)),
        TargetType::Promise(inner) => suffix(inner),
        TargetType::Record(name) | TargetType::Enum(name) => to_pascal_case(name),
    }
}

/// Bridge struct carrying a nullable value: `{ null: bool, val: T }`.
pub(crate) fn nullable_name(ty: &TargetType) -> String {
    match ty {
        TargetType::Nullable(inner) => format!("Nullable{}", suffix(inner)),
        other => format!("Nullable{}", suffix(other)),
    }
}

/// Direction of a value conversion across the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    IntoFfi,
    FromFfi,
}

/// Expression converting `expr` of type `ty` across the bridge.
pub(crate) fn convert(expr: &str, ty: &TargetType, dir: Direction) -> String {
    match ty {
        _ if ty.is_trivial() => expr.to_string(),
        TargetType::Array(inner) => {
            let target = match dir {
                Direction::IntoFfi => ffi_type(inner, "bridging::"),
                Direction::FromFfi => model_type(inner, "model::"),
            };
            format!(
                "{expr}.into_iter().map(|v| -> {target} {{ {} }}).collect()",
                convert("v", inner, dir)
            )
        }
        TargetType::Promise(inner) => convert(expr, inner, dir),
        _ => format!("{expr}.into()"),
    }
}

/// Placeholder value of a bridge type, used for the `val` of a null mirror.
pub(crate) fn ffi_default(ty: &TargetType, module: &BoundModule) -> String {
    match ty {
        TargetType::Number => "0.0".to_string(),
        TargetType::String => "String::new()".to_string(),
        TargetType::Boolean => "false".to_string(),
        TargetType::Void | TargetType::Signal | TargetType::Promise(_) => "()".to_string(),
        TargetType::Array(_) => "Vec::new()".to_string(),
        TargetType::Nullable(inner) => format!(
            "bridging::{} {{ null: true, val: {} }}",
            nullable_name(ty),
            ffi_default(inner, module)
        ),
        TargetType::Enum(name) => match module.enum_type(name) {
            Some(e) => format!("bridging::{}::{}", e.name, e.first_variant().name),
            None => format!("bridging::{}::default()", to_pascal_case(name)),
        },
        TargetType::Record(name) => match module.record(name) {
            Some(record) => {
                let fields = record
                    .fields
                    .iter()
                    .map(|f| format!("{}: {}", f.rust_name, ffi_default(&f.ty, module)))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("bridging::{} {{ {fields} }}", record.name)
            }
            None => format!("bridging::{}::default()", to_pascal_case(name)),
        },
    }
}
