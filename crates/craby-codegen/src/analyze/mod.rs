//! IR builder: turns a parsed spec unit into a validated [`ModuleSpec`].
//!
//! Runs name collection, eager alias resolution, method/record/enum lowering and
//! record cycle detection. Every problem is reported; the IR is produced only when
//! none were found.

mod record_cycles;
mod resolve;

#[cfg(test)]
mod record_cycles_tests;

use std::collections::HashMap;

use indexmap::IndexSet;
use rowan::TextRange;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::ir::{
    EnumKind, EnumMember, EnumType, EnumValue, FieldDecl, MethodSignature, ModuleSpec, ParamDecl,
    RecordType, TypeRef,
};
use crate::parser::{
    EnumDecl, Ident, InterfaceDecl, Literal, Member, ModuleHandle, Param, PropertyMember,
    SourceFile, TypeExpr, TypeExprKind,
};

use record_cycles::check_record_cycles;
use resolve::{Decl, Resolver, collect_declarations};

/// Interface used when the module handle has no type argument.
pub const DEFAULT_SPEC_INTERFACE: &str = "Spec";

pub fn build_module(file: &SourceFile, source: &str) -> Result<ModuleSpec, Diagnostics> {
    let mut diag = Diagnostics::new();
    let handle = module_handle(file, &mut diag);
    let table = collect_declarations(file, &mut diag);

    let spec_name = handle.map(|h| {
        h.spec_interface
            .as_ref()
            .map_or(DEFAULT_SPEC_INTERFACE, |i| i.text.as_str())
    });
    let spec_decl = match (handle, spec_name) {
        (Some(handle), Some(name)) => match table.get(name) {
            Some(Decl::Interface(decl)) => Some(*decl),
            _ => {
                let range = handle.spec_interface.as_ref().map_or(handle.span, |i| i.span);
                diag.report(DiagnosticKind::MissingSpecInterface, range)
                    .message(format!("no interface named `{name}`"))
                    .emit();
                None
            }
        },
        _ => None,
    };

    let mut records = Vec::new();
    let mut enums = Vec::new();
    // Interfaces with methods are only an error when used as a record.
    let mut method_interfaces: Vec<&InterfaceDecl> = Vec::new();
    let methods = {
        let mut resolver = Resolver::new(source, &table, spec_name, &mut diag);
        resolver.resolve_aliases();

        let methods = spec_decl.map_or_else(Vec::new, |d| lower_methods(d, &mut resolver));

        for decl in table.values() {
            match decl {
                Decl::Interface(d) if Some(d.name.text.as_str()) != spec_name => {
                    if d.members.iter().any(|m| matches!(m, Member::Method(_))) {
                        method_interfaces.push(*d);
                    } else if let Some(record) = lower_interface_record(d, &mut resolver) {
                        records.push(record);
                    }
                }
                Decl::Alias(alias) => {
                    if let TypeExprKind::Object(props) = &alias.ty.kind
                        && let Some(record) =
                            lower_record(&alias.name, props, alias.span, &mut resolver)
                    {
                        records.push(record);
                    }
                }
                Decl::Enum(d) => {
                    if let Some(e) = lower_enum(d, resolver.diagnostics()) {
                        enums.push(e);
                    }
                }
                Decl::Interface(_) => {}
            }
        }
        methods
    };

    check_record_cycles(&records, &mut diag);

    let referenced = referenced_names(&methods, &records);
    for decl in method_interfaces {
        if referenced.contains(&decl.name.text) {
            report_record_methods(decl, &mut diag);
        }
    }

    let Some(handle) = handle else {
        return Err(diag);
    };
    if !diag.is_empty() {
        return Err(diag);
    }

    records.retain(|r| referenced.contains(&r.name));
    enums.retain(|e| referenced.contains(&e.name));

    Ok(ModuleSpec {
        name: handle.module_name.clone(),
        methods,
        records,
        enums,
    })
}

fn module_handle<'a>(file: &'a SourceFile, diag: &mut Diagnostics) -> Option<&'a ModuleHandle> {
    let handles: Vec<&ModuleHandle> = file.handles().collect();
    let (first, rest) = match handles.split_first() {
        Some(split) => split,
        None => {
            diag.report(DiagnosticKind::MissingModuleHandle, TextRange::empty(0.into()))
                .emit();
            return None;
        }
    };

    for extra in rest {
        diag.report(DiagnosticKind::MultipleModuleHandles, extra.span)
            .message(format!("`{}` registers a second module", extra.module_name))
            .related_to("first module handle", first.span)
            .emit();
    }

    if first.module_name.trim().is_empty() {
        diag.report(DiagnosticKind::InvalidModuleHandle, first.span)
            .message("module name cannot be empty")
            .emit();
    } else if !is_module_name(&first.module_name) {
        diag.report(DiagnosticKind::InvalidModuleHandle, first.span)
            .message(format!(
                "`{}` is not a valid module name, use letters, digits and `_`",
                first.module_name
            ))
            .emit();
    }

    Some(*first)
}

/// Module names become Rust, C++ and Kotlin identifiers.
fn is_module_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn lower_methods(decl: &InterfaceDecl, resolver: &mut Resolver<'_, '_>) -> Vec<MethodSignature> {
    let mut methods: Vec<MethodSignature> = Vec::new();
    let mut seen: HashMap<&str, TextRange> = HashMap::new();

    for member in &decl.members {
        let lowered = match member {
            Member::Method(m) => lower_method(
                &m.name,
                m.optional,
                &m.params,
                m.ret.as_ref(),
                m.span,
                resolver,
            ),
            Member::Property(p) => match &p.ty.kind {
                TypeExprKind::Function { params, ret } => {
                    lower_method(&p.name, p.optional, params, Some(&**ret), p.span, resolver)
                }
                _ => {
                    resolver
                        .diagnostics()
                        .report(DiagnosticKind::InvalidMember, p.name.span)
                        .message(format!(
                            "`{}` is a property, module specs declare only methods",
                            p.name.text
                        ))
                        .emit();
                    None
                }
            },
        };

        let name = match member {
            Member::Method(m) => &m.name,
            Member::Property(p) => &p.name,
        };
        if let Some(first) = seen.insert(name.text.as_str(), name.span) {
            resolver
                .diagnostics()
                .report(DiagnosticKind::DuplicateMember, name.span)
                .message(format!("method `{}`", name.text))
                .related_to("first declared here", first)
                .emit();
            continue;
        }

        if let Some(method) = lowered {
            methods.push(method);
        }
    }

    methods
}

fn lower_method(
    name: &Ident,
    optional: bool,
    params: &[Param],
    ret: Option<&TypeExpr>,
    span: TextRange,
    resolver: &mut Resolver<'_, '_>,
) -> Option<MethodSignature> {
    let mut ok = true;
    if optional {
        resolver
            .diagnostics()
            .report(DiagnosticKind::InvalidMember, name.span)
            .message(format!("optional method `{}` is not supported", name.text))
            .emit();
        ok = false;
    }

    let mut lowered_params = Vec::with_capacity(params.len());
    let mut seen: HashMap<&str, TextRange> = HashMap::new();
    for param in params {
        if let Some(first) = seen.insert(param.name.text.as_str(), param.name.span) {
            resolver
                .diagnostics()
                .report(DiagnosticKind::DuplicateMember, param.name.span)
                .message(format!("parameter `{}` of `{}`", param.name.text, name.text))
                .related_to("first declared here", first)
                .emit();
            ok = false;
            continue;
        }
        match lower_param(param, resolver) {
            Some(p) => lowered_params.push(p),
            None => ok = false,
        }
    }

    let Some(ret) = ret else {
        resolver
            .diagnostics()
            .report(DiagnosticKind::InvalidMember, name.span)
            .message(format!("method `{}` needs a return type", name.text))
            .emit();
        return None;
    };
    let ret = resolver.lower(ret)?;

    if !ok {
        return None;
    }

    Some(MethodSignature {
        name: name.text.clone(),
        params: lowered_params,
        is_async: matches!(ret, TypeRef::Deferred(_)),
        ret,
        span,
    })
}

fn lower_param(param: &Param, resolver: &mut Resolver<'_, '_>) -> Option<ParamDecl> {
    if param.rest {
        resolver
            .diagnostics()
            .report(DiagnosticKind::InvalidMember, param.span)
            .message(format!("rest parameter `{}` is not supported", param.name.text))
            .emit();
        return None;
    }
    let Some(ty) = &param.ty else {
        resolver
            .diagnostics()
            .report(DiagnosticKind::InvalidMember, param.name.span)
            .message(format!("parameter `{}` needs a type annotation", param.name.text))
            .emit();
        return None;
    };
    let ty = resolver.lower(ty)?;
    Some(ParamDecl {
        name: param.name.text.clone(),
        ty: if param.optional { nullable(ty) } else { ty },
        span: param.span,
    })
}

fn nullable(ty: TypeRef) -> TypeRef {
    match ty {
        TypeRef::Nullable(_) => ty,
        other => TypeRef::Nullable(Box::new(other)),
    }
}

fn lower_interface_record(
    decl: &InterfaceDecl,
    resolver: &mut Resolver<'_, '_>,
) -> Option<RecordType> {
    if let Some(base) = decl.extends.first() {
        resolver
            .diagnostics()
            .report(DiagnosticKind::InvalidMember, base.span)
            .message(format!(
                "record `{}` cannot extend `{}`, declare the fields directly",
                decl.name.text, base.text
            ))
            .emit();
        return None;
    }

    let props: Vec<PropertyMember> = decl
        .members
        .iter()
        .filter_map(|m| match m {
            Member::Property(p) => Some(p.clone()),
            Member::Method(_) => None,
        })
        .collect();
    lower_record(&decl.name, &props, decl.span, resolver)
}

fn report_record_methods(decl: &InterfaceDecl, diag: &mut Diagnostics) {
    for member in &decl.members {
        if let Member::Method(m) = member {
            diag.report(DiagnosticKind::InvalidMember, m.name.span)
                .message(format!(
                    "record `{}` cannot declare method `{}`",
                    decl.name.text, m.name.text
                ))
                .emit();
        }
    }
}

fn lower_record(
    name: &Ident,
    props: &[PropertyMember],
    span: TextRange,
    resolver: &mut Resolver<'_, '_>,
) -> Option<RecordType> {
    let mut fields = Vec::with_capacity(props.len());
    let mut seen: HashMap<&str, TextRange> = HashMap::new();
    let mut ok = true;

    for prop in props {
        if let Some(first) = seen.insert(prop.name.text.as_str(), prop.name.span) {
            resolver
                .diagnostics()
                .report(DiagnosticKind::DuplicateMember, prop.name.span)
                .message(format!("field `{}` of `{}`", prop.name.text, name.text))
                .related_to("first declared here", first)
                .emit();
            ok = false;
            continue;
        }
        match resolver.lower(&prop.ty) {
            Some(ty) => fields.push(FieldDecl {
                name: prop.name.text.clone(),
                ty: if prop.optional { nullable(ty) } else { ty },
                span: prop.span,
            }),
            None => ok = false,
        }
    }

    if props.is_empty() {
        resolver
            .diagnostics()
            .report(DiagnosticKind::InvalidMember, name.span)
            .message(format!("record `{}` must declare at least one field", name.text))
            .emit();
        return None;
    }

    ok.then(|| RecordType {
        name: name.text.clone(),
        fields,
        span,
    })
}

fn lower_enum(decl: &EnumDecl, diag: &mut Diagnostics) -> Option<EnumType> {
    if decl.members.is_empty() {
        diag.report(DiagnosticKind::EmptyEnum, decl.name.span)
            .message(&decl.name.text)
            .emit();
        return None;
    }

    let mut members = Vec::with_capacity(decl.members.len());
    let mut seen: HashMap<&str, TextRange> = HashMap::new();
    let mut values: Vec<(EnumValue, (&str, TextRange))> = Vec::new();
    let mut next_auto: Option<i64> = Some(0);
    let mut ok = true;

    for member in &decl.members {
        if let Some(first) = seen.insert(member.name.text.as_str(), member.name.span) {
            diag.report(DiagnosticKind::DuplicateMember, member.name.span)
                .message(format!("enum member `{}`", member.name.text))
                .related_to("first declared here", first)
                .emit();
            ok = false;
            continue;
        }

        let value = match &member.init {
            Some(Literal::String(s)) => {
                next_auto = None;
                EnumValue::String(s.clone())
            }
            Some(Literal::Number(raw)) => match parse_integer(raw) {
                Some(n) => {
                    next_auto = n.checked_add(1);
                    EnumValue::Number(n)
                }
                None => {
                    diag.report(DiagnosticKind::InvalidEnumValue, member.span)
                        .message(format!("`{raw}` is not an integer"))
                        .emit();
                    ok = false;
                    continue;
                }
            },
            None => match next_auto {
                Some(n) => {
                    next_auto = n.checked_add(1);
                    EnumValue::Number(n)
                }
                None => {
                    diag.report(DiagnosticKind::InvalidEnumValue, member.span)
                        .message(format!("member `{}` needs an initializer", member.name.text))
                        .emit();
                    ok = false;
                    continue;
                }
            },
        };

        if let Some((first, first_span)) = values.iter().find(|(v, _)| *v == value).map(|(_, at)| *at) {
            diag.report(DiagnosticKind::InvalidEnumValue, member.span)
                .message(format!(
                    "`{}` repeats the value of `{first}`",
                    member.name.text
                ))
                .related_to("first used here", first_span)
                .emit();
            ok = false;
            continue;
        }
        values.push((value.clone(), (member.name.text.as_str(), member.span)));

        members.push(EnumMember {
            name: member.name.text.clone(),
            value,
            span: member.span,
        });
    }

    let strings = members
        .iter()
        .filter(|m| matches!(m.value, EnumValue::String(_)))
        .count();
    let kind = if strings == members.len() {
        EnumKind::String
    } else if strings == 0 {
        EnumKind::Number
    } else {
        diag.report(DiagnosticKind::MixedEnum, decl.name.span)
            .message(&decl.name.text)
            .emit();
        return None;
    };

    ok.then(|| EnumType {
        name: decl.name.text.clone(),
        kind,
        members,
        span: decl.span,
    })
}

fn parse_integer(raw: &str) -> Option<i64> {
    let cleaned = raw.replace('_', "");
    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_str()),
    };
    let value = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<i64>().ok()?,
    };
    Some(if negative { -value } else { value })
}

/// Records and enums reachable from method signatures.
fn referenced_names(methods: &[MethodSignature], records: &[RecordType]) -> IndexSet<String> {
    let mut seen = IndexSet::new();
    let mut stack: Vec<&str> = Vec::new();

    for method in methods {
        for param in &method.params {
            stack.extend(param.ty.named());
        }
        stack.extend(method.ret.named());
    }

    while let Some(name) = stack.pop() {
        if !seen.insert(name.to_string()) {
            continue;
        }
        if let Some(record) = records.iter().find(|r| r.name == name) {
            for field in &record.fields {
                stack.extend(field.ty.named());
            }
        }
    }

    seen
}
