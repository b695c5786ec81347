//! Naming stage: attaches Rust and C++ identifiers to a mapped module and rejects
//! distinct spec names that collapse to the same generated name.

#[cfg(test)]
mod bind_tests;

use std::collections::HashMap;

use craby_core::naming::{rust_ident, to_camel_case, to_flat_case, to_pascal_case, to_snake_case};
use rowan::TextRange;

use crate::codegen::render::nullable_name;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::ir::{EnumKind, EnumValue};
use crate::types::{MappedField, MappedModule, MethodKind, TargetType};

/// Names used by the generated runtime and bridge. Spec types may not reuse them.
const RESERVED_TYPE_NAMES: &[&str] = &[
    "Array", "Boolean", "Context", "Nullable", "Number", "Promise", "Signal", "String", "Void",
];

/// Trait methods every generated spec trait already has. `emit` only exists with signals.
const RESERVED_METHOD_NAMES: &[&str] = &["new", "id"];

const CXX_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "asm", "auto", "bool", "case", "catch", "char", "class",
    "const", "constexpr", "default", "delete", "do", "double", "explicit", "export", "extern",
    "float", "friend", "goto", "inline", "int", "long", "mutable", "namespace", "new",
    "noexcept", "not", "operator", "or", "private", "protected", "public", "register",
    "short", "signed", "sizeof", "static", "switch", "template", "this", "throw", "try",
    "typedef", "typename", "union", "unsigned", "using", "virtual", "void", "volatile",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleNames {
    /// Registered name, as written in the module handle.
    pub js: String,
    pub pascal: String,
    pub snake: String,
    pub flat: String,
}

impl ModuleNames {
    pub fn new(js: &str) -> Self {
        Self {
            js: js.to_string(),
            pascal: to_pascal_case(js),
            snake: to_snake_case(js),
            flat: to_flat_case(js),
        }
    }

    pub fn spec_trait(&self) -> String {
        format!("{}Spec", self.pascal)
    }

    pub fn signal_enum(&self) -> String {
        format!("{}Signal", self.pascal)
    }

    pub fn cxx_class(&self) -> String {
        format!("Cxx{}Module", self.pascal)
    }

    pub fn cxx_namespace(&self) -> String {
        format!("craby::{}", self.flat)
    }

    pub fn bridge_namespace(&self) -> String {
        format!("craby::{}::bridging", self.flat)
    }

    pub fn impl_mod(&self) -> String {
        format!("{}_impl", self.snake)
    }

    pub fn spec_mod(&self) -> String {
        format!("{}_spec", self.snake)
    }

    pub fn types_mod(&self) -> String {
        format!("{}_types", self.snake)
    }

    pub fn bridge_mod(&self) -> String {
        format!("{}_bridge", self.snake)
    }

    pub fn create_fn(&self) -> String {
        format!("create_{}", self.snake)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundModule {
    pub names: ModuleNames,
    pub methods: Vec<BoundMethod>,
    pub signals: Vec<BoundSignal>,
    pub records: Vec<BoundRecord>,
    pub enums: Vec<BoundEnum>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundMethod {
    pub js_name: String,
    pub rust_name: String,
    pub cxx_name: String,
    pub params: Vec<BoundField>,
    pub ret: TargetType,
    pub is_async: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundField {
    pub js_name: String,
    pub rust_name: String,
    pub ty: TargetType,
}

/// A listener registration method, turned into a variant of the module's signal enum.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundSignal {
    pub js_name: String,
    pub cxx_name: String,
    pub variant: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundRecord {
    pub js_name: String,
    pub name: String,
    pub fields: Vec<BoundField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundEnum {
    pub js_name: String,
    pub name: String,
    pub kind: EnumKind,
    pub variants: Vec<BoundVariant>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundVariant {
    pub name: String,
    pub value: EnumValue,
}

impl BoundModule {
    pub fn has_signals(&self) -> bool {
        !self.signals.is_empty()
    }

    pub fn has_async(&self) -> bool {
        self.methods.iter().any(|m| m.is_async)
    }

    pub fn record(&self, js_name: &str) -> Option<&BoundRecord> {
        self.records.iter().find(|r| r.js_name == js_name)
    }

    pub fn enum_type(&self, js_name: &str) -> Option<&BoundEnum> {
        self.enums.iter().find(|e| e.js_name == js_name)
    }
}

impl BoundEnum {
    pub fn first_variant(&self) -> &BoundVariant {
        // Empty enums are rejected during analysis.
        &self.variants[0]
    }
}

fn cxx_ident(name: &str) -> String {
    if CXX_KEYWORDS.contains(&name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

/// Tracks generated names within one scope and reports the second claimant.
struct Scope<'s> {
    what: &'static str,
    owner: Option<&'s str>,
    seen: HashMap<String, Holder>,
}

enum Holder {
    /// Taken by generated code; the string describes the holder.
    Reserved(String),
    Declared(String, TextRange),
}

impl<'s> Scope<'s> {
    fn new(what: &'static str, owner: Option<&'s str>) -> Self {
        Self {
            what,
            owner,
            seen: HashMap::new(),
        }
    }

    fn reserve(mut self, names: &[&str]) -> Self {
        for name in names {
            self.reserve_as(name, format!("`{name}`"));
        }
        self
    }

    fn reserve_as(&mut self, name: &str, holder: String) {
        self.seen
            .entry(name.to_string())
            .or_insert(Holder::Reserved(holder));
    }

    /// Generated declarations carry no source range and reserve their name.
    fn claim(&mut self, generated: &str, source: &str, range: TextRange, diag: &mut Diagnostics) {
        let owner = self.owner.map(|o| format!(" of `{o}`")).unwrap_or_default();
        match self.seen.get(generated) {
            None if range == TextRange::default() => {
                self.reserve_as(generated, format!("`{source}`"));
            }
            None => {
                self.seen.insert(
                    generated.to_string(),
                    Holder::Declared(source.to_string(), range),
                );
            }
            Some(Holder::Reserved(holder)) => {
                diag.report(DiagnosticKind::NameCollision, range)
                    .message(format!(
                        "{}{owner} `{source}` becomes `{generated}`, which is reserved for {holder}",
                        self.what
                    ))
                    .emit();
            }
            Some(Holder::Declared(first, first_range)) => {
                diag.report(DiagnosticKind::NameCollision, range)
                    .message(format!(
                        "{}s{owner} `{first}` and `{source}` both become `{generated}`",
                        self.what
                    ))
                    .related_to(format!("`{first}` declared here"), *first_range)
                    .emit();
            }
        }
    }
}

/// Names of the bridge structs mirroring every nullable type the module uses.
fn nullable_mirrors(module: &MappedModule) -> Vec<String> {
    fn walk(ty: &TargetType, out: &mut Vec<String>) {
        match ty {
            TargetType::Array(inner) | TargetType::Promise(inner) => walk(inner, out),
            TargetType::Nullable(inner) => {
                walk(inner, out);
                let name = nullable_name(ty);
                if !out.contains(&name) {
                    out.push(name);
                }
            }
            _ => {}
        }
    }

    let mut out = Vec::new();
    for method in &module.methods {
        for param in &method.params {
            walk(&param.ty, &mut out);
        }
        walk(&method.ret, &mut out);
    }
    for record in &module.records {
        for field in &record.fields {
            walk(&field.ty, &mut out);
        }
    }
    out
}

pub fn bind_module(module: &MappedModule) -> Result<BoundModule, Diagnostics> {
    let mut diag = Diagnostics::new();
    let names = ModuleNames::new(&module.name);

    let spec_trait = names.spec_trait();
    let signal_enum = names.signal_enum();
    let mut types = Scope::new("type", None).reserve(RESERVED_TYPE_NAMES);
    types.claim(&names.pascal, &module.name, TextRange::default(), &mut diag);
    types.claim(&spec_trait, &spec_trait, TextRange::default(), &mut diag);
    types.claim(&signal_enum, &signal_enum, TextRange::default(), &mut diag);
    for mirror in nullable_mirrors(module) {
        types.reserve_as(&mirror, "a nullable bridge struct".to_string());
    }

    let mut records = Vec::with_capacity(module.records.len());
    for record in &module.records {
        let name = to_pascal_case(&record.name);
        types.claim(&name, &record.name, record.span, &mut diag);
        records.push(BoundRecord {
            js_name: record.name.clone(),
            name,
            fields: bind_fields("field", &record.name, &record.fields, &mut diag),
        });
    }

    let mut enums = Vec::with_capacity(module.enums.len());
    for e in &module.enums {
        let name = to_pascal_case(&e.name);
        types.claim(&name, &e.name, e.span, &mut diag);

        let mut scope = Scope::new("enum member", Some(e.name.as_str()));
        let variants = e
            .members
            .iter()
            .map(|m| {
                let variant = to_pascal_case(&m.name);
                scope.claim(&variant, &m.name, m.span, &mut diag);
                BoundVariant {
                    name: variant,
                    value: m.value.clone(),
                }
            })
            .collect();

        enums.push(BoundEnum {
            js_name: e.name.clone(),
            name,
            kind: e.kind,
            variants,
        });
    }

    let mut method_scope = Scope::new("method", None).reserve(RESERVED_METHOD_NAMES);
    if module.signal_methods().next().is_some() {
        method_scope = method_scope.reserve(&["emit"]);
    }
    let mut variant_scope = Scope::new("signal", None);
    let mut methods = Vec::new();
    let mut signals = Vec::new();
    for method in &module.methods {
        let snake = to_snake_case(&method.name);
        method_scope.claim(&snake, &method.name, method.span, &mut diag);

        match method.kind {
            MethodKind::Call => methods.push(BoundMethod {
                js_name: method.name.clone(),
                rust_name: rust_ident(&snake),
                cxx_name: cxx_ident(&to_camel_case(&method.name)),
                params: bind_fields("parameter", &method.name, &method.params, &mut diag),
                ret: method.ret.clone(),
                is_async: method.is_async,
            }),
            MethodKind::Signal => {
                let variant = to_pascal_case(&method.name);
                variant_scope.claim(&variant, &method.name, method.span, &mut diag);
                signals.push(BoundSignal {
                    js_name: method.name.clone(),
                    cxx_name: cxx_ident(&to_camel_case(&method.name)),
                    variant,
                });
            }
        }
    }

    if !diag.is_empty() {
        return Err(diag);
    }

    log::debug!(
        "bound module `{}`: {} methods, {} signals, {} records, {} enums",
        names.js,
        methods.len(),
        signals.len(),
        records.len(),
        enums.len()
    );

    Ok(BoundModule {
        names,
        methods,
        signals,
        records,
        enums,
    })
}

fn bind_fields(
    what: &'static str,
    owner: &str,
    fields: &[MappedField],
    diag: &mut Diagnostics,
) -> Vec<BoundField> {
    let mut scope = Scope::new(what, Some(owner));
    fields
        .iter()
        .map(|field| {
            let snake = to_snake_case(&field.name);
            scope.claim(&snake, &field.name, field.span, diag);
            BoundField {
                js_name: field.name.clone(),
                rust_name: rust_ident(&snake),
                ty: field.ty.clone(),
            }
        })
        .collect()
}
