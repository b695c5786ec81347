//! Declaration table and type resolution.
//!
//! Two passes:
//! 1. Collect every interface, alias and enum by name
//! 2. Resolve every alias eagerly, then lower type expressions against the table
//!
//! Forward references work because lowering only starts after pass 1 is complete.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use rowan::TextRange;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::ir::{Primitive, TypeRef, UnsupportedForm};
use crate::parser::{EnumDecl, Ident, InterfaceDecl, Item, SourceFile, TypeAliasDecl, TypeExpr, TypeExprKind};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Decl<'a> {
    Interface(&'a InterfaceDecl),
    Alias(&'a TypeAliasDecl),
    Enum(&'a EnumDecl),
}

impl<'a> Decl<'a> {
    pub(crate) fn name(&self) -> &'a Ident {
        match self {
            Decl::Interface(d) => &d.name,
            Decl::Alias(d) => &d.name,
            Decl::Enum(d) => &d.name,
        }
    }
}

pub(crate) type DeclTable<'a> = IndexMap<&'a str, Decl<'a>>;

/// Pass 1: collect declarations. Duplicates keep the first and report the rest.
pub(crate) fn collect_declarations<'a>(file: &'a SourceFile, diag: &mut Diagnostics) -> DeclTable<'a> {
    let mut table = DeclTable::new();
    for item in &file.items {
        let decl = match item {
            Item::Interface(d) => Decl::Interface(d),
            Item::TypeAlias(d) => Decl::Alias(d),
            Item::Enum(d) => Decl::Enum(d),
            Item::ModuleHandle(_) => continue,
        };
        let name = decl.name();
        if let Some(first) = table.get(name.text.as_str()) {
            diag.report(DiagnosticKind::DuplicateDeclaration, name.span)
                .message(&name.text)
                .related_to("first declared here", first.name().span)
                .emit();
            continue;
        }
        table.insert(name.text.as_str(), decl);
    }
    table
}

/// Built-in names that are not keywords of the spec language.
fn builtin(name: &str) -> Option<TypeRef> {
    match name {
        "Int32" | "Float" | "Double" => Some(TypeRef::Primitive(Primitive::Number)),
        "Signal" => Some(TypeRef::Reactive),
        _ => None,
    }
}

fn keyword(name: &str) -> Option<Result<TypeRef, &'static str>> {
    let ty = match name {
        "number" => TypeRef::Primitive(Primitive::Number),
        "string" => TypeRef::Primitive(Primitive::String),
        "boolean" => TypeRef::Primitive(Primitive::Boolean),
        "void" => TypeRef::Primitive(Primitive::Void),
        "null" | "undefined" => return Some(Err("`null` is only supported as `T | null`")),
        "any" | "unknown" | "object" | "Object" | "UnsafeObject" | "never" => {
            return Some(Err("type has no fixed native representation"));
        }
        "bigint" | "symbol" => return Some(Err("type has no native counterpart")),
        _ => return None,
    };
    Some(Ok(ty))
}

fn is_nullish(ty: &TypeExpr) -> bool {
    matches!(&ty.kind, TypeExprKind::Named(n) if n.text == "null" || n.text == "undefined")
}

pub(crate) struct Resolver<'a, 'd> {
    source: &'a str,
    table: &'a DeclTable<'a>,
    spec_interface: Option<&'a str>,
    aliases: HashMap<&'a str, Option<TypeRef>>,
    /// Aliases currently being resolved, for cycle detection.
    resolving: IndexSet<&'a str>,
    diag: &'d mut Diagnostics,
}

impl<'a, 'd> Resolver<'a, 'd> {
    pub(crate) fn new(
        source: &'a str,
        table: &'a DeclTable<'a>,
        spec_interface: Option<&'a str>,
        diag: &'d mut Diagnostics,
    ) -> Self {
        Self {
            source,
            table,
            spec_interface,
            aliases: HashMap::new(),
            resolving: IndexSet::new(),
            diag,
        }
    }

    pub(crate) fn diagnostics(&mut self) -> &mut Diagnostics {
        &mut *self.diag
    }

    /// Pass 2: resolve every alias, used or not.
    pub(crate) fn resolve_aliases(&mut self) {
        let aliases: Vec<&'a TypeAliasDecl> = self
            .table
            .values()
            .filter_map(|d| match d {
                Decl::Alias(a) => Some(*a),
                _ => None,
            })
            .collect();
        for alias in aliases {
            self.alias(alias);
        }
    }

    fn alias(&mut self, alias: &'a TypeAliasDecl) -> Option<TypeRef> {
        let name = alias.name.text.as_str();
        if let Some(done) = self.aliases.get(name) {
            return done.clone();
        }

        // Object aliases name a record; fields are lowered when the record is built.
        if matches!(alias.ty.kind, TypeExprKind::Object(_)) {
            let ty = Some(TypeRef::Record(name.to_string()));
            self.aliases.insert(name, ty.clone());
            return ty;
        }

        if !self.resolving.insert(name) {
            self.diag
                .report(DiagnosticKind::AliasCycle, alias.name.span)
                .message(name)
                .emit();
            self.aliases.insert(name, None);
            return None;
        }

        let ty = self.lower(&alias.ty);
        self.resolving.shift_remove(name);
        // A cycle through this alias was already recorded while lowering.
        let ty = match self.aliases.get(name) {
            Some(None) => None,
            _ => ty,
        };
        self.aliases.insert(name, ty.clone());
        ty
    }

    fn unsupported(&self, span: TextRange, reason: impl Into<String>) -> TypeRef {
        TypeRef::Unsupported(UnsupportedForm {
            origin: self.source[std::ops::Range::<usize>::from(span)].to_string(),
            reason: reason.into(),
            span,
        })
    }

    /// Lower a type expression. `None` means an error was reported.
    pub(crate) fn lower(&mut self, ty: &TypeExpr) -> Option<TypeRef> {
        match &ty.kind {
            TypeExprKind::Named(name) => self.lower_named(name),
            TypeExprKind::Generic { name, args } => self.lower_generic(ty.span, name, args),
            TypeExprKind::Array(inner) => Some(TypeRef::Array(Box::new(self.lower(inner)?))),
            TypeExprKind::Union(parts) => {
                let (nullish, rest): (Vec<&TypeExpr>, Vec<&TypeExpr>) =
                    parts.iter().partition(|p| is_nullish(p));
                match (nullish.is_empty(), rest.as_slice()) {
                    (false, [inner]) => Some(TypeRef::Nullable(Box::new(self.lower(inner)?))),
                    _ => Some(self.unsupported(
                        ty.span,
                        "union types are not supported, only `T | null`",
                    )),
                }
            }
            TypeExprKind::Intersection(_) => {
                Some(self.unsupported(ty.span, "intersection types are not supported"))
            }
            TypeExprKind::Tuple(_) => Some(self.unsupported(
                ty.span,
                "tuple types are not supported, use an array or a record",
            )),
            TypeExprKind::Function { .. } => Some(self.unsupported(
                ty.span,
                "function types are not supported, use `Signal` for callbacks",
            )),
            TypeExprKind::Object(_) => Some(self.unsupported(
                ty.span,
                "inline object types are not supported, declare a named type",
            )),
            TypeExprKind::Literal(_) => {
                Some(self.unsupported(ty.span, "literal types are not supported, use an enum"))
            }
        }
    }

    fn lower_named(&mut self, name: &Ident) -> Option<TypeRef> {
        if let Some(kw) = keyword(&name.text) {
            return Some(kw.unwrap_or_else(|reason| self.unsupported(name.span, reason)));
        }

        match self.table.get(name.text.as_str()).copied() {
            Some(Decl::Interface(decl)) => {
                if Some(decl.name.text.as_str()) == self.spec_interface {
                    self.diag
                        .report(DiagnosticKind::MisplacedType, name.span)
                        .message(format!("the module interface `{}` cannot be used as a type", name.text))
                        .emit();
                    return None;
                }
                Some(TypeRef::Record(decl.name.text.clone()))
            }
            Some(Decl::Enum(decl)) => Some(TypeRef::Enum(decl.name.text.clone())),
            Some(Decl::Alias(alias)) => self.alias(alias),
            None => {
                if let Some(ty) = builtin(&name.text) {
                    return Some(ty);
                }
                self.diag
                    .report(DiagnosticKind::UndefinedType, name.span)
                    .message(&name.text)
                    .emit();
                None
            }
        }
    }

    fn lower_generic(&mut self, span: TextRange, name: &Ident, args: &[TypeExpr]) -> Option<TypeRef> {
        match (name.text.as_str(), args) {
            ("Promise", [inner]) => Some(TypeRef::Deferred(Box::new(self.lower(inner)?))),
            ("Array" | "ReadonlyArray", [inner]) => Some(TypeRef::Array(Box::new(self.lower(inner)?))),
            ("Promise" | "Array" | "ReadonlyArray", _) => Some(self.unsupported(
                span,
                format!("`{}` takes exactly one type argument", name.text),
            )),
            (other, _) => Some(self.unsupported(
                span,
                format!("generic type `{other}` is not supported, only `Promise<T>` and `Array<T>`"),
            )),
        }
    }
}
