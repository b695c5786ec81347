//! Syntax tree for module spec sources.

use rowan::TextRange;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub text: String,
    pub span: TextRange,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceFile {
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Interface(InterfaceDecl),
    TypeAlias(TypeAliasDecl),
    Enum(EnumDecl),
    ModuleHandle(ModuleHandle),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub name: Ident,
    pub extends: Vec<Ident>,
    pub members: Vec<Member>,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Method(MethodMember),
    Property(PropertyMember),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodMember {
    pub name: Ident,
    pub optional: bool,
    pub params: Vec<Param>,
    /// `None` when the return annotation is missing.
    pub ret: Option<TypeExpr>,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub optional: bool,
    pub rest: bool,
    pub ty: Option<TypeExpr>,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMember {
    pub name: Ident,
    pub optional: bool,
    pub readonly: bool,
    pub ty: TypeExpr,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDecl {
    pub name: Ident,
    pub ty: TypeExpr,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: Ident,
    pub members: Vec<EnumMemberDecl>,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMemberDecl {
    pub name: Ident,
    pub init: Option<Literal>,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    /// Source text with an optional leading `-` folded in.
    Number(String),
}

/// `export default TurboModuleRegistry.getEnforcing<Spec>('Name')`
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleHandle {
    pub spec_interface: Option<Ident>,
    pub module_name: String,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExprKind {
    /// A bare name: keyword types (`number`, `void`) and references alike.
    Named(Ident),
    Generic { name: Ident, args: Vec<TypeExpr> },
    /// `T[]`
    Array(Box<TypeExpr>),
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
    Tuple(Vec<TypeExpr>),
    Function {
        params: Vec<Param>,
        ret: Box<TypeExpr>,
    },
    Object(Vec<PropertyMember>),
    Literal(Literal),
}

impl SourceFile {
    pub fn handles(&self) -> impl Iterator<Item = &ModuleHandle> {
        self.items.iter().filter_map(|item| match item {
            Item::ModuleHandle(h) => Some(h),
            _ => None,
        })
    }
}

impl Item {
    /// Declared name, if the item declares one.
    pub fn name(&self) -> Option<&Ident> {
        match self {
            Item::Interface(d) => Some(&d.name),
            Item::TypeAlias(d) => Some(&d.name),
            Item::Enum(d) => Some(&d.name),
            Item::ModuleHandle(_) => None,
        }
    }
}
