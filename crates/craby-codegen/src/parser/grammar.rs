//! Grammar productions for module spec sources.
//!
//! Covers the declaration subset a TurboModule spec uses: imports (skipped), interfaces,
//! type aliases, enums and the single `export default` module handle.

use rowan::TextRange;

use super::ast::*;
use super::core::Parser;
use super::lexer::{token_text, unquote};
use super::syntax_kind::SyntaxKind;
use crate::diagnostics::DiagnosticKind;

/// Registry accessors accepted in the module handle.
const HANDLE_ACCESSORS: &[&str] = &["getEnforcing", "get"];

/// Namespace prefix of React Native's codegen number aliases (`CodegenTypes.Int32`).
const CODEGEN_NAMESPACE: &str = "CodegenTypes";

impl Parser<'_> {
    pub(super) fn parse_file(&mut self) -> SourceFile {
        let mut items = Vec::new();
        while !self.eof() {
            let start = self.pos;
            if let Some(item) = self.parse_item() {
                items.push(item);
            }
            if self.pos == start {
                self.bump();
            }
        }
        SourceFile { items }
    }

    fn parse_item(&mut self) -> Option<Item> {
        match self.current() {
            SyntaxKind::Semicolon => {
                self.bump();
                None
            }
            SyntaxKind::KwImport => {
                self.skip_import();
                None
            }
            SyntaxKind::KwExport => self.parse_export(),
            SyntaxKind::KwDeclare => {
                self.bump();
                self.parse_declaration()
            }
            _ => self.parse_declaration(),
        }
    }

    /// `import ... from '...'` and `import '...'` end at their module string.
    fn skip_import(&mut self) {
        self.bump();
        while !self.eof() {
            match self.current() {
                SyntaxKind::StringLit => {
                    self.bump();
                    self.eat(SyntaxKind::Semicolon);
                    return;
                }
                SyntaxKind::Semicolon => {
                    self.bump();
                    return;
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn parse_export(&mut self) -> Option<Item> {
        self.bump();
        match self.current() {
            SyntaxKind::KwDefault => {
                self.bump();
                self.parse_module_handle().map(Item::ModuleHandle)
            }
            SyntaxKind::BraceOpen => {
                self.skip_export_list();
                None
            }
            SyntaxKind::KwType if self.nth(1) == SyntaxKind::BraceOpen => {
                self.bump();
                self.skip_export_list();
                None
            }
            _ => self.parse_declaration(),
        }
    }

    /// `export { A, B } from '...';`
    fn skip_export_list(&mut self) {
        while !self.eof() && !self.at(SyntaxKind::BraceClose) {
            self.bump();
        }
        self.eat(SyntaxKind::BraceClose);
        if self.at(SyntaxKind::Ident) && self.current_text() == "from" {
            self.bump();
            self.eat(SyntaxKind::StringLit);
        }
        self.eat(SyntaxKind::Semicolon);
    }

    fn parse_declaration(&mut self) -> Option<Item> {
        let item = match self.current() {
            SyntaxKind::KwInterface => self.parse_interface().map(Item::Interface),
            SyntaxKind::KwType => self.parse_type_alias().map(Item::TypeAlias),
            SyntaxKind::KwEnum => self.parse_enum().map(Item::Enum),
            SyntaxKind::KwConst if self.nth(1) == SyntaxKind::KwEnum => {
                self.bump();
                self.parse_enum().map(Item::Enum)
            }
            _ => {
                self.error_expected("an interface, type alias or enum declaration");
                None
            }
        };
        if item.is_none() {
            self.recover_to_item();
        }
        item
    }

    fn parse_name(&mut self) -> Option<Ident> {
        if self.current().is_name() {
            let token = self.bump();
            return Some(Ident {
                text: token_text(self.source, &token).to_string(),
                span: token.span,
            });
        }
        let found = self.current_text().to_string();
        self.error(
            DiagnosticKind::ExpectedName,
            if found.is_empty() {
                "found end of file".to_string()
            } else {
                format!("found `{found}`")
            },
        );
        None
    }

    /// Member names may also be quoted: `'content-type': string`.
    fn parse_member_name(&mut self) -> Option<Ident> {
        if self.at(SyntaxKind::StringLit) {
            let token = self.bump();
            return Some(Ident {
                text: unquote(token_text(self.source, &token)),
                span: token.span,
            });
        }
        self.parse_name()
    }

    /// Generic parameters on declarations are not part of the spec language.
    fn reject_type_params(&mut self, owner: &str) -> Option<()> {
        if self.at(SyntaxKind::AngleOpen) {
            self.error(
                DiagnosticKind::UnexpectedToken,
                format!("generic {owner} declarations are not supported"),
            );
            return None;
        }
        Some(())
    }

    fn parse_interface(&mut self) -> Option<InterfaceDecl> {
        let start = self.bump().span;
        let name = self.parse_name()?;
        self.reject_type_params("interface")?;

        let mut extends = Vec::new();
        if self.eat(SyntaxKind::KwExtends) {
            loop {
                let base = self.parse_name()?;
                if self.at(SyntaxKind::AngleOpen) {
                    self.skip_type_args();
                }
                extends.push(base);
                if !self.eat(SyntaxKind::Comma) {
                    break;
                }
            }
        }

        let members = self.parse_members()?;
        Some(InterfaceDecl {
            name,
            extends,
            members,
            span: self.span_from(start),
        })
    }

    fn skip_type_args(&mut self) {
        let mut depth = 0u32;
        while !self.eof() {
            match self.current() {
                SyntaxKind::AngleOpen => depth += 1,
                SyntaxKind::AngleClose => {
                    depth -= 1;
                    if depth == 0 {
                        self.bump();
                        return;
                    }
                }
                _ => {}
            }
            self.bump();
        }
    }

    /// `{ member; member, member }`
    fn parse_members(&mut self) -> Option<Vec<Member>> {
        self.expect(SyntaxKind::BraceOpen)?;
        let mut members = Vec::new();
        while !self.eof() && !self.at(SyntaxKind::BraceClose) {
            if self.eat(SyntaxKind::Semicolon) || self.eat(SyntaxKind::Comma) {
                continue;
            }
            match self.parse_member() {
                Some(member) => members.push(member),
                None => self.recover_in_block(),
            }
        }
        self.expect(SyntaxKind::BraceClose)?;
        Some(members)
    }

    fn parse_member(&mut self) -> Option<Member> {
        let start = self.current_span();
        let readonly = self.at(SyntaxKind::KwReadonly)
            && (self.nth(1).is_name() || self.nth(1) == SyntaxKind::StringLit);
        if readonly {
            self.bump();
        }

        let name = self.parse_member_name()?;
        let optional = self.eat(SyntaxKind::Question);

        if self.at(SyntaxKind::ParenOpen) || self.at(SyntaxKind::AngleOpen) {
            self.reject_type_params("method")?;
            let params = self.parse_params()?;
            let ret = if self.eat(SyntaxKind::Colon) {
                Some(self.parse_type()?)
            } else {
                None
            };
            return Some(Member::Method(MethodMember {
                name,
                optional,
                params,
                ret,
                span: self.span_from(start),
            }));
        }

        self.expect(SyntaxKind::Colon)?;
        let ty = self.parse_type()?;
        Some(Member::Property(PropertyMember {
            name,
            optional,
            readonly,
            ty,
            span: self.span_from(start),
        }))
    }

    /// `(a: T, b?: U, ...rest: V[])`
    fn parse_params(&mut self) -> Option<Vec<Param>> {
        self.expect(SyntaxKind::ParenOpen)?;
        let mut params = Vec::new();
        while !self.eof() && !self.at(SyntaxKind::ParenClose) {
            let start = self.current_span();
            let rest = self.eat(SyntaxKind::Ellipsis);
            let name = self.parse_name()?;
            let optional = self.eat(SyntaxKind::Question);
            let ty = if self.eat(SyntaxKind::Colon) {
                Some(self.parse_type()?)
            } else {
                None
            };
            params.push(Param {
                name,
                optional,
                rest,
                ty,
                span: self.span_from(start),
            });
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.expect(SyntaxKind::ParenClose)?;
        Some(params)
    }

    fn parse_type_alias(&mut self) -> Option<TypeAliasDecl> {
        let start = self.bump().span;
        let name = self.parse_name()?;
        self.reject_type_params("type alias")?;
        self.expect(SyntaxKind::Equals)?;
        let ty = self.parse_type()?;
        self.eat(SyntaxKind::Semicolon);
        Some(TypeAliasDecl {
            name,
            ty,
            span: self.span_from(start),
        })
    }

    fn parse_enum(&mut self) -> Option<EnumDecl> {
        let start = self.bump().span;
        let name = self.parse_name()?;
        self.expect(SyntaxKind::BraceOpen)?;

        let mut members = Vec::new();
        while !self.eof() && !self.at(SyntaxKind::BraceClose) {
            let member_start = self.current_span();
            let Some(member_name) = self.parse_member_name() else {
                self.recover_in_block();
                continue;
            };
            let init = if self.eat(SyntaxKind::Equals) {
                match self.parse_literal() {
                    Some(lit) => Some(lit),
                    None => {
                        self.error(
                            DiagnosticKind::InvalidEnumValue,
                            "enum initializers must be string or number literals",
                        );
                        self.recover_in_block();
                        continue;
                    }
                }
            } else {
                None
            };
            members.push(EnumMemberDecl {
                name: member_name,
                init,
                span: self.span_from(member_start),
            });
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }

        self.expect(SyntaxKind::BraceClose)?;
        Some(EnumDecl {
            name,
            members,
            span: self.span_from(start),
        })
    }

    fn parse_literal(&mut self) -> Option<Literal> {
        match self.current() {
            SyntaxKind::StringLit => {
                let token = self.bump();
                Some(Literal::String(unquote(token_text(self.source, &token))))
            }
            SyntaxKind::NumberLit => {
                let token = self.bump();
                Some(Literal::Number(token_text(self.source, &token).to_string()))
            }
            SyntaxKind::Minus if self.nth(1) == SyntaxKind::NumberLit => {
                self.bump();
                let token = self.bump();
                Some(Literal::Number(format!(
                    "-{}",
                    token_text(self.source, &token)
                )))
            }
            _ => None,
        }
    }

    /// `TurboModuleRegistry.getEnforcing<Spec>('Name')`, after `export default`.
    fn parse_module_handle(&mut self) -> Option<ModuleHandle> {
        let start = self.current_span();
        let Some(handle) = self.parse_handle_call(start) else {
            self.recover_to_item();
            return None;
        };
        self.eat(SyntaxKind::Semicolon);
        Some(handle)
    }

    fn parse_handle_call(&mut self, start: TextRange) -> Option<ModuleHandle> {
        if !self.at(SyntaxKind::Ident) {
            self.error(
                DiagnosticKind::InvalidModuleHandle,
                "expected `TurboModuleRegistry.getEnforcing<Spec>('ModuleName')`",
            );
            return None;
        }

        let mut accessor = self.parse_name()?;
        while self.eat(SyntaxKind::Dot) {
            accessor = self.parse_name()?;
        }

        let spec_interface = if self.eat(SyntaxKind::AngleOpen) {
            let name = self.parse_name()?;
            self.expect(SyntaxKind::AngleClose)?;
            Some(name)
        } else {
            None
        };

        self.expect(SyntaxKind::ParenOpen)?;
        let name_token = self.expect(SyntaxKind::StringLit)?;
        self.expect(SyntaxKind::ParenClose)?;

        if !HANDLE_ACCESSORS.contains(&accessor.text.as_str()) {
            self.error_at(
                DiagnosticKind::InvalidModuleHandle,
                accessor.span,
                format!("`{}` is not a module registry accessor", accessor.text),
            );
            return None;
        }

        Some(ModuleHandle {
            spec_interface,
            module_name: unquote(token_text(self.source, &name_token)),
            span: self.span_from(start),
        })
    }

    pub(super) fn parse_type(&mut self) -> Option<TypeExpr> {
        if !self.enter_recursion() {
            self.error(DiagnosticKind::NestingTooDeep, "simplify this type");
            return None;
        }
        let ty = self.parse_union();
        self.exit_recursion();
        ty
    }

    /// `A | B` and `A & B`, with an optional leading operator.
    fn parse_union(&mut self) -> Option<TypeExpr> {
        let start = self.current_span();
        let leading_pipe = self.eat(SyntaxKind::Pipe);
        let leading_amp = !leading_pipe && self.eat(SyntaxKind::Ampersand);

        let first = self.parse_postfix()?;
        let op = if self.at(SyntaxKind::Pipe) || leading_pipe {
            SyntaxKind::Pipe
        } else if self.at(SyntaxKind::Ampersand) || leading_amp {
            SyntaxKind::Ampersand
        } else {
            return Some(first);
        };

        let mut parts = vec![first];
        while self.eat(op) {
            parts.push(self.parse_postfix()?);
        }

        if parts.len() == 1 {
            return parts.pop();
        }

        let kind = if op == SyntaxKind::Pipe {
            TypeExprKind::Union(parts)
        } else {
            TypeExprKind::Intersection(parts)
        };
        Some(TypeExpr {
            kind,
            span: self.span_from(start),
        })
    }

    /// `T[]`, `T[][]`
    fn parse_postfix(&mut self) -> Option<TypeExpr> {
        let start = self.current_span();
        let mut ty = self.parse_primary()?;
        while self.at(SyntaxKind::BracketOpen) && self.nth(1) == SyntaxKind::BracketClose {
            self.bump();
            self.bump();
            ty = TypeExpr {
                kind: TypeExprKind::Array(Box::new(ty)),
                span: self.span_from(start),
            };
        }
        Some(ty)
    }

    fn parse_primary(&mut self) -> Option<TypeExpr> {
        let start = self.current_span();
        let kind = match self.current() {
            SyntaxKind::Ident => self.parse_named_type()?,
            SyntaxKind::StringLit | SyntaxKind::NumberLit | SyntaxKind::Minus => {
                match self.parse_literal() {
                    Some(lit) => TypeExprKind::Literal(lit),
                    None => {
                        self.error_expected("a type");
                        return None;
                    }
                }
            }
            SyntaxKind::BracketOpen => TypeExprKind::Tuple(self.parse_tuple()?),
            SyntaxKind::BraceOpen => TypeExprKind::Object(self.parse_object_type()?),
            SyntaxKind::ParenOpen if self.looks_like_function() => {
                let params = self.parse_params()?;
                self.expect(SyntaxKind::Arrow)?;
                let ret = self.parse_type()?;
                TypeExprKind::Function {
                    params,
                    ret: Box::new(ret),
                }
            }
            SyntaxKind::ParenOpen => {
                self.bump();
                let inner = self.parse_type()?;
                self.expect(SyntaxKind::ParenClose)?;
                return Some(TypeExpr {
                    kind: inner.kind,
                    span: self.span_from(start),
                });
            }
            _ => {
                let found = self.current_text().to_string();
                self.error(
                    DiagnosticKind::ExpectedType,
                    if found.is_empty() {
                        "found end of file".to_string()
                    } else {
                        format!("found `{found}`")
                    },
                );
                return None;
            }
        };

        Some(TypeExpr {
            kind,
            span: self.span_from(start),
        })
    }

    fn looks_like_function(&self) -> bool {
        match self.nth(1) {
            SyntaxKind::ParenClose | SyntaxKind::Ellipsis => true,
            kind if kind.is_name() => matches!(
                self.nth(2),
                SyntaxKind::Colon | SyntaxKind::Question | SyntaxKind::Comma
            ),
            _ => false,
        }
    }

    /// `Name`, `Ns.Name`, `Name<Args>`
    fn parse_named_type(&mut self) -> Option<TypeExprKind> {
        let first = self.parse_name()?;
        let mut segments = vec![first];
        while self.at(SyntaxKind::Dot) && self.nth(1).is_name() {
            self.bump();
            segments.push(self.parse_name()?);
        }

        let name = if segments.len() == 2 && segments[0].text == CODEGEN_NAMESPACE {
            segments.pop()?
        } else {
            let span = TextRange::new(
                segments[0].span.start(),
                segments[segments.len() - 1].span.end(),
            );
            let text = segments
                .iter()
                .map(|s| s.text.as_str())
                .collect::<Vec<_>>()
                .join(".");
            Ident { text, span }
        };

        if !self.eat(SyntaxKind::AngleOpen) {
            return Some(TypeExprKind::Named(name));
        }

        let mut args = Vec::new();
        while !self.eof() && !self.at(SyntaxKind::AngleClose) {
            args.push(self.parse_type()?);
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.expect(SyntaxKind::AngleClose)?;
        Some(TypeExprKind::Generic { name, args })
    }

    fn parse_tuple(&mut self) -> Option<Vec<TypeExpr>> {
        self.bump();
        let mut elements = Vec::new();
        while !self.eof() && !self.at(SyntaxKind::BracketClose) {
            elements.push(self.parse_type()?);
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.expect(SyntaxKind::BracketClose)?;
        Some(elements)
    }

    fn parse_object_type(&mut self) -> Option<Vec<PropertyMember>> {
        let members = self.parse_members()?;
        let mut props = Vec::with_capacity(members.len());
        for member in members {
            match member {
                Member::Property(p) => props.push(p),
                Member::Method(m) => {
                    self.error_at(
                        DiagnosticKind::InvalidMember,
                        m.name.span,
                        format!("object types cannot declare methods (`{}`)", m.name.text),
                    );
                }
            }
        }
        Some(props)
    }
}
