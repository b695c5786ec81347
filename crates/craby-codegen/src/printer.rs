//! Human-readable and JSON views of a resolved module, used by `craby show`.

use std::fmt::Write;

use craby_core::Colors;

use craby_core::naming::{rust_ident, to_pascal_case, to_snake_case};

use crate::bind::ModuleNames;
use crate::ir::ModuleSpec;

/// The resolved IR of every unit as a pretty-printed JSON array.
pub fn modules_json(specs: &[ModuleSpec]) -> String {
    serde_json::to_string_pretty(specs).expect("IR serializes to JSON")
}

/// Prints the IR with the Rust name each method will get. Works on unmapped IR, so
/// unsupported types are shown as written.
pub struct SpecPrinter<'a> {
    spec: &'a ModuleSpec,
    colors: Colors,
}

impl<'a> SpecPrinter<'a> {
    pub fn new(spec: &'a ModuleSpec) -> Self {
        Self {
            spec,
            colors: Colors::OFF,
        }
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colors = Colors::new(value);
        self
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let Colors {
            blue, dim, reset, ..
        } = self.colors;
        let spec = self.spec;
        let names = ModuleNames::new(&spec.name);

        writeln!(w, "module {blue}{}{reset} {dim}({}){reset}", spec.name, names.snake)?;

        for method in &spec.methods {
            let params = method
                .params
                .iter()
                .map(|p| format!("{}: {}", p.name, p.ty))
                .collect::<Vec<_>>()
                .join(", ");
            let prefix = if method.is_async { "async " } else { "" };
            let target = if method.has_signal() {
                format!("{}::{}", names.signal_enum(), to_pascal_case(&method.name))
            } else {
                rust_ident(&to_snake_case(&method.name))
            };
            writeln!(
                w,
                "  {prefix}{blue}{}{reset}({params}) -> {} {dim}=> {target}{reset}",
                method.name, method.ret
            )?;
        }

        for record in &spec.records {
            writeln!(w, "record {blue}{}{reset}", record.name)?;
            for field in &record.fields {
                writeln!(w, "  {}: {}", field.name, field.ty)?;
            }
        }

        for e in &spec.enums {
            writeln!(w, "enum {blue}{}{reset}", e.name)?;
            for member in &e.members {
                writeln!(w, "  {} = {}", member.name, member.value)?;
            }
        }

        let mut flags = Vec::new();
        if spec.methods.iter().any(|m| m.is_async) {
            flags.push("async");
        }
        if spec.signal_methods().next().is_some() {
            flags.push("signals");
        }
        if !flags.is_empty() {
            writeln!(w, "{dim}capabilities: {}{reset}", flags.join(", "))?;
        }
        Ok(())
    }
}
