//! Rust emitter: the spec trait, developer-facing types, crate entry points and the
//! implementation stub the developer fills in.

use indoc::{formatdoc, indoc};

use super::render::rust_type;
use super::{CodegenContext, GeneratedFile, ModuleUnit, indent};
use crate::bind::{BoundEnum, BoundMethod, BoundModule, BoundRecord};
use crate::ir::EnumValue;

pub struct RustEmitter<'a> {
    ctx: &'a CodegenContext,
    files: Vec<GeneratedFile>,
}

impl<'a> RustEmitter<'a> {
    pub fn new(ctx: &'a CodegenContext) -> Self {
        Self {
            ctx,
            files: Vec::new(),
        }
    }

    pub fn emit(mut self) -> Vec<GeneratedFile> {
        let generated_dir = self.ctx.layout.generated_dir();
        let src_dir = self.ctx.layout.rust_src_dir();

        for unit in &self.ctx.units {
            let names = &unit.bound.names;
            let spec = self.with_header(unit.hash(), spec_file(&unit.bound));
            let types = self.with_header(unit.hash(), types_file(&unit.bound));
            self.files.push(GeneratedFile::generated(
                generated_dir.join(format!("{}.rs", names.spec_mod())),
                spec,
            ));
            self.files.push(GeneratedFile::generated(
                generated_dir.join(format!("{}.rs", names.types_mod())),
                types,
            ));
            self.files.push(GeneratedFile::developer_owned(
                src_dir.join(format!("{}.rs", names.impl_mod())),
                impl_file(unit),
            ));
        }

        let hash = self.ctx.project_hash();
        let generated_mod = self.with_header(hash, generated_mod_file(self.ctx));
        let runtime = self.with_header(hash, RUNTIME_TYPES.to_string());
        let lib = self.with_header(hash, lib_file(self.ctx));
        self.files
            .push(GeneratedFile::generated(generated_dir.join("mod.rs"), generated_mod));
        self.files
            .push(GeneratedFile::generated(src_dir.join("types.rs"), runtime));
        self.files
            .push(GeneratedFile::generated(src_dir.join("lib.rs"), lib));

        self.files
    }

    fn with_header(&self, hash: u32, body: String) -> String {
        format!("{}\n{}", self.ctx.header("//", hash), finish(body))
    }
}

/// Exactly one trailing newline.
fn finish(mut text: String) -> String {
    text.truncate(text.trim_end().len());
    text.push('\n');
    text
}

fn method_signature(method: &BoundMethod) -> String {
    let mut sig = format!("fn {}(&self", method.rust_name);
    for param in &method.params {
        sig.push_str(&format!(", {}: {}", param.rust_name, rust_type(&param.ty)));
    }
    sig.push(')');
    if !method.ret.is_void() {
        sig.push_str(&format!(" -> {}", rust_type(&method.ret)));
    }
    sig
}

fn uses_model_types(module: &BoundModule) -> bool {
    !module.records.is_empty() || !module.enums.is_empty()
}

/// `<module>_spec.rs`: the trait and, with signals, the signal enum.
fn spec_file(module: &BoundModule) -> String {
    let names = &module.names;
    let mut out = String::new();

    if uses_model_types(module) {
        out.push_str(&format!("use crate::generated::{}::*;\n", names.types_mod()));
    }
    out.push_str("use crate::types::*;\n\n");

    if module.has_signals() {
        let variants = module
            .signals
            .iter()
            .map(|s| format!("{},", s.variant))
            .collect::<Vec<_>>()
            .join("\n");
        out.push_str(&formatdoc! {"
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub enum {signal_enum} {{
            {variants}
            }}

            ",
            signal_enum = names.signal_enum(),
            variants = indent(&variants, 4),
        });
    }

    out.push_str(&format!("pub trait {} {{\n", names.spec_trait()));
    out.push_str("    fn new(ctx: Context) -> Self;\n");
    out.push_str("    fn id(&self) -> usize;\n");

    if module.has_signals() {
        let arms = module
            .signals
            .iter()
            .map(|s| format!("{}::{} => \"{}\",", names.signal_enum(), s.variant, s.js_name))
            .collect::<Vec<_>>()
            .join("\n");
        let emit = formatdoc! {"

            fn emit(&self, signal: {signal_enum}) {{
                let name: Signal = match signal {{
            {arms}
                }};
                crate::generated::{bridge}::emit_signal(self.id(), name);
            }}
            ",
            signal_enum = names.signal_enum(),
            arms = indent(&arms, 8),
            bridge = names.bridge_mod(),
        };
        out.push_str(&indent(&emit, 4));
        out.push('\n');
    }

    if !module.methods.is_empty() {
        out.push('\n');
    }
    for method in &module.methods {
        out.push_str(&format!("    {};\n", method_signature(method)));
    }
    out.push_str("}\n");
    out
}

/// `<module>_types.rs`: records and enums in developer-facing form.
fn types_file(module: &BoundModule) -> String {
    if !uses_model_types(module) {
        return format!("// `{}` declares no records or enums.\n", module.names.js);
    }

    let mut blocks = Vec::new();
    for record in &module.records {
        blocks.push(record_decl(record));
    }
    for e in &module.enums {
        blocks.push(enum_decl(e));
    }
    format!("use crate::types::*;\n\n{}", blocks.join("\n\n"))
}

fn record_decl(record: &BoundRecord) -> String {
    let fields = record
        .fields
        .iter()
        .map(|f| format!("pub {}: {},", f.rust_name, rust_type(&f.ty)))
        .collect::<Vec<_>>()
        .join("\n");
    formatdoc! {"
        #[derive(Debug, Clone, PartialEq)]
        pub struct {name} {{
        {fields}
        }}",
        name = record.name,
        fields = indent(&fields, 4),
    }
}

fn enum_decl(e: &BoundEnum) -> String {
    let variants = e
        .variants
        .iter()
        .map(|v| format!("{},", v.name))
        .collect::<Vec<_>>()
        .join("\n");
    let value_type = match e.variants.first().map(|v| &v.value) {
        Some(EnumValue::Number(_)) => "i64",
        _ => "&'static str",
    };
    let arms = e
        .variants
        .iter()
        .map(|v| {
            let value = match &v.value {
                EnumValue::String(s) => format!("{s:?}"),
                EnumValue::Number(n) => n.to_string(),
            };
            format!("{}::{} => {value},", e.name, v.name)
        })
        .collect::<Vec<_>>()
        .join("\n");

    formatdoc! {"
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum {name} {{
        {variants}
        }}

        impl {name} {{
            /// Value of the member on the JavaScript side.
            pub fn value(self) -> {value_type} {{
                match self {{
        {arms}
                }}
            }}
        }}",
        name = e.name,
        variants = indent(&variants, 4),
        value_type = value_type,
        arms = indent(&arms, 12),
    }
}

/// `<module>_impl.rs`: written once, then owned by the developer.
fn impl_file(unit: &ModuleUnit) -> String {
    let module = &unit.bound;
    let names = &module.names;

    let methods = module
        .methods
        .iter()
        .map(|m| format!("{} {{\n    unimplemented!();\n}}", method_signature(m)))
        .collect::<Vec<_>>()
        .join("\n\n");
    let methods = if methods.is_empty() {
        String::new()
    } else {
        format!("\n\n{}", indent(&methods, 4))
    };

    let body = formatdoc! {"
        use crate::generated::*;
        use crate::types::*;

        pub struct {pascal} {{
            ctx: Context,
        }}

        impl {spec_trait} for {pascal} {{
            fn new(ctx: Context) -> Self {{
                {pascal} {{ ctx }}
            }}

            fn id(&self) -> usize {{
                self.ctx.id
            }}{methods}
        }}
        ",
        pascal = names.pascal,
        spec_trait = names.spec_trait(),
        methods = methods,
    };
    finish(body)
}

fn generated_mod_file(ctx: &CodegenContext) -> String {
    let mut mods = Vec::new();
    let mut uses = Vec::new();
    for module in ctx.modules() {
        let names = &module.names;
        mods.push(format!("pub mod {};", names.bridge_mod()));
        mods.push(format!("pub mod {};", names.spec_mod()));
        mods.push(format!("pub mod {};", names.types_mod()));
        uses.push(format!("pub use {}::*;", names.spec_mod()));
        if uses_model_types(module) {
            uses.push(format!("pub use {}::*;", names.types_mod()));
        }
    }
    format!("{}\n\n{}", mods.join("\n"), uses.join("\n"))
}

fn lib_file(ctx: &CodegenContext) -> String {
    let impls = ctx
        .modules()
        .map(|m| format!("pub(crate) mod {};", m.names.impl_mod()))
        .collect::<Vec<_>>()
        .join("\n");
    formatdoc! {"
        #[rustfmt::skip]
        pub(crate) mod generated;
        pub(crate) mod types;

        {impls}
        ",
        impls = impls,
    }
}

/// `types.rs`: aliases and helpers every generated module builds on.
const RUNTIME_TYPES: &str = indoc! {r#"
    #![allow(dead_code)]

    pub type Boolean = bool;
    pub type Number = f64;
    pub type String = std::string::String;
    pub type Array<T> = Vec<T>;
    pub type Nullable<T> = Option<T>;
    pub type Promise<T> = std::result::Result<T, std::string::String>;
    /// Name of a signal as JavaScript listeners registered it.
    pub type Signal = &'static str;

    /// Identity and environment of one module instance.
    #[derive(Debug, Clone)]
    pub struct Context {
        pub id: usize,
        /// App-private directory for files the module keeps.
        pub data_path: std::string::String,
    }

    impl Context {
        pub fn new(id: usize, data_path: &str) -> Self {
            Context {
                id,
                data_path: data_path.to_string(),
            }
        }
    }

    pub mod promise {
        use super::Promise;

        pub fn resolve<T>(val: T) -> Promise<T> {
            Ok(val)
        }

        pub fn reject<T>(err: impl AsRef<str>) -> Promise<T> {
            Err(err.as_ref().to_string())
        }
    }

    /// Run a module method, turning a panic into an error for the JavaScript caller.
    pub(crate) fn catch_panic<T>(f: impl FnOnce() -> T) -> std::result::Result<T, std::string::String> {
        std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)).map_err(|payload| {
            if let Some(msg) = payload.downcast_ref::<&str>() {
                msg.to_string()
            } else if let Some(msg) = payload.downcast_ref::<std::string::String>() {
                msg.clone()
            } else {
                "native module panicked".to_string()
            }
        })
    }
"#};
