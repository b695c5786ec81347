//! `<module>_bridge.rs`: the `cxx` bridge between the C++ TurboModule and the spec trait.

use indoc::formatdoc;

use super::shapes::{Shape, bridge_shapes};
use crate::bind::{BoundEnum, BoundMethod, BoundModule, BoundRecord};
use crate::codegen::render::{Direction, convert, ffi_default, ffi_type, model_type, nullable_name};
use crate::codegen::{CodegenContext, GeneratedFile, ModuleUnit, indent};
use crate::ir::EnumValue;
use crate::types::TargetType;

pub(super) fn bridge_file(ctx: &CodegenContext, unit: &ModuleUnit) -> GeneratedFile {
    let module = &unit.bound;
    let path = ctx
        .layout
        .generated_dir()
        .join(format!("{}.rs", module.names.bridge_mod()));
    let content = format!("{}\n{}", ctx.header("//", unit.hash()), render(module));
    GeneratedFile::generated(path, content)
}

pub(crate) fn render(module: &BoundModule) -> String {
    let names = &module.names;
    let shapes = bridge_shapes(module);

    let mut uses = Vec::new();
    if !module.records.is_empty() || !module.enums.is_empty() {
        uses.push(format!("use crate::generated::{} as model;", names.types_mod()));
    }
    uses.push(format!("use crate::generated::{}::{};", names.spec_mod(), names.spec_trait()));
    uses.push(format!("use crate::{}::{};", names.impl_mod(), names.pascal));
    uses.push("use crate::types::*;".to_string());

    let mut decls: Vec<String> = shapes
        .iter()
        .map(|shape| shared_decl(module, shape))
        .collect();
    decls.push(extern_rust(module));
    if module.has_signals() {
        decls.push(SIGNAL_MANAGER_EXTERN.to_string());
    }

    let mut out = formatdoc! {"
        {uses}

        #[cxx::bridge(namespace = \"{namespace}\")]
        pub mod bridging {{
        {decls}
        }}
        ",
        uses = uses.join("\n"),
        namespace = names.bridge_namespace(),
        decls = indent(&decls.join("\n\n"), 4),
    };

    out.push('\n');
    out.push_str(&create_fn(module));
    for method in &module.methods {
        out.push_str("\n\n");
        out.push_str(&call_fn(module, method));
    }
    if module.has_signals() {
        out.push_str("\n\n");
        out.push_str(&formatdoc! {"
            pub fn emit_signal(id: usize, name: Signal) {{
                bridging::get_signal_manager().emit(id, name);
            }}"
        });
    }
    for shape in &shapes {
        out.push_str("\n\n");
        out.push_str(&conversions(module, shape));
    }
    out.push('\n');
    out
}

fn shared_decl(module: &BoundModule, shape: &Shape) -> String {
    match shape {
        Shape::Enum(name) => match module.enum_type(name) {
            Some(e) => shared_enum(e),
            None => String::new(),
        },
        Shape::Record(name) => match module.record(name) {
            Some(record) => shared_struct(record),
            None => String::new(),
        },
        Shape::Nullable(ty) => {
            let inner = match ty {
                TargetType::Nullable(inner) => inner.as_ref(),
                other => other,
            };
            formatdoc! {"
                struct {name} {{
                    null: bool,
                    val: {val},
                }}",
                name = nullable_name(ty),
                val = ffi_type(inner, ""),
            }
        }
    }
}

/// Discriminants are member positions for string enums and the values for numeric ones.
fn shared_enum(e: &BoundEnum) -> String {
    let variants = e
        .variants
        .iter()
        .enumerate()
        .map(|(i, v)| match v.value {
            EnumValue::Number(n) => format!("{} = {n},", v.name),
            EnumValue::String(_) => format!("{} = {i},", v.name),
        })
        .collect::<Vec<_>>()
        .join("\n");
    formatdoc! {"
        enum {name} {{
        {variants}
        }}",
        name = e.name,
        variants = indent(&variants, 4),
    }
}

fn shared_struct(record: &BoundRecord) -> String {
    let fields = record
        .fields
        .iter()
        .map(|f| format!("{}: {},", f.rust_name, ffi_type(&f.ty, "")))
        .collect::<Vec<_>>()
        .join("\n");
    formatdoc! {"
        struct {name} {{
        {fields}
        }}",
        name = record.name,
        fields = indent(&fields, 4),
    }
}

fn ffi_fn_name(module: &BoundModule, method: &BoundMethod) -> String {
    format!("{}_{}", module.names.snake, method.rust_name.trim_start_matches("r#"))
}

fn extern_rust(module: &BoundModule) -> String {
    let names = &module.names;
    let mut items = vec![
        format!("type {};", names.pascal),
        formatdoc! {"
            #[cxx_name = \"create{pascal}\"]
            fn {create}(id: usize, data_path: &str) -> Box<{pascal}>;",
            pascal = names.pascal,
            create = names.create_fn(),
        },
    ];

    for method in &module.methods {
        let mut params = vec![format!("it_: &{}", names.pascal)];
        params.extend(
            method
                .params
                .iter()
                .map(|p| format!("{}: {}", p.rust_name, ffi_type(&p.ty, ""))),
        );
        items.push(formatdoc! {"
            #[cxx_name = \"{cxx_name}\"]
            fn {name}({params}) -> Result<{ret}>;",
            cxx_name = method.cxx_name,
            name = ffi_fn_name(module, method),
            params = params.join(", "),
            ret = ffi_type(&method.ret, ""),
        });
    }

    formatdoc! {"
        extern \"Rust\" {{
        {items}
        }}",
        items = indent(&items.join("\n\n"), 4),
    }
}

fn create_fn(module: &BoundModule) -> String {
    let names = &module.names;
    formatdoc! {"
        fn {create}(id: usize, data_path: &str) -> Box<{pascal}> {{
            Box::new({pascal}::new(Context::new(id, data_path)))
        }}",
        create = names.create_fn(),
        pascal = names.pascal,
    }
}

fn call_fn(module: &BoundModule, method: &BoundMethod) -> String {
    let mut params = vec![format!("it_: &{}", module.names.pascal)];
    params.extend(
        method
            .params
            .iter()
            .map(|p| format!("{}: {}", p.rust_name, ffi_type(&p.ty, "bridging::"))),
    );
    let args = method
        .params
        .iter()
        .map(|p| convert(&p.rust_name, &p.ty, Direction::FromFfi))
        .collect::<Vec<_>>()
        .join(", ");

    let mut body = format!("catch_panic(|| it_.{}({args}))", method.rust_name);
    if method.is_async {
        body.push_str(".and_then(|ret| ret)");
    }
    let settled = method.ret.settled();
    if !settled.is_trivial() {
        body.push_str(&format!(
            ".map(|ret| {})",
            convert("ret", settled, Direction::IntoFfi)
        ));
    }

    formatdoc! {"
        fn {name}({params}) -> Result<{ret}, String> {{
            {body}
        }}",
        name = ffi_fn_name(module, method),
        params = params.join(", "),
        ret = ffi_type(&method.ret, "bridging::"),
        body = body,
    }
}

/// `From` impls in both directions between developer types and bridge types.
fn conversions(module: &BoundModule, shape: &Shape) -> String {
    match shape {
        Shape::Enum(name) => module.enum_type(name).map(enum_conversions).unwrap_or_default(),
        Shape::Record(name) => module.record(name).map(record_conversions).unwrap_or_default(),
        Shape::Nullable(ty) => nullable_conversions(module, ty),
    }
}

fn enum_conversions(e: &BoundEnum) -> String {
    let into_ffi = e
        .variants
        .iter()
        .map(|v| format!("model::{0}::{1} => bridging::{0}::{1},", e.name, v.name))
        .collect::<Vec<_>>()
        .join("\n");
    let from_ffi = e
        .variants
        .iter()
        .map(|v| format!("bridging::{0}::{1} => model::{0}::{1},", e.name, v.name))
        .collect::<Vec<_>>()
        .join("\n");

    formatdoc! {"
        impl From<model::{name}> for bridging::{name} {{
            fn from(v: model::{name}) -> Self {{
                match v {{
        {into_ffi}
                }}
            }}
        }}

        impl From<bridging::{name}> for model::{name} {{
            fn from(v: bridging::{name}) -> Self {{
                match v {{
        {from_ffi}
                    _ => model::{name}::{first},
                }}
            }}
        }}",
        name = e.name,
        into_ffi = indent(&into_ffi, 12),
        from_ffi = indent(&from_ffi, 12),
        first = e.first_variant().name,
    }
}

fn record_conversions(record: &BoundRecord) -> String {
    let fields = |dir: Direction| {
        record
            .fields
            .iter()
            .map(|f| {
                let value = convert(&format!("v.{}", f.rust_name), &f.ty, dir);
                format!("{}: {value},", f.rust_name)
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    formatdoc! {"
        impl From<model::{name}> for bridging::{name} {{
            fn from(v: model::{name}) -> Self {{
                bridging::{name} {{
        {into_ffi}
                }}
            }}
        }}

        impl From<bridging::{name}> for model::{name} {{
            fn from(v: bridging::{name}) -> Self {{
                model::{name} {{
        {from_ffi}
                }}
            }}
        }}",
        name = record.name,
        into_ffi = indent(&fields(Direction::IntoFfi), 12),
        from_ffi = indent(&fields(Direction::FromFfi), 12),
    }
}

fn nullable_conversions(module: &BoundModule, ty: &TargetType) -> String {
    let TargetType::Nullable(inner) = ty else {
        return String::new();
    };
    let name = nullable_name(ty);

    formatdoc! {"
        impl From<{model}> for bridging::{name} {{
            fn from(v: {model}) -> Self {{
                match v {{
                    Some(val) => bridging::{name} {{
                        null: false,
                        val: {into_ffi},
                    }},
                    None => bridging::{name} {{
                        null: true,
                        val: {default},
                    }},
                }}
            }}
        }}

        impl From<bridging::{name}> for {model} {{
            fn from(v: bridging::{name}) -> Self {{
                if v.null {{
                    None
                }} else {{
                    Some({from_ffi})
                }}
            }}
        }}",
        model = model_type(ty, "model::"),
        name = name,
        into_ffi = convert("val", inner, Direction::IntoFfi),
        default = ffi_default(inner, module),
        from_ffi = convert("v.val", inner, Direction::FromFfi),
    }
}

const SIGNAL_MANAGER_EXTERN: &str = indoc::indoc! {r#"
    #[namespace = "craby::signals"]
    unsafe extern "C++" {
        include!("CrabySignals.h");

        type SignalManager;

        fn emit(self: &SignalManager, id: usize, name: &str);
        #[rust_name = "get_signal_manager"]
        fn getSignalManager() -> &'static SignalManager;
    }"#};
