use indoc::indoc;

use super::{ModuleNames, bind_module};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::ir::EnumValue;
use crate::test_utils::{CALCULATOR, STORAGE, mapped};
use crate::types::TargetType;

fn bind_err(source: &str) -> Diagnostics {
    bind_module(&mapped(source)).expect_err("expected a name collision")
}

fn with_methods(body: &str) -> String {
    format!(
        "export interface Spec {{\n{body}\n}}\nexport default TurboModuleRegistry.getEnforcing<Spec>('Sample');\n"
    )
}

#[test]
fn get_user_name_becomes_snake_case() {
    let module = bind_module(&mapped(CALCULATOR)).unwrap();

    let method = &module.methods[1];
    assert_eq!(method.js_name, "getUserName");
    assert_eq!(method.rust_name, "get_user_name");
    assert_eq!(method.cxx_name, "getUserName");
    assert_eq!(method.params[0].rust_name, "user_id");
    assert_eq!(method.ret, TargetType::String);
    assert!(module.has_async());
    assert!(!module.has_signals());
}

#[test]
fn module_names() {
    let names = ModuleNames::new("myHTTPModule");

    assert_eq!(names.pascal, "MyHttpModule");
    assert_eq!(names.snake, "my_http_module");
    assert_eq!(names.flat, "myhttpmodule");
    assert_eq!(names.spec_trait(), "MyHttpModuleSpec");
    assert_eq!(names.cxx_class(), "CxxMyHttpModuleModule");
    assert_eq!(names.bridge_namespace(), "craby::myhttpmodule::bridging");
    assert_eq!(names.impl_mod(), "my_http_module_impl");
    assert_eq!(names.create_fn(), "create_my_http_module");
}

#[test]
fn storage_binding() {
    let module = bind_module(&mapped(STORAGE)).unwrap();

    let methods: Vec<_> = module.methods.iter().map(|m| m.rust_name.as_str()).collect();
    assert_eq!(methods, ["get", "list", "clear", "is_ready"]);

    assert_eq!(module.signals.len(), 1);
    assert_eq!(module.signals[0].js_name, "onChange");
    assert_eq!(module.signals[0].variant, "OnChange");

    let priority = module.enum_type("Priority").unwrap();
    let variants: Vec<_> = priority
        .variants
        .iter()
        .map(|v| (v.name.as_str(), v.value.clone()))
        .collect();
    assert_eq!(
        variants,
        [("Low", EnumValue::Number(0)), ("High", EnumValue::Number(10))]
    );
    assert_eq!(priority.first_variant().name, "Low");

    let entry = module.record("Entry").unwrap();
    assert_eq!(entry.name, "Entry");
    assert_eq!(entry.fields[3].rust_name, "meta");
}

#[test]
fn keywords_are_escaped() {
    let source = with_methods("  type(match: number, self: string): void;\n  delete(): void;");
    let module = bind_module(&mapped(&source)).unwrap();

    assert_eq!(module.methods[0].rust_name, "r#type");
    assert_eq!(module.methods[0].params[0].rust_name, "r#match");
    assert_eq!(module.methods[0].params[1].rust_name, "self_");
    assert_eq!(module.methods[1].rust_name, "delete");
    assert_eq!(module.methods[1].cxx_name, "delete_");
}

#[test]
fn method_collision() {
    let diag = bind_err(&with_methods("  getURL(): string;\n  getUrl(): string;"));

    assert_eq!(diag.len(), 1);
    assert!(diag.has_kind(DiagnosticKind::NameCollision));
    assert_eq!(
        diag.first_message(),
        Some("names collide after conversion: methods `getURL` and `getUrl` both become `get_url`")
    );
}

#[test]
fn parameter_and_field_collisions() {
    let source = indoc! {"
        type Point = { xValue: number; x_value: number };
        export interface Spec {
          move(to: Point, fromX: number, from_x: number): void;
        }
        export default TurboModuleRegistry.getEnforcing<Spec>('Sample');
    "};
    let diag = bind_err(source);

    let messages: Vec<_> = diag.sorted().iter().map(|m| m.message().to_string()).collect();
    assert_eq!(
        messages,
        [
            "names collide after conversion: fields of `Point` `xValue` and `x_value` both become `x_value`",
            "names collide after conversion: parameters of `move` `fromX` and `from_x` both become `from_x`",
        ]
    );
}

#[test]
fn reserved_names() {
    let source = indoc! {"
        type Sample = { a: number };
        export interface Spec {
          id(): number;
          use(s: Sample): void;
        }
        export default TurboModuleRegistry.getEnforcing<Spec>('Sample');
    "};
    let diag = bind_err(source);

    let messages: Vec<_> = diag.sorted().iter().map(|m| m.message().to_string()).collect();
    assert_eq!(
        messages,
        [
            "names collide after conversion: type `Sample` becomes `Sample`, which is reserved for `Sample`",
            "names collide after conversion: method `id` becomes `id`, which is reserved for `id`",
        ]
    );
}

#[test]
fn emit_is_reserved_only_with_signals() {
    let plain = with_methods("  emit(): void;");
    assert!(bind_module(&mapped(&plain)).is_ok());

    let with_signal = with_methods("  emit(): void;\n  onTick(s: Signal): void;");
    let diag = bind_err(&with_signal);
    assert_eq!(
        diag.first_message(),
        Some("names collide after conversion: method `emit` becomes `emit`, which is reserved for `emit`")
    );
}

#[test]
fn enum_variant_collision() {
    let source = indoc! {"
        enum Level { LOW_LEVEL = 1, LowLevel = 2 }
        export interface Spec {
          set(level: Level): void;
        }
        export default TurboModuleRegistry.getEnforcing<Spec>('Sample');
    "};
    let diag = bind_err(source);

    assert_eq!(
        diag.first_message(),
        Some(
            "names collide after conversion: enum members of `Level` `LOW_LEVEL` and `LowLevel` both become `LowLevel`"
        )
    );
    let start: usize = diag.sorted()[0].range().start().into();
    assert_eq!(&source[start..start + 12], "LowLevel = 2");
}

#[test]
fn nullable_bridge_struct_names_are_reserved() {
    let source = indoc! {"
        type NullableNumber = { a: number };
        export interface Spec {
          find(key: number | null, seed: NullableNumber): void;
        }
        export default TurboModuleRegistry.getEnforcing<Spec>('Sample');
    "};
    let diag = bind_err(source);

    assert_eq!(
        diag.first_message(),
        Some(
            "names collide after conversion: type `NullableNumber` becomes `NullableNumber`, which is reserved for a nullable bridge struct"
        )
    );

    let unused = indoc! {"
        type NullableNumber = { a: number };
        export interface Spec {
          find(seed: NullableNumber): number;
        }
        export default TurboModuleRegistry.getEnforcing<Spec>('Sample');
    "};
    assert!(bind_module(&mapped(unused)).is_ok());
}
