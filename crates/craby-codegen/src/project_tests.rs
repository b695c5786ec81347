use std::fs;

use craby_core::ProjectLayout;
use indoc::indoc;

use crate::codegen::{CodegenContext, WritePolicy};
use crate::diagnostics::DiagnosticKind;
use crate::test_utils::{CALCULATOR, STORAGE, unit};
use crate::{
    Error, discover_specs, ensure_unique_modules, generate_project, load_spec, load_unit,
};

#[test]
fn discovers_native_specs_sorted() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(src.join("nested")).unwrap();
    fs::write(src.join("nested/NativeStorage.ts"), STORAGE).unwrap();
    fs::write(src.join("NativeCalculator.ts"), CALCULATOR).unwrap();
    fs::write(src.join("NativeTypes.d.ts"), "").unwrap();
    fs::write(src.join("index.ts"), "").unwrap();

    let found = discover_specs(&src).unwrap();

    assert_eq!(
        found,
        [src.join("NativeCalculator.ts"), src.join("nested/NativeStorage.ts")]
    );
}

#[test]
fn missing_source_dir_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = discover_specs(&dir.path().join("nope")).unwrap_err();

    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn load_unit_runs_the_pipeline() {
    let unit = load_unit(CALCULATOR).unwrap();

    assert_eq!(unit.spec.name, "Calculator");
    assert_eq!(unit.bound.methods[1].rust_name, "get_user_name");
}

#[test]
fn unsupported_type_is_reported() {
    let err = load_unit(indoc! {"
        interface Item { value: string | number; }
        interface Spec { get(): Item; }
        export default TurboModuleRegistry.get<Spec>('Items');
    "})
    .unwrap_err();

    assert!(matches!(err, Error::UnsupportedType(_)));
    let diagnostics = err.diagnostics().unwrap();
    assert!(diagnostics.has_kind(DiagnosticKind::UnsupportedType));
}

#[test]
fn load_spec_stops_before_mapping() {
    let spec = load_spec(indoc! {"
        interface Item { value: string | number; }
        interface Spec { get(): Item; }
        export default TurboModuleRegistry.get<Spec>('Items');
    "})
    .unwrap();

    assert_eq!(spec.name, "Items");
    assert_eq!(spec.records[0].fields[0].ty.to_string(), "string | number");
}

#[test]
fn missing_module_handle_is_a_spec_error() {
    let err = load_unit("interface Spec { ping(): void; }").unwrap_err();

    let Error::Spec(diagnostics) = err else {
        panic!("expected a spec error");
    };
    assert!(diagnostics.has_kind(DiagnosticKind::MissingModuleHandle));
}

#[test]
fn duplicate_modules_are_rejected() {
    let err = ensure_unique_modules(&[unit(CALCULATOR), unit(STORAGE), unit(CALCULATOR)]).unwrap_err();

    let Error::Spec(diagnostics) = err else {
        panic!("expected a spec error");
    };
    assert_eq!(diagnostics.len(), 1);
    insta::assert_snapshot!(
        diagnostics.first_message().unwrap(),
        @"module `Calculator` is declared by more than one spec"
    );
}

#[test]
fn generate_then_regenerate() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = CodegenContext {
        layout: ProjectLayout::new(dir.path()),
        project_name: "my-module".to_string(),
        android_package: "com.example.mymodule".to_string(),
        units: vec![unit(CALCULATOR)],
    };

    let first = generate_project(&ctx, WritePolicy::Overwrite).unwrap();
    assert_eq!(first.written(), first.entries.len());
    assert!(dir.path().join("crates/lib/src/calculator_impl.rs").exists());
    assert!(dir.path().join("cpp/CxxCalculatorModule.cpp").exists());

    let second = generate_project(&ctx, WritePolicy::Overwrite).unwrap();
    assert_eq!(second.written(), 0);
    assert_eq!(second.kept(), 1);
    assert_eq!(second.unchanged(), second.entries.len() - 1);
}

#[test]
fn duplicate_modules_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = CodegenContext {
        layout: ProjectLayout::new(dir.path()),
        project_name: "my-module".to_string(),
        android_package: "com.example.mymodule".to_string(),
        units: vec![unit(CALCULATOR), unit(CALCULATOR)],
    };

    assert!(generate_project(&ctx, WritePolicy::Overwrite).is_err());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn modules_cannot_export_the_same_type() {
    let other = indoc! {"
        export type Entry = { key: string };
        export interface Spec {
          put(entry: Entry): void;
        }
        export default TurboModuleRegistry.getEnforcing<Spec>('Cache');
    "};
    let err = ensure_unique_modules(&[unit(STORAGE), unit(other)]).unwrap_err();

    let Error::Spec(diagnostics) = err else {
        panic!("expected a spec error");
    };
    assert!(diagnostics.has_kind(DiagnosticKind::SharedTypeName));
    insta::assert_snapshot!(
        diagnostics,
        @"error at 0..0: type `Entry` is declared by more than one module (hint: declared by `Storage` and `Cache`)"
    );
}
