use std::fs;
use std::path::Path;

use indoc::indoc;

use super::codegen::{self, CodegenArgs};
use super::{CommandError, Project, load_specs, load_units};

const CONFIG: &str = indoc! {r#"
    [project]
    name = "my-module"

    [android]
    package_name = "com.mymodule"
"#};

const CALCULATOR: &str = indoc! {"
    import type { TurboModule } from 'react-native';
    import { TurboModuleRegistry } from 'react-native';

    export interface Spec extends TurboModule {
      add(a: number, b: number): number;
    }

    export default TurboModuleRegistry.getEnforcing<Spec>('Calculator');
"};

fn project(root: &Path, specs: &[(&str, &str)]) {
    fs::write(root.join("craby.toml"), CONFIG).unwrap();
    fs::create_dir_all(root.join("src")).unwrap();
    for (name, source) in specs {
        fs::write(root.join("src").join(name), source).unwrap();
    }
}

#[test]
fn loads_config_and_units() {
    let dir = tempfile::tempdir().unwrap();
    project(dir.path(), &[("NativeCalculator.ts", CALCULATOR)]);

    let loaded = Project::load(dir.path()).unwrap();

    assert_eq!(loaded.config.name, "my-module");
    assert_eq!(loaded.units.len(), 1);
    assert_eq!(loaded.units[0].spec.name, "Calculator");
}

#[test]
fn empty_source_dir() {
    let dir = tempfile::tempdir().unwrap();
    project(dir.path(), &[]);

    let err = load_units(&dir.path().join("src")).unwrap_err();

    assert!(matches!(err, CommandError::NoSpecs(_)));
}

#[test]
fn spec_error_keeps_path_and_source() {
    let dir = tempfile::tempdir().unwrap();
    project(dir.path(), &[("NativeBroken.ts", "export interface Spec {")]);

    let err = load_units(&dir.path().join("src")).unwrap_err();

    let CommandError::Spec {
        path,
        source_text,
        error,
    } = err
    else {
        panic!("expected a spec error");
    };
    assert!(path.ends_with("NativeBroken.ts"));
    assert_eq!(source_text, "export interface Spec {");
    assert!(error.diagnostics().is_some());
}

#[test]
fn missing_config() {
    let dir = tempfile::tempdir().unwrap();

    assert!(matches!(
        Project::load(dir.path()),
        Err(CommandError::Config(_))
    ));
}

#[test]
fn codegen_writes_project_files() {
    let dir = tempfile::tempdir().unwrap();
    project(dir.path(), &[("NativeCalculator.ts", CALCULATOR)]);

    codegen::run(CodegenArgs {
        project: dir.path().to_path_buf(),
        no_overwrite: false,
    })
    .unwrap();

    let generated = dir.path().join("crates/lib/src/generated");
    assert!(generated.is_dir());
    assert!(dir.path().join("cpp/CxxCalculatorModule.hpp").is_file());
}

#[test]
fn specs_load_without_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let picker = indoc! {"
        export interface Spec {
          pick(value: string | number): void;
        }
        export default TurboModuleRegistry.getEnforcing<Spec>('Picker');
    "};
    project(dir.path(), &[("NativePicker.ts", picker)]);
    let src = dir.path().join("src");

    assert!(matches!(load_units(&src), Err(CommandError::Spec { .. })));
    let specs = load_specs(&src).unwrap();
    assert_eq!(specs[0].name, "Picker");
}
