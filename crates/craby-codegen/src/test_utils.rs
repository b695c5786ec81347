//! Helpers shared by unit tests.

use craby_core::ProjectLayout;

use crate::analyze::build_module;
use crate::bind::{BoundModule, bind_module};
use crate::codegen::{CodegenContext, ModuleUnit};
use crate::ir::ModuleSpec;
use crate::parser::parse;
use crate::types::{MappedModule, UnsupportedTypeError, map_module};

/// Parse and analyze a spec that is expected to be valid.
pub fn spec(source: &str) -> ModuleSpec {
    let (file, diagnostics) = parse(source);
    assert!(diagnostics.is_empty(), "parse errors:\n{diagnostics}");
    match build_module(&file, source) {
        Ok(spec) => spec,
        Err(diagnostics) => panic!("analysis errors:\n{diagnostics}"),
    }
}

pub fn mapped(source: &str) -> MappedModule {
    match map_module(&spec(source)) {
        Ok(mapped) => mapped,
        Err(err) => panic!("mapping failed: {err}"),
    }
}

pub fn bound(source: &str) -> BoundModule {
    match bind_module(&mapped(source)) {
        Ok(bound) => bound,
        Err(diagnostics) => panic!("binding errors:\n{diagnostics}"),
    }
}

pub fn unit(source: &str) -> ModuleUnit {
    ModuleUnit::new(spec(source), bound(source))
}

/// A project named `my-module` rooted at `root`, one unit per source.
pub fn context(root: &str, sources: &[&str]) -> CodegenContext {
    CodegenContext {
        layout: ProjectLayout::new(root),
        project_name: "my-module".to_string(),
        android_package: "com.example.my_module".to_string(),
        units: sources.iter().map(|s| unit(s)).collect(),
    }
}

pub fn unsupported(source: &str) -> UnsupportedTypeError {
    map_module(&spec(source)).expect_err("expected an unsupported type")
}

pub const CALCULATOR: &str = indoc::indoc! {"
    import type { TurboModule } from 'react-native';
    import { TurboModuleRegistry } from 'react-native';

    export interface Spec extends TurboModule {
      add(a: number, b: number): number;
      getUserName(userId: number): string;
      calculatePrime(n: number): Promise<number>;
    }

    export default TurboModuleRegistry.getEnforcing<Spec>('Calculator');
"};

/// Exercises records, enums, nullables, arrays, promises and signals together.
pub const STORAGE: &str = indoc::indoc! {"
    export enum Mode { Read = 'read', Write = 'write' }
    export enum Priority { Low, High = 10 }

    export type Entry = {
      key: string;
      size: number;
      tags: string[];
      meta?: Meta;
    };

    interface Meta {
      mode: Mode;
      priority: Priority | null;
    }

    export interface Spec extends TurboModule {
      get(key: string): Entry | null;
      list(prefix?: string): Promise<Entry[]>;
      clear(): Promise<void>;
      isReady(): boolean;
      onChange(listener: Signal): void;
    }

    export default TurboModuleRegistry.getEnforcing<Spec>('Storage');
"};
