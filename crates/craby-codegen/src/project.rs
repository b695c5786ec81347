//! Project-level pipeline: find spec units, turn each into a [`ModuleUnit`], render
//! everything, then write.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use rowan::TextRange;

use crate::analyze::build_module;
use crate::bind::{BoundModule, bind_module};
use crate::codegen::{CodegenContext, ModuleUnit, WritePolicy, WriteReport, generate, write_files};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::ir::ModuleSpec;
use crate::parser::parse;
use crate::types::map_module;
use crate::{Error, Result};

/// One spec unit read from disk.
#[derive(Debug, Clone)]
pub struct SpecFile {
    pub path: PathBuf,
    pub source: String,
}

impl SpecFile {
    pub fn read(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// `Native*.ts` files under `dir`, in sorted path order.
pub fn discover_specs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    collect_specs(dir, &mut found)?;
    found.sort();
    log::debug!("found {} spec units under {}", found.len(), dir.display());
    Ok(found)
}

fn collect_specs(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let io_err = |source| Error::Io {
        path: dir.to_path_buf(),
        source,
    };
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_dir() {
            collect_specs(&path, out)?;
        } else if is_spec_file(&path) {
            out.push(path);
        }
    }
    Ok(())
}

fn is_spec_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("Native") && n.ends_with(".ts") && !n.ends_with(".d.ts"))
}

/// Parse and analyze one spec unit into its IR.
pub fn load_spec(source: &str) -> Result<ModuleSpec> {
    let (file, diagnostics) = parse(source);
    if !diagnostics.is_empty() {
        return Err(Error::Spec(diagnostics));
    }
    build_module(&file, source).map_err(Error::Spec)
}

/// Parse, analyze, map and bind one spec unit.
pub fn load_unit(source: &str) -> Result<ModuleUnit> {
    let spec = load_spec(source)?;
    let mapped = map_module(&spec)?;
    let bound = bind_module(&mapped).map_err(Error::Spec)?;
    log::debug!("loaded module `{}`", spec.name);
    Ok(ModuleUnit::new(spec, bound))
}

/// Reject two units registering the same module name, or exporting the same type
/// name from the shared `generated` module.
pub fn ensure_unique_modules(units: &[ModuleUnit]) -> Result<()> {
    let mut seen = HashMap::new();
    let mut exported: HashMap<String, &str> = HashMap::new();
    let mut diag = Diagnostics::new();
    for (i, unit) in units.iter().enumerate() {
        let module = unit.spec.name.as_str();
        if let Some(first) = seen.insert(module, i) {
            seen.insert(module, first);
            diag.report(DiagnosticKind::DuplicateModule, TextRange::default())
                .message(module)
                .emit();
            continue;
        }
        for name in exported_types(&unit.bound) {
            match exported.get(&name) {
                Some(first) => {
                    diag.report(DiagnosticKind::SharedTypeName, TextRange::default())
                        .message(name.as_str())
                        .hint(format!("declared by `{first}` and `{module}`"))
                        .emit();
                }
                None => {
                    exported.insert(name, module);
                }
            }
        }
    }
    if diag.is_empty() {
        Ok(())
    } else {
        Err(Error::Spec(diag))
    }
}

/// Type names a module re-exports from `generated/mod.rs`.
fn exported_types(module: &BoundModule) -> Vec<String> {
    let mut names = vec![module.names.spec_trait()];
    if module.has_signals() {
        names.push(module.names.signal_enum());
    }
    names.extend(module.records.iter().map(|r| r.name.clone()));
    names.extend(module.enums.iter().map(|e| e.name.clone()));
    names
}

/// Render every file, then write them under `policy`.
///
/// Nothing is written unless every module rendered.
pub fn generate_project(ctx: &CodegenContext, policy: WritePolicy) -> Result<WriteReport> {
    ensure_unique_modules(&ctx.units)?;
    let files = generate(ctx);
    write_files(&ctx.layout, &files, policy)
}
