pub mod build;
pub mod clean;
pub mod codegen;
pub mod show;

#[cfg(test)]
mod commands_tests;

use std::path::{Path, PathBuf};

use craby_build::BuildError;
use craby_codegen::{ModuleSpec, ModuleUnit, SpecFile};
use craby_core::ProjectLayout;

use crate::config::{ConfigError, ProjectConfig};

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A spec unit failed to load; `source_text` is kept for rendering diagnostics.
    #[error("{}: {error}", path.display())]
    Spec {
        path: PathBuf,
        source_text: String,
        error: craby_codegen::Error,
    },

    #[error(transparent)]
    Codegen(#[from] craby_codegen::Error),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("no spec units (Native*.ts) found under {}", .0.display())]
    NoSpecs(PathBuf),

    #[error("{0} of {1} platform families failed to build")]
    BuildFailed(usize, usize),
}

pub type Result<T> = std::result::Result<T, CommandError>;

/// Print `err` to stderr. Spec errors are rendered against their source.
pub fn report(err: &CommandError, colored: bool) {
    match err {
        CommandError::Spec {
            path,
            source_text,
            error,
        } => match error.diagnostics() {
            Some(diagnostics) => {
                let path_str = path.display().to_string();
                let rendered = diagnostics
                    .printer(source_text)
                    .path(&path_str)
                    .colored(colored)
                    .render();
                eprintln!("{rendered}");
            }
            None => eprintln!("error: {err}"),
        },
        CommandError::Codegen(craby_codegen::Error::Spec(diagnostics)) => {
            for d in diagnostics.sorted() {
                eprintln!("error: {}", d.message());
            }
        }
        _ => eprintln!("error: {err}"),
    }
}

/// A loaded project: configuration plus one unit per spec file.
pub struct Project {
    pub layout: ProjectLayout,
    pub config: ProjectConfig,
    pub units: Vec<ModuleUnit>,
}

impl Project {
    pub fn load(root: &Path) -> Result<Self> {
        let layout = ProjectLayout::new(root);
        let config = ProjectConfig::load(&layout)?;
        let units = load_units(&config.source_dir(&layout))?;
        Ok(Self {
            layout,
            config,
            units,
        })
    }
}

/// Load every spec unit under `dir`, stopping at the first failure.
pub fn load_units(dir: &Path) -> Result<Vec<ModuleUnit>> {
    load_each(dir, craby_codegen::load_unit)
}

/// Like [`load_units`], but stops after building each unit's IR.
pub fn load_specs(dir: &Path) -> Result<Vec<ModuleSpec>> {
    load_each(dir, craby_codegen::load_spec)
}

fn load_each<T>(dir: &Path, load: fn(&str) -> craby_codegen::Result<T>) -> Result<Vec<T>> {
    let paths = craby_codegen::discover_specs(dir)?;
    if paths.is_empty() {
        return Err(CommandError::NoSpecs(dir.to_path_buf()));
    }

    let mut loaded = Vec::with_capacity(paths.len());
    for path in paths {
        let file = SpecFile::read(&path)?;
        match load(&file.source) {
            Ok(item) => loaded.push(item),
            Err(error) => {
                return Err(CommandError::Spec {
                    path: file.path,
                    source_text: file.source,
                    error,
                });
            }
        }
    }
    Ok(loaded)
}
