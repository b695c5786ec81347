//! Code generator: renders bound modules into source files and writes them out.
//!
//! Rendering is pure and finishes for every module before anything touches the disk.
//! [`write_files`] then applies the [`WritePolicy`] file by file.

pub(crate) mod render;
mod rust;
mod writer;

#[cfg(test)]
mod rust_tests;
#[cfg(test)]
mod writer_tests;

use std::path::PathBuf;

use craby_core::ProjectLayout;

use crate::bind::BoundModule;
use crate::ir::ModuleSpec;

pub use rust::RustEmitter;
pub use writer::{WriteOutcome, WritePolicy, WriteReport, write_files};

pub const GENERATED_MARKER: &str = "@generated by craby. DO NOT EDIT.";

/// Who owns a file after it has been written once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOwnership {
    /// Rewritten on every run.
    Generated,
    /// Written only when absent, then left to the developer.
    DeveloperOwned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub content: String,
    pub ownership: FileOwnership,
}

impl GeneratedFile {
    pub fn generated(path: PathBuf, content: String) -> Self {
        Self {
            path,
            content,
            ownership: FileOwnership::Generated,
        }
    }

    pub fn developer_owned(path: PathBuf, content: String) -> Self {
        Self {
            path,
            content,
            ownership: FileOwnership::DeveloperOwned,
        }
    }
}

/// One spec unit after analysis, mapping and naming.
#[derive(Debug, Clone)]
pub struct ModuleUnit {
    pub spec: ModuleSpec,
    pub bound: BoundModule,
}

impl ModuleUnit {
    pub fn new(spec: ModuleSpec, bound: BoundModule) -> Self {
        Self { spec, bound }
    }

    /// CRC32 of the module's IR in JSON form.
    pub fn hash(&self) -> u32 {
        let json = serde_json::to_vec(&self.spec).expect("IR serializes to JSON");
        crc32fast::hash(&json)
    }
}

/// Everything the emitters need to know about the project.
#[derive(Debug, Clone)]
pub struct CodegenContext {
    pub layout: ProjectLayout,
    /// Project name from `craby.toml`, e.g. `my-module`.
    pub project_name: String,
    /// Dotted Kotlin package of the Android library.
    pub android_package: String,
    pub units: Vec<ModuleUnit>,
}

impl CodegenContext {
    pub fn modules(&self) -> impl Iterator<Item = &BoundModule> {
        self.units.iter().map(|u| &u.bound)
    }

    pub fn has_signals(&self) -> bool {
        self.modules().any(BoundModule::has_signals)
    }

    /// Hash over every module, for files shared by the whole project.
    pub fn project_hash(&self) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        for unit in &self.units {
            hasher.update(&unit.hash().to_le_bytes());
        }
        hasher.finalize()
    }

    /// File header for generated sources. `comment` is the line comment token.
    pub fn header(&self, comment: &str, hash: u32) -> String {
        format!("{comment} {GENERATED_MARKER}\n{comment} Hash: {hash:08x}\n")
    }
}

/// Render every file of the project. Nothing is written.
pub fn generate(ctx: &CodegenContext) -> Vec<GeneratedFile> {
    let mut files = RustEmitter::new(ctx).emit();
    files.extend(crate::bridge::emit(ctx));
    log::debug!("rendered {} files", files.len());
    files
}

/// Indent every non-empty line of `text` by `width` spaces.
pub(crate) fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
