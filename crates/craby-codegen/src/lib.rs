//! craby code generator: spec parser, analyzer and emitters.
//!
//! Pipeline for one spec unit:
//! - `parser` - logos lexer and recursive-descent parser into an AST
//! - `analyze` - IR building: alias resolution, lowering, cycle checks
//! - `types` - mapping of IR types onto the generation target
//! - `bind` - generated names and collision checks
//! - `codegen` - Rust sources and the write policy
//! - `bridge` - cxx bridge, JSI module, Android and iOS registration
//!
//! `project` drives the pipeline over a whole project; `bootstrap` models the Android
//! module discovery handshake the generated registration relies on.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod analyze;
pub mod bind;
pub mod bootstrap;
pub mod bridge;
pub mod codegen;
pub mod diagnostics;
pub mod ir;
pub mod parser;
pub mod printer;
pub mod project;
pub mod types;

#[cfg(test)]
mod project_tests;
#[cfg(test)]
pub mod test_utils;

use std::path::PathBuf;

pub use codegen::{CodegenContext, ModuleUnit, WritePolicy, WriteReport};
pub use diagnostics::{Diagnostics, DiagnosticsPrinter};
pub use printer::{SpecPrinter, modules_json};
pub use ir::ModuleSpec;
pub use project::{
    SpecFile, discover_specs, ensure_unique_modules, generate_project, load_spec, load_unit,
};
pub use types::UnsupportedTypeError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The spec is malformed or ambiguous.
    #[error("invalid spec: {0}")]
    Spec(Diagnostics),

    #[error(transparent)]
    UnsupportedType(#[from] UnsupportedTypeError),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Diagnostics renderable against the spec source, when the error came from one.
    pub fn diagnostics(&self) -> Option<Diagnostics> {
        match self {
            Error::Spec(diagnostics) => Some(diagnostics.clone()),
            Error::UnsupportedType(err) => Some(err.to_diagnostics()),
            Error::Io { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
