use std::path::PathBuf;

use craby_core::PlatformFamily;

/// One triple failed to compile. `output` is the toolchain's diagnostic output, verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("compilation failed for `{triple}`\n{output}")]
pub struct CompilationError {
    pub triple: String,
    pub output: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PackagingError {
    #[error("missing build output for `{triple}`: {}", path.display())]
    MissingArtifact { triple: String, path: PathBuf },

    #[error("failed to assemble the {family} bundle at {}: {source}", path.display())]
    Assemble {
        family: PlatformFamily,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Compilation(#[from] CompilationError),

    #[error(transparent)]
    Packaging(#[from] PackagingError),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
