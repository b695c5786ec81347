//! Build side of craby: compile the developer crate once per target triple and package
//! each platform family into a single multi-architecture bundle.
//!
//! - [`targets`]: the versioned triple set
//! - [`toolchain`]: how one triple is compiled
//! - [`orchestrator`]: concurrent compilation with cancel-on-first-failure
//! - [`bundle`]: staging, manifests and the final move into place
//! - [`clean`]: idempotent removal of build state

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod bundle;
pub mod clean;
mod error;
pub mod orchestrator;
pub mod targets;
pub mod toolchain;

#[cfg(test)]
mod orchestrator_tests;

pub use bundle::Bundle;
pub use clean::{CleanReport, clean};
pub use error::{BuildError, CompilationError, PackagingError};
pub use orchestrator::{Artifact, BuildPlan, FamilyOutcome};
pub use targets::{TARGET_SET_VERSION, Target};
pub use toolchain::{CargoToolchain, Toolchain};

pub type Result<T> = std::result::Result<T, BuildError>;
