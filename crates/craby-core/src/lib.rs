#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Shared primitives for the craby toolchain.
//!
//! - [`naming`]: identifier case conversion used by every generator
//! - [`platform`]: the host platform families a module is generated and built for
//! - [`layout`]: fixed on-disk locations inside a craby project
//! - [`colors`]: ANSI palette for CLI output

pub mod colors;
pub mod layout;
pub mod naming;
pub mod platform;

#[cfg(test)]
mod naming_tests;
#[cfg(test)]
mod platform_tests;

pub use colors::Colors;
pub use layout::ProjectLayout;
pub use platform::PlatformFamily;
