//! Bridge and registration generator.
//!
//! Emits everything between the JavaScript runtime and the developer's Rust code:
//! - [`ffi`]: the `cxx` bridge module with mirror types and conversions
//! - [`cxx`]: the JSI TurboModule classes and value bridging
//! - [`android`] / [`ios`]: platform registration, including the Android bootstrap module
//!
//! A [`RegistrationRecord`] per module drives the method tables and platform lists.

mod android;
mod cxx;
mod ffi;
mod ios;
mod runtime;
mod shapes;

#[cfg(test)]
mod android_tests;

use serde::Serialize;

use crate::bind::BoundModule;
use crate::codegen::{CodegenContext, GeneratedFile};

pub use shapes::{Shape, bridge_shapes};

/// What the host's module discovery needs to know about one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationRecord {
    pub module_name: String,
    pub methods: Vec<MethodEntry>,
    pub capabilities: Capabilities,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodEntry {
    /// Name JavaScript calls.
    pub name: String,
    pub arg_count: usize,
    pub is_async: bool,
    /// Registers a listener instead of making a call.
    pub is_signal: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    /// Needs a worker pool for promise-returning methods.
    pub async_methods: bool,
    /// Needs a listener table and the signal manager.
    pub signals: bool,
}

impl RegistrationRecord {
    pub fn new(module: &BoundModule) -> Self {
        let mut methods: Vec<MethodEntry> = module
            .methods
            .iter()
            .map(|m| MethodEntry {
                name: m.js_name.clone(),
                arg_count: m.params.len(),
                is_async: m.is_async,
                is_signal: false,
            })
            .collect();
        methods.extend(module.signals.iter().map(|s| MethodEntry {
            name: s.js_name.clone(),
            arg_count: 1,
            is_async: false,
            is_signal: true,
        }));

        Self {
            module_name: module.names.js.clone(),
            methods,
            capabilities: Capabilities {
                async_methods: module.has_async(),
                signals: module.has_signals(),
            },
        }
    }
}

/// Render every bridge and registration file for the project.
pub fn emit(ctx: &CodegenContext) -> Vec<GeneratedFile> {
    let mut files = Vec::new();
    for unit in &ctx.units {
        files.push(ffi::bridge_file(ctx, unit));
        files.extend(cxx::module_files(ctx, unit));
    }
    files.push(cxx::bridging_header(ctx));
    files.extend(runtime::runtime_headers(ctx));
    files.extend(android::android_files(ctx));
    files.push(ios::module_provider(ctx));
    files
}
