//! Fixed locations inside a craby project.
//!
//! Generators, the build orchestrator and `clean` all resolve paths here, so a file
//! written by one step is found by the others.

use std::path::{Path, PathBuf};

use crate::naming::to_snake_case;

pub const CONFIG_FILE: &str = "craby.toml";
pub const TMP_DIR: &str = ".craby";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Scratch space for stashed output and bundle staging.
    pub fn tmp_dir(&self) -> PathBuf {
        self.root.join(TMP_DIR)
    }

    pub fn crate_dir(&self) -> PathBuf {
        self.root.join("crates").join("lib")
    }

    pub fn crate_manifest(&self) -> PathBuf {
        self.crate_dir().join("Cargo.toml")
    }

    /// Hand-written C++ headers of the developer crate.
    pub fn crate_include_dir(&self) -> PathBuf {
        self.crate_dir().join("include")
    }

    pub fn rust_src_dir(&self) -> PathBuf {
        self.crate_dir().join("src")
    }

    pub fn generated_dir(&self) -> PathBuf {
        self.rust_src_dir().join("generated")
    }

    pub fn cpp_dir(&self) -> PathBuf {
        self.root.join("cpp")
    }

    pub fn jni_dir(&self) -> PathBuf {
        self.root.join("android").join("src").join("main").join("jni")
    }

    /// Source directory of a Kotlin/Java package, e.g. `com.example.app`.
    pub fn kotlin_package_dir(&self, package_name: &str) -> PathBuf {
        package_name
            .split('.')
            .fold(self.root.join("android/src/main/java"), |dir, seg| dir.join(seg))
    }

    pub fn ios_src_dir(&self) -> PathBuf {
        self.root.join("ios").join("src")
    }

    pub fn target_dir(&self) -> PathBuf {
        self.root.join("target")
    }

    /// Where cargo leaves release artifacts for `triple`.
    pub fn target_output_dir(&self, triple: &str) -> PathBuf {
        self.target_dir().join(triple).join("release")
    }

    /// C++ that cxx generated while compiling `triple`.
    pub fn cxx_bridge_dir(&self, triple: &str) -> PathBuf {
        self.target_dir().join(triple).join("cxxbridge")
    }

    pub fn android_libs_dir(&self) -> PathBuf {
        self.jni_dir().join("libs")
    }

    pub fn android_bridge_src_dir(&self) -> PathBuf {
        self.jni_dir().join("src")
    }

    pub fn android_include_dir(&self) -> PathBuf {
        self.jni_dir().join("include")
    }

    pub fn ios_framework_dir(&self) -> PathBuf {
        self.root.join("ios").join("framework")
    }

    pub fn xcframework_dir(&self, lib_name: &str) -> PathBuf {
        self.ios_framework_dir()
            .join(format!("lib{}.xcframework", lib_name))
    }
}

/// Cargo library name for a project name (`my-module` is `my_module`).
pub fn lib_name(project_name: &str) -> String {
    to_snake_case(project_name)
}
