//! Compiling one target triple.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use craby_core::ProjectLayout;
use craby_core::layout::lib_name;

use crate::error::CompilationError;
use crate::targets::Target;

/// Output of a cancelled compilation.
pub const CANCELLED: &str = "cancelled after another target failed";

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Compiles the developer crate for one triple.
///
/// Called concurrently for every triple of a family. Implementations should give up
/// early once `cancel` is set.
pub trait Toolchain: Sync {
    /// Path of the static library built for `target`.
    fn compile(&self, target: &Target, cancel: &AtomicBool) -> Result<PathBuf, CompilationError>;
}

/// `cargo build --release` against the crate in `crates/lib`.
#[derive(Debug, Clone)]
pub struct CargoToolchain {
    layout: ProjectLayout,
    lib_name: String,
    cargo: String,
}

impl CargoToolchain {
    pub fn new(layout: ProjectLayout, project_name: &str) -> Self {
        Self {
            layout,
            lib_name: lib_name(project_name),
            cargo: std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string()),
        }
    }

    pub fn output_path(&self, target: &Target) -> PathBuf {
        self.layout
            .target_output_dir(target.triple)
            .join(format!("lib{}.a", self.lib_name))
    }

    fn command(&self, target: &Target) -> Command {
        let mut cmd = Command::new(&self.cargo);
        cmd.arg("build")
            .arg("--release")
            .arg("--target")
            .arg(target.triple)
            .arg("--manifest-path")
            .arg(self.layout.crate_manifest())
            .arg("--target-dir")
            .arg(self.layout.target_dir())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }
}

impl Toolchain for CargoToolchain {
    fn compile(&self, target: &Target, cancel: &AtomicBool) -> Result<PathBuf, CompilationError> {
        let failed = |output: String| CompilationError {
            triple: target.triple.to_string(),
            output,
        };

        let mut child = self
            .command(target)
            .spawn()
            .map_err(|e| failed(format!("failed to run {}: {e}", self.cargo)))?;

        // Drained on its own thread so a chatty build never blocks on a full pipe.
        let stderr = child.stderr.take();
        let reader = thread::spawn(move || {
            let mut output = String::new();
            if let Some(mut stderr) = stderr {
                let _ = stderr.read_to_string(&mut output);
            }
            output
        });

        let status = wait(&mut child, cancel);
        let output = reader.join().unwrap_or_default();

        match status {
            Some(Ok(status)) if status.success() => Ok(self.output_path(target)),
            Some(Ok(_)) => Err(failed(output)),
            Some(Err(e)) => Err(failed(format!("failed to wait for {}: {e}", self.cargo))),
            None => Err(failed(CANCELLED.to_string())),
        }
    }
}

/// Wait for `child`, killing it if `cancel` is set first. `None` means it was killed.
fn wait(child: &mut Child, cancel: &AtomicBool) -> Option<std::io::Result<std::process::ExitStatus>> {
    loop {
        if cancel.load(Ordering::SeqCst) {
            let _ = child.kill();
            let _ = child.wait();
            return None;
        }
        match child.try_wait() {
            Ok(Some(status)) => return Some(Ok(status)),
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => return Some(Err(e)),
        }
    }
}
