//! Removal of intermediate build state and bundles. Safe to run at any time.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use craby_core::ProjectLayout;

use crate::{BuildError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub removed: Vec<PathBuf>,
}

/// Everything `clean` deletes.
pub fn clean_paths(layout: &ProjectLayout) -> Vec<PathBuf> {
    vec![
        layout.target_dir(),
        layout.tmp_dir(),
        layout.android_libs_dir(),
        layout.android_bridge_src_dir(),
        layout.android_include_dir(),
        layout.ios_framework_dir(),
    ]
}

/// Delete build outputs. Missing paths are skipped.
pub fn clean(layout: &ProjectLayout) -> Result<CleanReport> {
    let mut report = CleanReport::default();
    for path in clean_paths(layout) {
        let removed = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        match removed {
            Ok(()) => {
                log::info!("removed {}", path.display());
                report.removed.push(path);
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("{} does not exist", path.display());
            }
            Err(source) => return Err(BuildError::Io { path, source }),
        }
    }
    Ok(report)
}
