use std::fs;
use std::path::{Path, PathBuf};

use craby_core::ProjectLayout;

use super::{FileOwnership, GeneratedFile};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
    /// Replace generated files that differ from the new content.
    #[default]
    Overwrite,
    /// Keep every existing file. New content for changed files is stashed under `.craby/`.
    NoOverwrite,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// Existing content already matches.
    Unchanged,
    /// Developer-owned file that already exists.
    Kept,
    /// Existing file kept; the new content went to the given path.
    Stashed(PathBuf),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub entries: Vec<(PathBuf, WriteOutcome)>,
}

impl WriteReport {
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, WriteOutcome::Written))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, WriteOutcome::Unchanged))
    }

    pub fn kept(&self) -> usize {
        self.count(|o| matches!(o, WriteOutcome::Kept | WriteOutcome::Stashed(_)))
    }

    fn count(&self, pred: impl Fn(&WriteOutcome) -> bool) -> usize {
        self.entries.iter().filter(|(_, o)| pred(o)).count()
    }
}

pub fn write_files(
    layout: &ProjectLayout,
    files: &[GeneratedFile],
    policy: WritePolicy,
) -> Result<WriteReport> {
    let mut report = WriteReport::default();
    for file in files {
        let outcome = write_file(layout, file, policy)?;
        report.entries.push((file.path.clone(), outcome));
    }
    log::info!(
        "{} written, {} unchanged, {} kept",
        report.written(),
        report.unchanged(),
        report.kept()
    );
    Ok(report)
}

fn write_file(layout: &ProjectLayout, file: &GeneratedFile, policy: WritePolicy) -> Result<WriteOutcome> {
    let existing = match fs::read_to_string(&file.path) {
        Ok(content) => Some(content),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(source) => return Err(io_error(&file.path, source)),
    };

    let Some(existing) = existing else {
        write_new(&file.path, &file.content)?;
        log::info!("wrote {}", file.path.display());
        return Ok(WriteOutcome::Written);
    };

    if file.ownership == FileOwnership::DeveloperOwned {
        log::debug!("kept {}", file.path.display());
        return Ok(WriteOutcome::Kept);
    }

    if existing == file.content {
        log::debug!("unchanged {}", file.path.display());
        return Ok(WriteOutcome::Unchanged);
    }

    match policy {
        WritePolicy::Overwrite => {
            write_new(&file.path, &file.content)?;
            log::info!("wrote {}", file.path.display());
            Ok(WriteOutcome::Written)
        }
        WritePolicy::NoOverwrite => {
            let stash = stash_path(layout, &file.path);
            write_new(&stash, &file.content)?;
            log::warn!(
                "{} differs from the generated output, kept it (new content in {})",
                file.path.display(),
                stash.display()
            );
            Ok(WriteOutcome::Stashed(stash))
        }
    }
}

fn stash_path(layout: &ProjectLayout, path: &Path) -> PathBuf {
    let relative = path.strip_prefix(layout.root()).unwrap_or(path);
    let relative = if relative.is_absolute() {
        relative.file_name().map(PathBuf::from).unwrap_or_default()
    } else {
        relative.to_path_buf()
    };
    layout.tmp_dir().join("stash").join(relative)
}

fn write_new(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }
    fs::write(path, content).map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source,
    }
}
