//! Runs one compilation per triple of a family in parallel and waits for all of them.
//!
//! The first failure sets a family-wide cancel flag; compilations still running see it
//! and stop. Packaging starts only after every triple has reported back, and only when
//! none failed.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use craby_core::{PlatformFamily, ProjectLayout};
use crossbeam::channel;

use crate::bundle::{Bundle, package};
use crate::error::CompilationError;
use crate::targets::{Target, targets_for};
use crate::toolchain::Toolchain;
use crate::Result;

/// A compiled static library for one triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub target: Target,
    pub path: PathBuf,
}

struct Report {
    target: Target,
    result: std::result::Result<PathBuf, CompilationError>,
    /// This failure is the one that raised the cancel flag.
    first_failure: bool,
}

/// Compile every triple of `family`. Fails with the first compilation failure.
pub fn compile_family<T: Toolchain>(
    toolchain: &T,
    family: PlatformFamily,
) -> std::result::Result<Vec<Artifact>, CompilationError> {
    let targets = targets_for(family);
    let cancel = AtomicBool::new(false);
    let (tx, rx) = channel::unbounded::<Report>();

    let reports = crossbeam::scope(|s| {
        for target in &targets {
            let tx = tx.clone();
            let cancel = &cancel;
            s.spawn(move |_| {
                log::info!("compiling {}", target.triple);
                let result = toolchain.compile(target, cancel);
                let first_failure = result.is_err()
                    && cancel
                        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                        .is_ok();
                match &result {
                    Ok(path) => log::info!("compiled {} ({})", target.triple, path.display()),
                    Err(_) if first_failure => log::warn!("{} failed, cancelling {family}", target.triple),
                    Err(_) => log::debug!("{} stopped", target.triple),
                }
                // The receiver outlives every worker.
                let _ = tx.send(Report {
                    target: *target,
                    result,
                    first_failure,
                });
            });
        }
        drop(tx);
        rx.iter().collect::<Vec<_>>()
    })
    .map_err(|_| CompilationError {
        triple: family.name().to_string(),
        output: "a build worker panicked".to_string(),
    })?;

    let mut artifacts = Vec::with_capacity(targets.len());
    let mut failure = None;
    for report in reports {
        match report.result {
            Ok(path) => artifacts.push(Artifact {
                target: report.target,
                path,
            }),
            Err(err) if report.first_failure => failure = Some(err),
            Err(err) => {
                if failure.is_none() {
                    failure = Some(err);
                }
            }
        }
    }
    if let Some(err) = failure {
        return Err(err);
    }

    artifacts.sort_by_key(|a| targets.iter().position(|t| *t == a.target));
    Ok(artifacts)
}

/// Result of building one family.
#[derive(Debug)]
pub struct FamilyOutcome {
    pub family: PlatformFamily,
    pub result: Result<Bundle>,
}

/// The families to build for one project.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    layout: ProjectLayout,
    project_name: String,
    families: Vec<PlatformFamily>,
}

impl BuildPlan {
    pub fn new(layout: ProjectLayout, project_name: &str, families: &[PlatformFamily]) -> Self {
        let mut families = families.to_vec();
        families.sort();
        families.dedup();
        Self {
            layout,
            project_name: project_name.to_string(),
            families,
        }
    }

    pub fn families(&self) -> &[PlatformFamily] {
        &self.families
    }

    /// Build each family in turn. A failed family does not stop the others.
    pub fn run<T: Toolchain>(&self, toolchain: &T) -> Vec<FamilyOutcome> {
        self.families
            .iter()
            .map(|&family| FamilyOutcome {
                family,
                result: self.build_family(toolchain, family),
            })
            .collect()
    }

    fn build_family<T: Toolchain>(&self, toolchain: &T, family: PlatformFamily) -> Result<Bundle> {
        let artifacts = compile_family(toolchain, family)?;
        let bundle = package(&self.layout, &self.project_name, family, &artifacts)?;
        Ok(bundle)
    }
}
