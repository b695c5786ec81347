use std::path::PathBuf;

use craby_core::ProjectLayout;

use super::Result;

pub struct CleanArgs {
    pub project: PathBuf,
}

pub fn run(args: CleanArgs) -> Result<()> {
    let layout = ProjectLayout::new(&args.project);
    let report = craby_build::clean(&layout)?;
    for path in &report.removed {
        log::info!("removed {}", path.display());
    }
    println!("removed {} path(s)", report.removed.len());
    Ok(())
}
