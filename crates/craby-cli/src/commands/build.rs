use std::path::PathBuf;

use craby_build::{BuildPlan, CargoToolchain};
use craby_core::{Colors, PlatformFamily, ProjectLayout};

use super::{CommandError, Result};
use crate::cli::ColorChoice;
use crate::config::ProjectConfig;

pub struct BuildArgs {
    pub project: PathBuf,
    /// Empty means the families from `craby.toml`.
    pub families: Vec<PlatformFamily>,
    pub color: ColorChoice,
}

pub fn run(args: BuildArgs) -> Result<()> {
    let layout = ProjectLayout::new(&args.project);
    let config = ProjectConfig::load(&layout)?;
    let families = if args.families.is_empty() {
        config.families.clone()
    } else {
        args.families
    };
    let colors = Colors::new(args.color.should_colorize());

    let toolchain = CargoToolchain::new(layout.clone(), &config.name);
    let plan = BuildPlan::new(layout, &config.name, &families);
    let outcomes = plan.run(&toolchain);

    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(bundle) => println!(
                "{}ok{} {} -> {}",
                colors.green,
                colors.reset,
                outcome.family,
                bundle.path.display()
            ),
            Err(err) => {
                failed += 1;
                eprintln!(
                    "{}failed{} {}: {err}",
                    colors.red, colors.reset, outcome.family
                );
            }
        }
    }

    if failed > 0 {
        return Err(CommandError::BuildFailed(failed, outcomes.len()));
    }
    Ok(())
}
