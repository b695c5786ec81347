use std::path::PathBuf;

use craby_codegen::{SpecPrinter, modules_json};
use craby_core::ProjectLayout;

use super::{Result, load_specs};
use crate::cli::ColorChoice;
use crate::config::ProjectConfig;

pub struct ShowArgs {
    pub project: PathBuf,
    pub json: bool,
    pub color: ColorChoice,
}

pub fn run(args: ShowArgs) -> Result<()> {
    let layout = ProjectLayout::new(&args.project);
    let config = ProjectConfig::load(&layout)?;
    let specs = load_specs(&config.source_dir(&layout))?;

    if args.json {
        println!("{}", modules_json(&specs));
        return Ok(());
    }

    let colored = args.color.should_colorize();
    let dumps: Vec<String> = specs
        .iter()
        .map(|spec| SpecPrinter::new(spec).colored(colored).dump())
        .collect();
    print!("{}", dumps.join("\n"));
    Ok(())
}
