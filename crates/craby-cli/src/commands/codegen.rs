use std::path::PathBuf;

use craby_codegen::{CodegenContext, WritePolicy, generate_project};

use super::{Project, Result};

pub struct CodegenArgs {
    pub project: PathBuf,
    pub no_overwrite: bool,
}

pub fn run(args: CodegenArgs) -> Result<()> {
    let Project {
        layout,
        config,
        units,
    } = Project::load(&args.project)?;

    let policy = if args.no_overwrite {
        WritePolicy::NoOverwrite
    } else {
        WritePolicy::Overwrite
    };

    let module_count = units.len();
    let ctx = CodegenContext {
        layout,
        project_name: config.name,
        android_package: config.android_package,
        units,
    };
    let report = generate_project(&ctx, policy)?;

    for (path, outcome) in &report.entries {
        log::info!("{}: {outcome:?}", path.display());
    }
    println!(
        "generated {module_count} module(s): {} written, {} unchanged, {} kept",
        report.written(),
        report.unchanged(),
        report.kept()
    );
    Ok(())
}
