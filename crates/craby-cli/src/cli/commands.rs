//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("craby")
        .about("Type-safe Rust for React Native TurboModules")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(project_arg())
        .arg(color_arg())
        .arg(verbose_arg())
        .subcommand(codegen_command())
        .subcommand(build_command())
        .subcommand(clean_command())
        .subcommand(show_command())
}

/// Generate Rust, C++ and platform sources from the spec units.
pub fn codegen_command() -> Command {
    Command::new("codegen")
        .about("Generate sources from the module specs")
        .after_help(
            r#"EXAMPLES:
  craby codegen                  # regenerate everything
  craby codegen --no-overwrite   # keep edited files, stash new output
  craby -p ./my-module codegen   # another project root"#,
        )
        .arg(no_overwrite_arg())
}

/// Cross-compile and package the Rust crate.
pub fn build_command() -> Command {
    Command::new("build")
        .about("Compile for every target triple and package bundles")
        .after_help(
            r#"EXAMPLES:
  craby build                    # families from craby.toml
  craby build --family android   # Android only"#,
        )
        .arg(family_arg())
}

/// Remove build state and bundles.
pub fn clean_command() -> Command {
    Command::new("clean").about("Remove build outputs and bundles")
}

/// Print the resolved modules.
pub fn show_command() -> Command {
    Command::new("show")
        .about("Show the resolved module specs")
        .arg(json_arg())
}
