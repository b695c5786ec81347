//! Shared argument builders for CLI commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Project root (-p/--project).
pub fn project_arg() -> Arg {
    Arg::new("project")
        .short('p')
        .long("project")
        .value_name("DIR")
        .value_parser(value_parser!(PathBuf))
        .default_value(".")
        .global(true)
        .help("Project root containing craby.toml")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .global(true)
        .help("Colorize output")
}

/// Log verbosity (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::Count)
        .global(true)
        .help("Log more (-v info, -vv debug)")
}

/// Keep existing generated files (--no-overwrite).
pub fn no_overwrite_arg() -> Arg {
    Arg::new("no_overwrite")
        .long("no-overwrite")
        .action(ArgAction::SetTrue)
        .help("Keep existing files; stash new content under .craby/stash")
}

/// Platform family to build (--family, repeatable).
pub fn family_arg() -> Arg {
    Arg::new("family")
        .long("family")
        .value_name("FAMILY")
        .action(ArgAction::Append)
        .value_parser(["android", "ios"])
        .help("Platform family to build (default: from craby.toml)")
}

/// Output the IR as JSON (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print the resolved module IR as JSON")
}
