//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;
use craby_core::PlatformFamily;

use super::ColorChoice;
use crate::commands::build::BuildArgs;
use crate::commands::clean::CleanArgs;
use crate::commands::codegen::CodegenArgs;
use crate::commands::show::ShowArgs;

/// Flags every subcommand accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalParams {
    pub project: PathBuf,
    pub color: ColorChoice,
    pub verbose: u8,
}

impl GlobalParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            project: m
                .get_one::<PathBuf>("project")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(".")),
            color: parse_color(m),
            verbose: m.get_count("verbose"),
        }
    }
}

pub struct CodegenParams {
    pub no_overwrite: bool,
}

impl CodegenParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            no_overwrite: m.get_flag("no_overwrite"),
        }
    }

    pub fn into_args(self, global: &GlobalParams) -> CodegenArgs {
        CodegenArgs {
            project: global.project.clone(),
            no_overwrite: self.no_overwrite,
        }
    }
}

pub struct BuildParams {
    pub families: Vec<PlatformFamily>,
}

impl BuildParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let families = m
            .get_many::<String>("family")
            .into_iter()
            .flatten()
            .filter_map(|f| f.parse().ok())
            .collect();
        Self { families }
    }

    pub fn into_args(self, global: &GlobalParams) -> BuildArgs {
        BuildArgs {
            project: global.project.clone(),
            families: self.families,
            color: global.color,
        }
    }
}

pub struct CleanParams;

impl CleanParams {
    pub fn from_matches(_m: &ArgMatches) -> Self {
        Self
    }

    pub fn into_args(self, global: &GlobalParams) -> CleanArgs {
        CleanArgs {
            project: global.project.clone(),
        }
    }
}

pub struct ShowParams {
    pub json: bool,
}

impl ShowParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            json: m.get_flag("json"),
        }
    }

    pub fn into_args(self, global: &GlobalParams) -> ShowArgs {
        ShowArgs {
            project: global.project.clone(),
            json: self.json,
            color: global.color,
        }
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
