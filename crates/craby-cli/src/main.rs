mod cli;
mod commands;
mod config;

#[cfg(test)]
mod config_tests;

use cli::{BuildParams, CleanParams, CodegenParams, GlobalParams, ShowParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();
    let Some((name, m)) = matches.subcommand() else {
        unreachable!("clap should have caught this")
    };

    let global = GlobalParams::from_matches(m);
    init_logger(global.verbose);

    let result = match name {
        "codegen" => commands::codegen::run(CodegenParams::from_matches(m).into_args(&global)),
        "build" => commands::build::run(BuildParams::from_matches(m).into_args(&global)),
        "clean" => commands::clean::run(CleanParams::from_matches(m).into_args(&global)),
        "show" => commands::show::run(ShowParams::from_matches(m).into_args(&global)),
        _ => unreachable!("clap should have caught this"),
    };

    if let Err(err) = result {
        commands::report(&err, global.color.should_colorize());
        std::process::exit(1);
    }
}

/// `warn` by default, `-v` for info, `-vv` and up for debug. `RUST_LOG` wins.
fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}
