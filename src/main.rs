use anyhow::Result;
use clap::Parser;
use console::style;
use log::Level;
use std::io::Write;

use messageformat_build::{build, cli, watcher};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let log_level_filter = cli.log_level_filter();

    // The module itself may go to stdout, so every diagnostic goes to stderr.
    env_logger::Builder::new()
        .format(|buf, record| {
            let level = match record.level() {
                Level::Error => style("error").for_stderr().red().bold(),
                Level::Warn => style("warning").for_stderr().yellow().bold(),
                Level::Info => style("info").for_stderr().dim(),
                Level::Debug | Level::Trace => style("debug").for_stderr().dim(),
            };
            writeln!(buf, "{level}: {}", record.args())
        })
        .filter_level(log_level_filter)
        .target(env_logger::Target::Stderr)
        .init();

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}\n");
            std::process::exit(1);
        }
    };
    let compiler = match build::create_compiler(&config) {
        Ok(compiler) => compiler,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let initial = build::build(&config, &compiler);

    if config.watch {
        watcher::start(&config, &compiler)?;
    } else if initial.is_err() {
        std::process::exit(1);
    }

    Ok(())
}
