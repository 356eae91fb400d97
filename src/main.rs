use std::io;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::debug;

use stream_faker::{
    config::{Cli, RunConfig},
    runner::run,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Records and the summary share stderr with the log output.
    let default_level = if cli.verbose {
        "warn,stream_faker=debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    let config = RunConfig::try_from(cli).context("Invalid configuration")?;
    debug!("Run configuration: {:?}", config);

    run(&config, io::stderr()).context("Failed to put records")?;

    Ok(())
}
