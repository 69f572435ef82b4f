//! rbrc - Single-Pass Station Statistics
//!
//! Reads a `station;value` file and prints `{Station=min/mean/max, ...}`.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::warn;
use rbrc::config::{parse_delimiter, DEFAULT_INPUT};
use rbrc::parser::RecordPolicy;
use rbrc::{Config, SourceStrategy};
use std::path::PathBuf;

fn cli() -> Command {
    let command = Command::new("rbrc")
        .version(rbrc::VERSION)
        .about("Per-station min/mean/max over a large `station;value` file")
        .long_about(
            "rbrc folds every `key;value` record of the input into per-key minimum, \
             mean and maximum, and prints them sorted by key with one decimal digit.",
        )
        .arg(
            Arg::new("file")
                .help("Path to the measurements file")
                .default_value(DEFAULT_INPUT)
                .index(1),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .help("Worker threads (1 folds sequentially) [default: all cores]")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("delimiter")
                .short('d')
                .long("delimiter")
                .help("Single ASCII character separating key and value [default: ;]"),
        )
        .arg(
            Arg::new("lenient")
                .long("lenient")
                .help("Skip malformed records instead of aborting")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("strategy")
                .long("strategy")
                .help("How to read the input: auto, mmap or buffered [default: auto]"),
        );

    #[cfg(feature = "config")]
    let command = command.arg(
        Arg::new("config")
            .short('c')
            .long("config")
            .help("TOML configuration file"),
    );

    command
}

fn build_config(matches: &ArgMatches) -> Result<Config> {
    let mut config = Config::default();

    #[cfg(feature = "config")]
    {
        use rbrc::config::FileConfig;
        let file = match matches.get_one::<String>("config") {
            Some(path) => Some(FileConfig::load(std::path::Path::new(path))?),
            None => FileConfig::load_default()?,
        };
        if let Some(file) = file {
            file.apply_to(&mut config)?;
        }
    }

    if let Some(file) = matches.get_one::<String>("file") {
        config.input = PathBuf::from(file);
    }
    if let Some(threads) = matches.get_one::<usize>("threads") {
        config.threads = Some(*threads);
    }
    if let Some(delimiter) = matches.get_one::<String>("delimiter") {
        config.delimiter = parse_delimiter(delimiter)?;
    }
    if matches.get_flag("lenient") {
        config.policy = RecordPolicy::Lenient;
    }
    if let Some(strategy) = matches.get_one::<String>("strategy") {
        config.strategy = strategy.parse::<SourceStrategy>()?;
    }

    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();

    let matches = cli().get_matches();
    let config = build_config(&matches)?;

    let report = rbrc::run(&config)
        .with_context(|| format!("failed to aggregate {}", config.input.display()))?;

    if report.rejected > 0 {
        warn!("skipped {} malformed records", report.rejected);
    }

    println!("{}", report.summary);
    Ok(())
}
