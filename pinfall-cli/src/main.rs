mod bowlers;
mod bracket;
mod config;
mod prizes;
mod register;
mod schedule;
mod sponsors;
mod tournaments;
mod utils;

use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use pinfall_api::{FileStorage, League};

use crate::config::Config;

pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// The config file. Defaults to `pinfall.toml` in the working directory, if it exists.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Overrides the data directory of the config.
    #[arg(short, long)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Tournaments {
        #[command(subcommand)]
        command: tournaments::Command,
    },
    Bowlers {
        #[command(subcommand)]
        command: bowlers::Command,
    },
    Register(register::Register),
    Bracket {
        #[command(subcommand)]
        command: bracket::Command,
    },
    Schedule {
        #[command(subcommand)]
        command: schedule::Command,
    },
    Prizes {
        #[command(subcommand)]
        command: prizes::Command,
    },
    Sponsors {
        #[command(subcommand)]
        command: sponsors::Command,
    },
}

fn main() {
    let args = Args::parse();

    if let Err(err) = run(args) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = Config::load(args.config.as_deref())?.with_environment();
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }

    let mut logger = pretty_env_logger::formatted_builder();
    logger.filter_level(config.loglevel);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        logger.parse_filters(&filters);
    }
    logger.init();

    log::debug!("Using data directory {}", config.data_dir.display());

    let league = League::new(FileStorage::open(&config.data_dir)?);

    match args.command {
        Command::Tournaments { command } => command.run(&league),
        Command::Bowlers { command } => command.run(&league),
        Command::Register(register) => register.run(&league),
        Command::Bracket { command } => command.run(&league),
        Command::Schedule { command } => command.run(&league, &config),
        Command::Prizes { command } => command.run(&league),
        Command::Sponsors { command } => command.run(&league),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use clap::{CommandFactory, Parser};
    use pinfall_api::prize::Money;

    use super::{bracket, sponsors, Args, Command};

    #[test]
    fn test_args() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_report() {
        let args = Args::try_parse_from([
            "pinfall",
            "--data-dir",
            "/tmp/pinfall",
            "bracket",
            "report",
            "42",
            "1",
            "2",
            "210",
            "189",
        ])
        .unwrap();

        assert_eq!(args.data_dir.unwrap().to_str(), Some("/tmp/pinfall"));
        assert!(matches!(
            args.command,
            Command::Bracket {
                command: bracket::Command::Report {
                    round: 0,
                    index: 1,
                    score_a: 210,
                    score_b: 189,
                    ..
                }
            }
        ));

        // Rounds and matches are counted from 1.
        let args = ["pinfall", "bracket", "report", "42", "0", "1", "210", "189"];
        assert!(Args::try_parse_from(args).is_err());
        let args = ["pinfall", "bracket", "reset", "42", "1", "0"];
        assert!(Args::try_parse_from(args).is_err());

        let args = ["pinfall", "prizes", "set", "42", "--total", "1.234"];
        assert!(Args::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_sponsors_add() {
        let args = Args::try_parse_from([
            "pinfall",
            "sponsors",
            "add",
            "--company",
            "Hollywood Star Lanes",
            "--amount",
            "499.99",
            "--end",
            "2026-12-31",
        ])
        .unwrap();

        match args.command {
            Command::Sponsors {
                command:
                    sponsors::Command::Add {
                        company,
                        amount,
                        end,
                        tournament,
                        ..
                    },
            } => {
                assert_eq!(company.as_deref(), Some("Hollywood Star Lanes"));
                assert_eq!(amount, Some(Money(49_999)));
                assert_eq!(end, NaiveDate::from_ymd_opt(2026, 12, 31));
                assert_eq!(tournament, None);
            }
            command => panic!("unexpected command: {:?}", command),
        }

        let args = ["pinfall", "sponsors", "add", "--end", "31.12.2026"];
        assert!(Args::try_parse_from(args).is_err());
    }
}
