use chrono::NaiveDateTime;
use clap::Subcommand;
use pinfall_api::schedule::{LaneAssignment, Schedule};
use pinfall_api::{League, Storage, TournamentId};

use crate::config::Config;
use crate::utils::parse_datetime;
use crate::Result;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Schedule every match of the bracket, replacing the current schedule.
    Generate {
        tournament: TournamentId,
        /// The start of the first match (YYYY-MM-DD HH:MM).
        #[arg(long, value_parser = parse_datetime)]
        start: NaiveDateTime,
        /// Defaults to `match_minutes` from the config.
        #[arg(long)]
        match_minutes: Option<u32>,
    },
    /// Assign a lane to every scheduled match.
    Lanes {
        tournament: TournamentId,
        /// Defaults to `default_lanes` from the config.
        #[arg(long)]
        lanes: Option<u32>,
        /// 'sequential', 'balanced' or 'random'.
        #[arg(long, default_value_t = LaneAssignment::Sequential)]
        method: LaneAssignment,
    },
    /// Print the schedule.
    Show { tournament: TournamentId },
}

impl Command {
    pub fn run<S>(self, league: &League<S>, config: &Config) -> Result<()>
    where
        S: Storage,
    {
        let schedule = match self {
            Self::Generate {
                tournament,
                start,
                match_minutes,
            } => {
                let minutes = match_minutes.unwrap_or(config.match_minutes);
                league.schedule(tournament).generate(start, minutes)?
            }
            Self::Lanes {
                tournament,
                lanes,
                method,
            } => {
                let lanes = lanes.unwrap_or(config.default_lanes);
                league.schedule(tournament).assign_lanes(lanes, method)?
            }
            Self::Show { tournament } => league.schedule(tournament).get()?,
        };

        print!("{}", render(&schedule));
        Ok(())
    }
}

/// Renders the schedule as a table, one line per match.
pub fn render(schedule: &Schedule) -> String {
    let mut buf = String::from("Round | Match | Start | End | Lane\n");

    for slot in &schedule.slots {
        let lane = match slot.lane {
            Some(lane) => lane.to_string(),
            None => String::from("-"),
        };

        buf.push_str(&format!(
            "{} | {} | {} | {} | {}\n",
            slot.round + 1,
            slot.index + 1,
            slot.start.format("%Y-%m-%d %H:%M"),
            slot.end().format("%H:%M"),
            lane
        ));
    }

    buf
}
