use std::fmt::Write;

use clap::Subcommand;
use pinfall_api::{League, Storage, TournamentId};
use pinfall_core::{
    Bracket, BracketOptions, ByePolicy, Corrections, Entrant, EntrantSpot, Progress, Seeding,
};

use crate::utils::parse_index;
use crate::Result;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the bracket from the registrations, replacing the current bracket.
    Generate {
        tournament: TournamentId,
        /// 'registration-order' or 'by-ranking-desc'.
        #[arg(long, default_value_t = Seeding::RegistrationOrder)]
        seeding: Seeding,
        /// 'strict' keeps entrants facing a bye in the first round, 'advance' moves them on.
        #[arg(long, default_value_t = ByePolicy::Strict)]
        byes: ByePolicy,
        /// 'cascade' clears later matches when a corrected score changes the winner,
        /// 'overwrite' keeps them.
        #[arg(long, default_value_t = Corrections::Cascade)]
        corrections: Corrections,
    },
    /// Print the bracket.
    Show { tournament: TournamentId },
    /// Report the score of a match. Rounds and matches are counted from 1.
    Report {
        tournament: TournamentId,
        #[arg(value_parser = parse_index)]
        round: usize,
        #[arg(value_name = "MATCH", value_parser = parse_index)]
        index: usize,
        score_a: u32,
        score_b: u32,
    },
    /// Clear the score of a match and every match depending on it.
    Reset {
        tournament: TournamentId,
        #[arg(value_parser = parse_index)]
        round: usize,
        #[arg(value_name = "MATCH", value_parser = parse_index)]
        index: usize,
    },
}

impl Command {
    pub fn run<S>(self, league: &League<S>) -> Result<()>
    where
        S: Storage,
    {
        match self {
            Self::Generate {
                tournament,
                seeding,
                byes,
                corrections,
            } => {
                let options = BracketOptions::default()
                    .byes(byes)
                    .corrections(corrections);

                let bracket = league.bracket(tournament).generate(seeding, options)?;
                print!("{}", render(&bracket));
            }
            Self::Show { tournament } => {
                let bracket = league.bracket(tournament).get()?;
                print!("{}", render(&bracket));
            }
            Self::Report {
                tournament,
                round,
                index,
                score_a,
                score_b,
            } => {
                let progress = league
                    .bracket(tournament)
                    .report(round, index, score_a, score_b)?;

                let bracket = league.bracket(tournament).get()?;
                match progress {
                    Progress::Advanced { winner, next } => {
                        let name = bracket.entrant(winner).map(|e| e.name.as_str());
                        println!(
                            "{} advances to round {}, match {}",
                            name.unwrap_or("?"),
                            next.round + 1,
                            next.index + 1
                        );
                    }
                    Progress::Champion(winner) => {
                        let name = bracket.entrant(winner).map(|e| e.name.as_str());
                        println!("{} is the champion", name.unwrap_or("?"));
                    }
                }
            }
            Self::Reset {
                tournament,
                round,
                index,
            } => {
                league.bracket(tournament).reset(round, index)?;

                println!("Reset round {}, match {}", round + 1, index + 1);
            }
        }

        Ok(())
    }
}

/// Renders the bracket as text, one line per match.
pub fn render(bracket: &Bracket<Entrant>) -> String {
    let mut buf = String::new();

    for (round, matches) in bracket.rounds().iter().enumerate() {
        let _ = writeln!(buf, "Round {}", round + 1);

        for (index, r#match) in matches.iter().enumerate() {
            let spot = |position: usize| match r#match[position] {
                EntrantSpot::Entrant(entrant) => bracket
                    .entrant(entrant)
                    .map(|entrant| entrant.to_string())
                    .unwrap_or_default(),
                EntrantSpot::Empty => String::from("BYE"),
                EntrantSpot::TBD => String::from("TBD"),
            };

            let _ = match r#match.score() {
                Some(score) => writeln!(
                    buf,
                    "  {}. {} {} - {} {}",
                    index + 1,
                    spot(0),
                    score.a,
                    score.b,
                    spot(1)
                ),
                None => writeln!(buf, "  {}. {} vs {}", index + 1, spot(0), spot(1)),
            };
        }
    }

    if let Some(champion) = bracket.champion() {
        let _ = writeln!(buf, "Champion: {}", champion);
    }

    buf
}
