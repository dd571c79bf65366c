use chrono::NaiveDate;
use clap::Subcommand;
use pinfall_api::tournament::NewTournament;
use pinfall_api::{League, Storage, TournamentId};

use crate::utils::or_prompt;
use crate::Result;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all tournaments.
    List,
    /// Create a new tournament. Missing values are asked for interactively.
    Create {
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
        /// The first day of the tournament (YYYY-MM-DD).
        #[arg(long)]
        start: Option<NaiveDate>,
        /// The last day to register (YYYY-MM-DD).
        #[arg(long)]
        deadline: Option<NaiveDate>,
        #[arg(long)]
        max_participants: Option<u32>,
    },
    /// Show a tournament with its registrations.
    Show { id: TournamentId },
    /// Delete a tournament with its schedule and prize pool.
    Delete { id: TournamentId },
}

impl Command {
    pub fn run<S>(self, league: &League<S>) -> Result<()>
    where
        S: Storage,
    {
        match self {
            Self::List => {
                let tournaments = league.tournaments().list()?;

                println!("ID | Name | Start | Registrations | Status");
                for tournament in tournaments {
                    println!(
                        "{} | {} | {} | {}/{} | {}",
                        tournament.id,
                        tournament.name,
                        tournament.start_date,
                        tournament.registrations.len(),
                        tournament.max_participants,
                        tournament.status
                    );
                }
            }
            Self::Create {
                name,
                description,
                start,
                deadline,
                max_participants,
            } => {
                let tournament = NewTournament {
                    name: or_prompt(name, "Name")?,
                    description,
                    start_date: or_prompt(start, "Start date (YYYY-MM-DD)")?,
                    registration_deadline: or_prompt(deadline, "Registration deadline")?,
                    max_participants: or_prompt(max_participants, "Max participants")?,
                };

                let tournament = league.tournaments().create(tournament)?;
                println!("Created tournament {}", tournament.id);
            }
            Self::Show { id } => {
                let tournament = league.tournaments().get(id)?;

                println!("{} ({})", tournament.name, tournament.id);
                if !tournament.description.is_empty() {
                    println!("{}", tournament.description);
                }
                println!("Format: {}", tournament.format);
                println!("Status: {}", tournament.status);
                println!("Start: {}", tournament.start_date);
                println!("Registration deadline: {}", tournament.registration_deadline);
                println!(
                    "Registrations: {}/{}",
                    tournament.registrations.len(),
                    tournament.max_participants
                );

                for (index, registration) in tournament.registrations.iter().enumerate() {
                    println!(
                        "  {}. {} <{}> avg {}",
                        index + 1,
                        registration.name,
                        registration.email,
                        registration.average
                    );
                }

                if let Some(champion) = tournament.bracket.as_ref().and_then(|b| b.champion()) {
                    println!("Champion: {}", champion);
                }
            }
            Self::Delete { id } => {
                league.tournaments().delete(id)?;
                println!("Deleted tournament {}", id);
            }
        }

        Ok(())
    }
}
