use clap::Args;
use pinfall_api::registration::NewRegistration;
use pinfall_api::{League, Storage, TournamentId};
use pinfall_core::SkillLevel;

use crate::utils::or_prompt;
use crate::Result;

/// Register a bowler for a tournament.
#[derive(Debug, Args)]
pub struct Register {
    tournament: TournamentId,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    /// The bowling average. New bowlers without an average start at 160.
    #[arg(long)]
    average: Option<u32>,
    /// One of 'beginner', 'intermediate', 'advanced' or 'professional'.
    #[arg(long)]
    skill: Option<SkillLevel>,
}

impl Register {
    pub fn run<S>(self, league: &League<S>) -> Result<()>
    where
        S: Storage,
    {
        let registration = NewRegistration {
            name: or_prompt(self.name, "Name")?,
            email: or_prompt(self.email, "Email")?,
            average: self.average,
            skill: self.skill,
        };

        let registration = league
            .registrations(self.tournament)
            .register(registration)?;

        println!(
            "Registered {} with an average of {} (registration {})",
            registration.name, registration.average, registration.id
        );

        Ok(())
    }
}
