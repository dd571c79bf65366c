use clap::Subcommand;
use pinfall_api::bowler::{
    Bowler, BowlerFilter, BowlerStatus, DirectoryStats, NewBowler, HIGH_AVERAGE,
};
use pinfall_api::{BowlerId, League, Storage};

use crate::utils::or_prompt;
use crate::Result;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all bowlers in the directory.
    List,
    /// Add a bowler to the directory.
    Add {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        average: Option<u32>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Change the details of a bowler. Omitted values are kept.
    Update {
        id: BowlerId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        average: Option<u32>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Find bowlers by name or email.
    Search {
        query: Option<String>,
        /// 'active' or 'inactive'.
        #[arg(long)]
        status: Option<BowlerStatus>,
    },
    /// Print numbers about the directory.
    Stats,
    /// Set or clear the average of a bowler.
    Average { id: BowlerId, average: Option<u32> },
    Activate { id: BowlerId },
    Deactivate { id: BowlerId },
    Delete { id: BowlerId },
}

impl Command {
    pub fn run<S>(self, league: &League<S>) -> Result<()>
    where
        S: Storage,
    {
        let client = league.bowlers();

        match self {
            Self::List => print_bowlers(&client.list()?),
            Self::Add {
                name,
                email,
                average,
                notes,
            } => {
                let bowler = client.create(NewBowler {
                    name: or_prompt(name, "Name")?,
                    email: or_prompt(email, "Email")?,
                    average,
                    notes,
                })?;

                println!("Added bowler {}", bowler.id);
            }
            Self::Update {
                id,
                name,
                email,
                average,
                notes,
            } => {
                let bowler = client.get(id)?;
                let bowler = client.update(
                    id,
                    NewBowler {
                        name: name.unwrap_or(bowler.name),
                        email: email.unwrap_or(bowler.email),
                        average: average.or(bowler.average),
                        notes: notes.or(bowler.notes),
                    },
                )?;

                println!("Updated bowler {}", bowler.name);
            }
            Self::Search { query, status } => {
                let filter = BowlerFilter {
                    search: query,
                    status,
                };

                print_bowlers(&client.search(&filter)?);
            }
            Self::Stats => print!("{}", render_stats(&client.stats()?)),
            Self::Average { id, average } => {
                let bowler = client.set_average(id, average)?;
                println!("Updated the average of {}", bowler.name);
            }
            Self::Activate { id } => {
                client.set_status(id, BowlerStatus::Active)?;
                println!("Activated bowler {}", id);
            }
            Self::Deactivate { id } => {
                client.set_status(id, BowlerStatus::Inactive)?;
                println!("Deactivated bowler {}", id);
            }
            Self::Delete { id } => {
                client.delete(id)?;
                println!("Deleted bowler {}", id);
            }
        }

        Ok(())
    }
}

fn print_bowlers(bowlers: &[Bowler]) {
    println!("ID | Name | Email | Average | Status");
    for bowler in bowlers {
        let average = match bowler.average {
            Some(average) => average.to_string(),
            None => String::from("-"),
        };

        println!(
            "{} | {} | {} | {} | {}",
            bowler.id, bowler.name, bowler.email, average, bowler.status
        );
    }
}

pub fn render_stats(stats: &DirectoryStats) -> String {
    let average = match stats.average {
        0 => String::from("-"),
        average => average.to_string(),
    };

    format!(
        "Bowlers: {}\nActive: {}\n{}+ averages: {}\nAverage: {}\n",
        stats.total, stats.active, HIGH_AVERAGE, stats.high_averages, average
    )
}
