use clap::Subcommand;
use pinfall_api::prize::{Distribution, Money, PrizePool};
use pinfall_api::{League, Storage, TournamentId};

use crate::Result;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the prize pool of a tournament.
    Set {
        tournament: TournamentId,
        /// The total amount, e.g. `1500` or `1500.50`.
        #[arg(long)]
        total: Money,
        /// 'standard', 'top-heavy', 'balanced' or 'custom:60,25,15'.
        #[arg(long, default_value = "standard")]
        distribution: Distribution,
    },
    /// Print the payout for every place.
    Show { tournament: TournamentId },
    /// Remove the prize pool of a tournament.
    Delete { tournament: TournamentId },
}

impl Command {
    pub fn run<S>(self, league: &League<S>) -> Result<()>
    where
        S: Storage,
    {
        match self {
            Self::Set {
                tournament,
                total,
                distribution,
            } => {
                let pool = league.prizes(tournament).set(total, distribution)?;
                print!("{}", render(&pool));
            }
            Self::Show { tournament } => {
                let pool = league.prizes(tournament).get()?;
                print!("{}", render(&pool));
            }
            Self::Delete { tournament } => {
                league.prizes(tournament).delete()?;
                println!("Removed the prize pool of tournament {}", tournament);
            }
        }

        Ok(())
    }
}

pub fn render(pool: &PrizePool) -> String {
    let mut buf = format!("Total: {} ({})\n", pool.total, pool.distribution);

    for payout in pool.payouts() {
        buf.push_str(&format!(
            "  {}. {} ({}%)\n",
            payout.place, payout.amount, payout.percentage
        ));
    }

    buf
}

#[cfg(test)]
mod tests {
    use pinfall_api::prize::{Distribution, Money, PrizePool};
    use pinfall_api::TournamentId;

    use super::render;

    #[test]
    fn test_render() {
        let pool = PrizePool::new(TournamentId(1), Money(100_000), Distribution::Standard).unwrap();

        assert_eq!(
            render(&pool),
            "Total: 1000.00 (standard)\n  \
            1. 500.00 (50%)\n  \
            2. 300.00 (30%)\n  \
            3. 200.00 (20%)\n"
        );
    }
}
