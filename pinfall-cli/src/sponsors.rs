use std::fmt::Write;

use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use pinfall_api::prize::Money;
use pinfall_api::sponsor::{NewSponsor, Sponsor};
use pinfall_api::{League, SponsorId, Storage, TournamentId};

use crate::utils::or_prompt;
use crate::Result;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all sponsors.
    List {
        /// Only list sponsors whose sponsorship has not ended.
        #[arg(long)]
        active: bool,
    },
    /// Add a sponsor. Missing values are asked for interactively.
    Add {
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// The sponsored amount, e.g. `500` or `499.99`.
        #[arg(long)]
        amount: Option<Money>,
        /// The first day of the sponsorship (YYYY-MM-DD).
        #[arg(long)]
        start: Option<NaiveDate>,
        /// The last day of the sponsorship (YYYY-MM-DD).
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Sponsor a single tournament instead of the whole league.
        #[arg(long)]
        tournament: Option<TournamentId>,
        #[arg(long, default_value = "")]
        benefits: String,
    },
    Delete { id: SponsorId },
}

impl Command {
    pub fn run<S>(self, league: &League<S>) -> Result<()>
    where
        S: Storage,
    {
        let client = league.sponsors();

        match self {
            Self::List { active } => {
                let today = Utc::now().date_naive();
                let sponsors = if active {
                    client.active_at(today)?
                } else {
                    client.list()?
                };

                print!("{}", render(&sponsors, today));
            }
            Self::Add {
                company,
                contact,
                email,
                amount,
                start,
                end,
                tournament,
                benefits,
            } => {
                let sponsor = client.create(NewSponsor {
                    company: or_prompt(company, "Company")?,
                    contact: or_prompt(contact, "Contact")?,
                    email: or_prompt(email, "Email")?,
                    amount: or_prompt(amount, "Amount")?,
                    start_date: or_prompt(start, "Start date (YYYY-MM-DD)")?,
                    end_date: or_prompt(end, "End date (YYYY-MM-DD)")?,
                    tournament_id: tournament,
                    benefits,
                })?;

                println!("Added sponsor {}", sponsor.id);
            }
            Self::Delete { id } => {
                client.delete(id)?;
                println!("Deleted sponsor {}", id);
            }
        }

        Ok(())
    }
}

/// Renders the sponsors as a table, followed by the number of active sponsors.
pub fn render(sponsors: &[Sponsor], today: NaiveDate) -> String {
    let mut buf = String::new();
    let _ = writeln!(buf, "ID | Company | Contact | Amount | Period | Tournament | Status");

    let mut active = 0;
    for sponsor in sponsors {
        let status = if sponsor.is_active(today) {
            active += 1;
            "Active"
        } else {
            "Expired"
        };

        let tournament = match sponsor.tournament_id {
            Some(id) => id.to_string(),
            None => String::from("-"),
        };

        let _ = writeln!(
            buf,
            "{} | {} | {} <{}> | {} | {} - {} | {} | {}",
            sponsor.id,
            sponsor.company,
            sponsor.contact,
            sponsor.email,
            sponsor.amount,
            sponsor.start_date,
            sponsor.end_date,
            tournament,
            status
        );
    }

    let _ = writeln!(buf, "{} active sponsors", active);
    buf
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pinfall_api::prize::Money;
    use pinfall_api::sponsor::Sponsor;
    use pinfall_api::{SponsorId, TournamentId};

    use super::render;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_render() {
        let sponsors = [
            Sponsor {
                id: SponsorId(1),
                company: String::from("Hollywood Star Lanes"),
                contact: String::from("Marty"),
                email: String::from("marty@example.com"),
                amount: Money(50_000),
                start_date: date(2026, 1, 1),
                end_date: date(2026, 10, 15),
                tournament_id: None,
                benefits: String::new(),
            },
            Sponsor {
                id: SponsorId(2),
                company: String::from("White Russian Co."),
                contact: String::from("Maude"),
                email: String::from("maude@example.com"),
                amount: Money(12_550),
                start_date: date(2026, 10, 1),
                end_date: date(2026, 10, 16),
                tournament_id: Some(TournamentId(7)),
                benefits: String::from("Banner"),
            },
        ];

        assert_eq!(
            render(&sponsors, date(2026, 10, 16)),
            "ID | Company | Contact | Amount | Period | Tournament | Status\n\
            1 | Hollywood Star Lanes | Marty <marty@example.com> | 500.00 | \
            2026-01-01 - 2026-10-15 | - | Expired\n\
            2 | White Russian Co. | Maude <maude@example.com> | 125.50 | \
            2026-10-01 - 2026-10-16 | 7 | Active\n\
            1 active sponsors\n"
        );
    }
}
