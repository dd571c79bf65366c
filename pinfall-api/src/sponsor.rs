use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::prize::Money;
use crate::{tournament, Error, League, Result, SponsorId, Storage, TournamentId};

pub(crate) const SPONSORS: &str = "sponsors";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sponsor {
    pub id: SponsorId,
    pub company: String,
    pub contact: String,
    pub email: String,
    pub amount: Money,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// The tournament the sponsorship is for. `None` sponsors the whole league.
    pub tournament_id: Option<TournamentId>,
    pub benefits: String,
}

impl Sponsor {
    /// Returns `true` if the sponsorship has not ended before `today`.
    #[inline]
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.end_date >= today
    }

    /// Returns `true` if the sponsor supports the tournament `id`, either directly or as a
    /// league-wide sponsor.
    #[inline]
    pub fn sponsors(&self, id: TournamentId) -> bool {
        self.tournament_id.map_or(true, |tournament_id| tournament_id == id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSponsor {
    pub company: String,
    pub contact: String,
    pub email: String,
    pub amount: Money,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub tournament_id: Option<TournamentId>,
    #[serde(default)]
    pub benefits: String,
}

fn load<S>(storage: &S) -> Result<Vec<Sponsor>>
where
    S: Storage,
{
    Ok(storage.get(SPONSORS)?.unwrap_or_default())
}

pub struct SponsorsClient<'a, S> {
    league: &'a League<S>,
}

impl<'a, S> SponsorsClient<'a, S>
where
    S: Storage,
{
    pub(crate) fn new(league: &'a League<S>) -> Self {
        Self { league }
    }

    pub fn list(&self) -> Result<Vec<Sponsor>> {
        load(&*self.league.lock())
    }

    pub fn get(&self, id: SponsorId) -> Result<Sponsor> {
        load(&*self.league.lock())?
            .into_iter()
            .find(|sponsor| sponsor.id == id)
            .ok_or(Error::NotFound)
    }

    /// Returns the sponsors that are active today.
    pub fn active(&self) -> Result<Vec<Sponsor>> {
        self.active_at(Utc::now().date_naive())
    }

    /// Returns the sponsors that are active on `today`.
    pub fn active_at(&self, today: NaiveDate) -> Result<Vec<Sponsor>> {
        let mut sponsors = self.list()?;
        sponsors.retain(|sponsor| sponsor.is_active(today));
        Ok(sponsors)
    }

    /// Returns the sponsors of the tournament `id`, including league-wide sponsors.
    pub fn for_tournament(&self, id: TournamentId) -> Result<Vec<Sponsor>> {
        let mut sponsors = self.list()?;
        sponsors.retain(|sponsor| sponsor.sponsors(id));
        Ok(sponsors)
    }

    /// Adds a new sponsor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDateRange`] if the sponsorship ends before it starts and
    /// [`Error::NotFound`] if the sponsored tournament does not exist.
    pub fn create(&self, sponsor: NewSponsor) -> Result<Sponsor> {
        if sponsor.end_date < sponsor.start_date {
            return Err(Error::InvalidDateRange {
                start: sponsor.start_date,
                end: sponsor.end_date,
            });
        }

        let mut storage = self.league.lock();

        if let Some(id) = sponsor.tournament_id {
            if !tournament::load(&*storage)?.iter().any(|t| t.id == id) {
                return Err(Error::NotFound);
            }
        }

        let sponsor = Sponsor {
            id: SponsorId::generate(),
            company: sponsor.company,
            contact: sponsor.contact,
            email: sponsor.email,
            amount: sponsor.amount,
            start_date: sponsor.start_date,
            end_date: sponsor.end_date,
            tournament_id: sponsor.tournament_id,
            benefits: sponsor.benefits,
        };

        let mut sponsors = load(&*storage)?;
        sponsors.push(sponsor.clone());
        storage.set(SPONSORS, &sponsors)?;

        log::info!("Added sponsor {} ({})", sponsor.company, sponsor.id);
        Ok(sponsor)
    }

    pub fn delete(&self, id: SponsorId) -> Result<()> {
        let mut storage = self.league.lock();
        let mut sponsors = load(&*storage)?;

        let len = sponsors.len();
        sponsors.retain(|sponsor| sponsor.id != id);
        if sponsors.len() == len {
            return Err(Error::NotFound);
        }

        storage.set(SPONSORS, &sponsors)?;

        log::info!("Deleted sponsor {}", id);
        Ok(())
    }
}
