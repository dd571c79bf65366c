use std::fmt::{self, Display, Formatter};

use chrono::NaiveDate;
use pinfall_core::{Bracket, Entrant};
use serde::{Deserialize, Serialize};

use crate::registration::Registration;
use crate::{Error, League, Result, Storage, TournamentId};

pub(crate) const TOURNAMENTS: &str = "tournaments";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub description: String,
    pub format: Format,
    pub start_date: NaiveDate,
    /// The last day on which bowlers can register.
    pub registration_deadline: NaiveDate,
    pub max_participants: u32,
    pub status: TournamentStatus,
    pub registrations: Vec<Registration>,
    pub bracket: Option<Bracket<Entrant>>,
}

impl Tournament {
    #[inline]
    pub fn is_full(&self) -> bool {
        self.registrations.len() >= self.max_participants as usize
    }
}

/// The fields of a [`Tournament`] that are chosen when creating it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTournament {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub start_date: NaiveDate,
    pub registration_deadline: NaiveDate,
    pub max_participants: u32,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    #[default]
    SingleElimination,
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::SingleElimination => "Single Elimination",
        })
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Registrations are open and no bracket exists yet.
    #[default]
    Upcoming,
    /// A bracket was generated and is being played.
    Active,
    /// The bracket has a champion.
    Completed,
}

impl Display for TournamentStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Upcoming => "upcoming",
            Self::Active => "active",
            Self::Completed => "completed",
        })
    }
}

pub(crate) fn load<S>(storage: &S) -> Result<Vec<Tournament>>
where
    S: Storage,
{
    Ok(storage.get(TOURNAMENTS)?.unwrap_or_default())
}

pub(crate) fn save<S>(storage: &mut S, tournaments: &[Tournament]) -> Result<()>
where
    S: Storage,
{
    storage.set(TOURNAMENTS, tournaments)
}

/// Loads the tournament `id`, applies `f` to it and writes all tournaments back if `f` succeeds.
pub(crate) fn update<S, F, T>(storage: &mut S, id: TournamentId, f: F) -> Result<T>
where
    S: Storage,
    F: FnOnce(&mut Tournament) -> Result<T>,
{
    let mut tournaments = load(storage)?;
    let tournament = tournaments
        .iter_mut()
        .find(|tournament| tournament.id == id)
        .ok_or(Error::NotFound)?;

    let res = f(tournament)?;

    save(storage, &tournaments)?;
    Ok(res)
}

pub struct TournamentsClient<'a, S> {
    league: &'a League<S>,
}

impl<'a, S> TournamentsClient<'a, S>
where
    S: Storage,
{
    pub(crate) fn new(league: &'a League<S>) -> Self {
        Self { league }
    }

    /// Returns all tournaments in creation order.
    pub fn list(&self) -> Result<Vec<Tournament>> {
        load(&*self.league.lock())
    }

    /// Returns the [`Tournament`] with the given `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no tournament with the given `id` exists.
    pub fn get(&self, id: TournamentId) -> Result<Tournament> {
        load(&*self.league.lock())?
            .into_iter()
            .find(|tournament| tournament.id == id)
            .ok_or(Error::NotFound)
    }

    /// Creates a new upcoming [`Tournament`] without registrations.
    pub fn create(&self, tournament: NewTournament) -> Result<Tournament> {
        let tournament = Tournament {
            id: TournamentId::generate(),
            name: tournament.name,
            description: tournament.description,
            format: Format::SingleElimination,
            start_date: tournament.start_date,
            registration_deadline: tournament.registration_deadline,
            max_participants: tournament.max_participants,
            status: TournamentStatus::Upcoming,
            registrations: Vec::new(),
            bracket: None,
        };

        let mut storage = self.league.lock();
        let mut tournaments = load(&*storage)?;
        tournaments.push(tournament.clone());
        save(&mut *storage, &tournaments)?;

        log::info!("Created tournament {} ({})", tournament.name, tournament.id);
        Ok(tournament)
    }

    /// Replaces the details of an existing tournament. Registrations, bracket and status are
    /// managed by their own clients and are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no tournament with the given `id` exists.
    pub fn update(&self, id: TournamentId, details: NewTournament) -> Result<Tournament> {
        let mut storage = self.league.lock();

        let tournament = update(&mut *storage, id, |tournament| {
            tournament.name = details.name;
            tournament.description = details.description;
            tournament.start_date = details.start_date;
            tournament.registration_deadline = details.registration_deadline;
            tournament.max_participants = details.max_participants;
            Ok(tournament.clone())
        })?;

        log::info!("Updated tournament {}", id);
        Ok(tournament)
    }

    /// Deletes the tournament together with its schedule and prize pool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no tournament with the given `id` exists.
    pub fn delete(&self, id: TournamentId) -> Result<()> {
        let mut storage = self.league.lock();

        let mut tournaments = load(&*storage)?;
        let len = tournaments.len();
        tournaments.retain(|tournament| tournament.id != id);
        if tournaments.len() == len {
            return Err(Error::NotFound);
        }

        crate::schedule::remove(&mut *storage, id)?;
        crate::prize::remove(&mut *storage, id)?;
        save(&mut *storage, &tournaments)?;

        log::info!("Deleted tournament {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Format, TournamentStatus};
    use crate::tests::{date, league_with_tournament, new_tournament};
    use crate::{Error, League, MemoryStorage, TournamentId};

    #[test]
    fn test_tournaments_create() {
        let league = League::new(MemoryStorage::new());

        let tournament = league.tournaments().create(new_tournament(16)).unwrap();
        assert_eq!(tournament.format, Format::SingleElimination);
        assert_eq!(tournament.status, TournamentStatus::Upcoming);
        assert!(tournament.registrations.is_empty());
        assert!(tournament.bracket.is_none());

        let other = league.tournaments().create(new_tournament(8)).unwrap();
        assert_ne!(tournament.id, other.id);

        let list = league.tournaments().list().unwrap();
        assert_eq!(list, [tournament.clone(), other]);

        assert_eq!(league.tournaments().get(tournament.id).unwrap(), tournament);
    }

    #[test]
    fn test_tournaments_not_found() {
        let league = League::new(MemoryStorage::new());

        assert!(matches!(
            league.tournaments().get(TournamentId(1)),
            Err(Error::NotFound)
        ));
        assert!(matches!(
            league.tournaments().delete(TournamentId(1)),
            Err(Error::NotFound)
        ));
        assert!(matches!(
            league
                .tournaments()
                .update(TournamentId(1), new_tournament(4)),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn test_tournaments_update() {
        let (league, id) = league_with_tournament(16);

        let mut details = new_tournament(32);
        details.name = String::from("Saturday Spares");
        details.start_date = date(2026, 12, 5);

        let tournament = league.tournaments().update(id, details).unwrap();
        assert_eq!(tournament.name, "Saturday Spares");
        assert_eq!(tournament.max_participants, 32);
        assert_eq!(league.tournaments().get(id).unwrap(), tournament);
    }

    #[test]
    fn test_tournaments_delete() {
        let (league, id) = league_with_tournament(16);

        league.tournaments().delete(id).unwrap();
        assert!(league.tournaments().list().unwrap().is_empty());
    }
}
