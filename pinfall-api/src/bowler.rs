use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BowlerId, Error, League, Result, Storage};

pub(crate) const BOWLERS: &str = "bowlers";

/// A bowler in the league-wide directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bowler {
    pub id: BowlerId,
    pub name: String,
    /// Bowlers are identified by their email across tournaments.
    pub email: String,
    pub average: Option<u32>,
    pub status: BowlerStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBowler {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub average: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BowlerStatus {
    #[default]
    Active,
    Inactive,
}

impl Display for BowlerStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        })
    }
}

impl FromStr for BowlerStatus {
    type Err = UnknownBowlerStatus;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(UnknownBowlerStatus(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown bowler status: {0} (expected 'active' or 'inactive')")]
pub struct UnknownBowlerStatus(String);

/// Selects bowlers from the directory. An empty filter selects every bowler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BowlerFilter {
    /// Matches the name or the email, ignoring case.
    pub search: Option<String>,
    pub status: Option<BowlerStatus>,
}

impl BowlerFilter {
    pub fn matches(&self, bowler: &Bowler) -> bool {
        let search = match &self.search {
            Some(search) => {
                let search = search.to_lowercase();
                bowler.name.to_lowercase().contains(&search)
                    || bowler.email.to_lowercase().contains(&search)
            }
            None => true,
        };

        search && self.status.map_or(true, |status| bowler.status == status)
    }
}

/// The bowling average from which a bowler counts as a high average bowler.
pub const HIGH_AVERAGE: u32 = 200;

/// Numbers about the whole directory.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryStats {
    pub total: usize,
    pub active: usize,
    /// Bowlers with an average of at least [`HIGH_AVERAGE`].
    pub high_averages: usize,
    /// The rounded mean of all known averages, `0` if no bowler has one.
    pub average: u32,
}

impl DirectoryStats {
    pub fn new(bowlers: &[Bowler]) -> Self {
        let averages: Vec<u64> = bowlers
            .iter()
            .filter_map(|bowler| bowler.average)
            .filter(|average| *average > 0)
            .map(u64::from)
            .collect();

        let average = match averages.len() as u64 {
            0 => 0,
            len => {
                let sum: u64 = averages.iter().sum();
                // Round half up.
                u32::try_from((sum + len / 2) / len).unwrap_or(u32::MAX)
            }
        };

        Self {
            total: bowlers.len(),
            active: bowlers
                .iter()
                .filter(|bowler| bowler.status == BowlerStatus::Active)
                .count(),
            high_averages: bowlers
                .iter()
                .filter(|bowler| bowler.average.unwrap_or(0) >= HIGH_AVERAGE)
                .count(),
            average,
        }
    }
}

pub(crate) fn load<S>(storage: &S) -> Result<Vec<Bowler>>
where
    S: Storage,
{
    Ok(storage.get(BOWLERS)?.unwrap_or_default())
}

pub(crate) fn save<S>(storage: &mut S, bowlers: &[Bowler]) -> Result<()>
where
    S: Storage,
{
    storage.set(BOWLERS, bowlers)
}

/// Creates a new active [`Bowler`] and appends it to `bowlers`.
pub(crate) fn insert(bowlers: &mut Vec<Bowler>, bowler: NewBowler, now: DateTime<Utc>) -> Bowler {
    let bowler = Bowler {
        id: BowlerId::generate(),
        name: bowler.name,
        email: bowler.email,
        average: bowler.average,
        status: BowlerStatus::Active,
        notes: bowler.notes,
        created_at: now,
        updated_at: now,
    };

    bowlers.push(bowler.clone());
    bowler
}

pub struct BowlersClient<'a, S> {
    league: &'a League<S>,
}

impl<'a, S> BowlersClient<'a, S>
where
    S: Storage,
{
    pub(crate) fn new(league: &'a League<S>) -> Self {
        Self { league }
    }

    pub fn list(&self) -> Result<Vec<Bowler>> {
        load(&*self.league.lock())
    }

    pub fn get(&self, id: BowlerId) -> Result<Bowler> {
        load(&*self.league.lock())?
            .into_iter()
            .find(|bowler| bowler.id == id)
            .ok_or(Error::NotFound)
    }

    /// Returns the bowler registered with `email`, if any.
    pub fn find_by_email(&self, email: &str) -> Result<Option<Bowler>> {
        Ok(load(&*self.league.lock())?
            .into_iter()
            .find(|bowler| bowler.email == email))
    }

    /// Returns every bowler selected by `filter`, in directory order.
    pub fn search(&self, filter: &BowlerFilter) -> Result<Vec<Bowler>> {
        let mut bowlers = load(&*self.league.lock())?;
        bowlers.retain(|bowler| filter.matches(bowler));
        Ok(bowlers)
    }

    pub fn stats(&self) -> Result<DirectoryStats> {
        Ok(DirectoryStats::new(&load(&*self.league.lock())?))
    }

    /// Adds a new bowler to the directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyRegistered`] if a bowler with the same email exists.
    pub fn create(&self, bowler: NewBowler) -> Result<Bowler> {
        let mut storage = self.league.lock();
        let mut bowlers = load(&*storage)?;

        if bowlers.iter().any(|b| b.email == bowler.email) {
            return Err(Error::AlreadyRegistered);
        }

        let bowler = insert(&mut bowlers, bowler, Utc::now());
        save(&mut *storage, &bowlers)?;

        log::info!("Added bowler {} ({})", bowler.name, bowler.id);
        Ok(bowler)
    }

    /// Replaces the name, email, average and notes of a bowler. The status is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such bowler and [`Error::AlreadyRegistered`]
    /// if another bowler uses the new email.
    pub fn update(&self, id: BowlerId, update: NewBowler) -> Result<Bowler> {
        let mut storage = self.league.lock();
        let mut bowlers = load(&*storage)?;

        if bowlers
            .iter()
            .any(|bowler| bowler.id != id && bowler.email == update.email)
        {
            return Err(Error::AlreadyRegistered);
        }

        let bowler = bowlers
            .iter_mut()
            .find(|bowler| bowler.id == id)
            .ok_or(Error::NotFound)?;

        bowler.name = update.name;
        bowler.email = update.email;
        bowler.average = update.average;
        bowler.notes = update.notes;
        bowler.updated_at = Utc::now();
        let bowler = bowler.clone();

        save(&mut *storage, &bowlers)?;

        log::info!("Updated bowler {} ({})", bowler.name, bowler.id);
        Ok(bowler)
    }

    /// Changes the average of a bowler.
    pub fn set_average(&self, id: BowlerId, average: Option<u32>) -> Result<Bowler> {
        self.modify(id, |bowler| bowler.average = average)
    }

    pub fn set_status(&self, id: BowlerId, status: BowlerStatus) -> Result<Bowler> {
        self.modify(id, |bowler| bowler.status = status)
    }

    pub fn delete(&self, id: BowlerId) -> Result<()> {
        let mut storage = self.league.lock();
        let mut bowlers = load(&*storage)?;

        let len = bowlers.len();
        bowlers.retain(|bowler| bowler.id != id);
        if bowlers.len() == len {
            return Err(Error::NotFound);
        }

        save(&mut *storage, &bowlers)?;

        log::info!("Deleted bowler {}", id);
        Ok(())
    }

    fn modify<F>(&self, id: BowlerId, f: F) -> Result<Bowler>
    where
        F: FnOnce(&mut Bowler),
    {
        let mut storage = self.league.lock();
        let mut bowlers = load(&*storage)?;

        let bowler = bowlers
            .iter_mut()
            .find(|bowler| bowler.id == id)
            .ok_or(Error::NotFound)?;

        f(bowler);
        bowler.updated_at = Utc::now();
        let bowler = bowler.clone();

        save(&mut *storage, &bowlers)?;
        Ok(bowler)
    }
}

#[cfg(test)]
mod tests {
    use super::{BowlerFilter, BowlerStatus, DirectoryStats, NewBowler};
    use crate::{BowlerId, Error, League, MemoryStorage};

    fn new_bowler(name: &str, email: &str) -> NewBowler {
        NewBowler {
            name: name.to_owned(),
            email: email.to_owned(),
            average: None,
            notes: None,
        }
    }

    #[test]
    fn test_bowlers_create() {
        let league = League::new(MemoryStorage::new());

        let bowler = league
            .bowlers()
            .create(new_bowler("Maude", "maude@example.com"))
            .unwrap();
        assert_eq!(bowler.status, BowlerStatus::Active);
        assert_eq!(bowler.average, None);

        assert_eq!(league.bowlers().get(bowler.id).unwrap(), bowler);
        assert_eq!(
            league.bowlers().find_by_email("maude@example.com").unwrap(),
            Some(bowler)
        );
        assert_eq!(league.bowlers().find_by_email("walter@example.com").unwrap(), None);

        assert!(matches!(
            league
                .bowlers()
                .create(new_bowler("Maude L.", "maude@example.com")),
            Err(Error::AlreadyRegistered)
        ));
    }

    #[test]
    fn test_bowlers_modify() {
        let league = League::new(MemoryStorage::new());
        let bowler = league
            .bowlers()
            .create(new_bowler("Walter", "walter@example.com"))
            .unwrap();

        let bowler = league.bowlers().set_average(bowler.id, Some(185)).unwrap();
        assert_eq!(bowler.average, Some(185));

        let bowler = league
            .bowlers()
            .set_status(bowler.id, BowlerStatus::Inactive)
            .unwrap();
        assert_eq!(bowler.status, BowlerStatus::Inactive);
        assert_eq!(league.bowlers().get(bowler.id).unwrap(), bowler);

        league.bowlers().delete(bowler.id).unwrap();
        assert!(league.bowlers().list().unwrap().is_empty());

        assert!(matches!(
            league.bowlers().delete(BowlerId(3)),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn test_bowlers_update() {
        let league = League::new(MemoryStorage::new());
        let walter = league
            .bowlers()
            .create(new_bowler("Walter", "walter@example.com"))
            .unwrap();
        league
            .bowlers()
            .create(new_bowler("Donny", "donny@example.com"))
            .unwrap();
        league
            .bowlers()
            .set_status(walter.id, BowlerStatus::Inactive)
            .unwrap();

        let update = NewBowler {
            name: String::from("Walter Sobchak"),
            email: String::from("walter.sobchak@example.com"),
            average: Some(192),
            notes: Some(String::from("Does not roll on Shabbos")),
        };
        let bowler = league.bowlers().update(walter.id, update.clone()).unwrap();
        assert_eq!(bowler.name, "Walter Sobchak");
        assert_eq!(bowler.email, "walter.sobchak@example.com");
        assert_eq!(bowler.average, Some(192));
        assert_eq!(bowler.status, BowlerStatus::Inactive);
        assert_eq!(bowler.created_at, walter.created_at);
        assert_eq!(league.bowlers().get(walter.id).unwrap(), bowler);

        assert!(matches!(
            league
                .bowlers()
                .update(walter.id, new_bowler("Walter", "donny@example.com")),
            Err(Error::AlreadyRegistered)
        ));
        assert!(matches!(
            league.bowlers().update(BowlerId(3), update),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn test_bowlers_search() {
        let league = League::new(MemoryStorage::new());
        for (name, email) in [
            ("Maude", "maude@example.com"),
            ("Walter", "walter@example.com"),
            ("Jesus", "quintana@example.com"),
        ] {
            league.bowlers().create(new_bowler(name, email)).unwrap();
        }
        let jesus = league
            .bowlers()
            .find_by_email("quintana@example.com")
            .unwrap()
            .unwrap();
        league
            .bowlers()
            .set_status(jesus.id, BowlerStatus::Inactive)
            .unwrap();

        let names = |filter: BowlerFilter| -> Vec<String> {
            league
                .bowlers()
                .search(&filter)
                .unwrap()
                .into_iter()
                .map(|bowler| bowler.name)
                .collect()
        };

        assert_eq!(names(BowlerFilter::default()), ["Maude", "Walter", "Jesus"]);
        assert_eq!(
            names(BowlerFilter {
                search: Some(String::from("WAL")),
                status: None,
            }),
            ["Walter"]
        );
        assert_eq!(
            names(BowlerFilter {
                search: Some(String::from("quintana")),
                status: None,
            }),
            ["Jesus"]
        );
        assert_eq!(
            names(BowlerFilter {
                search: None,
                status: Some(BowlerStatus::Active),
            }),
            ["Maude", "Walter"]
        );
        assert!(names(BowlerFilter {
            search: Some(String::from("jesus")),
            status: Some(BowlerStatus::Active),
        })
        .is_empty());
    }

    #[test]
    fn test_bowlers_stats() {
        let league = League::new(MemoryStorage::new());
        assert_eq!(league.bowlers().stats().unwrap(), DirectoryStats::default());

        for (name, average) in [("A", Some(215)), ("B", Some(180)), ("C", None), ("D", Some(0))] {
            let bowler = league
                .bowlers()
                .create(new_bowler(name, &format!("{}@example.com", name)))
                .unwrap();
            league.bowlers().set_average(bowler.id, average).unwrap();
        }
        let d = league.bowlers().find_by_email("D@example.com").unwrap().unwrap();
        league
            .bowlers()
            .set_status(d.id, BowlerStatus::Inactive)
            .unwrap();

        assert_eq!(
            league.bowlers().stats().unwrap(),
            DirectoryStats {
                total: 4,
                active: 3,
                high_averages: 1,
                // (215 + 180) / 2 = 197.5, rounded up.
                average: 198,
            }
        );
    }

    #[test]
    fn test_bowler_status_parse() {
        assert_eq!("inactive".parse(), Ok(BowlerStatus::Inactive));
        assert_eq!(BowlerStatus::Active.to_string(), "active");
        assert!("retired".parse::<BowlerStatus>().is_err());
    }
}
