use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime};
use pinfall_core::{Bracket, MatchId};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tournament;
use crate::{Error, League, Result, Storage, TournamentId};

pub(crate) const SCHEDULES: &str = "schedules";

/// The break between two rounds.
pub const ROUND_BREAK_MINUTES: i64 = 30;

/// The time table of a tournament with one [`Slot`] per match of its bracket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub tournament_id: TournamentId,
    pub slots: Vec<Slot>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub match_id: MatchId,
    pub round: usize,
    pub index: usize,
    pub start: NaiveDateTime,
    pub duration_minutes: u32,
    /// The lane the match is played on, starting at `1`.
    pub lane: Option<u32>,
}

impl Slot {
    #[inline]
    pub fn end(&self) -> NaiveDateTime {
        self.start + Duration::minutes(self.duration_minutes.into())
    }
}

impl Schedule {
    /// Creates a schedule for all matches of `bracket`, starting at `start`.
    ///
    /// Matches are played one after another in round order, each taking `match_minutes`. Every
    /// round is followed by a break of [`ROUND_BREAK_MINUTES`].
    pub fn generate<T>(
        tournament_id: TournamentId,
        bracket: &Bracket<T>,
        start: NaiveDateTime,
        match_minutes: u32,
    ) -> Self {
        let mut slots = Vec::new();
        let mut time = start;

        for (round, matches) in bracket.rounds().iter().enumerate() {
            for (index, r#match) in matches.iter().enumerate() {
                slots.push(Slot {
                    match_id: r#match.id,
                    round,
                    index,
                    start: time,
                    duration_minutes: match_minutes,
                    lane: None,
                });

                time += Duration::minutes(match_minutes.into());
            }

            time += Duration::minutes(ROUND_BREAK_MINUTES);
        }

        log::debug!(
            "Scheduled {} matches for tournament {}",
            slots.len(),
            tournament_id
        );

        Self {
            tournament_id,
            slots,
        }
    }

    /// Assigns each slot a lane between `1` and `total_lanes`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLanes`] if `total_lanes` is `0`.
    pub fn assign_lanes(&mut self, total_lanes: u32, method: LaneAssignment) -> Result<()> {
        self.assign_lanes_with(total_lanes, method, &mut rand::thread_rng())
    }

    /// Assigns lanes like [`assign_lanes`] but draws random lanes from `rng`.
    ///
    /// [`assign_lanes`]: Self::assign_lanes
    pub fn assign_lanes_with<R>(
        &mut self,
        total_lanes: u32,
        method: LaneAssignment,
        rng: &mut R,
    ) -> Result<()>
    where
        R: Rng + ?Sized,
    {
        if total_lanes == 0 {
            return Err(Error::InvalidLanes(total_lanes));
        }

        for (index, slot) in self.slots.iter_mut().enumerate() {
            slot.lane = Some(match method {
                LaneAssignment::Sequential | LaneAssignment::Balanced => {
                    (index as u32 % total_lanes) + 1
                }
                LaneAssignment::Random => rng.gen_range(1..=total_lanes),
            });
        }

        log::debug!(
            "Assigned {} lanes ({}) for tournament {}",
            total_lanes,
            method,
            self.tournament_id
        );

        Ok(())
    }

    /// Returns all slots played on `lane`.
    pub fn lane(&self, lane: u32) -> impl Iterator<Item = &Slot> + '_ {
        self.slots.iter().filter(move |slot| slot.lane == Some(lane))
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LaneAssignment {
    /// Lanes are used in order, wrapping around after the last lane.
    #[default]
    Sequential,
    /// Every lane gets the same number of matches, give or take one.
    Balanced,
    /// Every match gets a random lane.
    Random,
}

impl Display for LaneAssignment {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Sequential => "sequential",
            Self::Balanced => "balanced",
            Self::Random => "random",
        })
    }
}

impl FromStr for LaneAssignment {
    type Err = UnknownLaneAssignment;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "sequential" => Ok(Self::Sequential),
            "balanced" => Ok(Self::Balanced),
            "random" => Ok(Self::Random),
            _ => Err(UnknownLaneAssignment(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown lane assignment: {0} (expected 'sequential', 'balanced' or 'random')")]
pub struct UnknownLaneAssignment(String);

fn load<S>(storage: &S) -> Result<BTreeMap<TournamentId, Schedule>>
where
    S: Storage,
{
    Ok(storage.get(SCHEDULES)?.unwrap_or_default())
}

/// Removes the schedule of a tournament, if it has one.
pub(crate) fn remove<S>(storage: &mut S, id: TournamentId) -> Result<()>
where
    S: Storage,
{
    let mut schedules = load(storage)?;

    if schedules.remove(&id).is_some() {
        storage.set(SCHEDULES, &schedules)?;
    }

    Ok(())
}

pub struct ScheduleClient<'a, S> {
    league: &'a League<S>,
    tournament_id: TournamentId,
}

impl<'a, S> ScheduleClient<'a, S>
where
    S: Storage,
{
    pub(crate) fn new(league: &'a League<S>, tournament_id: TournamentId) -> Self {
        Self {
            league,
            tournament_id,
        }
    }

    /// Returns the schedule of the tournament.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no schedule was generated yet.
    pub fn get(&self) -> Result<Schedule> {
        load(&*self.league.lock())?
            .remove(&self.tournament_id)
            .ok_or(Error::NotFound)
    }

    /// Generates a new schedule from the current bracket, replacing the previous schedule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoBracket`] if the tournament has no bracket.
    pub fn generate(&self, start: NaiveDateTime, match_minutes: u32) -> Result<Schedule> {
        let mut storage = self.league.lock();

        let bracket = tournament::load(&*storage)?
            .into_iter()
            .find(|tournament| tournament.id == self.tournament_id)
            .ok_or(Error::NotFound)?
            .bracket
            .ok_or(Error::NoBracket)?;

        let schedule = Schedule::generate(self.tournament_id, &bracket, start, match_minutes);

        let mut schedules = load(&*storage)?;
        schedules.insert(self.tournament_id, schedule.clone());
        storage.set(SCHEDULES, &schedules)?;

        log::info!("Generated schedule for tournament {}", self.tournament_id);
        Ok(schedule)
    }

    /// Assigns lanes to the existing schedule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no schedule was generated yet and
    /// [`Error::InvalidLanes`] if `total_lanes` is `0`.
    pub fn assign_lanes(&self, total_lanes: u32, method: LaneAssignment) -> Result<Schedule> {
        let mut storage = self.league.lock();

        let mut schedules = load(&*storage)?;
        let schedule = schedules
            .get_mut(&self.tournament_id)
            .ok_or(Error::NotFound)?;

        schedule.assign_lanes(total_lanes, method)?;
        let schedule = schedule.clone();

        storage.set(SCHEDULES, &schedules)?;

        log::info!(
            "Assigned {} lanes for tournament {}",
            total_lanes,
            self.tournament_id
        );

        Ok(schedule)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use pinfall_core::{Bracket, BracketOptions, MatchId, Seeding};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{LaneAssignment, Schedule};
    use crate::tests::league_with_registrations;
    use crate::{Error, TournamentId};

    fn start() -> NaiveDateTime {
        at(18, 0)
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 11, 20)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_schedule_generate() {
        let bracket = Bracket::new(0..4).unwrap();
        let schedule = Schedule::generate(TournamentId(1), &bracket, start(), 45);

        let times: Vec<_> = schedule.slots.iter().map(|slot| slot.start).collect();
        assert_eq!(times, [at(18, 0), at(18, 45), at(20, 0)]);

        let ids: Vec<_> = schedule.slots.iter().map(|slot| slot.match_id).collect();
        assert_eq!(ids, [MatchId(0), MatchId(1), MatchId(2)]);

        assert_eq!(schedule.slots[2].round, 1);
        assert_eq!(schedule.slots[2].end(), at(20, 45));
        assert!(schedule.slots.iter().all(|slot| slot.lane.is_none()));
    }

    #[test]
    fn test_schedule_generate_single_match() {
        let bracket = Bracket::new(["A", "B"]).unwrap();
        let schedule = Schedule::generate(TournamentId(1), &bracket, start(), 60);

        assert_eq!(schedule.slots.len(), 1);
        assert_eq!(schedule.slots[0].start, start());
    }

    #[test]
    fn test_schedule_assign_lanes() {
        let bracket = Bracket::new(0..8).unwrap();
        let mut schedule = Schedule::generate(TournamentId(1), &bracket, start(), 45);

        schedule.assign_lanes(3, LaneAssignment::Sequential).unwrap();
        let lanes: Vec<_> = schedule.slots.iter().map(|slot| slot.lane).collect();
        assert_eq!(lanes, [1, 2, 3, 1, 2, 3, 1].map(Some));
        assert_eq!(schedule.lane(1).count(), 3);

        schedule.assign_lanes(2, LaneAssignment::Balanced).unwrap();
        assert_eq!(schedule.lane(1).count(), 4);
        assert_eq!(schedule.lane(2).count(), 3);

        let mut rng = StdRng::seed_from_u64(7);
        schedule
            .assign_lanes_with(4, LaneAssignment::Random, &mut rng)
            .unwrap();
        assert!(schedule
            .slots
            .iter()
            .all(|slot| matches!(slot.lane, Some(1..=4))));

        assert!(matches!(
            schedule.assign_lanes(0, LaneAssignment::Sequential),
            Err(Error::InvalidLanes(0))
        ));
    }

    #[test]
    fn test_lane_assignment_parse() {
        assert_eq!("balanced".parse(), Ok(LaneAssignment::Balanced));
        assert!("fastest".parse::<LaneAssignment>().is_err());
        assert_eq!(LaneAssignment::Random.to_string(), "random");
    }

    #[test]
    fn test_schedule_client() {
        let (league, id) = league_with_registrations(&[
            ("A", None),
            ("B", None),
            ("C", None),
            ("D", None),
        ]);

        assert!(matches!(
            league.schedule(id).generate(start(), 45),
            Err(Error::NoBracket)
        ));
        assert!(matches!(league.schedule(id).get(), Err(Error::NotFound)));
        assert!(matches!(
            league.schedule(id).assign_lanes(2, LaneAssignment::Sequential),
            Err(Error::NotFound)
        ));

        league
            .bracket(id)
            .generate(Seeding::RegistrationOrder, BracketOptions::default())
            .unwrap();

        let schedule = league.schedule(id).generate(start(), 45).unwrap();
        assert_eq!(schedule.slots.len(), 3);
        assert_eq!(league.schedule(id).get().unwrap(), schedule);

        let schedule = league
            .schedule(id)
            .assign_lanes(2, LaneAssignment::Sequential)
            .unwrap();
        assert_eq!(schedule.slots[2].lane, Some(1));
        assert_eq!(league.schedule(id).get().unwrap(), schedule);

        // Deleting the tournament removes its schedule.
        league.tournaments().delete(id).unwrap();
        assert!(matches!(league.schedule(id).get(), Err(Error::NotFound)));
    }
}
