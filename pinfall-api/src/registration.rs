use chrono::{DateTime, Utc};
use pinfall_core::{SkillLevel, DEFAULT_RANKING};
use serde::{Deserialize, Serialize};

use crate::bowler::{self, NewBowler};
use crate::tournament;
use crate::{BowlerId, Error, League, RegistrationId, Result, Storage, TournamentId};

/// A bowler's entry into a tournament.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub id: RegistrationId,
    pub bowler_id: BowlerId,
    pub name: String,
    pub email: String,
    /// The average used for seeding. Bowlers without an average start at
    /// [`DEFAULT_RANKING`].
    pub average: u32,
    pub skill: Option<SkillLevel>,
    pub registered_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRegistration {
    pub name: String,
    pub email: String,
    /// A missing or zero average is replaced with [`DEFAULT_RANKING`].
    #[serde(default)]
    pub average: Option<u32>,
    #[serde(default)]
    pub skill: Option<SkillLevel>,
}

pub struct RegistrationsClient<'a, S> {
    league: &'a League<S>,
    tournament_id: TournamentId,
}

impl<'a, S> RegistrationsClient<'a, S>
where
    S: Storage,
{
    pub(crate) fn new(league: &'a League<S>, tournament_id: TournamentId) -> Self {
        Self {
            league,
            tournament_id,
        }
    }

    /// Returns all registrations in registration order.
    pub fn list(&self) -> Result<Vec<Registration>> {
        let tournaments = tournament::load(&*self.league.lock())?;

        tournaments
            .into_iter()
            .find(|tournament| tournament.id == self.tournament_id)
            .map(|tournament| tournament.registrations)
            .ok_or(Error::NotFound)
    }

    /// Registers a bowler for the tournament.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RegistrationClosed`] after the registration deadline,
    /// [`Error::AlreadyRegistered`] if the email is already registered for the tournament and
    /// [`Error::TournamentFull`] if the tournament has no free spots.
    pub fn register(&self, registration: NewRegistration) -> Result<Registration> {
        self.register_at(registration, Utc::now())
    }

    /// Registers a bowler as if the current time was `now`.
    pub fn register_at(
        &self,
        registration: NewRegistration,
        now: DateTime<Utc>,
    ) -> Result<Registration> {
        let mut storage = self.league.lock();
        let mut bowlers = bowler::load(&*storage)?;

        let average = registration
            .average
            .filter(|average| *average > 0)
            .unwrap_or(DEFAULT_RANKING);

        let registration = tournament::update(&mut *storage, self.tournament_id, |tournament| {
            if now.naive_utc().date() > tournament.registration_deadline {
                return Err(Error::RegistrationClosed);
            }

            if tournament
                .registrations
                .iter()
                .any(|r| r.email == registration.email)
            {
                return Err(Error::AlreadyRegistered);
            }

            if tournament.is_full() {
                return Err(Error::TournamentFull);
            }

            // Known bowlers keep their directory entry, new ones are added to it.
            let bowler_id = match bowlers.iter_mut().find(|b| b.email == registration.email) {
                Some(bowler) => {
                    if bowler.average.unwrap_or(0) == 0 {
                        bowler.average = Some(average);
                        bowler.updated_at = now;
                    }

                    bowler.id
                }
                None => {
                    let bowler = NewBowler {
                        name: registration.name.clone(),
                        email: registration.email.clone(),
                        average: Some(average),
                        notes: Some(format!(
                            "Added from registration for {}. Starting average: {}",
                            tournament.name, average
                        )),
                    };

                    bowler::insert(&mut bowlers, bowler, now).id
                }
            };

            let registration = Registration {
                id: RegistrationId::generate(),
                bowler_id,
                name: registration.name,
                email: registration.email,
                average,
                skill: registration.skill,
                registered_at: now,
            };

            tournament.registrations.push(registration.clone());
            Ok(registration)
        })?;

        bowler::save(&mut *storage, &bowlers)?;

        log::info!(
            "Registered {} for tournament {}",
            registration.name,
            self.tournament_id
        );

        Ok(registration)
    }

    /// Withdraws a registration. Brackets that were already generated are not changed.
    pub fn withdraw(&self, id: RegistrationId) -> Result<()> {
        let mut storage = self.league.lock();

        tournament::update(&mut *storage, self.tournament_id, |tournament| {
            let len = tournament.registrations.len();
            tournament.registrations.retain(|r| r.id != id);

            if tournament.registrations.len() == len {
                Err(Error::NotFound)
            } else {
                Ok(())
            }
        })?;

        log::info!(
            "Withdrew registration {} from tournament {}",
            id,
            self.tournament_id
        );

        Ok(())
    }
}
