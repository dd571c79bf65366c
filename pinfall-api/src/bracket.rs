use pinfall_core::{Bracket, BracketOptions, Entrant, EntrantId, Progress, Seeding};

use crate::registration::Registration;
use crate::schedule;
use crate::tournament::{self, Tournament, TournamentStatus};
use crate::{Error, League, Result, Storage, TournamentId};

impl From<&Registration> for Entrant {
    fn from(registration: &Registration) -> Self {
        let entrant = Entrant::new(EntrantId(registration.bowler_id.0), &registration.name)
            .average(registration.average);

        match registration.skill {
            Some(skill) => entrant.skill(skill),
            None => entrant,
        }
    }
}

pub struct BracketClient<'a, S> {
    league: &'a League<S>,
    tournament_id: TournamentId,
}

impl<'a, S> BracketClient<'a, S>
where
    S: Storage,
{
    pub(crate) fn new(league: &'a League<S>, tournament_id: TournamentId) -> Self {
        Self {
            league,
            tournament_id,
        }
    }

    /// Returns the bracket of the tournament.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoBracket`] if no bracket was generated yet.
    pub fn get(&self) -> Result<Bracket<Entrant>> {
        tournament::load(&*self.league.lock())?
            .into_iter()
            .find(|tournament| tournament.id == self.tournament_id)
            .ok_or(Error::NotFound)?
            .bracket
            .ok_or(Error::NoBracket)
    }

    /// Builds a new bracket from the registrations of the tournament, replacing any existing
    /// bracket and dropping the schedule of the previous one. The registrations are seeded using
    /// `seeding`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tournament has no registrations.
    pub fn generate(&self, seeding: Seeding, options: BracketOptions) -> Result<Bracket<Entrant>> {
        let mut storage = self.league.lock();

        let bracket = tournament::update(&mut *storage, self.tournament_id, |tournament| {
            let roster: Vec<Entrant> = tournament.registrations.iter().map(Entrant::from).collect();

            let bracket = Bracket::new_with_options(seeding.seed(&roster), options)?;

            if tournament.bracket.is_some() {
                log::info!("Replacing bracket of tournament {}", tournament.id);
            }

            tournament.bracket = Some(bracket.clone());
            update_status(tournament);
            Ok(bracket)
        })?;

        // The slots refer to the matches of the previous bracket.
        schedule::remove(&mut *storage, self.tournament_id)?;

        log::info!(
            "Generated bracket with {} entrants for tournament {}",
            bracket.participants().len(),
            self.tournament_id
        );

        Ok(bracket)
    }

    /// Reports the score of the match at `index` in round `round`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoBracket`] if no bracket was generated yet, or [`Error::Bracket`] if
    /// the score cannot be applied.
    pub fn report(
        &self,
        round: usize,
        index: usize,
        score_a: u32,
        score_b: u32,
    ) -> Result<Progress> {
        let mut storage = self.league.lock();

        let progress = self.modify(&mut *storage, |bracket| {
            Ok(bracket.report_score(round, index, score_a, score_b)?)
        })?;

        if let Progress::Champion(entrant) = progress {
            log::info!(
                "Tournament {} is completed, champion is entrant {}",
                self.tournament_id,
                entrant.index()
            );
        }

        Ok(progress)
    }

    /// Clears the outcome of the match at `index` in round `round` and of every match that
    /// depended on it.
    pub fn reset(&self, round: usize, index: usize) -> Result<()> {
        let mut storage = self.league.lock();

        self.modify(&mut *storage, |bracket| Ok(bracket.reset_match(round, index)?))
    }

    /// Removes the bracket and its schedule, returning the tournament to
    /// [`TournamentStatus::Upcoming`].
    pub fn delete(&self) -> Result<()> {
        let mut storage = self.league.lock();

        tournament::update(&mut *storage, self.tournament_id, |tournament| {
            tournament.bracket.take().ok_or(Error::NoBracket)?;
            update_status(tournament);
            Ok(())
        })?;

        schedule::remove(&mut *storage, self.tournament_id)
    }

    fn modify<F, T>(&self, storage: &mut S, f: F) -> Result<T>
    where
        F: FnOnce(&mut Bracket<Entrant>) -> Result<T>,
    {
        tournament::update(storage, self.tournament_id, |tournament| {
            let bracket = tournament.bracket.as_mut().ok_or(Error::NoBracket)?;
            let res = f(bracket)?;

            update_status(tournament);
            Ok(res)
        })
    }
}

fn update_status(tournament: &mut Tournament) {
    tournament.status = match &tournament.bracket {
        None => TournamentStatus::Upcoming,
        Some(bracket) if bracket.is_complete() => TournamentStatus::Completed,
        Some(_) => TournamentStatus::Active,
    };
}
