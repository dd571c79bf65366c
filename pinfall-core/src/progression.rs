use crate::options::{ByePolicy, Corrections};
use crate::{Bracket, EntrantRef, EntrantSpot, Error, Outcome, Result, Score};

/// The position of the spot a match winner moves into.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NextMatch {
    pub round: usize,
    pub index: usize,
    /// `0` for the first spot, `1` for the second.
    pub position: usize,
}

/// Returns the spot the winner of the match at `index` in `round` moves into.
///
/// Two neighbouring matches feed one match of the following round: the even match fills its
/// first spot, the odd match its second spot. Whether that round exists is up to the caller.
#[inline]
pub const fn next_match(round: usize, index: usize) -> NextMatch {
    NextMatch {
        round: round + 1,
        index: index / 2,
        position: index % 2,
    }
}

/// What changed in a [`Bracket`] after a successfully reported score.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Progress {
    /// The winner moved on into the spot at `next`.
    Advanced { winner: EntrantRef, next: NextMatch },
    /// The final was decided.
    Champion(EntrantRef),
}

impl<T> Bracket<T> {
    /// Reports the score of the match at `index` in `round`. `score_a` belongs to the first spot
    /// and `score_b` to the second spot of the match.
    ///
    /// The entrant with the higher score wins and moves on into the next round. Reporting the
    /// score of an already decided match replaces its previous outcome; how later matches are
    /// affected is controlled by [`Corrections`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::MatchNotFound`] if there is no such match, [`Error::IncompleteMatch`] if
    /// either spot does not hold an entrant and [`Error::TiedScore`] if both scores are equal.
    /// The bracket is not modified when an error is returned.
    pub fn report_score(
        &mut self,
        round: usize,
        index: usize,
        score_a: u32,
        score_b: u32,
    ) -> Result<Progress> {
        let score = Score::new(score_a, score_b);

        let r#match = self
            .get(round, index)
            .ok_or(Error::MatchNotFound { round, index })?;

        if !r#match.entrants.iter().all(EntrantSpot::is_entrant) {
            return Err(Error::IncompleteMatch { round, index });
        }

        let winner = r#match.decide(score).ok_or(Error::TiedScore { score })?;

        let r#match = &mut self.rounds[round][index];
        if let Some(previous) = r#match.outcome.replace(Outcome::new(score, winner)) {
            log::debug!(
                "Correcting match {}: {} replaced by {}",
                r#match.id,
                previous.score,
                score
            );
        }

        log::debug!(
            "Match {} decided {}, winner is entrant {}",
            r#match.id,
            score,
            winner.index()
        );

        if round + 1 >= self.rounds.len() {
            log::debug!("Final decided, champion is entrant {}", winner.index());
            return Ok(Progress::Champion(winner));
        }

        let next = next_match(round, index);
        self.place_winner(next, winner);

        Ok(Progress::Advanced { winner, next })
    }

    /// Clears the outcome of the match at `index` in `round` and removes its winner from every
    /// following match. Outcomes of those following matches are cleared as well.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MatchNotFound`] if there is no such match.
    pub fn reset_match(&mut self, round: usize, index: usize) -> Result<()> {
        if self.get(round, index).is_none() {
            return Err(Error::MatchNotFound { round, index });
        }

        self.reset_from(round, index);
        Ok(())
    }

    /// Places `winner` into the spot at `next`. Under [`ByePolicy::Advance`] a winner landing
    /// next to a bye keeps moving on until it reaches a match it has to play.
    fn place_winner(&mut self, mut next: NextMatch, winner: EntrantRef) {
        loop {
            let spot = &mut self.rounds[next.round][next.index].entrants[next.position];
            if *spot == EntrantSpot::Entrant(winner) {
                return;
            }

            let previous = std::mem::replace(spot, EntrantSpot::Entrant(winner));

            log::debug!(
                "Placed entrant {} into round {} match {} spot {}",
                winner.index(),
                next.round,
                next.index,
                next.position
            );

            // Only a changed entrant can invalidate the following matches.
            if previous.is_entrant() && self.options.corrections == Corrections::Cascade {
                self.reset_from(next.round, next.index);
            }

            if !self.forwards_bye(next.round, next.index) {
                return;
            }

            next = next_match(next.round, next.index);
        }
    }

    /// Walks the winner path starting at the match at `index` in `round`, clearing every outcome
    /// and reverting the spot each cleared match fed to `TBD`. Entrants forwarded past a bye are
    /// taken back as well. Stops at the first undecided match.
    fn reset_from(&mut self, mut round: usize, mut index: usize) {
        loop {
            let r#match = &mut self.rounds[round][index];
            if r#match.outcome.take().is_none() {
                break;
            }

            log::debug!("Reset outcome of match {}", r#match.id);

            if round + 1 >= self.rounds.len() {
                break;
            }

            let mut next = next_match(round, index);
            self.rounds[next.round][next.index].entrants[next.position] = EntrantSpot::TBD;

            while self.forwards_bye(next.round, next.index) {
                next = next_match(next.round, next.index);
                self.rounds[next.round][next.index].entrants[next.position] = EntrantSpot::TBD;
            }

            round = next.round;
            index = next.index;
        }
    }

    /// Returns `true` if the match at `index` in `round` passes its entrant on without being
    /// played.
    fn forwards_bye(&self, round: usize, index: usize) -> bool {
        self.options.byes == ByePolicy::Advance
            && round + 1 < self.rounds.len()
            && self.rounds[round][index]
                .entrants
                .contains(&EntrantSpot::Empty)
    }
}
