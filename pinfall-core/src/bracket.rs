use crate::options::{BracketOptions, ByePolicy};
use crate::progression::next_match;
use crate::{EntrantRef, EntrantSpot, Entrants, Error, Match, MatchId, Result};

/// A single round of a [`Bracket`]. Round `0` is the first round, the last round only contains
/// the final.
pub type Round = Vec<Match>;

/// A single elimination bracket.
///
/// The bracket owns a seeded copy of its entrants and a list of rounds. Round `r` contains
/// exactly `paddedSize / 2^(r+1)` matches where `paddedSize` is the number of entrants rounded
/// up to the next power of two. The only exception is a bracket with a single entrant: it
/// contains one round with one match against a bye.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bracket<T> {
    pub(crate) participants: Entrants<T>,
    pub(crate) rounds: Vec<Round>,
    pub(crate) options: BracketOptions,
}

impl<T> Bracket<T> {
    /// Creates a new `Bracket` with the given `entrants` in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRoster`] if `entrants` is empty.
    pub fn new<I>(entrants: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        Self::new_with_options(entrants, BracketOptions::default())
    }

    /// Creates a new `Bracket` with the given `entrants` and using the given `options`.
    ///
    /// If you don't need to specify the options consider using [`new`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRoster`] if `entrants` is empty.
    ///
    /// [`new`]: Self::new
    pub fn new_with_options<I>(entrants: I, options: BracketOptions) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        log::debug!("Using options: {:?}", options);

        let participants: Entrants<T> = entrants.into_iter().collect();

        log::debug!(
            "Creating new bracket with {} entrants",
            participants.len()
        );

        if participants.is_empty() {
            return Err(Error::InvalidRoster);
        }

        let num_rounds = Self::calculate_rounds(participants.len());
        let mut rounds = Vec::with_capacity(num_rounds);
        let mut next_id = 0;

        // The first round pairs neighbouring entrants. Every index past the end of the roster is
        // a bye.
        let initial_matches = Self::initial_matches(participants.len());
        let spot = |index: usize| {
            if index < participants.len() {
                EntrantSpot::Entrant(EntrantRef::new(index))
            } else {
                EntrantSpot::Empty
            }
        };

        let mut round = Round::with_capacity(initial_matches);
        for index in 0..initial_matches {
            round.push(Match::new(
                MatchId(next_id),
                [spot(index * 2), spot(index * 2 + 1)],
            ));
            next_id += 1;
        }
        rounds.push(round);

        // Every following round waits for the winners of the previous one.
        let mut num_matches = initial_matches;
        while num_matches > 1 {
            num_matches /= 2;

            let mut round = Round::with_capacity(num_matches);
            for _ in 0..num_matches {
                round.push(Match::new(
                    MatchId(next_id),
                    [EntrantSpot::TBD, EntrantSpot::TBD],
                ));
                next_id += 1;
            }
            rounds.push(round);
        }

        let mut this = Self {
            participants,
            rounds,
            options,
        };

        if options.byes == ByePolicy::Advance {
            this.forward_byes();
        }

        log::debug!(
            "Created new bracket with {} rounds and {} matches",
            this.rounds.len(),
            next_id
        );

        Ok(this)
    }

    /// Resumes the bracket from existing rounds, e.g. after loading it from storage.
    ///
    /// # Errors
    ///
    /// Returns an [`enum@Error`] if `participants` is empty, `rounds` has an invalid shape for
    /// the number of `participants`, a match refers to an entrant that is out-of-bounds or a
    /// match has an outcome that does not follow from its score.
    pub fn resume(
        participants: Entrants<T>,
        rounds: Vec<Round>,
        options: BracketOptions,
    ) -> Result<Self> {
        log::debug!(
            "Trying to resume bracket with {} entrants and {} rounds",
            participants.len(),
            rounds.len()
        );

        if participants.is_empty() {
            return Err(Error::InvalidRoster);
        }

        let expected = Self::calculate_rounds(participants.len());
        if rounds.len() != expected {
            return Err(Error::InvalidNumberOfRounds {
                expected,
                found: rounds.len(),
            });
        }

        let mut expected = Self::initial_matches(participants.len());
        for (round_index, round) in rounds.iter().enumerate() {
            if round.len() != expected {
                return Err(Error::InvalidNumberOfMatches {
                    round: round_index,
                    expected,
                    found: round.len(),
                });
            }

            for (index, r#match) in round.iter().enumerate() {
                for spot in r#match.entrants.iter() {
                    if let EntrantSpot::Entrant(entrant) = spot {
                        if entrant.index() >= participants.len() {
                            return Err(Error::InvalidEntrant {
                                index: entrant.index(),
                                length: participants.len(),
                            });
                        }
                    }
                }

                if let Some(outcome) = r#match.outcome() {
                    if r#match.decide(outcome.score) != Some(outcome.winner) {
                        return Err(Error::InvalidOutcome {
                            round: round_index,
                            index,
                        });
                    }
                }
            }

            expected /= 2;
        }

        Ok(Self {
            participants,
            rounds,
            options,
        })
    }

    /// Returns a reference to the entrants in the bracket, in seeded order.
    #[inline]
    pub fn participants(&self) -> &Entrants<T> {
        &self.participants
    }

    /// Returns the entrants from the bracket.
    #[inline]
    pub fn into_participants(self) -> Entrants<T> {
        self.participants
    }

    #[inline]
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    #[inline]
    pub fn options(&self) -> BracketOptions {
        self.options
    }

    /// Returns the match at `index` in round `round`.
    #[inline]
    pub fn get(&self, round: usize, index: usize) -> Option<&Match> {
        self.rounds.get(round)?.get(index)
    }

    /// Returns the round and index of the match with the given `id`.
    pub fn position(&self, id: MatchId) -> Option<(usize, usize)> {
        self.rounds.iter().enumerate().find_map(|(round, matches)| {
            matches
                .iter()
                .position(|r#match| r#match.id == id)
                .map(|index| (round, index))
        })
    }

    /// Returns an iterator over all matches in round-major order.
    pub fn matches(&self) -> impl Iterator<Item = &Match> + '_ {
        self.rounds.iter().flatten()
    }

    /// Returns the single match of the last round.
    #[inline]
    pub fn final_match(&self) -> &Match {
        // `rounds` is never empty and the last round contains exactly one match.
        &self.rounds[self.rounds.len() - 1][0]
    }

    /// Returns the entrant `entrant` refers to.
    #[inline]
    pub fn entrant(&self, entrant: EntrantRef) -> Option<&T> {
        self.participants.resolve(entrant)
    }

    /// Returns a reference to the champion, if the final has been decided.
    ///
    /// A bracket with a single entrant has that entrant as its champion right away.
    pub fn champion_ref(&self) -> Option<EntrantRef> {
        if self.participants.len() == 1 {
            return Some(EntrantRef::new(0));
        }

        self.final_match().winner()
    }

    /// Returns the champion of the bracket, if the final has been decided.
    #[inline]
    pub fn champion(&self) -> Option<&T> {
        self.champion_ref().and_then(|entrant| self.entrant(entrant))
    }

    /// Returns `true` if a champion has been determined.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.champion_ref().is_some()
    }

    /// Moves every entrant that faces a bye into the next round. This is repeated round by round
    /// so that a match made of two byes forwards a bye itself.
    fn forward_byes(&mut self) {
        for round in 0..self.rounds.len() - 1 {
            for index in 0..self.rounds[round].len() {
                let forwarded = match self.rounds[round][index].entrants {
                    [EntrantSpot::Entrant(entrant), EntrantSpot::Empty]
                    | [EntrantSpot::Empty, EntrantSpot::Entrant(entrant)] => {
                        EntrantSpot::Entrant(entrant)
                    }
                    [EntrantSpot::Empty, EntrantSpot::Empty] => EntrantSpot::Empty,
                    _ => continue,
                };

                let next = next_match(round, index);
                log::debug!(
                    "Forwarding bye from match {} to round {} match {}",
                    self.rounds[round][index].id,
                    next.round,
                    next.index
                );

                self.rounds[next.round][next.index].entrants[next.position] = forwarded;
            }
        }
    }

    /// Calculates the number of matches in the first round for `entrants`-number of entrants.
    fn initial_matches(entrants: usize) -> usize {
        match entrants {
            1 | 2 => 1,
            n => n.next_power_of_two() / 2,
        }
    }

    /// Calculates the number of rounds required for `entrants`-number of entrants.
    fn calculate_rounds(entrants: usize) -> usize {
        match entrants {
            1 | 2 => 1,
            n => n.next_power_of_two().trailing_zeros() as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entrants;
    use crate::{Outcome, Score};

    fn entrant(index: usize) -> EntrantSpot<EntrantRef> {
        EntrantSpot::Entrant(EntrantRef::new(index))
    }

    #[test]
    fn test_bracket_new() {
        let entrants = entrants![];
        assert_eq!(
            Bracket::<i32>::new(entrants).unwrap_err(),
            Error::InvalidRoster
        );

        // Test with a single entrant.
        let entrants = entrants![0];
        let bracket = Bracket::<i32>::new(entrants).unwrap();

        assert_eq!(bracket.participants, vec![0]);
        assert_eq!(
            bracket.rounds,
            vec![vec![Match::new(MatchId(0), [entrant(0), EntrantSpot::Empty])]]
        );

        // Test with two entrants.
        let entrants = entrants![0, 1];
        let bracket = Bracket::<i32>::new(entrants).unwrap();

        assert_eq!(
            bracket.rounds,
            vec![vec![Match::new(MatchId(0), [entrant(0), entrant(1)])]]
        );

        // Test with three entrants.
        let entrants = entrants![0, 1, 2];
        let bracket = Bracket::<i32>::new(entrants).unwrap();

        assert_eq!(
            bracket.rounds,
            vec![
                vec![
                    Match::new(MatchId(0), [entrant(0), entrant(1)]),
                    Match::new(MatchId(1), [entrant(2), EntrantSpot::Empty]),
                ],
                vec![Match::new(MatchId(2), [EntrantSpot::TBD, EntrantSpot::TBD])],
            ]
        );

        // Test with pow(2, n) entrants.
        let entrants = entrants![0, 1, 2, 3];
        let bracket = Bracket::<i32>::new(entrants).unwrap();

        assert_eq!(
            bracket.rounds,
            vec![
                vec![
                    Match::new(MatchId(0), [entrant(0), entrant(1)]),
                    Match::new(MatchId(1), [entrant(2), entrant(3)]),
                ],
                vec![Match::new(MatchId(2), [EntrantSpot::TBD, EntrantSpot::TBD])],
            ]
        );
    }

    #[test]
    fn test_bracket_shape() {
        for n in 1..=70_usize {
            let bracket = Bracket::new(0..n).unwrap();
            let padded = n.next_power_of_two();

            let rounds = if n == 1 { 1 } else { padded.trailing_zeros() as usize };
            assert_eq!(bracket.rounds().len(), rounds, "rounds for {} entrants", n);

            for (round, matches) in bracket.rounds().iter().enumerate() {
                let expected = (padded >> (round + 1)).max(1);
                assert_eq!(matches.len(), expected, "round {} for {} entrants", round, n);

                if round > 0 {
                    assert!(matches
                        .iter()
                        .all(|m| m.entrants == [EntrantSpot::TBD, EntrantSpot::TBD]));
                }
            }

            // Every entrant is placed exactly once and ids are unique.
            let placed: Vec<_> = bracket.rounds()[0]
                .iter()
                .flat_map(|m| m.entrants.iter().filter_map(|s| s.entrant().copied()))
                .map(EntrantRef::index)
                .collect();
            assert_eq!(placed, (0..n).collect::<Vec<_>>());

            let ids: Vec<_> = bracket.matches().map(|m| m.id.0).collect();
            assert_eq!(ids, (0..ids.len() as u64).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_bracket_new_is_deterministic() {
        let a = Bracket::new(["A", "B", "C", "D", "E"]).unwrap();
        let b = Bracket::new(["A", "B", "C", "D", "E"]).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_bracket_new_advance_byes() {
        let options = BracketOptions::default().byes(ByePolicy::Advance);

        let bracket = Bracket::<i32>::new_with_options(entrants![0, 1, 2], options).unwrap();
        assert_eq!(
            bracket.rounds,
            vec![
                vec![
                    Match::new(MatchId(0), [entrant(0), entrant(1)]),
                    Match::new(MatchId(1), [entrant(2), EntrantSpot::Empty]),
                ],
                vec![Match::new(MatchId(2), [EntrantSpot::TBD, entrant(2)])],
            ]
        );

        // Entrant 4 passes through two rounds of byes.
        let bracket = Bracket::<i32>::new_with_options(entrants![0, 1, 2, 3, 4], options).unwrap();
        assert_eq!(
            bracket.rounds,
            vec![
                vec![
                    Match::new(MatchId(0), [entrant(0), entrant(1)]),
                    Match::new(MatchId(1), [entrant(2), entrant(3)]),
                    Match::new(MatchId(2), [entrant(4), EntrantSpot::Empty]),
                    Match::new(MatchId(3), [EntrantSpot::Empty, EntrantSpot::Empty]),
                ],
                vec![
                    Match::new(MatchId(4), [EntrantSpot::TBD, EntrantSpot::TBD]),
                    Match::new(MatchId(5), [entrant(4), EntrantSpot::Empty]),
                ],
                vec![Match::new(MatchId(6), [EntrantSpot::TBD, entrant(4)])],
            ]
        );

        // A single entrant has nowhere to go.
        let bracket = Bracket::<i32>::new_with_options(entrants![0], options).unwrap();
        assert_eq!(
            bracket.rounds,
            vec![vec![Match::new(MatchId(0), [entrant(0), EntrantSpot::Empty])]]
        );
    }

    #[test]
    fn test_bracket_single_entrant_champion() {
        let bracket = Bracket::new(["A"]).unwrap();

        assert!(bracket.is_complete());
        assert_eq!(bracket.champion(), Some(&"A"));
        assert_eq!(bracket.final_match().outcome(), None);
    }

    #[test]
    fn test_bracket_position() {
        let bracket = Bracket::new(0..8).unwrap();

        assert_eq!(bracket.position(MatchId(0)), Some((0, 0)));
        assert_eq!(bracket.position(MatchId(5)), Some((1, 1)));
        assert_eq!(bracket.position(MatchId(6)), Some((2, 0)));
        assert_eq!(bracket.position(MatchId(7)), None);
    }

    #[test]
    fn test_bracket_resume() {
        let participants = Entrants::from(vec![0, 1, 2, 3]);
        let rounds = vec![
            vec![
                Match::with_outcome(
                    MatchId(0),
                    [entrant(0), entrant(1)],
                    Outcome::new(Score::new(200, 150), EntrantRef::new(0)),
                ),
                Match::new(MatchId(1), [entrant(2), entrant(3)]),
            ],
            vec![Match::new(MatchId(2), [entrant(0), EntrantSpot::TBD])],
        ];

        let bracket =
            Bracket::<i32>::resume(participants.clone(), rounds.clone(), BracketOptions::default())
                .unwrap();
        assert_eq!(bracket.rounds, rounds);

        assert_eq!(
            Bracket::<i32>::resume(Entrants::new(), vec![], BracketOptions::default())
                .unwrap_err(),
            Error::InvalidRoster
        );

        assert_eq!(
            Bracket::<i32>::resume(
                Entrants::from(vec![0, 1, 2, 3, 4]),
                rounds.clone(),
                BracketOptions::default()
            )
            .unwrap_err(),
            Error::InvalidNumberOfRounds {
                expected: 3,
                found: 2
            }
        );

        let mut invalid = rounds.clone();
        invalid[1].push(Match::new(MatchId(3), [EntrantSpot::TBD, EntrantSpot::TBD]));
        assert_eq!(
            Bracket::<i32>::resume(participants.clone(), invalid, BracketOptions::default())
                .unwrap_err(),
            Error::InvalidNumberOfMatches {
                round: 1,
                expected: 1,
                found: 2
            }
        );

        let mut invalid = rounds.clone();
        invalid[0][1].entrants[1] = entrant(4);
        assert_eq!(
            Bracket::<i32>::resume(participants.clone(), invalid, BracketOptions::default())
                .unwrap_err(),
            Error::InvalidEntrant {
                index: 4,
                length: 4
            }
        );

        // The winner does not follow from the score.
        let mut invalid = rounds.clone();
        invalid[0][0].outcome = Some(Outcome::new(Score::new(150, 200), EntrantRef::new(0)));
        assert_eq!(
            Bracket::<i32>::resume(participants.clone(), invalid, BracketOptions::default())
                .unwrap_err(),
            Error::InvalidOutcome { round: 0, index: 0 }
        );

        // Tied outcomes can never be stored.
        let mut invalid = rounds;
        invalid[0][0].outcome = Some(Outcome::new(Score::new(180, 180), EntrantRef::new(0)));
        assert_eq!(
            Bracket::<i32>::resume(participants, invalid, BracketOptions::default()).unwrap_err(),
            Error::InvalidOutcome { round: 0, index: 0 }
        );
    }
}
