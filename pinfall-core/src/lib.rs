//! # pinfall-core
//!
//! This crate contains everything required to build and play out a single elimination bracket
//! for a bowling tournament. It performs no I/O; storing a [`Bracket`] is left to the caller.
//!
//! Important types:
//! - [`Bracket`]: The rounds of a tournament together with its participants. Built once from a
//! roster and then advanced with [`Bracket::report_score`].
//! - [`Entrants`]: A wrapper around `Vec<T>` where `T` is an entrant in a bracket.
//! - [`Match`]: A single game between two [`EntrantSpot`]s.
//! - [`EntrantSpot`]: A *spot* within a match, which can contain an entrant, be permanently empty
//! (a bye) or wait for the winner of a previous match.
//! - [`Outcome`]: The reported [`Score`] of a match together with its winner.
//! - [`Seeding`]: The ordering applied to a roster before the bracket is built.
//!
//! ## Feature Flags
//!
//! `serde`: Adds `Serialize` and `Deserialize` impls to all types.
//!
mod bracket;
mod entrant;
mod options;
mod progression;
mod seeding;

#[cfg(feature = "serde")]
mod serde_impl;

pub use bracket::{Bracket, Round};
pub use entrant::{
    Entrant, EntrantId, Ranked, SkillLevel, UnknownSkillLevel, DEFAULT_RANKING,
};
pub use options::{BracketOptions, ByePolicy, Corrections, UnknownOption};
pub use progression::{next_match, NextMatch, Progress};
pub use seeding::{Seeding, UnknownSeeding};

use thiserror::Error;

use std::fmt::{self, Display, Formatter};
use std::ops::{Deref, Index};
use std::result;
use std::vec::IntoIter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Seeds `entrants` using `seeding` and builds a new [`Bracket`] with the default
/// [`BracketOptions`].
///
/// `entrants` is never modified; the bracket keeps its own seeded copy.
///
/// # Errors
///
/// Returns [`Error::InvalidRoster`] if `entrants` is empty.
pub fn build_bracket<T>(entrants: &[T], seeding: Seeding) -> Result<Bracket<T>>
where
    T: Ranked + Clone,
{
    Bracket::new(seeding.seed(entrants))
}

/// A wrapper around a `Vec<T>` where `T` should be considered an entrant of a bracket.
///
/// The order of the `Entrants` is the seeded order the bracket was built from. Once a
/// [`Bracket`] exists its entrants can no longer be modified, since every [`EntrantRef`] points
/// into this list.
#[derive(Clone, Debug, Default)]
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Entrants<T> {
    entrants: Vec<T>,
}

impl<T> Entrants<T> {
    /// Creates a new empty `Entrants` list.
    #[inline]
    pub fn new() -> Self {
        Self {
            entrants: Vec::new(),
        }
    }

    /// Returns the entrant referenced by `entrant`, or `None` if it is out-of-bounds.
    #[inline]
    pub fn resolve(&self, entrant: EntrantRef) -> Option<&T> {
        self.entrants.get(entrant.index)
    }
}

impl<T> FromIterator<T> for Entrants<T> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let entrants = iter.into_iter().collect();

        Self { entrants }
    }
}

impl<T> IntoIterator for Entrants<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entrants.into_iter()
    }
}

impl<T> Deref for Entrants<T> {
    type Target = Vec<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.entrants
    }
}

impl<T> AsRef<[T]> for Entrants<T> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        &self.entrants
    }
}

impl<T, U> PartialEq<U> for Entrants<T>
where
    T: PartialEq,
    U: AsRef<[T]>,
{
    #[inline]
    fn eq(&self, other: &U) -> bool {
        self.entrants == other.as_ref()
    }
}

impl<T> Eq for Entrants<T> where T: Eq {}

impl<T> From<Vec<T>> for Entrants<T> {
    #[inline]
    fn from(entrants: Vec<T>) -> Self {
        Self { entrants }
    }
}

/// A reference to an entrant of a [`Bracket`], stored as its position in the [`Entrants`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EntrantRef {
    index: usize,
}

impl EntrantRef {
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self { index }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.index
    }

    /// Returns the entrant `T` this reference points to.
    #[inline]
    pub fn entrant<T>(self, entrants: &Entrants<T>) -> Option<&T> {
        entrants.resolve(self)
    }
}

/// The unique id of a [`Match`] within a [`Bracket`].
///
/// Ids are assigned in round-major order starting at `0`, so two brackets built from rosters of
/// the same size use the same ids.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MatchId(pub u64);

impl Display for MatchId {
    #[inline]
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An `Result<T>` using [`enum@Error`] as an error type.
pub type Result<T> = result::Result<T, Error>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid roster: a bracket requires at least one entrant")]
    InvalidRoster,
    #[error("no match at round {round}, index {index}")]
    MatchNotFound { round: usize, index: usize },
    #[error("match at round {round}, index {index} does not have two entrants yet")]
    IncompleteMatch { round: usize, index: usize },
    #[error("scores cannot be tied: {score}")]
    TiedScore { score: Score },
    #[error("invalid number of rounds: expected {expected}, found {found}")]
    InvalidNumberOfRounds { expected: usize, found: usize },
    #[error("invalid number of matches in round {round}: expected {expected}, found {found}")]
    InvalidNumberOfMatches {
        round: usize,
        expected: usize,
        found: usize,
    },
    #[error(
        "invalid entrant: match refers to entrant at {index} but only {length} entrants are given"
    )]
    InvalidEntrant { index: usize, length: usize },
    #[error("invalid outcome for match at round {round}, index {index}")]
    InvalidOutcome { round: usize, index: usize },
}

/// A spot for an entrant in the bracket.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntrantSpot<T> {
    Entrant(T),
    /// A bye. This spot never receives an entrant.
    Empty,
    /// Waiting for the winner of a match in the previous round.
    TBD,
}

impl<T> EntrantSpot<T> {
    /// Creates a new `EntrantSpot` from an [`Option`]. A `Some(T)` value will translate into
    /// a `Entrant(T)` value, a `None` value will translate into a `Empty` value.
    pub fn new(entrant: Option<T>) -> Self {
        match entrant {
            Some(entrant) => Self::Entrant(entrant),
            None => Self::Empty,
        }
    }

    /// Returns `true` if the `EntrantSpot` is [`Entrant`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use pinfall_core::EntrantSpot;
    /// let spot = EntrantSpot::Entrant(());
    /// assert!(spot.is_entrant());
    /// ```
    /// [`Entrant`]: Self::Entrant
    pub fn is_entrant(&self) -> bool {
        matches!(self, Self::Entrant(_))
    }

    /// Returns `true` if the `EntrantSpot` is [`Empty`].
    ///
    /// [`Empty`]: Self::Empty
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns `true` if the `EntrantSpot` is [`TBD`].
    ///
    /// [`TBD`]: Self::TBD
    pub fn is_tbd(&self) -> bool {
        matches!(self, Self::TBD)
    }

    /// Returns the contained entrant, or `None` if the spot holds no entrant.
    pub fn entrant(&self) -> Option<&T> {
        match self {
            Self::Entrant(entrant) => Some(entrant),
            _ => None,
        }
    }

    /// Converts an `&EntrantSpot<T>` into an `EntrantSpot<&T>`.
    pub fn as_ref(&self) -> EntrantSpot<&T> {
        match *self {
            Self::Entrant(ref entrant) => EntrantSpot::Entrant(entrant),
            Self::Empty => EntrantSpot::Empty,
            Self::TBD => EntrantSpot::TBD,
        }
    }

    /// Maps `EntrantSpot<T>` to `EntrantSpot<U>` by applying `f` on it.
    pub fn map<U, F>(self, f: F) -> EntrantSpot<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Entrant(entrant) => EntrantSpot::Entrant(f(entrant)),
            Self::Empty => EntrantSpot::Empty,
            Self::TBD => EntrantSpot::TBD,
        }
    }
}

/// The pinfall of both spots of a [`Match`]. `a` belongs to the first spot, `b` to the second.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Score {
    pub a: u32,
    pub b: u32,
}

impl Score {
    #[inline]
    pub const fn new(a: u32, b: u32) -> Self {
        Self { a, b }
    }

    #[inline]
    pub const fn is_tie(self) -> bool {
        self.a == self.b
    }

    /// Returns the position (`0` or `1`) of the spot with the strictly greater score. Returns
    /// `None` for a tie.
    #[inline]
    pub fn winner_position(self) -> Option<usize> {
        match self.a.cmp(&self.b) {
            std::cmp::Ordering::Greater => Some(0),
            std::cmp::Ordering::Less => Some(1),
            std::cmp::Ordering::Equal => None,
        }
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.a, self.b)
    }
}

/// The result of a decided [`Match`]. A score and a winner only ever exist together.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Outcome {
    pub score: Score,
    pub winner: EntrantRef,
}

impl Outcome {
    #[inline]
    pub const fn new(score: Score, winner: EntrantRef) -> Self {
        Self { score, winner }
    }
}

/// The state of a single [`Match`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MatchState {
    /// At least one spot has no entrant yet (or never will, for a bye).
    Unfilled,
    /// Both spots hold an entrant, no score was reported.
    ReadyToPlay,
    /// A score was reported and the winner is known.
    Decided,
}

/// A match between the two entrants in `entrants`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Match {
    pub id: MatchId,
    pub entrants: [EntrantSpot<EntrantRef>; 2],
    pub(crate) outcome: Option<Outcome>,
}

impl Match {
    #[inline]
    pub fn new(id: MatchId, entrants: [EntrantSpot<EntrantRef>; 2]) -> Self {
        Self {
            id,
            entrants,
            outcome: None,
        }
    }

    /// Creates a new `Match` with an already known [`Outcome`]. The outcome is not validated
    /// until the match is used in [`Bracket::resume`].
    #[inline]
    pub fn with_outcome(
        id: MatchId,
        entrants: [EntrantSpot<EntrantRef>; 2],
        outcome: Outcome,
    ) -> Self {
        Self {
            id,
            entrants,
            outcome: Some(outcome),
        }
    }

    #[inline]
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    #[inline]
    pub fn score(&self) -> Option<Score> {
        self.outcome.map(|outcome| outcome.score)
    }

    #[inline]
    pub fn winner(&self) -> Option<EntrantRef> {
        self.outcome.map(|outcome| outcome.winner)
    }

    /// Returns the loser of a decided match.
    pub fn loser(&self) -> Option<EntrantRef> {
        let winner = self.winner()?;

        self.entrants
            .iter()
            .filter_map(|spot| spot.entrant().copied())
            .find(|entrant| *entrant != winner)
    }

    pub fn state(&self) -> MatchState {
        if self.outcome.is_some() {
            MatchState::Decided
        } else if self.entrants.iter().all(EntrantSpot::is_entrant) {
            MatchState::ReadyToPlay
        } else {
            MatchState::Unfilled
        }
    }

    /// Returns the entrant that wins this match with `score`, without modifying the match.
    /// Returns `None` if a spot has no entrant or `score` is a tie.
    pub(crate) fn decide(&self, score: Score) -> Option<EntrantRef> {
        let position = score.winner_position()?;

        match self.entrants {
            [EntrantSpot::Entrant(_), EntrantSpot::Entrant(_)] => {
                self.entrants[position].entrant().copied()
            }
            _ => None,
        }
    }

    /// Returns a reference to the entrant spot at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&EntrantSpot<EntrantRef>> {
        self.entrants.get(index)
    }
}

impl Index<usize> for Match {
    type Output = EntrantSpot<EntrantRef>;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.entrants[index]
    }
}
