use std::cmp::Reverse;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Ranked;

/// The order in which entrants are placed into the first round of a bracket.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Seeding {
    /// Keep the order in which the entrants registered.
    #[default]
    RegistrationOrder,
    /// Highest ranking first. Entrants without a ranking are compared using
    /// [`DEFAULT_RANKING`].
    ///
    /// [`DEFAULT_RANKING`]: crate::DEFAULT_RANKING
    ByRankingDesc,
}

impl Seeding {
    /// Returns a seeded copy of `entrants`. Entrants with equal rankings keep their relative
    /// order.
    pub fn seed<T>(self, entrants: &[T]) -> Vec<T>
    where
        T: Ranked + Clone,
    {
        let mut seeded = entrants.to_vec();

        match self {
            Self::RegistrationOrder => (),
            // `sort_by_key` is stable.
            Self::ByRankingDesc => {
                seeded.sort_by_key(|entrant| Reverse(entrant.ranking_or_default()))
            }
        }

        log::debug!("Seeded {} entrants using {}", seeded.len(), self);

        seeded
    }
}

impl Display for Seeding {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::RegistrationOrder => "registration-order",
            Self::ByRankingDesc => "by-ranking-desc",
        })
    }
}

impl FromStr for Seeding {
    type Err = UnknownSeeding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registration-order" => Ok(Self::RegistrationOrder),
            "by-ranking-desc" => Ok(Self::ByRankingDesc),
            _ => Err(UnknownSeeding(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown seeding: {0} (expected 'registration-order' or 'by-ranking-desc')")]
pub struct UnknownSeeding(String);
