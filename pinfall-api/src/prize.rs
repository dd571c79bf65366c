use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, League, Result, Storage, TournamentId};

pub(crate) const PRIZE_POOLS: &str = "prize_pools";

/// An amount of money in cents.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Money(pub u64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    #[inline]
    pub const fn cents(self) -> u64 {
        self.0
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Money {
    type Err = InvalidAmount;

    /// Parses amounts like `250`, `250.5` or `250.50`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let err = || InvalidAmount(s.to_owned());

        let (whole, fraction) = match s.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (s, ""),
        };

        if whole.is_empty() || fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(err());
        }

        let whole: u64 = whole.parse().map_err(|_| err())?;
        let cents = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().map_err(|_| err())? * 10,
            _ => fraction.parse::<u64>().map_err(|_| err())?,
        };

        whole
            .checked_mul(100)
            .and_then(|amount| amount.checked_add(cents))
            .map(Self)
            .ok_or_else(err)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid amount: {0}")]
pub struct InvalidAmount(String);

/// How a prize pool is split between the places.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Distribution {
    /// 50%, 30% and 20%.
    #[default]
    Standard,
    /// 70%, 20% and 10%.
    TopHeavy,
    /// 40%, 30%, 20% and 10%.
    Balanced,
    /// The percentage for each place, starting with the first place.
    Custom(Vec<u32>),
}

impl Distribution {
    /// Returns the percentage of the pool for each place, starting with the first place.
    pub fn percentages(&self) -> &[u32] {
        match self {
            Self::Standard => &[50, 30, 20],
            Self::TopHeavy => &[70, 20, 10],
            Self::Balanced => &[40, 30, 20, 10],
            Self::Custom(percentages) => percentages,
        }
    }

    /// Checks that the percentages add up to 100.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDistribution`] with the actual sum otherwise.
    pub fn validate(&self) -> Result<()> {
        let sum = self
            .percentages()
            .iter()
            .map(|percentage| u64::from(*percentage))
            .sum();

        if sum == 100 {
            Ok(())
        } else {
            Err(Error::InvalidDistribution(sum))
        }
    }
}

impl Display for Distribution {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("standard"),
            Self::TopHeavy => f.write_str("top-heavy"),
            Self::Balanced => f.write_str("balanced"),
            Self::Custom(percentages) => {
                f.write_str("custom:")?;
                for (index, percentage) in percentages.iter().enumerate() {
                    if index != 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", percentage)?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for Distribution {
    type Err = UnknownDistribution;

    /// Parses `standard`, `top-heavy`, `balanced` or a custom distribution like
    /// `custom:60,25,15`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "top-heavy" => Ok(Self::TopHeavy),
            "balanced" => Ok(Self::Balanced),
            _ => {
                let percentages = s
                    .strip_prefix("custom:")
                    .ok_or_else(|| UnknownDistribution(s.to_owned()))?;

                percentages
                    .split(',')
                    .map(|p| p.trim().parse())
                    .collect::<std::result::Result<_, _>>()
                    .map(Self::Custom)
                    .map_err(|_| UnknownDistribution(s.to_owned()))
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown distribution: {0} (expected 'standard', 'top-heavy', 'balanced' or 'custom:..')")]
pub struct UnknownDistribution(String);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizePool {
    pub tournament_id: TournamentId,
    pub total: Money,
    pub distribution: Distribution,
}

/// The prize for a single place.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    /// The place, starting at `1`.
    pub place: usize,
    pub percentage: u32,
    pub amount: Money,
}

impl PrizePool {
    /// Creates a new `PrizePool`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDistribution`] if the percentages of `distribution` do not add
    /// up to 100.
    pub fn new(
        tournament_id: TournamentId,
        total: Money,
        distribution: Distribution,
    ) -> Result<Self> {
        distribution.validate()?;

        Ok(Self {
            tournament_id,
            total,
            distribution,
        })
    }

    /// Returns the payout for every place. Cents lost to rounding go to the first place, so the
    /// payouts always add up to the total.
    pub fn payouts(&self) -> Vec<Payout> {
        let total = u128::from(self.total.cents());

        let mut payouts: Vec<Payout> = self
            .distribution
            .percentages()
            .iter()
            .enumerate()
            .map(|(index, percentage)| {
                // Never larger than the total with a valid distribution.
                let amount = total * u128::from(*percentage) / 100;

                Payout {
                    place: index + 1,
                    percentage: *percentage,
                    amount: Money(u64::try_from(amount).unwrap_or(u64::MAX)),
                }
            })
            .collect();

        let paid: u128 = payouts
            .iter()
            .map(|payout| u128::from(payout.amount.cents()))
            .sum();
        if let Some(first) = payouts.first_mut() {
            let remainder = u64::try_from(total.saturating_sub(paid)).unwrap_or(0);
            first.amount.0 = first.amount.0.saturating_add(remainder);
        }

        payouts
    }
}

fn load<S>(storage: &S) -> Result<BTreeMap<TournamentId, PrizePool>>
where
    S: Storage,
{
    Ok(storage.get(PRIZE_POOLS)?.unwrap_or_default())
}

/// Removes the prize pool of a tournament, if it has one.
pub(crate) fn remove<S>(storage: &mut S, id: TournamentId) -> Result<()>
where
    S: Storage,
{
    let mut pools = load(storage)?;

    if pools.remove(&id).is_some() {
        storage.set(PRIZE_POOLS, &pools)?;
    }

    Ok(())
}

pub struct PrizesClient<'a, S> {
    league: &'a League<S>,
    tournament_id: TournamentId,
}

impl<'a, S> PrizesClient<'a, S>
where
    S: Storage,
{
    pub(crate) fn new(league: &'a League<S>, tournament_id: TournamentId) -> Self {
        Self {
            league,
            tournament_id,
        }
    }

    pub fn get(&self) -> Result<PrizePool> {
        load(&*self.league.lock())?
            .remove(&self.tournament_id)
            .ok_or(Error::NotFound)
    }

    /// Sets the prize pool of the tournament, replacing the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the tournament does not exist and
    /// [`Error::InvalidDistribution`] if the distribution is invalid.
    pub fn set(&self, total: Money, distribution: Distribution) -> Result<PrizePool> {
        let pool = PrizePool::new(self.tournament_id, total, distribution)?;

        let mut storage = self.league.lock();

        let tournaments = crate::tournament::load(&*storage)?;
        if !tournaments.iter().any(|t| t.id == self.tournament_id) {
            return Err(Error::NotFound);
        }

        let mut pools = load(&*storage)?;
        pools.insert(self.tournament_id, pool.clone());
        storage.set(PRIZE_POOLS, &pools)?;

        log::info!(
            "Set prize pool of {} ({}) for tournament {}",
            pool.total,
            pool.distribution,
            self.tournament_id
        );

        Ok(pool)
    }

    pub fn delete(&self) -> Result<()> {
        let mut storage = self.league.lock();

        let mut pools = load(&*storage)?;
        pools.remove(&self.tournament_id).ok_or(Error::NotFound)?;
        storage.set(PRIZE_POOLS, &pools)?;

        log::info!("Deleted prize pool for tournament {}", self.tournament_id);
        Ok(())
    }
}
