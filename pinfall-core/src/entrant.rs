use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The average assumed for entrants without a known bowling average.
pub const DEFAULT_RANKING: u32 = 160;

/// An entrant value that can be ordered by a ranking metric for seeding.
pub trait Ranked {
    /// Returns the ranking metric of the entrant, or `None` if it is unknown.
    fn ranking(&self) -> Option<u32>;

    /// Returns the ranking metric, falling back to [`DEFAULT_RANKING`].
    #[inline]
    fn ranking_or_default(&self) -> u32 {
        self.ranking().unwrap_or(DEFAULT_RANKING)
    }
}

impl<T> Ranked for &T
where
    T: Ranked,
{
    #[inline]
    fn ranking(&self) -> Option<u32> {
        (**self).ranking()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EntrantId(pub u64);

impl Display for EntrantId {
    #[inline]
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A bowler admitted into a bracket.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entrant {
    pub id: EntrantId,
    pub name: String,
    /// The bowling average used for seeding.
    pub average: Option<u32>,
    pub skill: Option<SkillLevel>,
}

impl Entrant {
    /// Creates a new `Entrant` without an average or skill level.
    pub fn new<S>(id: EntrantId, name: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            id,
            name: name.into(),
            average: None,
            skill: None,
        }
    }

    #[inline]
    pub fn average(mut self, average: u32) -> Self {
        self.average = Some(average);
        self
    }

    #[inline]
    pub fn skill(mut self, skill: SkillLevel) -> Self {
        self.skill = Some(skill);
        self
    }
}

impl Ranked for Entrant {
    #[inline]
    fn ranking(&self) -> Option<u32> {
        self.average
    }
}

impl Display for Entrant {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.average {
            Some(average) => write!(f, "{} ({})", self.name, average),
            None => write!(f, "{}", self.name),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Professional,
}

impl Display for SkillLevel {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Professional => "professional",
        })
    }
}

impl FromStr for SkillLevel {
    type Err = UnknownSkillLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            "professional" => Ok(Self::Professional),
            _ => Err(UnknownSkillLevel(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown skill level: {0}")]
pub struct UnknownSkillLevel(String);
