use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options changing how a [`Bracket`] is built and advanced.
///
/// [`Bracket`]: crate::Bracket
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BracketOptions {
    pub byes: ByePolicy,
    pub corrections: Corrections,
}

impl BracketOptions {
    #[inline]
    pub fn byes(mut self, byes: ByePolicy) -> Self {
        self.byes = byes;
        self
    }

    #[inline]
    pub fn corrections(mut self, corrections: Corrections) -> Self {
        self.corrections = corrections;
        self
    }
}

/// What happens to an entrant whose opponent spot is a bye.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ByePolicy {
    /// Byes are never resolved. The entrant stays in its first round match, which can never be
    /// played.
    #[default]
    Strict,
    /// The entrant is moved into the next round when the bracket is built. The bye match itself
    /// stays without an outcome.
    Advance,
}

/// What happens to later matches when the score of a decided match is reported again.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Corrections {
    /// If the winner changed, every decided match the previous winner went on to play is
    /// reset.
    #[default]
    Cascade,
    /// The new winner replaces the previous one in the next match. Outcomes of later matches
    /// are kept, even if they were played by the previous winner.
    Overwrite,
}

impl Display for ByePolicy {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Strict => "strict",
            Self::Advance => "advance",
        })
    }
}

impl FromStr for ByePolicy {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(Self::Strict),
            "advance" => Ok(Self::Advance),
            _ => Err(UnknownOption(s.to_owned())),
        }
    }
}

impl Display for Corrections {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Cascade => "cascade",
            Self::Overwrite => "overwrite",
        })
    }
}

impl FromStr for Corrections {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cascade" => Ok(Self::Cascade),
            "overwrite" => Ok(Self::Overwrite),
            _ => Err(UnknownOption(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown option value: {0}")]
pub struct UnknownOption(String);
