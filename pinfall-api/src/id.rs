use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use snowflaked::sync::Generator;

const INSTANCE: u16 = 0;

pub(crate) static TOURNAMENT: Generator = Generator::new_unchecked(INSTANCE);
pub(crate) static BOWLER: Generator = Generator::new_unchecked(INSTANCE);
pub(crate) static REGISTRATION: Generator = Generator::new_unchecked(INSTANCE);
pub(crate) static SPONSOR: Generator = Generator::new_unchecked(INSTANCE);

macro_rules! id {
    ($name:ident, $id:ty, $generator:ident) => {
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
        #[repr(transparent)]
        #[serde(transparent)]
        pub struct $name(pub $id);

        impl $name {
            /// Creates a new, unique id.
            #[inline]
            pub fn generate() -> Self {
                Self($generator.generate())
            }
        }

        impl Display for $name {
            #[inline]
            fn fmt(&self, f: &mut Formatter) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl AsRef<$id> for $name {
            #[inline]
            fn as_ref(&self) -> &$id {
                &self.0
            }
        }

        impl PartialEq<$id> for $name {
            #[inline]
            fn eq(&self, other: &$id) -> bool {
                self.0 == *other
            }
        }

        impl From<$id> for $name {
            #[inline]
            fn from(id: $id) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = <$id as FromStr>::Err;

            #[inline]
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse::<$id>()?))
            }
        }
    };
}

id!(TournamentId, u64, TOURNAMENT);
id!(BowlerId, u64, BOWLER);
id!(RegistrationId, u64, REGISTRATION);
id!(SponsorId, u64, SPONSOR);

#[cfg(test)]
mod tests {
    use serde_test::{assert_tokens, Token};

    use super::{BowlerId, TournamentId};

    #[test]
    fn test_id_serde() {
        assert_tokens(&TournamentId(42), &[Token::U64(42)]);
    }

    #[test]
    fn test_id_parse() {
        assert_eq!("1234".parse(), Ok(BowlerId(1234)));
        assert!("abc".parse::<BowlerId>().is_err());
        assert_eq!(BowlerId(7).to_string(), "7");
    }

    #[test]
    fn test_id_generate_unique() {
        let a = TournamentId::generate();
        let b = TournamentId::generate();

        assert_ne!(a, b);
    }
}
