//! A [`Bracket`] is deserialized through [`Bracket::resume`], so malformed persisted brackets
//! are rejected instead of producing a bracket with broken invariants.
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::{Bracket, BracketOptions, Entrants, Round};

impl<T> Serialize for Bracket<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Bracket", 3)?;
        state.serialize_field("participants", &self.participants)?;
        state.serialize_field("rounds", &self.rounds)?;
        state.serialize_field("options", &self.options)?;
        state.end()
    }
}

#[derive(serde::Deserialize)]
#[serde(rename = "Bracket")]
struct BracketParts<T> {
    participants: Entrants<T>,
    rounds: Vec<Round>,
    #[serde(default)]
    options: BracketOptions,
}

impl<'de, T> Deserialize<'de> for Bracket<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parts = BracketParts::deserialize(deserializer)?;

        Bracket::resume(parts.participants, parts.rounds, parts.options).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde_test::{assert_tokens, Token};

    use crate::{Bracket, Seeding};

    #[test]
    fn test_bracket_serde() {
        let bracket = Bracket::new([7_u32]).unwrap();

        assert_tokens(
            &bracket,
            &[
                Token::Struct {
                    name: "Bracket",
                    len: 3,
                },
                Token::Str("participants"),
                Token::Seq { len: Some(1) },
                Token::U32(7),
                Token::SeqEnd,
                Token::Str("rounds"),
                Token::Seq { len: Some(1) },
                Token::Seq { len: Some(1) },
                Token::Struct {
                    name: "Match",
                    len: 3,
                },
                Token::Str("id"),
                Token::U64(0),
                Token::Str("entrants"),
                Token::Tuple { len: 2 },
                Token::NewtypeVariant {
                    name: "EntrantSpot",
                    variant: "Entrant",
                },
                Token::U64(0),
                Token::UnitVariant {
                    name: "EntrantSpot",
                    variant: "Empty",
                },
                Token::TupleEnd,
                Token::Str("outcome"),
                Token::None,
                Token::StructEnd,
                Token::SeqEnd,
                Token::SeqEnd,
                Token::Str("options"),
                Token::Struct {
                    name: "BracketOptions",
                    len: 2,
                },
                Token::Str("byes"),
                Token::UnitVariant {
                    name: "ByePolicy",
                    variant: "strict",
                },
                Token::Str("corrections"),
                Token::UnitVariant {
                    name: "Corrections",
                    variant: "cascade",
                },
                Token::StructEnd,
                Token::StructEnd,
            ],
        );
    }

    #[test]
    fn test_bracket_json() {
        let mut bracket = Bracket::new(vec![1_u32, 2, 3, 4]).unwrap();
        bracket.report_score(0, 0, 201, 187).unwrap();

        let json = serde_json::to_string(&bracket).unwrap();
        let resumed: Bracket<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(resumed, bracket);

        // Options are optional for older data.
        let json = r#"{"participants":[1],"rounds":[[{"id":0,"entrants":[{"Entrant":0},"Empty"],"outcome":null}]]}"#;
        let resumed: Bracket<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(resumed, Bracket::new([1]).unwrap());

        // The entrant at index 3 does not exist.
        let json = r#"{"participants":[1],"rounds":[[{"id":0,"entrants":[{"Entrant":3},"Empty"],"outcome":null}]]}"#;
        assert!(serde_json::from_str::<Bracket<u32>>(json).is_err());

        let json = r#"{"participants":[],"rounds":[]}"#;
        assert!(serde_json::from_str::<Bracket<u32>>(json).is_err());
    }

    #[test]
    fn test_seeding_serde() {
        assert_tokens(
            &Seeding::ByRankingDesc,
            &[Token::UnitVariant {
                name: "Seeding",
                variant: "by-ranking-desc",
            }],
        );
    }
}
