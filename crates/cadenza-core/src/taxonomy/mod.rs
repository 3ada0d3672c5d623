pub mod format;
pub mod key;

pub use format::Format;
pub use key::KeySignature;

use serde::de::{self, Deserializer, Visitor};
use std::fmt;
use std::str::FromStr;

/// Error returned when text names no known enumeration code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {family}: {value}")]
pub struct UnknownCode {
    pub family: &'static str,
    pub value: String,
}

/// Accepts an integer code, or text that `FromStr` understands (a numeric
/// code or a case-insensitive programmatic name).
struct CodeVisitor<E> {
    family: &'static str,
    from_code: fn(i64) -> Option<E>,
}

impl<E> CodeVisitor<E> {
    fn unknown<Er: de::Error>(&self, value: impl fmt::Display) -> Er {
        Er::custom(UnknownCode {
            family: self.family,
            value: value.to_string(),
        })
    }
}

impl<'de, E> Visitor<'de> for CodeVisitor<E>
where
    E: FromStr<Err = UnknownCode>,
{
    type Value = E;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a {} code or name", self.family)
    }

    fn visit_i64<Er: de::Error>(self, v: i64) -> Result<E, Er> {
        (self.from_code)(v).ok_or_else(|| self.unknown(v))
    }

    fn visit_u64<Er: de::Error>(self, v: u64) -> Result<E, Er> {
        i64::try_from(v)
            .ok()
            .and_then(self.from_code)
            .ok_or_else(|| self.unknown(v))
    }

    fn visit_str<Er: de::Error>(self, v: &str) -> Result<E, Er> {
        v.parse().map_err(Er::custom)
    }
}

pub(crate) fn deserialize_code<'de, D, E>(
    deserializer: D,
    family: &'static str,
    from_code: fn(i64) -> Option<E>,
) -> Result<E, D::Error>
where
    D: Deserializer<'de>,
    E: FromStr<Err = UnknownCode>,
{
    deserializer.deserialize_any(CodeVisitor { family, from_code })
}
