use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::UnknownCode;
use crate::registry;

/// The musical form of a composition.
///
/// Codes start at 1 and are persisted in the `format` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Format {
    Symphony = 1,
    Sonata = 2,
    Concerto = 3,
    StringQuartet = 4,
    Prelude = 5,
    Fugue = 6,
    Suite = 7,
    Nocturne = 8,
    Etude = 9,
    Variations = 10,
}

impl Format {
    pub const ALL: [Self; 10] = [
        Self::Symphony,
        Self::Sonata,
        Self::Concerto,
        Self::StringQuartet,
        Self::Prelude,
        Self::Fugue,
        Self::Suite,
        Self::Nocturne,
        Self::Etude,
        Self::Variations,
    ];

    #[must_use]
    pub const fn code(self) -> i64 {
        self as i64
    }

    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.code() == code)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Symphony => "Symphony",
            Self::Sonata => "Sonata",
            Self::Concerto => "Concerto",
            Self::StringQuartet => "StringQuartet",
            Self::Prelude => "Prelude",
            Self::Fugue => "Fugue",
            Self::Suite => "Suite",
            Self::Nocturne => "Nocturne",
            Self::Etude => "Etude",
            Self::Variations => "Variations",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(registry::display_name_of(*self))
    }
}

impl FromStr for Format {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let by_code = s.parse::<i64>().ok().and_then(Self::from_code);
        by_code
            .or_else(|| {
                Self::ALL
                    .into_iter()
                    .find(|format| format.name().eq_ignore_ascii_case(s))
            })
            .ok_or_else(|| UnknownCode {
                family: "format",
                value: s.to_string(),
            })
    }
}

/// Deserializes from the integer code or the programmatic name.
impl<'de> Deserialize<'de> for Format {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        super::deserialize_code(deserializer, "format", Self::from_code)
    }
}
