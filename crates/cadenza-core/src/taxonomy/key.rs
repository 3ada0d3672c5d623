use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::UnknownCode;
use crate::registry;

/// One of the 29 named musical keys a composition can be written in.
///
/// The integer codes are the values persisted in the `key_signature`
/// column and must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum KeySignature {
    CMajor = 0,
    AMinor = 1,
    GMajor = 2,
    EMinor = 3,
    DMajor = 4,
    BMinor = 5,
    AMajor = 6,
    FSharpMinor = 7,
    EMajor = 8,
    CSharpMinor = 9,
    BMajor = 10,
    GSharpMinor = 11,
    FSharpMajor = 12,
    DSharpMinor = 13,
    CSharpMajor = 14,
    ASharpMinor = 15,
    FMajor = 16,
    DMinor = 17,
    BFlatMajor = 18,
    GMinor = 19,
    EFlatMajor = 20,
    CMinor = 21,
    AFlatMajor = 22,
    FMinor = 23,
    DFlatMajor = 24,
    BFlatMinor = 25,
    GFlatMajor = 26,
    EFlatMinor = 27,
    AFlatMinor = 28,
}

impl KeySignature {
    /// Every key signature, in code order.
    pub const ALL: [Self; 29] = [
        Self::CMajor,
        Self::AMinor,
        Self::GMajor,
        Self::EMinor,
        Self::DMajor,
        Self::BMinor,
        Self::AMajor,
        Self::FSharpMinor,
        Self::EMajor,
        Self::CSharpMinor,
        Self::BMajor,
        Self::GSharpMinor,
        Self::FSharpMajor,
        Self::DSharpMinor,
        Self::CSharpMajor,
        Self::ASharpMinor,
        Self::FMajor,
        Self::DMinor,
        Self::BFlatMajor,
        Self::GMinor,
        Self::EFlatMajor,
        Self::CMinor,
        Self::AFlatMajor,
        Self::FMinor,
        Self::DFlatMajor,
        Self::BFlatMinor,
        Self::GFlatMajor,
        Self::EFlatMinor,
        Self::AFlatMinor,
    ];

    #[must_use]
    pub const fn code(self) -> i64 {
        self as i64
    }

    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.code() == code)
    }

    /// The programmatic name of the variant (e.g. `"FSharpMinor"`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CMajor => "CMajor",
            Self::AMinor => "AMinor",
            Self::GMajor => "GMajor",
            Self::EMinor => "EMinor",
            Self::DMajor => "DMajor",
            Self::BMinor => "BMinor",
            Self::AMajor => "AMajor",
            Self::FSharpMinor => "FSharpMinor",
            Self::EMajor => "EMajor",
            Self::CSharpMinor => "CSharpMinor",
            Self::BMajor => "BMajor",
            Self::GSharpMinor => "GSharpMinor",
            Self::FSharpMajor => "FSharpMajor",
            Self::DSharpMinor => "DSharpMinor",
            Self::CSharpMajor => "CSharpMajor",
            Self::ASharpMinor => "ASharpMinor",
            Self::FMajor => "FMajor",
            Self::DMinor => "DMinor",
            Self::BFlatMajor => "BFlatMajor",
            Self::GMinor => "GMinor",
            Self::EFlatMajor => "EFlatMajor",
            Self::CMinor => "CMinor",
            Self::AFlatMajor => "AFlatMajor",
            Self::FMinor => "FMinor",
            Self::DFlatMajor => "DFlatMajor",
            Self::BFlatMinor => "BFlatMinor",
            Self::GFlatMajor => "GFlatMajor",
            Self::EFlatMinor => "EFlatMinor",
            Self::AFlatMinor => "AFlatMinor",
        }
    }
}

impl fmt::Display for KeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(registry::display_name_of(*self))
    }
}

/// Parses a programmatic name (case-insensitive) or an integer code.
impl FromStr for KeySignature {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let by_code = s.parse::<i64>().ok().and_then(Self::from_code);
        by_code
            .or_else(|| {
                Self::ALL
                    .into_iter()
                    .find(|key| key.name().eq_ignore_ascii_case(s))
            })
            .ok_or_else(|| UnknownCode {
                family: "key signature",
                value: s.to_string(),
            })
    }
}

/// Deserializes from the integer code or the programmatic name.
impl<'de> Deserialize<'de> for KeySignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        super::deserialize_code(deserializer, "key signature", Self::from_code)
    }
}
