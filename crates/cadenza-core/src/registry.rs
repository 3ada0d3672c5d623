//! Display-name registry for enumerated catalog fields.
//!
//! Maps [`KeySignature`] and [`Format`] codes to the human-readable labels
//! shown to callers ("C Minor", "F# Major") and resolves such labels
//! back to codes. The tables are fixed at compile time.
//!
//! # Example
//!
//! ```
//! use cadenza_core::registry::{code_from_display_name, display_name_of};
//! use cadenza_core::taxonomy::KeySignature;
//!
//! assert_eq!(display_name_of(KeySignature::CMinor), "C Minor");
//! assert_eq!(
//!     code_from_display_name::<KeySignature>("c minor"),
//!     Some(KeySignature::CMinor)
//! );
//! ```

use crate::taxonomy::{Format, KeySignature, UnknownCode};

/// An enumeration family whose codes carry display labels.
pub trait Enumerated: Copy + Eq + 'static {
    /// Human-readable family name used in error messages.
    const FAMILY: &'static str;

    /// Every code in the family.
    const VALUES: &'static [Self];

    /// Registered labels. Codes without an entry display as their
    /// programmatic name.
    const LABELS: &'static [(Self, &'static str)];

    fn code_name(self) -> &'static str;
}

/// Return the canonical label for `value`, falling back to its programmatic
/// name when no label is registered.
pub fn display_name_of<E: Enumerated>(value: E) -> &'static str {
    E::LABELS
        .iter()
        .find(|&&(code, _)| code == value)
        .map_or_else(|| value.code_name(), |&(_, label)| label)
}

/// Resolve a display label back to its code (case-insensitive, exact).
///
/// Returns `None` when no code in the family displays as `text`.
pub fn code_from_display_name<E: Enumerated>(text: &str) -> Option<E> {
    E::VALUES
        .iter()
        .copied()
        .find(|&code| display_name_of(code).eq_ignore_ascii_case(text))
}

/// Like [`code_from_display_name`], but reports the unmatched label.
pub fn parse_display_name<E: Enumerated>(text: &str) -> Result<E, UnknownCode> {
    code_from_display_name(text).ok_or_else(|| UnknownCode {
        family: E::FAMILY,
        value: text.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Label tables
// ---------------------------------------------------------------------------

const KEY_SIGNATURE_LABELS: &[(KeySignature, &str)] = &[
    (KeySignature::CMajor, "C Major"),
    (KeySignature::AMinor, "A Minor"),
    (KeySignature::GMajor, "G Major"),
    (KeySignature::EMinor, "E Minor"),
    (KeySignature::DMajor, "D Major"),
    (KeySignature::BMinor, "B Minor"),
    (KeySignature::AMajor, "A Major"),
    (KeySignature::FSharpMinor, "F# Minor"),
    (KeySignature::EMajor, "E Major"),
    (KeySignature::CSharpMinor, "C# Minor"),
    (KeySignature::BMajor, "B Major"),
    (KeySignature::GSharpMinor, "G# Minor"),
    (KeySignature::FSharpMajor, "F# Major"),
    (KeySignature::DSharpMinor, "D# Minor"),
    (KeySignature::CSharpMajor, "C# Major"),
    (KeySignature::ASharpMinor, "A# Minor"),
    (KeySignature::FMajor, "F Major"),
    (KeySignature::DMinor, "D Minor"),
    (KeySignature::BFlatMajor, "B♭ Major"),
    (KeySignature::GMinor, "G Minor"),
    (KeySignature::EFlatMajor, "E♭ Major"),
    (KeySignature::CMinor, "C Minor"),
    (KeySignature::AFlatMajor, "A♭ Major"),
    (KeySignature::FMinor, "F Minor"),
    (KeySignature::DFlatMajor, "D♭ Major"),
    (KeySignature::BFlatMinor, "B♭ Minor"),
    (KeySignature::GFlatMajor, "G♭ Major"),
    (KeySignature::EFlatMinor, "E♭ Minor"),
    (KeySignature::AFlatMinor, "A♭ Minor"),
];

// Forms carry no labels of their own and display as their variant name.
const FORMAT_LABELS: &[(Format, &str)] = &[];

impl Enumerated for KeySignature {
    const FAMILY: &'static str = "key signature";
    const VALUES: &'static [Self] = &Self::ALL;
    const LABELS: &'static [(Self, &'static str)] = KEY_SIGNATURE_LABELS;

    fn code_name(self) -> &'static str {
        self.name()
    }
}

impl Enumerated for Format {
    const FAMILY: &'static str = "format";
    const VALUES: &'static [Self] = &Self::ALL;
    const LABELS: &'static [(Self, &'static str)] = FORMAT_LABELS;

    fn code_name(self) -> &'static str {
        self.name()
    }
}
