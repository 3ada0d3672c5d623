//! JSON projections returned by the API.

use serde::Serialize;

use cadenza_core::model::{Composer, ComposerId, Composition, CompositionId};
use cadenza_core::registry::display_name_of;
use cadenza_core::taxonomy::{Format, KeySignature};

/// A composition with its composer name and display labels denormalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionResponse {
    pub id: CompositionId,
    pub name: String,
    pub key_signature: KeySignature,
    pub key_signature_display_name: &'static str,
    pub number_of_movements: u32,
    pub format: Format,
    pub format_display_name: &'static str,
    pub composer_id: ComposerId,
    pub composer_name: String,
}

impl From<&Composition> for CompositionResponse {
    fn from(composition: &Composition) -> Self {
        Self {
            id: composition.id,
            name: composition.name.clone(),
            key_signature: composition.key_signature,
            key_signature_display_name: display_name_of(composition.key_signature),
            number_of_movements: composition.movements,
            format: composition.format,
            format_display_name: display_name_of(composition.format),
            composer_id: composition.composer.id,
            composer_name: composition.composer.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposerResponse {
    pub id: ComposerId,
    pub name: String,
}

impl From<&Composer> for ComposerResponse {
    fn from(composer: &Composer) -> Self {
        Self {
            id: composer.id,
            name: composer.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composition_projection() {
        let composition = Composition::new(
            "String Quartet No. 14",
            KeySignature::CSharpMinor,
            7,
            Format::StringQuartet,
            Composer::new("Beethoven"),
        );
        let json = serde_json::to_value(CompositionResponse::from(&composition)).unwrap();

        assert_eq!(json["keySignature"], "CSharpMinor");
        assert_eq!(json["keySignatureDisplayName"], "C# Minor");
        assert_eq!(json["numberOfMovements"], 7);
        assert_eq!(json["formatDisplayName"], "StringQuartet");
        assert_eq!(json["composerName"], "Beethoven");
        assert_eq!(json["composerId"], composition.composer.id.to_string());
    }
}
