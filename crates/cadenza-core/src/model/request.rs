//! Caller-supplied payloads: the composition write request and the read
//! filter bundle.
//!
//! Both arrive with every field optional. A create request must end up with
//! every composition field populated; a partial update only overwrites the
//! fields it actually carries.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::composer::Composer;
use crate::model::composition::Composition;
use crate::model::ids::ComposerId;
use crate::registry;
use crate::taxonomy::{Format, KeySignature};

/// A composition payload for create or partial update.
///
/// The composer may be named by id or by free-text name. The key signature
/// may be given by code or by display label; a non-blank label wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionRequest {
    pub name: Option<String>,
    pub key_signature: Option<KeySignature>,
    pub key_signature_display_name: Option<String>,
    pub number_of_movements: Option<i64>,
    pub format: Option<Format>,
    pub composer_id: Option<ComposerId>,
    pub composer_name: Option<String>,
}

impl CompositionRequest {
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_key_signature(mut self, key: KeySignature) -> Self {
        self.key_signature = Some(key);
        self
    }

    #[must_use]
    pub fn with_key_signature_display_name(mut self, label: impl Into<String>) -> Self {
        self.key_signature_display_name = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_movements(mut self, movements: i64) -> Self {
        self.number_of_movements = Some(movements);
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    #[must_use]
    pub fn with_composer_id(mut self, id: ComposerId) -> Self {
        self.composer_id = Some(id);
        self
    }

    #[must_use]
    pub fn with_composer_name(mut self, name: impl Into<String>) -> Self {
        self.composer_name = Some(name.into());
        self
    }

    /// The composition name, if present and not blank.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    /// The composer name, if present and not blank.
    #[must_use]
    pub fn composer_name(&self) -> Option<&str> {
        non_blank(self.composer_name.as_deref())
    }

    /// The effective key signature. A display label overrides the code.
    pub fn key_signature(&self) -> Result<Option<KeySignature>> {
        match non_blank(self.key_signature_display_name.as_deref()) {
            Some(label) => registry::parse_display_name(label)
                .map(Some)
                .map_err(|e| Error::InvalidComposition(e.to_string())),
            None => Ok(self.key_signature),
        }
    }

    /// The movement count, treating zero as not supplied.
    #[must_use]
    pub fn movements(&self) -> Option<i64> {
        self.number_of_movements.filter(|&n| n != 0)
    }

    /// Build a new composition for `composer`, requiring every field.
    pub fn to_composition(&self, composer: Composer) -> Result<Composition> {
        let name = self
            .name()
            .ok_or_else(|| Error::InvalidComposition("name is required".to_string()))?;
        let key_signature = self
            .key_signature()?
            .ok_or_else(|| Error::InvalidComposition("key signature is required".to_string()))?;
        let movements = self.movements().ok_or_else(|| {
            Error::InvalidComposition("number of movements is required".to_string())
        })?;
        let movements = movement_count(movements)?;
        let format = self
            .format
            .ok_or_else(|| Error::InvalidComposition("format is required".to_string()))?;

        let composition = Composition::new(name, key_signature, movements, format, composer);
        composition.validate()?;
        Ok(composition)
    }

    /// Overlay the fields this request carries onto `existing`.
    ///
    /// Absent and blank fields leave the existing value untouched, as does a
    /// movement count of zero. The merged record is re-validated.
    pub fn merge_into(&self, existing: &Composition, composer: Composer) -> Result<Composition> {
        let mut merged = existing.clone();

        if let Some(name) = self.name() {
            merged.name = name.to_string();
        }
        if let Some(key_signature) = self.key_signature()? {
            merged.key_signature = key_signature;
        }
        if let Some(movements) = self.movements() {
            merged.movements = movement_count(movements)?;
        }
        if let Some(format) = self.format {
            merged.format = format;
        }
        merged.composer = composer;

        merged.validate()?;
        Ok(merged)
    }
}

fn movement_count(movements: i64) -> Result<u32> {
    u32::try_from(movements)
        .ok()
        .filter(|&n| n >= 1)
        .ok_or_else(|| {
            Error::InvalidComposition(format!(
                "number of movements must be at least 1, got {movements}"
            ))
        })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Optional predicates for listing compositions, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionFilter {
    /// Case-insensitive substring of the composition name.
    pub name: Option<String>,
    pub key_signature: Option<KeySignature>,

    /// Display label such as "C Minor"; must resolve to a key signature.
    pub key_signature_display_name: Option<String>,
    pub format: Option<Format>,

    /// Case-insensitive substring of the composer's name.
    pub composer_name: Option<String>,
}

impl CompositionFilter {
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_key_signature(mut self, key: KeySignature) -> Self {
        self.key_signature = Some(key);
        self
    }

    #[must_use]
    pub fn with_key_signature_display_name(mut self, label: impl Into<String>) -> Self {
        self.key_signature_display_name = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    #[must_use]
    pub fn with_composer_name(mut self, name: impl Into<String>) -> Self {
        self.composer_name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing() -> Composition {
        Composition::new(
            "Symphony No. 1",
            KeySignature::CMinor,
            4,
            Format::Symphony,
            Composer::new("Brahms"),
        )
    }

    fn complete_request() -> CompositionRequest {
        CompositionRequest::default()
            .with_name("Symphony No. 1")
            .with_key_signature(KeySignature::CMinor)
            .with_movements(4)
            .with_format(Format::Symphony)
            .with_composer_name("Brahms")
    }

    #[test]
    fn test_display_name_overrides_code() {
        let request = CompositionRequest::default()
            .with_key_signature(KeySignature::CMajor)
            .with_key_signature_display_name("d minor");
        assert_eq!(request.key_signature().unwrap(), Some(KeySignature::DMinor));
    }

    #[test]
    fn test_blank_display_name_is_ignored() {
        let request = CompositionRequest::default()
            .with_key_signature(KeySignature::CMajor)
            .with_key_signature_display_name("  ");
        assert_eq!(request.key_signature().unwrap(), Some(KeySignature::CMajor));
    }

    #[test]
    fn test_unknown_display_name_is_invalid() {
        let request = CompositionRequest::default().with_key_signature_display_name("Q Major");
        assert!(matches!(
            request.key_signature(),
            Err(Error::InvalidComposition(_))
        ));
    }

    #[test]
    fn test_to_composition_requires_every_field() {
        let composer = Composer::new("Brahms");
        assert!(complete_request().to_composition(composer.clone()).is_ok());

        let mut missing_key = complete_request();
        missing_key.key_signature = None;
        let mut missing_format = complete_request();
        missing_format.format = None;
        let mut missing_movements = complete_request();
        missing_movements.number_of_movements = None;
        let mut blank_name = complete_request();
        blank_name.name = Some(String::new());

        for request in [missing_key, missing_format, missing_movements, blank_name] {
            assert!(matches!(
                request.to_composition(composer.clone()),
                Err(Error::InvalidComposition(_))
            ));
        }
    }

    #[test]
    fn test_to_composition_rejects_negative_movements() {
        let request = complete_request().with_movements(-3);
        assert!(matches!(
            request.to_composition(Composer::new("Brahms")),
            Err(Error::InvalidComposition(_))
        ));
    }

    #[test]
    fn test_empty_merge_is_identity() {
        let existing = existing();
        let merged = CompositionRequest::default()
            .merge_into(&existing, existing.composer.clone())
            .unwrap();
        assert_eq!(merged, existing);
    }

    #[test]
    fn test_merge_ignores_zero_movements() {
        let existing = existing();
        let merged = CompositionRequest::default()
            .with_movements(0)
            .merge_into(&existing, existing.composer.clone())
            .unwrap();
        assert_eq!(merged.movements, 4);
    }

    #[test]
    fn test_merge_overwrites_supplied_fields_only() {
        let existing = existing();
        let merged = CompositionRequest::default()
            .with_name("   ")
            .with_format(Format::Suite)
            .with_movements(6)
            .merge_into(&existing, existing.composer.clone())
            .unwrap();
        assert_eq!(merged.name, "Symphony No. 1");
        assert_eq!(merged.key_signature, KeySignature::CMinor);
        assert_eq!(merged.format, Format::Suite);
        assert_eq!(merged.movements, 6);
    }

    #[test]
    fn test_merge_rejects_negative_movements() {
        let existing = existing();
        let result = CompositionRequest::default()
            .with_movements(-1)
            .merge_into(&existing, existing.composer.clone());
        assert!(matches!(result, Err(Error::InvalidComposition(_))));
    }

    #[test]
    fn test_request_deserializes_camel_case() {
        let request: CompositionRequest = serde_json::from_value(serde_json::json!({
            "name": "Nocturne",
            "keySignature": "EFlatMajor",
            "numberOfMovements": null,
            "format": "Nocturne",
            "composerName": "Chopin"
        }))
        .unwrap();
        assert_eq!(request.key_signature, Some(KeySignature::EFlatMajor));
        assert_eq!(request.number_of_movements, None);
        assert_eq!(request.composer_name(), Some("Chopin"));
        assert!(request.composer_id.is_none());
    }
}
