use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::composer::Composer;
use crate::model::ids::CompositionId;
use crate::taxonomy::{Format, KeySignature};

/// A musical work owned by exactly one composer.
///
/// `(name, key_signature, composer)` is unique across the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub id: CompositionId,
    pub name: String,
    pub key_signature: KeySignature,

    /// Number of movements; always at least 1.
    pub movements: u32,

    pub format: Format,
    pub composer: Composer,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Composition {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        key_signature: KeySignature,
        movements: u32,
        format: Format,
        composer: Composer,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: CompositionId::new(),
            name: name.into(),
            key_signature,
            movements,
            format,
            composer,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check the field-level invariants that must hold before a write.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidComposition("name is required".to_string()));
        }
        if self.movements < 1 {
            return Err(Error::InvalidComposition(
                "number of movements must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
