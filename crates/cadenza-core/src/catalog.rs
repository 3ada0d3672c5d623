//! The composition service: composer resolution, validation, transactional
//! upserts, and filtered reads.
//!
//! Every write runs inside one [`Database::in_transaction`] scope, so a
//! composer created on the fly is never left behind when the composition
//! write that needed it fails.

use crate::error::{Error, Result};
use crate::model::{
    Composer, ComposerId, Composition, CompositionFilter, CompositionId, CompositionRequest,
};
use crate::registry;
use crate::schema::{CompositionPredicate, Database};
use crate::taxonomy::KeySignature;

/// Outcome of resolving a composer reference.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedComposer {
    /// Already stored.
    Existing(Composer),
    /// Resolved by a name nobody has used yet; inserted with the write.
    Pending(Composer),
}

impl ResolvedComposer {
    #[must_use]
    pub fn composer(&self) -> &Composer {
        match self {
            Self::Existing(composer) | Self::Pending(composer) => composer,
        }
    }

    #[must_use]
    pub fn into_composer(self) -> Composer {
        match self {
            Self::Existing(composer) | Self::Pending(composer) => composer,
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

/// Read and write operations over the composition catalog.
#[derive(Debug)]
pub struct Catalog {
    db: Database,
}

impl Catalog {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    #[must_use]
    pub const fn database(&self) -> &Database {
        &self.db
    }

    /// Resolve the composer a write refers to.
    ///
    /// An id takes precedence over a name. A name with no stored match yields
    /// a [`ResolvedComposer::Pending`] composer. With neither, `existing` is
    /// returned unchanged, or [`Error::MissingReference`] when there is none.
    pub fn resolve_composer(
        &self,
        id: Option<ComposerId>,
        name: Option<&str>,
        existing: Option<&Composer>,
    ) -> Result<ResolvedComposer> {
        if let Some(id) = id {
            return self
                .db
                .get_composer(id)?
                .map(ResolvedComposer::Existing)
                .ok_or_else(|| Error::composer_not_found(id));
        }

        if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
            return Ok(match self.db.find_composer_by_name(name)? {
                Some(composer) => ResolvedComposer::Existing(composer),
                None => ResolvedComposer::Pending(Composer::new(name)),
            });
        }

        existing
            .cloned()
            .map(ResolvedComposer::Existing)
            .ok_or(Error::MissingReference)
    }

    /// Create a composition, creating its composer first when the request
    /// names one that does not exist yet.
    pub fn create_composition(&self, request: &CompositionRequest) -> Result<Composition> {
        let resolved =
            self.resolve_composer(request.composer_id, request.composer_name(), None)?;

        if let (Some(name), Some(key_signature), ResolvedComposer::Existing(composer)) =
            (request.name(), request.key_signature()?, &resolved)
        {
            if self.db.composition_exists(name, key_signature, composer.id)? {
                log::debug!("Rejected duplicate composition '{name}' by {}", composer.name);
                return Err(Error::Conflict(format!(
                    "a composition named '{name}' in {key_signature} by {} already exists",
                    composer.name
                )));
            }
        }

        let pending = resolved.is_pending();
        let composition = request.to_composition(resolved.into_composer())?;

        self.db.in_transaction(|db| {
            if pending {
                db.insert_composer(&composition.composer)?;
            }
            db.insert_composition(&composition)
        })?;

        log::info!(
            "Created composition {} ('{}' by {}{})",
            composition.id,
            composition.name,
            composition.composer.name,
            if pending { ", new composer" } else { "" }
        );
        Ok(composition)
    }

    /// Apply a partial update to an existing composition.
    ///
    /// Only the fields the request carries are overwritten. When the merge
    /// changes nothing, the stored record is returned without a write.
    pub fn update_composition(
        &self,
        id: CompositionId,
        request: &CompositionRequest,
    ) -> Result<Composition> {
        let existing = self
            .db
            .get_composition(id)?
            .ok_or_else(|| Error::composition_not_found(id))?;

        let resolved = self.resolve_composer(
            request.composer_id,
            request.composer_name(),
            Some(&existing.composer),
        )?;
        let pending = resolved.is_pending();

        let mut merged = request.merge_into(&existing, resolved.into_composer())?;
        if merged == existing {
            log::debug!("Update of composition {id} changed nothing");
            return Ok(existing);
        }
        merged.updated_at = chrono::Utc::now();

        self.db.in_transaction(|db| {
            if pending {
                db.insert_composer(&merged.composer)?;
            }
            db.update_composition(&merged)
        })?;

        log::info!("Updated composition {id}");
        Ok(merged)
    }

    /// Delete a composition. Returns `false` when the id is unknown.
    pub fn delete_composition(&self, id: CompositionId) -> Result<bool> {
        let deleted = self.db.in_transaction(|db| db.delete_composition(id))?;
        if deleted {
            log::info!("Deleted composition {id}");
        }
        Ok(deleted)
    }

    pub fn get_composition(&self, id: CompositionId) -> Result<Option<Composition>> {
        self.db.get_composition(id)
    }

    /// List compositions matching every supplied filter.
    pub fn list_compositions(&self, filter: &CompositionFilter) -> Result<Vec<Composition>> {
        let predicate = build_predicate(filter)?;
        self.db.find_compositions(&predicate)
    }

    pub fn list_composers(&self) -> Result<Vec<Composer>> {
        self.db.list_composers()
    }

    pub fn get_composer(&self, id: ComposerId) -> Result<Option<Composer>> {
        self.db.get_composer(id)
    }

    /// Delete a composer together with all of its compositions.
    pub fn delete_composer(&self, id: ComposerId) -> Result<bool> {
        let deleted = self.db.in_transaction(|db| db.delete_composer(id))?;
        if deleted {
            log::info!("Deleted composer {id} and its compositions");
        }
        Ok(deleted)
    }
}

/// Turn the caller's filter bundle into a storage predicate.
///
/// Blank text filters are ignored. A key signature display name that names
/// no key fails the whole query.
pub fn build_predicate(filter: &CompositionFilter) -> Result<CompositionPredicate> {
    let mut predicate = CompositionPredicate {
        name_contains: non_blank(filter.name.as_deref()),
        format: filter.format,
        composer_name_contains: non_blank(filter.composer_name.as_deref()),
        ..CompositionPredicate::default()
    };

    if let Some(key_signature) = filter.key_signature {
        predicate.key_signatures.push(key_signature);
    }
    if let Some(label) = non_blank(filter.key_signature_display_name.as_deref()) {
        let key_signature = registry::parse_display_name::<KeySignature>(&label)
            .map_err(|e| Error::InvalidFilter(e.to_string()))?;
        predicate.key_signatures.push(key_signature);
    }

    Ok(predicate)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}
