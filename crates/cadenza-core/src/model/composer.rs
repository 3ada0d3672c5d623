use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::ComposerId;

/// The named creator of one or more compositions.
///
/// A composer's name never changes after creation. Deleting a composer
/// deletes every composition it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composer {
    pub id: ComposerId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Composer {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ComposerId::new(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
