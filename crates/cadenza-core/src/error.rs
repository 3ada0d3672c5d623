use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A create request named neither a composer id nor a composer name.
    #[error("composer name or id is required")]
    MissingReference,

    #[error("{entity} not found for id {id}")]
    ReferenceNotFound { entity: &'static str, id: String },

    #[error("invalid composition: {0}")]
    InvalidComposition(String),

    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    pub(crate) fn composer_not_found(id: impl ToString) -> Self {
        Self::ReferenceNotFound {
            entity: "composer",
            id: id.to_string(),
        }
    }

    pub(crate) fn composition_not_found(id: impl ToString) -> Self {
        Self::ReferenceNotFound {
            entity: "composition",
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
