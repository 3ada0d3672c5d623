pub mod composer;
pub mod composition;
pub mod ids;
pub mod request;

pub use composer::Composer;
pub use composition::Composition;
pub use ids::{ComposerId, CompositionId};
pub use request::{CompositionFilter, CompositionRequest};
