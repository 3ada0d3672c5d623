mod composers;
mod compositions;
mod health;
pub mod types;

pub use composers::{delete_composer, get_composer, list_composers};
pub use compositions::{
    create_composition, delete_composition, get_composition, list_compositions,
    update_composition,
};
pub use health::health;
