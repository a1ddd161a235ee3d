//! Domain layer containing token entities and query value objects.

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
