//! Domain services.

pub mod token_id;

pub use token_id::{EntropyDraw, EntropySource, TokenIdGenerator};
