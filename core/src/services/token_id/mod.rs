//! Token identifier generation
//!
//! Identifiers are drawn from an ordered chain of entropy sources, strongest
//! first. A source is accepted only when it returns exactly
//! [`TOKEN_ID_BYTES`](crate::domain::TOKEN_ID_BYTES) bytes and reports itself
//! cryptographically strong.

mod entropy;
mod generator;


pub use entropy::{
    default_sources, weak_token_id, DeviceSource, EntropyDraw, EntropySource, OsRngSource,
    ThreadRngSource,
};
pub use generator::TokenIdGenerator;
