pub mod token;

pub use token::{InMemoryTokenStore, TokenRepository, TokenStore};
