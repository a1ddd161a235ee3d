//! Token persistence: the store boundary, the repository built on it and an
//! in-memory store.

mod r#trait;
pub use r#trait::TokenStore;

mod repository;
pub use repository::TokenRepository;

mod memory;
pub use memory::InMemoryTokenStore;

#[cfg(test)]
pub mod mock;
#[cfg(test)]
pub use mock::UnavailableTokenStore;

#[cfg(test)]
mod tests;
