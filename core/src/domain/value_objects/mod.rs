//! Value objects describing token lookups.

pub mod token_query;

pub use token_query::{FilterValue, SortDirection, TokenField, TokenFilter, TokenQuery};
