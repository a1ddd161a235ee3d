//! Domain entities representing persisted token state.

pub mod token;


pub use token::{
    NewToken, TokenData, TokenId, TokenRecord, TokenType,
    TOKEN_ID_BYTES, TOKEN_ID_LENGTH,
};
