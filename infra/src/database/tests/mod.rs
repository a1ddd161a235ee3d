mod connection_tests;
mod token_store_tests;
