pub mod extensions;
pub mod mint;
pub mod token_account;
pub mod token_metadata;
