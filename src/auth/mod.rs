pub mod credentials;
pub mod role;
pub mod token;
pub mod token_cache;
pub mod token_provider;
