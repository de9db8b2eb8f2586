pub mod auth_provider;
pub mod pet;
pub mod user;
