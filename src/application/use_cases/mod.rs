pub mod auth;
pub mod matches;
pub mod oauth;
pub mod pet;
