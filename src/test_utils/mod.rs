//! Shared fixtures for HTTP-level and use-case tests.

pub mod app_state_builder;
pub mod auth_mocks;

pub use app_state_builder::TestAppStateBuilder;
pub use auth_mocks::*;
