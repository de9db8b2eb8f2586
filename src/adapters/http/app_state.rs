use std::sync::Arc;

use crate::{
    application::use_cases::auth::AuthUseCases,
    application::use_cases::matches::MatchUseCases,
    application::use_cases::pet::PetUseCases,
    infra::config::AppConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth_use_cases: Arc<AuthUseCases>,
    pub pet_use_cases: Arc<PetUseCases>,
    pub match_use_cases: Arc<MatchUseCases>,
}
