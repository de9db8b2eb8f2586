pub mod auth;
pub mod chats;
pub mod health;
pub mod matches;
pub mod pets;

use axum::Router;

use crate::adapters::http::app_state::AppState;

pub fn router(production: bool) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router(production))
        .nest("/pets", pets::router())
        .nest("/matches", matches::router())
        .nest("/chats", chats::router())
        .merge(health::router())
}
