pub mod attachments;
pub mod itinerary;
pub mod trips;

use axum::Router;
use tower_http::services::ServeDir;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(trips::router())
        .merge(itinerary::router())
        .merge(attachments::router())
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
}
