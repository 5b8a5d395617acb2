use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use super::handler;
use crate::handler::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookmarks", get(handler::list_bookmarks))
        .route("/bookmarks", post(handler::create_bookmark))
        .route("/bookmarks/", get(handler::list_bookmarks))
        .route("/bookmarks/", post(handler::create_bookmark))
        .route("/bookmarks/:id", get(handler::get_bookmark))
        .route("/bookmarks/:id", patch(handler::update_bookmark))
        .route("/bookmarks/:id", delete(handler::delete_bookmark))
}
