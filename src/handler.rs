use std::sync::Arc;

use axum::{Json, response::IntoResponse};

use tracing::info;

use crate::api::APIResponse;
use crate::config::Environment;
use crate::db::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub environment: Environment,
}

impl AppState {
    pub fn new(db: Arc<Database>, environment: Environment) -> Self {
        AppState { db, environment }
    }
}

pub async fn root() -> &'static str {
    "Hello, world!"
}

pub async fn healthcheck() -> impl IntoResponse {
    info!("got healthcheck request");
    Json(APIResponse::new("ok"))
}
