//! HTTP handlers for the bookmarks API

use axum::{
    Json,
    body::Bytes,
    extract::{OriginalUri, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::validate::{CreateBookmark, UpdateBookmark, serialize, validate_new, validate_patch};
use super::{BookmarkView, Bookmarks};
use crate::error::BookmarkError;
use crate::handler::AppState;

fn success<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Ids are storage-assigned integers; anything else names no bookmark.
fn parse_id(raw: &str) -> Option<i64> {
    raw.parse().ok()
}

pub async fn list_bookmarks(State(state): State<AppState>) -> Result<Response, BookmarkError> {
    let lib = Bookmarks::new(state.db.connection());

    let bookmarks: Vec<BookmarkView> = lib.list_all().await?.into_iter().map(serialize).collect();

    tracing::info!("listed {} bookmarks", bookmarks.len());
    Ok(success(bookmarks))
}

pub async fn get_bookmark(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, BookmarkError> {
    let lib = Bookmarks::new(state.db.connection());

    let bookmark = match parse_id(&raw_id) {
        Some(id) => lib.get_by_id(id).await?,
        None => None,
    };

    match bookmark {
        Some(bookmark) => Ok(success(serialize(bookmark))),
        None => {
            tracing::error!("Bookmark with id {} not found", raw_id);
            Err(BookmarkError::NotFound(raw_id))
        }
    }
}

/// Validation failures answer 404 with a plain-text reason, unlike PATCH.
/// The body is read raw so that a missing or mistyped body is reported by
/// the validator instead of the JSON extractor.
pub async fn create_bookmark(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    body: Bytes,
) -> Result<Response, BookmarkError> {
    let input = match CreateBookmark::from_body(&body).and_then(validate_new) {
        Ok(input) => input,
        Err(e) => {
            tracing::error!(field = e.field(), "rejected bookmark: {}", e);
            return Ok((StatusCode::NOT_FOUND, e.to_string()).into_response());
        }
    };

    let lib = Bookmarks::new(state.db.connection());
    let bookmark = lib.insert(input).await?;

    tracing::info!("Bookmark with id {} created", bookmark.id);

    let location = format!("{}/{}", uri.path().trim_end_matches('/'), bookmark.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(serialize(bookmark)),
    )
        .into_response())
}

pub async fn update_bookmark(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Response, BookmarkError> {
    let patch = UpdateBookmark::from_body(&body).and_then(validate_patch).inspect_err(|e| {
        tracing::error!("rejected update of bookmark {}: {}", raw_id, e);
    })?;

    let Some(id) = parse_id(&raw_id) else {
        tracing::error!("Bookmark with id {} not found", raw_id);
        return Err(BookmarkError::NotFound(raw_id));
    };

    let lib = Bookmarks::new(state.db.connection());
    if lib.update(id, patch).await? == 0 {
        tracing::error!("Bookmark with id {} not found", id);
        return Err(BookmarkError::NotFound(raw_id));
    }

    tracing::info!("Bookmark with id {} updated", id);
    Ok(no_content())
}

pub async fn delete_bookmark(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, BookmarkError> {
    let lib = Bookmarks::new(state.db.connection());

    let deleted = match parse_id(&raw_id) {
        Some(id) => lib.delete(id).await?,
        None => 0,
    };

    if deleted == 0 {
        tracing::error!("Bookmark with id {} not found", raw_id);
        return Ok((StatusCode::NOT_FOUND, "Bookmark not found").into_response());
    }

    tracing::info!("Bookmark with id {} was deleted", raw_id);
    Ok(no_content())
}
