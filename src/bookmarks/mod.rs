//! Bookmarks Module
//!
//! Saved links with a title, URL, optional description and a numeric rating.
//!
//! # Features
//!
//! - CRUD over the `bookmarks` table through [`Bookmarks`]
//! - Input validation and sanitized output in [`validate`]
//! - Ready-to-use HTTP handlers and routes
//! - Database migrations included
//!
//! # Usage
//!
//! ```rust,ignore
//! use bookmarks::bookmarks;
//!
//! let app = Router::new()
//!     .nest("/api", bookmarks::routes())
//!     .with_state(app_state);
//!
//! let lib = bookmarks::Bookmarks::new(connection);
//! let all = lib.list_all().await?;
//! ```

mod handler;
mod repository;
mod routes;
pub mod validate;

pub use repository::*;
pub use routes::routes;
pub use validate::BookmarkView;

/// Returns the migrations for the bookmarks module.
pub fn migrations() -> &'static [(&'static str, &'static str)] {
    &[(
        "bookmarks_001_schema.sql",
        include_str!("migrations/001_schema.sql"),
    )]
}
