//! Input rules for bookmark writes and the sanitized output shape.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::{Bookmark, BookmarkPatch, NewBookmark};
use crate::error::ValidationError;

/// POST body. Every field is optional here so that a missing field is
/// reported by [`validate_new`] rather than by body parsing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreateBookmark {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub rating: Option<JsonValue>,
}

/// PATCH body. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpdateBookmark {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub rating: Option<JsonValue>,
}

type JsonObject = serde_json::Map<String, JsonValue>;

/// Reads a raw request body as a JSON object. An absent body reads as `{}`.
fn parse_object(body: &[u8]) -> Result<JsonObject, ValidationError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(JsonObject::new());
    }

    match serde_json::from_slice(body) {
        Ok(JsonValue::Object(map)) => Ok(map),
        _ => Err(ValidationError::MalformedBody),
    }
}

fn text_field(map: &mut JsonObject, field: &'static str) -> Result<Option<String>, ValidationError> {
    match map.remove(field) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s)),
        Some(_) => Err(ValidationError::NotText { field }),
    }
}

impl CreateBookmark {
    pub fn from_body(body: &[u8]) -> Result<Self, ValidationError> {
        let mut map = parse_object(body)?;
        Ok(CreateBookmark {
            title: text_field(&mut map, "title")?,
            url: text_field(&mut map, "url")?,
            description: text_field(&mut map, "description")?,
            rating: map.remove("rating"),
        })
    }
}

impl UpdateBookmark {
    pub fn from_body(body: &[u8]) -> Result<Self, ValidationError> {
        let mut map = parse_object(body)?;
        Ok(UpdateBookmark {
            title: text_field(&mut map, "title")?,
            url: text_field(&mut map, "url")?,
            description: text_field(&mut map, "description")?,
            rating: map.remove("rating"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkView {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub rating: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Returns the textual form of a rating if it names a finite number.
/// Strings keep their spelling minus surrounding whitespace, numbers use
/// their JSON spelling.
fn rating_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => {
            let text = s.trim();
            let parsed = text.parse::<f64>().ok()?;
            parsed.is_finite().then(|| text.to_string())
        }
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn is_blank(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

pub fn validate_new(input: CreateBookmark) -> Result<NewBookmark, ValidationError> {
    let title = non_empty(input.title).ok_or(ValidationError::Missing { field: "title" })?;
    let url = non_empty(input.url).ok_or(ValidationError::Missing { field: "url" })?;

    let rating = match input.rating.as_ref() {
        None => return Err(ValidationError::Missing { field: "rating" }),
        Some(value) if is_blank(value) => return Err(ValidationError::Missing { field: "rating" }),
        Some(value) => rating_text(value).ok_or(ValidationError::Invalid { field: "rating" })?,
    };

    Ok(NewBookmark {
        title,
        url,
        description: non_empty(input.description),
        rating,
    })
}

pub fn validate_patch(input: UpdateBookmark) -> Result<BookmarkPatch, ValidationError> {
    let rating = match input.rating.as_ref() {
        Some(value) if !is_blank(value) => {
            Some(rating_text(value).ok_or(ValidationError::Invalid { field: "rating" })?)
        }
        _ => None,
    };

    let patch = BookmarkPatch {
        title: non_empty(input.title),
        url: non_empty(input.url),
        description: non_empty(input.description),
        rating,
    };

    if patch.is_empty() {
        return Err(ValidationError::EmptyPatch);
    }

    Ok(patch)
}

/// Neutralizes markup so stored text cannot be rendered as HTML.
///
/// Attribute payloads such as `onerror=` are harmless only because the tag
/// around them is escaped; letting any tag through unescaped would need
/// attribute filtering as well.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn serialize(bookmark: Bookmark) -> BookmarkView {
    BookmarkView {
        id: bookmark.id,
        title: sanitize(&bookmark.title),
        url: sanitize(&bookmark.url),
        description: bookmark.description.as_deref().map(sanitize),
        rating: sanitize(&bookmark.rating),
    }
}
