use anyhow::Result;
use libsql::Connection;
use serde::{Deserialize, Serialize};

/// A row of the `bookmarks` table, exactly as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub rating: String,
}

/// A validated bookmark that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub rating: String,
}

/// The fields a PATCH is allowed to touch. `None` leaves the column alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookmarkPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub rating: Option<String>,
}

impl BookmarkPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.url.is_none() && self.description.is_none() && self.rating.is_none()
    }
}

pub struct Bookmarks<'a> {
    conn: &'a Connection,
}

impl<'a> Bookmarks<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub async fn list_all(&self) -> Result<Vec<Bookmark>> {
        let query = r#"
            SELECT id, title, url, description, rating
            FROM bookmarks
            ORDER BY id
        "#;

        let mut rows = self.conn.query(query, ()).await?;
        let mut bookmarks = Vec::new();

        while let Some(row) = rows.next().await? {
            bookmarks.push(self.row_to_bookmark(&row)?);
        }

        Ok(bookmarks)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Bookmark>> {
        let query = r#"
            SELECT id, title, url, description, rating
            FROM bookmarks WHERE id = ?
        "#;

        let mut rows = self.conn.query(query, libsql::params![id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(self.row_to_bookmark(&row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn insert(&self, input: NewBookmark) -> Result<Bookmark> {
        let query = r#"
            INSERT INTO bookmarks (title, url, description, rating)
            VALUES (?, ?, ?, ?)
            RETURNING id, title, url, description, rating
        "#;

        let mut rows = self
            .conn
            .query(
                query,
                libsql::params![input.title, input.url, input.description, input.rating],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(self.row_to_bookmark(&row)?)
        } else {
            anyhow::bail!("Failed to create bookmark")
        }
    }

    /// Applies the present fields of `patch` and returns the number of rows
    /// touched. Zero means there is no bookmark with that id.
    pub async fn update(&self, id: i64, patch: BookmarkPatch) -> Result<u64> {
        let mut updates = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(title) = patch.title {
            updates.push("title = ?");
            params.push(title.into());
        }
        if let Some(url) = patch.url {
            updates.push("url = ?");
            params.push(url.into());
        }
        if let Some(description) = patch.description {
            updates.push("description = ?");
            params.push(description.into());
        }
        if let Some(rating) = patch.rating {
            updates.push("rating = ?");
            params.push(rating.into());
        }

        if updates.is_empty() {
            return Ok(0);
        }

        params.push(id.into());
        let query = format!("UPDATE bookmarks SET {} WHERE id = ?", updates.join(", "));

        Ok(self.conn.execute(&query, params).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<u64> {
        let affected = self
            .conn
            .execute("DELETE FROM bookmarks WHERE id = ?", libsql::params![id])
            .await?;
        Ok(affected)
    }

    fn row_to_bookmark(&self, row: &libsql::Row) -> Result<Bookmark> {
        Ok(Bookmark {
            id: row.get(0)?,
            title: row.get(1)?,
            url: row.get(2)?,
            description: row.get(3)?,
            rating: row.get(4)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn new_bookmark(title: &str) -> NewBookmark {
        NewBookmark {
            title: title.to_string(),
            url: "https://example.com".to_string(),
            description: Some("text".to_string()),
            rating: "4.44".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let db = Database::open_in_memory().await.unwrap();
        let lib = Bookmarks::new(db.connection());

        let first = lib.insert(new_bookmark("first")).await.unwrap();
        let second = lib.insert(new_bookmark("second")).await.unwrap();

        assert_eq!(first.title, "first");
        assert_eq!(first.rating, "4.44");
        assert!(second.id > first.id);
        assert_eq!(lib.list_all().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reissued() {
        let db = Database::open_in_memory().await.unwrap();
        let lib = Bookmarks::new(db.connection());

        let first = lib.insert(new_bookmark("first")).await.unwrap();
        assert_eq!(lib.delete(first.id).await.unwrap(), 1);

        let second = lib.insert(new_bookmark("second")).await.unwrap();
        assert_ne!(second.id, first.id);
    }

    #[tokio::test]
    async fn get_by_id_returns_none_when_absent() {
        let db = Database::open_in_memory().await.unwrap();
        let lib = Bookmarks::new(db.connection());

        assert!(lib.get_by_id(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_touches_only_present_fields() {
        let db = Database::open_in_memory().await.unwrap();
        let lib = Bookmarks::new(db.connection());
        let created = lib.insert(new_bookmark("before")).await.unwrap();

        let patch = BookmarkPatch {
            title: Some("after".to_string()),
            ..Default::default()
        };
        assert_eq!(lib.update(created.id, patch).await.unwrap(), 1);

        let stored = lib.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(
            stored,
            Bookmark {
                title: "after".to_string(),
                ..created
            }
        );
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let db = Database::open_in_memory().await.unwrap();
        let lib = Bookmarks::new(db.connection());

        let patch = BookmarkPatch {
            rating: Some("1".to_string()),
            ..Default::default()
        };
        assert_eq!(lib.update(99, patch).await.unwrap(), 0);
        assert_eq!(lib.update(99, BookmarkPatch::default()).await.unwrap(), 0);
        assert_eq!(lib.delete(99).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_description_is_stored_as_null() {
        let db = Database::open_in_memory().await.unwrap();
        let lib = Bookmarks::new(db.connection());

        let created = lib
            .insert(NewBookmark {
                description: None,
                ..new_bookmark("bare")
            })
            .await
            .unwrap();

        let stored = lib.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.description, None);
    }
}
