//! Community board store: posts and their comments.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use tracing::{debug, info};

use crate::db::{open_connection, prepare_store_path, row_exists, text_column};
use crate::error::{Error, Result};
use crate::pagination::Page;

/// Category assigned to posts created without one.
pub const DEFAULT_CATEGORY: &str = "general";

/// Category filter value that disables filtering.
pub const ALL_CATEGORIES: &str = "all";

/// Characters of content kept in list views.
pub const PREVIEW_CHARS: usize = 100;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    author TEXT NOT NULL,
    location TEXT,
    latitude REAL,
    longitude REAL,
    category TEXT DEFAULT 'general',
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id INTEGER NOT NULL,
    content TEXT NOT NULL,
    author TEXT NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (post_id) REFERENCES posts (id)
);
"#;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub category: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Post {
    /// The post with its content shortened for list views.
    pub fn into_preview(mut self) -> Self {
        self.content = preview(&self.content);
        self
    }
}

/// First [`PREVIEW_CHARS`] characters followed by `...`, or the whole text
/// when it is short enough.
pub fn preview(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub content: String,
    pub author: String,
    pub created_at: String,
}

/// A post with every comment, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub comments: Vec<Comment>,
}

/// One page of posts plus the size of the filtered collection.
#[derive(Debug, Clone, PartialEq)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total_count: i64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewComment {
    pub content: String,
    pub author: String,
}

/// Handle to the community database file.
#[derive(Debug, Clone)]
pub struct CommunityStore {
    path: PathBuf,
}

impl CommunityStore {
    /// Open the store at `path`, creating the schema if needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self { path: path.into() };
        prepare_store_path(&store.path)?;
        store.init_schema()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn connect(&self) -> Result<Connection> {
        open_connection(&self.path)
    }

    pub fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(SCHEMA)?;
        info!(path = %self.path.display(), "community schema ready");
        Ok(())
    }

    /// Newest posts first. `category` of `None` or [`ALL_CATEGORIES`] lists
    /// every category.
    pub fn list_posts(&self, category: Option<&str>, page: Page) -> Result<PostPage> {
        let conn = self.connect()?;
        let category = category.filter(|c| *c != ALL_CATEGORIES);
        let limit = page.per_page() as i64;
        let offset = page.offset();

        let (posts, total_count) = match category {
            Some(category) => {
                let mut stmt = conn.prepare(
                    "SELECT * FROM posts WHERE category = ?1
                     ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3",
                )?;
                let posts = stmt
                    .query_map(params![category, limit, offset], row_to_post)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                let total: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM posts WHERE category = ?1",
                    [category],
                    |row| row.get(0),
                )?;
                (posts, total)
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT * FROM posts ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
                )?;
                let posts = stmt
                    .query_map(params![limit, offset], row_to_post)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                let total: i64 = conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
                (posts, total)
            }
        };

        Ok(PostPage { posts, total_count })
    }

    pub fn create_post(&self, new: &NewPost) -> Result<i64> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO posts (title, content, author, location, latitude, longitude, category)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                new.title,
                new.content,
                new.author,
                new.location,
                new.latitude,
                new.longitude,
                new.category.as_deref().unwrap_or(DEFAULT_CATEGORY),
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(post_id = id, "post created");
        Ok(id)
    }

    /// A post with full content and its comments.
    pub fn get_post(&self, id: i64) -> Result<PostDetail> {
        let conn = self.connect()?;
        let post = conn
            .query_row("SELECT * FROM posts WHERE id = ?1", [id], row_to_post)
            .optional()?
            .ok_or(Error::PostNotFound { id })?;

        let mut stmt = conn.prepare(
            "SELECT * FROM comments WHERE post_id = ?1 ORDER BY created_at ASC, id ASC",
        )?;
        let comments = stmt
            .query_map([id], row_to_comment)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(PostDetail { post, comments })
    }

    /// Attach a comment to an existing post and return its id. Nothing is
    /// written if the post does not exist.
    pub fn add_comment(&self, post_id: i64, new: &NewComment) -> Result<i64> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        if !row_exists(&tx, "posts", post_id)? {
            return Err(Error::PostNotFound { id: post_id });
        }
        tx.execute(
            "INSERT INTO comments (post_id, content, author) VALUES (?1, ?2, ?3)",
            params![post_id, new.content, new.author],
        )?;
        let comment_id = tx.last_insert_rowid();
        tx.commit()?;
        debug!(post_id, comment_id, "comment added");
        Ok(comment_id)
    }
}

fn row_to_post(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        author: row.get("author")?,
        location: row.get("location")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        category: row
            .get::<_, Option<String>>("category")?
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        created_at: text_column(row, "created_at")?.unwrap_or_default(),
        updated_at: text_column(row, "updated_at")?.unwrap_or_default(),
    })
}

fn row_to_comment(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get("id")?,
        post_id: row.get("post_id")?,
        content: row.get("content")?,
        author: row.get("author")?,
        created_at: text_column(row, "created_at")?.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_is_untouched() {
        assert_eq!(preview("hello"), "hello");
        let exactly = "a".repeat(PREVIEW_CHARS);
        assert_eq!(preview(&exactly), exactly);
    }

    #[test]
    fn long_content_is_cut_at_100_chars() {
        let long = "b".repeat(PREVIEW_CHARS + 1);
        let cut = preview(&long);
        assert_eq!(cut.len(), PREVIEW_CHARS + 3);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn preview_counts_characters_not_bytes() {
        let long = "안".repeat(150);
        let cut = preview(&long);
        assert_eq!(cut.chars().count(), PREVIEW_CHARS + 3);
        assert!(cut.starts_with("안안"));
    }
}
