//! In-process post store.

use crate::{
    error::StoreError,
    models::{Post, PostChanges, PostFields},
};
use chrono::{DateTime, Duration, Utc};
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

#[derive(Default)]
struct PostTable {
    last_id: i64,
    rows: BTreeMap<i64, Post>,
}

/// Thread-safe post table. Clones share the same rows.
#[derive(Clone, Default)]
pub struct PostStore {
    table: Arc<Mutex<PostTable>>,
}

/// Modification time for a mutation: now, but never at or before `previous`
fn advance_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

impl PostStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, PostTable>, StoreError> {
        self.table.lock().map_err(|_| StoreError::Poisoned)
    }

    /// All posts in ascending id order
    pub fn list(&self) -> Result<Vec<Post>, StoreError> {
        Ok(self.lock()?.rows.values().cloned().collect())
    }

    pub fn get(&self, id: i64) -> Result<Option<Post>, StoreError> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    pub fn create(&self, fields: PostFields) -> Result<Post, StoreError> {
        let mut table = self.lock()?;
        table.last_id += 1;

        let now = Utc::now();
        let post = Post {
            id: table.last_id,
            title: fields.title,
            content: fields.content,
            created_at: now,
            updated_at: now,
            is_published: fields.is_published,
        };
        table.rows.insert(post.id, post.clone());
        Ok(post)
    }

    /// Replace every mutable field. `None` when the post does not exist.
    pub fn replace(&self, id: i64, fields: PostFields) -> Result<Option<Post>, StoreError> {
        self.update(
            id,
            PostChanges {
                title: Some(fields.title),
                content: Some(fields.content),
                is_published: Some(fields.is_published),
            },
        )
    }

    /// Apply the supplied fields only. `None` when the post does not exist.
    pub fn update(&self, id: i64, changes: PostChanges) -> Result<Option<Post>, StoreError> {
        let mut table = self.lock()?;
        let Some(post) = table.rows.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(content) = changes.content {
            post.content = content;
        }
        if let Some(is_published) = changes.is_published {
            post.is_published = is_published;
        }
        post.updated_at = advance_timestamp(post.updated_at);

        Ok(Some(post.clone()))
    }

    /// Remove a post, returning whether it existed
    pub fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.lock()?.rows.remove(&id).is_some())
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(title: &str) -> PostFields {
        PostFields {
            title: title.to_string(),
            content: format!("{title} body"),
            is_published: false,
        }
    }

    #[test]
    fn test_create_sets_both_timestamps() {
        let store = PostStore::new();
        let post = store.create(fields("First")).unwrap();

        assert_eq!(post.id, 1);
        assert_eq!(post.created_at, post.updated_at);
        assert!(!post.is_published);
    }

    #[test]
    fn test_replace_advances_updated_at_only() {
        let store = PostStore::new();
        let original = store.create(fields("First")).unwrap();

        let replaced = store
            .replace(
                original.id,
                PostFields {
                    title: "Renamed".to_string(),
                    content: "New body".to_string(),
                    is_published: true,
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(replaced.title, "Renamed");
        assert_eq!(replaced.content, "New body");
        assert!(replaced.is_published);
        assert_eq!(replaced.created_at, original.created_at);
        assert!(replaced.updated_at > original.updated_at);
    }

    #[test]
    fn test_repeated_updates_stay_strictly_increasing() {
        let store = PostStore::new();
        let post = store.create(fields("First")).unwrap();

        let mut previous = post.updated_at;
        for _ in 0..50 {
            let updated = store.update(post.id, PostChanges::default()).unwrap().unwrap();
            assert!(updated.updated_at > previous);
            previous = updated.updated_at;
        }
    }

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let store = PostStore::new();
        let post = store.create(fields("First")).unwrap();

        let updated = store
            .update(
                post.id,
                PostChanges {
                    is_published: Some(true),
                    ..PostChanges::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "First");
        assert_eq!(updated.content, "First body");
        assert!(updated.is_published);
    }

    #[test]
    fn test_missing_post_operations() {
        let store = PostStore::new();
        assert!(store.get(42).unwrap().is_none());
        assert!(store.replace(42, fields("x")).unwrap().is_none());
        assert!(!store.delete(42).unwrap());
    }

    #[test]
    fn test_delete_removes_permanently_and_ids_are_not_reused() {
        let store = PostStore::new();
        let first = store.create(fields("First")).unwrap();
        assert!(store.delete(first.id).unwrap());
        assert!(store.get(first.id).unwrap().is_none());

        let second = store.create(fields("Second")).unwrap();
        assert_eq!(second.id, 2);
        assert_eq!(store.list().unwrap().len(), 1);
    }
}
