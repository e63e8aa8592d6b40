//! Post storage
//!
//! The document database is an external collaborator; handlers only see the
//! `PostRepository` trait. `MemoryPostStore` backs standalone runs and tests.

use crate::models::{Post, PostPatch, PostQuery};
use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("slug already exists: {0}")]
    DuplicateSlug(String),

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Find / insert / update / delete by filter over the posts collection.
#[trait_variant::make(PostRepository: Send)]
pub trait LocalPostRepository {
    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Post>>;

    /// Newest first. Returns the requested page and the total match count.
    async fn list(&self, query: &PostQuery) -> StoreResult<(Vec<Post>, usize)>;

    async fn insert(&self, post: Post) -> StoreResult<Post>;

    /// Returns `false` when no post has this slug.
    async fn update_by_slug(&self, slug: &str, patch: PostPatch) -> StoreResult<bool>;

    async fn delete_by_slug(&self, slug: &str) -> StoreResult<bool>;

    /// Bump the durable view counter. Returns the new value, if the post exists.
    async fn increment_views(&self, id: Uuid) -> StoreResult<Option<u64>>;

    async fn count(&self) -> StoreResult<usize>;
}

#[derive(Debug, Default)]
pub struct MemoryPostStore {
    posts: RwLock<Vec<Post>>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_query(post: &Post, query: &PostQuery) -> bool {
    if let Some(tag) = query.tag.as_deref().filter(|t| !t.is_empty()) {
        if !post.tags.iter().any(|t| t == tag) {
            return false;
        }
    }
    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let needle = search.to_lowercase();
        return post.title.to_lowercase().contains(&needle)
            || post.content.to_lowercase().contains(&needle);
    }
    true
}

impl PostRepository for MemoryPostStore {
    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Post>> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.slug == slug).cloned())
    }

    async fn list(&self, query: &PostQuery) -> StoreResult<(Vec<Post>, usize)> {
        let posts = self.posts.read().await;
        let mut found: Vec<&Post> = posts.iter().filter(|p| matches_query(p, query)).collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = found.len();
        let page = found
            .into_iter()
            .skip(query.skip())
            .take(query.limit())
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn insert(&self, post: Post) -> StoreResult<Post> {
        let mut posts = self.posts.write().await;
        if posts.iter().any(|p| p.slug == post.slug) {
            return Err(StoreError::DuplicateSlug(post.slug));
        }
        posts.push(post.clone());
        Ok(post)
    }

    async fn update_by_slug(&self, slug: &str, patch: PostPatch) -> StoreResult<bool> {
        let mut posts = self.posts.write().await;
        match posts.iter_mut().find(|p| p.slug == slug) {
            Some(post) => {
                patch.apply(post, Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_slug(&self, slug: &str) -> StoreResult<bool> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|p| p.slug != slug);
        Ok(posts.len() != before)
    }

    async fn increment_views(&self, id: Uuid) -> StoreResult<Option<u64>> {
        let mut posts = self.posts.write().await;
        Ok(posts.iter_mut().find(|p| p.id == id).map(|post| {
            post.views += 1;
            post.views
        }))
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.posts.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryPostStore, PostRepository, StoreError};
    use crate::models::{NewPost, Post, PostPatch, PostQuery};
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn post(title: &str, tags: &[&str], age_minutes: i64) -> Post {
        Post::new(
            NewPost {
                title: title.to_string(),
                content: format!("{title} body"),
                tags: tags.iter().map(|t| t.to_string()).collect(),
            },
            "admin",
            Utc::now() - Duration::minutes(age_minutes),
        )
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_slug() {
        let store = MemoryPostStore::new();
        store.insert(post("Hello World", &[], 0)).await.unwrap();

        let result = store.insert(post("hello world!", &[], 0)).await;
        assert!(matches!(result, Err(StoreError::DuplicateSlug(slug)) if slug == "hello-world"));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_newest_first_with_filters() {
        let store = MemoryPostStore::new();
        store.insert(post("Old Rust", &["rust"], 30)).await.unwrap();
        store.insert(post("New Rust", &["rust"], 1)).await.unwrap();
        store.insert(post("Css Tricks", &["css"], 10)).await.unwrap();

        let (all, total) = store.list(&PostQuery::default()).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(all[0].slug, "new-rust");
        assert_eq!(all[2].slug, "old-rust");

        let by_tag = PostQuery {
            tag: Some("rust".into()),
            ..Default::default()
        };
        let (found, total) = store.list(&by_tag).await.unwrap();
        assert_eq!(total, 2);
        assert!(found.iter().all(|p| p.tags.contains(&"rust".to_string())));

        let by_search = PostQuery {
            search: Some("TRICKS".into()),
            ..Default::default()
        };
        let (found, total) = store.list(&by_search).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(found[0].slug, "css-tricks");
    }

    #[tokio::test]
    async fn test_list_pages() {
        let store = MemoryPostStore::new();
        for i in 0..5 {
            store.insert(post(&format!("Post {i}"), &[], i)).await.unwrap();
        }

        let query = PostQuery {
            page: Some(2),
            limit: Some(2),
            ..Default::default()
        };
        let (page, total) = store.list(&query).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].slug, "post-2");
    }

    #[tokio::test]
    async fn test_update_delete_and_views() {
        let store = MemoryPostStore::new();
        let created = store.insert(post("Counted", &[], 0)).await.unwrap();

        assert_eq!(store.increment_views(created.id).await.unwrap(), Some(1));
        assert_eq!(store.increment_views(created.id).await.unwrap(), Some(2));
        assert_eq!(store.increment_views(Uuid::new_v4()).await.unwrap(), None);

        let patch = PostPatch {
            tags: Some(vec!["updated".into()]),
            ..Default::default()
        };
        assert!(store.update_by_slug("counted", patch.clone()).await.unwrap());
        assert!(!store.update_by_slug("missing", patch).await.unwrap());

        let stored = store.find_by_slug("counted").await.unwrap().unwrap();
        assert_eq!(stored.tags, vec!["updated".to_string()]);
        assert_eq!(stored.views, 2);

        assert!(store.delete_by_slug("counted").await.unwrap());
        assert!(!store.delete_by_slug("counted").await.unwrap());
        assert!(store.find_by_slug("counted").await.unwrap().is_none());
    }
}
