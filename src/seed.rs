use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;
use crate::models::{Post, generate_slug, reading_time};
use crate::store::{PostRepository, StoreError, StoreResult};

pub const DEFAULT_SEED_COUNT: usize = 1000;
pub const MAX_SEED_COUNT: usize = 1000;

const SAMPLE_TITLES: [&str; 10] = [
    "Getting Started with Axum",
    "Building Scalable Web Services",
    "Document Store Best Practices",
    "Rust Tips and Tricks",
    "Web Performance Optimization",
    "Modern CSS Techniques",
    "API Design Principles",
    "Security in Web Applications",
    "State Management on the Server",
    "Server-Side Rendering Explained",
];

const SAMPLE_TAGS: [&str; 15] = [
    "rust", "axum", "tokio", "database", "api", "css", "html", "security", "performance",
    "frontend", "backend", "fullstack", "webdev", "async", "testing",
];

const SAMPLE_CONTENT: &str = "\
# Introduction

This guide covers a few practical aspects of building web services. We look at
techniques that hold up in production.

## Key Concepts

- **Performance**: measure before optimizing
- **Security**: authenticate writes and validate input
- **Scalability**: keep hot paths free of blocking I/O
- **Maintainability**: small modules with clear seams

## Conclusion

These habits make services easier to run and to change.
";

// Fill the store up to `count` posts with samples spread over the past year.
// Sample slugs end in a running index; indices whose slug is already taken
// are skipped. Returns how many were inserted.
pub async fn seed_posts<S: PostRepository>(store: &S, count: usize, author: &str) -> StoreResult<usize> {
    let count = count.min(MAX_SEED_COUNT);
    let existing = store.count().await?;
    if existing >= count {
        tracing::info!(existing, "store already seeded");
        return Ok(0);
    }

    let needed = count - existing;
    let now = Utc::now();
    let minutes_per_post = 365 * 24 * 60 / count as i64;
    let mut inserted = 0;
    let mut i = existing;

    // every skip lands on a distinct stored post, so this ends
    while inserted < needed {
        let created_at = now - Duration::minutes(minutes_per_post * (needed - inserted) as i64);
        let post = sample_post(i, author, created_at);
        match store.insert(post).await {
            Ok(_) => inserted += 1,
            Err(StoreError::DuplicateSlug(slug)) => {
                tracing::debug!(%slug, "sample slug taken, skipping");
            }
            Err(e) => return Err(e),
        }
        i += 1;
    }

    tracing::info!(inserted, total = count, "seeded sample posts");
    Ok(inserted)
}

fn sample_post(i: usize, author: &str, created_at: DateTime<Utc>) -> Post {
    let title = format!(
        "{} - Part {}",
        SAMPLE_TITLES[i % SAMPLE_TITLES.len()],
        i / SAMPLE_TITLES.len() + 1
    );
    let tags = (0..=i % 4)
        .map(|k| SAMPLE_TAGS[(i * 7 + k * 3) % SAMPLE_TAGS.len()].to_string())
        .collect();

    Post {
        id: Uuid::new_v4(),
        slug: format!("{}-{}", generate_slug(&title), i),
        title,
        content: SAMPLE_CONTENT.to_string(),
        tags,
        reading_time: reading_time(SAMPLE_CONTENT),
        created_at,
        updated_at: created_at,
        author: author.to_string(),
        views: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PostQuery;
    use crate::store::MemoryPostStore;

    #[tokio::test]
    async fn test_seed_fills_up_to_count() {
        let store = MemoryPostStore::new();

        assert_eq!(seed_posts(&store, 25, "System").await.unwrap(), 25);
        assert_eq!(store.count().await.unwrap(), 25);

        // already there
        assert_eq!(seed_posts(&store, 10, "System").await.unwrap(), 0);
        assert_eq!(seed_posts(&store, 30, "System").await.unwrap(), 5);
        assert_eq!(store.count().await.unwrap(), 30);
    }

    #[tokio::test]
    async fn test_seeded_posts_are_newest_last_index() {
        let store = MemoryPostStore::new();
        seed_posts(&store, 12, "System").await.unwrap();

        let (posts, _) = store.list(&PostQuery::default()).await.unwrap();
        assert_eq!(posts[0].slug, "building-scalable-web-services-part-2-11");
        assert!(posts.iter().all(|p| !p.tags.is_empty()));
    }

    #[tokio::test]
    async fn test_top_up_after_delete_skips_taken_slugs() {
        let store = MemoryPostStore::new();
        seed_posts(&store, 5, "System").await.unwrap();

        assert!(store.delete_by_slug("building-scalable-web-services-part-1-1").await.unwrap());
        assert_eq!(store.count().await.unwrap(), 4);

        assert_eq!(seed_posts(&store, 5, "System").await.unwrap(), 1);
        assert_eq!(store.count().await.unwrap(), 5);
        assert!(store.find_by_slug("modern-css-techniques-part-1-5").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_top_up_with_user_posts_present() {
        let store = MemoryPostStore::new();
        // same slug the first top-up index would produce
        let mine = sample_post(1, "Editor", Utc::now());
        store.insert(mine).await.unwrap();

        assert_eq!(seed_posts(&store, 3, "System").await.unwrap(), 2);
        assert_eq!(store.count().await.unwrap(), 3);
    }
}
