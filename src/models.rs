use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const WORDS_PER_MINUTE: usize = 200;
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

// Blog post as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub tags: Vec<String>,
    pub reading_time: u32, // minutes
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: String,
    pub views: u64,
}

impl Post {
    pub fn new(input: NewPost, author: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            slug: generate_slug(&input.title),
            reading_time: reading_time(&input.content),
            title: input.title,
            content: input.content,
            tags: input.tags,
            created_at: now,
            updated_at: now,
            author: author.to_string(),
            views: 0,
        }
    }
}

// Create request body
#[derive(Debug, Clone, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

// Update request body - only present fields change
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl PostPatch {
    pub fn apply(self, post: &mut Post, now: DateTime<Utc>) {
        if let Some(title) = self.title.filter(|t| !t.trim().is_empty()) {
            post.title = title;
        }
        if let Some(content) = self.content.filter(|c| !c.trim().is_empty()) {
            post.reading_time = reading_time(&content);
            post.content = content;
        }
        if let Some(tags) = self.tags {
            post.tags = tags;
        }
        post.updated_at = now;
    }
}

// List query string: ?page=&limit=&search=&tag=
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub search: Option<String>,
    pub tag: Option<String>,
}

impl PostQuery {
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn skip(&self) -> usize {
        (self.page() - 1) * self.limit()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_posts: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(query: &PostQuery, total_posts: usize) -> Self {
        let page = query.page();
        let total_pages = total_posts.div_ceil(query.limit());
        Self {
            current_page: page,
            total_pages,
            total_posts,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostList {
    pub posts: Vec<Post>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
pub struct SeedRequest {
    pub count: Option<usize>,
}

// "Hello, World!" -> "hello-world"
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

// Minutes to read at WORDS_PER_MINUTE, never zero
pub fn reading_time(content: &str) -> u32 {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}
