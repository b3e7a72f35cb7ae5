use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

const DISPLAY_LENGTH: usize = 20;
const EXCERPT_WORDS: usize = 10;
const DATE_FORMAT: &str = "%d %B %Y, %H:%M";
const UNKNOWN_LOCATION: &str = "Planet Earth";

fn truncate_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl User {
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Category: {}", truncate_chars(&self.title, DISPLAY_LENGTH))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Location: {}", truncate_chars(&self.name, DISPLAY_LENGTH))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: i64,
    pub location_id: Option<i64>,
    pub category_id: Option<i64>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Post: {}", truncate_chars(&self.title, DISPLAY_LENGTH))
    }
}

/// A visible post joined with its author, category and location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostDetail {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub author: User,
    pub category: Category,
    #[serde(serialize_with = "serialize_published_location")]
    pub location: Option<Location>,
}

fn serialize_published_location<S: Serializer>(
    location: &Option<Location>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    location
        .as_ref()
        .filter(|location| location.is_published)
        .serialize(serializer)
}

impl PostDetail {
    pub fn new(post: Post, author: User, category: Category, location: Option<Location>) -> Self {
        Self {
            id: post.id,
            title: post.title,
            text: post.text,
            pub_date: post.pub_date,
            is_published: post.is_published,
            created_at: post.created_at,
            author,
            category,
            location,
        }
    }

    pub fn excerpt(&self, words: usize) -> String {
        let mut iter = self.text.split_whitespace();
        let head: Vec<&str> = iter.by_ref().take(words).collect();
        if iter.next().is_some() {
            format!("{}...", head.join(" "))
        } else {
            head.join(" ")
        }
    }

    pub fn card_excerpt(&self) -> String {
        self.excerpt(EXCERPT_WORDS)
    }

    pub fn paragraphs(&self) -> Vec<String> {
        self.text
            .replace("\r\n", "\n")
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn location_name(&self) -> &str {
        match &self.location {
            Some(location) if location.is_published => &location.name,
            _ => UNKNOWN_LOCATION,
        }
    }

    pub fn pub_date_display(&self) -> String {
        self.pub_date.format(DATE_FORMAT).to_string()
    }
}

impl fmt::Display for PostDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Post: {}", truncate_chars(&self.title, DISPLAY_LENGTH))
    }
}
