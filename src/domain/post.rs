//! Post record fetched from the remote data source.

use serde::{Deserialize, Serialize};

/// One record of the remote post list.
///
/// Only `id`, `title` and `body` are read; any other field in the payload
/// (`userId` for the default source) is ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub body: String,
}

impl Post {
    #[must_use]
    pub fn new(id: i64, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
        }
    }

    /// Returns whether the lowercased `needle` occurs in the title or the body.
    ///
    /// The caller lowercases the needle once per filter pass; the haystacks are
    /// lowercased here. An empty needle matches every post.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.body.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_unknown_fields() {
        let json = r#"{"userId": 1, "id": 7, "title": "t", "body": "b"}"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post, Post::new(7, "t", "b"));
    }

    #[test]
    fn matches_title_or_body_case_insensitively() {
        let post = Post::new(1, "Rust Ownership", "borrowing RULES");
        assert!(post.matches_lowercase("ownership"));
        assert!(post.matches_lowercase("rules"));
        assert!(post.matches_lowercase(""));
        assert!(!post.matches_lowercase("lifetimes"));
    }
}
