use serde::{Deserialize, Serialize};

use super::{PostId, UserId};

const EXCERPT_CHARS: usize = 100;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub body: String,
    pub user_id: UserId,
}

impl Post {
    /// First hundred characters of the body, always followed by `...`
    pub fn excerpt(&self) -> String {
        let mut excerpt: String = self.body.chars().take(EXCERPT_CHARS).collect();
        excerpt.push_str("...");
        excerpt
    }

    /// `needle` must already be lowercase
    pub fn mentions(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.body.to_lowercase().contains(needle)
    }
}

/// Body of `POST /posts`
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub user_id: UserId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_api_shape() {
        let post: Post = serde_json::from_str(
            r#"{"userId":1,"id":3,"title":"ea molestias","body":"et iusto sed"}"#,
        )
        .unwrap();
        assert_eq!(post.id, 3);
        assert_eq!(post.user_id, 1);
    }

    #[test]
    fn new_post_uses_camel_case() {
        let body = serde_json::to_value(NewPost {
            title: "t".into(),
            body: "b".into(),
            user_id: 4,
        })
        .unwrap();
        assert_eq!(body["userId"], 4);
    }

    #[test]
    fn excerpt_cuts_on_chars() {
        let post = Post {
            id: 1,
            title: String::new(),
            body: "é".repeat(150),
            user_id: 1,
        };
        assert_eq!(post.excerpt().chars().count(), 103);
    }

    #[test]
    fn mentions_title_or_body() {
        let post = Post {
            id: 1,
            title: "Sunt Aut".into(),
            body: "quia et suscipit".into(),
            user_id: 1,
        };
        assert!(post.mentions("sunt"));
        assert!(post.mentions("suscipit"));
        assert!(!post.mentions("nesciunt"));
    }
}
