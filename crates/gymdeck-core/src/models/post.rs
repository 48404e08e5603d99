use serde::{Deserialize, Serialize};

use crate::utils::{format_date, strip_html, truncate};

/// Length of the body preview shown in the feed list
const PREVIEW_LEN: usize = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    #[serde(default, alias = "post_id")]
    pub id: Option<i64>,
    #[serde(default, alias = "author_name", alias = "posted_by")]
    pub author: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "content")]
    pub body: Option<String>,
    #[serde(default, alias = "posted_at")]
    pub created_at: Option<String>,
}

impl Post {
    pub fn author_display(&self) -> &str {
        self.author
            .as_deref()
            .filter(|a| !a.is_empty())
            .unwrap_or("(staff)")
    }

    pub fn date_display(&self) -> String {
        self.created_at
            .as_deref()
            .map(format_date)
            .unwrap_or_else(|| "-".to_string())
    }

    /// Post bodies arrive as rich text fragments; strip markup for the TUI
    pub fn body_text(&self) -> String {
        strip_html(self.body.as_deref().unwrap_or(""))
    }

    pub fn preview(&self) -> String {
        truncate(&self.body_text(), PREVIEW_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_post_with_aliases() {
        let json = r#"{"post_id": 3, "posted_by": "Dana Cho",
                       "title": "New yoga class",
                       "content": "<p>Starting <b>Monday</b> at 6pm</p>",
                       "posted_at": "2024-03-01T10:00:00Z"}"#;
        let p: Post = serde_json::from_str(json).expect("post should parse");
        assert_eq!(p.id, Some(3));
        assert_eq!(p.author_display(), "Dana Cho");
        assert_eq!(p.body_text(), "Starting Monday at 6pm");
        assert_eq!(p.date_display(), "Mar 01, 2024");
    }

    #[test]
    fn test_post_defaults() {
        let p: Post = serde_json::from_str(r#"{"title": "Closed Sunday"}"#)
            .expect("post should parse");
        assert_eq!(p.author_display(), "(staff)");
        assert_eq!(p.body_text(), "");
        assert_eq!(p.date_display(), "-");
    }
}
