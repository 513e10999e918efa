use crate::models::comment::Comment;
use crate::models::media::PhotoUpload;
use crate::utils::serde_helpers::record_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// One news article with its embedded photo gallery and comment tree.
/// Gallery entries and comments are owned by the article and persisted
/// atomically with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct News {
    #[serde(with = "record_id")]
    pub id: String,
    pub title: String,
    pub category: String,
    /// Visibility flag, 0 or 1. Articles default to visible.
    pub is_visible: i64,
    pub viewer: i64,
    #[serde(default)]
    pub photos_description: Vec<PhotoEntry>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl News {
    pub fn new(title: &str, category: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            category: category.to_string(),
            is_visible: 1,
            viewer: 0,
            photos_description: Vec::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn find_comment_mut(&mut self, comment_id: &str) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|c| c.id == comment_id)
    }

    /// Removes the comment with the given id. Returns false when no comment
    /// matched (a no-op, not an error).
    pub fn remove_comment(&mut self, comment_id: &str) -> bool {
        let before = self.comments.len();
        self.comments.retain(|c| c.id != comment_id);
        self.comments.len() != before
    }
}

/// One photo+description pair in the gallery, addressed by position.
/// `photo` and `photo_cloudinary_id` are set and cleared together; the
/// description may exist without a photo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoEntry {
    pub photo: String,
    pub photo_cloudinary_id: String,
    pub description: String,
}

impl PhotoEntry {
    pub fn description_only(description: &str) -> Self {
        Self {
            photo: String::new(),
            photo_cloudinary_id: String::new(),
            description: description.to_string(),
        }
    }

    pub fn has_photo(&self) -> bool {
        !self.photo_cloudinary_id.is_empty()
    }

    pub fn clear_photo(&mut self) {
        self.photo.clear();
        self.photo_cloudinary_id.clear();
    }
}

/// Multipart payload of POST /api/news.
#[derive(Debug, Default)]
pub struct CreateNewsForm {
    pub title: Option<String>,
    pub category: Option<String>,
    pub descriptions: Vec<String>,
    pub photos: Vec<PhotoUpload>,
}

/// Multipart payload of PUT /api/news/:id. Index lists address positions in
/// the gallery as it stands when the corresponding step runs.
#[derive(Debug, Default)]
pub struct UpdateNewsForm {
    pub title: Option<String>,
    pub category: Option<String>,
    pub updated_at: Option<String>,
    pub remove_indices: Vec<usize>,
    pub update_indices: Vec<usize>,
    pub description_remove_index: Vec<usize>,
    pub description_update_index: Vec<usize>,
    pub photo_remove_index: Vec<usize>,
    pub update_descriptions: Vec<String>,
    pub add_descriptions: Vec<String>,
    pub update_photos: Vec<PhotoUpload>,
    pub add_photos: Vec<PhotoUpload>,
}

/// `isVisible` is optional so a missing field reaches the service as a 400
/// validation failure instead of an extractor rejection.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVisibilityRequest {
    #[validate(range(min = 0, max = 1, message = "Visibility status must be 0 or 1"))]
    pub is_visible: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentRequest {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub comment_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub reply_text: Option<String>,
    pub reply_to_username: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionRequest {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub action: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::comment::Comment;

    #[test]
    fn new_article_defaults_to_visible_with_zero_views() {
        let news = News::new("Launch", "events");
        assert_eq!(news.is_visible, 1);
        assert_eq!(news.viewer, 0);
        assert!(news.photos_description.is_empty());
        assert!(news.comments.is_empty());
    }

    #[test]
    fn remove_comment_filters_by_id() {
        let mut news = News::new("Launch", "events");
        news.comments.push(Comment::new("u1", "alice", "first"));
        news.comments.push(Comment::new("u2", "bob", "second"));

        let id = news.comments[0].id.clone();
        assert!(news.remove_comment(&id));
        assert_eq!(news.comments.len(), 1);
        assert_eq!(news.comments[0].username, "bob");

        assert!(!news.remove_comment("missing"));
        assert_eq!(news.comments.len(), 1);
    }

    #[test]
    fn photo_entry_clear_keeps_description() {
        let mut entry = PhotoEntry {
            photo: "https://img.example/a.jpg".to_string(),
            photo_cloudinary_id: "folder/a".to_string(),
            description: "caption".to_string(),
        };
        assert!(entry.has_photo());

        entry.clear_photo();
        assert!(!entry.has_photo());
        assert!(entry.photo.is_empty());
        assert_eq!(entry.description, "caption");
    }

    #[test]
    fn visibility_request_accepts_only_zero_or_one() {
        assert!(UpdateVisibilityRequest { is_visible: Some(0) }.validate().is_ok());
        assert!(UpdateVisibilityRequest { is_visible: Some(1) }.validate().is_ok());
        assert!(UpdateVisibilityRequest { is_visible: Some(2) }.validate().is_err());
        assert!(UpdateVisibilityRequest { is_visible: Some(-1) }.validate().is_err());
    }

    #[test]
    fn visibility_request_tolerates_missing_field() {
        // An empty body must deserialize so the handler can answer with the
        // JSON error envelope instead of an extractor rejection.
        let request: UpdateVisibilityRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.is_visible, None);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn news_wire_format_uses_camel_case() {
        let news = News::new("Launch", "events");
        let value = serde_json::to_value(&news).unwrap();
        assert!(value.get("isVisible").is_some());
        assert!(value.get("photosDescription").is_some());
        assert!(value.get("createdAt").is_some());
    }
}
