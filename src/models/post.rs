//! Blog post model: the only resource with a category relationship.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Full post row joined with its category, for the root surface and the
/// public single-post lookup.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Post {
    pub unique_id: String,
    pub category_unique_id: String,
    pub title: String,
    pub stripped: String,
    pub alt_text: String,
    pub image: Option<String>,
    pub details: String,
    pub views: i64,
    pub likes: i64,
    pub status: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category_name: String,
    pub category_stripped: String,
    pub category_image: Option<String>,
}

/// Public listing row: the joined shape minus the details body.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PostSummary {
    pub unique_id: String,
    pub category_unique_id: String,
    pub title: String,
    pub stripped: String,
    pub alt_text: String,
    pub image: Option<String>,
    pub views: i64,
    pub likes: i64,
    pub status: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category_name: String,
    pub category_stripped: String,
    pub category_image: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePost {
    pub category_unique_id: String,
    #[validate(length(min = 3, max = 500, message = "Invalid length (3 - 500) characters"))]
    pub title: String,
    #[validate(length(min = 3, max = 500, message = "Invalid length (3 - 500) characters"))]
    pub alt_text: String,
    #[validate(length(min = 3, max = 65535, message = "Invalid length (3 - 65535) characters"))]
    pub details: String,
}

/// Title update re-derives the slug and may move the post to another
/// category.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePost {
    pub category_unique_id: String,
    #[validate(length(min = 3, max = 500, message = "Invalid length (3 - 500) characters"))]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePostAltText {
    #[validate(length(min = 3, max = 500, message = "Invalid length (3 - 500) characters"))]
    pub alt_text: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePostDetails {
    #[validate(length(min = 3, max = 65535, message = "Invalid length (3 - 65535) characters"))]
    pub details: String,
}
