//! Homepage banner model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Banner {
    pub unique_id: String,
    pub title: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    pub status: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Shared by create and update: both fields optional, and an update with an
/// absent field nulls it out rather than leaving it untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BannerInput {
    #[validate(length(min = 3, max = 500, message = "Invalid length (3 - 500) characters"))]
    pub title: Option<String>,
    #[validate(url(message = "Value must be a specified url path"))]
    pub url: Option<String>,
}
