//! Blog category model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Full category row for the root surface and single-category lookups.
/// The internal id and the media store handle never leave the service.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub unique_id: String,
    pub name: String,
    pub stripped: String,
    pub image: Option<String>,
    pub status: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Trimmed row for public listings (no timestamps).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CategorySummary {
    pub unique_id: String,
    pub name: String,
    pub stripped: String,
    pub image: Option<String>,
    pub status: i16,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategory {
    #[validate(length(min = 3, max = 200, message = "Invalid length (3 - 200) characters"))]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCategory {
    #[validate(length(min = 3, max = 200, message = "Invalid length (3 - 200) characters"))]
    pub name: String,
}
