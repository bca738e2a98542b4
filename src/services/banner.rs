//! Banner service.

use sqlx::PgPool;
use uuid::Uuid;

use crate::config::ListSettings;
use crate::errors::AppError;
use crate::models::banner::{Banner, BannerInput};
use crate::models::pagination::{ListParams, Listed};
use crate::models::status;
use crate::services::listing::{self, ListFilter, ResourceQuery};
use crate::services::storage::StoredImage;

const COLUMNS: &str = "unique_id, title, url, image, status, created_at, updated_at";

const BANNERS: ResourceQuery = ResourceQuery {
    table: "banners",
    joins: "",
    columns: COLUMNS,
    primary_field: "title",
    qualifier: "",
};

pub async fn list_root(
    pool: &PgPool,
    params: &ListParams,
    settings: &ListSettings,
) -> Result<Listed<Banner>, AppError> {
    listing::list_page(pool, &BANNERS, &ListFilter::default(), params, settings).await
}

/// Public listing: the whole active set by title, unpaginated.
pub async fn list_public(pool: &PgPool) -> Result<Listed<Banner>, AppError> {
    listing::list_all(pool, &BANNERS, &ListFilter::active(), "title ASC").await
}

/// Root lookup by unique id, any status.
pub async fn find_root(pool: &PgPool, unique_id: &str) -> Result<Banner, AppError> {
    let sql = format!("SELECT {COLUMNS} FROM banners WHERE unique_id = $1");
    sqlx::query_as::<_, Banner>(&sql)
        .bind(unique_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Banner not found"))
}

pub async fn create(
    pool: &PgPool,
    input: &BannerInput,
    image: &StoredImage,
) -> Result<String, AppError> {
    let unique_id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO banners (unique_id, title, url, image, image_public_id, status) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(&unique_id)
    .bind(&input.title)
    .bind(&input.url)
    .bind(&image.url)
    .bind(&image.public_id)
    .bind(status::ACTIVE)
    .execute(pool)
    .await?;

    Ok(unique_id)
}

/// Update title and url of an active banner; absent fields null out.
pub async fn update(pool: &PgPool, unique_id: &str, input: &BannerInput) -> Result<(), AppError> {
    let updated = sqlx::query(
        "UPDATE banners SET title = $2, url = $3, updated_at = NOW() \
         WHERE unique_id = $1 AND status = $4",
    )
    .bind(unique_id)
    .bind(&input.title)
    .bind(&input.url)
    .bind(status::ACTIVE)
    .execute(pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::not_found("Banner not found"));
    }
    Ok(())
}

pub async fn update_image(
    pool: &PgPool,
    unique_id: &str,
    image: &StoredImage,
) -> Result<Option<String>, AppError> {
    let previous: Option<Option<String>> =
        sqlx::query_scalar("SELECT image_public_id FROM banners WHERE unique_id = $1")
            .bind(unique_id)
            .fetch_optional(pool)
            .await?;
    let previous = previous.ok_or_else(|| AppError::not_found("Banner not found"))?;

    let updated = sqlx::query(
        "UPDATE banners SET image = $2, image_public_id = $3, updated_at = NOW() \
         WHERE unique_id = $1 AND status = $4",
    )
    .bind(unique_id)
    .bind(&image.url)
    .bind(&image.public_id)
    .bind(status::ACTIVE)
    .execute(pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::not_found("Banner not found"));
    }
    Ok(previous)
}

pub async fn toggle_status(pool: &PgPool, unique_id: &str) -> Result<i16, AppError> {
    let current: Option<i16> =
        sqlx::query_scalar("SELECT status FROM banners WHERE unique_id = $1")
            .bind(unique_id)
            .fetch_optional(pool)
            .await?;
    let current = current.ok_or_else(|| AppError::bad_request("Details not found!"))?;

    let next = status::toggled(current);
    sqlx::query("UPDATE banners SET status = $2, updated_at = NOW() WHERE unique_id = $1")
        .bind(unique_id)
        .bind(next)
        .execute(pool)
        .await?;

    Ok(next)
}

/// Hard delete; returns the stored image public id for detached cleanup.
pub async fn delete(pool: &PgPool, unique_id: &str) -> Result<Option<String>, AppError> {
    let previous: Option<Option<String>> =
        sqlx::query_scalar("SELECT image_public_id FROM banners WHERE unique_id = $1")
            .bind(unique_id)
            .fetch_optional(pool)
            .await?;
    let previous = previous.ok_or_else(|| AppError::not_found("Banner not found"))?;

    let deleted = sqlx::query("DELETE FROM banners WHERE unique_id = $1 AND status = $2")
        .bind(unique_id)
        .bind(status::ACTIVE)
        .execute(pool)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(AppError::not_found("Banner not found"));
    }
    Ok(previous)
}
