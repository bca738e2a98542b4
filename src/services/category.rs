//! Category service.

use sqlx::PgPool;
use uuid::Uuid;

use crate::config::ListSettings;
use crate::errors::AppError;
use crate::models::category::{Category, CategorySummary, CreateCategory, UpdateCategory};
use crate::models::pagination::{ListParams, Listed};
use crate::models::status;
use crate::services::listing::{self, ListFilter, ResourceQuery};
use crate::services::slug::strip_text;
use crate::services::storage::StoredImage;

const COLUMNS: &str = "unique_id, name, stripped, image, status, created_at, updated_at";

// Public listings drop the timestamps as well.
const SUMMARY_COLUMNS: &str = "unique_id, name, stripped, image, status";

const CATEGORIES: ResourceQuery = ResourceQuery {
    table: "categories",
    joins: "",
    columns: COLUMNS,
    primary_field: "name",
    qualifier: "",
};

const CATEGORIES_PUBLIC: ResourceQuery = ResourceQuery {
    table: "categories",
    joins: "",
    columns: SUMMARY_COLUMNS,
    primary_field: "name",
    qualifier: "",
};

pub async fn list_root(
    pool: &PgPool,
    params: &ListParams,
    settings: &ListSettings,
) -> Result<Listed<Category>, AppError> {
    listing::list_page(pool, &CATEGORIES, &ListFilter::default(), params, settings).await
}

pub async fn search_root(
    pool: &PgPool,
    search: &str,
    params: &ListParams,
    settings: &ListSettings,
) -> Result<Listed<Category>, AppError> {
    listing::list_page(pool, &CATEGORIES, &ListFilter::searching(search), params, settings).await
}

pub async fn list_public(
    pool: &PgPool,
    params: &ListParams,
    settings: &ListSettings,
) -> Result<Listed<CategorySummary>, AppError> {
    listing::list_page(pool, &CATEGORIES_PUBLIC, &ListFilter::active(), params, settings).await
}

pub async fn search_public(
    pool: &PgPool,
    search: &str,
    params: &ListParams,
    settings: &ListSettings,
) -> Result<Listed<CategorySummary>, AppError> {
    let mut filter = ListFilter::active();
    filter.search = Some(search.to_string());
    listing::list_page(pool, &CATEGORIES_PUBLIC, &filter, params, settings).await
}

/// Root lookup by unique id, any status.
pub async fn find_root(pool: &PgPool, unique_id: &str) -> Result<Category, AppError> {
    let sql = format!("SELECT {COLUMNS} FROM categories WHERE unique_id = $1");
    sqlx::query_as::<_, Category>(&sql)
        .bind(unique_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Category not found"))
}

/// Public lookup by slug.
pub async fn find_public_by_stripped(
    pool: &PgPool,
    stripped: &str,
) -> Result<Category, AppError> {
    let sql = format!("SELECT {COLUMNS} FROM categories WHERE stripped = $1 AND status = $2");
    sqlx::query_as::<_, Category>(&sql)
        .bind(stripped)
        .bind(status::ACTIVE)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Category not found"))
}

/// Precondition shared with the post service: the referenced category must
/// exist and be active.
pub async fn ensure_active(pool: &PgPool, unique_id: &str) -> Result<(), AppError> {
    let found: Option<String> = sqlx::query_scalar(
        "SELECT unique_id FROM categories WHERE unique_id = $1 AND status = $2",
    )
    .bind(unique_id)
    .bind(status::ACTIVE)
    .fetch_optional(pool)
    .await?;
    if found.is_none() {
        return Err(AppError::validation("Category not found!"));
    }
    Ok(())
}

async fn ensure_name_available(
    pool: &PgPool,
    name: &str,
    exclude_unique_id: Option<&str>,
) -> Result<(), AppError> {
    let pattern = format!("%{name}");
    let slug = strip_text(name);

    let existing: Option<String> = match exclude_unique_id {
        Some(exclude) => {
            sqlx::query_scalar(
                "SELECT unique_id FROM categories \
                 WHERE (name ILIKE $1 OR stripped = $2) AND status = $3 AND unique_id <> $4 \
                 LIMIT 1",
            )
            .bind(&pattern)
            .bind(&slug)
            .bind(status::ACTIVE)
            .bind(exclude)
            .fetch_optional(pool)
            .await?
        }
        None => {
            sqlx::query_scalar(
                "SELECT unique_id FROM categories \
                 WHERE (name ILIKE $1 OR stripped = $2) AND status = $3 LIMIT 1",
            )
            .bind(&pattern)
            .bind(&slug)
            .bind(status::ACTIVE)
            .fetch_optional(pool)
            .await?
        }
    };

    if existing.is_some() {
        return Err(AppError::conflict("Category already exists!"));
    }
    Ok(())
}

pub async fn create(
    pool: &PgPool,
    input: &CreateCategory,
    image: &StoredImage,
) -> Result<String, AppError> {
    ensure_name_available(pool, &input.name, None).await?;

    let unique_id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO categories (unique_id, name, stripped, image, image_public_id, status) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(&unique_id)
    .bind(&input.name)
    .bind(strip_text(&input.name))
    .bind(&image.url)
    .bind(&image.public_id)
    .bind(status::ACTIVE)
    .execute(pool)
    .await?;

    Ok(unique_id)
}

/// Rename an active category (re-derives the slug).
pub async fn update(
    pool: &PgPool,
    unique_id: &str,
    input: &UpdateCategory,
) -> Result<(), AppError> {
    ensure_name_available(pool, &input.name, Some(unique_id)).await?;

    let updated = sqlx::query(
        "UPDATE categories SET name = $2, stripped = $3, updated_at = NOW() \
         WHERE unique_id = $1 AND status = $4",
    )
    .bind(unique_id)
    .bind(&input.name)
    .bind(strip_text(&input.name))
    .bind(status::ACTIVE)
    .execute(pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::not_found("Category not found"));
    }
    Ok(())
}

pub async fn update_image(
    pool: &PgPool,
    unique_id: &str,
    image: &StoredImage,
) -> Result<Option<String>, AppError> {
    let previous: Option<Option<String>> =
        sqlx::query_scalar("SELECT image_public_id FROM categories WHERE unique_id = $1")
            .bind(unique_id)
            .fetch_optional(pool)
            .await?;
    let previous = previous.ok_or_else(|| AppError::not_found("Category not found"))?;

    let updated = sqlx::query(
        "UPDATE categories SET image = $2, image_public_id = $3, updated_at = NOW() \
         WHERE unique_id = $1 AND status = $4",
    )
    .bind(unique_id)
    .bind(&image.url)
    .bind(&image.public_id)
    .bind(status::ACTIVE)
    .execute(pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::not_found("Category not found"));
    }
    Ok(previous)
}

pub async fn toggle_status(pool: &PgPool, unique_id: &str) -> Result<i16, AppError> {
    let current: Option<i16> =
        sqlx::query_scalar("SELECT status FROM categories WHERE unique_id = $1")
            .bind(unique_id)
            .fetch_optional(pool)
            .await?;
    let current = current.ok_or_else(|| AppError::bad_request("Details not found!"))?;

    let next = status::toggled(current);
    sqlx::query("UPDATE categories SET status = $2, updated_at = NOW() WHERE unique_id = $1")
        .bind(unique_id)
        .bind(next)
        .execute(pool)
        .await?;

    Ok(next)
}

/// Hard delete. Posts still referencing the category make the foreign key
/// object; that surfaces as a store error, not a cascade.
pub async fn delete(pool: &PgPool, unique_id: &str) -> Result<Option<String>, AppError> {
    let previous: Option<Option<String>> =
        sqlx::query_scalar("SELECT image_public_id FROM categories WHERE unique_id = $1")
            .bind(unique_id)
            .fetch_optional(pool)
            .await?;
    let previous = previous.ok_or_else(|| AppError::not_found("Category not found"))?;

    let deleted = sqlx::query("DELETE FROM categories WHERE unique_id = $1 AND status = $2")
        .bind(unique_id)
        .bind(status::ACTIVE)
        .execute(pool)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(AppError::not_found("Category not found"));
    }
    Ok(previous)
}
