//! Post service: CRUD, search, counters, and the category join.

use sqlx::PgPool;
use uuid::Uuid;

use crate::config::ListSettings;
use crate::errors::AppError;
use crate::models::pagination::{ListParams, Listed};
use crate::models::post::{
    CreatePost, Post, PostSummary, UpdatePost, UpdatePostAltText, UpdatePostDetails,
};
use crate::models::status;
use crate::services::category;
use crate::services::listing::{self, ListFilter, ResourceQuery};
use crate::services::slug::strip_text;
use crate::services::storage::StoredImage;

const COLUMNS: &str = "p.unique_id, p.category_unique_id, p.title, p.stripped, p.alt_text, \
     p.image, p.details, p.views, p.likes, p.status, p.created_at, p.updated_at, \
     c.name AS category_name, c.stripped AS category_stripped, c.image AS category_image";

// Public listings leave the details body out.
const SUMMARY_COLUMNS: &str = "p.unique_id, p.category_unique_id, p.title, p.stripped, \
     p.alt_text, p.image, p.views, p.likes, p.status, p.created_at, p.updated_at, \
     c.name AS category_name, c.stripped AS category_stripped, c.image AS category_image";

const JOINS: &str = "JOIN categories c ON c.unique_id = p.category_unique_id";

const POSTS: ResourceQuery = ResourceQuery {
    table: "posts p",
    joins: JOINS,
    columns: COLUMNS,
    primary_field: "p.title",
    qualifier: "p.",
};

const POSTS_PUBLIC: ResourceQuery = ResourceQuery {
    table: "posts p",
    joins: JOINS,
    columns: SUMMARY_COLUMNS,
    primary_field: "p.title",
    qualifier: "p.",
};

pub async fn list_root(
    pool: &PgPool,
    params: &ListParams,
    settings: &ListSettings,
) -> Result<Listed<Post>, AppError> {
    listing::list_page(pool, &POSTS, &ListFilter::default(), params, settings).await
}

pub async fn search_root(
    pool: &PgPool,
    search: &str,
    params: &ListParams,
    settings: &ListSettings,
) -> Result<Listed<Post>, AppError> {
    listing::list_page(pool, &POSTS, &ListFilter::searching(search), params, settings).await
}

pub async fn list_public(
    pool: &PgPool,
    params: &ListParams,
    settings: &ListSettings,
) -> Result<Listed<PostSummary>, AppError> {
    listing::list_page(pool, &POSTS_PUBLIC, &ListFilter::active(), params, settings).await
}

pub async fn list_public_by_category(
    pool: &PgPool,
    category_unique_id: &str,
    params: &ListParams,
    settings: &ListSettings,
) -> Result<Listed<PostSummary>, AppError> {
    let mut filter = ListFilter::active();
    filter
        .equals
        .push(("p.category_unique_id", category_unique_id.to_string()));
    listing::list_page(pool, &POSTS_PUBLIC, &filter, params, settings).await
}

pub async fn search_public(
    pool: &PgPool,
    search: &str,
    params: &ListParams,
    settings: &ListSettings,
) -> Result<Listed<PostSummary>, AppError> {
    let mut filter = ListFilter::active();
    filter.search = Some(search.to_string());
    listing::list_page(pool, &POSTS_PUBLIC, &filter, params, settings).await
}

/// Root lookup by unique id, any status.
pub async fn find_root(pool: &PgPool, unique_id: &str) -> Result<Post, AppError> {
    let sql = format!("SELECT {COLUMNS} FROM posts p {JOINS} WHERE p.unique_id = $1");
    sqlx::query_as::<_, Post>(&sql)
        .bind(unique_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))
}

/// Public lookup by slug; bumps the view counter after a hit. The counter
/// update is a separate statement, so the returned row shows the count as
/// it was when the post was read.
pub async fn find_public_by_stripped(pool: &PgPool, stripped: &str) -> Result<Post, AppError> {
    let sql =
        format!("SELECT {COLUMNS} FROM posts p {JOINS} WHERE p.stripped = $1 AND p.status = $2");
    let post = sqlx::query_as::<_, Post>(&sql)
        .bind(stripped)
        .bind(status::ACTIVE)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

    sqlx::query("UPDATE posts SET views = views + 1 WHERE unique_id = $1")
        .bind(&post.unique_id)
        .execute(pool)
        .await?;

    Ok(post)
}

/// Bump the like counter of an active post.
pub async fn like(pool: &PgPool, unique_id: &str) -> Result<(), AppError> {
    let updated = sqlx::query("UPDATE posts SET likes = likes + 1 WHERE unique_id = $1 AND status = $2")
        .bind(unique_id)
        .bind(status::ACTIVE)
        .execute(pool)
        .await?;
    if updated.rows_affected() == 0 {
        return Err(AppError::bad_request("Error liking post"));
    }
    Ok(())
}

/// Duplicate guard: an active post in the same category already matching
/// the title (suffix match, as the legacy check did) or its slug.
async fn ensure_title_available(
    pool: &PgPool,
    category_unique_id: &str,
    title: &str,
    exclude_unique_id: Option<&str>,
) -> Result<(), AppError> {
    let pattern = format!("%{title}");
    let slug = strip_text(title);

    let existing: Option<String> = match exclude_unique_id {
        Some(exclude) => {
            sqlx::query_scalar(
                "SELECT unique_id FROM posts \
                 WHERE (title ILIKE $1 OR stripped = $2) AND category_unique_id = $3 \
                   AND status = $4 AND unique_id <> $5 LIMIT 1",
            )
            .bind(&pattern)
            .bind(&slug)
            .bind(category_unique_id)
            .bind(status::ACTIVE)
            .bind(exclude)
            .fetch_optional(pool)
            .await?
        }
        None => {
            sqlx::query_scalar(
                "SELECT unique_id FROM posts \
                 WHERE (title ILIKE $1 OR stripped = $2) AND category_unique_id = $3 \
                   AND status = $4 LIMIT 1",
            )
            .bind(&pattern)
            .bind(&slug)
            .bind(category_unique_id)
            .bind(status::ACTIVE)
            .fetch_optional(pool)
            .await?
        }
    };

    if existing.is_some() {
        return Err(AppError::conflict("Post already exists!"));
    }
    Ok(())
}

/// Create a post. The image must already be stored; the database write is
/// a single statement and never spans the media upload.
pub async fn create(
    pool: &PgPool,
    input: &CreatePost,
    image: &StoredImage,
) -> Result<String, AppError> {
    category::ensure_active(pool, &input.category_unique_id).await?;
    ensure_title_available(pool, &input.category_unique_id, &input.title, None).await?;

    let unique_id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO posts (unique_id, category_unique_id, title, stripped, alt_text, \
             image, image_public_id, details, views, likes, status) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 0, 0, $9)",
    )
    .bind(&unique_id)
    .bind(&input.category_unique_id)
    .bind(&input.title)
    .bind(strip_text(&input.title))
    .bind(&input.alt_text)
    .bind(&image.url)
    .bind(&image.public_id)
    .bind(&input.details)
    .bind(status::ACTIVE)
    .execute(pool)
    .await?;

    Ok(unique_id)
}

/// Retitle an active post (re-derives the slug, may move category).
pub async fn update(pool: &PgPool, unique_id: &str, input: &UpdatePost) -> Result<(), AppError> {
    category::ensure_active(pool, &input.category_unique_id).await?;
    ensure_title_available(pool, &input.category_unique_id, &input.title, Some(unique_id)).await?;

    let updated = sqlx::query(
        "UPDATE posts SET category_unique_id = $2, title = $3, stripped = $4, updated_at = NOW() \
         WHERE unique_id = $1 AND status = $5",
    )
    .bind(unique_id)
    .bind(&input.category_unique_id)
    .bind(&input.title)
    .bind(strip_text(&input.title))
    .bind(status::ACTIVE)
    .execute(pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::not_found("Post not found"));
    }
    Ok(())
}

pub async fn update_alt_text(
    pool: &PgPool,
    unique_id: &str,
    input: &UpdatePostAltText,
) -> Result<(), AppError> {
    let updated = sqlx::query(
        "UPDATE posts SET alt_text = $2, updated_at = NOW() WHERE unique_id = $1 AND status = $3",
    )
    .bind(unique_id)
    .bind(&input.alt_text)
    .bind(status::ACTIVE)
    .execute(pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::not_found("Post not found"));
    }
    Ok(())
}

pub async fn update_details(
    pool: &PgPool,
    unique_id: &str,
    input: &UpdatePostDetails,
) -> Result<(), AppError> {
    let updated = sqlx::query(
        "UPDATE posts SET details = $2, updated_at = NOW() WHERE unique_id = $1 AND status = $3",
    )
    .bind(unique_id)
    .bind(&input.details)
    .bind(status::ACTIVE)
    .execute(pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::not_found("Post not found"));
    }
    Ok(())
}

/// Swap in a freshly stored image, returning the previous public id so the
/// caller can fire the best-effort delete.
pub async fn update_image(
    pool: &PgPool,
    unique_id: &str,
    image: &StoredImage,
) -> Result<Option<String>, AppError> {
    let previous: Option<Option<String>> =
        sqlx::query_scalar("SELECT image_public_id FROM posts WHERE unique_id = $1")
            .bind(unique_id)
            .fetch_optional(pool)
            .await?;
    let previous = previous.ok_or_else(|| AppError::not_found("Post not found"))?;

    let updated = sqlx::query(
        "UPDATE posts SET image = $2, image_public_id = $3, updated_at = NOW() \
         WHERE unique_id = $1 AND status = $4",
    )
    .bind(unique_id)
    .bind(&image.url)
    .bind(&image.public_id)
    .bind(status::ACTIVE)
    .execute(pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::not_found("Post not found"));
    }
    Ok(previous)
}

/// Flip an active post inactive, or revive anything else.
pub async fn toggle_status(pool: &PgPool, unique_id: &str) -> Result<i16, AppError> {
    let current: Option<i16> = sqlx::query_scalar("SELECT status FROM posts WHERE unique_id = $1")
        .bind(unique_id)
        .fetch_optional(pool)
        .await?;
    let current = current.ok_or_else(|| AppError::bad_request("Details not found!"))?;

    let next = status::toggled(current);
    sqlx::query("UPDATE posts SET status = $2, updated_at = NOW() WHERE unique_id = $1")
        .bind(unique_id)
        .bind(next)
        .execute(pool)
        .await?;

    Ok(next)
}

/// Hard delete; returns the stored image public id for detached cleanup.
pub async fn delete(pool: &PgPool, unique_id: &str) -> Result<Option<String>, AppError> {
    let previous: Option<Option<String>> =
        sqlx::query_scalar("SELECT image_public_id FROM posts WHERE unique_id = $1")
            .bind(unique_id)
            .fetch_optional(pool)
            .await?;
    let previous = previous.ok_or_else(|| AppError::not_found("Post not found"))?;

    let deleted = sqlx::query("DELETE FROM posts WHERE unique_id = $1 AND status = $2")
        .bind(unique_id)
        .bind(status::ACTIVE)
        .execute(pool)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(AppError::not_found("Post not found"));
    }
    Ok(previous)
}
