//! Event service.

use sqlx::PgPool;
use uuid::Uuid;

use crate::config::ListSettings;
use crate::errors::AppError;
use crate::models::event::{
    parse_datetime, CreateEvent, Event, EventSummary, UpdateEventDescription, UpdateEventDuration,
    UpdateEventLocation, UpdateEventName, UpdateEventType,
};
use crate::models::pagination::{ListParams, Listed};
use crate::models::status;
use crate::services::listing::{self, ListFilter, ResourceQuery};
use crate::services::slug::strip_text;
use crate::services::storage::StoredImage;

const COLUMNS: &str = "unique_id, name, stripped, type, location, start_time, end_time, \
     description, views, image, status, created_at, updated_at";

// Public listings drop the description body.
const SUMMARY_COLUMNS: &str = "unique_id, name, stripped, type, location, start_time, end_time, \
     views, image, status, created_at, updated_at";

const EVENTS: ResourceQuery = ResourceQuery {
    table: "events",
    joins: "",
    columns: COLUMNS,
    primary_field: "name",
    qualifier: "",
};

const EVENTS_PUBLIC: ResourceQuery = ResourceQuery {
    table: "events",
    joins: "",
    columns: SUMMARY_COLUMNS,
    primary_field: "name",
    qualifier: "",
};

/// Horizon predicate for the upcoming-events surface.
const UPCOMING: &str = "start_time >= (NOW() AT TIME ZONE 'utc')";

pub async fn list_root(
    pool: &PgPool,
    params: &ListParams,
    settings: &ListSettings,
) -> Result<Listed<Event>, AppError> {
    listing::list_page(pool, &EVENTS, &ListFilter::default(), params, settings).await
}

pub async fn search_root(
    pool: &PgPool,
    search: &str,
    params: &ListParams,
    settings: &ListSettings,
) -> Result<Listed<Event>, AppError> {
    listing::list_page(pool, &EVENTS, &ListFilter::searching(search), params, settings).await
}

/// Public listing: the whole active set in schedule order, unpaginated.
pub async fn list_public(pool: &PgPool) -> Result<Listed<EventSummary>, AppError> {
    listing::list_all(pool, &EVENTS_PUBLIC, &ListFilter::active(), "start_time ASC").await
}

/// Public listing scoped to a type, upcoming only, unpaginated.
pub async fn list_public_by_type(
    pool: &PgPool,
    kind: &str,
) -> Result<Listed<EventSummary>, AppError> {
    let mut filter = ListFilter::active();
    filter.equals.push(("type", kind.to_string()));
    filter.extra = Some(UPCOMING);
    listing::list_all(pool, &EVENTS_PUBLIC, &filter, "start_time ASC").await
}

pub async fn search_public(
    pool: &PgPool,
    search: &str,
    params: &ListParams,
    settings: &ListSettings,
) -> Result<Listed<EventSummary>, AppError> {
    let mut filter = ListFilter::active();
    filter.search = Some(search.to_string());
    listing::list_page(pool, &EVENTS_PUBLIC, &filter, params, settings).await
}

/// Root lookup by unique id, any status.
pub async fn find_root(pool: &PgPool, unique_id: &str) -> Result<Event, AppError> {
    let sql = format!("SELECT {COLUMNS} FROM events WHERE unique_id = $1");
    sqlx::query_as::<_, Event>(&sql)
        .bind(unique_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Event not found"))
}

/// Public lookup by slug; bumps the view counter after a hit.
pub async fn find_public_by_stripped(pool: &PgPool, stripped: &str) -> Result<Event, AppError> {
    let sql = format!("SELECT {COLUMNS} FROM events WHERE stripped = $1 AND status = $2");
    let event = sqlx::query_as::<_, Event>(&sql)
        .bind(stripped)
        .bind(status::ACTIVE)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Event not found"))?;

    sqlx::query("UPDATE events SET views = views + 1 WHERE unique_id = $1")
        .bind(&event.unique_id)
        .execute(pool)
        .await?;

    Ok(event)
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
                "SELECT unique_id FROM events \
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
                "SELECT unique_id FROM events \
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
        return Err(AppError::conflict("Event already exists!"));
    }
    Ok(())
}

pub async fn create(
    pool: &PgPool,
    input: &CreateEvent,
    image: &StoredImage,
) -> Result<String, AppError> {
    ensure_name_available(pool, &input.name, None).await?;

    let start = parse_datetime(&input.start)
        .ok_or_else(|| AppError::validation("Invalid start datetime format (YYYY-MM-DD HH:mm)"))?;
    let end = match input.end.as_deref() {
        Some(end) => Some(parse_datetime(end).ok_or_else(|| {
            AppError::validation("Invalid end datetime format (YYYY-MM-DD HH:mm)")
        })?),
        None => None,
    };

    let unique_id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO events (unique_id, name, stripped, type, location, start_time, end_time, \
             description, views, image, image_public_id, status) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 0, $9, $10, $11)",
    )
    .bind(&unique_id)
    .bind(&input.name)
    .bind(strip_text(&input.name))
    .bind(&input.kind)
    .bind(&input.location)
    .bind(start)
    .bind(end)
    .bind(&input.description)
    .bind(&image.url)
    .bind(&image.public_id)
    .bind(status::ACTIVE)
    .execute(pool)
    .await?;

    Ok(unique_id)
}

/// Rename an active event (re-derives the slug).
pub async fn update_name(
    pool: &PgPool,
    unique_id: &str,
    input: &UpdateEventName,
) -> Result<(), AppError> {
    ensure_name_available(pool, &input.name, Some(unique_id)).await?;

    let updated = sqlx::query(
        "UPDATE events SET name = $2, stripped = $3, updated_at = NOW() \
         WHERE unique_id = $1 AND status = $4",
    )
    .bind(unique_id)
    .bind(&input.name)
    .bind(strip_text(&input.name))
    .bind(status::ACTIVE)
    .execute(pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::not_found("Event not found"));
    }
    Ok(())
}

pub async fn update_type(
    pool: &PgPool,
    unique_id: &str,
    input: &UpdateEventType,
) -> Result<(), AppError> {
    let updated = sqlx::query(
        "UPDATE events SET type = $2, updated_at = NOW() WHERE unique_id = $1 AND status = $3",
    )
    .bind(unique_id)
    .bind(&input.kind)
    .bind(status::ACTIVE)
    .execute(pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::not_found("Event not found"));
    }
    Ok(())
}

pub async fn update_location(
    pool: &PgPool,
    unique_id: &str,
    input: &UpdateEventLocation,
) -> Result<(), AppError> {
    let updated = sqlx::query(
        "UPDATE events SET location = $2, updated_at = NOW() WHERE unique_id = $1 AND status = $3",
    )
    .bind(unique_id)
    .bind(&input.location)
    .bind(status::ACTIVE)
    .execute(pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::not_found("Event not found"));
    }
    Ok(())
}

/// Update the date window; an absent end clears the column.
pub async fn update_duration(
    pool: &PgPool,
    unique_id: &str,
    input: &UpdateEventDuration,
) -> Result<(), AppError> {
    let start = parse_datetime(&input.start)
        .ok_or_else(|| AppError::validation("Invalid start datetime format (YYYY-MM-DD HH:mm)"))?;
    let end = match input.end.as_deref() {
        Some(end) => Some(parse_datetime(end).ok_or_else(|| {
            AppError::validation("Invalid end datetime format (YYYY-MM-DD HH:mm)")
        })?),
        None => None,
    };

    let updated = sqlx::query(
        "UPDATE events SET start_time = $2, end_time = $3, updated_at = NOW() \
         WHERE unique_id = $1 AND status = $4",
    )
    .bind(unique_id)
    .bind(start)
    .bind(end)
    .bind(status::ACTIVE)
    .execute(pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::not_found("Event not found"));
    }
    Ok(())
}

/// Update the description; an absent value clears the column.
pub async fn update_description(
    pool: &PgPool,
    unique_id: &str,
    input: &UpdateEventDescription,
) -> Result<(), AppError> {
    let updated = sqlx::query(
        "UPDATE events SET description = $2, updated_at = NOW() \
         WHERE unique_id = $1 AND status = $3",
    )
    .bind(unique_id)
    .bind(&input.description)
    .bind(status::ACTIVE)
    .execute(pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::not_found("Event not found"));
    }
    Ok(())
}

pub async fn update_image(
    pool: &PgPool,
    unique_id: &str,
    image: &StoredImage,
) -> Result<Option<String>, AppError> {
    let previous: Option<Option<String>> =
        sqlx::query_scalar("SELECT image_public_id FROM events WHERE unique_id = $1")
            .bind(unique_id)
            .fetch_optional(pool)
            .await?;
    let previous = previous.ok_or_else(|| AppError::not_found("Event not found"))?;

    let updated = sqlx::query(
        "UPDATE events SET image = $2, image_public_id = $3, updated_at = NOW() \
         WHERE unique_id = $1 AND status = $4",
    )
    .bind(unique_id)
    .bind(&image.url)
    .bind(&image.public_id)
    .bind(status::ACTIVE)
    .execute(pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::not_found("Event not found"));
    }
    Ok(previous)
}

pub async fn toggle_status(pool: &PgPool, unique_id: &str) -> Result<i16, AppError> {
    let current: Option<i16> = sqlx::query_scalar("SELECT status FROM events WHERE unique_id = $1")
        .bind(unique_id)
        .fetch_optional(pool)
        .await?;
    let current = current.ok_or_else(|| AppError::bad_request("Details not found!"))?;

    let next = status::toggled(current);
    sqlx::query("UPDATE events SET status = $2, updated_at = NOW() WHERE unique_id = $1")
        .bind(unique_id)
        .bind(next)
        .execute(pool)
        .await?;

    Ok(next)
}

/// Hard delete; returns the stored image public id for detached cleanup.
pub async fn delete(pool: &PgPool, unique_id: &str) -> Result<Option<String>, AppError> {
    let previous: Option<Option<String>> =
        sqlx::query_scalar("SELECT image_public_id FROM events WHERE unique_id = $1")
            .bind(unique_id)
            .fetch_optional(pool)
            .await?;
    let previous = previous.ok_or_else(|| AppError::not_found("Event not found"))?;

    let deleted = sqlx::query("DELETE FROM events WHERE unique_id = $1 AND status = $2")
        .bind(unique_id)
        .bind(status::ACTIVE)
        .execute(pool)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(AppError::not_found("Event not found"));
    }
    Ok(previous)
}
