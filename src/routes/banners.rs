//! Banner routes: root CRUD plus the public read surface.

use axum::extract::{Multipart, Query, State};
use axum::Json;
use validator::Validate;

use crate::errors::{ApiResponse, AppError, Tag};
use crate::middleware::auth::RootKey;
use crate::middleware::uploads;
use crate::models::banner::{Banner, BannerInput};
use crate::models::pagination::{ListParams, ListPayload};
use crate::routes::{respond_list, UniqueIdRequest};
use crate::services::{banner as banner_service, storage};
use crate::AppState;

/// GET /root/banners — list every banner, any status.
pub async fn root_list(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<ListParams>,
    body: Option<Json<ListParams>>,
) -> Result<Json<ApiResponse<ListPayload<Banner>>>, AppError> {
    let params = ListParams::merged(query, body.map(|Json(b)| b));
    let result = banner_service::list_root(&state.db, &params, &state.config.listing).await?;
    Ok(respond_list(Tag::Root, "Banners loaded", "Banners Not found", result))
}

/// GET /root/banner — fetch one banner by unique id, any status.
pub async fn root_get(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<UniqueIdRequest>,
) -> Result<Json<ApiResponse<Banner>>, AppError> {
    let unique_id = UniqueIdRequest::resolve(query, None)?;
    let banner = banner_service::find_root(&state.db, &unique_id).await?;
    Ok(ApiResponse::success(Tag::Root, "Banner loaded", banner))
}

/// GET /public/banners — every active banner by title. This surface
/// deliberately skips pagination and returns the full filtered set.
pub async fn public_list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ListPayload<Banner>>>, AppError> {
    let result = banner_service::list_public(&state.db)
        .await
        .map_err(|e| e.tagged(Tag::Anonymous))?;
    Ok(respond_list(
        Tag::Anonymous,
        "Banners loaded",
        "Banners Not found",
        result,
    ))
}

/// POST /root/banner/add — create a banner from a multipart form; only the
/// image is mandatory.
pub async fn root_add(
    State(state): State<AppState>,
    _key: RootKey,
    multipart: Multipart,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let (fields, image) = uploads::image_form(multipart).await?;
    let input: BannerInput = uploads::parse_fields(fields)?;
    let image = image.ok_or_else(|| AppError::bad_request("Image is required!"))?;

    let stored = state
        .media
        .upload(image.bytes, &image.content_type, storage::BANNER_FOLDER)
        .await?;
    banner_service::create(&state.db, &input, &stored).await?;

    Ok(ApiResponse::message(Tag::Root, "Banner created successfully!"))
}

/// PUT /root/banner/update — set title and url; absent fields null out.
pub async fn root_update(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<UniqueIdRequest>,
    Json(input): Json<BannerInput>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let unique_id = UniqueIdRequest::resolve(query, None)?;
    input.validate()?;
    banner_service::update(&state.db, &unique_id, &input).await?;
    Ok(ApiResponse::message(Tag::Root, "Details updated successfully!"))
}

/// PUT /root/banner/image — replace the stored image.
pub async fn root_update_image(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<UniqueIdRequest>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let unique_id = UniqueIdRequest::resolve(query, None)?;
    let (_, image) = uploads::image_form(multipart).await?;
    let image = image.ok_or_else(|| AppError::bad_request("Image is required!"))?;

    let stored = state
        .media
        .upload(image.bytes, &image.content_type, storage::BANNER_FOLDER)
        .await?;
    let previous = banner_service::update_image(&state.db, &unique_id, &stored).await?;
    state.media.delete_detached(previous);

    Ok(ApiResponse::message(Tag::Root, "Details updated successfully!"))
}

/// PUT /root/banner/toggle/status
pub async fn root_toggle_status(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<UniqueIdRequest>,
    body: Option<Json<UniqueIdRequest>>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let unique_id = UniqueIdRequest::resolve(query, body.map(|Json(b)| b))?;
    banner_service::toggle_status(&state.db, &unique_id).await?;
    Ok(ApiResponse::message(Tag::Root, "Status updated successfully!"))
}

/// DELETE /root/banner — hard delete plus best-effort blob cleanup.
pub async fn root_delete(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<UniqueIdRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let unique_id = UniqueIdRequest::resolve(query, None)?;
    let previous = banner_service::delete(&state.db, &unique_id).await?;
    state.media.delete_detached(previous);
    Ok(ApiResponse::message(Tag::Root, "Banner was deleted successfully!"))
}
