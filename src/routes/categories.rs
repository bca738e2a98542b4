//! Category routes: root CRUD plus the public read surface.

use axum::extract::{Multipart, Query, State};
use axum::Json;
use validator::Validate;

use crate::errors::{ApiResponse, AppError, Tag};
use crate::middleware::auth::RootKey;
use crate::middleware::uploads;
use crate::models::category::{Category, CategorySummary, CreateCategory, UpdateCategory};
use crate::models::pagination::{ListParams, ListPayload};
use crate::routes::posts::StrippedRequest;
use crate::routes::{respond_list, require_field, SearchRequest, UniqueIdRequest};
use crate::services::{category as category_service, storage};
use crate::AppState;

/// GET /root/categories — list every category, any status.
pub async fn root_list(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<ListParams>,
    body: Option<Json<ListParams>>,
) -> Result<Json<ApiResponse<ListPayload<Category>>>, AppError> {
    let params = ListParams::merged(query, body.map(|Json(b)| b));
    let result = category_service::list_root(&state.db, &params, &state.config.listing).await?;
    Ok(respond_list(
        Tag::Root,
        "Categories loaded",
        "Categories Not found",
        result,
    ))
}

/// GET /root/search/categories — search names across every status.
pub async fn root_search(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<SearchRequest>,
    body: Option<Json<SearchRequest>>,
) -> Result<Json<ApiResponse<ListPayload<Category>>>, AppError> {
    let (search, params) = SearchRequest::resolve(query, body.map(|Json(b)| b))?;
    let result =
        category_service::search_root(&state.db, &search, &params, &state.config.listing).await?;
    Ok(respond_list(
        Tag::Root,
        "Categories loaded",
        "Categories Not found",
        result,
    ))
}

/// GET /root/category — fetch one category by unique id, any status.
pub async fn root_get(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<UniqueIdRequest>,
) -> Result<Json<ApiResponse<Category>>, AppError> {
    let unique_id = UniqueIdRequest::resolve(query, None)?;
    let category = category_service::find_root(&state.db, &unique_id).await?;
    Ok(ApiResponse::success(Tag::Root, "Category loaded", category))
}

/// GET /public/categories — active categories, paginated, trimmed columns.
pub async fn public_list(
    State(state): State<AppState>,
    Query(query): Query<ListParams>,
    body: Option<Json<ListParams>>,
) -> Result<Json<ApiResponse<ListPayload<CategorySummary>>>, AppError> {
    let params = ListParams::merged(query, body.map(|Json(b)| b));
    let result = category_service::list_public(&state.db, &params, &state.config.listing)
        .await
        .map_err(|e| e.tagged(Tag::Anonymous))?;
    Ok(respond_list(
        Tag::Anonymous,
        "Categories loaded",
        "Categories Not found",
        result,
    ))
}

/// GET /public/search/categories — search active categories.
pub async fn public_search(
    State(state): State<AppState>,
    Query(query): Query<SearchRequest>,
    body: Option<Json<SearchRequest>>,
) -> Result<Json<ApiResponse<ListPayload<CategorySummary>>>, AppError> {
    let (search, params) =
        SearchRequest::resolve(query, body.map(|Json(b)| b)).map_err(|e| e.tagged(Tag::Anonymous))?;
    let result =
        category_service::search_public(&state.db, &search, &params, &state.config.listing)
            .await
            .map_err(|e| e.tagged(Tag::Anonymous))?;
    Ok(respond_list(
        Tag::Anonymous,
        "Categories loaded",
        "Categories Not found",
        result,
    ))
}

/// GET /public/category/stripped — fetch one active category by slug.
pub async fn public_get_by_stripped(
    State(state): State<AppState>,
    Query(query): Query<StrippedRequest>,
) -> Result<Json<ApiResponse<Category>>, AppError> {
    let stripped = require_field(query.stripped, "Stripped is required")
        .map_err(|e| e.tagged(Tag::Anonymous))?;
    let category = category_service::find_public_by_stripped(&state.db, &stripped)
        .await
        .map_err(|e| e.tagged(Tag::Anonymous))?;
    Ok(ApiResponse::success(Tag::Anonymous, "Category loaded", category))
}

/// POST /root/category/add — create a category from a multipart form.
pub async fn root_add(
    State(state): State<AppState>,
    _key: RootKey,
    multipart: Multipart,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let (fields, image) = uploads::image_form(multipart).await?;
    let input: CreateCategory = uploads::parse_fields(fields)?;
    let image = image.ok_or_else(|| AppError::bad_request("Image is required!"))?;

    let stored = state
        .media
        .upload(image.bytes, &image.content_type, storage::CATEGORY_FOLDER)
        .await?;
    category_service::create(&state.db, &input, &stored).await?;

    Ok(ApiResponse::message(Tag::Root, "Category created successfully!"))
}

/// PUT /root/category/update — rename.
pub async fn root_update(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<UniqueIdRequest>,
    Json(input): Json<UpdateCategory>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let unique_id = UniqueIdRequest::resolve(query, None)?;
    input.validate()?;
    category_service::update(&state.db, &unique_id, &input).await?;
    Ok(ApiResponse::message(Tag::Root, "Details updated successfully!"))
}

/// PUT /root/category/image — replace the stored image.
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
        .upload(image.bytes, &image.content_type, storage::CATEGORY_FOLDER)
        .await?;
    let previous = category_service::update_image(&state.db, &unique_id, &stored).await?;
    state.media.delete_detached(previous);

    Ok(ApiResponse::message(Tag::Root, "Details updated successfully!"))
}

/// PUT /root/category/toggle/status
pub async fn root_toggle_status(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<UniqueIdRequest>,
    body: Option<Json<UniqueIdRequest>>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let unique_id = UniqueIdRequest::resolve(query, body.map(|Json(b)| b))?;
    category_service::toggle_status(&state.db, &unique_id).await?;
    Ok(ApiResponse::message(Tag::Root, "Status updated successfully!"))
}

/// DELETE /root/category — hard delete plus best-effort blob cleanup.
pub async fn root_delete(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<UniqueIdRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let unique_id = UniqueIdRequest::resolve(query, None)?;
    let previous = category_service::delete(&state.db, &unique_id).await?;
    state.media.delete_detached(previous);
    Ok(ApiResponse::message(Tag::Root, "Category was deleted successfully!"))
}
