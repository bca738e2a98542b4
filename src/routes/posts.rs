//! Post routes: root CRUD plus the public read surface.

use axum::extract::{Multipart, Query, State};
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::errors::{ApiResponse, AppError, Tag};
use crate::middleware::auth::RootKey;
use crate::middleware::uploads;
use crate::models::pagination::{ListParams, ListPayload};
use crate::models::post::{
    CreatePost, Post, PostSummary, UpdatePost, UpdatePostAltText, UpdatePostDetails,
};
use crate::routes::{respond_list, require_field, SearchRequest, UniqueIdRequest};
use crate::services::{category as category_service, post as post_service, storage};
use crate::AppState;

/// Scope parameter for the posts-via-category surface.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryScope {
    pub category_unique_id: Option<String>,
}

/// GET /root/posts — list every post, any status.
pub async fn root_list(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<ListParams>,
    body: Option<Json<ListParams>>,
) -> Result<Json<ApiResponse<ListPayload<Post>>>, AppError> {
    let params = ListParams::merged(query, body.map(|Json(b)| b));
    let result = post_service::list_root(&state.db, &params, &state.config.listing).await?;
    Ok(respond_list(Tag::Root, "Posts loaded", "Posts Not found", result))
}

/// GET /root/search/posts — search titles across every status.
pub async fn root_search(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<SearchRequest>,
    body: Option<Json<SearchRequest>>,
) -> Result<Json<ApiResponse<ListPayload<Post>>>, AppError> {
    let (search, params) = SearchRequest::resolve(query, body.map(|Json(b)| b))?;
    let result =
        post_service::search_root(&state.db, &search, &params, &state.config.listing).await?;
    Ok(respond_list(Tag::Root, "Posts loaded", "Posts Not found", result))
}

/// GET /root/post — fetch one post by unique id, any status.
pub async fn root_get(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<UniqueIdRequest>,
) -> Result<Json<ApiResponse<Post>>, AppError> {
    let unique_id = UniqueIdRequest::resolve(query, None)?;
    let post = post_service::find_root(&state.db, &unique_id).await?;
    Ok(ApiResponse::success(Tag::Root, "Post loaded", post))
}

/// GET /public/posts — active posts, paginated, without details bodies.
pub async fn public_list(
    State(state): State<AppState>,
    Query(query): Query<ListParams>,
    body: Option<Json<ListParams>>,
) -> Result<Json<ApiResponse<ListPayload<PostSummary>>>, AppError> {
    let params = ListParams::merged(query, body.map(|Json(b)| b));
    let result = post_service::list_public(&state.db, &params, &state.config.listing)
        .await
        .map_err(|e| e.tagged(Tag::Anonymous))?;
    Ok(respond_list(Tag::Anonymous, "Posts loaded", "Posts Not found", result))
}

/// GET /public/search/posts — search active posts.
pub async fn public_search(
    State(state): State<AppState>,
    Query(query): Query<SearchRequest>,
    body: Option<Json<SearchRequest>>,
) -> Result<Json<ApiResponse<ListPayload<PostSummary>>>, AppError> {
    let (search, params) =
        SearchRequest::resolve(query, body.map(|Json(b)| b)).map_err(|e| e.tagged(Tag::Anonymous))?;
    let result = post_service::search_public(&state.db, &search, &params, &state.config.listing)
        .await
        .map_err(|e| e.tagged(Tag::Anonymous))?;
    Ok(respond_list(Tag::Anonymous, "Posts loaded", "Posts Not found", result))
}

/// GET /public/posts/via/category — active posts scoped to one category.
pub async fn public_list_by_category(
    State(state): State<AppState>,
    Query(scope): Query<CategoryScope>,
    Query(query): Query<ListParams>,
    body: Option<Json<ListParams>>,
) -> Result<Json<ApiResponse<ListPayload<PostSummary>>>, AppError> {
    let category_unique_id = require_field(
        scope.category_unique_id,
        "Category Unique Id is required",
    )
    .map_err(|e| e.tagged(Tag::Anonymous))?;
    category_service::ensure_active(&state.db, &category_unique_id)
        .await
        .map_err(|e| e.tagged(Tag::Anonymous))?;

    let params = ListParams::merged(query, body.map(|Json(b)| b));
    let result = post_service::list_public_by_category(
        &state.db,
        &category_unique_id,
        &params,
        &state.config.listing,
    )
    .await
    .map_err(|e| e.tagged(Tag::Anonymous))?;
    Ok(respond_list(
        Tag::Anonymous,
        "Posts specifically loaded",
        "Posts specifically Not found",
        result,
    ))
}

/// Slug lookup parameter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StrippedRequest {
    pub stripped: Option<String>,
}

/// GET /public/post/stripped — fetch one active post by slug and count the
/// view.
pub async fn public_get_by_stripped(
    State(state): State<AppState>,
    Query(query): Query<StrippedRequest>,
) -> Result<Json<ApiResponse<Post>>, AppError> {
    let stripped = require_field(query.stripped, "Stripped is required")
        .map_err(|e| e.tagged(Tag::Anonymous))?;
    let post = post_service::find_public_by_stripped(&state.db, &stripped)
        .await
        .map_err(|e| e.tagged(Tag::Anonymous))?;
    Ok(ApiResponse::success(Tag::Anonymous, "Post loaded", post))
}

/// POST /public/post/like — bump the like counter of an active post.
pub async fn public_like(
    State(state): State<AppState>,
    Query(query): Query<UniqueIdRequest>,
    body: Option<Json<UniqueIdRequest>>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let unique_id = UniqueIdRequest::resolve(query, body.map(|Json(b)| b))
        .map_err(|e| e.tagged(Tag::Anonymous))?;
    post_service::like(&state.db, &unique_id)
        .await
        .map_err(|e| e.tagged(Tag::Anonymous))?;
    Ok(ApiResponse::message(Tag::Anonymous, "Post liked"))
}

/// POST /root/post/add — create a post from a multipart form; the image is
/// required and is stored before the database row is written.
pub async fn root_add(
    State(state): State<AppState>,
    _key: RootKey,
    multipart: Multipart,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let (fields, image) = uploads::image_form(multipart).await?;
    let input: CreatePost = uploads::parse_fields(fields)?;
    let image = image.ok_or_else(|| AppError::bad_request("Image is required!"))?;

    let stored = state
        .media
        .upload(image.bytes, &image.content_type, storage::POST_FOLDER)
        .await?;
    post_service::create(&state.db, &input, &stored).await?;

    Ok(ApiResponse::message(Tag::Root, "Post created successfully!"))
}

/// PUT /root/post/update — retitle / recategorize.
pub async fn root_update(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<UniqueIdRequest>,
    Json(input): Json<UpdatePost>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let unique_id = UniqueIdRequest::resolve(query, None)?;
    input.validate()?;
    post_service::update(&state.db, &unique_id, &input).await?;
    Ok(ApiResponse::message(Tag::Root, "Details updated successfully!"))
}

/// PUT /root/post/update/alt/text
pub async fn root_update_alt_text(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<UniqueIdRequest>,
    Json(input): Json<UpdatePostAltText>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let unique_id = UniqueIdRequest::resolve(query, None)?;
    input.validate()?;
    post_service::update_alt_text(&state.db, &unique_id, &input).await?;
    Ok(ApiResponse::message(Tag::Root, "Details updated successfully!"))
}

/// PUT /root/post/update/details
pub async fn root_update_details(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<UniqueIdRequest>,
    Json(input): Json<UpdatePostDetails>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let unique_id = UniqueIdRequest::resolve(query, None)?;
    input.validate()?;
    post_service::update_details(&state.db, &unique_id, &input).await?;
    Ok(ApiResponse::message(Tag::Root, "Details updated successfully!"))
}

/// PUT /root/post/image — replace the stored image; the old blob is
/// deleted best-effort after the row is updated.
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
        .upload(image.bytes, &image.content_type, storage::POST_FOLDER)
        .await?;
    let previous = post_service::update_image(&state.db, &unique_id, &stored).await?;
    state.media.delete_detached(previous);

    Ok(ApiResponse::message(Tag::Root, "Details updated successfully!"))
}

/// PUT /root/post/toggle/status
pub async fn root_toggle_status(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<UniqueIdRequest>,
    body: Option<Json<UniqueIdRequest>>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let unique_id = UniqueIdRequest::resolve(query, body.map(|Json(b)| b))?;
    post_service::toggle_status(&state.db, &unique_id).await?;
    Ok(ApiResponse::message(Tag::Root, "Status updated successfully!"))
}

/// DELETE /root/post — hard delete plus best-effort blob cleanup.
pub async fn root_delete(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<UniqueIdRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let unique_id = UniqueIdRequest::resolve(query, None)?;
    let previous = post_service::delete(&state.db, &unique_id).await?;
    state.media.delete_detached(previous);
    Ok(ApiResponse::message(Tag::Root, "Post was deleted successfully!"))
}
