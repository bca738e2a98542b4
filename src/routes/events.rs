//! Event routes: root CRUD plus the public read surface.

use axum::extract::{Multipart, Query, State};
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::errors::{ApiResponse, AppError, Tag};
use crate::middleware::auth::RootKey;
use crate::middleware::uploads;
use crate::models::event::{
    CreateEvent, Event, EventSummary, UpdateEventDescription, UpdateEventDuration,
    UpdateEventLocation, UpdateEventName, UpdateEventType,
};
use crate::models::pagination::{ListParams, ListPayload};
use crate::routes::posts::StrippedRequest;
use crate::routes::{respond_list, require_field, SearchRequest, UniqueIdRequest};
use crate::services::{event as event_service, storage};
use crate::AppState;

/// Type scope for the upcoming-events surface.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TypeScope {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// GET /root/events — list every event, any status.
pub async fn root_list(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<ListParams>,
    body: Option<Json<ListParams>>,
) -> Result<Json<ApiResponse<ListPayload<Event>>>, AppError> {
    let params = ListParams::merged(query, body.map(|Json(b)| b));
    let result = event_service::list_root(&state.db, &params, &state.config.listing).await?;
    Ok(respond_list(Tag::Root, "Events loaded", "Events Not found", result))
}

/// GET /root/search/events — search names across every status.
pub async fn root_search(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<SearchRequest>,
    body: Option<Json<SearchRequest>>,
) -> Result<Json<ApiResponse<ListPayload<Event>>>, AppError> {
    let (search, params) = SearchRequest::resolve(query, body.map(|Json(b)| b))?;
    let result =
        event_service::search_root(&state.db, &search, &params, &state.config.listing).await?;
    Ok(respond_list(Tag::Root, "Events loaded", "Events Not found", result))
}

/// GET /root/event — fetch one event by unique id, any status.
pub async fn root_get(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<UniqueIdRequest>,
) -> Result<Json<ApiResponse<Event>>, AppError> {
    let unique_id = UniqueIdRequest::resolve(query, None)?;
    let event = event_service::find_root(&state.db, &unique_id).await?;
    Ok(ApiResponse::success(Tag::Root, "Event loaded", event))
}

/// GET /public/events — every active event in schedule order. This surface
/// deliberately skips pagination and returns the full filtered set.
pub async fn public_list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ListPayload<EventSummary>>>, AppError> {
    let result = event_service::list_public(&state.db)
        .await
        .map_err(|e| e.tagged(Tag::Anonymous))?;
    Ok(respond_list(Tag::Anonymous, "Events loaded", "Events Not found", result))
}

/// GET /public/events/via/type — upcoming active events of one type,
/// unpaginated.
pub async fn public_list_by_type(
    State(state): State<AppState>,
    Query(scope): Query<TypeScope>,
) -> Result<Json<ApiResponse<ListPayload<EventSummary>>>, AppError> {
    let kind = require_field(scope.kind, "Type is required").map_err(|e| e.tagged(Tag::Anonymous))?;
    if kind.len() < 3 || kind.len() > 20 {
        return Err(
            AppError::validation("Invalid length (3 - 20) characters").tagged(Tag::Anonymous)
        );
    }
    let result = event_service::list_public_by_type(&state.db, &kind)
        .await
        .map_err(|e| e.tagged(Tag::Anonymous))?;
    Ok(respond_list(Tag::Anonymous, "Events loaded", "Events Not found", result))
}

/// GET /public/search/events — search active events, paginated.
pub async fn public_search(
    State(state): State<AppState>,
    Query(query): Query<SearchRequest>,
    body: Option<Json<SearchRequest>>,
) -> Result<Json<ApiResponse<ListPayload<EventSummary>>>, AppError> {
    let (search, params) =
        SearchRequest::resolve(query, body.map(|Json(b)| b)).map_err(|e| e.tagged(Tag::Anonymous))?;
    let result = event_service::search_public(&state.db, &search, &params, &state.config.listing)
        .await
        .map_err(|e| e.tagged(Tag::Anonymous))?;
    Ok(respond_list(Tag::Anonymous, "Events loaded", "Events Not found", result))
}

/// GET /public/event/stripped — fetch one active event by slug and count
/// the view.
pub async fn public_get_by_stripped(
    State(state): State<AppState>,
    Query(query): Query<StrippedRequest>,
) -> Result<Json<ApiResponse<Event>>, AppError> {
    let stripped = require_field(query.stripped, "Stripped is required")
        .map_err(|e| e.tagged(Tag::Anonymous))?;
    let event = event_service::find_public_by_stripped(&state.db, &stripped)
        .await
        .map_err(|e| e.tagged(Tag::Anonymous))?;
    Ok(ApiResponse::success(Tag::Anonymous, "Event loaded", event))
}

/// POST /root/event/add — create an event from a multipart form; the image
/// is required and the start must lie in the future.
pub async fn root_add(
    State(state): State<AppState>,
    _key: RootKey,
    multipart: Multipart,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let (fields, image) = uploads::image_form(multipart).await?;
    let input: CreateEvent = uploads::parse_fields(fields)?;
    let image = image.ok_or_else(|| AppError::bad_request("Image is required!"))?;

    let stored = state
        .media
        .upload(image.bytes, &image.content_type, storage::EVENT_FOLDER)
        .await?;
    event_service::create(&state.db, &input, &stored).await?;

    Ok(ApiResponse::message(Tag::Root, "Event created successfully!"))
}

/// PUT /root/event/update/name
pub async fn root_update_name(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<UniqueIdRequest>,
    Json(input): Json<UpdateEventName>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let unique_id = UniqueIdRequest::resolve(query, None)?;
    input.validate()?;
    event_service::update_name(&state.db, &unique_id, &input).await?;
    Ok(ApiResponse::message(Tag::Root, "Details updated successfully!"))
}

/// PUT /root/event/update/type
pub async fn root_update_type(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<UniqueIdRequest>,
    Json(input): Json<UpdateEventType>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let unique_id = UniqueIdRequest::resolve(query, None)?;
    input.validate()?;
    event_service::update_type(&state.db, &unique_id, &input).await?;
    Ok(ApiResponse::message(Tag::Root, "Details updated successfully!"))
}

/// PUT /root/event/update/location
pub async fn root_update_location(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<UniqueIdRequest>,
    Json(input): Json<UpdateEventLocation>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let unique_id = UniqueIdRequest::resolve(query, None)?;
    input.validate()?;
    event_service::update_location(&state.db, &unique_id, &input).await?;
    Ok(ApiResponse::message(Tag::Root, "Details updated successfully!"))
}

/// PUT /root/event/update/duration — move the date window.
pub async fn root_update_duration(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<UniqueIdRequest>,
    Json(input): Json<UpdateEventDuration>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let unique_id = UniqueIdRequest::resolve(query, None)?;
    input.validate()?;
    event_service::update_duration(&state.db, &unique_id, &input).await?;
    Ok(ApiResponse::message(Tag::Root, "Details updated successfully!"))
}

/// PUT /root/event/update/description
pub async fn root_update_description(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<UniqueIdRequest>,
    Json(input): Json<UpdateEventDescription>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let unique_id = UniqueIdRequest::resolve(query, None)?;
    input.validate()?;
    event_service::update_description(&state.db, &unique_id, &input).await?;
    Ok(ApiResponse::message(Tag::Root, "Details updated successfully!"))
}

/// PUT /root/event/image — replace the stored image.
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
        .upload(image.bytes, &image.content_type, storage::EVENT_FOLDER)
        .await?;
    let previous = event_service::update_image(&state.db, &unique_id, &stored).await?;
    state.media.delete_detached(previous);

    Ok(ApiResponse::message(Tag::Root, "Details updated successfully!"))
}

/// PUT /root/event/toggle/status
pub async fn root_toggle_status(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<UniqueIdRequest>,
    body: Option<Json<UniqueIdRequest>>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let unique_id = UniqueIdRequest::resolve(query, body.map(|Json(b)| b))?;
    event_service::toggle_status(&state.db, &unique_id).await?;
    Ok(ApiResponse::message(Tag::Root, "Status updated successfully!"))
}

/// DELETE /root/event — hard delete plus best-effort blob cleanup.
pub async fn root_delete(
    State(state): State<AppState>,
    _key: RootKey,
    Query(query): Query<UniqueIdRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let unique_id = UniqueIdRequest::resolve(query, None)?;
    let previous = event_service::delete(&state.db, &unique_id).await?;
    state.media.delete_detached(previous);
    Ok(ApiResponse::message(Tag::Root, "Event was deleted successfully!"))
}
