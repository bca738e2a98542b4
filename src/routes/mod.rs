//! Route definitions for the Atrium API.

pub mod banners;
pub mod categories;
pub mod events;
pub mod health;
pub mod posts;

use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{ApiResponse, AppError, Tag};
use crate::models::pagination::{ListParams, ListPayload, Listed};
use crate::AppState;

/// Assemble the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        // Posts
        .route("/root/posts", get(posts::root_list))
        .route("/root/search/posts", get(posts::root_search))
        .route("/root/post", get(posts::root_get).delete(posts::root_delete))
        .route("/public/posts", get(posts::public_list))
        .route("/public/search/posts", get(posts::public_search))
        .route("/public/posts/via/category", get(posts::public_list_by_category))
        .route("/public/post/stripped", get(posts::public_get_by_stripped))
        .route("/public/post/like", post(posts::public_like))
        .route("/root/post/add", post(posts::root_add))
        .route("/root/post/update", put(posts::root_update))
        .route("/root/post/update/alt/text", put(posts::root_update_alt_text))
        .route("/root/post/update/details", put(posts::root_update_details))
        .route("/root/post/image", put(posts::root_update_image))
        .route("/root/post/toggle/status", put(posts::root_toggle_status))
        // Categories
        .route("/root/categories", get(categories::root_list))
        .route("/root/search/categories", get(categories::root_search))
        .route(
            "/root/category",
            get(categories::root_get).delete(categories::root_delete),
        )
        .route("/public/categories", get(categories::public_list))
        .route("/public/search/categories", get(categories::public_search))
        .route("/public/category/stripped", get(categories::public_get_by_stripped))
        .route("/root/category/add", post(categories::root_add))
        .route("/root/category/update", put(categories::root_update))
        .route("/root/category/image", put(categories::root_update_image))
        .route("/root/category/toggle/status", put(categories::root_toggle_status))
        // Events
        .route("/root/events", get(events::root_list))
        .route("/root/search/events", get(events::root_search))
        .route("/root/event", get(events::root_get).delete(events::root_delete))
        .route("/public/events", get(events::public_list))
        .route("/public/events/via/type", get(events::public_list_by_type))
        .route("/public/search/events", get(events::public_search))
        .route("/public/event/stripped", get(events::public_get_by_stripped))
        .route("/root/event/add", post(events::root_add))
        .route("/root/event/update/name", put(events::root_update_name))
        .route("/root/event/update/type", put(events::root_update_type))
        .route("/root/event/update/location", put(events::root_update_location))
        .route("/root/event/update/duration", put(events::root_update_duration))
        .route(
            "/root/event/update/description",
            put(events::root_update_description),
        )
        .route("/root/event/image", put(events::root_update_image))
        .route("/root/event/toggle/status", put(events::root_toggle_status))
        // Banners
        .route("/root/banners", get(banners::root_list))
        .route("/root/banner", get(banners::root_get).delete(banners::root_delete))
        .route("/public/banners", get(banners::public_list))
        .route("/root/banner/add", post(banners::root_add))
        .route("/root/banner/update", put(banners::root_update))
        .route("/root/banner/image", put(banners::root_update_image))
        .route("/root/banner/toggle/status", put(banners::root_toggle_status))
        .with_state(state)
}

/// Shape a listing result: the page object with a "loaded" message, or the
/// empty-sequence payload with the "not found" message. Both are successes.
pub(crate) fn respond_list<T: Serialize>(
    tag: Tag,
    loaded: &str,
    empty: &str,
    listed: Listed<T>,
) -> Json<ApiResponse<ListPayload<T>>> {
    if listed.is_empty() {
        ApiResponse::success(tag, empty, ListPayload::Empty([]))
    } else {
        ApiResponse::success(tag, loaded, ListPayload::from(listed))
    }
}

/// Query/body payload for search endpoints: the search term rides next to
/// the usual listing parameters.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(length(min = 2, max = 500, message = "Invalid length (2 - 500) characters"))]
    pub search: Option<String>,
    #[serde(flatten)]
    pub params: ListParams,
}

impl SearchRequest {
    /// Merge query and body (query preferred), validate, and yield the
    /// term plus listing parameters.
    pub fn resolve(query: Self, body: Option<Self>) -> Result<(String, ListParams), AppError> {
        let body = body.unwrap_or_default();
        let merged = Self {
            search: query.search.filter(|s| !s.is_empty()).or(body.search),
            params: ListParams::merged(query.params, Some(body.params)),
        };
        merged.validate()?;
        let search = merged
            .search
            .ok_or_else(|| AppError::validation("Search is required"))?;
        Ok((search, merged.params))
    }
}

/// Single-entity reference accepted from query or body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UniqueIdRequest {
    pub unique_id: Option<String>,
}

impl UniqueIdRequest {
    pub fn resolve(query: Self, body: Option<Self>) -> Result<String, AppError> {
        query
            .unique_id
            .filter(|s| !s.is_empty())
            .or(body.and_then(|b| b.unique_id).filter(|s| !s.is_empty()))
            .ok_or_else(|| AppError::validation("Unique Id is required"))
    }
}

/// Pull a required, non-empty string field out of an optional query value.
pub(crate) fn require_field(value: Option<String>, message: &str) -> Result<String, AppError> {
    value
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::validation(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_resolve_prefers_query_term() {
        let query = SearchRequest {
            search: Some("gala".into()),
            params: ListParams::default(),
        };
        let body = SearchRequest {
            search: Some("other".into()),
            params: ListParams {
                page: Some(2),
                ..ListParams::default()
            },
        };
        let (term, params) = SearchRequest::resolve(query, Some(body)).unwrap();
        assert_eq!(term, "gala");
        assert_eq!(params.page, Some(2));
    }

    #[test]
    fn search_resolve_requires_a_term() {
        let err = SearchRequest::resolve(SearchRequest::default(), None).unwrap_err();
        assert_eq!(err.to_string(), "Search is required");
    }

    #[test]
    fn search_resolve_enforces_length() {
        let query = SearchRequest {
            search: Some("a".into()),
            params: ListParams::default(),
        };
        assert!(SearchRequest::resolve(query, None).is_err());
    }

    #[test]
    fn unique_id_resolve_falls_back_to_body() {
        let resolved = UniqueIdRequest::resolve(
            UniqueIdRequest { unique_id: Some(String::new()) },
            Some(UniqueIdRequest {
                unique_id: Some("abc".into()),
            }),
        )
        .unwrap();
        assert_eq!(resolved, "abc");
    }

    #[test]
    fn respond_list_picks_message_by_emptiness() {
        let empty: Listed<i32> = Listed {
            count: 0,
            rows: vec![],
            pages: Some(0),
        };
        let response = respond_list(Tag::Root, "loaded", "not found", empty);
        let json = serde_json::to_value(&response.0).unwrap();
        assert_eq!(json["message"], "not found");
        assert_eq!(json["data"], serde_json::json!([]));

        let full = Listed {
            count: 1,
            rows: vec![7],
            pages: Some(1),
        };
        let response = respond_list(Tag::Anonymous, "loaded", "not found", full);
        let json = serde_json::to_value(&response.0).unwrap();
        assert_eq!(json["message"], "loaded");
        assert_eq!(json["data"]["count"], 1);
    }
}
