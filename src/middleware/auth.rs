//! Root access-key extractor for administrative routes.

use std::collections::HashMap;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;

use crate::errors::AppError;
use crate::AppState;

/// Header carrying the access key; a `key` query parameter is accepted as
/// a fallback.
pub const ACCESS_KEY_HEADER: &str = "atrium-access-key";

/// Marker extractor: the request carried the configured root access key.
///
/// ```ignore
/// async fn handler(_root: RootKey, State(state): State<AppState>) { ... }
/// ```
#[derive(Debug, Clone)]
pub struct RootKey;

impl FromRequestParts<AppState> for RootKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_key = parts
            .headers
            .get(ACCESS_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let key = match header_key {
            Some(key) if !key.is_empty() => key,
            _ => Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
                .ok()
                .and_then(|Query(params)| params.get("key").cloned())
                .filter(|key| !key.is_empty())
                .ok_or_else(|| AppError::forbidden("No key provided!"))?,
        };

        if key != state.config.root_access_key {
            return Err(AppError::forbidden("Require Root key!"));
        }

        Ok(RootKey)
    }
}
