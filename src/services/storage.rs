//! Media store client: HTTP upload/delete against the external image
//! service. Uploads and deletes run outside any database transaction;
//! deletes are fired and forgotten.

use serde::Deserialize;
use uuid::Uuid;

use crate::config::MediaSettings;
use crate::errors::AppError;

pub const POST_FOLDER: &str = "images/blog/posts";
pub const CATEGORY_FOLDER: &str = "images/blog/categories";
pub const EVENT_FOLDER: &str = "images/events";
pub const BANNER_FOLDER: &str = "images/banners";

/// Handle returned by a successful upload. Both fields are stored
/// together; `public_id` never leaves the service layer.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredImage {
    #[serde(rename = "secure_url")]
    pub url: String,
    pub public_id: String,
}

#[derive(Debug, Clone)]
pub struct MediaStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    folder_root: String,
}

impl MediaStore {
    pub fn from_config(settings: &MediaSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            folder_root: settings.folder_root.clone(),
        }
    }

    /// Upload an image into a per-resource folder under the configured
    /// root, keyed by a fresh public id.
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
        folder: &str,
    ) -> Result<StoredImage, AppError> {
        let public_id = Uuid::new_v4().to_string();
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(public_id.clone())
            .mime_str(content_type)
            .map_err(|_| AppError::bad_request("Error uploading image!"))?;
        let form = reqwest::multipart::Form::new()
            .text("public_id", public_id)
            .text("folder", format!("/{}/{}", self.folder_root, folder))
            .part("file", part);

        let response = self
            .http
            .post(format!("{}/upload", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Image upload request failed");
                AppError::bad_request("Error uploading image!")
            })?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "Image upload rejected");
            return Err(AppError::bad_request("Error uploading image!"));
        }

        response
            .json::<StoredImage>()
            .await
            .map_err(|_| AppError::bad_request("Error uploading image!"))
    }

    /// Best-effort delete of a stored image: spawned, never awaited by the
    /// caller, failures only logged.
    pub fn delete_detached(&self, public_id: Option<String>) {
        let Some(public_id) = public_id else {
            return;
        };
        let store = self.clone();
        tokio::spawn(async move {
            let result = store
                .http
                .delete(format!("{}/assets/{}", store.base_url, public_id))
                .bearer_auth(&store.api_key)
                .send()
                .await;
            match result {
                Ok(response) if response.status().is_success() => {
                    tracing::info!(%public_id, "Deleted stored image");
                }
                Ok(response) => {
                    tracing::warn!(%public_id, status = %response.status(), "Unable to delete stored image");
                }
                Err(e) => {
                    tracing::warn!(%public_id, error = %e, "Unable to delete stored image");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let store = MediaStore::from_config(&MediaSettings {
            base_url: "https://media.example/v1/".into(),
            api_key: "k".into(),
            folder_root: "site".into(),
        });
        assert_eq!(store.base_url, "https://media.example/v1");
    }

    #[test]
    fn stored_image_deserializes_from_upload_response() {
        let image: StoredImage = serde_json::from_str(
            r#"{"secure_url":"https://media.example/site/images/banners/abc.webp","public_id":"abc"}"#,
        )
        .unwrap();
        assert_eq!(image.public_id, "abc");
        assert!(image.url.ends_with(".webp"));
    }
}
