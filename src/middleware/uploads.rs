//! Multipart image-form parsing shared by the upload routes.

use axum::extract::Multipart;
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

use crate::errors::AppError;

/// Accepted image content types.
pub const IMAGE_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpg",
    "image/jpeg",
    "image/jfif",
    "image/webp",
];

/// An image file pulled out of a multipart form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

pub fn is_allowed_image(content_type: &str) -> bool {
    IMAGE_MIME_TYPES.contains(&content_type.to_lowercase().as_str())
}

/// Drain a multipart form into its text fields plus the optional `image`
/// file part, enforcing the image mime allowlist.
pub async fn image_form(
    mut multipart: Multipart,
) -> Result<(serde_json::Map<String, Value>, Option<ImageUpload>), AppError> {
    let mut fields = serde_json::Map::new();
    let mut image: Option<ImageUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "image" {
            let content_type = field.content_type().unwrap_or("").to_string();
            if !is_allowed_image(&content_type) {
                return Err(AppError::bad_request("Only image files are allowed!"));
            }
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::bad_request(format!("Failed to read image: {e}")))?
                .to_vec();
            image = Some(ImageUpload {
                bytes,
                content_type,
            });
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::bad_request(format!("Failed to read field '{name}': {e}")))?;
            fields.insert(name, Value::String(text));
        }
    }

    Ok((fields, image))
}

/// Deserialize the collected text fields into a typed DTO and validate it.
pub fn parse_fields<T: DeserializeOwned + Validate>(
    fields: serde_json::Map<String, Value>,
) -> Result<T, AppError> {
    let input: T = serde_json::from_value(Value::Object(fields))
        .map_err(|e| AppError::validation(format!("Invalid form fields: {e}")))?;
    input.validate()?;
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_mime_allowlist() {
        assert!(is_allowed_image("image/png"));
        assert!(is_allowed_image("image/PNG"));
        assert!(is_allowed_image("image/webp"));
        assert!(!is_allowed_image("application/pdf"));
        assert!(!is_allowed_image("video/mp4"));
        assert!(!is_allowed_image(""));
    }

    #[test]
    fn parse_fields_validates_dto() {
        use crate::models::category::CreateCategory;

        let mut fields = serde_json::Map::new();
        fields.insert("name".into(), Value::String("Press Releases".into()));
        let input: CreateCategory = parse_fields(fields).unwrap();
        assert_eq!(input.name, "Press Releases");

        let mut short = serde_json::Map::new();
        short.insert("name".into(), Value::String("ab".into()));
        assert!(parse_fields::<CreateCategory>(short).is_err());
    }
}
