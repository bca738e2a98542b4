use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    /// Access key required by every `/root/*` route.
    pub root_access_key: String,
    pub max_upload_bytes: usize,
    pub listing: ListSettings,
    pub media: MediaSettings,
}

/// Tunables for the listing engine, injected into the pagination and
/// query-building code instead of living there as module constants.
#[derive(Debug, Clone)]
pub struct ListSettings {
    /// Effective page size never drops below this floor; requests asking
    /// for less (or nothing) get exactly this many records.
    pub page_size_floor: i64,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            page_size_floor: 20,
        }
    }
}

/// Connection settings for the external media store.
#[derive(Debug, Clone)]
pub struct MediaSettings {
    pub base_url: String,
    pub api_key: String,
    /// Root folder prepended to every per-resource upload folder.
    pub folder_root: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BACKEND_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            root_access_key: env::var("ROOT_ACCESS_KEY")?,
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| "5000000".to_string())
                .parse()
                .unwrap_or(5_000_000),
            listing: ListSettings {
                page_size_floor: env::var("LIST_PAGE_SIZE_FLOOR")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .unwrap_or(20),
            },
            media: MediaSettings {
                base_url: env::var("MEDIA_BASE_URL")
                    .unwrap_or_else(|_| "https://media.invalid/v1".to_string()),
                api_key: env::var("MEDIA_API_KEY").unwrap_or_default(),
                folder_root: env::var("MEDIA_FOLDER_ROOT")
                    .unwrap_or_else(|_| "site".to_string()),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_settings_default_floor() {
        assert_eq!(ListSettings::default().page_size_floor, 20);
    }
}
