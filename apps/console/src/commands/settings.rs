//! # Settings Commands
//!
//! Store settings are replaced wholesale: the command reads the current
//! settings, overlays the given fields and dispatches the full struct.
//!
//! ## Logo Upload
//! ```text
//! logo.png ──► read bytes ──► validate_logo (≤ 500,000 bytes)
//!                                  │
//!                                  ▼
//!             "data:image/png;base64,iVBORw0KGgo..." ──► brandLogo
//! ```

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::commands::submit;
use crate::error::ApiError;
use crate::state::AppController;
use orina_core::validation::validate_logo;
use orina_core::{AppSettings, Command, Language};
use orina_store::StoreError;

/// Fields supplied on `settings update`. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsChanges {
    pub currency: Option<String>,
    pub brand_name: Option<String>,
    pub brand_address: Option<String>,
    pub brand_phone: Option<String>,
    /// Image file to embed as the logo.
    pub logo: Option<PathBuf>,
    /// Remove the logo. Ignored when `logo` is given.
    pub clear_logo: bool,
    pub language: Option<Language>,
}

pub fn show_settings(controller: &AppController) -> AppSettings {
    controller.state().settings.clone()
}

/// Overlays the changes on the current settings and saves them.
pub fn update_settings(
    controller: &mut AppController,
    changes: SettingsChanges,
    now: DateTime<Utc>,
) -> Result<AppSettings, ApiError> {
    let mut settings = controller.state().settings.clone();

    if let Some(currency) = changes.currency {
        settings.currency = currency.trim().to_uppercase();
    }
    if let Some(name) = changes.brand_name {
        settings.brand_name = name;
    }
    if let Some(address) = changes.brand_address {
        settings.brand_address = address;
    }
    if let Some(phone) = changes.brand_phone {
        settings.brand_phone = phone;
    }
    if let Some(language) = changes.language {
        settings.language = language;
    }

    match changes.logo {
        Some(path) => settings.brand_logo = logo_data_url(&path)?,
        None if changes.clear_logo => settings.brand_logo.clear(),
        None => {}
    }

    submit(controller, Command::UpdateSettings(settings.clone()), now);
    info!(brand = %settings.brand_name, language = ?settings.language, "Settings updated");
    Ok(settings)
}

/// Reads an image file and encodes it as a data URL.
///
/// ## Errors
/// - `STORAGE_ERROR` when the file cannot be read
/// - `VALIDATION_ERROR` when it is over the size limit
pub fn logo_data_url(path: &Path) -> Result<String, ApiError> {
    let bytes = std::fs::read(path).map_err(|e| StoreError::io(path, e))?;
    validate_logo(&bytes)?;

    let mime = mime_for(path);
    debug!(path = %path.display(), bytes = bytes.len(), mime, "Encoding logo");
    Ok(format!("data:{};base64,{}", mime, BASE64.encode(&bytes)))
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::seeded_controller;
    use crate::error::ErrorCode;

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let (_dir, mut controller, now) = seeded_controller();
        let before = show_settings(&controller);

        let settings = update_settings(
            &mut controller,
            SettingsChanges {
                brand_name: Some("Orina Beverages".to_string()),
                language: Some(Language::English),
                currency: Some(" usd".to_string()),
                ..Default::default()
            },
            now,
        )
        .unwrap();

        assert_eq!(settings.brand_name, "Orina Beverages");
        assert_eq!(settings.currency, "USD");
        assert_eq!(settings.brand_phone, before.brand_phone);
        assert_eq!(controller.state().settings, settings);
    }

    #[test]
    fn test_logo_upload_and_clear() {
        let (dir, mut controller, now) = seeded_controller();
        let logo = dir.path().join("logo.PNG");
        std::fs::write(&logo, [0x89, b'P', b'N', b'G']).unwrap();

        let settings = update_settings(
            &mut controller,
            SettingsChanges {
                logo: Some(logo),
                ..Default::default()
            },
            now,
        )
        .unwrap();
        assert_eq!(settings.brand_logo, "data:image/png;base64,iVBORw==");

        let settings = update_settings(
            &mut controller,
            SettingsChanges {
                clear_logo: true,
                ..Default::default()
            },
            now,
        )
        .unwrap();
        assert!(settings.brand_logo.is_empty());
    }

    #[test]
    fn test_oversized_logo_rejected() {
        let (dir, mut controller, now) = seeded_controller();
        let logo = dir.path().join("huge.jpg");
        std::fs::write(&logo, vec![0u8; 600_000]).unwrap();

        let err = update_settings(
            &mut controller,
            SettingsChanges {
                logo: Some(logo),
                ..Default::default()
            },
            now,
        )
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(controller.state().settings.brand_logo.is_empty());
    }

    #[test]
    fn test_missing_logo_file() {
        let err = logo_data_url(Path::new("/nonexistent/logo.png")).unwrap_err();
        assert_eq!(err.code, ErrorCode::StorageError);
    }
}
