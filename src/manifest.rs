//! Installable web app manifest
//!
//! Written next to the built bundle so the game can be added to a home
//! screen and launched full-screen in landscape.

use serde::{Deserialize, Serialize};

/// Browser chrome shown around the installed app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    Fullscreen,
    Standalone,
    MinimalUi,
    Browser,
}

/// Orientation lock requested by the installed app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrientationLock {
    Any,
    Landscape,
    Portrait,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestIcon {
    pub src: String,
    /// e.g. `"192x192"`
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl ManifestIcon {
    /// Square PNG icon named `pwa-{size}x{size}.png`
    pub fn png(size: u32) -> Self {
        Self {
            src: format!("pwa-{size}x{size}.png"),
            sizes: format!("{size}x{size}"),
            mime_type: "image/png".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppManifest {
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub theme_color: String,
    pub background_color: String,
    pub display: DisplayMode,
    pub orientation: OrientationLock,
    pub icons: Vec<ManifestIcon>,
}

impl Default for AppManifest {
    fn default() -> Self {
        Self {
            name: "School Journey Game".to_string(),
            short_name: "SchoolJourney".to_string(),
            description: "A fun journey to school for kids".to_string(),
            theme_color: "#ffffff".to_string(),
            background_color: "#ffffff".to_string(),
            // Hides the browser UI so it looks like an app
            display: DisplayMode::Standalone,
            orientation: OrientationLock::Landscape,
            icons: vec![ManifestIcon::png(192), ManifestIcon::png(512)],
        }
    }
}

impl AppManifest {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
