//! Studio UI config: bundled default via include_str!, overridden by a local file if present.

use serde::Deserialize;

const DEFAULT_UI_CONFIG: &str = include_str!("../assets/ui_config.json");

#[derive(Debug, Clone, Deserialize)]
pub struct StudioConfig {
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
    #[serde(default = "default_true")]
    pub theme_dark: bool,
    /// Visible rows of the read-only code editor.
    #[serde(default = "default_editor_rows")]
    pub editor_rows: usize,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            theme_dark: true,
            editor_rows: default_editor_rows(),
        }
    }
}

fn default_window_width() -> f32 {
    1280.0
}
fn default_window_height() -> f32 {
    800.0
}
fn default_true() -> bool {
    true
}
fn default_editor_rows() -> usize {
    28
}

impl StudioConfig {
    /// Local file (next to the manifest or under the cwd) if present, else the bundled default.
    pub fn load() -> Self {
        let manifest_assets = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets");
        let cwd_assets = std::env::current_dir()
            .ok()
            .map(|p| p.join("add-ons").join("quickproto-studio-ui").join("assets"));

        let path = [Some(manifest_assets), cwd_assets]
            .into_iter()
            .flatten()
            .find(|b| b.join("ui_config.json").exists())
            .map(|b| b.join("ui_config.json"));

        let s = path.and_then(|p| std::fs::read_to_string(p).ok());
        Self::parse(s.as_deref().unwrap_or(DEFAULT_UI_CONFIG))
    }

    /// Invalid JSON falls back to defaults.
    pub fn parse(s: &str) -> Self {
        match serde_json::from_str(s) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(error = %e, "invalid ui_config.json, using defaults");
                Self::default()
            }
        }
    }
}
