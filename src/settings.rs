use std::path::{
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    core::FlicktionaryError,
    persistence::{
        get_data_file_path,
        load_json_or_default_from,
        save_json_to,
    },
    player::{
        DEFAULT_DRIFT_TOLERANCE_SECS,
        DEFAULT_ROLL_SECS,
    },
};

pub const SETTINGS_FILE: &str = "settings.json";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub prompt_path: Option<PathBuf>,
    pub ffmpeg_path: PathBuf,
    pub pre_roll_secs: f64,
    pub post_roll_secs: f64,
    pub audio_drift_tolerance_secs: f64,
    pub subtitle_offset_secs: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            prompt_path: None,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            pre_roll_secs: DEFAULT_ROLL_SECS,
            post_roll_secs: DEFAULT_ROLL_SECS,
            audio_drift_tolerance_secs: DEFAULT_DRIFT_TOLERANCE_SECS,
            subtitle_offset_secs: 0.0,
        }
    }
}

impl Settings {
    pub fn default_path() -> PathBuf {
        get_data_file_path(SETTINGS_FILE)
    }

    pub fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    pub fn load_from(path: &Path) -> Self {
        load_json_or_default_from(path)
    }

    pub fn save(&self) -> Result<(), FlicktionaryError> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), FlicktionaryError> {
        save_json_to(self, path)
    }

    /// The environment variable wins over the stored key.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.gemini_api_key.clone())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn set_api_key(&mut self, key: &str) -> Result<(), FlicktionaryError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(FlicktionaryError::MissingApiKey);
        }
        self.gemini_api_key = Some(key.to_string());
        Ok(())
    }

    pub fn clear_api_key(&mut self) {
        self.gemini_api_key = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join(SETTINGS_FILE));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.pre_roll_secs, 2.0);
        assert_eq!(settings.audio_drift_tolerance_secs, 0.3);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, r#"{ "gemini_model": "gemini-2.5-flash" }"#).unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.gemini_model, "gemini-2.5-flash");
        assert_eq!(settings.ffmpeg_path, PathBuf::from("ffmpeg"));
    }

    #[test]
    fn test_api_key_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);

        let mut settings = Settings::default();
        assert!(matches!(settings.set_api_key("   "), Err(FlicktionaryError::MissingApiKey)));
        settings.set_api_key(" abc123 ").unwrap();
        settings.save_to(&path).unwrap();

        let mut loaded = Settings::load_from(&path);
        assert_eq!(loaded.gemini_api_key.as_deref(), Some("abc123"));

        loaded.clear_api_key();
        assert_eq!(loaded.gemini_api_key, None);
    }
}
