use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    info,
    warn,
};

use crate::{
    core::{
        filename_parser::results_base_name,
        FlicktionaryError,
        UnknownWord,
    },
    session::SessionResults,
};

const APP_NAME: &str = "flicktionary";

pub fn get_app_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        let app_dir = data_dir.join(APP_NAME);
        let _ = fs::create_dir_all(&app_dir);
        app_dir
    } else {
        PathBuf::from(".")
    }
}

pub fn get_data_file_path(filename: &str) -> PathBuf {
    get_app_data_dir().join(filename)
}

pub fn save_json_to<T: Serialize>(data: &T, file_path: &Path) -> Result<(), FlicktionaryError> {
    if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(data)?;
    fs::write(file_path, json)?;
    info!(path = %file_path.display(), "[Persistence] Data saved");
    Ok(())
}

/// Missing files load as `T::default()`.
pub fn load_json_from<T: for<'de> Deserialize<'de> + Default>(
    file_path: &Path,
) -> Result<T, FlicktionaryError> {
    if !file_path.exists() {
        return Ok(T::default());
    }

    let json = fs::read_to_string(file_path)?;
    let data: T = serde_json::from_str(&json)?;
    info!(path = %file_path.display(), "[Persistence] Data loaded");
    Ok(data)
}

pub fn load_json_or_default_from<T: for<'de> Deserialize<'de> + Default>(file_path: &Path) -> T {
    match load_json_from::<T>(file_path) {
        Ok(data) => data,
        Err(e) => {
            warn!(path = %file_path.display(), error = %e, "[Persistence] Failed to load, using defaults");
            T::default()
        }
    }
}

/// `<title>-vocabulary-results.json`, or the plain default name when no video is known.
pub fn default_export_name(video_file_name: Option<&str>) -> String {
    match video_file_name.map(results_base_name).filter(|base| !base.is_empty()) {
        Some(base) => format!("{}-vocabulary-results.json", base),
        None => "vocabulary-results.json".to_string(),
    }
}

/// Write the words the learner did not know as a flat JSON list of `{ "term": ... }`.
pub fn export_results(
    file_path: &Path,
    results: &SessionResults,
) -> Result<Vec<UnknownWord>, FlicktionaryError> {
    let unknown = results.unknown_words();
    save_json_to(&unknown, file_path)?;
    info!(words = unknown.len(), path = %file_path.display(), "[Persistence] Results exported");
    Ok(unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        ResponseRecord,
        VocabularyItem,
    };

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_json_round_trip_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sample.json");

        let missing: Sample = load_json_from(&path).unwrap();
        assert_eq!(missing, Sample::default());

        let sample = Sample { name: "x".to_string(), count: 3 };
        save_json_to(&sample, &path).unwrap();
        assert_eq!(load_json_from::<Sample>(&path).unwrap(), sample);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(load_json_from::<Sample>(&path).is_err());
        assert_eq!(load_json_or_default_from::<Sample>(&path), Sample::default());
    }

    #[test]
    fn test_export_writes_only_words_that_were_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");

        let mut was_unknown = ResponseRecord::new(VocabularyItem::new("hinder", "", ""), false);
        was_unknown.update(true);
        let results = SessionResults {
            records: vec![
                ResponseRecord::new(VocabularyItem::new("walk", "", ""), true),
                was_unknown,
            ],
        };

        let written = export_results(&path, &results).unwrap();
        assert_eq!(written, vec![UnknownWord { term: "hinder".to_string() }]);

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!([{ "term": "hinder" }]));
    }

    #[test]
    fn test_default_export_name() {
        assert_eq!(default_export_name(None), "vocabulary-results.json");
        assert_eq!(
            default_export_name(Some("The.Office.S02E03.720p.mkv")),
            "The Office - S02E03-vocabulary-results.json"
        );
    }
}
