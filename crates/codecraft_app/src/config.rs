use std::fs;
use std::path::Path;

use codecraft_engine::OutputDir;
use craft_logging::{craft_error, craft_info, craft_warn};
use serde::{Deserialize, Serialize};

/// Persisted user settings: the API credential and the theme preference.
///
/// Loaded once at startup and passed along explicitly; saved whenever a
/// persist effect fires. There is no ambient global.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub dark_mode: bool,
}

pub fn load_settings(path: &Path) -> Settings {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Settings::default();
        }
        Err(err) => {
            craft_warn!("Failed to read settings from {:?}: {}", path, err);
            return Settings::default();
        }
    };

    match ron::from_str(&content) {
        Ok(settings) => {
            craft_info!("Loaded settings from {:?}", path);
            settings
        }
        Err(err) => {
            craft_warn!("Failed to parse settings from {:?}: {}", path, err);
            Settings::default()
        }
    }
}

pub fn save_settings(path: &Path, settings: &Settings) {
    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(settings, pretty) {
        Ok(text) => text,
        Err(err) => {
            craft_error!("Failed to serialize settings: {}", err);
            return;
        }
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    let Some(filename) = path.file_name().and_then(|name| name.to_str()) else {
        craft_error!("Settings path {:?} has no usable filename", path);
        return;
    };

    let store = OutputDir::new(dir);
    if let Err(err) = store.write(filename, &content) {
        craft_error!("Failed to write settings to {:?}: {}", path, err);
    }
}

#[cfg(test)]
mod tests {
    use super::{load_settings, save_settings, Settings};

    #[test]
    fn settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codecraft.ron");

        let settings = Settings {
            api_key: Some("sk-or-test".to_string()),
            dark_mode: true,
        };
        save_settings(&path, &settings);
        assert_eq!(load_settings(&path), settings);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.ron");
        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn unparsable_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        std::fs::write(&path, "not ron at all }}").unwrap();
        assert_eq!(load_settings(&path), Settings::default());
    }
}
