//! Settings file and data directory resolution.

use shared::settings::AppSettings;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides `data_dir` from the settings file
pub const DATA_DIR_ENV: &str = "SLIDE_ASSISTANT_DATA_DIR";

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com.local", "Slide Assistant", "SlideAssistant")
}

pub fn config_path() -> Option<PathBuf> {
    let proj = project_dirs()?;
    let _ = fs::create_dir_all(proj.config_dir());
    Some(proj.config_dir().join("settings.json"))
}

/// Where the settings in use came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsOrigin {
    Loaded,
    /// No settings file yet, or no config directory
    Missing,
    /// The file exists but could not be read or parsed
    Invalid(String),
}

/// Load settings, falling back to defaults.
///
/// Runs before logging is set up, so the caller reports the origin.
pub fn load_settings_or_default() -> (AppSettings, SettingsOrigin) {
    match config_path() {
        Some(path) => load_settings_from(&path),
        None => (AppSettings::default(), SettingsOrigin::Missing),
    }
}

pub fn load_settings_from(path: &Path) -> (AppSettings, SettingsOrigin) {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return (AppSettings::default(), SettingsOrigin::Missing)
        }
        Err(e) => return (AppSettings::default(), SettingsOrigin::Invalid(e.to_string())),
    };
    match serde_json::from_slice::<AppSettings>(&bytes) {
        Ok(settings) => (settings, SettingsOrigin::Loaded),
        Err(e) => (AppSettings::default(), SettingsOrigin::Invalid(e.to_string())),
    }
}

pub fn save_settings(settings: &AppSettings) -> anyhow::Result<()> {
    let path = config_path().ok_or_else(|| anyhow::anyhow!("No config directory available"))?;
    save_settings_to(settings, &path)
}

pub fn save_settings_to(settings: &AppSettings, path: &Path) -> anyhow::Result<()> {
    let bytes = serde_json::to_vec_pretty(settings)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Directory the state record lives in: env override, then settings, then
/// the platform data directory, then `./data`.
pub fn resolve_data_dir(settings: &AppSettings, env_override: Option<OsString>) -> PathBuf {
    if let Some(dir) = env_override.filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    if let Some(dir) = &settings.data_dir {
        return dir.clone();
    }
    project_dirs()
        .map(|proj| proj.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_settings_file_is_fresh_default() {
        let dir = tempfile::tempdir().unwrap();
        let (settings, origin) = load_settings_from(&dir.path().join("settings.json"));
        assert_eq!(origin, SettingsOrigin::Missing);
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn test_garbage_settings_file_is_reported_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();
        let (settings, origin) = load_settings_from(&path);
        assert!(matches!(origin, SettingsOrigin::Invalid(_)));
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn test_settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = AppSettings {
            dark_mode: true,
            chat_latency_ms: 20,
            ..Default::default()
        };
        save_settings_to(&settings, &path).unwrap();

        let (loaded, origin) = load_settings_from(&path);
        assert_eq!(origin, SettingsOrigin::Loaded);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_data_dir_precedence() {
        let mut settings = AppSettings::default();
        settings.data_dir = Some(PathBuf::from("/from/settings"));

        assert_eq!(
            resolve_data_dir(&settings, Some(OsString::from("/from/env"))),
            PathBuf::from("/from/env")
        );
        assert_eq!(
            resolve_data_dir(&settings, Some(OsString::new())),
            PathBuf::from("/from/settings")
        );
        assert_eq!(resolve_data_dir(&settings, None), PathBuf::from("/from/settings"));
    }
}
