//! Activity settings persistence with file locking.
//!
//! The settings file holds the chosen activity mode, the fixed PAL factor
//! and the per-day factor log. Loads take a shared lock and fall back to
//! defaults on a missing or corrupt file; saves are atomic (temp file,
//! sync, rename) under an exclusive lock.

use crate::{ActivitySettings, Error, Result};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

impl ActivitySettings {
    /// Load settings from a file with shared locking
    ///
    /// Returns default settings if the file doesn't exist.
    /// If the file is corrupted, logs a warning and returns defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No settings file found, using defaults");
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(
                    "Unable to open settings file {:?}: {}. Using defaults.",
                    path,
                    e
                );
                return Ok(Self::default());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!(
                "Unable to lock settings file {:?}: {}. Using defaults.",
                path,
                e
            );
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!(
                "Failed to read settings file {:?}: {}. Using defaults.",
                path,
                e
            );
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<ActivitySettings>(&contents) {
            Ok(settings) => {
                tracing::debug!("Loaded activity settings from {:?}", path);
                Ok(settings)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse settings file {:?}: {}. Using defaults.",
                    path,
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Save settings to a file with exclusive locking
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Unique temp file in the same directory for atomic rename
        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "settings path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved activity settings to {:?}", path);
        Ok(())
    }

    /// Load settings, modify them, and save them back atomically
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut ActivitySettings) -> Result<()>,
    {
        let mut settings = Self::load(path)?;
        f(&mut settings)?;
        settings.save(path)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActivityMode;

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("activity_settings.json");

        let mut settings = ActivitySettings::default();
        settings.set_mode(ActivityMode::Daily);
        settings.set_fixed_pal(1.4).unwrap();
        settings.set_daily_pal("2024-03-05", 1.8).unwrap();

        settings.save(&path).unwrap();
        let loaded = ActivitySettings::load(&path).unwrap();

        assert_eq!(loaded, settings);
        assert_eq!(loaded.daily_pal("2024-03-05"), Some(1.8));
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        let settings = ActivitySettings::load(&path).unwrap();
        assert_eq!(settings, ActivitySettings::default());
    }

    #[test]
    fn test_corrupted_file_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("corrupted.json");

        std::fs::write(&path, "{ invalid json }").unwrap();

        let settings = ActivitySettings::load(&path).unwrap();
        assert_eq!(settings, ActivitySettings::default());
    }

    #[test]
    fn test_update_pattern() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("activity_settings.json");

        ActivitySettings::default().save(&path).unwrap();

        ActivitySettings::update(&path, |settings| {
            settings.set_mode(ActivityMode::Fixed);
            settings.set_fixed_pal(1.2)
        })
        .unwrap();

        let loaded = ActivitySettings::load(&path).unwrap();
        assert_eq!(loaded.mode(), Some(ActivityMode::Fixed));
        assert_eq!(loaded.fixed_pal(), Some(1.2));
    }

    #[test]
    fn test_update_rejects_invalid_factor_without_saving() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("activity_settings.json");

        let mut settings = ActivitySettings::default();
        settings.set_mode(ActivityMode::Fixed);
        settings.save(&path).unwrap();

        let result = ActivitySettings::update(&path, |settings| settings.set_fixed_pal(9.0));
        assert!(result.is_err());

        let loaded = ActivitySettings::load(&path).unwrap();
        assert_eq!(loaded.fixed_pal(), None);
    }

    #[test]
    fn test_atomic_save_leaves_no_stray_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("activity_settings.json");

        ActivitySettings::default().save(&path).unwrap();

        assert!(path.exists());
        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "activity_settings.json")
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only activity_settings.json, found extras: {:?}",
            extras
        );
    }
}
