//! Append-only JSONL persistence for the three input logs.
//!
//! Food entries, step counts and workout sessions are appended to JSONL
//! (JSON Lines) files with file locking for safe concurrent access. The
//! engine never reads these files itself; callers load a snapshot and pass
//! it in. Reads are tolerant: malformed lines are logged and skipped so one
//! bad record does not take the whole log down.

use crate::{FoodLogEntry, Result, StepsEntry, WorkoutSession};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// File-backed store for the user's logs, rooted at a data directory
pub struct LogStore {
    dir: PathBuf,
}

impl LogStore {
    /// Create a store rooted at the given data directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the food diary log
    pub fn food_log_path(&self) -> PathBuf {
        self.dir.join("food_log.jsonl")
    }

    /// Path of the steps log
    pub fn steps_log_path(&self) -> PathBuf {
        self.dir.join("steps_log.jsonl")
    }

    /// Path of the workout session log
    pub fn sessions_log_path(&self) -> PathBuf {
        self.dir.join("workout_sessions.jsonl")
    }

    /// Append a food diary entry
    pub fn append_food(&self, entry: &FoodLogEntry) -> Result<()> {
        append_line(&self.food_log_path(), entry)
    }

    /// Read the full food diary
    pub fn read_food_log(&self) -> Result<Vec<FoodLogEntry>> {
        read_lines(&self.food_log_path())
    }

    /// Append a steps entry
    ///
    /// The log stays append-only; a newer entry for the same day key wins
    /// at aggregation time.
    pub fn append_steps(&self, entry: &StepsEntry) -> Result<()> {
        append_line(&self.steps_log_path(), entry)
    }

    /// Read the full steps log, in append order
    pub fn read_steps_log(&self) -> Result<Vec<StepsEntry>> {
        read_lines(&self.steps_log_path())
    }

    /// Append a workout session
    pub fn append_session(&self, session: &WorkoutSession) -> Result<()> {
        append_line(&self.sessions_log_path(), session)
    }

    /// Read the full workout session log
    pub fn read_sessions(&self) -> Result<Vec<WorkoutSession>> {
        read_lines(&self.sessions_log_path())
    }
}

/// Append one record as a JSON line, under an exclusive lock
fn append_line<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    file.lock_exclusive()?;

    let mut writer = std::io::BufWriter::new(&file);
    let line = serde_json::to_string(record)?;
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    file.unlock()?;

    tracing::debug!("Appended record to {:?}", path);
    Ok(())
}

/// Read all records from a JSONL file, under a shared lock
///
/// Returns an empty list when the file does not exist. Blank lines are
/// ignored; lines that fail to parse are logged and skipped.
fn read_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Skipping malformed line {} in {:?}: {}", line_num + 1, path, e);
            }
        }
    }

    file.unlock()?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WorkoutType;
    use uuid::Uuid;

    fn test_store() -> (tempfile::TempDir, LogStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_food_log_roundtrip() {
        let (_dir, store) = test_store();

        for (name, calories) in [("oatmeal", 320.0), ("chicken soup", 410.0)] {
            store
                .append_food(&FoodLogEntry {
                    id: Uuid::new_v4(),
                    dish_id: None,
                    dish_name: name.into(),
                    calories,
                    protein: 0.0,
                    fats: 0.0,
                    carbs: 0.0,
                    date: "2024-03-05".into(),
                })
                .unwrap();
        }

        let log = store.read_food_log().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].dish_name, "oatmeal");
        assert_eq!(log[1].calories, 410.0);
    }

    #[test]
    fn test_steps_log_keeps_append_order() {
        let (_dir, store) = test_store();

        store
            .append_steps(&StepsEntry {
                date: "2024-03-05".into(),
                steps: 4_000,
            })
            .unwrap();
        store
            .append_steps(&StepsEntry {
                date: "2024-03-05".into(),
                steps: 9_500,
            })
            .unwrap();

        // Both writes survive in order; last-write-wins is resolved at
        // aggregation, not in the file
        let log = store.read_steps_log().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].steps, 9_500);
    }

    #[test]
    fn test_sessions_roundtrip() {
        let (_dir, store) = test_store();

        store
            .append_session(&WorkoutSession {
                id: Uuid::new_v4(),
                workout_name: Some("Morning lift".into()),
                workout_type: WorkoutType::Strength,
                date: "2024-03-05".into(),
                duration_seconds: 2700,
            })
            .unwrap();

        let sessions = store.read_sessions().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].workout_type, WorkoutType::Strength);
    }

    #[test]
    fn test_missing_files_read_as_empty() {
        let (_dir, store) = test_store();
        assert!(store.read_food_log().unwrap().is_empty());
        assert!(store.read_steps_log().unwrap().is_empty());
        assert!(store.read_sessions().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let (_dir, store) = test_store();

        store
            .append_steps(&StepsEntry {
                date: "2024-03-05".into(),
                steps: 4_000,
            })
            .unwrap();

        // Corrupt the file with a half-written line
        let mut file = OpenOptions::new()
            .append(true)
            .open(store.steps_log_path())
            .unwrap();
        writeln!(file, "{{\"date\": \"2024-03-06\"").unwrap();

        store
            .append_steps(&StepsEntry {
                date: "2024-03-07".into(),
                steps: 6_000,
            })
            .unwrap();

        let log = store.read_steps_log().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].date, "2024-03-07");
    }
}
