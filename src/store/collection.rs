use crate::errors::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One JSON-array file of `T` records.
///
/// Reads are forgiving: a missing, unreadable or malformed file loads as an
/// empty collection (with a warning). Writes always replace the whole file.
#[derive(Debug, Clone)]
pub struct JsonCollection<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Vec<T> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} does not exist yet; starting empty", self.path.display());
                return Vec::new();
            }
            Err(e) => {
                warn!(
                    "Could not read {}: {e}. Starting with an empty collection.",
                    self.path.display()
                );
                return Vec::new();
            }
        };

        match serde_json::from_reader(BufReader::new(file)) {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    "{} contains invalid JSON ({e}). Starting with an empty collection.",
                    self.path.display()
                );
                Vec::new()
            }
        }
    }

    /// Overwrite the file with exactly `records`, creating parent directories.
    pub fn save(&self, records: &[T]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let file = File::create(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, records).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        writer
            .write_all(b"\n")
            .and_then(|_| writer.flush())
            .map_err(|e| StoreError::io(&self.path, e))?;

        Ok(())
    }

    /// Load a working copy, hand it to `f`, and commit the whole copy if `f`
    /// succeeds. On `Err` nothing is written.
    pub fn with_records<F, R, E>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, E>,
        E: From<StoreError>,
    {
        let mut records = self.load();
        let out = f(&mut records)?;
        self.save(&records)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: String,
        n: i32,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { id: "a".into(), n: 1 },
            Row { id: "b".into(), n: 2 },
        ]
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let col: JsonCollection<Row> = JsonCollection::new(dir.path().join("nope.json"));
        assert!(col.load().is_empty());
    }

    #[test]
    fn malformed_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ this is not json").unwrap();

        let col: JsonCollection<Row> = JsonCollection::new(&path);
        assert!(col.load().is_empty());
    }

    #[test]
    fn wrong_shape_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shape.json");
        fs::write(&path, r#"{"id": "a", "n": 1}"#).unwrap();

        let col: JsonCollection<Row> = JsonCollection::new(&path);
        assert!(col.load().is_empty());
    }

    #[test]
    fn save_then_load_round_trips_and_creates_dirs() {
        let dir = TempDir::new().unwrap();
        let col = JsonCollection::new(dir.path().join("nested/deeper/rows.json"));

        col.save(&rows()).unwrap();
        assert_eq!(col.load(), rows());
    }

    #[test]
    fn save_overwrites_instead_of_merging() {
        let dir = TempDir::new().unwrap();
        let col = JsonCollection::new(dir.path().join("rows.json"));

        col.save(&rows()).unwrap();
        col.save(&rows()[..1]).unwrap();
        assert_eq!(col.load(), vec![rows()[0].clone()]);
    }

    #[test]
    fn with_records_commits_on_ok() {
        let dir = TempDir::new().unwrap();
        let col = JsonCollection::new(dir.path().join("rows.json"));
        col.save(&rows()).unwrap();

        let touched = col
            .with_records(|rows: &mut Vec<Row>| {
                rows[1].n = 20;
                Ok::<_, StoreError>(rows.len())
            })
            .unwrap();

        assert_eq!(touched, 2);
        assert_eq!(col.load()[1].n, 20);
    }

    #[test]
    fn with_records_discards_on_err() {
        let dir = TempDir::new().unwrap();
        let col = JsonCollection::new(dir.path().join("rows.json"));
        col.save(&rows()).unwrap();

        let result: Result<(), StoreError> = col.with_records(|rows: &mut Vec<Row>| {
            rows.clear();
            Err(StoreError::Xlsx("abort".into()))
        });

        assert!(result.is_err());
        assert_eq!(col.load(), rows());
    }
}
