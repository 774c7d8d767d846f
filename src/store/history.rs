use crate::domain::HistoricalRecord;
use crate::errors::StoreError;
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Append-only CSV log of collected offers.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row, writing the header first if the log is new or empty.
    pub fn append(&self, record: &HistoricalRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let needs_header = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);

        writer.serialize(record).map_err(|e| self.csv_error(e))?;
        writer
            .flush()
            .map_err(|e| StoreError::io(&self.path, e))?;

        Ok(())
    }

    /// Every row in the log; a missing log reads as empty.
    pub fn read_all(&self) -> Result<Vec<HistoricalRecord>, StoreError> {
        let mut reader = match csv::Reader::from_path(&self.path) {
            Ok(reader) => reader,
            Err(e) => {
                if let csv::ErrorKind::Io(io) = e.kind() {
                    if io.kind() == ErrorKind::NotFound {
                        return Ok(Vec::new());
                    }
                }
                return Err(self.csv_error(e));
            }
        };

        reader
            .deserialize()
            .collect::<Result<Vec<HistoricalRecord>, _>>()
            .map_err(|e| self.csv_error(e))
    }

    fn csv_error(&self, source: csv::Error) -> StoreError {
        StoreError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn record(id: &str) -> HistoricalRecord {
        HistoricalRecord {
            offer_id: id.to_string(),
            item: "Rice, white".to_string(),
            quantity: "10kg".to_string(),
            school_code: "S1".to_string(),
            collection_date: NaiveDate::from_ymd_opt(2025, 7, 14).unwrap(),
        }
    }

    #[test]
    fn header_is_written_once() {
        let dir = TempDir::new().unwrap();
        let log = HistoryLog::new(dir.path().join("history.csv"));

        log.append(&record("1")).unwrap();
        log.append(&record("2")).unwrap();

        let raw = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "offer_id,item,quantity,school_code,collection_date");
        assert_eq!(lines[1], "1,\"Rice, white\",10kg,S1,2025-07-14");
    }

    #[test]
    fn empty_existing_file_gets_a_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.csv");
        fs::write(&path, "").unwrap();

        let log = HistoryLog::new(&path);
        log.append(&record("7")).unwrap();

        assert_eq!(log.read_all().unwrap(), vec![record("7")]);
    }

    #[test]
    fn missing_log_reads_empty() {
        let dir = TempDir::new().unwrap();
        let log = HistoryLog::new(dir.path().join("absent.csv"));
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn read_all_returns_rows_in_append_order() {
        let dir = TempDir::new().unwrap();
        let log = HistoryLog::new(dir.path().join("sub/history.csv"));

        for id in ["a", "b", "c"] {
            log.append(&record(id)).unwrap();
        }

        let ids: Vec<String> = log
            .read_all()
            .unwrap()
            .into_iter()
            .map(|r| r.offer_id)
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }
}
