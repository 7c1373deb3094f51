use std::io::Read;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use serde::de::DeserializeOwned;
use zip::ZipArchive;

use crate::csv_reader::{self, CsvParseError};
use crate::{CsvTable, NoticeContainer, ValidationNotice};

#[derive(Debug, thiserror::Error)]
pub enum GtfsInputError {
    #[error("input path does not exist: {0}")]
    MissingPath(PathBuf),
    #[error("input path is neither a file nor a directory: {0}")]
    InvalidPath(PathBuf),
    #[error("{0} is not a readable zip archive or directory")]
    NotAFile(PathBuf),
    #[error("not a valid zip archive: {0}")]
    InvalidZip(String),
    #[error("required file missing: {0}")]
    MissingFile(String),
    #[error("io error reading {file:?}: {source}")]
    Io {
        file: Option<String>,
        #[source]
        source: std::io::Error,
    },
    #[error("could not open zip archive: {source}")]
    ZipArchive {
        #[source]
        source: zip::result::ZipError,
    },
    #[error("could not read zip entry {file}: {source}")]
    ZipFile {
        file: String,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("could not read zip entry {file}: {source}")]
    ZipFileIo {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed csv: {0:?}")]
    Csv(CsvParseError),
    #[error("malformed json in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputKind {
    Directory,
    Zip,
}

/// A handle to a GTFS source (a directory of CSV files, or a zip archive).
/// Cheap to clone; each `reader()` can be used to open the same logical
/// file more than once.
#[derive(Debug, Clone)]
pub struct GtfsInput {
    path: PathBuf,
    kind: InputKind,
}

impl GtfsInput {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GtfsInputError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GtfsInputError::MissingPath(path.to_path_buf()));
        }
        let kind = if path.is_dir() {
            InputKind::Directory
        } else if path.is_file() {
            let file = std::fs::File::open(path).map_err(|source| GtfsInputError::Io {
                file: None,
                source,
            })?;
            ZipArchive::new(file).map_err(|source| GtfsInputError::ZipArchive { source })?;
            InputKind::Zip
        } else {
            return Err(GtfsInputError::NotAFile(path.to_path_buf()));
        };
        Ok(Self {
            path: path.to_path_buf(),
            kind,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &'static str {
        match self.kind {
            InputKind::Directory => "directory",
            InputKind::Zip => "zip archive",
        }
    }

    pub fn reader(&self) -> GtfsInputReader {
        GtfsInputReader {
            input: self.clone(),
        }
    }

    pub(crate) fn get_file(&self, logical_name: &str) -> Result<Option<Vec<u8>>, GtfsInputError> {
        match self.kind {
            InputKind::Directory => self.get_file_from_directory(logical_name),
            InputKind::Zip => self.get_file_from_zip(logical_name),
        }
    }

    fn get_file_from_directory(&self, logical_name: &str) -> Result<Option<Vec<u8>>, GtfsInputError> {
        let direct = self.path.join(logical_name);
        if direct.is_file() {
            return read_file(&direct).map(Some);
        }

        let entries = std::fs::read_dir(&self.path).map_err(|source| GtfsInputError::Io {
            file: None,
            source,
        })?;

        let mut top_level = None;
        let mut nested = Vec::new();
        for entry in entries.flatten() {
            let entry_path = entry.path();
            if entry_path.is_file() {
                if file_name_matches(&entry_path, logical_name) {
                    top_level = Some(entry_path);
                }
            } else if entry_path.is_dir() {
                if let Ok(sub_entries) = std::fs::read_dir(&entry_path) {
                    for sub_entry in sub_entries.flatten() {
                        let sub_path = sub_entry.path();
                        if sub_path.is_file() && file_name_matches(&sub_path, logical_name) {
                            nested.push(sub_path);
                        }
                    }
                }
            }
        }

        if let Some(path) = top_level {
            return read_file(&path).map(Some);
        }
        if nested.len() == 1 {
            return read_file(&nested[0]).map(Some);
        }
        Ok(None)
    }

    fn get_file_from_zip(&self, logical_name: &str) -> Result<Option<Vec<u8>>, GtfsInputError> {
        let file = std::fs::File::open(&self.path).map_err(|source| GtfsInputError::Io {
            file: None,
            source,
        })?;
        let mut archive = ZipArchive::new(file).map_err(|source| GtfsInputError::ZipArchive { source })?;

        let mut top_level_index = None;
        let mut nested_indices = Vec::new();
        for index in 0..archive.len() {
            let entry = archive
                .by_index(index)
                .map_err(|source| GtfsInputError::ZipFile {
                    file: logical_name.to_string(),
                    source,
                })?;
            let entry_path = Path::new(entry.name()).to_path_buf();
            let Some(base) = entry_path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if !base.eq_ignore_ascii_case(logical_name) {
                continue;
            }
            let is_top_level = entry_path
                .parent()
                .map(|parent| parent.as_os_str().is_empty())
                .unwrap_or(true);
            if is_top_level {
                top_level_index = Some(index);
                break;
            }
            nested_indices.push(index);
        }

        let chosen = top_level_index.or_else(|| {
            if nested_indices.len() == 1 {
                Some(nested_indices[0])
            } else {
                None
            }
        });
        let Some(index) = chosen else {
            return Ok(None);
        };

        let mut entry = archive
            .by_index(index)
            .map_err(|source| GtfsInputError::ZipFile {
                file: logical_name.to_string(),
                source,
            })?;
        let mut buffer = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut buffer)
            .map_err(|source| GtfsInputError::ZipFileIo {
                file: logical_name.to_string(),
                source,
            })?;
        Ok(Some(buffer))
    }
}

fn file_name_matches(path: &Path, logical_name: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.eq_ignore_ascii_case(logical_name))
        .unwrap_or(false)
}

fn read_file(path: &Path) -> Result<Vec<u8>, GtfsInputError> {
    std::fs::read(path).map_err(|source| GtfsInputError::Io {
        file: path.file_name().and_then(|n| n.to_str()).map(str::to_string),
        source,
    })
}

/// A read-only view over a [`GtfsInput`] used to decode individual files.
#[derive(Debug, Clone)]
pub struct GtfsInputReader {
    input: GtfsInput,
}

impl GtfsInputReader {
    /// Reads and decodes `logical_name` into a typed table, if present.
    /// Malformed rows are skipped and surfaced as notices rather than
    /// failing the whole table.
    pub fn read_optional_csv_with_notices<T: DeserializeOwned>(
        &self,
        logical_name: &str,
        notices: &mut NoticeContainer,
    ) -> Result<Option<CsvTable<T>>, GtfsInputError> {
        let Some(bytes) = self.input.get_file(logical_name)? else {
            return Ok(None);
        };
        let (headers, rows, parse_errors) = csv_reader::read_rows(logical_name, &bytes);
        for error in &parse_errors {
            notices.push_csv_error(error);
        }

        let headers_record = StringRecord::from(headers.clone());
        let mut table = CsvTable {
            headers,
            rows: Vec::new(),
            row_numbers: Vec::new(),
        };
        for row in rows {
            let values: Vec<String> = row
                .values
                .iter()
                .map(|value| value.clone().unwrap_or_default())
                .collect();
            let record = StringRecord::from(values);
            match record.deserialize::<T>(Some(&headers_record)) {
                Ok(value) => {
                    table.rows.push(value);
                    table.row_numbers.push(row.row_number);
                }
                Err(error) => notices.push_csv_error(&CsvParseError {
                    file: logical_name.to_string(),
                    message: error.to_string(),
                    line_index: Some(row.row_number),
                    column_index: None,
                    char_index: None,
                    parsed_content: None,
                }),
            }
        }
        Ok(Some(table))
    }

    pub fn read_optional_json<T: DeserializeOwned>(
        &self,
        logical_name: &str,
    ) -> Result<Option<T>, GtfsInputError> {
        let Some(bytes) = self.input.get_file(logical_name)? else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes).map(Some).map_err(|source| GtfsInputError::Json {
            file: logical_name.to_string(),
            source,
        })
    }
}

/// Runs the raw field-format validator (`csv_validation`) over every GTFS
/// file present in `input`, independent of whether it also parses into a
/// typed table. Run once per validation, ahead of feed loading.
pub fn collect_input_notices(input: &GtfsInput) -> Result<Vec<ValidationNotice>, GtfsInputError> {
    let mut notices = NoticeContainer::new();
    for file_name in crate::feed::GTFS_FILE_NAMES {
        if *file_name == crate::feed::LOCATIONS_GEOJSON_FILE {
            continue;
        }
        if let Some(bytes) = input.get_file(file_name)? {
            crate::csv_validation::validate_csv_data(file_name, &bytes, &mut notices);
        }
    }
    Ok(notices.into_notices())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        std::env::temp_dir().join(format!("{}_{}_{}", prefix, std::process::id(), nanos))
    }

    #[test]
    fn reads_file_from_directory() {
        let dir = temp_dir("gtfs_input_dir");
        fs::create_dir_all(&dir).expect("create dir");
        fs::write(dir.join("agency.txt"), "agency_name\nTest\n").expect("write");

        let input = GtfsInput::from_path(&dir).expect("input");
        let bytes = input.get_file("agency.txt").expect("read").expect("present");
        assert_eq!(bytes, b"agency_name\nTest\n");
        assert!(input.get_file("stops.txt").expect("read").is_none());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn matches_file_name_case_insensitively() {
        let dir = temp_dir("gtfs_input_case");
        fs::create_dir_all(&dir).expect("create dir");
        fs::write(dir.join("AGENCY.TXT"), "agency_name\nTest\n").expect("write");

        let input = GtfsInput::from_path(&dir).expect("input");
        assert!(input.get_file("agency.txt").expect("read").is_some());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn resolves_unique_nested_candidate() {
        let dir = temp_dir("gtfs_input_nested");
        let nested = dir.join("my-feed");
        fs::create_dir_all(&nested).expect("create dir");
        fs::write(nested.join("agency.txt"), "agency_name\nTest\n").expect("write");

        let input = GtfsInput::from_path(&dir).expect("input");
        assert!(input.get_file("agency.txt").expect("read").is_some());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_path_is_an_error() {
        let path = temp_dir("gtfs_input_missing");
        assert!(matches!(
            GtfsInput::from_path(&path),
            Err(GtfsInputError::MissingPath(_))
        ));
    }
}
