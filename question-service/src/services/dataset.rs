use crate::dtos::DEFAULT_FORM_ID;
use crate::models::Record;
use std::fs::File;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("no dataset file for form '{0}' and no default dataset")]
    NotFound(String),

    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("line {line}: expected {expected} fields, found {found}")]
    UnequalLengths {
        line: u64,
        expected: usize,
        found: usize,
    },
}

/// Strip everything outside `[A-Za-z0-9_-]` so a form id can never carry a
/// path separator or `..` into the data directory.
pub fn sanitize_form_id(form_id: &str) -> String {
    form_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Reads `<data_dir>/<form_id>.csv`, falling back to `<data_dir>/questions.csv`.
///
/// Nothing is cached; every call re-reads the file.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    data_dir: PathBuf,
}

impl DatasetLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Path the loader would read for `form_id`, if any file exists.
    pub fn resolve(&self, form_id: &str) -> Option<PathBuf> {
        let form_path = self.csv_path(&sanitize_form_id(form_id));
        if form_path.is_file() {
            return Some(form_path);
        }

        let default_path = self.csv_path(DEFAULT_FORM_ID);
        default_path.is_file().then_some(default_path)
    }

    pub fn load(&self, form_id: &str) -> Result<Vec<Record>, DatasetError> {
        let path = self
            .resolve(form_id)
            .ok_or_else(|| DatasetError::NotFound(form_id.to_string()))?;

        tracing::debug!(form_id, path = %path.display(), "Loading dataset");

        let file = File::open(&path).map_err(|source| DatasetError::Io {
            path: path.clone(),
            source,
        })?;

        parse_records(file).map_err(|source| DatasetError::Csv { path, source })
    }

    fn csv_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", name))
    }
}

/// Header row names the columns; every field is trimmed and lines that are
/// empty after trimming are skipped.
pub fn parse_records<R: std::io::Read>(reader: R) -> Result<Vec<Record>, ParseError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        if row.len() == 1 && row[0].is_empty() {
            continue;
        }
        if row.len() != headers.len() {
            return Err(ParseError::UnequalLengths {
                line: row.position().map_or(0, |p| p.line()),
                expected: headers.len(),
                found: row.len(),
            });
        }

        records.push(
            headers
                .iter()
                .zip(row.iter())
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        );
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    struct TempDir(PathBuf);

    impl TempDir {
        fn new(tag: &str) -> Self {
            let path =
                std::env::temp_dir().join(format!("dataset-{}-{}", tag, uuid::Uuid::new_v4()));
            fs::create_dir_all(&path).unwrap();
            Self(path)
        }

        fn write(&self, name: &str, contents: &str) {
            fs::write(self.0.join(name), contents).unwrap();
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn sanitize_strips_traversal() {
        assert_eq!(sanitize_form_id("../../etc"), "etc");
        assert_eq!(sanitize_form_id("a/b\\c.d e"), "abcde");
        assert_eq!(sanitize_form_id("Survey_2024-v1"), "Survey_2024-v1");
    }

    #[test]
    fn sanitize_is_idempotent() {
        for input in ["../../etc/passwd", "ok-id_1", "über%2F..", ""] {
            let once = sanitize_form_id(input);
            assert_eq!(sanitize_form_id(&once), once);
            assert!(!once.contains('/') && !once.contains('.'));
        }
    }

    #[test]
    fn parses_headers_trims_and_skips_blank_lines() {
        let csv = "question_id, text \n 1 , Age? \n\n2,Name?\n";
        let records = parse_records(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("question_id"), Some("1"));
        assert_eq!(records[0].get("text"), Some("Age?"));
        assert_eq!(records[1].get("text"), Some("Name?"));
    }

    #[test]
    fn whitespace_only_lines_are_skipped() {
        let csv = "question_id,text\n1,Age?\n   \n2,Name?\n\t\n";
        let records = parse_records(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("question_id"), Some("2"));
    }

    #[test]
    fn ragged_rows_are_an_error() {
        let csv = "question_id,text\n1,Age?,extra\n";
        assert!(matches!(
            parse_records(csv.as_bytes()),
            Err(ParseError::UnequalLengths {
                line: 2,
                expected: 2,
                found: 3
            })
        ));

        let short = "question_id,text\n1\n";
        assert!(parse_records(short.as_bytes()).is_err());
    }

    #[test]
    fn prefers_form_specific_file() {
        let dir = TempDir::new("form");
        dir.write("questions.csv", "question_id,text\n1,Default\n");
        dir.write("survey.csv", "question_id,text\n1,Survey\n");

        let loader = DatasetLoader::new(&dir.0);
        let records = loader.load("survey").unwrap();
        assert_eq!(records[0].get("text"), Some("Survey"));
    }

    #[test]
    fn falls_back_to_default_dataset() {
        let dir = TempDir::new("fallback");
        dir.write("questions.csv", "question_id,text\n1,Default\n");

        let loader = DatasetLoader::new(&dir.0);
        assert_eq!(loader.resolve("missing"), Some(dir.0.join("questions.csv")));
        assert_eq!(loader.resolve("../../questions"), Some(dir.0.join("questions.csv")));
    }

    #[test]
    fn not_found_without_any_file() {
        let dir = TempDir::new("empty");
        let loader = DatasetLoader::new(&dir.0);
        assert!(matches!(
            loader.load("survey"),
            Err(DatasetError::NotFound(id)) if id == "survey"
        ));
    }
}
