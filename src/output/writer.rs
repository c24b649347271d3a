//! Per-key CSV writer
//!
//! Every job writes its own file, `<KEY>_<basename>`, opening and closing
//! its own handle. Keys are distinct, so no two jobs touch the same file
//! and no locking is needed.

use crate::config::SearchConfig;
use crate::error::{OutputError, OutputResult};
use crate::walker::partition::PrefixKey;
use crate::walker::worker::MatchRecord;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Header row of every output file
pub const CSV_HEADER: [&str; 2] = ["File Name", "Path"];

/// Outcome of writing one output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    /// File that was written
    pub path: PathBuf,

    /// Rows written (excluding the header)
    pub records_written: usize,

    /// Rows that failed and were skipped
    pub records_failed: usize,
}

/// Writes match lists to `<KEY>_<basename>` files in one directory
#[derive(Debug, Clone)]
pub struct ResultWriter {
    output_dir: PathBuf,
    basename: String,
}

impl ResultWriter {
    pub fn new(output_dir: impl Into<PathBuf>, basename: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            basename: basename.into(),
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.output_dir.clone(), config.basename.clone())
    }

    /// Destination file for a key
    pub fn path_for(&self, key: &PrefixKey) -> PathBuf {
        self.output_dir.join(key.file_name(&self.basename))
    }

    /// Write the matches for `key`, replacing any previous file
    ///
    /// Callers skip empty match lists; no file is created for them.
    pub fn write(&self, key: &PrefixKey, matches: &[MatchRecord]) -> OutputResult<WriteSummary> {
        let path = self.path_for(key);
        write_csv(&path, matches)
    }
}

/// Write `matches` as CSV to `path` (truncate-or-create)
pub fn write_csv(path: &Path, matches: &[MatchRecord]) -> OutputResult<WriteSummary> {
    let mut writer = csv::Writer::from_path(path).map_err(|source| OutputError::CreateFailed {
        path: path.to_path_buf(),
        source,
    })?;

    writer
        .write_record(CSV_HEADER)
        .map_err(|source| OutputError::HeaderFailed {
            path: path.to_path_buf(),
            source,
        })?;

    let (records_written, records_failed) = write_rows(&mut writer, path, matches);

    writer.flush().map_err(|source| OutputError::FlushFailed {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        file = %path.display(),
        rows = records_written,
        failed = records_failed,
        "Output file written"
    );

    Ok(WriteSummary {
        path: path.to_path_buf(),
        records_written,
        records_failed,
    })
}

/// Write one row per match; a failed row is logged and skipped.
/// Returns (written, failed).
fn write_rows<W: io::Write>(
    writer: &mut csv::Writer<W>,
    path: &Path,
    matches: &[MatchRecord],
) -> (usize, usize) {
    let mut written = 0;
    let mut failed = 0;

    for record in matches {
        let full_path = record.path.to_string_lossy();
        match writer.write_record([record.name.as_str(), full_path.as_ref()]) {
            Ok(()) => written += 1,
            Err(e) => {
                failed += 1;
                warn!(
                    file = %path.display(),
                    record = %full_path,
                    error = %e,
                    "Failed to write record"
                );
            }
        }
    }

    (written, failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn record(name: &str, path: &str) -> MatchRecord {
        MatchRecord {
            name: name.to_string(),
            path: PathBuf::from(path),
            depth: 1,
        }
    }

    #[test]
    fn test_write_header_and_rows() {
        let dir = tempdir().unwrap();
        let writer = ResultWriter::new(dir.path(), "output.csv");
        let key = PrefixKey::new("b").unwrap();

        let summary = writer
            .write(&key, &[record("banana.pdf", "/data/banana.pdf")])
            .unwrap();

        assert_eq!(summary.path, dir.path().join("B_output.csv"));
        assert_eq!(summary.records_written, 1);
        assert_eq!(summary.records_failed, 0);

        let contents = fs::read_to_string(&summary.path).unwrap();
        assert_eq!(contents, "File Name,Path\nbanana.pdf,/data/banana.pdf\n");
    }

    #[test]
    fn test_fields_are_quoted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quoted.csv");

        write_csv(&path, &[record("a,\"b\".pdf", "/x/a,\"b\".pdf")]).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "File Name,Path\n\"a,\"\"b\"\".pdf\",\"/x/a,\"\"b\"\".pdf\"\n"
        );
    }

    #[test]
    fn test_overwrites_previous_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("A_output.csv");
        fs::write(&path, "stale contents that are much longer than the new ones\n").unwrap();

        write_csv(&path, &[record("a.pdf", "/a.pdf")]).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "File Name,Path\na.pdf,/a.pdf\n");
    }

    /// Sink that rejects every write, like a full or vanished disk
    struct FailingSink;

    impl io::Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "device full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "device full"))
        }
    }

    #[test]
    fn test_failed_records_are_counted_and_skipped() {
        // Rows longer than the buffer force a write to the sink per record
        let mut writer = csv::WriterBuilder::new()
            .buffer_capacity(16)
            .from_writer(FailingSink);
        let matches = [
            record("first_long_name.pdf", "/data/first_long_name.pdf"),
            record("second_long_name.pdf", "/data/second_long_name.pdf"),
            record("third_long_name.pdf", "/data/third_long_name.pdf"),
        ];

        let (written, failed) = write_rows(&mut writer, Path::new("A_output.csv"), &matches);

        assert_eq!(written, 0);
        assert_eq!(failed, matches.len());
    }

    #[test]
    fn test_missing_directory_is_create_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("A_output.csv");

        let err = write_csv(&path, &[record("a.pdf", "/a.pdf")]).unwrap_err();
        assert!(matches!(err, OutputError::CreateFailed { .. }));
    }
}
