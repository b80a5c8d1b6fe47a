use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::Local;
use tracing::warn;

const TIMESTAMP_FORMAT: &str = "%Y-%b-%d-%H:%M:%S";

/// Append `<timestamp>:<message>` to the progress log. Best-effort: a
/// failed write is reported as a warning and never aborts the run.
pub fn log_progress(path: &Path, message: &str) {
    let line = format!("{}:{}\n", Local::now().format(TIMESTAMP_FORMAT), message);
    if let Err(e) = append_line(path, &line) {
        warn!("Could not write progress log {}: {}", path.display(), e);
    }
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[test]
    fn appends_timestamped_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");

        log_progress(&path, "Initiating ETL process.");
        log_progress(&path, "Extraction complete.");

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(":Initiating ETL process."));
        assert!(lines[1].ends_with(":Extraction complete."));
    }

    #[test]
    fn timestamp_matches_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        log_progress(&path, "msg");

        let text = std::fs::read_to_string(&path).unwrap();
        let line = text.lines().next().unwrap();
        // Timestamp itself contains two colons; the message follows the third.
        let stamp: String = line.splitn(4, ':').take(3).collect::<Vec<_>>().join(":");
        NaiveDateTime::parse_from_str(&stamp, TIMESTAMP_FORMAT)
            .unwrap_or_else(|e| panic!("bad timestamp {:?}: {}", stamp, e));
        assert_eq!(line.splitn(4, ':').nth(3), Some("msg"));
    }

    #[test]
    fn unwritable_path_does_not_panic() {
        log_progress(Path::new("/nonexistent-dir/log.txt"), "msg");
    }
}
