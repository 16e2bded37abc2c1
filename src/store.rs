use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::StoreError;
use crate::worklog::CommitRecord;

/// Write one JSON record per line. The file is the checkpoint between the
/// extract and render phases and stays hand-editable; hours adjusted there
/// are authoritative for billing. The write goes to a sibling file first
/// and is renamed over the target, so a failed run leaves no half-written
/// worklog behind.
pub fn write_records(path: &Path, commits: &[CommitRecord]) -> Result<(), StoreError> {
    let updated = path.with_extension("updated");
    {
        let file = File::create(&updated)?;
        let mut writer = BufWriter::new(file);
        for commit in commits {
            serde_json::to_writer(&mut writer, commit)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
    }
    fs::rename(updated, path)?;
    Ok(())
}

/// Read the worklog back, one record per line. Any unparsable line aborts
/// the read; a silently dropped billing record is worse than a rerun.
pub fn read_records(path: &Path) -> Result<Vec<CommitRecord>, StoreError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut commits = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            // hand-edited files sometimes pick up stray blank lines
            continue;
        }
        let commit =
            serde_json::from_str(&line).map_err(|source| StoreError::InvalidRecordFormat {
                path: path.display().to_string(),
                line: idx + 1,
                source,
            })?;
        commits.push(commit);
    }
    Ok(commits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::io::Write as _;

    fn sample_records() -> Vec<CommitRecord> {
        let mut first = CommitRecord::new(
            NaiveDate::from_ymd_opt(2018, 3, 5).unwrap(),
            dec!(8),
            "rs",
        );
        first.append_text("fix bug");
        let mut second = CommitRecord::new(
            NaiveDate::from_ymd_opt(2018, 3, 7).unwrap(),
            dec!(7.5),
            "avr",
        );
        second.append_text("port driver");
        vec![first, second]
    }

    #[test]
    fn round_trip_preserves_records_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("worklog.json");

        let records = sample_records();
        write_records(&path, &records).unwrap();
        let read_back = read_records(&path).unwrap();

        assert_eq!(read_back, records);
    }

    #[test]
    fn lines_are_self_contained_json_objects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("worklog.json");

        write_records(&path, &sample_records()).unwrap();
        let content = fs::read_to_string(&path).unwrap();

        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            r#"{"date":"2018-03-05","hours":"8","text":"fix bug","proj_name":"rs"}"#
        );
        assert_eq!(
            lines.next().unwrap(),
            r#"{"date":"2018-03-07","hours":"7.5","text":"port driver","proj_name":"avr"}"#
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn malformed_line_aborts_with_its_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("worklog.json");

        let mut file = File::create(&path).unwrap();
        writeln!(
            file,
            r#"{{"date":"2018-03-05","hours":"8","text":"fix bug","proj_name":"rs"}}"#
        )
        .unwrap();
        writeln!(file, "eight hours or so").unwrap();
        drop(file);

        let err = read_records(&path).unwrap_err();
        match err {
            StoreError::InvalidRecordFormat { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn hand_edited_blank_lines_are_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("worklog.json");

        let mut file = File::create(&path).unwrap();
        writeln!(
            file,
            r#"{{"date":"2018-03-05","hours":"6","text":"half day","proj_name":"rs"}}"#
        )
        .unwrap();
        writeln!(file).unwrap();
        drop(file);

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].hours, dec!(6));
    }
}
