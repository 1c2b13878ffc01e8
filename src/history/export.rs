//! cliptrail - CSV export of the history

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::clipboard::Entry;

const HEADER: &str = "text, time, pinned, type, tags\n";

/// Render entries as CSV: every field quoted, tags comma-joined inside one field
pub fn render_csv(entries: &[Entry]) -> String {
    let mut content = String::from(HEADER);
    for entry in entries {
        let record = entry.to_record();
        let fields = [
            record.text,
            record.time,
            record.pinned.to_string(),
            record.content_type.as_str().to_string(),
            record.tags.join(","),
        ];
        let row: Vec<String> = fields.iter().map(|f| quote(f)).collect();
        content.push_str(&row.join(","));
        content.push('\n');
    }
    content
}

/// Write the CSV to `path`, appending `.csv` when missing; returns the final path
pub fn write_csv(entries: &[Entry], path: &Path) -> std::io::Result<PathBuf> {
    let path = with_csv_suffix(path);
    fs::write(&path, render_csv(entries))?;
    Ok(path)
}

fn with_csv_suffix(path: &Path) -> PathBuf {
    if path.to_string_lossy().ends_with(".csv") {
        return path.to_path_buf();
    }
    let mut name = OsString::from(path.as_os_str());
    name.push(".csv");
    PathBuf::from(name)
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_render_csv_quotes_every_field() {
        let mut entry = Entry::new("#a #b hello, world".to_string(), None, Utc.timestamp_opt(0, 0).unwrap());
        entry.pin();
        let csv = render_csv(&[entry]);
        assert_eq!(
            csv,
            "text, time, pinned, type, tags\n\"#a #b hello, world\",\"1970-01-01T00:00:00Z\",\"true\",\"text\",\"#a,#b\"\n"
        );
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let entry = Entry::new(r#"say "hi""#.to_string(), None, Utc.timestamp_opt(0, 0).unwrap());
        let csv = render_csv(&[entry]);
        assert!(csv.contains(r#""say ""hi""""#));
    }

    #[test]
    fn test_csv_suffix() {
        assert_eq!(with_csv_suffix(Path::new("/tmp/out")), PathBuf::from("/tmp/out.csv"));
        assert_eq!(with_csv_suffix(Path::new("/tmp/out.csv")), PathBuf::from("/tmp/out.csv"));
        assert_eq!(with_csv_suffix(Path::new("/tmp/out.txt")), PathBuf::from("/tmp/out.txt.csv"));
    }
}
