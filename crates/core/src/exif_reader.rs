use crate::metadata::EmbeddedTimestamps;
use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use exif::{Exif, In, Reader, Tag};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Reads capture and modification times from the file's EXIF block.
///
/// Fails for files without a container the EXIF reader understands; callers
/// treat that as "no embedded metadata".
pub fn read_embedded_timestamps(path: &Path) -> Result<EmbeddedTimestamps> {
    let file = File::open(path)
        .with_context(|| format!("cannot open for metadata: {}", path.display()))?;
    let mut buf = BufReader::new(file);
    let exif = Reader::new()
        .read_from_container(&mut buf)
        .with_context(|| format!("no readable EXIF data: {}", path.display()))?;

    let created = find_date(&exif, &[Tag::DateTimeOriginal, Tag::DateTimeDigitized]);
    let modified = find_date(&exif, &[Tag::DateTime]);

    Ok(EmbeddedTimestamps { created, modified })
}

fn find_date(exif: &Exif, tags: &[Tag]) -> Option<DateTime<Local>> {
    tags.iter().find_map(|tag| {
        let field = exif.get_field(*tag, In::PRIMARY)?;
        parse_date(&field.display_value().to_string())
    })
}

fn parse_date(input: &str) -> Option<DateTime<Local>> {
    let normalized = input.trim().trim_matches('"');

    let candidates = [
        "%Y:%m:%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%:z",
        "%Y-%m-%dT%H:%M:%S%.f%:z",
    ];

    for fmt in candidates {
        if let Ok(dt) = DateTime::parse_from_str(normalized, fmt) {
            return Some(dt.with_timezone(&Local));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(normalized, fmt) {
            if let Some(local) = Local.from_local_datetime(&naive).single() {
                return Some(local);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::{parse_date, read_embedded_timestamps};
    use chrono::{Datelike, Timelike};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_exif_and_display_layouts() {
        let exif = parse_date("2024:01:15 09:30:00").expect("exif layout");
        assert_eq!((exif.year(), exif.month(), exif.day()), (2024, 1, 15));
        assert_eq!(exif.hour(), 9);

        let display = parse_date("2024-01-15 09:30:00").expect("display layout");
        assert_eq!(display, exif);
    }

    #[test]
    fn parses_iso_with_offset() {
        let parsed = parse_date("2024-01-15T09:30:00+00:00").expect("iso layout");
        assert_eq!(parsed.timestamp(), 1_705_311_000);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_date("").is_none());
        assert!(parse_date("0000:00:00 00:00:00").is_none());
        assert!(parse_date("yesterday").is_none());
    }

    #[test]
    fn non_image_file_has_no_embedded_metadata() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("song.mp3");
        fs::write(&path, b"ID3 not really").expect("write");
        assert!(read_embedded_timestamps(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let temp = tempdir().expect("tempdir");
        assert!(read_embedded_timestamps(&temp.path().join("missing.jpg")).is_err());
    }
}
