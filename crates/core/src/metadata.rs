use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::Metadata;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimestampSource {
    EmbeddedCreated,
    EmbeddedModified,
    FileCreated,
    FileModified,
}

/// Creation and modification times found inside a file's own metadata tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbeddedTimestamps {
    pub created: Option<DateTime<Local>>,
    pub modified: Option<DateTime<Local>>,
}

impl EmbeddedTimestamps {
    pub fn is_empty(&self) -> bool {
        self.created.is_none() && self.modified.is_none()
    }
}

/// Picks the timestamp used for `{date}`.
///
/// Embedded tags win over filesystem times, but only for the kind of time
/// that was asked for. A filesystem that cannot report creation time yields
/// the modification time instead.
pub fn select_timestamp(
    embedded: Option<&EmbeddedTimestamps>,
    stats: &Metadata,
    use_modified_time: bool,
) -> std::io::Result<(DateTime<Local>, TimestampSource)> {
    let embedded = embedded.cloned().unwrap_or_default();

    if use_modified_time {
        if let Some(date) = embedded.modified {
            return Ok((date, TimestampSource::EmbeddedModified));
        }
        let modified = stats.modified()?;
        return Ok((DateTime::from(modified), TimestampSource::FileModified));
    }

    if let Some(date) = embedded.created {
        return Ok((date, TimestampSource::EmbeddedCreated));
    }

    match stats.created() {
        Ok(created) => Ok((DateTime::from(created), TimestampSource::FileCreated)),
        Err(err) => {
            log::debug!("creation time unavailable ({err}), using modification time");
            let modified = stats.modified()?;
            Ok((DateTime::from(modified), TimestampSource::FileModified))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{select_timestamp, EmbeddedTimestamps, TimestampSource};
    use chrono::{Local, TimeZone};
    use std::fs;
    use tempfile::tempdir;

    fn embedded() -> EmbeddedTimestamps {
        EmbeddedTimestamps {
            created: Local.with_ymd_and_hms(2020, 5, 1, 10, 0, 0).single(),
            modified: Local.with_ymd_and_hms(2021, 6, 2, 11, 0, 0).single(),
        }
    }

    #[test]
    fn embedded_times_take_priority() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("a.jpg");
        fs::write(&path, b"x").expect("write");
        let stats = fs::metadata(&path).expect("stat");

        let tags = embedded();
        let (created, source) = select_timestamp(Some(&tags), &stats, false).expect("select");
        assert_eq!(Some(created), tags.created);
        assert_eq!(source, TimestampSource::EmbeddedCreated);

        let (modified, source) = select_timestamp(Some(&tags), &stats, true).expect("select");
        assert_eq!(Some(modified), tags.modified);
        assert_eq!(source, TimestampSource::EmbeddedModified);
    }

    #[test]
    fn missing_embedded_kind_falls_back_to_filesystem() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("a.jpg");
        fs::write(&path, b"x").expect("write");
        let stats = fs::metadata(&path).expect("stat");

        let only_created = EmbeddedTimestamps {
            created: embedded().created,
            modified: None,
        };
        let (_, source) = select_timestamp(Some(&only_created), &stats, true).expect("select");
        assert_eq!(source, TimestampSource::FileModified);

        let (_, source) = select_timestamp(None, &stats, false).expect("select");
        assert!(matches!(
            source,
            TimestampSource::FileCreated | TimestampSource::FileModified
        ));
    }

    #[test]
    fn empty_embedded_reports_empty() {
        assert!(EmbeddedTimestamps::default().is_empty());
        assert!(!embedded().is_empty());
    }
}
