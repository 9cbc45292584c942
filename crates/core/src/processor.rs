use crate::dates::{format_date, DateFormat, DEFAULT_LOCALE};
use crate::exif_reader::read_embedded_timestamps;
use crate::metadata::{select_timestamp, TimestampSource};
use crate::template::{apply_template, TemplateVars, DEFAULT_TEMPLATE};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};
use thiserror::Error;

/// Settings shared by every file of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Format identifier; kept as text so unknown values reach validation.
    pub date_format: String,
    /// `false` only simulates the renames.
    pub do_write: bool,
    pub locale: String,
    pub template: String,
    pub use_modified_time: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            date_format: DateFormat::default().as_str().to_string(),
            do_write: false,
            locale: DEFAULT_LOCALE.to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
            use_modified_time: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    Directory,
    AlreadyFormatted,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::Directory => "directory",
            SkipReason::AlreadyFormatted => "already-formatted",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of processing one directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum FileOutcome {
    #[serde(rename = "rename")]
    Renamed {
        original: String,
        new_name: String,
        source: TimestampSource,
    },
    #[serde(rename = "skip")]
    Skipped {
        original: String,
        new_name: String,
        reason: SkipReason,
    },
    #[serde(rename = "error")]
    Errored { original: String, message: String },
}

impl FileOutcome {
    pub fn action(&self) -> &'static str {
        match self {
            FileOutcome::Renamed { .. } => "rename",
            FileOutcome::Skipped { .. } => "skip",
            FileOutcome::Errored { .. } => "error",
        }
    }

    pub fn original(&self) -> &str {
        match self {
            FileOutcome::Renamed { original, .. }
            | FileOutcome::Skipped { original, .. }
            | FileOutcome::Errored { original, .. } => original,
        }
    }

    /// Computed name; empty for errors.
    pub fn new_name(&self) -> &str {
        match self {
            FileOutcome::Renamed { new_name, .. } | FileOutcome::Skipped { new_name, .. } => {
                new_name
            }
            FileOutcome::Errored { .. } => "",
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            FileOutcome::Renamed { .. } => None,
            FileOutcome::Skipped { reason, .. } => Some(reason.as_str()),
            FileOutcome::Errored { message, .. } => Some(message),
        }
    }

    fn errored(original: &str, err: impl fmt::Display) -> Self {
        let message = err.to_string();
        FileOutcome::Errored {
            original: original.to_string(),
            message: if message.is_empty() {
                "Unknown error".to_string()
            } else {
                message
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("{}: file name is not valid UTF-8", path.display())]
    NonUtf8Name { path: PathBuf },
    #[error("{}: {source}", path.display())]
    Metadata { path: PathBuf, source: io::Error },
    #[error("cannot create {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("cannot rename {} -> {}: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

/// Computes the new name for `file` inside `dir` and, in write mode, moves it.
///
/// Never fails: every problem becomes an [`FileOutcome::Errored`] record.
pub fn process_file(
    dir: &Path,
    file: impl AsRef<OsStr>,
    options: &ProcessOptions,
) -> FileOutcome {
    let file = file.as_ref();
    match try_process_file(dir, file, options) {
        Ok(outcome) => outcome,
        Err(err) => {
            let display = file.to_string_lossy();
            log::debug!("{display}: {err}");
            FileOutcome::errored(&display, err)
        }
    }
}

fn try_process_file(
    dir: &Path,
    os_name: &OsStr,
    options: &ProcessOptions,
) -> Result<FileOutcome, ProcessError> {
    let path = dir.join(os_name);
    let stats = fs::metadata(&path).map_err(|source| ProcessError::Metadata {
        path: path.clone(),
        source,
    })?;

    if stats.is_dir() {
        let display = os_name.to_string_lossy().to_string();
        return Ok(FileOutcome::Skipped {
            original: display.clone(),
            new_name: display,
            reason: SkipReason::Directory,
        });
    }

    let file = os_name
        .to_str()
        .ok_or_else(|| ProcessError::NonUtf8Name { path: path.clone() })?;

    // Only regular files are opened; FIFOs and device nodes could block.
    let embedded = if stats.is_file() {
        match read_embedded_timestamps(&path) {
            Ok(tags) if !tags.is_empty() => Some(tags),
            Ok(_) => None,
            Err(err) => {
                log::debug!("{file}: {err:#}");
                None
            }
        }
    } else {
        None
    };
    let (timestamp, source) =
        select_timestamp(embedded.as_ref(), &stats, options.use_modified_time).map_err(
            |source| ProcessError::Metadata {
                path: path.clone(),
                source,
            },
        )?;
    log::debug!("{file}: using {source:?} {timestamp}");

    let (name, ext) = split_file_name(file);
    let vars = TemplateVars {
        name,
        date: format_date(&timestamp, &options.date_format, &options.locale),
        ext,
    };
    let new_name = apply_template(&options.template, &vars);
    let new_path = dir.join(relative_target(&new_name));

    if has_separator(&new_name) && options.do_write {
        if let Some(parent) = new_path.parent() {
            fs::create_dir_all(parent).map_err(|source| ProcessError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    if new_name == file {
        return Ok(FileOutcome::Skipped {
            original: file.to_string(),
            new_name,
            reason: SkipReason::AlreadyFormatted,
        });
    }

    if options.do_write {
        fs::rename(&path, &new_path).map_err(|source| ProcessError::Rename {
            from: path.clone(),
            to: new_path.clone(),
            source,
        })?;
    }

    Ok(FileOutcome::Renamed {
        original: file.to_string(),
        new_name,
        source,
    })
}

fn has_separator(name: &str) -> bool {
    name.contains(['/', MAIN_SEPARATOR])
}

/// Drops root and prefix components so the target always stays under the
/// source directory.
fn relative_target(new_name: &str) -> PathBuf {
    Path::new(new_name)
        .components()
        .filter(|component| !matches!(component, Component::RootDir | Component::Prefix(_)))
        .collect()
}

/// Splits `photo.tar.gz` into `("photo.tar", ".gz")`; dotfiles keep their
/// whole name.
fn split_file_name(file: &str) -> (String, String) {
    let path = Path::new(file);
    let name = path
        .file_stem()
        .map(|v| v.to_string_lossy().to_string())
        .unwrap_or_else(|| file.to_string());
    let ext = path
        .extension()
        .map(|v| format!(".{}", v.to_string_lossy()))
        .unwrap_or_default();
    (name, ext)
}
