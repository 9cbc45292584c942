use crate::dates::DateFormat;
use crate::processor::{process_file, FileOutcome, ProcessOptions};
use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::Path;

const RULE: &str = "───────────────────────────────────────────────────────";

/// Counts and per-entry outcomes for one directory, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorySummary {
    pub renamed: usize,
    pub skipped: usize,
    pub errors: usize,
    pub files: Vec<FileOutcome>,
}

impl DirectorySummary {
    /// Summary of a directory that could not be processed at all.
    pub fn failed() -> Self {
        Self {
            errors: 1,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Renamed { .. } => self.renamed += 1,
            FileOutcome::Skipped { .. } => self.skipped += 1,
            FileOutcome::Errored { .. } => self.errors += 1,
        }
        self.files.push(outcome);
    }
}

/// Everything the directory processor touches outside of its own state.
///
/// The filesystem-facing methods have real implementations by default;
/// output, help and termination are left to the caller.
pub trait Environment {
    fn read_dir(&mut self, dir: &Path) -> io::Result<Vec<OsString>> {
        list_entries(dir)
    }

    fn process_file(
        &mut self,
        dir: &Path,
        file: &OsStr,
        options: &ProcessOptions,
    ) -> FileOutcome {
        process_file(dir, file, options)
    }

    fn log(&mut self, line: &str);
    fn table(&mut self, outcomes: &[FileOutcome]);
    fn error(&mut self, message: &str);
    fn show_help(&mut self);
    /// Ends the process. Test doubles may return instead.
    fn exit(&mut self, code: i32);
}

/// Entry names of `dir`, sorted so runs are reproducible. Names are kept
/// as the OS reports them, including ones that are not valid UTF-8.
pub fn list_entries(dir: &Path) -> io::Result<Vec<OsString>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        names.push(entry?.file_name());
    }
    names.sort();
    Ok(names)
}

pub fn process_directory<E: Environment + ?Sized>(
    dir: &Path,
    options: &ProcessOptions,
    env: &mut E,
) -> DirectorySummary {
    let files = match env.read_dir(dir) {
        Ok(files) => files,
        Err(err) => {
            env.error(&format!(
                "Error processing directory {}: {err}",
                dir.display()
            ));
            return DirectorySummary::failed();
        }
    };

    let format = match options.date_format.parse::<DateFormat>() {
        Ok(format) => format,
        Err(err) => {
            env.error(&format!("Error: {err}"));
            env.show_help();
            env.exit(1);
            return DirectorySummary::failed();
        }
    };

    env.log(&format!("Processing directory: {}", dir.display()));
    env.log(&format!(
        "Mode: {}",
        if options.do_write { "Write" } else { "Dry Run" }
    ));
    env.log(&format!(
        "Using: {}",
        if options.use_modified_time {
            "Modified Time"
        } else {
            "Creation Time"
        }
    ));
    env.log(&format!("Format: {} ({})", format, format.example()));
    env.log(&format!("Locale: {}", options.locale));
    env.log(&format!("Template: {}", options.template));
    env.log(RULE);

    let mut summary = DirectorySummary::default();
    for file in &files {
        let outcome = env.process_file(dir, file, options);
        summary.record(outcome);
    }

    if !summary.files.is_empty() {
        env.table(&summary.files);
    }

    env.log(RULE);
    env.log(&format!(
        "Summary: {} files {}, {} skipped, {} errors",
        summary.renamed,
        if options.do_write {
            "renamed"
        } else {
            "would be renamed"
        },
        summary.skipped,
        summary.errors
    ));

    summary
}
