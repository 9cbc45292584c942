use crate::dates::DateFormat;
use crate::directory::Environment;
use crate::processor::FileOutcome;

const HEADERS: [&str; 5] = ["(index)", "Action", "NewName", "Original", "Reason"];

/// Boxed table with one row per outcome.
pub fn render_table(outcomes: &[FileOutcome]) -> String {
    let rows: Vec<[String; 5]> = outcomes
        .iter()
        .enumerate()
        .map(|(index, outcome)| {
            [
                index.to_string(),
                outcome.action().to_string(),
                outcome.new_name().to_string(),
                outcome.original().to_string(),
                outcome.reason().unwrap_or("-").to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = |left: &str, mid: &str, right: &str| {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{left}{}{right}", segments.join(mid))
    };
    let line = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| {
                let pad = width - cell.chars().count();
                format!(" {cell}{} ", " ".repeat(pad))
            })
            .collect();
        format!("│{}│", padded.join("│"))
    };

    let mut out = Vec::with_capacity(rows.len() + 4);
    out.push(border("┌", "┬", "┐"));
    out.push(line(&HEADERS.map(String::from)));
    out.push(border("├", "┼", "┤"));
    for row in &rows {
        out.push(line(row));
    }
    out.push(border("└", "┴", "┘"));
    out.join("\n")
}

/// Help section listing the template variables and every date format.
pub fn formats_help() -> String {
    let mut out = String::from(
        "Template variables:\n  \
         {name}                  Original filename without extension\n  \
         {date}                  Formatted date according to --format\n  \
         {ext}                   File extension including the dot\n\n\
         Available date formats:\n",
    );
    for format in DateFormat::ALL {
        out.push_str(&format!(
            "  {:<20} {:<20} {}\n",
            format.as_str(),
            format.example(),
            format.description()
        ));
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Writes the report to the terminal and exits the real process.
#[derive(Debug, Clone)]
pub struct ConsoleEnvironment {
    help: String,
    report_to_stderr: bool,
}

impl ConsoleEnvironment {
    pub fn new(help: impl Into<String>) -> Self {
        Self {
            help: help.into(),
            report_to_stderr: false,
        }
    }

    /// Sends the human-readable report to stderr, keeping stdout free.
    pub fn with_report_to_stderr(mut self, enabled: bool) -> Self {
        self.report_to_stderr = enabled;
        self
    }

    fn stream(&self) -> Stream {
        if self.report_to_stderr {
            Stream::Stderr
        } else {
            Stream::Stdout
        }
    }

    fn emit(&self, text: &str) {
        match self.stream() {
            Stream::Stdout => println!("{text}"),
            Stream::Stderr => eprintln!("{text}"),
        }
    }
}

impl Environment for ConsoleEnvironment {
    fn log(&mut self, line: &str) {
        self.emit(line);
    }

    fn table(&mut self, outcomes: &[FileOutcome]) {
        self.emit(&render_table(outcomes));
    }

    fn error(&mut self, message: &str) {
        eprintln!("{message}");
    }

    /// Help follows the report so JSON on stdout stays parseable.
    fn show_help(&mut self) {
        self.emit(&self.help);
    }

    fn exit(&mut self, code: i32) {
        std::process::exit(code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::TimestampSource;
    use crate::processor::SkipReason;

    fn outcomes() -> Vec<FileOutcome> {
        vec![
            FileOutcome::Renamed {
                original: "a.mp3".to_string(),
                new_name: "a_011524.mp3".to_string(),
                source: TimestampSource::FileCreated,
            },
            FileOutcome::Skipped {
                original: "music".to_string(),
                new_name: "music".to_string(),
                reason: SkipReason::Directory,
            },
            FileOutcome::Errored {
                original: "b.mp3".to_string(),
                message: "disk full".to_string(),
            },
        ]
    }

    #[test]
    fn table_has_header_and_one_row_per_outcome() {
        let table = render_table(&outcomes());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3 + 4);
        assert!(lines[1].contains("Action"));
        assert!(lines[1].contains("NewName"));
        assert!(lines[1].contains("Original"));
        assert!(lines[1].contains("Reason"));
        assert!(lines[3].contains("rename") && lines[3].contains("a_011524.mp3"));
        assert!(lines[4].contains("directory"));
        assert!(lines[5].contains("disk full"));
    }

    #[test]
    fn missing_reason_renders_as_dash() {
        let table = render_table(&outcomes()[..1]);
        let row = table.lines().nth(3).expect("row");
        assert!(row.trim_end_matches('│').trim_end().ends_with('-'));
    }

    #[test]
    fn rows_are_aligned() {
        let table = render_table(&outcomes());
        let widths: Vec<usize> = table.lines().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn formats_help_lists_every_format() {
        let help = formats_help();
        for format in DateFormat::ALL {
            assert!(help.contains(format.as_str()));
            assert!(help.contains(format.example()));
        }
        assert!(help.contains("{ext}"));
    }

    #[test]
    fn help_and_report_share_stdout_by_default() {
        let console = ConsoleEnvironment::new("usage");
        assert_eq!(console.stream(), Stream::Stdout);

        let json = ConsoleEnvironment::new("usage").with_report_to_stderr(true);
        assert_eq!(json.stream(), Stream::Stderr);
    }
}
