mod config;
mod dates;
mod directory;
mod exif_reader;
mod metadata;
mod processor;
mod report;
mod template;

pub use config::{app_paths, load_config, save_config, AppConfig, AppPaths};
pub use dates::{format_date, DateFormat, UnknownDateFormat, DEFAULT_LOCALE};
pub use directory::{list_entries, process_directory, DirectorySummary, Environment};
pub use exif_reader::read_embedded_timestamps;
pub use metadata::{select_timestamp, EmbeddedTimestamps, TimestampSource};
pub use processor::{process_file, FileOutcome, ProcessError, ProcessOptions, SkipReason};
pub use report::{formats_help, render_table, ConsoleEnvironment};
pub use template::{
    apply_template, parse_template, render_template, TemplatePart, TemplateVars, Token,
    DEFAULT_TEMPLATE,
};
