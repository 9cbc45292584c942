use anyhow::Result;
use clap::{CommandFactory, FromArgMatches, Parser, ValueEnum};
use serde::Serialize;
use stamp_renamer_core::{
    app_paths, formats_help, load_config, process_directory, save_config, AppConfig,
    ConsoleEnvironment, DirectorySummary, Environment,
};
use std::path::PathBuf;

const EXAMPLES: &str = "Examples:
  stamp-renamer ./my_music_files                             Dry run on directory using defaults
  stamp-renamer --write --template \"{date}_{name}{ext}\" ./   Date first, then original name
  stamp-renamer --template \"{date}/{name}{ext}\" --write ./   Organize into date-named folders
  stamp-renamer --format YYYY_MM_DD ./videos                 Use ISO-like date format";

#[derive(Debug, Parser)]
#[command(name = "stamp-renamer", version)]
#[command(about = "Rename files in directories based on their creation or modification date")]
struct Cli {
    /// Directories whose entries are renamed
    dirs: Vec<PathBuf>,
    /// Actually rename the files (default: dry run)
    #[arg(long, default_value_t = false)]
    write: bool,
    /// Use the modification date instead of the creation date
    #[arg(long, default_value_t = false, conflicts_with = "created")]
    updated: bool,
    /// Use the creation date (default)
    #[arg(long, default_value_t = false)]
    created: bool,
    /// Date format to use [default: MMDDYY]
    #[arg(long)]
    format: Option<String>,
    /// Locale for month names [default: en-US]
    #[arg(long)]
    locale: Option<String>,
    /// Template for the output filename [default: {name}_{date}{ext}]
    #[arg(long)]
    template: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    /// Print the config file location and the effective settings
    #[arg(long, default_value_t = false)]
    show_config: bool,
    /// Store the effective format, locale, template and date source as defaults
    #[arg(long, default_value_t = false)]
    save_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Serialize)]
struct DirectoryReport {
    directory: PathBuf,
    summary: DirectorySummary,
}

fn main() -> Result<()> {
    env_logger::init();

    let mut command = Cli::command().after_help(format!("{}\n{EXAMPLES}", formats_help()));
    let help = command.render_help().to_string();
    let cli = Cli::from_arg_matches(&command.get_matches()).unwrap_or_else(|err| err.exit());

    let config = effective_config(&cli, load_config()?);

    if cli.show_config {
        cmd_config_show(&config)?;
    }
    if cli.save_config {
        let path = save_config(&config)?;
        eprintln!("Saved settings to {}", path.display());
    }

    if cli.dirs.is_empty() {
        if cli.show_config || cli.save_config {
            return Ok(());
        }
        eprintln!("Error: You must specify at least one input directory.");
        println!("{help}");
        std::process::exit(2);
    }

    let json = cli.output == OutputFormat::Json;
    let options = config.to_options(cli.write);
    let mut env = ConsoleEnvironment::new(help).with_report_to_stderr(json);
    let mut reports = Vec::with_capacity(cli.dirs.len());

    for dir in cli.dirs {
        log::debug!("processing {}", dir.display());
        let summary = process_directory(&dir, &options, &mut env);
        env.log("");
        reports.push(DirectoryReport {
            directory: dir,
            summary,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    Ok(())
}

/// Command-line flags override the stored configuration.
fn effective_config(cli: &Cli, stored: AppConfig) -> AppConfig {
    let use_modified_time = if cli.updated {
        true
    } else if cli.created {
        false
    } else {
        stored.use_modified_time
    };

    AppConfig {
        date_format: cli.format.clone().unwrap_or(stored.date_format),
        locale: cli.locale.clone().unwrap_or(stored.locale),
        template: cli.template.clone().unwrap_or(stored.template),
        use_modified_time,
    }
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let paths = app_paths()?;
    println!("Config file: {}", paths.config_path.display());
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
