use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use env_logger::Builder;
use log::LevelFilter;
use photo_date_renamer_core::{run_batch, BatchReport, CandidateAction, RunConfig, TimestampSource};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_PARTIAL_FAILURE: u8 = 1;
const EXIT_FATAL: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "photo-date-renamer", version)]
#[command(
    about = "Rename photos to <prefix>_YYYYMMDD_HHMMSS.<ext> using their EXIF capture date",
    after_help = "Files without EXIF dates fall back to their modification time.\n\
                  Exit status: 0 all files handled, 1 some files failed, 2 fatal error."
)]
struct Cli {
    /// Directory containing the photos to rename.
    directory: PathBuf,
    /// Show what would be renamed without touching any file.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    /// File extensions to process [default: png jpg jpeg tiff tif heic]
    #[arg(long, num_args = 1.., value_name = "EXT")]
    extensions: Option<Vec<String>>,
    /// Prefix for renamed files.
    #[arg(long, default_value = "photo")]
    prefix: String,
    /// Also process every subdirectory.
    #[arg(short, long, default_value_t = false)]
    recursive: bool,
    /// Leave dot-files and dot-directories alone.
    #[arg(long, default_value_t = false)]
    skip_hidden: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    /// Log verbosity, repeat for more detail.
    #[arg(short, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    configure_logging(cli.verbose);

    let result = cmd_rename(cli);
    if let Err(err) = &result {
        log::error!("{:#}", err);
    }
    exit_code(&result)
}

fn exit_code(result: &Result<BatchReport>) -> ExitCode {
    match result {
        Ok(report) if report.has_failures() => ExitCode::from(EXIT_PARTIAL_FAILURE),
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::from(EXIT_FATAL),
    }
}

fn configure_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "{style}{}{style:#}\t{}",
                record.level(),
                record.args()
            )
        })
        .init();
}

fn build_config(cli: &Cli) -> RunConfig {
    let config = RunConfig::new(&cli.directory)
        .with_dry_run(cli.dry_run)
        .with_prefix(&cli.prefix)
        .with_recursive(cli.recursive)
        .with_skip_hidden(cli.skip_hidden);
    match &cli.extensions {
        Some(extensions) => config.with_extensions(extensions.as_slice()),
        None => config,
    }
}

fn cmd_rename(cli: Cli) -> Result<BatchReport> {
    let config = build_config(&cli);
    if config.dry_run() {
        eprintln!("DRY RUN MODE - no files will be renamed");
    }
    log::info!(
        "processing {} (extensions: {})",
        config.target_dir().display(),
        config
            .extensions()
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    );

    let report = run_batch(&config)?;
    for message in &report.plan.scan_errors {
        eprintln!("Unreadable: {}", message);
    }

    match cli.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            print_table(&report);
        }
    }
    print_summary(&report);

    Ok(report)
}

fn print_table(report: &BatchReport) {
    match &report.applied {
        None => {
            for candidate in &report.plan.candidates {
                match &candidate.action {
                    CandidateAction::Rename {
                        target_path,
                        source,
                        ..
                    } => println!(
                        "Would rename: {} -> {} ({})",
                        candidate.original_path.display(),
                        target_path.display(),
                        source_label(*source)
                    ),
                    CandidateAction::Unresolved { reason } => println!(
                        "Cannot rename: {} ({})",
                        candidate.original_path.display(),
                        reason
                    ),
                }
            }
        }
        Some(applied) => {
            for op in &applied.renamed {
                println!("Renamed: {} -> {}", op.from.display(), op.to.display());
            }
            for failure in &applied.failures {
                println!(
                    "Failed: {}: {}",
                    failure.original_path.display(),
                    failure.message
                );
            }
        }
    }
}

fn print_summary(report: &BatchReport) {
    let stats = &report.plan.stats;
    eprintln!(
        "\nSummary: scanned={} matched={} extension_skip={} hidden_skip={} already_named={} planned={} unresolved={} unreadable={}",
        stats.scanned_files,
        stats.matched_files,
        stats.skipped_extension,
        stats.skipped_hidden,
        stats.skipped_already_named,
        stats.planned,
        stats.unresolved,
        stats.unreadable_entries
    );

    match &report.applied {
        Some(applied) => eprintln!(
            "Renamed {} files, {} failed.",
            applied.renamed.len(),
            applied.failures.len()
        ),
        None => eprintln!("Dry run complete: no files were changed."),
    }
}

fn source_label(source: TimestampSource) -> &'static str {
    match source {
        TimestampSource::Exif => "exif",
        TimestampSource::FileModified => "file modified",
    }
}
