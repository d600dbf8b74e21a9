use std::{num::NonZeroU32, path::PathBuf, sync::Arc};

use clap::{Parser, error::ErrorKind};
use colored::Colorize;
use env_logger::Env;
use filmstrip::{
    DEFAULT_FRAME_COUNT, FilmstripSplitter, OutputFormat, ProgressCallback, ProgressInfo,
    RemainderPolicy, SplitOptions, SplitReport, parse_frame_count,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  filmstrip knob.png frames\n  filmstrip knob.png frames 64 --prefix knob\n  filmstrip slider.png out 101 --strict --progress\n  filmstrip knob.png frames 128 --json";

#[derive(Debug, Parser)]
#[command(
    name = "filmstrip",
    version,
    about = "Split a vertical filmstrip image into numbered frame images",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Filmstrip image to split.
    input: PathBuf,

    /// Directory the frames are written to. Created if missing.
    output: PathBuf,

    /// Number of frames stacked in the image [default: 128].
    #[arg(allow_negative_numbers = true)]
    frame_count: Option<String>,

    /// File name prefix; frames are named `{prefix}_{index}.{ext}`.
    #[arg(long, default_value = filmstrip::DEFAULT_PREFIX)]
    prefix: String,

    /// Output image format (png, bmp, tiff, tga).
    #[arg(long, default_value = "png")]
    format: OutputFormat,

    /// Fail instead of discarding rows when the height is not divisible.
    #[arg(long)]
    strict: bool,

    /// Show a progress bar.
    #[arg(long)]
    progress: bool,

    /// Show additional logging output.
    #[arg(long)]
    verbose: bool,

    /// Print a machine-readable JSON summary.
    #[arg(long)]
    json: bool,
}

struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new(total: u64) -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(total);
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        bar.set_style(style.progress_chars("##-"));
        Ok(Self { bar })
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.bar.set_position(info.current);
        if info.current >= info.total {
            self.bar.finish_with_message("done");
        }
    }
}

fn resolve_frame_count(value: Option<&str>) -> Result<NonZeroU32, filmstrip::FilmstripError> {
    value.map_or(Ok(DEFAULT_FRAME_COUNT), parse_frame_count)
}

/// Filter used when `RUST_LOG` is unset. The CLI prints the remainder
/// warning itself, so the library's `warn` record stays hidden by default.
fn default_log_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "error" }
}

fn init_logging(verbose: bool) {
    env_logger::Builder::from_env(Env::default().default_filter_or(default_log_filter(verbose)))
        .format_timestamp(None)
        .init();
}

fn print_summary(cli: &Cli, report: &SplitReport) -> Result<(), Box<dyn std::error::Error>> {
    if cli.json {
        let payload = json!({
            "input": cli.input.display().to_string(),
            "output": cli.output.display().to_string(),
            "frame_count": report.frame_count,
            "frame_width": report.frame_width,
            "frame_height": report.frame_height,
            "remainder_rows": report.remainder_rows,
            "warning": report.warning.map(|warning| warning.to_string()),
            "files": report
                .written
                .iter()
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!(
            "{} {}",
            "success:".green().bold(),
            format!(
                "Extracted {} frame(s) of {}x{} to {}",
                report.written.len(),
                report.frame_width,
                report.frame_height,
                cli.output.display()
            )
            .green()
        );
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let frame_count = resolve_frame_count(cli.frame_count.as_deref())?;
    let policy = if cli.strict {
        RemainderPolicy::Reject
    } else {
        RemainderPolicy::Discard
    };

    let mut options = SplitOptions::new()
        .with_prefix(cli.prefix.as_str())
        .with_format(cli.format)
        .with_remainder_policy(policy);
    if cli.progress {
        options = options.with_progress(Arc::new(TerminalProgress::new(u64::from(
            frame_count.get(),
        ))?));
    }
    let splitter = FilmstripSplitter::new(frame_count, options)?;

    let source = splitter.read_source(&cli.input)?;
    if cli.verbose {
        eprintln!(
            "loaded {} ({}x{})",
            cli.input.display(),
            source.width(),
            source.height()
        );
    }

    // Surface the remainder warning before any frame is written.
    let prepared = splitter.prepare(source)?;
    if let Some(warning) = prepared.warning() {
        eprintln!("{} {}", "warning:".yellow().bold(), warning.to_string().yellow());
    }

    let report = splitter.write(&prepared, &cli.output)?;

    if cli.verbose {
        for path in &report.written {
            eprintln!("saved {}", path.display());
        }
    }

    print_summary(cli, &report)
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => match error.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => error.exit(),
            _ => {
                let _ = error.print();
                std::process::exit(1);
            }
        },
    };

    init_logging(cli.verbose);

    if let Err(error) = run(&cli) {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
