use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use glob::glob;
use hkwire_core::{DecodeReport, ExportStats, InputFormat};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("HKWIRE_BUILD_COMMIT"),
    " ",
    env!("HKWIRE_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "hkwire")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decoder for HK Wire control-bus frames (device names, commands, payloads).",
    long_about = None,
    after_help = "Examples:\n  hkwire decode capture.csv -o report.json\n  hkwire decode frames.jsonl --text\n  hkwire stats capture.csv"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); HKWIRE_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a frame capture and generate a versioned JSON report.
    #[command(
        visible_alias = "analyse",
        after_help = "Examples:\n  hkwire decode capture.csv -o report.json\n  hkwire decode frames.jsonl --stdout --pretty\n  hkwire decode 'captures/*.csv' --text"
    )]
    Decode {
        /// Path to an analyzer .csv export or a .jsonl frame file
        input: PathBuf,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present_any = ["stdout", "text"])]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Print one rendered line per frame instead of JSON
        #[arg(long, conflicts_with_all = ["report", "stdout", "pretty", "compact"])]
        text: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,

        /// Exit with a non-zero code if any payload could not be decoded
        #[arg(long)]
        strict: bool,
    },
    /// List distinct sources, destinations and commands in an analyzer export.
    Stats {
        /// Path to an analyzer .csv export
        input: PathBuf,

        /// Emit the statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Decode {
            input,
            report,
            stdout,
            text,
            pretty,
            compact,
            quiet,
            strict,
        } => cmd_decode(DecodeArgs {
            input,
            report,
            stdout,
            text,
            pretty,
            compact,
            quiet,
            strict,
        }),
        Commands::Stats { input, json } => cmd_stats(input, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_env("HKWIRE_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

struct DecodeArgs {
    input: PathBuf,
    report: Option<PathBuf>,
    stdout: bool,
    text: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
    strict: bool,
}

fn cmd_decode(args: DecodeArgs) -> Result<(), CliError> {
    let input = resolve_input_path(&args.input)?;
    validate_input_file(&input, &[InputFormat::Export, InputFormat::JsonLines])?;

    if let Some(report_path) = args.report.as_ref() {
        ensure_distinct_output(&input, report_path)?;
    }

    debug!(input = %input.display(), "decoding frames");
    let rep = hkwire_core::decode_file(&input).context("frame decoding failed")?;

    if args.text {
        for frame in &rep.frames {
            println!("{:.6}  {}", frame.timestamp_start, frame.render());
        }
    } else {
        let json = serialize_report(&rep, args.pretty, args.compact)?;
        match args.report.as_ref() {
            Some(report) if !args.stdout => {
                write_report(report, &json)?;
                if !args.quiet {
                    eprintln!("OK: report written -> {}", report.display());
                }
            }
            _ => print!("{}", json),
        }
    }

    if args.strict && rep.summary.invalid_payloads > 0 {
        return Err(CliError::new(
            format!(
                "{} frame(s) with undecodable payloads",
                rep.summary.invalid_payloads
            ),
            Some("use --text to inspect the affected frames".to_string()),
        ));
    }
    Ok(())
}

fn cmd_stats(input: PathBuf, json: bool) -> Result<(), CliError> {
    let input = resolve_input_path(&input)?;
    validate_input_file(&input, &[InputFormat::Export])?;

    let file = fs::File::open(&input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    let stats = hkwire_core::summarize_export(file).context("export statistics failed")?;
    debug!(rows = stats.rows, "summarized export");

    if let Some(mismatch) = &stats.header_mismatch {
        eprintln!("warning: unexpected export header");
        eprintln!("expected: {}", mismatch.expected.join(","));
        eprintln!("actual  : {}", mismatch.actual.join(","));
    }

    if json {
        let text = serde_json::to_string_pretty(&stats).context("JSON serialization failed")?;
        println!("{}", text);
    } else {
        print_stats(&stats);
    }
    Ok(())
}

fn print_stats(stats: &ExportStats) {
    print!("{}", stats.render());
}

fn ensure_distinct_output(input: &Path, report_path: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let parent = match report_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // A missing output directory is created later, so it cannot alias the input.
    let Ok(report_dir) = fs::canonicalize(parent) else {
        return Ok(());
    };
    let file_name = report_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?;
    if report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!(
                "report path must differ from input: {}",
                report_path.display()
            ),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn write_report(report: &Path, json: &str) -> Result<(), CliError> {
    if let Some(parent) = report.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(report, json)
        .with_context(|| format!("Failed to write report: {}", report.display()))?;
    Ok(())
}

fn serialize_report(rep: &DecodeReport, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn expected_extensions(formats: &[InputFormat]) -> String {
    formats
        .iter()
        .map(|format| match format {
            InputFormat::Export => ".csv",
            InputFormat::JsonLines => ".jsonl or .ndjson",
        })
        .collect::<Vec<_>>()
        .join(" or ")
}

fn validate_input_file(input: &Path, formats: &[InputFormat]) -> Result<(), CliError> {
    let expected = expected_extensions(formats);
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some(format!("use a {} file", expected)),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some(format!("use a {} file", expected)),
        ));
    }
    match InputFormat::from_path(input) {
        Some(format) if formats.contains(&format) => Ok(()),
        _ => Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some(format!("expected a {} file", expected)),
        )),
    }
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    let mut matches = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        count => {
            let listed = matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let more = if count > 3 { ", ..." } else { "" };
            Err(CliError::new(
                format!(
                    "multiple files match pattern '{}' ({} matches); matches: {}{}",
                    pattern, count, listed, more
                ),
                Some("pass a single capture file, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
