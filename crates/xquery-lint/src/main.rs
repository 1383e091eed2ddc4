use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use xquery_analyzer::{Analyzer, LintConfig};
use xquery_lint::{format_human, format_json, load_units, OutputFormat};

struct Args {
    config: Option<PathBuf>,
    format: OutputFormat,
    files: Vec<PathBuf>,
}

fn print_help() {
    println!("Usage: xquery-lint [--config <file>] [--format human|json] <unit files...>");
    println!();
    println!("Unit files are JSON unit documents or tree notation files (.xqt).");
    println!("Set RUST_LOG to control logging (default: warn).");
}

fn parse_args(args: &[String]) -> Result<Option<Args>, String> {
    let mut parsed = Args {
        config: None,
        format: OutputFormat::Human,
        files: Vec::new(),
    };

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or("--config needs a file")?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--format" => {
                let format = iter.next().ok_or("--format needs a value")?;
                parsed.format = format.parse()?;
            }
            "--help" | "-h" => return Ok(None),
            other if other.starts_with('-') => return Err(format!("Unknown option: {other}")),
            file => parsed.files.push(PathBuf::from(file)),
        }
    }

    if parsed.files.is_empty() {
        return Err("no unit files specified".to_string());
    }
    Ok(Some(parsed))
}

fn run(args: Args) -> ExitCode {
    let config = match &args.config {
        Some(path) => match LintConfig::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading configuration: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => LintConfig::default(),
    };

    let analyzer = match Analyzer::new(config) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let units = load_units(args.files.as_slice());
    let mut clean = units.len() == args.files.len();
    let reports = analyzer.analyze(&units);
    clean &= reports.iter().all(|r| !r.failed && r.issues.is_empty());

    match args.format {
        OutputFormat::Human => print!("{}", format_human(&reports, analyzer.registry())),
        OutputFormat::Json => match format_json(&reports, analyzer.registry()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error writing reports: {e}");
                return ExitCode::FAILURE;
            }
        },
    }

    if clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match parse_args(&args) {
        Ok(Some(args)) => run(args),
        Ok(None) => {
            print_help();
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            print_help();
            ExitCode::FAILURE
        }
    }
}
