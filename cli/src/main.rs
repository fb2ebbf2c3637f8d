use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use command_parser::{CommandParser, ErrorMode, ParseReport, format_result};
use command_parser_core::tokenize;
use command_parser_registry::CommandRegistry;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
    Text,
}

impl From<CliOutputFormat> for command_parser::OutputFormat {
    fn from(fmt: CliOutputFormat) -> Self {
        match fmt {
            CliOutputFormat::Json => Self::Json,
            CliOutputFormat::Yaml => Self::Yaml,
            CliOutputFormat::Text => Self::Text,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "parse-command")]
#[command(about = "Parse command lines against a registered command tree")]
struct Cli {
    /// Log level used when RUST_LOG is unset (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a single line and print the result.
    Parse(ParseArgs),
    /// Parse every line of a file (or stdin) in parallel, one JSON result per line.
    Batch(BatchArgs),
    /// Print the tokens of a line as JSON.
    Tokenize(TokenizeArgs),
    /// Load and validate registry files or directories.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct RegistryArgs {
    /// Registry file (.json/.yaml/.yml) or directory of per-command files.
    #[arg(long)]
    registry: PathBuf,
    /// Override the registry's command prefix.
    #[arg(long)]
    prefix: Option<String>,
    /// Collect errors on the result instead of failing on the first one.
    #[arg(long)]
    permissive: bool,
}

#[derive(Debug, Args)]
struct ParseArgs {
    #[command(flatten)]
    registry: RegistryArgs,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// The line to parse.
    #[arg(allow_hyphen_values = true)]
    line: String,
}

#[derive(Debug, Args)]
struct BatchArgs {
    #[command(flatten)]
    registry: RegistryArgs,
    /// Input file with one line per invocation (default: stdin).
    #[arg(long)]
    input: Option<PathBuf>,
    /// Number of parallel parse jobs (default: number of CPUs).
    #[arg(long)]
    jobs: Option<usize>,
}

#[derive(Debug, Args)]
struct TokenizeArgs {
    /// The line to tokenize.
    #[arg(allow_hyphen_values = true)]
    line: String,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Registry files and/or directories of per-command files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Batch(args) => run_batch(args),
        Command::Tokenize(args) => run_tokenize(args),
        Command::Validate(args) => run_validate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .init();
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let parser = build_parser(&args.registry)?;
    let result = parser.parse(&args.line).map_err(|err| err.to_string())?;
    let output = format_result(&result, args.format.into())?;
    println!("{}", output.trim_end());
    Ok(())
}

fn run_batch(args: BatchArgs) -> Result<(), String> {
    use rayon::prelude::*;

    let parser = build_parser(&args.registry)?;
    let input = read_input(args.input.as_deref())?;
    let lines: Vec<&str> = input.lines().filter(|l| !l.trim().is_empty()).collect();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.jobs.unwrap_or(0))
        .build()
        .map_err(|e| format!("Failed to create thread pool: {e}"))?;

    let outputs: Vec<Result<(String, bool), String>> = pool.install(|| {
        lines
            .par_iter()
            .map(|line| batch_entry(&parser, line))
            .collect()
    });

    let mut failed = 0usize;
    for output in outputs {
        let (json, ok) = output?;
        if !ok {
            failed += 1;
        }
        println!("{json}");
    }

    info!(lines = lines.len(), failed, "batch complete");
    Ok(())
}

/// One compact JSON object for a batch line (the parse report, or the line
/// with its error) and whether the line parsed.
fn batch_entry(parser: &CommandParser, line: &str) -> Result<(String, bool), String> {
    let (value, ok) = match parser.parse(line) {
        Ok(result) => (serde_json::to_value(ParseReport::from(&result)), true),
        Err(err) => (
            Ok(serde_json::json!({ "line": line, "error": err.to_string() })),
            false,
        ),
    };
    let value = value.map_err(|e| format!("JSON serialization failed: {e}"))?;
    let json =
        serde_json::to_string(&value).map_err(|e| format!("JSON serialization failed: {e}"))?;
    Ok((json, ok))
}

fn run_tokenize(args: TokenizeArgs) -> Result<(), String> {
    let tokens = tokenize(&args.line);
    let json =
        serde_json::to_string(&tokens).map_err(|e| format!("JSON serialization failed: {e}"))?;
    println!("{json}");
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut commands = 0;
    for path in &args.inputs {
        let registry = load_registry(path)?;
        debug!(path = %path.display(), commands = registry.len(), "validated registry");
        commands += registry.len();
    }
    println!(
        "Validated {} registry source(s) with {} root command(s).",
        args.inputs.len(),
        commands
    );
    Ok(())
}

fn load_registry(path: &Path) -> Result<CommandRegistry, String> {
    let loaded = if path.is_dir() {
        CommandRegistry::from_dir(path)
    } else {
        CommandRegistry::from_file(path)
    };
    loaded.map_err(|err| format!("'{}': {err}", path.display()))
}

fn build_parser(args: &RegistryArgs) -> Result<CommandParser, String> {
    let registry = load_registry(&args.registry)?;
    let mut config = registry.config().clone();
    if let Some(ref prefix) = args.prefix {
        config.command_prefix = prefix.clone();
    }
    if args.permissive {
        config.error_mode = ErrorMode::Permissive;
    }
    Ok(registry.with_config(config).into_parser())
}

fn read_input(path: Option<&Path>) -> Result<String, String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .map_err(|err| format!("Failed to read '{}': {err}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .map_err(|err| format!("Failed to read stdin: {err}"))?;
            Ok(input)
        }
    }
}
