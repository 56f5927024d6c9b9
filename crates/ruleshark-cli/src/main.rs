use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;
use ruleshark_core::{Config, RunOptions, RunSummary, rules};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "RULESHARK_LOG";
const DEFAULT_LOG_DIRECTIVE: &str = "warn";

#[derive(Parser, Debug)]
#[command(name = "ruleshark")]
#[command(version)]
#[command(
    about = "Evaluate per-packet rules over PCAP/PCAPNG captures.",
    long_about = None,
    after_help = "Examples:\n  ruleshark pcap run capture.pcapng --rule ipv4-tcp-or-udp\n  ruleshark pcap run capture.pcap --summary summary.json\n  ruleshark rules"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on PCAP/PCAPNG inputs.
    Pcap {
        #[command(subcommand)]
        command: PcapCommands,
    },
    /// List built-in rules.
    Rules,
}

#[derive(Subcommand, Debug)]
enum PcapCommands {
    /// Evaluate a rule on every packet and print its output to stdout.
    #[command(alias = "eval")]
    #[command(
        after_help = "Examples:\n  ruleshark pcap run capture.pcapng -r ipv4-tcp-or-udp\n  ruleshark pcap eval capture.pcap -c ruleshark.toml --strict"
    )]
    Run {
        /// Path to a .pcap or .pcapng file
        input: PathBuf,

        /// Built-in rule to evaluate (default: json)
        #[arg(short = 'r', long)]
        rule: Option<String>,

        /// TOML configuration file
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// Stop at the first packet the rule fails on
        #[arg(long)]
        strict: bool,

        /// Write a JSON run summary to this path
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Pretty-print the JSON summary
        #[arg(long, requires = "summary")]
        pretty: bool,

        /// Suppress non-error output on stderr
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Pcap { command } => match command {
            PcapCommands::Run {
                input,
                rule,
                config,
                strict,
                summary,
                pretty,
                quiet,
            } => cmd_pcap_run(RunArgs {
                input,
                rule,
                config,
                strict,
                summary,
                pretty,
                quiet,
            }),
        },
        Commands::Rules => cmd_rules(),
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
        CliError::new(format!("{err:#}"), None)
    }
}

#[derive(Debug)]
struct RunArgs {
    input: PathBuf,
    rule: Option<String>,
    config: Option<PathBuf>,
    strict: bool,
    summary: Option<PathBuf>,
    pretty: bool,
    quiet: bool,
}

fn cmd_pcap_run(args: RunArgs) -> Result<(), CliError> {
    let config = match args.config.as_ref() {
        Some(path) => Config::load(path).map_err(|err| {
            CliError::new(
                err.to_string(),
                Some("check the config file; known keys are rule, strict, log".to_string()),
            )
        })?,
        None => Config::default(),
    };
    init_logging(config.log.as_deref(), args.quiet);

    let rule_name = args
        .rule
        .clone()
        .or_else(|| config.rule.clone())
        .unwrap_or_else(|| rules::DEFAULT_RULE.to_string());
    let rule = rules::by_name(&rule_name).ok_or_else(|| {
        CliError::new(
            format!("unknown rule '{}'", rule_name),
            Some(format!("available rules: {}", rule_names().join(", "))),
        )
    })?;
    let options = RunOptions {
        strict: args.strict || config.strict,
    };
    debug!(rule = rule.name(), strict = options.strict, "resolved settings");

    let resolved_input = resolve_input_path(&args.input)?;
    validate_input_file(&resolved_input)?;
    if let Some(summary_path) = args.summary.as_ref() {
        ensure_distinct_output(&resolved_input, summary_path)?;
    }

    let summary = {
        let mut stdout = BufWriter::new(io::stdout().lock());
        ruleshark_core::run_pcap_file(&resolved_input, rule.as_ref(), options, &mut stdout)
            .with_context(|| format!("rule evaluation failed on {}", resolved_input.display()))?
    };

    if let Some(summary_path) = args.summary.as_ref() {
        write_summary(&summary, summary_path, args.pretty)?;
    }

    if !args.quiet {
        eprintln!(
            "OK: {} packets, {} emitted, {} unhandled, {} undecodable, {} rule errors",
            summary.packets_total,
            summary.emitted,
            summary.unhandled,
            summary.decode_errors,
            summary.rule_errors
        );
    }
    Ok(())
}

fn cmd_rules() -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    for rule in rules::builtin() {
        let marker = if rule.name() == rules::DEFAULT_RULE {
            " (default)"
        } else {
            ""
        };
        writeln!(stdout, "{:<16} {}{}", rule.name(), rule.description(), marker)
            .context("failed to write rule list")?;
    }
    Ok(())
}

fn rule_names() -> Vec<&'static str> {
    rules::builtin().iter().map(|rule| rule.name()).collect()
}

/// `RULESHARK_LOG` wins over the config file directive.
fn init_logging(directive: Option<&str>, quiet: bool) {
    let fallback = if quiet {
        "error"
    } else {
        directive.unwrap_or(DEFAULT_LOG_DIRECTIVE)
    };
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}

fn write_summary(summary: &RunSummary, path: &Path, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(summary)
    } else {
        serde_json::to_string(summary)
    }
    .context("JSON serialization failed")?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(path, json)
        .with_context(|| format!("Failed to write summary: {}", path.display()))?;
    Ok(())
}

fn ensure_distinct_output(input: &Path, output: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let parent = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // A missing parent directory cannot contain the input.
    let Ok(parent_abs) = fs::canonicalize(parent) else {
        return Ok(());
    };
    let file_name = output
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid summary path: {}", output.display()))?;
    if parent_abs.join(file_name) == input_abs {
        return Err(CliError::new(
            format!("summary path must differ from input: {}", output.display()),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "pcap" && ext != "pcapng" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .pcap or .pcapng file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
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
            Some("check the path or quote the pattern; expected .pcap or .pcapng".to_string()),
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
