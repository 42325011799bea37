//! CLI for the rebrand tool.

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use rebrand::diff::colorize;
use rebrand::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rebrand")]
#[command(author, version, about = "Rebrand a source tree: rewrite brand strings and rename files", long_about = None)]
struct Cli {
    /// Directory to rebrand [default: the config's root_dir, else "."]
    path: Option<PathBuf>,

    /// Actually write and rename (default is a dry run)
    #[arg(long)]
    apply: bool,

    /// YAML or JSON run configuration; flags below extend or override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Built-in rule table to append (e.g. "ablock")
    #[arg(long)]
    preset: Option<String>,

    /// Content rule as FROM=TO (repeatable, applied in order)
    #[arg(short, long = "rule", value_name = "FROM=TO")]
    rules: Vec<String>,

    /// Filename rule as FROM=TO (repeatable, applied in order)
    #[arg(short, long = "name-rule", value_name = "FROM=TO")]
    name_rules: Vec<String>,

    /// Extra directory name or glob to skip (repeatable)
    #[arg(long = "exclude-dir", value_name = "NAME")]
    exclude_dirs: Vec<String>,

    /// Size ceiling in bytes for content rewriting
    #[arg(long)]
    max_bytes: Option<u64>,

    /// Extra extension whose content is never rewritten (repeatable)
    #[arg(long = "binary-ext", value_name = "EXT")]
    binary_exts: Vec<String>,

    /// Compare protection markers case-insensitively
    #[arg(long)]
    case_insensitive: bool,

    /// Extra regex marking a line as protected (repeatable)
    #[arg(long = "protect", value_name = "REGEX")]
    protect: Vec<String>,

    /// Report files whose content was skipped for size or extension
    #[arg(long)]
    report_skips: bool,

    /// Print a diff for every content change
    #[arg(long)]
    diff: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = build_config(&cli)?;
    if config.content_rules.is_empty() && config.name_rules.is_empty() {
        bail!("no rules given: use --preset, --rule, --name-rule or --config");
    }

    let report = run(&config).context("Rebrand failed")?;

    match cli.format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => print_text(&config, &report, cli.diff),
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "rebrand=debug" } else { "rebrand=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> Result<RunConfig> {
    let mut config = match &cli.config {
        Some(path) => RunConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RunConfig::default(),
    };

    // An explicit path, "." included, wins over the config file's root.
    if let Some(path) = &cli.path {
        config.root_dir = path.clone();
    }
    config.apply |= cli.apply;

    if let Some(name) = &cli.preset {
        config = Preset::from_name(name)?.apply_to(config);
    }
    for pair in &cli.rules {
        config.content_rules.push(Rule::parse_pair(pair)?);
    }
    for pair in &cli.name_rules {
        config.name_rules.push(Rule::parse_pair(pair)?);
    }

    config.excluded_dir_names.extend(cli.exclude_dirs.iter().cloned());
    config.binary_extensions.extend(cli.binary_exts.iter().cloned());
    if let Some(max) = cli.max_bytes {
        config.max_file_bytes = max;
    }

    if cli.case_insensitive {
        config.protection.case_sensitive = false;
    }
    config.protection.patterns.extend(cli.protect.iter().cloned());

    config.report_skips |= cli.report_skips;
    config.capture_diffs |= cli.diff;

    Ok(config)
}

fn print_text(config: &RunConfig, report: &ChangeReport, show_diff: bool) {
    println!("Rebranding {}", config.root_dir.display());
    println!("Mode: {}", report.mode);
    println!();

    for entry in &report.entries {
        println!("{}", entry.render(&report.root));
        if show_diff && let Some(diff) = &entry.diff {
            print!("{}", colorize(diff));
        }
    }

    println!();
    if report.cancelled {
        println!("Cancelled before the walk finished.");
    }
    println!("{}", report.summary());
    if show_diff {
        println!("{}", report.diff_summary());
    }

    if report.mode == Mode::Dry && !report.is_clean() {
        println!();
        println!("To apply these changes, run again with --apply");
    }
}
