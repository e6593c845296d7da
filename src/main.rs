//! Export Guardian CLI - Command-line interface for export convention checks
//!
//! CDD Principle: Application Layer - CLI coordinates user interactions with domain services
//! - Translates user commands to domain operations
//! - Handles external concerns like file I/O, process exit codes, and terminal output
//! - Provides clean separation between user interface and business logic

use clap::{Parser, Subcommand, ValueEnum};
use export_guardian::config::DEFAULT_CONFIG_FILES;
use export_guardian::{
    AnalysisOptions, GuardianConfig, GuardianError, GuardianResult, GuardianValidator,
    OutputFormat, ReportOptions, Severity, ValidationOptions,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

/// Export Guardian - one export per file, named after the file
#[derive(Parser)]
#[command(name = "export-guardian")]
#[command(version)]
#[command(about = "Enforce one export per module and export names that match file names")]
#[command(
    long_about = "Export Guardian checks ESTree syntax trees (*.ast.json documents) of JavaScript and TypeScript modules. Each module may have a single named export and a single type export, and named exports must be the camelCase or PascalCase form of the file name."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check AST documents for export violations
    Check {
        /// Paths to analyze (documents or directories)
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormatArg,

        /// Minimum severity level to report
        #[arg(short, long, value_enum)]
        severity: Option<SeverityArg>,

        /// Maximum number of violations to report
        #[arg(long)]
        max_violations: Option<usize>,

        /// Additional exclude patterns
        #[arg(long, action = clap::ArgAction::Append)]
        exclude: Vec<String>,

        /// Ignore .exportguardianignore files
        #[arg(long)]
        no_ignore: bool,

        /// Disable parallel processing
        #[arg(long)]
        no_parallel: bool,

        /// Fail on first unreadable document
        #[arg(long)]
        fail_fast: bool,

        /// Check a single document as if it were this source file
        #[arg(long, value_name = "PATH")]
        filename: Option<PathBuf>,
    },

    /// Validate configuration file
    ValidateConfig {
        /// Configuration file to validate
        config_file: Option<PathBuf>,
    },

    /// Explain what a specific rule does
    Explain {
        /// Rule ID to explain
        rule_id: String,
    },

    /// List available rules
    Rules {
        /// Show only enabled rules
        #[arg(long)]
        enabled_only: bool,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq)]
enum OutputFormatArg {
    Human,
    Json,
    Sarif,
    Github,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Sarif => OutputFormat::Sarif,
            OutputFormatArg::Github => OutputFormat::GitHub,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SeverityArg {
    Info,
    Warning,
    Error,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Info => Severity::Info,
            SeverityArg::Warning => Severity::Warning,
            SeverityArg::Error => Severity::Error,
        }
    }
}

/// Arguments of the `check` subcommand
#[derive(Debug, Clone)]
struct CheckArgs {
    paths: Vec<PathBuf>,
    format: OutputFormatArg,
    severity: Option<SeverityArg>,
    max_violations: Option<usize>,
    exclude: Vec<String>,
    no_ignore: bool,
    no_parallel: bool,
    fail_fast: bool,
    filename: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    configure_colors(cli.no_color);

    match run_command(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(feature = "colors")]
fn configure_colors(no_color: bool) {
    if no_color {
        colored::control::set_override(false);
    }
}

#[cfg(not(feature = "colors"))]
fn configure_colors(_no_color: bool) {}

fn run_command(cli: Cli) -> GuardianResult<i32> {
    match cli.command {
        Commands::Check {
            paths,
            format,
            severity,
            max_violations,
            exclude,
            no_ignore,
            no_parallel,
            fail_fast,
            filename,
        } => {
            let args = CheckArgs {
                paths,
                format,
                severity,
                max_violations,
                exclude,
                no_ignore,
                no_parallel,
                fail_fast,
                filename,
            };
            run_check(cli.config.as_deref(), args, !cli.no_color)
        }
        Commands::ValidateConfig { config_file } => {
            run_validate_config(config_file.or(cli.config))
        }
        Commands::Explain { rule_id } => run_explain(cli.config.as_deref(), &rule_id),
        Commands::Rules { enabled_only } => run_list_rules(cli.config.as_deref(), enabled_only),
    }
}

/// Explicit config file, or discovery in the working directory
fn load_config(config_path: Option<&Path>) -> GuardianResult<GuardianConfig> {
    match config_path {
        Some(path) => GuardianConfig::load_from_file(path),
        None => GuardianConfig::discover("."),
    }
}

fn run_check(config_path: Option<&Path>, args: CheckArgs, use_colors: bool) -> GuardianResult<i32> {
    let config = load_config(config_path)?;

    let validator = GuardianValidator::new_with_config(config)?;

    let paths = if args.paths.is_empty() { vec![PathBuf::from(".")] } else { args.paths };

    let options = ValidationOptions {
        output_format: args.format.into(),
        report_options: ReportOptions {
            use_colors,
            max_violations: args.max_violations,
            min_severity: args.severity.map(Severity::from),
            ..Default::default()
        },
        analysis_options: AnalysisOptions {
            parallel: !args.no_parallel,
            fail_fast: args.fail_fast,
            exclude_patterns: args.exclude,
            ignore_ignore_files: args.no_ignore,
            module_path: args.filename,
            ..Default::default()
        },
    };

    let report = validator.validate_with_options(paths, &options)?;
    let formatted = validator.format_with_options(&report, &options)?;
    print!("{formatted}");
    if !formatted.ends_with('\n') {
        println!();
    }

    if report.has_errors() {
        Ok(1)
    } else {
        Ok(0)
    }
}

fn run_validate_config(config_path: Option<PathBuf>) -> GuardianResult<i32> {
    let config_path = match config_path {
        Some(path) => path,
        None => DEFAULT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| {
                GuardianError::config(format!(
                    "No configuration file found (looked for {})",
                    DEFAULT_CONFIG_FILES.join(", ")
                ))
            })?,
    };

    println!("Validating configuration: {}", config_path.display());

    match GuardianConfig::load_from_file(&config_path) {
        Ok(config) => {
            println!("✅ Configuration is valid");

            let summaries = config.rule_summaries();
            let enabled = summaries.iter().filter(|rule| rule.enabled).count();

            println!("📊 Configuration summary:");
            println!("  Rules: {} total, {} enabled", summaries.len(), enabled);
            println!("  Path patterns: {}", config.paths.patterns.len());
            match config.paths.ignore_file.as_deref() {
                Some(name) if !name.is_empty() => println!("  Ignore file: {name}"),
                _ => println!("  Ignore file: disabled"),
            }
            println!("  Fingerprint: {}", config.fingerprint());

            Ok(0)
        }
        Err(e) => {
            eprintln!("❌ Configuration validation failed: {e}");
            Ok(1)
        }
    }
}

fn rule_details(rule_id: &str) -> Option<&'static str> {
    match rule_id {
        "export_limit" => Some(
            "Every named export after the first is reported, with the total number of named\n   \
             exports and the position of the first one. Type aliases, interfaces and\n   \
             type-only specifiers are budgeted separately unless allowTypeExports is false.\n   \
             Default exports and `export * from` declarations are never counted.",
        ),
        "filename_match" => Some(
            "Each named value export must equal the camelCase or PascalCase form of the file\n   \
             name without its extension (user-service.ts -> userService or UserService).\n   \
             Lower-case names expect camelCase, capitalised names expect PascalCase.\n   \
             Index files are skipped unless ignoreIndexFiles is false; re-exports are\n   \
             skipped unless checkReExports is true.",
        ),
        _ => None,
    }
}

fn run_explain(config_path: Option<&Path>, rule_id: &str) -> GuardianResult<i32> {
    let config = load_config(config_path)?;
    let summaries = config.rule_summaries();

    if let Some(rule) = summaries.iter().find(|rule| rule.id == rule_id) {
        println!("📖 Rule: {}", rule.id);
        println!("⚠️ Severity: {}", rule.severity.as_str());
        println!("✅ Enabled: {}", rule.enabled);
        println!("⚙️ Options: {}", rule.options);
        println!();
        println!("📝 Description:");
        println!("   {}", rule.description);
        if let Some(details) = rule_details(rule.id) {
            println!();
            println!("   {details}");
        }
        return Ok(0);
    }

    eprintln!("❌ Rule '{rule_id}' not found");
    println!();
    println!("Available rules:");
    for rule in &summaries {
        println!("  - {}", rule.id);
    }

    Ok(1)
}

fn run_list_rules(config_path: Option<&Path>, enabled_only: bool) -> GuardianResult<i32> {
    let config = load_config(config_path)?;

    println!("📋 Available Rules\n");

    for rule in config.rule_summaries() {
        if enabled_only && !rule.enabled {
            continue;
        }

        let status = if rule.enabled { "✅" } else { "❌" };
        println!("{status}🔍 {} [{}] - {}", rule.id, rule.severity.as_str(), rule.description);
        println!("     options: {}", rule.options);
    }

    Ok(0)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
