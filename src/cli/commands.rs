use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config;
use crate::rules::{self, LineOutcome, KNOWN_VARIABLES};
use crate::scan::Scanner;
use crate::{analytics, changelog, export, watch};

use super::exit_codes;
use super::output::{
    self, AnalyzeData, ExportData, OutputMode, RulesData, ScanData, WatchData,
};

#[derive(Parser)]
#[command(name = "acto")]
#[command(about = "Rule-driven file tagging and classification for directory trees")]
#[command(version)]
pub struct Cli {
    /// Path to config file (overrides ACTO_CONFIG env var and default location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (auto-enabled when stdout is piped)
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Force text output even when stdout is piped
    #[arg(long, global = true, conflicts_with = "json")]
    pub no_json: bool,

    /// Suppress all output on success (errors still go to stderr)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a directory tree and tag every file by the loaded rules
    Scan {
        /// Rules file (defaults to the configured rules_file)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Directory to scan (defaults to the configured target_dir)
        #[arg(short, long)]
        target: Option<PathBuf>,

        /// Report destination (defaults to the configured report_path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print every file with its tags
        #[arg(short, long)]
        verbose: bool,
    },

    /// Monitor a directory and append changes to the change log
    Watch {
        /// Directory to monitor (defaults to the configured target_dir)
        #[arg(short, long)]
        target: Option<PathBuf>,

        /// Change log destination (defaults to the configured change_log)
        #[arg(short, long)]
        log: Option<PathBuf>,

        /// Poll interval in milliseconds (defaults to the configured value)
        #[arg(short, long)]
        interval: Option<u64>,

        /// Run a single poll cycle and exit
        #[arg(long)]
        once: bool,
    },

    /// Aggregate the change log into dashboard statistics
    Analyze {
        /// Change log to read (defaults to the configured change_log)
        #[arg(short, long)]
        log: Option<PathBuf>,

        /// Dashboard destination (defaults to the configured dashboard_path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export validated change-log records to CSV and XML
    Export {
        /// Change log to read (defaults to the configured change_log)
        #[arg(short, long)]
        log: Option<PathBuf>,

        /// Export directory (defaults to the configured export_dir)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Which formats to write
        #[arg(short, long, value_enum, default_value = "all")]
        format: ExportFormat,
    },

    /// Inspect a rules file
    Rules {
        #[command(subcommand)]
        command: RulesCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum RulesCommands {
    /// Report the load outcome of every line in a rules file
    Verify {
        /// Rules file (defaults to the configured rules_file)
        file: Option<PathBuf>,
    },

    /// List the rules that load from a rules file
    List {
        /// Rules file (defaults to the configured rules_file)
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Set a configuration value
    Set { key: String, value: String },

    /// Check a config file for errors
    Verify {
        /// Config file to check (defaults to the active config)
        file: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Xml,
    All,
}

impl ExportFormat {
    fn wants_csv(self) -> bool {
        matches!(self, ExportFormat::Csv | ExportFormat::All)
    }

    fn wants_xml(self) -> bool {
        matches!(self, ExportFormat::Xml | ExportFormat::All)
    }
}

pub fn execute(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    let output_mode = OutputMode::from_flags(cli.json, cli.no_json, cli.quiet);

    match cli.command {
        Commands::Scan {
            rules,
            target,
            output,
            verbose,
        } => {
            let config = config::load_with_override(config_path)?;
            let rules_file = rules.unwrap_or_else(|| config.rules_file.clone());
            let target_dir = target.unwrap_or_else(|| config.target_dir.clone());
            let report_path = output.unwrap_or_else(|| config.report_path.clone());

            run_scan(&rules_file, &target_dir, &report_path, verbose, output_mode)
        }

        Commands::Watch {
            target,
            log,
            interval,
            once,
        } => {
            let config = config::load_with_override(config_path)?;
            let target_dir = target.unwrap_or_else(|| config.target_dir.clone());
            let log_path = log.unwrap_or_else(|| config.change_log.clone());
            let interval =
                Duration::from_millis(interval.unwrap_or(config.watch.poll_interval_ms));

            run_watch(&target_dir, &log_path, interval, once, output_mode)
        }

        Commands::Analyze { log, output } => {
            let config = config::load_with_override(config_path)?;
            let log_path = log.unwrap_or_else(|| config.change_log.clone());
            let dashboard_path = output.unwrap_or_else(|| config.dashboard_path.clone());

            run_analyze(&log_path, &dashboard_path, output_mode)
        }

        Commands::Export {
            log,
            out_dir,
            format,
        } => {
            let config = config::load_with_override(config_path)?;
            let log_path = log.unwrap_or_else(|| config.change_log.clone());
            let export_dir = out_dir.unwrap_or_else(|| config.export_dir.clone());

            run_export(&log_path, &export_dir, format, output_mode)
        }

        Commands::Rules { command } => {
            let config = config::load_with_override(config_path)?;
            match command {
                RulesCommands::Verify { file } => {
                    let path = file.unwrap_or_else(|| config.rules_file.clone());
                    run_rules_verify(&path, output_mode)
                }
                RulesCommands::List { file } => {
                    let path = file.unwrap_or_else(|| config.rules_file.clone());
                    run_rules_list(&path, output_mode)
                }
            }
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let config = config::load_with_override(config_path)?;
                println!("{}", serde_json::to_string_pretty(&config)?);
                Ok(())
            }
            ConfigCommands::Path => {
                println!("{}", config::get_config_path().display());
                Ok(())
            }
            ConfigCommands::Set { key, value } => {
                let mut config = config::load_with_override(config_path)?;
                if let Err(e) = config::set_value(&mut config, &key, &value) {
                    eprintln!("Error: {}", e);
                    std::process::exit(exit_codes::INVALID_ARGS);
                }
                config::save(&config)?;
                if !output_mode.is_quiet() {
                    eprintln!("{} = {}", key, value);
                }
                Ok(())
            }
            ConfigCommands::Verify { file } => {
                let path = file
                    .or_else(|| config_path.map(Path::to_path_buf))
                    .unwrap_or_else(config::get_config_path);

                match config::verify(&path) {
                    Ok(errors) if errors.is_empty() => {
                        if !output_mode.is_quiet() {
                            println!("config ok: {}", path.display());
                        }
                        Ok(())
                    }
                    Ok(errors) => {
                        for error in &errors {
                            eprintln!("error: {}", error);
                        }
                        std::process::exit(exit_codes::CONFIG_ERROR);
                    }
                    Err(e) => {
                        eprintln!("Error: {:#}", e);
                        std::process::exit(exit_codes::CONFIG_ERROR);
                    }
                }
            }
        },
    }
}

fn run_scan(
    rules_file: &Path,
    target_dir: &Path,
    report_path: &Path,
    verbose: bool,
    output_mode: OutputMode,
) -> Result<()> {
    let rule_set = rules::load_rules(rules_file)?;

    let mut scanner = Scanner::new(&rule_set);
    scanner.run(target_dir)?;
    let files = scanner.files_seen();
    let skipped = scanner.files_skipped();
    let report = scanner.into_report();

    if verbose {
        for (name, record) in &report {
            let tags: Vec<&str> = record.tags.iter().map(String::as_str).collect();
            eprintln!("  -> {}: [{}]", name, tags.join(", "));
        }
    }

    let tagged = report.iter().filter(|(_, r)| !r.tags.is_empty()).count();

    // a failed write must not leave a partial report; save is atomic and
    // failure is fatal for this invocation
    if let Err(e) = report.save(report_path) {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_codes::OUTPUT_ERROR);
    }

    match output_mode {
        OutputMode::Json => output::print_json(&ScanData {
            action: "scan",
            files,
            tagged,
            skipped,
            report: report_path.to_path_buf(),
        }),
        OutputMode::Text => {
            println!(
                "scanned {} files ({} tagged, {} skipped), report saved to {}",
                files,
                tagged,
                skipped,
                report_path.display()
            );
        }
        OutputMode::Quiet => {}
    }

    Ok(())
}

fn run_watch(
    target_dir: &Path,
    log_path: &Path,
    interval: Duration,
    once: bool,
    output_mode: OutputMode,
) -> Result<()> {
    if once {
        let mut watcher = watch::Watcher::new(target_dir, log_path)?;
        let changes = watcher.poll_once()?;

        match output_mode {
            OutputMode::Json => output::print_json(&WatchData {
                action: "watch",
                changes: changes.len(),
                log: log_path.to_path_buf(),
            }),
            OutputMode::Text => {
                println!("{} changes logged to {}", changes.len(), log_path.display());
            }
            OutputMode::Quiet => {}
        }
        return Ok(());
    }

    watch::watch(target_dir, log_path, interval)
}

fn run_analyze(log_path: &Path, dashboard_path: &Path, output_mode: OutputMode) -> Result<()> {
    let (entries, stats) = changelog::read_entries(log_path)?;
    if stats.invalid > 0 {
        eprintln!("warning: {} invalid change log lines ignored", stats.invalid);
    }

    let dashboard = analytics::build_dashboard(&entries);

    if let Err(e) = analytics::save_dashboard(&dashboard, dashboard_path) {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_codes::OUTPUT_ERROR);
    }

    match output_mode {
        OutputMode::Json => output::print_json(&AnalyzeData {
            action: "analyze",
            entries: stats.valid,
            invalid: stats.invalid,
            output: dashboard_path.to_path_buf(),
        }),
        OutputMode::Text => {
            println!(
                "dashboard stats from {} entries saved to {}",
                stats.valid,
                dashboard_path.display()
            );
        }
        OutputMode::Quiet => {}
    }

    Ok(())
}

fn run_export(
    log_path: &Path,
    export_dir: &Path,
    format: ExportFormat,
    output_mode: OutputMode,
) -> Result<()> {
    let (entries, stats) = changelog::read_entries(log_path)?;
    eprintln!(
        "loaded {} valid entries, {} invalid ignored",
        stats.valid, stats.invalid
    );

    if entries.is_empty() {
        if !output_mode.is_quiet() {
            println!("no data to process");
        }
        return Ok(());
    }

    let mut csv_path = None;
    let mut xml_path = None;

    if format.wants_csv() {
        let path = export_dir.join("data_export.csv");
        if let Err(e) = export::export_csv(&entries, &path) {
            eprintln!("Error: {:#}", e);
            std::process::exit(exit_codes::OUTPUT_ERROR);
        }
        csv_path = Some(path);
    }

    if format.wants_xml() {
        let path = export_dir.join("data_export.xml");
        if let Err(e) = export::export_xml(&entries, &path) {
            eprintln!("Error: {:#}", e);
            std::process::exit(exit_codes::OUTPUT_ERROR);
        }
        xml_path = Some(path);
    }

    match output_mode {
        OutputMode::Json => output::print_json(&ExportData {
            action: "export",
            entries: stats.valid,
            invalid: stats.invalid,
            csv: csv_path,
            xml: xml_path,
        }),
        OutputMode::Text => {
            if let Some(path) = &csv_path {
                println!("CSV exported to {}", path.display());
            }
            if let Some(path) = &xml_path {
                println!("XML exported to {}", path.display());
            }
        }
        OutputMode::Quiet => {}
    }

    Ok(())
}

fn run_rules_verify(path: &Path, output_mode: OutputMode) -> Result<()> {
    if !path.exists() {
        eprintln!("Error: rules file not found: {}", path.display());
        std::process::exit(exit_codes::CONFIG_ERROR);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read rules file: {}", path.display()))?;

    let mut loaded = 0;
    let mut malformed = 0;
    let mut warnings = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_number = idx + 1;
        match rules::parse_line(line) {
            LineOutcome::Loaded(rule) => {
                loaded += 1;
                if output_mode == OutputMode::Text {
                    println!("line {}: loaded: {}", line_number, rule);
                }
                if !rule.has_known_variable() {
                    warnings.push(unknown_variable_warning(line_number, &rule.variable));
                }
                if rule.variable == "size" {
                    if let Err(e) = rules::parse_size(&rule.value) {
                        warnings.push(format!(
                            "line {}: {} - rule '{}' will never match",
                            line_number, e, rule.tag
                        ));
                    }
                }
            }
            LineOutcome::Comment => {}
            LineOutcome::Malformed => {
                malformed += 1;
                warnings.push(format!(
                    "line {}: malformed rule line: {}",
                    line_number,
                    line.trim()
                ));
            }
        }
    }

    match output_mode {
        OutputMode::Json => output::print_json(&RulesData {
            action: "verify",
            loaded,
            malformed,
            warnings: warnings.clone(),
        }),
        OutputMode::Text => {
            for warning in &warnings {
                println!("warning: {}", warning);
            }
            println!("{} rules loaded, {} malformed lines", loaded, malformed);
        }
        OutputMode::Quiet => {}
    }

    if malformed > 0 || !warnings.is_empty() {
        std::process::exit(exit_codes::CONFIG_ERROR);
    }

    Ok(())
}

fn run_rules_list(path: &Path, output_mode: OutputMode) -> Result<()> {
    let rule_set = rules::load_rules(path)?;

    match output_mode {
        OutputMode::Json => {
            let listed: Vec<String> = rule_set.iter().map(|r| r.to_string()).collect();
            output::print_json(&listed);
        }
        OutputMode::Text => {
            for rule in &rule_set {
                println!("{}", rule);
            }
        }
        OutputMode::Quiet => {}
    }

    Ok(())
}

/// suggest the closest known variable for a near-miss name
fn unknown_variable_warning(line_number: usize, variable: &str) -> String {
    let suggestion = KNOWN_VARIABLES
        .iter()
        .map(|known| (known, strsim::levenshtein(variable, known)))
        .filter(|(_, distance)| *distance <= 2)
        .min_by_key(|(_, distance)| *distance)
        .map(|(known, _)| format!(" (did you mean '{}'?)", known));

    format!(
        "line {}: unknown variable '{}' never matches{}",
        line_number,
        variable,
        suggestion.unwrap_or_default()
    )
}
