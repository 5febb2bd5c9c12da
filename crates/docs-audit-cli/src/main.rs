use anyhow::{Context, Result, bail};
use clap::Parser;
use docs_audit_config::Config;
use docs_audit_engine::{
    AuditOptions, Auditor, Diagnostic, LineIndex, RuleRegistry, RuleSource, diagnostics_for,
    io::load_document,
};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser, Debug)]
#[command(name = "docs-audit")]
#[command(author, version, about = "Audit documentation against content guidance rules", long_about = None)]
struct Cli {
    /// Markdown or YAML document to audit
    file: Option<PathBuf>,

    /// JSON rule file (defaults to the bundled rules)
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Rule set to apply
    #[arg(long)]
    rule_set: Option<String>,

    /// Require `# ` headings and table separator rows
    #[arg(long)]
    strict: bool,

    #[arg(short, long)]
    verbose: bool,

    /// Write the effective settings to the config file and exit
    #[arg(long)]
    init_config: bool,
}

/// Config file values with command-line flags layered on top.
#[derive(Debug, PartialEq, Eq)]
struct Settings {
    rules_path: Option<PathBuf>,
    rule_set: String,
    strict: bool,
    verbose: bool,
}

impl Settings {
    fn merge(config: Config, cli: &Cli) -> Self {
        Self {
            rules_path: cli.rules.clone().or(config.rules_path),
            rule_set: cli.rule_set.clone().unwrap_or(config.rule_set),
            strict: cli.strict || config.strict,
            verbose: cli.verbose || config.verbose,
        }
    }

    fn to_config(&self) -> Config {
        Config {
            rules_path: self.rules_path.clone(),
            rule_set: self.rule_set.clone(),
            strict: self.strict,
            verbose: self.verbose,
        }
    }

    fn audit_options(&self) -> AuditOptions {
        AuditOptions {
            rule_set: self.rule_set.clone(),
            strict: self.strict,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: {e}");
            Config::default()
        }
    };
    let settings = Settings::merge(config, &cli);

    let default_filter = if settings.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if cli.init_config {
        let config_path = Config::config_path();
        match init_config(&settings, &config_path) {
            Ok(()) => log::info!("Wrote {}", config_path.display()),
            Err(e) => {
                eprintln!("Error: {e:#}");
                process::exit(2);
            }
        }
        return;
    }

    let Some(file) = cli.file.as_deref() else {
        log::warn!("No document to audit");
        return;
    };

    match run(file, &settings) {
        Ok(0) => {}
        Ok(_) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(2);
        }
    }
}

/// Saves `settings` as a new config file. An existing file is left alone.
fn init_config(settings: &Settings, config_path: &Path) -> Result<()> {
    if config_path.exists() {
        bail!("{} already exists", config_path.display());
    }
    settings.to_config().save_to_path(config_path)
}

/// Audits `file` and prints the trace and diagnostics. Returns the number of
/// diagnostics.
fn run(file: &Path, settings: &Settings) -> Result<usize> {
    let registry = RuleRegistry::new();
    let source = match settings.rules_path.as_deref() {
        Some(path) => RuleSource::Path(path),
        None => RuleSource::Builtin,
    };
    if let Err(e) = registry.load_rules(source) {
        log::error!("Failed to load rules: {e}");
    }

    let doc = load_document(file).with_context(|| format!("reading {}", file.display()))?;
    let auditor = Auditor::new(&registry, settings.audit_options());

    let mut trace = Vec::new();
    let entries = auditor.verify_with_log(&doc, &mut trace);
    for line in &trace {
        println!("{line}");
    }

    let diagnostics = diagnostics_for(&entries);
    let index = LineIndex::new(&doc.text);
    for diagnostic in &diagnostics {
        println!("{}", render(&doc.file_name, &index, diagnostic));
    }
    Ok(diagnostics.len())
}

/// `file:line:col: warning: message [rule N]`, with one-based positions.
fn render(file_name: &str, index: &LineIndex, diagnostic: &Diagnostic) -> String {
    let start = index.position(diagnostic.range.start);
    let severity = format!("{:?}", diagnostic.severity).to_lowercase();
    format!(
        "{file_name}:{}:{}: {severity}: {} [rule {}]",
        start.line + 1,
        start.column + 1,
        diagnostic.message,
        diagnostic.rule_num
    )
}
