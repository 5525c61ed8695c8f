use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use projinit_check::Checker;
use projinit_core::{Error, ProjectType};
use projinit_standards::{
    build_catalog, load_config, write_example_config, BuiltinCatalog, ConfigSource, DefaultConfigSource,
    ExplicitConfigSource, StandardsLoader, LOCAL_CONFIG_FILE,
};
use projinit_update::{plan, template_vars, ApplyTally, FsTemplates, Updater};

mod output;

#[derive(Parser)]
#[command(name = "projinit", version, about = "Audit a project against its standards and repair what can be repaired")]
struct Cli {
    /// Global config file to use instead of ~/.config/projinit/config.yaml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging (when RUST_LOG is unset) and passing checks in text output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Detect the project type of a directory
    Detect {
        path: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Audit a project against its standards
    Check {
        path: Option<PathBuf>,
        /// Skip detection and use this type
        #[arg(long = "type")]
        project_type: Option<ProjectType>,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Plan and apply fixes for failed checks
    Update {
        path: Option<PathBuf>,
        #[arg(long = "type")]
        project_type: Option<ProjectType>,
        /// Report what would change without touching files
        #[arg(long)]
        dry_run: bool,
        /// Do not copy files before merging into them
        #[arg(long)]
        no_backup: bool,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Inspect or create the user configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Print the config file locations
    Path,
    /// Write an example configuration file
    Init {
        /// Write .projinit.yaml in the current directory instead of the global file
        #[arg(long)]
        local: bool,
        #[arg(long)]
        force: bool,
    },
}

const EXIT_OK: u8 = 0;
const EXIT_FAILURE: u8 = 1;
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    let verbose = cli.verbose;
    let global = cli.config;
    match cli.cmd {
        Command::Detect { path, format } => cmd_detect(path, format),
        Command::Check { path, project_type, format } => cmd_check(global, path, project_type, format, verbose),
        Command::Update { path, project_type, dry_run, no_backup, format } => {
            cmd_update(global, path, project_type, dry_run, no_backup, format)
        }
        Command::Config { cmd } => cmd_config(global, cmd),
    }
}

fn project_root(path: Option<PathBuf>) -> Result<PathBuf> {
    let path = path.unwrap_or_else(|| PathBuf::from("."));
    if !path.is_dir() {
        return Err(Error::InvalidPath(path).into());
    }
    Ok(path.canonicalize().unwrap_or(path))
}

fn config_source(global: Option<PathBuf>, root: &Path) -> Box<dyn ConfigSource> {
    match global {
        Some(g) => Box::new(ExplicitConfigSource { global: Some(g), local: Some(root.join(LOCAL_CONFIG_FILE)) }),
        None => Box::new(DefaultConfigSource),
    }
}

fn project_type(root: &Path, explicit: Option<ProjectType>) -> Result<ProjectType> {
    if let Some(pt) = explicit {
        return Ok(pt);
    }
    let detected = projinit_detect::detect(root);
    tracing::info!(project_type = %detected.project_type, confidence = detected.confidence, "detected");
    if detected.project_type == ProjectType::Unknown {
        return Err(Error::UndetectedType(root.to_path_buf()).into());
    }
    Ok(detected.project_type)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_detect(path: Option<PathBuf>, format: Format) -> Result<u8> {
    let root = project_root(path)?;
    let result = projinit_detect::detect(&root);
    match format {
        Format::Json => print_json(&result)?,
        Format::Text => print!("{}", output::render_detection(&result)),
    }
    Ok(if result.project_type == ProjectType::Unknown { EXIT_ERROR } else { EXIT_OK })
}

fn cmd_check(
    global: Option<PathBuf>,
    path: Option<PathBuf>,
    explicit: Option<ProjectType>,
    format: Format,
    verbose: bool,
) -> Result<u8> {
    let root = project_root(path)?;
    let pt = project_type(&root, explicit)?;
    let source = config_source(global, &root);
    let loader = StandardsLoader::new(&BuiltinCatalog, source.as_ref());
    let catalog = loader.load(pt, Some(&root))?;

    let report = Checker::new(&root, pt).run(&catalog);
    match format {
        Format::Json => print_json(&serde_json::json!({ "report": report, "summary": report.summary() }))?,
        Format::Text => print!("{}", output::render_report(&report, verbose)),
    }
    Ok(if report.is_compliant() { EXIT_OK } else { EXIT_FAILURE })
}

fn cmd_update(
    global: Option<PathBuf>,
    path: Option<PathBuf>,
    explicit: Option<ProjectType>,
    dry_run: bool,
    no_backup: bool,
    format: Format,
) -> Result<u8> {
    let root = project_root(path)?;
    let pt = project_type(&root, explicit)?;
    let source = config_source(global, &root);
    let config = load_config(source.as_ref(), Some(&root))?;
    let catalog = build_catalog(&BuiltinCatalog, pt, &config)?;

    let report = Checker::new(&root, pt).run(&catalog);
    let actions = plan(&report, &catalog, &template_vars(&root, pt, &config));
    if actions.is_empty() {
        let compliant = report.is_compliant();
        match format {
            Format::Json => print_json(&serde_json::json!({ "actions": [], "compliant": compliant }))?,
            Format::Text if compliant => println!("Nothing to update."),
            Format::Text => println!("No automatic fixes available; run `projinit check` for details."),
        }
        return Ok(if compliant { EXIT_OK } else { EXIT_FAILURE });
    }

    let templates = FsTemplates::from_config(&config.templates);
    let updater = Updater { templates: &templates, dry_run, backup: !no_backup };
    let applied = updater.apply(&actions);
    match format {
        Format::Json => print_json(&serde_json::json!({ "actions": actions, "result": applied, "tally": applied.tally() }))?,
        Format::Text => {
            print!("{}", output::render_plan(&actions));
            print!("{}", output::render_apply(&applied));
        }
    }
    Ok(match applied.tally() {
        ApplyTally::AllApplied => EXIT_OK,
        ApplyTally::SomeApplied => EXIT_FAILURE,
        ApplyTally::NoneApplied => EXIT_ERROR,
    })
}

fn cmd_config(global: Option<PathBuf>, cmd: ConfigCommand) -> Result<u8> {
    let cwd = std::env::current_dir()?;
    let source = config_source(global, &cwd);
    match cmd {
        ConfigCommand::Show => {
            let config = load_config(source.as_ref(), Some(&cwd))?;
            println!("# source: {}", config.source);
            print!("{}", serde_yaml::to_string(&config)?);
        }
        ConfigCommand::Path => {
            for (label, path) in [("global", source.global_path()), ("local", source.local_path(&cwd))] {
                match path {
                    Some(p) => {
                        let state = if p.is_file() { "exists" } else { "missing" };
                        println!("{label}: {} ({state})", p.display());
                    }
                    None => println!("{label}: disabled"),
                }
            }
        }
        ConfigCommand::Init { local, force } => {
            let target = if local { source.local_path(&cwd) } else { source.global_path() };
            let target = target.ok_or_else(|| anyhow::anyhow!("no config path available"))?;
            write_example_config(&target, force)?;
            println!("Wrote {}", target.display());
        }
    }
    Ok(EXIT_OK)
}
