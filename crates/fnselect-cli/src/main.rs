//! fnselect - region/stage function selection for deploys
//!
//! Usage:
//!   fnselect deploy --region us-east-1 --stage prod   # Filter all functions
//!   fnselect deploy -f api --stage prod               # Filter one function
//!   fnselect check api --region eu-west-1             # Dry evaluation
//!   fnselect list                                     # Show declared restrictions

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fnselect_core::config::ServiceStore;
use fnselect_core::hooks::{HookOutcome, RunOptions, SelectPlugin};
use fnselect_core::registry::{UnitDescriptor, UnitRegistry};
use fnselect_core::selection::{SelectionError, SelectionReport, evaluate_unit};

#[derive(Parser)]
#[command(name = "fnselect")]
#[command(about = "Select which functions are deployed to a region and stage", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove functions not selected for the requested region/stage
    Deploy(DeployArgs),

    /// Evaluate a single function without changing anything
    Check {
        /// Function name
        name: String,

        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        service: ServiceArgs,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        format: OutputFormat,
    },

    /// List functions and their declared regions/stages
    List {
        #[command(flatten)]
        service: ServiceArgs,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
    /// Print nothing on success
    Quiet,
}

#[derive(Args)]
struct TargetArgs {
    /// Region of this deploy run (region check is skipped when omitted)
    #[arg(long, short)]
    region: Option<String>,

    /// Stage of this deploy run (stage check is skipped when omitted)
    #[arg(long, short)]
    stage: Option<String>,
}

#[derive(Args)]
struct ServiceArgs {
    /// Service file (defaults to service.toml or service.json in the current directory)
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct DeployArgs {
    /// Deploy only this function; an ineligible function fails the run
    #[arg(long, short = 'f', value_name = "NAME")]
    function: Option<String>,

    #[command(flatten)]
    target: TargetArgs,

    /// Skip function selection entirely
    #[arg(long)]
    no_deploy: bool,

    #[command(flatten)]
    service: ServiceArgs,

    /// Write the filtered service file here
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, default_value = "table")]
    format: OutputFormat,
}

fn main() -> Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fnselect=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Deploy(args) => run_deploy(args),
        Commands::Check {
            name,
            target,
            service,
            format,
        } => run_check(&name, target, service, format),
        Commands::List { service, format } => run_list(service, format),
    };

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => match err.downcast_ref::<SelectionError>() {
            Some(selection) => {
                eprintln!("{}", selection.operator_message());
                Ok(ExitCode::FAILURE)
            }
            None => Err(err),
        },
    }
}

fn open_store(args: &ServiceArgs) -> Result<ServiceStore> {
    match &args.config {
        Some(path) => Ok(ServiceStore::from_path(path)),
        None => ServiceStore::discover(&std::env::current_dir()?),
    }
}

fn run_deploy(args: DeployArgs) -> Result<()> {
    let store = open_store(&args.service)?;
    let mut config = store.load()?;
    let mut registry = config.to_registry();

    let plugin = SelectPlugin::new(RunOptions {
        region: args.target.region.clone(),
        stage: args.target.stage.clone(),
        function: args.function.clone(),
        no_deploy: args.no_deploy,
    });

    let outcome = plugin.run_hook(plugin.hook_for_run(), &mut registry);

    // The failed function is already pruned; persist that before failing.
    config.retain_registry(&registry);
    if let Some(path) = &args.output {
        ServiceStore::from_path(path).save(&config)?;
    }

    match outcome? {
        HookOutcome::Skipped => print_skipped(args.format),
        HookOutcome::Applied(report) => {
            print_report(&report, args.format)?;
            if let (Some(path), OutputFormat::Table) = (&args.output, args.format) {
                println!("  Wrote filtered service to {}", path.display());
            }
            Ok(())
        }
    }
}

fn run_check(
    name: &str,
    target: TargetArgs,
    service: ServiceArgs,
    format: OutputFormat,
) -> Result<()> {
    let store = open_store(&service)?;
    let registry = store.load()?.to_registry();

    let unit = registry
        .get_unit(name)
        .ok_or_else(|| SelectionError::UnknownUnit {
            unit: name.to_string(),
        })?;
    let decision = evaluate_unit(
        unit,
        target.region.as_deref(),
        target.stage.as_deref(),
        false,
    );

    match format {
        OutputFormat::Table => match decision.message(name) {
            None => println!("{} {} is selected for deployment", style("✓").green(), name),
            Some(message) => println!("{} {}", style("✗").red(), message),
        },
        OutputFormat::Json => {
            let output = serde_json::json!({
                "name": name,
                "included": decision.included,
                "exclusions": decision.exclusions,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Quiet => {}
    }

    Ok(())
}

fn run_list(service: ServiceArgs, format: OutputFormat) -> Result<()> {
    let store = open_store(&service)?;
    let registry = store.load()?.to_registry();

    match format {
        OutputFormat::Table => print_units_table(store.path(), registry.iter()),
        OutputFormat::Json => {
            let output: Vec<_> = registry
                .iter()
                .map(|unit| {
                    serde_json::json!({
                        "name": unit.name,
                        "regions": unit.regions,
                        "stages": unit.stages,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Quiet => {}
    }

    Ok(())
}

fn print_skipped(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("• Function selection skipped"),
        OutputFormat::Json => {
            let output = serde_json::json!({ "skipped": true });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}

fn print_report(report: &SelectionReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            for name in &report.kept {
                println!("{} {}", style("✓").green(), name);
            }
            for removed in &report.removed {
                println!(
                    "{} {} {}",
                    style("✗").red(),
                    removed.name,
                    style(format!(
                        "(not selected for {} {})",
                        removed.requested, removed.dimension
                    ))
                    .dim()
                );
            }
            println!(
                "  {} selected, {} removed",
                report.kept.len(),
                report.removed.len()
            );
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "skipped": false,
                "kept": report.kept,
                "removed": report.removed,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}

fn print_units_table<'a>(source: &Path, units: impl Iterator<Item = &'a UnitDescriptor>) {
    println!("{}", style(source.display()).bold());

    let mut count = 0;
    for unit in units {
        count += 1;
        println!(
            "  {:<24} regions: {:<28} stages: {}",
            unit.name,
            describe(unit.restricted_regions()),
            describe(unit.restricted_stages())
        );
    }

    if count == 0 {
        println!("  (no functions defined)");
    }
}

fn describe(values: Option<&[String]>) -> String {
    match values {
        Some(values) => values.join(", "),
        None => "any".to_string(),
    }
}
