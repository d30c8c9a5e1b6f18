mod bootstrap;
mod doctor_cmd;
mod status_cmd;
mod terminal_output;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use stockaudit_config::{AuditorConfig, ValidationReport};
use stockaudit_core::AuditorError;
use stockaudit_gateway::GatewayState;
use stockaudit_logging::{init_logger, LogSettings};

use terminal_output::{note_error, render_inventory, render_report, stock_badge};

#[derive(Parser)]
#[command(name = "stockaudit")]
#[command(about = "stockaudit: identify an item from a photo and check its stock")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $STOCKAUDIT_CONFIG or ~/.stockaudit/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the upload page and JSON API
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Audit one image file and print the report
    Audit {
        /// JPEG or PNG image
        path: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Look up an item's stock
    Lookup {
        #[arg(required_unless_present = "all")]
        item: Option<String>,
        /// Print the whole inventory table
        #[arg(long, conflicts_with = "item")]
        all: bool,
    },
    /// Check whether a gateway is running
    Status {
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Validate config, credentials, and inventory
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .unwrap_or_else(stockaudit_config::default_config_path);

    let ok = match cli.command {
        Commands::Serve { port } => {
            let mut config = prepare(&config_path, true).await?;
            if let Some(port) = port {
                config.server.port = port;
            }
            run_server(config).await?;
            true
        }
        Commands::Audit { path, json } => {
            let config = prepare(&config_path, true).await?;
            run_audit(&config, &path, json).await?
        }
        Commands::Lookup { item, all } => {
            let config = prepare(&config_path, false).await?;
            run_lookup(&config, item.as_deref(), all).await?;
            true
        }
        Commands::Status { port } => {
            let config = prepare(&config_path, false).await?;
            status_cmd::run(port.unwrap_or(config.server.port)).await?
        }
        Commands::Doctor => {
            init_logger(&LogSettings::default());
            doctor_cmd::run(&config_path).await?
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

/// Load config and start logging. With `strict`, validation errors are fatal.
async fn prepare(path: &Path, strict: bool) -> Result<AuditorConfig> {
    let (config, report) = stockaudit_config::load_and_prepare(path).await?;

    init_logger(&LogSettings {
        level: config.logging.level.clone(),
        json: config.logging.json,
        dir: config.logging.dir.clone(),
    });
    log_report(&report);

    if strict {
        bootstrap::ensure_valid(&report)?;
    }
    Ok(config)
}

fn log_report(report: &ValidationReport) {
    for warning in &report.warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }
    for error in &report.errors {
        warn!(path = %error.path, "{}", error.message);
    }
}

async fn run_server(config: AuditorConfig) -> Result<()> {
    info!(
        addr = %config.server.addr(),
        provider = %config.provider.kind,
        "Starting stockaudit gateway"
    );

    let auditor = bootstrap::build_auditor(&config).await?;
    let state = GatewayState::new(auditor, config.server.max_upload_bytes);

    let addr = tokio::net::lookup_host(config.server.addr())
        .await
        .with_context(|| format!("Invalid bind address {}", config.server.addr()))?
        .next()
        .with_context(|| format!("Bind address {} did not resolve", config.server.addr()))?;

    stockaudit_gateway::start_server(addr, state).await
}

/// Returns false when the image or the model's reply could not be used.
async fn run_audit(config: &AuditorConfig, path: &Path, json: bool) -> Result<bool> {
    let auditor = bootstrap::build_auditor(config).await?;
    let result = match bootstrap::load_image(path).await {
        Ok(upload) => auditor.audit(&upload.data, upload.mime_type).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(report) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_report(&report));
            }
            Ok(true)
        }
        Err(AuditorError::Extraction(e)) => {
            if json {
                let body = serde_json::json!({
                    "error": e.kind(),
                    "message": e.to_string(),
                    "raw": e.raw(),
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                note_error(&e.to_string());
                eprintln!("{}", e.raw());
            }
            Ok(false)
        }
        Err(e @ AuditorError::Media(_)) => {
            if json {
                let body = serde_json::json!({
                    "error": "UploadRejected",
                    "message": e.to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                note_error(&e.to_string());
            }
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

async fn run_lookup(config: &AuditorConfig, item: Option<&str>, all: bool) -> Result<()> {
    let inventory = bootstrap::build_inventory(config).await?;

    match item {
        Some(item) if !all => {
            let record = inventory.lookup(item);
            println!("{item}: {} ({})", stock_badge(&record), record.count);
        }
        _ => print!("{}", render_inventory(&inventory.entries())),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn lookup_needs_item_or_all() {
        assert!(Cli::try_parse_from(["stockaudit", "lookup"]).is_err());
        assert!(Cli::try_parse_from(["stockaudit", "lookup", "laptop", "--all"]).is_err());
        assert!(Cli::try_parse_from(["stockaudit", "lookup", "--all"]).is_ok());
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["stockaudit", "audit", "shelf.png", "--json", "-c", "a.yaml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("a.yaml")));
        assert!(matches!(cli.command, Commands::Audit { json: true, .. }));
    }
}
