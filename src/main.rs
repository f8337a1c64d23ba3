//! Course roster service entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use course_roster::api::{create_router, AppState};
use course_roster::config::Config;
use course_roster::import::parse_pending;
use course_roster::metrics;
use course_roster::storage::{FilePersistence, Persistence};
use course_roster::utils::shutdown_signal;

/// Student enrollment and course popularity service.
#[derive(Parser, Debug)]
#[command(name = "course-roster")]
#[command(about = "Tracks students, enrollments and course popularity over HTTP")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default).
    Serve {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Parse the pending-import file without importing it.
    CheckImport,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config, args.verbose);

    match args.command {
        Some(Command::Serve { port }) => cmd_serve(config, port.or(args.port)).await,
        Some(Command::CheckConfig) => cmd_check_config(&config),
        Some(Command::CheckImport) => cmd_check_import(&config).await,
        None => cmd_serve(config, args.port).await,
    }
}

fn init_logging(config: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("course_roster=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.rust_log))
    };

    tracing_subscriber::registry()
        .with(config.log_json.then(|| fmt::layer().json()))
        .with((!config.log_json).then(fmt::layer))
        .with(filter)
        .init();
}

/// Check configuration validity.
fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("COURSE ROSTER - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Port: {}", config.port);
    println!("  Pending Import: {}", config.pending_import_path.display());
    println!("  Student Log: {}", config.student_log_path.display());
    println!("  Duplicate Ids: {}", config.duplicate_id_policy);
    println!("  Metrics: {}", if config.metrics_enabled { "Enabled" } else { "Disabled" });
    println!("  Log Format: {}", if config.log_json { "JSON" } else { "Text" });
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Parse the pending-import file and report what an import would insert.
async fn cmd_check_import(config: &Config) -> anyhow::Result<()> {
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    println!("======================================================================");
    println!("COURSE ROSTER - PENDING IMPORT CHECK");
    println!("======================================================================");

    let persistence = FilePersistence::from_config(config);
    println!("Source: {}", persistence.pending_source());

    let Some(text) = persistence.read_pending().await? else {
        println!("No pending import file found. Nothing to import.");
        return Ok(());
    };

    match parse_pending(&text) {
        Ok(records) => {
            println!("OK: {} records ready to import", records.len());
            for record in records.iter().take(5) {
                println!(
                    "  line {}: {} ({}) -> {}",
                    record.line,
                    record.student.name,
                    record.student.id,
                    record.student.courses.join(", ")
                );
            }
            if records.len() > 5 {
                println!("  ... and {} more", records.len() - 5);
            }
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Pending import file would be rejected"));
        }
    }

    println!("======================================================================");
    Ok(())
}

/// Serve the HTTP API until shutdown.
async fn cmd_serve(mut config: Config, port_override: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port_override {
        config.port = port;
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    info!("Pending import file: {}", config.pending_import_path.display());
    info!("Student log: {}", config.student_log_path.display());
    info!("Duplicate id policy: {}", config.duplicate_id_policy);

    let handle = if config.metrics_enabled {
        metrics::init_metrics()
    } else {
        None
    };

    let persistence = Arc::new(FilePersistence::from_config(&config));
    let state = AppState::new(persistence, config.duplicate_id_policy).with_metrics(handle);
    let router = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
