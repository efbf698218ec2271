//! sqlgate entry point
//!
//! Parses CLI arguments, wires the configured database bindings, and starts
//! the gateway server. All request handling lives in the library.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use sqlgate::database::SqliteDatabase;
use sqlgate::gateway::{DatabaseBindings, GatewayConfig, GatewayServer};

/// sqlgate - a table-agnostic HTTP-to-SQL gateway
#[derive(Parser, Debug)]
#[command(name = "sqlgate")]
#[command(version, about, long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to bind to
    #[arg(long, default_value_t = 8787)]
    port: u16,

    /// Shared secret required in the Authorization header
    #[arg(long, env = "SQLGATE_SECRET")]
    secret: String,

    /// Path to the default database file
    #[arg(long)]
    database: Option<String>,

    /// Path to the preferred "verified" database file
    #[arg(long)]
    verified_database: Option<String>,

    /// CORS allowed origins (empty = permissive)
    #[arg(long)]
    cors_origin: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sqlgate=info".into()),
        )
        .init();

    if let Err(e) = run(Args::parse()).await {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = GatewayConfig::new(args.secret);
    config.host = args.host;
    config.port = args.port;
    config.cors_origins = args.cors_origin;

    let mut bindings = DatabaseBindings::new();
    if let Some(path) = args.verified_database {
        bindings = bindings.with_verified(Arc::new(SqliteDatabase::open(path)?));
    }
    if let Some(path) = args.database {
        bindings = bindings.with_default(Arc::new(SqliteDatabase::open(path)?));
    }

    GatewayServer::new(config, bindings).start().await?;
    Ok(())
}
