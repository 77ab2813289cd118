use std::path::PathBuf;

use agenda_api::commands;
use agenda_api::utils::logging::init_tracing;
use agenda_api::AppContext;
use agenda_domain::{AppointmentChanges, AppointmentRequest, AppointmentStatus, EventFilters};
use agenda_infra::config;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "agenda")]
#[command(about = "Seller appointment scheduling with conflict checks", long_about = None)]
struct Cli {
    /// Configuration file (TOML). Defaults to AGENDA_* variables, then agenda.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule a new appointment
    Create {
        #[arg(long)]
        client: Option<String>,
        #[arg(long)]
        seller: Option<String>,
        /// Start instant (RFC 3339, e.g. 2025-04-14T10:00:00Z)
        #[arg(long)]
        start: Option<DateTime<Utc>>,
        /// Duration as hours:minutes:seconds
        #[arg(long)]
        duration: Option<String>,
        #[arg(long)]
        status: Option<AppointmentStatus>,
    },
    /// Change fields of an existing appointment
    Update {
        id: String,
        #[arg(long)]
        client: Option<String>,
        #[arg(long)]
        seller: Option<String>,
        #[arg(long)]
        start: Option<DateTime<Utc>>,
        #[arg(long)]
        duration: Option<String>,
        #[arg(long)]
        status: Option<AppointmentStatus>,
    },
    /// Cancel an appointment and free its slot
    Cancel { id: String },
    /// Show one appointment
    Show { id: String },
    /// List all appointments by start date
    List,
    /// Calendar events fully inside a window
    Events {
        #[arg(long)]
        from: DateTime<Utc>,
        #[arg(long)]
        to: DateTime<Utc>,
        /// Extra view filter (key=value), may be repeated
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
    },
    /// Register a seller's notification address
    RegisterSeller {
        id: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Show queued seller notifications
    Outbox {
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_from_file(Some(path.clone())),
        None => config::load(),
    }
    .context("failed to load configuration")?;

    init_tracing(&config.logging)?;
    let ctx = AppContext::new_with_config(config).context("failed to initialise agenda")?;

    match cli.command {
        Commands::Create { client, seller, start, duration, status } => {
            let request = AppointmentRequest {
                client_name: client,
                seller,
                start_date: start,
                duration,
                status,
            };
            print_json(&commands::create_appointment(&ctx, request).await?)?;
        }
        Commands::Update { id, client, seller, start, duration, status } => {
            let changes = AppointmentChanges {
                client_name: client,
                seller,
                start_date: start,
                duration,
                status,
            };
            print_json(&commands::update_appointment(&ctx, id, changes).await?)?;
        }
        Commands::Cancel { id } => {
            print_json(&commands::cancel_appointment(&ctx, id).await?)?;
        }
        Commands::Show { id } => {
            print_json(&commands::get_appointment(&ctx, id).await?)?;
        }
        Commands::List => {
            print_json(&commands::list_appointments(&ctx).await?)?;
        }
        Commands::Events { from, to, filters } => {
            let filters = (!filters.is_empty()).then(|| {
                filters
                    .into_iter()
                    .map(|(key, value)| (key, serde_json::Value::String(value)))
                    .collect::<EventFilters>()
            });
            print_json(&commands::get_calendar_events(&ctx, from, to, filters).await?)?;
        }
        Commands::RegisterSeller { id, email } => {
            commands::register_seller(&ctx, id.clone(), email).await?;
            println!("registered seller {id}");
        }
        Commands::Outbox { limit } => {
            print_json(&commands::list_pending_notifications(&ctx, limit).await?)?;
        }
    }

    Ok(())
}

fn parse_filter(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
