/// Roster Server - user CRUD service over MySQL
use clap::{Parser, Subcommand};
use roster_core::UserStore;
use roster_server::startup;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "roster-server")]
#[command(about = "Roster user service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bootstrap the database, then start the HTTP server
    Serve {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Run the bootstrap sequence only and report what it did
    Bootstrap {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List all users
    ListUsers {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "roster_server=info,roster_storage=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            let config = startup::load_config(config.as_deref())?;
            tracing::info!("Starting Roster Server");
            startup::serve(config).await?;
        }
        Commands::Bootstrap { config } => {
            run_bootstrap(config).await?;
        }
        Commands::ListUsers { config } => {
            list_users(config).await?;
        }
    }

    Ok(())
}

async fn run_bootstrap(config: Option<PathBuf>) -> anyhow::Result<()> {
    let config = startup::load_config(config.as_deref())?;
    let (store, report) = startup::bootstrap(&config).await?;

    println!("Database \"{}\" ready", config.database.name);
    println!("Seed rows inserted: {}", report.seeded_rows);
    for warning in &report.warnings {
        println!("  warning [{}]: {}", warning.stage, warning.message);
    }

    store.close().await?;
    Ok(())
}

async fn list_users(config: Option<PathBuf>) -> anyhow::Result<()> {
    let config = startup::load_config(config.as_deref())?;
    let (store, _) = startup::bootstrap(&config).await?;

    let users = store.list_users().await?;

    println!("Users:");
    for user in users {
        println!("  {} - {} <{}>", user.id, user.name, user.email);
    }

    store.close().await?;
    Ok(())
}
