use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use entity::EmployeeDraft;
use platform_store::EmployeeStore;
use server::{
    config::AppConfig,
    http::{self, AppState, ServeConfig},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "staffstore",
    version,
    about = "File-backed employee records service"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server.
    Serve(ServeCommand),
    /// Write demo employee records through the store.
    Seed(SeedCommand),
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[derive(Args, Debug)]
struct SeedCommand {
    /// Number of demo records to add.
    #[arg(long, default_value_t = 3)]
    count: usize,
}

impl From<ServeCommand> for ServeConfig {
    fn from(value: ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();
    let config = Arc::new(AppConfig::load()?);
    let store = EmployeeStore::new(&config.data_file);
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, config, store).await,
        Command::Seed(cmd) => run_seed(cmd, store).await,
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run_server(cmd: ServeCommand, config: Arc<AppConfig>, store: EmployeeStore) -> Result<()> {
    let state = AppState { store, config };
    http::serve(cmd.into(), state).await
}

async fn run_seed(cmd: SeedCommand, store: EmployeeStore) -> Result<()> {
    let mut total = 0;
    for index in 1..=cmd.count {
        let draft = EmployeeDraft {
            name: format!("Demo Employee {index}"),
            email: format!("demo{index}@example.test"),
            department: "Demo".into(),
            salary: 50_000.0,
            age: 30,
        };
        let (record, count) = store.add(draft).await?;
        info!(%record.id, "seeded employee");
        total = count;
    }
    info!(total, "seed complete");
    Ok(())
}
