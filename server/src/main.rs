mod config;
mod employees;
mod http;
mod openapi;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use platform_db::{DbPool, EmployeeRepository, NewEmployee, SeaOrmEmployeeRepository, connect};
use platform_obs::{ObsConfig, init_tracing};
use tracing::{debug, info};

use crate::{
    config::AppConfig,
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "employee-service", version, about = "Employee directory service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server.
    Serve(ServeCommand),
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Insert a few sample employees.
    Seed,
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Rollback the most recent migration.
    Down,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
    #[arg(long, help = "Allow starting even when migrations are pending")]
    allow_dirty: bool,
}

impl From<&ServeCommand> for ServeConfig {
    fn from(value: &ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let env_files = config::load_env_files()?;
    init_tracing(ObsConfig::default())?;
    for path in &env_files {
        debug!(path = %path.display(), "loaded env file");
    }
    let app_config = Arc::new(AppConfig::from_env()?);
    info!(app_env = %app_config.app_env, "configuration loaded");
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, app_config).await,
        Command::Migrate(action) => match action {
            MigrateCommand::Up => migrate_up(&app_config).await,
            MigrateCommand::Down => migrate_down(&app_config).await,
        },
        Command::Seed => run_seed(&app_config).await,
    }
}

async fn setup_pool(config: &AppConfig) -> Result<DbPool> {
    connect(&config.database)
        .await
        .context("database connection failed")
}

async fn run_server(cmd: ServeCommand, config: Arc<AppConfig>) -> Result<()> {
    let pool = setup_pool(&config).await?;
    ensure_migrations(&pool, cmd.allow_dirty).await?;
    let state = AppState {
        employees: Arc::new(SeaOrmEmployeeRepository::new(pool.clone())),
        pool,
        config,
    };
    http::serve((&cmd).into(), state).await
}

async fn ensure_migrations(pool: &DbPool, allow_dirty: bool) -> Result<()> {
    let pending = Migrator::get_pending_migrations(pool).await?;
    if !pending.is_empty() && !allow_dirty {
        anyhow::bail!(
            "pending migrations detected; run `cargo run -p server -- migrate up` or pass --allow-dirty"
        );
    }
    Ok(())
}

async fn migrate_up(config: &AppConfig) -> Result<()> {
    let pool = setup_pool(config).await?;
    Migrator::up(&pool, None).await?;
    info!("database migrations applied");
    Ok(())
}

async fn migrate_down(config: &AppConfig) -> Result<()> {
    let pool = setup_pool(config).await?;
    Migrator::down(&pool, Some(1)).await?;
    info!("most recent migration rolled back");
    Ok(())
}

async fn run_seed(config: &AppConfig) -> Result<()> {
    let pool = setup_pool(config).await?;
    let repo = SeaOrmEmployeeRepository::new(pool);
    let created = seed_employees(&repo).await?;
    info!(created, "sample employees inserted");
    Ok(())
}

const SAMPLE_EMPLOYEES: &[(&str, &str, Option<&str>)] = &[
    ("Ada Lovelace", "ada@example.com", Some("12 St James's Square, London")),
    ("Grace Hopper", "grace@example.com", None),
    ("John Doe", "john.doe@example.com", Some("1 Main Street")),
    ("Jane Doe", "jane.doe@example.com", None),
];

async fn seed_employees(repo: &dyn EmployeeRepository) -> Result<usize> {
    for (name, email, address) in SAMPLE_EMPLOYEES {
        repo.create(NewEmployee {
            name: (*name).to_string(),
            email: (*email).to_string(),
            address: address.map(str::to_string),
        })
        .await
        .with_context(|| format!("seeding {name}"))?;
    }
    Ok(SAMPLE_EMPLOYEES.len())
}
