mod config;
mod http;

use std::{net::IpAddr, sync::Arc};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use platform_db::{DbPool, DbReport, connect, employees, inspect};
use platform_obs::{ObsConfig, init_tracing};
use products_hr::{SeedOutcome, decode_skills, seed::SEED_PASSWORD, seed_directory};
use tracing::info;

use crate::{
    config::AppConfig,
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "directory-server", version, about = "Employee directory API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the schema if needed and start the HTTP server.
    Serve(ServeCommand),
    /// Populate an empty directory with sample employees.
    Seed,
    /// Inspect the database and print what it holds.
    Check,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: IpAddr,
    #[arg(long, env = "PORT", default_value_t = 8000)]
    port: u16,
}

impl From<ServeCommand> for ServeConfig {
    fn from(value: ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(ObsConfig::default())?;
    let cli = Cli::parse();
    let app_config = Arc::new(AppConfig::load()?);
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, app_config).await,
        Command::Seed => run_seed(&app_config).await,
        Command::Check => run_check(&app_config).await,
    }
}

async fn setup_pool(config: &AppConfig) -> Result<DbPool> {
    connect(&config.database)
        .await
        .context("failed to connect to the database")
}

async fn ensure_schema(pool: &DbPool) -> Result<()> {
    Migrator::up(pool, None)
        .await
        .context("failed to create the employees schema")?;
    Ok(())
}

async fn run_server(cmd: ServeCommand, config: Arc<AppConfig>) -> Result<()> {
    let pool = setup_pool(&config).await?;
    ensure_schema(&pool).await?;
    let state = AppState::new(pool, config);
    http::serve(cmd.into(), state).await
}

async fn run_seed(config: &AppConfig) -> Result<()> {
    let pool = setup_pool(config).await?;
    ensure_schema(&pool).await?;
    match seed_directory(&pool).await.context("seeding failed")? {
        SeedOutcome::Skipped { existing } => {
            info!(existing, "employees table already populated; nothing to do");
        }
        SeedOutcome::Seeded { emails } => {
            info!(count = emails.len(), "sample employees inserted");
            for email in &emails {
                info!(%email, password = SEED_PASSWORD, "sample login");
            }
        }
    }
    Ok(())
}

async fn run_check(config: &AppConfig) -> Result<()> {
    let pool = setup_pool(config).await?;
    let report = inspect(&pool).await.context("database inspection failed")?;
    if !report.connected {
        println!("[ERROR] database is not reachable");
        bail!("database connectivity check failed");
    }
    println!("[OK] database connection");
    print_tables(&report);

    if !report.has_employees_table() {
        println!("[WARNING] employees table is missing; run `directory-server seed`");
        return Ok(());
    }

    let count = report.employee_count.unwrap_or(0);
    println!("[OK] employees table has {count} row(s)");
    if report.is_empty() {
        println!("[WARNING] no employees found; run `directory-server seed`");
    } else {
        print_employees(&pool).await?;
    }
    print_columns(&report);
    Ok(())
}

fn print_tables(report: &DbReport) {
    if report.tables.is_empty() {
        println!("[WARNING] no tables found");
        return;
    }
    println!("tables:");
    for table in &report.tables {
        println!("  - {table}");
    }
}

async fn print_employees(pool: &DbPool) -> Result<()> {
    println!("employees:");
    for employee in employees::list_all(pool).await? {
        println!("  [{}] {} <{}>", employee.id, employee.name, employee.email);
        println!("      position: {}", employee.position);
        println!("      avatar:   {}", employee.avatar);
        println!("      password: {}", masked_credential(&employee.password_hash));
        match decode_skills(employee.id, &employee.skills) {
            Ok(skills) => println!("      skills:   {}", skills.join(", ")),
            Err(err) => println!("      [ERROR] {err}"),
        }
    }
    Ok(())
}

fn print_columns(report: &DbReport) {
    println!("employees columns:");
    for column in &report.columns {
        let mut flags = Vec::new();
        if column.primary_key {
            flags.push("primary key");
        }
        if column.not_null {
            flags.push("not null");
        }
        println!("  - {} {} {}", column.name, column.data_type, flags.join(", "));
    }
}

fn masked_credential(stored: &str) -> &'static str {
    if stored.starts_with("$argon2") {
        "******** (argon2)"
    } else if stored.is_empty() {
        "(missing)"
    } else {
        "******** (unrecognised format)"
    }
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
    fn serve_accepts_host_and_port_flags() {
        let cli =
            Cli::try_parse_from(["directory-server", "serve", "--host", "127.0.0.1", "--port", "9000"])
                .unwrap();
        let Command::Serve(cmd) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(cmd.host, IpAddr::from([127, 0, 0, 1]));
        assert_eq!(cmd.port, 9000);
    }

    #[test]
    fn credentials_are_never_printed() {
        assert_eq!(masked_credential("$argon2id$v=19$m=19456,t=2,p=1$abc$def"), "******** (argon2)");
        assert!(!masked_credential("password123").contains("password123"));
    }
}
