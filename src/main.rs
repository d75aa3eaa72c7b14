//! TDEE Tracker
//!
//! An MCP server for daily weight/calorie logging and TDEE estimation.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use tdee_tracker::build_info;
use tdee_tracker::config::Config;
use tdee_tracker::db::{migrations, Database};
use tdee_tracker::mcp::TrackerService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Log to stderr so MCP stdio framing stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("tdee_tracker=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();

    let config = Config::from_env();
    tracing::info!(path = %config.database_path.display(), "opening database");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::open(&config.database_path)?;
    {
        let conn = database.get_conn()?;
        migrations::run_migrations(&conn)?;
        let version = migrations::get_schema_version(&conn)?;
        tracing::info!(version, "database schema ready");
    }

    let service = TrackerService::new(&config, database).await?;

    tracing::info!("starting MCP server on stdio");
    let server = service.serve((stdin(), stdout())).await?;
    server.waiting().await?;

    Ok(())
}
