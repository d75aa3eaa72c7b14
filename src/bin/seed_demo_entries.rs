//! Seed a demo user with four weeks of daily entries
//!
//! Writes through the public upsert path, so repeated runs stay idempotent.

use chrono::{Duration, Utc};

use tdee_tracker::config::Config;
use tdee_tracker::db::{migrations, Database};
use tdee_tracker::store::{EntryStore, UserStore};
use tdee_tracker::tools::entries;
use tdee_tracker::tools::stats::StatsService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    println!("Database path: {}", config.database_path.display());

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::open(&config.database_path)?;
    {
        let conn = database.get_conn()?;
        migrations::run_migrations(&conn)?;
    }

    let user_store = UserStore::new(database.clone());
    let entry_store = EntryStore::new(database);

    let demo = user_store.get_or_create("demo@example.com".to_string()).await?;
    println!("Demo user: {} (id {})", demo.email, demo.id);

    // Four weeks of a slow cut: ~0.05 lbs/day down toward 185, around 2100 kcal
    let today = Utc::now().date_naive();
    for days_back in (0..28i64).rev() {
        let date = today - Duration::days(days_back);
        let weight = 185.0 + 0.05 * days_back as f64;
        let calories = 2100 + (days_back % 3) * 50;

        entries::log_entry(&entry_store, demo.id, &date.to_string(), weight, calories).await?;
    }
    println!("Seeded 28 entries ending {today}");

    let stats = StatsService::new(entry_store, config.stats);
    let report = stats.tdee_stats(demo.id, None).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
