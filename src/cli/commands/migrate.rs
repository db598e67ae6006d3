use clap::Args;
use tracing::info;

use crate::config::config;
use crate::database::DatabaseManager;

#[derive(Args, Debug, Default)]
pub struct MigrateArgs {
    #[arg(long, help = "Database URL (overrides DATABASE_URL)")]
    pub database_url: Option<String>,
}

pub async fn handle(args: MigrateArgs) -> anyhow::Result<()> {
    let mut database = config().database.clone();
    if let Some(url) = args.database_url {
        database.url = url;
    }

    let pool = DatabaseManager::connect(&database).await?;
    DatabaseManager::migrate(&pool).await?;
    info!("Schema is up to date at {}", database.url);
    DatabaseManager::close(pool).await;
    Ok(())
}
