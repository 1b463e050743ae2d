use crate::database::{ConnectionOptions, PostgresConnection};

pub struct MigrationOpts {
    pub database_url: String,
}

/// Apply any pending migrations from the `migrations` directory.
pub async fn run_migrations(opts: MigrationOpts) -> anyhow::Result<()> {
    let db = PostgresConnection::connect(&ConnectionOptions {
        pool_size: 1,
        timeout_seconds: 5,
        url: opts.database_url,
    })
    .await?;

    let result = sqlx::migrate!().run(&*db).await;
    db.close().await;

    Ok(result?)
}
