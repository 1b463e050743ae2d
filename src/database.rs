use std::{ops::Deref, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{error, info};

pub struct ConnectionOptions {
    pub pool_size: u32,
    pub timeout_seconds: u8,
    pub url: String,
}

/// A handle to the application database.
///
/// The handle is created once at startup and passed to everything that needs
/// it. Clones share the same pool.
#[derive(Clone)]
pub struct PostgresConnection(PgPool);

impl PostgresConnection {
    /// Open a connection pool to the database.
    ///
    /// # Returns
    ///
    /// An [`anyhow::Result`] containing the connection. An [`Err`] is returned
    /// if the database cannot be reached, which callers are expected to treat
    /// as fatal.
    pub async fn connect(opts: &ConnectionOptions) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(opts.pool_size)
            .acquire_timeout(Duration::from_secs(opts.timeout_seconds.into()))
            .connect(&opts.url)
            .await;

        match pool {
            Ok(pool) => {
                info!("Connected to database.");

                Ok(Self(pool))
            }
            Err(error) => {
                error!(
                    ?error,
                    "Failed to connect to database. Please make sure the database is running."
                );

                Err(error).context("Failed to connect to database.")
            }
        }
    }

    /// Close every connection in the pool, waiting for checked out
    /// connections to be returned.
    pub async fn close(&self) {
        self.0.close().await;

        info!("Closed database connection pool.");
    }
}

impl Deref for PostgresConnection {
    type Target = PgPool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
