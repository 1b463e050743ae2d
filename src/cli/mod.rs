use std::{net::SocketAddr, num::NonZeroU32};

use chrono::Duration;
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::server;

mod migrate;

#[derive(Parser)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    /// Sentry DSN. Error events are reported only when this is set.
    #[clap(long = "sentry-dsn", env = "SENTRY_DSN")]
    sentry_dsn: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations.
    Migrate(MigrateOpts),
    /// Apply pending migrations and serve the API.
    Serve(ServeOpts),
}

#[derive(Args)]
struct MigrateOpts {
    /// Postgres URL of the database to migrate.
    #[clap(long = "database-url", env = "DATABASE_URL")]
    database_url: String,
}

impl From<MigrateOpts> for migrate::MigrationOpts {
    fn from(opts: MigrateOpts) -> Self {
        Self {
            database_url: opts.database_url,
        }
    }
}

#[derive(Args)]
struct ServeOpts {
    /// Maximum number of pooled database connections.
    #[clap(long = "database-pool-size", default_value = "16")]
    database_pool_size: u32,

    /// Seconds to wait for a pooled connection before failing a request.
    #[clap(long = "database-timeout", default_value = "5")]
    database_timeout: u8,

    /// Postgres URL of the account and token store.
    #[clap(long = "database-url", env = "DATABASE_URL")]
    database_url: String,

    /// Socket address the HTTP server binds to.
    #[clap(
        long = "listen-address",
        default_value = "0.0.0.0:8000",
        env = "LISTEN_ADDRESS"
    )]
    listen_address: SocketAddr,

    /// Number of minutes a password reset token remains valid. Must be at least 1.
    ///
    /// If this is not set, tokens stay valid until they are used or replaced
    /// by a newer token.
    #[clap(long = "reset-token-ttl-minutes", env = "RESET_TOKEN_TTL_MINUTES")]
    reset_token_ttl_minutes: Option<NonZeroU32>,
}

impl From<ServeOpts> for server::Options {
    fn from(opts: ServeOpts) -> Self {
        Self {
            database_pool_size: opts.database_pool_size,
            database_timeout_seconds: opts.database_timeout,
            database_url: opts.database_url,
            listen_address: opts.listen_address,
            reset_token_ttl: opts
                .reset_token_ttl_minutes
                .map(|minutes| Duration::minutes(minutes.get().into())),
        }
    }
}

pub async fn run_with_sys_args() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Dropping the guard flushes pending events, so it lives until exit.
    let _sentry = init_telemetry(cli.sentry_dsn);

    match cli.command {
        Commands::Migrate(opts) => migrate::run_migrations(opts.into()).await,
        Commands::Serve(opts) => {
            migrate::run_migrations(migrate::MigrationOpts {
                database_url: opts.database_url.clone(),
            })
            .await?;

            server::serve(opts.into()).await
        }
    }
}

/// Install the global tracing subscriber, forwarding events to Sentry when a
/// DSN is configured.
fn init_telemetry(sentry_dsn: Option<String>) -> Option<sentry::ClientInitGuard> {
    use tracing_subscriber::prelude::*;

    let guard = sentry_dsn.map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(EnvFilter::from_default_env()))
        .with(guard.as_ref().map(|_| sentry_tracing::layer()))
        .init();

    if guard.is_some() {
        debug!("Enabled sentry.");
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serve_options(args: &[&str]) -> server::Options {
        let cli = Cli::try_parse_from(
            ["account-recovery-api", "serve", "--database-url", "postgres://localhost/test"]
                .iter()
                .chain(args),
        )
        .expect("arguments should parse");

        match cli.command {
            Commands::Serve(opts) => opts.into(),
            Commands::Migrate(_) => panic!("Expected the serve command."),
        }
    }

    #[test]
    fn serve_defaults() {
        let opts = serve_options(&["--listen-address", "127.0.0.1:9000"]);

        assert_eq!(16, opts.database_pool_size);
        assert_eq!(5, opts.database_timeout_seconds);
        assert_eq!("postgres://localhost/test", opts.database_url);
        assert_eq!("127.0.0.1:9000".parse::<SocketAddr>().unwrap(), opts.listen_address);
    }

    #[test]
    fn serve_reset_token_ttl() {
        let opts = serve_options(&["--reset-token-ttl-minutes", "30"]);

        assert_eq!(Some(Duration::minutes(30)), opts.reset_token_ttl);
    }

    #[test]
    fn serve_rejects_zero_reset_token_ttl() {
        let result = Cli::try_parse_from([
            "account-recovery-api",
            "serve",
            "--database-url",
            "postgres://localhost/test",
            "--reset-token-ttl-minutes",
            "0",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn serve_rejects_bad_listen_address() {
        let result = Cli::try_parse_from([
            "account-recovery-api",
            "serve",
            "--database-url",
            "postgres://localhost/test",
            "--listen-address",
            "not-an-address",
        ]);

        assert!(result.is_err());
    }
}
