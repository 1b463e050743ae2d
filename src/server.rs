use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Body,
    extract::{FromRef, MatchedPath},
    http::{
        header::{ACCEPT, CONTENT_TYPE, ORIGIN},
        Method, Request,
    },
    Router,
};
use chrono::Duration;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};

use crate::{
    database::{ConnectionOptions, PostgresConnection},
    identities::services::PasswordResetService,
    repos::{DynUserRepo, DynVerificationRepo},
};

pub struct Options {
    pub database_pool_size: u32,
    pub database_timeout_seconds: u8,
    pub database_url: String,

    pub listen_address: SocketAddr,
    pub reset_token_ttl: Option<Duration>,
}

#[derive(Clone)]
pub struct AppState {
    password_reset_service: PasswordResetService,
}

impl AppState {
    pub fn new(password_reset_service: PasswordResetService) -> Self {
        Self {
            password_reset_service,
        }
    }
}

impl FromRef<AppState> for PasswordResetService {
    fn from_ref(state: &AppState) -> Self {
        state.password_reset_service.clone()
    }
}

/// Build the application's router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_headers([ACCEPT, CONTENT_TYPE, ORIGIN])
        .allow_methods([Method::POST])
        .allow_origin(Any);

    Router::new()
        .nest("/password", crate::identities::http::routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span))
        .layer(cors)
        .with_state(state)
}

fn make_span(request: &Request<Body>) -> Span {
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
    )
}

pub async fn serve(opts: Options) -> anyhow::Result<()> {
    let db_connection = PostgresConnection::connect(&ConnectionOptions {
        pool_size: opts.database_pool_size,
        timeout_seconds: opts.database_timeout_seconds,
        url: opts.database_url,
    })
    .await?;

    let user_repo: DynUserRepo = Arc::new(db_connection.clone());
    let verification_repo: DynVerificationRepo = Arc::new(db_connection.clone());

    let password_reset_service =
        PasswordResetService::new(user_repo, verification_repo, opts.reset_token_ttl);

    let app = app(AppState::new(password_reset_service));

    info!(address = %opts.listen_address, "Listening for requests.");

    let result = match axum::Server::try_bind(&opts.listen_address) {
        Ok(builder) => builder
            .serve(app.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await,
        Err(error) => Err(error),
    };

    db_connection.close().await;

    Ok(result?)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            error!(?error, "Failed to listen for Ctrl-C.");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                error!(?error, "Failed to listen for SIGTERM.");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down.");
}
