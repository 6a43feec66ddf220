use std::{process, time::Duration};

use bulletin::{
    application::{error::AppError, settings::SettingsService},
    cache::CacheConfig,
    config,
    infra::{
        bootstrap::AppContext,
        db::PostgresRepositories,
        error::InfraError,
        http,
        memory::MemoryRepositories,
        store::Datastore,
        telemetry,
    },
};
use tokio::{sync::watch, try_join};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::SeedSettings(_) => run_seed_settings(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let store = match settings.database.url.as_deref() {
        Some(url) => Datastore::Postgres(connect_postgres(url, &settings).await?),
        None => {
            warn!(
                target = "bulletin::serve",
                "no database url configured; content is kept in memory and lost on exit"
            );
            Datastore::Memory(MemoryRepositories::new())
        }
    };

    let cache_config = CacheConfig::from(&settings.cache);
    let app = AppContext::build(store, &cache_config, settings.admin.token.as_deref())?;
    if !app.admin_token.is_configured() {
        warn!(
            target = "bulletin::serve",
            "admin token is not configured; every admin request will be refused"
        );
    }

    serve_http(&settings, app).await
}

async fn run_seed_settings(settings: config::Settings) -> Result<(), AppError> {
    let url = settings
        .database
        .url
        .as_deref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))?;
    let store = Datastore::Postgres(connect_postgres(url, &settings).await?);

    let service = SettingsService::new(store.repositories().settings);
    let inserted = service
        .initialize_predefined_settings()
        .await
        .map_err(|err| AppError::unexpected(err.to_string()))?;

    info!(
        target = "bulletin::seed_settings",
        inserted,
        total = service.predefined().len(),
        "Predefined settings seeded"
    );
    Ok(())
}

async fn connect_postgres(
    url: &str,
    settings: &config::Settings,
) -> Result<PostgresRepositories, AppError> {
    let pool = PostgresRepositories::connect(url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::migration(err.to_string())))?;

    Ok(PostgresRepositories::new(pool))
}

async fn serve_http(settings: &config::Settings, app: AppContext) -> Result<(), AppError> {
    let public_router = http::build_public_router(app.public);
    let admin_router = http::build_admin_router(app.admin, app.admin_token);

    let public_listener = tokio::net::TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    let admin_listener = tokio::net::TcpListener::bind(settings.server.admin_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "bulletin::serve",
        public = %settings.server.public_addr,
        admin = %settings.server.admin_addr,
        "Listening"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for shutdown signal");
            return;
        }
        info!(target = "bulletin::serve", "Shutdown requested");
        let _ = shutdown_tx.send(true);
    });

    let public_server = axum::serve(public_listener, public_router.into_make_service())
        .with_graceful_shutdown(shutdown_requested(shutdown_rx.clone()));
    let admin_server = axum::serve(admin_listener, admin_router.into_make_service())
        .with_graceful_shutdown(shutdown_requested(shutdown_rx.clone()));

    let grace = settings.server.graceful_shutdown;
    tokio::select! {
        result = async { try_join!(public_server, admin_server) } => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        _ = drain_deadline(shutdown_rx, grace) => {
            warn!(
                target = "bulletin::serve",
                grace_seconds = grace.as_secs(),
                "in-flight requests did not finish before the shutdown deadline"
            );
        }
    }

    Ok(())
}

async fn shutdown_requested(mut rx: watch::Receiver<bool>) {
    // A dropped sender means the signal listener failed; keep serving.
    if rx.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

async fn drain_deadline(rx: watch::Receiver<bool>, grace: Duration) {
    shutdown_requested(rx).await;
    tokio::time::sleep(grace).await;
}
