use api::auth::middleware::log_request;
use api::routes::routes;
use api::services::email::SmtpMailer;
use axum::{
    Router,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    middleware::from_fn,
};
use migration::Migrator;
use sea_orm_migration::MigratorTrait;
use std::{net::SocketAddr, process, sync::Arc};
use tower_http::cors::CorsLayer;
use tracing_appender::rolling;
use util::{config::AppConfig, paths, state::AppState};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            process::exit(1);
        }
    };

    let _log_guard = init_logging(&config);

    if config.secret_key.is_none() {
        tracing::warn!("SECRET_KEY is not set; /api/reports and /api/admin will refuse every request");
    }

    let db = match db::connect(&config).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "failed to connect to database");
            process::exit(1);
        }
    };

    if let Err(e) = Migrator::up(&db, None).await {
        tracing::error!(error = %e, "failed to apply migrations");
        process::exit(1);
    }

    if let Err(e) = paths::ensure_dir(paths::avatar_root(&config.avatar_storage_root)) {
        tracing::warn!(error = %e, "could not create avatar storage directory");
    }

    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, host = %config.host, port = config.port, "invalid listen address");
            process::exit(1);
        }
    };
    let project_name = config.project_name.clone();

    let mut app_state = AppState::new(db, config);
    if app_state.config().email_enabled() {
        match SmtpMailer::from_config(app_state.config()) {
            Ok(mailer) => app_state = app_state.with_mailer(Arc::new(mailer)),
            Err(e) => tracing::warn!(error = %e, "SMTP mailer disabled"),
        }
    } else {
        tracing::info!("SMTP credentials not set; report emails are disabled");
    }

    let cors = CorsLayer::very_permissive().expose_headers([CONTENT_DISPOSITION, CONTENT_TYPE]);

    let app = Router::new()
        .nest("/api", routes(app_state))
        .layer(from_fn(log_request))
        .layer(cors);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind");
            process::exit(1);
        }
    };

    tracing::info!("Starting {project_name} on http://{addr}");

    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        tracing::error!(error = %e, "server crashed");
        process::exit(1);
    }
}

fn init_logging(config: &AppConfig) -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", &config.log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let env_filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("api=info"));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    if config.log_to_stdout {
        let stdout_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(true)
            .with_thread_ids(true);
        registry.with(stdout_layer).init();
    } else {
        registry.init();
    }

    guard
}
