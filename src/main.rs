//! Attendance Server - employee attendance and working calendar
//!
//! REST API server for check-ins, calendar management and auto-absence.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use chrono::Datelike;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use attendance_server::{
    api,
    config::{AppConfig, LoggingConfig},
    repository::PgStore,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing; the guard flushes the log file on exit
    let _log_guard = init_tracing(&config.logging);

    tracing::info!("Starting Attendance Server v{}", env!("CARGO_PKG_VERSION"));

    let tz = config.attendance.tz()?;
    let sweep_at = config.attendance.sweep_at()?;

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = PgStore::new(pool).into_repository();
    let services = Services::new(repository, &config.attendance);

    // Make sure the current month exists before the first check-in
    let today = chrono::Utc::now().with_timezone(&tz).date_naive();
    services.resolver.ensure_generated(today).await?;
    tracing::info!("Calendar for {}-{:02} is ready", today.year(), today.month());

    if config.attendance.sweep_enabled {
        services.sweep.clone().spawn_daily(tz, sweep_at);
        tracing::info!("Auto-absence sweep scheduled daily at {} ({})", sweep_at, tz);
    } else {
        tracing::info!("Auto-absence sweep disabled");
    }

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
        tz,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(server_host.parse()?, server_port);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Console output (pretty or JSON) plus an optional daily rolling file
fn init_tracing(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("attendance_server={},tower_http=debug", logging.level).into());

    let console = if logging.format == "json" {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    let (file, guard) = match logging.directory.as_deref() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "attendance-server.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();

    guard
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Weekly settings
        .route("/calendar/settings", get(api::settings::get_settings))
        .route("/calendar/settings", put(api::settings::update_settings))
        // Calendar
        .route("/calendar/months/:year/:month", get(api::calendar::get_month))
        .route("/calendar/months/:year/:month/generate", post(api::calendar::generate_month))
        .route("/calendar/regenerate", post(api::calendar::regenerate))
        .route("/calendar/days/:date", get(api::calendar::get_day))
        // Date events
        .route("/calendar/events", get(api::events::list_events))
        .route("/calendar/events/:date", put(api::events::save_event))
        .route("/calendar/events/:date", delete(api::events::remove_event))
        // Employees
        .route("/employees", get(api::employees::list_employees))
        .route("/employees", post(api::employees::create_employee))
        .route("/employees/bulk", post(api::employees::bulk_create_employees))
        .route("/employees/:employee_id", get(api::employees::get_employee))
        .route("/employees/:employee_id", put(api::employees::update_employee))
        .route("/employees/:employee_id", delete(api::employees::delete_employee))
        // Attendance
        .route("/attendance", get(api::attendance::list_attendance))
        .route("/attendance/check-in", post(api::attendance::check_in))
        .route("/attendance/pending", get(api::attendance::pending_approvals))
        .route("/attendance/summary", get(api::attendance::monthly_summary))
        .route("/attendance/auto-absence", post(api::attendance::run_auto_absence))
        .route("/attendance/:id/check-out", post(api::attendance::check_out))
        .route("/attendance/:id/status", put(api::attendance::update_status))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
}
