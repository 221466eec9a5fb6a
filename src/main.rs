//! Smoking places reservation server
//!
//! Reads configuration from a TOML file
//! (~/.config/smoking-places/config.toml by default).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use smoking_places::application::{CatalogService, NewUser, ReservationService, UserService};
use smoking_places::domain::{Clock, RepositoryProvider, SystemClock};
use smoking_places::infrastructure::database::migrator::Migrator;
use smoking_places::shared::shutdown::ShutdownCoordinator;
use smoking_places::{
    create_router, default_config_path, init_database, AppConfig, AppState,
    SeaOrmRepositoryProvider,
};

#[derive(Debug, Parser)]
#[command(name = "smoking-places", version, about = "Smoking place reservation server")]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, env = "SMOKING_PLACES_CONFIG")]
    config: Option<PathBuf>,

    /// Override `server.port`
    #[arg(short, long)]
    port: Option<u16>,

    /// Override `logging.level`
    #[arg(long)]
    log_level: Option<String>,

    /// Validate the configuration and exit
    #[arg(long)]
    check: bool,

    /// Do not run database migrations on start
    #[arg(long)]
    no_migrate: bool,
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let (mut app_cfg, load_error) = if config_path.exists() {
        (AppConfig::load(&config_path)?, None)
    } else {
        (AppConfig::default(), Some(config_path.display().to_string()))
    };
    if let Some(port) = cli.port {
        app_cfg.server.port = port;
    }
    if let Some(level) = cli.log_level.clone() {
        app_cfg.logging.level = level;
    }

    init_tracing(&app_cfg.logging.level, app_cfg.logging.json);
    match load_error {
        Some(path) => warn!(path = %path, "Config file not found, using defaults"),
        None => info!(path = %config_path.display(), "Configuration loaded"),
    }

    app_cfg.validate()?;
    if cli.check {
        info!("Configuration is valid");
        return Ok(());
    }

    info!("Starting smoking places reservation service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = match metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
    {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "Prometheus recorder not installed, /metrics disabled");
            None
        }
    };

    // ── Database ───────────────────────────────────────────────
    let db_config = app_cfg.database_config();
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, "Failed to connect to database");
            return Err(e.into());
        }
    };

    if cli.no_migrate {
        warn!("Skipping database migrations");
    } else {
        info!("Running database migrations...");
        if let Err(e) = Migrator::up(&db, None).await {
            error!(error = %e, "Failed to run migrations");
            return Err(e.into());
        }
        info!("Migrations completed");
    }

    // ── Services ───────────────────────────────────────────────
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let users = Arc::new(UserService::new(
        repos.clone(),
        app_cfg.jwt_config(),
        app_cfg.security.bcrypt_cost,
    ));
    let catalog = Arc::new(CatalogService::new(repos.clone(), clock.clone()));
    let reservations = Arc::new(ReservationService::new(repos, clock));

    let admin = NewUser {
        username: app_cfg.admin.username.clone(),
        password: app_cfg.admin.password.clone(),
        name: app_cfg.admin.name.clone(),
        email: app_cfg.admin.email.clone(),
    };
    if let Some(created) = users.ensure_default_admin(admin).await? {
        warn!(
            username = %created.username,
            "Default admin created, change its password"
        );
    }

    let state = AppState {
        catalog,
        reservations,
        users,
        db: db.clone(),
        started_at: Arc::new(Instant::now()),
    };
    let router = create_router(state, prometheus_handle);

    // ── Shutdown coordination ──────────────────────────────────
    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
    let shutdown_signal = shutdown.signal();
    shutdown.start_signal_listener();

    // ── HTTP server ────────────────────────────────────────────
    let addr = app_cfg.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        shutdown_signal.wait().await;
        info!("HTTP server received shutdown signal");
    });

    if let Err(e) = server.await {
        error!(error = %e, "HTTP server error");
    }

    // ── Cleanup ────────────────────────────────────────────────
    shutdown
        .run_cleanup(async {
            match db.close().await {
                Ok(()) => info!("Database connection closed"),
                Err(e) => warn!(error = %e, "Error closing database connection"),
            }
        })
        .await;

    info!("Shutdown complete");
    Ok(())
}
