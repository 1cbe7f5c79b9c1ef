use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use course_planner::config::Settings;
use course_planner::core::Optimizer;
use course_planner::routes::{self, handle_json_payload_error, handle_query_payload_error, AppState};
use course_planner::services::{CatalogCache, CatalogClient, CourseService};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load();

    // Initialize logging; LOG_LEVEL / LOG_FORMAT win over the config file
    let (config_level, config_format) = match &settings {
        Ok(s) => (s.logging.level.clone(), s.logging.format.clone()),
        Err(_) => ("info".to_string(), "json".to_string()),
    };
    let log_level = std::env::var("LOG_LEVEL").unwrap_or(config_level);
    let log_format = std::env::var("LOG_FORMAT").unwrap_or(config_format);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting course planner service...");

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    info!(
        "Configuration loaded successfully ({} departments, quarter {})",
        settings.catalog.departments.len(),
        settings.catalog.quarter
    );

    let catalog = CatalogClient::new(&settings.catalog).map_err(|e| {
        error!("Failed to build catalog client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    let cache = Arc::new(CatalogCache::new(
        settings.cache.dir.clone(),
        settings.cache.l1_cache_size,
        settings.cache.ttl_secs,
    ));

    info!(
        "Catalog cache initialized at {} (L1: {} entries, TTL: {}s)",
        cache.dir().display(),
        settings.cache.l1_cache_size,
        settings.cache.ttl_secs
    );

    let courses = Arc::new(CourseService::new(catalog, cache, settings.catalog.departments.clone()));

    // Initialize optimizer with configured weights
    let weights = settings.scoring_weights();
    let optimizer = Optimizer::new(weights).with_candidate_limit(settings.optimizer.max_candidates);

    info!("Optimizer initialized with weights: {:?}", weights);

    // Build application state
    let app_state = AppState {
        courses,
        optimizer,
        limits: settings.optimizer.clone(),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
