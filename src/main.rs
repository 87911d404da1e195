mod api;
mod config;
mod database;
mod jobs;
mod models;
mod seeds;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use config::{AppConfig, StoreBackend};
use database::{InMemoryUserStore, UserStore};
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env()
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    log::info!("🚀 Starting Activity Tracker...");

    let store: Arc<dyn UserStore> = match &config.store {
        StoreBackend::MongoDB { database_url } => {
            log::info!("📊 Store: MongoDB");
            let db = database::MongoDB::new(database_url)
                .await
                .map_err(|e| std::io::Error::other(format!("Failed to connect to MongoDB: {}", e)))?;
            log::info!("✅ MongoDB connected successfully");
            Arc::new(db)
        }
        StoreBackend::Memory => {
            log::warn!("⚠️  Store: in-memory (data is lost on restart)");
            Arc::new(InMemoryUserStore::new())
        }
    };

    // 🌱 Seed demo users
    let tracked_user_ids = seeds::demo_users_seed::seed_demo_users(store.as_ref())
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to seed demo users: {}", e)))?;

    if config.simulation_enabled {
        log::info!("📅 Starting background jobs...");
        let simulator = jobs::activity_simulator::start_activity_simulator(
            jobs::activity_simulator::SimulationState {
                store: store.clone(),
                tracked_user_ids,
            },
            config.simulation_interval,
        )
        .await;
        jobs::activity_simulator::supervise(simulator);
        log::info!("✅ Background jobs started");
    } else {
        log::info!("⏸️  Activity simulator DISABLED (SIMULATION_ENABLED=false)");
    }

    let host = config.host.clone();
    let port = config.port;

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    let store_data = web::Data::from(store);
    let stream_settings = web::Data::new(api::leader::StreamSettings {
        interval: config.leader_stream_interval,
    });
    let cors_origins = config.cors_allowed_origins.clone();

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::ACCEPT,
                actix_web::http::header::CACHE_CONTROL,
            ])
            .expose_headers(vec![
                actix_web::http::header::CONTENT_TYPE,
            ])
            .max_age(3600);
        for origin in &cors_origins {
            cors = cors.allowed_origin(origin);
        }

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(store_data.clone())
            .app_data(stream_settings.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone())
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Metrics
            .route("/metrics", web::get().to(api::metrics::get_metrics))
            // Leader
            .route("/leader", web::get().to(api::leader::get_leader))
            .route("/leaderStream", web::get().to(api::leader::leader_stream))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
