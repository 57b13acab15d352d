use actix_web::{web, App, HttpServer};
use dotenv::dotenv;

use crate::config::app_config::AppConfig;
use crate::logger::init_logger;
use crate::services::batch_service::BatchService;
use crate::services::dispatch_service::DispatchEngine;
use crate::services::gateway_service::build_gateway;
use crate::services::history_service::HistoryService;
use crate::services::messaging_service::MessagingService;
use crate::services::template_service::TemplateService;

mod app;
mod config;
mod db;
mod error;
mod handlers;
mod logger;
mod models;
mod services;

#[cfg(test)]
mod tests;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok(); // Cargar .env al inicio
    init_logger();

    let config = AppConfig::from_env()?;

    // Conectarnos a la DB y migrar
    let db_pool = db::setup_database(config.database_url.as_deref()).await?;
    db::run_migrations(&db_pool).await?;

    let gateway = build_gateway(&config.gateway)?;

    let template_service = TemplateService::new(db_pool.clone());
    let history_service = HistoryService::new(db_pool.clone());
    let batch_service = BatchService::new(db_pool.clone());
    let dispatch_engine = DispatchEngine::new(gateway, history_service.clone());
    let messaging_service = MessagingService::new(
        template_service.clone(),
        batch_service.clone(),
        dispatch_engine,
    );

    // Levantar servidor
    log::info!(
        "Levantando servidor en {}:{}",
        config.bind_host,
        config.bind_port
    );
    HttpServer::new(move || {
        App::new()
            // Las planillas grandes superan el límite por defecto de JSON
            .app_data(web::JsonConfig::default().limit(4 * 1024 * 1024))
            .app_data(web::Data::new(template_service.clone()))
            .app_data(web::Data::new(history_service.clone()))
            .app_data(web::Data::new(batch_service.clone()))
            .app_data(web::Data::new(messaging_service.clone()))
            .configure(app::init_app)
    })
    .workers(1)
    .bind((config.bind_host.as_str(), config.bind_port))?
    .run()
    .await?;

    Ok(())
}
