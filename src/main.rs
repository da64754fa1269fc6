use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;
use std::sync::Arc;
use std::time::Duration;

mod api;
mod config;
mod db;
mod device;
mod docs;
mod importer;
mod model;
mod routes;
mod summary;
mod utils;

use config::Config;
use db::init_db;

use crate::device::DeviceConnector;
use crate::docs::ApiDoc;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "zkbridge is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url).await;

    let connector: Arc<dyn DeviceConnector> = device::connector_from_name(&config.device_driver)
        .expect("DEVICE_DRIVER must name a known device driver");

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    if config.sweep_interval_secs > 0 {
        let sweep_pool = pool.clone();
        let sweep_connector = connector.clone();
        let tz = config.timezone;
        let timeout = config.device_timeout();
        let every = Duration::from_secs(config.sweep_interval_secs);

        actix_web::rt::spawn(async move {
            loop {
                actix_web::rt::time::sleep(every).await;
                importer::sweep(&sweep_pool, sweep_connector.clone(), tz, timeout).await;
            }
        });
    }

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(config.clone()))
            .app_data(Data::new(connector.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await
}
