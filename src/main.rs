use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use tourdesk_api::config::AppConfig;
use tourdesk_api::db::{mongo, store::InMemoryStore};
use tourdesk_api::routes;
use tourdesk_api::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env();

    let state = match &config.mongodb_uri {
        Some(uri) => {
            let client = mongo::create_mongo_client(uri)
                .await
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
            let store = Arc::new(mongo::MongoStore::new(&client, &config.mongodb_database));
            log::info!("Using MongoDB database {}", config.mongodb_database);
            AppState::new(store, &config)
        }
        None => {
            log::warn!("MONGODB_URI not set, rates are kept in memory and lost on restart");
            AppState::new(Arc::new(InMemoryStore::new()), &config)
        }
    };
    let state = web::Data::new(state);

    log::info!("Starting HTTP server on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(routes::config)
    })
    .bind((config.host.clone(), config.port))?
    .run()
    .await
}
