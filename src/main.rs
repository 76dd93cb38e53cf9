use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use food_share_hub::{
    auth::Credentials,
    config::{Config, StoreConfig},
    routes,
    store::{DocumentStore, MemoryStore, MongoStore},
    AppState,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("loading configuration")?;

    let (store, mongo): (Arc<dyn DocumentStore>, Option<MongoStore>) = match &config.store {
        StoreConfig::Memory => {
            info!("using in-memory document store");
            (Arc::new(MemoryStore::new()), None)
        }
        StoreConfig::Mongo { uri, database } => {
            let mongo = MongoStore::connect(uri, database)
                .await
                .context("connecting to MongoDB")?;
            (Arc::new(mongo.clone()), Some(mongo))
        }
    };

    let state = web::Data::new(AppState::new(
        store,
        Credentials::new(&config.access_token_secret, config.token_ttl_secs),
    ));

    let addr = format!("{}:{}", config.host, config.port);
    info!("server is running on {addr}");

    let origins = config.allowed_origins.clone();
    HttpServer::new(move || {
        let cors = origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .supports_credentials()
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .configure(routes)
    })
    .bind(&addr)
    .with_context(|| format!("binding {addr}"))?
    .run()
    .await?;

    if let Some(mongo) = mongo {
        mongo.shutdown().await;
    }
    info!("server stopped");

    Ok(())
}
