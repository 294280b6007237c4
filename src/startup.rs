use crate::cache::{spawn_sweeper, ResponseCache};
use crate::configuration::Settings;
use crate::routes::{health_check, media_source, ApiError};
use crate::upstream::TmdbClient;

use actix_web::{
    dev::Server,
    web::{self, Data},
    App, HttpServer,
};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

use actix_cors::Cors;
use actix_web::http::header;

fn configure_cors(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default();
    for origin in allowed_origins {
        cors = if origin == "*" {
            cors.allow_any_origin()
        } else {
            cors.allowed_origin(origin)
        };
    }
    cors.allowed_methods(vec!["GET"])
        .allowed_headers(vec![header::ACCEPT])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(3600)
}

pub fn run_server(listener: TcpListener, settings: Settings) -> Result<Server, std::io::Error> {
    let client = TmdbClient::new(&settings.tmdb).map_err(std::io::Error::other)?;
    let client = Data::new(client);
    let cache = Data::new(ResponseCache::new(
        settings.cache.ttl(),
        settings.cache.max_entries,
    ));
    spawn_sweeper(cache.clone().into_inner(), settings.cache.ttl());
    let default_region = Data::new(settings.default_region());
    let allowed_origins = settings.allowed_origins.clone();
    tracing::info!(
        "Proxying {} with a {}s cache, default region {}",
        settings.tmdb.base_url,
        settings.cache.ttl_seconds,
        default_region.0
    );

    let server: Server = HttpServer::new(move || {
        let cors = configure_cors(&allowed_origins);
        App::new()
            .wrap(cors)
            .wrap(TracingLogger::default())
            .app_data(web::PathConfig::default().error_handler(|err, _| {
                ApiError::BadRequest(err.to_string()).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _| {
                ApiError::BadRequest(err.to_string()).into()
            }))
            .app_data(client.clone())
            .app_data(cache.clone())
            .app_data(default_region.clone())
            .route("/health", web::get().to(health_check))
            .service(media_source())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
