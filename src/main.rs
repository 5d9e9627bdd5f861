use actix_web::{middleware::Logger, web, App, HttpServer};
use std::io;

use hse_tracker::{
    config::Config, context::RequestContextMiddlewareFactory, database::Database, models, routes,
    telemetry,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    telemetry::init_tracing();

    let config = Config::from_env().map_err(io::Error::other)?;
    let db = Database::connect(&config).await.map_err(io::Error::other)?;
    models::init(&db).await.map_err(io::Error::other)?;

    tracing::info!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        static_dir = %config.static_dir.display(),
        "starting server"
    );

    let bind = (config.host.clone(), config.port);
    let config = web::Data::new(config);
    let db = web::Data::new(db);

    HttpServer::new(move || {
        App::new()
            .app_data(db.clone())
            .app_data(config.clone())
            .wrap(RequestContextMiddlewareFactory)
            .wrap(Logger::default())
            .configure(routes::configure)
    })
    .bind(bind)?
    .run()
    .await
}
