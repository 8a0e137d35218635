use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use sqlx::PgPool;

use todovault::auth::AuthGuard;
use todovault::config::Config;
use todovault::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    log::info!("Starting todovault server at {}", config.server_url());

    let bind_addr = (config.server_host.clone(), config.server_port);
    let app_config = web::Data::new(config);
    let app_pool = web::Data::new(pool);

    HttpServer::new(move || {
        App::new()
            .app_data(app_pool.clone())
            .app_data(app_config.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    // Browsers must be able to read the x-auth response header.
                    .expose_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(routes::health::health)
            .service(web::scope("").wrap(AuthGuard).configure(routes::config))
    })
    .bind(bind_addr)?
    .run()
    .await
}
