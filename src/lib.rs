pub mod application;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{guard, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::{OrderQueries, OrderService};
use auth::TokenIssuer;
use domain::ports::OrderStore;
use errors::AppError;
use handlers::health::route_not_found;
use infrastructure::DieselOrderStore;

pub use config::Config;
pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    log::info!("Applied {} pending migration(s)", applied.len());
    Ok(())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::auth::login,
        handlers::orders::create_order,
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::update_order,
        handlers::orders::delete_order,
    ),
    tags(
        (name = "orders", description = "Orders and their line items"),
        (name = "auth", description = "Token issuing"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

/// Registers every route. Expects `OrderService`, `OrderQueries` and
/// `TokenIssuer` in app data.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .route("/", web::get().to(handlers::health::health))
    .service(web::scope("/auth").route("/login", web::post().to(handlers::auth::login)))
    .service(
        web::scope("/order")
            .route("", web::post().to(handlers::orders::create_order))
            // Must precede "/{order_id}". The guard lets PUT and DELETE on
            // "/order/list" fall through to the order whose id is "list".
            .service(
                web::resource("/list")
                    .guard(guard::Get())
                    .to(handlers::orders::list_orders),
            )
            .service(
                web::resource("/{order_id}")
                    .route(web::get().to(handlers::orders::get_order))
                    .route(web::put().to(handlers::orders::update_order))
                    .route(web::delete().to(handlers::orders::delete_order)),
            ),
    )
    .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));
}

/// Cross-origin access from any origin, without credentials.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

/// Hardening headers added to every response.
pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "SAMEORIGIN"))
        .add(("X-DNS-Prefetch-Control", "off"))
        .add(("X-Download-Options", "noopen"))
        .add(("X-Permitted-Cross-Domain-Policies", "none"))
        .add(("X-XSS-Protection", "0"))
        .add(("Referrer-Policy", "no-referrer"))
        .add(("Strict-Transport-Security", "max-age=15552000; includeSubDomains"))
        .add(("Cross-Origin-Opener-Policy", "same-origin"))
        .add(("Cross-Origin-Resource-Policy", "same-origin"))
        .add(("Origin-Agent-Cluster", "?1"))
}

/// Build and return an actix-web `Server` bound to the configured address.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(pool: DbPool, config: &Config) -> std::io::Result<actix_web::dev::Server> {
    let store: Arc<dyn OrderStore> = Arc::new(DieselOrderStore::new(pool));
    let orders = web::Data::new(OrderService::new(store.clone()));
    let queries = web::Data::new(OrderQueries::new(store));
    let tokens = web::Data::new(TokenIssuer::new(config.auth.clone()));

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(orders.clone())
            .app_data(queries.clone())
            .app_data(tokens.clone())
            .wrap(security_headers())
            .wrap(cors())
            .wrap(Logger::default())
            .configure(routes)
            .default_service(web::to(route_not_found))
    })
    .bind((config.host.clone(), config.port))?
    .run())
}
