pub mod application;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use db::{create_pool, DbPool};
pub use infrastructure::paystack::GatewayConfig;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::listings::create_listing,
        handlers::listings::list_listings,
        handlers::listings::get_listing,
        handlers::listings::quote_listing,
        handlers::listings::list_refund_policies,
        handlers::bookings::create_booking,
        handlers::bookings::get_booking,
        handlers::payments::initialize_payment,
        handlers::payments::confirm_payment,
        handlers::payments::get_receipt,
    ),
    tags(
        (name = "listings", description = "Listing catalogue and stay pricing"),
        (name = "bookings", description = "Booking lifecycle"),
        (name = "payments", description = "Payment capture and receipts"),
    )
)]
struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    gateway: GatewayConfig,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(gateway.clone()))
            .wrap(Logger::default())
            .service(
                web::scope("/listings")
                    .service(
                        web::resource("")
                            .route(web::post().to(handlers::listings::create_listing))
                            .route(web::get().to(handlers::listings::list_listings)),
                    )
                    .route("/{id}", web::get().to(handlers::listings::get_listing))
                    .route("/{id}/quote", web::get().to(handlers::listings::quote_listing)),
            )
            .route(
                "/refund-policies",
                web::get().to(handlers::listings::list_refund_policies),
            )
            .service(
                web::scope("/bookings")
                    .route("", web::post().to(handlers::bookings::create_booking))
                    .route("/{id}", web::get().to(handlers::bookings::get_booking))
                    .route("/{id}/receipt", web::get().to(handlers::payments::get_receipt)),
            )
            .service(
                web::scope("/payments")
                    .route(
                        "/initialize",
                        web::post().to(handlers::payments::initialize_payment),
                    )
                    .route("/confirm", web::post().to(handlers::payments::confirm_payment)),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
