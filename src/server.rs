use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{get, middleware, web, App, HttpRequest, HttpResponse, HttpServer};

use crate::admin;
use crate::availability::AvailabilityResolver;
use crate::bookings;
use crate::bookings::ledger::BookingLedger;
use crate::config::Config;
use crate::db;
use crate::errors::ServiceError;
use crate::grounds;
use crate::grounds::store::GroundStore;
use crate::slots;
use crate::slots::blackouts::BlackoutRegistry;
use crate::slots::store::SlotTemplateStore;
use crate::stats;
use crate::storage::postgres::PgStore;

pub type Response = Result<HttpResponse, ServiceError>;

/// Everything the handlers need, wired once at startup. The components
/// all point at the same postgres-backed repository.
pub struct State {
    pub pool: db::Pool,
    pub grounds: GroundStore,
    pub slots: SlotTemplateStore,
    pub blackouts: BlackoutRegistry,
    pub ledger: BookingLedger,
    pub resolver: AvailabilityResolver,
}

impl State {
    pub fn new(pool: db::Pool) -> State {
        let store = Arc::new(PgStore::new(pool.clone()));

        let grounds = GroundStore::new(store.clone());
        let slots = SlotTemplateStore::new(store.clone());
        let blackouts = BlackoutRegistry::new(store.clone());
        let ledger = BookingLedger::new(store.clone(), store.clone(), store);
        let resolver = AvailabilityResolver::new(slots.clone(), blackouts.clone(), ledger.clone());

        State {
            pool,
            grounds,
            slots,
            blackouts,
            ledger,
            resolver,
        }
    }
}

#[get("/health")]
async fn health(_: HttpRequest) -> &'static str {
    "ok"
}

pub async fn launch(pool: db::Pool) -> std::io::Result<()> {
    let state = web::Data::new(State::new(pool));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::DefaultHeaders::new().header("X-Version", env!("CARGO_PKG_VERSION")))
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::default())
            .wrap(stats::Middleware::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_header()
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
                    .max_age(3600),
            )
            .data(web::JsonConfig::default().limit(262_144))
            .data(web::PayloadConfig::default().limit(262_144))
            .service(
                web::scope("/api")
                    .configure(grounds::routes::register)
                    .configure(slots::routes::register)
                    .configure(bookings::routes::register)
                    .service(stats::route)
                    .service(health),
            )
            .configure(admin::routes::register)
    })
    .bind(format!("{}:{}", Config::api_host(), Config::api_port()))?
    .run()
    .await
}
