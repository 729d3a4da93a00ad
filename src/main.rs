#![warn(rust_2018_idioms)]

#[macro_use]
extern crate diesel;

#[macro_use]
extern crate diesel_migrations;

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate log;

#[macro_use]
extern crate serde_derive;

use tracing_subscriber::prelude::*;

use anyhow::Error;
use dotenv::dotenv;

#[macro_use]
mod macros;

mod admin;
mod auth;
mod availability;
mod bookings;
mod cache;
mod config;
mod db;
mod errors;
mod grounds;
mod schema;
mod server;
mod slots;
mod stats;
mod storage;
mod validator;

#[actix_web::main]
async fn main() -> anyhow::Result<(), Error> {
    init().await?;

    Ok(())
}

async fn init() -> anyhow::Result<(), Error> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .expect("unable to initialize the tracing subscriber");

    let _sentry = config::Config::sentry_dsn().map(sentry::init);

    db::migrate(config::Config::database_url())?;
    let pool = db::build_connection_pool(config::Config::database_url())?;

    match config::Config::redis_url() {
        Some(redis_url) => {
            if let Err(e) = cache::init(redis_url) {
                warn!("unable to initialize the redis cache: {}", e);
            }
        }
        None => info!("REDIS_URL not set, ground caching is disabled"),
    }

    debug!("launching the actix webserver");
    server::launch(pool).await?;

    Ok(())
}
