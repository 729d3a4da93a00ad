use std::pin::Pin;
use std::sync::atomic::{AtomicU32, Ordering};
use std::task::{Context, Poll};

use actix_service::{Service, Transform};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::web::Data;
use actix_web::{get, web, Error};
use futures::future::{ok, Ready};
use futures::Future;

use crate::server::{Response, State};

lazy_static! {
    static ref STATS: Stats = Stats::new();
}

/// Process-wide request counters. Plain atomics, the middleware bumps
/// them on every request without any coordination.
pub struct Stats {
    requests: AtomicU32,
    errors: AtomicU32,
}

impl Stats {
    fn new() -> Stats {
        Stats {
            requests: AtomicU32::new(0u32),
            errors: AtomicU32::new(0u32),
        }
    }

    pub fn record_request() {
        STATS.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error() {
        STATS.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests() -> u32 {
        STATS.requests.load(Ordering::Relaxed)
    }

    pub fn errors() -> u32 {
        STATS.errors.load(Ordering::Relaxed)
    }

    pub fn load() -> Snapshot {
        Snapshot {
            requests: Stats::requests(),
            errors: Stats::errors(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub requests: u32,
    pub errors: u32,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub requests: u32,
    pub errors: u32,
    pub active_bookings: i64,
    pub active_db_connections: u32,
    pub idle_db_connections: u32,
}

#[get("/stats")]
pub async fn route(state: Data<State>) -> Response {
    let state = state.into_inner();
    let pool_state = state.pool.state();

    let ledger = state.ledger.clone();
    let active_bookings = web::block(move || ledger.count_active()).await?;

    http_ok_json!(StatsResponse {
        requests: Stats::requests(),
        errors: Stats::errors(),
        active_bookings,
        active_db_connections: pool_state.connections,
        idle_db_connections: pool_state.idle_connections,
    });
}

pub struct Middleware;

impl Middleware {
    pub fn default() -> Middleware {
        Middleware
    }
}

impl<S, B> Transform<S> for Middleware
where
    S: Service<Request = ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Request = ServiceRequest;
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestCountMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RequestCountMiddleware { service })
    }
}

pub struct RequestCountMiddleware<S> {
    service: S,
}

impl<S, B> Service for RequestCountMiddleware<S>
where
    S: Service<Request = ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Request = ServiceRequest;
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: ServiceRequest) -> Self::Future {
        Stats::record_request();

        let fut = self.service.call(request);

        Box::pin(async move {
            let res = fut.await?;

            if res.response().status().is_server_error() {
                Stats::record_error();
            }

            Ok(res)
        })
    }
}
