use actix_web::{get, post, web};

use crate::auth;
use crate::auth::{Permission, Principal};
use crate::server::Response;

#[get("/admin/server/stats")]
async fn server_stats(principal: Principal) -> Response {
    auth::require(&principal, Permission::ViewAdminStats, None)?;

    http_ok_json!(crate::stats::Stats::load());
}

#[get("/admin/server/cache")]
async fn cache_status(principal: Principal) -> Response {
    auth::require(&principal, Permission::ManagePlatformSettings, None)?;

    http_ok_json!(crate::cache::status());
}

#[post("/admin/server/cache/disable")]
async fn disable_cache(principal: Principal) -> Response {
    auth::require(&principal, Permission::ManagePlatformSettings, None)?;

    crate::cache::disable();

    http_ok_json!(crate::cache::status());
}

#[post("/admin/server/cache/enable")]
async fn enable_cache(principal: Principal) -> Response {
    auth::require(&principal, Permission::ManagePlatformSettings, None)?;

    if let Err(e) = crate::cache::enable() {
        warn!("unable to re-enable the cache: {}", e);
    }

    http_ok_json!(crate::cache::status());
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(server_stats);
    cfg.service(cache_status);
    cfg.service(disable_cache);
    cfg.service(enable_cache);
}
