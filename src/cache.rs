use std::fmt::Display;
use std::sync::RwLock;

use redis::{Client, Commands, ConnectionLike, RedisError};

type Pool = r2d2::Pool<Client>;
type CacheConnection = r2d2::PooledConnection<Client>;

const TTL_SECONDS: usize = 3600;

lazy_static! {
    static ref POOL: RwLock<Option<Pool>> = RwLock::new(None);
    static ref REDIS_URL: RwLock<Option<String>> = RwLock::new(None);
}

pub trait Cache {
    fn cache_key<T: Display>(id: T) -> String;
}

/// Connect the cache. When this fails, or is never called, every lookup
/// misses and every write is skipped, the service keeps running off the
/// repositories alone.
pub fn init(redis_url: &str) -> Result<(), anyhow::Error> {
    info!("initializing redis cache");

    let client = Client::open(redis_url)?;
    let pool = Pool::new(client)?;

    let mut conn = pool.get()?;
    if !conn.check_connection() {
        anyhow::bail!("redis connection check failed");
    }

    if let Ok(mut guard) = REDIS_URL.write() {
        *guard = Some(redis_url.to_string());
    }
    if let Ok(mut guard) = POOL.write() {
        *guard = Some(pool);
    }

    Ok(())
}

fn connection() -> Option<CacheConnection> {
    let pool = {
        let guard = POOL.read().ok()?;
        guard.as_ref()?.clone()
    };

    match pool.get() {
        Ok(conn) => Some(conn),
        Err(e) => {
            warn!("unable to fetch redis connection: {}", e);
            None
        }
    }
}

pub fn find<T: serde::de::DeserializeOwned + Cache, I: Display>(id: I) -> Option<T> {
    let cache_key: String = T::cache_key(id);
    let mut cache = connection()?;

    let res: Vec<u8> = match cache.get(&cache_key) {
        Ok(res) => res,
        Err(e) => {
            warn!("cache lookup for {} failed: {}", cache_key, e);
            return None;
        }
    };

    match serde_json::from_slice::<T>(&res).ok() {
        Some(res) => {
            debug!("found {} in cache", cache_key);
            Some(res)
        }
        None => None,
    }
}

pub fn set<T: serde::Serialize + Cache, I: Display>(arg: &T, id: I) {
    let cache_key: String = T::cache_key(id);
    let mut cache = match connection() {
        Some(cache) => cache,
        None => return,
    };

    if let Ok(res) = serde_json::to_vec(arg) {
        let result: Result<(), RedisError> = cache.set_ex(&cache_key, res, TTL_SECONDS);
        if let Err(e) = result {
            warn!("unable to cache {}: {}", cache_key, e);
        }
    }
}

pub fn delete(cache_key: String) {
    if let Some(mut cache) = connection() {
        let result: Result<(), RedisError> = cache.del(&cache_key);
        if let Err(e) = result {
            warn!("unable to evict {} from the cache: {}", cache_key, e);
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CacheStatus {
    pub enabled: bool,
    pub healthy: bool,
}

pub fn status() -> CacheStatus {
    let enabled = POOL.read().map(|guard| guard.is_some()).unwrap_or(false);

    let healthy = match connection() {
        Some(mut conn) => conn.check_connection(),
        None => false,
    };

    CacheStatus { enabled, healthy }
}

/// Drop the pool so reads miss and writes are skipped until [`enable`].
pub fn disable() {
    info!("disabling the redis cache");

    if let Ok(mut guard) = POOL.write() {
        *guard = None;
    }
}

/// Reconnect with the url the cache was originally initialized with.
pub fn enable() -> Result<(), anyhow::Error> {
    let redis_url = REDIS_URL.read().ok().and_then(|guard| guard.clone());

    match redis_url {
        Some(redis_url) => init(&redis_url),
        None => anyhow::bail!("REDIS_URL was never configured"),
    }
}
