use std::env;
use dotenvy::dotenv;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,

    // Worker directory cache
    pub worker_cache_capacity: u64,
    pub worker_cache_ttl_secs: u64,
    pub cache_warmup_batch: usize,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://farmstaff.db".to_string()),

            worker_cache_capacity: env::var("WORKER_CACHE_CAPACITY")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .unwrap(),
            worker_cache_ttl_secs: env::var("WORKER_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "300".to_string()) // default 5 min
                .parse()
                .unwrap(),
            cache_warmup_batch: env::var("CACHE_WARMUP_BATCH")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),
        }
    }
}
