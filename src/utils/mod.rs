pub mod db_utils;
pub mod worker_cache;
