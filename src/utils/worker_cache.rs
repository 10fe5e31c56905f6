use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use sqlx::SqlitePool;
use std::time::Duration;

use crate::model::worker::{LifecycleStatus, Worker};

/// Read-through cache in front of the worker directory table.
///
/// Constructed once at startup and shared through `web::Data`; handlers
/// that mutate the directory must `invalidate` (or `insert`) so reads
/// never serve a stale profile past the TTL window.
#[derive(Clone)]
pub struct WorkerCache {
    inner: Cache<i64, Worker>,
}

impl WorkerCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        WorkerCache { inner }
    }

    /// Fetch a worker profile, hitting the directory table only on a miss.
    pub async fn get(
        &self,
        pool: &SqlitePool,
        worker_id: i64,
    ) -> Result<Option<Worker>, sqlx::Error> {
        if let Some(worker) = self.inner.get(&worker_id).await {
            return Ok(Some(worker));
        }

        let worker = sqlx::query_as::<_, Worker>("SELECT * FROM workers WHERE id = ?")
            .bind(worker_id)
            .fetch_optional(pool)
            .await?;

        if let Some(ref found) = worker {
            self.inner.insert(worker_id, found.clone()).await;
        }
        Ok(worker)
    }

    /// Put a fresh profile in place, e.g. right after a create.
    pub async fn insert(&self, worker: Worker) {
        self.inner.insert(worker.id, worker).await;
    }

    /// Drop a profile after an update or delete.
    pub async fn invalidate(&self, worker_id: i64) {
        self.inner.invalidate(&worker_id).await;
    }
}

/// Batch insert a chunk of profiles concurrently.
async fn batch_insert(cache: &WorkerCache, batch: &mut Vec<Worker>) {
    let futures: Vec<_> = batch.drain(..).map(|worker| cache.insert(worker)).collect();

    // Await all insertions concurrently
    futures::future::join_all(futures).await;
}

/// Load all active workers into the cache at startup (batched).
pub async fn warmup_worker_cache(
    pool: &SqlitePool,
    cache: &WorkerCache,
    batch_size: usize,
) -> Result<()> {
    let mut stream = sqlx::query_as::<_, Worker>(
        r#"
        SELECT *
        FROM workers
        WHERE status = ?
        ORDER BY id
        "#,
    )
    .bind(LifecycleStatus::Active)
    .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total_count = 0usize;

    while let Some(row) = stream.next().await {
        let worker = row?;
        batch.push(worker);
        total_count += 1;

        if batch.len() >= batch_size {
            batch_insert(cache, &mut batch).await;
        }
    }

    // Insert any remaining profiles
    if !batch.is_empty() {
        batch_insert(cache, &mut batch).await;
    }

    log::info!("Worker cache warmup complete: {} active workers", total_count);

    Ok(())
}
