//! The fixed set of render threads and how a frame is divided between them.

use std::ops::Range;

use log::info;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::Result;

/// Split `[0, width)` into `workers` contiguous, non-overlapping ranges.
/// Worker `k` gets `[k * width / workers, (k + 1) * width / workers)`, so the
/// ranges always cover every column exactly once (some may be empty when
/// there are more workers than columns).
pub fn partition_columns(width: usize, workers: usize) -> Vec<Range<usize>> {
    assert!(workers > 0, "need at least one worker");
    (0..workers)
        .map(|k| k * width / workers..(k + 1) * width / workers)
        .collect()
}

/// A pool of long-lived threads, created once and reused every frame.
pub struct WorkerPool {
    pool: ThreadPool,
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Result<Self> {
        let workers = workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("render-worker-{i}"))
            .build()?;
        info!("Started {workers} render workers");
        Ok(Self { pool, workers })
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Hand each item to a worker and block until every one has finished.
    /// A panic in any task is re-raised here once the rest are done.
    pub fn run<T, F>(&self, items: Vec<T>, work: F)
    where
        T: Send,
        F: Fn(usize, T) + Sync,
    {
        let work = &work;
        self.pool.scope(|scope| {
            for (index, item) in items.into_iter().enumerate() {
                scope.spawn(move |_| work(index, item));
            }
        });
    }
}
