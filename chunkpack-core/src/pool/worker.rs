use super::job::{Job, JobStatus};
use super::queue::JobQueue;
use crate::codec::Compressor;
use crate::error::{ChunkpackError, Result};
use crate::integrity::IntegrityVerifier;
use std::thread;

/// Fixed set of threads draining one `JobQueue`. Threads live for a single
/// `run` call; returning from `run` is the barrier.
pub struct WorkerPool<'a> {
    threads: usize,
    compressor: &'a dyn Compressor,
    verifier: &'a IntegrityVerifier,
    level: i32,
}

#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Jobs claimed by each worker, indexed by worker number.
    pub claimed: Vec<usize>,
}

impl PoolStats {
    pub fn total_claimed(&self) -> usize {
        self.claimed.iter().sum()
    }
}

impl<'a> WorkerPool<'a> {
    pub fn new(
        threads: usize,
        compressor: &'a dyn Compressor,
        verifier: &'a IntegrityVerifier,
        level: i32,
    ) -> Self {
        Self {
            threads: threads.max(1),
            compressor,
            verifier,
            level,
        }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn run(&self, queue: &JobQueue) -> Result<PoolStats> {
        if queue.is_empty() {
            return Ok(PoolStats::default());
        }
        let workers = self.threads.min(queue.len());
        thread::scope(|s| -> Result<PoolStats> {
            let mut handles = Vec::with_capacity(workers);
            let mut spawn_err = None;
            for w in 0..workers {
                match thread::Builder::new()
                    .name(format!("chunkpack-worker-{w}"))
                    .spawn_scoped(s, move || self.worker_loop(w, queue))
                {
                    Ok(h) => handles.push(h),
                    Err(e) => {
                        spawn_err = Some(e);
                        break;
                    }
                }
            }

            // Join every worker before reporting any error.
            let joined: Vec<_> = handles.into_iter().map(|h| h.join()).collect();
            if let Some(e) = spawn_err {
                return Err(e.into());
            }
            let mut claimed = Vec::with_capacity(workers);
            for r in joined {
                claimed.push(r.map_err(|_| ChunkpackError::WorkerPanicked)?);
            }
            Ok(PoolStats { claimed })
        })
    }

    fn worker_loop(&self, worker: usize, queue: &JobQueue) -> usize {
        let mut n = 0;
        while let Some(handle) = queue.pop_next() {
            handle.with(|job| process_job(job, self.compressor, self.verifier, self.level));
            n += 1;
        }
        tracing::trace!(worker, jobs = n, "worker done");
        n
    }
}

/// Digest, then compress one job in place. Never loses the chunk's bytes:
/// anything short of a successful compression leaves `raw` in the job.
pub fn process_job(
    job: &mut Job,
    compressor: &dyn Compressor,
    verifier: &IntegrityVerifier,
    level: i32,
) {
    if job.status != JobStatus::Pending {
        return;
    }
    let Some(raw) = job.raw.as_deref() else {
        return;
    };

    let (digest, path) = verifier.record(raw);
    job.digest = Some(digest);
    job.digest_path = Some(path);

    let bound = compressor.compress_bound(raw.len());
    let mut dst: Vec<u8> = Vec::new();
    if dst.try_reserve_exact(bound).is_err() {
        let err = ChunkpackError::AllocationFailure {
            id: job.id,
            bytes: bound,
        };
        tracing::warn!(%err, "storing chunk raw");
        job.status = JobStatus::Failed;
        return;
    }
    dst.resize(bound, 0);

    match compressor.compress(raw, &mut dst, level) {
        Ok(n) => {
            dst.truncate(n);
            dst.shrink_to_fit();
            job.compressed_size = n as u64;
            job.compressed = Some(dst);
            job.raw = None;
            job.status = JobStatus::Compressed;
            tracing::debug!(id = job.id, orig = job.orig_size, stored = n, "chunk compressed");
        }
        Err(e) => {
            let err = ChunkpackError::CompressionFailure {
                id: job.id,
                reason: e.to_string(),
            };
            tracing::warn!(%err, "storing chunk raw");
            job.compressed = None;
            job.compressed_size = job.orig_size;
            job.status = JobStatus::StoredRaw;
        }
    }
}
