pub mod job;
pub mod queue;
pub mod worker;

pub use job::{Job, JobStatus};
pub use queue::{JobHandle, JobQueue};
pub use worker::{PoolStats, WorkerPool, process_job};
