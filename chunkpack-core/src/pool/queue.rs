use super::job::Job;
use crate::error::{ChunkpackError, Result};
use std::sync::{Mutex, PoisonError};

/// Ordered jobs behind a single claim cursor.
///
/// Each index is handed out exactly once, in ascending order. A job's slot
/// mutex is only ever locked by the worker that claimed it, so it never
/// contends; the cursor is the one shared point.
pub struct JobQueue {
    slots: Vec<Mutex<Job>>,
    next: Mutex<usize>,
}

pub struct JobHandle<'a> {
    index: usize,
    slot: &'a Mutex<Job>,
}

impl JobHandle<'_> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut Job) -> R) -> R {
        let mut job = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut job)
    }
}

impl JobQueue {
    /// `jobs[i].id` must equal `i`.
    pub fn new(jobs: Vec<Job>) -> Result<Self> {
        if let Some((i, j)) = jobs
            .iter()
            .enumerate()
            .find(|(i, j)| j.id != *i as u64)
        {
            return Err(ChunkpackError::Format(format!(
                "job at position {i} has id {}",
                j.id
            )));
        }
        Ok(Self {
            slots: jobs.into_iter().map(Mutex::new).collect(),
            next: Mutex::new(0),
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn pop_next(&self) -> Option<JobHandle<'_>> {
        let index = {
            let mut next = self.next.lock().unwrap_or_else(PoisonError::into_inner);
            if *next >= self.slots.len() {
                return None;
            }
            let i = *next;
            *next += 1;
            i
        };
        Some(JobHandle {
            index,
            slot: &self.slots[index],
        })
    }

    /// Consume the queue after all workers have joined.
    pub fn into_jobs(self) -> Result<Vec<Job>> {
        self.slots
            .into_iter()
            .map(|m| m.into_inner().map_err(|_| ChunkpackError::WorkerPanicked))
            .collect()
    }
}
