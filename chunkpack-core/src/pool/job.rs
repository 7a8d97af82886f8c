use crate::hash::{Digest, DigestPath};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    Compressed,
    StoredRaw,
    /// Allocation failed; the raw bytes are still held and get stored verbatim.
    Failed,
}

/// One chunk's work record.
#[derive(Debug)]
pub struct Job {
    pub id: u64,
    pub orig_size: u64,
    /// Released once a compressed payload exists.
    pub raw: Option<Vec<u8>>,
    pub digest: Option<Digest>,
    pub digest_path: Option<DigestPath>,
    pub compressed: Option<Vec<u8>>,
    pub compressed_size: u64,
    pub status: JobStatus,
}

impl Job {
    pub fn new(id: u64, raw: Vec<u8>) -> Self {
        Self {
            id,
            orig_size: raw.len() as u64,
            raw: Some(raw),
            digest: None,
            digest_path: None,
            compressed: None,
            compressed_size: 0,
            status: JobStatus::Pending,
        }
    }

    /// Whether the container entry holds the original bytes.
    pub fn is_raw(&self) -> bool {
        matches!(self.status, JobStatus::StoredRaw | JobStatus::Failed)
    }

    /// Bytes that go into the container for this job, per its status.
    pub fn stored_bytes(&self) -> Option<&[u8]> {
        match self.status {
            JobStatus::Pending => None,
            JobStatus::Compressed => self.compressed.as_deref(),
            JobStatus::StoredRaw | JobStatus::Failed => self.raw.as_deref(),
        }
    }

    pub fn stored_size(&self) -> u64 {
        match self.status {
            JobStatus::Compressed => self.compressed_size,
            _ => self.orig_size,
        }
    }
}
