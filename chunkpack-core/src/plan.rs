use crate::error::{ChunkpackError, Result};

pub const KIB: u64 = 1024;
pub const MIB: u64 = 1024 * KIB;
pub const GIB: u64 = 1024 * MIB;

/// (largest file size in the tier, chunk size used for it)
const TIERS: [(u64, u64); 3] = [(8 * MIB, MIB), (128 * MIB, 4 * MIB), (GIB, 16 * MIB)];
const LARGEST_CHUNK: u64 = 64 * MIB;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    pub total_size: u64,
    pub chunk_size: u64,
    pub chunk_count: u64,
}

impl ChunkPlan {
    /// Size of chunk `id`; only the last chunk may be short.
    pub fn chunk_len(&self, id: u64) -> u64 {
        let start = id * self.chunk_size;
        self.chunk_size.min(self.total_size.saturating_sub(start))
    }
}

pub fn tiered_chunk_size(total_size: u64) -> u64 {
    TIERS
        .iter()
        .find(|(limit, _)| total_size <= *limit)
        .map(|&(_, size)| size)
        .unwrap_or(LARGEST_CHUNK)
}

/// Pick a chunk size and derive the chunk count for a file of `total_size` bytes.
pub fn plan(total_size: u64, chunk_size_override: Option<u64>) -> Result<ChunkPlan> {
    if total_size == 0 {
        return Err(ChunkpackError::EmptyInput);
    }
    let chunk_size = match chunk_size_override {
        Some(0) => return Err(ChunkpackError::Format("chunk size must be non-zero".into())),
        Some(n) => n,
        None => tiered_chunk_size(total_size),
    };
    Ok(ChunkPlan {
        total_size,
        chunk_size,
        chunk_count: total_size.div_ceil(chunk_size),
    })
}
