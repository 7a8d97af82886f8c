use super::{Digest, DigestBackend};

/// Below this size the rayon split costs more than it saves.
pub const PARALLEL_MIN_LEN: usize = 128 * 1024;

#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Standard;

impl Blake3Standard {
    pub fn hash(&self, data: &[u8]) -> Digest {
        Digest(*blake3::hash(data).as_bytes())
    }
}

impl DigestBackend for Blake3Standard {
    fn name(&self) -> &'static str {
        "blake3"
    }

    fn digest(&self, data: &[u8]) -> Option<Digest> {
        Some(self.hash(data))
    }
}

/// BLAKE3 spread over the global rayon pool.
#[derive(Debug, Clone, Copy)]
pub struct Blake3Parallel {
    pub min_len: usize,
}

impl Default for Blake3Parallel {
    fn default() -> Self {
        Self {
            min_len: PARALLEL_MIN_LEN,
        }
    }
}

impl DigestBackend for Blake3Parallel {
    fn name(&self) -> &'static str {
        "blake3-rayon"
    }

    fn probe(&self) -> bool {
        rayon::current_num_threads() > 1
    }

    fn digest(&self, data: &[u8]) -> Option<Digest> {
        if data.len() < self.min_len {
            return None;
        }
        let mut hasher = blake3::Hasher::new();
        hasher.update_rayon(data);
        Some(Digest(*hasher.finalize().as_bytes()))
    }
}
