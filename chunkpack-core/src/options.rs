use crate::codec::CodecId;
use serde::{Deserialize, Serialize};

/// Lowest accepted compression effort.
pub const MIN_LEVEL: i32 = 1;
/// Highest accepted compression effort. zstd's ultra levels (20..=22) are excluded.
pub const MAX_LEVEL: i32 = 19;
pub const DEFAULT_LEVEL: i32 = 3;
/// Upper bound on worker threads regardless of core count.
pub const MAX_THREADS: usize = 64;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EncodeOptions {
    /// Explicit chunk size; `None` picks one from the size tiers.
    pub chunk_size: Option<u64>,
    pub level: i32,
    /// Worker count; `None` uses the available parallelism.
    pub threads: Option<usize>,
    pub codec: CodecId,
    /// Try the rayon-parallel digest before the single-threaded one.
    pub accelerated_digest: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            chunk_size: None,
            level: DEFAULT_LEVEL,
            threads: None,
            codec: CodecId::Zstd,
            accelerated_digest: true,
        }
    }
}

impl EncodeOptions {
    pub fn effective_level(&self) -> i32 {
        self.level.clamp(MIN_LEVEL, MAX_LEVEL)
    }

    pub fn effective_threads(&self) -> usize {
        let n = match self.threads {
            Some(n) => n,
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        };
        n.clamp(1, MAX_THREADS)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DecodeOptions {
    pub accelerated_digest: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            accelerated_digest: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_is_capped() {
        let mut o = EncodeOptions::default();
        o.level = 22;
        assert_eq!(o.effective_level(), MAX_LEVEL);
        o.level = -5;
        assert_eq!(o.effective_level(), MIN_LEVEL);
        o.level = 7;
        assert_eq!(o.effective_level(), 7);
    }

    #[test]
    fn threads_are_bounded() {
        let mut o = EncodeOptions::default();
        o.threads = Some(0);
        assert_eq!(o.effective_threads(), 1);
        o.threads = Some(10_000);
        assert_eq!(o.effective_threads(), MAX_THREADS);
        o.threads = None;
        let n = o.effective_threads();
        assert!((1..=MAX_THREADS).contains(&n));
    }
}
