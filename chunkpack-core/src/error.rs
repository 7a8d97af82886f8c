use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChunkpackError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("input is empty; refusing to write a zero-chunk container")]
    EmptyInput,

    #[error("chunk {id}: could not allocate {bytes} bytes")]
    AllocationFailure { id: u64, bytes: usize },

    /// Only ever logged; the worker downgrades it to a raw-store outcome.
    #[error("chunk {id}: compression failed: {reason}")]
    CompressionFailure { id: u64, reason: String },

    #[error("chunk {id}: {field} mismatch (container={container}, index={index})")]
    IndexMismatch {
        id: u64,
        field: &'static str,
        container: u64,
        index: u64,
    },

    #[error("chunk {id}: corrupt payload: {reason}")]
    CorruptChunk { id: u64, reason: String },

    #[error("chunk {id}: digest mismatch (expected {expected}, actual {actual})")]
    IntegrityFailure {
        id: u64,
        expected: String,
        actual: String,
    },

    #[error("short read on {what}: expected {expected} bytes, got {actual}")]
    ShortRead {
        what: String,
        expected: u64,
        actual: u64,
    },

    #[error("short write on {what}: expected {expected} bytes, wrote {actual}")]
    ShortWrite {
        what: String,
        expected: u64,
        actual: u64,
    },

    #[error("a worker thread panicked")]
    WorkerPanicked,
}

impl ChunkpackError {
    /// Process exit code for this error class. Never 0.
    pub fn exit_code(&self) -> u8 {
        match self {
            ChunkpackError::Io(_) => 1,
            ChunkpackError::Format(_) => 2,
            ChunkpackError::EmptyInput => 3,
            ChunkpackError::AllocationFailure { .. } => 4,
            ChunkpackError::CompressionFailure { .. } => 5,
            ChunkpackError::IndexMismatch { .. } => 6,
            ChunkpackError::CorruptChunk { .. } => 7,
            ChunkpackError::IntegrityFailure { .. } => 8,
            ChunkpackError::ShortRead { .. } => 9,
            ChunkpackError::ShortWrite { .. } => 10,
            ChunkpackError::WorkerPanicked => 11,
        }
    }

    /// Chunk id the error refers to, when it is chunk-scoped.
    pub fn chunk_id(&self) -> Option<u64> {
        match self {
            ChunkpackError::AllocationFailure { id, .. }
            | ChunkpackError::CompressionFailure { id, .. }
            | ChunkpackError::IndexMismatch { id, .. }
            | ChunkpackError::CorruptChunk { id, .. }
            | ChunkpackError::IntegrityFailure { id, .. } => Some(*id),
            _ => None,
        }
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, ChunkpackError>;
