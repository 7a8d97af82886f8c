use super::entry::{ENTRY_HEADER_LEN, EntryHeader, StatusFlag};
use super::header::{HEADER_LEN, Header};
use super::meta::MetaRecord;
use crate::error::{ChunkpackError, Result};
use crate::pool::{Job, JobStatus};
use crate::util::io::CountingWriter;
use std::io::Write;

/// Serializes finished jobs into the container and the metadata index side by
/// side. Jobs must arrive in ascending id order.
pub struct ContainerWriter<C: Write, M: Write> {
    container: CountingWriter<C>,
    meta: CountingWriter<M>,
    header: Header,
    next_id: u64,
    expected_container: u64,
    expected_meta: u64,
    orig_total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub container_bytes: u64,
    pub meta_bytes: u64,
}

impl<C: Write, M: Write> ContainerWriter<C, M> {
    pub fn new(container: C, meta: M, header: Header) -> Result<Self> {
        header.validate()?;
        let mut container = CountingWriter::new(container);
        header.write_to(&mut container)?;
        Ok(Self {
            container,
            meta: CountingWriter::new(meta),
            header,
            next_id: 0,
            expected_container: HEADER_LEN,
            expected_meta: 0,
            orig_total: 0,
        })
    }

    pub fn write_job(&mut self, job: &Job) -> Result<()> {
        if job.id != self.next_id {
            return Err(ChunkpackError::Format(format!(
                "job {} written out of order (expected {})",
                job.id, self.next_id
            )));
        }
        let unfinished = || ChunkpackError::Format(format!("chunk {} was never processed", job.id));
        let status = match job.status {
            JobStatus::Pending => return Err(unfinished()),
            JobStatus::Compressed => StatusFlag::Compressed,
            JobStatus::StoredRaw | JobStatus::Failed => StatusFlag::Raw,
        };
        let digest = job.digest.ok_or_else(unfinished)?;
        let bytes = job.stored_bytes().ok_or_else(unfinished)?;
        let stored_size = bytes.len() as u64;
        if status == StatusFlag::Raw && stored_size != job.orig_size {
            return Err(ChunkpackError::Format(format!(
                "chunk {}: raw payload is {stored_size} bytes, expected {}",
                job.id, job.orig_size
            )));
        }

        EntryHeader {
            status,
            orig_size: job.orig_size,
            stored_size,
        }
        .write_to(&mut self.container)?;
        self.container.write_all(bytes)?;

        let rec = MetaRecord {
            id: job.id,
            orig_size: job.orig_size,
            stored_size,
            digest,
        };
        rec.write_to(&mut self.meta)?;

        self.expected_container += ENTRY_HEADER_LEN + stored_size;
        self.expected_meta += rec.line_len();
        self.orig_total += job.orig_size;
        self.next_id += 1;
        Ok(())
    }

    /// Flush both sinks and check that everything the header promised was written.
    pub fn finish(mut self) -> Result<(C, M, WriteSummary)> {
        if self.next_id != self.header.chunk_count {
            return Err(ChunkpackError::Format(format!(
                "wrote {} of {} chunks",
                self.next_id, self.header.chunk_count
            )));
        }
        if self.orig_total != self.header.total_size {
            return Err(ChunkpackError::Format(format!(
                "chunk sizes sum to {}, header says {}",
                self.orig_total, self.header.total_size
            )));
        }
        self.container.flush()?;
        self.meta.flush()?;
        check_written("container", self.expected_container, self.container.count())?;
        check_written("metadata index", self.expected_meta, self.meta.count())?;
        let summary = WriteSummary {
            container_bytes: self.container.count(),
            meta_bytes: self.meta.count(),
        };
        Ok((self.container.into_inner(), self.meta.into_inner(), summary))
    }
}

pub fn check_written(what: &str, expected: u64, actual: u64) -> Result<()> {
    if expected != actual {
        return Err(ChunkpackError::ShortWrite {
            what: what.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}
