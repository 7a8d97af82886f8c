//! Sidecar metadata index: one `id orig_size stored_size digest_hex` line per
//! chunk, ascending id, one-to-one with container entries.

use super::entry::EntryHeader;
use crate::error::{ChunkpackError, Result};
use crate::hash::Digest;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetaRecord {
    pub id: u64,
    pub orig_size: u64,
    pub stored_size: u64,
    pub digest: Digest,
}

impl MetaRecord {
    pub fn write_to(&self, mut w: impl Write) -> std::io::Result<()> {
        writeln!(
            w,
            "{} {} {} {}",
            self.id,
            self.orig_size,
            self.stored_size,
            self.digest.to_hex()
        )
    }

    /// Byte length of the line `write_to` produces.
    pub fn line_len(&self) -> u64 {
        let digits = |v: u64| v.to_string().len() as u64;
        digits(self.id) + digits(self.orig_size) + digits(self.stored_size) + 3 + 64 + 1
    }

    /// Compare against the container's entry header for the same id, sizes
    /// first in `orig_size`, `stored_size` order.
    pub fn check_entry(&self, entry: &EntryHeader) -> Result<()> {
        for (field, container, index) in [
            ("orig_size", entry.orig_size, self.orig_size),
            ("stored_size", entry.stored_size, self.stored_size),
        ] {
            if container != index {
                return Err(ChunkpackError::IndexMismatch {
                    id: self.id,
                    field,
                    container,
                    index,
                });
            }
        }
        Ok(())
    }

    pub fn parse(line: &str, line_no: u64) -> Result<Self> {
        let bad = |what: &str| {
            ChunkpackError::Format(format!("metadata line {line_no}: {what}: {line:?}"))
        };
        let mut fields = line.split_ascii_whitespace();
        let mut num = |name: &str| -> Result<u64> {
            fields
                .next()
                .ok_or_else(|| bad(&format!("missing {name}")))?
                .parse::<u64>()
                .map_err(|_| bad(&format!("bad {name}")))
        };
        let id = num("id")?;
        let orig_size = num("orig_size")?;
        let stored_size = num("stored_size")?;
        let digest_hex = fields.next().ok_or_else(|| bad("missing digest"))?;
        if fields.next().is_some() {
            return Err(bad("trailing fields"));
        }
        let digest = Digest::from_hex(digest_hex).map_err(|_| bad("bad digest"))?;
        Ok(Self {
            id,
            orig_size,
            stored_size,
            digest,
        })
    }
}

/// Pulls records one line at a time so they can be consumed in lock-step
/// with container entries.
pub struct MetaReader<R: BufRead> {
    inner: R,
    line: String,
    lines_read: u64,
}

impl<R: BufRead> MetaReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: String::new(),
            lines_read: 0,
        }
    }

    pub fn next_record(&mut self) -> Result<Option<MetaRecord>> {
        self.line.clear();
        if self.inner.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }
        self.lines_read += 1;
        let line = self.line.strip_suffix('\n').unwrap_or(&self.line);
        MetaRecord::parse(line, self.lines_read).map(Some)
    }

    /// Record for chunk `id`; a missing line or a different id is a mismatch.
    pub fn expect_record(&mut self, id: u64, chunk_count: u64) -> Result<MetaRecord> {
        let rec = self
            .next_record()?
            .ok_or_else(|| ChunkpackError::ShortRead {
                what: "metadata index".into(),
                expected: chunk_count,
                actual: self.lines_read,
            })?;
        if rec.id != id {
            return Err(ChunkpackError::IndexMismatch {
                id,
                field: "id",
                container: id,
                index: rec.id,
            });
        }
        Ok(rec)
    }

    /// After the last entry the index must be exhausted.
    pub fn expect_end(&mut self, chunk_count: u64) -> Result<()> {
        match self.next_record() {
            Ok(None) => Ok(()),
            Ok(Some(rec)) => Err(ChunkpackError::IndexMismatch {
                id: rec.id,
                field: "chunk_count",
                container: chunk_count,
                index: self.lines_read,
            }),
            Err(e) => Err(e),
        }
    }
}
