use super::entry::{EntryHeader, StatusFlag};
use super::header::Header;
use crate::codec::{Compressor, compressor_for};
use crate::error::{ChunkpackError, Result};
use crate::util::io::read_full;
use std::io::{self, Read};

#[derive(Debug)]
pub struct Entry {
    pub id: u64,
    pub header: EntryHeader,
    pub payload: Vec<u8>,
}

impl Entry {
    pub fn is_raw(&self) -> bool {
        self.header.status == StatusFlag::Raw
    }
}

/// Sequential, non-seeking reader over a container. Every structural
/// invariant of the format is checked as entries stream past.
pub struct ContainerReader<R: Read> {
    inner: R,
    header: Header,
    codec: Box<dyn Compressor>,
    next_id: u64,
    orig_seen: u64,
}

impl<R: Read> ContainerReader<R> {
    pub fn new(mut inner: R) -> Result<Self> {
        let header = Header::read_from(&mut inner)?;
        Ok(Self {
            inner,
            header,
            codec: compressor_for(header.codec),
            next_id: 0,
            orig_seen: 0,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Codec named by the header.
    pub fn codec(&self) -> &dyn Compressor {
        self.codec.as_ref()
    }

    /// `check` sees the raw entry header before any size bound is applied, so
    /// a caller comparing against an index reports disagreement first.
    fn next_header<T>(
        &mut self,
        check: impl FnOnce(u64, &EntryHeader) -> Result<T>,
    ) -> Result<Option<(u64, EntryHeader, T)>> {
        if self.next_id >= self.header.chunk_count {
            return Ok(None);
        }
        let id = self.next_id;
        let eh = EntryHeader::read_from(&mut self.inner, id)?;
        let checked = check(id, &eh)?;
        eh.validate(id, self.header.chunk_size)?;

        let seen = self.orig_seen + eh.orig_size;
        if seen > self.header.total_size {
            return Err(ChunkpackError::Format(format!(
                "chunk {id}: sizes so far ({seen}) exceed total_size {}",
                self.header.total_size
            )));
        }
        if eh.status == StatusFlag::Compressed {
            let limit = self.codec.compress_bound(eh.orig_size as usize) as u64;
            if eh.stored_size > limit {
                return Err(ChunkpackError::Format(format!(
                    "chunk {id}: stored_size {} exceeds compress bound {limit}",
                    eh.stored_size
                )));
            }
        }
        self.orig_seen = seen;
        self.next_id += 1;
        Ok(Some((id, eh, checked)))
    }

    /// Next entry with its stored payload, or `None` after the last one.
    pub fn next_entry<T>(
        &mut self,
        check: impl FnOnce(u64, &EntryHeader) -> Result<T>,
    ) -> Result<Option<(Entry, T)>> {
        let Some((id, eh, checked)) = self.next_header(check)? else {
            return Ok(None);
        };
        let len = eh.stored_size as usize;
        let mut payload = Vec::new();
        payload
            .try_reserve_exact(len)
            .map_err(|_| ChunkpackError::AllocationFailure { id, bytes: len })?;
        payload.resize(len, 0);
        read_full(&mut self.inner, &mut payload, &format!("chunk {id} payload"))?;
        let entry = Entry {
            id,
            header: eh,
            payload,
        };
        Ok(Some((entry, checked)))
    }

    /// Next entry header, skipping over its payload.
    pub fn skip_entry<T>(
        &mut self,
        check: impl FnOnce(u64, &EntryHeader) -> Result<T>,
    ) -> Result<Option<(u64, EntryHeader, T)>> {
        let Some((id, eh, checked)) = self.next_header(check)? else {
            return Ok(None);
        };
        let copied = io::copy(&mut (&mut self.inner).take(eh.stored_size), &mut io::sink())?;
        if copied != eh.stored_size {
            return Err(ChunkpackError::ShortRead {
                what: format!("chunk {id} payload"),
                expected: eh.stored_size,
                actual: copied,
            });
        }
        Ok(Some((id, eh, checked)))
    }

    /// Confirm every entry was consumed, sizes add up and nothing trails.
    pub fn finish(mut self) -> Result<Header> {
        if self.next_id != self.header.chunk_count {
            return Err(ChunkpackError::Format(format!(
                "stopped after {} of {} chunks",
                self.next_id, self.header.chunk_count
            )));
        }
        if self.orig_seen != self.header.total_size {
            return Err(ChunkpackError::Format(format!(
                "chunk sizes sum to {}, header says {}",
                self.orig_seen, self.header.total_size
            )));
        }
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => break,
                Ok(_) => {
                    return Err(ChunkpackError::Format(
                        "trailing bytes after last chunk".into(),
                    ));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(self.header)
    }
}
