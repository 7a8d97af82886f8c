use crate::error::{ChunkpackError, Result};
use crate::util::io::{read_u8, read_u64};
use std::io::{Read, Write};

/// status + orig_size + stored_size
pub const ENTRY_HEADER_LEN: u64 = 1 + 8 + 8;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFlag {
    Compressed = 0,
    Raw = 1,
}

impl StatusFlag {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(StatusFlag::Compressed),
            1 => Some(StatusFlag::Raw),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryHeader {
    pub status: StatusFlag,
    pub orig_size: u64,
    pub stored_size: u64,
}

impl EntryHeader {
    pub fn write_to(&self, mut w: impl Write) -> std::io::Result<()> {
        let mut buf = [0u8; ENTRY_HEADER_LEN as usize];
        buf[0] = self.status as u8;
        buf[1..9].copy_from_slice(&self.orig_size.to_le_bytes());
        buf[9..17].copy_from_slice(&self.stored_size.to_le_bytes());
        w.write_all(&buf)
    }

    /// Reads the raw fields of chunk `id`'s entry header. Only the status flag
    /// is checked here; see `validate` for the size bounds.
    pub fn read_from(mut r: impl Read, id: u64) -> Result<Self> {
        let flag = read_u8(&mut r, &format!("chunk {id} status"))?;
        let status = StatusFlag::from_u8(flag).ok_or_else(|| {
            ChunkpackError::Format(format!("chunk {id}: unknown status flag {flag}"))
        })?;
        let orig_size = read_u64(&mut r, &format!("chunk {id} orig_size"))?;
        let stored_size = read_u64(&mut r, &format!("chunk {id} stored_size"))?;
        Ok(Self {
            status,
            orig_size,
            stored_size,
        })
    }

    /// Checks the sizes against the container's declared chunk size.
    pub fn validate(&self, id: u64, chunk_size: u64) -> Result<()> {
        let Self {
            status,
            orig_size,
            stored_size,
        } = *self;
        if orig_size == 0 || orig_size > chunk_size {
            return Err(ChunkpackError::Format(format!(
                "chunk {id}: orig_size {orig_size} outside 1..={chunk_size}"
            )));
        }
        if status == StatusFlag::Raw && stored_size != orig_size {
            return Err(ChunkpackError::Format(format!(
                "chunk {id}: raw entry with stored_size {stored_size} != orig_size {orig_size}"
            )));
        }
        Ok(())
    }
}
