use crate::container::entry::EntryHeader;
use crate::container::header::Header;
use crate::container::meta::{MetaReader, MetaRecord};
use crate::container::reader::ContainerReader;
use crate::error::Result;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ChunkRow {
    pub entry: EntryHeader,
    pub record: MetaRecord,
}

/// Walk container entries and index lines together without decompressing.
/// Size disagreements are reported the same way decode reports them.
pub fn inspect_stream(container: impl Read, meta: impl BufRead) -> Result<(Header, Vec<ChunkRow>)> {
    let mut reader = ContainerReader::new(container)?;
    let mut meta = MetaReader::new(meta);
    let header = *reader.header();
    let mut rows = Vec::with_capacity(header.chunk_count as usize);
    while let Some((_, entry, record)) = reader.skip_entry(|id, eh| {
        let record = meta.expect_record(id, header.chunk_count)?;
        record.check_entry(eh)?;
        Ok(record)
    })? {
        rows.push(ChunkRow { entry, record });
    }
    reader.finish()?;
    meta.expect_end(header.chunk_count)?;
    Ok((header, rows))
}

pub fn inspect(container: &Path, meta: &Path) -> Result<(Header, Vec<ChunkRow>)> {
    inspect_stream(
        BufReader::new(File::open(container)?),
        BufReader::new(File::open(meta)?),
    )
}
