use std::path::PathBuf;

use chunkpack_core::error::{ChunkpackError, Result};
use chunkpack_core::{CodecId, DecodeOptions, EncodeOptions, decode, encode, inspect, verify};

use crate::presentation::cli::CodecArg;

/// Byte count with an optional K/M/G (binary) suffix.
pub fn parse_size(s: &str) -> std::result::Result<u64, String> {
    let s = s.trim();
    let (digits, mult) = match s.char_indices().last() {
        Some((i, c)) if c.is_ascii_alphabetic() => {
            let mult = match c.to_ascii_uppercase() {
                'K' => 1u64 << 10,
                'M' => 1 << 20,
                'G' => 1 << 30,
                _ => return Err(format!("unknown size suffix {c:?}")),
            };
            (&s[..i], mult)
        }
        _ => (s, 1),
    };
    let n: u64 = digits
        .parse()
        .map_err(|_| format!("invalid size: {s:?}"))?;
    let v = n
        .checked_mul(mult)
        .ok_or_else(|| format!("size overflows: {s:?}"))?;
    if v == 0 {
        return Err("size must be non-zero".into());
    }
    Ok(v)
}

#[allow(clippy::too_many_arguments)]
pub fn handle_encode(
    input: PathBuf,
    out_dir: PathBuf,
    chunk_size: Option<u64>,
    level: i32,
    threads: Option<usize>,
    codec: CodecArg,
    no_accel: bool,
    json: bool,
) -> Result<()> {
    let opts = EncodeOptions {
        chunk_size,
        level,
        threads,
        codec: match codec {
            CodecArg::Zstd => CodecId::Zstd,
            CodecArg::Store => CodecId::Store,
        },
        accelerated_digest: !no_accel,
    };
    let out = encode(&input, &out_dir, &opts)?;
    let r = &out.report;
    if json {
        let s = serde_json::to_string_pretty(r)
            .map_err(|e| ChunkpackError::Format(format!("report encode: {e}")))?;
        println!("{s}");
    } else {
        println!(
            "{} -> {} ({} chunks of {} bytes, {} -> {} bytes, ratio {:.2}, raw={} failed={})",
            input.display(),
            out.container.display(),
            r.chunk_count,
            r.chunk_size,
            r.total_size,
            r.stored_size,
            r.compression_ratio,
            r.raw_chunks,
            r.failed_chunks
        );
        println!("metadata -> {}", out.meta.display());
    }
    Ok(())
}

pub fn handle_decode(
    container: PathBuf,
    meta: PathBuf,
    out_dir: PathBuf,
    no_accel: bool,
) -> Result<()> {
    let opts = DecodeOptions {
        accelerated_digest: !no_accel,
    };
    let (path, report) = decode(&container, &meta, &out_dir, &opts)?;
    println!(
        "decoded {} chunks, {} bytes -> {}",
        report.chunk_count,
        report.total_size,
        path.display()
    );
    Ok(())
}

pub fn handle_verify(container: PathBuf, meta: PathBuf, no_accel: bool) -> Result<()> {
    let opts = DecodeOptions {
        accelerated_digest: !no_accel,
    };
    let report = verify(&container, &meta, &opts)?;
    eprintln!(
        "verify: OK ({} chunks, {} bytes)",
        report.chunk_count, report.total_size
    );
    Ok(())
}

pub fn handle_inspect(container: PathBuf, meta: PathBuf) -> Result<()> {
    let (h, rows) = inspect(&container, &meta)?;
    println!(
        "version={} codec={:?} digest={:?} total={} chunk_size={} chunks={}",
        h.version, h.codec, h.digest, h.total_size, h.chunk_size, h.chunk_count
    );
    for r in rows {
        println!(
            "#{:<5} {:<10} u={} c={} {}",
            r.record.id,
            format!("{:?}", r.entry.status),
            r.entry.orig_size,
            r.entry.stored_size,
            r.record.digest
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_with_suffixes() {
        assert_eq!(parse_size("4096"), Ok(4096));
        assert_eq!(parse_size("64K"), Ok(64 * 1024));
        assert_eq!(parse_size("4m"), Ok(4 * 1024 * 1024));
        assert_eq!(parse_size("1G"), Ok(1 << 30));
        assert!(parse_size("0").is_err());
        assert!(parse_size("12Q").is_err());
        assert!(parse_size("K").is_err());
        assert!(parse_size("99999999999G").is_err());
    }
}
