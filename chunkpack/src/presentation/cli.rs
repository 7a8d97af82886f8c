use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "chunked parallel file codec", long_about = None)]
pub struct Cli {
    /// More log output (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CodecArg {
    Zstd,
    Store,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compress a file into <out_dir>/<name>.cmp and <out_dir>/<name>.meta
    Encode {
        input: PathBuf,
        out_dir: PathBuf,

        /// Fixed chunk size (e.g. 4M, 512K, 1048576). Default picks by file size.
        #[arg(long, value_parser = crate::application::handlers::parse_size)]
        chunk_size: Option<u64>,

        /// Compression effort, clamped to 1..=19
        #[arg(long, default_value_t = chunkpack_core::options::DEFAULT_LEVEL)]
        level: i32,

        /// Worker threads (default: available cores, max 64)
        #[arg(long)]
        threads: Option<usize>,

        #[arg(long, value_enum, default_value_t = CodecArg::Zstd)]
        codec: CodecArg,

        /// Skip the parallel digest path
        #[arg(long)]
        no_accel: bool,

        /// Print the encode report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rebuild the original file from a container and its metadata index
    Decode {
        container: PathBuf,
        meta: PathBuf,
        out_dir: PathBuf,

        #[arg(long)]
        no_accel: bool,
    },

    /// Run every decode check without writing output
    Verify {
        container: PathBuf,
        meta: PathBuf,

        #[arg(long)]
        no_accel: bool,
    },

    /// Print the header and chunk table
    Inspect { container: PathBuf, meta: PathBuf },
}
