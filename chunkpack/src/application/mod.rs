pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use chunkpack_core::error::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Commands::Encode {
            input,
            out_dir,
            chunk_size,
            level,
            threads,
            codec,
            no_accel,
            json,
        } => handlers::handle_encode(
            input, out_dir, chunk_size, level, threads, codec, no_accel, json,
        ),
        Commands::Decode {
            container,
            meta,
            out_dir,
            no_accel,
        } => handlers::handle_decode(container, meta, out_dir, no_accel),
        Commands::Verify {
            container,
            meta,
            no_accel,
        } => handlers::handle_verify(container, meta, no_accel),
        Commands::Inspect { container, meta } => handlers::handle_inspect(container, meta),
    }
}
