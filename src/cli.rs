//! The CLI surface: a `clap`-derived [`Args`] and the [`run`] entry point
//! the binary calls. Kept in the library (rather than `src/bin/`) so
//! `Args::try_parse_from` and `run` are directly testable without
//! spawning a subprocess.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::back::{DebugEmitter, Emitter, EmitterInput};
use crate::front::decode::{decode_all, StubDecoder};
use crate::front::load_elf;
use crate::middle::{allocate_locals, build_blocks, simplify};
use crate::{Result, TranslateError};

/// `rv32cc <ELF> <HEADER_OUT> [--impl-out <PATH>] [-O {0,1,2}] [-v]`
#[derive(Debug, Parser)]
#[command(version, about = "Static translator from 32-bit RISC-V ELF to target-language source", long_about = None)]
pub struct Args {
    /// Input ELF path.
    pub elf: PathBuf,

    /// Output header path.
    pub header_out: PathBuf,

    /// Output implementation path. Defaults to `HEADER_OUT` with its
    /// extension swapped for the implementation file's.
    #[arg(short = 'i', long = "impl-out")]
    pub impl_out: Option<PathBuf>,

    /// Optimization level: 0 (none), 1 (expression/statement simplification),
    /// or 2 (additionally runs liveness-driven dead-store elimination).
    #[arg(short = 'O', default_value_t = 1)]
    pub opt_level: u8,

    /// Raise the tracing filter: `-v` for info, `-vv` for debug, `-vvv` for trace.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// The tracing filter directive this invocation's verbosity selects.
    pub fn tracing_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

fn default_impl_path(header_out: &Path) -> PathBuf {
    header_out.with_extension("cc")
}

/// The process exit code a given [`TranslateError`] should produce. A
/// distinct nonzero code per variant, so scripts driving this binary can
/// tell the error kinds apart without parsing the diagnostic text.
pub fn exit_code(err: &TranslateError) -> i32 {
    match err {
        TranslateError::MalformedInput { .. } => 1,
        TranslateError::UnknownJumpTarget { .. } => 2,
        TranslateError::InvalidOptimizationLevel { .. } => 3,
        TranslateError::InternalInvariant { .. } => 4,
        TranslateError::Decode(_) => 5,
        TranslateError::Io(_) => 6,
    }
}

/// Run the full pipeline for one invocation: load the ELF, decode, build
/// blocks, simplify at `args.opt_level`, allocate locals, and emit the
/// header/implementation pair. The only fallible entry point in the
/// crate; every error surfaces here, none are handled locally.
pub fn run(args: &Args) -> Result<()> {
    let image = load_elf(&args.elf)?;

    let (indirect_targets, code) = decode_all(&StubDecoder, &image.code)?;

    let blocks = build_blocks(&code, &indirect_targets)?;
    let simplified = simplify(args.opt_level, &indirect_targets, &blocks)?;

    let allocated = simplified.iter().map(|(addr, block)| (*addr, allocate_locals(block))).collect();

    let impl_out = args.impl_out.clone().unwrap_or_else(|| default_impl_path(&args.header_out));

    let input = EmitterInput {
        blocks: allocated,
        indirect_targets,
        data: image.data.into_iter().map(|seg| (seg.base, seg.bytes)).collect(),
        entry: image.entry,
        program_break: image.program_break,
    };

    DebugEmitter.emit(&input, &args.header_out, &impl_out)?;

    Ok(())
}
