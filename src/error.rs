//! Error taxonomy for the translator.
//!
//! Every fatal condition the driver can hit is a variant of
//! [`TranslateError`]. No pass recovers locally: the block builder and the
//! top-level [`crate::middle::driver::simplify`] entry point are the only
//! places that return [`Result`]; everything else in the simplifier is a
//! total function over well-formed blocks.

use crate::common::Address;

/// The crate-wide result alias.
pub type Result<T> = std::result::Result<T, TranslateError>;

/// Fatal errors surfaced at the driver boundary.
#[derive(thiserror::Error, Debug)]
pub enum TranslateError {
    /// The input file could not be parsed as a 32-bit RISC-V ELF, or is
    /// missing a segment the translator requires.
    #[error("malformed input: {reason}")]
    MalformedInput {
        /// Human-readable description of what went wrong.
        reason: String,
    },

    /// A `Jump` statement's direct target has no corresponding block
    /// entry. Indicates a decoder bug or truncated input.
    #[error("jump from {from:#010x} targets {target:#010x}, which is not a block entry")]
    UnknownJumpTarget {
        /// The address of the block containing the offending jump.
        from: Address,
        /// The address the jump targets.
        target: Address,
    },

    /// `-O <level>` named a level other than 0, 1, or 2.
    #[error("invalid optimization level: {level} (expected 0, 1, or 2)")]
    InvalidOptimizationLevel {
        /// The level that was rejected.
        level: u8,
    },

    /// An internal invariant was violated: a terminator appeared mid-block,
    /// a `Var` was read before its `Let`, or similar. These indicate a bug
    /// in this crate or in the decoder, never a property of guest input.
    #[error("internal invariant violated: {detail}")]
    InternalInvariant {
        /// Description of the violated invariant.
        detail: String,
    },

    /// The out-of-scope instruction decoder failed.
    #[error("decode error: {0}")]
    Decode(String),

    /// An I/O failure reading the input ELF or writing translator output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
