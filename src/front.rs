//! External interfaces consumed by the core: ELF loading and the
//! RISC-V-to-IR decoder. Both are named here as interfaces; the actual
//! instruction decoding logic is an out-of-scope collaborator.

pub mod decode;
pub mod elf;

pub use decode::{normalize, DecodedProgram, Decoder};
pub use elf::{load_elf, ElfImage, Segment};
