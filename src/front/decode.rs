//! The decoder interface. RISC-V instruction decoding into IR is out of
//! scope for this crate, the actual bit-pattern decoding of `lw`, `beq`,
//! `jalr`, and so on lives in a collaborator this module only names an
//! interface for. What is this crate's job is normalizing whatever the
//! decoder hands back into the shape the block builder expects: a
//! deduplicated, sorted indirect-target set and an address-ordered
//! statement stream.

use crate::common::{Address, Set};
use crate::error::{Result, TranslateError};
use crate::ir::Statement;

/// Raw decoder output, before normalization.
pub struct DecodedProgram {
    /// Addresses reachable via computed jump. Unsorted and possibly
    /// duplicated, as the decoder may discover the same indirect target
    /// from more than one `jalr`/`jr` site.
    pub indirect_targets: Vec<Address>,
    /// The flattened instruction stream, in ascending address order.
    pub code: Vec<(Address, Statement)>,
}

/// Implemented by whatever component performs RISC-V instruction
/// decoding. This crate only consumes the trait; it does not provide a
/// production implementation.
pub trait Decoder {
    /// Decode raw code bytes loaded at `base` into a [`DecodedProgram`].
    fn decode(&self, base: Address, bytes: &[u8]) -> Result<DecodedProgram>;
}

/// A placeholder [`Decoder`] that always reports failure. Wired into the
/// CLI driver so the pipeline links and runs end to end, exercising the
/// `-O`, error-reporting, and file-output plumbing ahead of a real
/// RV32I/RV32M decoder being dropped in.
pub struct StubDecoder;

impl Decoder for StubDecoder {
    fn decode(&self, _base: Address, _bytes: &[u8]) -> Result<DecodedProgram> {
        Err(TranslateError::Decode(
            "no RISC-V instruction decoder is linked into this build; supply a `Decoder` impl".into(),
        ))
    }
}

/// Deduplicate and sort a raw decoder result into the `(Set<Address>,
/// Vec<(Address, Statement)>)` shape the block builder expects.
pub fn normalize(raw: DecodedProgram) -> (Set<Address>, Vec<(Address, Statement)>) {
    let indirect_targets: Set<Address> = raw.indirect_targets.into_iter().collect();
    let mut code = raw.code;
    code.sort_by_key(|(addr, _)| *addr);
    (indirect_targets, code)
}

/// Decode every code segment with `decoder` and merge the results into one
/// normalized `(Set<Address>, Vec<(Address, Statement)>)`.
pub fn decode_all(decoder: &dyn Decoder, segments: &[crate::front::elf::Segment]) -> Result<(Set<Address>, Vec<(Address, Statement)>)> {
    let mut indirect_targets = Vec::new();
    let mut code = Vec::new();
    for segment in segments {
        let decoded = decoder.decode(segment.base, &segment.bytes)?;
        indirect_targets.extend(decoded.indirect_targets);
        code.extend(decoded.code);
    }
    Ok(normalize(DecodedProgram { indirect_targets, code }))
}
