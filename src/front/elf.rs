//! Minimal ELF32/RISC-V front-end. Full segment extraction and relocation
//! handling are out of scope for this crate; this module does just enough
//! header and program-header parsing to validate the input and hand the
//! decoder raw `PT_LOAD` byte ranges, split into executable ("code") and
//! non-executable ("data") chunks by the segment's `PF_X` flag.

use std::path::Path;

use crate::common::Address;
use crate::error::{Result, TranslateError};

const EI_CLASS: usize = 4;
const EI_DATA: usize = 5;
const ELFCLASS32: u8 = 1;
const ELFDATA2LSB: u8 = 1;
const EM_RISCV: u16 = 243;
const PT_LOAD: u32 = 1;
const PF_X: u32 = 1;

const EHDR_SIZE: usize = 52;
const PHDR_SIZE: usize = 32;

/// One `PT_LOAD` segment's bytes, loaded at `base`.
pub struct Segment {
    /// The guest virtual address this segment is loaded at.
    pub base: Address,
    /// The segment's file-backed bytes, zero-extended to `p_memsz` (so
    /// `.bss`-style segments come back fully sized).
    pub bytes: Vec<u8>,
}

/// The parts of an ELF image the translator needs.
pub struct ElfImage {
    /// The guest program's entry point.
    pub entry: Address,
    /// The program break: the address immediately following the
    /// highest-addressed loaded byte. Simply `max(p_vaddr + p_memsz)` over
    /// all segments; rounding up to a page is the loader's job.
    pub program_break: Address,
    /// Executable (`PF_X`) segments, handed to the decoder.
    pub code: Vec<Segment>,
    /// Non-executable segments, handed to the emitter as initial data.
    pub data: Vec<Segment>,
}

/// Parse `path` as a 32-bit RISC-V ELF executable.
pub fn load_elf(path: &Path) -> Result<ElfImage> {
    let bytes = std::fs::read(path)?;
    parse_elf(&bytes)
}

fn parse_elf(bytes: &[u8]) -> Result<ElfImage> {
    if bytes.len() < EHDR_SIZE {
        return Err(TranslateError::MalformedInput { reason: "file too short to contain an ELF header".into() });
    }
    if &bytes[0..4] != b"\x7fELF" {
        return Err(TranslateError::MalformedInput { reason: "missing ELF magic".into() });
    }
    if bytes[EI_CLASS] != ELFCLASS32 {
        return Err(TranslateError::MalformedInput { reason: "not a 32-bit ELF (ELFCLASS32 required)".into() });
    }
    if bytes[EI_DATA] != ELFDATA2LSB {
        return Err(TranslateError::MalformedInput { reason: "only little-endian ELF images are supported".into() });
    }

    let machine = u16::from_le_bytes([bytes[18], bytes[19]]);
    if machine != EM_RISCV {
        return Err(TranslateError::MalformedInput {
            reason: format!("unsupported e_machine {machine} (expected EM_RISCV = {EM_RISCV})"),
        });
    }

    let entry = u32::from_le_bytes(bytes[24..28].try_into().unwrap());
    let phoff = u32::from_le_bytes(bytes[28..32].try_into().unwrap()) as usize;
    let phentsize = u16::from_le_bytes(bytes[42..44].try_into().unwrap()) as usize;
    let phnum = u16::from_le_bytes(bytes[44..46].try_into().unwrap()) as usize;

    if phentsize < PHDR_SIZE {
        return Err(TranslateError::MalformedInput { reason: "program header entry smaller than Elf32_Phdr".into() });
    }

    let mut code = Vec::new();
    let mut data = Vec::new();
    let mut program_break: Address = 0;

    for i in 0..phnum {
        let off = phoff + i * phentsize;
        let hdr = bytes.get(off..off + PHDR_SIZE).ok_or_else(|| TranslateError::MalformedInput {
            reason: format!("program header {i} out of bounds"),
        })?;

        let p_type = u32::from_le_bytes(hdr[0..4].try_into().unwrap());
        if p_type != PT_LOAD {
            continue;
        }

        let p_offset = u32::from_le_bytes(hdr[4..8].try_into().unwrap()) as usize;
        let p_vaddr = u32::from_le_bytes(hdr[8..12].try_into().unwrap());
        let p_filesz = u32::from_le_bytes(hdr[16..20].try_into().unwrap()) as usize;
        let p_memsz = u32::from_le_bytes(hdr[20..24].try_into().unwrap()) as usize;
        let p_flags = u32::from_le_bytes(hdr[24..28].try_into().unwrap());

        let file_bytes = bytes.get(p_offset..p_offset + p_filesz).ok_or_else(|| TranslateError::MalformedInput {
            reason: format!("segment {i} file range out of bounds"),
        })?;

        let mut segment_bytes = vec![0u8; p_memsz];
        segment_bytes[..p_filesz.min(p_memsz)].copy_from_slice(&file_bytes[..p_filesz.min(p_memsz)]);

        program_break = program_break.max(p_vaddr.wrapping_add(p_memsz as u32));

        let segment = Segment { base: p_vaddr, bytes: segment_bytes };
        if p_flags & PF_X != 0 {
            code.push(segment);
        } else {
            data.push(segment);
        }
    }

    if code.is_empty() {
        return Err(TranslateError::MalformedInput { reason: "no executable PT_LOAD segment found".into() });
    }

    Ok(ElfImage { entry, program_break, code, data })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_ehdr(machine: u16, class: u8) -> Vec<u8> {
        let mut h = vec![0u8; EHDR_SIZE];
        h[0..4].copy_from_slice(b"\x7fELF");
        h[EI_CLASS] = class;
        h[EI_DATA] = ELFDATA2LSB;
        h[18..20].copy_from_slice(&machine.to_le_bytes());
        h[24..28].copy_from_slice(&0u32.to_le_bytes());
        h[28..32].copy_from_slice(&(EHDR_SIZE as u32).to_le_bytes()); // phoff right after ehdr
        h[42..44].copy_from_slice(&(PHDR_SIZE as u16).to_le_bytes());
        h[44..46].copy_from_slice(&0u16.to_le_bytes()); // phnum = 0
        h
    }

    #[test]
    fn rejects_missing_magic() {
        let bytes = vec![0u8; EHDR_SIZE];
        assert!(matches!(parse_elf(&bytes), Err(TranslateError::MalformedInput { .. })));
    }

    #[test]
    fn rejects_wrong_machine() {
        let bytes = minimal_ehdr(0x3e, ELFCLASS32); // EM_X86_64
        assert!(matches!(parse_elf(&bytes), Err(TranslateError::MalformedInput { .. })));
    }

    #[test]
    fn rejects_64_bit_class() {
        let bytes = minimal_ehdr(EM_RISCV, 2); // ELFCLASS64
        assert!(matches!(parse_elf(&bytes), Err(TranslateError::MalformedInput { .. })));
    }

    #[test]
    fn rejects_no_executable_segment() {
        let bytes = minimal_ehdr(EM_RISCV, ELFCLASS32);
        assert!(matches!(parse_elf(&bytes), Err(TranslateError::MalformedInput { .. })));
    }
}
