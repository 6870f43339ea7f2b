//! End-to-end exercise of the CLI driver's `run` entry point against a
//! synthetic minimal ELF image. The crate ships no production RISC-V
//! decoder, so the pipeline bottoms out at `TranslateError::Decode` once
//! the ELF parses. This still exercises every stage up to that boundary:
//! argument parsing, ELF loading, and error propagation back through
//! `run`.

use std::io::Write;

use clap::Parser;
use rv32cc::cli::{exit_code, run, Args};
use rv32cc::TranslateError;

const EHDR_SIZE: usize = 52;
const PHDR_SIZE: usize = 32;

/// A minimal valid 32-bit RISC-V ELF: one executable `PT_LOAD` segment
/// containing a handful of zero bytes.
fn minimal_riscv_elf() -> Vec<u8> {
    let code_bytes = vec![0u8; 16];
    let phoff = EHDR_SIZE;
    let code_off = phoff + PHDR_SIZE;

    let mut bytes = vec![0u8; code_off + code_bytes.len()];
    bytes[0..4].copy_from_slice(b"\x7fELF");
    bytes[4] = 1; // ELFCLASS32
    bytes[5] = 1; // ELFDATA2LSB
    bytes[18..20].copy_from_slice(&243u16.to_le_bytes()); // EM_RISCV
    bytes[24..28].copy_from_slice(&0u32.to_le_bytes()); // e_entry
    bytes[28..32].copy_from_slice(&(phoff as u32).to_le_bytes()); // e_phoff
    bytes[42..44].copy_from_slice(&(PHDR_SIZE as u16).to_le_bytes()); // e_phentsize
    bytes[44..46].copy_from_slice(&1u16.to_le_bytes()); // e_phnum

    let phdr = &mut bytes[phoff..phoff + PHDR_SIZE];
    phdr[0..4].copy_from_slice(&1u32.to_le_bytes()); // p_type = PT_LOAD
    phdr[4..8].copy_from_slice(&(code_off as u32).to_le_bytes()); // p_offset
    phdr[8..12].copy_from_slice(&0u32.to_le_bytes()); // p_vaddr
    phdr[16..20].copy_from_slice(&(code_bytes.len() as u32).to_le_bytes()); // p_filesz
    phdr[20..24].copy_from_slice(&(code_bytes.len() as u32).to_le_bytes()); // p_memsz
    phdr[24..28].copy_from_slice(&1u32.to_le_bytes()); // p_flags = PF_X

    bytes[code_off..].copy_from_slice(&code_bytes);
    bytes
}

#[test]
fn pipeline_reaches_the_decoder_boundary_on_a_well_formed_elf() {
    let dir = std::env::temp_dir().join(format!("rv32cc-cli-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let elf_path = dir.join("in.elf");
    let header_path = dir.join("out.h");

    std::fs::File::create(&elf_path).unwrap().write_all(&minimal_riscv_elf()).unwrap();

    let args = Args::try_parse_from([
        "rv32cc",
        elf_path.to_str().unwrap(),
        header_path.to_str().unwrap(),
    ])
    .unwrap();
    let err = run(&args).unwrap_err();
    assert!(matches!(err, TranslateError::Decode(_)));
    assert_eq!(exit_code(&err), 5);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn malformed_elf_is_rejected_before_decoding() {
    let dir = std::env::temp_dir().join(format!("rv32cc-cli-test-malformed-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let elf_path = dir.join("not_an_elf.bin");
    let header_path = dir.join("out.h");

    std::fs::File::create(&elf_path).unwrap().write_all(b"not an elf").unwrap();

    let args = Args::try_parse_from([
        "rv32cc",
        elf_path.to_str().unwrap(),
        header_path.to_str().unwrap(),
    ])
    .unwrap();
    let err = run(&args).unwrap_err();
    assert!(matches!(err, TranslateError::MalformedInput { .. }));
    assert_eq!(exit_code(&err), 1);

    std::fs::remove_dir_all(&dir).ok();
}
