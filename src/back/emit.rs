//! The emitter interface. Translating the simplified, allocator-annotated
//! block map into target-language source text is out of scope for this
//! crate; this module only defines the data contract the core hands off
//! and a minimal [`DebugEmitter`] used to exercise the driver end to end.

use std::path::Path;

use crate::common::{Address, Map, Set};
use crate::error::Result;
use crate::middle::AllocatedBlock;

/// Everything the emitter needs to produce a header/implementation pair.
/// The core makes no assumptions about the target language's syntax; this
/// is purely a data handoff.
pub struct EmitterInput {
    /// Every basic block, with its local-variable slot assignments.
    pub blocks: Map<Address, AllocatedBlock>,
    /// The deduplicated set of indirect-jump targets.
    pub indirect_targets: Set<Address>,
    /// Non-executable data segments loaded from the guest ELF.
    pub data: Vec<(Address, Vec<u8>)>,
    /// The guest program's entry point.
    pub entry: Address,
    /// The guest program's initial program break.
    pub program_break: Address,
}

/// Implemented by whatever component emits target-language source. This
/// crate only consumes the trait.
pub trait Emitter {
    /// Write the header and implementation files for `input`.
    fn emit(&self, input: &EmitterInput, header_path: &Path, impl_path: &Path) -> Result<()>;
}

/// A reference emitter that writes the [`std::fmt::Debug`] form of every
/// block to the header path and a short summary to the implementation
/// path. Not a target-language backend, it exists so the CLI driver and
/// its integration tests have something concrete to call.
pub struct DebugEmitter;

impl Emitter for DebugEmitter {
    fn emit(&self, input: &EmitterInput, header_path: &Path, impl_path: &Path) -> Result<()> {
        let mut header = String::new();
        header.push_str("// debug block dump, one entry per basic block\n");
        for (addr, allocated) in &input.blocks {
            header.push_str(&format!("// block {addr:#010x}\n"));
            for stmt in &allocated.block.statements {
                header.push_str(&format!("//   {stmt:?}\n"));
            }
        }
        std::fs::write(header_path, header)?;

        let summary = format!(
            "// entry={:#010x} program_break={:#010x} blocks={} indirect_targets={} data_chunks={}\n",
            input.entry,
            input.program_break,
            input.blocks.len(),
            input.indirect_targets.len(),
            input.data.len(),
        );
        std::fs::write(impl_path, summary)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Block, CondExpr, Statement};
    use crate::middle::allocate_locals;

    #[test]
    fn debug_emitter_writes_both_files() {
        let dir = std::env::temp_dir().join(format!("rv32cc-emit-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let header = dir.join("out.h");
        let impl_file = dir.join("out.cc");

        let mut blocks = Map::new();
        let block = Block { statements: vec![Statement::Jump(CondExpr::LitCond(true), 0, 0)] };
        blocks.insert(0, allocate_locals(&block));

        let input = EmitterInput {
            blocks,
            indirect_targets: Set::new(),
            data: Vec::new(),
            entry: 0,
            program_break: 0x1000,
        };

        DebugEmitter.emit(&input, &header, &impl_file).unwrap();
        assert!(header.exists());
        assert!(impl_file.exists());

        std::fs::remove_dir_all(&dir).ok();
    }
}
