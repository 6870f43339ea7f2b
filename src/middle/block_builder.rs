//! Basic-block recovery: partitions a flat, address-ordered instruction
//! stream into a [`BlockMap`], splitting at indirect-jump targets and at
//! terminators, and closing fall-through blocks with a synthetic
//! always-true [`Jump`].

use tracing::debug;

use crate::common::{Address, Set};
use crate::error::{Result, TranslateError};
use crate::ir::{Block, BlockMap, CondExpr, Statement};

/// Build a [`BlockMap`] from a flat, ascending-address-ordered instruction
/// stream and the set of addresses reachable via indirect jump. Fails with
/// [`TranslateError::UnknownJumpTarget`] if a `Jump`'s direct target is not
/// the address of any statement in `code`.
pub fn build_blocks(code: &[(Address, Statement)], indirect_targets: &Set<Address>) -> Result<BlockMap> {
    if code.is_empty() {
        return Ok(BlockMap::new());
    }

    let known_addresses: Set<Address> = code.iter().map(|(addr, _)| *addr).collect();

    let mut blocks = BlockMap::new();
    let mut iter = code.iter().peekable();
    let mut entry = code[0].0;
    let mut current = Block::new();

    while let Some((addr, stmt)) = iter.next() {
        current.statements.push(stmt.clone());

        let next_addr = iter.peek().map(|(a, _)| *a);
        let starts_new_block = match next_addr {
            Some(next) => stmt.is_terminator() || indirect_targets.contains(&next),
            None => false,
        };

        if stmt.is_terminator() {
            debug!(entry, %addr, "closing block at terminator");
            blocks.insert(entry, std::mem::take(&mut current));
            if let Some(next) = next_addr {
                entry = next;
            }
        } else if starts_new_block {
            let next = next_addr.expect("starts_new_block implies a next address");
            debug!(entry, %addr, next, "closing fall-through block before indirect target");
            current.statements.push(Statement::Jump(CondExpr::LitCond(true), next, next));
            blocks.insert(entry, std::mem::take(&mut current));
            entry = next;
        }
    }

    if !current.statements.is_empty() {
        // Decoder handed us a block with no terminator at the end of the program.
        return Err(TranslateError::InternalInvariant {
            detail: format!("block at {entry:#010x} has no terminator at end of stream"),
        });
    }

    for target in indirect_targets {
        if !blocks.contains_key(target) && !known_addresses.contains(target) {
            return Err(TranslateError::UnknownJumpTarget { from: *target, target: *target });
        }
    }

    for (entry, block) in &blocks {
        for stmt in &block.statements {
            if let Statement::Jump(_, a, b) = stmt {
                for target in [a, b] {
                    if !blocks.contains_key(target) {
                        return Err(TranslateError::UnknownJumpTarget { from: *entry, target: *target });
                    }
                }
            }
        }
    }

    Ok(blocks)
}
