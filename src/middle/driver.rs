//! The simplifier driver: fixed-point composition of every pass above
//! under an optimization level.

use tracing::{debug, info};

use crate::common::{Address, Set};
use crate::error::{Result, TranslateError};
use crate::ir::{Block, BlockMap, Expr};
use crate::middle::fold::{run_const_fold, run_const_fold_c};
use crate::middle::{constprop, dse, liveness, nonfinal, subst, useless};

fn fold_block(block: &Block) -> Block {
    let statements = block
        .statements
        .iter()
        .map(|s| s.map_exprs(|e| run_const_fold(e), |c| run_const_fold_c(c)))
        .collect();
    Block { statements }
}

/// One round of: fold every `Expr`/`CondExpr`, substitute, propagate
/// constants, remove useless assignments.
fn simplify_bb1_round(block: &Block) -> Block {
    let block = fold_block(block);
    let block = subst::substitute(&block);
    let block = constprop::propagate_constants(&block);
    useless::remove_useless_assignments(&block)
}

/// Run [`simplify_bb1_round`] to a fixed point.
pub fn simplify_bb1(block: &Block) -> Block {
    let mut current = block.clone();
    loop {
        let next = simplify_bb1_round(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Run the simplifier pipeline at the given optimization level. Level 0
/// returns `block_map` unchanged; level 1 lifts non-final stores and runs
/// `simplify_bb1` to a fixed point; level 2 additionally runs liveness,
/// dead-store elimination, and a second `simplify_bb1` fixed point. Any
/// other level is [`TranslateError::InvalidOptimizationLevel`].
pub fn simplify(level: u8, indirect_targets: &Set<Address>, block_map: &BlockMap) -> Result<BlockMap> {
    if level > 2 {
        return Err(TranslateError::InvalidOptimizationLevel { level });
    }
    if level == 0 {
        return Ok(block_map.clone());
    }

    info!(level, blocks = block_map.len(), "running simplifier");

    let mut lifted = BlockMap::new();
    for (addr, block) in block_map {
        let mut next_id = 0u64;
        lifted.insert(*addr, nonfinal::lift_non_final_stores(block, &mut next_id));
    }

    let mut simplified: BlockMap = lifted.iter().map(|(addr, block)| (*addr, simplify_bb1(block))).collect();

    if level == 1 {
        return Ok(simplified);
    }

    let live = liveness::analyze(&simplified, indirect_targets);
    debug!(blocks = live.len(), "liveness computed for dead-store elimination");

    for (addr, block) in simplified.iter_mut() {
        let live_out = live.get(addr).map(|io| io.out).unwrap_or_default();
        let mut next_id = 0u64;
        *block = dse::eliminate_dead_stores(block, live_out, &mut next_id);
    }

    let final_blocks = simplified.iter().map(|(addr, block)| (*addr, simplify_bb1(block))).collect();

    Ok(final_blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::RegName;
    use crate::ir::Statement;

    fn sample_map() -> BlockMap {
        let mut m = BlockMap::new();
        m.insert(
            0,
            Block {
                statements: vec![
                    Statement::StoreReg(RegName::A0, Expr::Lit(7)),
                    Statement::StoreReg(
                        RegName::A1,
                        Expr::bin(crate::common::BinOp::Add, Expr::LoadReg(RegName::A0), Expr::Lit(1)),
                    ),
                    Statement::Break,
                ],
            },
        );
        m
    }

    #[test]
    fn level_zero_is_identity() {
        let m = sample_map();
        let out = simplify(0, &Set::new(), &m).unwrap();
        assert_eq!(out, m);
    }

    #[test]
    fn level_one_folds_constants() {
        let m = sample_map();
        let out = simplify(1, &Set::new(), &m).unwrap();
        assert_eq!(out[&0].statements[1], Statement::StoreReg(RegName::A1, Expr::Lit(8)));
    }

    #[test]
    fn invalid_level_is_an_error() {
        let m = sample_map();
        let err = simplify(3, &Set::new(), &m).unwrap_err();
        assert!(matches!(err, TranslateError::InvalidOptimizationLevel { level: 3 }));
    }

    #[test]
    fn simplify_bb1_is_idempotent() {
        let block = sample_map().remove(&0).unwrap();
        let once = simplify_bb1(&block);
        let twice = simplify_bb1(&once);
        assert_eq!(once, twice);
    }
}
