//! Liveness analysis: a standard backward iterative dataflow over the
//! block map, with direct successors from `Jump` targets and a single
//! shared "indirect-in" region standing in for every `IndirectJump`.

use tracing::trace;

use crate::common::{Address, Map, Set};
use crate::ir::region::{read_region, write_region};
use crate::ir::{Block, BlockMap, CondExpr, Region, Statement};

/// Where control may go after a block's terminator.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Successor {
    Direct(Address),
    Indirect,
}

/// Live-in/live-out regions for one block.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub struct InOut {
    /// Locations that may be read before being overwritten, starting from
    /// this block's entry.
    pub r#in: Region,
    /// Locations that may be read before being overwritten, starting from
    /// any of this block's successors.
    pub out: Region,
}

/// The fixed-point liveness result for every block in the map.
pub type LivenessMap = Map<Address, InOut>;

fn successors(block: &Block) -> Vec<Successor> {
    match block.statements.last() {
        Some(Statement::Jump(CondExpr::LitCond(true), a, _)) => vec![Successor::Direct(*a)],
        Some(Statement::Jump(CondExpr::LitCond(false), _, b)) => vec![Successor::Direct(*b)],
        Some(Statement::Jump(_, a, b)) => vec![Successor::Direct(*a), Successor::Direct(*b)],
        Some(Statement::IndirectJump(_)) => vec![Successor::Indirect],
        Some(Statement::Syscall(a)) => vec![Successor::Direct(*a), Successor::Indirect],
        Some(Statement::Break) | None => vec![],
        Some(_) => vec![],
    }
}

/// `gen`/`kill` for one block, folding statements from last to first.
fn gen_kill(block: &Block) -> (Region, Region) {
    let mut gen = Region::empty();
    let mut kill = Region::empty();
    for stmt in block.statements.iter().rev() {
        let rd = read_region(stmt);
        let wr = write_region(stmt);
        gen = gen.difference(wr).union(rd);
        kill = kill.union(wr);
    }
    (gen, kill)
}

/// Run liveness to a fixed point over every block in `blocks`. Indirect
/// targets are read from `indirect_targets`; their live-in regions are
/// unioned into one cached value used by every `Indirect` successor edge.
pub fn analyze(blocks: &BlockMap, indirect_targets: &Set<Address>) -> LivenessMap {
    let gen_kill_by_block: Map<Address, (Region, Region)> =
        blocks.iter().map(|(addr, block)| (*addr, gen_kill(block))).collect();
    let successors_by_block: Map<Address, Vec<Successor>> =
        blocks.iter().map(|(addr, block)| (*addr, successors(block))).collect();

    let mut state: LivenessMap = blocks.keys().map(|addr| (*addr, InOut::default())).collect();

    loop {
        let indirect_in = indirect_targets
            .iter()
            .filter_map(|addr| state.get(addr))
            .fold(Region::empty(), |acc, io| acc.union(io.r#in));

        let mut changed = false;
        let mut next = state.clone();

        for (addr, (gen, kill)) in &gen_kill_by_block {
            let old_out = state[addr].out;
            let new_in = old_out.difference(*kill).union(*gen);

            let new_out = successors_by_block[addr].iter().fold(Region::empty(), |acc, succ| {
                acc.union(match succ {
                    Successor::Direct(target) => state.get(target).map(|io| io.r#in).unwrap_or(Region::empty()),
                    Successor::Indirect => indirect_in,
                })
            });

            if new_in != state[addr].r#in || new_out != state[addr].out {
                changed = true;
            }
            next.insert(*addr, InOut { r#in: new_in, out: new_out });
        }

        state = next;
        if !changed {
            trace!(blocks = state.len(), "liveness reached fixed point");
            return state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::RegName;
    use crate::ir::region::region_of;
    use crate::ir::Expr;

    #[test]
    fn a_register_read_in_a_successor_is_live_out_of_the_predecessor() {
        let mut blocks = BlockMap::new();
        blocks.insert(
            0,
            Block {
                statements: vec![
                    Statement::StoreReg(RegName::A1, Expr::Lit(1)),
                    Statement::Jump(CondExpr::LitCond(true), 4, 4),
                ],
            },
        );
        blocks.insert(
            4,
            Block {
                statements: vec![Statement::StoreReg(RegName::A2, Expr::LoadReg(RegName::A0)), Statement::Break],
            },
        );
        let live = analyze(&blocks, &Set::new());
        assert!(live[&0].out.overlaps(region_of(RegName::A0)));
    }

    #[test]
    fn converges_to_a_second_identical_iteration() {
        let mut blocks = BlockMap::new();
        blocks.insert(0, Block { statements: vec![Statement::Break] });
        let first = analyze(&blocks, &Set::new());
        let second = analyze(&blocks, &Set::new());
        assert_eq!(first, second);
    }
}
