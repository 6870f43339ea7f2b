//! Local-variable allocation. This module is an interface more than an
//! algorithm: the only contract the rest of the pipeline relies on is that
//! two [`VarName`]s whose live ranges overlap within a block receive
//! distinct slot indices. The linear-scan policy below is one valid
//! implementation of that contract, not a promise about slot numbering.
//! Callers should not depend on which slot a particular variable lands in.

use crate::common::{Map, VarName};
use crate::ir::{Block, CondExpr, Expr, Statement};

/// A block paired with its assigned local-variable slots.
#[derive(Clone, Debug)]
pub struct AllocatedBlock {
    /// The (unmodified) block these slots were computed for.
    pub block: Block,
    /// Target-language local slot index for each `VarName` bound in the
    /// block.
    pub slots: Map<VarName, u32>,
}

/// Assign local slots to every `Let`-bound variable in `block`.
pub fn allocate_locals(block: &Block) -> AllocatedBlock {
    let ranges = live_ranges(block);

    // Sort by range start so a simple linear-scan (earliest-start-first,
    // reuse the lowest-numbered slot whose occupant has already ended)
    // produces a valid coloring of the interval graph.
    let mut by_start: Vec<(VarName, usize, usize)> =
        ranges.into_iter().map(|(v, (start, end))| (v, start, end)).collect();
    by_start.sort_by_key(|(_, start, _)| *start);

    let mut slots = Map::new();
    let mut active: Vec<(usize, u32)> = Vec::new(); // (end, slot), sorted by slot
    let mut next_slot = 0u32;

    for (v, start, end) in by_start {
        active.retain(|(active_end, _)| *active_end >= start);
        let used: std::collections::BTreeSet<u32> = active.iter().map(|(_, s)| *s).collect();
        let slot = (0..).find(|s| !used.contains(s)).unwrap_or_else(|| {
            next_slot += 1;
            next_slot - 1
        });
        slots.insert(v, slot);
        active.push((end, slot));
    }

    AllocatedBlock { block: block.clone(), slots }
}

/// For every `VarName` defined by a `Let` in `block`, the `[def, last_use]`
/// statement-index range over which it is live. A variable that is never
/// used afterward has `last_use == def` (a degenerate, single-point
/// range).
fn live_ranges(block: &Block) -> Map<VarName, (usize, usize)> {
    let mut ranges: Map<VarName, (usize, usize)> = Map::new();

    for (i, stmt) in block.statements.iter().enumerate() {
        if let Statement::Let(v, _) = stmt {
            ranges.insert(*v, (i, i));
        }
    }

    for (i, stmt) in block.statements.iter().enumerate() {
        for v in referenced_vars(stmt) {
            if let Some(range) = ranges.get_mut(&v) {
                range.1 = range.1.max(i);
            }
        }
    }

    ranges
}

fn referenced_vars(stmt: &Statement) -> Vec<VarName> {
    let mut out = Vec::new();
    stmt.map_exprs(
        |e| {
            collect_vars(e, &mut out);
            e.clone()
        },
        |c| {
            if let CondExpr::BinCond(_, lhs, rhs) = c {
                collect_vars(lhs, &mut out);
                collect_vars(rhs, &mut out);
            }
            c.clone()
        },
    );
    out
}

fn collect_vars(e: &Expr, out: &mut Vec<VarName>) {
    match e {
        Expr::Var(v) => out.push(*v),
        Expr::Lit(_) | Expr::LoadReg(_) => {}
        Expr::LoadMem(_, addr) => collect_vars(addr, out),
        Expr::Un(_, x) => collect_vars(x, out),
        Expr::Bin(_, lhs, rhs) => {
            collect_vars(lhs, out);
            collect_vars(rhs, out);
        }
    }
}
