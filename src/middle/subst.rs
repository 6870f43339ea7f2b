//! Substitution: walks a block left to right, replacing a `Let` binding's
//! uses with its right-hand side and dropping the `Let` when doing so is
//! safe.

use crate::common::VarName;
use crate::ir::region::{read_region_expr, write_region};
use crate::ir::{Block, Expr, Statement};

/// Run one left-to-right substitution pass over `block`.
pub fn substitute(block: &Block) -> Block {
    let mut out: Vec<Statement> = block.statements.clone();

    let mut i = 0;
    while i < out.len() {
        if let Statement::Let(v, rhs) = out[i].clone() {
            if is_safe_and_eligible(&rhs, v, &out[i + 1..]) {
                for later in out[i + 1..].iter_mut() {
                    *later = later.map_exprs(|e| e.substitute(v, &rhs), |c| c.substitute(v, &rhs));
                }
                out.remove(i);
                continue;
            }
        }
        i += 1;
    }

    Block { statements: out }
}

fn is_safe_and_eligible(rhs: &Expr, v: VarName, rest: &[Statement]) -> bool {
    let uses = count_uses_in(rest, v);
    if uses == 0 {
        return true;
    }
    if !(rhs.is_simple() || uses <= 1) {
        return false;
    }
    is_safe(rhs, v, rest)
}

fn count_uses_in(rest: &[Statement], v: VarName) -> usize {
    rest.iter()
        .map(|s| {
            let mut n = 0;
            s.map_exprs(
                |e| {
                    n += e.count_uses(v);
                    e.clone()
                },
                |c| {
                    n += c.count_uses(v);
                    c.clone()
                },
            );
            n
        })
        .sum()
}

/// A substitution of `v := rhs` is safe if no statement after the first
/// write that overlaps `read_region(rhs)` references `v` again.
fn is_safe(rhs: &Expr, v: VarName, rest: &[Statement]) -> bool {
    let hazard_region = read_region_expr(rhs);
    let mut seen_hazard = false;
    for stmt in rest {
        if seen_hazard && count_uses_in(std::slice::from_ref(stmt), v) > 0 {
            return false;
        }
        if write_region(stmt).overlaps(hazard_region) {
            seen_hazard = true;
        }
    }
    true
}
