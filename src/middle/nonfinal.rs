//! Non-final-store lifting: runs once, before optimization begins.
//! Any `StoreReg(r, e)` followed later in the same block by
//! another `StoreReg(r, _)` is not the register's final value, so it is
//! rewritten into a `Let(v, e)` binding with a fresh `nf_var_N` name; every
//! `LoadReg(r)` between the two stores (inclusive of the later one) is
//! rewritten to `Var(v)`. This exposes the store's right-hand side to
//! substitution and folding instead of letting it hide behind a register
//! write that's about to be overwritten anyway.

use crate::common::RegName;
use crate::ir::{Block, Expr, Statement};

/// Run non-final-store lifting over `block`, minting fresh names starting
/// from `next_id`. Returns the rewritten block and the next free counter
/// value, so callers processing many blocks can keep names globally
/// distinct if desired (names only need to be unique within a block, but a
/// monotonic counter threaded across blocks is simplest to reason about).
pub fn lift_non_final_stores(block: &Block, next_id: &mut u64) -> Block {
    let mut stmts = block.statements.clone();

    let mut i = 0;
    while i < stmts.len() {
        let (r, e) = match &stmts[i] {
            Statement::StoreReg(r, e) => (*r, e.clone()),
            _ => {
                i += 1;
                continue;
            }
        };

        let later_store = stmts[i + 1..].iter().position(|s| matches!(s, Statement::StoreReg(r2, _) if *r2 == r));

        if let Some(offset) = later_store {
            let j = i + 1 + offset;
            let name = format!("nf_var_{next_id}");
            *next_id += 1;
            let v = internment::Intern::new(name);

            stmts[i] = Statement::Let(v, e);
            for stmt in stmts[i + 1..=j].iter_mut() {
                *stmt = stmt.map_exprs(
                    |expr| rewrite_load(expr, r, v),
                    |cond| match cond {
                        crate::ir::CondExpr::BinCond(op, lhs, rhs) => crate::ir::CondExpr::BinCond(
                            *op,
                            rewrite_load(lhs, r, v),
                            rewrite_load(rhs, r, v),
                        ),
                        crate::ir::CondExpr::LitCond(b) => crate::ir::CondExpr::LitCond(*b),
                    },
                );
            }
        }

        i += 1;
    }

    Block { statements: stmts }
}

fn rewrite_load(e: &Expr, r: RegName, v: crate::common::VarName) -> Expr {
    match e {
        Expr::LoadReg(r2) if *r2 == r => Expr::Var(v),
        Expr::Lit(_) | Expr::Var(_) | Expr::LoadReg(_) => e.clone(),
        Expr::LoadMem(op, addr) => Expr::load_mem(*op, rewrite_load(addr, r, v)),
        Expr::Un(op, x) => Expr::un(*op, rewrite_load(x, r, v)),
        Expr::Bin(op, lhs, rhs) => Expr::bin(*op, rewrite_load(lhs, r, v), rewrite_load(rhs, r, v)),
    }
}
