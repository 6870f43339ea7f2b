//! Dead-store elimination: given a block's live-on-exit region, rewrite
//! any `StoreReg(r, e)` whose register is not live on exit into a `Let`
//! binding, so later passes can still fold or drop `e` without losing its
//! side-effect-free value entirely.

use crate::common::RegName;
use crate::ir::region::region_of;
use crate::ir::{Block, Expr, Region, Statement};

/// Rewrite dead stores in `block` given its live-on-exit region. Minting
/// fresh names starting from `next_id`, which is advanced past every name
/// this call mints.
pub fn eliminate_dead_stores(block: &Block, live_on_exit: Region, next_id: &mut u64) -> Block {
    let mut stmts = block.statements.clone();

    let mut i = 0;
    while i < stmts.len() {
        let (r, e) = match &stmts[i] {
            Statement::StoreReg(r, e) if !region_of(*r).overlaps(live_on_exit) => (*r, e.clone()),
            _ => {
                i += 1;
                continue;
            }
        };

        let name = format!("dead_var_{next_id}");
        *next_id += 1;
        let v = internment::Intern::new(name);

        stmts[i] = Statement::Let(v, e);

        let next_store = stmts[i + 1..].iter().position(|s| matches!(s, Statement::StoreReg(r2, _) if *r2 == r));
        let end = next_store.map(|offset| i + 1 + offset).unwrap_or(stmts.len() - 1);

        for stmt in stmts[i + 1..=end.min(stmts.len() - 1)].iter_mut() {
            *stmt = stmt.map_exprs(
                |expr| rewrite_load(expr, r, v),
                |cond| match cond {
                    crate::ir::CondExpr::BinCond(op, lhs, rhs) => {
                        crate::ir::CondExpr::BinCond(*op, rewrite_load(lhs, r, v), rewrite_load(rhs, r, v))
                    }
                    crate::ir::CondExpr::LitCond(b) => crate::ir::CondExpr::LitCond(*b),
                },
            );
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::BinOp;
    use crate::ir::CondExpr;

    #[test]
    fn c5_dead_store_is_lifted_to_a_let() {
        let complex = Expr::bin(BinOp::Add, Expr::LoadReg(RegName::A1), Expr::LoadReg(RegName::A2));
        let block = Block {
            statements: vec![
                Statement::StoreReg(RegName::A0, complex.clone()),
                Statement::Jump(CondExpr::LitCond(true), 4, 4),
            ],
        };
        let live_out = region_of(RegName::A1);
        let mut next_id = 0;
        let out = eliminate_dead_stores(&block, live_out, &mut next_id);
        assert!(matches!(out.statements[0], Statement::Let(_, ref e) if *e == complex));
    }

    #[test]
    fn live_store_is_untouched() {
        let block = Block {
            statements: vec![
                Statement::StoreReg(RegName::A0, Expr::Lit(1)),
                Statement::Jump(CondExpr::LitCond(true), 4, 4),
            ],
        };
        let live_out = region_of(RegName::A0);
        let mut next_id = 0;
        let out = eliminate_dead_stores(&block, live_out, &mut next_id);
        assert_eq!(out, block);
    }
}
