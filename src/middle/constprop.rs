//! Constant propagation: a single left-to-right traversal of a block
//! maintaining an environment mapping `RegName -> i32`, substituting
//! known-constant register reads as they're encountered.

use crate::common::{Map, RegName};
use crate::ir::{Block, Expr, Statement};

/// Run one constant-propagation pass over `block`. The environment does
/// not cross block boundaries: each call starts fresh.
pub fn propagate_constants(block: &Block) -> Block {
    let mut env: Map<RegName, i32> = Map::new();
    let mut out = Vec::with_capacity(block.statements.len());
    let mut ended = false;

    for stmt in &block.statements {
        if ended {
            out.push(stmt.clone());
            continue;
        }

        match stmt {
            Statement::StoreReg(r, e) => {
                let e = substitute_env(e, &env);
                if let Expr::Lit(n) = e {
                    env.insert(*r, n);
                    out.push(Statement::StoreReg(*r, Expr::Lit(n)));
                } else {
                    env.remove(r);
                    out.push(Statement::StoreReg(*r, e));
                }
            }
            other => {
                let rewritten = other.map_exprs(|e| substitute_env(e, &env), |c| substitute_env_cond(c, &env));
                if matches!(other, Statement::Syscall(_) | Statement::IndirectJump(_)) {
                    ended = true;
                }
                out.push(rewritten);
            }
        }
    }

    Block { statements: out }
}

fn substitute_env(e: &Expr, env: &Map<RegName, i32>) -> Expr {
    match e {
        Expr::LoadReg(r) => match env.get(r) {
            Some(n) => Expr::Lit(*n),
            None => e.clone(),
        },
        Expr::Lit(_) | Expr::Var(_) => e.clone(),
        Expr::LoadMem(op, addr) => Expr::load_mem(*op, substitute_env(addr, env)),
        Expr::Un(op, x) => Expr::un(*op, substitute_env(x, env)),
        Expr::Bin(op, lhs, rhs) => Expr::bin(*op, substitute_env(lhs, env), substitute_env(rhs, env)),
    }
}

fn substitute_env_cond(c: &crate::ir::CondExpr, env: &Map<RegName, i32>) -> crate::ir::CondExpr {
    use crate::ir::CondExpr;
    match c {
        CondExpr::BinCond(op, lhs, rhs) => {
            CondExpr::BinCond(*op, substitute_env(lhs, env), substitute_env(rhs, env))
        }
        CondExpr::LitCond(_) => c.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::BinOp;
    use crate::ir::CondExpr;

    #[test]
    fn c6_constant_propagation() {
        let block = Block {
            statements: vec![
                Statement::StoreReg(RegName::A0, Expr::Lit(7)),
                Statement::StoreReg(
                    RegName::A1,
                    Expr::bin(BinOp::Add, Expr::LoadReg(RegName::A0), Expr::Lit(1)),
                ),
                Statement::Jump(CondExpr::LitCond(true), 0, 0),
            ],
        };
        let out = propagate_constants(&block);
        assert_eq!(out.statements[0], Statement::StoreReg(RegName::A0, Expr::Lit(7)));
        assert_eq!(
            out.statements[1],
            Statement::StoreReg(RegName::A1, Expr::bin(BinOp::Add, Expr::Lit(7), Expr::Lit(1)))
        );
    }

    #[test]
    fn non_constant_store_clears_environment_entry() {
        let block = Block {
            statements: vec![
                Statement::StoreReg(RegName::A0, Expr::Lit(7)),
                Statement::StoreReg(RegName::A0, Expr::LoadReg(RegName::A1)),
                Statement::StoreReg(RegName::A2, Expr::LoadReg(RegName::A0)),
                Statement::Jump(CondExpr::LitCond(true), 0, 0),
            ],
        };
        let out = propagate_constants(&block);
        assert_eq!(out.statements[2], Statement::StoreReg(RegName::A2, Expr::LoadReg(RegName::A0)));
    }

    #[test]
    fn syscall_ends_the_traversal() {
        let block = Block {
            statements: vec![
                Statement::StoreReg(RegName::A0, Expr::Lit(7)),
                Statement::Syscall(100),
            ],
        };
        let out = propagate_constants(&block);
        assert_eq!(out.statements[1], Statement::Syscall(100));
    }
}
