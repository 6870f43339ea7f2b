//! Useless-assignment removal: drops `StoreReg(r, LoadReg(r))` statements,
//! which substitution can leave behind once a register's new value turns
//! out to be the value it already held.

use crate::ir::{Block, Expr, Statement};

/// Remove every `StoreReg(r, LoadReg(r))` from `block`.
pub fn remove_useless_assignments(block: &Block) -> Block {
    let statements = block
        .statements
        .iter()
        .filter(|s| !matches!(s, Statement::StoreReg(r, Expr::LoadReg(r2)) if r == r2))
        .cloned()
        .collect();
    Block { statements }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::RegName;
    use crate::ir::CondExpr;

    #[test]
    fn drops_self_assignment() {
        let block = Block {
            statements: vec![
                Statement::StoreReg(RegName::A0, Expr::LoadReg(RegName::A0)),
                Statement::Jump(CondExpr::LitCond(true), 0, 0),
            ],
        };
        let out = remove_useless_assignments(&block);
        assert_eq!(out.statements.len(), 1);
    }

    #[test]
    fn keeps_assignment_from_a_different_register() {
        let block = Block {
            statements: vec![
                Statement::StoreReg(RegName::A0, Expr::LoadReg(RegName::A1)),
                Statement::Jump(CondExpr::LitCond(true), 0, 0),
            ],
        };
        let out = remove_useless_assignments(&block);
        assert_eq!(out.statements.len(), 2);
    }
}
