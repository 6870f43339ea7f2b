//! Statements and basic blocks.

use crate::common::{Address, Map, MemOp, RegName, VarName};
use crate::ir::expr::{CondExpr, Expr};

/// A single IR statement. Only the last statement of a [`Block`] may be a
/// terminator (`Jump`, `IndirectJump`, `Syscall`, or `Break`).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Statement {
    /// Bind a local. The [`VarName`] is unique within the block.
    Let(VarName, Expr),
    StoreReg(RegName, Expr),
    StoreMem(MemOp, Expr, Expr),
    /// Conditional direct branch. Both targets are known entry addresses.
    Jump(CondExpr, Address, Address),
    /// Branch to a computed address.
    IndirectJump(Expr),
    /// Invoke the host syscall shim; control resumes at the continuation
    /// address on return.
    Syscall(Address),
    Break,
}

impl Statement {
    /// True for the statements permitted to end a block.
    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            Statement::Jump(..) | Statement::IndirectJump(_) | Statement::Syscall(_) | Statement::Break
        )
    }

    /// Apply `f` to every [`Expr`] position of this statement and `g` to
    /// every [`CondExpr`] position, returning a new statement. The single
    /// traversal primitive constant folding, substitution, and constant
    /// propagation are all built on.
    pub fn map_exprs(&self, mut f: impl FnMut(&Expr) -> Expr, mut g: impl FnMut(&CondExpr) -> CondExpr) -> Statement {
        match self {
            Statement::Let(v, e) => Statement::Let(*v, f(e)),
            Statement::StoreReg(r, e) => Statement::StoreReg(*r, f(e)),
            Statement::StoreMem(op, addr, val) => Statement::StoreMem(*op, f(addr), f(val)),
            Statement::Jump(cond, a, b) => Statement::Jump(g(cond), *a, *b),
            Statement::IndirectJump(e) => Statement::IndirectJump(f(e)),
            Statement::Syscall(a) => Statement::Syscall(*a),
            Statement::Break => Statement::Break,
        }
    }
}

/// A non-empty, terminator-ended basic block.
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct Block {
    /// Statements in program order. Invariant: at most the last element is
    /// a terminator.
    pub statements: Vec<Statement>,
}

impl Block {
    pub fn new() -> Block {
        Block { statements: Vec::new() }
    }

    pub fn terminator(&self) -> Option<&Statement> {
        self.statements.last().filter(|s| s.is_terminator())
    }
}

/// The whole program: a mapping from basic-block entry address to block.
pub type BlockMap = Map<Address, Block>;
