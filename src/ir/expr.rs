//! Pure expression trees and the host-side evaluators that give literal
//! operators their RISC-V-defined meaning.

use derive_more::Display;

use crate::common::{BinOp, CondOp, MemOp, RegName, UnOp, VarName};

/// A pure expression: reading it has no observable effect beyond producing
/// a 32-bit value.
#[derive(Clone, Debug, Display, Eq, PartialEq, Hash)]
pub enum Expr {
    #[display("{_0}")]
    Lit(i32),
    #[display("{_0}")]
    Var(VarName),
    #[display("{_0}")]
    LoadReg(RegName),
    #[display("{_0}[{_1}]")]
    LoadMem(MemOp, Box<Expr>),
    #[display("({_0} {_1})")]
    Un(UnOp, Box<Expr>),
    #[display("({_1} {_0} {_2})")]
    Bin(BinOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn bin(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Bin(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn un(op: UnOp, e: Expr) -> Expr {
        Expr::Un(op, Box::new(e))
    }

    pub fn load_mem(op: MemOp, addr: Expr) -> Expr {
        Expr::LoadMem(op, Box::new(addr))
    }

    /// True for literals, variable reads, and register reads: expressions
    /// substitution may duplicate freely. Anything else is only duplicated
    /// when the bound variable is referenced at most once.
    pub fn is_simple(&self) -> bool {
        matches!(self, Expr::Lit(_) | Expr::Var(_) | Expr::LoadReg(_))
    }

    /// Recursively replace every occurrence of `Var(from)` with `to`.
    pub fn substitute(&self, from: VarName, to: &Expr) -> Expr {
        match self {
            Expr::Var(v) if *v == from => to.clone(),
            Expr::Lit(_) | Expr::Var(_) | Expr::LoadReg(_) => self.clone(),
            Expr::LoadMem(op, addr) => Expr::load_mem(*op, addr.substitute(from, to)),
            Expr::Un(op, e) => Expr::un(*op, e.substitute(from, to)),
            Expr::Bin(op, lhs, rhs) => {
                Expr::bin(*op, lhs.substitute(from, to), rhs.substitute(from, to))
            }
        }
    }

    /// Count occurrences of `Var(v)` in this expression.
    pub fn count_uses(&self, v: VarName) -> usize {
        match self {
            Expr::Var(x) if *x == v => 1,
            Expr::Lit(_) | Expr::Var(_) | Expr::LoadReg(_) => 0,
            Expr::LoadMem(_, addr) => addr.count_uses(v),
            Expr::Un(_, e) => e.count_uses(v),
            Expr::Bin(_, lhs, rhs) => lhs.count_uses(v) + rhs.count_uses(v),
        }
    }
}

/// A branch condition: either a binary comparison or a resolved literal
/// boolean.
#[derive(Clone, Debug, Display, Eq, PartialEq, Hash)]
pub enum CondExpr {
    #[display("({_1} {_0} {_2})")]
    BinCond(CondOp, Expr, Expr),
    #[display("{_0}")]
    LitCond(bool),
}

impl CondExpr {
    pub fn substitute(&self, from: VarName, to: &Expr) -> CondExpr {
        match self {
            CondExpr::BinCond(op, lhs, rhs) => {
                CondExpr::BinCond(*op, lhs.substitute(from, to), rhs.substitute(from, to))
            }
            CondExpr::LitCond(_) => self.clone(),
        }
    }

    pub fn count_uses(&self, v: VarName) -> usize {
        match self {
            CondExpr::BinCond(_, lhs, rhs) => lhs.count_uses(v) + rhs.count_uses(v),
            CondExpr::LitCond(_) => 0,
        }
    }
}

/// Apply a unary operator to a host-resident literal.
pub fn apply_un(op: UnOp, x: i32) -> i32 {
    match op {
        UnOp::Negate => x.wrapping_neg(),
        UnOp::Not => !x,
    }
}

/// Apply a binary operator to two host-resident literals, replicating
/// RISC-V's division-by-zero and signed-overflow semantics.
pub fn apply_bin(op: BinOp, a: i32, b: i32) -> i32 {
    match op {
        BinOp::Add => a.wrapping_add(b),
        BinOp::Sub => a.wrapping_sub(b),
        BinOp::Mult => a.wrapping_mul(b),
        BinOp::MultHi => (((a as i64) * (b as i64)) >> 32) as i32,
        BinOp::MultHiU => (((a as u32 as u64) * (b as u32 as u64)) >> 32) as i32,
        BinOp::Quot => {
            if b == 0 {
                -1
            } else if a == i32::MIN && b == -1 {
                i32::MIN
            } else {
                a.wrapping_div(b)
            }
        }
        BinOp::QuotU => {
            if b == 0 {
                -1
            } else {
                ((a as u32) / (b as u32)) as i32
            }
        }
        BinOp::Rem => {
            if b == 0 {
                a
            } else if a == i32::MIN && b == -1 {
                0
            } else {
                a.wrapping_rem(b)
            }
        }
        BinOp::RemU => {
            if b == 0 {
                a
            } else {
                ((a as u32) % (b as u32)) as i32
            }
        }
        BinOp::And => a & b,
        BinOp::Or => a | b,
        BinOp::Xor => a ^ b,
        BinOp::LogicalShiftLeft => ((a as u32).wrapping_shl(b as u32 & 0x1f)) as i32,
        BinOp::LogicalShiftRight => ((a as u32).wrapping_shr(b as u32 & 0x1f)) as i32,
        BinOp::ArithShiftRight => a.wrapping_shr(b as u32 & 0x1f),
        BinOp::SetIfLess => (a < b) as i32,
        BinOp::SetIfLessU => ((a as u32) < (b as u32)) as i32,
    }
}

/// Apply a condition operator to two host-resident literals.
pub fn apply_cond(op: CondOp, a: i32, b: i32) -> bool {
    match op {
        CondOp::Equal => a == b,
        CondOp::NotEqual => a != b,
        CondOp::LessThan => a < b,
        CondOp::LessThanU => (a as u32) < (b as u32),
        CondOp::GtrEqual => a >= b,
        CondOp::GtrEqualU => (a as u32) >= (b as u32),
    }
}
