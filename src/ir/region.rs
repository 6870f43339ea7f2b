//! A bitmap abstraction over guest registers and memory, used wherever a
//! pass needs to ask whether one statement's effect could be observed by
//! another.
//!
//! Backed by a single `u64`: bit 0 is "any memory location", bits 1..=31
//! are the 31 registers in [`RegName`]'s declaration order.

use crate::common::RegName;
use crate::ir::expr::{CondExpr, Expr};
use crate::ir::stmt::Statement;

const MEMORY_BIT: u64 = 1 << 0;

/// A set of guest storage locations: some subset of {memory, the 31
/// registers}.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Default)]
pub struct Region(u64);

impl Region {
    pub fn empty() -> Region {
        Region(0)
    }

    pub fn memory() -> Region {
        Region(MEMORY_BIT)
    }

    /// The region that overlaps everything, used for `Syscall`.
    pub fn all() -> Region {
        Region(u64::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: Region) -> Region {
        Region(self.0 | other.0)
    }

    pub fn difference(self, other: Region) -> Region {
        Region(self.0 & !other.0)
    }

    pub fn overlaps(self, other: Region) -> bool {
        (self.0 & other.0) != 0
    }
}

impl std::ops::BitOr for Region {
    type Output = Region;
    fn bitor(self, rhs: Region) -> Region {
        self.union(rhs)
    }
}

/// The region denoting exactly one register.
pub fn region_of(r: RegName) -> Region {
    let index = RegName::ALL.iter().position(|x| *x == r).expect("RegName::ALL is exhaustive");
    Region(1 << (index + 1))
}

pub fn read_region_expr(e: &Expr) -> Region {
    match e {
        Expr::Lit(_) | Expr::Var(_) => Region::empty(),
        Expr::LoadReg(r) => region_of(*r),
        Expr::LoadMem(_, addr) => Region::memory().union(read_region_expr(addr)),
        Expr::Un(_, e) => read_region_expr(e),
        Expr::Bin(_, lhs, rhs) => read_region_expr(lhs).union(read_region_expr(rhs)),
    }
}

pub fn read_region_cond(c: &CondExpr) -> Region {
    match c {
        CondExpr::BinCond(_, lhs, rhs) => read_region_expr(lhs).union(read_region_expr(rhs)),
        CondExpr::LitCond(_) => Region::empty(),
    }
}

/// The set of locations a statement reads. `Syscall` reads everything;
/// `Break` reads nothing.
pub fn read_region(s: &Statement) -> Region {
    match s {
        Statement::Let(_, e) => read_region_expr(e),
        Statement::StoreReg(_, e) => read_region_expr(e),
        Statement::StoreMem(_, addr, val) => read_region_expr(addr).union(read_region_expr(val)),
        Statement::Jump(cond, _, _) => read_region_cond(cond),
        Statement::IndirectJump(e) => read_region_expr(e),
        Statement::Syscall(_) => Region::all(),
        Statement::Break => Region::empty(),
    }
}

/// The set of locations a statement writes. `Syscall` writes everything;
/// control-transfer statements write nothing.
pub fn write_region(s: &Statement) -> Region {
    match s {
        Statement::Let(..) => Region::empty(),
        Statement::StoreReg(r, _) => region_of(*r),
        Statement::StoreMem(..) => Region::memory(),
        Statement::Jump(..) | Statement::IndirectJump(_) | Statement::Break => Region::empty(),
        Statement::Syscall(_) => Region::all(),
    }
}
