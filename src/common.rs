//! Common definitions shared across the translator.

use derive_more::Display;

// Use sorted sets and maps for consistent output.
pub use std::collections::{BTreeMap as Map, BTreeSet as Set};

/// A guest address.
pub type Address = u32;

/// Interned identifiers.
pub type Id = internment::Intern<String>;

/// An IR virtual variable name, unique within a single basic block.
pub type VarName = Id;

/// The 31 general-purpose RISC-V integer registers. The zero register is
/// elided. Declaration order matches the bit order `region_of` assigns.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum RegName {
    #[display("ra")]
    Ra,
    #[display("sp")]
    Sp,
    #[display("gp")]
    Gp,
    #[display("tp")]
    Tp,
    #[display("t0")]
    T0,
    #[display("t1")]
    T1,
    #[display("t2")]
    T2,
    #[display("t3")]
    T3,
    #[display("t4")]
    T4,
    #[display("t5")]
    T5,
    #[display("t6")]
    T6,
    #[display("s0")]
    S0,
    #[display("s1")]
    S1,
    #[display("s2")]
    S2,
    #[display("s3")]
    S3,
    #[display("s4")]
    S4,
    #[display("s5")]
    S5,
    #[display("s6")]
    S6,
    #[display("s7")]
    S7,
    #[display("s8")]
    S8,
    #[display("s9")]
    S9,
    #[display("s10")]
    S10,
    #[display("s11")]
    S11,
    #[display("a0")]
    A0,
    #[display("a1")]
    A1,
    #[display("a2")]
    A2,
    #[display("a3")]
    A3,
    #[display("a4")]
    A4,
    #[display("a5")]
    A5,
    #[display("a6")]
    A6,
    #[display("a7")]
    A7,
}

impl RegName {
    /// All 31 registers, in bit order.
    pub const ALL: [RegName; 31] = {
        use RegName::*;
        [
            Ra, Sp, Gp, Tp, T0, T1, T2, T3, T4, T5, T6, S0, S1, S2, S3, S4, S5, S6, S7, S8, S9,
            S10, S11, A0, A1, A2, A3, A4, A5, A6, A7,
        ]
    };
}

/// Width and signedness of a guest memory access.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum MemOp {
    #[display("lb")]
    LoadByte,
    #[display("lbu")]
    LoadByteU,
    #[display("lh")]
    LoadHalf,
    #[display("lhu")]
    LoadHalfU,
    #[display("lw")]
    LoadWord,
    #[display("sb")]
    StoreByte,
    #[display("sh")]
    StoreHalf,
    #[display("sw")]
    StoreWord,
}

/// Unary operators.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum UnOp {
    #[display("-")]
    Negate,
    #[display("~")]
    Not,
}

/// Binary operators over 32-bit two's-complement integers.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum BinOp {
    #[display("+")]
    Add,
    #[display("-")]
    Sub,
    #[display("*")]
    Mult,
    #[display("mulh")]
    MultHi,
    #[display("mulhu")]
    MultHiU,
    #[display("/")]
    Quot,
    #[display("divu")]
    QuotU,
    #[display("%")]
    Rem,
    #[display("remu")]
    RemU,
    #[display("&")]
    And,
    #[display("|")]
    Or,
    #[display("^")]
    Xor,
    #[display("<<")]
    LogicalShiftLeft,
    #[display(">>l")]
    LogicalShiftRight,
    #[display(">>a")]
    ArithShiftRight,
    #[display("slt")]
    SetIfLess,
    #[display("sltu")]
    SetIfLessU,
}

impl BinOp {
    /// Operators for which swapping operands is a no-op.
    pub fn is_commutative(self) -> bool {
        matches!(
            self,
            BinOp::Add
                | BinOp::Mult
                | BinOp::MultHi
                | BinOp::MultHiU
                | BinOp::And
                | BinOp::Or
                | BinOp::Xor
        )
    }

    /// Operators for which `(a op b) op c == a op (b op c)`.
    pub fn is_associative(self) -> bool {
        matches!(self, BinOp::Add | BinOp::Mult | BinOp::And | BinOp::Or | BinOp::Xor)
    }
}

/// Condition operators, used only inside [`crate::ir::CondExpr`].
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum CondOp {
    #[display("==")]
    Equal,
    #[display("!=")]
    NotEqual,
    #[display("<")]
    LessThan,
    #[display("<u")]
    LessThanU,
    #[display(">=")]
    GtrEqual,
    #[display(">=u")]
    GtrEqualU,
}
