//! The expression simplifier: constant folding, algebraic identity
//! rewriting, and commute/associate normalization, each run to a fixed
//! point.
//!
//! `run_const_fold` and `run_const_fold_c` are the two public entry
//! points; everything else here is a helper pass composed underneath them.

use crate::common::{BinOp, CondOp, UnOp};
use crate::ir::expr::{apply_bin, apply_cond, apply_un};
use crate::ir::{CondExpr, Expr};

/// Fold `e` to a fixed point of `const_fold ∘ associate ∘ commute`.
pub fn run_const_fold(e: &Expr) -> Expr {
    let mut current = e.clone();
    loop {
        let next = const_fold(&associate(&commute(&current)));
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Fold `c` to a fixed point, recursing into operand expressions via
/// [`run_const_fold`].
pub fn run_const_fold_c(c: &CondExpr) -> CondExpr {
    let mut current = c.clone();
    loop {
        let next = const_fold_cond(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

/// For `Bin(op, a, Lit(c))` with commutative `op`, rewrite to
/// `Bin(op, Lit(c), commute(a))`, placing literals on the left. Recurses
/// under unary, both sides of binary, and memory-load operators.
fn commute(e: &Expr) -> Expr {
    match e {
        Expr::Lit(_) | Expr::Var(_) | Expr::LoadReg(_) => e.clone(),
        Expr::LoadMem(op, addr) => Expr::load_mem(*op, commute(addr)),
        Expr::Un(op, x) => Expr::un(*op, commute(x)),
        Expr::Bin(op, lhs, rhs) => {
            let lhs = commute(lhs);
            let rhs = commute(rhs);
            if op.is_commutative() {
                if let Expr::Lit(_) = rhs {
                    if !matches!(lhs, Expr::Lit(_)) {
                        return Expr::bin(*op, rhs, lhs);
                    }
                }
            }
            Expr::bin(*op, lhs, rhs)
        }
    }
}

/// For `Bin(op1, a, Bin(op2, b, c))` with `op1 == op2` and associative,
/// rewrite to `Bin(op1, Bin(op1, a, b), c)`, re-parenthesizing
/// right-leaning chains into left-leaning ones so adjacent literals
/// cluster.
fn associate(e: &Expr) -> Expr {
    match e {
        Expr::Lit(_) | Expr::Var(_) | Expr::LoadReg(_) => e.clone(),
        Expr::LoadMem(op, addr) => Expr::load_mem(*op, associate(addr)),
        Expr::Un(op, x) => Expr::un(*op, associate(x)),
        Expr::Bin(op1, lhs, rhs) => {
            let lhs = associate(lhs);
            let rhs = associate(rhs);
            if op1.is_associative() {
                if let Expr::Bin(op2, b, c) = &rhs {
                    if *op2 == *op1 {
                        return Expr::bin(*op1, Expr::bin(*op1, lhs, (**b).clone()), (**c).clone());
                    }
                }
            }
            Expr::bin(*op1, lhs, rhs)
        }
    }
}

/// Algebraic identities and literal folding, applied after first folding
/// any fully-literal sub-tree.
fn const_fold(e: &Expr) -> Expr {
    match e {
        Expr::Lit(_) | Expr::Var(_) | Expr::LoadReg(_) => e.clone(),
        Expr::LoadMem(op, addr) => Expr::load_mem(*op, const_fold(addr)),
        Expr::Un(op, x) => {
            let x = const_fold(x);
            match (op, &x) {
                (_, Expr::Lit(c)) => Expr::Lit(apply_un(*op, *c)),
                (UnOp::Negate, Expr::Un(UnOp::Negate, y)) => (**y).clone(),
                (UnOp::Not, Expr::Un(UnOp::Not, y)) => (**y).clone(),
                _ => Expr::un(*op, x),
            }
        }
        Expr::Bin(op, lhs, rhs) => fold_bin(*op, const_fold(lhs), const_fold(rhs)),
    }
}

fn negate(x: &Expr) -> Expr {
    Expr::un(UnOp::Negate, x.clone())
}

fn fold_bin(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
    use BinOp::*;

    if let (Expr::Lit(a), Expr::Lit(b)) = (&lhs, &rhs) {
        return Expr::Lit(apply_bin(op, *a, *b));
    }

    match op {
        Add => {
            if lhs == Expr::Lit(0) {
                return rhs;
            }
            if let Expr::Un(UnOp::Negate, y) = &rhs {
                return fold_bin(Sub, lhs, (**y).clone());
            }
            if let Expr::Un(UnOp::Negate, x) = &lhs {
                return fold_bin(Sub, rhs, (**x).clone());
            }
            Expr::bin(Add, lhs, rhs)
        }
        Sub => {
            if rhs == Expr::Lit(0) {
                return lhs;
            }
            if lhs == Expr::Lit(0) {
                return negate(&rhs);
            }
            if lhs == rhs {
                return Expr::Lit(0);
            }
            if let Expr::Un(UnOp::Negate, y) = &rhs {
                return fold_bin(Add, lhs, (**y).clone());
            }
            Expr::bin(Sub, lhs, rhs)
        }
        Mult => {
            if lhs == Expr::Lit(1) {
                return rhs;
            }
            if lhs == Expr::Lit(0) {
                return Expr::Lit(0);
            }
            if lhs == Expr::Lit(-1) {
                return negate(&rhs);
            }
            Expr::bin(Mult, lhs, rhs)
        }
        MultHi => {
            if lhs == Expr::Lit(0) {
                return Expr::Lit(0);
            }
            Expr::bin(MultHi, lhs, rhs)
        }
        MultHiU => {
            if lhs == Expr::Lit(0) || lhs == Expr::Lit(1) {
                return Expr::Lit(0);
            }
            Expr::bin(MultHiU, lhs, rhs)
        }
        Quot => {
            if rhs == Expr::Lit(1) {
                return lhs;
            }
            Expr::bin(Quot, lhs, rhs)
        }
        QuotU => {
            if rhs == Expr::Lit(1) {
                return lhs;
            }
            Expr::bin(QuotU, lhs, rhs)
        }
        Rem => {
            if rhs == Expr::Lit(1) || rhs == Expr::Lit(-1) {
                return Expr::Lit(0);
            }
            Expr::bin(Rem, lhs, rhs)
        }
        RemU => {
            if rhs == Expr::Lit(1) {
                return Expr::Lit(0);
            }
            Expr::bin(RemU, lhs, rhs)
        }
        And => {
            if lhs == Expr::Lit(-1) {
                return rhs;
            }
            if lhs == Expr::Lit(0) {
                return Expr::Lit(0);
            }
            Expr::bin(And, lhs, rhs)
        }
        Or => {
            if lhs == Expr::Lit(-1) {
                return Expr::Lit(-1);
            }
            if lhs == Expr::Lit(0) {
                return rhs;
            }
            Expr::bin(Or, lhs, rhs)
        }
        Xor => {
            if lhs == Expr::Lit(-1) {
                return Expr::un(UnOp::Not, rhs);
            }
            if lhs == Expr::Lit(0) {
                return rhs;
            }
            Expr::bin(Xor, lhs, rhs)
        }
        LogicalShiftLeft => {
            if rhs == Expr::Lit(0) {
                return lhs;
            }
            Expr::bin(LogicalShiftLeft, lhs, rhs)
        }
        LogicalShiftRight => {
            if rhs == Expr::Lit(0) {
                return lhs;
            }
            Expr::bin(LogicalShiftRight, lhs, rhs)
        }
        ArithShiftRight => {
            if rhs == Expr::Lit(0) {
                return lhs;
            }
            Expr::bin(ArithShiftRight, lhs, rhs)
        }
        SetIfLess => {
            if lhs == rhs {
                return Expr::Lit(0);
            }
            Expr::bin(SetIfLess, lhs, rhs)
        }
        SetIfLessU => {
            if lhs == rhs {
                return Expr::Lit(0);
            }
            if rhs == Expr::Lit(0) {
                return Expr::Lit(0);
            }
            Expr::bin(SetIfLessU, lhs, rhs)
        }
    }
}

fn const_fold_cond(c: &CondExpr) -> CondExpr {
    match c {
        CondExpr::LitCond(_) => c.clone(),
        CondExpr::BinCond(op, lhs, rhs) => {
            let lhs = run_const_fold(lhs);
            let rhs = run_const_fold(rhs);

            if let (Expr::Lit(a), Expr::Lit(b)) = (&lhs, &rhs) {
                return CondExpr::LitCond(apply_cond(*op, *a, *b));
            }
            if *op == CondOp::Equal && lhs == rhs {
                return CondExpr::LitCond(true);
            }
            if *op == CondOp::NotEqual || *op == CondOp::Equal {
                if let Expr::Bin(BinOp::SetIfLessU, e1, e2) = &lhs {
                    if rhs == Expr::Lit(0) {
                        return if *op == CondOp::NotEqual {
                            CondExpr::BinCond(CondOp::LessThanU, (**e1).clone(), (**e2).clone())
                        } else {
                            CondExpr::BinCond(CondOp::GtrEqualU, (**e1).clone(), (**e2).clone())
                        };
                    }
                }
                if let Expr::Bin(BinOp::SetIfLess, e1, e2) = &lhs {
                    if rhs == Expr::Lit(0) {
                        return if *op == CondOp::NotEqual {
                            CondExpr::BinCond(CondOp::LessThan, (**e1).clone(), (**e2).clone())
                        } else {
                            CondExpr::BinCond(CondOp::GtrEqual, (**e1).clone(), (**e2).clone())
                        };
                    }
                }
            }
            if *op == CondOp::LessThanU && rhs == Expr::Lit(0) {
                return CondExpr::LitCond(false);
            }
            if *op == CondOp::GtrEqualU && rhs == Expr::Lit(0) {
                return CondExpr::LitCond(true);
            }
            CondExpr::BinCond(*op, lhs, rhs)
        }
    }
}
