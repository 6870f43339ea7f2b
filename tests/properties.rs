//! Property-based tests: constant folding preserves literal semantics,
//! and substitution preserves observable block behavior.

use proptest::prelude::*;

use rv32cc::common::{BinOp, Map, RegName, Set, UnOp};
use rv32cc::ir::{apply_bin, apply_un, CondExpr, Expr, Statement};
use rv32cc::middle::fold::run_const_fold;
use rv32cc::middle::subst::substitute;

// ---------------------------------------------------------------------
// Constant folding preserves semantics on all-literal trees.
// ---------------------------------------------------------------------

fn un_op() -> impl Strategy<Value = UnOp> {
    prop_oneof![Just(UnOp::Negate), Just(UnOp::Not)]
}

fn bin_op() -> impl Strategy<Value = BinOp> {
    prop_oneof![
        Just(BinOp::Add),
        Just(BinOp::Sub),
        Just(BinOp::Mult),
        Just(BinOp::MultHi),
        Just(BinOp::MultHiU),
        Just(BinOp::Quot),
        Just(BinOp::QuotU),
        Just(BinOp::Rem),
        Just(BinOp::RemU),
        Just(BinOp::And),
        Just(BinOp::Or),
        Just(BinOp::Xor),
        Just(BinOp::LogicalShiftLeft),
        Just(BinOp::LogicalShiftRight),
        Just(BinOp::ArithShiftRight),
        Just(BinOp::SetIfLess),
        Just(BinOp::SetIfLessU),
    ]
}

/// Arbitrary literal-only expression trees, bounded to a shallow depth so
/// the generator terminates quickly and `apply_bin`/`apply_un` stay the
/// single source of truth for "what should this evaluate to".
fn literal_expr() -> impl Strategy<Value = Expr> {
    let leaf = any::<i32>().prop_map(Expr::Lit);
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            (un_op(), inner.clone()).prop_map(|(op, e)| Expr::un(op, e)),
            (bin_op(), inner.clone(), inner).prop_map(|(op, l, r)| Expr::bin(op, l, r)),
        ]
    })
}

/// Evaluate a literal-only expression tree directly on the host, using the
/// same per-operator semantics `run_const_fold` is supposed to replicate.
fn eval_literal(e: &Expr) -> i32 {
    match e {
        Expr::Lit(n) => *n,
        Expr::Un(op, x) => apply_un(*op, eval_literal(x)),
        Expr::Bin(op, lhs, rhs) => apply_bin(*op, eval_literal(lhs), eval_literal(rhs)),
        Expr::Var(_) | Expr::LoadReg(_) | Expr::LoadMem(..) => {
            unreachable!("literal_expr() never generates reads")
        }
    }
}

proptest! {
    #[test]
    fn const_fold_preserves_literal_semantics(e in literal_expr()) {
        let expected = eval_literal(&e);
        let folded = run_const_fold(&e);
        match folded {
            Expr::Lit(n) => prop_assert_eq!(n, expected),
            other => prop_assert!(false, "fully literal input folded to non-literal {other:?}"),
        }
    }
}

// ---------------------------------------------------------------------
// Substitution preserves semantics. A tiny interpreter executes a
// block given initial register values and a memory function, recording
// the sequence of observable effects (register writes, memory writes, and
// the terminator). Substituting a `Let` must not change that sequence.
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Effect {
    StoreReg(RegName, i32),
    StoreMem(i32, i32),
    Jump(u32, u32),
    Break,
}

struct Interp {
    regs: Map<RegName, i32>,
    vars: Map<rv32cc::common::VarName, i32>,
    mem: Map<i32, i32>,
}

impl Interp {
    fn eval(&self, e: &Expr) -> i32 {
        match e {
            Expr::Lit(n) => *n,
            Expr::Var(v) => *self.vars.get(v).expect("substitution must not read an unbound Var"),
            Expr::LoadReg(r) => *self.regs.get(r).unwrap_or(&0),
            Expr::LoadMem(_, addr) => {
                let a = self.eval(addr);
                *self.mem.get(&a).unwrap_or(&0)
            }
            Expr::Un(op, x) => apply_un(*op, self.eval(x)),
            Expr::Bin(op, lhs, rhs) => apply_bin(*op, self.eval(lhs), self.eval(rhs)),
        }
    }

    fn eval_cond(&self, c: &CondExpr) -> bool {
        match c {
            CondExpr::LitCond(b) => *b,
            CondExpr::BinCond(op, lhs, rhs) => {
                rv32cc::ir::apply_cond(*op, self.eval(lhs), self.eval(rhs))
            }
        }
    }

    fn run(&mut self, block: &rv32cc::ir::Block) -> Vec<Effect> {
        let mut effects = Vec::new();
        for stmt in &block.statements {
            match stmt {
                Statement::Let(v, e) => {
                    let val = self.eval(e);
                    self.vars.insert(*v, val);
                }
                Statement::StoreReg(r, e) => {
                    let val = self.eval(e);
                    self.regs.insert(*r, val);
                    effects.push(Effect::StoreReg(*r, val));
                }
                Statement::StoreMem(_, addr, val) => {
                    let a = self.eval(addr);
                    let v = self.eval(val);
                    self.mem.insert(a, v);
                    effects.push(Effect::StoreMem(a, v));
                }
                Statement::Jump(cond, a, b) => {
                    let target = if self.eval_cond(cond) { *a } else { *b };
                    effects.push(Effect::Jump(target, target));
                }
                Statement::IndirectJump(_) | Statement::Syscall(_) => {
                    unreachable!("generator never produces these terminators")
                }
                Statement::Break => effects.push(Effect::Break),
            }
        }
        effects
    }
}

fn reg() -> impl Strategy<Value = RegName> {
    prop_oneof![Just(RegName::A0), Just(RegName::A1), Just(RegName::A2)]
}

/// A block shaped like the kind substitution is meant to simplify: bind a
/// local to a register read, then store it (possibly through one more
/// arithmetic layer) into one or two other registers, ending in `Break`.
/// `clobber` controls whether something overwrites the source register
/// between the `Let` and its uses, exercising both the safe and
/// hazard-blocked paths through `substitute`.
fn hazard_block() -> impl Strategy<Value = (rv32cc::ir::Block, bool)> {
    (reg(), reg(), reg(), any::<bool>(), any::<i32>()).prop_map(|(src, clobber_reg, dst, clobber, lit)| {
        let v = internment::Intern::new("v".to_string());
        let mut statements = vec![Statement::Let(v, Expr::LoadReg(src))];
        if clobber {
            statements.push(Statement::StoreReg(clobber_reg, Expr::Lit(lit)));
        }
        statements.push(Statement::StoreReg(dst, Expr::Var(v)));
        statements.push(Statement::Jump(CondExpr::LitCond(true), 0, 0));
        (rv32cc::ir::Block { statements }, clobber && clobber_reg == src)
    })
}

proptest! {
    #[test]
    fn substitution_preserves_observable_effects(
        (block, _is_hazard) in hazard_block(),
        a0 in any::<i32>(), a1 in any::<i32>(), a2 in any::<i32>(),
    ) {
        let initial = || {
            let mut regs = Map::new();
            regs.insert(RegName::A0, a0);
            regs.insert(RegName::A1, a1);
            regs.insert(RegName::A2, a2);
            Interp { regs, vars: Map::new(), mem: Map::new() }
        };

        let before = initial().run(&block);
        let substituted = substitute(&block);
        let after = initial().run(&substituted);

        prop_assert_eq!(before, after);
    }
}

#[test]
fn invalid_optimization_level_rejected_before_any_simplification() {
    // An out-of-range level is rejected by `simplify` itself, before any
    // block is touched.
    let blocks = rv32cc::ir::BlockMap::new();
    let err = rv32cc::middle::simplify(3, &Set::new(), &blocks).unwrap_err();
    assert!(matches!(err, rv32cc::TranslateError::InvalidOptimizationLevel { level: 3 }));
}

#[test]
fn every_error_variant_has_non_empty_display_text() {
    use rv32cc::TranslateError;

    let errors: Vec<TranslateError> = vec![
        TranslateError::MalformedInput { reason: "bad".into() },
        TranslateError::UnknownJumpTarget { from: 0, target: 4 },
        TranslateError::InvalidOptimizationLevel { level: 9 },
        TranslateError::InternalInvariant { detail: "oops".into() },
        TranslateError::Decode("no decoder".into()),
        TranslateError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "missing")),
    ];

    for err in &errors {
        let text = format!("{err}");
        assert!(!text.is_empty());
    }
}
