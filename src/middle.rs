//! The mid-end: basic-block recovery and the fixed-point simplifier
//! pipeline. This is the hardest and most interesting part of the
//! translator; everything else in the crate exists to feed it input and
//! carry its output onward.

pub mod alloc;
pub mod block_builder;
pub mod constprop;
pub mod driver;
pub mod dse;
pub mod fold;
pub mod liveness;
pub mod nonfinal;
pub mod subst;
pub mod useless;

pub use alloc::{allocate_locals, AllocatedBlock};
pub use block_builder::build_blocks;
pub use driver::simplify;
pub use liveness::{analyze as analyze_liveness, InOut, LivenessMap};
