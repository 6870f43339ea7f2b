//! The emitter interface: the data contract handed to an out-of-scope
//! target-language code generator.

pub mod emit;

pub use emit::{DebugEmitter, Emitter, EmitterInput};
