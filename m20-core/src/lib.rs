//! Instruction-set simulator core for the M-20, a Soviet vacuum-tube
//! computer of the late 1950s: the 45-bit word and its floating-point
//! arithmetic, memory, the instruction dispatcher, the magnetic drum and
//! the console printer, plus the reader for text-form memory images.

// Clippy rules to disable.
#![allow(clippy::new_without_default)]

pub mod constants;
pub mod drum;
pub mod ext_io;
pub mod float;
pub mod gost;
pub mod image;
pub mod machine;
pub mod memory;
pub mod opcodes;
pub mod printer;
pub mod stop;
