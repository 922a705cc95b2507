//! Emulator components for the RISC-V 32I instruction set.

pub mod alu;
pub mod consts;
pub mod cpu;
pub mod debug;
pub mod emulator;
pub mod error;
pub mod instruction;
pub mod memory;
pub mod register;

pub use crate::cpu::{execute, Cpu, Executed};
pub use crate::emulator::{run, Emulator, Step};
pub use crate::error::EmulatorError;
pub use crate::instruction::{decode, Function, Instruction};
