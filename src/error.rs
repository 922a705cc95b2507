use thiserror::Error;

/// Conditions that halt emulation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmulatorError {
    /// The fetched word matches no RV32I encoding.
    #[error("unknown instruction {value:#010x} at pc {pc:#010x}")]
    UnknownInstruction { pc: u32, value: u32 },

    /// Fetch, load or store outside the memory image.
    #[error("{size}-byte access at {addr:#010x} is out of memory range")]
    MemoryOutOfRange { addr: u32, size: usize },
}
