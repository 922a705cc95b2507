//! Global constants

/// Sizes in bytes.
pub const WORD_SIZE: usize = 4;
pub const HALFWORD_SIZE: usize = 2;
pub const BYTE_SIZE: usize = 1;

/// Number of general purpose registers.
pub const GPR_COUNT: usize = 32;

/// Number of addressable control and status registers (12-bit index).
pub const CSR_COUNT: usize = 4096;

/// Machine trap-vector base address CSR.
pub const MTVEC: u16 = 0x305;

/// Default size of the emulated memory image.
pub const DEFAULT_MEMORY_SIZE: usize = 64 * 1024;

// Masks to isolate specific parts of the instruction using logical AND (&)
pub const FUNCT7_MASK: u32 = 0xfe000000;
pub const FUNCT3_MASK: u32 = 0x7000;
pub const RS1_MASK: u32 = 0xf8000;
pub const RS2_MASK: u32 = 0x1f00000;
pub const RD_MASK: u32 = 0xf80;
pub const OPCODE_MASK: u32 = 0x7f;
pub const CSR_MASK: u32 = 0xfff00000;

// Indices of instruction parts for shifting
pub const FUNCT7_SHIFT: u8 = 25;
pub const FUNCT3_SHIFT: u8 = 12;
pub const RS1_SHIFT: u8 = 15;
pub const RS2_SHIFT: u8 = 20;
pub const RD_SHIFT: u8 = 7;
pub const CSR_SHIFT: u8 = 20;
