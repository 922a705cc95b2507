//! RV32I register file and control/status registers.

use std::fmt;

use crate::consts;

/// A complete RV32I general purpose register file.
///
/// Register indices come from 5-bit instruction fields, so they are always
/// in range.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    gpr: [u32; consts::GPR_COUNT],
}

impl fmt::Display for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[ ")?;
        for (i, reg) in self.gpr.iter().enumerate() {
            write!(f, "#{}={:x}, ", i, reg)?;
        }
        write!(f, "]")
    }
}

impl RegisterFile {
    /// Constructs a new `RegisterFile` with every register cleared.
    pub fn new() -> RegisterFile {
        RegisterFile::default()
    }

    /// Reads the register's value.
    pub fn read(&self, reg: u8) -> u32 {
        self.gpr[reg as usize]
    }

    /// Writes `value` to the register. Writing x0 has no effect.
    pub fn write(&mut self, reg: u8, value: u32) {
        if reg == 0 {
            return;
        }
        self.gpr[reg as usize] = value;
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.gpr
    }
}

/// Control and status register file, 4096 slots addressed by 12-bit index.
#[derive(Clone, PartialEq, Eq)]
pub struct CsrFile {
    regs: Box<[u32]>,
}

impl Default for CsrFile {
    fn default() -> Self {
        CsrFile {
            regs: vec![0; consts::CSR_COUNT].into_boxed_slice(),
        }
    }
}

impl fmt::Debug for CsrFile {
    // Only the populated slots, 4096 zeros are noise.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map()
            .entries(
                self.regs
                    .iter()
                    .enumerate()
                    .filter(|(_, value)| **value != 0)
                    .map(|(index, value)| (format!("{:#05x}", index), format!("{:#010x}", value))),
            )
            .finish()
    }
}

impl CsrFile {
    pub fn new() -> CsrFile {
        CsrFile::default()
    }

    pub fn read(&self, index: u16) -> u32 {
        self.regs[(index as usize) & (consts::CSR_COUNT - 1)]
    }

    pub fn write(&mut self, index: u16, value: u32) {
        self.regs[(index as usize) & (consts::CSR_COUNT - 1)] = value;
    }
}
