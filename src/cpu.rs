//! Architectural CPU state, execute stage and write-back stage.

use crate::alu::alu;
use crate::consts;
use crate::error::EmulatorError;
use crate::instruction::{Function, Instruction};
use crate::register::{CsrFile, RegisterFile};

/// The whole architectural state of one RV32I hart.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cpu {
    pub reg: RegisterFile,
    pub pc: u32,
    /// Set when the run loop halts.
    pub exit: u32,
    pub csr: CsrFile,
}

/// Output of the execute stage.
///
/// `result` is the ALU value, the effective address of a load/store, the old
/// CSR value, or the new pc when `branches` is set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Executed {
    pub branches: bool,
    pub result: u32,
}

impl Executed {
    fn value(result: u32) -> Self {
        Executed {
            branches: false,
            result,
        }
    }

    fn jump(target: u32) -> Self {
        Executed {
            branches: true,
            result: target,
        }
    }
}

impl Cpu {
    pub fn new() -> Cpu {
        Cpu::default()
    }

    /// Commits `data` into `inst`'s destination register.
    ///
    /// Stores, branches, traps, fences and unknown instructions write
    /// nothing. Writes to x0 are dropped by the register file.
    pub fn write_back(&mut self, data: u32, inst: &Instruction) {
        if inst.function.writes_back() {
            self.reg.write(inst.fields.rd, data);
        }
    }
}

/// Computes the effect of `inst` against `cpu` without mutating it.
pub fn execute(inst: &Instruction, cpu: &Cpu) -> Result<Executed, EmulatorError> {
    use crate::instruction::Function::*;

    let fields = &inst.fields;
    let rs1 = cpu.reg.read(fields.rs1);
    let rs2 = cpu.reg.read(fields.rs2);
    let imm_i = fields.imm_i as u32;

    let executed = match inst.function {
        Lb | Lh | Lw | Lbu | Lhu => Executed::value(rs1.wrapping_add(imm_i)),
        Sb | Sh | Sw => Executed::value(rs1.wrapping_add(fields.imm_s as u32)),
        Add | Sub | Sll | Slt | Sltu | Xor | Srl | Sra | Or | And => {
            Executed::value(alu(inst.function, rs1, rs2))
        }
        Addi | Slti | Sltiu | Xori | Ori | Andi | Slli | Srli | Srai => {
            Executed::value(alu(inst.function, rs1, imm_i))
        }
        Beq | Bne | Blt | Bge | Bltu | Bgeu => {
            if alu(inst.function, rs1, rs2) == 1 {
                Executed::jump(cpu.pc.wrapping_add(fields.imm_b as u32))
            } else {
                Executed::value(0)
            }
        }
        Jal => Executed::jump(cpu.pc.wrapping_add(fields.imm_j as u32)),
        Jalr => Executed::jump(rs1.wrapping_add(imm_i) & !1),
        Lui => Executed::value((fields.imm_u << 12) as u32),
        AuiPc => Executed::value(cpu.pc.wrapping_add((fields.imm_u << 12) as u32)),
        Csrrw | Csrrs | Csrrc | Csrrwi | Csrrsi | Csrrci => {
            Executed::value(cpu.csr.read(fields.csr))
        }
        Ecall | Ebreak => Executed::jump(cpu.csr.read(consts::MTVEC)),
        Fence => Executed::value(0),
        Function::Unknown => {
            return Err(EmulatorError::UnknownInstruction {
                pc: cpu.pc,
                value: inst.value,
            })
        }
    };
    Ok(executed)
}
