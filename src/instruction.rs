//! Instruction decode stage.

use std::fmt;

use crate::consts;

/// A single machine instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub value: u32,

    /// Category of the instruction, e.g., load, branch, or op
    pub opcode: Opcode,

    /// Struct for accessing the subfields' bits
    pub fields: Fields,

    /// Instruction's mnemonic, e.g., JAL, XOR, or SRA
    pub function: Function,
}

impl Instruction {
    /// Decodes a raw little-endian RV32I word.
    ///
    /// Words that match no RV32I encoding decode to `Function::Unknown`;
    /// rejecting them is left to the execute stage.
    pub fn new(value: u32) -> Instruction {
        let opcode: Opcode = value.into();
        let fields = Fields::new(value);
        let function = Function::new(opcode, &fields);
        Instruction {
            value,
            opcode,
            fields,
            function,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:08x} {:?} {}", self.value, self.function, self.fields)
    }
}

/// Decodes one instruction word.
pub fn decode(word: u32) -> Instruction {
    Instruction::new(word)
}

/// Sign-extends the low `bits` bits of `value`.
fn sign_extend(value: u32, bits: u32) -> i32 {
    let shamt = 32 - bits;
    ((value << shamt) as i32) >> shamt
}

/// RISC-V 32I fields.
///
/// All five immediate layouts are extracted for every word. Only the one
/// matching the instruction's format carries meaning.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fields {
    pub rs1: u8,
    pub rs2: u8,
    pub rd: u8,
    pub funct3: u8,
    pub funct7: u8,
    pub imm_i: i32,
    pub imm_s: i32,
    pub imm_b: i32,
    /// Upper 20 bits, not yet shifted into place.
    pub imm_u: i32,
    pub imm_j: i32,
    pub csr: u16,
}

impl Fields {
    pub fn new(inst: u32) -> Self {
        use crate::consts::*;
        let rs1 = ((inst & RS1_MASK) >> RS1_SHIFT) as u8;
        let rs2 = ((inst & RS2_MASK) >> RS2_SHIFT) as u8;
        let rd = ((inst & RD_MASK) >> RD_SHIFT) as u8;
        let funct3 = ((inst & FUNCT3_MASK) >> FUNCT3_SHIFT) as u8;
        let funct7 = ((inst & FUNCT7_MASK) >> FUNCT7_SHIFT) as u8;
        let csr = ((inst & CSR_MASK) >> CSR_SHIFT) as u16;

        let imm_i = sign_extend((inst & 0xfff00000) >> 20, 12);
        let imm_s = sign_extend(((inst & 0xfe000000) >> 20) | ((inst & 0xf80) >> 7), 12);
        // imm[12|10:5] rs2 rs1 funct3 imm[4:1|11]
        let imm_b = sign_extend(
            ((inst & 0x80000000) >> 19)
                | ((inst & 0x80) << 4)
                | ((inst & 0x7e000000) >> 20)
                | ((inst & 0xf00) >> 7),
            13,
        );
        let imm_u = (inst as i32) >> 12;
        // imm[20|10:1|11|19:12]
        let imm_j = sign_extend(
            ((inst & 0x80000000) >> 11)
                | (inst & 0xff000)
                | ((inst & 0x100000) >> 9)
                | ((inst & 0x7fe00000) >> 20),
            21,
        );

        Fields {
            rs1,
            rs2,
            rd,
            funct3,
            funct7,
            imm_i,
            imm_s,
            imm_b,
            imm_u,
            imm_j,
            csr,
        }
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "rd={} rs1={} rs2={} imm_i={} imm_s={} imm_b={} imm_u={:#x} imm_j={} csr={:#x}",
            self.rd,
            self.rs1,
            self.rs2,
            self.imm_i,
            self.imm_s,
            self.imm_b,
            self.imm_u,
            self.imm_j,
            self.csr
        )
    }
}

/// RISC-V 32I opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    Lui,
    AuiPc,
    Jal,
    Jalr,
    Branch,
    Load,
    Store,
    Op,
    OpImm,
    MiscMem,
    System,
    /// Any major opcode outside the base integer ISA.
    Unknown,
}

impl From<u32> for Opcode {
    fn from(val: u32) -> Self {
        let opcode = val & consts::OPCODE_MASK;
        match opcode {
            0b01_101_11 => Opcode::Lui,
            0b00_101_11 => Opcode::AuiPc,
            0b11_011_11 => Opcode::Jal,
            0b11_001_11 => Opcode::Jalr,
            0b11_000_11 => Opcode::Branch,
            0b00_000_11 => Opcode::Load,
            0b01_000_11 => Opcode::Store,
            0b01_100_11 => Opcode::Op,
            0b00_100_11 => Opcode::OpImm,
            0b00_011_11 => Opcode::MiscMem,
            0b11_100_11 => Opcode::System,
            _ => Opcode::Unknown,
        }
    }
}

/// RISC-V 32I mnemonics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Function {
    /// Load upper immediate
    Lui,
    /// Add upper immediate to PC
    AuiPc,
    // Jumps
    /// Jump and link
    Jal,
    /// Jump and link register
    Jalr,
    // Branches
    /// Branch if equal
    Beq,
    /// Branch if not equal
    Bne,
    /// Branch if less than
    Blt,
    /// Branch if greater or equal
    Bge,
    /// Branch if less than (unsigned)
    Bltu,
    /// Branch if greater or equal (unsigned)
    Bgeu,
    // Loads
    /// Load byte
    Lb,
    /// Load halfword
    Lh,
    /// Load word
    Lw,
    /// Load byte (unsigned)
    Lbu,
    /// Load halfword (unsigned)
    Lhu,
    // Stores
    /// Store byte
    Sb,
    /// Store halfword
    Sh,
    /// Store word
    Sw,
    // Operations on immediates
    /// Add immediate
    Addi,
    /// Set less than immediate
    Slti,
    /// Set less than immediate (unsigned)
    Sltiu,
    /// Exclusive or immediate
    Xori,
    /// Logical Or immediate
    Ori,
    /// Logical And immediate
    Andi,
    /// Shift left logical immediate
    Slli,
    /// Shift right logical immediate
    Srli,
    /// Shift right arithmetic immediate
    Srai,
    // Operations on registers
    /// Add
    Add,
    /// Subtract
    Sub,
    /// Shift left logical
    Sll,
    /// Set less than
    Slt,
    /// Set less than unsigned
    Sltu,
    /// Exclusive or
    Xor,
    /// Shift right logical
    Srl,
    /// Shift right arithmetic
    Sra,
    /// Logical Or
    Or,
    /// Logical And
    And,
    Fence,
    Ecall,
    Ebreak,
    // CSR access
    /// Atomic read/write CSR
    Csrrw,
    /// Atomic read and set bits in CSR
    Csrrs,
    /// Atomic read and clear bits in CSR
    Csrrc,
    /// Atomic read/write CSR (immediate)
    Csrrwi,
    /// Atomic read and set bits in CSR (immediate)
    Csrrsi,
    /// Atomic read and clear bits in CSR (immediate)
    Csrrci,
    /// Any bit pattern that is not an RV32I instruction
    Unknown,
}

impl Function {
    pub fn new(opcode: Opcode, fields: &Fields) -> Function {
        // Check opcode-only functions
        match opcode {
            Opcode::Lui => Function::Lui,
            Opcode::AuiPc => Function::AuiPc,
            Opcode::Jal => Function::Jal,
            Opcode::Unknown => Function::Unknown,
            _ => {
                // Check rest of functions
                match (opcode, fields.funct3, fields.funct7) {
                    (Opcode::Jalr, 0b000, _) => Function::Jalr,
                    (Opcode::Branch, 0b000, _) => Function::Beq,
                    (Opcode::Branch, 0b001, _) => Function::Bne,
                    (Opcode::Branch, 0b100, _) => Function::Blt,
                    (Opcode::Branch, 0b101, _) => Function::Bge,
                    (Opcode::Branch, 0b110, _) => Function::Bltu,
                    (Opcode::Branch, 0b111, _) => Function::Bgeu,
                    (Opcode::Load, 0b000, _) => Function::Lb,
                    (Opcode::Load, 0b001, _) => Function::Lh,
                    (Opcode::Load, 0b010, _) => Function::Lw,
                    (Opcode::Load, 0b100, _) => Function::Lbu,
                    (Opcode::Load, 0b101, _) => Function::Lhu,
                    (Opcode::Store, 0b000, _) => Function::Sb,
                    (Opcode::Store, 0b001, _) => Function::Sh,
                    (Opcode::Store, 0b010, _) => Function::Sw,
                    (Opcode::OpImm, 0b000, _) => Function::Addi,
                    (Opcode::OpImm, 0b010, _) => Function::Slti,
                    (Opcode::OpImm, 0b011, _) => Function::Sltiu,
                    (Opcode::OpImm, 0b100, _) => Function::Xori,
                    (Opcode::OpImm, 0b110, _) => Function::Ori,
                    (Opcode::OpImm, 0b111, _) => Function::Andi,
                    (Opcode::OpImm, 0b001, 0b0) => Function::Slli,
                    (Opcode::OpImm, 0b101, 0b0) => Function::Srli,
                    (Opcode::OpImm, 0b101, 0b01_00000) => Function::Srai,
                    (Opcode::Op, 0b000, 0b0) => Function::Add,
                    (Opcode::Op, 0b000, 0b01_00000) => Function::Sub,
                    (Opcode::Op, 0b001, 0b0) => Function::Sll,
                    (Opcode::Op, 0b010, 0b0) => Function::Slt,
                    (Opcode::Op, 0b011, 0b0) => Function::Sltu,
                    (Opcode::Op, 0b100, 0b0) => Function::Xor,
                    (Opcode::Op, 0b101, 0b0) => Function::Srl,
                    (Opcode::Op, 0b101, 0b01_00000) => Function::Sra,
                    (Opcode::Op, 0b110, 0b0) => Function::Or,
                    (Opcode::Op, 0b111, 0b0) => Function::And,
                    (Opcode::MiscMem, 0b000, _) => Function::Fence,
                    (Opcode::System, 0b000, _) if fields.rd == 0 && fields.rs1 == 0 => {
                        match fields.imm_i {
                            0 => Function::Ecall,
                            1 => Function::Ebreak,
                            _ => Function::Unknown,
                        }
                    }
                    (Opcode::System, 0b001, _) => Function::Csrrw,
                    (Opcode::System, 0b010, _) => Function::Csrrs,
                    (Opcode::System, 0b011, _) => Function::Csrrc,
                    (Opcode::System, 0b101, _) => Function::Csrrwi,
                    (Opcode::System, 0b110, _) => Function::Csrrsi,
                    (Opcode::System, 0b111, _) => Function::Csrrci,
                    _ => Function::Unknown,
                }
            }
        }
    }

    pub fn is_branch(self) -> bool {
        use self::Function::*;
        matches!(self, Beq | Bne | Blt | Bge | Bltu | Bgeu)
    }

    pub fn is_load(self) -> bool {
        use self::Function::*;
        matches!(self, Lb | Lh | Lw | Lbu | Lhu)
    }

    pub fn is_store(self) -> bool {
        use self::Function::*;
        matches!(self, Sb | Sh | Sw)
    }

    pub fn is_csr(self) -> bool {
        use self::Function::*;
        matches!(self, Csrrw | Csrrs | Csrrc | Csrrwi | Csrrsi | Csrrci)
    }

    /// Environment calls that hand control to the trap vector.
    pub fn is_trap(self) -> bool {
        matches!(self, Function::Ecall | Function::Ebreak)
    }

    /// False for instructions that never commit a value to `rd`.
    pub fn writes_back(self) -> bool {
        !(self.is_store()
            || self.is_branch()
            || self.is_trap()
            || matches!(self, Function::Fence | Function::Unknown))
    }
}

/// Instruction encoders used to build test programs.
#[cfg(test)]
pub mod encode {
    pub fn r_type(opcode: u32, funct3: u32, funct7: u32, rd: u32, rs1: u32, rs2: u32) -> u32 {
        (funct7 << 25) | (rs2 << 20) | (rs1 << 15) | (funct3 << 12) | (rd << 7) | opcode
    }

    pub fn i_type(opcode: u32, funct3: u32, rd: u32, rs1: u32, imm: i32) -> u32 {
        (((imm as u32) & 0xfff) << 20) | (rs1 << 15) | (funct3 << 12) | (rd << 7) | opcode
    }

    pub fn s_type(opcode: u32, funct3: u32, rs1: u32, rs2: u32, imm: i32) -> u32 {
        let imm = imm as u32;
        (((imm >> 5) & 0x7f) << 25)
            | (rs2 << 20)
            | (rs1 << 15)
            | (funct3 << 12)
            | ((imm & 0x1f) << 7)
            | opcode
    }

    pub fn b_type(funct3: u32, rs1: u32, rs2: u32, imm: i32) -> u32 {
        let imm = imm as u32;
        (((imm >> 12) & 1) << 31)
            | (((imm >> 5) & 0x3f) << 25)
            | (rs2 << 20)
            | (rs1 << 15)
            | (funct3 << 12)
            | (((imm >> 1) & 0xf) << 8)
            | (((imm >> 11) & 1) << 7)
            | 0x63
    }

    pub fn u_type(opcode: u32, rd: u32, imm20: u32) -> u32 {
        ((imm20 & 0xfffff) << 12) | (rd << 7) | opcode
    }

    pub fn j_type(rd: u32, imm: i32) -> u32 {
        let imm = imm as u32;
        (((imm >> 20) & 1) << 31)
            | (((imm >> 1) & 0x3ff) << 21)
            | (((imm >> 11) & 1) << 20)
            | (((imm >> 12) & 0xff) << 12)
            | (rd << 7)
            | 0x6f
    }

    pub fn add(rd: u32, rs1: u32, rs2: u32) -> u32 {
        r_type(0x33, 0b000, 0, rd, rs1, rs2)
    }

    pub fn sub(rd: u32, rs1: u32, rs2: u32) -> u32 {
        r_type(0x33, 0b000, 0b010_0000, rd, rs1, rs2)
    }

    pub fn addi(rd: u32, rs1: u32, imm: i32) -> u32 {
        i_type(0x13, 0b000, rd, rs1, imm)
    }

    pub fn lw(rd: u32, rs1: u32, imm: i32) -> u32 {
        i_type(0x03, 0b010, rd, rs1, imm)
    }

    pub fn lb(rd: u32, rs1: u32, imm: i32) -> u32 {
        i_type(0x03, 0b000, rd, rs1, imm)
    }

    pub fn lh(rd: u32, rs1: u32, imm: i32) -> u32 {
        i_type(0x03, 0b001, rd, rs1, imm)
    }

    pub fn lbu(rd: u32, rs1: u32, imm: i32) -> u32 {
        i_type(0x03, 0b100, rd, rs1, imm)
    }

    pub fn lhu(rd: u32, rs1: u32, imm: i32) -> u32 {
        i_type(0x03, 0b101, rd, rs1, imm)
    }

    pub fn sw(rs1: u32, rs2: u32, imm: i32) -> u32 {
        s_type(0x23, 0b010, rs1, rs2, imm)
    }

    pub fn sh(rs1: u32, rs2: u32, imm: i32) -> u32 {
        s_type(0x23, 0b001, rs1, rs2, imm)
    }

    pub fn sb(rs1: u32, rs2: u32, imm: i32) -> u32 {
        s_type(0x23, 0b000, rs1, rs2, imm)
    }

    pub fn beq(rs1: u32, rs2: u32, imm: i32) -> u32 {
        b_type(0b000, rs1, rs2, imm)
    }

    pub fn bne(rs1: u32, rs2: u32, imm: i32) -> u32 {
        b_type(0b001, rs1, rs2, imm)
    }

    pub fn jal(rd: u32, imm: i32) -> u32 {
        j_type(rd, imm)
    }

    pub fn jalr(rd: u32, rs1: u32, imm: i32) -> u32 {
        i_type(0x67, 0b000, rd, rs1, imm)
    }

    pub fn lui(rd: u32, imm20: u32) -> u32 {
        u_type(0x37, rd, imm20)
    }

    pub fn csr(funct3: u32, rd: u32, rs1: u32, csr: u32) -> u32 {
        (csr << 20) | (rs1 << 15) | (funct3 << 12) | (rd << 7) | 0x73
    }

    pub fn ecall() -> u32 {
        0x0000_0073
    }

    pub fn ebreak() -> u32 {
        0x0010_0073
    }
}
