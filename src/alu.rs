//! Arithmetic logic unit.

use crate::instruction::Function;

/// Perform one ALU operation.
///
/// Operands are raw register bits; signed mnemonics reinterpret them as
/// `i32`. Comparisons and branch conditions produce 0 or 1. Mnemonics with
/// no ALU work yield 0.
pub fn alu(func: Function, input1: u32, input2: u32) -> u32 {
    use crate::instruction::Function::*;

    let shamt = input2 & 0x1f;
    match func {
        Add | Addi => input1.wrapping_add(input2),
        Sub => input1.wrapping_sub(input2),
        Slt | Slti | Blt => ((input1 as i32) < (input2 as i32)) as u32,
        Sltu | Sltiu | Bltu => (input1 < input2) as u32,
        And | Andi => input1 & input2,
        Or | Ori => input1 | input2,
        Xor | Xori => input1 ^ input2,
        Sll | Slli => input1 << shamt,
        Srl | Srli => input1 >> shamt,
        Sra | Srai => ((input1 as i32) >> shamt) as u32,
        Beq => (input1 == input2) as u32,
        Bne => (input1 != input2) as u32,
        Bge => ((input1 as i32) >= (input2 as i32)) as u32,
        Bgeu => (input1 >= input2) as u32,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::Function::*;

    #[test]
    fn add_sub_wrap() {
        assert_eq!(alu(Add, 0xffff_ffff, 1), 0);
        assert_eq!(alu(Add, 40, 2), 42);
        assert_eq!(alu(Sub, 0, 1), 0xffff_ffff);
        assert_eq!(alu(Sub, 10, 3), 7);
        // addi with a sign-extended negative immediate
        assert_eq!(alu(Addi, 10, (-3i32) as u32), 7);
    }

    #[test]
    fn shift_amount_uses_low_five_bits() {
        assert_eq!(alu(Sll, 1, 0x25), alu(Sll, 1, 0x5));
        assert_eq!(alu(Sll, 1, 0x25), 32);
        assert_eq!(alu(Srl, 0x8000_0000, 33), 0x4000_0000);
        assert_eq!(alu(Slli, 3, 31), 0x8000_0000);
    }

    #[test]
    fn arithmetic_shift_keeps_sign() {
        assert_eq!(alu(Sra, 0x8000_0000, 1), 0xc000_0000);
        assert_eq!(alu(Srai, 0x8000_0000, 31), 0xffff_ffff);
        assert_eq!(alu(Srl, 0x8000_0000, 1), 0x4000_0000);
        assert_eq!(alu(Sra, 0x4000_0000, 1), 0x2000_0000);
    }

    #[test]
    fn comparisons_are_zero_or_one() {
        assert_eq!(alu(Slt, 5, 3), 0);
        assert_eq!(alu(Slt, 3, 5), 1);
        assert_eq!(alu(Slt, (-1i32) as u32, 1), 1);
        assert_eq!(alu(Sltu, 0xffff_ffff, 1), 0);
        assert_eq!(alu(Sltu, 1, 0xffff_ffff), 1);
        assert_eq!(alu(Sltiu, 0, 1), 1);
    }

    #[test]
    fn bitwise() {
        assert_eq!(alu(And, 0b1100, 0b1010), 0b1000);
        assert_eq!(alu(Or, 0b1100, 0b1010), 0b1110);
        assert_eq!(alu(Xor, 0b1100, 0b1010), 0b0110);
        assert_eq!(alu(Xori, 0x0f0f_0f0f, 0xffff_ffff), 0xf0f0_f0f0);
    }

    #[test]
    fn branch_conditions() {
        let neg = (-5i32) as u32;
        assert_eq!(alu(Beq, 7, 7), 1);
        assert_eq!(alu(Beq, 7, 8), 0);
        assert_eq!(alu(Bne, 7, 8), 1);
        assert_eq!(alu(Blt, neg, 1), 1);
        assert_eq!(alu(Bltu, neg, 1), 0);
        assert_eq!(alu(Bge, 1, neg), 1);
        assert_eq!(alu(Bge, 3, 3), 1);
        assert_eq!(alu(Bgeu, 1, neg), 0);
    }
}
