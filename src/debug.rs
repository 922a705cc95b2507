//! Per-instruction observation of the CPU state.

use crate::consts;
use crate::cpu::Cpu;
use crate::instruction::Instruction;

/// Receives the CPU state once per retired instruction.
///
/// Sinks only observe: they get shared references and cannot alter the run.
pub trait DebugSink {
    fn retired(&mut self, step: u64, pc: u32, inst: &Instruction, cpu: &Cpu);
}

/// Prints one line per retired instruction to stderr.
#[derive(Debug, Default)]
pub struct StderrTrace;

impl DebugSink for StderrTrace {
    fn retired(&mut self, step: u64, pc: u32, inst: &Instruction, cpu: &Cpu) {
        eprintln!("{}", trace_line(step, pc, inst, cpu));
    }
}

/// Formats the trace line printed by `StderrTrace`.
pub fn trace_line(step: u64, pc: u32, inst: &Instruction, cpu: &Cpu) -> String {
    format!(
        "Step #{} | pc: {:x} | val: {:08x} | inst: {:?} | fields: {} | next pc: {:x} | mtvec: {:x} | regs: {}",
        step,
        pc,
        inst.value,
        inst.function,
        inst.fields,
        cpu.pc,
        cpu.csr.read(consts::MTVEC),
        cpu.reg,
    )
}
