//! Fetch/execute loop driving one `Cpu` over a `Memory` image.

use crate::consts;
use crate::cpu::{execute, Cpu, Executed};
use crate::debug::{DebugSink, StderrTrace};
use crate::error::EmulatorError;
use crate::instruction::{Function, Instruction};
use crate::memory::Memory;

/// State of the run loop after one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Running,
    /// An ECALL/EBREAK was retired; `exit` holds the trap vector it read.
    Halted { exit: u32 },
}

/// Single-cycle RV32I emulator. Owns the only `Cpu` and `Memory`.
pub struct Emulator {
    cpu: Cpu,
    memory: Memory,
    steps: u64,
    debug_sink: Option<Box<dyn DebugSink>>,
}

impl Emulator {
    /// Loads `binary` at address 0 with the default memory size.
    pub fn new(binary: &[u8]) -> Emulator {
        Emulator::with_memory_size(binary, consts::DEFAULT_MEMORY_SIZE)
    }

    /// Loads `binary` at address 0, padding memory to `memory_size` bytes.
    pub fn with_memory_size(binary: &[u8], memory_size: usize) -> Emulator {
        let memory = Memory::new(binary, memory_size);
        log::info!(
            "loaded {} byte image into {} bytes of memory",
            binary.len(),
            memory.len()
        );
        Emulator {
            cpu: Cpu::new(),
            memory,
            steps: 0,
            debug_sink: None,
        }
    }

    pub fn with_debug_sink(mut self, sink: Box<dyn DebugSink>) -> Emulator {
        self.debug_sink = Some(sink);
        self
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Number of retired instructions.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Runs until a trap halts the loop or an error stops it.
    ///
    /// Programs that never trap or fault never return.
    pub fn run(&mut self) -> Result<u32, EmulatorError> {
        loop {
            if let Step::Halted { exit } = self.step()? {
                return Ok(exit);
            }
        }
    }

    /// Fetches, executes and retires one instruction.
    ///
    /// On error the faulting pc is recorded in `Cpu::exit` and the state is
    /// otherwise left as it was before the instruction.
    pub fn step(&mut self) -> Result<Step, EmulatorError> {
        let pc = self.cpu.pc;
        self.cycle(pc).map_err(|err| {
            self.cpu.exit = pc;
            err
        })
    }

    fn cycle(&mut self, pc: u32) -> Result<Step, EmulatorError> {
        let inst = Instruction::new(self.fetch(pc)?);
        log::trace!("{:08x}: {}", pc, inst);

        let executed = execute(&inst, &self.cpu)?;
        let data = self.memory_access(&inst, pc, executed)?;
        self.csr_access(&inst, executed.result);
        self.cpu.write_back(data, &inst);
        self.cpu.pc = if executed.branches {
            executed.result
        } else {
            pc.wrapping_add(consts::WORD_SIZE as u32)
        };

        let step = if inst.function.is_trap() {
            self.cpu.exit = executed.result;
            log::info!(
                "{:?} at pc {:#010x}, halting with exit {:#010x}",
                inst.function,
                pc,
                executed.result
            );
            Step::Halted {
                exit: executed.result,
            }
        } else {
            Step::Running
        };

        self.steps += 1;
        if let Some(sink) = self.debug_sink.as_mut() {
            sink.retired(self.steps, pc, &inst, &self.cpu);
        }
        Ok(step)
    }

    fn fetch(&self, pc: u32) -> Result<u32, EmulatorError> {
        self.memory.read_inst(pc)
    }

    /// Performs the load or store at the computed address and returns the
    /// value to write back.
    fn memory_access(
        &mut self,
        inst: &Instruction,
        pc: u32,
        executed: Executed,
    ) -> Result<u32, EmulatorError> {
        let addr = executed.result;
        let rs2 = self.cpu.reg.read(inst.fields.rs2);
        let data = match inst.function {
            Function::Lb => self.memory.read_u8(addr)? as i8 as u32,
            Function::Lbu => self.memory.read_u8(addr)? as u32,
            Function::Lh => self.memory.read_u16(addr)? as i16 as u32,
            Function::Lhu => self.memory.read_u16(addr)? as u32,
            Function::Lw => self.memory.read_u32(addr)?,
            Function::Sb => {
                self.memory.write_u8(addr, rs2 as u8)?;
                addr
            }
            Function::Sh => {
                self.memory.write_u16(addr, rs2 as u16)?;
                addr
            }
            Function::Sw => {
                self.memory.write_u32(addr, rs2)?;
                addr
            }
            // link address, not the jump target
            Function::Jal | Function::Jalr => pc.wrapping_add(consts::WORD_SIZE as u32),
            _ => executed.result,
        };
        Ok(data)
    }

    /// Applies the write half of a CSR instruction. `old` is the value the
    /// execute stage read.
    ///
    /// The set/clear forms skip the write when their source is x0 or a zero
    /// immediate.
    fn csr_access(&mut self, inst: &Instruction, old: u32) {
        use crate::instruction::Function::*;

        let fields = &inst.fields;
        let source = match inst.function {
            Csrrw | Csrrs | Csrrc => self.cpu.reg.read(fields.rs1),
            Csrrwi | Csrrsi | Csrrci => fields.rs1 as u32,
            _ => return,
        };
        let value = match inst.function {
            Csrrw | Csrrwi => source,
            Csrrs | Csrrsi if fields.rs1 != 0 => old | source,
            Csrrc | Csrrci if fields.rs1 != 0 => old & !source,
            _ => return,
        };
        self.cpu.csr.write(fields.csr, value);
    }
}

/// Runs a raw RV32I image from address 0 until it traps or faults.
///
/// With `debug` set every retired instruction is traced to stderr. Returns
/// the exit value recorded by the halting trap.
pub fn run(binary: &[u8], debug: bool) -> Result<u32, EmulatorError> {
    let mut emulator = Emulator::new(binary);
    if debug {
        emulator = emulator.with_debug_sink(Box::new(StderrTrace));
    }
    emulator.run()
}
