//! A single-cycle RISC-V 32I emulator.

use rv32i_emu::consts;
use rv32i_emu::debug::StderrTrace;
use rv32i_emu::Emulator;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "rvemu", about = "A toy RISC-V emulator for the command line")]
struct Opt {
    /// Raw little-endian RV32I machine code, loaded at address 0
    #[structopt(parse(from_os_str))]
    binary: PathBuf,
    #[structopt(short = "i", long = "inst", default_value = "r32i")]
    /// Instruction set to emulate
    inst: String,
    #[structopt(short = "d", long = "debug")]
    /// Prints the CPU state after every retired instruction
    debug: bool,
    #[structopt(long = "memory-size")]
    /// Bytes of memory; the image is zero-padded up to this size [default: 65536]
    memory_size: Option<usize>,
}

/// Instruction sets this emulator can run.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Isa {
    R32i,
}

impl FromStr for Isa {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r32i" => Ok(Isa::R32i),
            // TODO: r64i
            _ => Err(format!("{} is not supported", s)),
        }
    }
}

fn main() {
    let opt = Opt::from_args();

    let default_filter = if opt.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let isa = match opt.inst.parse::<Isa>() {
        Ok(isa) => isa,
        Err(msg) => {
            eprintln!("{}", msg);
            eprintln!("this emulator supports r32i");
            process::exit(2);
        }
    };

    let binary = match std::fs::read(&opt.binary) {
        Ok(binary) => binary,
        Err(err) => {
            log::error!("can't read {}: {}", opt.binary.display(), err);
            process::exit(1);
        }
    };

    match isa {
        Isa::R32i => {
            let memory_size = opt.memory_size.unwrap_or(consts::DEFAULT_MEMORY_SIZE);
            let mut emulator = Emulator::with_memory_size(&binary, memory_size);
            if opt.debug {
                emulator = emulator.with_debug_sink(Box::new(StderrTrace));
            }
            match emulator.run() {
                Ok(exit) => {
                    log::info!("exited with {:#010x} after {} steps", exit, emulator.steps());
                }
                Err(err) => {
                    log::error!("{} after {} steps", err, emulator.steps());
                    log::error!("regs: {}", emulator.cpu().reg);
                    process::exit(1);
                }
            }
        }
    }
}
