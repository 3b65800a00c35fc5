//! The machine: registers, the fetch/decode/execute loop, and the
//! peripheral hookups.
//!
//! Everything is strictly sequential. An instruction completes all of its
//! memory and device effects before the next fetch; there are no
//! interrupts and no asynchronous events.

use crate::constants::MEMSIZE;
use crate::drum::Drum;
use crate::ext_io::{DrumExchange, Exchange, PrintJob, PrintMode};
use crate::image::Image;
use crate::memory::Memory;
use crate::opcodes;
use crate::printer::Printer;
use crate::stop::Stop;

pub mod ops_arith;
pub mod ops_control;
pub mod ops_logical;

#[cfg(test)]
mod test_helpers;


/// What to report while running.
#[derive(Default)]
pub struct Trace {
    /// Print every executed instruction.
    pub instructions: bool,
    /// Print instructions executed from this address range.
    pub range: Option<(u16, u16)>,
    /// Report every read of this address.
    pub read_watch: Option<u16>,
    /// Report every write of this address.
    pub write_watch: Option<u16>,
}

pub struct Machine {
    pub memory: Memory,

    /// РВК, the instruction-fetch register: the address of the current
    /// instruction, already incremented during execution, so a branch
    /// simply overwrites it.
    pub rvk: u16,
    /// РА, the address register. Added to any address whose modification
    /// flag is set.
    pub ra: u16,
    /// Ω, the condition flag.
    pub omega: bool,
    /// РК, the current command word.
    pub rk: u64,
    /// РР, the result register. Observable after every instruction.
    pub rr: u64,
    /// РМР, the low-order-bits register, filled by multiplication.
    pub rmr: u64,
    /// РПУ1..РПУ4, the console switch registers. Programs can only
    /// read them.
    pub rpu: [u64; 4],

    /// The exchange request armed by the setup instruction, consumed by
    /// the execute instruction, and dropped after any other instruction.
    pub exchange: Option<Exchange>,

    pub drum: Drum,
    pub printer: Printer,

    /// Nominal execution time, microseconds. Observational only; nothing
    /// is paced by it.
    pub time_us: f64,

    pub trace: Trace,
    pub breakpoints: Vec<u16>,
}

impl Machine {
    pub fn new() -> Machine {
        Machine {
            memory: Memory::new(),
            rvk: 1,
            ra: 0,
            omega: false,
            rk: 0,
            rr: 0,
            rmr: 0,
            rpu: [0; 4],
            exchange: None,
            drum: Drum::new(),
            printer: Printer::stdout(),
            time_us: 0.0,
            trace: Trace::default(),
            breakpoints: Vec::new(),
        }
    }

    /// Clear the working registers, as the console reset button does.
    /// Memory, the console registers and the drum are untouched.
    pub fn reset(&mut self) {
        self.ra = 0;
        self.omega = false;
        self.rmr = 0;
        self.rr = 0;
        self.exchange = None;
    }

    /// Deposit a parsed image and point the machine at its start address.
    pub fn load_image(&mut self, image: &Image) {
        for &(addr, word) in &image.words {
            self.memory.store(addr, word);
        }
        self.rvk = image.start;
    }

    /// Count nominal execution time.
    pub fn cycle(&mut self, usec: f64) {
        self.time_us += usec;
    }

    /// A memory read on behalf of the running program.
    pub fn load(&mut self, addr: u16) -> Result<u64, Stop> {
        let val = self.memory.load(addr)?;
        if self.trace.read_watch == Some(addr) {
            println!(
                "{:8.6}) {:04o}: read {:04o} value {:015o}",
                self.time_us / 1e6,
                self.rvk,
                addr,
                val
            );
        }
        Ok(val)
    }

    /// A memory write on behalf of the running program.
    pub fn store(&mut self, addr: u16, val: u64) {
        if self.trace.write_watch == Some(addr) {
            println!(
                "{:8.6}) {:04o}: write {:04o} value {:015o}",
                self.time_us / 1e6,
                self.rvk,
                addr,
                val
            );
        }
        self.memory.store(addr, val);
    }

    fn traced(&self, addr: u16) -> bool {
        if self.trace.instructions {
            return true;
        }
        match self.trace.range {
            Some((start, end)) => addr >= start && addr <= end,
            None => false,
        }
    }

    /// Fetch and execute a single instruction.
    pub fn step(&mut self) -> Result<(), Stop> {
        if self.rvk as usize >= MEMSIZE {
            return Err(Stop::RunOut);
        }
        if !self.memory.is_written(self.rvk) {
            return Err(Stop::UninitializedRead(self.rvk));
        }
        self.rk = self.memory.load(self.rvk)?;

        if self.traced(self.rvk) {
            println!(
                "{:8.6}) {:04o}: {}, РА={:04o}, Ω={}",
                self.time_us / 1e6,
                self.rvk,
                opcodes::format_cmd(self.rk),
                self.ra,
                self.omega as u8
            );
        }

        self.rvk += 1;
        let instr = opcodes::decode(self.rk, self.ra);
        let operation = opcodes::OPERATION_FN_TABLE[instr.op as usize];
        let result = operation(self, instr);

        // The exchange latch survives exactly one instruction: from the
        // setup to the execute that follows it.
        if instr.op != 0o50 {
            self.exchange = None;
        }
        result
    }

    /// Run until something stops the machine.
    pub fn run(&mut self) -> Stop {
        let mut stepped = false;
        loop {
            if stepped && self.breakpoints.contains(&self.rvk) {
                return Stop::Breakpoint;
            }
            stepped = true;
            if let Err(stop) = self.step() {
                return stop;
            }
        }
    }

    /// Carry out a latched drum exchange. Returns the transfer checksum,
    /// zero when checking is off.
    pub(crate) fn run_drum(
        &mut self,
        request: DrumExchange,
        start: u16,
    ) -> Result<u64, Stop> {
        let addr = (request.unit as u32) << 12 | request.offset as u32;
        if request.write {
            self.drum
                .write(addr, start, request.finish, &self.memory, request.check)
        } else {
            self.drum
                .read(addr, start, request.finish, &mut self.memory, request.check)
        }
    }

    /// Carry out a latched print request.
    pub(crate) fn run_print(&mut self, job: PrintJob, start: u16) -> Result<(), Stop> {
        match job.mode {
            PrintMode::Decimal => self.printer.decimal(&self.memory, start, job.finish),
            PrintMode::Octal => self.printer.octal(&self.memory, start, job.finish),
            PrintMode::Text => self.printer.text(&self.memory, start, job.finish),
        }
    }
}
