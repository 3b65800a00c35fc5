use crate::machine::Machine;
use crate::printer::{Printer, SharedBuffer};
use crate::stop::Stop;

/// Assemble a command word from its fields.
pub fn cmd(op: u8, a1: u16, a2: u16, a3: u16) -> u64 {
    (op as u64) << 36 | (a1 as u64) << 24 | (a2 as u64) << 12 | a3 as u64
}

/// Assemble a command word with address-modification flags.
pub fn cmd_ra(flags: u8, op: u8, a1: u16, a2: u16, a3: u16) -> u64 {
    (flags as u64) << 42 | cmd(op, a1, a2, a3)
}

/// A machine with a program planted at `origin` and data words wherever
/// the test wants them. The printer goes to a shared buffer so tests can
/// read it back.
pub fn machine_with(origin: u16, program: &[u64], data: &[(u16, u64)]) -> (Machine, SharedBuffer) {
    let mut machine = Machine::new();
    for (i, &word) in program.iter().enumerate() {
        machine.memory.store(origin + i as u16, word);
    }
    for &(addr, word) in data {
        machine.memory.store(addr, word);
    }
    machine.rvk = origin;
    let buffer = SharedBuffer::new();
    machine.printer = Printer::new(Box::new(buffer.clone()));
    (machine, buffer)
}

/// Run a program to its stop and hand back the machine for inspection.
pub fn run_program(origin: u16, program: &[u64], data: &[(u16, u64)]) -> (Machine, Stop) {
    let (mut machine, _) = machine_with(origin, program, data);
    let stop = machine.run();
    (machine, stop)
}

/// The everyday clean finish.
pub fn assert_clean(stop: Stop) {
    assert!(stop.is_normal(), "expected a clean halt, got: {}", stop);
}
