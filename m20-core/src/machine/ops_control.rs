//! Control operations: branches, the address-register loop family, the
//! halt, and the two-instruction external-exchange handshake.
//!
//! None of these change Ω. The branch and register-set instructions leave
//! a synthesized word in RR that encodes their own opcode and first
//! address, which return sequences rely on.

use crate::ext_io::Exchange;
use crate::machine::Machine;
use crate::opcodes::Instr;
use crate::stop::Stop;

/// 016: пв — transfer control with return: plant a synthesized return
/// word at A3 and jump to A2.
pub fn call_return(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    machine.rr = 0o16 << 36 | (instr.a1 as u64) << 12;
    machine.store(instr.a3, machine.rr);
    machine.rvk = instr.a2;
    machine.cycle(24.0);
    Ok(())
}

/// 036: пе — transfer control when Ω=1, passing M[A1] through RR to A3.
pub fn branch_if_set(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    machine.rr = machine.load(instr.a1)?;
    machine.store(instr.a3, machine.rr);
    if machine.omega {
        machine.rvk = instr.a2;
    }
    machine.cycle(24.0);
    Ok(())
}

/// 056: пб — unconditional transfer of control.
pub fn branch(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    machine.rr = machine.load(instr.a1)?;
    machine.store(instr.a3, machine.rr);
    machine.rvk = instr.a2;
    machine.cycle(24.0);
    Ok(())
}

/// 076: по — transfer control when Ω=0.
pub fn branch_if_clear(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    machine.rr = machine.load(instr.a1)?;
    machine.store(instr.a3, machine.rr);
    if !machine.omega {
        machine.rvk = instr.a2;
    }
    machine.cycle(24.0);
    Ok(())
}

/// 077: стоп — halt the machine. Both addresses zero is a clean finish.
pub fn halt(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    machine.rr = 0;
    machine.store(instr.a3, machine.rr);
    machine.cycle(24.0);
    Err(Stop::Halt {
        a1: instr.a1,
        a2: instr.a2,
    })
}

/// The loop family compares РА against A1, branches to A2 when the
/// comparison and the Ω condition hold, and always reloads РА from A3.
fn compare_ra(machine: &mut Machine, instr: Instr, taken: bool) {
    if taken {
        machine.rvk = instr.a2;
    }
    machine.ra = instr.a3;
    machine.cycle(24.0);
}

/// 011: цме — branch on РА < A1 and Ω=1.
pub fn jump_lt_set(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    compare_ra(machine, instr, machine.ra < instr.a1 && machine.omega);
    Ok(())
}

/// 031: цбре — branch on РА ≥ A1 and Ω=1.
pub fn jump_ge_set(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    compare_ra(machine, instr, machine.ra >= instr.a1 && machine.omega);
    Ok(())
}

/// 051: цмо — branch on РА < A1 and Ω=0.
pub fn jump_lt_clear(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    compare_ra(machine, instr, machine.ra < instr.a1 && !machine.omega);
    Ok(())
}

/// 071: цбро — branch on РА ≥ A1 and Ω=0.
pub fn jump_ge_clear(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    compare_ra(machine, instr, machine.ra >= instr.a1 && !machine.omega);
    Ok(())
}

/// 012: цм — branch on РА < A1.
pub fn jump_lt(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    compare_ra(machine, instr, machine.ra < instr.a1);
    Ok(())
}

/// 032: цбр — branch on РА ≥ A1.
pub fn jump_ge(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    compare_ra(machine, instr, machine.ra >= instr.a1);
    Ok(())
}

/// 052: раа — load РА with the second address.
pub fn set_ra(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    machine.rr = 0o52 << 36 | (instr.a1 as u64) << 12;
    machine.store(instr.a3, machine.rr);
    machine.ra = instr.a2;
    machine.cycle(24.0);
    Ok(())
}

/// 072: ра — load РА from the address field of the word at A2.
pub fn set_ra_from_word(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    machine.rr = 0o52 << 36 | (instr.a1 as u64) << 12;
    machine.store(instr.a3, machine.rr);
    machine.ra = (machine.load(instr.a2)? >> 12 & 0o7777) as u16;
    machine.cycle(24.0);
    Ok(())
}

/// 010 and 030: вп, впбк — punched-card input, not provided.
pub fn punch_read(_machine: &mut Machine, _instr: Instr) -> Result<(), Stop> {
    Err(Stop::PunchReadUnsupported)
}

/// 050: ма — latch an external-exchange request for the instruction that
/// follows. The only instruction that leaves the latch armed.
pub fn io_setup(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    machine.exchange = Some(Exchange::setup(instr.a1, instr.a2, instr.a3)?);
    machine.cycle(24.0);
    Ok(())
}

/// 070: мб — execute the latched exchange, with A1 as the first memory
/// address. A failed checked drum read branches to A2 when the request
/// suppressed the stop; a checked drum write leaves its checksum at A3.
pub fn io_execute(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    let exchange = machine.exchange.ok_or(Stop::MbWithoutMa)?;

    machine.rr = 0;
    match exchange {
        Exchange::Drum(request) => {
            match machine.run_drum(request, instr.a1) {
                Ok(sum) => machine.rr = sum,
                Err(Stop::DrumReadError) if request.stop_disabled => {
                    if instr.a2 != 0 {
                        machine.rvk = instr.a2;
                    }
                }
                Err(stop) => return Err(stop),
            }
            if request.write && request.check {
                machine.store(instr.a3, machine.rr);
            }
        }
        Exchange::Print(job) => machine.run_print(job, instr.a1)?,
        Exchange::Tape => return Err(Stop::TapeUnsupported),
        Exchange::TapeFormat => return Err(Stop::TapeFormatUnsupported),
        Exchange::Punch => return Err(Stop::PunchUnsupported),
        Exchange::Unselected(cond) => return Err(Stop::ExtInvalidControl(cond)),
    }
    machine.cycle(24.0);
    Ok(())
}
