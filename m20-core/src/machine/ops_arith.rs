//! Arithmetic operations.
//!
//! Each of the four-slot opcode families funnels into one routine of the
//! arithmetic unit, handing it the no-round/no-norm flags decoded from
//! the opcode. Addition sets Ω to the result sign; everything else in
//! this file sets Ω when the result exponent runs above 64.

use crate::constants::SIGN;
use crate::float;
use crate::machine::Machine;
use crate::opcodes::Instr;
use crate::stop::Stop;

/// Ω for the multiplicative family: exponent above the bias.
fn exponent_omega(machine: &mut Machine) {
    machine.omega = float::exponent(machine.rr) > 0o100;
}

fn finish_addition(machine: &mut Machine, x: u64, y: u64, instr: Instr) -> Result<(), Stop> {
    machine.rr = float::addition(x, y, instr.no_round(), instr.no_norm())?;
    machine.store(instr.a3, machine.rr);
    machine.omega = machine.rr & SIGN != 0;
    machine.cycle(29.5);
    Ok(())
}

/// 001 family: сл — addition.
pub fn add(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    let x = machine.load(instr.a1)?;
    let y = machine.load(instr.a2)?;
    finish_addition(machine, x, y, instr)
}

/// 002 family: вч — subtraction, by flipping the second sign.
pub fn sub(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    let x = machine.load(instr.a1)?;
    let y = machine.load(instr.a2)? ^ SIGN;
    finish_addition(machine, x, y, instr)
}

/// 003 family: вчм — subtraction of moduli: |x| − |y|.
pub fn sub_modulus(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    let x = machine.load(instr.a1)? & !SIGN;
    let y = machine.load(instr.a2)? | SIGN;
    finish_addition(machine, x, y, instr)
}

/// 005 family: умн — multiplication. The low product half goes to РМР.
pub fn mul(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    let x = machine.load(instr.a1)?;
    let y = machine.load(instr.a2)?;
    let (rr, rmr) = float::multiplication(x, y, instr.no_round(), instr.no_norm())?;
    machine.rr = rr;
    machine.rmr = rmr;
    machine.store(instr.a3, machine.rr);
    exponent_omega(machine);
    machine.cycle(70.0);
    Ok(())
}

/// 004, 024: дел — division.
pub fn div(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    let x = machine.load(instr.a1)?;
    let y = machine.load(instr.a2)?;
    machine.rr = float::division(x, y, instr.no_round())?;
    machine.store(instr.a3, machine.rr);
    exponent_omega(machine);
    machine.cycle(136.0);
    Ok(())
}

/// 044, 064: кор — square root.
pub fn sqrt(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    let x = machine.load(instr.a1)?;
    machine.rr = float::square_root(x, instr.no_round())?;
    machine.store(instr.a3, machine.rr);
    exponent_omega(machine);
    machine.cycle(275.0);
    Ok(())
}

/// 047: счмр — fetch the low-order bits of the last product from РМР.
pub fn low_bits(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    machine.rr = machine.rmr;
    machine.store(instr.a3, machine.rr);
    exponent_omega(machine);
    machine.cycle(24.0);
    Ok(())
}

fn finish_exponent(machine: &mut Machine, y: u64, n: i32, a3: u16) -> Result<(), Stop> {
    machine.rr = float::add_exponent(y, n)?;
    machine.store(a3, machine.rr);
    exponent_omega(machine);
    machine.cycle(61.5);
    Ok(())
}

/// 006: слпа — add the first address, biased by 64, to the exponent.
pub fn add_exp_addr(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    let n = (instr.a1 & 0o177) as i32 - 64;
    let y = machine.load(instr.a2)?;
    finish_exponent(machine, y, n, instr.a3)
}

/// 026: слп — add the exponent of the word at A2 to itself.
pub fn add_exp(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    let x = machine.load(instr.a2)?;
    let n = float::exponent(x) - 64;
    finish_exponent(machine, x, n, instr.a3)
}

/// 046: вчпа — subtract the first address, biased by 64, from the
/// exponent.
pub fn sub_exp_addr(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    let n = 64 - (instr.a1 & 0o177) as i32;
    let y = machine.load(instr.a2)?;
    finish_exponent(machine, y, n, instr.a3)
}

/// 066: вчп — subtract the exponent of the word at A2 from itself.
pub fn sub_exp(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    let x = machine.load(instr.a2)?;
    let n = 64 - float::exponent(x);
    finish_exponent(machine, x, n, instr.a3)
}
