//! Logical and word-manipulation operations.
//!
//! All of them treat the word as raw bits: whole-word booleans, separate
//! arithmetic on the mantissa and non-mantissa halves, shifts, and the
//! cyclic operations whose overflow wraps back around.

use crate::constants::{BIT37, BIT46, MANTISSA, WORD};
use crate::float::exponent;
use crate::machine::Machine;
use crate::opcodes::Instr;
use crate::stop::Stop;

/// 000: зп — move a word through RR.
/// Ω keeps its value.
pub fn transfer(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    machine.rr = machine.load(instr.a1)?;
    machine.store(instr.a3, machine.rr);
    machine.cycle(24.0);
    Ok(())
}

/// 020: счкр — read a console switch register.
/// A1 selects: 0 gives zero, 1..4 the console registers, 5 keeps RR.
/// Ω keeps its value.
pub fn read_console(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    match instr.a1 {
        0 => machine.rr = 0,
        1..=4 => machine.rr = machine.rpu[instr.a1 as usize - 1],
        5 => {}
        _ => return Err(Stop::InvalidArgument(instr.a1)),
    }
    machine.store(instr.a3, machine.rr);
    machine.cycle(24.0);
    Ok(())
}

fn finish_logical(machine: &mut Machine, a3: u16) -> Result<(), Stop> {
    machine.store(a3, machine.rr);
    machine.omega = machine.rr == 0;
    machine.cycle(24.0);
    Ok(())
}

/// 015: нтж — bitwise compare (exclusive or).
/// Ω set when the words were equal.
pub fn bitwise_xor(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    machine.rr = machine.load(instr.a1)? ^ machine.load(instr.a2)?;
    finish_logical(machine, instr.a3)
}

/// 035: нтжс — bitwise compare, halting the machine on a mismatch.
pub fn bitwise_xor_halt(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    machine.rr = machine.load(instr.a1)? ^ machine.load(instr.a2)?;
    finish_logical(machine, instr.a3)?;
    if !machine.omega {
        return Err(Stop::AssertFailed(machine.rr));
    }
    Ok(())
}

/// 055: и — bitwise and.
pub fn bitwise_and(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    machine.rr = machine.load(instr.a1)? & machine.load(instr.a2)?;
    finish_logical(machine, instr.a3)
}

/// 075: или — bitwise or.
pub fn bitwise_or(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    machine.rr = machine.load(instr.a1)? | machine.load(instr.a2)?;
    finish_logical(machine, instr.a3)
}

/// The mantissa sum lands in the low half of RR, everything above it
/// comes from the first operand. Ω is the carry out of the mantissa.
fn finish_address_sum(machine: &mut Machine, x: u64, sum: u64, a3: u16) -> Result<(), Stop> {
    machine.rr = (x & !MANTISSA) | (sum & MANTISSA);
    machine.store(a3, machine.rr);
    machine.omega = sum & BIT37 != 0;
    machine.cycle(24.0);
    Ok(())
}

/// 013: слк — command addition: add the mantissas, keep the rest of the
/// first operand.
pub fn add_commands(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    let x = machine.load(instr.a1)?;
    let sum = (x & MANTISSA) + (machine.load(instr.a2)? & MANTISSA);
    finish_address_sum(machine, x, sum, instr.a3)
}

/// 033: вчк — command subtraction.
pub fn sub_commands(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    let x = machine.load(instr.a1)?;
    let sum = (x & MANTISSA).wrapping_sub(machine.load(instr.a2)? & MANTISSA);
    finish_address_sum(machine, x, sum, instr.a3)
}

/// The non-mantissa sum lands in the high half of RR, the mantissa comes
/// from the first operand. Ω is the carry out of bit 45.
fn finish_opcode_sum(machine: &mut Machine, x: u64, sum: u64, a3: u16) -> Result<(), Stop> {
    machine.rr = (x & MANTISSA) | (sum & !MANTISSA & WORD);
    machine.store(a3, machine.rr);
    machine.omega = sum & BIT46 != 0;
    machine.cycle(24.0);
    Ok(())
}

/// 053: слко — operation-code addition: add the non-mantissa halves.
pub fn add_opcodes(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    let x = machine.load(instr.a1)?;
    let sum = (x & !MANTISSA) + (machine.load(instr.a2)? & !MANTISSA);
    finish_opcode_sum(machine, x, sum, instr.a3)
}

/// 073: вчко — operation-code subtraction.
pub fn sub_opcodes(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    let x = machine.load(instr.a1)?;
    let sum = (x & !MANTISSA).wrapping_sub(machine.load(instr.a2)? & !MANTISSA);
    finish_opcode_sum(machine, x, sum, instr.a3)
}

/// Shift only the mantissa, leaving the upper fields in place.
/// Ω set when the shifted mantissa is zero.
fn apply_mantissa_shift(machine: &mut Machine, n: i32, instr: Instr) -> Result<(), Stop> {
    let y = machine.load(instr.a2)?;
    machine.rr = y & !MANTISSA;
    if n > 0 {
        machine.rr |= (y & MANTISSA) << n;
    } else if n < 0 {
        let shift = (-n) as u32;
        if shift < 64 {
            machine.rr |= (y & MANTISSA) >> shift;
        }
    }
    machine.store(instr.a3, machine.rr);
    machine.omega = machine.rr & MANTISSA == 0;
    Ok(())
}

/// 014: сдма — shift the mantissa by the first address: A1 − 64 places,
/// left when positive.
pub fn shift_mantissa_by_address(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    let n = (instr.a1 & 0o177) as i32 - 64;
    machine.cycle(61.5 + 1.5 * n.abs() as f64);
    apply_mantissa_shift(machine, n, instr)
}

/// 034: сдм — shift the mantissa by the exponent of the word at A1.
pub fn shift_mantissa_by_exponent(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    let n = exponent(machine.load(instr.a1)?) - 64;
    machine.cycle(24.0 + 1.5 * n.abs() as f64);
    apply_mantissa_shift(machine, n, instr)
}

/// Shift the whole 45-bit word. Ω set when the result is zero.
fn apply_word_shift(machine: &mut Machine, n: i32, instr: Instr) -> Result<(), Stop> {
    machine.rr = machine.load(instr.a2)?;
    if n > 0 {
        machine.rr = (machine.rr << n) & WORD;
    } else if n < 0 {
        let shift = (-n) as u32;
        machine.rr = if shift < 64 { machine.rr >> shift } else { 0 };
    }
    machine.store(instr.a3, machine.rr);
    machine.omega = machine.rr == 0;
    Ok(())
}

/// 054: сда — shift the word by the first address.
pub fn shift_by_address(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    let n = (instr.a1 & 0o177) as i32 - 64;
    machine.cycle(61.5 + 1.5 * n.abs() as f64);
    apply_word_shift(machine, n, instr)
}

/// 074: сд — shift the word by the exponent of the word at A1.
pub fn shift_by_exponent(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    let n = exponent(machine.load(instr.a1)?) - 64;
    machine.cycle(24.0 + 1.5 * n.abs() as f64);
    apply_word_shift(machine, n, instr)
}

/// The two halves were summed separately; wrap the overflow of each back
/// around. Bit 46 feeds bit 37, the mantissa carry feeds bit 1. Ω is the
/// mantissa carry. The drum checksum is this same operation folded over
/// a transfer.
fn finish_cyclic(machine: &mut Machine, mut hi: u64, mut lo: u64, a3: u16) -> Result<(), Stop> {
    if hi & BIT46 != 0 {
        hi = hi.wrapping_add(BIT37);
    }
    if lo & BIT37 != 0 {
        lo = lo.wrapping_add(1);
    }
    machine.rr = (hi & WORD & !MANTISSA) | (lo & MANTISSA);
    machine.store(a3, machine.rr);
    machine.omega = lo & BIT37 != 0;
    machine.cycle(24.0);
    Ok(())
}

/// 007: слц — cyclic addition.
pub fn cyclic_add(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    let x = machine.load(instr.a1)?;
    let y = machine.load(instr.a2)?;
    let hi = (x & !MANTISSA) + (y & !MANTISSA);
    let lo = (x & MANTISSA) + (y & MANTISSA);
    finish_cyclic(machine, hi, lo, instr.a3)
}

/// 027: вчц — cyclic subtraction.
pub fn cyclic_sub(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    let x = machine.load(instr.a1)?;
    let y = machine.load(instr.a2)?;
    let hi = (x & !MANTISSA).wrapping_sub(y & !MANTISSA);
    let lo = (x & MANTISSA).wrapping_sub(y & MANTISSA);
    finish_cyclic(machine, hi, lo, instr.a3)
}

/// 067: сдц — cyclic shift: swap the two 21-bit halves of the 42-bit
/// payload. Ω keeps its value.
pub fn cyclic_shift(machine: &mut Machine, instr: Instr) -> Result<(), Stop> {
    let x = machine.load(instr.a1)?;
    machine.rr = (x & 0o7777777) << 24 | (x >> 24 & 0o7777777);
    machine.store(instr.a3, machine.rr);
    machine.cycle(60.0);
    Ok(())
}
