//! The two-instruction external-exchange protocol.
//!
//! The setup instruction (MA) latches a 12-bit condition word naming the
//! device, direction and control options, plus the device offset and the
//! final memory address. The execute instruction (MB) supplies the first
//! memory address and performs the transfer. The condition word must
//! select exactly one of drum, tape, tape formatting, print or punch;
//! only the drum and the printer are real devices here.
//!
//! MA resolves the bitfield once into an `Exchange` value, so MB only has
//! to dispatch on the variant.

use crate::stop::Stop;

/// Condition-word bits.
pub const EXT_DIS_RAM: u16 = 0o4000; // memory interlock, accepted and ignored
pub const EXT_DIS_CHECK: u16 = 0o2000; // suppress checksum write/verify
pub const EXT_TAPE_REV: u16 = 0o1000; // reverse tape motion
pub const EXT_DIS_STOP: u16 = 0o0400; // suppress the stop on a read error
pub const EXT_PUNCH: u16 = 0o0200; // card punch
pub const EXT_PRINT: u16 = 0o0100; // console printer
pub const EXT_TAPE_FORMAT: u16 = 0o0040; // tape pre-formatting
pub const EXT_TAPE: u16 = 0o0020; // magnetic tape
pub const EXT_DRUM: u16 = 0o0010; // magnetic drum
pub const EXT_WRITE: u16 = 0o0004; // direction: write
pub const EXT_UNIT: u16 = 0o0003; // drum or tape unit number

/// A drum transfer, fully resolved except for the first memory address,
/// which arrives with the execute instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrumExchange {
    pub unit: u8,
    pub offset: u16,
    pub finish: u16,
    pub write: bool,
    /// Checksum handling is on (the block-check bit was clear).
    pub check: bool,
    /// A checksum mismatch branches instead of stopping.
    pub stop_disabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintMode {
    Decimal,
    Octal,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintJob {
    pub finish: u16,
    pub mode: PrintMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exchange {
    Drum(DrumExchange),
    Print(PrintJob),
    Tape,
    TapeFormat,
    Punch,
    /// No device bit at all; rejected when the execute instruction runs.
    Unselected(u16),
}

impl Exchange {
    /// Validate a condition word and latch the request. `offset` is the
    /// starting device address, `finish` the last memory address.
    pub fn setup(cond: u16, offset: u16, finish: u16) -> Result<Exchange, Stop> {
        let mut op = cond;

        if op & EXT_WRITE != 0 {
            // No checksum is verified while writing, so suppressing
            // the stop means nothing.
            op &= !EXT_DIS_STOP;
        }
        if op & EXT_DRUM != 0 {
            // The drum has no direction of motion.
            op &= !EXT_TAPE_REV;
            if op & (EXT_PUNCH | EXT_PRINT | EXT_TAPE_FORMAT | EXT_TAPE) != 0 {
                return Err(Stop::DrumInvalidControl(op));
            }
        }
        if op & EXT_TAPE != 0 && op & (EXT_PUNCH | EXT_PRINT | EXT_TAPE_FORMAT) != 0 {
            return Err(Stop::TapeInvalidControl(op));
        }
        if op & EXT_PRINT != 0 {
            // Writing and tape motion mean nothing to the printer.
            op &= !(EXT_WRITE | EXT_TAPE_REV);
        } else if op & EXT_TAPE_FORMAT != 0 {
            op &= !(EXT_WRITE | EXT_DIS_STOP | EXT_TAPE_REV);
            if op & (EXT_PUNCH | EXT_DIS_CHECK) != 0 {
                return Err(Stop::TapeFormatInvalidControl(op));
            }
        }
        if op & EXT_PUNCH != 0 {
            op &= !(EXT_WRITE | EXT_DIS_STOP | EXT_TAPE_REV);
        }

        if op & EXT_DRUM != 0 {
            Ok(Exchange::Drum(DrumExchange {
                unit: (op & EXT_UNIT) as u8,
                offset,
                finish,
                write: op & EXT_WRITE != 0,
                check: op & EXT_DIS_CHECK == 0,
                stop_disabled: op & EXT_DIS_STOP != 0,
            }))
        } else if op & EXT_TAPE != 0 {
            Ok(Exchange::Tape)
        } else if op & EXT_PRINT != 0 {
            // The printer overloads two condition bits as a format
            // selector: block-stop means octal, tape-format means text.
            let mode = if op & EXT_DIS_STOP != 0 {
                PrintMode::Octal
            } else if op & EXT_TAPE_FORMAT != 0 {
                PrintMode::Text
            } else {
                PrintMode::Decimal
            };
            Ok(Exchange::Print(PrintJob { finish, mode }))
        } else if op & EXT_PUNCH != 0 {
            Ok(Exchange::Punch)
        } else if op & EXT_TAPE_FORMAT != 0 {
            Ok(Exchange::TapeFormat)
        } else {
            Ok(Exchange::Unselected(op))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn drum_write_resolves_with_units() {
        let exchange = Exchange::setup(EXT_DRUM | EXT_WRITE | 2, 0o100, 0o50).unwrap();
        assert_eq!(
            exchange,
            Exchange::Drum(DrumExchange {
                unit: 2,
                offset: 0o100,
                finish: 0o50,
                write: true,
                check: true,
                stop_disabled: false,
            })
        );
    }

    #[test]
    fn write_discards_the_block_stop_bit() {
        let exchange =
            Exchange::setup(EXT_DRUM | EXT_WRITE | EXT_DIS_STOP, 0, 0).unwrap();
        match exchange {
            Exchange::Drum(drum) => assert!(!drum.stop_disabled),
            other => panic!("expected a drum exchange, got {:?}", other),
        }
    }

    #[test]
    fn drum_mixed_with_print_is_invalid() {
        assert_eq!(
            Exchange::setup(EXT_DRUM | EXT_PRINT, 0, 0),
            Err(Stop::DrumInvalidControl(EXT_DRUM | EXT_PRINT))
        );
    }

    #[test]
    fn tape_mixed_with_punch_is_invalid() {
        assert_eq!(
            Exchange::setup(EXT_TAPE | EXT_PUNCH, 0, 0),
            Err(Stop::TapeInvalidControl(EXT_TAPE | EXT_PUNCH))
        );
    }

    #[test]
    fn print_modes_come_from_overloaded_bits() {
        let decimal = Exchange::setup(EXT_PRINT, 0, 0o20).unwrap();
        let octal = Exchange::setup(EXT_PRINT | EXT_DIS_STOP, 0, 0o20).unwrap();
        let text = Exchange::setup(EXT_PRINT | EXT_TAPE_FORMAT, 0, 0o20).unwrap();
        for (exchange, mode) in [
            (decimal, PrintMode::Decimal),
            (octal, PrintMode::Octal),
            (text, PrintMode::Text),
        ] {
            assert_eq!(
                exchange,
                Exchange::Print(PrintJob {
                    finish: 0o20,
                    mode
                })
            );
        }
    }

    #[test]
    fn unsupported_devices_still_latch() {
        assert_eq!(Exchange::setup(EXT_TAPE, 0, 0), Ok(Exchange::Tape));
        assert_eq!(Exchange::setup(EXT_PUNCH, 0, 0), Ok(Exchange::Punch));
        assert_eq!(
            Exchange::setup(EXT_TAPE_FORMAT, 0, 0),
            Ok(Exchange::TapeFormat)
        );
        assert_eq!(
            Exchange::setup(EXT_DIS_RAM, 0, 0),
            Ok(Exchange::Unselected(EXT_DIS_RAM))
        );
    }
}
