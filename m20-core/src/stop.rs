//! The reasons a simulated run comes to a stop, defined in one place.
//!
//! The M-20 has no interrupt system and no traps: every abnormal condition
//! halts the machine. Arithmetic routines and opcode handlers report these
//! through `Result`, and the fetch loop returns the first one it sees.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    /// Halt instruction. With both addresses zero this is a clean finish.
    Halt { a1: u16, a2: u16 },
    /// A debugger breakpoint address was reached.
    Breakpoint,
    /// Instruction fetch ran past the end of memory.
    RunOut,
    /// Opcode with no operation assigned to it.
    BadCommand(u8),
    AdditionOverflow,
    ExponentOverflow,
    MultiplicationOverflow,
    DivisionOverflow,
    DivisionMantissaOverflow,
    NegativeSqrt,
    SqrtError,
    /// Drum checksum mismatch or a failure reading the backing file.
    /// The only recoverable stop: the block-stop bit of the condition
    /// word turns it into a branch.
    DrumReadError,
    /// Failure writing the drum backing file.
    DrumWriteError,
    BadReadLength,
    BadWriteLength,
    /// Condition word mixes the drum with another device.
    DrumInvalidControl(u16),
    /// A read range covered drum words that were never written.
    DrumUninitializedData,
    TapeInvalidControl(u16),
    TapeFormatInvalidControl(u16),
    TapeUnsupported,
    TapeFormatUnsupported,
    PunchUnsupported,
    PunchReadUnsupported,
    /// Condition word selects no device at all.
    ExtInvalidControl(u16),
    /// Console-register select outside 0..5.
    InvalidArgument(u16),
    /// Compare-and-halt instruction found a mismatch; carries RR.
    AssertFailed(u64),
    /// Exchange-execute without a preceding exchange-setup.
    MbWithoutMa,
    /// Read or fetch of a memory cell that was never written.
    UninitializedRead(u16),
}

impl Stop {
    /// A halt with both addresses zero is the normal way for a program
    /// to finish.
    pub fn is_normal(&self) -> bool {
        matches!(self, Stop::Halt { a1: 0, a2: 0 })
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Stop::Halt { a1, a2 } => write!(f, "halt: A1={:04o}, A2={:04o}", a1, a2),
            Stop::Breakpoint => write!(f, "breakpoint"),
            Stop::RunOut => write!(f, "run out of memory limits"),
            Stop::BadCommand(op) => write!(f, "invalid instruction: {:02o}", op),
            Stop::AdditionOverflow => write!(f, "addition overflow"),
            Stop::ExponentOverflow => write!(f, "exponent overflow"),
            Stop::MultiplicationOverflow => write!(f, "multiplication overflow"),
            Stop::DivisionOverflow => write!(f, "division overflow"),
            Stop::DivisionMantissaOverflow => write!(f, "mantissa overflow in division"),
            Stop::NegativeSqrt => write!(f, "square root of a negative number"),
            Stop::SqrtError => write!(f, "square root error"),
            Stop::DrumReadError => write!(f, "drum read error"),
            Stop::DrumWriteError => write!(f, "drum write error"),
            Stop::BadReadLength => write!(f, "invalid drum read length"),
            Stop::BadWriteLength => write!(f, "invalid drum write length"),
            Stop::DrumInvalidControl(op) => {
                write!(f, "invalid control word for drum exchange: {:04o}", op)
            }
            Stop::DrumUninitializedData => write!(f, "read of uninitialized drum data"),
            Stop::TapeInvalidControl(op) => {
                write!(f, "invalid control word for tape exchange: {:04o}", op)
            }
            Stop::TapeFormatInvalidControl(op) => {
                write!(f, "invalid control word for tape formatting: {:04o}", op)
            }
            Stop::TapeUnsupported => write!(f, "magnetic tape is not supported"),
            Stop::TapeFormatUnsupported => write!(f, "tape formatting is not supported"),
            Stop::PunchUnsupported => write!(f, "card punch output is not supported"),
            Stop::PunchReadUnsupported => write!(f, "punched-card input is not supported"),
            Stop::ExtInvalidControl(op) => {
                write!(f, "invalid control word for exchange: {:04o}", op)
            }
            Stop::InvalidArgument(a1) => {
                write!(f, "invalid argument of instruction: {:04o}", a1)
            }
            Stop::AssertFailed(rr) => write!(f, "mismatch stop: RR={:015o}", rr),
            Stop::MbWithoutMa => {
                write!(f, "exchange-execute instruction without exchange-setup")
            }
            Stop::UninitializedRead(addr) => {
                write!(f, "read of uninitialized memory word: {:04o}", addr)
            }
        }
    }
}
