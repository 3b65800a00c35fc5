//! Console printer output: decimal, octal, or GOST text.
//!
//! The decimal layout follows the hardware manual: eight cells per line,
//! the first position showing `#` when the word carries a tag. Octal
//! prints fifteen digits per word, eight to a line. Text decodes six
//! GOST characters per word, 128 words to a line.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use crate::constants::TAG;
use crate::float::m20_to_ieee;
use crate::gost;
use crate::memory::Memory;
use crate::stop::Stop;

pub struct Printer {
    out: Box<dyn Write>,
}

impl Printer {
    pub fn new(out: Box<dyn Write>) -> Printer {
        Printer { out }
    }

    pub fn stdout() -> Printer {
        Printer::new(Box::new(io::stdout()))
    }

    /// Console output is best effort; a failing write is dropped.
    fn emit(&mut self, text: &str) {
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }

    /// Print `memory[first..=last]` as decimal floating-point numbers.
    pub fn decimal(&mut self, memory: &Memory, first: u16, last: u16) -> Result<(), Stop> {
        let mut text = String::new();
        let mut n = 0;
        loop {
            let x = memory.load(first + n)?;
            text.push(if x & TAG != 0 { '#' } else { ' ' });
            text.push_str(&format!("{:13.6e}", m20_to_ieee(x)));
            if first + n >= last {
                text.push('\n');
                break;
            }
            text.push_str(if n & 7 == 7 { "\n" } else { "  " });
            n += 1;
        }
        self.emit(&text);
        Ok(())
    }

    /// Print `memory[first..=last]` as fifteen-digit octal words.
    pub fn octal(&mut self, memory: &Memory, first: u16, last: u16) -> Result<(), Stop> {
        let mut text = String::new();
        let mut n = 0;
        loop {
            let x = memory.load(first + n)?;
            text.push_str(&format!("{:015o}", x));
            if first + n >= last {
                text.push('\n');
                break;
            }
            text.push_str(if n & 7 == 7 { "\n" } else { " " });
            n += 1;
        }
        self.emit(&text);
        Ok(())
    }

    /// Print `memory[first..=last]` as GOST-encoded text.
    pub fn text(&mut self, memory: &Memory, first: u16, last: u16) -> Result<(), Stop> {
        let mut text = String::new();
        let mut n = 0;
        loop {
            let x = memory.load(first + n)?;
            for code in gost::word_chars(x) {
                text.push(gost::to_unicode(code).unwrap_or(' '));
            }
            if first + n >= last {
                text.push('\n');
                break;
            }
            if n & 127 == 127 {
                text.push('\n');
            }
            n += 1;
        }
        self.emit(&text);
        Ok(())
    }
}

/// An `io::Write` over a shared byte buffer, so tests can hand the printer
/// a sink and read it back afterwards.
#[derive(Clone, Default)]
pub struct SharedBuffer {
    bytes: Rc<RefCell<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> SharedBuffer {
        SharedBuffer::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float::ieee_to_m20;
    use pretty_assertions::assert_eq;

    fn capture() -> (Printer, SharedBuffer) {
        let buffer = SharedBuffer::new();
        (Printer::new(Box::new(buffer.clone())), buffer)
    }

    #[test]
    fn decimal_prefixes_tagged_words() {
        let (mut printer, buffer) = capture();
        let mut memory = Memory::new();
        memory.store(1, ieee_to_m20(1.0));
        memory.store(2, ieee_to_m20(-0.5) | TAG);
        printer.decimal(&memory, 1, 2).unwrap();
        let line = buffer.contents();
        assert!(line.starts_with(' '), "untagged word prefixed: {:?}", line);
        assert!(line.contains('#'), "tagged word prefixed: {:?}", line);
        assert!(line.ends_with('\n'));

        // The printed numbers parse back to the stored values.
        let values: Vec<f64> = line
            .trim()
            .trim_start_matches('#')
            .split(|c| c == ' ' || c == '#')
            .filter(|s| !s.is_empty())
            .map(|s| s.parse().unwrap())
            .collect();
        assert_eq!(values, vec![1.0, -0.5]);
    }

    #[test]
    fn octal_prints_fifteen_digits_eight_per_line() {
        let (mut printer, buffer) = capture();
        let mut memory = Memory::new();
        for a in 1..=9 {
            memory.store(a, a as u64);
        }
        printer.octal(&memory, 1, 9).unwrap();
        let text = buffer.contents();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("000000000000001 000000000000002"));
        assert_eq!(lines[1], "000000000000011");
    }

    #[test]
    fn text_decodes_gost_words() {
        let (mut printer, buffer) = capture();
        let mut memory = Memory::new();
        memory.store(1, gost::pack_chars([0o54, 0o13, 0o02, 0o00, 0o17, 0o17]));
        printer.text(&memory, 1, 1).unwrap();
        assert_eq!(buffer.contents(), "М-20  \n");
    }
}
