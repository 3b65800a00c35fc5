//! Reader for the text form of a memory image.
//!
//! The grammar is line based. `:OCTAL` moves the load address, `@OCTAL`
//! sets the start address, `=DECIMAL` stores a floating-point constant,
//! and a bare word is fifteen octal digits, whitespace between digits
//! permitted. `;` starts a comment and a leading byte-order mark is
//! tolerated.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::constants::MEMSIZE;
use crate::float::ieee_to_m20;

#[derive(Debug)]
pub enum ImageError {
    Io(io::Error),
    Parse { line: usize, message: String },
}

impl From<io::Error> for ImageError {
    fn from(error: io::Error) -> Self {
        ImageError::Io(error)
    }
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ImageError::Io(error) => write!(f, "{}", error),
            ImageError::Parse { line, message } => {
                write!(f, "line {}: {}", line, message)
            }
        }
    }
}

/// A parsed image: the start address and the words with their load
/// addresses, in file order.
#[derive(Debug)]
pub struct Image {
    pub start: u16,
    pub words: Vec<(u16, u64)>,
}

impl Image {
    pub fn from_file(path: &Path) -> Result<Image, ImageError> {
        Image::read(BufReader::new(File::open(path)?))
    }

    pub fn read(input: impl BufRead) -> Result<Image, ImageError> {
        let mut addr: u16 = 0;
        let mut start: u16 = 1;
        let mut words = Vec::new();

        for (index, line) in input.lines().enumerate() {
            let number = index + 1;
            let line = line?;
            let text = line.strip_prefix('\u{feff}').unwrap_or(&line);
            let text = text.trim_start_matches([' ', '\t']);
            if text.is_empty() || text.starts_with(';') {
                continue;
            }
            if let Some(rest) = text.strip_prefix(':') {
                addr = parse_octal(rest, number)?;
            } else if let Some(rest) = text.strip_prefix('@') {
                start = parse_octal(rest, number)?;
            } else if let Some(rest) = text.strip_prefix('=') {
                words.push((addr, ieee_to_m20(parse_float(rest, number)?)));
                addr += 1;
            } else {
                words.push((addr, parse_word(text, number)?));
                addr += 1;
            }
            if addr as usize > MEMSIZE {
                return Err(ImageError::Parse {
                    line: number,
                    message: format!("address out of range: {:o}", addr),
                });
            }
        }
        Ok(Image { start, words })
    }
}

fn parse_octal(text: &str, line: usize) -> Result<u16, ImageError> {
    let text = text.trim_start_matches([' ', '\t']);
    let digits: String = text.chars().take_while(|c| ('0'..='7').contains(c)).collect();
    if digits.is_empty() {
        return Err(ImageError::Parse {
            line,
            message: format!("expected an octal number: {:?}", text),
        });
    }
    u16::from_str_radix(&digits, 8).map_err(|_| ImageError::Parse {
        line,
        message: format!("octal number out of range: {}", digits),
    })
}

fn parse_float(text: &str, line: usize) -> Result<f64, ImageError> {
    let text = text.trim_start_matches([' ', '\t']);
    let token = text
        .split([' ', '\t', ';'])
        .next()
        .unwrap_or_default();
    token.parse().map_err(|_| ImageError::Parse {
        line,
        message: format!("expected a decimal number: {:?}", token),
    })
}

/// Fifteen octal digits, whitespace between digits allowed.
fn parse_word(text: &str, line: usize) -> Result<u64, ImageError> {
    let mut word = 0;
    let mut count = 0;
    for c in text.chars() {
        match c {
            '0'..='7' => {
                word = word << 3 | (c as u64 - '0' as u64);
                count += 1;
                if count == 15 {
                    return Ok(word);
                }
            }
            ' ' | '\t' => continue,
            _ => break,
        }
    }
    Err(ImageError::Parse {
        line,
        message: format!("word is too short: {:?}", text),
    })
}
