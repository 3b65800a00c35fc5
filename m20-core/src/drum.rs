//! The magnetic drum: 16384 words of random-access storage behind a flat
//! binary file, one little-endian `u64` per word.
//!
//! All drum i/o completes inside the instruction that requested it; the
//! M-20 has no interrupt system and no real drum timing is modelled. Each
//! checked transfer carries a trailing checksum word computed with the
//! cyclic addition of the arithmetic unit.
//!
//! A fresh backing file is filled with all-ones words. Bit 46 can never be
//! set in a real machine word, so those sectors read back as never written.

use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::constants::{BIT37, BIT46, DRUM_SIZE, MANTISSA, WORD};
use crate::memory::Memory;
use crate::stop::Stop;

/// One step of the transfer checksum, identical to the cyclic-add
/// instruction: the two halves of the word accumulate separately, each
/// wrapping its overflow back around.
pub fn checksum(x: u64, y: u64) -> u64 {
    let mut hi = (x & !MANTISSA).wrapping_add(y & !MANTISSA);
    if hi & BIT46 != 0 {
        hi += BIT37;
    }
    let mut lo = (x & MANTISSA).wrapping_add(y & MANTISSA);
    if lo & BIT37 != 0 {
        lo = lo.wrapping_add(1);
    }
    (hi & WORD & !MANTISSA) | (lo & MANTISSA)
}

pub struct Drum {
    file: Option<File>,
    path: Option<PathBuf>,
}

impl Drum {
    pub fn new() -> Drum {
        Drum {
            file: None,
            path: None,
        }
    }

    /// Use this backing file instead of `M20_DRUM` / the home directory
    /// default. Takes effect on the next attach.
    pub fn set_path(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    /// `M20_DRUM`, or `$HOME/.m20/drum.bin`.
    fn default_path() -> PathBuf {
        if let Some(path) = env::var_os("M20_DRUM") {
            return PathBuf::from(path);
        }
        let home = env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        home.join(".m20").join("drum.bin")
    }

    /// Open the backing file, creating directory and file on demand.
    /// A file that has never held a full drum is refilled with the
    /// all-ones "never written" pattern.
    pub fn attach(&mut self, path: &Path) -> io::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;
        if file.metadata()?.len() < (DRUM_SIZE * 8) as u64 {
            file.seek(SeekFrom::Start(0))?;
            let ones = [0xff; 8];
            for _ in 0..DRUM_SIZE {
                file.write_all(&ones)?;
            }
        }
        self.file = Some(file);
        Ok(())
    }

    fn ensure_attached(&mut self) -> io::Result<&mut File> {
        if self.file.is_none() {
            let path = self.path.clone().unwrap_or_else(Drum::default_path);
            self.attach(&path)?;
        }
        match self.file {
            Some(ref mut file) => Ok(file),
            None => unreachable!(),
        }
    }

    /// Write `memory[first..=last]` to the drum starting at word `addr`.
    /// When `check` is set, the checksum of the range is appended after it
    /// and returned.
    pub fn write(
        &mut self,
        addr: u32,
        first: u16,
        last: u16,
        memory: &Memory,
        check: bool,
    ) -> Result<u64, Stop> {
        let nwords = last as i64 - first as i64 + 1;
        if nwords <= 0 || addr as i64 + nwords > DRUM_SIZE as i64 {
            return Err(Stop::BadWriteLength);
        }
        let file = self
            .ensure_attached()
            .map_err(|_| Stop::DrumWriteError)?;
        file.seek(SeekFrom::Start(addr as u64 * 8))
            .map_err(|_| Stop::DrumWriteError)?;

        let mut sum = 0;
        for a in first..=last {
            let word = memory.load(a)?;
            file.write_all(&word.to_le_bytes())
                .map_err(|_| Stop::DrumWriteError)?;
            sum = checksum(sum, word);
        }
        if !check {
            return Ok(0);
        }
        file.write_all(&sum.to_le_bytes())
            .map_err(|_| Stop::DrumWriteError)?;
        Ok(sum)
    }

    /// Read words `addr..` of the drum into `memory[first..=last]`.
    /// When `check` is set, one extra word is read after the range and
    /// compared against the recomputed checksum.
    pub fn read(
        &mut self,
        addr: u32,
        first: u16,
        last: u16,
        memory: &mut Memory,
        check: bool,
    ) -> Result<u64, Stop> {
        let nwords = last as i64 - first as i64 + 1;
        if nwords <= 0 || addr as i64 + nwords > DRUM_SIZE as i64 {
            return Err(Stop::BadReadLength);
        }
        let file = self
            .ensure_attached()
            .map_err(|_| Stop::DrumReadError)?;
        file.seek(SeekFrom::Start(addr as u64 * 8))
            .map_err(|_| Stop::DrumReadError)?;

        let mut buf = [0; 8];
        let mut words = Vec::with_capacity(nwords as usize);
        for _ in 0..nwords {
            file.read_exact(&mut buf).map_err(|_| Stop::DrumReadError)?;
            let word = u64::from_le_bytes(buf);
            if word & BIT46 != 0 {
                return Err(Stop::DrumUninitializedData);
            }
            words.push(word);
        }

        let mut sum = 0;
        for (i, &word) in words.iter().enumerate() {
            memory.store(first + i as u16, word);
            sum = checksum(sum, word);
        }
        if !check {
            return Ok(0);
        }
        file.read_exact(&mut buf).map_err(|_| Stop::DrumReadError)?;
        if u64::from_le_bytes(buf) != sum {
            return Err(Stop::DrumReadError);
        }
        Ok(sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scratch_drum(name: &str) -> Drum {
        let path = env::temp_dir().join(format!("m20-drum-{}.bin", name));
        let _ = fs::remove_file(&path);
        let mut drum = Drum::new();
        drum.set_path(path);
        drum
    }

    #[test]
    fn checksum_of_nothing_is_zero_and_one_word_is_itself() {
        assert_eq!(checksum(0, 0), 0);
        let word = 0o345_1234_5670_1234;
        assert_eq!(checksum(0, word), word);
    }

    #[test]
    fn checksum_wraps_both_halves() {
        // The upper overflow comes back around through bit 37.
        let all_high = WORD & !MANTISSA;
        assert_eq!(checksum(all_high, all_high), 0o777_0000_0000_0000);

        // The mantissa overflow comes back around through bit 1.
        assert_eq!(checksum(MANTISSA, MANTISSA), MANTISSA);
    }

    #[test]
    fn write_then_read_round_trips_with_checksum() {
        let mut drum = scratch_drum("roundtrip");
        let mut memory = Memory::new();
        for a in 0o40..=0o50 {
            memory.store(a, 0o100_0000_0000_0000 + a as u64);
        }
        let sum = drum.write(0o100, 0o40, 0o50, &memory, true).unwrap();
        assert_ne!(sum, 0);

        // Scribble over the range, then read it back.
        memory.store(0o41, 0);
        let read_sum = drum.read(0o100, 0o40, 0o50, &mut memory, true).unwrap();
        assert_eq!(read_sum, sum);
        assert_eq!(memory.load(0o41), Ok(0o100_0000_0000_0041));
    }

    #[test]
    fn corrupted_checksum_is_a_read_error() {
        let mut drum = scratch_drum("badsum");
        let mut memory = Memory::new();
        memory.store(1, 0o42);
        memory.store(2, 0o43);
        drum.write(0, 1, 2, &memory, true).unwrap();

        // Overwrite word 1 on the drum without refreshing the checksum.
        memory.store(1, 0o44);
        drum.write(0, 1, 1, &memory, false).unwrap();
        assert_eq!(
            drum.read(0, 1, 2, &mut memory, true),
            Err(Stop::DrumReadError)
        );
        // The disabled-check read goes through.
        assert_eq!(drum.read(0, 1, 2, &mut memory, false), Ok(0));
    }

    #[test]
    fn fresh_drum_reads_as_uninitialized() {
        let mut drum = scratch_drum("fresh");
        let mut memory = Memory::new();
        assert_eq!(
            drum.read(0o200, 1, 4, &mut memory, false),
            Err(Stop::DrumUninitializedData)
        );
    }

    #[test]
    fn bad_ranges_are_rejected() {
        let mut drum = scratch_drum("ranges");
        let mut memory = Memory::new();
        memory.store(1, 1);
        assert_eq!(
            drum.write(0, 2, 1, &memory, true),
            Err(Stop::BadWriteLength)
        );
        assert_eq!(
            drum.read(16383, 1, 4, &mut memory, true),
            Err(Stop::BadReadLength)
        );
    }
}
