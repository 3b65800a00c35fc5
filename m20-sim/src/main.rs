use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use colored::Colorize;

use m20_core::image::Image;
use m20_core::machine::Machine;

/// Simulator for the M-20 computer.
///
/// Runs a memory image produced by the assembler. A clean halt exits with
/// status 0; any other stop is reported on stderr.
#[derive(Parser)]
#[command(name = "m20-sim", version)]
struct Args {
    /// Memory image to run
    image: PathBuf,

    /// Trace execution; give twice to trace every instruction
    #[arg(short = 't', action = clap::ArgAction::Count)]
    trace: u8,

    /// Trace instructions fetched from an octal address range
    #[arg(short = 'T', value_name = "START:END", value_parser = parse_range)]
    trace_range: Option<(u16, u16)>,

    /// Report every read of an octal address
    #[arg(short = 'R', value_name = "ADDR", value_parser = parse_octal)]
    read_watch: Option<u16>,

    /// Report every write of an octal address
    #[arg(short = 'W', value_name = "ADDR", value_parser = parse_octal)]
    write_watch: Option<u16>,

    /// Drum backing file; overrides M20_DRUM and the default
    /// ~/.m20/drum.bin
    #[arg(long, value_name = "FILE")]
    drum: Option<PathBuf>,
}

fn parse_octal(text: &str) -> Result<u16, String> {
    u16::from_str_radix(text, 8).map_err(|_| format!("not an octal address: {}", text))
}

fn parse_range(text: &str) -> Result<(u16, u16), String> {
    match text.split_once(':') {
        Some((start, end)) => Ok((parse_octal(start)?, parse_octal(end)?)),
        None => {
            let addr = parse_octal(text)?;
            Ok((addr, addr))
        }
    }
}

fn main() {
    let args = Args::parse();

    let image = match Image::from_file(&args.image) {
        Ok(image) => image,
        Err(error) => {
            eprintln!(
                "{}: {}",
                args.image.display().to_string().bold(),
                error.to_string().red()
            );
            exit(1);
        }
    };

    let mut machine = Machine::new();
    machine.load_image(&image);
    machine.trace.instructions = args.trace > 1;
    machine.trace.range = args.trace_range;
    machine.trace.read_watch = args.read_watch;
    machine.trace.write_watch = args.write_watch;
    if let Some(path) = args.drum {
        machine.drum.set_path(path);
    }

    if args.trace > 0 {
        println!("Read {}", args.image.display());
        println!("Starting at {:04o}", machine.rvk);
    }

    let stop = machine.run();
    if stop.is_normal() {
        return;
    }
    eprintln!("{:04o}: {}", machine.rvk, stop.to_string().red());
    exit(1);
}
