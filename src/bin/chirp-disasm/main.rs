// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Disassembles a Chip-8 ROM, one instruction per line

use chirp_gym::{layout::PROGRAM_OFFSET, *};
use gumdrop::*;
use owo_colors::OwoColorize;
use std::{fs::read, path::PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Show help text")]
    help: bool,
    #[options(help = "Load a ROM to disassemble", free, required)]
    pub file: PathBuf,
    #[options(help = "Start disassembling at offset...")]
    pub offset: usize,
}

fn main() -> Result<()> {
    let options = Arguments::parse_args_default_or_exit();
    let contents = read(&options.file)?;
    let disassembler = Dis::default();
    let Some(program) = contents.get(options.offset..) else {
        eprintln!(
            "{}",
            format!(
                "offset {:x} is past the end of {} ({} bytes)",
                options.offset,
                options.file.display(),
                contents.len()
            )
            .bold()
            .red()
        );
        std::process::exit(1);
    };
    for (addr, insn) in program.chunks_exact(2).enumerate() {
        let insn = u16::from_be_bytes([insn[0], insn[1]]);
        println!(
            "{:03x}: {} {:04x}",
            2 * addr + PROGRAM_OFFSET + options.offset,
            disassembler.once(insn),
            insn.bright_black(),
        );
    }
    Ok(())
}
