// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Chirp-gym: runs a Chip-8 ROM headless, the way an automated controller would

use chirp_gym::{error::Error::BreakpointHit, layout::INSTRUCTIONS_PER_CYCLE, *};
use gumdrop::*;
use owo_colors::OwoColorize;
use rand::{rngs::ThreadRng, Rng};
use std::path::PathBuf;

pub fn main() -> Result<()> {
    env_logger::init();
    let options = Arguments::parse_args_default_or_exit();
    let mut state = State::new(options)?;
    for result in &mut state {
        if let Err(e) = result {
            eprintln!("{}", e.bold().red());
            break;
        }
    }
    state.finish();
    Ok(())
}

/// Parses a hexadecimal string into a u16
fn parse_hex(value: &str) -> std::result::Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(value, 16)
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Load a ROM, or a ROM profile (.json), to run.", required, free)]
    pub file: PathBuf,
    #[options(help = "Print this help message.")]
    help: bool,

    #[options(
        short = "n",
        help = "Number of frames to run.",
        default = "600",
        meta = "N"
    )]
    pub frames: usize,
    #[options(short = "r", help = "Pace frames to wall-clock time.")]
    pub realtime: bool,
    #[options(short = "s", help = "Set the instructions-per-frame rate.", meta = "IPC")]
    pub speed: Option<usize>,
    #[options(help = "Set the target framerate.", default = "60", meta = "FR")]
    pub frame_rate: u64,

    #[options(
        short = "a",
        help = "Take a random legal action every frame (requires a profile)."
    )]
    pub random: bool,
    #[options(short = "p", help = "Print the screen whenever it changes.")]
    pub screen: bool,
    #[options(short = "d", help = "Dump the registers on exit.")]
    pub dump: bool,

    #[options(
        long = "break",
        help = "Set breakpoints for the emulator to stop at.",
        parse(try_from_str = "parse_hex"),
        meta = "BP"
    )]
    pub breakpoints: Vec<u16>,
}

#[derive(Debug)]
struct State {
    pub vm: VM,
    pub frames: usize,
    pub agent: Option<ThreadRng>,
    pub screen: bool,
    pub dump: bool,
    pub last: Option<Frame>,
}

impl State {
    fn new(options: Arguments) -> Result<Self> {
        let mut vm = VM::new(Flags {
            pacing: options.realtime,
            ipc: options.speed.unwrap_or(INSTRUCTIONS_PER_CYCLE),
            frequency: options.frame_rate,
        });
        match options.file.extension() {
            Some(ext) if ext == "json" => vm.load_rom_profile(&options.file)?,
            _ => vm.load_rom_file(&options.file)?,
        };
        for &point in &options.breakpoints {
            vm.cpu_mut().set_break(point);
        }
        if options.random {
            // fail early if the profile has no actions
            vm.num_actions()?;
        }
        Ok(State {
            vm,
            frames: options.frames,
            agent: options.random.then(rand::thread_rng),
            screen: options.screen,
            dump: options.dump,
            last: None,
        })
    }
    fn act(&mut self) -> Result<()> {
        if let Some(agent) = &mut self.agent {
            let action = agent.gen_range(0..self.vm.num_actions()?);
            self.vm.take_action(action)?;
        }
        Ok(())
    }
    fn finish(&self) {
        if self.dump {
            self.vm.state().dump();
        }
        if let Some(frame) = &self.last {
            println!("{} frames", frame.cycle);
            for (name, value) in &frame.variables {
                println!("{name}: {value}");
            }
        }
    }
}

impl Iterator for State {
    type Item = Result<()>;

    fn next(&mut self) -> Option<Self::Item> {
        self.frames = self.frames.checked_sub(1)?;
        if let Err(e) = self.act() {
            return Some(Err(e));
        }
        match self.vm.next_frame() {
            Ok(frame) => {
                if self.screen && frame.changed {
                    self.vm.state().display().print_screen();
                }
                self.last = Some(frame);
            }
            // Allow breakpoint hit messages
            Err(BreakpointHit { addr, word }) => {
                eprintln!("Breakpoint hit: {:3x} ({:4x})", addr, word);
            }
            Err(e) => return Some(Err(e)),
        }
        Some(Ok(()))
    }
}
