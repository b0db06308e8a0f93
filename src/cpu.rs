// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions


pub mod behavior;
pub mod decode;
pub mod disassembler;
pub mod table;

use self::{
    disassembler::{Dis, Disassembler},
    table::OpcodeTable,
};
use crate::{
    error::{Error, Result},
    layout::INSTRUCTION_SIZE,
    state::MachineState,
};

/// Fetches, decodes and executes one instruction at a time against a [MachineState]
#[derive(Debug, Default)]
pub struct CPU {
    table: OpcodeTable,
    breakpoints: Vec<u16>,
    disassembler: Dis,
}

// public interface
impl CPU {
    /// Constructs a new CPU, with the base instruction set and no breakpoints
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrows the [OpcodeTable]
    pub fn opcodes(&self) -> &OpcodeTable {
        &self.table
    }

    /// Mutably borrows the [OpcodeTable], so handlers can be hooked
    pub fn opcodes_mut(&mut self) -> &mut OpcodeTable {
        &mut self.table
    }

    /// Sets a breakpoint
    /// # Examples
    /// ```rust
    /// # use chirp_gym::*;
    /// let mut cpu = CPU::new();
    /// cpu.set_break(0x204);
    /// assert!(cpu.breakpoints().contains(&0x204));
    /// ```
    pub fn set_break(&mut self, point: u16) -> &mut Self {
        if !self.breakpoints.contains(&point) {
            self.breakpoints.push(point)
        }
        self
    }

    /// Unsets a breakpoint
    pub fn unset_break(&mut self, point: u16) -> &mut Self {
        self.breakpoints.retain(|&addr| addr != point);
        self
    }

    /// Gets a slice of breakpoints
    pub fn breakpoints(&self) -> &[u16] {
        self.breakpoints.as_slice()
    }

    /// Reads the big-endian word at the program counter, and advances the program counter.
    ///
    /// The program counter moves before dispatch, so handlers which set it aren't clobbered.
    /// If the word extends past the end of memory, returns [Error::OutOfBounds]
    /// # Examples
    /// ```rust
    /// # use chirp_gym::*;
    /// let (mut cpu, mut state) = (CPU::new(), MachineState::new());
    /// state.load_rom(&[0x12, 0x34]).unwrap();
    /// assert_eq!(0x1234, cpu.fetch(&mut state).unwrap());
    /// assert_eq!(0x202, state.pc());
    /// ```
    pub fn fetch(&mut self, state: &mut MachineState) -> Result<u16> {
        let word = word_at(state, state.pc())?;
        state.set_pc(state.pc().wrapping_add(INSTRUCTION_SIZE));
        Ok(word)
    }

    /// Executes a single instruction.
    ///
    /// Unknown opcodes are logged and skipped. Any other error from the handler is returned.
    ///
    /// Returns [Error::BreakpointHit] if the program counter lands on a breakpoint.
    /// # Examples
    /// ```rust
    /// # use chirp_gym::*;
    /// let (mut cpu, mut state) = (CPU::new(), MachineState::new());
    /// state.load_rom(&[
    ///     0xff, 0xff, // invalid!
    ///     0x60, 0x0a, // ld v0, 0x0a
    /// ]).unwrap();
    /// cpu.step(&mut state).unwrap();
    /// cpu.step(&mut state).unwrap();
    /// assert_eq!(0x0a, state.v()[0]);
    /// assert_eq!(0x204, state.pc());
    /// ```
    pub fn step(&mut self, state: &mut MachineState) -> Result<()> {
        let pc = state.pc();
        let word = self.fetch(state)?;
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("{pc:03x}: {}", self.disassembler.once(word));
        }
        match self.table.execute(state, word) {
            Err(Error::UnknownOpcode { word }) => {
                log::warn!("{pc:03x}: skipped unknown opcode {word:04x}")
            }
            result => result?,
        }
        let addr = state.pc();
        if self.breakpoints.contains(&addr) {
            return Err(Error::BreakpointHit {
                addr,
                word: word_at(state, addr).unwrap_or_default(),
            });
        }
        Ok(())
    }
}

fn word_at(state: &MachineState, addr: u16) -> Result<u16> {
    let bytes = state.read(addr as usize, INSTRUCTION_SIZE as usize)?;
    Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
}
