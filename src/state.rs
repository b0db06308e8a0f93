// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! All of the emulated hardware of one machine

use crate::{
    display::DisplayBuffer,
    error::{Error, Result},
    layout::*,
};
use std::fmt::Debug;

/// Memory, registers, timers, stack, keypad and display of a running machine
#[derive(Clone, PartialEq, Eq)]
pub struct MachineState {
    // memory
    pub(crate) memory: [u8; MEMORY_SIZE],
    pub(crate) stack: [u16; STACK_DEPTH],
    // registers
    pub(crate) v: [u8; REGISTERS],
    pub(crate) i: u16,
    pub(crate) pc: u16,
    pub(crate) sp: usize,
    pub(crate) delay: u8,
    sound: u8,
    // I/O
    pub(crate) keyboard: [bool; KEYS],
    pub(crate) display: DisplayBuffer,
    sound_changed: bool,
}

impl Default for MachineState {
    /// Constructs a freshly powered-on machine, with the font loaded at
    /// [FONT_OFFSET] and the program counter at [PROGRAM_OFFSET]
    fn default() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let font = FONT_OFFSET as usize;
        memory[font..font + FONT.len()].copy_from_slice(&FONT);
        Self {
            memory,
            stack: [0; STACK_DEPTH],
            v: [0; REGISTERS],
            i: 0,
            pc: PROGRAM_OFFSET as u16,
            sp: 0,
            delay: 0,
            sound: 0,
            keyboard: [false; KEYS],
            display: DisplayBuffer::default(),
            sound_changed: false,
        }
    }
}

// public interface
impl MachineState {
    /// Constructs a freshly powered-on machine
    /// # Examples
    /// ```rust
    /// # use chirp_gym::*;
    /// let state = MachineState::new();
    /// assert_eq!(0x200, state.pc());
    /// assert_eq!(0xf0, state.memory()[0x50]);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies `rom` into program memory, starting at [PROGRAM_OFFSET].
    ///
    /// If the ROM doesn't fit, returns [Error::RomTooLarge] and leaves memory alone.
    /// # Examples
    /// ```rust
    /// # use chirp_gym::*;
    /// let mut state = MachineState::new();
    /// state.load_rom(&[0x60, 0x0a]).unwrap();
    /// assert_eq!(&[0x60, 0x0a], &state.memory()[0x200..0x202]);
    /// ```
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<&mut Self> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Error::RomTooLarge {
                len: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        self.memory[PROGRAM_OFFSET..PROGRAM_OFFSET + rom.len()].copy_from_slice(rom);
        Ok(self)
    }

    /// Gets a slice of the entire memory
    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    /// Gets `len` bytes of memory starting at `addr`.
    /// If any of them are out of bounds, returns [Error::OutOfBounds]
    pub fn read(&self, addr: usize, len: usize) -> Result<&[u8]> {
        self.memory
            .get(addr..addr.saturating_add(len))
            .ok_or(Error::OutOfBounds { addr, len })
    }

    /// Writes `data` into memory starting at `addr`.
    /// If any byte would land out of bounds, returns [Error::OutOfBounds] and writes nothing
    /// # Examples
    /// ```rust
    /// # use chirp_gym::*;
    /// let mut state = MachineState::new();
    /// state.write(0xffe, &[1, 2]).unwrap();
    /// state.write(0xfff, &[1, 2]).unwrap_err();
    /// ```
    pub fn write(&mut self, addr: usize, data: &[u8]) -> Result<()> {
        let len = data.len();
        self.memory
            .get_mut(addr..addr.saturating_add(len))
            .ok_or(Error::OutOfBounds { addr, len })?
            .copy_from_slice(data);
        Ok(())
    }

    /// Gets a slice of the entire general purpose registers
    pub fn v(&self) -> &[u8] {
        &self.v
    }

    /// Sets a general purpose register.
    /// If the register doesn't exist, returns [Error::InvalidRegister]
    /// # Examples
    /// ```rust
    /// # use chirp_gym::*;
    /// let mut state = MachineState::new();
    /// state.set_v(0x4, 0x41).unwrap();
    /// assert_eq!(0x41, state.v()[4]);
    /// state.set_v(0x10, 0x41).unwrap_err();
    /// ```
    pub fn set_v(&mut self, reg: usize, value: u8) -> Result<()> {
        *self
            .v
            .get_mut(reg)
            .ok_or(Error::InvalidRegister { reg })? = value;
        Ok(())
    }

    /// Gets the I register
    pub fn i(&self) -> u16 {
        self.i
    }

    /// Sets the I register
    pub fn set_i(&mut self, i: u16) {
        self.i = i;
    }

    /// Gets the program counter
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Sets the program counter
    pub fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }

    /// Gets the stack pointer (the number of return addresses on the stack)
    pub fn sp(&self) -> usize {
        self.sp
    }

    /// Gets the live portion of the call stack, oldest first
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.sp]
    }

    /// Pushes a return address.
    /// Returns [Error::StackOverflow] if the stack is full
    pub(crate) fn push(&mut self, addr: u16) -> Result<()> {
        let slot = self
            .stack
            .get_mut(self.sp)
            .ok_or(Error::StackOverflow { pc: self.pc })?;
        *slot = addr;
        self.sp += 1;
        Ok(())
    }

    /// Pops a return address.
    /// Returns [Error::StackUnderflow] if the stack is empty
    pub(crate) fn pop(&mut self) -> Result<u16> {
        self.sp = self
            .sp
            .checked_sub(1)
            .ok_or(Error::StackUnderflow { pc: self.pc })?;
        Ok(self.stack[self.sp])
    }

    /// Gets the value in the Delay Timer register
    pub fn delay(&self) -> u8 {
        self.delay
    }

    /// Sets the Delay Timer register
    pub fn set_delay(&mut self, value: u8) {
        self.delay = value;
    }

    /// Gets the value in the Sound Timer register
    pub fn sound(&self) -> u8 {
        self.sound
    }

    /// Sets the Sound Timer register.
    ///
    /// Turning the buzzer on or off counts as an output change.
    /// # Examples
    /// ```rust
    /// # use chirp_gym::*;
    /// let mut state = MachineState::new();
    /// state.set_sound(4);
    /// state.set_sound(3); // still buzzing
    /// assert!(state.output_has_changed());
    /// assert!(!state.output_has_changed());
    /// state.set_sound(0);
    /// assert!(state.output_has_changed());
    /// ```
    pub fn set_sound(&mut self, value: u8) {
        self.sound_changed |= (self.sound != 0) != (value != 0);
        self.sound = value;
    }

    /// Decrements both timers toward zero
    pub fn tick_timers(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.set_sound(self.sound.saturating_sub(1));
    }

    /// Returns true while the sound timer is running
    pub fn buzzer(&self) -> bool {
        self.sound > 0
    }

    /// Reports whether the screen or buzzer changed since the last call, and forgets the change
    pub fn output_has_changed(&mut self) -> bool {
        let display = self.display.has_changed();
        std::mem::take(&mut self.sound_changed) | display
    }

    /// Gets the state of every key line
    pub fn keyboard(&self) -> &[bool] {
        &self.keyboard
    }

    /// Sets or clears a key line.
    /// If the key doesn't exist, returns [Error::InvalidKey]
    pub fn set_key(&mut self, key: usize, pressed: bool) -> Result<()> {
        *self
            .keyboard
            .get_mut(key)
            .ok_or(Error::InvalidKey { key })? = pressed;
        Ok(())
    }

    /// Checks a key line.
    /// If the key doesn't exist, returns [Error::InvalidKey]
    pub fn key(&self, key: usize) -> Result<bool> {
        self.keyboard
            .get(key)
            .copied()
            .ok_or(Error::InvalidKey { key })
    }

    /// Borrows the display
    pub fn display(&self) -> &DisplayBuffer {
        &self.display
    }

    /// Mutably borrows the display
    pub fn display_mut(&mut self) -> &mut DisplayBuffer {
        &mut self.display
    }

    /// Dumps the current state of all registers, timers and the stack
    /// # Examples
    /// ```rust
    /// # use chirp_gym::*;
    /// let state = MachineState::new();
    /// state.dump();
    /// ```
    /// outputs
    /// ```text
    /// PC: 0200, SP: 00, I: 0000
    /// v0: 00 v1: 00 v2: 00 v3: 00
    /// v4: 00 v5: 00 v6: 00 v7: 00
    /// v8: 00 v9: 00 vA: 00 vB: 00
    /// vC: 00 vD: 00 vE: 00 vF: 00
    /// DLY: 0, SND: 0, STACK: []
    /// ```
    pub fn dump(&self) {
        std::println!(
            "PC: {:04x}, SP: {:02x}, I: {:04x}\n{}DLY: {}, SND: {}, STACK: {:03x?}",
            self.pc,
            self.sp,
            self.i,
            self.v
                .into_iter()
                .enumerate()
                .map(|(i, gpr)| {
                    format!(
                        "v{i:X}: {gpr:02x} {}",
                        match i % 4 {
                            3 => "\n",
                            _ => "",
                        }
                    )
                })
                .collect::<String>(),
            self.delay,
            self.sound,
            self.stack(),
        );
    }
}

impl Debug for MachineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MachineState")
            .field("stack", &self.stack())
            .field("pc", &self.pc)
            .field("i", &self.i)
            .field("v", &self.v)
            .field("delay", &self.delay)
            .field("sound", &self.sound)
            .field("keyboard", &self.keyboard)
            .finish_non_exhaustive()
    }
}
