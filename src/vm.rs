// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Schedules instructions, timers and keypresses into 60Hz cycles, and snapshots each one as a [Frame]

pub mod flags;
pub mod profile;

use self::{flags::Flags, profile::Profile};
use crate::{
    cpu::{table::OpcodeTable, CPU},
    display::Buffer,
    error::{Error, Result},
    state::MachineState,
};
use std::{
    collections::{BTreeMap, VecDeque},
    path::Path,
    time::Instant,
};

/// An immutable snapshot of the machine's outputs, taken after a cycle
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Number of cycles completed when this frame was taken
    pub cycle: usize,
    /// Copy of the display
    pub buffer: Buffer,
    /// Whether the sound timer is running
    pub buzzer: bool,
    /// Whether the display or buzzer changed since the previous frame
    pub changed: bool,
    /// Value of every variable declared by the loaded [Profile]
    pub variables: BTreeMap<String, u32>,
}

/// Owns a [MachineState] and the [CPU] that drives it
#[derive(Debug)]
pub struct VM {
    /// Scheduling knobs
    pub flags: Flags,
    state: MachineState,
    cpu: CPU,
    profile: Option<Profile>,
    keypresses: VecDeque<usize>,
    cycle: usize,
    last_cycle: Instant,
}

impl Default for VM {
    fn default() -> Self {
        Self::new(Flags::default())
    }
}

impl VM {
    /// Constructs a VM with a freshly powered-on machine
    pub fn new(flags: Flags) -> Self {
        Self {
            flags,
            state: MachineState::new(),
            cpu: CPU::new(),
            profile: None,
            keypresses: VecDeque::new(),
            cycle: 0,
            last_cycle: Instant::now(),
        }
    }

    /// Powers the machine back on: fresh memory and font, zeroed registers, timers and stack.
    ///
    /// The profile, flags, hooks and breakpoints survive, but the ROM must be loaded again.
    /// # Examples
    /// ```rust
    /// # use chirp_gym::*;
    /// let mut vm = VM::default();
    /// vm.load_rom(&[0x60, 0x0a]).unwrap();
    /// vm.cycle().unwrap();
    /// vm.reset();
    /// assert_eq!(0, vm.cycle_count());
    /// assert_eq!(0x200, vm.state().pc());
    /// assert_eq!(0, vm.state().v()[0]);
    /// ```
    pub fn reset(&mut self) {
        self.state = MachineState::new();
        self.keypresses.clear();
        self.cycle = 0;
        self.last_cycle = Instant::now();
        log::debug!("reset");
    }

    /// Copies `rom` into program memory
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<&mut Self> {
        self.state.load_rom(rom)?;
        log::debug!("loaded {} byte rom", rom.len());
        Ok(self)
    }

    /// Reads a raw ROM image from disk into program memory
    pub fn load_rom_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let path = path.as_ref();
        log::debug!("reading {}", path.display());
        self.load_rom(&std::fs::read(path)?)
    }

    /// Reads a [Profile] from disk, and loads the ROM it names
    pub fn load_rom_profile(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let profile = Profile::load(path)?;
        self.load_rom_file(&profile.rom)?;
        self.profile = Some(profile);
        Ok(self)
    }

    /// Installs a [Profile] without loading its ROM
    pub fn set_profile(&mut self, profile: Profile) -> &mut Self {
        self.profile = Some(profile);
        self
    }

    /// Borrows the loaded [Profile], if any
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Extracts a variable declared by the loaded [Profile]
    ///
    /// Returns [Error::NoProfile] if no profile is loaded,
    /// and [Error::UnknownVariable] if the profile doesn't declare `name`
    pub fn get_variable(&self, name: &str) -> Result<u32> {
        self.profile
            .as_ref()
            .ok_or(Error::NoProfile)?
            .variable(name)?
            .read(&self.state)
    }

    /// Presses the key `key`
    pub fn key_down(&mut self, key: usize) -> Result<()> {
        self.state.set_key(key, true)
    }

    /// Releases the key `key`
    pub fn key_up(&mut self, key: usize) -> Result<()> {
        self.state.set_key(key, false)
    }

    /// The keys a controller may press, from the loaded [Profile]
    pub fn actions(&self) -> Result<&[usize]> {
        self.profile
            .as_ref()
            .ok_or(Error::NoProfile)?
            .actions
            .as_deref()
            .ok_or(Error::NoActions)
    }

    /// Number of legal actions, including action `0` (no key)
    pub fn num_actions(&self) -> Result<usize> {
        Ok(self.actions()?.len() + 1)
    }

    /// Queues the keypress for `action`, which lasts for one cycle.
    ///
    /// Action `0` presses nothing. Action `n` presses the profile's `n`th action key.
    ///
    /// Returns [Error::NoProfile] or [Error::NoActions] for any action, `0` included,
    /// if no action set is loaded.
    /// # Examples
    /// ```rust
    /// # use chirp_gym::*;
    /// let mut vm = VM::default();
    /// vm.set_profile(Profile::from_json(r#"{"rom": "PONG", "actions": [1, 4]}"#).unwrap());
    /// assert_eq!(3, vm.num_actions().unwrap());
    /// vm.take_action(2).unwrap();
    /// vm.take_action(3).unwrap_err();
    /// ```
    pub fn take_action(&mut self, action: usize) -> Result<()> {
        let actions = self.actions()?;
        let Some(index) = action.checked_sub(1) else {
            return Ok(());
        };
        let key = *actions.get(index).ok_or(Error::InvalidAction {
            action,
            count: actions.len() + 1,
        })?;
        self.keypresses.push_back(key);
        Ok(())
    }

    /// Turns on wall-clock pacing
    pub fn enable_pacing(&mut self) -> &mut Self {
        self.flags.pacing = true;
        self
    }

    /// Turns off wall-clock pacing
    pub fn disable_pacing(&mut self) -> &mut Self {
        self.flags.pacing = false;
        self
    }

    /// Gets a copy of the display
    pub fn get_display_buffer(&self) -> Buffer {
        self.state.display().buffer()
    }

    /// Returns true while the buzzer sounds
    pub fn get_buzzer_state(&self) -> bool {
        self.state.buzzer()
    }

    /// Runs one cycle:
    /// 1. Presses the next queued key
    /// 2. Executes [Flags::ipc] instructions
    /// 3. Decrements the delay and sound timers
    /// 4. If pacing, sleeps out the rest of the cycle's period
    /// 5. Releases the key pressed in step 1
    ///
    /// Errors from the CPU end the cycle early; the key is still released.
    /// # Examples
    /// ```rust
    /// # use chirp_gym::*;
    /// let mut vm = VM::default();
    /// vm.load_rom(&[
    ///     0x60, 0x0a, // ld v0, 0x0a
    ///     0xf0, 0x15, // ld dt, v0
    ///     0x12, 0x04, // jp 0x204
    /// ]).unwrap();
    /// vm.cycle().unwrap();
    /// assert_eq!(9, vm.state().delay());
    /// assert_eq!(1, vm.cycle_count());
    /// ```
    pub fn cycle(&mut self) -> Result<()> {
        let pressed = self.keypresses.pop_front();
        if let Some(key) = pressed {
            self.state.set_key(key, true)?;
        }

        let stepped = (0..self.flags.ipc).try_for_each(|_| self.cpu.step(&mut self.state));
        if stepped.is_ok() {
            self.state.tick_timers();
            self.pace();
        }

        if let Some(key) = pressed {
            self.state.set_key(key, false)?;
        }
        stepped?;
        self.cycle += 1;
        Ok(())
    }

    /// Snapshots the current outputs, and forgets whether they changed
    pub fn frame(&mut self) -> Result<Frame> {
        let variables = match &self.profile {
            Some(profile) => profile.read_all(&self.state)?,
            None => BTreeMap::new(),
        };
        Ok(Frame {
            cycle: self.cycle,
            buffer: self.get_display_buffer(),
            buzzer: self.get_buzzer_state(),
            changed: self.state.output_has_changed(),
            variables,
        })
    }

    /// Runs one cycle, then snapshots it
    pub fn next_frame(&mut self) -> Result<Frame> {
        self.cycle()?;
        self.frame()
    }

    /// Iterates over the frames of successive cycles, forever.
    ///
    /// Iteration ends after the first error.
    /// # Examples
    /// ```rust
    /// # use chirp_gym::*;
    /// let mut vm = VM::default();
    /// vm.load_rom(&[0x12, 0x00]).unwrap(); // jp 0x200
    /// let cycles: Vec<_> = vm.frames().take(3).map(|f| f.unwrap().cycle).collect();
    /// assert_eq!(vec![1, 2, 3], cycles);
    /// ```
    pub fn frames(&mut self) -> Frames<'_> {
        Frames {
            vm: self,
            done: false,
        }
    }

    /// Number of cycles completed since the last reset
    pub fn cycle_count(&self) -> usize {
        self.cycle
    }

    /// Borrows the machine
    pub fn state(&self) -> &MachineState {
        &self.state
    }

    /// Mutably borrows the machine
    pub fn state_mut(&mut self) -> &mut MachineState {
        &mut self.state
    }

    /// Borrows the [CPU]
    pub fn cpu(&self) -> &CPU {
        &self.cpu
    }

    /// Mutably borrows the [CPU]
    pub fn cpu_mut(&mut self) -> &mut CPU {
        &mut self.cpu
    }

    /// Borrows the [OpcodeTable]
    pub fn opcodes(&self) -> &OpcodeTable {
        self.cpu.opcodes()
    }

    /// Mutably borrows the [OpcodeTable], so handlers can be hooked
    pub fn opcodes_mut(&mut self) -> &mut OpcodeTable {
        self.cpu.opcodes_mut()
    }

    fn pace(&mut self) {
        if let (true, Some(period)) = (self.flags.pacing, self.flags.period()) {
            if let Some(remaining) = period.checked_sub(self.last_cycle.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
        self.last_cycle = Instant::now();
    }
}

/// Iterator over the [Frame]s of a [VM]. See [VM::frames]
#[derive(Debug)]
pub struct Frames<'a> {
    vm: &'a mut VM,
    done: bool,
}

impl Iterator for Frames<'_> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let frame = self.vm.next_frame();
        self.done = frame.is_err();
        Some(frame)
    }
}
