// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Maps instruction [Key]s to the [Handler]s that implement them
//!
//! Any handler can be hooked at run-time, without losing the base implementation:
//! [OpcodeTable::hook] replaces it, [OpcodeTable::pre_hook] and [OpcodeTable::post_hook]
//! run a callback around it, and [OpcodeTable::unhook] puts it back.

use super::{
    behavior::{self, Base},
    decode::Key,
};
use crate::{error::Result, state::MachineState};
use std::fmt::Debug;

/// Anything that can execute an instruction against a [MachineState]
///
/// Implemented for every `FnMut(&mut MachineState, u16) -> Result<()>`,
/// so closures can be used as hooks directly.
pub trait Handler: Send {
    /// Executes the instruction `word`
    fn execute(&mut self, state: &mut MachineState, word: u16) -> Result<()>;
}

impl<F> Handler for F
where
    F: FnMut(&mut MachineState, u16) -> Result<()> + Send,
{
    fn execute(&mut self, state: &mut MachineState, word: u16) -> Result<()> {
        self(state, word)
    }
}

/// How a hook composes with the base handler it displaces
pub enum Hook {
    /// Runs instead of the base handler
    Replace(Box<dyn Handler>),
    /// Runs before the base handler. If the hook fails, the base handler doesn't run.
    Before(Box<dyn Handler>),
    /// Runs after the base handler, if it succeeded
    After(Box<dyn Handler>),
}

impl Debug for Hook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Hook::Replace(_) => "Replace",
            Hook::Before(_) => "Before",
            Hook::After(_) => "After",
        })
    }
}

/// A base handler, and at most one hook layered on top of it
struct Slot {
    base: Base,
    hook: Option<Hook>,
}

impl Slot {
    fn execute(&mut self, state: &mut MachineState, word: u16) -> Result<()> {
        match &mut self.hook {
            None => (self.base)(state, word),
            Some(Hook::Replace(hook)) => hook.execute(state, word),
            Some(Hook::Before(hook)) => {
                hook.execute(state, word)?;
                (self.base)(state, word)
            }
            Some(Hook::After(hook)) => {
                (self.base)(state, word)?;
                hook.execute(state, word)
            }
        }
    }
}

/// Dispatches raw words to instruction handlers
pub struct OpcodeTable {
    slots: Vec<Slot>,
}

impl Default for OpcodeTable {
    /// Constructs a table of the base instruction set, with no hooks
    fn default() -> Self {
        Self {
            slots: Key::ALL
                .into_iter()
                .map(|key| Slot {
                    base: behavior::base(key),
                    hook: None,
                })
                .collect(),
        }
    }
}

impl OpcodeTable {
    /// Constructs a table of the base instruction set, with no hooks
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `word` and executes its handler against `state`.
    ///
    /// Returns [Error::UnknownOpcode](crate::error::Error::UnknownOpcode)
    /// if `word` isn't an instruction
    /// # Examples
    /// ```rust
    /// # use chirp_gym::*;
    /// let (mut table, mut state) = (OpcodeTable::new(), MachineState::new());
    /// table.execute(&mut state, 0x6a2f).unwrap();
    /// assert_eq!(0x2f, state.v()[0xa]);
    /// table.execute(&mut state, 0xffff).unwrap_err();
    /// ```
    pub fn execute(&mut self, state: &mut MachineState, word: u16) -> Result<()> {
        let key = Key::decode(word)?;
        self.slot(key).execute(state, word)
    }

    /// Replaces the handler for `key`.
    ///
    /// If `key` was already hooked, the old hook is dropped; hooks don't stack.
    /// # Examples
    /// ```rust
    /// # use chirp_gym::*;
    /// let (mut table, mut state) = (OpcodeTable::new(), MachineState::new());
    /// // make `6xkk` load the complement of kk
    /// table.hook(Key::K6xkk, |state: &mut MachineState, word: u16| {
    ///     state.set_v(word.x(), !word.kk())
    /// });
    /// table.execute(&mut state, 0x600f).unwrap();
    /// assert_eq!(0xf0, state.v()[0]);
    ///
    /// table.unhook(Key::K6xkk);
    /// table.execute(&mut state, 0x600f).unwrap();
    /// assert_eq!(0x0f, state.v()[0]);
    /// ```
    pub fn hook(&mut self, key: Key, handler: impl Handler + 'static) -> &mut Self {
        self.set_hook(key, Hook::Replace(Box::new(handler)))
    }

    /// Runs `handler` before the base handler for `key`
    pub fn pre_hook(&mut self, key: Key, handler: impl Handler + 'static) -> &mut Self {
        self.set_hook(key, Hook::Before(Box::new(handler)))
    }

    /// Runs `handler` after the base handler for `key`
    pub fn post_hook(&mut self, key: Key, handler: impl Handler + 'static) -> &mut Self {
        self.set_hook(key, Hook::After(Box::new(handler)))
    }

    /// Installs an already-composed [Hook] for `key`, dropping any hook it displaces
    pub fn set_hook(&mut self, key: Key, hook: Hook) -> &mut Self {
        if let Some(old) = self.slot(key).hook.replace(hook) {
            log::debug!("{key}: dropped {old:?} hook");
        }
        self
    }

    /// Restores the base handler for `key`, and returns the hook it removed
    pub fn unhook(&mut self, key: Key) -> Option<Hook> {
        self.slot(key).hook.take()
    }

    /// Returns true if `key` is currently hooked
    pub fn is_hooked(&self, key: Key) -> bool {
        self.slots[key as usize].hook.is_some()
    }

    /// Removes every hook
    pub fn unhook_all(&mut self) {
        self.slots.iter_mut().for_each(|slot| slot.hook = None);
    }

    fn slot(&mut self, key: Key) -> &mut Slot {
        &mut self.slots[key as usize]
    }
}

impl Debug for OpcodeTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                Key::ALL
                    .iter()
                    .zip(&self.slots)
                    .filter_map(|(key, slot)| Some((key, slot.hook.as_ref()?))),
            )
            .finish()
    }
}
