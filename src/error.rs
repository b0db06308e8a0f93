// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for Chirp-gym

use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Chirp-gym.
#[derive(Debug, Error)]
pub enum Error {
    /// Represents a word which doesn't decode to any instruction
    #[error("opcode {word:04x} not recognized")]
    UnknownOpcode {
        /// The offending word
        word: u16,
    },
    /// Tried to call a subroutine with a full stack
    #[error("stack overflow calling from {pc:03x}")]
    StackOverflow {
        /// The address of the instruction after the call
        pc: u16,
    },
    /// Tried to return with nothing on the stack
    #[error("stack underflow returning from {pc:03x}")]
    StackUnderflow {
        /// The address of the instruction after the return
        pc: u16,
    },
    /// Tried to touch memory past the end of the address space
    #[error("access of {len} byte(s) at {addr:04x} is out of bounds")]
    OutOfBounds {
        /// The first address of the access
        addr: usize,
        /// The number of bytes accessed
        len: usize,
    },
    /// The ROM doesn't fit in program memory
    #[error("rom is {len} bytes, but only {max} bytes fit in program memory")]
    RomTooLarge {
        /// Size of the offending ROM
        len: usize,
        /// Size of program memory
        max: usize,
    },
    /// Tried to press a key that doesn't exist
    #[error("tried to press key {key:X} which does not exist")]
    InvalidKey {
        /// The offending key
        key: usize,
    },
    /// Tried to get/set an out-of-bounds register
    #[error("tried to access register v{reg:X} which does not exist")]
    InvalidRegister {
        /// The offending register
        reg: usize,
    },
    /// Tried to parse a string which is not a canonical instruction key
    #[error("no instruction key named \"{key}\"")]
    InvalidKeyName {
        /// The string which failed to become a key
        key: String,
    },
    /// The profile has no variable by that name
    #[error("profile has no variable named \"{name}\"")]
    UnknownVariable {
        /// The offending name
        name: String,
    },
    /// The action index is outside the legal action set
    #[error("action {action} is out of range (the profile defines {count} actions)")]
    InvalidAction {
        /// The offending action
        action: usize,
        /// Number of legal actions, including "no key"
        count: usize,
    },
    /// A profile-driven operation was requested before loading a profile
    #[error("no rom profile has been loaded")]
    NoProfile,
    /// The loaded profile doesn't declare an action set
    #[error("rom profile declares no actions")]
    NoActions,
    /// Represents a breakpoint being hit
    #[error("breakpoint hit: {addr:03x} ({word:04x})")]
    BreakpointHit {
        /// The address of the breakpoint
        addr: u16,
        /// The instruction at the breakpoint
        word: u16,
    },
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    /// Error originated in [serde_json]
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
}
