// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! This crate implements a headless Chip-8 virtual machine, built to be driven by
//! automated controllers: it runs a fixed number of instructions per 60Hz cycle, and
//! hands out an immutable [Frame] after every one.
//!
//! Every instruction handler lives in an [OpcodeTable], and can be hooked at run-time
//! for tracing, testing, or breakpoints.

pub mod cpu;
pub mod display;
pub mod error;
pub mod layout;
pub mod state;
pub mod vm;

pub use cpu::{
    decode::{Key, Operands},
    disassembler::{mnemonic, Dis, Disassembler},
    table::{Handler, Hook, OpcodeTable},
    CPU,
};
pub use display::{Buffer, DisplayBuffer};
pub use error::{Error, Result};
pub use state::MachineState;
pub use vm::{
    flags::Flags,
    profile::{Profile, Variable, VariableKind},
    Frame, Frames, VM,
};

/// Common imports for chirp-gym
pub mod prelude {
    pub use super::*;
    pub use crate::layout::*;
}
