// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Describes a ROM: where it lives, which memory holds its interesting values,
//! and which keys a controller may press.
//!
//! Profiles are JSON:
//! ```json
//! {
//!     "rom": "PONG",
//!     "variables": { "score": { "type": "mem_bcd", "index": 758 } },
//!     "actions": [1, 4]
//! }
//! ```

use crate::{
    error::{Error, Result},
    layout::KEYS,
    state::MachineState,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

/// How a [Variable] is extracted from a [MachineState]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    /// Three BCD digits at `memory[index..index + 3]`, hundreds first
    MemBcd,
    /// The general purpose register `v[index]`
    Register,
}

/// A named value the profile extracts each frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variable {
    #[serde(rename = "type")]
    pub kind: VariableKind,
    pub index: usize,
}

impl Variable {
    /// Extracts this variable's current value
    /// # Examples
    /// ```rust
    /// # use chirp_gym::*;
    /// let mut state = MachineState::new();
    /// state.write(0x300, &[2, 0, 5]).unwrap();
    /// let score = Variable { kind: VariableKind::MemBcd, index: 0x300 };
    /// assert_eq!(205, score.read(&state).unwrap());
    /// ```
    pub fn read(&self, state: &MachineState) -> Result<u32> {
        match self.kind {
            VariableKind::MemBcd => {
                let digits = state.read(self.index, 3)?;
                Ok(digits
                    .iter()
                    .fold(0, |acc, &digit| acc * 10 + digit as u32))
            }
            VariableKind::Register => state
                .v()
                .get(self.index)
                .map(|&v| v as u32)
                .ok_or(Error::InvalidRegister { reg: self.index }),
        }
    }
}

/// A ROM profile
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Path to the ROM. Relative paths are resolved against the profile's directory by [Profile::load]
    pub rom: PathBuf,
    #[serde(default)]
    pub variables: BTreeMap<String, Variable>,
    /// Key indices a controller may press. Action `n` presses `actions[n - 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<usize>>,
}

impl Profile {
    /// Parses a profile from JSON, rejecting action keys that don't exist
    /// # Examples
    /// ```rust
    /// # use chirp_gym::*;
    /// let profile = Profile::from_json(r#"{"rom": "PONG", "actions": [1, 4]}"#).unwrap();
    /// assert_eq!(Some(&[1, 4][..]), profile.actions.as_deref());
    /// assert!(profile.variables.is_empty());
    ///
    /// Profile::from_json(r#"{"rom": "PONG", "actions": [16]}"#).unwrap_err();
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let profile: Self = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Reads a profile from disk, resolving its ROM path against the profile's directory
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut profile = Self::from_json(&std::fs::read_to_string(path)?)?;
        if let Some(dir) = path.parent() {
            profile.rom = dir.join(&profile.rom);
        }
        log::debug!("loaded profile {}", path.display());
        Ok(profile)
    }

    /// Looks up a variable by name.
    /// If it isn't declared, returns [Error::UnknownVariable]
    pub fn variable(&self, name: &str) -> Result<&Variable> {
        self.variables.get(name).ok_or_else(|| Error::UnknownVariable {
            name: name.to_string(),
        })
    }

    /// Extracts the current value of every declared variable
    pub fn read_all(&self, state: &MachineState) -> Result<BTreeMap<String, u32>> {
        self.variables
            .iter()
            .map(|(name, var)| Ok((name.clone(), var.read(state)?)))
            .collect()
    }

    fn validate(&self) -> Result<()> {
        match self.actions.iter().flatten().find(|&&key| key >= KEYS) {
            Some(&key) => Err(Error::InvalidKey { key }),
            None => Ok(()),
        }
    }
}
