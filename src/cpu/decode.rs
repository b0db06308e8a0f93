// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Classifies raw words into canonical instruction [Key]s
//!
//! Chip-8 opcodes are 16 bits each, and are classified by their nibbles `n1 n2 n3 n4`,
//! most significant first. Nibbles that don't pick the instruction carry its operands:
//! - `_nnn` a 12-bit address
//! - `__kk` an immediate byte
//! - `_x__` the register vX
//! - `__y_` the register vY
//! - `___n` a 4-bit count

use crate::error::{Error, Result};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

/// Extracts operands from a raw instruction word
pub trait Operands {
    /// The word's nibbles, most significant first
    fn nibbles(&self) -> (u8, u8, u8, u8);
    /// `_x__`
    fn x(&self) -> usize;
    /// `__y_`
    fn y(&self) -> usize;
    /// `___n`
    fn n(&self) -> u8;
    /// `__kk`
    fn kk(&self) -> u8;
    /// `_nnn`
    fn nnn(&self) -> u16;
}

impl Operands for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        ((self >> 12) as u8, self.x() as u8, self.y() as u8, self.n())
    }
    fn x(&self) -> usize {
        (*self as usize >> 8) & 0xf
    }
    fn y(&self) -> usize {
        (*self as usize >> 4) & 0xf
    }
    fn n(&self) -> u8 {
        (self & 0xf) as u8
    }
    fn kk(&self) -> u8 {
        (self & 0xff) as u8
    }
    fn nnn(&self) -> u16 {
        self & 0xfff
    }
}

macro_rules! keys {
    ($($(#[$meta:meta])* $key:ident = $name:literal),* $(,)?) => {
        /// The canonical name of an instruction, independent of its operands
        #[allow(non_camel_case_types)]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Key {
            $($(#[$meta])* $key,)*
        }

        impl Key {
            /// Every key, in table order
            pub const ALL: [Key; Key::COUNT] = [$(Key::$key,)*];
            /// Total number of keys
            pub const COUNT: usize = [$($name,)*].len();

            /// The canonical name of this key, i.e. `"8xy4"`
            pub fn name(self) -> &'static str {
                match self {
                    $(Key::$key => $name,)*
                }
            }
        }
    };
}

keys! {
    /// | 00E0 | Clear the display
    K00E0 = "00E0",
    /// | 00EE | Return from subroutine
    K00EE = "00EE",
    /// | 0nnn | Machine language subroutine (ignored)
    K0nnn = "0nnn",
    /// | 1nnn | Jump
    K1nnn = "1nnn",
    /// | 2nnn | Call subroutine
    K2nnn = "2nnn",
    /// | 3xkk | Skip if vX == kk
    K3xkk = "3xkk",
    /// | 4xkk | Skip if vX != kk
    K4xkk = "4xkk",
    /// | 5xy0 | Skip if vX == vY
    K5xy0 = "5xy0",
    /// | 6xkk | vX = kk
    K6xkk = "6xkk",
    /// | 7xkk | vX += kk
    K7xkk = "7xkk",
    /// | 8xy0 | vX = vY
    K8xy0 = "8xy0",
    /// | 8xy1 | vX |= vY
    K8xy1 = "8xy1",
    /// | 8xy2 | vX &= vY
    K8xy2 = "8xy2",
    /// | 8xy3 | vX ^= vY
    K8xy3 = "8xy3",
    /// | 8xy4 | vX += vY, vF = carry
    K8xy4 = "8xy4",
    /// | 8xy5 | vX -= vY, vF = !borrow
    K8xy5 = "8xy5",
    /// | 8xy6 | vX >>= 1, vF = shifted out
    K8xy6 = "8xy6",
    /// | 8xy7 | vY -= vX, vF = !borrow
    K8xy7 = "8xy7",
    /// | 8xyE | vX <<= 1, vF = shifted out
    K8xyE = "8xyE",
    /// | 9xy0 | Skip if vX != vY
    K9xy0 = "9xy0",
    /// | Annn | I = nnn
    KAnnn = "Annn",
    /// | Bnnn | Jump to nnn + v0
    KBnnn = "Bnnn",
    /// | Cxkk | vX = random & kk
    KCxkk = "Cxkk",
    /// | Dxyn | Draw n-byte sprite at (vX, vY)
    KDxyn = "Dxyn",
    /// | Ex9E | Skip if key vX is pressed
    KEx9E = "Ex9E",
    /// | ExA1 | Skip if key vX is not pressed
    KExA1 = "ExA1",
    /// | Fx07 | vX = DT
    KFx07 = "Fx07",
    /// | Fx0A | Wait for a key, store it in vX
    KFx0A = "Fx0A",
    /// | Fx15 | DT = vX
    KFx15 = "Fx15",
    /// | Fx18 | ST = vX
    KFx18 = "Fx18",
    /// | Fx1E | I += vX, vF = carry
    KFx1E = "Fx1E",
    /// | Fx29 | I = glyph for vX
    KFx29 = "Fx29",
    /// | Fx33 | BCD of vX into I[0..3]
    KFx33 = "Fx33",
    /// | Fx55 | Store v0..=vX at I
    KFx55 = "Fx55",
    /// | Fx65 | Load v0..=vX from I
    KFx65 = "Fx65",
}

impl Key {
    /// Classifies a raw word by its nibbles.
    ///
    /// Returns [Error::UnknownOpcode] if the word matches no instruction.
    /// # Examples
    /// ```rust
    /// # use chirp_gym::*;
    /// assert_eq!(Key::K8xy4, Key::decode(0x8ab4).unwrap());
    /// assert_eq!(Key::K0nnn, Key::decode(0x0123).unwrap());
    /// Key::decode(0xe0ff).unwrap_err();
    /// ```
    #[rustfmt::skip]
    pub fn decode(word: u16) -> Result<Self> {
        use Key::*;
        let key = match word.nibbles() {
            (0x0, 0x0, _, 0x0) => K00E0,
            (0x0, 0x0, _, 0xe) => K00EE,
            (0x0, 0x1..=0xf, _, _) => K0nnn,
            (0x1, _, _, _) => K1nnn,
            (0x2, _, _, _) => K2nnn,
            (0x3, _, _, _) => K3xkk,
            (0x4, _, _, _) => K4xkk,
            (0x5, _, _, _) => K5xy0,
            (0x6, _, _, _) => K6xkk,
            (0x7, _, _, _) => K7xkk,
            (0x8, _, _, 0x0) => K8xy0,
            (0x8, _, _, 0x1) => K8xy1,
            (0x8, _, _, 0x2) => K8xy2,
            (0x8, _, _, 0x3) => K8xy3,
            (0x8, _, _, 0x4) => K8xy4,
            (0x8, _, _, 0x5) => K8xy5,
            (0x8, _, _, 0x6) => K8xy6,
            (0x8, _, _, 0x7) => K8xy7,
            (0x8, _, _, 0xe) => K8xyE,
            (0x9, _, _, _) => K9xy0,
            (0xa, _, _, _) => KAnnn,
            (0xb, _, _, _) => KBnnn,
            (0xc, _, _, _) => KCxkk,
            (0xd, _, _, _) => KDxyn,
            (0xe, _, _, 0xe) => KEx9E,
            (0xe, _, _, 0x1) => KExA1,
            (0xf, _, 0x0, 0x7) => KFx07,
            (0xf, _, 0x0, 0xa) => KFx0A,
            (0xf, _, 0x1, 0x5) => KFx15,
            (0xf, _, 0x1, 0x8) => KFx18,
            (0xf, _, 0x1, 0xe) => KFx1E,
            (0xf, _, 0x2, 0x9) => KFx29,
            (0xf, _, 0x3, 0x3) => KFx33,
            (0xf, _, 0x5, 0x5) => KFx55,
            (0xf, _, 0x6, 0x5) => KFx65,
            _ => return Err(Error::UnknownOpcode { word }),
        };
        Ok(key)
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Key {
    type Err = Error;

    /// Parses a canonical name, ignoring case
    /// # Examples
    /// ```rust
    /// # use chirp_gym::*;
    /// assert_eq!(Key::KFx0A, "fx0a".parse::<Key>().unwrap());
    /// assert_eq!(Key::K00E0, "00E0".parse::<Key>().unwrap());
    /// "Fx99".parse::<Key>().unwrap_err();
    /// ```
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Key::ALL
            .into_iter()
            .find(|key| key.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidKeyName { key: s.to_string() })
    }
}
