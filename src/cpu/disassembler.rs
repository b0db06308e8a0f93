// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! A disassembler for Chip-8 opcodes

use super::decode::{Key, Operands};
use owo_colors::{OwoColorize, Style};

/// Disassembles Chip-8 instructions
pub trait Disassembler {
    /// Disassemble a single instruction
    fn once(&self, insn: u16) -> String;
}

/// Renders `word` as an assembly mnemonic, or [None] if it isn't an instruction
/// # Examples
/// ```rust
/// # use chirp_gym::*;
/// assert_eq!("ADD V3, VA", mnemonic(0x83a4).unwrap());
/// assert_eq!(None, mnemonic(0xffff));
/// ```
#[rustfmt::skip]
pub fn mnemonic(word: u16) -> Option<String> {
    let (x, y, n, kk, nnn) = (word.x(), word.y(), word.n(), word.kk(), word.nnn());
    Some(match Key::decode(word).ok()? {
        Key::K00E0 => "CLS".to_string(),
        Key::K00EE => "RET".to_string(),
        Key::K0nnn => format!("SYS  {nnn:#05x}"),
        Key::K1nnn => format!("JP   {nnn:#05x}"),
        Key::K2nnn => format!("CALL {nnn:#05x}"),
        Key::K3xkk => format!("SE   V{x:X}, {kk:#04x}"),
        Key::K4xkk => format!("SNE  V{x:X}, {kk:#04x}"),
        Key::K5xy0 => format!("SE   V{x:X}, V{y:X}"),
        Key::K6xkk => format!("LD   V{x:X}, {kk:#04x}"),
        Key::K7xkk => format!("ADD  V{x:X}, {kk:#04x}"),
        Key::K8xy0 => format!("LD   V{x:X}, V{y:X}"),
        Key::K8xy1 => format!("OR   V{x:X}, V{y:X}"),
        Key::K8xy2 => format!("AND  V{x:X}, V{y:X}"),
        Key::K8xy3 => format!("XOR  V{x:X}, V{y:X}"),
        Key::K8xy4 => format!("ADD  V{x:X}, V{y:X}"),
        Key::K8xy5 => format!("SUB  V{x:X}, V{y:X}"),
        Key::K8xy6 => format!("SHR  V{x:X}"),
        Key::K8xy7 => format!("SUBN V{x:X}, V{y:X}"),
        Key::K8xyE => format!("SHL  V{x:X}"),
        Key::K9xy0 => format!("SNE  V{x:X}, V{y:X}"),
        Key::KAnnn => format!("LD   I, {nnn:#05x}"),
        Key::KBnnn => format!("JP   V0, {nnn:#05x}"),
        Key::KCxkk => format!("RND  V{x:X}, {kk:#04x}"),
        Key::KDxyn => format!("DRW  V{x:X}, V{y:X}, {n}"),
        Key::KEx9E => format!("SKP  V{x:X}"),
        Key::KExA1 => format!("SKNP V{x:X}"),
        Key::KFx07 => format!("LD   V{x:X}, DT"),
        Key::KFx0A => format!("LD   V{x:X}, K"),
        Key::KFx15 => format!("LD   DT, V{x:X}"),
        Key::KFx18 => format!("LD   ST, V{x:X}"),
        Key::KFx1E => format!("ADD  I, V{x:X}"),
        Key::KFx29 => format!("LD   F, V{x:X}"),
        Key::KFx33 => format!("LD   B, V{x:X}"),
        Key::KFx55 => format!("LD   [I], V{x:X}"),
        Key::KFx65 => format!("LD   V{x:X}, [I]"),
    }
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" "))
}

/// Disassembles Chip-8 instructions, printing them in the provided [owo_colors::Style]s
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dis {
    /// Styles invalid instructions
    pub invalid: Style,
    /// Styles valid instruction
    pub normal: Style,
}

impl Default for Dis {
    fn default() -> Self {
        Self {
            invalid: Style::new().bold().red(),
            normal: Style::new().green(),
        }
    }
}

impl Disassembler for Dis {
    fn once(&self, insn: u16) -> String {
        match mnemonic(insn) {
            Some(text) => format!("{}", text.style(self.normal)),
            None => format!("{}", format_args!("inval {insn:04x}").style(self.invalid)),
        }
    }
}
