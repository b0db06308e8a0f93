// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Fixed sizes and offsets of the emulated machine

/// Total addressable memory, in bytes
pub const MEMORY_SIZE: usize = 0x1000;
/// Where ROMs are loaded, and where execution starts
pub const PROGRAM_OFFSET: usize = 0x200;
/// Largest ROM that fits between [PROGRAM_OFFSET] and the end of memory
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_OFFSET;

/// Display height, in pixels
pub const SCREEN_ROWS: usize = 32;
/// Display width, in pixels
pub const SCREEN_COLS: usize = 64;

/// Width of one instruction, in bytes
pub const INSTRUCTION_SIZE: u16 = 2;

/// Number of general purpose registers
pub const REGISTERS: usize = 16;
/// Depth of the call stack
pub const STACK_DEPTH: usize = 16;
/// Number of lines on the hex keypad
pub const KEYS: usize = 16;

/// Where the hex font lives in memory
pub const FONT_OFFSET: u16 = 0x50;
/// Bytes per font glyph
pub const FONT_GLYPH_SIZE: u16 = 5;

/// CPU steps per scheduler cycle (~540Hz instruction clock at 60Hz)
pub const INSTRUCTIONS_PER_CYCLE: usize = 9;
/// Scheduler cycles per second
pub const FREQUENCY: u64 = 60;

/// Glyphs `0` through `F`, 4x5 pixels, one row per byte
#[rustfmt::skip]
pub const FONT: [u8; 80] = [
    0xf0, 0x90, 0x90, 0x90, 0xf0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xf0, 0x10, 0xf0, 0x80, 0xf0, // 2
    0xf0, 0x10, 0xf0, 0x10, 0xf0, // 3
    0x90, 0x90, 0xf0, 0x10, 0x10, // 4
    0xf0, 0x80, 0xf0, 0x10, 0xf0, // 5
    0xf0, 0x80, 0xf0, 0x90, 0xf0, // 6
    0xf0, 0x10, 0x20, 0x40, 0x40, // 7
    0xf0, 0x90, 0xf0, 0x90, 0xf0, // 8
    0xf0, 0x90, 0xf0, 0x10, 0xf0, // 9
    0xf0, 0x90, 0xf0, 0x90, 0x90, // A
    0xe0, 0x90, 0xe0, 0x90, 0xe0, // B
    0xf0, 0x80, 0x80, 0x80, 0xf0, // C
    0xe0, 0x90, 0x90, 0x90, 0xe0, // D
    0xf0, 0x80, 0xf0, 0x80, 0xf0, // E
    0xf0, 0x80, 0xf0, 0x80, 0x80, // F
];
