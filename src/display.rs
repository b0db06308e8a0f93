// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The monochrome pixel grid, and the sprite blitter that draws into it

#[cfg(test)]
mod tests;

use crate::layout::{SCREEN_COLS, SCREEN_ROWS};
use std::fmt::{Display, Formatter};

/// A copy of the pixel grid, indexed `[row][col]`
pub type Buffer = [[bool; SCREEN_COLS]; SCREEN_ROWS];

/// A [SCREEN_ROWS] x [SCREEN_COLS] grid of 1-bit pixels, which remembers
/// whether it has changed since it was last asked
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DisplayBuffer {
    pixels: Buffer,
    changed: bool,
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self {
            pixels: [[false; SCREEN_COLS]; SCREEN_ROWS],
            changed: false,
        }
    }
}

impl DisplayBuffer {
    /// Constructs a blank, unchanged [DisplayBuffer]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every pixel.
    ///
    /// The buffer counts as changed only if something was lit before the clear.
    /// # Examples
    /// ```rust
    /// # use chirp_gym::*;
    /// let mut display = DisplayBuffer::new();
    /// display.clear();
    /// assert!(!display.has_changed());
    /// display.draw_sprite(0, 0, &[0x80]);
    /// display.has_changed();
    /// display.clear();
    /// assert!(display.has_changed());
    /// ```
    pub fn clear(&mut self) {
        self.changed = self.any();
        self.pixels = [[false; SCREEN_COLS]; SCREEN_ROWS];
    }

    /// XORs an 8-pixel-wide sprite onto the buffer with its top-left corner at (`x`, `y`),
    /// and reports whether any lit pixel was erased.
    ///
    /// Each byte of `sprite` is one row, most significant bit leftmost.
    /// Rows past the bottom edge and columns past the right edge are clipped, not wrapped.
    /// # Examples
    /// ```rust
    /// # use chirp_gym::*;
    /// let mut display = DisplayBuffer::new();
    /// assert!(!display.draw_sprite(62, 0, &[0xff, 0xff]));
    /// assert!(display.pixel(63, 1));
    /// // the second draw erases what the first one lit
    /// assert!(display.draw_sprite(62, 0, &[0xff, 0xff]));
    /// assert!(!display.pixel(63, 1));
    /// ```
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let mut collision = false;
        if x >= SCREEN_COLS {
            return collision;
        }
        let width = (SCREEN_COLS - x).min(8);
        for (line, &byte) in sprite.iter().enumerate() {
            let Some(row) = self.pixels.get_mut(y + line) else {
                continue;
            };
            for (bit, pixel) in row[x..x + width].iter_mut().enumerate() {
                let lit = byte & (0x80 >> bit) != 0;
                collision |= *pixel && lit;
                self.changed |= lit;
                *pixel ^= lit;
            }
        }
        collision
    }

    /// Reports whether the buffer changed since the last call, and forgets the change
    pub fn has_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    /// Peeks at the change flag without clearing it
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Returns true if any pixel is lit
    pub fn any(&self) -> bool {
        self.pixels.iter().flatten().any(|&pixel| pixel)
    }

    /// Gets the pixel at column `x`, row `y`. Off-screen pixels are unlit.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or_default()
    }

    /// Borrows the pixel grid
    pub fn pixels(&self) -> &Buffer {
        &self.pixels
    }

    /// Copies the pixel grid
    pub fn buffer(&self) -> Buffer {
        self.pixels
    }

    /// Prints the screen at 1bpp, using braille if `drawille` is enabled
    /// # Examples
    /// ```rust
    /// # use chirp_gym::*;
    /// let mut display = DisplayBuffer::new();
    /// display.draw_sprite(0, 0, &[0xaa, 0x55]);
    /// display.print_screen();
    /// ```
    pub fn print_screen(&self) {
        // draw with the drawille library, if available
        #[cfg(feature = "drawille")]
        {
            use drawille::Canvas;
            let mut canvas = Canvas::new(SCREEN_COLS as u32, SCREEN_ROWS as u32);
            for (y, row) in self.pixels.iter().enumerate() {
                for (x, &pixel) in row.iter().enumerate() {
                    if pixel {
                        canvas.set(x as u32, y as u32);
                    }
                }
            }
            println!("{}", canvas.frame());
        }
        #[cfg(not(feature = "drawille"))]
        for (y, row) in self.pixels.iter().enumerate() {
            println!(
                "{y:02}|{}|",
                row.iter()
                    .map(|&pixel| if pixel { '█' } else { ' ' })
                    .collect::<String>()
            );
        }
    }
}

impl Display for DisplayBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, ".{}.", "-".repeat(SCREEN_COLS))?;
        for row in &self.pixels {
            let row: String = row
                .iter()
                .map(|&pixel| if pixel { '#' } else { ' ' })
                .collect();
            writeln!(f, "|{row}|")?;
        }
        writeln!(f, "'{}'", "-".repeat(SCREEN_COLS))
    }
}
