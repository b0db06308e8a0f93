// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Tests for the sprite blitter's clipping, collision and change tracking

use super::*;
use rand::random;

fn lit(display: &DisplayBuffer) -> usize {
    display.pixels().iter().flatten().filter(|&&pixel| pixel).count()
}

#[test]
fn draw_msb_first() {
    let mut display = DisplayBuffer::new();
    display.draw_sprite(8, 3, &[0b1010_0001]);
    let row: Vec<bool> = (8..16).map(|x| display.pixel(x, 3)).collect();
    assert_eq!(
        vec![true, false, true, false, false, false, false, true],
        row
    );
    assert_eq!(3, lit(&display));
}

#[test]
fn clip_right_edge() {
    let mut display = DisplayBuffer::new();
    assert!(!display.draw_sprite(60, 0, &[0xff]));
    // only 4 of 8 pixels fit, and none wrap around to the left
    assert_eq!(4, lit(&display));
    assert!((60..64).all(|x| display.pixel(x, 0)));
    assert!((0..4).all(|x| !display.pixel(x, 0)));
}

#[test]
fn clip_bottom_edge() {
    let mut display = DisplayBuffer::new();
    display.draw_sprite(0, 30, &[0x80; 5]);
    assert_eq!(2, lit(&display));
    assert!(display.pixel(0, 31));
    assert!(!display.pixel(0, 0));
}

#[test]
fn offscreen_draws_nothing() {
    let mut display = DisplayBuffer::new();
    assert!(!display.draw_sprite(SCREEN_COLS, 0, &[0xff]));
    assert!(!display.draw_sprite(0, SCREEN_ROWS, &[0xff]));
    assert!(!display.any());
    assert!(!display.has_changed());
}

/// Collision is reported iff a lit pixel is erased
#[test]
fn collision_iff_erased() {
    for _ in 0..0x100 {
        let (a, b): (u8, u8) = (random(), random());
        let (x, y) = (random::<usize>() % SCREEN_COLS, random::<usize>() % SCREEN_ROWS);
        let mut display = DisplayBuffer::new();
        display.draw_sprite(x, y, &[a]);
        let collision = display.draw_sprite(x, y, &[b]);
        // only the pixels that survive clipping can collide
        let visible = 0xffu8 << (8 - (SCREEN_COLS - x).min(8));
        assert_eq!(a & b & visible != 0, collision, "{a:08b} {b:08b} at ({x}, {y})");
        // and what's left is the XOR of both
        let expected = (0..8).filter(|bit| (a ^ b) & visible & (0x80 >> bit) != 0).count();
        assert_eq!(expected, lit(&display));
    }
}

#[test]
fn change_flag() {
    let mut display = DisplayBuffer::new();
    // a sprite with no lit pixels changes nothing
    display.draw_sprite(0, 0, &[0, 0]);
    assert!(!display.has_changed());

    display.draw_sprite(0, 0, &[0x80]);
    assert!(display.is_changed());
    assert!(display.has_changed());
    // reading the flag clears it
    assert!(!display.has_changed());
}

#[test]
fn clear() {
    let mut display = DisplayBuffer::new();
    display.draw_sprite(5, 5, &[0xff; 4]);
    display.has_changed();

    display.clear();
    assert!(!display.any());
    assert!(display.has_changed());
    assert!(!display.has_changed());

    // clearing a blank screen is not a change
    display.clear();
    assert!(!display.has_changed());
}

/// A change that was undone before the clear isn't reported
#[test]
fn clear_blank_forgets_change() {
    let mut display = DisplayBuffer::new();
    display.draw_sprite(0, 0, &[0x80]);
    display.draw_sprite(0, 0, &[0x80]);
    assert!(!display.any());
    assert!(display.is_changed());

    display.clear();
    assert!(!display.has_changed());
}

#[test]
fn buffer_is_a_copy() {
    let mut display = DisplayBuffer::new();
    let before = display.buffer();
    display.draw_sprite(0, 0, &[0x80]);
    assert!(!before[0][0]);
    assert!(display.buffer()[0][0]);
}

#[test]
fn display() {
    let mut display = DisplayBuffer::new();
    display.draw_sprite(0, 0, &[0xc0]);
    let text = display.to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(SCREEN_ROWS + 2, lines.len());
    assert!(lines[1].starts_with("|## "));
    assert_eq!(SCREEN_COLS + 2, lines[1].len());
}
