// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Contains the base implementation of each Chip-8 instruction

use super::decode::{Key, Operands};
use crate::{
    error::{Error, Result},
    layout::{FONT_GLYPH_SIZE, FONT_OFFSET, INSTRUCTION_SIZE},
    state::MachineState,
};
use rand::random;

/// Signature shared by every base instruction
pub type Base = fn(&mut MachineState, u16) -> Result<()>;

/// Gets the base implementation of the instruction named by `key`
#[rustfmt::skip]
pub fn base(key: Key) -> Base {
    match key {
        Key::K00E0 => MachineState::clear_screen,
        Key::K00EE => MachineState::ret,
        Key::K0nnn => MachineState::sys,
        Key::K1nnn => MachineState::jump,
        Key::K2nnn => MachineState::call,
        Key::K3xkk => MachineState::skip_equals_immediate,
        Key::K4xkk => MachineState::skip_not_equals_immediate,
        Key::K5xy0 => MachineState::skip_equals,
        Key::K6xkk => MachineState::load_immediate,
        Key::K7xkk => MachineState::add_immediate,
        Key::K8xy0 => MachineState::load,
        Key::K8xy1 => MachineState::or,
        Key::K8xy2 => MachineState::and,
        Key::K8xy3 => MachineState::xor,
        Key::K8xy4 => MachineState::add,
        Key::K8xy5 => MachineState::sub,
        Key::K8xy6 => MachineState::shift_right,
        Key::K8xy7 => MachineState::backwards_sub,
        Key::K8xyE => MachineState::shift_left,
        Key::K9xy0 => MachineState::skip_not_equals,
        Key::KAnnn => MachineState::load_i_immediate,
        Key::KBnnn => MachineState::jump_indexed,
        Key::KCxkk => MachineState::rand,
        Key::KDxyn => MachineState::draw,
        Key::KEx9E => MachineState::skip_key_equals,
        Key::KExA1 => MachineState::skip_key_not_equals,
        Key::KFx07 => MachineState::load_delay_timer,
        Key::KFx0A => MachineState::wait_for_key,
        Key::KFx15 => MachineState::store_delay_timer,
        Key::KFx18 => MachineState::store_sound_timer,
        Key::KFx1E => MachineState::add_i,
        Key::KFx29 => MachineState::load_sprite,
        Key::KFx33 => MachineState::bcd_convert,
        Key::KFx55 => MachineState::store_dma,
        Key::KFx65 => MachineState::load_dma,
    }
}

impl MachineState {
    /// Advances the program counter past the next instruction
    #[inline(always)]
    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc = self.pc.wrapping_add(INSTRUCTION_SIZE);
        }
    }
}

/// |`0nnn`| Issues a "System call" (ML routine)
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`00e0`| Clear screen memory to all 0       |
/// |`00ee`| Return from subroutine             |
impl MachineState {
    /// |`00e0`| Clears the screen
    pub(crate) fn clear_screen(&mut self, _: u16) -> Result<()> {
        self.display.clear();
        Ok(())
    }
    /// |`00ee`| Returns from subroutine
    pub(crate) fn ret(&mut self, _: u16) -> Result<()> {
        self.pc = self.pop()?;
        Ok(())
    }
    /// |`0nnn`| Machine language routines aren't supported, so this does nothing
    pub(crate) fn sys(&mut self, _: u16) -> Result<()> {
        Ok(())
    }
}

/// |`1nnn`| Sets pc to an absolute address
///
/// |`2nnn`| Pushes pc onto the stack, then jumps to nnn
impl MachineState {
    /// |`1nnn`| Sets the program counter to an absolute address
    pub(crate) fn jump(&mut self, word: u16) -> Result<()> {
        self.pc = word.nnn();
        Ok(())
    }
    /// |`2nnn`| Pushes pc onto the stack, then jumps to nnn
    ///
    /// Fails with [Error::StackOverflow] if the stack is full
    pub(crate) fn call(&mut self, word: u16) -> Result<()> {
        self.push(self.pc)?;
        self.pc = word.nnn();
        Ok(())
    }
}

/// |`3xkk`, `4xkk`, `5xy0`, `9xy0`| Conditional skips
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`3xkk`| Skip next instruction if vX == kk  |
/// |`4xkk`| Skip next instruction if vX != kk  |
/// |`5xy0`| Skip next instruction if vX == vY  |
/// |`9xy0`| Skip next instruction if vX != vY  |
impl MachineState {
    /// |`3xkk`| Skips the next instruction if register X == kk
    pub(crate) fn skip_equals_immediate(&mut self, word: u16) -> Result<()> {
        self.skip_if(self.v[word.x()] == word.kk());
        Ok(())
    }
    /// |`4xkk`| Skips the next instruction if register X != kk
    pub(crate) fn skip_not_equals_immediate(&mut self, word: u16) -> Result<()> {
        self.skip_if(self.v[word.x()] != word.kk());
        Ok(())
    }
    /// |`5xy0`| Skips the next instruction if register X == register Y
    pub(crate) fn skip_equals(&mut self, word: u16) -> Result<()> {
        self.skip_if(self.v[word.x()] == self.v[word.y()]);
        Ok(())
    }
    /// |`9xy0`| Skips the next instruction if register X != register Y
    pub(crate) fn skip_not_equals(&mut self, word: u16) -> Result<()> {
        self.skip_if(self.v[word.x()] != self.v[word.y()]);
        Ok(())
    }
}

/// |`6xkk`| Loads immediate byte kk into register vX
///
/// |`7xkk`| Adds immediate byte kk to register vX
impl MachineState {
    /// |`6xkk`| Loads immediate byte kk into register vX
    pub(crate) fn load_immediate(&mut self, word: u16) -> Result<()> {
        self.v[word.x()] = word.kk();
        Ok(())
    }
    /// |`7xkk`| Adds immediate byte kk to register vX. vF is untouched.
    pub(crate) fn add_immediate(&mut self, word: u16) -> Result<()> {
        let x = word.x();
        self.v[x] = self.v[x].wrapping_add(word.kk());
        Ok(())
    }
}

/// |`8xyn`| Performs ALU operation
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`8xy0`| X = Y                              |
/// |`8xy1`| X = X | Y                          |
/// |`8xy2`| X = X & Y                          |
/// |`8xy3`| X = X ^ Y                          |
/// |`8xy4`| X = X + Y; Set vF=carry            |
/// |`8xy5`| X = X - Y; Set vF=!borrow          |
/// |`8xy6`| X = X >> 1; Set vF=shifted bit     |
/// |`8xy7`| Y = Y - X; Set vF=!borrow          |
/// |`8xyE`| X = X << 1; Set vF=shifted bit     |
///
/// Every flag is computed from the operands, and written after the result.
impl MachineState {
    /// |`8xy0`| Loads the value of y into x
    pub(crate) fn load(&mut self, word: u16) -> Result<()> {
        self.v[word.x()] = self.v[word.y()];
        Ok(())
    }
    /// |`8xy1`| Performs bitwise or of vX and vY, and stores the result in vX
    pub(crate) fn or(&mut self, word: u16) -> Result<()> {
        self.v[word.x()] |= self.v[word.y()];
        Ok(())
    }
    /// |`8xy2`| Performs bitwise and of vX and vY, and stores the result in vX
    pub(crate) fn and(&mut self, word: u16) -> Result<()> {
        self.v[word.x()] &= self.v[word.y()];
        Ok(())
    }
    /// |`8xy3`| Performs bitwise xor of vX and vY, and stores the result in vX
    pub(crate) fn xor(&mut self, word: u16) -> Result<()> {
        self.v[word.x()] ^= self.v[word.y()];
        Ok(())
    }
    /// |`8xy4`| Performs addition of vX and vY, and stores the result in vX
    pub(crate) fn add(&mut self, word: u16) -> Result<()> {
        let (x, y) = (word.x(), word.y());
        let carry;
        (self.v[x], carry) = self.v[x].overflowing_add(self.v[y]);
        self.v[0xf] = carry.into();
        Ok(())
    }
    /// |`8xy5`| Performs subtraction of vX and vY, and stores the result in vX
    pub(crate) fn sub(&mut self, word: u16) -> Result<()> {
        let (x, y) = (word.x(), word.y());
        let borrow;
        (self.v[x], borrow) = self.v[x].overflowing_sub(self.v[y]);
        self.v[0xf] = (!borrow).into();
        Ok(())
    }
    /// |`8xy6`| Performs bitwise right shift of vX
    pub(crate) fn shift_right(&mut self, word: u16) -> Result<()> {
        let x = word.x();
        let shift_out = self.v[x] & 1;
        self.v[x] >>= 1;
        self.v[0xf] = shift_out;
        Ok(())
    }
    /// |`8xy7`| Performs subtraction of vX from vY, and stores the result in **vY**
    pub(crate) fn backwards_sub(&mut self, word: u16) -> Result<()> {
        let (x, y) = (word.x(), word.y());
        let borrow;
        (self.v[y], borrow) = self.v[y].overflowing_sub(self.v[x]);
        self.v[0xf] = (!borrow).into();
        Ok(())
    }
    /// |`8xyE`| Performs bitwise left shift of vX
    pub(crate) fn shift_left(&mut self, word: u16) -> Result<()> {
        let x = word.x();
        let shift_out = self.v[x] >> 7;
        self.v[x] <<= 1;
        self.v[0xf] = shift_out;
        Ok(())
    }
}

/// |`Annn`| Load address nnn into register I
///
/// |`Bnnn`| Jump to nnn + v0
impl MachineState {
    /// |`Annn`| Load address nnn into register I
    pub(crate) fn load_i_immediate(&mut self, word: u16) -> Result<()> {
        self.i = word.nnn();
        Ok(())
    }
    /// |`Bnnn`| Jump to nnn + v0
    pub(crate) fn jump_indexed(&mut self, word: u16) -> Result<()> {
        self.pc = word.nnn().wrapping_add(self.v[0] as u16);
        Ok(())
    }
}

/// |`Cxkk`| Stores a random number & the provided byte into vX
impl MachineState {
    /// |`Cxkk`| Stores a random number & the provided byte into vX
    pub(crate) fn rand(&mut self, word: u16) -> Result<()> {
        self.v[word.x()] = random::<u8>() & word.kk();
        Ok(())
    }
}

/// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
impl MachineState {
    /// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY),
    /// and sets vF if any lit pixel was erased.
    ///
    /// Fails with [Error::OutOfBounds] if the sprite runs past the end of memory
    pub(crate) fn draw(&mut self, word: u16) -> Result<()> {
        let (x, y) = (self.v[word.x()] as usize, self.v[word.y()] as usize);
        let (addr, len) = (self.i as usize, word.n() as usize);
        let sprite = self
            .memory
            .get(addr..addr + len)
            .ok_or(Error::OutOfBounds { addr, len })?;
        let collision = self.display.draw_sprite(x, y, sprite);
        self.v[0xf] = collision.into();
        Ok(())
    }
}

/// |`Exkk`| Skips instruction on value of keypress
///
/// |opcode| effect                                  |
/// |------|-----------------------------------------|
/// |`eX9e`| Skip next instruction if key vX is down |
/// |`eXa1`| Skip next instruction if key vX is up   |
impl MachineState {
    /// |`Ex9E`| Skip next instruction if key vX is down
    ///
    /// Fails with [Error::InvalidKey] if vX isn't a key
    pub(crate) fn skip_key_equals(&mut self, word: u16) -> Result<()> {
        let pressed = self.key(self.v[word.x()] as usize)?;
        self.skip_if(pressed);
        Ok(())
    }
    /// |`ExA1`| Skip next instruction if key vX is up
    ///
    /// Fails with [Error::InvalidKey] if vX isn't a key
    pub(crate) fn skip_key_not_equals(&mut self, word: u16) -> Result<()> {
        let pressed = self.key(self.v[word.x()] as usize)?;
        self.skip_if(!pressed);
        Ok(())
    }
}

/// |`Fxkk`| Performs IO
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`fX07`| Set vX to value in delay timer     |
/// |`fX0a`| Wait for input, store key in vX    |
/// |`fX15`| Set delay timer to the value in vX |
/// |`fX18`| Set sound timer to the value in vX |
/// |`fX1e`| Add vX to I                        |
/// |`fX29`| Load sprite for character x into I |
/// |`fX33`| BCD convert X into I[0..3]         |
/// |`fX55`| DMA Stor from I to registers 0..=X |
/// |`fX65`| DMA Load from I to registers 0..=X |
impl MachineState {
    /// |`Fx07`| Get the current DT, and put it in vX
    /// ```py
    /// vX = DT
    /// ```
    pub(crate) fn load_delay_timer(&mut self, word: u16) -> Result<()> {
        self.v[word.x()] = self.delay;
        Ok(())
    }
    /// |`Fx0A`| Wait for key, then vX = K
    ///
    /// Takes the lowest pressed key. With no key pressed, rewinds pc so
    /// this instruction runs again on the next step.
    pub(crate) fn wait_for_key(&mut self, word: u16) -> Result<()> {
        match self.keyboard.iter().position(|&key| key) {
            Some(key) => self.v[word.x()] = key as u8,
            None => self.pc = self.pc.wrapping_sub(INSTRUCTION_SIZE),
        }
        Ok(())
    }
    /// |`Fx15`| Load vX into DT
    /// ```py
    /// DT = vX
    /// ```
    pub(crate) fn store_delay_timer(&mut self, word: u16) -> Result<()> {
        self.delay = self.v[word.x()];
        Ok(())
    }
    /// |`Fx18`| Load vX into ST
    /// ```py
    /// ST = vX;
    /// ```
    pub(crate) fn store_sound_timer(&mut self, word: u16) -> Result<()> {
        self.set_sound(self.v[word.x()]);
        Ok(())
    }
    /// |`Fx1e`| Add vX to I, setting vF on 16-bit overflow
    /// ```py
    /// I += vX;
    /// ```
    pub(crate) fn add_i(&mut self, word: u16) -> Result<()> {
        let carry;
        (self.i, carry) = self.i.overflowing_add(self.v[word.x()] as u16);
        self.v[0xf] = carry.into();
        Ok(())
    }
    /// |`Fx29`| Load sprite for character x into I
    /// ```py
    /// I = sprite(X);
    /// ```
    pub(crate) fn load_sprite(&mut self, word: u16) -> Result<()> {
        self.i = FONT_OFFSET.wrapping_add(FONT_GLYPH_SIZE.wrapping_mul(self.v[word.x()] as u16));
        Ok(())
    }
    /// |`Fx33`| BCD convert X into I`[0..3]`
    ///
    /// Fails with [Error::OutOfBounds] if I`[0..3]` runs past the end of memory
    pub(crate) fn bcd_convert(&mut self, word: u16) -> Result<()> {
        let x = self.v[word.x()];
        self.write(self.i as usize, &[x / 100, x / 10 % 10, x % 10])
    }
    /// |`Fx55`| DMA Stor from I to registers 0..=X
    ///
    /// I is left unchanged.
    /// Fails with [Error::OutOfBounds] if I`[0..=X]` runs past the end of memory
    pub(crate) fn store_dma(&mut self, word: u16) -> Result<()> {
        let x = word.x();
        let registers = self.v;
        self.write(self.i as usize, &registers[..=x])
    }
    /// |`Fx65`| DMA Load from I to registers 0..=X
    ///
    /// I is left unchanged.
    /// Fails with [Error::OutOfBounds] if I`[0..=X]` runs past the end of memory
    pub(crate) fn load_dma(&mut self, word: u16) -> Result<()> {
        let x = word.x();
        let mut registers = [0; 16];
        registers[..=x].copy_from_slice(self.read(self.i as usize, x + 1)?);
        self.v[..=x].copy_from_slice(&registers[..=x]);
        Ok(())
    }
}
