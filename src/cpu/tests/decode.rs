// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Exercises the instruction decode logic.
use super::*;

const INDX: &[u8; 16] = b"\0\x01\x02\x03\x04\x05\x06\x07\x08\x09\x0a\x0b\x0c\x0d\x0e\x0f";

/// runs one arbitrary operation on a brand new machine
/// returns the machine for inspection
fn run_single_op(op: &[u8]) -> MachineState {
    let (mut cpu, mut state) = (CPU::new(), MachineState::new());
    state.load_rom(op).unwrap();
    for (reg, &value) in INDX.iter().enumerate() {
        state.set_v(reg, value).unwrap();
    }
    cpu.step(&mut state).unwrap(); // will panic on error
    state
}

/// Every word decodes to at most one key, and every key's canonical
/// pattern is matched by at least one word
#[test]
fn exhaustive() {
    let mut seen = [0usize; Key::COUNT];
    for word in 0..=u16::MAX {
        if let Ok(key) = Key::decode(word) {
            seen[key as usize] += 1;
            // the high nibble always agrees with the canonical name
            let high = key.name().chars().next().unwrap().to_digit(16).unwrap();
            assert_eq!(high as u8, word.nibbles().0, "{word:04x} decoded as {key}");
        }
    }
    assert!(seen.iter().all(|&count| count > 0));
    // 1nnn, 2nnn, ... each cover all 4096 words
    assert_eq!(0x1000, seen[Key::K1nnn as usize]);
    assert_eq!(0x1000, seen[Key::KDxyn as usize]);
    // 00E0 and 00EE ignore n3; 0nnn covers the rest of 0x0100..=0x0fff
    assert_eq!(0x10, seen[Key::K00E0 as usize]);
    assert_eq!(0x0f00, seen[Key::K0nnn as usize]);
}

/// Unknown words carry the raw value back
#[test]
fn unknown_carries_word() {
    for word in [0x0001u16, 0x800f, 0xe0ff, 0xf0ff, 0xf014] {
        assert!(matches!(
            Key::decode(word),
            Err(Error::UnknownOpcode { word: w }) if w == word
        ));
    }
}

/// Key names round-trip through Display and FromStr
#[test]
fn names() {
    for key in Key::ALL {
        assert_eq!(key, key.to_string().parse::<Key>().unwrap());
        assert_eq!(key, key.name().to_lowercase().parse::<Key>().unwrap());
    }
    assert!(matches!(
        "8xyF".parse::<Key>(),
        Err(Error::InvalidKeyName { .. })
    ));
}

#[test]
fn operands() {
    let word = 0xd2a5u16;
    assert_eq!((0xd, 0x2, 0xa, 0x5), word.nibbles());
    assert_eq!((0x2, 0xa, 0x5), (word.x(), word.y(), word.n()));
    assert_eq!((0xa5, 0x2a5), (word.kk(), word.nnn()));
}

#[rustfmt::skip]
mod sys {
    use super::*;
    #[test] fn cls()   { run_single_op(b"\x00\xe0"); }
    #[test] #[should_panic] fn ret() { run_single_op(b"\x00\xee"); }
    #[test] fn sys()   { assert_eq!(0x202, run_single_op(b"\x04\x20").pc()); }
}
#[rustfmt::skip]
mod jump {
    use super::*;
    #[test] fn aligned()   { assert_eq!(0x230, run_single_op(b"\x12\x30").pc()); }
    #[test] fn unaligned() { assert_eq!(0x231, run_single_op(b"\x12\x31").pc()); }
}
#[rustfmt::skip]
mod call {
    use super::*;
    #[test] fn aligned()   { assert_eq!(0x230, run_single_op(b"\x22\x30").pc()); }
    #[test] fn unaligned() { assert_eq!(0x231, run_single_op(b"\x22\x31").pc()); }
}
#[rustfmt::skip]
mod skeb {
    use super::*;
    #[test] fn skip()    { assert_eq!(0x204, run_single_op(b"\x30\x00").pc()); }
    #[test] fn no_skip() { assert_eq!(0x202, run_single_op(b"\x30\x01").pc()); }
}
#[rustfmt::skip]
mod sneb {
    use super::*;
    #[test] fn skip()    { assert_eq!(0x204, run_single_op(b"\x40\x01").pc()); }
    #[test] fn no_skip() { assert_eq!(0x202, run_single_op(b"\x40\x00").pc()); }
}
#[rustfmt::skip]
mod se {
    use super::*;
    #[test] fn skip()    { assert_eq!(0x204, run_single_op(b"\x50\x00").pc()); }
    #[test] fn no_skip() { assert_eq!(0x202, run_single_op(b"\x50\x10").pc()); }
    #[test] fn lenient() { assert_eq!(0x204, run_single_op(b"\x50\x0f").pc()); }
}
#[rustfmt::skip]
mod sne {
    use super::*;
    #[test] fn skip()    { assert_eq!(0x204, run_single_op(b"\x90\x10").pc()); }
    #[test] fn no_skip() { assert_eq!(0x202, run_single_op(b"\x90\x00").pc()); }
}
#[rustfmt::skip]
mod movb {
    use super::*;
    #[test] fn load()    { assert_eq!(0xa5, run_single_op(b"\x6a\xa5").v()[0xa]); }
    #[test] fn add()     { assert_eq!(0xb5, run_single_op(b"\x7b\xaa").v()[0xb]); }
    #[test] fn wrap()    { assert_eq!(0x0a, run_single_op(b"\x7b\xff").v()[0xb]); }
}
#[rustfmt::skip]
mod alu {
    use super::*;
    #[test] fn mov()  { assert_eq!(0x3, run_single_op(b"\x81\x30").v()[1]); }
    #[test] fn or()   { assert_eq!(0x7, run_single_op(b"\x85\x21").v()[5]); }
    #[test] fn and()  { assert_eq!(0x2, run_single_op(b"\x86\x32").v()[6]); }
    #[test] fn xor()  { assert_eq!(0x5, run_single_op(b"\x86\x33").v()[6]); }
    #[test] fn add()  { assert_eq!(0x9, run_single_op(b"\x84\x54").v()[4]); }
    #[test] fn sub()  { assert_eq!(0x3, run_single_op(b"\x85\x25").v()[5]); }
    #[test] fn shr()  { assert_eq!(0x2, run_single_op(b"\x85\x06").v()[5]); }
    #[test] fn bsub() { assert_eq!(0x2, run_single_op(b"\x83\x57").v()[5]); }
    #[test] fn shl()  { assert_eq!(0xa, run_single_op(b"\x85\x0e").v()[5]); }
    #[test] fn invalid() { assert_eq!(0x202, run_single_op(b"\x80\x08").pc()); }
}
#[rustfmt::skip]
mod i {
    use super::*;
    #[test] fn mov()   { assert_eq!(0x123, run_single_op(b"\xa1\x23").i()); }
    #[test] fn jumpi() { assert_eq!(0x123, run_single_op(b"\xb1\x23").pc()); }
    #[test] fn addi()  { assert_eq!(0x00c, run_single_op(b"\xfc\x1e").i()); }
    #[test] fn font()  { assert_eq!(0x050 + 5 * 0xc, run_single_op(b"\xfc\x29").i()); }
}
#[rustfmt::skip]
mod io {
    use super::*;
    #[test] fn rand() { assert_eq!(0, run_single_op(b"\xc5\x00").v()[5]); }
    #[test] fn drw()  { assert!(!run_single_op(b"\xd0\x15").display().any()); }
    #[test] fn skp()  { assert_eq!(0x202, run_single_op(b"\xef\x9e").pc()); }
    #[test] fn sknp() { assert_eq!(0x204, run_single_op(b"\xe5\xa1").pc()); }
    #[test] fn dt()   { assert_eq!(0x7, run_single_op(b"\xf7\x15").delay()); }
    #[test] fn st()   { assert!(run_single_op(b"\xf7\x18").buzzer()); }
    #[test] fn wait() { assert_eq!(0x200, run_single_op(b"\xf0\x0a").pc()); }
    #[test] fn bcd()  { assert_eq!(&[0, 0, 9], run_single_op(b"\xf9\x33").read(0, 3).unwrap()); }
}
