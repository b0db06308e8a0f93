// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Exercises run-time hooking of the [OpcodeTable]
use super::*;
use crate::cpu::table::{Handler, Hook};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

fn counter() -> (Arc<AtomicUsize>, impl Handler) {
    let count = Arc::new(AtomicUsize::new(0));
    let handle = count.clone();
    (count, move |_: &mut MachineState, _: u16| -> Result<()> {
        handle.fetch_add(1, Ordering::Relaxed);
        Ok(())
    })
}

#[test]
fn replace() {
    let (mut table, mut state) = (OpcodeTable::new(), MachineState::new());
    let (count, handler) = counter();
    table.hook(Key::K6xkk, handler);
    assert!(table.is_hooked(Key::K6xkk));

    table.execute(&mut state, 0x6012).unwrap();
    assert_eq!(1, count.load(Ordering::Relaxed));
    // the base handler didn't run
    assert_eq!(0, state.v()[0]);
}

#[test]
fn unhook_restores_base() {
    let (mut table, mut state) = (OpcodeTable::new(), MachineState::new());
    let (count, handler) = counter();
    table.hook(Key::K6xkk, handler);
    assert!(matches!(table.unhook(Key::K6xkk), Some(Hook::Replace(_))));
    assert!(!table.is_hooked(Key::K6xkk));
    assert!(table.unhook(Key::K6xkk).is_none());

    table.execute(&mut state, 0x6012).unwrap();
    assert_eq!(0, count.load(Ordering::Relaxed));
    assert_eq!(0x12, state.v()[0]);
}

#[test]
fn rehook_overwrites() {
    let (mut table, mut state) = (OpcodeTable::new(), MachineState::new());
    let (first, handler) = counter();
    table.pre_hook(Key::K7xkk, handler);
    let (second, handler) = counter();
    table.post_hook(Key::K7xkk, handler);

    table.execute(&mut state, 0x7001).unwrap();
    assert_eq!(0, first.load(Ordering::Relaxed));
    assert_eq!(1, second.load(Ordering::Relaxed));
    assert_eq!(1, state.v()[0]);

    // a single unhook gets back to the base handler
    table.unhook(Key::K7xkk);
    assert!(!table.is_hooked(Key::K7xkk));
}

#[test]
fn pre_hook_sees_state_before() {
    let (mut table, mut state) = (OpcodeTable::new(), MachineState::new());
    let seen = Arc::new(AtomicUsize::new(usize::MAX));
    let handle = seen.clone();
    table.pre_hook(Key::K6xkk, move |state: &mut MachineState, word: u16| -> Result<()> {
        handle.store(state.v()[word.x()] as usize, Ordering::Relaxed);
        Ok(())
    });
    table.execute(&mut state, 0x6a42).unwrap();
    assert_eq!(0, seen.load(Ordering::Relaxed));
    assert_eq!(0x42, state.v()[0xa]);
}

#[test]
fn post_hook_sees_state_after() {
    let (mut table, mut state) = (OpcodeTable::new(), MachineState::new());
    let seen = Arc::new(AtomicUsize::new(usize::MAX));
    let handle = seen.clone();
    table.post_hook(Key::K6xkk, move |state: &mut MachineState, word: u16| -> Result<()> {
        handle.store(state.v()[word.x()] as usize, Ordering::Relaxed);
        Ok(())
    });
    table.execute(&mut state, 0x6a42).unwrap();
    assert_eq!(0x42, seen.load(Ordering::Relaxed));
}

/// A failing pre-hook stops the base handler from running
#[test]
fn pre_hook_breakpoint() {
    let (mut table, mut state) = (OpcodeTable::new(), MachineState::new());
    table.pre_hook(Key::K1nnn, |state: &mut MachineState, word: u16| -> Result<()> {
        Err(Error::BreakpointHit {
            addr: state.pc(),
            word,
        })
    });
    assert!(matches!(
        table.execute(&mut state, 0x1234),
        Err(Error::BreakpointHit { addr: 0x200, word: 0x1234 })
    ));
    assert_eq!(0x200, state.pc());
}

/// A failing base handler stops the post-hook from running
#[test]
fn post_hook_skipped_on_error() {
    let (mut table, mut state) = (OpcodeTable::new(), MachineState::new());
    let (count, handler) = counter();
    table.post_hook(Key::K00EE, handler);
    table.execute(&mut state, 0x00ee).unwrap_err();
    assert_eq!(0, count.load(Ordering::Relaxed));
}

/// Hooks installed through the CPU are used by [CPU::step]
#[test]
fn cpu_uses_hooks() {
    let (mut cpu, mut state) = setup_environment();
    let (count, handler) = counter();
    cpu.opcodes_mut().post_hook(Key::K1nnn, handler);
    for _ in 0..9 {
        cpu.step(&mut state).unwrap();
    }
    // one cls, then eight jumps
    assert_eq!(8, count.load(Ordering::Relaxed));
    assert!(cpu.opcodes().is_hooked(Key::K1nnn));
}

#[test]
fn hook_by_name() {
    let mut table = OpcodeTable::new();
    let (_, handler) = counter();
    table.hook("fx0a".parse().unwrap(), handler);
    assert!(table.is_hooked(Key::KFx0A));
    table.unhook_all();
    assert!(Key::ALL.iter().all(|&key| !table.is_hooked(key)));
}
