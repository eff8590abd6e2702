// Licensed under the Apache-2.0 license

//! Register access layer.
//!
//! Every peripheral in this crate is driven through a [`RegisterBlock`]: a
//! handle onto a fixed block of 32-bit registers. Register contents are
//! modelled as typed snapshots ([`Register`]) generated with the `bitfield`
//! crate, so drivers read, write and modify named fields instead of shifting
//! raw words.
//!
//! Two kinds of block exist:
//! - [`Mmio`], a volatile view onto physical memory used on target.
//! - The software doubles in [`crate::sim`], used by off-target tests.
//!
//! `modify` is a plain read followed by a write. It is not atomic with
//! respect to any other executor; the drivers run on a single thread with no
//! interrupt handler touching these registers.

use core::ptr::{read_volatile, write_volatile};

/// RESETS block base address.
pub const RESETS_BASE: usize = 0x4002_0000;
/// IO_BANK0 (pin function select) base address.
pub const IO_BANK0_BASE: usize = 0x4002_8000;
/// PADS_BANK0 (pad electrical control) base address.
pub const PADS_BANK0_BASE: usize = 0x4003_8000;
/// I2C0 controller base address.
pub const I2C0_BASE: usize = 0x4009_0000;
/// I2C1 controller base address.
pub const I2C1_BASE: usize = 0x4009_8000;
/// Single-cycle IO block base address.
pub const SIO_BASE: usize = 0xd000_0000;

/// Typed snapshot of a single 32-bit register.
pub trait Register: Copy {
    /// Byte offset of the register inside its block.
    const OFFSET: usize;

    fn from_bits(bits: u32) -> Self;

    fn bits(self) -> u32;
}

/// Register repeated at a fixed stride, one copy per index (e.g. per pin).
pub trait ArrayRegister: Register {
    /// Distance in bytes between consecutive copies.
    const STRIDE: usize;

    #[must_use]
    fn offset_at(index: usize) -> usize {
        Self::OFFSET + index * Self::STRIDE
    }
}

/// A block of memory-mapped registers.
///
/// Implementors only provide word access; typed access is derived from it.
/// Reads may have hardware side effects (FIFO pops, clear-on-read flags),
/// which is why implementations must not cache values.
pub trait RegisterBlock {
    fn read_word(&self, offset: usize) -> u32;

    fn write_word(&mut self, offset: usize, value: u32);

    /// Snapshot the current value of `R`.
    fn read<R: Register>(&self) -> R {
        R::from_bits(self.read_word(R::OFFSET))
    }

    /// Replace the whole register with `value`.
    fn write<R: Register>(&mut self, value: R) {
        self.write_word(R::OFFSET, value.bits());
    }

    /// Read `R`, let `f` change some fields, write the result back.
    fn modify<R: Register, F: FnOnce(&mut R)>(&mut self, f: F) {
        let mut value = self.read::<R>();
        f(&mut value);
        self.write(value);
    }

    fn read_at<R: ArrayRegister>(&self, index: usize) -> R {
        R::from_bits(self.read_word(R::offset_at(index)))
    }

    fn write_at<R: ArrayRegister>(&mut self, index: usize, value: R) {
        self.write_word(R::offset_at(index), value.bits());
    }

    fn modify_at<R: ArrayRegister, F: FnOnce(&mut R)>(&mut self, index: usize, f: F) {
        let mut value = self.read_at::<R>(index);
        f(&mut value);
        self.write_at(index, value);
    }
}

impl<B: RegisterBlock + ?Sized> RegisterBlock for &mut B {
    fn read_word(&self, offset: usize) -> u32 {
        (**self).read_word(offset)
    }

    fn write_word(&mut self, offset: usize, value: u32) {
        (**self).write_word(offset, value);
    }
}

/// Volatile register block at a fixed physical address.
#[derive(Debug)]
pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// # Safety
    ///
    /// `base` must be the address of a peripheral register block on the
    /// running device. Several `Mmio` handles may alias the same block; the
    /// caller is responsible for not using them from concurrent contexts.
    #[must_use]
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    #[must_use]
    pub const fn base(&self) -> usize {
        self.base
    }
}

impl RegisterBlock for Mmio {
    fn read_word(&self, offset: usize) -> u32 {
        // SAFETY: `base` is a valid register block per `Mmio::new`.
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    fn write_word(&mut self, offset: usize, value: u32) {
        // SAFETY: `base` is a valid register block per `Mmio::new`.
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }
}

/// Declare a `bitfield` register snapshot bound to an offset (and stride).
macro_rules! register {
    (
        $(#[$meta:meta])*
        $name:ident @ $offset:expr $(, stride $stride:expr)?;
        $($fields:tt)*
    ) => {
        bitfield::bitfield! {
            $(#[$meta])*
            #[derive(Clone, Copy, PartialEq, Eq, Default)]
            pub struct $name(u32);
            impl Debug;
            $($fields)*
        }

        impl $crate::regs::Register for $name {
            const OFFSET: usize = $offset;

            fn from_bits(bits: u32) -> Self {
                Self(bits)
            }

            fn bits(self) -> u32 {
                self.0
            }
        }

        $(
            impl $crate::regs::ArrayRegister for $name {
                const STRIDE: usize = $stride;
            }
        )?
    };
}

pub(crate) use register;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimMemory;

    register! {
        Scratch @ 0x08;
        pub low, set_low: 7, 0;
        pub flag, set_flag: 8;
    }

    register! {
        Lane @ 0x10, stride 4;
        pub value, set_value: 15, 0;
    }

    #[test]
    fn modify_only_changes_touched_fields() {
        let mut block = SimMemory::<16>::new();
        block.poke(0x08, 0xdead_0042);

        block.modify::<Scratch, _>(|r| r.set_flag(true));

        let r = block.read::<Scratch>();
        assert!(r.flag());
        assert_eq!(r.low(), 0x42);
        assert_eq!(block.peek(0x08), 0xdead_0142);
    }

    #[test]
    fn write_replaces_whole_register() {
        let mut block = SimMemory::<16>::new();
        block.poke(0x08, 0xffff_ffff);

        let mut r = Scratch::default();
        r.set_low(0x11);
        block.write(r);

        assert_eq!(block.peek(0x08), 0x11);
    }

    #[test]
    fn indexed_access_uses_stride() {
        let mut block = SimMemory::<16>::new();

        block.modify_at::<Lane, _>(3, |r| r.set_value(0xbeef));

        assert_eq!(Lane::offset_at(3), 0x1c);
        assert_eq!(block.peek(0x1c), 0xbeef);
        assert_eq!(block.read_at::<Lane>(3).value(), 0xbeef);
        assert_eq!(block.read_at::<Lane>(2).value(), 0);
    }

    #[test]
    fn borrowed_block_is_a_block() {
        fn touch(mut block: impl RegisterBlock) {
            block.write_word(0x04, 7);
        }

        let mut block = SimMemory::<16>::new();
        touch(&mut block);
        assert_eq!(block.peek(0x04), 7);
    }
}
