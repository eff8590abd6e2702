// Licensed under the Apache-2.0 license

//! Subsystem reset control (RESETS block).
//!
//! Peripherals come out of power-on held in reset. Releasing one is a write
//! to RESET followed by a poll of RESET_DONE, since the release takes effect
//! some cycles later.

use crate::regs::{register, RegisterBlock};
use crate::wait::{Timeout, Wait};

register! {
    /// RESET: a set bit holds the subsystem in reset.
    Reset @ 0x00;
    pub mask, set_mask: 28, 0;
}

register! {
    /// RESET_DONE: a set bit means the subsystem is out of reset and usable.
    ResetDone @ 0x08;
    pub mask, set_mask: 28, 0;
}

/// Subsystems under control of the RESETS block, by bit position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ResetId {
    Adc = 0,
    Busctrl = 1,
    Dma = 2,
    Hstx = 3,
    I2c0 = 4,
    I2c1 = 5,
    IoBank0 = 6,
    IoQspi = 7,
    Jtag = 8,
    PadsBank0 = 9,
    PadsQspi = 10,
    Pio0 = 11,
    Pio1 = 12,
    Pio2 = 13,
    PllSys = 14,
    PllUsb = 15,
    Pwm = 16,
    Sha256 = 17,
    Spi0 = 18,
    Spi1 = 19,
    Syscfg = 20,
    Sysinfo = 21,
    Tbman = 22,
    Timer0 = 23,
    Timer1 = 24,
    Trng = 25,
    Uart0 = 26,
    Uart1 = 27,
    Usbctrl = 28,
}

impl ResetId {
    #[must_use]
    pub const fn mask(self) -> u32 {
        1 << self as u8
    }
}

/// Combined mask of several subsystems.
#[must_use]
pub fn mask_of(ids: &[ResetId]) -> u32 {
    ids.iter().fold(0, |mask, id| mask | id.mask())
}

pub struct SysCon<R: RegisterBlock> {
    resets: R,
}

impl<R: RegisterBlock> SysCon<R> {
    pub fn new(resets: R) -> Self {
        Self { resets }
    }

    pub fn reset_assert(&mut self, id: ResetId) {
        self.assert_mask(id.mask());
    }

    pub fn reset_deassert(&mut self, id: ResetId) {
        self.deassert_mask(id.mask());
    }

    #[must_use]
    pub fn is_reset_done(&self, id: ResetId) -> bool {
        self.done_mask() & id.mask() == id.mask()
    }

    /// Hold every subsystem in `mask` in reset with a single write.
    pub fn assert_mask(&mut self, mask: u32) {
        self.resets
            .modify::<Reset, _>(|w| w.set_mask(w.mask() | mask));
    }

    /// Release every subsystem in `mask` with a single write.
    pub fn deassert_mask(&mut self, mask: u32) {
        self.resets
            .modify::<Reset, _>(|w| w.set_mask(w.mask() & !mask));
    }

    #[must_use]
    pub fn done_mask(&self) -> u32 {
        self.resets.read::<ResetDone>().mask()
    }

    /// Release `mask` and poll until all of it reports done.
    ///
    /// # Errors
    ///
    /// [`Timeout`] if `wait` gives up first.
    pub fn unreset_wait<W: Wait>(&mut self, mask: u32, mut wait: W) -> Result<(), Timeout> {
        self.deassert_mask(mask);
        let resets = &self.resets;
        wait.wait_for(|| resets.read::<ResetDone>().mask() & mask == mask)
    }

    pub fn release(self) -> R {
        self.resets
    }
}
