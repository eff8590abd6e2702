// Licensed under the Apache-2.0 license

//! Software-controlled GPIO outputs through the single-cycle IO block.
//!
//! Every SIO register comes as a pair: the low word covers GPIO0..=31, the
//! word 4 bytes above it covers GPIO32..=47. They are modelled as two-entry
//! register arrays indexed by [`Pin::word`].

use crate::pinctrl::Pin;
use crate::regs::{register, RegisterBlock};
use core::convert::Infallible;
use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};

register! {
    /// GPIO_OUT / GPIO_HI_OUT: output level of SIO-owned pins.
    GpioOut @ 0x10, stride 4;
    pub pins, set_pins: 31, 0;
}

register! {
    /// GPIO_OUT_SET: write ones to drive pins high.
    GpioOutSet @ 0x18, stride 4;
    pub pins, set_pins: 31, 0;
}

register! {
    /// GPIO_OUT_CLR: write ones to drive pins low.
    GpioOutClr @ 0x20, stride 4;
    pub pins, set_pins: 31, 0;
}

register! {
    GpioOeSet @ 0x38, stride 4;
    pub pins, set_pins: 31, 0;
}

register! {
    GpioOeClr @ 0x40, stride 4;
    pub pins, set_pins: 31, 0;
}

/// One SIO output pin, borrowed from the block that drives it.
///
/// Set and clear go through the atomic alias registers so that other pins
/// in the same word are never disturbed.
pub struct SioOutput<'a, S: RegisterBlock> {
    sio: &'a mut S,
    pin: Pin,
}

impl<'a, S: RegisterBlock> SioOutput<'a, S> {
    pub fn new(sio: &'a mut S, pin: Pin) -> Self {
        Self { sio, pin }
    }

    #[must_use]
    pub fn pin(&self) -> Pin {
        self.pin
    }

    /// Stop driving the pin. Its level is kept for when it is re-enabled.
    pub fn disable(&mut self) {
        let mut oe = GpioOeClr::default();
        oe.set_pins(self.pin.mask());
        self.sio.write_at(self.pin.word(), oe);
    }
}

impl<S: RegisterBlock> ErrorType for SioOutput<'_, S> {
    type Error = Infallible;
}

impl<S: RegisterBlock> OutputPin for SioOutput<'_, S> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut clr = GpioOutClr::default();
        clr.set_pins(self.pin.mask());
        self.sio.write_at(self.pin.word(), clr);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut set = GpioOutSet::default();
        set.set_pins(self.pin.mask());
        self.sio.write_at(self.pin.word(), set);
        Ok(())
    }
}

impl<S: RegisterBlock> StatefulOutputPin for SioOutput<'_, S> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        let out = self.sio.read_at::<GpioOut>(self.pin.word());
        Ok(out.pins() & self.pin.mask() != 0)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        self.is_set_high().map(|high| !high)
    }
}
