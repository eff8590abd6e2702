// Licensed under the Apache-2.0 license

//! Pad and pin-mux configuration for bank 0 GPIOs.
//!
//! A pin is usable only once three things agree: the pad's electrical
//! settings (PADS_BANK0), the function routed to it (IO_BANK0 FUNCSEL) and
//! the pad isolation latch, which overrides everything else while set.
//! Isolation is therefore always cleared last.

use crate::gpio::{GpioOeSet, SioOutput};
use crate::regs::{register, RegisterBlock};

register! {
    /// PADS_BANK0 GPIOn.
    PadsGpio @ 0x04, stride 4;
    pub slewfast, set_slewfast: 0;
    pub schmitt, set_schmitt: 1;
    /// Pull-down enable.
    pub pde, set_pde: 2;
    /// Pull-up enable.
    pub pue, set_pue: 3;
    pub drive, set_drive: 5, 4;
    /// Input enable.
    pub ie, set_ie: 6;
    /// Output disable.
    pub od, set_od: 7;
    /// Pad isolation.
    pub iso, set_iso: 8;
}

register! {
    /// IO_BANK0 GPIOn_CTRL.
    GpioCtrl @ 0x04, stride 8;
    pub funcsel, set_funcsel: 4, 0;
    pub outover, set_outover: 13, 12;
    pub oeover, set_oeover: 15, 14;
    pub inover, set_inover: 17, 16;
    pub irqover, set_irqover: 29, 28;
}

/// A bank 0 GPIO.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pin(u8);

impl Pin {
    /// Highest GPIO number on the largest RP2350 package.
    pub const MAX: u8 = 47;

    /// Compile-time checked constructor for board constants.
    ///
    /// # Panics
    ///
    /// If `index` exceeds [`Pin::MAX`]. In a `const` context this is a
    /// build error.
    #[must_use]
    pub const fn bank0(index: u8) -> Self {
        assert!(index <= Self::MAX, "bank 0 has GPIO0..=GPIO47");
        Self(index)
    }

    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if index <= Self::MAX {
            Some(Self(index))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Which 32-bit SIO word holds this pin: 0 for GPIO0..=31, 1 above.
    #[must_use]
    pub const fn word(self) -> usize {
        (self.0 / 32) as usize
    }

    /// Bit of this pin inside its SIO word.
    #[must_use]
    pub const fn mask(self) -> u32 {
        1 << (self.0 % 32)
    }
}

/// Peripheral routed to a pin through FUNCSEL.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Function {
    Spi = 1,
    Uart = 2,
    I2c = 3,
    Pwm = 4,
    Sio = 5,
    Pio0 = 6,
    Pio1 = 7,
    Pio2 = 8,
    Null = 0x1f,
}

impl Function {
    #[must_use]
    pub fn from_funcsel(value: u32) -> Option<Self> {
        Some(match value {
            1 => Self::Spi,
            2 => Self::Uart,
            3 => Self::I2c,
            4 => Self::Pwm,
            5 => Self::Sio,
            6 => Self::Pio0,
            7 => Self::Pio1,
            8 => Self::Pio2,
            0x1f => Self::Null,
            _ => return None,
        })
    }
}

/// Owner of the three register blocks that decide what a pin does.
pub struct PinCtrl<P: RegisterBlock, I: RegisterBlock, S: RegisterBlock> {
    pads: P,
    io: I,
    sio: S,
}

impl<P: RegisterBlock, I: RegisterBlock, S: RegisterBlock> PinCtrl<P, I, S> {
    pub fn new(pads: P, io: I, sio: S) -> Self {
        Self { pads, io, sio }
    }

    /// Route `pin` to SIO as a push-pull output.
    pub fn configure_digital_output_pin(&mut self, pin: Pin) {
        self.pads.modify_at::<PadsGpio, _>(pin.index(), |w| {
            w.set_od(false);
            w.set_ie(false);
            w.set_pue(false);
            w.set_pde(false);
            w.set_schmitt(true);
            w.set_slewfast(false);
        });

        self.select_function(pin, Function::Sio);
        self.clear_isolation(pin);

        let mut oe = GpioOeSet::default();
        oe.set_pins(pin.mask());
        self.sio.write_at(pin.word(), oe);
    }

    /// Route `pin` to the I2C block as SDA or SCL.
    ///
    /// Input is always enabled so the controller can sense the bus. The
    /// internal pull-up is only wanted when the board has no external ones.
    pub fn configure_signal_pin(&mut self, pin: Pin, internal_pull_up: bool) {
        self.pads.modify_at::<PadsGpio, _>(pin.index(), |w| {
            w.set_od(false);
            w.set_ie(true);
            w.set_pue(internal_pull_up);
            w.set_pde(false);
            w.set_schmitt(true);
            w.set_slewfast(false);
        });

        self.select_function(pin, Function::I2c);
        self.clear_isolation(pin);
    }

    pub fn select_function(&mut self, pin: Pin, function: Function) {
        self.io
            .modify_at::<GpioCtrl, _>(pin.index(), |w| w.set_funcsel(u32::from(function as u8)));
    }

    /// Function currently routed to `pin`, `None` for reserved encodings.
    #[must_use]
    pub fn function_of(&self, pin: Pin) -> Option<Function> {
        Function::from_funcsel(self.io.read_at::<GpioCtrl>(pin.index()).funcsel())
    }

    #[must_use]
    pub fn pad(&self, pin: Pin) -> PadsGpio {
        self.pads.read_at(pin.index())
    }

    /// Drive `pin` through SIO. The pin should have been set up with
    /// [`Self::configure_digital_output_pin`].
    pub fn output(&mut self, pin: Pin) -> SioOutput<'_, S> {
        SioOutput::new(&mut self.sio, pin)
    }

    pub fn release(self) -> (P, I, S) {
        (self.pads, self.io, self.sio)
    }

    fn clear_isolation(&mut self, pin: Pin) {
        self.pads.modify_at::<PadsGpio, _>(pin.index(), |w| w.set_iso(false));
    }
}
