// Licensed under the Apache-2.0 license

//! # I2C hardware instantiation for the RP2350
//!
//! The RP2350 carries two DesignWare I2C units. Both are driven through the
//! same register layout, so unlike SoCs where every peripheral instance is a
//! distinct type, one [`I2cInstance`] enum is enough to pick a unit: it
//! knows the unit's base address, its reset line and the bank 0 pins the
//! board routes to it.
//!
//! [`instantiate_hardware`] builds the board's fixed pairing: I2C0 as
//! controller on GPIO16/17 and I2C1 as target on GPIO26/27, wired together
//! externally.

use crate::common::NoOpLogger;
use crate::i2c::common::I2cConfig;
use crate::i2c::i2c_controller::I2cController;
#[cfg(feature = "i2c_target")]
use crate::i2c::i2c_target::I2cTarget;
use crate::pinctrl::{Pin, PinCtrl};
use crate::regs::{self, Mmio, RegisterBlock};
use crate::syscon::ResetId;
use crate::wait::Spin;

macro_rules! i2c_instances {
    ($($n:literal),+) => {
        paste::paste! {
            #[derive(Copy, Clone, Debug, PartialEq, Eq)]
            pub enum I2cInstance {
                $( [<I2c $n>], )+
            }

            impl I2cInstance {
                pub const ALL: &'static [Self] = &[$( Self::[<I2c $n>] ),+];

                #[must_use]
                pub const fn base(self) -> usize {
                    match self {
                        $( Self::[<I2c $n>] => regs::[<I2C $n _BASE>], )+
                    }
                }

                #[must_use]
                pub const fn reset_id(self) -> ResetId {
                    match self {
                        $( Self::[<I2c $n>] => ResetId::[<I2c $n>], )+
                    }
                }

                #[must_use]
                pub const fn bus_number(self) -> u8 {
                    match self {
                        $( Self::[<I2c $n>] => $n, )+
                    }
                }
            }
        }
    };
}

i2c_instances!(0, 1);

/// SDA and SCL of one unit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct I2cPins {
    pub sda: Pin,
    pub scl: Pin,
}

impl I2cInstance {
    /// Pins the Pico 2 board wiring uses for this unit.
    #[must_use]
    pub const fn board_pins(self) -> I2cPins {
        match self {
            Self::I2c0 => I2cPins {
                sda: Pin::bank0(16),
                scl: Pin::bank0(17),
            },
            Self::I2c1 => I2cPins {
                sda: Pin::bank0(26),
                scl: Pin::bank0(27),
            },
        }
    }

    /// Volatile handle on this unit's registers.
    ///
    /// # Safety
    ///
    /// Only one driver may own a given unit at a time.
    #[must_use]
    pub unsafe fn registers(self) -> Mmio {
        Mmio::new(self.base())
    }
}

/// Route both signal pins of `instance` to the I2C block.
pub fn configure_pins<P, I, S>(
    pins: &mut PinCtrl<P, I, S>,
    instance: I2cInstance,
    config: &I2cConfig,
) where
    P: RegisterBlock,
    I: RegisterBlock,
    S: RegisterBlock,
{
    let I2cPins { sda, scl } = instance.board_pins();
    pins.configure_signal_pin(sda, config.internal_pull_up);
    pins.configure_signal_pin(scl, config.internal_pull_up);
}

pub type BoardController = I2cController<Mmio, Spin, NoOpLogger>;
#[cfg(feature = "i2c_target")]
pub type BoardTarget = I2cTarget<Mmio, Spin, NoOpLogger>;

/// Configure the signal pins of both units and hand out the controller on
/// I2C0 and the target on I2C1. Neither role is configured yet.
///
/// # Safety
///
/// Both I2C units must be out of reset and not owned by anything else.
#[cfg(feature = "i2c_target")]
#[must_use]
pub unsafe fn instantiate_hardware<P, I, S>(
    pins: &mut PinCtrl<P, I, S>,
    config: I2cConfig,
) -> (BoardController, BoardTarget)
where
    P: RegisterBlock,
    I: RegisterBlock,
    S: RegisterBlock,
{
    configure_pins(pins, I2cInstance::I2c0, &config);
    configure_pins(pins, I2cInstance::I2c1, &config);

    (
        I2cController::new(I2cInstance::I2c0.registers(), config),
        I2cTarget::new(I2cInstance::I2c1.registers(), config),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pinctrl::Function;
    use crate::sim::SimMemory;

    #[test]
    fn instances_describe_the_two_units() {
        assert_eq!(I2cInstance::ALL, &[I2cInstance::I2c0, I2cInstance::I2c1]);
        assert_eq!(I2cInstance::I2c0.base(), 0x4009_0000);
        assert_eq!(I2cInstance::I2c1.base(), 0x4009_8000);
        assert_eq!(I2cInstance::I2c1.reset_id(), ResetId::I2c1);
        assert_eq!(I2cInstance::I2c1.bus_number(), 1);
    }

    #[test]
    fn board_pins_are_routed_with_configured_pull_up() {
        let mut pins = PinCtrl::new(
            SimMemory::<49>::filled(0x156),
            SimMemory::<96>::new(),
            SimMemory::<32>::new(),
        );
        let config = crate::i2c::common::I2cConfigBuilder::new()
            .internal_pull_up(true)
            .build();

        for &instance in I2cInstance::ALL {
            configure_pins(&mut pins, instance, &config);
        }

        for pin in [16, 17, 26, 27].map(Pin::bank0) {
            assert_eq!(pins.function_of(pin), Some(Function::I2c));
            assert!(pins.pad(pin).pue());
            assert!(!pins.pad(pin).iso());
        }
        assert!(pins.pad(Pin::bank0(25)).iso());
    }
}
